//! Page controllers: what each page wires up when its document becomes ready,
//! and the handlers its elements dispatch to.

use std::time::Duration;

use radio_proto::config::Config;
use radio_proto::protocol::SortOrder;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::bulk_delete::{BulkDeleteCoordinator, BulkDeleteOutcome};
use crate::document::{shared, DeleteDocument, Event, IndexDocument, NewStationDocument, Shared};
use crate::error::{RemoteError, Result};
use crate::lifecycle::StationLifecycle;
use crate::now_playing::NowPlayingSync;
use crate::playlist::{PlaylistRenderer, PlaylistView};
use crate::request::RequestClient;
use crate::title_poll::TitlePollLoop;

/// Tasks started by the index page's ready handler.
pub struct IndexTasks {
    pub playlist: JoinHandle<()>,
    pub now_playing: JoinHandle<()>,
    /// Never finishes on its own.
    pub title_poll: JoinHandle<()>,
}

fn spawn_load<V: PlaylistView>(renderer: PlaylistRenderer<V>) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = renderer.load().await {
            error!("playlist: {}", e);
        }
    })
}

pub struct IndexPage {
    client: RequestClient,
    document: Shared<IndexDocument>,
    order: SortOrder,
    title_interval: Duration,
    now_playing: NowPlayingSync,
    lifecycle: StationLifecycle,
}

impl IndexPage {
    pub fn new(client: RequestClient, order: SortOrder, title_interval: Duration) -> Self {
        let document = shared(IndexDocument::new());
        Self {
            now_playing: NowPlayingSync::new(client.clone(), document.clone()),
            lifecycle: StationLifecycle::new(client.clone()),
            client,
            document,
            order,
            title_interval,
        }
    }

    pub fn from_config(client: RequestClient, config: &Config) -> Self {
        Self::new(
            client,
            config.display.index_order,
            config.polling.title_interval(),
        )
    }

    pub fn document(&self) -> Shared<IndexDocument> {
        self.document.clone()
    }

    /// Runs once per page: playlist, now playing and the title poll loop all
    /// start together and complete independently.
    pub fn ready(&self) -> IndexTasks {
        info!("index page ready");
        let playlist = spawn_load(PlaylistRenderer::new(
            self.client.clone(),
            self.document.clone(),
            self.order,
        ));

        let now_playing = self.now_playing.clone();
        let now_playing = tokio::spawn(async move {
            if let Err(e) = now_playing.refresh().await {
                error!("now playing: {}", e);
            }
        });

        let title_poll =
            TitlePollLoop::new(self.client.clone(), self.document.clone(), self.title_interval)
                .spawn();

        IndexTasks {
            playlist,
            now_playing,
            title_poll,
        }
    }

    /// Click on a rendered station entry. Returns whether the switch went
    /// through.
    pub async fn click(&self, element_id: &str, event: &mut Event) -> Result<bool> {
        event.prevent_default();
        let station = self
            .document
            .lock()
            .await
            .link(element_id)
            .map(|link| link.station.clone())
            .ok_or_else(|| RemoteError::UnknownElement(element_id.to_string()))?;
        self.lifecycle.switch_to(&station, &self.now_playing).await
    }
}

pub struct NewStationPage {
    document: Shared<NewStationDocument>,
    lifecycle: StationLifecycle,
}

impl NewStationPage {
    pub fn new(client: RequestClient, document: NewStationDocument) -> Self {
        Self {
            document: shared(document),
            lifecycle: StationLifecycle::new(client),
        }
    }

    pub fn document(&self) -> Shared<NewStationDocument> {
        self.document.clone()
    }

    pub async fn submit(&self, event: &mut Event) -> bool {
        self.lifecycle.create(&self.document, event).await
    }
}

pub struct DeletePage {
    client: RequestClient,
    document: Shared<DeleteDocument>,
    order: SortOrder,
    coordinator: BulkDeleteCoordinator,
}

impl DeletePage {
    pub fn new(client: RequestClient, order: SortOrder) -> Self {
        let document = shared(DeleteDocument::new());
        Self {
            coordinator: BulkDeleteCoordinator::new(client.clone(), document.clone()),
            client,
            document,
            order,
        }
    }

    pub fn from_config(client: RequestClient, config: &Config) -> Self {
        Self::new(client, config.display.delete_order)
    }

    pub fn document(&self) -> Shared<DeleteDocument> {
        self.document.clone()
    }

    pub fn ready(&self) -> JoinHandle<()> {
        info!("delete page ready");
        spawn_load(PlaylistRenderer::new(
            self.client.clone(),
            self.document.clone(),
            self.order,
        ))
    }

    pub async fn submit(&self, event: &mut Event) -> BulkDeleteOutcome {
        self.coordinator.delete_selected(event).await
    }
}
