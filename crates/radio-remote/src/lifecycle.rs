use radio_proto::protocol::{stream_path, NewStation, StationId, STREAM_PATH};
use tracing::{info, warn};

use crate::document::{Event, Navigation, NewStationDocument, Shared, INDEX_PAGE};
use crate::error::Result;
use crate::now_playing::NowPlayingSync;
use crate::request::{Method, RequestClient};

/// Switch and create actions. Failures are silent: the page simply stays as it
/// was, with no retry.
#[derive(Clone)]
pub struct StationLifecycle {
    client: RequestClient,
}

impl StationLifecycle {
    pub fn new(client: RequestClient) -> Self {
        Self { client }
    }

    /// PUT `/stream/{id}`; on success refresh the now-playing display once.
    pub async fn switch_to(&self, id: &StationId, now_playing: &NowPlayingSync) -> Result<bool> {
        let reply = self.client.request(Method::PUT, stream_path(id)).await;
        if !reply.is_success() {
            warn!("switch to station {}: status {}", id, reply.status);
            return Ok(false);
        }
        info!("switched to station {}", id);
        now_playing.refresh().await?;
        Ok(true)
    }

    /// Submit handler of the new-station form. Navigates to the index page on
    /// success and stays put otherwise.
    pub async fn create(&self, form: &Shared<NewStationDocument>, event: &mut Event) -> bool {
        event.prevent_default();

        let payload = {
            let form = form.lock().await;
            NewStation {
                name: form.name.clone(),
                url: form.url.clone(),
            }
        };

        let reply = self.client.submit(Method::POST, STREAM_PATH, &payload).await;
        if !reply.is_success() {
            warn!("create station {:?}: status {}", payload.name, reply.status);
            return false;
        }

        info!("created station {:?}", payload.name);
        form.lock()
            .await
            .navigations
            .push(Navigation::Location(INDEX_PAGE.to_string()));
        true
    }
}
