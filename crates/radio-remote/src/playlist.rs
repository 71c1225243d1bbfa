//! Playlist rendering: fetch `/playlist` and insert one entry per station in
//! front of the page's sentinel node.
//!
//! `load` is call-once per page. It does not clear earlier entries, so a
//! second call on an unchanged playlist renders every station twice, and two
//! loads must never run at the same time on one document.

use std::collections::HashSet;

use radio_proto::protocol::{SortOrder, Station, PLAYLIST_PATH};
use tracing::{debug, warn};

use crate::document::{
    DeleteDocument, IndexDocument, Shared, StationCheckbox, StationLink, DELETE_FORM_SENTINEL,
    STREAM_LIST_SENTINEL,
};
use crate::error::Result;
use crate::request::{Method, RequestClient};

/// A document that can show the playlist.
pub trait PlaylistView: Send + 'static {
    fn insert_station(&mut self, station: &Station) -> Result<()>;
}

impl PlaylistView for IndexDocument {
    fn insert_station(&mut self, station: &Station) -> Result<()> {
        self.stream_list
            .insert_before(STREAM_LIST_SENTINEL, StationLink::new(station))
    }
}

impl PlaylistView for DeleteDocument {
    fn insert_station(&mut self, station: &Station) -> Result<()> {
        self.form
            .insert_before(DELETE_FORM_SENTINEL, StationCheckbox::new(station))
    }
}

pub struct PlaylistRenderer<V> {
    client: RequestClient,
    view: Shared<V>,
    order: SortOrder,
}

impl<V: PlaylistView> PlaylistRenderer<V> {
    pub fn new(client: RequestClient, view: Shared<V>, order: SortOrder) -> Self {
        Self {
            client,
            view,
            order,
        }
    }

    /// Returns how many entries were inserted. A non-200 reply inserts nothing
    /// and is not an error.
    pub async fn load(&self) -> Result<usize> {
        let reply = self.client.request(Method::GET, PLAYLIST_PATH).await;
        if !reply.is_success() {
            debug!("playlist: status {}, nothing rendered", reply.status);
            return Ok(0);
        }

        let mut stations: Vec<Station> = reply.json(PLAYLIST_PATH)?;
        self.order.apply(&mut stations);

        let mut seen = HashSet::new();
        let mut view = self.view.lock().await;
        let mut rendered = 0;
        for station in &stations {
            if !seen.insert(&station.id) {
                warn!("playlist: duplicate station id {}, skipped", station.id);
                continue;
            }
            view.insert_station(station)?;
            rendered += 1;
        }
        debug!("playlist: rendered {} stations", rendered);
        Ok(rendered)
    }
}
