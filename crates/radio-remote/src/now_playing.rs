use radio_proto::protocol::{Station, STREAM_PATH};
use tracing::debug;

use crate::document::{IndexDocument, Shared};
use crate::error::Result;
use crate::request::{Method, RequestClient};

/// Shows the active station. Refreshed at page-ready and after each
/// successful switch, never on a timer.
#[derive(Clone)]
pub struct NowPlayingSync {
    client: RequestClient,
    view: Shared<IndexDocument>,
}

impl NowPlayingSync {
    pub fn new(client: RequestClient, view: Shared<IndexDocument>) -> Self {
        Self { client, view }
    }

    /// Returns whether the document was updated.
    pub async fn refresh(&self) -> Result<bool> {
        let reply = self.client.request(Method::GET, STREAM_PATH).await;
        if !reply.is_success() {
            debug!("now playing: status {}, left as is", reply.status);
            return Ok(false);
        }

        let current: Option<Station> = reply.json(STREAM_PATH)?;
        debug!(
            "now playing: {}",
            current.as_ref().map(|s| s.name.as_str()).unwrap_or("nothing")
        );
        self.view.lock().await.set_now_playing(current);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{shared, NowPlaying, PLACEHOLDER};
    use crate::request::Reply;
    use crate::testing::ScriptedTransport;

    fn sync_with(status: u16, body: &'static str) -> (NowPlayingSync, Shared<IndexDocument>) {
        let transport = ScriptedTransport::new(move |_| Reply::new(status, body));
        let doc = shared(IndexDocument::new());
        (NowPlayingSync::new(RequestClient::new(transport), doc.clone()), doc)
    }

    #[tokio::test]
    async fn test_null_shows_placeholder() {
        let (sync, doc) = sync_with(200, "null");

        assert!(sync.refresh().await.unwrap());

        let doc = doc.lock().await;
        assert_eq!(doc.now_playing(), &NowPlaying::Idle);
        assert_eq!(doc.now_playing_text(), PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_station_shows_name_and_clears_title() {
        let (sync, doc) = sync_with(200, r#"{"id": 2, "name": "NTS 1", "url": "http://nts"}"#);
        doc.lock().await.set_track_title("Old Artist - Old Song");

        sync.refresh().await.unwrap();

        let doc = doc.lock().await;
        assert_eq!(doc.now_playing_text(), "NTS 1");
        assert_eq!(doc.track_title(), "");
    }

    #[tokio::test]
    async fn test_failure_leaves_document_untouched() {
        let (sync, doc) = sync_with(503, r#"{"id": 2, "name": "NTS 1", "url": "http://nts"}"#);
        doc.lock().await.set_track_title("Artist - Song");

        assert!(!sync.refresh().await.unwrap());

        let doc = doc.lock().await;
        assert_eq!(doc.now_playing(), &NowPlaying::Unknown);
        assert_eq!(doc.track_title(), "Artist - Song");
    }
}
