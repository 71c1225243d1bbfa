//! Track-title poller.
//!
//! Each fetch schedules the next one only after it completes, so at most one
//! request is ever in flight. The loop runs for the lifetime of the page: no
//! cancellation, no backoff, failures are retried at the same cadence.

use std::time::Duration;

use radio_proto::protocol::NOW_PLAYING_PATH;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::document::{IndexDocument, Shared};
use crate::request::{Method, RequestClient};

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(5000);

pub struct TitlePollLoop {
    client: RequestClient,
    view: Shared<IndexDocument>,
    interval: Duration,
}

impl TitlePollLoop {
    pub fn new(client: RequestClient, view: Shared<IndexDocument>, interval: Duration) -> Self {
        Self {
            client,
            view,
            interval,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    pub async fn run(self) {
        loop {
            self.poll_once().await;
            tokio::time::sleep(self.interval).await;
        }
    }

    /// One fetch. Returns whether the displayed title was written.
    pub async fn poll_once(&self) -> bool {
        let reply = self.client.request(Method::GET, NOW_PLAYING_PATH).await;
        if !reply.is_success() {
            debug!("title poll: status {}", reply.status);
            return false;
        }

        match reply.json::<Option<String>>(NOW_PLAYING_PATH) {
            Ok(title) => {
                self.view
                    .lock()
                    .await
                    .set_track_title(title.unwrap_or_default());
                true
            }
            Err(e) => {
                warn!("title poll: {}", e);
                false
            }
        }
    }
}
