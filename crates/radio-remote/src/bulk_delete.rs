//! Bulk delete: one DELETE per checked station, all started at once, joined by
//! an all-succeed barrier that gates the form's native submission.
//!
//! When any DELETE fails the barrier rejects and nothing else happens. Stations
//! already deleted stay deleted, requests still in flight run to completion,
//! and the page gives no sign of which deletions went through.

use futures_util::future::try_join_all;
use radio_proto::protocol::{stream_path, StationId};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::document::{station_id_from_element, DeleteDocument, Event, Shared, CHECKBOX_PREFIX};
use crate::request::{Method, Reply, RequestClient, TRANSPORT_FAILURE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkDeleteOutcome {
    /// Every DELETE returned 200 and the form was submitted.
    Submitted { deleted: usize },
    /// The barrier rejected on this station's reply; no navigation.
    Aborted { station: StationId, status: u16 },
}

/// First failure seen by [`all_succeed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    pub station: StationId,
    pub status: u16,
}

/// Waits for every task and resolves with their count only if all replied 200.
/// Rejects as soon as one fails; the remaining tasks are left running.
pub async fn all_succeed(tasks: Vec<(StationId, JoinHandle<Reply>)>) -> Result<usize, Rejected> {
    let joins = tasks.into_iter().map(|(station, handle)| async move {
        match handle.await {
            Ok(reply) if reply.is_success() => Ok(()),
            Ok(reply) => Err(Rejected {
                station,
                status: reply.status,
            }),
            Err(_) => Err(Rejected {
                station,
                status: TRANSPORT_FAILURE,
            }),
        }
    });
    try_join_all(joins).await.map(|done| done.len())
}

#[derive(Clone)]
pub struct BulkDeleteCoordinator {
    client: RequestClient,
    form: Shared<DeleteDocument>,
}

impl BulkDeleteCoordinator {
    pub fn new(client: RequestClient, form: Shared<DeleteDocument>) -> Self {
        Self { client, form }
    }

    /// Submit handler of the delete form.
    pub async fn delete_selected(&self, event: &mut Event) -> BulkDeleteOutcome {
        event.prevent_default();

        let selection = self.selection().await;
        let tasks: Vec<_> = selection
            .into_iter()
            .map(|id| {
                let reply = self.client.request(Method::DELETE, stream_path(&id));
                (id, tokio::spawn(reply))
            })
            .collect();
        let started = tasks.len();

        match all_succeed(tasks).await {
            Ok(deleted) => {
                info!("bulk delete: {} stations deleted, submitting form", deleted);
                self.form.lock().await.submit_native();
                BulkDeleteOutcome::Submitted { deleted }
            }
            Err(Rejected { station, status }) => {
                warn!(
                    "bulk delete: station {} failed with status {} ({} requests started), not submitting",
                    station, status, started
                );
                BulkDeleteOutcome::Aborted { station, status }
            }
        }
    }

    /// Ids of the checked boxes, in document order.
    async fn selection(&self) -> Vec<StationId> {
        let form = self.form.lock().await;
        let mut selected = Vec::new();
        for checkbox in form.form.entries() {
            let Some(id) = station_id_from_element(CHECKBOX_PREFIX, &checkbox.element_id) else {
                warn!("bulk delete: no station id in {:?}", checkbox.element_id);
                continue;
            };
            if checkbox.checked {
                selected.push(id);
            }
        }
        selected
    }
}
