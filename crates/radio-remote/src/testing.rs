//! In-memory transport for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::FutureExt;

use crate::request::{Method, Reply, ReplyFuture, Request, Transport};

type Responder = dyn Fn(&Request) -> Reply + Send + Sync;

/// Records every request at send time and answers from a closure, optionally
/// after a per-path delay.
#[derive(Clone)]
pub struct ScriptedTransport {
    log: Arc<Mutex<Vec<Request>>>,
    completed: Arc<AtomicUsize>,
    delays: Arc<Mutex<HashMap<String, Duration>>>,
    responder: Arc<Responder>,
}

impl ScriptedTransport {
    pub fn new(responder: impl Fn(&Request) -> Reply + Send + Sync + 'static) -> Self {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
            completed: Arc::new(AtomicUsize::new(0)),
            delays: Arc::new(Mutex::new(HashMap::new())),
            responder: Arc::new(responder),
        }
    }

    /// Delays replies to `path` by `delay` (tokio time, so paused clocks apply).
    pub fn with_delay(self, path: &str, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(path.to_string(), delay);
        self
    }

    pub fn requests(&self) -> Vec<(Method, String)> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .map(|r| (r.method.clone(), r.path.clone()))
            .collect()
    }

    pub fn bodies(&self) -> Vec<Option<String>> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.json_body.clone())
            .collect()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: Request) -> ReplyFuture {
        let reply = (self.responder)(&request);
        let delay = self.delays.lock().unwrap().get(&request.path).copied();
        self.log.lock().unwrap().push(request);

        let completed = Arc::clone(&self.completed);
        async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            completed.fetch_add(1, Ordering::SeqCst);
            reply
        }
        .boxed()
    }
}

pub fn playlist_json(stations: &[(u64, &str)]) -> String {
    let stations: Vec<serde_json::Value> = stations
        .iter()
        .map(|(id, name)| {
            serde_json::json!({
                "id": id,
                "name": name,
                "url": format!("http://streams.example/{}", id),
            })
        })
        .collect();
    serde_json::Value::Array(stations).to_string()
}
