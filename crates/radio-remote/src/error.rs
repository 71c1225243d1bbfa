use thiserror::Error;

/// Internal failures of the page controllers.
///
/// None of these reach the user: pages log them and leave the document as it
/// was, the same way a non-200 reply is handled.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("failed to decode {path} response: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("no element with id {0:?}")]
    UnknownElement(String),
    #[error("sentinel {0:?} is not in the container")]
    MissingSentinel(String),
}

pub type Result<T> = std::result::Result<T, RemoteError>;
