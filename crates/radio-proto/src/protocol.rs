use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Collection of every known station, in server order.
pub const PLAYLIST_PATH: &str = "/playlist";
/// GET: currently active station (or `null`). POST: create a station.
pub const STREAM_PATH: &str = "/stream";
/// Current track title of the active stream, as a JSON string.
pub const NOW_PLAYING_PATH: &str = "/now_playing";

/// Station-scoped path used for switching (PUT) and deleting (DELETE).
pub fn stream_path(id: &StationId) -> String {
    format!("{}/{}", STREAM_PATH, id)
}

/// Opaque station identifier.
///
/// The server hands out numeric ids today, but clients only ever echo them
/// back inside paths and element identifiers, so both JSON numbers and strings
/// are accepted and kept in their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StationId(String);

impl StationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for StationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for StationId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for StationId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Unsigned(u64),
            Signed(i64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Unsigned(n) => Self(n.to_string()),
            Raw::Signed(n) => Self(n.to_string()),
            Raw::Text(s) => Self(s),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    pub url: String,
}

/// Payload for `POST /stream`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewStation {
    pub name: String,
    pub url: String,
}

/// Presentation order for a rendered playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Keep the order the server returned.
    #[default]
    Server,
    /// Stable sort by station name.
    Name,
}

impl SortOrder {
    pub fn apply(self, stations: &mut [Station]) {
        match self {
            SortOrder::Server => {}
            SortOrder::Name => stations.sort_by(|a, b| a.name.cmp(&b.name)),
        }
    }
}
