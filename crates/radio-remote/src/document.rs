//! View-models standing in for the three pages' documents.
//!
//! Components never look elements up globally; each one is handed the
//! document it renders into. Documents are shared behind a tokio mutex and
//! nobody holds the lock across a network await.

use std::fmt;
use std::sync::Arc;

use radio_proto::protocol::{Station, StationId};
use tokio::sync::Mutex;

use crate::error::{RemoteError, Result};

pub type Shared<T> = Arc<Mutex<T>>;

pub fn shared<T>(document: T) -> Shared<T> {
    Arc::new(Mutex::new(document))
}

/// Shown in place of a station name when nothing is playing.
pub const PLACEHOLDER: &str = "¯\\_(ツ)_/¯";

/// Where successful create/delete flows land.
pub const INDEX_PAGE: &str = "index.html";

/// Fixed node closing the station list on the index page.
pub const STREAM_LIST_SENTINEL: &str = "new_stream";
/// Submit button closing the checkbox list on the delete page.
pub const DELETE_FORM_SENTINEL: &str = "button-delete";

pub const LINK_PREFIX: &str = "stream";
pub const CHECKBOX_PREFIX: &str = "station";

/// Element identifiers are `{prefix}-{station id}`.
pub fn element_id(prefix: &str, id: &StationId) -> String {
    format!("{}-{}", prefix, id)
}

/// Inverse of [`element_id`]. Everything after the first separator is the id.
pub fn station_id_from_element(prefix: &str, element_id: &str) -> Option<StationId> {
    element_id
        .strip_prefix(prefix)?
        .strip_prefix('-')
        .filter(|id| !id.is_empty())
        .map(StationId::from)
}

/// A click or submit event; handlers cancel the browser default through it.
#[derive(Debug, Default)]
pub struct Event {
    default_prevented: bool,
}

impl Event {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// A page transition requested by a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// `window.location = ...`
    Location(String),
    /// The form's own (native) submission.
    FormSubmit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Child<T> {
    Entry(T),
    /// Static markup, addressed by its element id.
    Fixed(String),
}

/// Ordered children of one container element.
#[derive(Debug, Clone)]
pub struct Container<T> {
    children: Vec<Child<T>>,
}

impl<T> Container<T> {
    pub fn new(fixed: &[&str]) -> Self {
        Self {
            children: fixed.iter().map(|id| Child::Fixed(id.to_string())).collect(),
        }
    }

    /// Inserts `entry` directly in front of the fixed node `sentinel`, so
    /// successive inserts keep their relative order.
    pub fn insert_before(&mut self, sentinel: &str, entry: T) -> Result<()> {
        let idx = self
            .position_of(sentinel)
            .ok_or_else(|| RemoteError::MissingSentinel(sentinel.to_string()))?;
        self.children.insert(idx, Child::Entry(entry));
        Ok(())
    }

    pub fn position_of(&self, fixed_id: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|c| matches!(c, Child::Fixed(id) if id == fixed_id))
    }

    pub fn children(&self) -> &[Child<T>] {
        &self.children
    }

    pub fn entries(&self) -> impl Iterator<Item = &T> {
        self.children.iter().filter_map(|c| match c {
            Child::Entry(e) => Some(e),
            Child::Fixed(_) => None,
        })
    }

    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.children.iter_mut().filter_map(|c| match c {
            Child::Entry(e) => Some(e),
            Child::Fixed(_) => None,
        })
    }
}

/// `<li><a id="stream-{id}" href="#"><span class="title">{name}</span></a></li>`
#[derive(Debug, Clone, PartialEq)]
pub struct StationLink {
    pub element_id: String,
    /// Bound when the entry is rendered; the click handler switches to it.
    pub station: StationId,
    pub label: String,
}

impl StationLink {
    pub fn new(station: &Station) -> Self {
        Self {
            element_id: element_id(LINK_PREFIX, &station.id),
            station: station.id.clone(),
            label: station.name.clone(),
        }
    }
}

/// `<div><input type="checkbox" id="station-{id}"><label>{name}</label></div>`
#[derive(Debug, Clone, PartialEq)]
pub struct StationCheckbox {
    pub element_id: String,
    pub label: String,
    pub checked: bool,
}

impl StationCheckbox {
    pub fn new(station: &Station) -> Self {
        Self {
            element_id: element_id(CHECKBOX_PREFIX, &station.id),
            label: station.name.clone(),
            checked: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum NowPlaying {
    /// Not fetched yet; the element is still empty.
    #[default]
    Unknown,
    Idle,
    Playing(Station),
}

#[derive(Debug, Clone)]
pub struct IndexDocument {
    pub stream_list: Container<StationLink>,
    now_playing: NowPlaying,
    track_title: String,
}

impl Default for IndexDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexDocument {
    pub fn new() -> Self {
        Self {
            stream_list: Container::new(&[STREAM_LIST_SENTINEL]),
            now_playing: NowPlaying::Unknown,
            track_title: String::new(),
        }
    }

    pub fn now_playing(&self) -> &NowPlaying {
        &self.now_playing
    }

    pub fn now_playing_text(&self) -> &str {
        match &self.now_playing {
            NowPlaying::Unknown => "",
            NowPlaying::Idle => PLACEHOLDER,
            NowPlaying::Playing(station) => &station.name,
        }
    }

    /// Replaces the current station and clears the stale track title.
    pub fn set_now_playing(&mut self, station: Option<Station>) {
        self.now_playing = match station {
            Some(station) => NowPlaying::Playing(station),
            None => NowPlaying::Idle,
        };
        self.track_title.clear();
    }

    pub fn set_track_title(&mut self, title: impl Into<String>) {
        self.track_title = title.into();
    }

    /// Visible title; always empty while nothing is playing.
    pub fn track_title(&self) -> &str {
        match self.now_playing {
            NowPlaying::Idle => "",
            _ => &self.track_title,
        }
    }

    pub fn link(&self, element_id: &str) -> Option<&StationLink> {
        self.stream_list
            .entries()
            .find(|link| link.element_id == element_id)
    }
}

impl fmt::Display for IndexDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "now playing: {}", self.now_playing_text())?;
        writeln!(f, "title:       {}", self.track_title())?;
        let current = match &self.now_playing {
            NowPlaying::Playing(station) => Some(&station.id),
            _ => None,
        };
        for link in self.stream_list.entries() {
            let marker = if current == Some(&link.station) { '>' } else { ' ' };
            writeln!(f, "{} {:>4}  {}", marker, link.station, link.label)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewStationDocument {
    pub name: String,
    pub url: String,
    pub navigations: Vec<Navigation>,
}

impl NewStationDocument {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            navigations: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeleteDocument {
    pub form: Container<StationCheckbox>,
    pub navigations: Vec<Navigation>,
}

impl Default for DeleteDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl DeleteDocument {
    pub fn new() -> Self {
        Self {
            form: Container::new(&[DELETE_FORM_SENTINEL]),
            navigations: Vec::new(),
        }
    }

    pub fn set_checked(&mut self, element_id: &str, checked: bool) -> Result<()> {
        let checkbox = self
            .form
            .entries_mut()
            .find(|c| c.element_id == element_id)
            .ok_or_else(|| RemoteError::UnknownElement(element_id.to_string()))?;
        checkbox.checked = checked;
        Ok(())
    }

    /// The browser-native submission of the delete form.
    pub fn submit_native(&mut self) {
        self.navigations.push(Navigation::FormSubmit);
    }

    pub fn form_submissions(&self) -> usize {
        self.navigations
            .iter()
            .filter(|n| **n == Navigation::FormSubmit)
            .count()
    }
}
