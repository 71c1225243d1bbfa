//! Controller for an internet-radio playlist manager.
//!
//! Each page of the web UI is modelled as a document view-model plus a
//! controller ([`pages`]). Controllers talk to the server only through
//! [`request::RequestClient`], and every component inspects its own reply
//! status: 200 means proceed, anything else means silently do nothing.

pub mod bulk_delete;
pub mod document;
pub mod error;
pub mod lifecycle;
pub mod now_playing;
pub mod pages;
pub mod playlist;
pub mod request;
pub mod title_poll;

#[cfg(test)]
mod testing;
