//! Shared data model, endpoint paths and configuration for the radio remote.

pub mod config;
pub mod platform;
pub mod protocol;
