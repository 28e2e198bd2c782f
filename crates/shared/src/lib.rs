//! Tick data model shared by the loader, the playback core, the views and the apps.

pub mod domain;
pub mod error;
pub mod series;
pub mod settings;
