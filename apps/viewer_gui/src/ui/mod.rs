//! UI layer for the viewer: app shell and view panels.

pub mod app;
pub mod panels;
pub mod session;

pub use app::{PersistedViewerState, ViewerApp, PERSISTED_STATE_KEY};
