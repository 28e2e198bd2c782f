//! Loader worker: owns the tokio runtime and answers UI load requests.

pub mod commands;
pub mod runtime;
