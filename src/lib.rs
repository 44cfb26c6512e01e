//! Telecast — virtual broadcast TV over a local media library.
//!
//! Every viewer of a channel sees the same instant of the same episode:
//! "what's on now" is derived purely from wall-clock time modulo the
//! channel's total loop duration, with no persisted playhead and no
//! per-client session.

pub mod config;
pub mod error;
pub mod models;
pub mod scanner;
pub mod scheduler;
pub mod server;
pub mod store;
