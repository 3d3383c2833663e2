// src/models/mod.rs

//! Domain models for the relay.

mod comic;
mod config;
mod visited;

// Re-export all public types
pub use comic::{BROKEN_COMIC_ID, Comic, ComicId, ComicRecord, LatestRecord};
pub use config::{
    ArchiveConfig, HttpConfig, RetryConfig, RuntimeConfig, Schedule, ScheduleConfig,
    StorageConfig, TelegramConfig, env,
};
pub use visited::VisitedSet;
