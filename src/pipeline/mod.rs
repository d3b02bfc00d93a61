// src/pipeline/mod.rs

//! Pipeline entry points for sync operations.
//!
//! - `run_sync`: full schedule → boxscore → plus-minus → play-by-play sync
//! - `sync_*`: individual stages over an open cache

pub mod sync;

pub use sync::{
    SyncReport, run_sync, sync_boxscores, sync_play_by_play, sync_plus_minus, sync_schedules,
};
