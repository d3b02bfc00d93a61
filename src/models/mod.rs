// src/models/mod.rs

//! Domain models for the sync application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod boxscore;
mod config;
mod play_by_play;
mod plus_minus;
mod schedule;
mod team;

// Re-export all public types
pub use boxscore::{BoxscoreRow, TEAM_TOTALS};
pub use config::{BASE_DIR_ENV, Config, HttpConfig, SyncConfig, current_season};
pub use play_by_play::PlayEvent;
pub use plus_minus::SubstitutionInterval;
pub use schedule::ScheduleRow;
pub use team::team_code;
