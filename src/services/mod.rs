// src/services/mod.rs

//! Page fetching and per-page parsers.
//!
//! One module per page type; each fetches a single page through
//! [`client::PageSource`] and normalizes its tables into the domain records
//! in [`crate::models`].

pub mod boxscore;
pub mod client;
pub mod play_by_play;
pub mod plus_minus;
pub mod schedule;
pub mod table;
pub mod teams;

pub use boxscore::get_boxscore;
pub use client::{HttpClient, PageSource};
pub use play_by_play::get_play_by_play;
pub use plus_minus::get_plus_minus;
pub use schedule::get_schedule;
pub use teams::get_teams;
