// src/storage/mod.rs

//! Persistence for scraped statistics.

pub mod cache;

pub use cache::{StatCache, StatTable};
