// src/pipeline/sync.rs

//! Incremental sync driver.
//!
//! Schedules come first: the latest stored season is dropped and re-pulled
//! in full (in-season schedules keep changing), then any seasons up through
//! the requested one are appended. The per-game tables then sync only the
//! completed games they have not yet recorded. Each game is fetched,
//! parsed, and committed as one unit before the next identifier is touched;
//! a fatal error leaves earlier commits in place.

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::services::client::PageSource;
use crate::services::{get_boxscore, get_play_by_play, get_plus_minus, get_schedule, get_teams};
use crate::storage::{StatCache, StatTable};

/// Row and game counts from one sync run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub first_season: i32,
    pub last_season: i32,
    pub schedule_rows: usize,
    pub boxscore_games: usize,
    pub plus_minus_games: usize,
    pub play_by_play_games: usize,
}

/// Run the full sync: schedule, boxscore, plus-minus, play-by-play.
pub fn run_sync(
    source: &dyn PageSource,
    cache: &mut StatCache,
    config: &Config,
    through_season: i32,
) -> Result<SyncReport> {
    let first_season = cache
        .latest_season()?
        .unwrap_or(config.sync.start_season);
    if first_season > through_season {
        return Err(AppError::config(format!(
            "cache already holds season {first_season}, past the requested {through_season}"
        )));
    }

    let mut report = SyncReport {
        first_season,
        last_season: through_season,
        ..SyncReport::default()
    };

    report.schedule_rows = sync_schedules(source, cache, first_season, through_season)?;

    let completed = cache.completed_game_ids()?;
    log::info!("{} completed games on record", completed.len());

    report.boxscore_games = sync_boxscores(source, cache, &completed)?;
    report.plus_minus_games = sync_plus_minus(source, cache, &completed)?;
    report.play_by_play_games = sync_play_by_play(source, cache, &completed)?;

    log::info!(
        "sync complete: {} schedule rows, {} boxscores, {} plus-minus, {} play-by-play",
        report.schedule_rows,
        report.boxscore_games,
        report.plus_minus_games,
        report.play_by_play_games
    );
    Ok(report)
}

/// Re-pull the first season and append every season through the last.
///
/// Returns the number of schedule rows written.
pub fn sync_schedules(
    source: &dyn PageSource,
    cache: &mut StatCache,
    first_season: i32,
    last_season: i32,
) -> Result<usize> {
    let dropped = cache.delete_schedule_season(first_season)?;
    log::info!("season {first_season}: dropped {dropped} schedule rows for re-pull");

    let mut written = 0;
    for season in first_season..=last_season {
        for team in get_teams(source, season)? {
            log::info!("syncing schedule: {season} {team}");
            let rows = get_schedule(source, &team, season)?;
            written += cache.append_schedule(&rows)?;
        }
    }
    Ok(written)
}

/// Pull boxscores for completed games not yet recorded.
pub fn sync_boxscores(
    source: &dyn PageSource,
    cache: &mut StatCache,
    completed: &[String],
) -> Result<usize> {
    let pending = pending_ids(cache, StatTable::Boxscore, completed)?;
    for game_id in &pending {
        log::info!("syncing boxscore: {game_id}");
        let rows = get_boxscore(source, game_id)?;
        cache.append_boxscore(&rows)?;
    }
    Ok(pending.len())
}

/// Pull substitution plus-minus for completed games not yet recorded.
pub fn sync_plus_minus(
    source: &dyn PageSource,
    cache: &mut StatCache,
    completed: &[String],
) -> Result<usize> {
    let pending = pending_ids(cache, StatTable::PlusMinus, completed)?;
    for game_id in &pending {
        log::info!("syncing plus-minus: {game_id}");
        let rows = get_plus_minus(source, game_id)?;
        cache.append_plus_minus(&rows)?;
    }
    Ok(pending.len())
}

/// Pull play-by-play logs for completed games not yet recorded.
pub fn sync_play_by_play(
    source: &dyn PageSource,
    cache: &mut StatCache,
    completed: &[String],
) -> Result<usize> {
    let pending = pending_ids(cache, StatTable::PlayByPlay, completed)?;
    for game_id in &pending {
        log::info!("syncing play-by-play: {game_id}");
        let rows = get_play_by_play(source, game_id)?;
        cache.append_play_by_play(&rows)?;
    }
    Ok(pending.len())
}

/// Identifiers still pending for a table: completed games it has not
/// recorded. Persisted identifiers are never re-fetched.
fn pending_ids(
    cache: &StatCache,
    table: StatTable,
    completed: &[String],
) -> Result<Vec<String>> {
    let recorded = cache.recorded_game_ids(table)?;
    Ok(completed
        .iter()
        .filter(|id| !recorded.contains(*id))
        .cloned()
        .collect())
}
