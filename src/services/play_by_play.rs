// src/services/play_by_play.rs

//! Play-by-play scraping.
//!
//! The source renders one wide table with the away side's events and points
//! in the columns left of the running score and the home side's to the
//! right. Each source row is split into an away and a home candidate event,
//! empty candidates are dropped, and full-width rows (period markers, jump
//! balls) that replicate into both halves are collapsed by de-duplication.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

use crate::error::{AppError, Result};
use crate::models::PlayEvent;
use crate::services::client::PageSource;
use crate::services::table::extract_table;

static SCORE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+-\d+$").expect("static regex"));
static POINTS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\+\d+$").expect("static regex"));
static CLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+:\d+\.\d+$").expect("static regex"));
static PERIOD_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Start of .*(quarter|overtime)$").expect("static regex"));

/// All events of the given game, in order, with forward-filled scores.
pub fn get_play_by_play(source: &dyn PageSource, game_id: &str) -> Result<Vec<PlayEvent>> {
    let path = format!("/boxscores/pbp/{game_id}.html");
    let html = source.fetch(&path)?;
    parse_play_by_play(&html, &path, game_id)
}

fn parse_play_by_play(html: &str, page: &str, game_id: &str) -> Result<Vec<PlayEvent>> {
    let document = Html::parse_document(html);
    let table = extract_table(&document, "pbp", page)?;

    if table.headers.len() < 6 {
        return Err(AppError::parse(page, "play-by-play table is not six columns wide"));
    }
    let away_city = table.headers[1].clone();
    let home_city = table.headers[5].clone();

    // Split each source row into away and home halves, away first,
    // keeping only halves that carry event text.
    let mut raw = Vec::new();
    for cells in &table.rows {
        if cells.len() < 6 {
            continue;
        }
        for (event_col, points_col, city, is_home) in
            [(1, 2, &away_city, false), (5, 4, &home_city, true)]
        {
            let event = cells[event_col].clone();
            if event.is_empty() {
                continue;
            }
            raw.push(RawEvent {
                time: cells[0].clone(),
                city: city.clone(),
                is_home,
                score: cells[3].clone(),
                event,
                points: cells[points_col].clone(),
            });
        }
    }

    // Forward-fill the running score across non-scoring rows; the game
    // opens at 0-0 before the first recorded score.
    let mut last_score = "0-0".to_string();
    let mut seen = HashSet::new();
    let mut quarter: i64 = 0;
    let mut events = Vec::new();

    for r in raw {
        if SCORE.is_match(&r.score) {
            last_score = r.score.clone();
        }
        let score = last_score.clone();

        let points: i64 = if POINTS.is_match(&r.points) {
            r.points.trim_start_matches('+').parse().unwrap_or(0)
        } else {
            0
        };

        if !CLOCK.is_match(&r.time) {
            continue;
        }
        if !seen.insert((r.time.clone(), score.clone(), r.event.clone(), points)) {
            continue;
        }

        if PERIOD_START.is_match(&r.event) {
            quarter += 1;
        }

        events.push(PlayEvent {
            game_id: game_id.to_string(),
            quarter: quarter.max(1),
            time: r.time,
            city: r.city,
            is_home: r.is_home,
            score,
            event: r.event,
            points,
        });
    }
    Ok(events)
}

struct RawEvent {
    time: String,
    city: String,
    is_home: bool,
    score: String,
    event: String,
    points: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const PBP_PAGE: &str = r#"
        <table id="pbp">
          <thead>
            <tr><th colspan="6">1st Q</th></tr>
            <tr><th>Time</th><th>Golden State</th><th></th><th>Score</th><th></th><th>New Orleans</th></tr>
          </thead>
          <tbody>
            <tr><td>12:00.0</td><td colspan="5">Start of 1st quarter</td></tr>
            <tr><td>11:58.0</td><td colspan="5">Jump ball: Looney vs. Davis</td></tr>
            <tr><td>11:46.0</td><td>S. Curry makes 2-pt shot</td><td>+2</td><td>2-0</td><td></td><td></td></tr>
            <tr><td>11:30.0</td><td></td><td></td><td></td><td></td><td>A. Davis misses 3-pt shot</td></tr>
            <tr><td>11:12.0</td><td></td><td></td><td>2-3</td><td>+3</td><td>N. Mirotic makes 3-pt shot</td></tr>
            <tr class="thead"><th colspan="6">2nd Q</th></tr>
            <tr><td>12:00.0</td><td colspan="5">Start of 2nd quarter</td></tr>
            <tr><td>11:40.0</td><td>D. Green makes free throw</td><td>+1</td><td>3-3</td><td></td><td></td></tr>
          </tbody>
        </table>
    "#;

    fn events() -> Vec<PlayEvent> {
        parse_play_by_play(PBP_PAGE, "test", "201810310NOP").unwrap()
    }

    #[test]
    fn full_width_rows_are_stored_once() {
        let events = events();
        let starts: Vec<_> = events
            .iter()
            .filter(|e| e.event.starts_with("Start of"))
            .collect();
        assert_eq!(starts.len(), 2);
        // The away half precedes the home half, so collapsed rows keep
        // the away tag
        assert!(starts.iter().all(|e| !e.is_home));
    }

    #[test]
    fn score_is_forward_filled_and_seeded() {
        let events = events();
        assert_eq!(events[0].event, "Start of 1st quarter");
        assert_eq!(events[0].score, "0-0");
        let miss = events.iter().find(|e| e.event.contains("misses")).unwrap();
        assert_eq!(miss.score, "2-0");
        let make = events.iter().find(|e| e.event.contains("Mirotic")).unwrap();
        assert_eq!(make.score, "2-3");
    }

    #[test]
    fn non_scoring_events_have_zero_points() {
        let events = events();
        let miss = events.iter().find(|e| e.event.contains("misses")).unwrap();
        assert_eq!(miss.points, 0);
        let curry = events.iter().find(|e| e.event.contains("Curry")).unwrap();
        assert_eq!(curry.points, 2);
        assert!(!curry.is_home);
        assert_eq!(curry.city, "Golden State");
    }

    #[test]
    fn quarter_increments_on_period_markers() {
        let events = events();
        let first_half: Vec<_> = events.iter().take(5).map(|e| e.quarter).collect();
        assert_eq!(first_half, vec![1; 5]);
        let ft = events.iter().find(|e| e.event.contains("free throw")).unwrap();
        assert_eq!(ft.quarter, 2);
        // Quarter-break label rows carry no clock and are dropped
        assert!(events.iter().all(|e| e.event != "2nd Q"));
    }

    #[test]
    fn quarter_is_monotonic() {
        let events = events();
        for pair in events.windows(2) {
            assert!(pair[0].quarter <= pair[1].quarter);
        }
    }

    #[test]
    fn overtime_marker_extends_the_count() {
        let html = PBP_PAGE.replace("Start of 2nd quarter", "Start of 1st overtime");
        let events = parse_play_by_play(&html, "test", "x").unwrap();
        let ft = events.iter().find(|e| e.event.contains("free throw")).unwrap();
        assert_eq!(ft.quarter, 2);
        assert!(events.iter().any(|e| e.event == "Start of 1st overtime"));
    }

    #[test]
    fn missing_table_is_fatal() {
        assert!(parse_play_by_play("<html></html>", "test", "x").is_err());
    }
}
