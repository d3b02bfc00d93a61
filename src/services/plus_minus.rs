// src/services/plus_minus.rs

//! Substitution-level plus-minus scraping.
//!
//! The plus-minus page draws each player's game as a horizontal strip of
//! segments, one per stint. A segment's pixel width is proportional to time
//! on (or off) court and its text is the net point total for the stint;
//! segments with no text are still open and carry no score. Rescaling the
//! widths so they sum to the 48-minute clock recovers fractional sub-in and
//! sub-out boundaries.

use std::sync::LazyLock;

use deunicode::deunicode;
use regex::Regex;
use scraper::{ElementRef, Html};

use crate::error::{AppError, Result};
use crate::models::SubstitutionInterval;
use crate::services::client::PageSource;
use crate::services::table::{cell_text, parse_selector};

/// Regulation game-clock minutes the segment widths are rescaled to.
const GAME_MINUTES: f64 = 48.0;

static WIDTH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("static regex"));
static SIGNED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-+]?\d+").expect("static regex"));

/// Per-stint plus-minus intervals for every player in the given game.
pub fn get_plus_minus(source: &dyn PageSource, game_id: &str) -> Result<Vec<SubstitutionInterval>> {
    let path = format!("/boxscores/plus-minus/{game_id}.html");
    let html = source.fetch(&path)?;
    parse_plus_minus(&html, &path, game_id)
}

fn parse_plus_minus(html: &str, page: &str, game_id: &str) -> Result<Vec<SubstitutionInterval>> {
    let document = Html::parse_document(html);

    let player_sel = parse_selector("div.player")?;
    let span_sel = parse_selector("span")?;
    let strip_sel = parse_selector("div.player-plusminus")?;

    let players: Vec<String> = document
        .select(&player_sel)
        .map(|div| {
            div.select(&span_sel)
                .next()
                .map(|span| deunicode(cell_text(&span).trim()))
                .ok_or_else(|| AppError::parse(page, "player label without a name span"))
        })
        .collect::<Result<_>>()?;

    let strips: Vec<Vec<Segment>> = document
        .select(&strip_sel)
        .map(|strip| parse_strip(&strip, page))
        .collect::<Result<_>>()?;

    if players.is_empty() || players.len() != strips.len() {
        return Err(AppError::parse(
            page,
            format!(
                "{} player labels against {} plus-minus strips",
                players.len(),
                strips.len()
            ),
        ));
    }

    let mut intervals = Vec::new();
    for (player, segments) in players.into_iter().zip(strips) {
        let total: f64 = segments.iter().map(|s| s.width).sum();
        if total == 0.0 {
            continue;
        }
        let scale = GAME_MINUTES / total;

        let mut elapsed = 0.0;
        for segment in segments {
            let subin_minute = elapsed;
            elapsed += segment.width * scale;
            // Open segments have no recorded point total yet
            let Some(plus_minus) = segment.points else {
                continue;
            };
            intervals.push(SubstitutionInterval {
                game_id: game_id.to_string(),
                player: player.clone(),
                subin_minute,
                subout_minute: elapsed,
                plus_minus,
            });
        }
    }
    Ok(intervals)
}

/// One visual segment: proportional width and optional point total.
struct Segment {
    width: f64,
    points: Option<i64>,
}

/// Read the direct child divs of one player's strip.
fn parse_strip(strip: &ElementRef, page: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    for child in strip.children().filter_map(ElementRef::wrap) {
        if child.value().name() != "div" {
            continue;
        }
        let style = child.value().attr("style").unwrap_or("");
        let width = WIDTH
            .find(style)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .ok_or_else(|| {
                AppError::parse(page, format!("segment without a pixel width: '{style}'"))
            })?;
        let points = SIGNED
            .find(&cell_text(&child))
            .and_then(|m| m.as_str().parse::<i64>().ok());
        segments.push(Segment { width, points });
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLUS_MINUS_PAGE: &str = r#"
        <div class="plusminus">
          <div class="player"><span>Jrue Holiday</span></div>
          <div class="player-plusminus">
            <div style="width:200px;">+7</div>
            <div style="width:100px;"></div>
            <div style="width:100px;">-3</div>
          </div>
          <div class="player"><span>Nikola Mirotić</span></div>
          <div class="player-plusminus">
            <div style="width:300px;">+5</div>
          </div>
          <div class="player"><span>Garrett Temple</span></div>
          <div class="player-plusminus"></div>
        </div>
    "#;

    fn intervals() -> Vec<SubstitutionInterval> {
        parse_plus_minus(PLUS_MINUS_PAGE, "test", "201810210CLE").unwrap()
    }

    #[test]
    fn widths_rescale_to_the_game_clock() {
        let intervals = intervals();
        let holiday: Vec<_> = intervals.iter().filter(|i| i.player == "Jrue Holiday").collect();
        assert_eq!(holiday.len(), 2);
        assert!((holiday[0].subin_minute - 0.0).abs() < 1e-9);
        assert!((holiday[0].subout_minute - 24.0).abs() < 1e-9);
        // The open middle segment still advances the clock
        assert!((holiday[1].subin_minute - 36.0).abs() < 1e-9);
        assert!((holiday[1].subout_minute - 48.0).abs() < 1e-9);
    }

    #[test]
    fn open_segments_are_dropped() {
        let intervals = intervals();
        assert!(intervals.iter().all(|i| i.player != "Garrett Temple"));
        let holiday_points: Vec<_> = intervals
            .iter()
            .filter(|i| i.player == "Jrue Holiday")
            .map(|i| i.plus_minus)
            .collect();
        assert_eq!(holiday_points, vec![7, -3]);
    }

    #[test]
    fn single_stint_spans_the_whole_game() {
        let intervals = intervals();
        let mirotic = intervals.iter().find(|i| i.player == "Nikola Mirotic").unwrap();
        assert!((mirotic.subin_minute - 0.0).abs() < 1e-9);
        assert!((mirotic.subout_minute - GAME_MINUTES).abs() < 1e-9);
        assert_eq!(mirotic.plus_minus, 5);
        assert!((mirotic.duration() - GAME_MINUTES).abs() < 1e-9);
    }

    #[test]
    fn label_and_strip_counts_must_align() {
        let html = PLUS_MINUS_PAGE.replace(
            r#"<div class="player"><span>Garrett Temple</span></div>"#,
            "",
        );
        assert!(parse_plus_minus(&html, "test", "x").is_err());
    }
}
