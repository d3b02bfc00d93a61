// src/services/boxscore.rs

//! Boxscore scraping.
//!
//! A boxscore page carries a line-score table naming the two sides plus four
//! stat tables (basic and advanced, one pair per side) whose DOM ids embed
//! the team codes recovered from the line score. Basic and advanced lines
//! are merged per player, and the line-score quarters land on the synthetic
//! team-totals row.

use std::collections::HashMap;

use deunicode::deunicode;
use scraper::Html;

use crate::error::{AppError, Result};
use crate::models::{BoxscoreRow, TEAM_TOTALS};
use crate::services::client::PageSource;
use crate::services::table::{Table, extract_table, parse_opt_f64};

/// Rows the source uses in place of numbers for absent players.
const SENTINELS: [&str; 4] = [
    "Did Not Play",
    "Did Not Dress",
    "Not With Team",
    "Player Suspended",
];

/// Player and team-level boxscore lines for the given game.
///
/// Team totals are listed under the player name `"All"`.
pub fn get_boxscore(source: &dyn PageSource, game_id: &str) -> Result<Vec<BoxscoreRow>> {
    let path = format!("/boxscores/{game_id}.html");
    let html = source.fetch(&path)?;
    parse_boxscore(&html, &path, game_id)
}

fn parse_boxscore(html: &str, page: &str, game_id: &str) -> Result<Vec<BoxscoreRow>> {
    let document = Html::parse_document(html);
    let (away, home) = parse_line_score(&document, page)?;

    let mut rows = parse_team(&document, page, game_id, &home, true)?;
    rows.extend(parse_team(&document, page, game_id, &away, false)?);
    Ok(rows)
}

/// One side of the line score: team code and quarter points.
struct LineScoreSide {
    code: String,
    quarters: [Option<f64>; 4],
}

/// Recover (away, home) team codes and per-quarter scoring.
///
/// The away side is listed first. Overtime columns beyond the fourth
/// quarter and the total are ignored.
fn parse_line_score(document: &Html, page: &str) -> Result<(LineScoreSide, LineScoreSide)> {
    let table = extract_table(document, "line_score", page)?;

    let mut sides = Vec::new();
    for row in table.rows.iter().filter(|r| !r.is_empty()) {
        let code = row[0].clone();
        let mut quarters = [None; 4];
        for (i, slot) in quarters.iter_mut().enumerate() {
            *slot = match row.get(i + 1) {
                Some(cell) => parse_opt_f64(cell, page)?,
                None => None,
            };
        }
        sides.push(LineScoreSide { code, quarters });
    }

    let mut sides = sides.into_iter();
    match (sides.next(), sides.next()) {
        (Some(away), Some(home)) => Ok((away, home)),
        _ => Err(AppError::parse(page, "line score lists fewer than two teams")),
    }
}

/// Parse and merge one side's basic and advanced tables.
fn parse_team(
    document: &Html,
    page: &str,
    game_id: &str,
    side: &LineScoreSide,
    is_home: bool,
) -> Result<Vec<BoxscoreRow>> {
    let basic = extract_table(document, &format!("box-{}-game-basic", side.code), page)?;
    let advanced = extract_table(document, &format!("box-{}-game-advanced", side.code), page)?;
    let advanced = parse_advanced(&advanced, page)?;

    let cols = BasicColumns::locate(&basic, page)?;
    let mut rows = Vec::new();
    let mut totals_seen = 0usize;

    for cells in &basic.rows {
        let Some(player) = normalize_player(cells.first().map(String::as_str).unwrap_or("")) else {
            continue;
        };
        if player == TEAM_TOTALS {
            totals_seen += 1;
        }

        let adv = advanced.get(&player).ok_or_else(|| {
            AppError::parse(page, format!("player '{player}' missing from advanced table"))
        })?;

        let cell = |idx: usize| cells.get(idx).map(String::as_str).unwrap_or("");
        let mut row = BoxscoreRow {
            game_id: game_id.to_string(),
            team: side.code.clone(),
            is_home,
            player,
            mp: parse_minutes(cell(cols.mp), page)?,
            fg: parse_stat(cell(cols.fg), page)?,
            fga: parse_stat(cell(cols.fga), page)?,
            fg_pct: parse_stat(cell(cols.fg_pct), page)?,
            fg3: parse_stat(cell(cols.fg3), page)?,
            fg3a: parse_stat(cell(cols.fg3a), page)?,
            fg3_pct: parse_stat(cell(cols.fg3_pct), page)?,
            ft: parse_stat(cell(cols.ft), page)?,
            fta: parse_stat(cell(cols.fta), page)?,
            ft_pct: parse_stat(cell(cols.ft_pct), page)?,
            orb: parse_stat(cell(cols.orb), page)?,
            drb: parse_stat(cell(cols.drb), page)?,
            trb: parse_stat(cell(cols.trb), page)?,
            ast: parse_stat(cell(cols.ast), page)?,
            stl: parse_stat(cell(cols.stl), page)?,
            blk: parse_stat(cell(cols.blk), page)?,
            tov: parse_stat(cell(cols.tov), page)?,
            pf: parse_stat(cell(cols.pf), page)?,
            pts: parse_stat(cell(cols.pts), page)?,
            plus_minus: parse_stat(cell(cols.plus_minus), page)?,
            ..BoxscoreRow::default()
        };

        row.ts_pct = adv.ts_pct;
        row.efg_pct = adv.efg_pct;
        row.fg3a_rate = adv.fg3a_rate;
        row.ft_rate = adv.ft_rate;
        row.orb_pct = adv.orb_pct;
        row.drb_pct = adv.drb_pct;
        row.trb_pct = adv.trb_pct;
        row.ast_pct = adv.ast_pct;
        row.stl_pct = adv.stl_pct;
        row.blk_pct = adv.blk_pct;
        row.tov_pct = adv.tov_pct;
        row.usg_pct = adv.usg_pct;
        row.ortg = adv.ortg;
        row.drtg = adv.drtg;
        row.bpm = adv.bpm;

        if row.is_team_totals() {
            [row.pts_q1, row.pts_q2, row.pts_q3, row.pts_q4] = side.quarters;
        }
        rows.push(row);
    }

    if totals_seen != 1 {
        return Err(AppError::parse(
            page,
            format!("expected one totals row for {}, found {totals_seen}", side.code),
        ));
    }
    Ok(rows)
}

/// Column indices within a basic stats table.
struct BasicColumns {
    mp: usize,
    fg: usize,
    fga: usize,
    fg_pct: usize,
    fg3: usize,
    fg3a: usize,
    fg3_pct: usize,
    ft: usize,
    fta: usize,
    ft_pct: usize,
    orb: usize,
    drb: usize,
    trb: usize,
    ast: usize,
    stl: usize,
    blk: usize,
    tov: usize,
    pf: usize,
    pts: usize,
    plus_minus: usize,
}

impl BasicColumns {
    fn locate(table: &Table, page: &str) -> Result<Self> {
        let col = |name: &str| table.column(name, page);
        Ok(Self {
            mp: col("MP")?,
            fg: col("FG")?,
            fga: col("FGA")?,
            fg_pct: col("FG%")?,
            fg3: col("3P")?,
            fg3a: col("3PA")?,
            fg3_pct: col("3P%")?,
            ft: col("FT")?,
            fta: col("FTA")?,
            ft_pct: col("FT%")?,
            orb: col("ORB")?,
            drb: col("DRB")?,
            trb: col("TRB")?,
            ast: col("AST")?,
            stl: col("STL")?,
            blk: col("BLK")?,
            tov: col("TOV")?,
            pf: col("PF")?,
            pts: col("PTS")?,
            plus_minus: col("+/-")?,
        })
    }
}

/// Advanced-line statistics keyed by player.
#[derive(Debug, Clone, Copy, Default)]
struct AdvancedLine {
    ts_pct: Option<f64>,
    efg_pct: Option<f64>,
    fg3a_rate: Option<f64>,
    ft_rate: Option<f64>,
    orb_pct: Option<f64>,
    drb_pct: Option<f64>,
    trb_pct: Option<f64>,
    ast_pct: Option<f64>,
    stl_pct: Option<f64>,
    blk_pct: Option<f64>,
    tov_pct: Option<f64>,
    usg_pct: Option<f64>,
    ortg: Option<f64>,
    drtg: Option<f64>,
    bpm: Option<f64>,
}

fn parse_advanced(table: &Table, page: &str) -> Result<HashMap<String, AdvancedLine>> {
    let col = |name: &str| table.column(name, page);
    let ts = col("TS%")?;
    let efg = col("eFG%")?;
    let fg3ar = col("3PAr")?;
    let ftr = col("FTr")?;
    let orbp = col("ORB%")?;
    let drbp = col("DRB%")?;
    let trbp = col("TRB%")?;
    let astp = col("AST%")?;
    let stlp = col("STL%")?;
    let blkp = col("BLK%")?;
    let tovp = col("TOV%")?;
    let usgp = col("USG%")?;
    let ortg = col("ORtg")?;
    let drtg = col("DRtg")?;
    // BPM is occasionally served with a blank header, or not at all; a
    // missing column yields all-absent values rather than a merge failure
    let bpm = table.column_opt("BPM").or_else(|| {
        let last = table.headers.len().checked_sub(1)?;
        (last > drtg && table.headers[last].is_empty()).then_some(last)
    });

    let mut lines = HashMap::new();
    for cells in &table.rows {
        let Some(player) = normalize_player(cells.first().map(String::as_str).unwrap_or("")) else {
            continue;
        };
        let cell = |idx: usize| cells.get(idx).map(String::as_str).unwrap_or("");
        let line = AdvancedLine {
            ts_pct: parse_stat(cell(ts), page)?,
            efg_pct: parse_stat(cell(efg), page)?,
            fg3a_rate: parse_stat(cell(fg3ar), page)?,
            ft_rate: parse_stat(cell(ftr), page)?,
            orb_pct: parse_stat(cell(orbp), page)?,
            drb_pct: parse_stat(cell(drbp), page)?,
            trb_pct: parse_stat(cell(trbp), page)?,
            ast_pct: parse_stat(cell(astp), page)?,
            stl_pct: parse_stat(cell(stlp), page)?,
            blk_pct: parse_stat(cell(blkp), page)?,
            tov_pct: parse_stat(cell(tovp), page)?,
            usg_pct: parse_stat(cell(usgp), page)?,
            ortg: parse_stat(cell(ortg), page)?,
            drtg: parse_stat(cell(drtg), page)?,
            bpm: match bpm {
                Some(idx) => parse_stat(cell(idx), page)?,
                None => None,
            },
        };
        lines.insert(player, line);
    }
    Ok(lines)
}

/// Normalize a player cell: strip diacritics, relabel team totals, drop
/// the "Reserves" header-repeat row and blank rows.
fn normalize_player(cell: &str) -> Option<String> {
    let name = deunicode(cell.trim());
    match name.as_str() {
        "" | "Reserves" => None,
        "Team Totals" => Some(TEAM_TOTALS.to_string()),
        _ => Some(name),
    }
}

/// Parse a stat cell; empty cells and absence sentinels are `None`.
fn parse_stat(cell: &str, page: &str) -> Result<Option<f64>> {
    let cell = cell.trim();
    if cell.is_empty() || SENTINELS.contains(&cell) {
        return Ok(None);
    }
    cell.parse()
        .map(Some)
        .map_err(|_| AppError::parse(page, format!("expected a number, got '{cell}'")))
}

/// Convert an "MM:SS" minutes string to fractional minutes.
///
/// Team-totals rows carry a bare minute count with no seconds part.
fn parse_minutes(cell: &str, page: &str) -> Result<Option<f64>> {
    let cell = cell.trim();
    if cell.is_empty() || SENTINELS.contains(&cell) {
        return Ok(None);
    }
    let (whole, seconds) = match cell.split_once(':') {
        Some((m, s)) => (m, Some(s)),
        None => (cell, None),
    };
    let whole: f64 = whole
        .parse()
        .map_err(|_| AppError::parse(page, format!("bad minutes '{cell}'")))?;
    let partial = match seconds {
        Some(s) => {
            let s: f64 = s
                .parse()
                .map_err(|_| AppError::parse(page, format!("bad minutes '{cell}'")))?;
            s / 60.0
        }
        None => 0.0,
    };
    Ok(Some(whole + partial))
}
