// src/services/schedule.rs

//! Season schedule scraping.
//!
//! The schedule table interleaves labeled columns (game number, date, tip
//! time, opponent, scores, standings, streak) with unlabeled decorative
//! ones; the home/away indicator sits unlabeled just before the opponent
//! and the outcome just after it.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use scraper::Html;

use crate::error::{AppError, Result};
use crate::models::{ScheduleRow, team_code};
use crate::services::client::PageSource;
use crate::services::table::{Table, extract_table, parse_opt_i64};

/// Full schedule of the given team and season.
pub fn get_schedule(source: &dyn PageSource, team: &str, season: i32) -> Result<Vec<ScheduleRow>> {
    let path = format!("/teams/{team}/{season}_games.html");
    let html = source.fetch(&path)?;
    parse_schedule(&html, &path, team, season)
}

fn parse_schedule(html: &str, page: &str, team: &str, season: i32) -> Result<Vec<ScheduleRow>> {
    let document = Html::parse_document(html);
    let table = extract_table(&document, "games", page)?;
    let cols = ScheduleColumns::locate(&table, page)?;

    let mut rows = Vec::new();
    for cells in &table.rows {
        if cells.len() < table.headers.len() {
            continue;
        }
        let game_number = cells[cols.game_number].as_str();
        // Header-repeat rows re-print the column labels mid-table
        if game_number == "G" || game_number.is_empty() {
            continue;
        }
        rows.push(parse_row(cells, &cols, page, team, season)?);
    }
    Ok(rows)
}

fn parse_row(
    cells: &[String],
    cols: &ScheduleColumns,
    page: &str,
    team: &str,
    season: i32,
) -> Result<ScheduleRow> {
    let game_number: i64 = cells[cols.game_number]
        .parse()
        .map_err(|_| AppError::parse(page, format!("bad game number '{}'", cells[cols.game_number])))?;

    let datetime = parse_datetime(&cells[cols.date], &cells[cols.time], page)?;

    let is_home = match cells[cols.is_home].as_str() {
        "" => true,
        "@" => false,
        other => {
            return Err(AppError::parse(page, format!("bad venue indicator '{other}'")));
        }
    };

    let opponent_name = &cells[cols.opponent];
    let opponent = team_code(opponent_name)
        .ok_or_else(|| AppError::parse(page, format!("unknown opponent '{opponent_name}'")))?
        .to_string();

    let outcome = match cells[cols.outcome].as_str() {
        "" => None,
        o @ ("W" | "L") => Some(o.to_string()),
        other => return Err(AppError::parse(page, format!("bad outcome '{other}'"))),
    };

    let home_code = if is_home { team } else { opponent.as_str() };
    let game_id = format!("{}0{home_code}", datetime.date().format("%Y%m%d"));

    Ok(ScheduleRow {
        game_id,
        season,
        game_number,
        datetime,
        is_home,
        team: team.to_string(),
        opponent,
        outcome,
        team_points: parse_opt_i64(&cells[cols.team_points], page)?,
        opponent_points: parse_opt_i64(&cells[cols.opponent_points], page)?,
        cumulative_wins: parse_opt_i64(&cells[cols.wins], page)?,
        cumulative_losses: parse_opt_i64(&cells[cols.losses], page)?,
        streak: parse_streak(&cells[cols.streak], page)?,
    })
}

/// Combine the "Day, Mon D, YYYY" date and "H:MMp" 12-hour time columns.
fn parse_datetime(date: &str, time: &str, page: &str) -> Result<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(date, "%a, %b %e, %Y")
        .map_err(|e| AppError::parse(page, format!("bad date '{date}': {e}")))?;
    let time = format!("{}m", time).to_uppercase();
    let time = NaiveTime::parse_from_str(&time, "%I:%M%p")
        .map_err(|e| AppError::parse(page, format!("bad time '{time}': {e}")))?;
    Ok(date.and_time(time))
}

/// Convert "W 3" / "L 2" into a signed run; blank for unplayed games.
fn parse_streak(cell: &str, page: &str) -> Result<Option<i64>> {
    if cell.is_empty() {
        return Ok(None);
    }
    let signed = match cell.split_once(' ') {
        Some(("W", n)) => n.parse::<i64>().ok(),
        Some(("L", n)) => n.parse::<i64>().ok().map(|v| -v),
        _ => None,
    };
    signed
        .map(Some)
        .ok_or_else(|| AppError::parse(page, format!("bad streak '{cell}'")))
}

/// Column indices within the schedule table.
struct ScheduleColumns {
    game_number: usize,
    date: usize,
    time: usize,
    is_home: usize,
    opponent: usize,
    outcome: usize,
    team_points: usize,
    opponent_points: usize,
    wins: usize,
    losses: usize,
    streak: usize,
}

impl ScheduleColumns {
    fn locate(table: &Table, page: &str) -> Result<Self> {
        let opponent = table.column("Opponent", page)?;
        if opponent == 0 {
            return Err(AppError::parse(page, "opponent column has no neighbors"));
        }
        Ok(Self {
            game_number: table.column("G", page)?,
            date: table.column("Date", page)?,
            time: table.column("Start (ET)", page)?,
            // The venue indicator and outcome columns are unlabeled,
            // flanking the opponent
            is_home: opponent - 1,
            opponent,
            outcome: opponent + 1,
            team_points: table.column("Tm", page)?,
            opponent_points: table.column("Opp", page)?,
            wins: table.column("W", page)?,
            losses: table.column("L", page)?,
            streak: table.column("Streak", page)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEDULE_PAGE: &str = r#"
        <table id="games">
          <thead>
            <tr><th>G</th><th>Date</th><th>Start (ET)</th><th></th><th></th><th></th>
                <th>Opponent</th><th></th><th></th><th>Tm</th><th>Opp</th>
                <th>W</th><th>L</th><th>Streak</th><th>Notes</th></tr>
          </thead>
          <tbody>
            <tr><th>1</th><td>Wed, Oct 18, 2017</td><td>8:00p</td><td>Box Score</td><td></td>
                <td></td><td>Golden State Warriors</td><td>L</td><td></td><td>116</td><td>122</td>
                <td>0</td><td>1</td><td>L 1</td><td></td></tr>
            <tr><th>2</th><td>Fri, Oct 20, 2017</td><td>9:30p</td><td>Box Score</td><td></td>
                <td>@</td><td>Los Angeles Lakers</td><td>W</td><td></td><td>119</td><td>112</td>
                <td>1</td><td>1</td><td>W 1</td><td></td></tr>
            <tr class="thead"><th>G</th><td>Date</td><td>Start (ET)</td><td></td><td></td>
                <td></td><td>Opponent</td><td></td><td></td><td>Tm</td><td>Opp</td>
                <td>W</td><td>L</td><td>Streak</td><td></td></tr>
            <tr><th>3</th><td>Sun, Oct 22, 2017</td><td>7:00p</td><td></td><td></td>
                <td></td><td>Boston Celtics</td><td></td><td></td><td></td><td></td>
                <td></td><td></td><td></td><td></td></tr>
          </tbody>
        </table>
    "#;

    fn rows() -> Vec<ScheduleRow> {
        parse_schedule(SCHEDULE_PAGE, "test", "NOP", 2018).unwrap()
    }

    #[test]
    fn skips_header_repeat_rows() {
        assert_eq!(rows().len(), 3);
    }

    #[test]
    fn home_game_derives_own_code_in_game_id() {
        let row = &rows()[0];
        assert!(row.is_home);
        assert_eq!(row.game_id, "201710180NOP");
        assert_eq!(row.opponent, "GSW");
        assert_eq!(row.streak, Some(-1));
        assert_eq!(row.outcome.as_deref(), Some("L"));
    }

    #[test]
    fn away_game_derives_opponent_code_in_game_id() {
        let row = &rows()[1];
        assert!(!row.is_home);
        assert_eq!(row.game_id, "201710200LAL");
        assert_eq!(row.streak, Some(1));
        assert_eq!(row.team_points, Some(119));
    }

    #[test]
    fn datetime_combines_date_and_twelve_hour_time() {
        let row = &rows()[0];
        assert_eq!(
            row.datetime,
            NaiveDate::from_ymd_opt(2017, 10, 18)
                .unwrap()
                .and_hms_opt(20, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn unplayed_game_has_no_result_fields() {
        let row = &rows()[2];
        assert_eq!(row.outcome, None);
        assert_eq!(row.team_points, None);
        assert_eq!(row.streak, None);
        assert_eq!(row.game_number, 3);
    }

    #[test]
    fn is_home_matches_game_id_suffix() {
        for row in rows() {
            assert_eq!(row.is_home, row.game_id.ends_with(&row.team));
        }
    }
}
