// src/storage/cache.rs

//! SQLite-backed statistics cache.
//!
//! A single-file database with four append-only tables, keyed by the
//! natural game and team identifiers. The schedule table additionally
//! enforces UNIQUE(game_id, team) so a season re-pull cannot double-insert
//! a game. Each append call is one transaction; there is a single writer
//! per sync run.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use rusqlite::{Connection, params};

use crate::error::Result;
use crate::models::{BoxscoreRow, PlayEvent, ScheduleRow, SubstitutionInterval};

/// The four cached tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatTable {
    Schedule,
    Boxscore,
    PlusMinus,
    PlayByPlay,
}

impl StatTable {
    /// All tables, in sync order.
    pub const ALL: [StatTable; 4] = [
        StatTable::Schedule,
        StatTable::Boxscore,
        StatTable::PlusMinus,
        StatTable::PlayByPlay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatTable::Schedule => "schedule",
            StatTable::Boxscore => "boxscore",
            StatTable::PlusMinus => "plus_minus",
            StatTable::PlayByPlay => "play_by_play",
        }
    }
}

/// The statistics cache.
pub struct StatCache {
    conn: Connection,
}

impl StatCache {
    /// Open (or create) the cache at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::init(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory cache.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(&conn)?;
        Ok(Self { conn })
    }

    fn init(conn: &Connection) -> rusqlite::Result<()> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS schedule (
                game_id TEXT NOT NULL,
                season INTEGER NOT NULL,
                game_number INTEGER NOT NULL,
                datetime TEXT NOT NULL,
                is_home INTEGER NOT NULL,
                team TEXT NOT NULL,
                opponent TEXT NOT NULL,
                outcome TEXT,
                team_points INTEGER,
                opponent_points INTEGER,
                cumulative_wins INTEGER,
                cumulative_losses INTEGER,
                streak INTEGER,
                UNIQUE(game_id, team)
            )
            "#,
            [],
        )?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS boxscore (
                game_id TEXT NOT NULL,
                team TEXT NOT NULL,
                is_home INTEGER NOT NULL,
                player TEXT NOT NULL,
                mp REAL,
                fg REAL,
                fga REAL,
                fg_perc REAL,
                "3p" REAL,
                "3pa" REAL,
                "3p_perc" REAL,
                ft REAL,
                fta REAL,
                ft_perc REAL,
                orb REAL,
                drb REAL,
                trb REAL,
                ast REAL,
                stl REAL,
                blk REAL,
                tov REAL,
                pf REAL,
                pts REAL,
                plus_minus REAL,
                ts_perc REAL,
                efg_perc REAL,
                "3par" REAL,
                ftr REAL,
                orb_perc REAL,
                drb_perc REAL,
                trb_perc REAL,
                ast_perc REAL,
                stl_perc REAL,
                blk_perc REAL,
                tov_perc REAL,
                usg_perc REAL,
                ortg REAL,
                drtg REAL,
                bpm REAL,
                pts_q1 REAL,
                pts_q2 REAL,
                pts_q3 REAL,
                pts_q4 REAL
            )
            "#,
            [],
        )?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS plus_minus (
                game_id TEXT NOT NULL,
                player TEXT NOT NULL,
                subin_minute REAL NOT NULL,
                subout_minute REAL NOT NULL,
                plus_minus INTEGER NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS play_by_play (
                game_id TEXT NOT NULL,
                quarter INTEGER NOT NULL,
                time TEXT NOT NULL,
                city TEXT NOT NULL,
                is_home INTEGER NOT NULL,
                score TEXT NOT NULL,
                event TEXT NOT NULL,
                points INTEGER NOT NULL
            )
            "#,
            [],
        )?;

        Ok(())
    }

    /// Latest season with any schedule rows.
    pub fn latest_season(&self) -> Result<Option<i32>> {
        let season = self
            .conn
            .query_row("SELECT MAX(season) FROM schedule", [], |row| row.get(0))?;
        Ok(season)
    }

    /// Drop all schedule rows of the given season. Returns rows removed.
    pub fn delete_schedule_season(&self, season: i32) -> Result<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM schedule WHERE season = ?1", params![season])?;
        Ok(removed)
    }

    /// Game ids with a recorded outcome, deduplicated.
    pub fn completed_game_ids(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT game_id FROM schedule WHERE outcome IS NOT NULL ORDER BY game_id",
        )?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(ids)
    }

    /// Distinct game ids already persisted in the given table.
    pub fn recorded_game_ids(&self, table: StatTable) -> Result<HashSet<String>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT DISTINCT game_id FROM {}", table.as_str()))?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<HashSet<String>>>()?;
        Ok(ids)
    }

    /// Total rows in the given table.
    pub fn row_count(&self, table: StatTable) -> Result<i64> {
        let count = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", table.as_str()),
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Append schedule rows in one transaction.
    pub fn append_schedule(&mut self, rows: &[ScheduleRow]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO schedule (
                    game_id, season, game_number, datetime, is_home, team,
                    opponent, outcome, team_points, opponent_points,
                    cumulative_wins, cumulative_losses, streak
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
                "#,
            )?;
            for row in rows {
                stmt.execute(params![
                    row.game_id,
                    row.season,
                    row.game_number,
                    row.datetime,
                    row.is_home,
                    row.team,
                    row.opponent,
                    row.outcome,
                    row.team_points,
                    row.opponent_points,
                    row.cumulative_wins,
                    row.cumulative_losses,
                    row.streak,
                ])?;
            }
        }
        tx.commit()?;
        Ok(rows.len())
    }

    /// Append boxscore rows in one transaction.
    pub fn append_boxscore(&mut self, rows: &[BoxscoreRow]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO boxscore (
                    game_id, team, is_home, player, mp, fg, fga, fg_perc,
                    "3p", "3pa", "3p_perc", ft, fta, ft_perc, orb, drb, trb,
                    ast, stl, blk, tov, pf, pts, plus_minus, ts_perc,
                    efg_perc, "3par", ftr, orb_perc, drb_perc, trb_perc,
                    ast_perc, stl_perc, blk_perc, tov_perc, usg_perc, ortg,
                    drtg, bpm, pts_q1, pts_q2, pts_q3, pts_q4
                ) VALUES (
                    ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                    ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24,
                    ?25, ?26, ?27, ?28, ?29, ?30, ?31, ?32, ?33, ?34, ?35,
                    ?36, ?37, ?38, ?39, ?40, ?41, ?42, ?43
                )
                "#,
            )?;
            for row in rows {
                stmt.execute(params![
                    row.game_id,
                    row.team,
                    row.is_home,
                    row.player,
                    row.mp,
                    row.fg,
                    row.fga,
                    row.fg_pct,
                    row.fg3,
                    row.fg3a,
                    row.fg3_pct,
                    row.ft,
                    row.fta,
                    row.ft_pct,
                    row.orb,
                    row.drb,
                    row.trb,
                    row.ast,
                    row.stl,
                    row.blk,
                    row.tov,
                    row.pf,
                    row.pts,
                    row.plus_minus,
                    row.ts_pct,
                    row.efg_pct,
                    row.fg3a_rate,
                    row.ft_rate,
                    row.orb_pct,
                    row.drb_pct,
                    row.trb_pct,
                    row.ast_pct,
                    row.stl_pct,
                    row.blk_pct,
                    row.tov_pct,
                    row.usg_pct,
                    row.ortg,
                    row.drtg,
                    row.bpm,
                    row.pts_q1,
                    row.pts_q2,
                    row.pts_q3,
                    row.pts_q4,
                ])?;
            }
        }
        tx.commit()?;
        Ok(rows.len())
    }

    /// Append substitution intervals in one transaction.
    pub fn append_plus_minus(&mut self, rows: &[SubstitutionInterval]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO plus_minus (
                    game_id, player, subin_minute, subout_minute, plus_minus
                ) VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )?;
            for row in rows {
                stmt.execute(params![
                    row.game_id,
                    row.player,
                    row.subin_minute,
                    row.subout_minute,
                    row.plus_minus,
                ])?;
            }
        }
        tx.commit()?;
        Ok(rows.len())
    }

    /// Append play-by-play events in one transaction.
    pub fn append_play_by_play(&mut self, rows: &[PlayEvent]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO play_by_play (
                    game_id, quarter, time, city, is_home, score, event, points
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )?;
            for row in rows {
                stmt.execute(params![
                    row.game_id,
                    row.quarter,
                    row.time,
                    row.city,
                    row.is_home,
                    row.score,
                    row.event,
                    row.points,
                ])?;
            }
        }
        tx.commit()?;
        Ok(rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn schedule_row(game_id: &str, team: &str, season: i32, outcome: Option<&str>) -> ScheduleRow {
        ScheduleRow {
            game_id: game_id.to_string(),
            season,
            game_number: 1,
            datetime: NaiveDate::from_ymd_opt(2018, 10, 17)
                .unwrap()
                .and_hms_opt(20, 0, 0)
                .unwrap(),
            is_home: true,
            team: team.to_string(),
            opponent: "HOU".to_string(),
            outcome: outcome.map(str::to_string),
            team_points: outcome.map(|_| 110),
            opponent_points: outcome.map(|_| 100),
            cumulative_wins: outcome.map(|_| 1),
            cumulative_losses: outcome.map(|_| 0),
            streak: outcome.map(|_| 1),
        }
    }

    #[test]
    fn open_creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/dir/nba.db");
        let cache = StatCache::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cache.row_count(StatTable::Schedule).unwrap(), 0);
    }

    #[test]
    fn schedule_round_trip_and_latest_season() {
        let mut cache = StatCache::open_in_memory().unwrap();
        assert_eq!(cache.latest_season().unwrap(), None);

        cache
            .append_schedule(&[
                schedule_row("201710170NOP", "NOP", 2018, Some("W")),
                schedule_row("201810170NOP", "NOP", 2019, None),
            ])
            .unwrap();

        assert_eq!(cache.latest_season().unwrap(), Some(2019));
        assert_eq!(cache.row_count(StatTable::Schedule).unwrap(), 2);
    }

    #[test]
    fn completed_games_require_an_outcome() {
        let mut cache = StatCache::open_in_memory().unwrap();
        cache
            .append_schedule(&[
                schedule_row("201710170NOP", "NOP", 2018, Some("W")),
                schedule_row("201810170NOP", "NOP", 2019, None),
            ])
            .unwrap();

        assert_eq!(cache.completed_game_ids().unwrap(), vec!["201710170NOP"]);
    }

    #[test]
    fn duplicate_schedule_entry_is_rejected() {
        let mut cache = StatCache::open_in_memory().unwrap();
        cache
            .append_schedule(&[schedule_row("201710170NOP", "NOP", 2018, Some("W"))])
            .unwrap();
        let err = cache.append_schedule(&[schedule_row("201710170NOP", "NOP", 2018, Some("W"))]);
        assert!(err.is_err());
    }

    #[test]
    fn same_game_different_team_is_allowed() {
        let mut cache = StatCache::open_in_memory().unwrap();
        cache
            .append_schedule(&[
                schedule_row("201710170NOP", "NOP", 2018, Some("W")),
                schedule_row("201710170NOP", "HOU", 2018, Some("L")),
            ])
            .unwrap();
        assert_eq!(cache.row_count(StatTable::Schedule).unwrap(), 2);
    }

    #[test]
    fn delete_schedule_season_removes_only_that_season() {
        let mut cache = StatCache::open_in_memory().unwrap();
        cache
            .append_schedule(&[
                schedule_row("201710170NOP", "NOP", 2018, Some("W")),
                schedule_row("201810170NOP", "NOP", 2019, Some("W")),
            ])
            .unwrap();

        assert_eq!(cache.delete_schedule_season(2019).unwrap(), 1);
        assert_eq!(cache.latest_season().unwrap(), Some(2018));
    }

    #[test]
    fn recorded_game_ids_per_table() {
        let mut cache = StatCache::open_in_memory().unwrap();
        cache
            .append_plus_minus(&[SubstitutionInterval {
                game_id: "201710170NOP".to_string(),
                player: "Jrue Holiday".to_string(),
                subin_minute: 0.0,
                subout_minute: 24.0,
                plus_minus: 7,
            }])
            .unwrap();

        let recorded = cache.recorded_game_ids(StatTable::PlusMinus).unwrap();
        assert!(recorded.contains("201710170NOP"));
        assert!(cache.recorded_game_ids(StatTable::Boxscore).unwrap().is_empty());
    }

    #[test]
    fn boxscore_rows_persist_missing_values() {
        let mut cache = StatCache::open_in_memory().unwrap();
        let row = BoxscoreRow {
            game_id: "201710170NOP".to_string(),
            team: "NOP".to_string(),
            is_home: true,
            player: "Omer Asik".to_string(),
            ..BoxscoreRow::default()
        };
        cache.append_boxscore(&[row]).unwrap();

        let mp: Option<f64> = cache
            .conn
            .query_row("SELECT mp FROM boxscore", [], |r| r.get(0))
            .unwrap();
        assert_eq!(mp, None);
        assert_eq!(cache.row_count(StatTable::Boxscore).unwrap(), 1);
    }

    #[test]
    fn play_by_play_round_trip() {
        let mut cache = StatCache::open_in_memory().unwrap();
        cache
            .append_play_by_play(&[PlayEvent {
                game_id: "201710170NOP".to_string(),
                quarter: 1,
                time: "11:46.0".to_string(),
                city: "Golden State".to_string(),
                is_home: false,
                score: "2-0".to_string(),
                event: "S. Curry makes 2-pt shot".to_string(),
                points: 2,
            }])
            .unwrap();

        let (score, points): (String, i64) = cache
            .conn
            .query_row("SELECT score, points FROM play_by_play", [], |r| {
                Ok((r.get(0)?, r.get(1)?))
            })
            .unwrap();
        assert_eq!(score, "2-0");
        assert_eq!(points, 2);
    }
}
