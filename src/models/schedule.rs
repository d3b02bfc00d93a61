//! Schedule record structure.

use chrono::NaiveDateTime;

/// One game on a team's season schedule.
///
/// Created when a team's schedule is synced and never updated afterwards,
/// except through the full re-pull of the latest stored season. Outcome,
/// scores, standings, and streak are absent for games not yet played.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleRow {
    /// Canonical game identifier: `<YYYYMMDD>0<home team code>`
    pub game_id: String,

    /// Season, labeled by its ending year
    pub season: i32,

    /// Game number within the team's season (1-82)
    pub game_number: i64,

    /// Scheduled tip-off, local to the venue's listed time
    pub datetime: NaiveDateTime,

    /// Whether `team` is the home side
    pub is_home: bool,

    /// Short code of the team whose schedule this row came from
    pub team: String,

    /// Short code of the opponent
    pub opponent: String,

    /// "W" or "L" once the game is final
    pub outcome: Option<String>,

    /// Points scored by `team`
    pub team_points: Option<i64>,

    /// Points scored by `opponent`
    pub opponent_points: Option<i64>,

    /// Wins entering the next game
    pub cumulative_wins: Option<i64>,

    /// Losses entering the next game
    pub cumulative_losses: Option<i64>,

    /// Signed run of results: positive wins, negative losses
    pub streak: Option<i64>,
}

impl ScheduleRow {
    /// Short code of the home side, whichever column it lives in.
    pub fn home_team(&self) -> &str {
        if self.is_home { &self.team } else { &self.opponent }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_row(is_home: bool) -> ScheduleRow {
        ScheduleRow {
            game_id: "201810170NOP".to_string(),
            season: 2019,
            game_number: 1,
            datetime: NaiveDate::from_ymd_opt(2018, 10, 17)
                .unwrap()
                .and_hms_opt(20, 0, 0)
                .unwrap(),
            is_home,
            team: "NOP".to_string(),
            opponent: "HOU".to_string(),
            outcome: Some("W".to_string()),
            team_points: Some(131),
            opponent_points: Some(112),
            cumulative_wins: Some(1),
            cumulative_losses: Some(0),
            streak: Some(1),
        }
    }

    #[test]
    fn home_team_follows_flag() {
        assert_eq!(sample_row(true).home_team(), "NOP");
        assert_eq!(sample_row(false).home_team(), "HOU");
    }
}
