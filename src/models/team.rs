//! Team name resolution.
//!
//! The statistics site names teams in full on schedule and league pages but
//! keys boxscore tables and game identifiers by short code. The mapping is
//! static and covers historical franchises so past seasons resolve.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Full team name to short code, built once at process start.
static TEAM_CODES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("Atlanta Hawks", "ATL"),
        ("Boston Celtics", "BOS"),
        ("Brooklyn Nets", "BRK"),
        ("Charlotte Bobcats", "CHA"),
        ("Charlotte Hornets", "CHO"),
        ("Chicago Bulls", "CHI"),
        ("Cleveland Cavaliers", "CLE"),
        ("Dallas Mavericks", "DAL"),
        ("Denver Nuggets", "DEN"),
        ("Detroit Pistons", "DET"),
        ("Golden State Warriors", "GSW"),
        ("Houston Rockets", "HOU"),
        ("Indiana Pacers", "IND"),
        ("Los Angeles Clippers", "LAC"),
        ("Los Angeles Lakers", "LAL"),
        ("Memphis Grizzlies", "MEM"),
        ("Miami Heat", "MIA"),
        ("Milwaukee Bucks", "MIL"),
        ("Minnesota Timberwolves", "MIN"),
        ("New Jersey Nets", "NJN"),
        ("New Orleans Hornets", "NOH"),
        ("New Orleans Pelicans", "NOP"),
        ("New Orleans/Oklahoma City Hornets", "NOK"),
        ("New York Knicks", "NYK"),
        ("Oklahoma City Thunder", "OKC"),
        ("Orlando Magic", "ORL"),
        ("Philadelphia 76ers", "PHI"),
        ("Phoenix Suns", "PHO"),
        ("Portland Trail Blazers", "POR"),
        ("Sacramento Kings", "SAC"),
        ("San Antonio Spurs", "SAS"),
        ("Seattle SuperSonics", "SEA"),
        ("Toronto Raptors", "TOR"),
        ("Utah Jazz", "UTA"),
        ("Vancouver Grizzlies", "VAN"),
        ("Washington Wizards", "WAS"),
    ])
});

/// Resolve a full team name to its short code.
pub fn team_code(full_name: &str) -> Option<&'static str> {
    TEAM_CODES.get(full_name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_current_franchises() {
        assert_eq!(team_code("Golden State Warriors"), Some("GSW"));
        assert_eq!(team_code("New Orleans Pelicans"), Some("NOP"));
    }

    #[test]
    fn resolves_historical_franchises() {
        assert_eq!(team_code("Seattle SuperSonics"), Some("SEA"));
        assert_eq!(team_code("New Jersey Nets"), Some("NJN"));
    }

    #[test]
    fn unknown_name_is_none() {
        assert_eq!(team_code("Springfield Atoms"), None);
    }
}
