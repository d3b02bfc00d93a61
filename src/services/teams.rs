// src/services/teams.rs

//! Season team list.
//!
//! The league summary page carries an advanced team-stats table (inside an
//! HTML comment) listing every franchise active that season by full name.

use scraper::Html;

use crate::error::{AppError, Result};
use crate::models::team_code;
use crate::services::client::PageSource;
use crate::services::table::extract_table;

/// Short codes of all teams active in the given season.
pub fn get_teams(source: &dyn PageSource, season: i32) -> Result<Vec<String>> {
    let path = format!("/leagues/NBA_{season}.html");
    let html = source.fetch(&path)?;
    parse_teams(&html, &path)
}

fn parse_teams(html: &str, page: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let table = extract_table(&document, "advanced-team", page)?;
    let team_col = table.column("Team", page)?;

    let mut codes = Vec::new();
    for row in &table.rows {
        let Some(cell) = row.get(team_col) else {
            continue;
        };
        // Playoff teams carry a trailing asterisk
        let full_name = cell.trim_end_matches('*');
        if full_name.is_empty() || full_name == "League Average" {
            continue;
        }
        let code = team_code(full_name)
            .ok_or_else(|| AppError::parse(page, format!("unknown team '{full_name}'")))?;
        codes.push(code.to_string());
    }
    Ok(codes)
}
