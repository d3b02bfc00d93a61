// src/services/client.rs

//! Page fetching.
//!
//! One blocking GET per logical page. The source site serves several of its
//! statistical tables inside HTML comments to defeat naive scrapers, so the
//! comment delimiters are stripped from every fetched page before parsing.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::blocking::Client;
use url::Url;

use crate::error::Result;
use crate::models::HttpConfig;

static COMMENT_DELIMITERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!--|-->").expect("static regex"));

/// Source of page markup, keyed by site-relative path.
///
/// The production implementation is [`HttpClient`]; tests substitute a
/// canned-markup source so parsers and the sync driver run offline.
pub trait PageSource {
    /// Fetch the page at `path` and return its markup with HTML-comment
    /// delimiters removed.
    fn fetch(&self, path: &str) -> Result<String>;
}

/// Blocking HTTP client bound to the configured base URL.
pub struct HttpClient {
    client: Client,
    base_url: Url,
}

impl HttpClient {
    /// Create a configured HTTP client.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let base_url = Url::parse(&config.base_url)?;
        Ok(Self { client, base_url })
    }
}

impl PageSource for HttpClient {
    fn fetch(&self, path: &str) -> Result<String> {
        let url = self.base_url.join(path)?;
        log::debug!("GET {}", url);
        let text = self
            .client
            .get(url)
            .send()?
            .error_for_status()?
            .text()?;
        Ok(strip_comments(&text))
    }
}

/// Remove HTML-comment delimiters, exposing tables served inside comments.
pub fn strip_comments(html: &str) -> String {
    COMMENT_DELIMITERS.replace_all(html, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_comments_exposes_hidden_table() {
        let html = "<div><!--<table id=\"games\"></table>--></div>";
        assert_eq!(
            strip_comments(html),
            "<div><table id=\"games\"></table></div>"
        );
    }

    #[test]
    fn strip_comments_leaves_plain_markup_alone() {
        let html = "<p>no comments here</p>";
        assert_eq!(strip_comments(html), html);
    }

    #[test]
    fn strip_comments_spans_lines() {
        let html = "<!--\n<table>\n</table>\n-->";
        assert_eq!(strip_comments(html), "\n<table>\n</table>\n");
    }
}
