//! Box score index parser for sports-reference.com.
//!
//! Each game on the index page is a `div.game_summary.nohover` block holding
//! a small table. The table links, in document order, are:
//!
//! 0. away team school page (`/cfb/schools/<team>/<year>.html`)
//! 1. box score page
//! 2. home team school page
//!
//! Team identifiers are the fourth `/`-separated segment of a school link.
//! If the site layout changes, the constants below are the only place to fix.

use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::types::Matchup;

/// Position of the away team link in a game block
pub const AWAY_LINK_INDEX: usize = 0;

/// Position of the home team link in a game block
pub const HOME_LINK_INDEX: usize = 2;

/// Index of the team identifier in `href.split('/')`
pub const TEAM_SEGMENT_INDEX: usize = 3;

const GAME_SELECTOR: &str = "div.game_summary.nohover";
const TABLE_SELECTOR: &str = "table";
const LINK_SELECTOR: &str = "a";

/// Parser for box score index pages
pub struct ScheduleParser;

impl ScheduleParser {
    /// Parse the week's matchups, in page order.
    ///
    /// Malformed game blocks are skipped.
    pub fn parse(html: &str) -> Result<Vec<Matchup>> {
        let document = Html::parse_document(html);

        let game_selector = Self::selector(GAME_SELECTOR)?;
        let table_selector = Self::selector(TABLE_SELECTOR)?;
        let link_selector = Self::selector(LINK_SELECTOR)?;

        let mut matchups = Vec::new();
        let mut skipped = 0usize;

        for (i, block) in document.select(&game_selector).enumerate() {
            match Self::parse_game_block(&block, &table_selector, &link_selector) {
                Some(matchup) => {
                    debug!("Game {}: {}", i, matchup);
                    matchups.push(matchup);
                }
                None => {
                    warn!("Skipping malformed game block {}", i);
                    skipped += 1;
                }
            }
        }

        debug!("Parsed {} games ({} skipped)", matchups.len(), skipped);

        Ok(matchups)
    }

    fn selector(css: &str) -> Result<Selector> {
        Selector::parse(css).map_err(|e| anyhow!("Invalid selector {:?}: {}", css, e))
    }

    fn parse_game_block(
        block: &ElementRef,
        table_selector: &Selector,
        link_selector: &Selector,
    ) -> Option<Matchup> {
        let table = block.select(table_selector).next()?;

        // Every link in the table must carry a team segment, not only the two we use
        let team_ids: Vec<&str> = table
            .select(link_selector)
            .map(|link| link.value().attr("href").and_then(Self::team_id_from_href))
            .collect::<Option<_>>()?;

        let home = team_ids.get(HOME_LINK_INDEX)?;
        let away = team_ids.get(AWAY_LINK_INDEX)?;

        Some(Matchup::new(*home, *away))
    }

    /// Extract the team identifier from a school link.
    fn team_id_from_href(href: &str) -> Option<&str> {
        href.split('/')
            .nth(TEAM_SEGMENT_INDEX)
            .filter(|segment| !segment.is_empty())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const SAMPLE_HTML: &str = r#"<!DOCTYPE html>
<html>
<body>
<div class="game_summaries">
  <div class="game_summary nohover">
    <table class="teams">
      <tbody>
        <tr class="loser"><td><a href="/cfb/schools/auburn/2024.html">Auburn</a></td><td class="right">14</td>
          <td class="right gamelink"><a href="/cfb/boxscores/2024-11-30-alabama.html">Final</a></td></tr>
        <tr class="winner"><td><a href="/cfb/schools/alabama/2024.html">Alabama</a></td><td class="right">28</td><td></td></tr>
      </tbody>
    </table>
  </div>
  <div class="game_summary nohover">
    <table class="teams">
      <tbody>
        <tr><td>Auburn</td><td class="right">14</td></tr>
        <tr><td>Alabama</td><td class="right">28</td></tr>
      </tbody>
    </table>
  </div>
  <div class="game_summary nohover">
    <table class="teams">
      <tbody>
        <tr class="winner"><td><a href="/cfb/schools/michigan/2024.html">Michigan</a></td><td class="right">13</td>
          <td class="right gamelink"><a href="/cfb/boxscores/2024-11-30-ohio-state.html">Final</a></td></tr>
        <tr class="loser"><td><a href="/cfb/schools/ohio-state/2024.html">Ohio State</a></td><td class="right">10</td><td></td></tr>
      </tbody>
    </table>
  </div>
</div>
</body>
</html>"#;

    #[test]
    fn test_parse_skips_malformed_block() {
        let matchups = ScheduleParser::parse(SAMPLE_HTML).unwrap();

        assert_eq!(matchups.len(), 2);
        assert_eq!(matchups[0], Matchup::new("alabama", "auburn"));
        assert_eq!(matchups[1], Matchup::new("ohio-state", "michigan"));
    }

    #[test]
    fn test_parse_empty_page() {
        let matchups = ScheduleParser::parse("<html><body></body></html>").unwrap();
        assert!(matchups.is_empty());
    }

    #[test]
    fn test_block_without_table_is_skipped() {
        let html = r#"<div class="game_summary nohover"><p>Postponed</p></div>"#;
        assert!(ScheduleParser::parse(html).unwrap().is_empty());
    }

    #[test]
    fn test_link_without_href_is_skipped() {
        let html = r#"<div class="game_summary nohover"><table>
            <tr><td><a href="/cfb/schools/navy/2024.html">Navy</a></td><td><a>Preview</a></td></tr>
            <tr><td><a href="/cfb/schools/army/2024.html">Army</a></td></tr>
        </table></div>"#;
        assert!(ScheduleParser::parse(html).unwrap().is_empty());
    }

    #[test]
    fn test_other_summary_classes_ignored() {
        let html = r#"<div class="game_summary"><table>
            <tr><td><a href="/cfb/schools/navy/2024.html">Navy</a></td>
                <td><a href="/cfb/boxscores/2024-12-14-army.html">Final</a></td></tr>
            <tr><td><a href="/cfb/schools/army/2024.html">Army</a></td></tr>
        </table></div>"#;
        assert!(ScheduleParser::parse(html).unwrap().is_empty());
    }

    #[test]
    fn test_team_id_from_href() {
        assert_eq!(
            ScheduleParser::team_id_from_href("/cfb/schools/texas-am/2024.html"),
            Some("texas-am")
        );
        assert_eq!(
            ScheduleParser::team_id_from_href("/cfb/boxscores/2024-11-30-alabama.html"),
            Some("2024-11-30-alabama.html")
        );
        assert_eq!(ScheduleParser::team_id_from_href("/cfb/schools/"), None);
        assert_eq!(ScheduleParser::team_id_from_href("/cfb"), None);
    }
}
