//! Schedule scraping for sports-reference.com
//!
//! Provides the box score page fetcher and its HTML parser.

pub mod fetcher;
pub mod parsers;

pub use fetcher::{ScheduleFetcher, ScheduleSource, StoredSchedule};
pub use parsers::ScheduleParser;

use chrono::{Datelike, NaiveDate};

/// College football box score index on sports-reference.com
pub const BOXSCORES_URL: &str = "https://www.sports-reference.com/cfb/boxscores/index.cgi";

/// Build box score index URL for a date
/// URL: BASE?month=M&day=D&year=YYYY
pub fn boxscores_url(base_url: &str, date: NaiveDate) -> String {
    format!(
        "{}?month={}&day={}&year={}",
        base_url,
        date.month(),
        date.day(),
        date.year()
    )
}
