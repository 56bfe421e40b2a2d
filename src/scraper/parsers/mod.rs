//! HTML parsers for sports-reference.com pages.

pub mod schedule;

pub use schedule::ScheduleParser;
