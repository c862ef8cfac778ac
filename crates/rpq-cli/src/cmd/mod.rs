pub mod decode;
pub mod encode;
pub mod plan;
pub mod schema;
pub mod validate;

use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use rpq_form::AnswerRecord;

const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Reads an answer record from `path`, `-` meaning standard input.
pub(crate) fn load_record(path: &Path) -> Result<AnswerRecord> {
    let raw = if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("read answers from stdin")?;
        buffer
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("read answers from {}", path.display()))?
    };
    serde_json::from_str(&raw).context("parse answer record JSON")
}

/// `--date` parser for clap.
pub(crate) fn parse_date(raw: &str) -> Result<Date, String> {
    Date::parse(raw, ISO_DATE).map_err(|error| error.to_string())
}

/// The explicit `--date` when given, today's UTC calendar date otherwise.
pub(crate) fn resolve_date(date: Option<Date>) -> Date {
    date.unwrap_or_else(|| OffsetDateTime::now_utc().date())
}
