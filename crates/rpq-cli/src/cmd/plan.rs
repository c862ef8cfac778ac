use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use time::Date;

use rpq_form::decode;
use rpq_pdf::map_record;

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    /// Answer record JSON, `-` for standard input
    #[arg(long = "answers", value_name = "FILE", conflicts_with = "token")]
    pub answers: Option<PathBuf>,
    /// State token to plan from instead of a record file
    #[arg(long = "token", value_name = "TOKEN")]
    pub token: Option<String>,
    /// Certification fallback date, today (UTC) when omitted
    #[arg(long, value_name = "YYYY-MM-DD", value_parser = super::parse_date)]
    pub date: Option<Date>,
}

pub fn run(args: PlanArgs) -> Result<()> {
    let record = match (&args.answers, &args.token) {
        (_, Some(token)) => decode(token).context("decode state token")?,
        (Some(path), None) => super::load_record(path)?,
        (None, None) => super::load_record(Path::new("-"))?,
    };
    let today = super::resolve_date(args.date);
    let mapping = map_record(&record, today);
    println!("{}", serde_json::to_string_pretty(&mapping)?);
    Ok(())
}
