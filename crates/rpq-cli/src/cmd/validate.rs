use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;
use time::Date;

use rpq_form::{ControlSet, validate_controls};

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Answer record JSON, `-` for standard input
    #[arg(long = "answers", value_name = "FILE", default_value = "-")]
    pub answers: PathBuf,
    /// Reference date for date checks, today (UTC) when omitted
    #[arg(long, value_name = "YYYY-MM-DD", value_parser = super::parse_date)]
    pub date: Option<Date>,
}

pub fn run(args: ValidateArgs) -> Result<()> {
    let record = super::load_record(&args.answers)?;
    let today = super::resolve_date(args.date);

    let mut controls = ControlSet::questionnaire();
    controls.restore_record(&record);
    let report = validate_controls(&controls, today);
    for failure in &report.failures {
        println!("{}: {}", failure.control, failure.message);
    }
    if !report.valid {
        bail!("{} validation failure(s)", report.failures.len());
    }
    println!("ok");
    Ok(())
}
