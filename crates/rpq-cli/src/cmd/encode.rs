use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use rpq_form::encode;

#[derive(Args, Debug, Clone)]
pub struct EncodeArgs {
    /// Answer record JSON, `-` for standard input
    #[arg(long = "answers", value_name = "FILE", default_value = "-")]
    pub answers: PathBuf,
}

pub fn run(args: EncodeArgs) -> Result<()> {
    let record = super::load_record(&args.answers)?;
    match encode(&record).context("encode state token")? {
        Some(token) => println!("{token}"),
        None => tracing::info!("record is empty, nothing to encode"),
    }
    Ok(())
}
