use anyhow::{Context, Result};
use clap::Args;

use rpq_form::decode;

#[derive(Args, Debug, Clone)]
pub struct DecodeArgs {
    /// State token, with or without its leading `#`
    #[arg(value_name = "TOKEN")]
    pub token: String,
}

pub fn run(args: DecodeArgs) -> Result<()> {
    let record = decode(&args.token).context("decode state token")?;
    println!("{}", record.to_json_pretty()?);
    Ok(())
}
