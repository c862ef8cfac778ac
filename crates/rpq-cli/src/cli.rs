use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::cmd::{
    self, decode::DecodeArgs, encode::EncodeArgs, plan::PlanArgs, validate::ValidateArgs,
};

#[derive(Parser, Debug)]
#[command(
    name = "rpq",
    about = "Developer tools for the NFA Responsible Person Questionnaire",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode an answer record into a shareable state token
    Encode(EncodeArgs),
    /// Decode a state token back into answer record JSON
    Decode(DecodeArgs),
    /// Check an answer record against the questionnaire's field rules
    Validate(ValidateArgs),
    /// Print the ordered PDF field operations for an answer record
    Plan(PlanArgs),
    /// Print the answer record JSON Schema
    Schema,
}

pub fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Encode(args) => cmd::encode::run(args),
        Commands::Decode(args) => cmd::decode::run(args),
        Commands::Validate(args) => cmd::validate::run(args),
        Commands::Plan(args) => cmd::plan::run(args),
        Commands::Schema => cmd::schema::run(),
    }
}
