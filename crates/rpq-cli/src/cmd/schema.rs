use anyhow::Result;

use rpq_form::answers_schema;

pub fn run() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&answers_schema())?);
    Ok(())
}
