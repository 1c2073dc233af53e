//! `inspect`: show what the normalizer and mangler make of one catalog.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use iam_policy_builder_codegen::{normalize_json, plan_identifiers};
use serde_json::json;

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Catalog JSON file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Also print the planned identifiers and collision warnings
    #[arg(long)]
    pub plan: bool,
}

pub fn run(args: &InspectArgs) -> Result<ExitCode> {
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let label = args
        .file
        .file_stem()
        .map_or_else(String::new, |stem| stem.to_string_lossy().into_owned());

    let service = normalize_json(&label, &text)?;
    let output = if args.plan {
        let plan = plan_identifiers(&service);
        json!({ "service": service, "plan": plan })
    } else {
        serde_json::to_value(&service)?
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(ExitCode::SUCCESS)
}
