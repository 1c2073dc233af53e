//! `generate`: run the batch pipeline over a directory of catalogs.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Args;
use iam_policy_builder_codegen::{check_modules, generate_batch, load_inputs, write_modules};

/// Exit status of `--check` when generated files on disk are stale.
const STALE_EXIT_CODE: u8 = 2;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Directory containing one JSON catalog per service
    #[arg(short, long, value_name = "DIR")]
    pub input: PathBuf,

    /// Directory receiving the generated modules
    #[arg(short, long, value_name = "DIR")]
    pub output: PathBuf,

    /// Only generate the catalog with this file stem; mod.rs is left untouched
    #[arg(long, env = "IAM_POLICY_BUILDER_SERVICE", value_name = "PREFIX")]
    pub service: Option<String>,

    /// Compare with the files in the output directory instead of writing
    #[arg(long)]
    pub check: bool,
}

pub fn run(args: &GenerateArgs) -> Result<ExitCode> {
    let mut inputs = load_inputs(&args.input)
        .with_context(|| format!("failed to load catalogs from {}", args.input.display()))?;

    if let Some(service) = &args.service {
        inputs.retain(|input| &input.label == service);
        if inputs.is_empty() {
            bail!(
                "no catalog named `{service}.json` in {}",
                args.input.display()
            );
        }
    }
    log::debug!("generating {} service(s)", inputs.len());

    let report = generate_batch(&inputs);
    for line in report.status_lines() {
        println!("{line}");
    }
    for warning in report.warnings() {
        eprintln!("warning: {warning}");
    }

    let with_index = args.service.is_none();
    if args.check {
        let stale = check_modules(&args.output, &report, with_index)
            .with_context(|| format!("failed to check {}", args.output.display()))?;
        for file in &stale {
            println!("stale {} ({})", file.path.display(), file.staleness);
        }
        println!("{}", report.summary());
        if report.has_failures() {
            return Ok(ExitCode::FAILURE);
        }
        if !stale.is_empty() {
            return Ok(ExitCode::from(STALE_EXIT_CODE));
        }
        return Ok(ExitCode::SUCCESS);
    }

    let written = write_modules(&args.output, &report, with_index)
        .with_context(|| format!("failed to write to {}", args.output.display()))?;
    println!(
        "{} file(s) written to {}",
        written.len(),
        args.output.display()
    );
    println!("{}", report.summary());

    if report.has_failures() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
