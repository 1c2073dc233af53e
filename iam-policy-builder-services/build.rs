use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use iam_policy_builder_codegen::{generate_batch, load_inputs, write_modules, IndexStyle};

const SERVICES_DIR: &str = "resources/services";
const INDEX_FILE: &str = "services.rs";

fn main() {
    println!("cargo:rerun-if-changed={SERVICES_DIR}");

    let out_dir = match env::var("OUT_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => panic!("OUT_DIR is not set: {e}"),
    };

    let inputs = match load_inputs(Path::new(SERVICES_DIR)) {
        Ok(inputs) => inputs,
        Err(e) => panic!("Failed to load service catalogs: {e}"),
    };

    let report = generate_batch(&inputs);
    for warning in report.warnings() {
        println!("cargo:warning={warning}");
    }
    if report.has_failures() {
        let failures: Vec<String> = report
            .failures()
            .map(|(label, err)| format!("  {label}: {err}"))
            .collect();
        panic!(
            "Failed to generate {} service module(s):\n{}",
            failures.len(),
            failures.join("\n")
        );
    }

    if let Err(e) = write_modules(&out_dir, &report, false) {
        panic!("Failed to write generated modules: {e}");
    }
    let index = out_dir.join(INDEX_FILE);
    if let Err(e) = fs::write(&index, report.render_index(IndexStyle::Include)) {
        panic!("Failed to write {}: {e}", index.display());
    }
}
