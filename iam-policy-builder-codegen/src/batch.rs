//! Batch generation over many services.
//!
//! Each service runs the full normalize, plan and render pipeline independently on the
//! rayon pool. A failure is recorded against its own service and never stops the batch.
//! Outcomes are reported in input order regardless of scheduling.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use rayon::prelude::*;

use crate::emit::{render_module, GENERATED_MARKER};
use crate::errors::{CollisionWarning, GenerationError};
use crate::mangle::plan_identifiers;
use crate::normalize::normalize_json;

/// One raw service document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInput {
    /// Name used in diagnostics until the service prefix is known, usually the file stem.
    pub label: String,
    pub text: String,
}

impl ServiceInput {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

/// The rendered module of one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedModule {
    pub prefix: String,
    pub module_name: String,
    pub type_name: String,
    pub source: String,
    pub warnings: Vec<CollisionWarning>,
}

impl GeneratedModule {
    /// File name of the module inside the output directory.
    pub fn file_name(&self) -> String {
        format!("{}.rs", self.module_name)
    }
}

/// Run the whole pipeline for a single service document.
pub fn generate_service(label: &str, text: &str) -> Result<GeneratedModule, GenerationError> {
    let service = normalize_json(label, text)?;
    let plan = plan_identifiers(&service);
    let source = render_module(&service, &plan)
        .map_err(|source| GenerationError::render(&service.prefix, source))?;

    Ok(GeneratedModule {
        prefix: service.prefix,
        module_name: plan.module_name,
        type_name: plan.type_name,
        source,
        warnings: plan.warnings,
    })
}

#[derive(Debug)]
pub struct ServiceOutcome {
    pub label: String,
    pub result: Result<GeneratedModule, GenerationError>,
}

impl ServiceOutcome {
    /// One pass/fail line for this service.
    pub fn status_line(&self) -> String {
        match &self.result {
            Ok(module) if module.warnings.is_empty() => {
                format!("ok    {} -> {}", module.prefix, module.file_name())
            }
            Ok(module) => format!(
                "ok    {} -> {} ({} collision warning(s))",
                module.prefix,
                module.file_name(),
                module.warnings.len()
            ),
            Err(err) => format!("FAIL  {}: {err}", self.label),
        }
    }
}

/// Results of a batch run, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<ServiceOutcome>,
}

impl BatchReport {
    pub fn generated(&self) -> impl Iterator<Item = &GeneratedModule> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &GenerationError)> {
        self.outcomes.iter().filter_map(|outcome| {
            outcome
                .result
                .as_ref()
                .err()
                .map(|err| (outcome.label.as_str(), err))
        })
    }

    pub fn warnings(&self) -> impl Iterator<Item = &CollisionWarning> {
        self.generated().flat_map(|module| module.warnings.iter())
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    pub fn status_lines(&self) -> Vec<String> {
        self.outcomes.iter().map(ServiceOutcome::status_line).collect()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} service(s): {} generated, {} failed, {} collision warning(s)",
            self.outcomes.len(),
            self.generated().count(),
            self.failures().count(),
            self.warnings().count()
        )
    }

    /// Index module declaring every generated module, ordered by service prefix.
    pub fn render_index(&self, style: IndexStyle) -> String {
        let mut modules: Vec<&GeneratedModule> = self.generated().collect();
        modules.sort_by(|a, b| a.prefix.cmp(&b.prefix));

        let mut out = String::new();
        out.push_str(GENERATED_MARKER);
        out.push_str("\n\n");
        for module in &modules {
            out.push_str("#[allow(clippy::pedantic, clippy::nursery)]\n");
            match style {
                IndexStyle::ModFile => {
                    out.push_str(&format!("pub mod {};\n", module.module_name));
                }
                IndexStyle::Include => {
                    out.push_str(&format!(
                        "pub mod {} {{\n    include!(concat!(env!(\"OUT_DIR\"), \"/{}\"));\n}}\n",
                        module.module_name,
                        module.file_name()
                    ));
                }
            }
        }
        if !modules.is_empty() {
            out.push('\n');
        }
        for module in &modules {
            out.push_str(&format!(
                "pub use {}::{};\n",
                module.module_name, module.type_name
            ));
        }
        out
    }
}

/// How the index refers to generated modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStyle {
    /// `pub mod x;` declarations, for a `mod.rs` next to the module files.
    ModFile,
    /// Inline modules that `include!` their file from `OUT_DIR`, for build scripts.
    Include,
}

/// Generate every input in parallel. Two services mapping to the same module name are a
/// failure of the later one.
pub fn generate_batch(inputs: &[ServiceInput]) -> BatchReport {
    let mut outcomes: Vec<ServiceOutcome> = inputs
        .par_iter()
        .map(|input| {
            let result = generate_service(&input.label, &input.text);
            match &result {
                Ok(module) => log::info!(
                    "{}: generated {} ({} bytes)",
                    module.prefix,
                    module.file_name(),
                    module.source.len()
                ),
                Err(err) => log::error!("{}: {err}", input.label),
            }
            ServiceOutcome {
                label: input.label.clone(),
                result,
            }
        })
        .collect();

    let mut seen: HashMap<String, String> = HashMap::new();
    for outcome in &mut outcomes {
        let duplicate = match &outcome.result {
            Ok(module) => match seen.entry(module.module_name.clone()) {
                Entry::Occupied(first) => Some(GenerationError::DuplicateModule {
                    module: module.module_name.clone(),
                    first: first.get().clone(),
                    second: module.prefix.clone(),
                }),
                Entry::Vacant(slot) => {
                    slot.insert(module.prefix.clone());
                    None
                }
            },
            Err(_) => None,
        };
        if let Some(err) = duplicate {
            log::error!("{}: {err}", outcome.label);
            outcome.result = Err(err);
        }
    }

    let report = BatchReport { outcomes };
    log::info!("{}", report.summary());
    report
}
