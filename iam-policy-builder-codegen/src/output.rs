//! Reading service documents from disk and writing generated modules back.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::fs;
use std::path::{Path, PathBuf};

use crate::batch::{BatchReport, IndexStyle, ServiceInput};
use crate::errors::GenerationError;

/// File name of the index module written next to the generated modules.
pub const INDEX_FILE: &str = "mod.rs";

/// Load every `*.json` file in `dir`, sorted by file name. Labels are the file stems.
pub fn load_inputs(dir: &Path) -> Result<Vec<ServiceInput>, GenerationError> {
    let entries = fs::read_dir(dir).map_err(|source| GenerationError::io("read", dir, source))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| GenerationError::io("read", dir, source))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let text = fs::read_to_string(&path)
                .map_err(|source| GenerationError::io("read", &path, source))?;
            let label = path
                .file_stem()
                .map_or_else(String::new, |stem| stem.to_string_lossy().into_owned());
            log::debug!("loaded {} ({} bytes)", path.display(), text.len());
            Ok(ServiceInput::new(label, text))
        })
        .collect()
}

/// Everything a report would put on disk: `(file name, contents)` pairs.
fn planned_files(report: &BatchReport, with_index: bool) -> Vec<(String, String)> {
    let mut files: Vec<(String, String)> = report
        .generated()
        .map(|module| (module.file_name(), module.source.clone()))
        .collect();
    if with_index {
        files.push((INDEX_FILE.to_string(), report.render_index(IndexStyle::ModFile)));
    }
    files
}

/// Write every generated module (and optionally the index) into `dir`, creating it if
/// needed. Files whose contents are unchanged are left untouched. Returns the paths that
/// were written.
pub fn write_modules(
    dir: &Path,
    report: &BatchReport,
    with_index: bool,
) -> Result<Vec<PathBuf>, GenerationError> {
    fs::create_dir_all(dir).map_err(|source| GenerationError::io("create", dir, source))?;

    let mut written = Vec::new();
    for (name, contents) in planned_files(report, with_index) {
        let path = dir.join(&name);
        if fs::read_to_string(&path).is_ok_and(|existing| existing == contents) {
            log::debug!("{} is up to date", path.display());
            continue;
        }
        fs::write(&path, contents).map_err(|source| GenerationError::io("write", &path, source))?;
        log::info!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

/// Why a file on disk does not match freshly generated output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staleness {
    Missing,
    Outdated,
}

impl Display for Staleness {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Missing => f.write_str("missing"),
            Self::Outdated => f.write_str("outdated"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleFile {
    pub path: PathBuf,
    pub staleness: Staleness,
}

/// Compare the report against the files in `dir` without writing anything.
pub fn check_modules(
    dir: &Path,
    report: &BatchReport,
    with_index: bool,
) -> Result<Vec<StaleFile>, GenerationError> {
    let mut stale = Vec::new();
    for (name, contents) in planned_files(report, with_index) {
        let path = dir.join(&name);
        let staleness = match fs::read_to_string(&path) {
            Ok(existing) if existing == contents => continue,
            Ok(_) => Staleness::Outdated,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Staleness::Missing,
            Err(source) => return Err(GenerationError::io("read", &path, source)),
        };
        log::warn!("{} is {staleness}", path.display());
        stale.push(StaleFile { path, staleness });
    }
    Ok(stale)
}
