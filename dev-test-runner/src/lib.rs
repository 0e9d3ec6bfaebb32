//! Fixture-driven conformance runner.
//!
//! A fixture file holds a list of suites; each suite pairs one schema (and
//! optionally validator options) with data samples and their expected verdict.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use json_assay::{path_de, Options, Validator};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Suite {
    pub description: String,
    pub schema: Value,
    #[serde(default)]
    pub options: Options,
    /// Extra documents for cross-document `$ref`, keyed by id.
    #[serde(default)]
    pub documents: serde_json::Map<String, Value>,
    pub tests: Vec<Case>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Case {
    pub description: String,
    pub data: Value,
    #[serde(default)]
    pub valid: bool,
    /// The evaluation must abort with a structural failure.
    #[serde(default)]
    pub structural: bool,
}

#[derive(Debug, Clone)]
pub struct CaseResult {
    pub suite: String,
    pub case: String,
    pub passed: bool,
    pub detail: String,
}

pub fn load_suites(path: &Path) -> Result<Vec<Suite>> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let suites = path_de::from_slice_with_path::<Vec<Suite>>(&bytes)
        .with_context(|| format!("malformed fixture file {}", path.display()))?;
    Ok(suites)
}

/// `*.json` files directly under `dir`, sorted.
pub fn fixture_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = std::fs::read_dir(dir)
        .with_context(|| format!("failed to list {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    files.retain(|p| p.extension().is_some_and(|ext| ext == "json"));
    files.sort();
    Ok(files)
}

/// Runs every case whose `suite / case` description matches `filter`.
pub fn run_suite(suite: &Suite, filter: Option<&Regex>) -> Vec<CaseResult> {
    let mut resolver = json_assay::LocalResolver::new(&suite.schema);
    for (id, document) in &suite.documents {
        resolver = resolver.with_document(id, document);
    }
    let validator = Validator::new(suite.options).with_resolver(&resolver);

    let mut out = Vec::new();
    for case in &suite.tests {
        let label = format!("{} / {}", suite.description, case.description);
        if filter.is_some_and(|re| !re.is_match(&label)) {
            continue;
        }
        let (passed, detail) = match validator.evaluate(&case.data, &suite.schema) {
            Err(err) => (case.structural, err.to_string()),
            Ok(_) if case.structural => (false, "expected a structural failure".to_string()),
            Ok(errors) => {
                let detail = errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; ");
                (errors.is_empty() == case.valid, detail)
            }
        };
        out.push(CaseResult { suite: suite.description.clone(), case: case.description.clone(), passed, detail });
    }
    out
}

pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}
