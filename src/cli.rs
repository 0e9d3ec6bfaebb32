//! Minimal CLI: validate JSON/NDJSON documents against a schema
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context as _, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;

use json_assay::{BigintMode, LocalResolver, Options, StructuralError, ValidationError, Validator};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// validate JSON/NDJSON documents against a JSON Schema and report every violation
#[derive(Parser, Debug)]
#[command(name = "json-assay", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// validate documents and print every violation
    Validate(ValidateOut),
    /// print the effective validator options as JSON
    Options(OptionsOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct OptionSettings {
    /// JSON config file with `maxDepth` / `bigintMode`
    #[arg(long)]
    config: Option<PathBuf>,

    /// deepest descent before evaluation aborts (overrides the config file)
    #[arg(long)]
    max_depth: Option<usize>,

    /// `treat-as-valid-string` or `treat-as-invalid-string` (overrides the config file)
    #[arg(long)]
    bigint_mode: Option<String>,
}

#[derive(clap::Parser, Debug)]
struct ValidateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    option_settings: OptionSettings,

    /// schema file
    #[arg(long, short)]
    schema: PathBuf,

    /// extra schema documents for `$ref`, as ID=PATH
    #[arg(long = "ref", value_name = "ID=PATH")]
    references: Vec<String>,

    /// print a JSON report instead of the human-readable one
    #[arg(long, default_value_t = false)]
    json: bool,

    /// output report file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct OptionsOut {
    #[command(flatten)]
    option_settings: OptionSettings,
}

/// One document to check, and where it came from.
#[derive(Debug)]
struct Document {
    source: String,
    value: Value,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    source: &'a str,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure: Option<String>,
    errors: &'a [ValidationError],
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_documents(&self) -> Result<Vec<Document>> {
        let source_paths = resolve_file_path_patterns(&self.input)?;
        let mut out = Vec::new();
        for source_path in source_paths {
            let source_path_str = source_path.to_string_lossy().to_string();
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file {source_path_str}"))?;
            if self.ndjson {
                for (line_no, line) in source.lines().enumerate() {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let value = serde_json::from_str::<Value>(line).with_context(|| {
                        format!("failed to parse JSON at {source_path_str}:{}", line_no + 1)
                    })?;
                    out.push(self.select(format!("{source_path_str}:{}", line_no + 1), value)?);
                }
            } else {
                let value = serde_json::from_str::<Value>(&source)
                    .with_context(|| format!("failed to parse JSON source file ({source_path_str})"))?;
                out.push(self.select(source_path_str, value)?);
            }
        }
        Ok(out)
    }

    fn select(&self, source: String, value: Value) -> Result<Document> {
        let Some(pointer) = self.json_pointer.as_deref() else {
            return Ok(Document { source, value });
        };
        let Some(node) = value.pointer(pointer) else {
            bail!("JSON pointer {pointer} selects nothing in {source}");
        };
        Ok(Document { value: node.clone(), source })
    }
}

impl OptionSettings {
    fn resolve(&self) -> Result<Options> {
        let mut options = match self.config.as_ref() {
            Some(path) => {
                let bytes = std::fs::read(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                Options::from_json_slice(&bytes).with_context(|| format!("in config file {}", path.display()))?
            }
            None => Options::default(),
        };
        if let Some(max_depth) = self.max_depth {
            options = options.with_max_depth(max_depth);
        }
        if let Some(mode) = self.bigint_mode.as_deref() {
            options = options.with_bigint_mode(mode.parse::<BigintMode>()?);
        }
        Ok(options)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<ExitCode> {
        match &self.cmd {
            Command::Options(target) => {
                let options = target.option_settings.resolve()?;
                println!("{}", serde_json::to_string_pretty(&options)?);
                Ok(ExitCode::SUCCESS)
            }
            Command::Validate(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(ExitCode::SUCCESS);
                }
                target.run()
            }
        }
    }
}

impl ValidateOut {
    fn run(&self) -> Result<ExitCode> {
        let options = self.option_settings.resolve()?;

        // 1) schema + referenced documents
        let schema = read_json(&self.schema)?;
        let references = self
            .references
            .iter()
            .map(|spec| {
                let (id, path) = spec
                    .split_once('=')
                    .ok_or_else(|| anyhow!("--ref expects ID=PATH, got `{spec}`"))?;
                Ok((id.to_string(), read_json(Path::new(path))?))
            })
            .collect::<Result<Vec<_>>>()?;
        let mut resolver = LocalResolver::new(&schema);
        for (id, document) in &references {
            resolver = resolver.with_document(id, document);
        }
        tracing::debug!(documents = ?resolver.document_ids().collect::<Vec<_>>(), "registered schema documents");

        // 2) documents
        let documents = self.input_settings.load_documents()?;
        tracing::info!(documents = documents.len(), max_depth = options.max_depth, "validating");

        // 3) validate, independent documents in parallel
        let validator = Validator::new(options).with_resolver(&resolver);
        let outcomes: Vec<Result<Vec<ValidationError>, StructuralError>> = documents
            .par_iter()
            .map(|doc| validator.evaluate(&doc.value, &schema))
            .collect();

        // 4) report
        let reports: Vec<Report<'_>> = documents
            .iter()
            .zip(&outcomes)
            .map(|(doc, outcome)| match outcome {
                Ok(errors) => Report { source: &doc.source, valid: errors.is_empty(), failure: None, errors },
                Err(err) => Report { source: &doc.source, valid: false, failure: Some(err.to_string()), errors: &[] },
            })
            .collect();
        let rendered = if self.json {
            serde_json::to_string_pretty(&reports)?
        } else {
            render_human(&reports)
        };
        if let Some(out) = self.out.as_ref() {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(out, &rendered)?;
        } else {
            println!("{rendered}");
        }

        let code = if reports.iter().any(|r| r.failure.is_some()) {
            ExitCode::from(2)
        } else if reports.iter().any(|r| !r.valid) {
            ExitCode::from(1)
        } else {
            ExitCode::SUCCESS
        };
        Ok(code)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn read_json(path: &Path) -> Result<Value> {
    let source = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&source).with_context(|| format!("failed to parse JSON in {}", path.display()))
}

fn render_human(reports: &[Report<'_>]) -> String {
    let mut s = String::new();
    for report in reports {
        if let Some(failure) = &report.failure {
            s.push_str(&format!("{} {}\n  {}\n", "error".red().bold(), report.source, failure));
        } else if report.valid {
            s.push_str(&format!("{} {}\n", "ok".green().bold(), report.source));
        } else {
            s.push_str(&format!("{} {} ({} errors)\n", "invalid".red().bold(), report.source, report.errors.len()));
            for error in report.errors {
                let pointer = if error.pointer.is_root() { "(root)".to_string() } else { error.pointer.to_string() };
                s.push_str(&format!("  {} [{}] {}\n", pointer.yellow(), error.kind.code().dimmed(), error.message));
            }
        }
    }
    let invalid = reports.iter().filter(|r| !r.valid).count();
    s.push_str(&format!("{} of {} documents valid", reports.len() - invalid, reports.len()));
    s
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern).with_context(|| format!("bad glob pattern {pattern}"))? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
