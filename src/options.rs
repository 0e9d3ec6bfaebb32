//! Validator options and their JSON config form.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StructuralError;
use crate::path_de;

pub const DEFAULT_MAX_DEPTH: usize = 10;

/// How to read strings that hold an integer literal too large for `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BigintMode {
    /// Keep them strings: `type: string` accepts them.
    TreatAsValidString,
    /// Read them as numbers: `type: string` rejects them.
    #[default]
    TreatAsInvalidString,
}

impl BigintMode {
    pub fn name(self) -> &'static str {
        match self {
            BigintMode::TreatAsValidString => "treat-as-valid-string",
            BigintMode::TreatAsInvalidString => "treat-as-invalid-string",
        }
    }
}

impl fmt::Display for BigintMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BigintMode {
    type Err = StructuralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "treat-as-valid-string" => Ok(BigintMode::TreatAsValidString),
            "treat-as-invalid-string" => Ok(BigintMode::TreatAsInvalidString),
            other => Err(StructuralError::InvalidOption(format!(
                "unknown bigint mode `{other}` (expected `treat-as-valid-string` or `treat-as-invalid-string`)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct Options {
    /// Deepest descent before evaluation aborts. Also caps the length of a
    /// single `$ref` chain.
    pub max_depth: usize,
    pub bigint_mode: BigintMode,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            bigint_mode: BigintMode::default(),
        }
    }
}

impl Options {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_bigint_mode(mut self, bigint_mode: BigintMode) -> Self {
        self.bigint_mode = bigint_mode;
        self
    }

    pub fn from_json_str(src: &str) -> Result<Self, StructuralError> {
        path_de::from_str_with_path(src).map_err(|e| StructuralError::InvalidOption(e.to_string()))
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, StructuralError> {
        path_de::from_slice_with_path(bytes).map_err(|e| StructuralError::InvalidOption(e.to_string()))
    }
}
