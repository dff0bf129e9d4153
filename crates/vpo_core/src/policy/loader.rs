//! Policy document loading.
//!
//! Policies are TOML or JSON documents that deserialize straight into
//! [`EvaluationPolicy`]. Loading always finishes with `validate()` so the
//! evaluator only ever sees well-formed policies.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::types::EvaluationPolicy;
use crate::evaluator::PolicyError;

/// Errors that can occur while loading a policy.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read policy file: {0}")]
    ReadError(#[from] io::Error),

    #[error("Failed to parse TOML policy: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Failed to parse JSON policy: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid policy: {0}")]
    Invalid(#[from] PolicyError),

    #[error("Unsupported policy file extension: {0}")]
    UnsupportedFormat(PathBuf),
}

/// Result type for policy loading.
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Serialization format of a policy document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyFormat {
    Toml,
    Json,
}

impl PolicyFormat {
    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parse and validate a policy document.
pub fn load_policy_str(content: &str, format: PolicyFormat) -> LoaderResult<EvaluationPolicy> {
    let policy: EvaluationPolicy = match format {
        PolicyFormat::Toml => toml::from_str(content)?,
        PolicyFormat::Json => serde_json::from_str(content)?,
    };
    policy.validate()?;

    tracing::debug!(
        schema_version = policy.schema_version,
        rules = policy.rules.as_ref().map_or(0, |r| r.items.len()),
        "Loaded policy"
    );
    Ok(policy)
}

/// Load a policy file, picking the format from its extension.
pub fn load_policy_file(path: impl AsRef<Path>) -> LoaderResult<EvaluationPolicy> {
    let path = path.as_ref();
    let format = PolicyFormat::from_path(path)
        .ok_or_else(|| LoaderError::UnsupportedFormat(path.to_path_buf()))?;
    let content = fs::read_to_string(path)?;
    load_policy_str(&content, format)
}
