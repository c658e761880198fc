//! Error types for YAML handling.

use thiserror::Error;

/// Errors produced while reading or writing YAML documents.
#[derive(Debug, Error)]
pub enum YamlError {
    #[error("failed to parse YAML: {0}")]
    Parse(#[source] serde_yaml::Error),

    #[error("failed to serialize YAML: {0}")]
    Emit(#[source] serde_yaml::Error),
}
