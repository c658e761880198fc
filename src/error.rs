//! Top-level error kinds and their process exit codes.
//!
//! The renderer itself never errors on template content; everything here is
//! raised before rendering begins (input and selector problems) or after it
//! (aggregated validation failures).

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::validation::ValidationError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    /// Missing template file, nothing matching a pattern, or a malformed
    /// flag value.
    #[error("{0}")]
    #[diagnostic(code(cfn_check::input))]
    Input(String),

    #[error("failed to read {path}")]
    #[diagnostic(code(cfn_check::input))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {path}")]
    #[diagnostic(code(cfn_check::input))]
    Yaml {
        path: PathBuf,
        #[source]
        source: cfn_check_yaml::YamlError,
    },

    /// A selector string failed to parse.
    #[error("invalid selector `{selector}`: {message}")]
    #[diagnostic(code(cfn_check::selector))]
    Selector { selector: String, message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error("internal error: {0}")]
    #[diagnostic(code(cfn_check::internal))]
    Internal(String),
}

impl Error {
    /// The process exit code for this error: 1 for user input problems
    /// (including bad selectors), 2 for validation failures, 3 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Input(_) | Error::Io { .. } | Error::Yaml { .. } | Error::Selector { .. } => 1,
            Error::Validation(_) => 2,
            Error::Internal(_) => 3,
        }
    }
}
