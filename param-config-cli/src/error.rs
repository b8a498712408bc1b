//! Error type surfaced by the CLI.

use thiserror::Error;

/// Errors reported to the user with a non-zero exit code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CliError {
    /// Failure raised by the underlying library.
    #[error(transparent)]
    Param(#[from] param_config::ParamError),

    /// Failure writing the merged document to stdout.
    #[error("failed to write to stdout: {0}")]
    Stdout(#[from] std::io::Error),

    /// Source and destination paths could not be split.
    #[error("expected at least one source path and a destination path")]
    Usage,
}
