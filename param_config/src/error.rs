//! Error types produced by document merging and parameter (de)serialization.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::combine::RootKind;
use crate::document::DocFormat;
use crate::schema::ParamKind;

/// Convenience alias for results carrying a [`ParamError`].
pub type ParamResult<T> = Result<T, ParamError>;

/// Errors that can occur while merging documents or (de)serializing
/// parameter sets.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParamError {
    /// Merge inputs disagree on their root kind.
    #[error("cannot merge documents: source {index} has a {found} root, expected {expected}")]
    MixedRoots {
        /// Root kind of the first source document.
        expected: RootKind,
        /// Root kind of the offending source document.
        found: RootKind,
        /// Zero-based position of the offending source document.
        index: usize,
    },

    /// More than one merge input whose root is neither a mapping nor a
    /// sequence.
    #[error("cannot merge {count} documents whose roots are neither mappings nor sequences")]
    ScalarRoots {
        /// Number of source documents supplied.
        count: usize,
    },

    /// Merge invoked with an empty source list.
    #[error("no source documents to merge")]
    NoSources,

    /// Error reading, parsing, or writing a configuration file.
    #[error("configuration file error in '{path}': {source}")]
    File {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying error reported by the reader or parser.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A source document failed to parse.
    #[error("malformed {format} document: {source}")]
    Malformed {
        /// Format the document was parsed as.
        format: DocFormat,
        /// Underlying parser error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A document could not be written.
    #[error("failed to write {format} document: {source}")]
    Emit {
        /// Format the document was written as.
        format: DocFormat,
        /// Underlying writer error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// No serializer or deserializer could be resolved for a parameter.
    #[error("no handler registered for parameter '{name}' of kind {kind}")]
    NoHandler {
        /// Name of the parameter whose handler lookup failed.
        name: String,
        /// Declared kind of the parameter.
        kind: ParamKind,
    },

    /// A parameter value could not be converted.
    #[error("{owner}.{name}: {message}")]
    Convert {
        /// Name of the parameter set holding the parameter.
        owner: String,
        /// Name of the parameter being converted.
        name: String,
        /// Human-readable explanation of the conversion failure.
        message: String,
    },

    /// A referenced parameter does not exist in the target set.
    #[error("no parameter '{name}' in '{owner}'")]
    UnknownParam {
        /// Name of the parameter set searched.
        owner: String,
        /// Name that failed to resolve.
        name: String,
    },

    /// A document does not fit the sections-to-scalars shape INI requires.
    #[error("INI layout error: {message}")]
    IniLayout {
        /// Human-readable explanation of the layout violation.
        message: String,
    },

    /// A requested INI section is absent.
    #[error("no section '{section}' in INI document")]
    MissingSection {
        /// Name of the section that was requested.
        section: String,
    },

    /// A tunable name collection or suggestion failed.
    #[error("tuning error: {message}")]
    Tuning {
        /// Human-readable explanation of the tuning failure.
        message: String,
    },
}

impl ParamError {
    /// Wrap an error raised while handling the file at `path`.
    #[must_use]
    pub fn file(
        path: &Path,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::File {
            path: path.to_path_buf(),
            source: Box::new(source),
        }
    }

    /// Build a conversion failure for `name` within the set `owner`.
    #[must_use]
    pub fn convert(
        owner: impl Into<String>,
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Convert {
            owner: owner.into(),
            name: name.into(),
            message: message.into(),
        }
    }

    /// Build a parse failure for a document of `format`.
    #[must_use]
    pub fn malformed(
        format: DocFormat,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Malformed {
            format,
            source: Box::new(source),
        }
    }

    /// Build a write failure for a document of `format`.
    #[must_use]
    pub fn emit(
        format: DocFormat,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Emit {
            format,
            source: Box::new(source),
        }
    }
}
