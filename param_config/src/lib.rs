//! Utilities for (de)serializing declared parameter sets to and from JSON,
//! YAML, and INI, merging structured configuration files, and wiring
//! parameters into command lines and hyperparameter searches.
//!
//! The two load-bearing pieces are [`combine::combine_documents`], which
//! folds ordered configuration documents under clobber or nested merge
//! semantics, and the [`serial`] registries, which resolve a handler per
//! parameter by name, then by kind, then by built-in default.
//!
//! ```rust
//! use param_config::{MergePolicy, combine_documents};
//! use serde_json::json;
//!
//! let merged = combine_documents(
//!     vec![
//!         json!({"a": {"b": {"c": null}, "d": true}}),
//!         json!({"a": {"b": {"e": 1}}, "f": "g"}),
//!     ],
//!     MergePolicy::Nested,
//! )?;
//! assert_eq!(
//!     merged,
//!     json!({"a": {"b": {"c": null, "e": 1}, "d": true}, "f": "g"}),
//! );
//! # Ok::<_, param_config::ParamError>(())
//! ```

pub mod cmdline;
pub mod combine;
pub mod document;
mod error;
pub mod schema;
pub mod serial;
pub mod tune;

pub use combine::{MergePolicy, RootKind, combine_documents};
pub use document::{DocFormat, JsonStyle};
pub use error::{ParamError, ParamResult};
pub use schema::{ParamDecl, ParamKind, ParamSet};
pub use serial::{
    DeserializeOptions, DeserializerRegistry, OnMissing, ParamDeserializer, ParamSerializer,
    SerializeOptions, SerializerRegistry, deserialize_params, serialize_params,
};
