//! Loading of configuration descriptions from TOML files.
//!
//! This crate knows nothing about parameter types or constraints: it reads
//! `[[parameter]]` tables with their source locations, follows `imports`,
//! merges several files into one parameter list, and renders the resulting
//! diagnostics. Interpreting the raw entries is left to the caller.

mod diagnostics;
mod document;
mod located;
mod merge;

pub use diagnostics::ConflictLocation;
pub use diagnostics::Diagnostic;
pub use diagnostics::Diagnostics;
pub use diagnostics::Error;
pub use diagnostics::LoadError;
pub use diagnostics::MergeError;
pub use diagnostics::SourceInfo;
pub use diagnostics::ValidationError;
pub use diagnostics::Warning;
pub use diagnostics::format_diagnostics;
pub use document::Number;
pub use document::RawOption;
pub use document::RawParameter;
pub use document::Scalar;
pub use document::SchemaDocument;
pub use located::Located;
pub use merge::MergedSchema;
pub use merge::merge;
