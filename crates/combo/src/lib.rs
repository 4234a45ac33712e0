//! Combo program trees
//!
//! Provides the vertex vocabulary and owned tree model used to represent
//! evolved programs, rendering into several output syntaxes, and parsing of
//! the canonical combo syntax.
//!
//! Modules:
//! - `vertex`: Builtin operators, arguments, constants and literal vertices
//! - `tree`: Ordered program trees with copy-on-graft construction
//! - `format`: Rendering to combo, python and scheme syntaxes
//! - `parse`: Canonical combo parser
//! - `labels`: Label/placeholder substitution passes

pub mod errors;
pub mod format;
pub mod labels;
pub mod parse;
pub mod tree;
pub mod vertex;

pub use errors::{ComboError, ParseError, Result};
pub use format::{render, OutputFormat, RenderOptions};
pub use labels::{labels_to_placeholders, parse_variables, placeholders_to_labels};
pub use parse::{parse_combo, MAX_DEPTH};
pub use tree::ComboTree;
pub use vertex::{AnnKind, AnnVertex, Argument, Arity, Builtin, Vertex};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
