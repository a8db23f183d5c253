//! `export-meta`: describe the exported surface of JS/TS modules.
//!
//! Parses a module with tree-sitter, classifies its top-level declarations,
//! resolves named and default exports (including default-exported re-export
//! objects), and reports variables, classes and functions with their
//! accessor paths and reconstructed parameter lists.

pub mod classify;
pub mod context;
pub mod error;
pub mod extract;
pub mod import;
pub mod model;
pub mod output;
pub mod params;
pub mod parser;
pub mod resolve;
pub mod syntax;
pub mod util;

pub use context::ModuleContext;
pub use error::{ExportMetaError, ExtractionError, NodeSnapshot};
pub use extract::{extract_module, extract_source};
pub use import::import_statement;
pub use model::{Category, Descriptor, ExportSummary, ExtractedModule, ModuleMetadata};
pub use output::ModuleReport;
