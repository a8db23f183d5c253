use std::fmt;

use tree_sitter::Node;

use crate::util::txt;

/// Errors produced by export-meta while reading, parsing, or extracting a file.
#[derive(Debug, thiserror::Error)]
pub enum ExportMetaError {
    #[error("{path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("unsupported extension: .{0}")]
    UnsupportedExtension(String),

    #[error("parse failed: {0}")]
    ParseFailed(String),

    #[error("{module}: {source}")]
    Extraction {
        module: String,
        #[source]
        source: ExtractionError,
    },

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures of the extraction core. All of them are fatal for the module.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("unknown param case: {0}")]
    UnknownParameterShape(NodeSnapshot),

    #[error("unknown export-declaration shape: {0}")]
    UnknownExportDeclarationShape(NodeSnapshot),

    #[error("unregistered re-export reference `{name}`: {node}")]
    DanglingReExportReference { name: String, node: NodeSnapshot },

    #[error("duplicate {bucket} binding `{name}` (accessor `{accessor}`)")]
    DuplicateBinding {
        bucket: &'static str,
        name: String,
        accessor: String,
    },

    #[error("no exportable declarations found")]
    EmptyExtractionResult,
}

impl ExtractionError {
    /// Attach the module identifier, producing the crate-level error.
    pub fn in_module(self, module: &str) -> ExportMetaError {
        ExportMetaError::Extraction {
            module: module.to_string(),
            source: self,
        }
    }
}

const SNAPSHOT_TEXT_LIMIT: usize = 60;

/// Owned copy of the interesting bits of a syntax node, kept for diagnostics
/// after the tree is gone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSnapshot {
    pub kind: String,
    pub line: usize,
    pub column: usize,
    pub text: String,
}

impl NodeSnapshot {
    pub fn of(node: Node, src: &[u8]) -> Self {
        let flat = txt(node, src).split_whitespace().collect::<Vec<_>>().join(" ");
        let text = if flat.chars().count() > SNAPSHOT_TEXT_LIMIT {
            let cut: String = flat.chars().take(SNAPSHOT_TEXT_LIMIT - 3).collect();
            format!("{cut}...")
        } else {
            flat
        };

        Self {
            kind: node.kind().to_string(),
            line: node.start_position().row + 1,
            column: node.start_position().column + 1,
            text,
        }
    }
}

impl fmt::Display for NodeSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}` at {}:{} ({})",
            self.kind, self.line, self.column, self.text
        )
    }
}
