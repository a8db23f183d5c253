use std::path::Path;

use tree_sitter::{Language, Node, Parser, Tree};

use crate::error::ExportMetaError;

/// A parsed module: its syntax tree and the source it was parsed from.
#[derive(Debug)]
pub struct ParsedModule {
    pub tree: Tree,
    pub source: String,
}

/// Detect the tree-sitter language from a file extension.
///
/// JavaScript is parsed with the TypeScript grammar, which is a superset for
/// everything this crate inspects; JSX files need the TSX variant.
pub fn detect_language(ext: &str) -> Result<Language, ExportMetaError> {
    let lower = ext.to_ascii_lowercase();
    match lower.as_str() {
        "tsx" | "jsx" => Ok(tree_sitter_typescript::LANGUAGE_TSX.into()),
        "ts" | "mts" | "cts" | "js" | "mjs" | "cjs" => {
            Ok(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
        }
        _ => Err(ExportMetaError::UnsupportedExtension(ext.to_string())),
    }
}

/// Check whether a file extension can be parsed.
pub fn is_supported_extension(ext: &str) -> bool {
    detect_language(ext).is_ok()
}

/// Parse in-memory source using the grammar for `ext`.
///
/// Trees containing ERROR or MISSING nodes are rejected.
pub fn parse_source(source: &str, ext: &str) -> Result<Tree, ExportMetaError> {
    let language = detect_language(ext)?;

    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| ExportMetaError::ParseFailed(e.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ExportMetaError::ParseFailed("parser returned no tree".to_string()))?;

    if let Some(bad) = first_error(tree.root_node()) {
        let pos = bad.start_position();
        let what = if bad.is_missing() {
            format!("missing `{}`", bad.kind())
        } else {
            "syntax error".to_string()
        };
        return Err(ExportMetaError::ParseFailed(format!(
            "{what} at {}:{}",
            pos.row + 1,
            pos.column + 1
        )));
    }

    Ok(tree)
}

/// Read and parse a source file.
pub fn parse_file(path: &Path) -> Result<ParsedModule, ExportMetaError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    // Fail on the extension before touching the disk.
    detect_language(ext)?;

    let source = std::fs::read_to_string(path).map_err(|e| ExportMetaError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    let tree = parse_source(&source, ext).map_err(|e| match e {
        ExportMetaError::ParseFailed(msg) => {
            ExportMetaError::ParseFailed(format!("{}: {msg}", path.display()))
        }
        other => other,
    })?;

    Ok(ParsedModule { tree, source })
}

fn first_error(node: Node) -> Option<Node> {
    if !node.has_error() {
        return None;
    }
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error).or(Some(node))
}
