use tree_sitter::Node;

use crate::context::ModuleContext;
use crate::error::{ExportMetaError, ExtractionError};
use crate::model::{ExtractedModule, ModuleMetadata};
use crate::parser::parse_source;
use crate::resolve::{lower_statements, resolve_exports};

/// Extract the exported surface of an already-parsed module.
///
/// Either the whole module is described or an error naming the module and
/// the offending node is returned; there are no partial results.
pub fn extract_module(
    root: Node,
    src: &[u8],
    ctx: &ModuleContext,
) -> Result<ExtractedModule, ExportMetaError> {
    extract_tree(root, src, ctx).map_err(|e| e.in_module(&ctx.source_id))
}

/// Parse `source` with the grammar for `ext`, then extract it.
pub fn extract_source(
    source: &str,
    ext: &str,
    ctx: &ModuleContext,
) -> Result<ExtractedModule, ExportMetaError> {
    let tree = parse_source(source, ext)?;
    extract_module(tree.root_node(), source.as_bytes(), ctx)
}

fn extract_tree(
    root: Node,
    src: &[u8],
    ctx: &ModuleContext,
) -> Result<ExtractedModule, ExtractionError> {
    let statements = lower_statements(root, src)?;
    let resolution = resolve_exports(&statements, &ctx.namespace_name, src)?;
    let metadata = ModuleMetadata::assemble(resolution.resolved)?;

    tracing::debug!(
        module = %ctx.source_id,
        default_export = resolution.exports.has_default_export,
        named_exports = resolution.exports.named_exports.len(),
        "extracted module"
    );

    Ok(ExtractedModule {
        exports: resolution.exports,
        metadata,
    })
}
