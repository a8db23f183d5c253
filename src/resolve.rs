//! Export resolution over a module's top-level statements.
//!
//! Three passes, each taking ownership of the previous pass's table:
//! locals are collected first, `export default` consumes the entries it
//! re-exports, and whatever is still marked exported becomes a named export.

use indexmap::{IndexMap, IndexSet};
use tree_sitter::Node;

use crate::classify::classify;
use crate::error::{ExtractionError, NodeSnapshot};
use crate::model::{Descriptor, ExportSummary};
use crate::syntax::{Declaration, DefaultExport, TopLevel};
use crate::util::named_children;

/// Local declarations by name, in declaration order.
pub type LocalTable = IndexMap<String, Descriptor>;

/// Descriptors keyed by the name they are published under.
pub type Resolved = Vec<(String, Descriptor)>;

/// Result of the default-export pass.
#[derive(Debug, Default)]
pub struct DefaultResolution {
    pub has_default_export: bool,
    pub resolved: Resolved,
}

/// Result of all three passes, ready for assembly.
#[derive(Debug)]
pub struct Resolution {
    pub exports: ExportSummary,
    pub resolved: Resolved,
}

/// Lower every top-level statement of a module.
pub fn lower_statements<'t>(
    root: Node<'t>,
    src: &[u8],
) -> Result<Vec<TopLevel<'t>>, ExtractionError> {
    named_children(root)
        .into_iter()
        .map(|node| TopLevel::of(node, src))
        .collect()
}

/// Run all passes in order.
pub fn resolve_exports(
    statements: &[TopLevel],
    namespace: &str,
    src: &[u8],
) -> Result<Resolution, ExtractionError> {
    let locals = collect_locals(statements, src)?;
    let (residual, defaults) = resolve_defaults(locals, statements, namespace, src)?;
    let (named, named_exports) = collect_named(residual);

    let mut resolved = defaults.resolved;
    resolved.extend(named);

    Ok(Resolution {
        exports: ExportSummary {
            has_default_export: defaults.has_default_export,
            named_exports,
        },
        resolved,
    })
}

/// Pass 1: classify every top-level declaration, exported or not.
pub fn collect_locals(statements: &[TopLevel], src: &[u8]) -> Result<LocalTable, ExtractionError> {
    let mut table = LocalTable::new();

    for statement in statements {
        let TopLevel::Bindings { bindings, exported } = statement else {
            continue;
        };
        for binding in bindings {
            let mut descriptor = classify(binding.declaration, &binding.name, *exported, src)?;
            // A redeclared `var`/function keeps the export mark of either
            // declaration.
            if let Some(previous) = table.get(&binding.name) {
                descriptor.is_exported |= previous.is_exported;
            }
            tracing::trace!(
                name = %binding.name,
                category = %descriptor.category,
                exported = descriptor.is_exported,
                "collected local"
            );
            table.insert(binding.name.clone(), descriptor);
        }
    }

    tracing::debug!(locals = table.len(), "collected top-level declarations");
    Ok(table)
}

/// Pass 2: resolve `export default` statements against the local table.
///
/// Entries referenced by a default-exported object are removed from the
/// table so the named pass cannot publish them a second time.
pub fn resolve_defaults(
    mut table: LocalTable,
    statements: &[TopLevel],
    namespace: &str,
    src: &[u8],
) -> Result<(LocalTable, DefaultResolution), ExtractionError> {
    let mut out = DefaultResolution::default();

    for statement in statements {
        let TopLevel::DefaultExport(default) = statement else {
            continue;
        };
        match default {
            DefaultExport::ReExportMap(entries) => {
                for entry in entries {
                    let Some(mut descriptor) = table.shift_remove(&entry.local) else {
                        return Err(ExtractionError::DanglingReExportReference {
                            name: entry.local.clone(),
                            node: NodeSnapshot::of(entry.node, src),
                        });
                    };
                    descriptor.accessor = format!("{namespace}.{}", entry.key);
                    descriptor.is_exported = true;
                    tracing::debug!(
                        local = %entry.local,
                        accessor = %descriptor.accessor,
                        "re-exported through default object"
                    );
                    out.resolved.push((entry.key.clone(), descriptor));
                    out.has_default_export = true;
                }
            }
            DefaultExport::Function(node) => {
                let descriptor = classify(Declaration::Function(*node), namespace, true, src)?;
                out.resolved.push(("default".to_string(), descriptor));
                out.has_default_export = true;
            }
            DefaultExport::Class(node) => {
                let descriptor = classify(Declaration::Class(*node), namespace, true, src)?;
                out.resolved.push(("default".to_string(), descriptor));
                out.has_default_export = true;
            }
        }
    }

    Ok((table, out))
}

/// Pass 3: publish what is still marked exported under its local name.
pub fn collect_named(table: LocalTable) -> (Resolved, IndexSet<String>) {
    let mut resolved = Vec::new();
    let mut names = IndexSet::new();

    for (name, mut descriptor) in table {
        if !descriptor.is_exported {
            continue;
        }
        descriptor.accessor = name.clone();
        names.insert(name.clone());
        resolved.push((name, descriptor));
    }

    tracing::debug!(named = names.len(), "collected named exports");
    (resolved, names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;
    use crate::parser::parse_source;

    fn resolve(src: &str) -> Result<Resolution, ExtractionError> {
        let tree = parse_source(src, "js").unwrap();
        let statements = lower_statements(tree.root_node(), src.as_bytes())?;
        resolve_exports(&statements, "Mod", src.as_bytes())
    }

    fn keys(resolution: &Resolution) -> Vec<(&str, &str)> {
        resolution
            .resolved
            .iter()
            .map(|(key, d)| (key.as_str(), d.accessor.as_str()))
            .collect()
    }

    #[test]
    fn collect_locals_includes_unexported_declarations() {
        let src = "const a = 1\nclass B {}\nfunction c () {}\nexport let d = 2";
        let tree = parse_source(src, "js").unwrap();
        let statements = lower_statements(tree.root_node(), src.as_bytes()).unwrap();
        let table = collect_locals(&statements, src.as_bytes()).unwrap();

        let summary: Vec<_> = table
            .iter()
            .map(|(name, d)| (name.as_str(), d.category, d.is_exported))
            .collect();
        assert_eq!(
            summary,
            [
                ("a", Category::Variable, false),
                ("B", Category::Class, false),
                ("c", Category::Function, false),
                ("d", Category::Variable, true),
            ]
        );
    }

    #[test]
    fn default_object_rewrites_accessors() {
        let r = resolve("function greet (name) {}\nconst size = 3\nexport default { greet, big: size }")
            .unwrap();
        assert_eq!(keys(&r), [("greet", "Mod.greet"), ("big", "Mod.big")]);
        assert!(r.exports.has_default_export);
        assert!(r.exports.named_exports.is_empty());
        assert!(r.resolved.iter().all(|(_, d)| d.is_exported));
    }

    #[test]
    fn re_export_takes_precedence_over_named_export() {
        let r = resolve("export function a () {}\nexport const b = 1\nexport default { a }").unwrap();
        assert_eq!(keys(&r), [("a", "Mod.a"), ("b", "b")]);
        assert_eq!(
            r.exports.named_exports.iter().collect::<Vec<_>>(),
            ["b"]
        );
    }

    #[test]
    fn residual_named_exports_keep_declaration_order() {
        let r = resolve("export const z = 1\nconst hidden = 2\nexport function y () {}\nexport class X {}")
            .unwrap();
        assert_eq!(keys(&r), [("z", "z"), ("y", "y"), ("X", "X")]);
        assert_eq!(
            r.exports.named_exports.iter().collect::<Vec<_>>(),
            ["z", "y", "X"]
        );
        assert!(!r.exports.has_default_export);
    }

    #[test]
    fn inline_default_function_uses_namespace() {
        let r = resolve("export default function (el, opts = {}) {}").unwrap();
        assert_eq!(keys(&r), [("default", "Mod")]);
        let d = &r.resolved[0].1;
        assert_eq!(d.category, Category::Function);
        assert_eq!(d.params.as_deref(), Some("el, /* opts */ {}"));
        assert!(r.exports.has_default_export);
    }

    #[test]
    fn inline_default_arrow_uses_namespace() {
        let r = resolve("export default (a, b) => a + b").unwrap();
        assert_eq!(r.resolved[0].1.params.as_deref(), Some("a, b"));
    }

    #[test]
    fn inline_default_class_uses_namespace() {
        let r = resolve("export default class { constructor (x) {} }").unwrap();
        assert_eq!(keys(&r), [("default", "Mod")]);
        assert_eq!(r.resolved[0].1.category, Category::Class);
        assert_eq!(r.resolved[0].1.params.as_deref(), Some("x"));
    }

    #[test]
    fn dangling_reference_is_an_error() {
        let err = resolve("export default { missing }").unwrap_err();
        match err {
            ExtractionError::DanglingReExportReference { name, node } => {
                assert_eq!(name, "missing");
                assert_eq!(node.line, 1);
            }
            other => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn a_local_can_only_be_re_exported_once() {
        let err = resolve("const a = 1\nexport default { a, b: a }").unwrap_err();
        assert!(matches!(err, ExtractionError::DanglingReExportReference { .. }));
    }

    #[test]
    fn declarations_after_default_export_are_visible() {
        // Pass 1 completes before pass 2 starts.
        let r = resolve("export default { late }\nfunction late () {}").unwrap();
        assert_eq!(keys(&r), [("late", "Mod.late")]);
    }

    #[test]
    fn empty_default_object_is_not_a_default_export() {
        let r = resolve("export const a = 1\nexport default {}").unwrap();
        assert!(!r.exports.has_default_export);
        assert_eq!(keys(&r), [("a", "a")]);
    }
}
