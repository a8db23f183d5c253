use tree_sitter::Node;

use crate::error::ExtractionError;
use crate::model::{Category, Descriptor};
use crate::params::serialize_params;
use crate::syntax::{constructor_parameters, parameter_list, Declaration};

/// Turn one declaration into its descriptor. Pure: the same node always
/// yields the same descriptor.
pub fn classify(
    declaration: Declaration,
    accessor: &str,
    is_exported: bool,
    src: &[u8],
) -> Result<Descriptor, ExtractionError> {
    let (category, params) = match declaration {
        Declaration::Variable => (Category::Variable, None),
        Declaration::Class(node) => (Category::Class, Some(class_params(node, src)?)),
        Declaration::Function(node) => (
            Category::Function,
            Some(serialize_params(&parameter_list(node), src)?),
        ),
    };

    Ok(Descriptor {
        category,
        is_exported,
        accessor: accessor.to_string(),
        params,
    })
}

fn class_params(class: Node, src: &[u8]) -> Result<String, ExtractionError> {
    let params = constructor_parameters(class, src).unwrap_or_default();
    serialize_params(&params, src)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;

    fn first_node(tree: &tree_sitter::Tree) -> Node<'_> {
        tree.root_node().named_child(0).unwrap()
    }

    #[test]
    fn classifies_variable_without_params() {
        let d = classify(Declaration::Variable, "size", false, b"").unwrap();
        assert_eq!(d.category, Category::Variable);
        assert_eq!(d.accessor, "size");
        assert!(!d.is_exported);
        assert!(d.params.is_none());
    }

    #[test]
    fn classifies_class_by_constructor() {
        let src = "class Widget { render () {} constructor (el, opts = {}) {} }";
        let tree = parse_source(src, "js").unwrap();
        let d = classify(Declaration::Class(first_node(&tree)), "Widget", true, src.as_bytes())
            .unwrap();
        assert_eq!(d.category, Category::Class);
        assert_eq!(d.params.as_deref(), Some("el, /* opts */ {}"));
    }

    #[test]
    fn class_without_constructor_has_empty_params() {
        let src = "class Empty extends Base { run () {} }";
        let tree = parse_source(src, "js").unwrap();
        let d = classify(Declaration::Class(first_node(&tree)), "Empty", false, src.as_bytes())
            .unwrap();
        assert_eq!(d.params.as_deref(), Some(""));
    }

    #[test]
    fn classifies_function_params() {
        let src = "function greet (name, { loud }) {}";
        let tree = parse_source(src, "js").unwrap();
        let d = classify(Declaration::Function(first_node(&tree)), "greet", true, src.as_bytes())
            .unwrap();
        assert_eq!(d.category, Category::Function);
        assert_eq!(d.params.as_deref(), Some("name, { loud }"));
    }

    #[test]
    fn classification_is_deterministic() {
        let src = "function f (a = new Set([]), b = x.y) {}";
        let tree = parse_source(src, "js").unwrap();
        let node = first_node(&tree);
        let first = classify(Declaration::Function(node), "f", false, src.as_bytes()).unwrap();
        let second = classify(Declaration::Function(node), "f", false, src.as_bytes()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn bad_parameter_propagates() {
        let src = "function f (...args) {}";
        let tree = parse_source(src, "js").unwrap();
        let err = classify(Declaration::Function(first_node(&tree)), "f", false, src.as_bytes())
            .unwrap_err();
        assert!(matches!(err, ExtractionError::UnknownParameterShape(_)));
    }
}
