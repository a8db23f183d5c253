use tree_sitter::Node;

/// Extract UTF-8 text from a tree-sitter node, returning `""` on failure.
pub fn txt<'a>(node: Node, src: &'a [u8]) -> &'a str {
    node.utf8_text(src).unwrap_or("")
}

/// Strip surrounding quotes (`'`, `"`, `` ` ``) from a string literal.
pub fn trim_quotes(s: &str) -> &str {
    s.trim_matches(|c: char| c == '\'' || c == '"' || c == '`')
}

/// Named, non-extra children of a node (comments are extras).
pub fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    let children = node
        .named_children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect();
    children
}

/// Convert a file stem into the PascalCase namespace a consumer imports it as.
///
/// Splits on `-`, `_`, `.` and whitespace: `date-utils` → `DateUtils`,
/// `QFile` stays `QFile`.
pub fn pascal_case(stem: &str) -> String {
    stem.split(|c: char| c == '-' || c == '_' || c == '.' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
