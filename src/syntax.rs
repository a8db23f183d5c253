//! Closed views over the tree-sitter nodes this crate understands.
//!
//! tree-sitter hands out stringly-typed nodes; everything downstream matches
//! on the enums here instead, so an unrecognized shape surfaces as an explicit
//! `Unknown` variant or error rather than falling through.

use tree_sitter::Node;

use crate::error::{ExtractionError, NodeSnapshot};
use crate::util::{named_children, trim_quotes, txt};

/// The shapes a parameter (or a default value inside one) can take.
#[derive(Debug)]
pub enum ParamShape<'t> {
    Arrow { params: Vec<Node<'t>> },
    Identifier(String),
    Literal(String),
    New { callee: Node<'t>, args: Vec<Node<'t>> },
    Member { object: Node<'t>, property: String },
    ObjectPattern { values: Vec<Node<'t>> },
    ObjectLiteral,
    ArrayLiteral,
    Defaulted { binding: Node<'t>, value: Node<'t> },
    Unknown(Node<'t>),
}

impl<'t> ParamShape<'t> {
    pub fn of(node: Node<'t>, src: &[u8]) -> Self {
        match node.kind() {
            "parenthesized_expression" => match named_children(node).first() {
                Some(inner) => Self::of(*inner, src),
                None => Self::Unknown(node),
            },
            // TypeScript wraps every formal parameter; the type annotation
            // and accessibility modifiers are irrelevant here.
            "required_parameter" | "optional_parameter" => {
                let Some(pattern) = node.child_by_field_name("pattern") else {
                    return Self::Unknown(node);
                };
                match node.child_by_field_name("value") {
                    Some(value) => Self::Defaulted {
                        binding: pattern,
                        value,
                    },
                    None => Self::of(pattern, src),
                }
            }
            "assignment_pattern" | "object_assignment_pattern" => {
                match (
                    node.child_by_field_name("left"),
                    node.child_by_field_name("right"),
                ) {
                    (Some(binding), Some(value)) => Self::Defaulted { binding, value },
                    _ => Self::Unknown(node),
                }
            }
            "arrow_function" => Self::Arrow {
                params: parameter_list(node),
            },
            "identifier"
            | "shorthand_property_identifier"
            | "shorthand_property_identifier_pattern"
            | "undefined" => Self::Identifier(txt(node, src).to_string()),
            "number" => Self::Literal(number_value(txt(node, src))),
            "string" => Self::Literal(string_value(node, src)),
            "true" | "false" | "null" | "regex" => Self::Literal(txt(node, src).to_string()),
            "new_expression" => match node.child_by_field_name("constructor") {
                Some(callee) => Self::New {
                    callee,
                    args: node
                        .child_by_field_name("arguments")
                        .map(named_children)
                        .unwrap_or_default(),
                },
                None => Self::Unknown(node),
            },
            "member_expression" => {
                match (
                    node.child_by_field_name("object"),
                    node.child_by_field_name("property"),
                ) {
                    (Some(object), Some(property)) => Self::Member {
                        object,
                        property: txt(property, src).to_string(),
                    },
                    _ => Self::Unknown(node),
                }
            }
            // `a['b']` and `a[0]` read as member access with a literal key.
            "subscript_expression" => {
                let object = node.child_by_field_name("object");
                let property = node.child_by_field_name("index").and_then(|index| {
                    match index.kind() {
                        "string" => Some(string_value(index, src)),
                        "number" => Some(number_value(txt(index, src))),
                        _ => None,
                    }
                });
                match (object, property) {
                    (Some(object), Some(property)) => Self::Member { object, property },
                    _ => Self::Unknown(node),
                }
            }
            "object_pattern" => Self::ObjectPattern {
                values: named_children(node)
                    .into_iter()
                    .map(|prop| match prop.kind() {
                        "pair_pattern" => prop.child_by_field_name("value").unwrap_or(prop),
                        _ => prop,
                    })
                    .collect(),
            },
            "object" => Self::ObjectLiteral,
            "array" => Self::ArrayLiteral,
            _ => Self::Unknown(node),
        }
    }
}

/// The parameter nodes of a function-like node (declaration, expression,
/// method, or arrow function).
///
/// TypeScript's `this: T` pseudo-parameter binds nothing and is left out.
pub fn parameter_list(node: Node) -> Vec<Node> {
    if let Some(single) = node.child_by_field_name("parameter") {
        return vec![single];
    }
    node.child_by_field_name("parameters")
        .map(named_children)
        .unwrap_or_default()
        .into_iter()
        .filter(|param| !is_this_parameter(*param))
        .collect()
}

fn is_this_parameter(param: Node) -> bool {
    param.kind() == "required_parameter"
        && param
            .child_by_field_name("pattern")
            .is_some_and(|pattern| pattern.kind() == "this")
}

/// The parameters of the first `constructor` method in a class body.
pub fn constructor_parameters<'t>(class: Node<'t>, src: &[u8]) -> Option<Vec<Node<'t>>> {
    let body = class.child_by_field_name("body")?;
    named_children(body)
        .into_iter()
        .filter(|member| member.kind() == "method_definition")
        .find(|method| {
            method
                .child_by_field_name("name")
                .is_some_and(|name| trim_quotes(txt(name, src)) == "constructor")
        })
        .map(parameter_list)
}

/// What a top-level declaration binds.
#[derive(Debug, Clone, Copy)]
pub enum Declaration<'t> {
    Variable,
    Class(Node<'t>),
    Function(Node<'t>),
}

/// One local name introduced by a top-level statement.
#[derive(Debug)]
pub struct Binding<'t> {
    pub name: String,
    pub declaration: Declaration<'t>,
}

/// One `key: local` entry of a default-exported object literal.
#[derive(Debug)]
pub struct ReExportEntry<'t> {
    pub key: String,
    pub local: String,
    pub node: Node<'t>,
}

/// The recognized forms of `export default ...`.
#[derive(Debug)]
pub enum DefaultExport<'t> {
    ReExportMap(Vec<ReExportEntry<'t>>),
    Function(Node<'t>),
    Class(Node<'t>),
}

/// A top-level statement, as far as export analysis is concerned.
#[derive(Debug)]
pub enum TopLevel<'t> {
    Bindings {
        bindings: Vec<Binding<'t>>,
        exported: bool,
    },
    DefaultExport(DefaultExport<'t>),
    Ignored,
}

impl<'t> TopLevel<'t> {
    pub fn of(node: Node<'t>, src: &[u8]) -> Result<Self, ExtractionError> {
        match node.kind() {
            "export_statement" => lower_export(node, src),
            _ => Ok(lower_declaration(node, src, false)?.map_or(Self::Ignored, |bindings| {
                Self::Bindings {
                    bindings,
                    exported: false,
                }
            })),
        }
    }
}

type Lowered<'t> = Result<Option<Vec<Binding<'t>>>, ExtractionError>;

/// Lower a declaration node into its bindings. `None` means the node is not
/// a runtime declaration at all.
fn lower_declaration<'t>(node: Node<'t>, src: &[u8], exported: bool) -> Lowered<'t> {
    let named = |declaration: Declaration<'t>| -> Lowered<'t> {
        let name = node
            .child_by_field_name("name")
            .ok_or_else(|| unknown_export(node, src))?;
        Ok(Some(vec![Binding {
            name: txt(name, src).to_string(),
            declaration,
        }]))
    };

    match node.kind() {
        "lexical_declaration" | "variable_declaration" => {
            variable_bindings(node, src, exported).map(Some)
        }
        "function_declaration" | "generator_function_declaration" => {
            named(Declaration::Function(node))
        }
        "class_declaration" | "abstract_class_declaration" => named(Declaration::Class(node)),
        "enum_declaration" => named(Declaration::Variable),
        _ => Ok(None),
    }
}

fn variable_bindings<'t>(
    node: Node<'t>,
    src: &[u8],
    exported: bool,
) -> Result<Vec<Binding<'t>>, ExtractionError> {
    let mut bindings = Vec::new();
    for declarator in named_children(node) {
        if declarator.kind() != "variable_declarator" {
            continue;
        }
        let Some(name) = declarator.child_by_field_name("name") else {
            continue;
        };
        if name.kind() != "identifier" {
            // Destructured locals bind no single accessor.
            if exported {
                return Err(unknown_export(declarator, src));
            }
            tracing::trace!(kind = name.kind(), "skipping destructured declarator");
            continue;
        }
        bindings.push(Binding {
            name: txt(name, src).to_string(),
            declaration: Declaration::Variable,
        });
    }
    Ok(bindings)
}

fn is_type_only(kind: &str) -> bool {
    matches!(
        kind,
        "interface_declaration"
            | "type_alias_declaration"
            | "ambient_declaration"
            | "function_signature"
    )
}

fn lower_export<'t>(node: Node<'t>, src: &[u8]) -> Result<TopLevel<'t>, ExtractionError> {
    let keywords: Vec<&str> = {
        let mut cursor = node.walk();
        let kinds = node
            .children(&mut cursor)
            .filter(|c| !c.is_named())
            .map(|c| c.kind())
            .collect();
        kinds
    };
    // `export type { A }` and `export type { A } from './a'`.
    if keywords.contains(&"type") {
        return Ok(TopLevel::Ignored);
    }
    if node.child_by_field_name("source").is_some() {
        return Err(unknown_export(node, src));
    }
    let is_default = keywords.contains(&"default");

    if let Some(declaration) = node.child_by_field_name("declaration") {
        if is_type_only(declaration.kind()) {
            return Ok(TopLevel::Ignored);
        }
        if is_default {
            return match declaration.kind() {
                "function_declaration" | "generator_function_declaration" => {
                    Ok(TopLevel::DefaultExport(DefaultExport::Function(declaration)))
                }
                "class_declaration" | "abstract_class_declaration" => {
                    Ok(TopLevel::DefaultExport(DefaultExport::Class(declaration)))
                }
                _ => Err(unknown_export(declaration, src)),
            };
        }
        return match lower_declaration(declaration, src, true)? {
            Some(bindings) => Ok(TopLevel::Bindings {
                bindings,
                exported: true,
            }),
            None => Err(unknown_export(declaration, src)),
        };
    }

    match node.child_by_field_name("value") {
        Some(value) if is_default => lower_default_value(value, src).map(TopLevel::DefaultExport),
        // `export { a }`, `export * from ...` and anything else without a
        // declaration.
        _ => Err(unknown_export(node, src)),
    }
}

fn lower_default_value<'t>(
    value: Node<'t>,
    src: &[u8],
) -> Result<DefaultExport<'t>, ExtractionError> {
    match value.kind() {
        "object" => named_children(value)
            .into_iter()
            .map(|prop| re_export_entry(prop, src))
            .collect::<Result<Vec<_>, _>>()
            .map(DefaultExport::ReExportMap),
        "function_expression" | "function" | "generator_function" | "arrow_function" => {
            Ok(DefaultExport::Function(value))
        }
        "class" => Ok(DefaultExport::Class(value)),
        "parenthesized_expression" => match named_children(value).first() {
            Some(inner) => lower_default_value(*inner, src),
            None => Err(unknown_export(value, src)),
        },
        _ => Err(unknown_export(value, src)),
    }
}

fn re_export_entry<'t>(prop: Node<'t>, src: &[u8]) -> Result<ReExportEntry<'t>, ExtractionError> {
    match prop.kind() {
        "shorthand_property_identifier" => {
            let name = txt(prop, src).to_string();
            Ok(ReExportEntry {
                key: name.clone(),
                local: name,
                node: prop,
            })
        }
        "pair" => {
            let key = prop
                .child_by_field_name("key")
                .ok_or_else(|| unknown_export(prop, src))?;
            let key = match key.kind() {
                "property_identifier" | "number" => txt(key, src).to_string(),
                "string" => string_value(key, src),
                _ => return Err(unknown_export(key, src)),
            };
            let value = prop
                .child_by_field_name("value")
                .ok_or_else(|| unknown_export(prop, src))?;
            if value.kind() != "identifier" {
                return Err(unknown_export(value, src));
            }
            Ok(ReExportEntry {
                key,
                local: txt(value, src).to_string(),
                node: prop,
            })
        }
        _ => Err(unknown_export(prop, src)),
    }
}

fn unknown_export(node: Node, src: &[u8]) -> ExtractionError {
    ExtractionError::UnknownExportDeclarationShape(NodeSnapshot::of(node, src))
}

/// The value of a numeric literal as JavaScript would print it.
fn number_value(raw: &str) -> String {
    let clean: String = raw.chars().filter(|c| *c != '_').collect();
    let (digits, bigint) = match clean.strip_suffix('n') {
        Some(digits) => (digits.to_ascii_lowercase(), true),
        None => (clean.to_ascii_lowercase(), false),
    };

    for (prefix, radix) in [("0x", 16), ("0o", 8), ("0b", 2)] {
        if let Some(rest) = digits.strip_prefix(prefix) {
            return match u128::from_str_radix(rest, radix) {
                Ok(v) if bigint => v.to_string(),
                Ok(v) => js_number(v as f64),
                Err(_) => raw.to_string(),
            };
        }
    }
    if bigint {
        return digits;
    }

    match digits.parse::<f64>() {
        Ok(v) => js_number(v),
        Err(_) => raw.to_string(),
    }
}

/// Format like JavaScript's `Number.prototype.toString()`: plain decimals in
/// `[1e-6, 1e21)`, exponent form with an explicit sign outside it.
fn js_number(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let abs = v.abs();
    if abs == 0.0 || (1e-6..1e21).contains(&abs) {
        return format!("{v}");
    }
    let exp = format!("{v:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}

/// The unquoted, unescaped contents of a string literal.
fn string_value(node: Node, src: &[u8]) -> String {
    let mut out = String::new();
    for part in named_children(node) {
        match part.kind() {
            "escape_sequence" => out.push_str(&decode_escape(txt(part, src))),
            _ => out.push_str(txt(part, src)),
        }
    }
    out
}

fn decode_escape(seq: &str) -> String {
    let body = seq.strip_prefix('\\').unwrap_or(seq);
    let mut chars = body.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let hex = |digits: &str| {
        u32::from_str_radix(digits.trim_matches(|c| c == '{' || c == '}'), 16)
            .ok()
            .and_then(char::from_u32)
            .map_or_else(|| seq.to_string(), String::from)
    };

    match first {
        'n' => "\n".to_string(),
        't' => "\t".to_string(),
        'r' => "\r".to_string(),
        'b' => "\u{8}".to_string(),
        'f' => "\u{c}".to_string(),
        'v' => "\u{b}".to_string(),
        '0' if body.len() == 1 => "\0".to_string(),
        'x' | 'u' => hex(chars.as_str()),
        // Line continuation.
        '\n' | '\r' | '\u{2028}' | '\u{2029}' => String::new(),
        other => other.to_string(),
    }
}
