use tree_sitter::Node;

use crate::error::{ExtractionError, NodeSnapshot};
use crate::syntax::ParamShape;
use crate::util::{named_children, txt};

/// Reconstruct a top-level parameter list as `a, /* b */ 1, { c }`.
///
/// Each outermost parameter may carry an inline `/* binding */` annotation in
/// front of its default value; nested parameters never do.
pub fn serialize_params(params: &[Node], src: &[u8]) -> Result<String, ExtractionError> {
    join_params(params, src, true)
}

fn join_params(params: &[Node], src: &[u8], annotate: bool) -> Result<String, ExtractionError> {
    let list = params
        .iter()
        .map(|param| serialize_param(*param, src, annotate))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(list.join(", "))
}

/// Render one parameter-position node the way it reads in source.
///
/// `annotate` allows a defaulted parameter to show its binding as an inline
/// comment; without it only the default value is rendered.
pub fn serialize_param(node: Node, src: &[u8], annotate: bool) -> Result<String, ExtractionError> {
    match ParamShape::of(node, src) {
        ParamShape::Arrow { params } => {
            Ok(format!("({}) => {{}}", join_params(&params, src, false)?))
        }
        ParamShape::Identifier(name) => Ok(name),
        ParamShape::Literal(value) => Ok(value),
        ParamShape::New { callee, args } => Ok(format!(
            "new {}({})",
            callee_name(callee, src)?,
            join_params(&args, src, false)?
        )),
        ParamShape::Member { object, property } => {
            Ok(format!("{}.{property}", member_object(object, src)?))
        }
        ParamShape::ObjectPattern { values } => {
            let body = values
                .iter()
                .map(|value| serialize_param(*value, src, annotate))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(format!("{{ {} }}", body.join(", ")))
        }
        ParamShape::ObjectLiteral => Ok("{}".to_string()),
        ParamShape::ArrayLiteral => Ok("[]".to_string()),
        ParamShape::Defaulted { binding, value } => {
            let value = serialize_param(value, src, false)?;
            if annotate {
                let binding = serialize_param(binding, src, false)?;
                Ok(format!("/* {binding} */ {value}"))
            } else {
                Ok(value)
            }
        }
        ParamShape::Unknown(node) => Err(unknown_param(node, src)),
    }
}

/// The left side of a member access: a nested member chain or a plain name.
fn member_object(node: Node, src: &[u8]) -> Result<String, ExtractionError> {
    match node.kind() {
        "identifier" | "this" | "super" => Ok(txt(node, src).to_string()),
        "parenthesized_expression" => match named_children(node).first() {
            Some(inner) => member_object(*inner, src),
            None => Err(unknown_param(node, src)),
        },
        _ => match ParamShape::of(node, src) {
            ParamShape::Member { object, property } => {
                Ok(format!("{}.{property}", member_object(object, src)?))
            }
            _ => Err(unknown_param(node, src)),
        },
    }
}

fn callee_name(node: Node, src: &[u8]) -> Result<String, ExtractionError> {
    match node.kind() {
        "identifier" => Ok(txt(node, src).to_string()),
        "member_expression" | "subscript_expression" => member_object(node, src),
        _ => Err(unknown_param(node, src)),
    }
}

fn unknown_param(node: Node, src: &[u8]) -> ExtractionError {
    ExtractionError::UnknownParameterShape(NodeSnapshot::of(node, src))
}
