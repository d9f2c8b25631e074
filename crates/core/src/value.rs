//! Literal evaluation shared by constant resolution and field defaults.

use crate::ast::{ScalarNode, ValueNode};
use crate::error::{CompileError, ErrorKind, Site};
use crate::ir::{Scalar, Value};

pub(crate) fn eval_scalar(node: &ScalarNode) -> Scalar {
    match node {
        ScalarNode::Int(n) => Scalar::Int(*n),
        ScalarNode::Float(x) => Scalar::Float(*x),
        ScalarNode::Str(s) => Scalar::Str(s.clone()),
    }
}

/// Evaluate a literal into a [`Value`]. Lists must be non-empty and every
/// element must have the kind of the first one.
pub(crate) fn eval_value(node: &ValueNode, site: &Site<'_>) -> Result<Value, CompileError> {
    match node {
        ValueNode::Scalar { scalar, .. } => Ok(Value::Scalar(eval_scalar(scalar))),
        ValueNode::Vector { elements, loc } => {
            let items: Vec<Scalar> = elements.iter().map(eval_scalar).collect();
            let Some(first) = items.first() else {
                return Err(site.error(
                    ErrorKind::EmptyOrMixedVector,
                    Some(*loc),
                    "can not assign empty list",
                ));
            };
            let kind = first.kind();
            if let Some(odd) = items.iter().find(|s| s.kind() != kind) {
                return Err(site.error(
                    ErrorKind::EmptyOrMixedVector,
                    Some(*loc),
                    format!(
                        "can not mix different value types in the vector ({} and {})",
                        kind,
                        odd.kind()
                    ),
                ));
            }
            Ok(Value::List(items))
        }
    }
}
