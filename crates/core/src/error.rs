use crate::ast::Location;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a compile failure. Every failure is fatal: the first
/// one detected stops the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Syntax,
    Redefinition,
    DuplicateField,
    DuplicateMethod,
    UndefinedType,
    UndefinedConstant,
    InvalidLengthSpec,
    TypeMismatch,
    EmptyOrMixedVector,
    UnsupportedAssignment,
    /// Reserved for literal kinds the value evaluator does not handle. The
    /// current grammar only produces integer, float and string literals.
    UnsupportedValueType,
    /// The source document could not be read.
    Io,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Syntax => "syntax",
            ErrorKind::Redefinition => "redefinition",
            ErrorKind::DuplicateField => "duplicate_field",
            ErrorKind::DuplicateMethod => "duplicate_method",
            ErrorKind::UndefinedType => "undefined_type",
            ErrorKind::UndefinedConstant => "undefined_constant",
            ErrorKind::InvalidLengthSpec => "invalid_length_spec",
            ErrorKind::TypeMismatch => "type_mismatch",
            ErrorKind::EmptyOrMixedVector => "empty_or_mixed_vector",
            ErrorKind::UnsupportedAssignment => "unsupported_assignment",
            ErrorKind::UnsupportedValueType => "unsupported_value_type",
            ErrorKind::Io => "io",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A compile error. Carries the pass that raised it, the construct it was
/// raised against and, when the offending syntax is known, its location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileError {
    pub kind: ErrorKind,
    pub pass: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub construct_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub construct_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub message: String,
}

impl CompileError {
    pub fn new(
        kind: ErrorKind,
        pass: u8,
        construct_kind: Option<&str>,
        construct_id: Option<&str>,
        field: Option<&str>,
        location: Option<Location>,
        message: impl Into<String>,
    ) -> Self {
        CompileError {
            kind,
            pass,
            construct_kind: construct_kind.map(str::to_owned),
            construct_id: construct_id.map(str::to_owned),
            field: field.map(str::to_owned),
            location,
            message: message.into(),
        }
    }

    pub fn syntax(location: Location, message: impl Into<String>) -> Self {
        CompileError::new(ErrorKind::Syntax, 0, None, None, None, Some(location), message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        CompileError::new(ErrorKind::Io, 0, None, None, None, None, message)
    }

    /// Serialize to JSON with every key present (null for missing parts),
    /// which keeps the CLI error output shape stable.
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "construct_id":   self.construct_id,
            "construct_kind": self.construct_kind,
            "field":          self.field,
            "kind":           self.kind,
            "location":       self.location,
            "message":        self.message,
            "pass":           self.pass,
        })
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(loc) => write!(f, "{}: {}", loc, self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for CompileError {}

/// Where inside the document an error is being reported from. Passes build
/// one per construct (and per field) and create errors through it so the
/// pass number and construct identity are filled consistently.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Site<'a> {
    pub pass: u8,
    pub construct_kind: &'static str,
    pub construct_id: &'a str,
    pub field: Option<&'a str>,
}

impl<'a> Site<'a> {
    pub fn new(pass: u8, construct_kind: &'static str, construct_id: &'a str) -> Self {
        Site {
            pass,
            construct_kind,
            construct_id,
            field: None,
        }
    }

    pub fn with_field(self, field: &'a str) -> Self {
        Site {
            field: Some(field),
            ..self
        }
    }

    pub fn error(
        &self,
        kind: ErrorKind,
        location: Option<Location>,
        message: impl Into<String>,
    ) -> CompileError {
        CompileError::new(
            kind,
            self.pass,
            Some(self.construct_kind),
            Some(self.construct_id),
            self.field,
            location,
            message,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_location_when_known() {
        let e = CompileError::syntax(Location::new(3, 7), "expected '}'");
        assert_eq!(e.to_string(), "at line 3, column 7: expected '}'");
    }

    #[test]
    fn display_without_location_is_bare_message() {
        let e = Site::new(5, "Service", "Nav").error(
            ErrorKind::UndefinedType,
            None,
            "undefined request struct type Foo",
        );
        assert_eq!(e.to_string(), "undefined request struct type Foo");
        assert_eq!(e.construct_id.as_deref(), Some("Nav"));
    }

    #[test]
    fn json_value_has_every_key() {
        let e = CompileError::io("cannot read file");
        let v = e.to_json_value();
        assert_eq!(v["kind"], "io");
        assert!(v["location"].is_null());
        assert!(v["construct_kind"].is_null());
        assert_eq!(v["pass"], 0);
    }
}
