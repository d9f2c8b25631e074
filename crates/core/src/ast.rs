//! Syntax tree for Bytesnap IDL documents.
//!
//! Produced by the parser and consumed by the semantic passes. Every
//! construct is its own variant, so passes match on shape once instead of
//! re-inspecting nodes.

use serde::{Deserialize, Serialize};
use std::fmt;

// ──────────────────────────────────────────────
// Location
// ──────────────────────────────────────────────

/// 1-based line and column of the first character of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub fn new(line: u32, column: u32) -> Self {
        Location { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at line {}, column {}", self.line, self.column)
    }
}

// ──────────────────────────────────────────────
// Definitions
// ──────────────────────────────────────────────

/// One top-level definition of a document.
#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    Const(ConstDef),
    Struct(StructDef),
    Service(ServiceDef),
    Options(OptionsDef),
}

impl Definition {
    pub fn location(&self) -> Location {
        match self {
            Definition::Const(c) => c.loc,
            Definition::Struct(s) => s.loc,
            Definition::Service(s) => s.loc,
            Definition::Options(o) => o.loc,
        }
    }
}

/// `const NAME = value`
#[derive(Debug, Clone, PartialEq)]
pub struct ConstDef {
    pub name: String,
    pub value: ValueNode,
    pub loc: Location,
}

/// `struct NAME { field+ }`
#[derive(Debug, Clone, PartialEq)]
pub struct StructDef {
    pub name: String,
    pub fields: Vec<FieldDef>,
    pub loc: Location,
}

/// `NAME : typename (= assignment)?` -- `loc` is the field name.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub type_: TypeNode,
    pub assignment: Option<AssignmentNode>,
    pub loc: Location,
}

/// `service NAME { method+ }`
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDef {
    pub name: String,
    pub methods: Vec<MethodDef>,
    pub loc: Location,
}

/// `NAME : REQUEST -> RESPONSE`
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDef {
    pub name: String,
    pub request: String,
    pub response: String,
    pub loc: Location,
}

/// `options { (NAME = STRING)+ }`
#[derive(Debug, Clone, PartialEq)]
pub struct OptionsDef {
    pub entries: Vec<OptionEntry>,
    pub loc: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptionEntry {
    pub key: String,
    pub value: String,
    pub loc: Location,
}

// ──────────────────────────────────────────────
// Types
// ──────────────────────────────────────────────

/// A field's declared type as written.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeNode {
    /// A primitive keyword or a struct name.
    Simple(String),
    /// `vector<ELEMENT>` with an optional `(length)`.
    Vector {
        element: String,
        length: Option<LengthNode>,
    },
}

impl TypeNode {
    pub fn typename(&self) -> &str {
        match self {
            TypeNode::Simple(name) => name,
            TypeNode::Vector { element, .. } => element,
        }
    }
}

/// The parenthesized capacity of a vector type.
#[derive(Debug, Clone, PartialEq)]
pub enum LengthNode {
    Literal { value: i64, loc: Location },
    Constant { name: String, loc: Location },
}

impl LengthNode {
    pub fn location(&self) -> Location {
        match self {
            LengthNode::Literal { loc, .. } | LengthNode::Constant { loc, .. } => *loc,
        }
    }
}

/// Right-hand side of a field default.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentNode {
    Value(ValueNode),
    Constant { name: String, loc: Location },
}

// ──────────────────────────────────────────────
// Values
// ──────────────────────────────────────────────

/// A literal scalar. Hex and binary integers are normalized by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarNode {
    Int(i64),
    Float(f64),
    Str(String),
}

/// A literal value: one scalar, or a brace-delimited list of scalars.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueNode {
    Scalar { scalar: ScalarNode, loc: Location },
    Vector { elements: Vec<ScalarNode>, loc: Location },
}

impl ValueNode {
    pub fn location(&self) -> Location {
        match self {
            ValueNode::Scalar { loc, .. } | ValueNode::Vector { loc, .. } => *loc,
        }
    }
}
