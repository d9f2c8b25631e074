//! The intermediate representation handed to code emitters.
//!
//! Everything here is built by the semantic passes and is read-only from
//! outside the crate. Tables keep declaration order, which matters for the
//! wire: struct fields are encoded in the order they were declared.

use crate::ast::Location;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

// ──────────────────────────────────────────────
// OrderedTable
// ──────────────────────────────────────────────

/// Name-keyed table that iterates in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedTable<T> {
    entries: Vec<(String, T)>,
    index: HashMap<String, usize>,
}

impl<T> Default for OrderedTable<T> {
    fn default() -> Self {
        OrderedTable {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> OrderedTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Insert a new entry. Returns `false` and leaves the table untouched if
    /// the name is already present.
    pub(crate) fn insert_new(&mut self, name: String, value: T) -> bool {
        if self.index.contains_key(&name) {
            return false;
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, value));
        true
    }

    /// Insert or overwrite. An overwritten entry keeps its original position
    /// and its previous value is returned.
    pub(crate) fn upsert(&mut self, name: String, value: T) -> Option<T> {
        match self.index.get(&name) {
            Some(&i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, value));
                None
            }
        }
    }
}

impl<T> IntoIterator for OrderedTable<T> {
    type Item = (String, T);
    type IntoIter = std::vec::IntoIter<(String, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<T: Serialize> Serialize for OrderedTable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

// ──────────────────────────────────────────────
// Values
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    Integer,
    Float,
    String,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScalarKind::Integer => "integer",
            ScalarKind::Float => "float",
            ScalarKind::String => "string",
        })
    }
}

/// A resolved scalar constant or default.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Int(_) => ScalarKind::Integer,
            Scalar::Float(_) => ScalarKind::Float,
            Scalar::Str(_) => ScalarKind::String,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(n) => write!(f, "{}", n),
            Scalar::Float(x) => write!(f, "{:?}", x),
            Scalar::Str(s) => write!(f, "{:?}", s),
        }
    }
}

/// A scalar or a non-empty, kind-homogeneous list of scalars.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(Scalar),
    List(Vec<Scalar>),
}

impl Value {
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            Value::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Scalar]> {
        match self {
            Value::Scalar(_) => None,
            Value::List(items) => Some(items),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(s) => write!(f, "{}", s),
            Value::List(items) => {
                f.write_str("{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("}")
            }
        }
    }
}

// ──────────────────────────────────────────────
// Types
// ──────────────────────────────────────────────

/// Built-in field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Primitive {
    #[serde(rename = "uint8_t")]
    U8,
    #[serde(rename = "uint16_t")]
    U16,
    #[serde(rename = "uint32_t")]
    U32,
    #[serde(rename = "uint64_t")]
    U64,
    #[serde(rename = "int8_t")]
    I8,
    #[serde(rename = "int16_t")]
    I16,
    #[serde(rename = "int32_t")]
    I32,
    #[serde(rename = "int64_t")]
    I64,
    #[serde(rename = "float")]
    Float,
    #[serde(rename = "double")]
    Double,
    #[serde(rename = "string")]
    String,
}

impl Primitive {
    pub const ALL: [Primitive; 11] = [
        Primitive::U8,
        Primitive::U16,
        Primitive::U32,
        Primitive::U64,
        Primitive::I8,
        Primitive::I16,
        Primitive::I32,
        Primitive::I64,
        Primitive::Float,
        Primitive::Double,
        Primitive::String,
    ];

    pub fn from_name(name: &str) -> Option<Primitive> {
        Primitive::ALL.into_iter().find(|p| p.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Primitive::U8 => "uint8_t",
            Primitive::U16 => "uint16_t",
            Primitive::U32 => "uint32_t",
            Primitive::U64 => "uint64_t",
            Primitive::I8 => "int8_t",
            Primitive::I16 => "int16_t",
            Primitive::I32 => "int32_t",
            Primitive::I64 => "int64_t",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::String => "string",
        }
    }

    /// The literal kind a default value for this type must have.
    pub fn value_kind(self) -> ScalarKind {
        match self {
            Primitive::Float | Primitive::Double => ScalarKind::Float,
            Primitive::String => ScalarKind::String,
            _ => ScalarKind::Integer,
        }
    }

    /// Inclusive value range of the integer types.
    pub fn int_range(self) -> Option<(i128, i128)> {
        let range = match self {
            Primitive::U8 => (0, u8::MAX as i128),
            Primitive::U16 => (0, u16::MAX as i128),
            Primitive::U32 => (0, u32::MAX as i128),
            Primitive::U64 => (0, u64::MAX as i128),
            Primitive::I8 => (i8::MIN as i128, i8::MAX as i128),
            Primitive::I16 => (i16::MIN as i128, i16::MAX as i128),
            Primitive::I32 => (i32::MIN as i128, i32::MAX as i128),
            Primitive::I64 => (i64::MIN as i128, i64::MAX as i128),
            Primitive::Float | Primitive::Double | Primitive::String => return None,
        };
        Some(range)
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Encode/decode strategy a field needs. This is the complete set of
/// categories an emitter has to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldClass {
    ScalarPrimitive,
    String,
    VectorOfPrimitive,
    VectorOfString,
    VectorOfUserDefined,
    ScalarUserDefined,
}

/// Fully resolved type of one struct field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDescriptor {
    pub(crate) typename: String,
    pub(crate) primitive: Option<Primitive>,
    pub(crate) is_vector: bool,
    pub(crate) is_userdefined: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) length_spec: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) assigned_value: Option<Value>,
    #[serde(skip)]
    pub(crate) location: Location,
}

impl TypeDescriptor {
    pub fn typename(&self) -> &str {
        &self.typename
    }

    /// `None` for struct-typed fields.
    pub fn primitive(&self) -> Option<Primitive> {
        self.primitive
    }

    pub fn is_vector(&self) -> bool {
        self.is_vector
    }

    pub fn is_userdefined(&self) -> bool {
        self.is_userdefined
    }

    /// Fixed capacity of a vector field, if one was declared.
    pub fn length_spec(&self) -> Option<u32> {
        self.length_spec
    }

    pub fn assigned_value(&self) -> Option<&Value> {
        self.assigned_value.as_ref()
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn classify(&self) -> FieldClass {
        match (self.is_vector, self.primitive) {
            (false, Some(Primitive::String)) => FieldClass::String,
            (false, Some(_)) => FieldClass::ScalarPrimitive,
            (false, None) => FieldClass::ScalarUserDefined,
            (true, Some(Primitive::String)) => FieldClass::VectorOfString,
            (true, Some(_)) => FieldClass::VectorOfPrimitive,
            (true, None) => FieldClass::VectorOfUserDefined,
        }
    }
}

/// A struct: its fields in declaration (wire) order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructDescriptor {
    pub(crate) fields: OrderedTable<TypeDescriptor>,
    #[serde(skip)]
    pub(crate) location: Location,
}

impl StructDescriptor {
    pub fn fields(&self) -> impl Iterator<Item = (&str, &TypeDescriptor)> {
        self.fields.iter()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.names()
    }

    pub fn field(&self, name: &str) -> Option<&TypeDescriptor> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn location(&self) -> Location {
        self.location
    }
}

// ──────────────────────────────────────────────
// Services
// ──────────────────────────────────────────────

/// One RPC method. `id` is the wire dispatch code: its 0-based position in
/// the service's declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Method {
    pub(crate) id: u32,
    pub(crate) name: String,
    pub(crate) request: String,
    pub(crate) response: String,
    #[serde(skip)]
    pub(crate) location: Location,
}

impl Method {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn request(&self) -> &str {
        &self.request
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn location(&self) -> Location {
        self.location
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceDescriptor {
    pub(crate) methods: Vec<Method>,
    #[serde(skip)]
    pub(crate) method_names: HashSet<String>,
    #[serde(skip)]
    pub(crate) location: Location,
}

impl ServiceDescriptor {
    pub(crate) fn new(location: Location) -> Self {
        ServiceDescriptor {
            methods: Vec::new(),
            method_names: HashSet::new(),
            location,
        }
    }

    /// Append a method, assigning the next dispatch id. Returns `false` if
    /// the name is already taken in this service.
    pub(crate) fn append_method(
        &mut self,
        name: &str,
        request: &str,
        response: &str,
        location: Location,
    ) -> bool {
        if !self.method_names.insert(name.to_owned()) {
            return false;
        }
        self.methods.push(Method {
            id: self.methods.len() as u32,
            name: name.to_owned(),
            request: request.to_owned(),
            response: response.to_owned(),
            location,
        });
        true
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// `(id, name)` pairs in declaration order.
    pub fn method_ids(&self) -> Vec<(u32, &str)> {
        self.methods.iter().map(|m| (m.id, m.name.as_str())).collect()
    }

    pub fn location(&self) -> Location {
        self.location
    }
}

// ──────────────────────────────────────────────
// Ir
// ──────────────────────────────────────────────

pub type ConstantTable = OrderedTable<Value>;
pub type StructTable = OrderedTable<StructDescriptor>;
pub type ServiceTable = OrderedTable<ServiceDescriptor>;
pub type OptionsTable = OrderedTable<String>;

/// A fully validated document. Only [`crate::compile()`] produces one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ir {
    constants: ConstantTable,
    structs: StructTable,
    services: ServiceTable,
    options: OptionsTable,
}

impl Ir {
    pub(crate) fn new(
        constants: ConstantTable,
        structs: StructTable,
        services: ServiceTable,
        options: OptionsTable,
    ) -> Self {
        Ir {
            constants,
            structs,
            services,
            options,
        }
    }

    pub fn constants(&self) -> &ConstantTable {
        &self.constants
    }

    pub fn structs(&self) -> &StructTable {
        &self.structs
    }

    pub fn services(&self) -> &ServiceTable {
        &self.services
    }

    pub fn options(&self) -> &OptionsTable {
        &self.options
    }

    pub fn to_json_value(&self) -> serde_json::Value {
        // Plain maps, lists and scalars only; this cannot fail.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_table_keeps_insertion_order() {
        let mut t = OrderedTable::new();
        assert!(t.insert_new("b".to_owned(), 1));
        assert!(t.insert_new("a".to_owned(), 2));
        assert!(!t.insert_new("b".to_owned(), 3));
        assert_eq!(t.names().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(t.get("b"), Some(&1));
    }

    #[test]
    fn upsert_overwrites_in_place() {
        let mut t = OrderedTable::new();
        t.upsert("k".to_owned(), "1".to_owned());
        t.upsert("j".to_owned(), "2".to_owned());
        assert_eq!(t.upsert("k".to_owned(), "3".to_owned()), Some("1".to_owned()));
        assert_eq!(
            t.iter().collect::<Vec<_>>(),
            vec![("k", &"3".to_owned()), ("j", &"2".to_owned())]
        );
    }

    #[test]
    fn ordered_table_serializes_as_ordered_map() {
        let mut t = OrderedTable::new();
        t.insert_new("z".to_owned(), Value::Scalar(Scalar::Int(1)));
        t.insert_new("a".to_owned(), Value::List(vec![Scalar::Str("x".into())]));
        assert_eq!(serde_json::to_string(&t).unwrap(), r#"{"z":1,"a":["x"]}"#);
    }

    #[test]
    fn primitive_lookup_and_kinds() {
        assert_eq!(Primitive::from_name("uint16_t"), Some(Primitive::U16));
        assert_eq!(Primitive::from_name("Point"), None);
        assert_eq!(Primitive::Double.value_kind(), ScalarKind::Float);
        assert_eq!(Primitive::I8.int_range(), Some((-128, 127)));
        assert_eq!(Primitive::String.int_range(), None);
    }

    #[test]
    fn method_ids_follow_declaration_order() {
        let mut svc = ServiceDescriptor::new(Location::new(1, 1));
        for name in ["zeta", "alpha", "mid"] {
            assert!(svc.append_method(name, "Req", "Resp", Location::new(1, 1)));
        }
        assert!(!svc.append_method("alpha", "Req", "Resp", Location::new(1, 1)));
        assert_eq!(svc.method_ids(), vec![(0, "zeta"), (1, "alpha"), (2, "mid")]);
    }

    #[test]
    fn value_display() {
        let v = Value::List(vec![Scalar::Int(1), Scalar::Int(2)]);
        assert_eq!(v.to_string(), "{1, 2}");
        assert_eq!(Value::Scalar(Scalar::Float(1.0)).to_string(), "1.0");
        assert_eq!(Value::Scalar(Scalar::Str("a".into())).to_string(), "\"a\"");
    }
}
