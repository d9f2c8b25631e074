//! Pass 2: Struct resolution -- build a provisional descriptor for every
//! field. Typenames are not checked yet because structs declared later in
//! the document are not visible until this pass has finished.

use crate::ast::{AssignmentNode, Definition, FieldDef, LengthNode, Location, TypeNode};
use crate::error::{CompileError, ErrorKind, Site};
use crate::ir::{ConstantTable, OrderedTable, Scalar, Value};
use crate::value::eval_value;

/// A field whose type name and length have not been checked yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedField {
    pub typename: String,
    pub is_vector: bool,
    /// The length specifier exactly as resolved: a literal integer or the
    /// value of the named constant, whatever its kind.
    pub length: Option<(Value, Location)>,
    pub assigned_value: Option<Value>,
    pub loc: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStruct {
    pub fields: OrderedTable<ResolvedField>,
    pub loc: Location,
}

pub type ResolvedStructs = OrderedTable<ResolvedStruct>;

pub fn resolve_structs(
    definitions: &[Definition],
    constants: &ConstantTable,
) -> Result<ResolvedStructs, CompileError> {
    let mut structs = ResolvedStructs::new();

    for def in definitions {
        let Definition::Struct(s) = def else {
            continue;
        };
        let site = Site::new(2, "Struct", &s.name);
        if structs.contains(&s.name) {
            return Err(site.error(
                ErrorKind::Redefinition,
                Some(s.loc),
                format!("structure {} redefinition", s.name),
            ));
        }
        if constants.contains(&s.name) {
            return Err(site.error(
                ErrorKind::Redefinition,
                Some(s.loc),
                format!("constant with same name {} defined", s.name),
            ));
        }

        let mut fields = OrderedTable::new();
        for field in &s.fields {
            let site = site.with_field(&field.name);
            let resolved = resolve_field(field, constants, &site)?;
            if !fields.insert_new(field.name.clone(), resolved) {
                return Err(site.error(
                    ErrorKind::DuplicateField,
                    Some(field.loc),
                    format!("field with name {} already defined", field.name),
                ));
            }
        }
        structs.insert_new(s.name.clone(), ResolvedStruct { fields, loc: s.loc });
    }

    Ok(structs)
}

fn resolve_field(
    field: &FieldDef,
    constants: &ConstantTable,
    site: &Site<'_>,
) -> Result<ResolvedField, CompileError> {
    let assigned_value = match &field.assignment {
        None => None,
        Some(AssignmentNode::Constant { name, loc }) => {
            Some(lookup_constant(constants, name, *loc, "assignment", site)?)
        }
        Some(AssignmentNode::Value(node)) => Some(eval_value(node, site)?),
    };

    let (is_vector, length) = match &field.type_ {
        TypeNode::Simple(_) => (false, None),
        TypeNode::Vector { length, .. } => {
            let length = match length {
                None => None,
                Some(LengthNode::Literal { value, loc }) => {
                    Some((Value::Scalar(Scalar::Int(*value)), *loc))
                }
                Some(LengthNode::Constant { name, loc }) => Some((
                    lookup_constant(constants, name, *loc, "vector length specifier", site)?,
                    *loc,
                )),
            };
            (true, length)
        }
    };

    Ok(ResolvedField {
        typename: field.type_.typename().to_owned(),
        is_vector,
        length,
        assigned_value,
        loc: field.loc,
    })
}

fn lookup_constant(
    constants: &ConstantTable,
    name: &str,
    loc: Location,
    position: &str,
    site: &Site<'_>,
) -> Result<Value, CompileError> {
    constants.get(name).cloned().ok_or_else(|| {
        site.error(
            ErrorKind::UndefinedConstant,
            Some(loc),
            format!("error in {}: undefined constant {}", position, name),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;
    use crate::pass1_constants::resolve_constants;

    fn run(src: &str) -> Result<ResolvedStructs, CompileError> {
        let defs = parse_source(src).expect("should parse");
        let constants = resolve_constants(&defs)?;
        resolve_structs(&defs, &constants)
    }

    #[test]
    fn length_from_constant() {
        let structs = run("const N = 10\nstruct S { nums: vector<uint8_t>(N) }").unwrap();
        let f = structs.get("S").unwrap().fields.get("nums").unwrap();
        assert!(f.is_vector);
        assert_eq!(f.length.as_ref().map(|(v, _)| v), Some(&Value::Scalar(Scalar::Int(10))));
    }

    #[test]
    fn undefined_length_constant() {
        let err = run("struct S { nums: vector<uint8_t>(N) }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UndefinedConstant);
        assert_eq!(err.field.as_deref(), Some("nums"));
        assert_eq!(err.location, Some(Location::new(1, 34)));
        assert_eq!(err.message, "error in vector length specifier: undefined constant N");
    }

    #[test]
    fn undefined_assignment_constant() {
        let err = run("struct S { n: int32_t = MISSING }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UndefinedConstant);
        assert!(err.message.contains("assignment"));
    }

    #[test]
    fn assignment_from_constant_is_copied() {
        let structs = run("const D = {1, 2}\nstruct S { v: vector<int32_t> = D }").unwrap();
        let f = structs.get("S").unwrap().fields.get("v").unwrap();
        assert_eq!(
            f.assigned_value,
            Some(Value::List(vec![Scalar::Int(1), Scalar::Int(2)]))
        );
    }

    #[test]
    fn struct_redefinition() {
        let err = run("struct A { x: int8_t }\nstruct A { y: int8_t }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Redefinition);
        assert_eq!(err.message, "structure A redefinition");
        assert_eq!(err.location, Some(Location::new(2, 1)));
    }

    #[test]
    fn struct_named_like_constant() {
        let err = run("const Point = 1\nstruct Point { x: float }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Redefinition);
        assert_eq!(err.message, "constant with same name Point defined");
    }

    #[test]
    fn duplicate_field() {
        let err = run("struct A { x: int8_t\n x: int16_t }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateField);
        assert_eq!(err.location, Some(Location::new(2, 2)));
    }

    #[test]
    fn forward_references_are_not_checked_yet() {
        let structs = run("struct A { b: B }").unwrap();
        assert_eq!(structs.get("A").unwrap().fields.get("b").unwrap().typename, "B");
    }
}
