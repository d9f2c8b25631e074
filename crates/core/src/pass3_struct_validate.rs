//! Pass 3: Struct validation -- with every struct now known, classify each
//! field's type, check vector lengths and check defaults against the
//! declared type. Produces the final struct table.

use crate::error::{CompileError, ErrorKind, Site};
use crate::ir::{
    OrderedTable, Primitive, Scalar, StructDescriptor, StructTable, TypeDescriptor, Value,
};
use crate::pass2_structs::{ResolvedField, ResolvedStructs};

pub fn validate_structs(resolved: ResolvedStructs) -> Result<StructTable, CompileError> {
    let mut table = StructTable::new();

    for (struct_name, s) in resolved.iter() {
        let mut fields = OrderedTable::new();
        for (field_name, field) in s.fields.iter() {
            let site = Site::new(3, "Struct", struct_name).with_field(field_name);
            let descriptor = validate_field(field, &resolved, &site)?;
            fields.insert_new(field_name.to_owned(), descriptor);
        }
        table.insert_new(
            struct_name.to_owned(),
            StructDescriptor {
                fields,
                location: s.loc,
            },
        );
    }

    Ok(table)
}

fn validate_field(
    field: &ResolvedField,
    structs: &ResolvedStructs,
    site: &Site<'_>,
) -> Result<TypeDescriptor, CompileError> {
    let prefix = context(site);

    let primitive = Primitive::from_name(&field.typename);
    if primitive.is_none() && !structs.contains(&field.typename) {
        return Err(site.error(
            ErrorKind::UndefinedType,
            Some(field.loc),
            format!("{}: undefined typename {}", prefix, field.typename),
        ));
    }

    let length_spec = match &field.length {
        None => None,
        Some((value, loc)) => {
            let n = match value {
                Value::Scalar(Scalar::Int(n)) => *n,
                other => {
                    return Err(site.error(
                        ErrorKind::InvalidLengthSpec,
                        Some(*loc),
                        format!("{}: non-integer vector length specifier {}", prefix, other),
                    ))
                }
            };
            if n <= 0 {
                return Err(site.error(
                    ErrorKind::InvalidLengthSpec,
                    Some(*loc),
                    format!("{}: non-positive vector length specifier {}", prefix, n),
                ));
            }
            let n = u32::try_from(n).map_err(|_| {
                site.error(
                    ErrorKind::InvalidLengthSpec,
                    Some(*loc),
                    format!("{}: vector length specifier {} out of range", prefix, n),
                )
            })?;
            Some(n)
        }
    };

    if let Some(value) = &field.assigned_value {
        check_assignment(field, primitive, value, site)?;
    }

    Ok(TypeDescriptor {
        typename: field.typename.clone(),
        primitive,
        is_vector: field.is_vector,
        is_userdefined: primitive.is_none(),
        length_spec,
        assigned_value: field.assigned_value.clone(),
        location: field.loc,
    })
}

/// A default must match the field's primitive kind; integers must also fit
/// the declared width. Struct-typed fields take no default at all.
fn check_assignment(
    field: &ResolvedField,
    primitive: Option<Primitive>,
    value: &Value,
    site: &Site<'_>,
) -> Result<(), CompileError> {
    let prefix = context(site);
    let Some(primitive) = primitive else {
        return Err(site.error(
            ErrorKind::UnsupportedAssignment,
            Some(field.loc),
            format!("{}: assignment for user defined types is not supported", prefix),
        ));
    };
    let mismatch = || {
        site.error(
            ErrorKind::TypeMismatch,
            Some(field.loc),
            format!("{}: incompatible type of assigned value {}", prefix, value),
        )
    };

    let items: &[Scalar] = match (field.is_vector, value) {
        (true, Value::List(items)) => items.as_slice(),
        (false, Value::Scalar(s)) => std::slice::from_ref(s),
        _ => return Err(mismatch()),
    };
    let Some(first) = items.first() else {
        return Err(site.error(
            ErrorKind::EmptyOrMixedVector,
            Some(field.loc),
            format!("{}: can not assign empty list", prefix),
        ));
    };
    if first.kind() != primitive.value_kind() {
        return Err(mismatch());
    }

    if let Some((min, max)) = primitive.int_range() {
        for item in items {
            if let Scalar::Int(n) = item {
                if i128::from(*n) < min || i128::from(*n) > max {
                    return Err(site.error(
                        ErrorKind::TypeMismatch,
                        Some(field.loc),
                        format!("{}: value {} out of range for {}", prefix, n, primitive),
                    ));
                }
            }
        }
    }
    Ok(())
}

fn context(site: &Site<'_>) -> String {
    format!(
        "error processing struct {}, field {}",
        site.construct_id,
        site.field.unwrap_or_default()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Location;
    use crate::ir::FieldClass;
    use crate::parser::parse_source;
    use crate::pass1_constants::resolve_constants;
    use crate::pass2_structs::resolve_structs;

    fn run(src: &str) -> Result<StructTable, CompileError> {
        let defs = parse_source(src).expect("should parse");
        let constants = resolve_constants(&defs)?;
        validate_structs(resolve_structs(&defs, &constants)?)
    }

    fn err_kind(src: &str) -> ErrorKind {
        run(src).expect_err("should fail").kind
    }

    #[test]
    fn forward_reference_resolves() {
        let t = run("struct A { b: B }\nstruct B { x: int32_t }").unwrap();
        let b = t.get("A").unwrap().field("b").unwrap();
        assert!(b.is_userdefined());
        assert_eq!(b.classify(), FieldClass::ScalarUserDefined);
        assert!(!t.get("B").unwrap().field("x").unwrap().is_userdefined());
    }

    #[test]
    fn undefined_typename() {
        let err = run("struct A { c: Missing }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UndefinedType);
        assert_eq!(err.pass, 3);
        assert_eq!(
            err.message,
            "error processing struct A, field c: undefined typename Missing"
        );
        assert_eq!(err.location, Some(Location::new(1, 12)));
    }

    #[test]
    fn vector_defaults() {
        assert!(run("struct A { v: vector<int32_t> = {1, 2, 3} }").is_ok());
        assert_eq!(
            err_kind("struct A { v: vector<int32_t> = {1, \"x\"} }"),
            ErrorKind::EmptyOrMixedVector
        );
        assert_eq!(
            err_kind("struct A { v: vector<int32_t> = {} }"),
            ErrorKind::EmptyOrMixedVector
        );
        assert_eq!(
            err_kind("struct A { v: vector<int32_t> = {1.0, 2.0} }"),
            ErrorKind::TypeMismatch
        );
        assert_eq!(
            err_kind("struct A { v: vector<int32_t> = 5 }"),
            ErrorKind::TypeMismatch
        );
    }

    #[test]
    fn scalar_default_kinds() {
        assert!(run("struct A { x: double = 2.5\n s: string = \"hi\"\n n: uint8_t = 0xFF }").is_ok());
        assert_eq!(err_kind("struct A { x: float = 1 }"), ErrorKind::TypeMismatch);
        assert_eq!(err_kind("struct A { n: int32_t = 1.5 }"), ErrorKind::TypeMismatch);
        assert_eq!(err_kind("struct A { s: string = 3 }"), ErrorKind::TypeMismatch);
        assert_eq!(err_kind("struct A { n: int32_t = {1} }"), ErrorKind::TypeMismatch);
    }

    #[test]
    fn integer_defaults_must_fit_width() {
        assert_eq!(err_kind("struct A { n: uint8_t = 256 }"), ErrorKind::TypeMismatch);
        assert_eq!(err_kind("struct A { n: uint16_t = -1 }"), ErrorKind::TypeMismatch);
        assert_eq!(
            err_kind("struct A { v: vector<int8_t> = {1, 200} }"),
            ErrorKind::TypeMismatch
        );
        assert!(run("struct A { n: int8_t = -128 }").is_ok());
    }

    #[test]
    fn user_defined_fields_take_no_default() {
        for default in ["5", "1.5", "\"x\"", "{1, 2}"] {
            let src = format!(
                "struct Other {{ x: int8_t }}\nstruct A {{ other: Other = {} }}",
                default
            );
            assert_eq!(err_kind(&src), ErrorKind::UnsupportedAssignment, "{}", default);
        }
        assert_eq!(
            err_kind("struct Other { x: int8_t }\nstruct A { o: vector<Other> = {1} }"),
            ErrorKind::UnsupportedAssignment
        );
    }

    #[test]
    fn length_specifier_checks() {
        let t = run("const N = 10\nstruct S { nums: vector<uint8_t>(N) }").unwrap();
        assert_eq!(t.get("S").unwrap().field("nums").unwrap().length_spec(), Some(10));

        let err = run("struct S { v: vector<uint8_t>(0) }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidLengthSpec);
        assert!(err.message.contains("non-positive"));

        let err = run("const L = 2.5\nstruct S { v: vector<uint8_t>(L) }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidLengthSpec);
        assert!(err.message.contains("non-integer"));

        assert_eq!(
            err_kind("const L = -3\nstruct S { v: vector<uint8_t>(L) }"),
            ErrorKind::InvalidLengthSpec
        );
        assert_eq!(
            err_kind("struct S { v: vector<uint8_t>(4294967296) }"),
            ErrorKind::InvalidLengthSpec
        );
    }

    #[test]
    fn field_order_is_preserved() {
        let t = run("struct P { z: int8_t\n a: int8_t\n m: string }").unwrap();
        assert_eq!(
            t.get("P").unwrap().field_names().collect::<Vec<_>>(),
            vec!["z", "a", "m"]
        );
    }

    #[test]
    fn classification_covers_every_shape() {
        let t = run(
            "struct Q { a: int16_t\n b: string\n c: vector<double>\n d: vector<string>\n e: vector<Q>\n f: Q }",
        )
        .unwrap();
        let classes: Vec<FieldClass> = t.get("Q").unwrap().fields().map(|(_, f)| f.classify()).collect();
        assert_eq!(
            classes,
            vec![
                FieldClass::ScalarPrimitive,
                FieldClass::String,
                FieldClass::VectorOfPrimitive,
                FieldClass::VectorOfString,
                FieldClass::VectorOfUserDefined,
                FieldClass::ScalarUserDefined,
            ]
        );
    }
}
