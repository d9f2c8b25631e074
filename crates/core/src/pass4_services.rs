//! Pass 4: Service resolution -- collect services and their methods,
//! assigning dispatch ids in declaration order.

use crate::ast::Definition;
use crate::error::{CompileError, ErrorKind, Site};
use crate::ir::{ConstantTable, ServiceDescriptor, ServiceTable, StructTable};

pub fn resolve_services(
    definitions: &[Definition],
    constants: &ConstantTable,
    structs: &StructTable,
) -> Result<ServiceTable, CompileError> {
    let mut services = ServiceTable::new();

    for def in definitions {
        let Definition::Service(svc) = def else {
            continue;
        };
        let site = Site::new(4, "Service", &svc.name);
        let collision = if services.contains(&svc.name) {
            Some(format!("service {} redefinition", svc.name))
        } else if structs.contains(&svc.name) {
            Some(format!("structure with same name {} defined", svc.name))
        } else if constants.contains(&svc.name) {
            Some(format!("constant with same name {} defined", svc.name))
        } else {
            None
        };
        if let Some(message) = collision {
            return Err(site.error(ErrorKind::Redefinition, Some(svc.loc), message));
        }

        let mut descriptor = ServiceDescriptor::new(svc.loc);
        for m in &svc.methods {
            if !descriptor.append_method(&m.name, &m.request, &m.response, m.loc) {
                return Err(site.with_field(&m.name).error(
                    ErrorKind::DuplicateMethod,
                    Some(m.loc),
                    format!("method with name {} already defined", m.name),
                ));
            }
        }
        services.insert_new(svc.name.clone(), descriptor);
    }

    Ok(services)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Location;
    use crate::parser::parse_source;
    use crate::pass1_constants::resolve_constants;
    use crate::pass2_structs::resolve_structs;
    use crate::pass3_struct_validate::validate_structs;

    fn run(src: &str) -> Result<ServiceTable, CompileError> {
        let defs = parse_source(src).expect("should parse");
        let constants = resolve_constants(&defs)?;
        let structs = validate_structs(resolve_structs(&defs, &constants)?)?;
        resolve_services(&defs, &constants, &structs)
    }

    #[test]
    fn ids_are_contiguous_in_declaration_order() {
        let services = run("service S {\n  zulu: A -> B\n  alpha: A -> B\n  mike: A -> B\n}").unwrap();
        let svc = services.get("S").unwrap();
        assert_eq!(svc.method_ids(), vec![(0, "zulu"), (1, "alpha"), (2, "mike")]);
        assert_eq!(svc.method("alpha").unwrap().request(), "A");
    }

    #[test]
    fn ids_restart_per_service() {
        let services = run("service S { a: X -> X }\nservice T { b: X -> X\n c: X -> X }").unwrap();
        assert_eq!(services.get("S").unwrap().method_ids(), vec![(0, "a")]);
        assert_eq!(services.get("T").unwrap().method_ids(), vec![(0, "b"), (1, "c")]);
    }

    #[test]
    fn duplicate_method_in_one_service() {
        let err = run("service S {\n  get: A -> B\n  get: C -> D\n}").unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateMethod);
        assert_eq!(err.field.as_deref(), Some("get"));
        assert_eq!(err.location, Some(Location::new(3, 3)));
    }

    #[test]
    fn same_method_name_in_two_services_is_fine() {
        assert!(run("service S { get: A -> B }\nservice T { get: A -> B }").is_ok());
    }

    #[test]
    fn name_collisions() {
        let err = run("service S { a: X -> X }\nservice S { b: X -> X }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Redefinition);
        assert_eq!(err.message, "service S redefinition");

        let err = run("struct S { x: int8_t }\nservice S { a: S -> S }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Redefinition);
        assert_eq!(err.message, "structure with same name S defined");

        let err = run("const S = 1\nservice S { a: X -> X }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Redefinition);
        assert_eq!(err.message, "constant with same name S defined");
    }
}
