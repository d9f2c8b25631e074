//! Pass 1: Constant table -- evaluate every `const` in source order and
//! reject redefinitions.

use crate::ast::Definition;
use crate::error::{CompileError, ErrorKind, Site};
use crate::ir::ConstantTable;
use crate::value::eval_value;

pub fn resolve_constants(definitions: &[Definition]) -> Result<ConstantTable, CompileError> {
    let mut constants = ConstantTable::new();

    for def in definitions {
        let Definition::Const(c) = def else {
            continue;
        };
        let site = Site::new(1, "Const", &c.name);
        if constants.contains(&c.name) {
            return Err(site.error(
                ErrorKind::Redefinition,
                Some(c.loc),
                format!("constant {} redefinition", c.name),
            ));
        }
        let value = eval_value(&c.value, &site)?;
        constants.insert_new(c.name.clone(), value);
    }

    Ok(constants)
}
