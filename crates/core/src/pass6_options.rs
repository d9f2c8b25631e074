//! Pass 6: Options -- free-form string settings. A repeated key overwrites
//! the earlier value and is reported as a warning, never an error.

use crate::ast::Definition;
use crate::diagnostics::Diagnostics;
use crate::ir::OptionsTable;

pub fn collect_options(definitions: &[Definition], diags: &mut Diagnostics) -> OptionsTable {
    let mut options = OptionsTable::new();
    for def in definitions {
        let Definition::Options(block) = def else {
            continue;
        };
        for entry in &block.entries {
            if let Some(previous) = options.upsert(entry.key.clone(), entry.value.clone()) {
                diags.warning(
                    Some(entry.loc),
                    format!(
                        "option {} redefined, replacing \"{}\" with \"{}\"",
                        entry.key, previous, entry.value
                    ),
                );
            }
        }
    }
    options
}
