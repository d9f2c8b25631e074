pub(crate) mod check;
pub(crate) mod compile;
pub(crate) mod plan;

use std::path::Path;

use bytesnap_core::Ir;

use crate::{exit_with_compile_error, new_diagnostics, report_warnings, OutputFormat};

/// Compile `file`, reporting warnings; exits the process on failure.
pub(crate) fn compile_or_exit(file: &Path, output: OutputFormat, quiet: bool) -> Ir {
    let mut diags = new_diagnostics();
    match bytesnap_core::compile_file(file, &mut diags) {
        Ok(ir) => {
            report_warnings(&diags, output, quiet);
            ir
        }
        Err(e) => exit_with_compile_error(&e, output, quiet),
    }
}
