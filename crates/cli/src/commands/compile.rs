use std::path::Path;

use crate::OutputFormat;

/// The IR is printed as pretty JSON in both output modes.
pub(crate) fn cmd_compile(file: &Path, output: OutputFormat, quiet: bool) {
    let ir = super::compile_or_exit(file, output, quiet);
    let pretty = serde_json::to_string_pretty(&ir.to_json_value())
        .unwrap_or_else(|e| format!("serialization error: {}", e));
    println!("{}", pretty);
}
