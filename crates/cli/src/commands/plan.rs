use std::path::Path;
use std::process;

use bytesnap_codegen::build_plan;

use crate::{config, report_error, OutputFormat};

pub(crate) fn cmd_plan(file: &Path, config_path: Option<&Path>, output: OutputFormat, quiet: bool) {
    let ir = super::compile_or_exit(file, output, quiet);

    let config = match config::resolve(file, config_path) {
        Ok(c) => c,
        Err(e) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    };
    tracing::info!("planning project {}", config.project);

    let plan = match build_plan(&ir, &config) {
        Ok(p) => p,
        Err(e) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    };

    let pretty = serde_json::to_string_pretty(&plan.to_json_value())
        .unwrap_or_else(|e| format!("serialization error: {}", e));
    println!("{}", pretty);
}
