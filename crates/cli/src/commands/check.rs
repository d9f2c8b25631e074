use std::path::Path;

use bytesnap_core::Ir;
use serde::Serialize;

use crate::OutputFormat;

#[derive(Debug, Serialize)]
struct CheckSummary {
    ok: bool,
    file: String,
    constants: usize,
    structs: usize,
    fields: usize,
    services: usize,
    methods: usize,
    options: usize,
}

impl CheckSummary {
    fn of(file: &Path, ir: &Ir) -> Self {
        CheckSummary {
            ok: true,
            file: file.display().to_string(),
            constants: ir.constants().len(),
            structs: ir.structs().len(),
            fields: ir.structs().values().map(|s| s.len()).sum(),
            services: ir.services().len(),
            methods: ir.services().values().map(|s| s.methods().len()).sum(),
            options: ir.options().len(),
        }
    }
}

pub(crate) fn cmd_check(file: &Path, output: OutputFormat, quiet: bool) {
    let ir = super::compile_or_exit(file, output, quiet);
    let summary = CheckSummary::of(file, &ir);

    match output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)
                .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
            println!("{}", json);
        }
        OutputFormat::Text => {
            if quiet {
                return;
            }
            println!("{}: ok", summary.file);
            println!("  Constants: {}", summary.constants);
            println!("  Structs: {} ({} fields)", summary.structs, summary.fields);
            println!(
                "  Services: {} ({} methods)",
                summary.services, summary.methods
            );
            println!("  Options: {}", summary.options);

            for (name, svc) in ir.services().iter() {
                let ids: Vec<String> = svc
                    .method_ids()
                    .into_iter()
                    .map(|(id, method)| format!("{}={}", id, method))
                    .collect();
                println!("  [{}] {}", name, ids.join(", "));
            }
        }
    }
}
