//! Six-pass compiler: Bytesnap IDL source -> validated [`Ir`].
//!
//! A thin orchestrator that runs each pass in order. Each pass consumes the
//! previous pass's output; the first failure stops the pipeline and no
//! partial IR is returned.

use crate::diagnostics::Diagnostics;
use crate::error::CompileError;
use crate::ir::Ir;
use crate::parser;
use crate::pass1_constants;
use crate::pass2_structs;
use crate::pass3_struct_validate;
use crate::pass4_services;
use crate::pass5_service_validate;
use crate::pass6_options;
use std::path::Path;

/// Compile one IDL document. The terminating error, if any, is also
/// recorded in `diags`.
pub fn compile(source: &str, diags: &mut Diagnostics) -> Result<Ir, CompileError> {
    let result = run_passes(source, diags);
    if let Err(e) = &result {
        diags.error(e);
    }
    result
}

/// Read and compile the document at `path`.
pub fn compile_file(path: &Path, diags: &mut Diagnostics) -> Result<Ir, CompileError> {
    let source = std::fs::read_to_string(path).map_err(|e| {
        let err = CompileError::io(format!("cannot read {}: {}", path.display(), e));
        diags.error(&err);
        err
    })?;
    diags.debug(format!("read {} bytes from {}", source.len(), path.display()));
    compile(&source, diags)
}

fn run_passes(source: &str, diags: &mut Diagnostics) -> Result<Ir, CompileError> {
    // Pass 0: lex + parse
    let definitions = parser::parse_source(source)?;
    diags.debug(format!("parsed {} definitions", definitions.len()));

    // Pass 1: constants
    let constants = pass1_constants::resolve_constants(&definitions)?;
    diags.info(format!("{} constants resolved", constants.len()));

    // Pass 2: struct resolution (types still provisional)
    let resolved = pass2_structs::resolve_structs(&definitions, &constants)?;

    // Pass 3: struct validation, forward references now visible
    let structs = pass3_struct_validate::validate_structs(resolved)?;
    diags.info(format!("{} structs validated", structs.len()));

    // Pass 4: service resolution
    let services = pass4_services::resolve_services(&definitions, &constants, &structs)?;

    // Pass 5: service validation
    let services = pass5_service_validate::validate_services(services, &structs)?;
    diags.info(format!("{} services validated", services.len()));

    // Pass 6: options
    let options = pass6_options::collect_options(&definitions, diags);

    Ok(Ir::new(constants, structs, services, options))
}
