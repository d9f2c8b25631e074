//! bytesnap-core: Bytesnap IDL compiler core library.
//!
//! Turns an IDL document describing constants, structs, services and
//! options into a validated intermediate representation for code emitters.
//!
//! # Public API
//!
//! - [`compile()`] -- run the full pipeline over one document
//! - [`Ir`] -- the validated result
//! - [`Diagnostics`] -- per-compilation diagnostic sink
//! - [`CompileError`] / [`ErrorKind`] -- the single terminating error
//!
//! Individual pass entry functions are also re-exported for selective
//! pipeline execution.

/// Version of the RPC wire protocol the IR describes.
pub const RPC_VERSION: &str = "0.1.0";

pub mod ast;
pub mod compile;
pub mod diagnostics;
pub mod error;
pub mod ir;
pub mod lexer;
pub mod parser;
pub mod pass1_constants;
pub mod pass2_structs;
pub mod pass3_struct_validate;
pub mod pass4_services;
pub mod pass5_service_validate;
pub mod pass6_options;
mod value;

// ── Convenience re-exports: key types ────────────────────────────────

pub use ast::{Definition, Location};
pub use diagnostics::{Diagnostic, Diagnostics, Level};
pub use error::{CompileError, ErrorKind};
pub use ir::{
    ConstantTable, FieldClass, Ir, Method, OptionsTable, Primitive, Scalar, ScalarKind,
    ServiceDescriptor, ServiceTable, StructDescriptor, StructTable, TypeDescriptor, Value,
};

// ── Convenience re-exports: pipeline entry points ────────────────────

pub use compile::{compile, compile_file};
pub use parser::parse_source;
pub use pass1_constants::resolve_constants;
pub use pass2_structs::resolve_structs;
pub use pass3_struct_validate::validate_structs;
pub use pass4_services::resolve_services;
pub use pass5_service_validate::validate_services;
pub use pass6_options::collect_options;
