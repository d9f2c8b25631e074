//! bytesnap-codegen: emitter-side consumer of the Bytesnap IR.
//!
//! Builds an [`EmitPlan`] from a compiled [`bytesnap_core::Ir`] and a
//! [`ProjectConfig`]. Rendering target-language source from the plan is
//! left to the emitters.

pub mod config;
mod error;
pub mod plan;
pub mod wire;

pub use config::ProjectConfig;
pub use error::CodegenError;
pub use plan::{build_plan, DispatchEntry, EmitPlan, FieldPlan, ServicePlan, StructPlan};
pub use wire::wire_size;
