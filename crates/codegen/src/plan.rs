//! Emit plan: everything an emitter needs from the IR, flattened into
//! declaration-ordered lists.
//!
//! The plan does not contain target-language text. It records, per field,
//! the encode/decode strategy and wire size; per struct, the headers it
//! depends on; per service, the dispatch table keyed by method ID.

use crate::config::ProjectConfig;
use crate::error::CodegenError;
use crate::wire::{wire_size, FixedSizes, StructSize};
use bytesnap_core::{FieldClass, Ir, StructDescriptor, Value, RPC_VERSION};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanHeader {
    pub project: String,
    pub version: String,
    pub description: String,
    pub author: String,
    pub rpc_version: String,
    pub max_message_size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstantPlan {
    pub name: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldPlan {
    pub name: String,
    pub typename: String,
    pub class: FieldClass,
    /// Bytes per element for fixed-width primitives.
    pub wire_size: Option<u32>,
    /// Element count for length-constrained vectors.
    pub fixed_length: Option<u32>,
    pub default: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructPlan {
    pub name: String,
    /// User-defined types this struct refers to, first-seen order.
    pub includes: Vec<String>,
    pub fields: Vec<FieldPlan>,
    /// Total encoded size when every field is fixed-width.
    pub fixed_size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchEntry {
    pub id: u32,
    pub method: String,
    pub request: String,
    pub response: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServicePlan {
    pub name: String,
    pub dispatch: Vec<DispatchEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionPlan {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmitPlan {
    pub header: PlanHeader,
    pub constants: Vec<ConstantPlan>,
    pub structs: Vec<StructPlan>,
    pub services: Vec<ServicePlan>,
    pub options: Vec<OptionPlan>,
}

impl EmitPlan {
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    pub fn struct_plan(&self, name: &str) -> Option<&StructPlan> {
        self.structs.iter().find(|s| s.name == name)
    }

    pub fn service_plan(&self, name: &str) -> Option<&ServicePlan> {
        self.services.iter().find(|s| s.name == name)
    }
}

/// Build the emit plan for a compiled document.
pub fn build_plan(ir: &Ir, config: &ProjectConfig) -> Result<EmitPlan, CodegenError> {
    config.validate()?;

    let header = PlanHeader {
        project: config.project.clone(),
        version: config.version.clone(),
        description: config.description.clone(),
        author: config.author.clone(),
        rpc_version: RPC_VERSION.to_string(),
        max_message_size: config.max_message_size,
    };

    let constants = ir
        .constants()
        .iter()
        .map(|(name, value)| ConstantPlan {
            name: name.to_string(),
            value: value.clone(),
        })
        .collect();

    let mut sizes = FixedSizes::new(ir.structs());
    let mut structs = Vec::with_capacity(ir.structs().len());
    for (name, desc) in ir.structs().iter() {
        let fixed_size = match sizes.of(name) {
            StructSize::Variable => None,
            StructSize::Fixed(size) if size <= config.max_message_size => Some(size),
            StructSize::Fixed(size) => {
                return Err(CodegenError::MessageTooLarge {
                    name: name.to_string(),
                    size,
                    limit: config.max_message_size,
                })
            }
            StructSize::Overflow => {
                return Err(CodegenError::SizeOverflow {
                    name: name.to_string(),
                    limit: config.max_message_size,
                })
            }
        };
        structs.push(plan_struct(name, desc, fixed_size));
    }

    let services = ir
        .services()
        .iter()
        .map(|(name, svc)| ServicePlan {
            name: name.to_string(),
            dispatch: svc
                .methods()
                .iter()
                .map(|m| DispatchEntry {
                    id: m.id(),
                    method: m.name().to_string(),
                    request: m.request().to_string(),
                    response: m.response().to_string(),
                })
                .collect(),
        })
        .collect();

    let options = ir
        .options()
        .iter()
        .map(|(key, value)| OptionPlan {
            key: key.to_string(),
            value: value.clone(),
        })
        .collect();

    Ok(EmitPlan {
        header,
        constants,
        structs,
        services,
        options,
    })
}

fn plan_struct(name: &str, desc: &StructDescriptor, fixed_size: Option<u64>) -> StructPlan {
    let mut includes: Vec<String> = Vec::new();
    let mut fields = Vec::with_capacity(desc.len());
    for (field_name, field) in desc.fields() {
        if field.is_userdefined() && !includes.iter().any(|i| i == field.typename()) {
            includes.push(field.typename().to_string());
        }
        fields.push(FieldPlan {
            name: field_name.to_string(),
            typename: field.typename().to_string(),
            class: field.classify(),
            wire_size: field.primitive().and_then(wire_size),
            fixed_length: field.length_spec(),
            default: field.assigned_value().cloned(),
        });
    }
    StructPlan {
        name: name.to_string(),
        includes,
        fields,
        fixed_size,
    }
}
