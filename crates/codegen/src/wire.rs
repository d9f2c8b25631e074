//! Wire sizes of the fixed-width primitives and of structs built only
//! from them.

use bytesnap_core::{FieldClass, Primitive, StructTable};
use std::collections::{HashMap, HashSet};

/// Encoded size in bytes, or `None` for the variable-length `string`.
pub fn wire_size(primitive: Primitive) -> Option<u32> {
    match primitive {
        Primitive::U8 | Primitive::I8 => Some(1),
        Primitive::U16 | Primitive::I16 => Some(2),
        Primitive::U32 | Primitive::I32 | Primitive::Float => Some(4),
        Primitive::U64 | Primitive::I64 | Primitive::Double => Some(8),
        Primitive::String => None,
    }
}

/// Encoded size of one struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StructSize {
    Fixed(u64),
    /// Holds a string, a vector or a struct cycle.
    Variable,
    /// Every field is fixed-width but the total does not fit in a `u64`.
    Overflow,
}

impl StructSize {
    fn add(self, other: StructSize) -> StructSize {
        match (self, other) {
            (StructSize::Variable, _) | (_, StructSize::Variable) => StructSize::Variable,
            (StructSize::Fixed(a), StructSize::Fixed(b)) => {
                a.checked_add(b).map_or(StructSize::Overflow, StructSize::Fixed)
            }
            _ => StructSize::Overflow,
        }
    }
}

/// Computes the encoded size of structs whose every field is a
/// fixed-width primitive or another fixed-size struct. Vectors, strings
/// and struct cycles make a struct variable-size.
pub(crate) struct FixedSizes<'a> {
    structs: &'a StructTable,
    memo: HashMap<String, StructSize>,
}

impl<'a> FixedSizes<'a> {
    pub(crate) fn new(structs: &'a StructTable) -> Self {
        FixedSizes {
            structs,
            memo: HashMap::new(),
        }
    }

    pub(crate) fn of(&mut self, name: &str) -> StructSize {
        let mut visiting = HashSet::new();
        self.compute(name, &mut visiting)
    }

    fn compute(&mut self, name: &str, visiting: &mut HashSet<String>) -> StructSize {
        if let Some(size) = self.memo.get(name) {
            return *size;
        }
        if !visiting.insert(name.to_string()) {
            return StructSize::Variable;
        }
        let structs = self.structs;
        let mut total = StructSize::Fixed(0);
        if let Some(desc) = structs.get(name) {
            for (_, field) in desc.fields() {
                let size = match field.classify() {
                    FieldClass::ScalarPrimitive => field
                        .primitive()
                        .and_then(wire_size)
                        .map_or(StructSize::Variable, |n| StructSize::Fixed(u64::from(n))),
                    FieldClass::ScalarUserDefined => self.compute(field.typename(), visiting),
                    _ => StructSize::Variable,
                };
                total = total.add(size);
            }
        } else {
            total = StructSize::Variable;
        }
        visiting.remove(name);
        self.memo.insert(name.to_string(), total);
        total
    }
}
