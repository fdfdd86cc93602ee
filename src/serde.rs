//! JSON-deserializable structure definitions.
//!
//! These types describe the *shape* of a structure so it can be shipped as a
//! configuration file instead of being registered in code. Compile them with
//! `StructureDescriptor::try_from(def)`.
//!
//! ```json
//! {
//!   "byte_ordering": "Little",
//!   "size_bytes": 4,
//!   "fields": [
//!     { "name": "source", "first_bit": 0, "bit_length": 6, "kind": { "type": "Integer" } },
//!     { "name": "enable", "first_bit": 6, "bit_length": 1, "kind": { "type": "Boolean" } }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    descriptor::StructureDescriptor,
    field::{FieldDescriptor, FieldKind},
    ray::ByteOrdering,
};

/// Top-level structure definition.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct StructureDef {
    /// Fields in declaration order.
    pub fields: Vec<FieldDef>,
    /// Explicit size in bytes; deduced from the fields when absent.
    #[serde(default)]
    pub size_bytes: Option<usize>,
    /// Defaults to big-endian.
    #[serde(default)]
    pub byte_ordering: ByteOrdering,
}

/// Description of a single bit field.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FieldDef {
    pub name: String,
    /// Offset of the field's least significant bit.
    pub first_bit: usize,
    pub bit_length: usize,
    /// Inherits the structure's ordering when absent.
    #[serde(default)]
    pub byte_ordering: Option<ByteOrdering>,
    /// Constant fields are encoded but never decoded.
    #[serde(default)]
    pub constant: bool,
    pub kind: FieldKindDef,
}

/// Kind of value held by a field.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum FieldKindDef {
    Integer,
    Boolean,
    /// Named constants with integer codes. Compiling fails if none are given.
    Enumerated {
        #[serde(default)]
        constants: Option<Vec<EnumConstantDef>>,
    },
    /// A structure nested inside this one.
    Nested { structure: Box<StructureDef> },
    /// Any other tag. Rejected when compiling.
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct EnumConstantDef {
    pub name: String,
    pub code: u64,
}

impl From<&StructureDescriptor> for StructureDef {
    fn from(descriptor: &StructureDescriptor) -> Self {
        StructureDef {
            fields: descriptor.fields().iter().map(FieldDef::from).collect(),
            size_bytes: descriptor.details().size_bytes,
            byte_ordering: descriptor.byte_ordering(),
        }
    }
}

impl From<&FieldDescriptor> for FieldDef {
    fn from(field: &FieldDescriptor) -> Self {
        let kind = match &field.kind {
            FieldKind::Integer => FieldKindDef::Integer,
            FieldKind::Boolean => FieldKindDef::Boolean,
            FieldKind::Enumerated(codes) => FieldKindDef::Enumerated {
                constants: Some(
                    codes
                        .iter()
                        .map(|(name, code)| EnumConstantDef {
                            name: name.to_string(),
                            code,
                        })
                        .collect(),
                ),
            },
            FieldKind::Nested(structure) => FieldKindDef::Nested {
                structure: Box::new(StructureDef::from(structure.as_ref())),
            },
        };

        FieldDef {
            name: field.name.clone(),
            first_bit: field.first_bit,
            bit_length: field.bit_length,
            byte_ordering: field.byte_ordering,
            constant: field.constant,
            kind,
        }
    }
}
