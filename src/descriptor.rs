//! Structure descriptor: the validated field list of one structure type, plus its size and byte ordering.

use std::collections::HashSet;

use crate::{
    errors::SchemaError,
    field::{FieldDescriptor, FieldKind},
    ray::ByteOrdering,
};

/// Structure-level layout options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StructureDetails {
    /// Size in bytes. If `None`, the smallest whole number of bytes that fits every field.
    pub size_bytes: Option<usize>,
    /// Byte ordering of the encoded form.
    pub byte_ordering: ByteOrdering,
}

impl StructureDetails {
    pub fn new(byte_ordering: ByteOrdering) -> Self {
        StructureDetails {
            size_bytes: None,
            byte_ordering,
        }
    }

    pub fn with_size_bytes(mut self, size_bytes: usize) -> Self {
        self.size_bytes = Some(size_bytes);
        self
    }
}

/// A compiled structure: fields in declaration order, resolved byte size and ordering.
/// Use [StructureDescriptor::compile] to build one; it is immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureDescriptor {
    fields: Vec<FieldDescriptor>,
    size_bytes: usize,
    details: StructureDetails,
}

impl StructureDescriptor {
    /// Validates `fields` against `details` and resolves the structure size. Overlapping fields are not detected.
    pub fn compile(
        fields: Vec<FieldDescriptor>,
        details: StructureDetails,
    ) -> Result<Self, SchemaError> {
        let mut names = HashSet::with_capacity(fields.len());
        let mut total_bits = 0;

        for field in &fields {
            if !names.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateFieldName(field.name.clone()));
            }

            validate_field(field)?;
            total_bits = total_bits.max(field.end_bit());
        }

        let size_bytes = match details.size_bytes {
            Some(size_bytes) => size_bytes,
            None if fields.is_empty() => return Err(SchemaError::NoFieldsDeclared),
            None => total_bits.div_ceil(8),
        };

        if let Some(field) = fields.iter().find(|f| f.end_bit() > size_bytes * 8) {
            return Err(SchemaError::FieldOutOfBounds {
                field: field.name.clone(),
                end_bit: field.end_bit(),
                size_bytes,
            });
        }

        Ok(StructureDescriptor {
            fields,
            size_bytes,
            details,
        })
    }

    /// All fields, including constant ones, in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields produced by decode: every non-constant field, in declaration order.
    pub fn value_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| !f.constant)
    }

    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    pub fn byte_ordering(&self) -> ByteOrdering {
        self.details.byte_ordering
    }

    pub fn details(&self) -> StructureDetails {
        self.details
    }
}

#[cfg(feature = "serde")]
impl TryFrom<crate::serde::StructureDef> for StructureDescriptor {
    type Error = SchemaError;

    fn try_from(def: crate::serde::StructureDef) -> Result<Self, Self::Error> {
        let fields = def
            .fields
            .into_iter()
            .map(FieldDescriptor::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        StructureDescriptor::compile(
            fields,
            StructureDetails {
                size_bytes: def.size_bytes,
                byte_ordering: def.byte_ordering,
            },
        )
    }
}

fn validate_field(field: &FieldDescriptor) -> Result<(), SchemaError> {
    if field.bit_length == 0 {
        return Err(SchemaError::InvalidFieldSize(field.name.clone()));
    }

    match &field.kind {
        FieldKind::Integer | FieldKind::Enumerated(_) if field.bit_length > 64 => {
            Err(SchemaError::InvalidFieldSize(field.name.clone()))
        }
        FieldKind::Enumerated(codes) if codes.is_empty() => {
            Err(SchemaError::EnumOnNonEnumerable(field.name.clone()))
        }
        FieldKind::Nested(structure) if structure.size_bytes() > field.byte_len() => {
            Err(SchemaError::NestedTooLarge {
                field: field.name.clone(),
                required: structure.size_bytes(),
                available: field.byte_len(),
            })
        }
        _ => Ok(()),
    }
}
