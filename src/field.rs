//! Definition of bit fields used to build a [crate::descriptor::StructureDescriptor].

use std::sync::Arc;

use crate::{descriptor::StructureDescriptor, ray::ByteOrdering};

#[cfg(feature = "serde")]
use crate::errors::SchemaError;

/// A single named bit field: a contiguous run of bits in the structure's conceptual integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Name, unique within the owning structure.
    pub name: String,
    /// Offset of the field's least significant bit.
    pub first_bit: usize,
    /// Width in bits.
    pub bit_length: usize,
    /// Ordering used to compose a nested structure's bytes. `None` inherits the owner's.
    pub byte_ordering: Option<ByteOrdering>,
    /// If true, the field is written on encode but never produced by decode.
    pub constant: bool,
    /// What kind of value the field holds.
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, first_bit: usize, bit_length: usize, kind: FieldKind) -> Self {
        FieldDescriptor {
            name: name.into(),
            first_bit,
            bit_length,
            byte_ordering: None,
            constant: false,
            kind,
        }
    }

    pub fn integer(name: impl Into<String>, first_bit: usize, bit_length: usize) -> Self {
        Self::new(name, first_bit, bit_length, FieldKind::Integer)
    }

    pub fn boolean(name: impl Into<String>, first_bit: usize, bit_length: usize) -> Self {
        Self::new(name, first_bit, bit_length, FieldKind::Boolean)
    }

    pub fn enumerated(
        name: impl Into<String>,
        first_bit: usize,
        bit_length: usize,
        codes: EnumCodeMap,
    ) -> Self {
        Self::new(name, first_bit, bit_length, FieldKind::Enumerated(codes))
    }

    pub fn nested(
        name: impl Into<String>,
        first_bit: usize,
        bit_length: usize,
        structure: Arc<StructureDescriptor>,
    ) -> Self {
        Self::new(name, first_bit, bit_length, FieldKind::Nested(structure))
    }

    /// Marks the field constant: encoded from the instance, skipped by decode.
    pub fn constant(mut self) -> Self {
        self.constant = true;
        self
    }

    pub fn with_byte_ordering(mut self, byte_ordering: ByteOrdering) -> Self {
        self.byte_ordering = Some(byte_ordering);
        self
    }

    /// One past the field's most significant bit.
    pub fn end_bit(&self) -> usize {
        self.first_bit + self.bit_length
    }

    /// Whole bytes needed to hold the field on its own.
    pub fn byte_len(&self) -> usize {
        self.bit_length.div_ceil(8)
    }

    /// The field's ordering, falling back to the owning structure's.
    pub fn ordering_within(&self, owner: ByteOrdering) -> ByteOrdering {
        self.byte_ordering.unwrap_or(owner)
    }
}

/// Closed set of value kinds a field can hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Unsigned integer, at most 64 bits.
    Integer,
    /// Non-zero decodes to `true`; `true` encodes as 1.
    Boolean,
    /// Named constants mapped to integer codes.
    Enumerated(EnumCodeMap),
    /// Another structure, encoded on its own and composed into this one.
    Nested(Arc<StructureDescriptor>),
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Integer => "integer",
            FieldKind::Boolean => "boolean",
            FieldKind::Enumerated(_) => "enumerated",
            FieldKind::Nested(_) => "nested",
        }
    }
}

/// Mapping from enum constant names to their integer codes.
///
/// Codes are expected to be unique; when they are not, decode resolves a code to the
/// first constant declared with it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnumCodeMap {
    constants: Vec<(String, u64)>,
}

impl EnumCodeMap {
    pub fn new<I, S>(constants: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        EnumCodeMap {
            constants: constants
                .into_iter()
                .map(|(name, code)| (name.into(), code))
                .collect(),
        }
    }

    pub fn code_of(&self, constant: &str) -> Option<u64> {
        self.constants
            .iter()
            .find(|(name, _)| name == constant)
            .map(|(_, code)| *code)
    }

    pub fn constant_for(&self, code: u64) -> Option<&str> {
        self.constants
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(name, _)| name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }

    pub fn len(&self) -> usize {
        self.constants.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.constants.iter().map(|(name, code)| (name.as_str(), *code))
    }
}

#[cfg(feature = "serde")]
impl TryFrom<crate::serde::FieldDef> for FieldDescriptor {
    type Error = SchemaError;

    fn try_from(def: crate::serde::FieldDef) -> Result<Self, Self::Error> {
        use crate::serde::FieldKindDef;

        let kind = match def.kind {
            FieldKindDef::Integer => FieldKind::Integer,
            FieldKindDef::Boolean => FieldKind::Boolean,
            FieldKindDef::Enumerated {
                constants: Some(constants),
            } if !constants.is_empty() => FieldKind::Enumerated(EnumCodeMap::new(
                constants.into_iter().map(|c| (c.name, c.code)),
            )),
            FieldKindDef::Enumerated { .. } => {
                return Err(SchemaError::EnumOnNonEnumerable(def.name));
            }
            FieldKindDef::Nested { structure } => {
                FieldKind::Nested(Arc::new(StructureDescriptor::try_from(*structure)?))
            }
            FieldKindDef::Unsupported => return Err(SchemaError::UnsupportedFieldType(def.name)),
        };

        Ok(FieldDescriptor {
            name: def.name,
            first_bit: def.first_bit,
            bit_length: def.bit_length,
            byte_ordering: def.byte_ordering,
            constant: def.constant,
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_code_map_lookup() {
        let codes = EnumCodeMap::new([("A", 1), ("B", 2), ("C", 4)]);

        assert_eq!(codes.code_of("C"), Some(4));
        assert_eq!(codes.code_of("D"), None);
        assert_eq!(codes.constant_for(2), Some("B"));
        assert_eq!(codes.constant_for(3), None);
        assert_eq!(codes.len(), 3);
    }

    #[test]
    fn test_field_geometry() {
        let field = FieldDescriptor::integer("value", 3, 10);
        assert_eq!(field.end_bit(), 13);
        assert_eq!(field.byte_len(), 2);
        assert!(!field.constant);
    }

    #[test]
    fn test_field_ordering_defaults_to_owner() {
        let field = FieldDescriptor::integer("value", 0, 8);
        assert_eq!(field.ordering_within(ByteOrdering::Little), ByteOrdering::Little);

        let field = field.with_byte_ordering(ByteOrdering::Big);
        assert_eq!(field.ordering_within(ByteOrdering::Little), ByteOrdering::Big);
    }
}
