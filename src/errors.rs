//! Error types for schema registration and for encoding/decoding.

/// Errors produced while compiling a [crate::descriptor::StructureDescriptor] or
/// resolving a [crate::binding::Binding]. These are schema defects, found once at registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// No explicit size was given and there are no fields to deduce it from.
    #[error("no fields declared; structure size cannot be deduced")]
    NoFieldsDeclared,
    /// Field has zero length, or is wider than its kind can hold.
    #[error("field `{0}` has an invalid bit length")]
    InvalidFieldSize(String),
    /// Field extends past the end of the structure.
    #[error("field `{field}` ends at bit {end_bit}, beyond the {size_bytes}-byte structure")]
    FieldOutOfBounds {
        field: String,
        end_bit: usize,
        size_bytes: usize,
    },
    #[error("field `{0}` is declared more than once")]
    DuplicateFieldName(String),
    /// Enumerated kind applied to a type without any code map.
    #[error("field `{0}` is enumerated but has no enum constants")]
    EnumOnNonEnumerable(String),
    /// Field kind is none of integer, boolean, enumerated or nested.
    #[error("field `{0}` has an unsupported type")]
    UnsupportedFieldType(String),
    /// Nested structure is larger than the bit range reserved for it.
    #[error("nested field `{field}` needs {required} bytes but only {available} are reserved")]
    NestedTooLarge {
        field: String,
        required: usize,
        available: usize,
    },
    /// No factory takes exactly the non-constant fields.
    #[error("no factory takes exactly the fields {0:?}")]
    NoMatchingFactory(Vec<String>),
    /// More than one factory takes exactly the non-constant fields.
    #[error("more than one factory takes the fields {0:?}")]
    AmbiguousFactory(Vec<String>),
}

/// Errors produced by [crate::codec::encode] and [crate::codec::decode] and the typed wrappers around them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// Input buffer is shorter than the structure's size.
    #[error("buffer of {actual} bytes is shorter than the required {required}")]
    BufferTooSmall { required: usize, actual: usize },
    /// Decoded integer matches no enum constant.
    #[error("field `{field}` holds code {code}, which matches no enum constant")]
    UnknownEnumCode { field: String, code: u64 },
    /// Enum constant name is not in the field's code map.
    #[error("field `{field}` has no enum constant named `{constant}`")]
    UnknownEnumConstant { field: String, constant: String },
    /// Source has no value for a declared field.
    #[error("no value for field `{0}`")]
    MissingField(String),
    /// Value variant does not fit the field or the requested Rust type.
    #[error("field `{field}` cannot hold or produce a value of kind {expected}")]
    ValueKindMismatch { field: String, expected: String },
    /// A factory asked for more arguments than the structure provides.
    #[error("factory requested argument {0}, which does not exist")]
    MissingArgument(usize),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}
