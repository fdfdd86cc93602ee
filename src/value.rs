//! Field values exchanged with the codec, and the accessor encode reads them through.

use std::collections::BTreeMap;

use crate::{
    binding::{BitEnum, BitStruct},
    errors::CodecError,
};

/// Field values keyed by field name. Decode produces one per structure.
pub type Record = BTreeMap<String, Value>;

/// A single field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    U64(u64),
    Bool(bool),
    /// Name of an enum constant.
    Enum(String),
    /// Fields of a nested structure.
    Struct(Record),
}

impl Value {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::U64(_) => "integer",
            Value::Bool(_) => "boolean",
            Value::Enum(_) => "enumerated",
            Value::Struct(_) => "nested",
        }
    }

    pub fn from_enum<E: BitEnum>(constant: E) -> Value {
        Value::Enum(constant.name().to_string())
    }

    /// Captures every field of `nested`, constants included.
    pub fn from_struct<S: BitStruct>(nested: &S) -> Result<Value, CodecError> {
        Ok(Value::Struct(nested.to_record()?))
    }
}

macro_rules! impl_unsigned {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::U64(value as u64)
                }
            }

            impl FromValue for $ty {
                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::U64(v) => <$ty>::try_from(v).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_unsigned!(u8, u16, u32, u64);

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

/// Read access to the current field values of a live instance.
pub trait FieldSource {
    /// Returns the value of `name`, constant fields included.
    fn field_value(&self, name: &str) -> Result<Value, CodecError>;
}

impl FieldSource for Record {
    fn field_value(&self, name: &str) -> Result<Value, CodecError> {
        self.get(name)
            .cloned()
            .ok_or_else(|| CodecError::MissingField(name.to_string()))
    }
}

/// Conversion from a decoded [Value] into a plain Rust type. `None` if the value does not fit.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Option<Self>;
}

impl FromValue for bool {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(b),
            Value::U64(v) => Some(v != 0),
            _ => None,
        }
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

impl FromValue for Record {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Struct(record) => Some(record),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsigned_conversions() {
        assert_eq!(Value::from(0xa5u8), Value::U64(0xa5));
        assert_eq!(u8::from_value(Value::U64(0xff)), Some(0xff));
        assert_eq!(u8::from_value(Value::U64(0x100)), None);
        assert_eq!(u32::from_value(Value::Bool(true)), None);
    }

    #[test]
    fn test_bool_conversions() {
        assert_eq!(bool::from_value(Value::Bool(true)), Some(true));
        assert_eq!(bool::from_value(Value::U64(2)), Some(true));
        assert_eq!(bool::from_value(Value::U64(0)), Some(false));
        assert_eq!(bool::from_value(Value::Enum("A".to_string())), None);
    }

    #[test]
    fn test_record_source() {
        let record = Record::from([("a".to_string(), Value::U64(1))]);

        assert_eq!(record.field_value("a"), Ok(Value::U64(1)));
        assert_eq!(
            record.field_value("b"),
            Err(CodecError::MissingField("b".to_string()))
        );
    }
}
