//! Typed binding of Rust structs and enums to structure descriptors.
//!
//! A struct implements [BitStruct] by registering, once, a [Binding]: its
//! [StructureDescriptor] together with the [Factory] that rebuilds an instance from
//! decoded values. Encoding reads the instance back through [FieldSource].
//!
//! ```
//! use std::sync::Arc;
//!
//! use bitstruct::binding::{BitStruct, Binding, BindingCell, Factory};
//! use bitstruct::descriptor::{StructureDescriptor, StructureDetails};
//! use bitstruct::errors::{CodecError, SchemaError};
//! use bitstruct::field::FieldDescriptor;
//! use bitstruct::value::{FieldSource, Value};
//!
//! #[derive(Debug, PartialEq)]
//! struct Status {
//!     code: u8,
//!     busy: bool,
//! }
//!
//! impl FieldSource for Status {
//!     fn field_value(&self, name: &str) -> Result<Value, CodecError> {
//!         match name {
//!             "code" => Ok(self.code.into()),
//!             "busy" => Ok(self.busy.into()),
//!             _ => Err(CodecError::MissingField(name.to_string())),
//!         }
//!     }
//! }
//!
//! impl BitStruct for Status {
//!     fn binding() -> Result<&'static Binding<Self>, SchemaError> {
//!         static BINDING: BindingCell<Status> = BindingCell::new();
//!         BINDING.get_or_resolve(|| {
//!             let descriptor = StructureDescriptor::compile(
//!                 vec![
//!                     FieldDescriptor::integer("code", 0, 7),
//!                     FieldDescriptor::boolean("busy", 7, 1),
//!                 ],
//!                 StructureDetails::default(),
//!             )?;
//!             Binding::single(
//!                 Arc::new(descriptor),
//!                 Factory::new(["code", "busy"], |args| {
//!                     Ok(Status { code: args.take()?, busy: args.take()? })
//!                 }),
//!             )
//!         })
//!     }
//! }
//!
//! let status = Status { code: 0x15, busy: true };
//! let bytes = status.encode().unwrap();
//! assert_eq!(bytes, vec![0x95]);
//! assert_eq!(Status::decode(&bytes).unwrap(), status);
//! ```

use std::{
    any::type_name,
    collections::HashSet,
    sync::{Arc, OnceLock},
};

use crate::{
    codec,
    descriptor::StructureDescriptor,
    errors::{CodecError, SchemaError},
    field::EnumCodeMap,
    value::{FieldSource, FromValue, Record, Value},
};

/// An enum whose constants are stored as integer codes.
pub trait BitEnum: Copy + 'static {
    /// Every constant, in declaration order.
    const VARIANTS: &'static [Self];

    fn name(self) -> &'static str;

    fn code(self) -> u64;

    fn code_map() -> EnumCodeMap {
        EnumCodeMap::new(Self::VARIANTS.iter().map(|v| (v.name(), v.code())))
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|v| v.name() == name)
    }
}

/// A Rust type with a registered bit layout.
pub trait BitStruct: FieldSource + Sized + 'static {
    /// The type's binding, resolved once and cached (see [BindingCell]).
    fn binding() -> Result<&'static Binding<Self>, SchemaError>;

    fn descriptor() -> Result<Arc<StructureDescriptor>, SchemaError> {
        Ok(Self::binding()?.descriptor().clone())
    }

    fn encode(&self) -> Result<Vec<u8>, CodecError> {
        codec::encode(Self::binding()?.descriptor(), self)
    }

    fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        Self::binding()?.decode(bytes)
    }

    /// Every field value, constants included.
    fn to_record(&self) -> Result<Record, CodecError> {
        Self::binding()?
            .descriptor()
            .fields()
            .iter()
            .map(|field| {
                self.field_value(&field.name)
                    .map(|value| (field.name.clone(), value))
            })
            .collect()
    }

    fn from_record(record: Record) -> Result<Self, CodecError> {
        Self::binding()?.build(record)
    }
}

/// Builds a `T` from decoded values, handed out by [Args] in `params` order.
pub struct Factory<T> {
    params: Vec<String>,
    build: fn(&mut Args) -> Result<T, CodecError>,
}

impl<T> Factory<T> {
    pub fn new<I, S>(params: I, build: fn(&mut Args) -> Result<T, CodecError>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Factory {
            params: params.into_iter().map(Into::into).collect(),
            build,
        }
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    fn takes_exactly(&self, fields: &HashSet<&str>) -> bool {
        let params: HashSet<&str> = self.params.iter().map(String::as_str).collect();
        params.len() == self.params.len() && &params == fields
    }
}

/// A descriptor paired with the one factory whose parameters are exactly its non-constant fields.
pub struct Binding<T> {
    descriptor: Arc<StructureDescriptor>,
    factory: Factory<T>,
}

impl<T> Binding<T> {
    /// Picks the factory whose parameter-name set equals the descriptor's non-constant field names.
    pub fn resolve(
        descriptor: Arc<StructureDescriptor>,
        factories: Vec<Factory<T>>,
    ) -> Result<Self, SchemaError> {
        let fields: Vec<String> = descriptor.value_fields().map(|f| f.name.clone()).collect();
        let wanted: HashSet<&str> = fields.iter().map(String::as_str).collect();

        let mut matching: Vec<Factory<T>> = factories
            .into_iter()
            .filter(|factory| factory.takes_exactly(&wanted))
            .collect();

        match matching.len() {
            0 => Err(SchemaError::NoMatchingFactory(fields)),
            1 => Ok(Binding {
                descriptor,
                factory: matching.remove(0),
            }),
            _ => Err(SchemaError::AmbiguousFactory(fields)),
        }
    }

    pub fn single(
        descriptor: Arc<StructureDescriptor>,
        factory: Factory<T>,
    ) -> Result<Self, SchemaError> {
        Self::resolve(descriptor, vec![factory])
    }

    pub fn descriptor(&self) -> &Arc<StructureDescriptor> {
        &self.descriptor
    }

    pub fn params(&self) -> &[String] {
        self.factory.params()
    }

    /// Decodes `bytes`, extracting fields in the factory's parameter order.
    pub fn decode(&self, bytes: &[u8]) -> Result<T, CodecError> {
        let values = codec::decode_ordered(&self.descriptor, bytes, self.factory.params.as_slice())?;
        self.invoke(values)
    }

    /// Builds an instance from already decoded values. Extra entries in `record` are ignored.
    pub fn build(&self, mut record: Record) -> Result<T, CodecError> {
        let values = self
            .factory
            .params
            .iter()
            .map(|param| {
                record
                    .remove(param)
                    .ok_or_else(|| CodecError::MissingField(param.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.invoke(values)
    }

    fn invoke(&self, values: Vec<Value>) -> Result<T, CodecError> {
        let mut args = Args::new(self.factory.params.iter().cloned().zip(values).collect());
        (self.factory.build)(&mut args)
    }
}

/// Decoded values handed to a [Factory], one per parameter, in parameter order.
pub struct Args {
    values: std::vec::IntoIter<(String, Value)>,
    position: usize,
}

impl Args {
    fn new(values: Vec<(String, Value)>) -> Self {
        Args {
            values: values.into_iter(),
            position: 0,
        }
    }

    /// Number of values not taken yet.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }

    pub fn take<T: FromValue>(&mut self) -> Result<T, CodecError> {
        let (field, value) = self.take_value()?;
        let got = value.kind_name();

        T::from_value(value).ok_or_else(|| CodecError::ValueKindMismatch {
            field,
            expected: format!("{} (got {got})", type_name::<T>()),
        })
    }

    pub fn take_enum<E: BitEnum>(&mut self) -> Result<E, CodecError> {
        match self.take_value()? {
            (field, Value::Enum(constant)) => {
                E::from_name(&constant).ok_or(CodecError::UnknownEnumConstant { field, constant })
            }
            (field, other) => Err(CodecError::ValueKindMismatch {
                field,
                expected: format!("{} (got {})", type_name::<E>(), other.kind_name()),
            }),
        }
    }

    pub fn take_struct<S: BitStruct>(&mut self) -> Result<S, CodecError> {
        match self.take_value()? {
            (_, Value::Struct(record)) => S::from_record(record),
            (field, other) => Err(CodecError::ValueKindMismatch {
                field,
                expected: format!("{} (got {})", type_name::<S>(), other.kind_name()),
            }),
        }
    }

    fn take_value(&mut self) -> Result<(String, Value), CodecError> {
        let position = self.position;
        self.position += 1;
        self.values
            .next()
            .ok_or(CodecError::MissingArgument(position))
    }
}

/// Populate-once, lock-free-read cache for a type's [Binding]. Meant to live in a `static`.
pub struct BindingCell<T> {
    cell: OnceLock<Result<Binding<T>, SchemaError>>,
}

impl<T> BindingCell<T> {
    pub const fn new() -> Self {
        BindingCell {
            cell: OnceLock::new(),
        }
    }

    /// Runs `resolve` on first use; later calls return the cached outcome, errors included.
    pub fn get_or_resolve(
        &self,
        resolve: impl FnOnce() -> Result<Binding<T>, SchemaError>,
    ) -> Result<&Binding<T>, SchemaError> {
        self.cell.get_or_init(resolve).as_ref().map_err(Clone::clone)
    }
}

impl<T> Default for BindingCell<T> {
    fn default() -> Self {
        Self::new()
    }
}
