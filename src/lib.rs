//! # bitstruct
//!
//! A declarative codec for fixed-size binary structures made of bit fields.
//!
//! A structure is described once as a list of named fields, each a run of bits
//! within the structure's conceptual integer, plus a size and a byte ordering.
//! Encoding packs field values into a byte buffer of exactly that size; decoding
//! extracts them again. Fields hold unsigned integers, booleans, enum constants
//! stored as integer codes, or whole nested structures.
//!
//! ## Example
//!
//! ```
//! use bitstruct::codec;
//! use bitstruct::descriptor::{StructureDescriptor, StructureDetails};
//! use bitstruct::field::FieldDescriptor;
//! use bitstruct::ray::ByteOrdering;
//! use bitstruct::value::{Record, Value};
//!
//! let descriptor = StructureDescriptor::compile(
//!     vec![
//!         FieldDescriptor::integer("header", 8, 32),
//!         FieldDescriptor::boolean("valid", 0, 1),
//!     ],
//!     StructureDetails::new(ByteOrdering::Little).with_size_bytes(8),
//! )
//! .unwrap();
//!
//! let record = Record::from([
//!     ("header".to_string(), Value::U64(0x1234_5678)),
//!     ("valid".to_string(), Value::Bool(true)),
//! ]);
//! let bytes = codec::encode(&descriptor, &record).unwrap();
//! assert_eq!(bytes, vec![0x01, 0x78, 0x56, 0x34, 0x12, 0, 0, 0]);
//! assert_eq!(codec::decode(&descriptor, &bytes).unwrap(), record);
//! ```
//!
//! Rust types can be bound to a layout through [binding::BitStruct].

pub mod binding;
pub mod codec;
pub mod descriptor;
pub mod errors;
pub mod field;
pub mod ray;
#[cfg(feature = "serde")]
pub mod serde;
pub mod value;
