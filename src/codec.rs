//! Encode and decode engine.
//!
//! A structure is treated as one unsigned integer of `size_bytes * 8` bits. Each field
//! occupies bits `[first_bit, first_bit + bit_length)` of that integer, counted from its
//! least significant bit. The structure's [ByteOrdering] only matters where the integer
//! meets a byte buffer.
//!
//! Input buffers longer than the structure are accepted: only the `size_bytes` least
//! significant bytes are read, which are the last bytes for [ByteOrdering::Big] and the
//! first bytes for [ByteOrdering::Little].

use log::{debug, trace};

use crate::{
    descriptor::StructureDescriptor,
    errors::{CodecError, SchemaError},
    field::{FieldDescriptor, FieldKind},
    ray::{ByteOrdering, Ray},
    value::{FieldSource, Record, Value},
};

/// Packs every field of `source` (constants included) into a buffer of exactly
/// `descriptor.size_bytes()` bytes. Bits outside every field are zero.
pub fn encode(
    descriptor: &StructureDescriptor,
    source: &dyn FieldSource,
) -> Result<Vec<u8>, CodecError> {
    let ordering = descriptor.byte_ordering();
    let size_bytes = descriptor.size_bytes();

    debug!(
        "encode: {} fields into {} bytes ({:?})",
        descriptor.fields().len(),
        size_bytes,
        ordering
    );

    let mut composite = Ray::zero(ordering);

    for field in descriptor.fields() {
        let value = source.field_value(&field.name)?;
        let raw = value_to_ray(field, ordering, value)?;
        let masked = raw.low_bits(field.bit_length);

        if masked != raw {
            trace!(
                "encode: value of `{}` exceeds {} bits, masked",
                field.name, field.bit_length
            );
        }

        trace!(
            "encode: `{}` at bit {} width {} = {:02x?}",
            field.name,
            field.first_bit,
            field.bit_length,
            masked.as_bytes()
        );

        composite = &composite | &masked.left_shift(field.first_bit);
    }

    Ok(composite.least_significant_bytes(size_bytes))
}

/// Unpacks every non-constant field of `bytes` into a [Record].
///
/// Constant fields are left out, so the record cannot be passed back to [encode]
/// for a structure that has them until their values are inserted.
pub fn decode(descriptor: &StructureDescriptor, bytes: &[u8]) -> Result<Record, CodecError> {
    let composite = read_composite(descriptor, bytes)?;
    let ordering = descriptor.byte_ordering();

    descriptor
        .value_fields()
        .map(|field| {
            ray_to_value(field, ordering, &composite).map(|value| (field.name.clone(), value))
        })
        .collect()
}

/// Unpacks the fields named in `names`, in that order.
pub fn decode_ordered<S: AsRef<str>>(
    descriptor: &StructureDescriptor,
    bytes: &[u8],
    names: &[S],
) -> Result<Vec<Value>, CodecError> {
    let composite = read_composite(descriptor, bytes)?;
    let ordering = descriptor.byte_ordering();

    names
        .iter()
        .map(|name| {
            let field = descriptor
                .field(name.as_ref())
                .ok_or_else(|| CodecError::MissingField(name.as_ref().to_string()))?;
            ray_to_value(field, ordering, &composite)
        })
        .collect()
}

/// Reads the structure's window of `bytes` as one integer.
fn read_composite(descriptor: &StructureDescriptor, bytes: &[u8]) -> Result<Ray, CodecError> {
    let size_bytes = descriptor.size_bytes();
    let ordering = descriptor.byte_ordering();

    if bytes.len() < size_bytes {
        return Err(CodecError::BufferTooSmall {
            required: size_bytes,
            actual: bytes.len(),
        });
    }

    debug!(
        "decode: {} byte buffer as {} bytes ({:?})",
        bytes.len(),
        size_bytes,
        ordering
    );

    let window = match ordering {
        ByteOrdering::Big => &bytes[bytes.len() - size_bytes..],
        ByteOrdering::Little => &bytes[..size_bytes],
    };

    Ok(Ray::from_bytes(window, ordering))
}

/// Field-local integer for `value`, in the owning structure's view.
fn value_to_ray(
    field: &FieldDescriptor,
    ordering: ByteOrdering,
    value: Value,
) -> Result<Ray, CodecError> {
    match (&field.kind, value) {
        (FieldKind::Integer, Value::U64(v)) => Ok(Ray::from_u64(v, ordering)),
        (FieldKind::Boolean, Value::Bool(b)) => Ok(Ray::from_u64(b as u64, ordering)),
        (FieldKind::Enumerated(codes), Value::Enum(constant)) => codes
            .code_of(&constant)
            .map(|code| Ray::from_u64(code, ordering))
            .ok_or_else(|| CodecError::UnknownEnumConstant {
                field: field.name.clone(),
                constant,
            }),
        (FieldKind::Nested(structure), Value::Struct(record)) => {
            let bytes = encode(structure, &record)?;
            let widened = Ray::from_bytes(&bytes, structure.byte_ordering())
                .least_significant_bytes(field.byte_len());
            Ok(Ray::from_bytes(&widened, field.ordering_within(ordering)).with_ordering(ordering))
        }
        (kind, value) => Err(CodecError::ValueKindMismatch {
            field: field.name.clone(),
            expected: format!("{} (got {})", kind.name(), value.kind_name()),
        }),
    }
}

/// Extracts `field` from `composite` and converts it to the field's value kind.
fn ray_to_value(
    field: &FieldDescriptor,
    ordering: ByteOrdering,
    composite: &Ray,
) -> Result<Value, CodecError> {
    let bits = composite.bits(field.first_bit, field.bit_length);

    trace!(
        "decode: `{}` at bit {} width {} = {:02x?}",
        field.name,
        field.first_bit,
        field.bit_length,
        bits.as_bytes()
    );

    match &field.kind {
        FieldKind::Integer => Ok(Value::U64(scalar(field, &bits)?)),
        FieldKind::Boolean => Ok(Value::Bool(!bits.is_zero())),
        FieldKind::Enumerated(codes) => {
            let code = scalar(field, &bits)?;
            codes
                .constant_for(code)
                .map(|constant| Value::Enum(constant.to_string()))
                .ok_or_else(|| CodecError::UnknownEnumCode {
                    field: field.name.clone(),
                    code,
                })
        }
        FieldKind::Nested(structure) => {
            let nested = bits
                .with_ordering(field.ordering_within(ordering))
                .least_significant_bytes(field.byte_len());
            Ok(Value::Struct(decode(structure, &nested)?))
        }
    }
}

fn scalar(field: &FieldDescriptor, bits: &Ray) -> Result<u64, CodecError> {
    bits.to_u64()
        .ok_or_else(|| SchemaError::InvalidFieldSize(field.name.clone()).into())
}
