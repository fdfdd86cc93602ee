//! Endian-aware arbitrary-precision unsigned integers.
//!
//! A [`Ray`] pairs an unsigned magnitude with the [`ByteOrdering`] used whenever
//! it crosses a byte-buffer boundary. Bit 0 is always the least significant bit
//! of the magnitude; the ordering only decides which end of a buffer holds it.
//!
//! ```
//! use bitstruct::ray::{ByteOrdering, Ray};
//!
//! let big = Ray::from_bytes(&[0x12, 0x34], ByteOrdering::Big);
//! let little = Ray::from_bytes(&[0x34, 0x12], ByteOrdering::Little);
//! assert_eq!(big.to_u64(), little.to_u64());
//! assert_eq!(big.least_significant_bytes(4), vec![0, 0, 0x12, 0x34]);
//! assert_eq!(little.least_significant_bytes(4), vec![0x34, 0x12, 0, 0]);
//! ```

use std::ops::{BitAnd, BitOr, Shl, Shr};

use malachite::Natural;
use malachite::base::num::basic::traits::Zero;
use malachite::base::num::conversion::traits::PowerOf2Digits;
use malachite::base::num::logic::traits::LowMask;

/// Mapping of a structure's conceptual integer onto a byte buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ByteOrdering {
    /// Byte 0 is the least significant byte.
    Little,
    /// Byte 0 is the most significant byte (network order).
    #[default]
    Big,
}

impl ByteOrdering {
    /// The opposite ordering.
    pub fn swapped(self) -> Self {
        match self {
            ByteOrdering::Little => ByteOrdering::Big,
            ByteOrdering::Big => ByteOrdering::Little,
        }
    }
}

/// Unsigned integer of arbitrary width with a byte-ordering view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ray {
    value: Natural,
    ordering: ByteOrdering,
}

impl Ray {
    pub fn zero(ordering: ByteOrdering) -> Self {
        Ray {
            value: Natural::ZERO,
            ordering,
        }
    }

    pub fn from_u64(value: u64, ordering: ByteOrdering) -> Self {
        Ray {
            value: Natural::from(value),
            ordering,
        }
    }

    /// Parses `bytes` as an unsigned integer under `ordering`. An empty slice is zero.
    pub fn from_bytes(bytes: &[u8], ordering: ByteOrdering) -> Self {
        let digits = bytes.iter().copied();
        let value = match ordering {
            ByteOrdering::Big => {
                <Natural as PowerOf2Digits<u8>>::from_power_of_2_digits_desc(8, digits)
            }
            ByteOrdering::Little => {
                <Natural as PowerOf2Digits<u8>>::from_power_of_2_digits_asc(8, digits)
            }
        };

        Ray {
            value: value.unwrap_or(Natural::ZERO),
            ordering,
        }
    }

    pub fn ordering(&self) -> ByteOrdering {
        self.ordering
    }

    /// Same magnitude, rendered under `ordering` from now on.
    pub fn with_ordering(self, ordering: ByteOrdering) -> Self {
        Ray {
            value: self.value,
            ordering,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.value == Natural::ZERO
    }

    /// Minimal number of bytes needed to hold the magnitude (0 for zero).
    pub fn byte_len(&self) -> usize {
        self.le_digits().len()
    }

    /// Returns the value as a `u64`, or `None` if it does not fit.
    pub fn to_u64(&self) -> Option<u64> {
        u64::try_from(&self.value).ok()
    }

    pub fn left_shift(&self, by: usize) -> Self {
        Ray {
            value: &self.value << (by as u64),
            ordering: self.ordering,
        }
    }

    pub fn right_shift(&self, by: usize) -> Self {
        Ray {
            value: &self.value >> (by as u64),
            ordering: self.ordering,
        }
    }

    /// Keeps only the low `len` bits.
    pub fn low_bits(&self, len: usize) -> Self {
        Ray {
            value: &self.value & &Natural::low_mask(len as u64),
            ordering: self.ordering,
        }
    }

    /// Extracts bits `[first, first + len)` and moves them down to bit 0.
    pub fn bits(&self, first: usize, len: usize) -> Self {
        self.right_shift(first).low_bits(len)
    }

    /// Bitwise complement of the low `width_bytes * 8` bits.
    pub fn not(&self, width_bytes: usize) -> Self {
        let mask = Natural::low_mask(width_bytes as u64 * 8);
        Ray {
            value: &(&self.value & &mask) ^ &mask,
            ordering: self.ordering,
        }
    }

    /// Bitwise AND. Operands in different views are combined at the wider of the two byte lengths.
    pub fn and(&self, other: &Ray) -> Self {
        if self.ordering == other.ordering {
            return Ray {
                value: &self.value & &other.value,
                ordering: self.ordering,
            };
        }

        self.and_sized(other, self.byte_len().max(other.byte_len()))
    }

    /// Bitwise AND at a fixed width of `size_bytes`; the result is truncated to that width.
    ///
    /// When the views differ, `other` is rendered at `size_bytes` in its own view and those
    /// bytes are reread in this view. The result keeps this operand's view.
    pub fn and_sized(&self, other: &Ray, size_bytes: usize) -> Self {
        let rhs = self.aligned(other, size_bytes);
        Ray {
            value: &self.value & &rhs,
            ordering: self.ordering,
        }
        .low_bits(size_bytes * 8)
    }

    /// Bitwise OR. Operands in different views are combined at the wider of the two byte lengths.
    pub fn or(&self, other: &Ray) -> Self {
        if self.ordering == other.ordering {
            return Ray {
                value: &self.value | &other.value,
                ordering: self.ordering,
            };
        }

        self.or_sized(other, self.byte_len().max(other.byte_len()))
    }

    /// Bitwise OR at a fixed width of `size_bytes`; see [`Ray::and_sized`].
    pub fn or_sized(&self, other: &Ray, size_bytes: usize) -> Self {
        let rhs = self.aligned(other, size_bytes);
        Ray {
            value: &self.value | &rhs,
            ordering: self.ordering,
        }
        .low_bits(size_bytes * 8)
    }

    /// Rereads the `width_bytes`-byte rendering of this value under the opposite view.
    pub fn swap_view(&self, width_bytes: usize) -> Self {
        Ray::from_bytes(
            &self.least_significant_bytes(width_bytes),
            self.ordering.swapped(),
        )
    }

    /// Minimal-width rendering in this view. Zero renders as an empty buffer.
    pub fn as_bytes(&self) -> Vec<u8> {
        self.least_significant_bytes(self.byte_len())
    }

    /// Renders exactly `n` bytes in this view, dropping or zero-filling high-order bytes.
    pub fn least_significant_bytes(&self, n: usize) -> Vec<u8> {
        let mut bytes = self.le_digits();
        bytes.resize(n, 0);

        if self.ordering == ByteOrdering::Big {
            bytes.reverse();
        }

        bytes
    }

    fn le_digits(&self) -> Vec<u8> {
        <Natural as PowerOf2Digits<u8>>::to_power_of_2_digits_asc(&self.value, 8)
    }

    fn aligned(&self, other: &Ray, size_bytes: usize) -> Natural {
        if self.ordering == other.ordering {
            other.value.clone()
        } else {
            other.swap_view(size_bytes).value
        }
    }
}

impl Shl<usize> for &Ray {
    type Output = Ray;

    fn shl(self, by: usize) -> Ray {
        self.left_shift(by)
    }
}

impl Shr<usize> for &Ray {
    type Output = Ray;

    fn shr(self, by: usize) -> Ray {
        self.right_shift(by)
    }
}

impl BitAnd<&Ray> for &Ray {
    type Output = Ray;

    fn bitand(self, rhs: &Ray) -> Ray {
        self.and(rhs)
    }
}

impl BitOr<&Ray> for &Ray {
    type Output = Ray;

    fn bitor(self, rhs: &Ray) -> Ray {
        self.or(rhs)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_from_bytes_big() {
        let ray = Ray::from_bytes(&[0x12, 0x34, 0x56], ByteOrdering::Big);
        assert_eq!(ray.to_u64(), Some(0x123456));
    }

    #[test]
    fn test_from_bytes_little() {
        let ray = Ray::from_bytes(&[0x12, 0x34, 0x56], ByteOrdering::Little);
        assert_eq!(ray.to_u64(), Some(0x563412));
    }

    #[test]
    fn test_from_bytes_empty() {
        assert!(Ray::from_bytes(&[], ByteOrdering::Big).is_zero());
        assert!(Ray::from_bytes(&[0, 0, 0], ByteOrdering::Little).is_zero());
    }

    #[test]
    fn test_least_significant_bytes_extends() {
        let big = Ray::from_u64(0xabcd, ByteOrdering::Big);
        let little = Ray::from_u64(0xabcd, ByteOrdering::Little);

        assert_eq!(big.least_significant_bytes(4), vec![0, 0, 0xab, 0xcd]);
        assert_eq!(little.least_significant_bytes(4), vec![0xcd, 0xab, 0, 0]);
    }

    #[test]
    fn test_least_significant_bytes_truncates() {
        let big = Ray::from_bytes(&[0x11, 0x22, 0x33, 0x44], ByteOrdering::Big);
        let little = Ray::from_bytes(&[0x11, 0x22, 0x33, 0x44], ByteOrdering::Little);

        assert_eq!(big.least_significant_bytes(2), vec![0x33, 0x44]);
        assert_eq!(little.least_significant_bytes(2), vec![0x11, 0x22]);
    }

    #[test]
    fn test_as_bytes_minimal() {
        let ray = Ray::from_bytes(&[0, 0, 0x01, 0x02], ByteOrdering::Big);
        assert_eq!(ray.byte_len(), 2);
        assert_eq!(ray.as_bytes(), vec![0x01, 0x02]);
        assert_eq!(Ray::zero(ByteOrdering::Big).as_bytes(), Vec::<u8>::new());
    }

    #[test]
    fn test_shifts() {
        let ray = Ray::from_u64(0b1011, ByteOrdering::Big);
        assert_eq!((&ray << 4).to_u64(), Some(0b1011_0000));
        assert_eq!((&ray >> 2).to_u64(), Some(0b10));
        assert_eq!(ray.left_shift(64).right_shift(64), ray);
    }

    #[test]
    fn test_shift_beyond_u64() {
        let ray = Ray::from_u64(1, ByteOrdering::Little).left_shift(70);
        assert_eq!(ray.to_u64(), None);
        assert_eq!(ray.byte_len(), 9);
        assert_eq!(ray.least_significant_bytes(9)[8], 0b0100_0000);
    }

    #[test]
    fn test_to_u64_boundary() {
        let max = Ray::from_bytes(&[0xff; 8], ByteOrdering::Big);
        assert_eq!(max.to_u64(), Some(u64::MAX));
        assert_eq!(max.left_shift(1).to_u64(), None);
        assert_eq!(Ray::zero(ByteOrdering::Little).to_u64(), Some(0));
    }

    #[test]
    fn test_and_or_same_view() {
        let a = Ray::from_u64(0b1100, ByteOrdering::Big);
        let b = Ray::from_u64(0b1010, ByteOrdering::Big);

        assert_eq!((&a & &b).to_u64(), Some(0b1000));
        assert_eq!((&a | &b).to_u64(), Some(0b1110));
    }

    #[test]
    fn test_not() {
        let ray = Ray::from_u64(0x0f, ByteOrdering::Big);
        assert_eq!(ray.not(1).to_u64(), Some(0xf0));
        assert_eq!(ray.not(2).to_u64(), Some(0xfff0));
        assert_eq!(Ray::from_u64(0x1ff, ByteOrdering::Big).not(1).to_u64(), Some(0));
    }

    #[test]
    fn test_bits() {
        let ray = Ray::from_bytes(&[0xa5, 0xf5], ByteOrdering::Big);
        assert_eq!(ray.bits(0, 4).to_u64(), Some(0x5));
        assert_eq!(ray.bits(8, 8).to_u64(), Some(0xa5));
        assert_eq!(ray.bits(4, 8).to_u64(), Some(0x5f));
    }

    #[test]
    fn test_swap_view() {
        let little = Ray::from_bytes(&[0xcf, 0, 0, 0], ByteOrdering::Little);
        assert_eq!(little.to_u64(), Some(0xcf));

        let big = little.swap_view(4);
        assert_eq!(big.ordering(), ByteOrdering::Big);
        assert_eq!(big.to_u64(), Some(0xcf00_0000));
        assert_eq!(big.least_significant_bytes(4), vec![0xcf, 0, 0, 0]);
    }

    #[test]
    fn test_with_ordering_keeps_value() {
        let ray = Ray::from_u64(0x1234, ByteOrdering::Big).with_ordering(ByteOrdering::Little);
        assert_eq!(ray.to_u64(), Some(0x1234));
        assert_eq!(ray.least_significant_bytes(2), vec![0x34, 0x12]);
    }

    #[test]
    fn test_mixed_or_follows_left_view() {
        let big = Ray::from_bytes(&[0x12, 0x00], ByteOrdering::Big);
        let little = Ray::from_bytes(&[0x34], ByteOrdering::Little);

        let result = &big | &little;
        assert_eq!(result.ordering(), ByteOrdering::Big);
        assert_eq!(result.to_u64(), Some(0x3600));

        let result = &little | &big;
        assert_eq!(result.ordering(), ByteOrdering::Little);
        assert_eq!(result.least_significant_bytes(2), vec![0x34 | 0x12, 0x00]);
    }

    #[test]
    fn test_mixed_and_sized() {
        let big = Ray::from_bytes(&[0xff, 0x0f, 0xf0, 0xff], ByteOrdering::Big);
        let little = Ray::from_bytes(&[0x0f, 0xff, 0xff, 0x00], ByteOrdering::Little);

        let result = big.and_sized(&little, 4);
        assert_eq!(result.least_significant_bytes(4), vec![0x0f, 0x0f, 0xf0, 0x00]);

        let truncated = big.and_sized(&little, 2);
        assert_eq!(truncated.least_significant_bytes(4), vec![0, 0, 0x00, 0xff]);
    }

    #[test]
    fn test_mixed_or_sized_truncates() {
        let big = Ray::from_bytes(&[0xaa, 0x00, 0x00], ByteOrdering::Big);
        let little = Ray::from_bytes(&[0x01, 0x02], ByteOrdering::Little);

        let result = big.or_sized(&little, 2);
        assert_eq!(result.least_significant_bytes(3), vec![0x00, 0x01, 0x02]);
    }

    proptest! {
        #[test]
        fn prop_bytes_round_trip(bytes in proptest::collection::vec(any::<u8>(), 0..24), big in any::<bool>()) {
            let ordering = if big { ByteOrdering::Big } else { ByteOrdering::Little };
            let ray = Ray::from_bytes(&bytes, ordering);
            prop_assert_eq!(ray.least_significant_bytes(bytes.len()), bytes);
        }

        #[test]
        fn prop_views_agree_numerically(value in any::<u64>(), width in 8usize..16) {
            let big = Ray::from_u64(value, ByteOrdering::Big);
            let little = Ray::from_u64(value, ByteOrdering::Little);

            let mut reversed = big.least_significant_bytes(width);
            reversed.reverse();
            prop_assert_eq!(little.least_significant_bytes(width), reversed);
        }

        #[test]
        fn prop_swap_view_twice_is_identity(value in any::<u64>()) {
            let ray = Ray::from_u64(value, ByteOrdering::Little);
            prop_assert_eq!(ray.swap_view(8).swap_view(8), ray);
        }
    }
}
