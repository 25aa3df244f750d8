//! Stateless encode/decode of a single value at a single offset.
//!
//! Every function here takes the whole buffer plus an offset, so callers decide where a value
//! lives; none of them know about cursors.

use zerocopy::byteorder::{BigEndian, LittleEndian, F32, F64, I16, I32, I64, U16, U32, U64};
use zerocopy::{FromBytes, IntoBytes};

use crate::{Endian, Error, Result};

/// Largest byte length accepted by the variable-width integer codecs.
pub const MAX_VAR_BYTES: usize = 6;

fn out_of_range(len: usize, offset: usize, size: usize) -> Error {
    Error::OutOfRange { offset, size, len }
}

/// Returns the `size` bytes starting at `offset`.
pub(crate) fn window(data: &[u8], offset: usize, size: usize) -> Result<&[u8]> {
    offset
        .checked_add(size)
        .and_then(|end| data.get(offset..end))
        .ok_or_else(|| out_of_range(data.len(), offset, size))
}

pub(crate) fn window_mut(data: &mut [u8], offset: usize, size: usize) -> Result<&mut [u8]> {
    let len = data.len();
    match offset.checked_add(size) {
        Some(end) if end <= len => Ok(&mut data[offset..end]),
        _ => Err(out_of_range(len, offset, size)),
    }
}

/// A value with a fixed encoded width.
pub trait Fixed: Copy {
    /// Encoded size in bytes.
    const SIZE: usize;

    /// Decodes the value stored at `offset`.
    fn read(data: &[u8], offset: usize, endian: Endian) -> Result<Self>;

    /// Encodes the value at `offset` and returns the offset just past it.
    fn write(self, data: &mut [u8], offset: usize, endian: Endian) -> Result<usize>;
}

macro_rules! impl_fixed {
    // Single bytes have no byte order.
    (byte $ty:ty) => {
        impl Fixed for $ty {
            const SIZE: usize = 1;

            #[inline]
            fn read(data: &[u8], offset: usize, _endian: Endian) -> Result<Self> {
                let bytes = window(data, offset, 1)?;
                <$ty>::read_from_bytes(bytes).map_err(|_| out_of_range(data.len(), offset, 1))
            }

            #[inline]
            fn write(self, data: &mut [u8], offset: usize, _endian: Endian) -> Result<usize> {
                window_mut(data, offset, 1)?.copy_from_slice(self.as_bytes());
                Ok(offset + 1)
            }
        }
    };
    ($ty:ty => $wire:ident) => {
        impl Fixed for $ty {
            const SIZE: usize = core::mem::size_of::<$ty>();

            #[inline]
            fn read(data: &[u8], offset: usize, endian: Endian) -> Result<Self> {
                let bytes = window(data, offset, Self::SIZE)?;
                let value = match endian {
                    Endian::Little => $wire::<LittleEndian>::read_from_bytes(bytes).ok().map(|v| v.get()),
                    Endian::Big => $wire::<BigEndian>::read_from_bytes(bytes).ok().map(|v| v.get()),
                };
                value.ok_or_else(|| out_of_range(data.len(), offset, Self::SIZE))
            }

            #[inline]
            fn write(self, data: &mut [u8], offset: usize, endian: Endian) -> Result<usize> {
                let out = window_mut(data, offset, Self::SIZE)?;
                match endian {
                    Endian::Little => out.copy_from_slice($wire::<LittleEndian>::new(self).as_bytes()),
                    Endian::Big => out.copy_from_slice($wire::<BigEndian>::new(self).as_bytes()),
                }
                Ok(offset + Self::SIZE)
            }
        }
    };
}

impl_fixed!(byte u8);
impl_fixed!(byte i8);
impl_fixed!(u16 => U16);
impl_fixed!(i16 => I16);
impl_fixed!(u32 => U32);
impl_fixed!(i32 => I32);
impl_fixed!(u64 => U64);
impl_fixed!(i64 => I64);
impl_fixed!(f32 => F32);
impl_fixed!(f64 => F64);

/// Validates the byte length of a variable-width integer.
pub(crate) fn check_byte_length(byte_length: usize) -> Result<()> {
    if (1..=MAX_VAR_BYTES).contains(&byte_length) {
        Ok(())
    } else {
        Err(Error::InvalidByteLength(byte_length))
    }
}

/// Checks that `value` fits in `byte_length` unsigned bytes.
pub(crate) fn check_uint(value: u64, byte_length: usize) -> Result<()> {
    check_byte_length(byte_length)?;
    let max = (1u64 << (8 * byte_length)) - 1;
    if value > max {
        return Err(Error::ValueOutOfRange {
            kind: "UInt",
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Checks that `value` fits in `byte_length` two's complement bytes.
pub(crate) fn check_int(value: i64, byte_length: usize) -> Result<()> {
    check_byte_length(byte_length)?;
    let limit = 1i64 << (8 * byte_length - 1);
    if value < -limit || value >= limit {
        return Err(Error::ValueOutOfRange {
            kind: "Int",
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Reads an unsigned integer stored in `byte_length` bytes.
pub(crate) fn read_uint(
    data: &[u8],
    offset: usize,
    byte_length: usize,
    endian: Endian,
) -> Result<u64> {
    check_byte_length(byte_length)?;
    let bytes = window(data, offset, byte_length)?;
    let fold = |acc: u64, &b: &u8| (acc << 8) | u64::from(b);
    Ok(match endian {
        Endian::Little => bytes.iter().rev().fold(0, fold),
        Endian::Big => bytes.iter().fold(0, fold),
    })
}

/// Reads a two's complement integer stored in `byte_length` bytes, sign-extending it.
pub(crate) fn read_int(
    data: &[u8],
    offset: usize,
    byte_length: usize,
    endian: Endian,
) -> Result<i64> {
    let raw = read_uint(data, offset, byte_length, endian)?;
    let shift = 64 - 8 * byte_length as u32;
    Ok(((raw << shift) as i64) >> shift)
}

/// Writes the low `byte_length` bytes of `bits`. The caller has already range-checked the value.
pub(crate) fn write_var(
    data: &mut [u8],
    offset: usize,
    bits: u64,
    byte_length: usize,
    endian: Endian,
) -> Result<usize> {
    check_byte_length(byte_length)?;
    let out = window_mut(data, offset, byte_length)?;
    for (i, slot) in out.iter_mut().enumerate() {
        let shift = match endian {
            Endian::Little => 8 * i,
            Endian::Big => 8 * (byte_length - 1 - i),
        };
        *slot = (bits >> shift) as u8;
    }
    Ok(offset + byte_length)
}
