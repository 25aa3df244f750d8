use crate::codec::{self, Fixed};
use crate::cursor::{Cursor, CursorAccess, CursorOptions, Endian};
use crate::value::{Kind, Options, Value, ValueType};
use crate::{ieee754, Result};

/// Generates the default-order, little-endian and big-endian forms of a writer accessor, each
/// with an `_at` form that writes at an explicit offset and leaves the cursor alone.
macro_rules! endian_writes {
    (
        $(#[$meta:meta])*
        $name:ident($value:ident: $val_ty:ty $(, $arg:ident: $arg_ty:ty)*) -> $ret:ty
            => $inner:ident $(::<$gen:ty>)?
    ) => {
        paste::paste! {
            $(#[$meta])*
            #[inline]
            pub fn [<write_ $name>](&mut self, $value: $val_ty $(, $arg: $arg_ty)*) -> $ret {
                self.$inner $(::<$gen>)? ($value, self.endian(), None $(, $arg)*)
            }

            #[doc = "Like [`Self::write_" $name "`], always little-endian."]
            #[inline]
            pub fn [<write_ $name _le>](&mut self, $value: $val_ty $(, $arg: $arg_ty)*) -> $ret {
                self.$inner $(::<$gen>)? ($value, Endian::Little, None $(, $arg)*)
            }

            #[doc = "Like [`Self::write_" $name "`], always big-endian."]
            #[inline]
            pub fn [<write_ $name _be>](&mut self, $value: $val_ty $(, $arg: $arg_ty)*) -> $ret {
                self.$inner $(::<$gen>)? ($value, Endian::Big, None $(, $arg)*)
            }

            #[doc = "Like [`Self::write_" $name "`], at `offset`. The cursor does not move."]
            #[inline]
            pub fn [<write_ $name _at>](
                &mut self,
                $value: $val_ty,
                offset: usize
                $(, $arg: $arg_ty)*
            ) -> $ret {
                self.$inner $(::<$gen>)? ($value, self.endian(), Some(offset) $(, $arg)*)
            }

            #[doc = "Like [`Self::write_" $name "_le`], at `offset`. The cursor does not move."]
            #[inline]
            pub fn [<write_ $name _le_at>](
                &mut self,
                $value: $val_ty,
                offset: usize
                $(, $arg: $arg_ty)*
            ) -> $ret {
                self.$inner $(::<$gen>)? ($value, Endian::Little, Some(offset) $(, $arg)*)
            }

            #[doc = "Like [`Self::write_" $name "_be`], at `offset`. The cursor does not move."]
            #[inline]
            pub fn [<write_ $name _be_at>](
                &mut self,
                $value: $val_ty,
                offset: usize
                $(, $arg: $arg_ty)*
            ) -> $ret {
                self.$inner $(::<$gen>)? ($value, Endian::Big, Some(offset) $(, $arg)*)
            }
        }
    };
}

macro_rules! byte_writes {
    ($($ty:ident),*) => {
        paste::paste! {
            $(
                #[doc = "Writes a single `" $ty "` value."]
                #[inline]
                pub fn [<write_ $ty>](&mut self, value: $ty) -> &mut Self {
                    self.fixed(value, Endian::Little, None)
                }

                #[doc = "Writes a single `" $ty "` value at `offset`. The cursor does not move."]
                #[inline]
                pub fn [<write_ $ty _at>](&mut self, value: $ty, offset: usize) -> &mut Self {
                    self.fixed(value, Endian::Little, Some(offset))
                }
            )*
        }
    };
}

/// Encodes values into a growable buffer at a tracked position.
///
/// Writes at the cursor move it past the bytes written; writes in `_at` form, or with
/// [`Options::offset`] set, leave it alone. Whenever a write reaches past the end of the buffer,
/// the buffer grows to exactly the length needed, zero-filled; it never shrinks.
///
/// Every write returns the writer, so calls chain.
///
/// ```
/// use cursor_binary_io::{BufferWriter, CursorAccess, CursorOptions};
///
/// let mut w = BufferWriter::with_options(vec![0; 8], CursorOptions::new().big_endian(true));
/// w.write_u64(4294967366);
/// assert_eq!(w.buffer(), [0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x46]);
/// ```
#[derive(Clone, Debug)]
pub struct BufferWriter {
    cursor: Cursor<Vec<u8>>,
}

impl BufferWriter {
    /// Creates a new `BufferWriter` over an empty `Vec<u8>`.
    pub fn new() -> Self {
        Self::wrap(Vec::new())
    }

    /// Creates a new `BufferWriter` over an empty `Vec<u8>` with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::wrap(Vec::with_capacity(capacity))
    }

    /// Creates a new `BufferWriter` over `len` zero bytes.
    pub fn zeroed(len: usize) -> Self {
        Self::wrap(vec![0; len])
    }

    /// Writes into an existing buffer, starting at offset 0, little-endian.
    pub fn wrap(out: Vec<u8>) -> Self {
        Self::with_options(out, CursorOptions::default())
    }

    /// Writes into an existing buffer with a starting offset and default byte order.
    pub fn with_options(out: Vec<u8>, options: CursorOptions) -> Self {
        Self {
            cursor: Cursor::new(out, options),
        }
    }

    /// Extracts the inner buffer
    pub fn into_inner(self) -> Vec<u8> {
        self.cursor.into_storage()
    }

    #[inline(always)]
    fn fixed<T: Fixed>(&mut self, value: T, endian: Endian, offset: Option<usize>) -> &mut Self {
        let written = self
            .cursor
            .execute_write(T::SIZE, offset, |data, at| value.write(data, at, endian));
        // The storage has grown to fit before the write runs.
        debug_assert!(written.is_ok());
        self
    }

    fn uint(
        &mut self,
        value: u64,
        endian: Endian,
        offset: Option<usize>,
        byte_length: usize,
    ) -> Result<&mut Self> {
        codec::check_uint(value, byte_length)?;
        self.cursor.execute_write(byte_length, offset, |data, at| {
            codec::write_var(data, at, value, byte_length, endian)
        })?;
        Ok(self)
    }

    fn int(
        &mut self,
        value: i64,
        endian: Endian,
        offset: Option<usize>,
        byte_length: usize,
    ) -> Result<&mut Self> {
        codec::check_int(value, byte_length)?;
        self.cursor.execute_write(byte_length, offset, |data, at| {
            codec::write_var(data, at, value as u64, byte_length, endian)
        })?;
        Ok(self)
    }

    fn reduced_float(
        &mut self,
        value: f64,
        endian: Endian,
        offset: Option<usize>,
        byte_len: usize,
        mantissa_bits: u32,
    ) -> &mut Self {
        let written = self.cursor.execute_write(byte_len, offset, |data, at| {
            ieee754::write(value, codec::window_mut(data, at, byte_len)?, endian, mantissa_bits);
            Ok(at + byte_len)
        });
        debug_assert!(written.is_ok());
        self
    }

    fn sfloat(&mut self, value: f64, endian: Endian, offset: Option<usize>) -> &mut Self {
        self.reduced_float(value, endian, offset, 2, 12)
    }

    fn float24(&mut self, value: f64, endian: Endian, offset: Option<usize>) -> &mut Self {
        self.reduced_float(value, endian, offset, 4, 24)
    }

    byte_writes!(u8, i8);

    endian_writes! {
        /// Writes a `u16`.
        u16(value: u16) -> &mut Self => fixed::<u16>
    }

    endian_writes! {
        /// Writes an `i16`.
        i16(value: i16) -> &mut Self => fixed::<i16>
    }

    endian_writes! {
        /// Writes a `u32`.
        u32(value: u32) -> &mut Self => fixed::<u32>
    }

    endian_writes! {
        /// Writes an `i32`.
        i32(value: i32) -> &mut Self => fixed::<i32>
    }

    endian_writes! {
        /// Writes a `u64`.
        u64(value: u64) -> &mut Self => fixed::<u64>
    }

    endian_writes! {
        /// Writes an `i64`.
        i64(value: i64) -> &mut Self => fixed::<i64>
    }

    endian_writes! {
        /// Writes an `f32` using its 4-byte in-memory representation.
        f32(value: f32) -> &mut Self => fixed::<f32>
    }

    endian_writes! {
        /// Writes an `f64` using its 8-byte in-memory representation.
        f64(value: f64) -> &mut Self => fixed::<f64>
    }

    endian_writes! {
        /// Writes `value` as an unsigned integer of `byte_length` bytes (1 to 6).
        ///
        /// Fails with [`Error::ValueOutOfRange`](crate::Error::ValueOutOfRange) if `value` does
        /// not fit, rather than truncating it. Nothing is written in that case.
        uint(value: u64, byte_length: usize) -> Result<&mut Self> => uint
    }

    endian_writes! {
        /// Writes `value` as a two's complement integer of `byte_length` bytes (1 to 6).
        ///
        /// Fails with [`Error::ValueOutOfRange`](crate::Error::ValueOutOfRange) if `value` does
        /// not fit, rather than truncating it. Nothing is written in that case.
        int(value: i64, byte_length: usize) -> Result<&mut Self> => int
    }

    endian_writes! {
        /// Writes a 2-byte float: 1 sign bit, 3 exponent bits and a 12-bit mantissa. Magnitudes
        /// of 16 and above become infinity.
        sfloat12_16(value: f64) -> &mut Self => sfloat
    }

    endian_writes! {
        /// Writes a 4-byte float: 1 sign bit, 7 exponent bits and a 24-bit mantissa.
        float24_32(value: f64) -> &mut Self => float24
    }

    /// Writes `value` in `options.encoding`.
    ///
    /// `options.length` caps the number of bytes written (a missing or zero length means no
    /// cap). The buffer grows to hold the capped length, but only whole characters are written,
    /// so a cap that falls inside a multi-byte character writes fewer bytes than the cap. The
    /// cursor advances by the bytes actually written.
    ///
    /// The returned writer's [`len`](CursorAccess::len) is the length of the whole buffer, not
    /// the number of bytes written.
    pub fn write_string(&mut self, value: &str, options: &Options) -> Result<&mut Self> {
        let encoding = options.encoding;
        let encoded = encoding.encode(value)?;
        let full = encoded.len();
        let cap = options
            .length
            .filter(|&length| length > 0)
            .map_or(full, |length| length.min(full));
        let bytes = if cap < full {
            encoding.encode_bounded(value, cap)?
        } else {
            encoded
        };

        self.cursor.execute_write(cap, options.offset, |data, at| {
            codec::window_mut(data, at, bytes.len())?.copy_from_slice(&bytes);
            Ok(at + bytes.len())
        })?;
        Ok(self)
    }

    /// Copies `value` into the buffer.
    ///
    /// `options.length` caps the number of bytes copied (a missing or zero length means no cap).
    /// The buffer grows to hold all of `value` regardless of the cap. The cursor advances by the
    /// bytes actually copied.
    pub fn write_bytes(&mut self, value: &[u8], options: &Options) -> &mut Self {
        let count = options
            .length
            .filter(|&length| length > 0)
            .map_or(value.len(), |length| length.min(value.len()));
        let written = self.cursor.execute_write(value.len(), options.offset, |data, at| {
            codec::window_mut(data, at, count)?.copy_from_slice(&value[..count]);
            Ok(at + count)
        });
        debug_assert!(written.is_ok());
        self
    }

    /// Writes `value` as type `ty`, with `options` supplying the offset, the byte length of
    /// variable-width integers, and the length and encoding of text.
    ///
    /// Numeric strings are parsed before encoding, so `"00123"` and `123` write the same bytes.
    /// Values that do not fit `ty` (including negative values for unsigned types) fail with
    /// [`Error::ValueOutOfRange`](crate::Error::ValueOutOfRange).
    pub fn write_value(
        &mut self,
        ty: ValueType,
        value: &Value,
        options: &Options,
    ) -> Result<&mut Self> {
        let endian = ty.order.resolve(self.endian());
        let offset = options.offset;
        let name = ty.name();
        match ty.kind {
            Kind::UInt8 => self.fixed(value.to_integer::<u8>(name)?, endian, offset),
            Kind::Int8 => self.fixed(value.to_integer::<i8>(name)?, endian, offset),
            Kind::UInt16 => self.fixed(value.to_integer::<u16>(name)?, endian, offset),
            Kind::Int16 => self.fixed(value.to_integer::<i16>(name)?, endian, offset),
            Kind::UInt32 => self.fixed(value.to_integer::<u32>(name)?, endian, offset),
            Kind::Int32 => self.fixed(value.to_integer::<i32>(name)?, endian, offset),
            Kind::BigUInt64 => self.fixed(value.to_integer::<u64>(name)?, endian, offset),
            Kind::BigInt64 => self.fixed(value.to_integer::<i64>(name)?, endian, offset),
            Kind::UInt => {
                let byte_length = options.byte_length()?;
                self.uint(value.to_integer(name)?, endian, offset, byte_length)?
            }
            Kind::Int => {
                let byte_length = options.byte_length()?;
                self.int(value.to_integer(name)?, endian, offset, byte_length)?
            }
            Kind::Float => self.fixed(value.to_float(name)? as f32, endian, offset),
            Kind::Double => self.fixed(value.to_float(name)?, endian, offset),
            Kind::SFloat => self.sfloat(value.to_float(name)?, endian, offset),
            Kind::Float24 => self.float24(value.to_float(name)?, endian, offset),
            Kind::String => self.write_string(value.to_text(name)?, options)?,
            Kind::Bytes => self.write_bytes(value.to_bytes(name)?, options),
        };
        Ok(self)
    }

    /// Writes `value` as type `ty`. See [`Self::write_value`].
    pub fn set(
        &mut self,
        ty: ValueType,
        value: impl Into<Value>,
        options: &Options,
    ) -> Result<&mut Self> {
        self.write_value(ty, &value.into(), options)
    }

    /// Like [`Self::set`], with the type given by name (case-insensitive).
    pub fn set_by_name(
        &mut self,
        name: &str,
        value: impl Into<Value>,
        options: &Options,
    ) -> Result<&mut Self> {
        self.set(name.parse()?, value, options)
    }
}

impl Default for BufferWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorAccess for BufferWriter {
    type Storage = Vec<u8>;

    fn cursor(&self) -> &Cursor<Vec<u8>> {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut Cursor<Vec<u8>> {
        &mut self.cursor
    }
}
