use crate::codec::{self, Fixed};
use crate::cursor::{Cursor, CursorAccess, CursorOptions, Endian};
use crate::value::{Kind, Options, Value, ValueType};
use crate::{ieee754, Result};

/// Generates the default-order, little-endian and big-endian forms of a reader accessor, each
/// with an `_at` form that reads at an explicit offset and leaves the cursor alone.
macro_rules! endian_reads {
    (
        $(#[$meta:meta])*
        $name:ident($($arg:ident: $arg_ty:ty),*) -> $ret:ty => $inner:ident $(::<$gen:ty>)?
    ) => {
        paste::paste! {
            $(#[$meta])*
            #[inline]
            pub fn [<read_ $name>](&mut self $(, $arg: $arg_ty)*) -> Result<$ret> {
                self.$inner $(::<$gen>)? (self.endian(), None $(, $arg)*)
            }

            #[doc = "Like [`Self::read_" $name "`], always little-endian."]
            #[inline]
            pub fn [<read_ $name _le>](&mut self $(, $arg: $arg_ty)*) -> Result<$ret> {
                self.$inner $(::<$gen>)? (Endian::Little, None $(, $arg)*)
            }

            #[doc = "Like [`Self::read_" $name "`], always big-endian."]
            #[inline]
            pub fn [<read_ $name _be>](&mut self $(, $arg: $arg_ty)*) -> Result<$ret> {
                self.$inner $(::<$gen>)? (Endian::Big, None $(, $arg)*)
            }

            #[doc = "Like [`Self::read_" $name "`], at `offset`. The cursor does not move."]
            #[inline]
            pub fn [<read_ $name _at>](&mut self, offset: usize $(, $arg: $arg_ty)*) -> Result<$ret> {
                self.$inner $(::<$gen>)? (self.endian(), Some(offset) $(, $arg)*)
            }

            #[doc = "Like [`Self::read_" $name "_le`], at `offset`. The cursor does not move."]
            #[inline]
            pub fn [<read_ $name _le_at>](&mut self, offset: usize $(, $arg: $arg_ty)*) -> Result<$ret> {
                self.$inner $(::<$gen>)? (Endian::Little, Some(offset) $(, $arg)*)
            }

            #[doc = "Like [`Self::read_" $name "_be`], at `offset`. The cursor does not move."]
            #[inline]
            pub fn [<read_ $name _be_at>](&mut self, offset: usize $(, $arg: $arg_ty)*) -> Result<$ret> {
                self.$inner $(::<$gen>)? (Endian::Big, Some(offset) $(, $arg)*)
            }
        }
    };
}

macro_rules! byte_reads {
    ($($ty:ident),*) => {
        paste::paste! {
            $(
                #[doc = "Reads a single `" $ty "` value."]
                #[inline]
                pub fn [<read_ $ty>](&mut self) -> Result<$ty> {
                    self.fixed::<$ty>(Endian::Little, None)
                }

                #[doc = "Reads a single `" $ty "` value at `offset`. The cursor does not move."]
                #[inline]
                pub fn [<read_ $ty _at>](&mut self, offset: usize) -> Result<$ty> {
                    self.fixed::<$ty>(Endian::Little, Some(offset))
                }
            )*
        }
    };
}

/// Reads values from a slice of bytes at a tracked position.
///
/// Every accessor reads at the cursor and advances it past the value, or, in its `_at` form,
/// reads at an explicit offset without touching the cursor. Accessors without an `_le`/`_be`
/// suffix use the byte order given at construction (little-endian by default).
///
/// Reads past the end of the data fail with [`Error::OutOfRange`](crate::Error::OutOfRange)
/// and leave the cursor where it was. The cursor itself is never checked against the data
/// length; [`skip`](CursorAccess::skip) and [`skip_to`](CursorAccess::skip_to) may move it
/// anywhere.
///
/// ```
/// use cursor_binary_io::{BufferReader, CursorAccess};
///
/// let mut r = BufferReader::new(&[0x01, 0x02, 0x03, 0x04, 0x05]);
/// assert_eq!(r.read_u8_at(3).unwrap(), 4);
/// assert_eq!(r.offset(), 0);
/// assert_eq!(r.read_u16_be().unwrap(), 0x0102);
/// assert_eq!(r.offset(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct BufferReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> BufferReader<'a> {
    /// Constructor
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_options(data, CursorOptions::default())
    }

    /// Creates a reader with a starting offset and default byte order.
    pub fn with_options(data: &'a [u8], options: CursorOptions) -> Self {
        Self {
            cursor: Cursor::new(data, options),
        }
    }

    /// The data being read, with its original lifetime.
    pub fn data(&self) -> &'a [u8] {
        *self.cursor.storage()
    }

    #[inline(always)]
    fn fixed<T: Fixed>(&mut self, endian: Endian, offset: Option<usize>) -> Result<T> {
        self.cursor
            .execute_read(T::SIZE, offset, |data, at| T::read(data, at, endian))
    }

    fn uint(&mut self, endian: Endian, offset: Option<usize>, byte_length: usize) -> Result<u64> {
        self.cursor.execute_read(byte_length, offset, |data, at| {
            codec::read_uint(data, at, byte_length, endian)
        })
    }

    fn int(&mut self, endian: Endian, offset: Option<usize>, byte_length: usize) -> Result<i64> {
        self.cursor.execute_read(byte_length, offset, |data, at| {
            codec::read_int(data, at, byte_length, endian)
        })
    }

    fn reduced_float(
        &mut self,
        endian: Endian,
        offset: Option<usize>,
        byte_len: usize,
        mantissa_bits: u32,
    ) -> Result<f64> {
        self.cursor.execute_read(byte_len, offset, |data, at| {
            let bytes = codec::window(data, at, byte_len)?;
            Ok(ieee754::read(bytes, endian, mantissa_bits))
        })
    }

    fn sfloat(&mut self, endian: Endian, offset: Option<usize>) -> Result<f64> {
        self.reduced_float(endian, offset, 2, 12)
    }

    fn float24(&mut self, endian: Endian, offset: Option<usize>) -> Result<f64> {
        self.reduced_float(endian, offset, 4, 24)
    }

    byte_reads!(u8, i8);

    endian_reads! {
        /// Reads a `u16`.
        u16() -> u16 => fixed::<u16>
    }

    endian_reads! {
        /// Reads an `i16`.
        i16() -> i16 => fixed::<i16>
    }

    endian_reads! {
        /// Reads a `u32`.
        u32() -> u32 => fixed::<u32>
    }

    endian_reads! {
        /// Reads an `i32`.
        i32() -> i32 => fixed::<i32>
    }

    endian_reads! {
        /// Reads a `u64`.
        u64() -> u64 => fixed::<u64>
    }

    endian_reads! {
        /// Reads an `i64`.
        i64() -> i64 => fixed::<i64>
    }

    endian_reads! {
        /// Reads an IEEE 754 single-precision float.
        f32() -> f32 => fixed::<f32>
    }

    endian_reads! {
        /// Reads an IEEE 754 double-precision float.
        f64() -> f64 => fixed::<f64>
    }

    endian_reads! {
        /// Reads an unsigned integer stored in `byte_length` bytes (1 to 6).
        uint(byte_length: usize) -> u64 => uint
    }

    endian_reads! {
        /// Reads a two's complement integer stored in `byte_length` bytes (1 to 6) and
        /// sign-extends it.
        int(byte_length: usize) -> i64 => int
    }

    endian_reads! {
        /// Reads a 2-byte float: 1 sign bit, 3 exponent bits and a 12-bit mantissa.
        sfloat12_16() -> f64 => sfloat
    }

    endian_reads! {
        /// Reads a 4-byte float: 1 sign bit, 7 exponent bits and a 24-bit mantissa.
        float24_32() -> f64 => float24
    }

    /// Reads `options.length` bytes as text in `options.encoding`.
    ///
    /// A missing or zero length yields an empty string without moving the cursor. The byte
    /// range is clamped to the data, but the cursor always advances by the full length (unless
    /// `options.offset` is set, in which case it does not move).
    pub fn read_string(&mut self, options: &Options) -> Result<String> {
        let length = options.length.unwrap_or(0);
        if length == 0 {
            return Ok(String::new());
        }
        let encoding = options.encoding;
        self.cursor.execute_read(length, options.offset, |data, at| {
            Ok(encoding.decode(clamped(data, at, length)))
        })
    }

    /// Reads `options.length` bytes. This function returns a slice reference to the bytes; it
    /// does not copy them.
    ///
    /// The defaults and the cursor movement are the same as for [`Self::read_string`].
    pub fn read_bytes(&mut self, options: &Options) -> Result<&'a [u8]> {
        let length = options.length.unwrap_or(0);
        if length == 0 {
            return Ok(&[]);
        }
        self.cursor
            .execute_read(length, options.offset, |&data, at| Ok(clamped(data, at, length)))
    }

    /// Reads `options.length` bytes and returns them as a `bstr::BStr`.
    ///
    /// The caller must handle validating that the string is well-formed UTF-8, if necessary.
    #[cfg(feature = "bstr")]
    pub fn read_bstr(&mut self, options: &Options) -> Result<&'a bstr::BStr> {
        Ok(bstr::BStr::new(self.read_bytes(options)?))
    }

    /// Reads a value of type `ty`, with `options` supplying the offset, the byte length of
    /// variable-width integers, and the length and encoding of text.
    pub fn read_value(&mut self, ty: ValueType, options: &Options) -> Result<Value> {
        let endian = ty.order.resolve(self.endian());
        let offset = options.offset;
        Ok(match ty.kind {
            Kind::UInt8 => self.fixed::<u8>(endian, offset)?.into(),
            Kind::Int8 => self.fixed::<i8>(endian, offset)?.into(),
            Kind::UInt16 => self.fixed::<u16>(endian, offset)?.into(),
            Kind::Int16 => self.fixed::<i16>(endian, offset)?.into(),
            Kind::UInt32 => self.fixed::<u32>(endian, offset)?.into(),
            Kind::Int32 => self.fixed::<i32>(endian, offset)?.into(),
            Kind::BigUInt64 => self.fixed::<u64>(endian, offset)?.into(),
            Kind::BigInt64 => self.fixed::<i64>(endian, offset)?.into(),
            Kind::UInt => self.uint(endian, offset, options.byte_length()?)?.into(),
            Kind::Int => self.int(endian, offset, options.byte_length()?)?.into(),
            Kind::Float => self.fixed::<f32>(endian, offset)?.into(),
            Kind::Double => self.fixed::<f64>(endian, offset)?.into(),
            Kind::SFloat => self.sfloat(endian, offset)?.into(),
            Kind::Float24 => self.float24(endian, offset)?.into(),
            Kind::String => Value::Text(self.read_string(options)?),
            Kind::Bytes => Value::Bytes(self.read_bytes(options)?.to_vec()),
        })
    }

    /// Lenient form of [`Self::read_value`]: failures are logged and turned into `None`.
    pub fn get(&mut self, ty: ValueType, options: &Options) -> Option<Value> {
        match self.read_value(ty, options) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(%ty, offset = ?options.offset, %err, "get failed");
                None
            }
        }
    }

    /// Like [`Self::get`], with the type given by name (case-insensitive).
    pub fn get_by_name(&mut self, name: &str, options: &Options) -> Option<Value> {
        match name.parse() {
            Ok(ty) => self.get(ty, options),
            Err(err) => {
                tracing::warn!(name, %err, "get failed");
                None
            }
        }
    }
}

impl<'a> CursorAccess for BufferReader<'a> {
    type Storage = &'a [u8];

    fn cursor(&self) -> &Cursor<&'a [u8]> {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut Cursor<&'a [u8]> {
        &mut self.cursor
    }
}

/// The `length` bytes at `at`, cut short at the end of `data`.
fn clamped(data: &[u8], at: usize, length: usize) -> &[u8] {
    let start = at.min(data.len());
    let end = at.saturating_add(length).min(data.len());
    &data[start..end]
}
