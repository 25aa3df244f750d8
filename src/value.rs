//! Descriptors for the dynamic `get`/`set` accessors.
//!
//! A [`ValueType`] names one accessor of [`BufferReader`](crate::BufferReader) and
//! [`BufferWriter`](crate::BufferWriter): a value [`Kind`] plus an [`Order`]. Names are resolved
//! through a static table, case-insensitively, so `"UInt16BE"`, `"uint16be"` and `"UINT16BE"`
//! all describe the same accessor.

use core::fmt;
use core::str::FromStr;

use crate::{Endian, Error, Result, TextEncoding};

/// The shape of a value, independent of byte order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Kind {
    /// `u8`
    UInt8,
    /// `i8`
    Int8,
    /// `u16`
    UInt16,
    /// `i16`
    Int16,
    /// `u32`
    UInt32,
    /// `i32`
    Int32,
    /// `u64`
    BigUInt64,
    /// `i64`
    BigInt64,
    /// Unsigned integer of 1 to 6 bytes.
    UInt,
    /// Two's complement integer of 1 to 6 bytes.
    Int,
    /// `f32`
    Float,
    /// `f64`
    Double,
    /// 2-byte float with a 12-bit mantissa.
    SFloat,
    /// 4-byte float with a 24-bit mantissa.
    Float24,
    /// Encoded text.
    String,
    /// Raw bytes.
    Bytes,
}

impl Kind {
    /// Encoded size in bytes, if it does not depend on the value or on options.
    pub fn fixed_size(self) -> Option<usize> {
        match self {
            Self::UInt8 | Self::Int8 => Some(1),
            Self::UInt16 | Self::Int16 | Self::SFloat => Some(2),
            Self::UInt32 | Self::Int32 | Self::Float | Self::Float24 => Some(4),
            Self::BigUInt64 | Self::BigInt64 | Self::Double => Some(8),
            Self::UInt | Self::Int | Self::String | Self::Bytes => None,
        }
    }

    /// Whether the encoding depends on byte order.
    pub fn has_order(self) -> bool {
        !matches!(self, Self::UInt8 | Self::Int8 | Self::String | Self::Bytes)
    }
}

/// Which byte order an accessor uses.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Order {
    /// The reader's or writer's configured byte order.
    #[default]
    Default,
    /// Always little-endian.
    Little,
    /// Always big-endian.
    Big,
}

impl Order {
    /// Picks the concrete byte order, falling back to `default`.
    #[inline]
    pub fn resolve(self, default: Endian) -> Endian {
        match self {
            Self::Default => default,
            Self::Little => Endian::Little,
            Self::Big => Endian::Big,
        }
    }
}

/// Describes one accessor: what is encoded and in which byte order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ValueType {
    /// What is encoded.
    pub kind: Kind,
    /// The byte order. Always `Order::Default` for kinds without one.
    pub order: Order,
}

const fn vt(kind: Kind, order: Order) -> ValueType {
    ValueType { kind, order }
}

macro_rules! name_table {
    ($($kind:ident: $name:literal $(, $le:literal, $be:literal)?;)*) => {
        &[$(
            ($name, vt(Kind::$kind, Order::Default)),
            $(
                ($le, vt(Kind::$kind, Order::Little)),
                ($be, vt(Kind::$kind, Order::Big)),
            )?
        )*]
    };
}

/// Every accessor, by canonical name.
static CANONICAL: &[(&str, ValueType)] = name_table! {
    UInt8: "UInt8";
    Int8: "Int8";
    UInt16: "UInt16", "UInt16LE", "UInt16BE";
    Int16: "Int16", "Int16LE", "Int16BE";
    UInt32: "UInt32", "UInt32LE", "UInt32BE";
    Int32: "Int32", "Int32LE", "Int32BE";
    BigUInt64: "BigUInt64", "BigUInt64LE", "BigUInt64BE";
    BigInt64: "BigInt64", "BigInt64LE", "BigInt64BE";
    UInt: "UInt", "UIntLE", "UIntBE";
    Int: "Int", "IntLE", "IntBE";
    Float: "Float", "FloatLE", "FloatBE";
    Double: "Double", "DoubleLE", "DoubleBE";
    SFloat: "SFloat12_16", "SFloat12_16LE", "SFloat12_16BE";
    Float24: "Float24_32", "Float24_32LE", "Float24_32BE";
    String: "String";
    Bytes: "Bytes";
};

/// Alternative spellings accepted by [`ValueType::from_str`].
static ALIASES: &[(&str, ValueType)] = name_table! {
    Float: "Float32", "Float32LE", "Float32BE";
    Float: "Float4", "Float4LE", "Float4BE";
    Double: "Float64", "Float64LE", "Float64BE";
    Double: "Double8", "Double8LE", "Double8BE";
    SFloat: "SFloat", "SFloatLE", "SFloatBE";
    String: "AsString";
    String: "UTF8";
};

impl ValueType {
    /// Describes an accessor. Kinds without a byte order ignore `order`.
    pub const fn new(kind: Kind, order: Order) -> Self {
        match kind {
            Kind::UInt8 | Kind::Int8 | Kind::String | Kind::Bytes => vt(kind, Order::Default),
            _ => vt(kind, order),
        }
    }

    /// The canonical name, e.g. `"UInt16BE"`.
    pub fn name(self) -> &'static str {
        CANONICAL
            .iter()
            .find(|(_, ty)| *ty == self)
            .map_or("?", |&(name, _)| name)
    }

    /// Every accessor implemented by both the reader and the writer.
    pub fn all() -> impl Iterator<Item = ValueType> {
        CANONICAL.iter().map(|&(_, ty)| ty)
    }
}

/// Canonical names of every accessor implemented by both the reader and the writer.
pub fn types() -> Vec<&'static str> {
    CANONICAL.iter().map(|&(name, _)| name).collect()
}

impl FromStr for ValueType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        CANONICAL
            .iter()
            .chain(ALIASES)
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|&(_, ty)| ty)
            .ok_or_else(|| Error::UnknownType(s.to_string()))
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A dynamically typed value moved through `get` and `set`.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Any integer; wide enough for both `u64` and `i64`.
    Int(i128),
    /// A float.
    Float(f64),
    /// Text, or a numeric string when written through a numeric accessor.
    Text(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
}

impl Value {
    fn shape(&self) -> &'static str {
        match self {
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
        }
    }

    /// The value as an integer, if it is one.
    pub fn as_int(&self) -> Option<i128> {
        match *self {
            Self::Int(i) => Some(i),
            _ => None,
        }
    }

    /// The value as a float. Integers convert.
    pub fn as_float(&self) -> Option<f64> {
        match *self {
            Self::Float(f) => Some(f),
            Self::Int(i) => Some(i as f64),
            _ => None,
        }
    }

    /// The value as text, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The value as bytes, if it is bytes.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Converts to the integer type `T`. Numeric strings are parsed first, so `"00123"`,
    /// `"+123"` and `123` give the same result. Values outside `T`'s range are rejected.
    pub(crate) fn to_integer<T: TryFrom<i128>>(&self, kind: &'static str) -> Result<T> {
        let wide = match self {
            Self::Int(i) => *i,
            Self::Float(f) if f.is_finite() && f.fract() == 0.0 => {
                if f.abs() >= 2f64.powi(127) {
                    return Err(out_of_range(kind, f));
                }
                *f as i128
            }
            Self::Float(f) => return Err(Error::InvalidNumber(f.to_string())),
            Self::Text(s) => s
                .trim()
                .parse::<i128>()
                .map_err(|_| Error::InvalidNumber(s.clone()))?,
            Self::Bytes(_) => {
                return Err(Error::TypeMismatch {
                    kind,
                    found: self.shape(),
                })
            }
        };
        T::try_from(wide).map_err(|_| out_of_range(kind, wide))
    }

    /// Converts to `f64`, parsing numeric strings.
    pub(crate) fn to_float(&self, kind: &'static str) -> Result<f64> {
        match self {
            Self::Int(i) => Ok(*i as f64),
            Self::Float(f) => Ok(*f),
            Self::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| Error::InvalidNumber(s.clone())),
            Self::Bytes(_) => Err(Error::TypeMismatch {
                kind,
                found: self.shape(),
            }),
        }
    }

    pub(crate) fn to_text(&self, kind: &'static str) -> Result<&str> {
        self.as_text().ok_or(Error::TypeMismatch {
            kind,
            found: self.shape(),
        })
    }

    /// Bytes as-is; text as its UTF-8 bytes.
    pub(crate) fn to_bytes(&self, kind: &'static str) -> Result<&[u8]> {
        match self {
            Self::Bytes(b) => Ok(b),
            Self::Text(s) => Ok(s.as_bytes()),
            _ => Err(Error::TypeMismatch {
                kind,
                found: self.shape(),
            }),
        }
    }
}

fn out_of_range(kind: &'static str, value: impl fmt::Display) -> Error {
    Error::ValueOutOfRange {
        kind,
        value: value.to_string(),
    }
}

macro_rules! value_from {
    ($variant:ident: $($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

value_from!(Int: u8, i8, u16, i16, u32, i32, u64, i64);
value_from!(Float: f32, f64);
value_from!(Text: String, &str);
value_from!(Bytes: Vec<u8>, &[u8]);

/// Per-call options for text, byte and dynamic accessors.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Options {
    /// Access this offset instead of the cursor, leaving the cursor in place.
    pub offset: Option<usize>,
    /// Byte count for text and bytes; byte length for variable-width integers.
    pub length: Option<usize>,
    /// Text encoding.
    pub encoding: TextEncoding,
}

impl Options {
    /// No offset, no length, UTF-8.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an explicit offset.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets the length.
    pub fn length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    /// Sets the text encoding.
    pub fn encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub(crate) fn byte_length(&self) -> Result<usize> {
        self.length.ok_or(Error::InvalidByteLength(0))
    }
}
