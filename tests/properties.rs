//! Property-based tests for the reader and writer.
//!
//! # Round trips
//! - Any sequence of typed writes reads back identically, through every accessor form and
//!   under either construction-time byte order
//! - Written bytes match the native encoding in the resolved byte order
//! - Reduced-precision floats read back within their precision
//! - Variable-width integers read back within their byte length
//!
//! # Cursor movement
//! - The position after a sequence of writes is the sum of their sizes
//! - Accesses at an explicit offset never move the cursor
//! - Growth preserves existing bytes and zero-fills any gap
//!
//! # Text truncation
//! - Truncated text never splits a character and loses fewer than 4 bytes against the cap

use cursor_binary_io::{
    BufferReader, BufferWriter, CursorAccess, CursorOptions, Endian, Options, TextEncoding,
};
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

/// Which accessor form an op goes through.
#[derive(Clone, Copy, Debug)]
enum Access {
    /// The unsuffixed accessor, using the byte order given at construction.
    Default,
    Little,
    Big,
}

/// Calls `$method`, `$method_le` or `$method_be` on `$target` depending on `$access`.
macro_rules! by_access {
    ($target:expr, $access:expr, $method:ident($($arg:expr),*)) => {
        paste::paste! {
            match $access {
                Access::Default => $target.$method($($arg),*),
                Access::Little => $target.[<$method _le>]($($arg),*),
                Access::Big => $target.[<$method _be>]($($arg),*),
            }
        }
    };
}

#[derive(Clone, Debug)]
enum Op {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    F32(f32),
    F64(f64),
    UInt(u64, usize),
    Int(i64, usize),
    Bytes(Vec<u8>),
}

impl Op {
    fn size(&self) -> usize {
        match self {
            Op::U8(_) | Op::I8(_) => 1,
            Op::U16(_) | Op::I16(_) => 2,
            Op::U32(_) | Op::I32(_) | Op::F32(_) => 4,
            Op::U64(_) | Op::I64(_) | Op::F64(_) => 8,
            Op::UInt(_, n) | Op::Int(_, n) => *n,
            Op::Bytes(b) => b.len(),
        }
    }

    fn write(&self, w: &mut BufferWriter, access: Access) {
        match *self {
            Op::U8(v) => {
                w.write_u8(v);
            }
            Op::I8(v) => {
                w.write_i8(v);
            }
            Op::U16(v) => {
                by_access!(w, access, write_u16(v));
            }
            Op::I16(v) => {
                by_access!(w, access, write_i16(v));
            }
            Op::U32(v) => {
                by_access!(w, access, write_u32(v));
            }
            Op::I32(v) => {
                by_access!(w, access, write_i32(v));
            }
            Op::U64(v) => {
                by_access!(w, access, write_u64(v));
            }
            Op::I64(v) => {
                by_access!(w, access, write_i64(v));
            }
            Op::F32(v) => {
                by_access!(w, access, write_f32(v));
            }
            Op::F64(v) => {
                by_access!(w, access, write_f64(v));
            }
            Op::UInt(v, n) => {
                by_access!(w, access, write_uint(v, n)).unwrap();
            }
            Op::Int(v, n) => {
                by_access!(w, access, write_int(v, n)).unwrap();
            }
            Op::Bytes(ref b) => {
                w.write_bytes(b, &Options::new());
            }
        }
    }

    /// Reads the same op back and reports whether it matches.
    fn read_matches(&self, r: &mut BufferReader<'_>, access: Access) -> bool {
        match *self {
            Op::U8(v) => r.read_u8() == Ok(v),
            Op::I8(v) => r.read_i8() == Ok(v),
            Op::U16(v) => by_access!(r, access, read_u16()) == Ok(v),
            Op::I16(v) => by_access!(r, access, read_i16()) == Ok(v),
            Op::U32(v) => by_access!(r, access, read_u32()) == Ok(v),
            Op::I32(v) => by_access!(r, access, read_i32()) == Ok(v),
            Op::U64(v) => by_access!(r, access, read_u64()) == Ok(v),
            Op::I64(v) => by_access!(r, access, read_i64()) == Ok(v),
            Op::F32(v) => by_access!(r, access, read_f32()).map(f32::to_bits) == Ok(v.to_bits()),
            Op::F64(v) => by_access!(r, access, read_f64()).map(f64::to_bits) == Ok(v.to_bits()),
            Op::UInt(v, n) => by_access!(r, access, read_uint(n)) == Ok(v),
            Op::Int(v, n) => by_access!(r, access, read_int(n)) == Ok(v),
            Op::Bytes(ref b) => {
                r.read_bytes(&Options::new().length(b.len())) == Ok(b.as_slice())
            }
        }
    }

    /// The bytes the op must produce when written in `endian`.
    fn expected_bytes(&self, endian: Endian) -> Vec<u8> {
        macro_rules! ordered {
            ($v:expr) => {
                match endian {
                    Endian::Little => $v.to_le_bytes().to_vec(),
                    Endian::Big => $v.to_be_bytes().to_vec(),
                }
            };
        }
        match *self {
            Op::U8(v) => vec![v],
            Op::I8(v) => vec![v as u8],
            Op::U16(v) => ordered!(v),
            Op::I16(v) => ordered!(v),
            Op::U32(v) => ordered!(v),
            Op::I32(v) => ordered!(v),
            Op::U64(v) => ordered!(v),
            Op::I64(v) => ordered!(v),
            Op::F32(v) => ordered!(v),
            Op::F64(v) => ordered!(v),
            Op::UInt(v, n) => {
                let bytes = v.to_be_bytes()[8 - n..].to_vec();
                match endian {
                    Endian::Little => bytes.into_iter().rev().collect(),
                    Endian::Big => bytes,
                }
            }
            Op::Int(v, n) => {
                let bytes = v.to_be_bytes()[8 - n..].to_vec();
                match endian {
                    Endian::Little => bytes.into_iter().rev().collect(),
                    Endian::Big => bytes,
                }
            }
            Op::Bytes(ref b) => b.clone(),
        }
    }
}

fn arb_uint() -> impl Strategy<Value = Op> {
    (1usize..=6).prop_flat_map(|n| {
        let max = u64::MAX >> (64 - 8 * n);
        (0..=max).prop_map(move |v| Op::UInt(v, n))
    })
}

fn arb_int() -> impl Strategy<Value = Op> {
    (1usize..=6).prop_flat_map(|n| {
        let limit = 1i64 << (8 * n - 1);
        (-limit..limit).prop_map(move |v| Op::Int(v, n))
    })
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u8>().prop_map(Op::U8),
        any::<i8>().prop_map(Op::I8),
        any::<u16>().prop_map(Op::U16),
        any::<i16>().prop_map(Op::I16),
        any::<u32>().prop_map(Op::U32),
        any::<i32>().prop_map(Op::I32),
        any::<u64>().prop_map(Op::U64),
        any::<i64>().prop_map(Op::I64),
        any::<f32>().prop_map(Op::F32),
        any::<f64>().prop_map(Op::F64),
        arb_uint(),
        arb_int(),
        proptest::collection::vec(any::<u8>(), 1..16).prop_map(Op::Bytes),
    ]
}

fn arb_endian() -> impl Strategy<Value = Endian> {
    prop_oneof![Just(Endian::Little), Just(Endian::Big)]
}

fn arb_access() -> impl Strategy<Value = Access> {
    prop_oneof![Just(Access::Default), Just(Access::Little), Just(Access::Big)]
}

/// The byte order an accessor form resolves to under a construction-time `default`.
fn resolve(access: Access, default: Endian) -> Endian {
    match access {
        Access::Default => default,
        Access::Little => Endian::Little,
        Access::Big => Endian::Big,
    }
}

// ============================================================================
// Round Trips and Cursor Movement
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Writes read back identically through the same accessor form, the bytes match the native
    /// encoding in the resolved byte order, and both cursors end at the sum of the sizes.
    #[test]
    fn sequence_round_trip(
        ops in proptest::collection::vec((arb_op(), arb_access()), 0..24),
        endian in arb_endian(),
    ) {
        let options = CursorOptions::new().endian(endian);
        let mut w = BufferWriter::with_options(Vec::new(), options);
        let mut expected = Vec::new();
        for (op, access) in &ops {
            op.write(&mut w, *access);
            expected.extend(op.expected_bytes(resolve(*access, endian)));
        }
        let total: usize = ops.iter().map(|(op, _)| op.size()).sum();
        prop_assert_eq!(w.offset(), total);
        prop_assert_eq!(w.len(), total);
        prop_assert_eq!(w.buffer(), expected.as_slice());

        let mut r = BufferReader::with_options(w.buffer(), options);
        for (op, access) in &ops {
            prop_assert!(op.read_matches(&mut r, *access), "mismatch reading {:?} via {:?}", op, access);
        }
        prop_assert_eq!(r.offset(), total);
        prop_assert!(!r.is_before_end());
    }

    /// Reduced-precision floats read back within their precision, in every accessor form.
    #[test]
    fn reduced_float_round_trip(
        short in -15.9f64..15.9,
        wide in -1000.0f64..1000.0,
        access in arb_access(),
        endian in arb_endian(),
    ) {
        let options = CursorOptions::new().endian(endian);
        let mut w = BufferWriter::with_options(Vec::new(), options);
        by_access!(w, access, write_sfloat12_16(short));
        by_access!(w, access, write_float24_32(wide));
        prop_assert_eq!(w.len(), 6);

        let mut r = BufferReader::with_options(w.buffer(), options);
        let short_back = by_access!(r, access, read_sfloat12_16()).unwrap();
        let wide_back = by_access!(r, access, read_float24_32()).unwrap();
        prop_assert!((short_back - short).abs() < 1e-3, "{} read back as {}", short, short_back);
        prop_assert!((wide_back - wide).abs() < 1e-4, "{} read back as {}", wide, wide_back);
        prop_assert_eq!(r.offset(), 6);
    }

    /// Accesses at an explicit offset leave the cursor where it was.
    #[test]
    fn explicit_offset_keeps_position(
        skip in 0usize..32,
        offset in 0usize..64,
        value in any::<u32>(),
    ) {
        let mut w = BufferWriter::new();
        w.skip(skip);
        w.write_u32_be_at(value, offset);
        prop_assert_eq!(w.offset(), skip);

        let mut r = BufferReader::new(w.buffer());
        r.skip(skip);
        prop_assert_eq!(r.read_u32_be_at(offset), Ok(value));
        prop_assert_eq!(r.offset(), skip);
    }

    /// Growing the buffer keeps its prefix and zero-fills the gap.
    #[test]
    fn growth_preserves_prefix(
        initial in proptest::collection::vec(any::<u8>(), 0..32),
        offset in 0usize..48,
        value in any::<u64>(),
    ) {
        let mut w = BufferWriter::wrap(initial.clone());
        w.write_u64_at(value, offset);

        let buf = w.buffer();
        prop_assert_eq!(buf.len(), initial.len().max(offset + 8));
        let kept = initial.len().min(offset);
        prop_assert_eq!(&buf[..kept], &initial[..kept]);
        if offset > initial.len() {
            prop_assert!(buf[initial.len()..offset].iter().all(|&b| b == 0));
        }
        prop_assert_eq!(&buf[offset..offset + 8], &value.to_le_bytes()[..]);
    }
}

// ============================================================================
// Text Truncation
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// UTF-8 truncation keeps whole characters only.
    #[test]
    fn utf8_truncation_is_clean(text in "\\PC{0,24}", cap in 1usize..64) {
        let full = text.len();
        let mut w = BufferWriter::new();
        w.write_string(&text, &Options::new().length(cap)).unwrap();

        let written = w.offset();
        let limit = cap.min(full);
        prop_assert_eq!(w.len(), limit);
        prop_assert!(written <= limit);
        prop_assert!(limit - written < 4);

        let prefix = std::str::from_utf8(&w.buffer()[..written]);
        prop_assert!(prefix.is_ok());
        prop_assert!(text.starts_with(prefix.unwrap_or_default()));
    }

    /// UTF-16 truncation keeps whole code unit pairs.
    #[test]
    fn utf16_truncation_is_clean(text in "\\PC{0,24}", cap in 1usize..64) {
        let options = Options::new().length(cap).encoding(TextEncoding::Utf16Le);
        let mut w = BufferWriter::new();
        w.write_string(&text, &options).unwrap();

        let written = w.offset();
        prop_assert_eq!(written % 2, 0);
        prop_assert!(w.len() - written < 4);

        let mut r = BufferReader::new(w.buffer());
        let decoded = r
            .read_string(&Options::new().length(written).encoding(TextEncoding::Utf16Le))
            .unwrap();
        prop_assert!(text.starts_with(&decoded));
    }
}
