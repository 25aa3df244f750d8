//! Binary floating point with an arbitrary split between exponent and mantissa.
//!
//! A format is described by its total byte length `n` and its mantissa width `m`; the sign takes
//! one bit and the exponent takes the remaining `8 * n - m - 1` bits, biased by
//! `2^(e - 1) - 1`. With `(m, n) = (23, 4)` and `(52, 8)` these are exactly `f32` and `f64`.
//!
//! Encoding rounds to nearest, ties to even, overflows to infinity and underflows gradually
//! through subnormals.

use crate::Endian;

struct Layout {
    total_bits: u32,
    mantissa_bits: u32,
    exp_max: u64,
    bias: i32,
}

impl Layout {
    fn new(byte_len: usize, mantissa_bits: u32) -> Self {
        let total_bits = 8 * byte_len as u32;
        debug_assert!(byte_len <= 8 && mantissa_bits + 2 < total_bits);
        let exp_bits = total_bits - mantissa_bits - 1;
        Self {
            total_bits,
            mantissa_bits,
            exp_max: (1 << exp_bits) - 1,
            bias: (1 << (exp_bits - 1)) - 1,
        }
    }

    fn mantissa_mask(&self) -> u64 {
        (1 << self.mantissa_bits) - 1
    }
}

/// Computes `x * 2^exp` without intermediate overflow or underflow.
fn ldexp(mut x: f64, mut exp: i32) -> f64 {
    fn pow2(exp: i32) -> f64 {
        f64::from_bits(((exp + 1023) as u64) << 52)
    }

    while exp > 1023 {
        x *= pow2(1023);
        exp -= 1023;
    }
    while exp < -1022 {
        x *= pow2(-1022);
        exp += 1022;
    }
    x * pow2(exp)
}

/// Shifts `x` right by `drop` bits, rounding to nearest with ties to even.
fn round_shift(x: u64, drop: u32) -> u64 {
    if drop == 0 {
        return x;
    }
    if drop >= 64 {
        return 0;
    }
    let q = x >> drop;
    let r = x & ((1 << drop) - 1);
    let half = 1 << (drop - 1);
    if r > half || (r == half && q & 1 == 1) {
        q + 1
    } else {
        q
    }
}

/// Decodes a float stored in `bytes` using a `mantissa_bits`-bit mantissa.
pub fn read(bytes: &[u8], endian: Endian, mantissa_bits: u32) -> f64 {
    let layout = Layout::new(bytes.len(), mantissa_bits);
    let fold = |acc: u64, &b: &u8| (acc << 8) | u64::from(b);
    let raw = match endian {
        Endian::Little => bytes.iter().rev().fold(0, fold),
        Endian::Big => bytes.iter().fold(0, fold),
    };

    let negative = (raw >> (layout.total_bits - 1)) & 1 == 1;
    let exponent = (raw >> mantissa_bits) & layout.exp_max;
    let mantissa = raw & layout.mantissa_mask();
    let m = mantissa_bits as i32;

    let magnitude = if exponent == 0 {
        ldexp(mantissa as f64, 1 - layout.bias - m)
    } else if exponent == layout.exp_max {
        if mantissa == 0 {
            f64::INFINITY
        } else {
            f64::NAN
        }
    } else {
        let significand = mantissa | (1 << mantissa_bits);
        ldexp(significand as f64, exponent as i32 - layout.bias - m)
    };

    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// Encodes `value` into `out` using a `mantissa_bits`-bit mantissa. The format's byte length is
/// `out.len()`.
pub fn write(value: f64, out: &mut [u8], endian: Endian, mantissa_bits: u32) {
    let layout = Layout::new(out.len(), mantissa_bits);
    let m = mantissa_bits;

    let bits = if value.is_nan() {
        (layout.exp_max << m) | (1 << (m - 1))
    } else if value.is_infinite() {
        layout.exp_max << m
    } else if value == 0.0 {
        0
    } else {
        // |value| = sig * 2^(e2 - 52), with bit 52 of sig set.
        let raw = value.abs().to_bits();
        let biased = ((raw >> 52) & 0x7ff) as i32;
        let fraction = raw & ((1 << 52) - 1);
        let (sig, e2) = if biased == 0 {
            let shift = fraction.leading_zeros() - 11;
            (fraction << shift, -1022 - shift as i32)
        } else {
            (fraction | (1 << 52), biased - 1023)
        };

        let target = e2 + layout.bias;
        let encoded = if target >= 1 {
            // The hidden bit lands in the exponent field, so a rounding carry bumps it for free.
            let rounded = round_shift(sig, 52 - m);
            (((target - 1) as u64) << m) + rounded
        } else {
            round_shift(sig, 52 - m + (1 - target) as u32)
        };

        if (encoded >> m) >= layout.exp_max {
            layout.exp_max << m
        } else {
            encoded
        }
    };

    let sign = u64::from(value.is_sign_negative() && !value.is_nan());
    let raw = (sign << (layout.total_bits - 1)) | bits;
    let len = out.len();
    for (i, slot) in out.iter_mut().enumerate() {
        let shift = match endian {
            Endian::Little => 8 * i,
            Endian::Big => 8 * (len - 1 - i),
        };
        *slot = (raw >> shift) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: f64, len: usize, m: u32) -> Vec<u8> {
        let mut out = vec![0; len];
        write(value, &mut out, Endian::Little, m);
        out
    }

    #[test]
    fn matches_native_f32() {
        for x in [1.0f64, -2.5, 0.1, 3.4e38, 1.0e-40, 126.422234, f64::MAX, -0.0] {
            assert_eq!(encode(x, 4, 23), (x as f32).to_le_bytes(), "x = {x}");
            assert_eq!(read(&(x as f32).to_le_bytes(), Endian::Little, 23), (x as f32) as f64);
        }
    }

    #[test]
    fn matches_native_f64() {
        for x in [1.0f64, -2.5, 0.1, f64::MAX, f64::MIN_POSITIVE, 5e-324, 1.0e-310] {
            assert_eq!(encode(x, 8, 52), x.to_le_bytes(), "x = {x}");
            assert_eq!(read(&x.to_be_bytes(), Endian::Big, 52), x);
        }
    }

    #[test]
    fn specials() {
        assert_eq!(read(&encode(f64::INFINITY, 2, 12), Endian::Little, 12), f64::INFINITY);
        assert_eq!(read(&encode(f64::NEG_INFINITY, 4, 24), Endian::Little, 24), f64::NEG_INFINITY);
        assert!(read(&encode(f64::NAN, 2, 12), Endian::Little, 12).is_nan());
        // Three exponent bits cannot hold 2^4.
        assert_eq!(read(&encode(100.0, 2, 12), Endian::Little, 12), f64::INFINITY);
    }

    #[test]
    fn sfloat_layout() {
        // 1 sign bit, 3 exponent bits (bias 3), 12 mantissa bits.
        assert_eq!(encode(1.0, 2, 12), [0x00, 0x30]);
        assert_eq!(encode(-1.5, 2, 12), [0x00, 0xb8]);
        assert_eq!(read(&[0x30, 0x00], Endian::Big, 12), 1.0);
    }
}
