//! Floating point keys.
//!
//! The IEEE bit pattern is reinterpreted as an unsigned integer, then negatives have every bit
//! inverted and non-negatives get their sign bit set. Unsigned order of the result is IEEE
//! total order: `-inf < negative < -0.0 < +0.0 < positive < +inf < NaN`. NaNs have their sign
//! bit cleared first, so every NaN sorts last whatever its sign; x86 arithmetic produces NaNs
//! with the sign bit set. Distinct NaN payloads stay distinct keys.

use crate::keys::TrieKey;

macro_rules! impl_float {
    ( $t:ty, $tu:ty ) => {
        impl TrieKey for $t {
            type Digits = $tu;

            #[inline(always)]
            fn to_digits(&self) -> $tu {
                let sign_bit: $tu = 1 << (std::mem::size_of::<$tu>() * 8 - 1);
                let bits = if self.is_nan() {
                    self.to_bits() & !sign_bit
                } else {
                    self.to_bits()
                };
                if bits & sign_bit != 0 {
                    !bits
                } else {
                    bits | sign_bit
                }
            }
        }
    };
}

impl_float!(f32, u32);
impl_float!(f64, u64);

#[cfg(test)]
mod tests {
    use std::hint::black_box;

    use crate::keys::TrieKey;

    #[test]
    fn f32_total_order() {
        let ordered = [
            f32::NEG_INFINITY,
            -1000.0,
            -f32::MIN_POSITIVE / 2.0,
            -0.0,
            0.0,
            f32::MIN_POSITIVE / 2.0,
            1.1,
            4.2,
            30_000_000.0,
            f32::INFINITY,
            f32::NAN,
        ];
        let digits: Vec<u32> = ordered.iter().map(TrieKey::to_digits).collect();
        assert!(
            digits.windows(2).all(|w| w[0] < w[1]),
            "digits out of order: {digits:x?}"
        );
    }

    #[test]
    fn f64_total_order() {
        let ordered = [
            f64::NEG_INFINITY,
            f64::MIN,
            -1.0,
            -f64::MIN_POSITIVE / 2.0,
            -0.0,
            0.0,
            f64::MIN_POSITIVE / 2.0,
            0.1,
            1.0,
            f64::MAX,
            f64::INFINITY,
            f64::NAN,
        ];
        let digits: Vec<u64> = ordered.iter().map(TrieKey::to_digits).collect();
        assert!(digits.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn negative_nans_sort_after_infinity() {
        let computed = black_box(0.0f64) / black_box(0.0f64);
        assert!(computed.is_nan());
        let negative = -f64::NAN;
        assert!(negative.is_sign_negative());
        for nan in [computed, negative, f64::NAN] {
            assert!(nan.to_digits() > f64::INFINITY.to_digits(), "{:x}", nan.to_bits());
        }
        assert!((-f32::NAN).to_digits() > f32::INFINITY.to_digits());
        // Payloads survive the sign fold.
        let quiet_payload = f64::from_bits(0x7ff8_0000_0000_0001);
        assert_ne!(quiet_payload.to_digits(), f64::NAN.to_digits());
    }

    #[test]
    fn signed_zeroes_are_distinct_keys() {
        assert_ne!((-0.0f64).to_digits(), 0.0f64.to_digits());
        assert_eq!(0.0f32.to_digits(), 0x8000_0000);
        assert_eq!((-0.0f32).to_digits(), 0x7fff_ffff);
    }
}
