//! Fixed-width integer keys, one big-endian byte per digit.
//!
//! Prefixes are kept in the same integer type, right-aligned: the prefix of `0x1234_5678u32` at
//! depth 3 is `0x12_34`. Signed integers flip their sign bit so negatives sort first.

use num_traits::ops::checked::{CheckedShl, CheckedShr};
use num_traits::{AsPrimitive, PrimInt};

use crate::keys::{Digits, TrieKey};

#[inline]
fn peel_uint<T>(v: T) -> (u8, T)
where
    T: PrimInt + AsPrimitive<u8> + CheckedShr,
{
    // Shifting a u8 by 8 overflows; its only prefix is the empty one anyway.
    (v.as_(), v.checked_shr(8).unwrap_or_else(T::zero))
}

#[inline]
fn attach_uint<T>(v: T, ordinal: u8) -> T
where
    T: PrimInt + CheckedShl + 'static,
    u8: AsPrimitive<T>,
{
    v.checked_shl(8).unwrap_or_else(T::zero) | ordinal.as_()
}

#[inline]
fn fold_u64<T>(v: T) -> u64
where
    T: PrimInt + AsPrimitive<u64> + CheckedShr,
{
    let lo: u64 = v.as_();
    let hi: u64 = v.checked_shr(64).map_or(0, |h| h.as_());
    lo ^ hi.rotate_left(32)
}

macro_rules! impl_unsigned {
    ( $($t:ty),* ) => {
    $(
    impl Digits for $t {
        #[inline(always)]
        fn digit_count(&self) -> usize {
            std::mem::size_of::<$t>()
        }
        #[inline(always)]
        fn peel(self) -> (u8, Self) {
            peel_uint(self)
        }
        #[inline(always)]
        fn attach(self, ordinal: u8) -> Self {
            attach_uint(self, ordinal)
        }
        #[inline(always)]
        fn fingerprint(&self) -> u64 {
            fold_u64(*self)
        }
    }

    impl TrieKey for $t {
        type Digits = $t;

        #[inline(always)]
        fn to_digits(&self) -> $t {
            *self
        }
    }
    ) *
    }
}
impl_unsigned!(u8, u16, u32, u64, u128, usize);

macro_rules! impl_signed {
    ( $t:ty, $tu:ty ) => {
        impl TrieKey for $t {
            type Digits = $tu;

            #[inline(always)]
            fn to_digits(&self) -> $tu {
                // Flip the sign bit to map negative numbers to 0..2^(n-1)-1
                // and non-negative numbers to 2^(n-1)..2^n-1.
                let sign_bit: $tu = 1 << (std::mem::size_of::<$tu>() * 8 - 1);
                (*self as $tu) ^ sign_bit
            }
        }
    };
}

impl_signed!(i8, u8);
impl_signed!(i16, u16);
impl_signed!(i32, u32);
impl_signed!(i64, u64);
impl_signed!(i128, u128);
impl_signed!(isize, usize);

impl TrieKey for char {
    type Digits = u32;

    #[inline(always)]
    fn to_digits(&self) -> u32 {
        *self as u32
    }
}

#[cfg(test)]
mod tests {
    use crate::keys::tests::peel_all;
    use crate::keys::{Digits, TrieKey};

    #[test]
    fn peel_attach_round_trip() {
        for k in [0u32, 1, 0xff, 0x100, 0x1234_5678, u32::MAX] {
            let (ordinal, prefix) = k.peel();
            assert_eq!(prefix.attach(ordinal), k);
        }
        for k in [0u8, 7, 255] {
            let (ordinal, prefix) = k.peel();
            assert_eq!(ordinal, k);
            assert_eq!(prefix, 0);
            assert_eq!(prefix.attach(ordinal), k);
        }
        let k = u128::MAX - 12345;
        let (ordinal, prefix) = k.peel();
        assert_eq!(prefix.attach(ordinal), k);
    }

    #[test]
    fn digits_are_big_endian() {
        assert_eq!(peel_all(0x0102_0304u32), vec![1, 2, 3, 4]);
        assert_eq!(peel_all(0xabu8), vec![0xab]);
        assert_eq!(peel_all(0x0102u16), vec![1, 2]);
    }

    #[test]
    fn signed_order_is_preserved() {
        let mut keys = vec![i32::MIN, -10_000, -1, 0, 1, 10, i32::MAX];
        let digits: Vec<u32> = keys.iter().map(TrieKey::to_digits).collect();
        assert!(digits.windows(2).all(|w| w[0] < w[1]));
        keys.reverse();
        let digits: Vec<u32> = keys.iter().map(TrieKey::to_digits).collect();
        assert!(digits.windows(2).all(|w| w[0] > w[1]));

        assert!((-1i8).to_digits() < 0i8.to_digits());
        assert!(i64::MIN.to_digits() < i64::MAX.to_digits());
        assert_eq!(0i16.to_digits(), 0x8000);
    }

    #[test]
    fn char_order_is_code_point_order() {
        assert!('A'.to_digits() < 'a'.to_digits());
        assert!('z'.to_digits() < 'Å'.to_digits());
        assert_eq!('a'.to_digits().digit_count(), 4);
    }

    #[test]
    fn fingerprint_uses_both_halves_of_wide_keys() {
        let lo = 1u128;
        let hi = 1u128 << 64;
        assert_ne!(lo.fingerprint(), hi.fingerprint());
        assert_eq!(42u8.fingerprint(), 42);
    }
}
