//! Key codecs: how a key is split into the base-256 digits the trie is built from.
//!
//! A key of `n` digits is stored as `n` trie nodes. The node at depth `d` is named by the first
//! `d - 1` digits (its *prefix*) and the `d`-th digit (its *ordinal*). Walking ordinals `0..=255`
//! at every depth yields keys in ascending order, so each codec has to lay out digits such that
//! digit-by-digit comparison agrees with the natural order of the key type.

use std::fmt::Debug;

pub mod byte_key;
pub mod float_key;
pub mod int_key;

/// The order-preserving digit representation of a key, and of every prefix of it.
///
/// Between complete keys, `Ord` must agree with lexicographic comparison of the digit sequences
/// (a proper prefix sorts before its extensions). The `Default` value is the empty prefix.
pub trait Digits: Clone + Ord + Default + Debug {
    /// Number of digits of a complete key.
    fn digit_count(&self) -> usize;

    /// Split off the last digit, returning it together with the remaining prefix.
    /// Peeling the empty prefix yields `(0, empty)`.
    fn peel(self) -> (u8, Self);

    /// Append `ordinal` as the new last digit. Inverse of [`Digits::peel`].
    fn attach(self, ordinal: u8) -> Self;

    /// A well-distributed summary of the value, fed into the node identity hash.
    fn fingerprint(&self) -> u64;
}

/// A type that can be stored in a [`RadixMap`](crate::map::RadixMap) or
/// [`RadixSet`](crate::set::RadixSet).
///
/// Keys are ordered by their digits, not by `Ord`; for the provided implementations the two
/// agree (floats follow IEEE total order). Unsized implementations (`str`, `[u8]`) exist so that
/// owned keys can be looked up through a borrow.
pub trait TrieKey {
    type Digits: Digits;

    fn to_digits(&self) -> Self::Digits;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every prefix of `digits`, shortest first, as produced by repeated peeling.
    pub(crate) fn peel_all<D: Digits>(digits: D) -> Vec<u8> {
        let n = digits.digit_count();
        let mut out = Vec::with_capacity(n);
        let mut rest = digits;
        for _ in 0..n {
            let (ordinal, shorter) = rest.peel();
            out.push(ordinal);
            rest = shorter;
        }
        assert_eq!(rest, D::default(), "peeling a whole key must leave the empty prefix");
        out.reverse();
        out
    }

    #[test]
    fn digit_sequences_compare_like_keys() {
        let mut keys = vec![0u32, 1, 10, 255, 256, 65_535, 1 << 24, u32::MAX];
        keys.sort();
        let seqs: Vec<Vec<u8>> = keys.iter().map(|k| peel_all(k.to_digits())).collect();
        assert!(seqs.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(seqs[3], vec![0, 0, 0, 255]);
    }
}
