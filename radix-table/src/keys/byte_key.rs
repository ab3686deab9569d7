//! Variable-length keys: byte strings and UTF-8 strings, one byte per digit.
//!
//! A key of length `n` has its final node at depth `n`, so `"a"` and `"ab"` occupy distinct
//! nodes and `"a"` is visited first. The empty string is a valid key living at depth 0. Strings
//! sort by their UTF-8 bytes, which coincides with code point order.

use crate::keys::{Digits, TrieKey};
use crate::utils::murmur::hash_bytes;

impl Digits for Vec<u8> {
    #[inline(always)]
    fn digit_count(&self) -> usize {
        self.len()
    }

    #[inline]
    fn peel(mut self) -> (u8, Self) {
        let ordinal = self.pop().unwrap_or(0);
        (ordinal, self)
    }

    #[inline]
    fn attach(mut self, ordinal: u8) -> Self {
        self.push(ordinal);
        self
    }

    #[inline]
    fn fingerprint(&self) -> u64 {
        hash_bytes(self)
    }
}

impl TrieKey for [u8] {
    type Digits = Vec<u8>;

    fn to_digits(&self) -> Vec<u8> {
        self.to_vec()
    }
}

impl TrieKey for Vec<u8> {
    type Digits = Vec<u8>;

    fn to_digits(&self) -> Vec<u8> {
        self.clone()
    }
}

impl TrieKey for str {
    type Digits = Vec<u8>;

    fn to_digits(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

impl TrieKey for String {
    type Digits = Vec<u8>;

    fn to_digits(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use crate::keys::tests::peel_all;
    use crate::keys::{Digits, TrieKey};

    #[test]
    fn peel_and_attach() {
        let (ordinal, prefix) = b"abc".to_vec().peel();
        assert_eq!(ordinal, b'c');
        assert_eq!(prefix, b"ab".to_vec());
        assert_eq!(prefix.attach(b'c'), b"abc".to_vec());

        let (ordinal, prefix) = Vec::<u8>::new().peel();
        assert_eq!(ordinal, 0);
        assert!(prefix.is_empty());
    }

    #[test]
    fn strings_and_bytes_share_digits() {
        assert_eq!("hello".to_digits(), b"hello".to_digits());
        assert_eq!(String::from("hello").to_digits(), "hello".to_digits());
        assert_eq!(peel_all("ab".to_digits()), vec![b'a', b'b']);
        assert_eq!("".to_digits().digit_count(), 0);
    }

    #[test]
    fn shorter_prefix_sorts_first() {
        let mut keys = vec!["abc", "", "@", "ab", "a", "Å", "A", "Ångström"];
        keys.sort_by_key(|k| k.to_digits());
        assert_eq!(keys, vec!["", "@", "A", "a", "ab", "abc", "Å", "Ångström"]);
    }
}
