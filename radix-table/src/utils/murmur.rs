//! Murmur3-derived mixing used to place trie nodes in the bucket array.
//!
//! MurmurHash3 was written by Austin Appleby and placed in the public domain. Only the 64-bit
//! block and finalization steps are used here.
//!
//! A node lives at `slot_hash(identity_hash(depth, fingerprint(prefix)), ordinal)`. The identity
//! hash is shared by all 256 potential children of one parent, so enumerating a parent's
//! children in order costs one cheap `slot_hash` per ordinal.

const C1: u64 = 0x87c3_7b91_1142_53d5;
const C2: u64 = 0x4cf5_ad43_2745_937f;

#[inline(always)]
fn mix_k1(mut k1: u64) -> u64 {
    k1 = k1.wrapping_mul(C1);
    k1 = k1.rotate_left(31);
    k1.wrapping_mul(C2)
}

#[inline(always)]
fn mix_h1(mut h1: u64, k1: u64) -> u64 {
    h1 ^= k1;
    h1 = h1.rotate_left(27);
    h1.wrapping_mul(5).wrapping_add(0x52dc_e729)
}

#[inline(always)]
pub fn fmix64(mut h: u64) -> u64 {
    h ^= h >> 33;
    h = h.wrapping_mul(0xff51_afd7_ed55_8ccd);
    h ^= h >> 33;
    h = h.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    h ^= h >> 33;
    h
}

/// Hash of a parent node: the prefix fingerprint and the depth, two block rounds.
#[inline]
pub fn identity_hash(depth: usize, prefix_fingerprint: u64) -> u64 {
    let h1 = mix_h1(0, mix_k1(prefix_fingerprint));
    mix_h1(h1, mix_k1(depth as u64))
}

/// Hash of one child of the parent identified by `identity`.
#[inline]
pub fn slot_hash(identity: u64, ordinal: u8) -> u64 {
    fmix64(mix_h1(identity, mix_k1(ordinal as u64)))
}

/// Fingerprint of a byte string, folded eight bytes at a time.
pub fn hash_bytes(bytes: &[u8]) -> u64 {
    let mut h1 = 0u64;
    let mut chunks = bytes.chunks_exact(8);
    for chunk in &mut chunks {
        let mut block = [0u8; 8];
        block.copy_from_slice(chunk);
        h1 = mix_h1(h1, mix_k1(u64::from_le_bytes(block)));
    }
    let tail = chunks.remainder();
    if !tail.is_empty() {
        let mut block = [0u8; 8];
        block[..tail.len()].copy_from_slice(tail);
        h1 ^= mix_k1(u64::from_le_bytes(block));
    }
    fmix64(h1 ^ bytes.len() as u64)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn fmix_is_a_bijection_on_small_inputs() {
        let outputs: HashSet<u64> = (0..10_000u64).map(fmix64).collect();
        assert_eq!(outputs.len(), 10_000);
        assert_eq!(fmix64(0), 0);
    }

    #[test]
    fn siblings_get_distinct_slots() {
        let identity = identity_hash(3, 0xdead_beef);
        let slots: HashSet<u64> = (0..=255u8).map(|o| slot_hash(identity, o)).collect();
        assert_eq!(slots.len(), 256);
    }

    #[test]
    fn depth_changes_identity() {
        assert_ne!(identity_hash(1, 42), identity_hash(2, 42));
        assert_ne!(identity_hash(1, 42), identity_hash(257, 42));
        assert_ne!(identity_hash(1, 42), identity_hash(1, 43));
    }

    #[test]
    fn byte_fingerprints_include_length() {
        assert_ne!(hash_bytes(b""), hash_bytes(b"\0"));
        assert_ne!(hash_bytes(b"\0"), hash_bytes(b"\0\0"));
        assert_ne!(hash_bytes(b"abcdefgh"), hash_bytes(b"abcdefgi"));
        assert_eq!(hash_bytes(b"hello world"), hash_bytes(b"hello world"));
    }
}
