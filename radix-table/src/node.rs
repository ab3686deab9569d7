use crate::keys::Digits;
use crate::utils::arena::SlotId;

const ORDINAL_BITS: u32 = 8;
const DEPTH_BITS: u32 = 8;
const IDENTITY_BITS: u32 = ORDINAL_BITS + DEPTH_BITS;
const IDENTITY_MASK: u64 = (1 << IDENTITY_BITS) - 1;
const LIVE_ONE: u64 = 1 << IDENTITY_BITS;

/// Packed `{ordinal: 8, depth (low byte): 8, live count: 48}` field of a node record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Tag(u64);

impl Tag {
    /// A tag naming the node `(depth, _, ordinal)` with a live count of zero.
    #[inline]
    pub(crate) fn new(depth: usize, ordinal: u8) -> Self {
        let depth_low = (depth as u64) & ((1 << DEPTH_BITS) - 1);
        Self(ordinal as u64 | depth_low << ORDINAL_BITS)
    }

    /// The low 16 bits, compared when matching a probed node against a wanted one.
    #[inline(always)]
    pub(crate) fn identity(self) -> u64 {
        self.0 & IDENTITY_MASK
    }

    #[inline(always)]
    pub(crate) fn ordinal(self) -> u8 {
        self.0 as u8
    }

    #[inline(always)]
    pub(crate) fn live(self) -> u64 {
        self.0 >> IDENTITY_BITS
    }
}

/// A physical trie node: one `(depth, prefix, ordinal)` triple that lies on the path of at
/// least one stored key.
pub(crate) struct Node<D: Digits> {
    pub(crate) tag: Tag,
    /// Slot hash the node was placed by. Computed from the full depth, so together with the tag
    /// and prefix it fully identifies the node; also lets a resize re-place it without rehashing
    /// the prefix.
    pub(crate) hash: u64,
    /// Arena handle of the payload when a stored key ends here.
    pub(crate) payload: Option<SlotId>,
    /// The first `depth - 1` digits.
    pub(crate) prefix: D,
}

impl<D: Digits> Node<D> {
    #[inline]
    pub(crate) fn new(tag: Tag, hash: u64, prefix: D) -> Self {
        Self {
            tag: Tag(tag.identity() | LIVE_ONE),
            hash,
            payload: None,
            prefix,
        }
    }

    #[inline(always)]
    pub(crate) fn matches(&self, hash: u64, tag: Tag, prefix: &D) -> bool {
        self.hash == hash && self.tag.identity() == tag.identity() && self.prefix == *prefix
    }

    #[inline(always)]
    pub(crate) fn is_final(&self) -> bool {
        self.payload.is_some()
    }

    /// Whether any stored key is strictly longer than this node's path.
    #[inline(always)]
    pub(crate) fn has_descendants(&self) -> bool {
        self.tag.live() > self.is_final() as u64
    }

    #[inline]
    pub(crate) fn inc_live(&mut self) {
        self.tag.0 += LIVE_ONE;
    }

    /// Drops the live count by one and returns what is left.
    #[inline]
    pub(crate) fn dec_live(&mut self) -> u64 {
        assert!(self.tag.live() > 0, "live count underflow on trie node");
        self.tag.0 -= LIVE_ONE;
        self.tag.live()
    }
}

/// One slot of the open-addressed node store.
#[derive(Default)]
pub(crate) enum Bucket<D: Digits> {
    #[default]
    Empty,
    /// A node lived here; keeps probe chains passing through it intact.
    Tombstone,
    Occupied(Node<D>),
}

impl<D: Digits> Bucket<D> {
    #[inline(always)]
    pub(crate) fn node(&self) -> Option<&Node<D>> {
        match self {
            Bucket::Occupied(node) => Some(node),
            _ => None,
        }
    }

    #[inline(always)]
    pub(crate) fn node_mut(&mut self) -> Option<&mut Node<D>> {
        match self {
            Bucket::Occupied(node) => Some(node),
            _ => None,
        }
    }
}
