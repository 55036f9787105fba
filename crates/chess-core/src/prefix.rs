//! Prefix tests expressed as closed ranges over ordered byte keys.
//!
//! Every key that starts with `p` lies in `[p, p ++ 0xFF]` under
//! lexicographic order, so "starts with" becomes a range scan any ordered
//! index can answer. The bound is exact for encoded keys: the byte right
//! after a whole-move prefix is the first byte of a move code, which never
//! exceeds 127. `0xFF` can still appear as a second code byte (queen
//! promotion), so membership is always decided by comparison, never by
//! looking for the sentinel inside a key.

use std::ops::Bound;

/// Upper-bound extension byte.
pub const SENTINEL: u8 = 0xFF;

/// Closed range `[prefix, prefix ++ SENTINEL]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyRange {
    lower: Vec<u8>,
    upper: Vec<u8>,
}

impl KeyRange {
    /// Range of every key beginning with `prefix`.
    pub fn starting_with(prefix: &[u8]) -> Self {
        let mut upper = Vec::with_capacity(prefix.len() + 1);
        upper.extend_from_slice(prefix);
        upper.push(SENTINEL);
        Self {
            lower: prefix.to_vec(),
            upper,
        }
    }

    pub fn lower(&self) -> &[u8] {
        &self.lower
    }

    pub fn upper(&self) -> &[u8] {
        &self.upper
    }

    pub fn contains(&self, candidate: &[u8]) -> bool {
        self.lower.as_slice() <= candidate && candidate <= self.upper.as_slice()
    }

    /// Bounds for `BTreeMap::range` and similar ordered scans.
    pub fn bounds(&self) -> (Bound<&[u8]>, Bound<&[u8]>) {
        (
            Bound::Included(self.lower.as_slice()),
            Bound::Included(self.upper.as_slice()),
        )
    }
}

/// `candidate` begins with `prefix`.
pub fn starts_with(candidate: &[u8], prefix: &[u8]) -> bool {
    KeyRange::starting_with(prefix).contains(candidate)
}

/// `prefix` begins `candidate`; [`starts_with`] with operands swapped.
pub fn is_prefix_of(prefix: &[u8], candidate: &[u8]) -> bool {
    starts_with(candidate, prefix)
}

/// Every whole-move prefix of `key`, shortest first: the empty key, the
/// first move, the first two moves, and so on up to `key` itself.
///
/// The keys a stored key can be a prefix of form a range; the keys that can
/// be a prefix of it are exactly these, so an index answers the inverse
/// question with point lookups instead of a scan.
pub fn move_prefixes(key: &[u8]) -> impl Iterator<Item = &[u8]> {
    (0..=key.len() / 2).map(move |plies| &key[..plies * 2])
}
