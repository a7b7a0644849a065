//! Permission range classification.
//!
//! etcd stores every key permission as a pair `[key, range_end)`. etcdctl
//! offers three ways to create one: a single key, a `--prefix`, or an
//! explicit range. [`classify`] recovers the shortest of those forms that
//! reproduces the stored pair.

/// The command-line shape of a permission's key range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyExpr<'a> {
    /// `key == range_end == "\0"`: every key. Written as `'' --prefix`.
    WholeKeyspace,
    /// `key == range_end`: a single key.
    Exact(&'a [u8]),
    /// `range_end` is the prefix bound of `key`. Written as `<key> --prefix`.
    Prefix(&'a [u8]),
    /// Anything else. Written as `<key> <range_end>`.
    Range { key: &'a [u8], range_end: &'a [u8] },
}

/// Classify a stored permission range. First match wins, in variant order.
pub fn classify<'a>(key: &'a [u8], range_end: &'a [u8]) -> KeyExpr<'a> {
    if key == [0] && range_end == [0] {
        KeyExpr::WholeKeyspace
    } else if key == range_end {
        KeyExpr::Exact(key)
    } else if is_prefix_bound(key, range_end) {
        KeyExpr::Prefix(key)
    } else {
        KeyExpr::Range { key, range_end }
    }
}

/// Check whether `b` is `a` plus one, read as big-endian integers of the same
/// width.
///
/// The carry starts at the last byte and moves left only through `0xFF`
/// bytes of `a`; byte addition wraps, so an all-`0xFF` key pairs with an
/// all-zero bound of the same length. Inputs of different length or empty
/// inputs never match.
pub fn is_prefix_bound(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() || a.is_empty() {
        return false;
    }

    let mut carry = 1u8;
    for (&x, &y) in a.iter().zip(b).rev() {
        if x.wrapping_add(carry) != y {
            return false;
        }
        if x != 0xFF {
            carry = 0;
        }
    }
    true
}
