use num_bigint::BigUint;
use sha1::{Digest, Sha1};

/// Width of the identifier ring in bits. Identifiers live in [0, 2^M).
/// May be raised up to 160 (the full SHA-1 output) without further changes.
pub const M: u32 = 16;

pub type HashPos = BigUint;

pub fn ring_size() -> HashPos {
    BigUint::from(2u32).pow(M)
}

/// SHA-1 of the input, reduced to a position on the ring.
pub fn hash(input: &[u8]) -> HashPos {
    BigUint::from_bytes_be(&Sha1::digest(input)) % ring_size()
}

/// Start of the i-th finger interval of a node: (id + 2^i) mod 2^M.
pub fn finger_start(id: &HashPos, i: usize) -> HashPos {
    (id + BigUint::from(2u32).pow(i as u32)) % ring_size()
}

/// True iff id lies on the clockwise arc (start, end].
///
/// start == end denotes the full ring, so every id is inside.
pub fn is_between(start: &HashPos, id: &HashPos, end: &HashPos) -> bool {
    use std::cmp::Ordering;
    match start.cmp(end) {
        Ordering::Less => start < id && id <= end,
        Ordering::Greater => id > start || id <= end,
        Ordering::Equal => true,
    }
}

/// True iff id lies on the open arc (start, end).
pub fn is_between_open(start: &HashPos, id: &HashPos, end: &HashPos) -> bool {
    is_between(start, id, end) && id != end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(v: u32) -> HashPos {
        BigUint::from(v)
    }

    #[test]
    fn between_on_a_plain_arc() {
        assert!(is_between(&pos(3), &pos(5), &pos(7)));
        assert!(is_between(&pos(3), &pos(7), &pos(7)));
        assert!(!is_between(&pos(3), &pos(3), &pos(7)));
        assert!(!is_between(&pos(3), &pos(8), &pos(7)));
    }

    #[test]
    fn between_wraps_around_the_ring() {
        // 8-bit ring: the arc (0xFE, 0x04] crosses zero.
        assert!(is_between(&pos(0xFE), &pos(0x02), &pos(0x04)));
        assert!(is_between(&pos(0xFE), &pos(0xFF), &pos(0x04)));
        assert!(is_between(&pos(0xFE), &pos(0x00), &pos(0x04)));
        assert!(!is_between(&pos(0xFE), &pos(0x05), &pos(0x04)));
        assert!(!is_between(&pos(0xFE), &pos(0xFE), &pos(0x04)));
    }

    #[test]
    fn equal_bounds_cover_the_full_ring() {
        assert!(is_between(&pos(9), &pos(0), &pos(9)));
        assert!(is_between(&pos(9), &pos(9), &pos(9)));
        assert!(is_between(&pos(9), &pos(200), &pos(9)));
    }

    #[test]
    fn between_is_rotation_invariant() {
        // Rotating all three points by the same offset must not change the
        // verdict, for any orientation of the arc.
        let ring = 256u32;
        let cases = [(3u32, 5u32, 7u32), (250, 2, 4), (7, 7, 7), (9, 120, 3)];
        for (a, x, b) in cases {
            let plain = is_between(&pos(a), &pos(x), &pos(b));
            for r in [1u32, 17, 128, 255] {
                let rotated = is_between(
                    &pos((a + r) % ring),
                    &pos((x + r) % ring),
                    &pos((b + r) % ring),
                );
                assert_eq!(plain, rotated, "rotation by {} changed ({}, {}, {})", r, a, x, b);
            }
        }
    }

    #[test]
    fn open_interval_excludes_the_upper_bound() {
        assert!(is_between_open(&pos(3), &pos(5), &pos(7)));
        assert!(!is_between_open(&pos(3), &pos(7), &pos(7)));
    }

    #[test]
    fn hash_is_deterministic_and_reduced() {
        // SHA-1("abc") = a9993e36...9cd0d89d, so mod 2^16 the position is 0xd89d.
        assert_eq!(hash(b"abc"), pos(0xd89d));
        assert_eq!(hash(b"abc"), hash(b"abc"));
        assert!(hash(b"127.0.0.1:4711") < ring_size());
    }

    #[test]
    fn finger_start_wraps() {
        let last = ring_size() - 1u32;
        assert_eq!(finger_start(&last, 0), pos(0));
        assert_eq!(finger_start(&pos(3), 2), pos(7));
    }
}
