//! Hardware `POPCNT` kernel (x86_64 only). Falls back to the byte kernel
//! for any tail shorter than a full `u64` word.

use std::convert::TryInto;

use std::arch::x86_64::_popcnt64;

use super::byte;

pub fn available() -> bool {
    std::is_x86_feature_detected!("popcnt")
}

#[target_feature(enable = "popcnt")]
unsafe fn popcount_inner(data: &[u8]) -> u32 {
    let chunks = data.chunks_exact(8);
    let remainder = chunks.remainder();
    let mut total = 0i32;
    for chunk in chunks {
        let word = i64::from_ne_bytes(chunk.try_into().unwrap());
        total += _popcnt64(word);
    }
    total as u32 + byte::popcount(remainder)
}

#[target_feature(enable = "popcnt")]
unsafe fn intersect_popcount_inner(a: &[u8], b: &[u8]) -> u32 {
    let a_chunks = a.chunks_exact(8);
    let b_chunks = b.chunks_exact(8);
    let a_rem = a_chunks.remainder();
    let b_rem = b_chunks.remainder();
    let mut total = 0i32;
    for (ac, bc) in a_chunks.zip(b_chunks) {
        let aw = i64::from_ne_bytes(ac.try_into().unwrap());
        let bw = i64::from_ne_bytes(bc.try_into().unwrap());
        total += _popcnt64(aw & bw);
    }
    total as u32 + byte::intersect_popcount(a_rem, b_rem)
}

pub fn popcount(data: &[u8]) -> u32 {
    debug_assert!(available());
    unsafe { popcount_inner(data) }
}

pub fn intersect_popcount(a: &[u8], b: &[u8]) -> u32 {
    debug_assert!(available());
    unsafe { intersect_popcount_inner(a, b) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits;

    #[test]
    fn matches_reference_when_available() {
        if !available() {
            return;
        }
        let data = [0xFFu8, 0x0F, 0x01, 0x80, 0x3C, 0x55, 0x99, 0xA1, 0x7E];
        assert_eq!(popcount(&data), bits::popcount(&data));
    }
}
