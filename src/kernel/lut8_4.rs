//! 8-bit lookup table applied to 32-bit words: each `u32` word is split into
//! four bytes and summed through the same table as [`super::byte`]. Meant
//! for the 4-byte-aligned class; degrades to the byte kernel on any tail
//! shorter than a full word.

use std::convert::TryInto;

use super::byte;

pub fn popcount(data: &[u8]) -> u32 {
    let chunks = data.chunks_exact(4);
    let remainder = chunks.remainder();
    let mut total = 0u32;
    for chunk in chunks {
        let word = u32::from_ne_bytes(chunk.try_into().unwrap());
        total += word.to_ne_bytes().iter().map(|&b| b.count_ones()).sum::<u32>();
    }
    total + byte::popcount(remainder)
}

pub fn intersect_popcount(a: &[u8], b: &[u8]) -> u32 {
    let a_chunks = a.chunks_exact(4);
    let b_chunks = b.chunks_exact(4);
    let a_rem = a_chunks.remainder();
    let b_rem = b_chunks.remainder();
    let mut total = 0u32;
    for (ac, bc) in a_chunks.zip(b_chunks) {
        let aw = u32::from_ne_bytes(ac.try_into().unwrap());
        let bw = u32::from_ne_bytes(bc.try_into().unwrap());
        total += (aw & bw).to_ne_bytes().iter().map(|&b| b.count_ones()).sum::<u32>();
    }
    total + byte::intersect_popcount(a_rem, b_rem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits;

    #[test]
    fn matches_reference_with_odd_tail() {
        let data = [0xFFu8, 0x0F, 0x01, 0x80, 0x3C, 0x55];
        assert_eq!(popcount(&data), bits::popcount(&data));
    }
}
