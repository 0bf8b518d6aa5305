//! 64-bit tree-merge popcount using the Lauradoux carry-save block merge:
//! twelve words (96 bytes) are folded per outer-loop step, combining three
//! words at a time before the single per-block `m8`/`m16` horizontal
//! reduction, rather than reducing after every word. This amortizes the
//! reduction cost the way `original_source/src/lauradoux.c` does. Full
//! words left over below a 96-byte block fall back to the simple
//! single-word tree merge; a sub-word tail falls back to the byte kernel.

use std::convert::TryInto;

use super::byte;

const M1: u64 = 0x5555_5555_5555_5555;
const M2: u64 = 0x3333_3333_3333_3333;
const M4: u64 = 0x0f0f_0f0f_0f0f_0f0f;
const M8: u64 = 0x00ff_00ff_00ff_00ff;
const M16: u64 = 0x0000_ffff_0000_ffff;
const H01: u64 = 0x0101_0101_0101_0101;

const BLOCK_WORDS: usize = 12;
const BLOCK_BYTES: usize = BLOCK_WORDS * 8;

#[inline]
fn popcount_word(mut x: u64) -> u64 {
    x -= (x >> 1) & M1;
    x = (x & M2) + ((x >> 2) & M2);
    x = (x + (x >> 4)) & M4;
    (x.wrapping_mul(H01)) >> 56
}

/// Carry-save merge of a single three-word group (`j`, `j+1`, `j+2`) as in
/// `_chemfp_popcount_lauradoux`'s inner loop: the third word is split in
/// half to top off the first two words' counts before the `m2` merge.
#[inline]
fn merge_group(w0: u64, w1: u64, w2: u64) -> u64 {
    let half1 = w2 & M1;
    let half2 = (w2 >> 1) & M1;
    let mut count1 = w0 - ((w0 >> 1) & M1) + half1;
    let mut count2 = w1 - ((w1 >> 1) & M1) + half2;
    count1 = (count1 & M2) + ((count1 >> 2) & M2);
    count2 = (count2 & M2) + ((count2 >> 2) & M2);
    count1 += count2;
    (count1 & M4) + ((count1 >> 4) & M4)
}

/// Folds a full 96-byte (12-word) block, given a word accessor, into a
/// single popcount contribution via one horizontal reduction.
#[inline]
fn fold_block(get: impl Fn(usize) -> u64) -> u64 {
    let mut acc = 0u64;
    for j in (0..BLOCK_WORDS).step_by(3) {
        acc += merge_group(get(j), get(j + 1), get(j + 2));
    }
    acc = (acc & M8) + ((acc >> 8) & M8);
    acc = (acc + (acc >> 16)) & M16;
    (acc + (acc >> 32)) & 0xffff_ffff
}

pub fn popcount(data: &[u8]) -> u32 {
    let block_words = (data.len() / 8 / BLOCK_WORDS) * BLOCK_WORDS;
    let block_bytes = block_words * 8;
    let mut total = 0u64;

    let mut i = 0;
    while i < block_bytes {
        let base = i;
        total += fold_block(|k| {
            let off = base + k * 8;
            u64::from_ne_bytes(data[off..off + 8].try_into().unwrap())
        });
        i += BLOCK_BYTES;
    }

    let mut j = block_bytes;
    while j + 8 <= data.len() {
        let word = u64::from_ne_bytes(data[j..j + 8].try_into().unwrap());
        total += popcount_word(word);
        j += 8;
    }

    total as u32 + byte::popcount(&data[j..])
}

pub fn intersect_popcount(a: &[u8], b: &[u8]) -> u32 {
    let len = a.len().min(b.len());
    let block_words = (len / 8 / BLOCK_WORDS) * BLOCK_WORDS;
    let block_bytes = block_words * 8;
    let mut total = 0u64;

    let mut i = 0;
    while i < block_bytes {
        let base = i;
        total += fold_block(|k| {
            let off = base + k * 8;
            let aw = u64::from_ne_bytes(a[off..off + 8].try_into().unwrap());
            let bw = u64::from_ne_bytes(b[off..off + 8].try_into().unwrap());
            aw & bw
        });
        i += BLOCK_BYTES;
    }

    let mut j = block_bytes;
    while j + 8 <= len {
        let aw = u64::from_ne_bytes(a[j..j + 8].try_into().unwrap());
        let bw = u64::from_ne_bytes(b[j..j + 8].try_into().unwrap());
        total += popcount_word(aw & bw);
        j += 8;
    }

    total as u32 + byte::intersect_popcount(&a[j..], &b[j..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits;

    #[test]
    fn matches_reference_over_full_blocks() {
        let mut data = vec![0u8; 96];
        for (i, b) in data.iter_mut().enumerate() {
            *b = (i * 37 + 11) as u8;
        }
        assert_eq!(popcount(&data), bits::popcount(&data));
    }

    #[test]
    fn matches_reference_over_multiple_blocks_with_tail() {
        let mut data = vec![0u8; 96 * 2 + 37];
        for (i, b) in data.iter_mut().enumerate() {
            *b = (i * 91 + 5) as u8;
        }
        assert_eq!(popcount(&data), bits::popcount(&data));
    }

    #[test]
    fn matches_reference_with_tail() {
        let data = [0xFFu8, 0x0F, 0x01, 0x80, 0x3C, 0x55, 0x99, 0xA1, 0x7E];
        assert_eq!(popcount(&data), bits::popcount(&data));
    }

    #[test]
    fn intersect_matches_reference_over_full_blocks() {
        let mut a = vec![0u8; 96];
        let mut b = vec![0u8; 96];
        for i in 0..96 {
            a[i] = (i * 37 + 11) as u8;
            b[i] = (i * 13 + 200) as u8;
        }
        assert_eq!(intersect_popcount(&a, &b), bits::intersect_popcount(&a, &b));
    }

    #[test]
    fn intersect_matches_reference_with_tail() {
        let a = [0xFFu8, 0x0F, 0x01, 0x80, 0x3C, 0x55, 0x99, 0xA1, 0x7E];
        let b = [0x0Fu8, 0xF0, 0x11, 0x88, 0x3C, 0xAA, 0x11, 0x01, 0x7E];
        assert_eq!(intersect_popcount(&a, &b), bits::intersect_popcount(&a, &b));
    }
}
