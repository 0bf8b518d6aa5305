//! SSSE3 `PSHUFB` nibble-lookup popcount (x86_64 only), processing 16-byte
//! lanes. Falls back to the byte kernel for any tail shorter than a full
//! lane.

use std::arch::x86_64::*;

use super::byte;

pub fn available() -> bool {
    std::is_x86_feature_detected!("ssse3")
}

#[target_feature(enable = "ssse3")]
unsafe fn popcount_lane(lane: __m128i) -> u64 {
    let nibble_counts = _mm_setr_epi8(0, 1, 1, 2, 1, 2, 2, 3, 1, 2, 2, 3, 2, 3, 3, 4);
    let low_mask = _mm_set1_epi8(0x0f);
    let lo = _mm_and_si128(lane, low_mask);
    let hi = _mm_and_si128(_mm_srli_epi16(lane, 4), low_mask);
    let lo_counts = _mm_shuffle_epi8(nibble_counts, lo);
    let hi_counts = _mm_shuffle_epi8(nibble_counts, hi);
    let total = _mm_add_epi8(lo_counts, hi_counts);
    let summed = _mm_sad_epu8(total, _mm_setzero_si128());
    (_mm_extract_epi64(summed, 0) + _mm_extract_epi64(summed, 1)) as u64
}

#[target_feature(enable = "ssse3")]
unsafe fn popcount_inner(data: &[u8]) -> u32 {
    let chunks = data.chunks_exact(16);
    let remainder = chunks.remainder();
    let mut total = 0u64;
    for chunk in chunks {
        let lane = _mm_loadu_si128(chunk.as_ptr() as *const __m128i);
        total += popcount_lane(lane);
    }
    total as u32 + byte::popcount(remainder)
}

#[target_feature(enable = "ssse3")]
unsafe fn intersect_popcount_inner(a: &[u8], b: &[u8]) -> u32 {
    let a_chunks = a.chunks_exact(16);
    let b_chunks = b.chunks_exact(16);
    let a_rem = a_chunks.remainder();
    let b_rem = b_chunks.remainder();
    let mut total = 0u64;
    for (ac, bc) in a_chunks.zip(b_chunks) {
        let av = _mm_loadu_si128(ac.as_ptr() as *const __m128i);
        let bv = _mm_loadu_si128(bc.as_ptr() as *const __m128i);
        total += popcount_lane(_mm_and_si128(av, bv));
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
        let mut data = vec![0u8; 64];
        for (i, b) in data.iter_mut().enumerate() {
            *b = (i * 53 + 7) as u8;
        }
        assert_eq!(popcount(&data), bits::popcount(&data));
    }
}
