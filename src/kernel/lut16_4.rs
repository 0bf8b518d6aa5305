//! 16-bit lookup table applied to 32-bit words: each word is split into two
//! 16-bit halves, each looked up in a 65536-entry table built once from the
//! byte table. Meant for the 4-byte-aligned class as an alternative to
//! [`super::lut8_4`]; the dispatcher times both and keeps the faster one.

use std::convert::TryInto;

use std::sync::OnceLock;

use super::byte;

fn table() -> &'static [u16; 65536] {
    static TABLE: OnceLock<Box<[u16; 65536]>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = Box::new([0u16; 65536]);
        for (v, entry) in table.iter_mut().enumerate() {
            *entry = (v as u16).count_ones() as u16;
        }
        table
    })
}

pub fn popcount(data: &[u8]) -> u32 {
    let table = table();
    let chunks = data.chunks_exact(4);
    let remainder = chunks.remainder();
    let mut total = 0u32;
    for chunk in chunks {
        let word = u32::from_ne_bytes(chunk.try_into().unwrap());
        total += table[(word & 0xFFFF) as usize] as u32;
        total += table[(word >> 16) as usize] as u32;
    }
    total + byte::popcount(remainder)
}

pub fn intersect_popcount(a: &[u8], b: &[u8]) -> u32 {
    let table = table();
    let a_chunks = a.chunks_exact(4);
    let b_chunks = b.chunks_exact(4);
    let a_rem = a_chunks.remainder();
    let b_rem = b_chunks.remainder();
    let mut total = 0u32;
    for (ac, bc) in a_chunks.zip(b_chunks) {
        let aw = u32::from_ne_bytes(ac.try_into().unwrap());
        let bw = u32::from_ne_bytes(bc.try_into().unwrap());
        let word = aw & bw;
        total += table[(word & 0xFFFF) as usize] as u32;
        total += table[(word >> 16) as usize] as u32;
    }
    total + byte::intersect_popcount(a_rem, b_rem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits;

    #[test]
    fn matches_reference_with_odd_tail() {
        let data = [0xFFu8, 0x0F, 0x01, 0x80, 0x3C, 0x55, 0x99];
        assert_eq!(popcount(&data), bits::popcount(&data));
    }
}
