//! Byte lookup-table kernel: popcount via a 256-entry table indexed by byte
//! value. This is the reference kernel every other kernel is checked
//! against (spec invariant I5) and the fallback for alignment class 1.

const TABLE: [u8; 256] = build_table();

const fn build_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0usize;
    while i < 256 {
        table[i] = (i as u8).count_ones() as u8;
        i += 1;
    }
    table
}

pub fn popcount(data: &[u8]) -> u32 {
    data.iter().map(|&b| TABLE[b as usize] as u32).sum()
}

pub fn intersect_popcount(a: &[u8], b: &[u8]) -> u32 {
    a.iter().zip(b).map(|(&x, &y)| TABLE[(x & y) as usize] as u32).sum()
}
