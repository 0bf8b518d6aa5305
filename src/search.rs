//! Similarity search drivers (spec.md §4.5): count, threshold, and
//! k-nearest, for query-against-target (NxM) and symmetric (NxN
//! upper-triangle) arenas, using the Swamidass-Baldi popcount bounds and
//! an optimal out-from-query traversal order for k-nearest.

use std::ops::Range;

use crate::bits;
use crate::dispatch;
use crate::errors::{bad_arg, Result};
use crate::results::ResultSet;

fn fp_at(bytes: &[u8], stride: usize, num_bytes: usize, index: usize) -> &[u8] {
    let start = index * stride;
    &bytes[start..start + num_bytes]
}

/// Swamidass-Baldi reachable target popcount range `[lo, hi]` for a query
/// popcount `p_q` and threshold; `threshold <= 0` reaches the whole arena.
pub(crate) fn popcount_band(p_q: u32, threshold: f64, num_bits: usize) -> (u32, u32) {
    if threshold <= 0.0 {
        return (0, num_bits as u32);
    }
    let lo = (p_q as f64 * threshold).floor() as u32;
    let hi = ((p_q as f64 / threshold).ceil() as u32).min(num_bits as u32);
    (lo, hi)
}

/// One contiguous run of targets sharing (if known) a single popcount.
pub(crate) struct Section {
    pub(crate) popcount: Option<u32>,
    pub(crate) range: Range<usize>,
}

/// Break `[lo, hi]` into arena sections via `table`, clipped to `bounds`;
/// without a table, the whole `bounds` range is a single unknown-popcount
/// section (spec.md §4.5 "falls back to a simple double loop").
pub(crate) fn sections(table: Option<&[usize]>, lo: u32, hi: u32, num_bits: usize, bounds: &Range<usize>) -> Vec<Section> {
    match table {
        None => {
            if bounds.is_empty() {
                vec![]
            } else {
                vec![Section { popcount: None, range: bounds.clone() }]
            }
        }
        Some(table) => {
            let mut out = Vec::new();
            for p in lo..=hi {
                let start = table[p as usize];
                let end = table[((p + 1) as usize).min(num_bits + 1)];
                let r = start.max(bounds.start)..end.min(bounds.end);
                if !r.is_empty() {
                    out.push(Section { popcount: Some(p), range: r });
                }
            }
            out
        }
    }
}

fn validate_common(num_bits: usize, threshold: f64) -> Result<()> {
    if num_bits == 0 {
        bad_arg!("num_bits must be positive");
    }
    if !threshold.is_finite() {
        bad_arg!("threshold must be finite");
    }
    Ok(())
}

/// Count, for each query in `query_range`, the number of targets meeting
/// `threshold`. Writes `counts[q - query_range.start]`; never allocates.
#[allow(clippy::too_many_arguments)]
pub fn count_tanimoto_arena(
    threshold: f64,
    num_bits: usize,
    query_stride: usize,
    query_bytes: &[u8],
    query_range: Range<usize>,
    target_stride: usize,
    target_bytes: &[u8],
    target_range: Range<usize>,
    target_popcount_table: Option<&[usize]>,
    counts: &mut [i64],
) -> Result<()> {
    validate_common(num_bits, threshold)?;
    if query_range.is_empty() || target_range.is_empty() {
        return Ok(());
    }
    let num_bytes = (num_bits + 7) / 8;
    let threshold = bits::guard_threshold(threshold, num_bits as u32);
    let popcount_fn = dispatch::select_popcount(num_bits, target_stride, 1)?;
    let intersect_fn = dispatch::select_intersect_popcount(num_bits, query_stride, 1, target_stride, 1)?;

    for q in query_range.clone() {
        let out_idx = q - query_range.start;
        let qfp = fp_at(query_bytes, query_stride, num_bytes, q);
        let p_q = popcount_fn(qfp);

        if threshold > 1.0 {
            counts[out_idx] = 0;
            continue;
        }
        if threshold <= 0.0 {
            counts[out_idx] = target_range.len() as i64;
            continue;
        }
        if p_q == 0 {
            counts[out_idx] = 0;
            continue;
        }

        let (lo, hi) = popcount_band(p_q, threshold, num_bits);
        let mut count = 0i64;
        for section in sections(target_popcount_table, lo, hi, num_bits, &target_range) {
            for t in section.range {
                let tfp = fp_at(target_bytes, target_stride, num_bytes, t);
                let i = intersect_fn(qfp, tfp);
                let p_t = section.popcount.unwrap_or_else(|| popcount_fn(tfp));
                if bits::passes_threshold_deferred(p_q, p_t, i, threshold, num_bits as u32) {
                    count += 1;
                }
            }
        }
        counts[out_idx] = count;
    }
    Ok(())
}

/// Append every target meeting `threshold` to `results.row(q - query_range.start)`,
/// in target arena order.
#[allow(clippy::too_many_arguments)]
pub fn threshold_tanimoto_arena(
    threshold: f64,
    num_bits: usize,
    query_stride: usize,
    query_bytes: &[u8],
    query_range: Range<usize>,
    target_stride: usize,
    target_bytes: &[u8],
    target_range: Range<usize>,
    target_popcount_table: Option<&[usize]>,
    results: &mut ResultSet,
) -> Result<()> {
    validate_common(num_bits, threshold)?;
    if query_range.is_empty() || target_range.is_empty() || threshold > 1.0 {
        return Ok(());
    }
    let num_bytes = (num_bits + 7) / 8;
    let threshold = bits::guard_threshold(threshold, num_bits as u32);
    let popcount_fn = dispatch::select_popcount(num_bits, target_stride, 1)?;
    let intersect_fn = dispatch::select_intersect_popcount(num_bits, query_stride, 1, target_stride, 1)?;

    for q in query_range.clone() {
        let out_idx = q - query_range.start;
        let qfp = fp_at(query_bytes, query_stride, num_bytes, q);
        threshold_tanimoto_row(
            threshold,
            num_bits,
            qfp,
            popcount_fn,
            intersect_fn,
            target_stride,
            target_bytes,
            target_range.clone(),
            target_popcount_table,
            results.row_mut(out_idx),
        )?;
    }
    Ok(())
}

/// Single-query core of [`threshold_tanimoto_arena`], split out so the
/// parallel harness ([`crate::parallel`]) can run one query per row
/// without sharing a `&mut ResultSet` across threads. `threshold` must
/// already be guarded (see [`bits::guard_threshold`]).
#[allow(clippy::too_many_arguments)]
pub(crate) fn threshold_tanimoto_row(
    threshold: f64,
    num_bits: usize,
    qfp: &[u8],
    popcount_fn: crate::kernel::PopcountFn,
    intersect_fn: crate::kernel::IntersectFn,
    target_stride: usize,
    target_bytes: &[u8],
    target_range: Range<usize>,
    target_popcount_table: Option<&[usize]>,
    row: &mut crate::results::SearchResult,
) -> Result<()> {
    if target_range.is_empty() || threshold > 1.0 {
        return Ok(());
    }
    let num_bytes = (num_bits + 7) / 8;
    let p_q = popcount_fn(qfp);

    let (lo, hi) = if threshold <= 0.0 {
        (0, num_bits as u32)
    } else if p_q == 0 {
        return Ok(());
    } else {
        popcount_band(p_q, threshold, num_bits)
    };

    for section in sections(target_popcount_table, lo, hi, num_bits, &target_range) {
        for t in section.range {
            let tfp = fp_at(target_bytes, target_stride, num_bytes, t);
            let i = intersect_fn(qfp, tfp);
            let p_t = section.popcount.unwrap_or_else(|| popcount_fn(tfp));
            if bits::passes_threshold_deferred(p_q, p_t, i, threshold, num_bits as u32) {
                let score = score_of(p_q, p_t, i);
                row.add_hit(t as i64, score)?;
            }
        }
    }
    Ok(())
}

fn score_of(p_q: u32, p_t: u32, intersection: u32) -> f64 {
    if p_q == 0 && p_t == 0 {
        1.0
    } else {
        intersection as f64 / (p_q + p_t - intersection) as f64
    }
}

/// The out-from-query popcount traversal order for k-nearest (spec.md
/// §4.5): alternates between popcounts above and below the query's,
/// always advancing whichever side currently has the higher
/// best-possible score `B(p) = min(p_q, p) / max(p_q, p)`, and stops
/// permanently once neither side can beat the running threshold.
enum Direction {
    UpOrDown,
    UpOnly,
    DownOnly,
    Finished,
}

struct PopcountOrder {
    direction: Direction,
    query_popcount: u32,
    max_popcount: u32,
    up_popcount: u32,
    down_popcount: i64,
}

impl PopcountOrder {
    fn new(query_popcount: u32, max_popcount: u32) -> PopcountOrder {
        let direction = if query_popcount <= 1 { Direction::UpOnly } else { Direction::UpOrDown };
        PopcountOrder {
            direction,
            query_popcount,
            max_popcount,
            up_popcount: query_popcount,
            down_popcount: query_popcount as i64 - 1,
        }
    }

    fn up_score(&self) -> f64 {
        self.query_popcount as f64 / self.up_popcount as f64
    }

    fn down_score(&self) -> f64 {
        self.down_popcount as f64 / self.query_popcount as f64
    }

    /// Next popcount to scan, or `None` once no remaining band can reach `threshold`.
    fn next(&mut self, threshold: f64) -> Option<u32> {
        loop {
            match self.direction {
                Direction::Finished => return None,
                Direction::UpOnly => {
                    if self.up_popcount > self.max_popcount {
                        self.direction = Direction::Finished;
                        return None;
                    }
                    if self.up_score() < threshold {
                        self.direction = Direction::Finished;
                        return None;
                    }
                    let p = self.up_popcount;
                    self.up_popcount += 1;
                    return Some(p);
                }
                Direction::DownOnly => {
                    if self.down_popcount < 0 {
                        self.direction = Direction::Finished;
                        return None;
                    }
                    if self.down_score() < threshold {
                        self.direction = Direction::Finished;
                        return None;
                    }
                    let p = self.down_popcount as u32;
                    self.down_popcount -= 1;
                    return Some(p);
                }
                Direction::UpOrDown => {
                    let up_valid = self.up_popcount <= self.max_popcount;
                    let down_valid = self.down_popcount >= 0;
                    match (up_valid, down_valid) {
                        (false, false) => {
                            self.direction = Direction::Finished;
                            return None;
                        }
                        (false, true) => {
                            self.direction = Direction::DownOnly;
                            continue;
                        }
                        (true, false) => {
                            self.direction = Direction::UpOnly;
                            continue;
                        }
                        (true, true) => {
                            let up_s = self.up_score();
                            let down_s = self.down_score();
                            if up_s >= down_s {
                                if up_s < threshold {
                                    self.direction = Direction::Finished;
                                    return None;
                                }
                                let p = self.up_popcount;
                                self.up_popcount += 1;
                                return Some(p);
                            } else {
                                if down_s < threshold {
                                    self.direction = Direction::Finished;
                                    return None;
                                }
                                let p = self.down_popcount as u32;
                                self.down_popcount -= 1;
                                return Some(p);
                            }
                        }
                    }
                }
            }
        }
    }
}

/// For each query, append at most `k` targets with the highest score
/// meeting `threshold`. Order on return is unspecified.
#[allow(clippy::too_many_arguments)]
pub fn knearest_tanimoto_arena(
    threshold: f64,
    num_bits: usize,
    k: usize,
    query_stride: usize,
    query_bytes: &[u8],
    query_range: Range<usize>,
    target_stride: usize,
    target_bytes: &[u8],
    target_range: Range<usize>,
    target_popcount_table: Option<&[usize]>,
    results: &mut ResultSet,
) -> Result<()> {
    validate_common(num_bits, threshold)?;
    if query_range.is_empty() || target_range.is_empty() || k == 0 || threshold > 1.0 {
        return Ok(());
    }
    let num_bytes = (num_bits + 7) / 8;
    let base_threshold = bits::guard_threshold(threshold, num_bits as u32);
    let popcount_fn = dispatch::select_popcount(num_bits, target_stride, 1)?;
    let intersect_fn = dispatch::select_intersect_popcount(num_bits, query_stride, 1, target_stride, 1)?;

    for q in query_range.clone() {
        let out_idx = q - query_range.start;
        let qfp = fp_at(query_bytes, query_stride, num_bytes, q);
        knearest_tanimoto_row(
            base_threshold,
            num_bits,
            k,
            qfp,
            popcount_fn,
            intersect_fn,
            target_stride,
            target_bytes,
            target_range.clone(),
            target_popcount_table,
            results.row_mut(out_idx),
        )?;
    }
    Ok(())
}

/// Single-query core of [`knearest_tanimoto_arena`] (see
/// [`threshold_tanimoto_row`] for why this is split out). `threshold`
/// must already be guarded.
#[allow(clippy::too_many_arguments)]
pub(crate) fn knearest_tanimoto_row(
    base_threshold: f64,
    num_bits: usize,
    k: usize,
    qfp: &[u8],
    popcount_fn: crate::kernel::PopcountFn,
    intersect_fn: crate::kernel::IntersectFn,
    target_stride: usize,
    target_bytes: &[u8],
    target_range: Range<usize>,
    target_popcount_table: Option<&[usize]>,
    row: &mut crate::results::SearchResult,
) -> Result<()> {
    if target_range.is_empty() || k == 0 || base_threshold > 1.0 {
        return Ok(());
    }
    let num_bytes = (num_bits + 7) / 8;
    let p_q = popcount_fn(qfp);
    if p_q == 0 {
        return Ok(());
    }

    match target_popcount_table {
        None => {
            for t in target_range.clone() {
                let tfp = fp_at(target_bytes, target_stride, num_bytes, t);
                let i = intersect_fn(qfp, tfp);
                let p_t = popcount_fn(tfp);
                let score = score_of(p_q, p_t, i);
                if score >= base_threshold {
                    row.heap_offer(k, t as i64, score)?;
                }
            }
        }
        Some(table) => {
            let mut order = PopcountOrder::new(p_q, num_bits as u32);
            let mut running_threshold = base_threshold;
            while let Some(p) = order.next(running_threshold) {
                let start = table[p as usize].max(target_range.start);
                let end = table[((p + 1) as usize).min(num_bits + 1)].min(target_range.end);
                for t in start..end {
                    let tfp = fp_at(target_bytes, target_stride, num_bytes, t);
                    let i = intersect_fn(qfp, tfp);
                    let score = score_of(p_q, p, i);
                    if score >= running_threshold {
                        row.heap_offer(k, t as i64, score)?;
                        if row.len() == k {
                            running_threshold = row.heap_min().unwrap().max(base_threshold);
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

/// Symmetric (NxN upper-triangle) count: for every hit `(q, t)` with
/// `q < t`, increments both `counts[q]` and `counts[t]`.
pub fn count_tanimoto_arena_symmetric(
    threshold: f64,
    num_bits: usize,
    stride: usize,
    bytes: &[u8],
    range: Range<usize>,
    popcount_table: Option<&[usize]>,
    counts: &mut [i64],
) -> Result<()> {
    validate_common(num_bits, threshold)?;
    if range.is_empty() {
        return Ok(());
    }
    let num_bytes = (num_bits + 7) / 8;
    let threshold_guarded = bits::guard_threshold(threshold, num_bits as u32);
    let popcount_fn = dispatch::select_popcount(num_bits, stride, 1)?;
    let intersect_fn = dispatch::select_intersect_popcount(num_bits, stride, 1, stride, 1)?;

    if threshold > 1.0 {
        return Ok(());
    }

    for q in range.clone() {
        let qfp = fp_at(bytes, stride, num_bytes, q);
        let p_q = popcount_fn(qfp);
        let upper = (q + 1).max(range.start)..range.end;
        if upper.is_empty() {
            continue;
        }
        if threshold_guarded <= 0.0 {
            counts[q] += upper.len() as i64;
            for t in upper {
                counts[t] += 1;
            }
            continue;
        }
        if p_q == 0 {
            continue;
        }
        let (lo, hi) = popcount_band(p_q, threshold_guarded, num_bits);
        for section in sections(popcount_table, lo, hi, num_bits, &upper) {
            for t in section.range {
                let tfp = fp_at(bytes, stride, num_bytes, t);
                let i = intersect_fn(qfp, tfp);
                let p_t = section.popcount.unwrap_or_else(|| popcount_fn(tfp));
                if bits::passes_threshold_deferred(p_q, p_t, i, threshold_guarded, num_bits as u32) {
                    counts[q] += 1;
                    counts[t] += 1;
                }
            }
        }
    }
    Ok(())
}

/// Symmetric (NxN upper-triangle) threshold search: appends hits only to
/// `results.row(q)` for `q < t`; call [`crate::results::ResultSet::fill_lower_triangle`]
/// afterwards to mirror them.
pub fn threshold_tanimoto_arena_symmetric(
    threshold: f64,
    num_bits: usize,
    stride: usize,
    bytes: &[u8],
    range: Range<usize>,
    popcount_table: Option<&[usize]>,
    results: &mut ResultSet,
) -> Result<()> {
    validate_common(num_bits, threshold)?;
    if range.is_empty() || threshold > 1.0 {
        return Ok(());
    }
    let num_bytes = (num_bits + 7) / 8;
    let threshold = bits::guard_threshold(threshold, num_bits as u32);
    let popcount_fn = dispatch::select_popcount(num_bits, stride, 1)?;
    let intersect_fn = dispatch::select_intersect_popcount(num_bits, stride, 1, stride, 1)?;

    for q in range.clone() {
        let upper = (q + 1).max(range.start)..range.end;
        let qfp = fp_at(bytes, stride, num_bytes, q);
        threshold_tanimoto_row(
            threshold,
            num_bits,
            qfp,
            popcount_fn,
            intersect_fn,
            stride,
            bytes,
            upper,
            popcount_table,
            results.row_mut(q),
        )?;
    }
    Ok(())
}

/// Symmetric (NxN upper-triangle) k-nearest: reuses the asymmetric driver's
/// per-query core, restricted to `t > q` so self-matches never appear.
#[allow(clippy::too_many_arguments)]
pub fn knearest_tanimoto_arena_symmetric(
    threshold: f64,
    num_bits: usize,
    k: usize,
    stride: usize,
    bytes: &[u8],
    range: Range<usize>,
    popcount_table: Option<&[usize]>,
    results: &mut ResultSet,
) -> Result<()> {
    validate_common(num_bits, threshold)?;
    if range.is_empty() || k == 0 || threshold > 1.0 {
        return Ok(());
    }
    let num_bytes = (num_bits + 7) / 8;
    let base_threshold = bits::guard_threshold(threshold, num_bits as u32);
    let popcount_fn = dispatch::select_popcount(num_bits, stride, 1)?;
    let intersect_fn = dispatch::select_intersect_popcount(num_bits, stride, 1, stride, 1)?;

    for q in range.clone() {
        let upper = (q + 1).max(range.start)..range.end;
        let qfp = fp_at(bytes, stride, num_bytes, q);
        knearest_tanimoto_row(
            base_threshold,
            num_bits,
            k,
            qfp,
            popcount_fn,
            intersect_fn,
            stride,
            bytes,
            upper,
            popcount_table,
            results.row_mut(q),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::results::Ordering;

    #[test]
    fn scenario_s3_count_nxm() {
        let queries = [0x0Fu8];
        let targets = [0x0Fu8, 0x07, 0x00];
        let arena = Arena::build(8, 1, &targets, 3).unwrap();
        let mut counts = vec![0i64; 1];
        count_tanimoto_arena(
            0.5, 8, 1, &queries, 0..1, arena.stride(), arena.bytes(), 0..arena.len(),
            Some(arena.popcount_table()), &mut counts,
        )
        .unwrap();
        assert_eq!(counts[0], 2);
    }

    #[test]
    fn scenario_s4_threshold_nxm() {
        let queries = [0x0Fu8];
        let targets = [0x0Fu8, 0x07, 0x00];
        let mut results = ResultSet::new(1);
        threshold_tanimoto_arena(0.5, 8, 1, &queries, 0..1, 1, &targets, 0..3, None, &mut results).unwrap();
        results.row_mut(0).reorder(Ordering::DecreasingScore).unwrap();
        assert_eq!(results.row(0).indices(), &[0, 1]);
        assert!((results.row(0).scores()[0] - 1.0).abs() < 1e-9);
        assert!((results.row(0).scores()[1] - 0.75).abs() < 1e-9);
    }

    #[test]
    fn scenario_s5_knearest() {
        let queries = [0x0Fu8];
        let targets = [0x0Fu8, 0x01, 0x07, 0xFF];
        let mut results = ResultSet::new(1);
        knearest_tanimoto_arena(0.0, 8, 2, 1, &queries, 0..1, 1, &targets, 0..4, None, &mut results).unwrap();
        results.row_mut(0).reorder(Ordering::DecreasingScore).unwrap();
        assert_eq!(results.row(0).len(), 2);
        assert_eq!(results.row(0).hit(0).0, 0);
        assert!((results.row(0).hit(0).1 - 1.0).abs() < 1e-9);
        assert_eq!(results.row(0).hit(1).0, 2);
        assert!((results.row(0).hit(1).1 - 0.75).abs() < 1e-9);
    }

    #[test]
    fn scenario_s6_symmetric_count() {
        let fps = [0x0Fu8, 0x07, 0x00];
        let mut counts = vec![0i64; 3];
        count_tanimoto_arena_symmetric(0.5, 8, 1, &fps, 0..3, None, &mut counts).unwrap();
        assert_eq!(counts, vec![1, 1, 0]);
    }

    #[test]
    fn symmetric_threshold_writes_each_query_to_its_own_row() {
        let fps = [0x0Fu8, 0x07, 0x00];
        let mut results = ResultSet::new(3);
        threshold_tanimoto_arena_symmetric(0.5, 8, 1, &fps, 0..3, None, &mut results).unwrap();
        assert_eq!(results.row(0).len(), 1);
        assert_eq!(results.row(0).hit(0).0, 1);
        assert!((results.row(0).hit(0).1 - 0.75).abs() < 1e-9);
        assert_eq!(results.row(1).len(), 0);
        assert_eq!(results.row(2).len(), 0);
    }

    #[test]
    fn symmetric_knearest_writes_each_query_to_its_own_row() {
        let fps = [0x0Fu8, 0x07, 0x00];
        let mut results = ResultSet::new(3);
        knearest_tanimoto_arena_symmetric(0.0, 8, 2, 1, &fps, 0..3, None, &mut results).unwrap();
        assert_eq!(results.row(0).len(), 2);
        results.row_mut(0).reorder(Ordering::DecreasingScore).unwrap();
        assert_eq!(results.row(0).hit(0).0, 1);
        assert!((results.row(0).hit(0).1 - 0.75).abs() < 1e-9);
        assert_eq!(results.row(0).hit(1).0, 2);
        assert!((results.row(0).hit(1).1 - 0.0).abs() < 1e-9);
        assert_eq!(results.row(1).len(), 1);
        assert_eq!(results.row(1).hit(0).0, 2);
        assert!((results.row(1).hit(0).1 - 0.0).abs() < 1e-9);
        assert_eq!(results.row(2).len(), 0);
    }

    #[test]
    fn boundary_threshold_zero_counts_everything() {
        let queries = [0x0Fu8];
        let targets = [0x0Fu8, 0x07, 0x00];
        let arena = Arena::build(8, 1, &targets, 3).unwrap();
        let mut counts = vec![0i64; 1];
        count_tanimoto_arena(
            0.0, 8, 1, &queries, 0..1, arena.stride(), arena.bytes(), 0..arena.len(),
            Some(arena.popcount_table()), &mut counts,
        )
        .unwrap();
        assert_eq!(counts[0], 3);
    }

    #[test]
    fn boundary_threshold_above_one_yields_zero_hits() {
        let queries = [0x0Fu8];
        let targets = [0x0Fu8, 0x07, 0x00];
        let arena = Arena::build(8, 1, &targets, 3).unwrap();
        let mut counts = vec![9i64; 1];
        count_tanimoto_arena(
            1.5, 8, 1, &queries, 0..1, arena.stride(), arena.bytes(), 0..arena.len(),
            Some(arena.popcount_table()), &mut counts,
        )
        .unwrap();
        assert_eq!(counts[0], 0);
    }

    #[test]
    fn boundary_empty_query_range_is_no_op() {
        let queries = [0x0Fu8];
        let targets = [0x0Fu8];
        let arena = Arena::build(8, 1, &targets, 1).unwrap();
        let mut counts = vec![42i64; 0];
        count_tanimoto_arena(
            0.5, 8, 1, &queries, 0..0, arena.stride(), arena.bytes(), 0..arena.len(),
            Some(arena.popcount_table()), &mut counts,
        )
        .unwrap();
        assert!(counts.is_empty());
    }

    #[test]
    fn fallback_without_popcount_table_matches_table_driven_result() {
        let queries = [0x0Fu8];
        let targets = [0x0Fu8, 0x07, 0x00];
        let mut counts_no_table = vec![0i64; 1];
        count_tanimoto_arena(0.5, 8, 1, &queries, 0..1, 1, &targets, 0..3, None, &mut counts_no_table).unwrap();
        assert_eq!(counts_no_table[0], 2);
    }
}
