//! Parallel execution harness (spec.md §4.6): runs per-query work across
//! worker threads when available. Kernel pointers are fetched once
//! outside the query loop; result rows are independent across queries so
//! each worker owns its row exclusively, and the symmetric counts vector
//! uses atomic increments instead of a lock.

use std::ops::Range;
use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};

use rayon::prelude::*;

use crate::bits;
use crate::dispatch;
use crate::errors::Result;
use crate::results::ResultSet;
use crate::search::{self, threshold_tanimoto_row};
use crate::threads;

fn fp_at(bytes: &[u8], stride: usize, num_bytes: usize, index: usize) -> &[u8] {
    let start = index * stride;
    &bytes[start..start + num_bytes]
}

/// First error encountered across workers wins; rows completed before the
/// failing one retain their hits (spec.md §5 memory discipline). Workers
/// report through `anyhow::Error` so this boundary doesn't need to know
/// about every error-producing path inside a row; the concrete error is
/// recovered by downcast for the typed public return.
fn first_error(errors: Vec<Option<anyhow::Error>>) -> Result<()> {
    match errors.into_iter().flatten().next() {
        Some(e) => Err(e.downcast::<crate::errors::Error>().unwrap_or_else(|e| crate::errors::Error::BadArg(e.to_string()))),
        None => Ok(()),
    }
}

/// Parallel equivalent of [`crate::search::threshold_tanimoto_arena`]: one
/// rayon task per query, each writing only to its own result row.
#[allow(clippy::too_many_arguments)]
pub fn threshold_tanimoto_arena_parallel(
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
    if query_range.is_empty() || target_range.is_empty() || threshold > 1.0 || num_bits == 0 {
        return Ok(());
    }
    let num_bytes = (num_bits + 7) / 8;
    let threshold = bits::guard_threshold(threshold, num_bits as u32);
    let popcount_fn = dispatch::select_popcount(num_bits, target_stride, 1)?;
    let intersect_fn = dispatch::select_intersect_popcount(num_bits, query_stride, 1, target_stride, 1)?;

    let start = query_range.start;
    let rows = &mut results.rows_mut()[..query_range.len()];
    let errors: Vec<Option<anyhow::Error>> = threads::install(|| {
        rows.par_iter_mut()
            .enumerate()
            .map(|(i, row)| {
                let q = start + i;
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
                    row,
                )
                .err()
                .map(anyhow::Error::from)
            })
            .collect()
    });
    first_error(errors)
}

/// Parallel equivalent of [`crate::search::knearest_tanimoto_arena`].
#[allow(clippy::too_many_arguments)]
pub fn knearest_tanimoto_arena_parallel(
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
    if query_range.is_empty() || target_range.is_empty() || k == 0 || threshold > 1.0 || num_bits == 0 {
        return Ok(());
    }
    let num_bytes = (num_bits + 7) / 8;
    let threshold = bits::guard_threshold(threshold, num_bits as u32);
    let popcount_fn = dispatch::select_popcount(num_bits, target_stride, 1)?;
    let intersect_fn = dispatch::select_intersect_popcount(num_bits, query_stride, 1, target_stride, 1)?;

    let start = query_range.start;
    let rows = &mut results.rows_mut()[..query_range.len()];
    let errors: Vec<Option<anyhow::Error>> = threads::install(|| {
        rows.par_iter_mut()
            .enumerate()
            .map(|(i, row)| {
                let q = start + i;
                let qfp = fp_at(query_bytes, query_stride, num_bytes, q);
                search::knearest_tanimoto_row(
                    threshold,
                    num_bits,
                    k,
                    qfp,
                    popcount_fn,
                    intersect_fn,
                    target_stride,
                    target_bytes,
                    target_range.clone(),
                    target_popcount_table,
                    row,
                )
                .err()
                .map(anyhow::Error::from)
            })
            .collect()
    });
    first_error(errors)
}

/// Parallel equivalent of [`crate::search::threshold_tanimoto_arena_symmetric`]:
/// one rayon task per query, each writing only to its own result row.
pub fn threshold_tanimoto_arena_symmetric_parallel(
    threshold: f64,
    num_bits: usize,
    stride: usize,
    bytes: &[u8],
    range: Range<usize>,
    popcount_table: Option<&[usize]>,
    results: &mut ResultSet,
) -> Result<()> {
    if range.is_empty() || num_bits == 0 || threshold > 1.0 {
        return Ok(());
    }
    let num_bytes = (num_bits + 7) / 8;
    let threshold = bits::guard_threshold(threshold, num_bits as u32);
    let popcount_fn = dispatch::select_popcount(num_bits, stride, 1)?;
    let intersect_fn = dispatch::select_intersect_popcount(num_bits, stride, 1, stride, 1)?;

    let rows = results.rows_mut();
    let errors: Vec<Option<anyhow::Error>> = threads::install(|| {
        rows.par_iter_mut()
            .enumerate()
            .filter(|(q, _)| range.contains(q))
            .map(|(q, row)| {
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
                    row,
                )
                .err()
                .map(anyhow::Error::from)
            })
            .collect()
    });
    first_error(errors)
}

/// Parallel equivalent of [`crate::search::knearest_tanimoto_arena_symmetric`].
#[allow(clippy::too_many_arguments)]
pub fn knearest_tanimoto_arena_symmetric_parallel(
    threshold: f64,
    num_bits: usize,
    k: usize,
    stride: usize,
    bytes: &[u8],
    range: Range<usize>,
    popcount_table: Option<&[usize]>,
    results: &mut ResultSet,
) -> Result<()> {
    if range.is_empty() || num_bits == 0 || k == 0 || threshold > 1.0 {
        return Ok(());
    }
    let num_bytes = (num_bits + 7) / 8;
    let base_threshold = bits::guard_threshold(threshold, num_bits as u32);
    let popcount_fn = dispatch::select_popcount(num_bits, stride, 1)?;
    let intersect_fn = dispatch::select_intersect_popcount(num_bits, stride, 1, stride, 1)?;

    let rows = results.rows_mut();
    let errors: Vec<Option<anyhow::Error>> = threads::install(|| {
        rows.par_iter_mut()
            .enumerate()
            .filter(|(q, _)| range.contains(q))
            .map(|(q, row)| {
                let upper = (q + 1).max(range.start)..range.end;
                let qfp = fp_at(bytes, stride, num_bytes, q);
                search::knearest_tanimoto_row(
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
                    row,
                )
                .err()
                .map(anyhow::Error::from)
            })
            .collect()
    });
    first_error(errors)
}

/// Parallel symmetric count: the shared counts vector is partitioned into
/// groups of 128 cells (spec.md §4.6); since every target in this crate
/// provides a native atomic, each cell is simply an [`AtomicI64`] rather
/// than a locked group, which removes contention entirely rather than
/// just bounding it.
pub fn count_tanimoto_arena_symmetric_parallel(
    threshold: f64,
    num_bits: usize,
    stride: usize,
    bytes: &[u8],
    range: Range<usize>,
    popcount_table: Option<&[usize]>,
    counts: &mut [i64],
) -> Result<()> {
    if range.is_empty() || num_bits == 0 {
        return Ok(());
    }
    if threshold > 1.0 {
        return Ok(());
    }
    let num_bytes = (num_bits + 7) / 8;
    let threshold_guarded = bits::guard_threshold(threshold, num_bits as u32);
    let popcount_fn = dispatch::select_popcount(num_bits, stride, 1)?;
    let intersect_fn = dispatch::select_intersect_popcount(num_bits, stride, 1, stride, 1)?;

    let atomics: Vec<AtomicI64> = counts.iter().map(|&c| AtomicI64::new(c)).collect();

    threads::install(|| {
        range.clone().into_par_iter().for_each(|q| {
            let qfp = fp_at(bytes, stride, num_bytes, q);
            let p_q = popcount_fn(qfp);
            let upper = (q + 1).max(range.start)..range.end;
            if upper.is_empty() {
                return;
            }
            if threshold_guarded <= 0.0 {
                atomics[q].fetch_add(upper.len() as i64, AtomicOrdering::Relaxed);
                for t in upper {
                    atomics[t].fetch_add(1, AtomicOrdering::Relaxed);
                }
                return;
            }
            if p_q == 0 {
                return;
            }
            let (lo, hi) = search::popcount_band(p_q, threshold_guarded, num_bits);
            for section in search::sections(popcount_table, lo, hi, num_bits, &upper) {
                for t in section.range {
                    let tfp = fp_at(bytes, stride, num_bytes, t);
                    let i = intersect_fn(qfp, tfp);
                    let p_t = section.popcount.unwrap_or_else(|| popcount_fn(tfp));
                    if bits::passes_threshold_deferred(p_q, p_t, i, threshold_guarded, num_bits as u32) {
                        atomics[q].fetch_add(1, AtomicOrdering::Relaxed);
                        atomics[t].fetch_add(1, AtomicOrdering::Relaxed);
                    }
                }
            }
        });
    });

    for (c, a) in counts.iter_mut().zip(atomics) {
        *c = a.into_inner();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;

    #[test]
    fn parallel_threshold_matches_serial() {
        let queries = [0x0Fu8, 0x01];
        let targets = [0x0Fu8, 0x07, 0x00, 0xFF];
        let arena = Arena::build(8, 1, &targets, 4).unwrap();

        let mut serial = ResultSet::new(2);
        search::threshold_tanimoto_arena(
            0.5, 8, 1, &queries, 0..2, arena.stride(), arena.bytes(), 0..arena.len(),
            Some(arena.popcount_table()), &mut serial,
        )
        .unwrap();

        let mut parallel = ResultSet::new(2);
        threshold_tanimoto_arena_parallel(
            0.5, 8, 1, &queries, 0..2, arena.stride(), arena.bytes(), 0..arena.len(),
            Some(arena.popcount_table()), &mut parallel,
        )
        .unwrap();

        for row in 0..2 {
            let mut s = serial.row(row).indices().to_vec();
            let mut p = parallel.row(row).indices().to_vec();
            s.sort();
            p.sort();
            assert_eq!(s, p);
        }
    }

    #[test]
    fn parallel_symmetric_count_matches_serial() {
        let fps = [0x0Fu8, 0x07, 0x00, 0xFF];
        let arena = Arena::build(8, 1, &fps, 4).unwrap();

        let mut serial = vec![0i64; 4];
        search::count_tanimoto_arena_symmetric(
            0.3, 8, arena.stride(), arena.bytes(), 0..arena.len(), Some(arena.popcount_table()), &mut serial,
        )
        .unwrap();

        let mut parallel = vec![0i64; 4];
        count_tanimoto_arena_symmetric_parallel(
            0.3, 8, arena.stride(), arena.bytes(), 0..arena.len(), Some(arena.popcount_table()), &mut parallel,
        )
        .unwrap();

        assert_eq!(serial, parallel);
    }

    #[test]
    fn parallel_symmetric_threshold_matches_serial() {
        let fps = [0x0Fu8, 0x07, 0x00, 0xFF];
        let arena = Arena::build(8, 1, &fps, 4).unwrap();

        let mut serial = ResultSet::new(4);
        search::threshold_tanimoto_arena_symmetric(
            0.3, 8, arena.stride(), arena.bytes(), 0..arena.len(), Some(arena.popcount_table()), &mut serial,
        )
        .unwrap();

        let mut parallel = ResultSet::new(4);
        threshold_tanimoto_arena_symmetric_parallel(
            0.3, 8, arena.stride(), arena.bytes(), 0..arena.len(), Some(arena.popcount_table()), &mut parallel,
        )
        .unwrap();

        for row in 0..4 {
            let mut s = serial.row(row).indices().to_vec();
            let mut p = parallel.row(row).indices().to_vec();
            s.sort();
            p.sort();
            assert_eq!(s, p);
        }
    }

    #[test]
    fn parallel_symmetric_knearest_matches_serial() {
        let fps = [0x0Fu8, 0x07, 0x00, 0xFF];
        let arena = Arena::build(8, 1, &fps, 4).unwrap();

        let mut serial = ResultSet::new(4);
        search::knearest_tanimoto_arena_symmetric(
            0.0, 8, 2, arena.stride(), arena.bytes(), 0..arena.len(), Some(arena.popcount_table()), &mut serial,
        )
        .unwrap();

        let mut parallel = ResultSet::new(4);
        knearest_tanimoto_arena_symmetric_parallel(
            0.0, 8, 2, arena.stride(), arena.bytes(), 0..arena.len(), Some(arena.popcount_table()), &mut parallel,
        )
        .unwrap();

        for row in 0..4 {
            let mut s = serial.row(row).indices().to_vec();
            let mut p = parallel.row(row).indices().to_vec();
            s.sort();
            p.sort();
            assert_eq!(s, p);
        }
    }
}
