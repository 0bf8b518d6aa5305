//! Process-wide thread-count control (spec.md §5/§6), backed by a shared
//! [`rayon::ThreadPool`]. Clamped to `[1, max_threads]`.

use std::sync::{Arc, Mutex, OnceLock};

use rayon::ThreadPool;

use crate::errors::{bad_arg, Result};

fn max_threads_available() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

struct PoolState {
    count: usize,
    pool: Arc<ThreadPool>,
}

fn state() -> &'static Mutex<PoolState> {
    static STATE: OnceLock<Mutex<PoolState>> = OnceLock::new();
    STATE.get_or_init(|| {
        let count = max_threads_available();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(count)
            .build()
            .expect("failed to build default thread pool");
        Mutex::new(PoolState { count, pool: Arc::new(pool) })
    })
}

/// Upper bound on [`set_num_threads`] (the host's available parallelism).
pub fn get_max_threads() -> usize {
    max_threads_available()
}

/// Current thread count used by [`crate::parallel`].
pub fn get_num_threads() -> usize {
    state().lock().unwrap().count
}

/// Set the thread count, clamped to `[1, get_max_threads()]`.
pub fn set_num_threads(count: usize) -> Result<()> {
    if count == 0 {
        bad_arg!("thread count must be at least 1");
    }
    let clamped = count.min(get_max_threads());
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(clamped)
        .build()
        .map_err(|e| crate::errors::Error::BadArg(e.to_string()))?;
    let mut guard = state().lock().unwrap();
    guard.count = clamped;
    guard.pool = Arc::new(pool);
    Ok(())
}

/// Run `f` inside the configured thread pool.
pub fn install<F, R>(f: F) -> R
where
    F: FnOnce() -> R + Send,
    R: Send,
{
    let pool = state().lock().unwrap().pool.clone();
    pool.install(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_to_max() {
        let max = get_max_threads();
        set_num_threads(max + 10).unwrap();
        assert_eq!(get_num_threads(), max);
    }

    #[test]
    fn rejects_zero() {
        assert!(set_num_threads(0).is_err());
    }
}
