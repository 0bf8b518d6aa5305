//! Method dispatcher: enumerates kernels, filters by CPU capability,
//! times the survivors at first use, and picks the concrete kernel pair
//! for a given (bit width, stride, base-pointer alignment).
//!
//! Defaults are process-wide mutable state (spec.md §9): guarded by a
//! [`Mutex`] and lazily populated on first access via [`OnceLock`].

use std::sync::{Mutex, OnceLock};
use std::time::Instant;

use crate::errors::{bad_arg, Error, Result};
use crate::kernel::{self, Kernel};

/// Alignment classes a popcount call can be routed to (spec.md §3/§4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlignmentClass {
    Align1,
    Align4,
    Align8Small,
    Align8Large,
}

impl AlignmentClass {
    pub fn name(self) -> &'static str {
        match self {
            AlignmentClass::Align1 => "align1",
            AlignmentClass::Align4 => "align4",
            AlignmentClass::Align8Small => "align8-small",
            AlignmentClass::Align8Large => "align8-large",
        }
    }

    const ALL: [AlignmentClass; 4] = [
        AlignmentClass::Align1,
        AlignmentClass::Align4,
        AlignmentClass::Align8Small,
        AlignmentClass::Align8Large,
    ];

    /// Candidate kernels worth timing for this class, filtered to ones
    /// actually available on the host.
    fn candidates(self) -> Vec<Kernel> {
        kernel::compile_time_kernels()
            .into_iter()
            .filter(|k| (k.available)())
            .filter(|k| match self {
                AlignmentClass::Align1 => k.name == "lut8-1",
                AlignmentClass::Align4 => k.alignment <= 4 && k.name != "lut8-1",
                AlignmentClass::Align8Small => k.alignment <= 8,
                AlignmentClass::Align8Large => k.alignment <= 8,
            })
            .collect()
    }
}

/// Classify a call by its input shape, per the selection rule in spec.md §4.2.
pub fn classify(num_bytes: usize, stride: usize, base_ptr_align: usize) -> AlignmentClass {
    if num_bytes <= 1 {
        return AlignmentClass::Align1;
    }
    if base_ptr_align % 8 == 0 && stride % 8 == 0 {
        if num_bytes >= 96 {
            AlignmentClass::Align8Large
        } else {
            AlignmentClass::Align8Small
        }
    } else if base_ptr_align % 4 == 0 && stride % 4 == 0 {
        AlignmentClass::Align4
    } else {
        AlignmentClass::Align1
    }
}

/// Fixed 256-byte probe buffer used to time candidate kernels at load,
/// matching the reference implementation's fixed timing buffer.
fn probe_buffer() -> &'static [u8; 256] {
    static BUFFER: OnceLock<[u8; 256]> = OnceLock::new();
    BUFFER.get_or_init(|| {
        let mut buf = [0u8; 256];
        let mut state = 0x243F6A8885A308D3u64;
        for b in buf.iter_mut() {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            *b = state as u8;
        }
        buf
    })
}

/// Time `kernel` over two runs of `repeat` iterations on the probe buffer,
/// keeping the smaller elapsed time to counteract scheduler jitter.
fn time_kernel(kernel: &Kernel, repeat: usize) -> std::time::Duration {
    let buf = probe_buffer();
    let run = || {
        let start = Instant::now();
        for _ in 0..repeat {
            std::hint::black_box((kernel.popcount)(std::hint::black_box(buf)));
        }
        start.elapsed()
    };
    let a = run();
    let b = run();
    a.min(b)
}

fn pick_fastest(candidates: &[Kernel], repeat: usize) -> Kernel {
    *candidates
        .iter()
        .min_by_key(|k| time_kernel(k, repeat))
        .expect("at least the byte kernel is always available")
}

struct DispatchTable {
    defaults: [Kernel; 4],
}

fn table() -> &'static Mutex<DispatchTable> {
    static TABLE: OnceLock<Mutex<DispatchTable>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let defaults = AlignmentClass::ALL.map(|class| {
            let candidates = class.candidates();
            log::debug!("timing {} candidate kernels for {}", candidates.len(), class.name());
            pick_fastest(&candidates, 64)
        });
        Mutex::new(DispatchTable { defaults })
    })
}

/// Kernels actually runnable on this host.
pub fn list_kernels() -> Vec<Kernel> {
    kernel::compile_time_kernels().into_iter().filter(|k| (k.available)()).collect()
}

/// Current default kernel for `class`.
pub fn get_method(class: AlignmentClass) -> Kernel {
    table().lock().unwrap().defaults[class as usize]
}

/// Force the default kernel for `class` to the kernel named `name`.
pub fn set_method(class: AlignmentClass, name: &str) -> Result<()> {
    let candidate = kernel::compile_time_kernels()
        .into_iter()
        .find(|k| k.name == name && (k.available)());
    match candidate {
        Some(k) if class.candidates().iter().any(|c| c.name == k.name) => {
            table().lock().unwrap().defaults[class as usize] = k;
            Ok(())
        }
        Some(_) => Err(Error::MethodMismatch),
        None => bad_arg!("unknown or unavailable kernel: {}", name),
    }
}

/// Retime every candidate for `class` and update its default (spec.md §6
/// `select_fastest_method`).
pub fn select_fastest_method(class: AlignmentClass, repeat: usize) -> Kernel {
    let candidates = class.candidates();
    let fastest = pick_fastest(&candidates, repeat);
    table().lock().unwrap().defaults[class as usize] = fastest;
    fastest
}

/// Pick the popcount function to use for a fingerprint of bit width `num_bits`
/// stored with `stride` and a base pointer aligned to `base_ptr_align` bytes.
pub fn select_popcount(num_bits: usize, stride: usize, base_ptr_align: usize) -> Result<crate::kernel::PopcountFn> {
    if num_bits == 0 {
        bad_arg!("num_bits must be positive");
    }
    let num_bytes = (num_bits + 7) / 8;
    let class = classify(num_bytes, stride, base_ptr_align);
    Ok(get_method(class).popcount)
}

/// Pick the intersect-popcount function for two fingerprints of bit width
/// `num_bits`, each with its own stride/alignment.
pub fn select_intersect_popcount(
    num_bits: usize,
    stride_a: usize,
    align_a: usize,
    stride_b: usize,
    align_b: usize,
) -> Result<crate::kernel::IntersectFn> {
    if num_bits == 0 {
        bad_arg!("num_bits must be positive");
    }
    let num_bytes = (num_bits + 7) / 8;
    let stride = stride_a.min(stride_b);
    let align = align_a.min(align_b);
    let class = classify(num_bytes, stride, align);
    Ok(get_method(class).intersect_popcount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_matches_selection_rule() {
        assert_eq!(classify(1, 1, 1), AlignmentClass::Align1);
        assert_eq!(classify(10, 4, 4), AlignmentClass::Align4);
        assert_eq!(classify(50, 8, 8), AlignmentClass::Align8Small);
        assert_eq!(classify(96, 8, 8), AlignmentClass::Align8Large);
        assert_eq!(classify(10, 3, 1), AlignmentClass::Align1);
    }

    #[test]
    fn selected_kernels_agree_with_reference_popcount() {
        let data = [0x0Fu8, 0xFF, 0x01, 0x80, 0x3C, 0x55, 0x99, 0xA1];
        let popcount = select_popcount(64, 8, 8).unwrap();
        assert_eq!(popcount(&data), crate::bits::popcount(&data));
    }

    #[test]
    fn set_method_rejects_unavailable_or_unknown() {
        assert!(set_method(AlignmentClass::Align1, "does-not-exist").is_err());
    }

    #[test]
    fn select_fastest_method_returns_a_candidate_for_the_class() {
        let chosen = select_fastest_method(AlignmentClass::Align4, 4);
        assert!(AlignmentClass::Align4.candidates().iter().any(|c| c.name == chosen.name));
    }
}
