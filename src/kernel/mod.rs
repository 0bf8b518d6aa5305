//! Popcount kernels: multiple implementations of (popcount, intersect-popcount)
//! over raw byte spans, each required to agree with [`crate::bits`] on any
//! valid, zero-padded input (spec invariant I5).
//!
//! Every kernel accepts a byte length and pointer(s) rounded up to its
//! natural word size; callers (the arena builder, the dispatcher) are
//! responsible for zero-padding the tail.

pub mod byte;
pub mod lauradoux;
pub mod lut16_4;
pub mod lut8_4;

cfg_if::cfg_if! {
    if #[cfg(target_arch = "x86_64")] {
        pub mod popcnt;
        pub mod ssse3;
    }
}

/// A function pair capable of popcount / intersect-popcount over byte spans.
pub type PopcountFn = fn(&[u8]) -> u32;
pub type IntersectFn = fn(&[u8], &[u8]) -> u32;

/// Static description of one kernel implementation (spec.md §3 "Method descriptor").
#[derive(Clone, Copy)]
pub struct Kernel {
    pub name: &'static str,
    /// Required base-pointer / stride alignment in bytes.
    pub alignment: usize,
    /// Minimum fingerprint byte length this kernel is worth using for.
    pub min_size: usize,
    /// Whether the host CPU actually supports this kernel.
    pub available: fn() -> bool,
    pub popcount: PopcountFn,
    pub intersect_popcount: IntersectFn,
}

fn always() -> bool {
    true
}

/// All kernels compiled for this target, in no particular order.
///
/// [`crate::dispatch`] filters this list by `available()` and by
/// alignment/size fit, then times the survivors to pick per-class defaults.
pub fn compile_time_kernels() -> Vec<Kernel> {
    let mut kernels = vec![
        Kernel {
            name: "lut8-1",
            alignment: 1,
            min_size: 0,
            available: always,
            popcount: byte::popcount,
            intersect_popcount: byte::intersect_popcount,
        },
        Kernel {
            name: "lut8-4",
            alignment: 4,
            min_size: 4,
            available: always,
            popcount: lut8_4::popcount,
            intersect_popcount: lut8_4::intersect_popcount,
        },
        Kernel {
            name: "lut16-4",
            alignment: 4,
            min_size: 4,
            available: always,
            popcount: lut16_4::popcount,
            intersect_popcount: lut16_4::intersect_popcount,
        },
        Kernel {
            name: "lauradoux",
            alignment: 8,
            min_size: 96,
            available: always,
            popcount: lauradoux::popcount,
            intersect_popcount: lauradoux::intersect_popcount,
        },
    ];

    #[cfg(target_arch = "x86_64")]
    {
        kernels.push(Kernel {
            name: "popcnt",
            alignment: 8,
            min_size: 8,
            available: popcnt::available,
            popcount: popcnt::popcount,
            intersect_popcount: popcnt::intersect_popcount,
        });
        kernels.push(Kernel {
            name: "ssse3",
            alignment: 16,
            min_size: 16,
            available: ssse3::available,
            popcount: ssse3::popcount,
            intersect_popcount: ssse3::intersect_popcount,
        });
    }

    kernels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits;
    use rand::RngCore;

    #[test]
    fn every_available_kernel_agrees_with_reference() {
        let mut rng = rand::thread_rng();
        for kernel in compile_time_kernels() {
            if !(kernel.available)() {
                continue;
            }
            for &len in &[0usize, 1, 4, 8, 16, 32, 96, 97, 200] {
                let mut a = vec![0u8; len];
                let mut b = vec![0u8; len];
                rng.fill_bytes(&mut a);
                rng.fill_bytes(&mut b);
                assert_eq!(
                    (kernel.popcount)(&a),
                    bits::popcount(&a),
                    "kernel {} popcount mismatch at len {}",
                    kernel.name,
                    len
                );
                assert_eq!(
                    (kernel.intersect_popcount)(&a, &b),
                    bits::intersect_popcount(&a, &b),
                    "kernel {} intersect mismatch at len {}",
                    kernel.name,
                    len
                );
            }
        }
    }
}
