//! Fixed-size worker pools for per-vertex kernels.
//!
//! Work is split into `n_threads` contiguous index ranges. Each range is
//! written by exactly one task, and all tasks are joined before a call
//! returns, so consecutive calls never overlap.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::Result;

/// A serial executor or a dedicated rayon pool with a fixed thread count.
#[derive(Debug)]
pub struct Workers {
    pool: Option<ThreadPool>,
    n_threads: usize,
}

impl Workers {
    /// Create workers for `n_threads` threads. `0` and `1` mean serial.
    ///
    /// The serial executor spawns no threads.
    pub fn new(n_threads: usize) -> Result<Self> {
        if n_threads <= 1 {
            return Ok(Self::serial());
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(n_threads)
            .thread_name(|i| format!("cornermesh-worker-{}", i))
            .build()?;
        Ok(Self {
            pool: Some(pool),
            n_threads,
        })
    }

    /// A serial executor.
    pub fn serial() -> Self {
        Self {
            pool: None,
            n_threads: 1,
        }
    }

    /// Number of threads work is split across.
    #[inline]
    pub fn n_threads(&self) -> usize {
        self.n_threads
    }

    /// Check whether work runs on the calling thread.
    #[inline]
    pub fn is_serial(&self) -> bool {
        self.pool.is_none()
    }

    /// Length of each contiguous range for `len` items.
    fn chunk_len(&self, len: usize) -> usize {
        len.div_ceil(self.n_threads).max(1)
    }

    /// Set `out[i] = f(i)` for every index.
    ///
    /// `f` may only read shared state; each range of `out` is written by a
    /// single task.
    pub fn fill<T, F>(&self, out: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize) -> T + Sync,
    {
        let Some(pool) = &self.pool else {
            for (i, slot) in out.iter_mut().enumerate() {
                *slot = f(i);
            }
            return;
        };

        let chunk = self.chunk_len(out.len());
        pool.install(|| {
            out.par_chunks_mut(chunk)
                .enumerate()
                .for_each(|(k, range)| {
                    let base = k * chunk;
                    for (j, slot) in range.iter_mut().enumerate() {
                        *slot = f(base + j);
                    }
                });
        });
    }

    /// Minimum and maximum of `values`, ignoring NaN.
    ///
    /// Each range is reduced on its own and the partial results are merged
    /// after the join. Returns `None` if no value is a number.
    pub fn min_max(&self, values: &[f64]) -> Option<(f64, f64)> {
        let Some(pool) = &self.pool else {
            return min_max_serial(values);
        };

        let chunk = self.chunk_len(values.len());
        let partial: Vec<Option<(f64, f64)>> =
            pool.install(|| values.par_chunks(chunk).map(min_max_serial).collect());

        partial.into_iter().flatten().reduce(merge_range)
    }
}

impl Default for Workers {
    fn default() -> Self {
        Self::serial()
    }
}

fn min_max_serial(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .filter(|x| !x.is_nan())
        .map(|&x| (x, x))
        .reduce(merge_range)
}

#[inline]
fn merge_range(a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
    (a.0.min(b.0), a.1.max(b.1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_for_zero_and_one() {
        assert!(Workers::new(0).unwrap().is_serial());
        assert!(Workers::new(1).unwrap().is_serial());
        let workers = Workers::new(4).unwrap();
        assert!(!workers.is_serial());
        assert_eq!(workers.n_threads(), 4);
    }

    #[test]
    fn test_fill_matches_serial() {
        let f = |i: usize| (i as f64).sqrt() * 3.0;
        let mut expected = vec![0.0; 1001];
        Workers::serial().fill(&mut expected, f);

        for n in [2, 3, 4, 8] {
            let mut out = vec![0.0; 1001];
            Workers::new(n).unwrap().fill(&mut out, f);
            assert_eq!(out, expected, "mismatch with {} threads", n);
        }
    }

    #[test]
    fn test_fill_fewer_items_than_threads() {
        let mut out = vec![0usize; 3];
        Workers::new(8).unwrap().fill(&mut out, |i| i * 10);
        assert_eq!(out, vec![0, 10, 20]);

        let mut empty: Vec<usize> = Vec::new();
        Workers::new(8).unwrap().fill(&mut empty, |i| i);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_min_max() {
        let values = vec![3.0, -1.5, f64::NAN, 7.25, 0.0, 2.0, -1.0];
        assert_eq!(Workers::serial().min_max(&values), Some((-1.5, 7.25)));
        for n in [2, 4, 8] {
            assert_eq!(Workers::new(n).unwrap().min_max(&values), Some((-1.5, 7.25)));
        }

        assert_eq!(Workers::serial().min_max(&[]), None);
        assert_eq!(Workers::new(4).unwrap().min_max(&[f64::NAN]), None);
    }
}
