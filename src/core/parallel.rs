//! Parallel processing utilities

use crate::error::{IscopError, Result};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Progress update information for parallel operations
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    pub current: usize,
    pub total: usize,
    pub message: String,
}

impl ProgressUpdate {
    /// Create a new progress update
    pub fn new(current: usize, total: usize, message: impl Into<String>) -> Self {
        Self {
            current,
            total,
            message: message.into(),
        }
    }

    /// Calculate progress percentage
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.current as f64 / self.total as f64) * 100.0
        }
    }
}

/// Run `f` over `items` on a pool of `jobs` threads.
///
/// Results come back in input order; the first error wins.
pub fn process_in_order<T, F, R, P>(items: Vec<T>, jobs: usize, f: F, progress: P) -> Result<Vec<R>>
where
    T: Send,
    R: Send,
    F: Fn(T) -> Result<R> + Send + Sync,
    P: Fn(ProgressUpdate) + Send + Sync,
{
    let total = items.len();
    let counter = AtomicUsize::new(0);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.max(1))
        .build()
        .map_err(|e| IscopError::ParallelExecution {
            message: format!("Failed to build thread pool: {}", e),
        })?;

    pool.install(|| {
        items
            .into_par_iter()
            .map(|item| {
                let result = f(item);
                let done = counter.fetch_add(1, Ordering::Relaxed) + 1;
                progress(ProgressUpdate::new(
                    done,
                    total,
                    format!("Processed {}/{}", done, total),
                ));
                result
            })
            .collect()
    })
}
