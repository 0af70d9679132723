//! Bounded-concurrency execution of a worker over an ordered item collection.
//!
//! Result slot `i` always corresponds to item `i` regardless of completion
//! order; progress notifications fire in completion order.

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use crate::foundation::error::{BasvidError, BasvidResult};

/// Observer invoked once per completed item with the completion count so far.
///
/// Called concurrently from worker threads; notification order follows
/// completion time, not item index.
pub type ProgressFn<'a> = &'a (dyn Fn(usize) + Sync);

/// Run `worker` over `items` with at most `jobs` executions in flight.
///
/// `jobs` values below 1 are clamped to 1, which degenerates to sequential
/// execution. On the first worker error the remaining scheduled workers are
/// allowed to finish, partial results are discarded and the error is
/// returned; a non-error return always holds one result per input item, in
/// input order.
pub fn run_batch<T, R, W>(
    items: Vec<T>,
    jobs: usize,
    progress: Option<ProgressFn<'_>>,
    worker: W,
) -> BasvidResult<Vec<R>>
where
    T: Send,
    R: Send,
    W: Fn(usize, T) -> BasvidResult<R> + Sync,
{
    run_batch_partial(items, jobs, progress, worker)?
        .into_iter()
        .collect()
}

/// Like [`run_batch`], but keeps per-item outcomes instead of discarding
/// everything on the first error.
///
/// The returned vector has one entry per input item, in input order. Callers
/// wanting the classic fail-fast policy can simply `collect()` the entries.
pub fn run_batch_partial<T, R, W>(
    items: Vec<T>,
    jobs: usize,
    progress: Option<ProgressFn<'_>>,
    worker: W,
) -> BasvidResult<Vec<BasvidResult<R>>>
where
    T: Send,
    R: Send,
    W: Fn(usize, T) -> BasvidResult<R> + Sync,
{
    let pool = build_thread_pool(jobs.max(1))?;
    let done = AtomicUsize::new(0);

    let results = pool.install(|| {
        items
            .into_par_iter()
            .enumerate()
            .map(|(idx, item)| {
                let out = worker(idx, item);
                if let Some(observe) = progress {
                    let n = done.fetch_add(1, Ordering::Relaxed) + 1;
                    observe(n);
                }
                out
            })
            .collect::<Vec<_>>()
    });

    Ok(results)
}

fn build_thread_pool(jobs: usize) -> BasvidResult<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(|e| BasvidError::Other(anyhow::anyhow!("failed to build thread pool: {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/batch.rs"]
mod tests;
