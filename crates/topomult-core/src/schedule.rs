//! Static distribution of directions across a fixed group of workers.
//!
//! Workers never talk to each other. The only synchronisation is a barrier
//! before and after the work, provided by a [`ProcessGroup`].
use std::sync::{Arc, Barrier};

/// Identity of this worker within a fixed-size group.
pub trait ProcessGroup {
    fn size(&self) -> usize;
    fn rank(&self) -> usize;
    fn barrier(&self);
}

/// A group of one. Used when no parallel runtime is requested.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleProcess;

impl ProcessGroup for SingleProcess {
    fn size(&self) -> usize {
        1
    }

    fn rank(&self) -> usize {
        0
    }

    fn barrier(&self) {}
}

/// One rank of an in-process worker group sharing a barrier.
#[derive(Debug, Clone)]
pub struct ThreadMember {
    rank: usize,
    size: usize,
    barrier: Arc<Barrier>,
}

impl ThreadMember {
    /// All members of a group of `size` workers, in rank order.
    pub fn group(size: usize) -> Vec<ThreadMember> {
        assert!(size > 0, "worker group must not be empty");
        let barrier = Arc::new(Barrier::new(size));
        (0..size)
            .map(|rank| ThreadMember {
                rank,
                size,
                barrier: Arc::clone(&barrier),
            })
            .collect()
    }
}

impl ProcessGroup for ThreadMember {
    fn size(&self) -> usize {
        self.size
    }

    fn rank(&self) -> usize {
        self.rank
    }

    fn barrier(&self) {
        self.barrier.wait();
    }
}

/// Items at positions `rank, rank + size, rank + 2*size, ...`.
pub fn balanced<'a, T, G>(items: &'a [T], group: &G) -> impl Iterator<Item = &'a T>
where
    G: ProcessGroup + ?Sized,
{
    items.iter().skip(group.rank()).step_by(group.size().max(1))
}

/// Thread name prefix of pool workers; the rank follows it.
pub const WORKER_THREAD_PREFIX: &str = "topomult-worker-";

/// Rank of a pool worker given its thread name, `None` for any other thread.
pub fn worker_rank(thread_name: Option<&str>) -> Option<usize> {
    thread_name?.strip_prefix(WORKER_THREAD_PREFIX)?.parse().ok()
}

/// Run `f` once on each of `workers` pool threads, each with its own
/// [`ThreadMember`]. Results come back in rank order.
///
/// The pool is sized to exactly `workers` threads so every member is running
/// at the same time and the shared barrier can always be released.
#[cfg(feature = "threading")]
pub fn run_parallel<R, F>(workers: usize, f: F) -> crate::error::Result<Vec<R>>
where
    R: Send,
    F: Fn(&ThreadMember) -> R + Sync,
{
    use crate::error::TopoError;

    let members = ThreadMember::group(workers);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("{WORKER_THREAD_PREFIX}{i}"))
        .build()
        .map_err(|e| TopoError::ThreadPool(e.to_string()))?;
    Ok(pool.broadcast(|ctx| f(&members[ctx.index()])))
}
