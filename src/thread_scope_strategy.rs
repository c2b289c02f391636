use crate::error::RowDiffError;

/// A boxed unit of work that may borrow from the caller's stack.
pub type ScopedTask<'env> = Box<dyn FnOnce() + Send + 'env>;

/// Runs a batch of tasks concurrently and returns once all of them have finished.
///
/// Every task must get its own thread: the ingestion tasks poll each other's progress,
/// so an implementation that runs them one after another would never finish.
pub trait ThreadScoper {
    fn scope_all<'env>(&self, tasks: Vec<ScopedTask<'env>>) -> Result<(), RowDiffError>;
}

#[derive(Debug, Default)]
#[cfg(feature = "crossbeam-utils")]
pub struct CrossbeamScope;

#[cfg(feature = "crossbeam-utils")]
impl ThreadScoper for CrossbeamScope {
    fn scope_all<'env>(&self, tasks: Vec<ScopedTask<'env>>) -> Result<(), RowDiffError> {
        crossbeam_utils::thread::scope(|s| {
            for task in tasks {
                s.spawn(move |_| task());
            }
        })
        .map_err(|_| RowDiffError::PipelineFailure {
            reason: "a scoped thread panicked".to_string(),
        })
    }
}

#[cfg(feature = "crossbeam-utils")]
impl CrossbeamScope {
    pub fn new() -> Self {
        Self
    }

    /// Crossbeam spawns one OS thread per task, so the thread count needs no sizing.
    pub fn for_threads(_threads: usize) -> Result<Self, RowDiffError> {
        Ok(Self)
    }
}

#[derive(Debug)]
#[cfg(feature = "rayon-threads")]
pub struct RayonScope {
    thread_pool: rayon::ThreadPool,
}

#[cfg(feature = "rayon-threads")]
impl ThreadScoper for RayonScope {
    fn scope_all<'env>(&self, tasks: Vec<ScopedTask<'env>>) -> Result<(), RowDiffError> {
        let available = self.thread_pool.current_num_threads();
        if tasks.len() > available {
            return Err(RowDiffError::InvalidConfig(format!(
                "{} tasks need their own thread but the pool only has {}",
                tasks.len(),
                available
            )));
        }
        self.thread_pool.scope(|s| {
            for task in tasks {
                s.spawn(move |_| task());
            }
        });
        Ok(())
    }
}

#[cfg(feature = "rayon-threads")]
impl RayonScope {
    pub fn new(thread_pool: rayon::ThreadPool) -> Self {
        Self { thread_pool }
    }

    /// Builds a dedicated pool with exactly `threads` threads.
    pub fn for_threads(threads: usize) -> Result<Self, RowDiffError> {
        Ok(Self {
            thread_pool: rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .thread_name(|idx| format!("csv-tolerant-diff-{}", idx))
                .build()?,
        })
    }
}

#[cfg(feature = "rayon-threads")]
pub type DefaultScope = RayonScope;
#[cfg(all(feature = "crossbeam-utils", not(feature = "rayon-threads")))]
pub type DefaultScope = CrossbeamScope;
