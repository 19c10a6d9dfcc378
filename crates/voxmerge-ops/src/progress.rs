//! Cooperative abort and progress reporting.
//!
//! Workers poll an [`AbortFlag`] once per output row and stop before the next
//! row once it is raised. Only the worker that owns tile 0 reports progress,
//! through a caller-supplied [`ProgressSink`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

/// Shared cancellation flag.
///
/// Cloning yields a handle to the same flag. Reads and writes are relaxed:
/// the flag carries no data, and workers only need to see it eventually.
#[derive(Debug, Clone, Default)]
pub struct AbortFlag(Arc<AtomicBool>);

impl AbortFlag {
    /// A lowered flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that running workers stop at their next row.
    #[inline]
    pub fn abort(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Lowers the flag again.
    #[inline]
    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }

    /// Returns `true` once abort was requested.
    #[inline]
    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Receives merge progress.
///
/// Called only from the worker owning tile 0, so implementations see a single
/// writer. `fraction` is in `[0, 1]` and never decreases within one merge.
pub trait ProgressSink: Send + Sync {
    /// Progress update with a label naming the current slice.
    fn update(&self, fraction: f64, label: &str);
}

/// Discards progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn update(&self, _fraction: f64, _label: &str) {}
}

/// Logs progress at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn update(&self, fraction: f64, label: &str) {
        debug!(percent = (fraction * 100.0).round() as u32, "{}", label);
    }
}

impl<F> ProgressSink for F
where
    F: Fn(f64, &str) + Send + Sync,
{
    fn update(&self, fraction: f64, label: &str) {
        self(fraction, label)
    }
}

/// Everything a worker shares with the caller during one merge.
#[derive(Clone)]
pub struct ExecutionContext {
    /// Cancellation flag polled once per row.
    pub abort: AbortFlag,
    /// Progress receiver for tile 0.
    pub progress: Arc<dyn ProgressSink>,
}

impl ExecutionContext {
    /// Context with the given flag and sink.
    pub fn new(abort: AbortFlag, progress: Arc<dyn ProgressSink>) -> Self {
        Self { abort, progress }
    }

    /// Context with a fresh flag and the given sink.
    pub fn with_progress<P: ProgressSink + 'static>(progress: P) -> Self {
        Self::new(AbortFlag::new(), Arc::new(progress))
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new(AbortFlag::new(), Arc::new(NoProgress))
    }
}

impl std::fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("abort", &self.abort.is_aborted())
            .finish_non_exhaustive()
    }
}

/// Row counter for the reporting worker.
///
/// Reports after every `rows / 50 + 1` completed rows and after the last row,
/// giving roughly fifty updates per merge.
#[derive(Debug)]
pub(crate) struct RowProgress {
    total: usize,
    done: usize,
    every: usize,
    depth: usize,
}

impl RowProgress {
    pub(crate) fn new(total_rows: usize, depth: usize) -> Self {
        Self {
            total: total_rows,
            done: 0,
            every: total_rows / 50 + 1,
            depth,
        }
    }

    /// Counts one finished row of slice `slice` (0-based within the tile).
    pub(crate) fn row_done(&mut self, slice: usize, sink: &dyn ProgressSink) {
        self.done += 1;
        if self.done % self.every == 0 || self.done == self.total {
            let fraction = (self.done as f64 / self.total.max(1) as f64).min(1.0);
            let label = format!("Merging channels (slice {} / {})", slice + 1, self.depth);
            sink.update(fraction, &label);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_abort_flag_shared() {
        let flag = AbortFlag::new();
        let other = flag.clone();
        assert!(!other.is_aborted());
        flag.abort();
        assert!(other.is_aborted());
        other.reset();
        assert!(!flag.is_aborted());
    }

    #[test]
    fn test_row_progress_every_row_when_small() {
        let calls = Mutex::new(Vec::new());
        let sink = |f: f64, label: &str| calls.lock().unwrap().push((f, label.to_string()));

        let mut p = RowProgress::new(4, 2);
        for row in 0..4 {
            p.row_done(row / 2, &sink);
        }
        let calls = calls.into_inner().unwrap();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0].0, 0.25);
        assert_eq!(calls[3].0, 1.0);
        assert_eq!(calls[3].1, "Merging channels (slice 2 / 2)");
    }

    #[test]
    fn test_row_progress_is_sparse_and_monotone() {
        let calls = Mutex::new(Vec::new());
        let sink = |f: f64, _: &str| calls.lock().unwrap().push(f);

        let mut p = RowProgress::new(1000, 10);
        for row in 0..1000 {
            p.row_done(row / 100, &sink);
        }
        let calls = calls.into_inner().unwrap();
        // every 21 rows, plus the final row
        assert_eq!(calls.len(), 1000 / 21 + 1);
        assert!(calls.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*calls.last().unwrap(), 1.0);
    }
}
