//! Execution settings threaded through every resampling call.
//!
//! ```rust
//! use warpfx_ops::{CancellationToken, Configuration};
//!
//! let token = CancellationToken::new();
//! let config = Configuration::default()
//!     .with_max_degree_of_parallelism(4)
//!     .with_cancellation(token.clone());
//! assert!(!config.is_cancelled());
//! token.cancel();
//! assert!(config.is_cancelled());
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Default minimum number of destination rows handed to one task.
pub const DEFAULT_MIN_ROWS_PER_TASK: usize = 4;

/// Shared flag used to stop a running resample between row blocks.
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Creates a token that has not fired.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    #[inline]
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Returns true once [`cancel`](Self::cancel) has been called on any clone.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Resampling execution settings.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Configuration {
    /// Upper bound on concurrently processed row blocks. `0` uses the rayon
    /// pool size, `1` forces sequential execution.
    pub max_degree_of_parallelism: usize,
    /// Smallest number of rows worth a separate task.
    pub min_rows_per_task: usize,
    /// Accumulate color premultiplied by alpha.
    pub premultiply_alpha: bool,
    /// Optional cancellation flag, checked before each row block.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub cancellation: Option<CancellationToken>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            max_degree_of_parallelism: 0,
            min_rows_per_task: DEFAULT_MIN_ROWS_PER_TASK,
            premultiply_alpha: false,
            cancellation: None,
        }
    }
}

impl Configuration {
    /// Settings that run every row block on the calling thread.
    pub fn sequential() -> Self {
        Self::default().with_max_degree_of_parallelism(1)
    }

    /// Sets the parallelism cap.
    pub fn with_max_degree_of_parallelism(mut self, n: usize) -> Self {
        self.max_degree_of_parallelism = n;
        self
    }

    /// Sets the minimum rows per task. `0` is treated as `1`.
    pub fn with_min_rows_per_task(mut self, rows: usize) -> Self {
        self.min_rows_per_task = rows;
        self
    }

    /// Enables or disables premultiplied-alpha accumulation.
    pub fn with_premultiply_alpha(mut self, enabled: bool) -> Self {
        self.premultiply_alpha = enabled;
        self
    }

    /// Attaches a cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Returns true if an attached token has fired.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    /// Number of rows per block for an image `height` rows tall.
    ///
    /// `tasks = min(parallelism, ceil(height / min_rows_per_task))`, at
    /// least one, and rows are split evenly across tasks.
    pub fn rows_per_block(&self, height: usize) -> usize {
        if height == 0 {
            return 1;
        }
        let min_rows = self.min_rows_per_task.max(1);
        let max_tasks = height.div_ceil(min_rows);
        let tasks = self.parallelism().min(max_tasks).max(1);
        height.div_ceil(tasks)
    }

    /// Effective degree of parallelism.
    pub fn parallelism(&self) -> usize {
        match self.max_degree_of_parallelism {
            0 => default_parallelism(),
            n => n,
        }
    }
}

#[cfg(feature = "parallel")]
fn default_parallelism() -> usize {
    rayon::current_num_threads()
}

#[cfg(not(feature = "parallel"))]
fn default_parallelism() -> usize {
    1
}
