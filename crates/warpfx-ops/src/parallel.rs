//! Row-block execution over a destination buffer.
//!
//! The destination is split into contiguous blocks of whole rows sized by
//! [`Configuration::rows_per_block`]. With the `parallel` feature the
//! blocks run on the rayon pool via `par_chunks_mut`; otherwise, or when the
//! configuration asks for a single task, they run in order on the calling
//! thread. Each block owns a disjoint slice, so no locking is needed.
//!
//! # Example
//!
//! ```rust
//! use warpfx_ops::{parallel, Configuration};
//!
//! let mut rows = vec![0u32; 8 * 6];
//! parallel::for_each_row_block(&mut rows, 8, &Configuration::default(), |first_row, block| {
//!     for (i, row) in block.chunks_exact_mut(8).enumerate() {
//!         row.fill((first_row + i) as u32);
//!     }
//! })
//! .unwrap();
//! assert_eq!(rows[8 * 5], 5);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::{Configuration, OpsError, OpsResult};

/// Runs `f(first_row, block)` for every row block of `pixels`.
///
/// `pixels.len()` must be a multiple of `width`. The cancellation token is
/// checked before anything runs and again before each block; blocks that
/// see it fired are skipped, keep their previous contents, and the call
/// returns [`OpsError::Cancelled`].
pub fn for_each_row_block<P, F>(
    pixels: &mut [P],
    width: usize,
    config: &Configuration,
    f: F,
) -> OpsResult<()>
where
    P: Send,
    F: Fn(usize, &mut [P]) + Sync + Send,
{
    if width == 0 || pixels.len() % width != 0 {
        return Err(OpsError::InvalidDimensions(format!(
            "buffer of {} pixels is not a whole number of {}-pixel rows",
            pixels.len(),
            width
        )));
    }
    if config.is_cancelled() {
        return Err(OpsError::Cancelled);
    }

    let height = pixels.len() / width;
    let rows = config.rows_per_block(height);
    let blocks = height.div_ceil(rows);
    let concurrent = blocks > 1 && config.parallelism() > 1;
    trace!(height, rows, blocks, concurrent, "row blocks");

    let skipped = AtomicBool::new(false);
    let run = |(index, block): (usize, &mut [P])| {
        if config.is_cancelled() {
            skipped.store(true, Ordering::Relaxed);
            return;
        }
        f(index * rows, block);
    };
    dispatch(pixels, rows * width, concurrent, run);

    if skipped.load(Ordering::Relaxed) {
        debug!(height, blocks, "row blocks cancelled");
        return Err(OpsError::Cancelled);
    }
    Ok(())
}

#[cfg(feature = "parallel")]
fn dispatch<P, F>(pixels: &mut [P], chunk: usize, concurrent: bool, run: F)
where
    P: Send,
    F: Fn((usize, &mut [P])) + Sync + Send,
{
    if concurrent {
        pixels.par_chunks_mut(chunk).enumerate().for_each(run);
    } else {
        pixels.chunks_mut(chunk).enumerate().for_each(run);
    }
}

#[cfg(not(feature = "parallel"))]
fn dispatch<P, F>(pixels: &mut [P], chunk: usize, _concurrent: bool, run: F)
where
    F: Fn((usize, &mut [P])),
{
    pixels.chunks_mut(chunk).enumerate().for_each(run);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CancellationToken;
    use std::sync::atomic::AtomicUsize;

    fn fill_row_index(
        config: &Configuration,
        width: usize,
        height: usize,
    ) -> OpsResult<Vec<usize>> {
        let mut buf = vec![usize::MAX; width * height];
        for_each_row_block(&mut buf, width, config, |first_row, block| {
            for (i, row) in block.chunks_exact_mut(width).enumerate() {
                row.fill(first_row + i);
            }
        })?;
        Ok(buf)
    }

    #[test]
    fn test_every_row_written_once() {
        for config in [
            Configuration::default(),
            Configuration::sequential(),
            Configuration::default().with_max_degree_of_parallelism(3).with_min_rows_per_task(1),
        ] {
            let buf = fill_row_index(&config, 5, 37).unwrap();
            for (i, v) in buf.iter().enumerate() {
                assert_eq!(*v, i / 5);
            }
        }
    }

    #[test]
    fn test_block_count() {
        let calls = AtomicUsize::new(0);
        let config = Configuration::default()
            .with_max_degree_of_parallelism(4)
            .with_min_rows_per_task(2);
        let mut buf = vec![0u8; 3 * 16];
        for_each_row_block(&mut buf, 3, &config, |_, block| {
            assert_eq!(block.len(), 3 * 4);
            calls.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();
        assert_eq!(calls.into_inner(), 4);
    }

    #[test]
    fn test_cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let config = Configuration::default().with_cancellation(token);
        let mut buf = vec![7u8; 4 * 4];
        let err = for_each_row_block(&mut buf, 4, &config, |_, block| block.fill(0)).unwrap_err();
        assert!(err.is_cancelled());
        assert!(buf.iter().all(|&v| v == 7));
    }

    #[test]
    fn test_cancel_inside_last_block_keeps_finished_work() {
        let token = CancellationToken::new();
        let config = Configuration::sequential().with_cancellation(token.clone());
        let mut buf = vec![0u8; 2 * 4];
        for_each_row_block(&mut buf, 2, &config, |_, block| {
            block.fill(1);
            token.cancel();
        })
        .unwrap();
        assert!(buf.iter().all(|&v| v == 1));

        let err = for_each_row_block(&mut buf, 2, &config, |_, block| block.fill(2)).unwrap_err();
        assert!(err.is_cancelled());
        assert!(buf.iter().all(|&v| v == 1));
    }

    #[test]
    fn test_cancel_mid_run_leaves_whole_blocks() {
        let token = CancellationToken::new();
        let config = Configuration::default()
            .with_max_degree_of_parallelism(4)
            .with_min_rows_per_task(2)
            .with_cancellation(token.clone());
        let mut buf = vec![0u8; 3 * 8];
        let result = for_each_row_block(&mut buf, 3, &config, |_, block| {
            token.cancel();
            block.fill(5);
        });
        assert!(result.is_ok() || result.is_err_and(|e| e.is_cancelled()));
        // every block is either fully written or untouched
        for block in buf.chunks(6) {
            assert!(block.iter().all(|&v| v == block[0]));
        }
        assert!(buf.contains(&5));
    }

    #[test]
    fn test_rejects_ragged_buffer() {
        let mut buf = vec![0u8; 7];
        let config = Configuration::default();
        let err = for_each_row_block(&mut buf, 2, &config, |_, _| {}).unwrap_err();
        assert!(matches!(err, OpsError::InvalidDimensions(_)));
        assert!(for_each_row_block(&mut buf, 0, &config, |_, _| {}).is_err());
    }
}
