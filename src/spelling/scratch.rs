//! Per-thread working buffers for edit distance computations.
//!
//! Each thread keeps one growable buffer that distance calls borrow for the
//! duration of a single computation. Buffers are never shared between
//! threads, and a nested call on the same thread gets a fresh allocation
//! instead of the pooled one.

use std::cell::RefCell;

use crate::error::{FuzzdexError, Result};

/// Pooled buffers larger than this many cells are released after use.
pub const MAX_RETAINED_CELLS: usize = 1 << 16;

thread_local! {
    static SCRATCH: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Run `f` with a buffer of exactly `len` cells.
///
/// Contents left by a previous call are not cleared; callers initialize
/// every cell they read.
pub(crate) fn with_buffer<R>(len: usize, f: impl FnOnce(&mut [usize]) -> R) -> Result<R> {
    SCRATCH.with(|cell| match cell.try_borrow_mut() {
        Ok(mut pooled) => {
            ensure_len(&mut pooled, len)?;
            let result = f(&mut pooled[..len]);
            if pooled.len() > MAX_RETAINED_CELLS {
                *pooled = Vec::new();
            }
            Ok(result)
        }
        Err(_) => {
            let mut fresh = Vec::new();
            ensure_len(&mut fresh, len)?;
            Ok(f(&mut fresh[..len]))
        }
    })
}

fn ensure_len(buffer: &mut Vec<usize>, len: usize) -> Result<()> {
    if buffer.len() < len {
        buffer.try_reserve(len - buffer.len()).map_err(|e| {
            FuzzdexError::capacity(format!("cannot allocate {len} distance cells: {e}"))
        })?;
        buffer.resize(len, 0);
    }
    Ok(())
}

/// Cells currently held by this thread's pool.
pub fn pooled_cells() -> usize {
    SCRATCH.with(|cell| cell.try_borrow().map(|b| b.len()).unwrap_or(0))
}
