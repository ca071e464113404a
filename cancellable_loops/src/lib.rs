//! Sequential loops that stop early once a shared abort flag is raised.
//!
//! The flag is owned by whoever requests the work; the loop only reads it.
//! Resetting the flag is the requester's job, so a single raised flag aborts
//! every loop that observes it until it is cleared.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Returned when a loop observed the abort flag before finishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aborted {
    /// Number of items that were fully processed.
    pub completed: usize,
}

impl fmt::Display for Aborted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "loop aborted after {} items", self.completed)
    }
}

impl std::error::Error for Aborted {}

/// Runs `func` for each item, checking `abort_flag` before every item.
pub fn for_each_cancellable<I, F, T>(iter: I, abort_flag: &AtomicBool, mut func: F) -> Result<usize, Aborted>
where
    I: IntoIterator<Item = T>,
    F: FnMut(T),
{
    let mut completed = 0;
    for item in iter {
        if abort_flag.load(Ordering::Relaxed) {
            return Err(Aborted { completed });
        }
        func(item);
        completed += 1;
    }
    Ok(completed)
}

/// Like [`for_each_cancellable`], but the body may fail with its own error.
pub fn try_for_each_cancellable<I, F, T, E>(
    iter: I,
    abort_flag: &AtomicBool,
    mut func: F,
) -> Result<usize, E>
where
    I: IntoIterator<Item = T>,
    F: FnMut(T) -> Result<(), E>,
    E: From<Aborted>,
{
    let mut completed = 0;
    for item in iter {
        if abort_flag.load(Ordering::Relaxed) {
            return Err(Aborted { completed }.into());
        }
        func(item)?;
        completed += 1;
    }
    Ok(completed)
}
