//! Bounded retry of idempotent operations.

use thiserror::Error;

/// The callback never reported success within the attempt budget.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("maximum attempts reached ({0})")]
pub struct MaxAttemptsReached(pub u32);

/// Invoke `cb` until it reports success, fails, or `max` attempts elapse.
///
/// The callback returns `Ok(true)` when done and `Ok(false)` to be called
/// again. Its errors are returned as-is on the first occurrence. No delay
/// is introduced between attempts.
pub fn retry_max<E, F>(max: u32, mut cb: F) -> Result<(), E>
where
    F: FnMut() -> Result<bool, E>,
    E: From<MaxAttemptsReached>,
{
    for _ in 0..max {
        if cb()? {
            return Ok(());
        }
    }
    Err(MaxAttemptsReached(max).into())
}
