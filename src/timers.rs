//! RAII timing for provisioning calls.

use std::time::{Duration, Instant};

/// Adds the time between creation and drop to `slot`.
///
/// The slot is updated on every exit path, including early returns via `?`.
///
/// ```rust,ignore
/// let mut elapsed = Duration::ZERO;
/// {
///     let _timer = CallTimer::new(&mut elapsed);
///     connection.create_volume("vol1", &config)?;
/// }
/// ```
pub struct CallTimer<'a> {
    start: Instant,
    slot: &'a mut Duration,
}

impl<'a> CallTimer<'a> {
    pub fn new(slot: &'a mut Duration) -> Self {
        Self {
            start: Instant::now(),
            slot,
        }
    }
}

impl Drop for CallTimer<'_> {
    fn drop(&mut self) {
        *self.slot += self.start.elapsed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn timed_failure(slot: &mut Duration) -> Result<(), String> {
        let _timer = CallTimer::new(slot);
        thread::sleep(Duration::from_millis(5));
        Err("collaborator said no".to_string())
    }

    #[test]
    fn test_records_elapsed() {
        let mut elapsed = Duration::ZERO;
        {
            let _timer = CallTimer::new(&mut elapsed);
            thread::sleep(Duration::from_millis(10));
        }
        assert!(elapsed >= Duration::from_millis(10));
    }

    #[test]
    fn test_records_on_early_return() {
        let mut elapsed = Duration::ZERO;
        assert!(timed_failure(&mut elapsed).is_err());
        assert!(elapsed >= Duration::from_millis(5));
    }
}
