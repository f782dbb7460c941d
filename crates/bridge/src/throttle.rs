use foundation::time::Time;

/// Minimum interval between `log` messages (seconds).
pub const LOG_MIN_INTERVAL_S: f64 = 0.3;

/// Rate limit for diagnostic logs.
///
/// Logs are diagnostic, not authoritative: arrivals inside the interval are
/// dropped, never queued.
#[derive(Debug, Clone, PartialEq)]
pub struct LogThrottle {
    min_interval_s: f64,
    last: Option<Time>,
}

impl Default for LogThrottle {
    fn default() -> Self {
        Self::new(LOG_MIN_INTERVAL_S)
    }
}

impl LogThrottle {
    pub fn new(min_interval_s: f64) -> Self {
        Self {
            min_interval_s,
            last: None,
        }
    }

    /// Returns `true` if a log at `now` may pass, and records it.
    pub fn allow(&mut self, now: Time) -> bool {
        match self.last {
            Some(last) if now.seconds_since(last) < self.min_interval_s => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}
