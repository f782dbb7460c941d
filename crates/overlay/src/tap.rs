use foundation::time::Time;

/// Refractory window for marker activation (seconds).
pub const TAP_REFRACTORY_S: f64 = 0.4;

/// Deduplicates overlapping activation signals for one overlay.
///
/// A single physical tap can surface as pointer-down, touch-start, and click
/// in close succession; only the first signal inside the window fires.
#[derive(Debug, Clone, PartialEq)]
pub struct TapGate {
    refractory_s: f64,
    last: Option<Time>,
}

impl Default for TapGate {
    fn default() -> Self {
        Self::new(TAP_REFRACTORY_S)
    }
}

impl TapGate {
    pub fn new(refractory_s: f64) -> Self {
        Self {
            refractory_s,
            last: None,
        }
    }

    /// Returns `true` if an activation at `now` fires, and records it.
    pub fn try_activate(&mut self, now: Time) -> bool {
        match self.last {
            Some(last) if now.seconds_since(last) < self.refractory_s => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TapGate;
    use foundation::time::Time;

    #[test]
    fn duplicate_within_window_is_suppressed() {
        let mut gate = TapGate::default();
        assert!(gate.try_activate(Time(1.0)));
        assert!(!gate.try_activate(Time(1.2)));
    }

    #[test]
    fn fires_again_after_the_window() {
        let mut gate = TapGate::default();
        assert!(gate.try_activate(Time(1.0)));
        assert!(gate.try_activate(Time(1.4)));
    }

    #[test]
    fn suppression_does_not_extend_the_window() {
        let mut gate = TapGate::default();
        assert!(gate.try_activate(Time(0.0)));
        assert!(!gate.try_activate(Time(0.3)));
        assert!(gate.try_activate(Time(0.4)));
    }
}
