use foundation::time::Time;

use crate::protocol::{MarkerRecord, SurfaceMessage, encode_line};
use crate::throttle::LogThrottle;

/// Outbound queue for the host channel.
///
/// Every message is a best-effort notification: encode failures are
/// swallowed at the point of send and throttled logs are dropped, so the
/// surface never retries or blocks on the host.
#[derive(Debug, Default)]
pub struct Outbound {
    lines: Vec<String>,
    throttle: LogThrottle,
    dropped_logs: u64,
}

impl Outbound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_throttle(throttle: LogThrottle) -> Self {
        Self {
            throttle,
            ..Self::default()
        }
    }

    /// Queues a `log` event, subject to the throttle.
    pub fn log(
        &mut self,
        now: Time,
        msg: impl Into<String>,
        extra: Option<serde_json::Value>,
    ) -> bool {
        if !self.throttle.allow(now) {
            self.dropped_logs += 1;
            return false;
        }
        self.push(&SurfaceMessage::Log {
            msg: msg.into(),
            extra,
        })
    }

    /// Queues a `pinClick` event. User interactions are never throttled.
    pub fn pin_click(&mut self, marker: MarkerRecord) -> bool {
        self.push(&SurfaceMessage::PinClick { event: marker })
    }

    fn push(&mut self, msg: &SurfaceMessage) -> bool {
        match encode_line(msg) {
            Ok(line) => {
                self.lines.push(line);
                true
            }
            Err(_) => false,
        }
    }

    pub fn dropped_logs(&self) -> u64 {
        self.dropped_logs
    }

    pub fn pending(&self) -> usize {
        self.lines.len()
    }

    /// Hands all queued lines to the host channel.
    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }
}

#[cfg(test)]
mod tests {
    use super::Outbound;
    use crate::protocol::MarkerRecord;
    use foundation::time::Time;

    fn marker() -> MarkerRecord {
        MarkerRecord {
            id: "m".into(),
            title: "M".into(),
            lat: 0.0,
            lng: 0.0,
            glyph: String::new(),
        }
    }

    #[test]
    fn drain_clears_the_queue() {
        let mut out = Outbound::new();
        out.log(Time(0.0), "a", None);
        let drained = out.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(out.pending(), 0);
    }

    #[test]
    fn throttled_logs_are_dropped_and_counted() {
        let mut out = Outbound::new();
        assert!(out.log(Time(0.0), "a", None));
        assert!(!out.log(Time(0.1), "b", None));
        assert_eq!(out.pending(), 1);
        assert_eq!(out.dropped_logs(), 1);
    }

    #[test]
    fn pin_clicks_bypass_the_throttle() {
        let mut out = Outbound::new();
        out.log(Time(0.0), "a", None);
        assert!(out.pin_click(marker()));
        assert!(out.pin_click(marker()));
        assert_eq!(out.pending(), 3);
    }
}
