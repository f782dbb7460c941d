/// Single-slot pass scheduler.
///
/// Projection updates arrive in bursts (pan, zoom, bounds change often fire
/// together), and every update wants a declutter pass. The scheduler
/// collapses any number of `request_pass` calls between two frame boundaries
/// into one pending slot; the owner calls `take_pending` exactly once per
/// frame and runs the pass only when it returns `true`, so the pass always
/// sees the latest state of all overlays.
#[derive(Debug, Default)]
pub struct LayoutScheduler {
    pending: bool,
}

impl LayoutScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a pass pending. No-op when one is already pending.
    pub fn request_pass(&mut self) {
        self.pending = true;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Clears the pending slot at a frame boundary.
    ///
    /// Returns `true` exactly once per burst of requests.
    pub fn take_pending(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}
