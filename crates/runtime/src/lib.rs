pub mod frame;
pub mod metrics;
pub mod scheduler;

pub use frame::*;
pub use metrics::*;
pub use scheduler::*;
