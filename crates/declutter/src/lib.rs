pub mod engine;
pub mod partition;
pub mod rings;

pub use engine::*;
pub use partition::*;
pub use rings::*;
