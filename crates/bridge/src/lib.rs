pub mod outbound;
pub mod protocol;
pub mod throttle;

pub use outbound::*;
pub use protocol::*;
pub use throttle::*;
