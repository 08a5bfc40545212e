//! Address and frame value types.
//!
//! These are the decoded forms exchanged with the frame codec: the session
//! consumes inbound [`Frame`]s and produces outbound ones, but never touches
//! the on-air byte layout.

mod address;
#[allow(clippy::module_inception)]
mod frame;

pub use address::Address;
pub use frame::{Frame, FrameType};
