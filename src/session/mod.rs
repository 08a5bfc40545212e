//! AX.25 connected-mode session.
//!
//! This module holds the data-link state machine and the pieces it is made
//! of:
//!
//! - **Sequencing**: [`Modulus`] and [`distance`] for modulo-8/128 arithmetic
//! - **Timers**: [`TimerSet`] deadlines with attempt counters, and
//!   [`TimeoutPolicy`] deriving durations from the channel rate
//! - **Transitions**: [`react`] maps an inbound frame to a link-level [`Reaction`]
//! - **State machine**: [`Session`] ties them together and yields [`Action`]s
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │     Application / runtime actor          │
//! ├──────────────────────────────────────────┤
//! │     Session (this module)                │  ← clock-injected, no I/O
//! │   binding, V(S)/V(R), window, timers     │
//! ├──────────────────────────────────────────┤
//! │     Broker (TransmitFrame/FrameReceived) │
//! └──────────────────────────────────────────┘
//! ```

mod config;
mod machine;
mod sequence;
mod state;
mod timers;
mod transition;

pub use config::{SessionConfig, SessionConfigBuilder};
pub use machine::{SendOptions, Session};
pub use sequence::{distance, Modulus};
pub use state::{
    Action, LinkState, PeerBinding, Phase, SessionEvent, SessionState, SessionStats,
};
pub use timers::{TimeoutPolicy, TimerKind, TimerSet};
pub use transition::{react, Reaction};
