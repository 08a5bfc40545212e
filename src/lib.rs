//! # ax25-session
//!
//! AX.25 connected-mode data-link sessions for packet radio.
//!
//! A session turns an unreliable stream of decoded AX.25 frames into an
//! ordered, acknowledged byte stream between two stations. It provides:
//!
//! - **Link management**: SABM/SABME, UA, DISC, DM with bounded retries
//! - **Sequencing**: modulo-8 and modulo-128 numbering with a sliding window
//! - **Recovery**: REJ go-back-N, T1 polling, delayed acknowledgment (T2)
//! - **Fragmentation**: payloads split into `packet_length` I-frames
//! - **Broker wiring**: frames in and out through a device-scoped event bus
//!
//! ## Feature Flags
//!
//! - `runtime` (default): tokio actor, broker gateway and [`LocalBroker`](runtime::LocalBroker)
//!
//! ## Modules
//!
//! - [`core`]: Constants, error types and the broker interface (always included)
//! - [`frame`]: Addresses and decoded frames (always included)
//! - [`session`]: The clock-injected state machine (always included)
//! - [`runtime`]: Async actor and broker gateway (requires `runtime` feature)
//!
//! ## Example Usage
//!
//! ```rust
//! use std::time::Instant;
//!
//! use ax25_session::prelude::*;
//!
//! let local: Address = "N0CALL-1".parse().unwrap();
//! let remote: Address = "KK7XYZ".parse().unwrap();
//!
//! let mut session = Session::new(SessionConfig::default());
//! let now = Instant::now();
//!
//! // SABM goes out; hand Transmit actions to your modem.
//! let actions = session.connect(vec![remote.clone(), local.clone()], now);
//! assert!(matches!(&actions[0], Action::Transmit(f) if f.kind == FrameType::Sabm));
//!
//! // The peer answers UA.
//! let ua = Frame::new(vec![local, remote], FrameType::Ua).poll_final(true);
//! session.receive(ua, now);
//! assert_eq!(session.link_state(), LinkState::Connected);
//!
//! // Data is fragmented and sent inside the window.
//! let actions = session.send(b"hello", now);
//! assert_eq!(actions.len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Core module (always included)
pub mod core;

// Frame value types
pub mod frame;

// Session state machine
pub mod session;

// Async runtime (feature-gated)
#[cfg(feature = "runtime")]
#[cfg_attr(docsrs, doc(cfg(feature = "runtime")))]
pub mod runtime;

/// Prelude module for convenient imports.
pub mod prelude {
    // Core traits and types
    pub use crate::core::*;

    pub use crate::frame::{Address, Frame, FrameType};

    pub use crate::session::{
        Action, LinkState, SendOptions, Session, SessionConfig, SessionConfigBuilder,
        SessionEvent, SessionStats,
    };

    // Runtime types (when enabled)
    #[cfg(feature = "runtime")]
    pub use crate::runtime::{spawn_session, BrokerGateway, LocalBroker, SessionHandle};
}

// Re-export commonly used items at crate root
pub use crate::core::{Ax25Error, SessionError, SessionResult};
pub use crate::frame::{Address, Frame, FrameType};
pub use crate::session::{LinkState, Session, SessionConfig, SessionEvent};

#[cfg(feature = "runtime")]
pub use crate::runtime::{BrokerGateway, SessionHandle};
