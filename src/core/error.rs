//! Error types for the AX.25 session.

use thiserror::Error;

use crate::session::LinkState;

/// Errors that can occur when building or parsing an [`Address`](crate::frame::Address).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// Callsign is empty, too long or contains non-alphanumeric characters.
    #[error("invalid callsign: {0:?}")]
    InvalidCallsign(String),

    /// SSID outside 0..=15.
    #[error("invalid ssid: {0}")]
    InvalidSsid(String),
}

/// Errors in session configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Send window does not fit the sequence modulus.
    #[error("max_frames must be in 1..={max}, got {actual}")]
    WindowOutOfRange {
        /// Largest window allowed by the modulus.
        max: u8,
        /// Configured value.
        actual: u8,
    },

    /// Retry budget of zero.
    #[error("retries must be at least 1")]
    ZeroRetries,

    /// Packet length of zero.
    #[error("packet_length must be at least 1")]
    ZeroPacketLength,

    /// Channel rate of zero.
    #[error("hbaud must be at least 1")]
    ZeroBaud,
}

/// Errors reported by the session state machine.
///
/// None of these are fatal: the session always settles in a state from
/// which [`connect`](crate::session::Session::connect) may be retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Connect called with fewer than two addresses.
    #[error("connect requires destination and source addresses, got {0}")]
    TooFewAddresses(usize),

    /// Connect called with more repeaters than a frame can carry.
    #[error("connect path has {0} addresses, more than a frame can carry")]
    TooManyAddresses(usize),

    /// Connect called while a link is already bound.
    #[error("connect rejected: link is {0}")]
    AlreadyActive(LinkState),

    /// Operation requires a connected link.
    #[error("not connected (link is {0})")]
    NotConnected(LinkState),

    /// No UA after the configured number of SABM(E) attempts.
    #[error("connect failed after {0} attempts")]
    ConnectRetriesExhausted(u32),

    /// No UA/DM after the configured number of DISC attempts.
    #[error("disconnect unacknowledged after {0} attempts")]
    DisconnectRetriesExhausted(u32),

    /// T1 polls went unanswered; the link is being re-established.
    #[error("acknowledgment timeout after {0} polls, reconnecting")]
    AckRetriesExhausted(u32),

    /// Peer signalled a desync (DM or FRMR while connected).
    #[error("link reset by peer ({0})")]
    LinkReset(&'static str),

    /// Session task is gone.
    #[error("session closed")]
    Closed,
}

/// Top-level errors.
#[derive(Debug, Error)]
pub enum Ax25Error {
    /// Address error.
    #[error("address error: {0}")]
    Address(#[from] AddressError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Session error.
    #[error("session error: {0}")]
    Session(#[from] SessionError),
}

/// Result alias for session-level operations.
pub type SessionResult<T> = Result<T, SessionError>;
