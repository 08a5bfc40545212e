//! Protocol constants and session defaults.
//!
//! Sequence moduli and field limits are fixed by AX.25 2.2 and MUST NOT be
//! changed. The `DEFAULT_*` values are the starting point for
//! [`SessionConfig`](crate::session::SessionConfig).

// =============================================================================
// ADDRESSING
// =============================================================================

/// Minimum number of addresses in a frame (destination + source).
pub const MIN_ADDRESSES: usize = 2;

/// Maximum number of repeater addresses a frame may carry.
pub const MAX_REPEATERS: usize = 8;

/// Maximum callsign length in characters.
pub const MAX_CALLSIGN_LEN: usize = 6;

/// Highest valid secondary station identifier.
pub const MAX_SSID: u8 = 15;

// =============================================================================
// SEQUENCE NUMBERS
// =============================================================================

/// Modulus for standard (SABM) sequencing.
pub const MODULUS_STANDARD: u8 = 8;

/// Modulus for extended (SABME) sequencing.
pub const MODULUS_EXTENDED: u8 = 128;

// =============================================================================
// SESSION DEFAULTS
// =============================================================================

/// Default send window (k).
pub const DEFAULT_MAX_FRAMES: u8 = 4;

/// Default retry budget (N2) for connect, disconnect and T1.
pub const DEFAULT_RETRIES: u32 = 5;

/// Default maximum I-field length (N1) in bytes.
pub const DEFAULT_PACKET_LENGTH: usize = 256;

/// Default channel rate in bits per second.
pub const DEFAULT_HBAUD: u32 = 1200;

// =============================================================================
// TIMING
// =============================================================================

/// Fixed per-frame overhead in bits used by the transmission time estimate
/// (flags, addresses, control, FCS and TX delay allowance).
pub const FRAME_OVERHEAD_BITS: u64 = 600;

/// Lower bound on the packet time estimate, in seconds.
pub const MIN_PACKET_TIME_SECS: u64 = 1;

/// Channel occupancy multiplier applied per repeater hop.
pub const HOP_FACTOR: u64 = 4;

/// T2 is this many packet times.
pub const T2_PACKET_MULTIPLIER: u32 = 2;

/// T3 is this many general timeouts.
pub const T3_TIMEOUT_MULTIPLIER: u32 = 7;

// =============================================================================
// BROKER EVENT NAMES
// =============================================================================

/// Event carrying a decoded inbound frame from the radio.
pub const EVENT_FRAME_RECEIVED: &str = "FrameReceived";

/// Event carrying an outbound frame for the radio.
pub const EVENT_TRANSMIT_FRAME: &str = "TransmitFrame";

/// Diagnostic text event.
pub const EVENT_LOG: &str = "Log";

/// Ambient flag: when set, the radio must not transmit.
pub const KEY_TRANSMIT_INHIBIT: &str = "TransmitInhibit";
