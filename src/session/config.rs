//! Session configuration.

use crate::core::{
    ConfigError, DEFAULT_HBAUD, DEFAULT_MAX_FRAMES, DEFAULT_PACKET_LENGTH, DEFAULT_RETRIES,
};
use crate::frame::Address;

use super::sequence::Modulus;
use super::timers::TimeoutPolicy;

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Send window: maximum unacknowledged I-frames in flight (k).
    pub max_frames: u8,

    /// Retry budget for connect, disconnect and T1 polls (N2).
    pub retries: u32,

    /// Maximum I-field length; larger payloads are fragmented (N1).
    pub packet_length: usize,

    /// Channel rate in bits per second, used for timeout derivation.
    pub hbaud: u32,

    /// Request modulo-128 sequencing (SABME) on outgoing connects.
    pub extended: bool,

    /// Local station. When set, inbound frames addressed elsewhere are ignored.
    pub station: Option<Address>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_frames: DEFAULT_MAX_FRAMES,
            retries: DEFAULT_RETRIES,
            packet_length: DEFAULT_PACKET_LENGTH,
            hbaud: DEFAULT_HBAUD,
            extended: false,
            station: None,
        }
    }
}

impl SessionConfig {
    /// Check the configuration for values the session cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let max = Modulus::from_extended(self.extended).max_window();
        if self.max_frames == 0 || self.max_frames > max {
            return Err(ConfigError::WindowOutOfRange {
                max,
                actual: self.max_frames,
            });
        }
        if self.retries == 0 {
            return Err(ConfigError::ZeroRetries);
        }
        if self.packet_length == 0 {
            return Err(ConfigError::ZeroPacketLength);
        }
        if self.hbaud == 0 {
            return Err(ConfigError::ZeroBaud);
        }
        Ok(())
    }

    /// Timeout derivation for these channel parameters.
    pub fn timeouts(&self) -> TimeoutPolicy {
        TimeoutPolicy {
            packet_length: self.packet_length,
            hbaud: self.hbaud,
        }
    }
}

/// Builder for [`SessionConfig`].
#[derive(Debug, Default)]
pub struct SessionConfigBuilder {
    config: SessionConfig,
}

impl SessionConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the send window.
    pub fn max_frames(mut self, k: u8) -> Self {
        self.config.max_frames = k;
        self
    }

    /// Set the retry budget.
    pub fn retries(mut self, n: u32) -> Self {
        self.config.retries = n;
        self
    }

    /// Set the maximum I-field length.
    pub fn packet_length(mut self, len: usize) -> Self {
        self.config.packet_length = len;
        self
    }

    /// Set the channel rate.
    pub fn hbaud(mut self, baud: u32) -> Self {
        self.config.hbaud = baud;
        self
    }

    /// Request modulo-128 operation.
    pub fn extended(mut self, enabled: bool) -> Self {
        self.config.extended = enabled;
        self
    }

    /// Set the local station filter.
    pub fn station(mut self, station: Address) -> Self {
        self.config.station = Some(station);
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<SessionConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SessionConfig::default();
        assert_eq!(config.max_frames, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_window_bounds_follow_modulus() {
        let err = SessionConfigBuilder::new().max_frames(8).build().unwrap_err();
        assert_eq!(err, ConfigError::WindowOutOfRange { max: 7, actual: 8 });

        let config = SessionConfigBuilder::new()
            .extended(true)
            .max_frames(32)
            .build()
            .unwrap();
        assert_eq!(config.max_frames, 32);
    }

    #[test]
    fn test_zero_values_rejected() {
        assert_eq!(
            SessionConfigBuilder::new().retries(0).build(),
            Err(ConfigError::ZeroRetries)
        );
        assert_eq!(
            SessionConfigBuilder::new().packet_length(0).build(),
            Err(ConfigError::ZeroPacketLength)
        );
        assert_eq!(
            SessionConfigBuilder::new().hbaud(0).build(),
            Err(ConfigError::ZeroBaud)
        );
        assert!(matches!(
            SessionConfigBuilder::new().max_frames(0).build(),
            Err(ConfigError::WindowOutOfRange { .. })
        ));
    }
}
