//! Station addresses (callsign + SSID).

use std::fmt;
use std::str::FromStr;

use crate::core::{AddressError, MAX_CALLSIGN_LEN, MAX_SSID};

/// An amateur-radio station address.
///
/// Callsigns are stored upper-case. Two addresses are equal iff callsign and
/// SSID both match. The canonical text form is `CALL-SSID`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    callsign: String,
    ssid: u8,
}

impl Address {
    /// Create an address, validating callsign and SSID.
    pub fn new(callsign: &str, ssid: u8) -> Result<Self, AddressError> {
        if ssid > MAX_SSID {
            return Err(AddressError::InvalidSsid(ssid.to_string()));
        }
        let valid = !callsign.is_empty()
            && callsign.len() <= MAX_CALLSIGN_LEN
            && callsign.chars().all(|c| c.is_ascii_alphanumeric());
        if !valid {
            return Err(AddressError::InvalidCallsign(callsign.to_string()));
        }
        Ok(Self {
            callsign: callsign.to_ascii_uppercase(),
            ssid,
        })
    }

    /// Get the callsign.
    pub fn callsign(&self) -> &str {
        &self.callsign
    }

    /// Get the secondary station identifier.
    pub fn ssid(&self) -> u8 {
        self.ssid
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.callsign, self.ssid)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    /// Parse `CALL` or `CALL-SSID`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once('-') {
            Some((call, ssid)) => {
                let ssid: u8 = ssid
                    .parse()
                    .map_err(|_| AddressError::InvalidSsid(ssid.to_string()))?;
                Self::new(call, ssid)
            }
            None => Self::new(s, 0),
        }
    }
}

impl TryFrom<&str> for Address {
    type Error = AddressError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}
