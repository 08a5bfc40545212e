//! Modular sequence-number arithmetic.

use crate::core::{MODULUS_EXTENDED, MODULUS_STANDARD};

/// Sequence numbering mode, chosen by the connect request variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Modulus {
    /// 3-bit sequence numbers (SABM).
    #[default]
    Standard,
    /// 7-bit sequence numbers (SABME).
    Extended,
}

impl Modulus {
    /// Pick the mode from the extended flag.
    pub fn from_extended(extended: bool) -> Self {
        if extended {
            Modulus::Extended
        } else {
            Modulus::Standard
        }
    }

    /// Number of distinct sequence values.
    pub fn value(self) -> u8 {
        match self {
            Modulus::Standard => MODULUS_STANDARD,
            Modulus::Extended => MODULUS_EXTENDED,
        }
    }

    /// Whether this is modulo-128 operation.
    pub fn is_extended(self) -> bool {
        self == Modulus::Extended
    }

    /// Largest usable send window (modulus - 1).
    pub fn max_window(self) -> u8 {
        self.value() - 1
    }

    /// `seq + 1` modulo this modulus.
    pub fn next(self, seq: u8) -> u8 {
        ((u16::from(seq) + 1) % u16::from(self.value())) as u8
    }

    /// Forward distance from `from` to `to`.
    pub fn distance(self, to: u8, from: u8) -> u8 {
        distance(to, from, self.value())
    }
}

/// Forward distance from reference point `f` to a later point `l` modulo `m`.
///
/// Always in `[0, m)`; zero iff `l == f` (for inputs already reduced mod `m`).
pub fn distance(l: u8, f: u8, m: u8) -> u8 {
    let (l, f, m) = (u16::from(l), u16::from(f), u16::from(m));
    let d = if l < f { l + (m - f) } else { l - f };
    (d % m) as u8
}
