//! Decoded AX.25 frames.
//!
//! The byte layout on the air belongs to the frame codec, which lives outside
//! this crate. Everything here works on already-decoded values.

use std::fmt;
use std::time::Instant;

use super::address::Address;
use crate::core::MIN_ADDRESSES;

/// AX.25 frame type (control field class).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameType {
    /// Set Asynchronous Balanced Mode (modulo-8 connect request).
    Sabm,
    /// Set Asynchronous Balanced Mode Extended (modulo-128 connect request).
    Sabme,
    /// Disconnect.
    Disc,
    /// Unnumbered Acknowledge.
    Ua,
    /// Disconnected Mode.
    Dm,
    /// Unnumbered Information (connectionless).
    Ui,
    /// Exchange Identification.
    Xid,
    /// Test.
    Test,
    /// Frame Reject.
    Frmr,
    /// Receive Ready.
    Rr,
    /// Receive Not Ready.
    Rnr,
    /// Reject.
    Rej,
    /// Selective Reject.
    Srej,
    /// Information.
    I,
}

impl FrameType {
    /// Information frame.
    pub fn is_information(self) -> bool {
        self == FrameType::I
    }

    /// Supervisory frame (RR, RNR, REJ, SREJ).
    pub fn is_supervisory(self) -> bool {
        matches!(
            self,
            FrameType::Rr | FrameType::Rnr | FrameType::Rej | FrameType::Srej
        )
    }

    /// Unnumbered frame.
    pub fn is_unnumbered(self) -> bool {
        !self.is_information() && !self.is_supervisory()
    }

    /// Whether the control field carries N(R).
    pub fn carries_nr(self) -> bool {
        self.is_information() || self.is_supervisory()
    }

    /// Whether this is a connect request (SABM or SABME).
    pub fn is_connect_request(self) -> bool {
        matches!(self, FrameType::Sabm | FrameType::Sabme)
    }
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FrameType::Sabm => "SABM",
            FrameType::Sabme => "SABME",
            FrameType::Disc => "DISC",
            FrameType::Ua => "UA",
            FrameType::Dm => "DM",
            FrameType::Ui => "UI",
            FrameType::Xid => "XID",
            FrameType::Test => "TEST",
            FrameType::Frmr => "FRMR",
            FrameType::Rr => "RR",
            FrameType::Rnr => "RNR",
            FrameType::Rej => "REJ",
            FrameType::Srej => "SREJ",
            FrameType::I => "I",
        };
        f.write_str(name)
    }
}

/// A decoded AX.25 frame.
///
/// `addresses[0]` is the destination, `addresses[1]` the source, and any
/// further entries are repeaters in path order.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Destination, source, then repeaters.
    pub addresses: Vec<Address>,
    /// Frame type.
    pub kind: FrameType,
    /// Send sequence number N(S).
    pub ns: u8,
    /// Receive sequence number N(R).
    pub nr: u8,
    /// Poll (command) or final (response) bit.
    pub poll_final: bool,
    /// Command (true) or response (false).
    pub command: bool,
    /// Information field.
    pub data: Option<Vec<u8>>,
    /// Transmitted at least once by the session.
    pub sent: bool,
    /// Caller-supplied tag, used only to prune the send queue.
    pub tag: Option<String>,
    /// Caller-supplied deadline, used only to prune the send queue.
    pub deadline: Option<Instant>,
}

impl Frame {
    /// Create a frame of `kind` with zeroed control fields.
    pub fn new(addresses: Vec<Address>, kind: FrameType) -> Self {
        Self {
            addresses,
            kind,
            ns: 0,
            nr: 0,
            poll_final: false,
            command: false,
            data: None,
            sent: false,
            tag: None,
            deadline: None,
        }
    }

    /// Create an I-frame carrying `data`.
    pub fn information(addresses: Vec<Address>, data: Vec<u8>) -> Self {
        Self::new(addresses, FrameType::I)
            .command(true)
            .with_data(data)
    }

    /// Set N(S).
    pub fn with_ns(mut self, ns: u8) -> Self {
        self.ns = ns;
        self
    }

    /// Set N(R).
    pub fn with_nr(mut self, nr: u8) -> Self {
        self.nr = nr;
        self
    }

    /// Set the poll/final bit.
    pub fn poll_final(mut self, pf: bool) -> Self {
        self.poll_final = pf;
        self
    }

    /// Mark as command (`true`) or response (`false`).
    pub fn command(mut self, command: bool) -> Self {
        self.command = command;
        self
    }

    /// Attach an information field.
    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = Some(data);
        self
    }

    /// Attach a pruning tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Attach a pruning deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Destination address.
    pub fn destination(&self) -> Option<&Address> {
        self.addresses.first()
    }

    /// Source address.
    pub fn source(&self) -> Option<&Address> {
        self.addresses.get(1)
    }

    /// Repeater path.
    pub fn repeaters(&self) -> &[Address] {
        self.addresses.get(MIN_ADDRESSES..).unwrap_or(&[])
    }

    /// At least destination and source are present.
    pub fn is_well_formed(&self) -> bool {
        self.addresses.len() >= MIN_ADDRESSES
    }

    /// Address list for answering this frame: the source becomes the
    /// destination and the repeater path is reversed.
    pub fn reply_addresses(&self) -> Option<Vec<Address>> {
        let (destination, source) = (self.destination()?, self.source()?);
        let mut addresses = Vec::with_capacity(self.addresses.len());
        addresses.push(source.clone());
        addresses.push(destination.clone());
        addresses.extend(self.repeaters().iter().rev().cloned());
        Some(addresses)
    }

    /// Information field length in bytes.
    pub fn data_len(&self) -> usize {
        self.data.as_ref().map_or(0, Vec::len)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.source(), self.destination()) {
            (Some(src), Some(dst)) => write!(f, "{src}>{dst}")?,
            _ => f.write_str("?>?")?,
        }
        for repeater in self.repeaters() {
            write!(f, ",{repeater}")?;
        }
        write!(f, " {}", self.kind)?;
        if self.kind.is_information() {
            write!(f, " ns={}", self.ns)?;
        }
        if self.kind.carries_nr() {
            write!(f, " nr={}", self.nr)?;
        }
        let pf = match (self.poll_final, self.command) {
            (false, _) => "",
            (true, true) => " P",
            (true, false) => " F",
        };
        write!(f, "{pf} len={}", self.data_len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    #[test]
    fn test_frame_type_classes() {
        assert!(FrameType::I.is_information());
        assert!(FrameType::Rej.is_supervisory());
        assert!(FrameType::Ua.is_unnumbered());
        assert!(FrameType::Srej.carries_nr());
        assert!(!FrameType::Dm.carries_nr());
        assert!(FrameType::Sabme.is_connect_request());
    }

    #[test]
    fn test_reply_addresses_reverse_path() {
        let frame = Frame::new(
            vec![addr("DEST"), addr("SRC"), addr("RPT1"), addr("RPT2")],
            FrameType::Sabm,
        );
        assert_eq!(frame.repeaters().len(), 2);
        let reply = frame.reply_addresses().unwrap();
        assert_eq!(
            reply,
            vec![addr("SRC"), addr("DEST"), addr("RPT2"), addr("RPT1")]
        );
    }

    #[test]
    fn test_malformed_frame() {
        let frame = Frame::new(vec![addr("DEST")], FrameType::Ui);
        assert!(!frame.is_well_formed());
        assert!(frame.source().is_none());
        assert!(frame.reply_addresses().is_none());
        assert!(frame.repeaters().is_empty());
    }

    #[test]
    fn test_display() {
        let frame = Frame::information(vec![addr("DEST-1"), addr("SRC-2")], b"hi".to_vec())
            .with_ns(3)
            .with_nr(5)
            .poll_final(true);
        assert_eq!(frame.to_string(), "SRC-2>DEST-1 I ns=3 nr=5 P len=2");
    }
}
