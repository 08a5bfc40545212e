//! Session state owned by the state machine.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use crate::core::SessionError;
use crate::frame::{Address, Frame};

use super::sequence::Modulus;

/// Link state as seen by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkState {
    /// No peer bound. Initial and rest state.
    Disconnected,
    /// SABM(E) sent, waiting for UA.
    Connecting,
    /// Information transfer.
    Connected,
    /// DISC sent, waiting for UA or DM.
    Disconnecting,
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LinkState::Disconnected => "disconnected",
            LinkState::Connecting => "connecting",
            LinkState::Connected => "connected",
            LinkState::Disconnecting => "disconnecting",
        };
        f.write_str(name)
    }
}

/// Phase of a bound link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for UA to our SABM(E).
    Connecting,
    /// Link up.
    Connected,
    /// Waiting for UA to our DISC.
    Disconnecting,
}

/// The peer a session is talking to.
///
/// `Unbound` is exactly the disconnected state; every other link state
/// carries the address path it uses.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PeerBinding {
    /// No peer.
    #[default]
    Unbound,
    /// Bound to a peer.
    Bound {
        /// Outbound path: peer, local station, then repeaters.
        addresses: Vec<Address>,
        /// Link phase.
        phase: Phase,
    },
}

impl PeerBinding {
    /// Link state implied by this binding.
    pub fn link_state(&self) -> LinkState {
        match self {
            PeerBinding::Unbound => LinkState::Disconnected,
            PeerBinding::Bound { phase, .. } => match phase {
                Phase::Connecting => LinkState::Connecting,
                Phase::Connected => LinkState::Connected,
                Phase::Disconnecting => LinkState::Disconnecting,
            },
        }
    }

    /// Outbound address path, if bound.
    pub fn addresses(&self) -> Option<&[Address]> {
        match self {
            PeerBinding::Unbound => None,
            PeerBinding::Bound { addresses, .. } => Some(addresses),
        }
    }

    /// The remote station, if bound.
    pub fn peer(&self) -> Option<&Address> {
        self.addresses().and_then(<[Address]>::first)
    }
}

/// Mutable protocol state of one session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Peer binding and link phase.
    pub binding: PeerBinding,
    /// Active sequence modulus.
    pub modulus: Modulus,
    /// V(R): next in-sequence N(S) expected from the peer.
    pub receive_seq: u8,
    /// V(S): N(S) for the next new I-frame.
    pub send_seq: u8,
    /// Last N(R) received from the peer.
    pub remote_receive_seq: u8,
    /// Peer sent RNR.
    pub remote_busy: bool,
    /// A REJ is outstanding for the current receive gap.
    pub sent_rej: bool,
    /// Resume point requested by a peer REJ.
    pub got_rej: Option<u8>,
    /// An in-sequence I-frame has not been acknowledged yet.
    pub ack_pending: bool,
    /// I-frames queued or awaiting acknowledgment, in transmission order.
    pub send_buffer: VecDeque<Frame>,
    /// Out-of-order I-frames keyed by N(S).
    pub receive_buffer: BTreeMap<u8, Frame>,
}

impl SessionState {
    /// Create an unbound state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current link state.
    pub fn link_state(&self) -> LinkState {
        self.binding.link_state()
    }

    /// Zero the sequence variables and drop out-of-order frames.
    pub fn reset_sequence(&mut self) {
        self.receive_seq = 0;
        self.send_seq = 0;
        self.remote_receive_seq = 0;
        self.remote_busy = false;
        self.sent_rej = false;
        self.got_rej = None;
        self.ack_pending = false;
        self.receive_buffer.clear();
    }

    /// Drop the peer and everything scoped to the link.
    pub fn unbind(&mut self) {
        self.binding = PeerBinding::Unbound;
        self.reset_sequence();
        self.send_buffer.clear();
    }

    /// Restart numbering of the queue from zero for a fresh connection.
    pub fn renumber(&mut self) {
        let m = usize::from(self.modulus.value());
        for (index, frame) in self.send_buffer.iter_mut().enumerate() {
            frame.ns = (index % m) as u8;
            frame.nr = 0;
            frame.sent = false;
        }
    }

    /// Number of sent, unacknowledged I-frames.
    pub fn outstanding(&self) -> usize {
        self.send_buffer.iter().filter(|f| f.sent).count()
    }

    /// Number of queued I-frames not yet transmitted.
    pub fn unsent(&self) -> usize {
        self.send_buffer.iter().filter(|f| !f.sent).count()
    }
}

/// Counters for monitoring a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Frames handed to the transport.
    pub frames_sent: u64,
    /// Frames received from the transport.
    pub frames_received: u64,
    /// I-frames sent again.
    pub retransmissions: u64,
    /// REJ frames sent.
    pub rejects_sent: u64,
    /// REJ/SREJ frames received.
    pub rejects_received: u64,
    /// Timer expirations.
    pub timeouts: u64,
}

/// Notifications for the session's owner.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Link state changed.
    StateChanged {
        /// Previous state.
        from: LinkState,
        /// New state.
        to: LinkState,
    },
    /// In-sequence I-frame payload.
    DataReceived(Vec<u8>),
    /// Connectionless UI payload.
    UiDataReceived {
        /// Sending station.
        source: Address,
        /// Payload.
        data: Vec<u8>,
    },
    /// Diagnostic.
    Error(SessionError),
}

/// Side effects produced by one state-machine step.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Hand a frame to the transport.
    Transmit(Frame),
    /// Notify the owner.
    Emit(SessionEvent),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queued(n: usize) -> SessionState {
        let addresses = vec!["PEER".parse().unwrap(), "ME".parse().unwrap()];
        let mut state = SessionState::new();
        for i in 0..n {
            let mut frame = Frame::information(addresses.clone(), vec![i as u8]);
            frame.ns = 5;
            frame.nr = 3;
            frame.sent = i % 2 == 0;
            state.send_buffer.push_back(frame);
        }
        state
    }

    #[test]
    fn test_renumber_modulo_8() {
        let mut state = queued(10);
        state.renumber();
        for (i, frame) in state.send_buffer.iter().enumerate() {
            assert_eq!(frame.ns, (i % 8) as u8);
            assert_eq!(frame.nr, 0);
            assert!(!frame.sent);
        }
        assert_eq!(state.outstanding(), 0);
        assert_eq!(state.unsent(), 10);
    }

    #[test]
    fn test_renumber_modulo_128() {
        let mut state = queued(10);
        state.modulus = Modulus::Extended;
        state.renumber();
        assert_eq!(state.send_buffer[9].ns, 9);
    }

    #[test]
    fn test_unbind_clears_link_scope() {
        let mut state = queued(3);
        state.binding = PeerBinding::Bound {
            addresses: vec!["PEER".parse().unwrap(), "ME".parse().unwrap()],
            phase: Phase::Connected,
        };
        state.receive_seq = 4;
        state
            .receive_buffer
            .insert(6, state.send_buffer[0].clone());
        assert_eq!(state.link_state(), LinkState::Connected);

        state.unbind();
        assert_eq!(state.link_state(), LinkState::Disconnected);
        assert!(state.binding.peer().is_none());
        assert!(state.send_buffer.is_empty());
        assert!(state.receive_buffer.is_empty());
        assert_eq!(state.receive_seq, 0);
    }
}
