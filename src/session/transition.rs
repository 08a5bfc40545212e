//! Link-level transition table.
//!
//! Maps `(link state, modulus, frame type)` to the reaction the session takes
//! before any sequencing logic runs. Keeping this pure makes the table easy
//! to audit against AX.25 and to test without a session.

use crate::frame::FrameType;

use super::sequence::Modulus;
use super::state::LinkState;

/// What the session does with an inbound frame at the link level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    /// Accept an incoming connect request: bind, reply UA, go Connected.
    Accept,
    /// Peer re-sent SABM(E) on a live link: reset sequencing, reply UA.
    ResetLink,
    /// Reply UA without changing state.
    AnswerUa,
    /// Peer acknowledged our SABM(E).
    Established,
    /// Link released: settle in Disconnected.
    Released,
    /// Peer sent DISC on a live link: reply UA, go Disconnected.
    AcceptDisconnect,
    /// Restart link setup.
    Reconnect {
        /// Fall back to modulo-8 first.
        downgrade: bool,
        /// Frame that triggered it.
        cause: &'static str,
    },
    /// Reply DM.
    RefuseDm,
    /// Reply FRMR to an unsupported XID.
    RejectXid,
    /// Echo a TEST command.
    EchoTest,
    /// Hand to the sequencing logic (I and S frames).
    Sequenced,
    /// Drop without reply.
    Ignore,
}

/// Look up the reaction for `kind` arriving in `link`.
pub fn react(link: LinkState, modulus: Modulus, kind: FrameType) -> Reaction {
    use FrameType::*;
    use LinkState::*;

    match (kind, link) {
        // Connectionless traffic is delivered before the table is consulted.
        (Ui, _) => Reaction::Ignore,

        (Sabm | Sabme, Disconnected) => Reaction::Accept,
        (Sabm | Sabme, Connected) => Reaction::ResetLink,
        (Sabm | Sabme, Connecting) => Reaction::AnswerUa,
        (Sabm | Sabme, Disconnecting) => Reaction::RefuseDm,

        (Disc, Disconnected) => Reaction::AnswerUa,
        (Disc, Connected) => Reaction::AcceptDisconnect,
        (Disc, _) => Reaction::RefuseDm,

        (Ua, Connecting) => Reaction::Established,
        (Ua, Disconnecting) => Reaction::Released,
        (Ua, Connected) => Reaction::Ignore,
        (Ua, Disconnected) => Reaction::RefuseDm,

        (Dm, Connected) => Reaction::Reconnect {
            downgrade: false,
            cause: "DM",
        },
        (Dm, Connecting) => Reaction::Reconnect {
            downgrade: true,
            cause: "DM",
        },
        (Dm, Disconnecting) => Reaction::Released,
        // Never answer DM with DM.
        (Dm, Disconnected) => Reaction::Ignore,

        (Frmr, Connecting) if modulus.is_extended() => Reaction::Reconnect {
            downgrade: true,
            cause: "FRMR",
        },
        (Frmr, Connected) => Reaction::Reconnect {
            downgrade: false,
            cause: "FRMR",
        },
        (Frmr, _) => Reaction::RefuseDm,

        (Xid, Disconnected) | (Test, Disconnected) => Reaction::RefuseDm,
        (Xid, _) => Reaction::RejectXid,
        (Test, _) => Reaction::EchoTest,

        (I | Rr | Rnr | Rej | Srej, Connected) => Reaction::Sequenced,
        (I | Rr | Rnr | Rej | Srej, Disconnected) => Reaction::RefuseDm,
        (I | Rr | Rnr | Rej | Srej, Connecting | Disconnecting) => Reaction::Ignore,
    }
}
