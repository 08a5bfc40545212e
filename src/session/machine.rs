//! The AX.25 session state machine.
//!
//! [`Session`] is a synchronous, clock-injected state machine. Every entry
//! point takes the current [`Instant`], mutates the session, and returns the
//! [`Action`]s to carry out: frames to transmit and events to publish. It
//! never sleeps and never touches I/O, so the caller decides how work is
//! serialized (see [`crate::runtime`]) and tests can drive it frame by frame.
//!
//! # Lifecycle
//!
//! ```text
//!   connect()        UA            disconnect()       UA / DM
//! Disconnected ──► Connecting ──► Connected ──► Disconnecting ──► Disconnected
//!       ▲   SABM(E) in  │  retries      │ DISC in            │ retries
//!       └───────────────┴───────────────┴────────────────────┘
//! ```

use std::time::{Duration, Instant};

use tracing::{debug, info, trace, warn};

use crate::core::{Ax25Error, SessionError, MAX_REPEATERS, MIN_ADDRESSES};
use crate::frame::{Address, Frame, FrameType};

use super::config::SessionConfig;
use super::sequence::{distance, Modulus};
use super::state::{
    Action, LinkState, PeerBinding, Phase, SessionEvent, SessionState, SessionStats,
};
use super::timers::{TimerKind, TimerSet};
use super::transition::{react, Reaction};

/// Per-send options for queued data.
#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    /// Tag for [`Session::cancel_tagged`].
    pub tag: Option<String>,
    /// Deadline for [`Session::prune_expired`].
    pub deadline: Option<Instant>,
}

/// One AX.25 connected-mode session.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    state: SessionState,
    timers: TimerSet,
    stats: SessionStats,
    actions: Vec<Action>,
}

impl Session {
    /// Create a disconnected session.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            state: SessionState::new(),
            timers: TimerSet::new(),
            stats: SessionStats::default(),
            actions: Vec::new(),
        }
    }

    /// Create a disconnected session after validating `config`.
    ///
    /// Use this for configurations built by hand rather than through
    /// [`SessionConfigBuilder`](super::SessionConfigBuilder).
    pub fn try_new(config: SessionConfig) -> Result<Self, Ax25Error> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Get the configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Get the protocol state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Get the timers.
    pub fn timers(&self) -> &TimerSet {
        &self.timers
    }

    /// Get the counters.
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Current link state.
    pub fn link_state(&self) -> LinkState {
        self.state.link_state()
    }

    /// Earliest armed timer deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    // =========================================================================
    // APPLICATION CALLS
    // =========================================================================

    /// Open a link over `addresses` (peer, local station, repeaters).
    pub fn connect(&mut self, addresses: Vec<Address>, now: Instant) -> Vec<Action> {
        let link = self.link_state();
        if addresses.len() < MIN_ADDRESSES {
            self.error(SessionError::TooFewAddresses(addresses.len()));
        } else if addresses.len() > MIN_ADDRESSES + MAX_REPEATERS {
            self.error(SessionError::TooManyAddresses(addresses.len()));
        } else if link != LinkState::Disconnected {
            self.error(SessionError::AlreadyActive(link));
        } else {
            self.state.send_buffer.clear();
            self.state.modulus = Modulus::from_extended(self.config.extended);
            self.timers.cancel_all();
            self.bind(addresses, Phase::Connecting);
            self.establish(now);
        }
        self.finish()
    }

    /// Release the link.
    ///
    /// Outside Connected/Disconnecting this forces Disconnected and reports
    /// [`SessionError::NotConnected`] without transmitting.
    pub fn disconnect(&mut self, now: Instant) -> Vec<Action> {
        match self.link_state() {
            LinkState::Connected | LinkState::Disconnecting => self.release(now),
            link => {
                self.go_disconnected();
                self.error(SessionError::NotConnected(link));
            }
        }
        self.finish()
    }

    /// Queue `payload` for reliable delivery.
    pub fn send(&mut self, payload: &[u8], now: Instant) -> Vec<Action> {
        self.send_with(payload, SendOptions::default(), now)
    }

    /// Queue `payload`, fragmented into `packet_length` I-frames, with
    /// pruning options.
    pub fn send_with(&mut self, payload: &[u8], options: SendOptions, now: Instant) -> Vec<Action> {
        let link = self.link_state();
        let bound = matches!(link, LinkState::Connecting | LinkState::Connected);
        let Some(addresses) = self
            .state
            .binding
            .addresses()
            .filter(|_| bound)
            .map(<[Address]>::to_vec)
        else {
            self.error(SessionError::NotConnected(link));
            return self.finish();
        };
        if payload.is_empty() {
            return self.finish();
        }

        for chunk in payload.chunks(self.config.packet_length) {
            let mut frame = Frame::information(addresses.clone(), chunk.to_vec());
            if let Some(tag) = &options.tag {
                frame = frame.with_tag(tag.as_str());
            }
            if let Some(deadline) = options.deadline {
                frame = frame.with_deadline(deadline);
            }
            self.state.send_buffer.push_back(frame);
        }
        debug!(
            bytes = payload.len(),
            queued = self.state.send_buffer.len(),
            "data queued"
        );

        if link == LinkState::Connected && self.can_send_new() {
            self.drain(false, now);
        }
        self.finish()
    }

    /// Drop queued, untransmitted frames whose deadline has passed.
    pub fn prune_expired(&mut self, now: Instant) -> usize {
        let before = self.state.send_buffer.len();
        self.state
            .send_buffer
            .retain(|f| f.sent || f.deadline.is_none_or(|d| d > now));
        before - self.state.send_buffer.len()
    }

    /// Drop queued, untransmitted frames carrying `tag`.
    pub fn cancel_tagged(&mut self, tag: &str) -> usize {
        let before = self.state.send_buffer.len();
        self.state
            .send_buffer
            .retain(|f| f.sent || f.tag.as_deref() != Some(tag));
        before - self.state.send_buffer.len()
    }

    // =========================================================================
    // INBOUND FRAMES
    // =========================================================================

    /// Process a decoded inbound frame.
    pub fn receive(&mut self, frame: Frame, now: Instant) -> Vec<Action> {
        self.stats.frames_received += 1;
        if !frame.is_well_formed() {
            trace!("dropping frame without source address");
            return self.finish();
        }
        if let Some(station) = &self.config.station
            && frame.destination() != Some(station)
        {
            trace!(frame = %frame, "not addressed to us");
            return self.finish();
        }
        trace!(frame = %frame, "rx");

        if frame.kind == FrameType::Ui {
            if let (Some(source), Some(data)) = (frame.source(), &frame.data) {
                self.emit(SessionEvent::UiDataReceived {
                    source: source.clone(),
                    data: data.clone(),
                });
            }
            return self.finish();
        }
        if let Some(peer) = self.state.binding.peer()
            && frame.source() != Some(peer)
        {
            debug!(frame = %frame, peer = %peer, "frame from foreign station ignored");
            return self.finish();
        }

        let reaction = react(self.link_state(), self.state.modulus, frame.kind);
        self.apply(reaction, &frame, now);
        self.finish()
    }

    fn apply(&mut self, reaction: Reaction, frame: &Frame, now: Instant) {
        match reaction {
            Reaction::Accept => self.accept(frame),
            Reaction::ResetLink => {
                info!(peer = ?self.state.binding.peer(), "link reset by peer SABM");
                self.state.modulus = Modulus::from_extended(frame.kind == FrameType::Sabme);
                self.state.reset_sequence();
                self.state.renumber();
                self.timers.cancel(TimerKind::T1);
                self.timers.cancel(TimerKind::T2);
                self.reply(frame, FrameType::Ua, frame.poll_final && frame.command);
                if self.can_send_new() {
                    self.drain(false, now);
                }
            }
            Reaction::AnswerUa => self.reply(frame, FrameType::Ua, frame.poll_final),
            Reaction::Established => {
                self.timers.cancel(TimerKind::Connect);
                self.timers.cancel(TimerKind::T2);
                let t3 = self.t3_timeout();
                self.timers.arm(TimerKind::T3, t3, now);
                self.set_phase(Phase::Connected);
                if self.can_send_new() {
                    self.drain(false, now);
                }
            }
            Reaction::Released => self.go_disconnected(),
            Reaction::AcceptDisconnect => {
                self.reply(frame, FrameType::Ua, true);
                self.go_disconnected();
            }
            Reaction::Reconnect { downgrade, cause } => self.reconnect(downgrade, cause, now),
            Reaction::RefuseDm => {
                let final_bit = frame.poll_final || frame.kind == FrameType::Disc;
                self.reply(frame, FrameType::Dm, final_bit);
            }
            Reaction::RejectXid => {
                debug!("XID unsupported, answering FRMR");
                self.reply(frame, FrameType::Frmr, frame.poll_final);
            }
            Reaction::EchoTest => {
                if frame.command
                    && let Some(addresses) = frame.reply_addresses()
                {
                    let mut echo = Frame::new(addresses, FrameType::Test).poll_final(frame.poll_final);
                    echo.data = frame.data.clone();
                    self.transmit(echo);
                }
            }
            Reaction::Sequenced => match frame.kind {
                FrameType::I => self.on_information(frame, now),
                _ => self.on_supervisory(frame, now),
            },
            Reaction::Ignore => trace!(kind = %frame.kind, "ignored"),
        }
    }

    fn accept(&mut self, frame: &Frame) {
        let Some(addresses) = frame.reply_addresses() else {
            return;
        };
        info!(peer = %addresses[0], extended = frame.kind == FrameType::Sabme, "incoming connection");
        self.timers.cancel_all();
        self.state.reset_sequence();
        self.state.modulus = Modulus::from_extended(frame.kind == FrameType::Sabme);
        self.bind(addresses, Phase::Connected);
        self.reply(frame, FrameType::Ua, frame.poll_final && frame.command);
    }

    fn reconnect(&mut self, downgrade: bool, cause: &'static str, now: Instant) {
        match self.link_state() {
            LinkState::Connected => {
                warn!(cause, "unexpected frame on live link, reconnecting");
                self.error(SessionError::LinkReset(cause));
                self.timers.cancel_all();
            }
            _ => {
                // Keep the connect attempt count so the retry budget still
                // bounds a peer that keeps refusing.
                for kind in [TimerKind::Disconnect, TimerKind::T1, TimerKind::T2, TimerKind::T3] {
                    self.timers.cancel(kind);
                }
                self.timers.disarm(TimerKind::Connect);
            }
        }
        self.state.reset_sequence();
        if downgrade && self.state.modulus.is_extended() {
            debug!("falling back to modulo-8");
            self.state.modulus = Modulus::Standard;
        }
        self.establish(now);
    }

    fn on_information(&mut self, frame: &Frame, now: Instant) {
        let m = self.state.modulus;
        self.acknowledge(frame.nr, now);

        let ns = frame.ns % m.value();
        let expected = self.state.receive_seq;
        if ns == expected {
            self.state.sent_rej = false;
            self.state.receive_seq = m.next(ns);
            self.deliver(frame.data.as_deref());
            self.flush_receive_buffer();
            self.state.ack_pending = true;

            if frame.command && frame.poll_final {
                self.enquiry_response();
            }
            if self.can_send_new() {
                self.drain(false, now);
            } else if self.state.ack_pending {
                let t2 = self.config.timeouts().t2();
                self.timers.arm(TimerKind::T2, t2, now);
            }
            return;
        }

        let in_window = m.distance(ns, expected) < self.window();
        if in_window && !self.state.receive_buffer.contains_key(&ns) {
            debug!(ns, expected, "out of sequence, buffering");
            self.state.receive_buffer.insert(ns, frame.clone());
            if !self.state.sent_rej {
                self.state.sent_rej = true;
                self.stats.rejects_sent += 1;
                self.send_supervisory(FrameType::Rej, false, false);
            }
        } else {
            trace!(ns, expected, "duplicate or out of window");
        }
        if self.can_send_new() {
            self.drain(false, now);
        }
    }

    fn flush_receive_buffer(&mut self) {
        let m = self.state.modulus;
        while let Some(frame) = self.state.receive_buffer.remove(&self.state.receive_seq) {
            self.deliver(frame.data.as_deref());
            self.state.receive_seq = m.next(self.state.receive_seq);
        }
    }

    fn on_supervisory(&mut self, frame: &Frame, now: Instant) {
        match frame.kind {
            FrameType::Rnr => {
                self.state.remote_busy = true;
                self.acknowledge(frame.nr, now);
                self.timers.cancel(TimerKind::T2);
                let t1 = self.general_timeout();
                self.timers.arm(TimerKind::T1, t1, now);
                if frame.command && frame.poll_final {
                    self.enquiry_response();
                }
                return;
            }
            FrameType::Rej | FrameType::Srej => {
                self.state.remote_busy = false;
                self.stats.rejects_received += 1;
                self.acknowledge(frame.nr, now);
                self.state.got_rej = Some(frame.nr % self.state.modulus.value());
            }
            _ => {
                self.state.remote_busy = false;
                self.acknowledge(frame.nr, now);
                // Answer to our poll with data still outstanding: go back to N(R).
                if !frame.command && frame.poll_final && self.state.outstanding() > 0 {
                    self.state.got_rej = Some(frame.nr % self.state.modulus.value());
                }
            }
        }

        if frame.command && frame.poll_final {
            self.enquiry_response();
        }
        if self.state.got_rej.is_some() || self.can_send_new() {
            self.drain(false, now);
        } else if self.state.ack_pending && !self.timers.is_armed(TimerKind::T2) {
            let t2 = self.config.timeouts().t2();
            self.timers.arm(TimerKind::T2, t2, now);
        }
    }

    // =========================================================================
    // TIMERS
    // =========================================================================

    /// Fire every timer whose deadline is at or before `now`.
    pub fn poll_timers(&mut self, now: Instant) -> Vec<Action> {
        while let Some(kind) = self.timers.take_expired(now) {
            self.on_expiry(kind, now);
        }
        self.finish()
    }

    /// Fire `kind` immediately if it is armed.
    pub fn expire(&mut self, kind: TimerKind, now: Instant) -> Vec<Action> {
        if self.timers.is_armed(kind) {
            self.timers.disarm(kind);
            self.on_expiry(kind, now);
        }
        self.finish()
    }

    fn on_expiry(&mut self, kind: TimerKind, now: Instant) {
        self.stats.timeouts += 1;
        let link = self.link_state();
        let retries = self.config.retries;
        debug!(timer = %kind, %link, attempts = self.timers.attempts(kind), "timer expired");

        match (kind, link) {
            (TimerKind::Connect, LinkState::Connecting) => {
                let attempts = self.timers.attempts(TimerKind::Connect);
                if attempts >= retries.saturating_sub(1) {
                    warn!(attempts, "no answer to connect request");
                    self.timers.cancel(TimerKind::Connect);
                    self.error(SessionError::ConnectRetriesExhausted(attempts));
                    self.go_disconnected();
                } else {
                    self.establish(now);
                }
            }
            (TimerKind::Disconnect, LinkState::Disconnecting) => {
                let attempts = self.timers.attempts(TimerKind::Disconnect);
                if attempts >= retries.saturating_sub(1) {
                    warn!(attempts, "no answer to disconnect request");
                    self.send_unnumbered(FrameType::Dm, false, true);
                    self.error(SessionError::DisconnectRetriesExhausted(attempts));
                    self.go_disconnected();
                } else {
                    self.release(now);
                }
            }
            (TimerKind::T1, LinkState::Connected) => {
                let attempts = self.timers.attempts(TimerKind::T1);
                if attempts < retries {
                    self.send_supervisory(FrameType::Rr, true, true);
                    self.timers.bump(TimerKind::T1);
                    let t1 = self.general_timeout();
                    self.timers.arm(TimerKind::T1, t1, now);
                } else {
                    warn!(attempts, "peer stopped acknowledging, re-establishing link");
                    self.error(SessionError::AckRetriesExhausted(attempts));
                    self.timers.cancel_all();
                    self.establish(now);
                }
            }
            (TimerKind::T2, LinkState::Connected) => self.drain(true, now),
            (TimerKind::T3, LinkState::Connected) => {
                if !self.timers.is_armed(TimerKind::T1) {
                    self.timers.bump(TimerKind::T3);
                }
            }
            _ => trace!(timer = %kind, %link, "stale timer"),
        }
    }

    // =========================================================================
    // LINK PROCEDURES
    // =========================================================================

    /// Send SABM(E) and (re)arm the connect timer.
    fn establish(&mut self, now: Instant) {
        self.set_phase(Phase::Connecting);
        self.state.reset_sequence();
        for kind in [TimerKind::Disconnect, TimerKind::T1, TimerKind::T2, TimerKind::T3] {
            self.timers.cancel(kind);
        }

        let kind = if self.state.modulus.is_extended() {
            FrameType::Sabme
        } else {
            FrameType::Sabm
        };
        self.send_unnumbered(kind, true, true);
        self.state.renumber();

        let attempts = self.timers.bump(TimerKind::Connect);
        if attempts >= self.config.retries {
            warn!(attempts, "connect retries exhausted");
            self.timers.cancel(TimerKind::Connect);
            self.error(SessionError::ConnectRetriesExhausted(attempts));
            self.go_disconnected();
            return;
        }
        let timeout = self.general_timeout();
        self.timers.arm(TimerKind::Connect, timeout, now);
    }

    /// Send DISC and (re)arm the disconnect timer.
    fn release(&mut self, now: Instant) {
        for kind in [TimerKind::Connect, TimerKind::T1, TimerKind::T2, TimerKind::T3] {
            self.timers.cancel(kind);
        }
        self.timers.disarm(TimerKind::Disconnect);

        self.send_unnumbered(FrameType::Disc, true, true);
        self.set_phase(Phase::Disconnecting);
        let timeout = self.general_timeout();
        self.timers.arm(TimerKind::Disconnect, timeout, now);
        self.timers.bump(TimerKind::Disconnect);
    }

    /// Drop acknowledged frames up to `nr` and record it as the peer's V(R).
    ///
    /// A sent frame is acknowledged when its N(S) lies in `[V(A), nr)`.
    fn acknowledge(&mut self, nr: u8, now: Instant) {
        let m = self.state.modulus.value();
        let nr = nr % m;
        let base = self.state.remote_receive_seq;
        let span = distance(nr, base, m);
        let before = self.state.send_buffer.len();
        self.state
            .send_buffer
            .retain(|f| !(f.sent && distance(f.ns, base, m) < span));
        let acked = before - self.state.send_buffer.len();
        self.state.remote_receive_seq = nr;

        if acked > 0 {
            trace!(nr, acked, "frames acknowledged");
            self.timers.reset_attempts(TimerKind::T1);
        }
        if self.state.outstanding() == 0 {
            self.timers.cancel(TimerKind::T1);
        } else if acked > 0 {
            let t1 = self.general_timeout();
            self.timers.arm(TimerKind::T1, t1, now);
        }
    }

    /// Transmit pump.
    ///
    /// Sends new frames inside the window, re-sends outstanding ones when
    /// `resend` is set or the peer asked for them with REJ, and falls back to
    /// a bare RR when there was nothing else to carry the acknowledgment.
    fn drain(&mut self, resend: bool, now: Instant) {
        if self.state.remote_busy {
            self.timers.cancel(TimerKind::T1);
            return;
        }

        let m = self.state.modulus;
        let k = self.window();
        let rej = self.state.got_rej.take();
        let nr = self.state.receive_seq;
        let mut transmitted = false;

        for index in 0..self.state.send_buffer.len() {
            let frame = &self.state.send_buffer[index];
            if frame.sent {
                let requested = rej.is_some_and(|r| {
                    m.distance(frame.ns, r) < m.distance(self.state.send_seq, r)
                });
                if resend || requested {
                    let frame = &mut self.state.send_buffer[index];
                    frame.nr = nr;
                    let copy = frame.clone();
                    self.stats.retransmissions += 1;
                    self.transmit(copy);
                    transmitted = true;
                }
                continue;
            }

            if m.distance(self.state.send_seq, self.state.remote_receive_seq) >= k {
                trace!(send_seq = self.state.send_seq, "window full");
                break;
            }
            let ns = self.state.send_seq;
            let frame = &mut self.state.send_buffer[index];
            frame.ns = ns;
            frame.nr = nr;
            frame.sent = true;
            frame.command = true;
            frame.poll_final = false;
            let copy = frame.clone();
            self.transmit(copy);
            self.state.send_seq = m.next(ns);
            transmitted = true;
        }

        if !transmitted && rej.is_none() {
            self.send_supervisory(FrameType::Rr, false, false);
        }
        self.state.ack_pending = false;
        self.timers.cancel(TimerKind::T2);

        if transmitted {
            let t1 = self.general_timeout();
            self.timers.arm(TimerKind::T1, t1, now);
        } else if self.state.outstanding() == 0 {
            self.timers.cancel(TimerKind::T1);
        }
    }

    /// RR response with F=1 to a command poll.
    fn enquiry_response(&mut self) {
        self.send_supervisory(FrameType::Rr, false, true);
        self.state.ack_pending = false;
        self.timers.cancel(TimerKind::T2);
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    /// New frames are queued and the window and peer allow sending them.
    fn can_send_new(&self) -> bool {
        let m = self.state.modulus;
        !self.state.remote_busy
            && self.state.unsent() > 0
            && m.distance(self.state.send_seq, self.state.remote_receive_seq) < self.window()
    }

    /// Send and receive window for the active modulus.
    ///
    /// A link that fell back to modulo-8 keeps the configured `max_frames`
    /// but can never have more than seven frames in flight.
    fn window(&self) -> u8 {
        self.config.max_frames.min(self.state.modulus.max_window())
    }

    fn general_timeout(&self) -> Duration {
        let hops = self.state.binding.addresses().map_or(2, <[Address]>::len);
        self.config.timeouts().general(hops, self.state.outstanding())
    }

    fn t3_timeout(&self) -> Duration {
        let hops = self.state.binding.addresses().map_or(2, <[Address]>::len);
        self.config.timeouts().t3(hops, self.state.outstanding())
    }

    fn bind(&mut self, addresses: Vec<Address>, phase: Phase) {
        let from = self.link_state();
        self.state.binding = PeerBinding::Bound { addresses, phase };
        self.changed(from);
    }

    fn set_phase(&mut self, next: Phase) {
        let from = self.link_state();
        if let PeerBinding::Bound { phase, .. } = &mut self.state.binding {
            *phase = next;
        }
        self.changed(from);
    }

    fn go_disconnected(&mut self) {
        let from = self.link_state();
        self.timers.cancel_all();
        self.state.unbind();
        self.changed(from);
    }

    fn changed(&mut self, from: LinkState) {
        let to = self.link_state();
        if from != to {
            info!(%from, %to, peer = ?self.state.binding.peer(), "link state changed");
            self.emit(SessionEvent::StateChanged { from, to });
        }
    }

    fn deliver(&mut self, data: Option<&[u8]>) {
        if let Some(data) = data
            && !data.is_empty()
        {
            self.emit(SessionEvent::DataReceived(data.to_vec()));
        }
    }

    fn send_unnumbered(&mut self, kind: FrameType, command: bool, poll_final: bool) {
        if let Some(addresses) = self.state.binding.addresses() {
            let frame = Frame::new(addresses.to_vec(), kind)
                .command(command)
                .poll_final(poll_final);
            self.transmit(frame);
        }
    }

    fn send_supervisory(&mut self, kind: FrameType, command: bool, poll_final: bool) {
        if let Some(addresses) = self.state.binding.addresses() {
            let frame = Frame::new(addresses.to_vec(), kind)
                .with_nr(self.state.receive_seq)
                .command(command)
                .poll_final(poll_final);
            self.transmit(frame);
        }
    }

    fn reply(&mut self, to: &Frame, kind: FrameType, final_bit: bool) {
        if let Some(addresses) = to.reply_addresses() {
            self.transmit(Frame::new(addresses, kind).poll_final(final_bit));
        }
    }

    fn transmit(&mut self, frame: Frame) {
        trace!(frame = %frame, "tx");
        self.stats.frames_sent += 1;
        self.actions.push(Action::Transmit(frame));
    }

    fn emit(&mut self, event: SessionEvent) {
        self.actions.push(Action::Emit(event));
    }

    fn error(&mut self, error: SessionError) {
        debug!(%error, "session error");
        self.emit(SessionEvent::Error(error));
    }

    fn finish(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.actions)
    }
}
