//! Session timers and timeout derivation.
//!
//! Timers are plain deadlines. Nothing here sleeps or spawns: the owner asks
//! for [`TimerSet::next_deadline`], waits however it likes, and feeds the
//! current instant back through [`TimerSet::take_expired`]. That keeps expiry
//! inside the same serialized path as frame processing and lets tests drive
//! a virtual clock.

use std::fmt;
use std::time::{Duration, Instant};

use crate::core::{
    FRAME_OVERHEAD_BITS, HOP_FACTOR, MIN_PACKET_TIME_SECS, MIN_ADDRESSES, T2_PACKET_MULTIPLIER, T3_TIMEOUT_MULTIPLIER,
};

/// The session's timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// SABM(E) retry.
    Connect,
    /// DISC retry.
    Disconnect,
    /// Acknowledgment wait.
    T1,
    /// Response delay.
    T2,
    /// Idle poll.
    T3,
}

impl TimerKind {
    /// All timers in expiry tie-break order.
    pub const ALL: [TimerKind; 5] = [
        TimerKind::Connect,
        TimerKind::Disconnect,
        TimerKind::T1,
        TimerKind::T2,
        TimerKind::T3,
    ];

    fn index(self) -> usize {
        match self {
            TimerKind::Connect => 0,
            TimerKind::Disconnect => 1,
            TimerKind::T1 => 2,
            TimerKind::T2 => 3,
            TimerKind::T3 => 4,
        }
    }
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimerKind::Connect => "connect",
            TimerKind::Disconnect => "disconnect",
            TimerKind::T1 => "t1",
            TimerKind::T2 => "t2",
            TimerKind::T3 => "t3",
        };
        f.write_str(name)
    }
}

/// A one-shot timer with an attempt counter.
#[derive(Debug, Clone, Copy, Default)]
struct Timer {
    deadline: Option<Instant>,
    attempts: u32,
}

/// The set of session timers.
#[derive(Debug, Clone, Default)]
pub struct TimerSet {
    timers: [Timer; 5],
}

impl TimerSet {
    /// Create a set with every timer disarmed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm (or re-arm) `kind` to fire `after` from `now`. Attempts are kept.
    pub fn arm(&mut self, kind: TimerKind, after: Duration, now: Instant) {
        self.timers[kind.index()].deadline = Some(now + after);
    }

    /// Disarm `kind` and reset its attempt counter.
    pub fn cancel(&mut self, kind: TimerKind) {
        self.timers[kind.index()] = Timer::default();
    }

    /// Disarm and reset every timer.
    pub fn cancel_all(&mut self) {
        self.timers = Default::default();
    }

    /// Disarm `kind` but keep its attempt counter.
    pub fn disarm(&mut self, kind: TimerKind) {
        self.timers[kind.index()].deadline = None;
    }

    /// Check if `kind` is armed.
    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.timers[kind.index()].deadline.is_some()
    }

    /// Deadline of `kind`, if armed.
    pub fn deadline(&self, kind: TimerKind) -> Option<Instant> {
        self.timers[kind.index()].deadline
    }

    /// Attempt counter of `kind`.
    pub fn attempts(&self, kind: TimerKind) -> u32 {
        self.timers[kind.index()].attempts
    }

    /// Increment the attempt counter of `kind`, returning the new value.
    pub fn bump(&mut self, kind: TimerKind) -> u32 {
        let timer = &mut self.timers[kind.index()];
        timer.attempts = timer.attempts.saturating_add(1);
        timer.attempts
    }

    /// Reset the attempt counter of `kind` without touching its deadline.
    pub fn reset_attempts(&mut self, kind: TimerKind) {
        self.timers[kind.index()].attempts = 0;
    }

    /// Earliest armed deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.iter().filter_map(|t| t.deadline).min()
    }

    /// Pop the earliest timer whose deadline is at or before `now`.
    ///
    /// The returned timer is disarmed (one-shot); its attempts are kept.
    pub fn take_expired(&mut self, now: Instant) -> Option<TimerKind> {
        let kind = TimerKind::ALL
            .into_iter()
            .filter_map(|kind| self.deadline(kind).map(|d| (d, kind)))
            .filter(|(deadline, _)| *deadline <= now)
            .min_by_key(|(deadline, kind)| (*deadline, kind.index()))
            .map(|(_, kind)| kind)?;
        self.disarm(kind);
        Some(kind)
    }
}

/// Timeout derivation from channel parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutPolicy {
    /// Maximum I-field length in bytes.
    pub packet_length: usize,
    /// Channel rate in bits per second.
    pub hbaud: u32,
}

impl TimeoutPolicy {
    /// Estimated air time of one full-length frame:
    /// `⌊(600 + 8·packet_length) / hbaud⌋` seconds, never below one second.
    pub fn packet_time(&self) -> Duration {
        let bits = FRAME_OVERHEAD_BITS + 8 * self.packet_length as u64;
        let secs = (bits / u64::from(self.hbaud.max(1))).max(MIN_PACKET_TIME_SECS);
        Duration::from_millis(secs.saturating_mul(1000))
    }

    /// General retry timeout for a path of `address_count` addresses with
    /// `outstanding` sent-but-unacknowledged frames.
    pub fn general(&self, address_count: usize, outstanding: usize) -> Duration {
        let packet = self.packet_time();
        let hops = address_count.saturating_sub(MIN_ADDRESSES).max(1) as u32;
        let occupancy = packet * hops * HOP_FACTOR as u32;
        occupancy + packet * outstanding.max(1) as u32
    }

    /// T2 response delay.
    pub fn t2(&self) -> Duration {
        self.packet_time() * T2_PACKET_MULTIPLIER
    }

    /// T3 idle interval.
    pub fn t3(&self, address_count: usize, outstanding: usize) -> Duration {
        self.general(address_count, outstanding) * T3_TIMEOUT_MULTIPLIER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICY: TimeoutPolicy = TimeoutPolicy {
        packet_length: 256,
        hbaud: 1200,
    };

    #[test]
    fn test_packet_time() {
        // (600 + 2048) / 1200 = 2 (floored)
        assert_eq!(POLICY.packet_time(), Duration::from_secs(2));
        let fast = TimeoutPolicy {
            packet_length: 256,
            hbaud: 9600,
        };
        assert_eq!(fast.packet_time(), Duration::from_secs(1));
    }

    #[test]
    fn test_fast_channel_timeouts_stay_positive() {
        // 2648 bits at 9600 baud and 1 byte at 1200 baud both floor to zero.
        for policy in [
            TimeoutPolicy {
                packet_length: 256,
                hbaud: 9600,
            },
            TimeoutPolicy {
                packet_length: 1,
                hbaud: 1200,
            },
        ] {
            assert_eq!(policy.general(2, 0), Duration::from_secs(5));
            assert_eq!(policy.t2(), Duration::from_secs(2));
            assert!(policy.t3(2, 0) > Duration::ZERO);
        }
    }

    #[test]
    fn test_general_timeout() {
        // direct path: 2s * 1 * 4 + 2s * 1
        assert_eq!(POLICY.general(2, 0), Duration::from_secs(10));
        // two repeaters, three outstanding: 2s * 2 * 4 + 2s * 3
        assert_eq!(POLICY.general(4, 3), Duration::from_secs(22));
        assert_eq!(POLICY.t2(), Duration::from_secs(4));
        assert_eq!(POLICY.t3(2, 0), Duration::from_secs(70));
    }

    #[test]
    fn test_arm_and_expire() {
        let now = Instant::now();
        let mut timers = TimerSet::new();
        timers.arm(TimerKind::T2, Duration::from_secs(4), now);
        timers.arm(TimerKind::T1, Duration::from_secs(10), now);

        assert_eq!(timers.next_deadline(), Some(now + Duration::from_secs(4)));
        assert_eq!(timers.take_expired(now + Duration::from_secs(3)), None);
        assert_eq!(
            timers.take_expired(now + Duration::from_secs(11)),
            Some(TimerKind::T2)
        );
        assert!(!timers.is_armed(TimerKind::T2));
        assert_eq!(
            timers.take_expired(now + Duration::from_secs(11)),
            Some(TimerKind::T1)
        );
        assert_eq!(timers.next_deadline(), None);
    }

    #[test]
    fn test_attempts_survive_rearm() {
        let now = Instant::now();
        let mut timers = TimerSet::new();
        timers.arm(TimerKind::Connect, Duration::from_secs(1), now);
        assert_eq!(timers.bump(TimerKind::Connect), 1);
        timers.arm(TimerKind::Connect, Duration::from_secs(1), now);
        assert_eq!(timers.bump(TimerKind::Connect), 2);
        timers.disarm(TimerKind::Connect);
        assert_eq!(timers.attempts(TimerKind::Connect), 2);
        timers.cancel(TimerKind::Connect);
        assert_eq!(timers.attempts(TimerKind::Connect), 0);
    }
}
