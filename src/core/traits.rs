//! Broker interface between the session and the radio transport.
//!
//! The session never talks to the radio directly. Inbound frames arrive as a
//! device-scoped event, outbound frames and diagnostics leave as dispatched
//! events, and ambient radio state is read through a keyed lookup.

use std::sync::Arc;

use crate::frame::Frame;

/// Identifier of a radio device on the broker.
pub type DeviceId = u32;

/// Handle returned by [`Broker::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Which devices a subscription listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceFilter {
    /// Every device.
    All,
    /// One device.
    Device(DeviceId),
}

impl DeviceFilter {
    /// Check whether `device` passes this filter.
    pub fn matches(&self, device: DeviceId) -> bool {
        match self {
            DeviceFilter::All => true,
            DeviceFilter::Device(id) => *id == device,
        }
    }
}

/// Values carried by broker events.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A decoded AX.25 frame.
    Frame(Frame),
    /// Free text (logs, diagnostics).
    Text(String),
    /// Boolean state (locks, inhibit flags).
    Flag(bool),
    /// Numeric state.
    Number(i64),
}

/// Event handler invoked with `(device, event_name, payload)`.
pub type Handler = Arc<dyn Fn(DeviceId, &str, &Payload) + Send + Sync>;

/// Minimal event bus decoupling the session from the radio.
///
/// Implementations must not block in any method; `dispatch` is
/// fire-and-forget.
pub trait Broker: Send + Sync {
    /// Register `handler` for `events` on devices matching `filter`.
    fn subscribe(&self, filter: DeviceFilter, events: &[&str], handler: Handler) -> SubscriptionId;

    /// Remove a subscription. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);

    /// Publish an event. With `persist` the payload also becomes the
    /// last-known value for `(device, event)` readable via [`get_value`](Self::get_value).
    fn dispatch(&self, device: DeviceId, event: &str, payload: Payload, persist: bool);

    /// Read the last persisted value for `(device, key)`.
    fn get_value(&self, device: DeviceId, key: &str) -> Option<Payload>;

    /// Read a persisted boolean, falling back to `default`.
    fn get_flag(&self, device: DeviceId, key: &str, default: bool) -> bool {
        match self.get_value(device, key) {
            Some(Payload::Flag(value)) => value,
            _ => default,
        }
    }
}
