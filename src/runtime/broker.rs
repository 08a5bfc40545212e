//! In-process broker.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::core::{Broker, DeviceFilter, DeviceId, Handler, Payload, SubscriptionId};

struct Subscription {
    filter: DeviceFilter,
    events: Vec<String>,
    handler: Handler,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    subscriptions: HashMap<SubscriptionId, Subscription>,
    values: HashMap<(DeviceId, String), Payload>,
}

/// [`Broker`] that delivers events synchronously inside the process.
///
/// Handlers run on the dispatching thread, after the registry lock has been
/// released, so a handler may dispatch or subscribe itself.
#[derive(Default)]
pub struct LocalBroker {
    registry: Mutex<Registry>,
}

impl LocalBroker {
    /// Create an empty broker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty broker behind an `Arc`, ready to share.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Number of live subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.registry.lock().subscriptions.len()
    }
}

impl std::fmt::Debug for LocalBroker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.registry.lock();
        f.debug_struct("LocalBroker")
            .field("subscriptions", &registry.subscriptions.len())
            .field("values", &registry.values.len())
            .finish()
    }
}

impl Broker for LocalBroker {
    fn subscribe(&self, filter: DeviceFilter, events: &[&str], handler: Handler) -> SubscriptionId {
        let mut registry = self.registry.lock();
        registry.next_id += 1;
        let id = SubscriptionId(registry.next_id);
        registry.subscriptions.insert(
            id,
            Subscription {
                filter,
                events: events.iter().map(|e| (*e).to_owned()).collect(),
                handler,
            },
        );
        trace!(id = id.0, ?filter, ?events, "subscribed");
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        if self.registry.lock().subscriptions.remove(&id).is_some() {
            trace!(id = id.0, "unsubscribed");
        }
    }

    fn dispatch(&self, device: DeviceId, event: &str, payload: Payload, persist: bool) {
        let handlers: Vec<Handler> = {
            let mut registry = self.registry.lock();
            let handlers = registry
                .subscriptions
                .values()
                .filter(|s| s.filter.matches(device) && s.events.iter().any(|e| e == event))
                .map(|s| Arc::clone(&s.handler))
                .collect();
            if persist {
                registry
                    .values
                    .insert((device, event.to_owned()), payload.clone());
            }
            handlers
        };
        for handler in handlers {
            handler(device, event, &payload);
        }
    }

    fn get_value(&self, device: DeviceId, key: &str) -> Option<Payload> {
        self.registry.lock().values.get(&(device, key.to_owned())).cloned()
    }
}
