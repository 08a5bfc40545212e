//! Broker wiring for a session actor.
//!
//! [`BrokerGateway`] connects one session to one radio device on a
//! [`Broker`]: `FrameReceived` events for the device are fed to the actor,
//! outbound frames are dispatched as `TransmitFrame`, and state changes and
//! errors are mirrored to `Log`.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::core::{
    Broker, DeviceFilter, DeviceId, Handler, Payload, SubscriptionId, EVENT_FRAME_RECEIVED,
    EVENT_LOG, EVENT_TRANSMIT_FRAME, KEY_TRANSMIT_INHIBIT,
};
use crate::frame::Frame;
use crate::session::{SessionConfig, SessionEvent};

use super::actor::{spawn_session, FrameSink, SessionHandle};

/// Outbound half: dispatches frames and diagnostics for one device.
struct BrokerSink {
    broker: Arc<dyn Broker>,
    device: DeviceId,
}

impl FrameSink for BrokerSink {
    fn transmit(&mut self, frame: Frame) {
        if self
            .broker
            .get_flag(self.device, KEY_TRANSMIT_INHIBIT, false)
        {
            warn!(device = self.device, frame = %frame, "transmit inhibited, frame dropped");
            return;
        }
        self.broker
            .dispatch(self.device, EVENT_TRANSMIT_FRAME, Payload::Frame(frame), false);
    }

    fn report(&mut self, event: &SessionEvent) {
        let line = match event {
            SessionEvent::StateChanged { from, to } => format!("link {from} -> {to}"),
            SessionEvent::Error(error) => format!("error: {error}"),
            SessionEvent::DataReceived(_) | SessionEvent::UiDataReceived { .. } => return,
        };
        self.broker
            .dispatch(self.device, EVENT_LOG, Payload::Text(line), false);
    }
}

/// A session bound to a device on a broker.
///
/// Dropping the gateway removes its subscription; the actor stops once the
/// last [`SessionHandle`] clone is gone.
pub struct BrokerGateway {
    broker: Arc<dyn Broker>,
    device: DeviceId,
    subscription: SubscriptionId,
    handle: SessionHandle,
}

impl BrokerGateway {
    /// Spawn a session for `device` and subscribe it to inbound frames.
    ///
    /// Must be called from within a tokio runtime.
    pub fn attach(
        broker: Arc<dyn Broker>,
        device: DeviceId,
        config: SessionConfig,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let sink = BrokerSink {
            broker: Arc::clone(&broker),
            device,
        };
        let (handle, events) = spawn_session(config, sink);

        let inbound = handle.clone();
        let handler: Handler = Arc::new(
            move |device: DeviceId, _event: &str, payload: &Payload| {
                let Payload::Frame(frame) = payload else {
                    debug!(device, "FrameReceived without a frame");
                    return;
                };
                if inbound.try_receive(frame.clone()).is_err() {
                    debug!(device, "session closed, inbound frame dropped");
                }
            },
        );
        let subscription = broker.subscribe(
            DeviceFilter::Device(device),
            &[EVENT_FRAME_RECEIVED],
            handler,
        );
        debug!(device, subscription = subscription.0, "session attached");

        let gateway = Self {
            broker,
            device,
            subscription,
            handle,
        };
        (gateway, events)
    }

    /// Handle to the session actor.
    pub fn handle(&self) -> &SessionHandle {
        &self.handle
    }

    /// Device this session is bound to.
    pub fn device(&self) -> DeviceId {
        self.device
    }
}

impl std::fmt::Debug for BrokerGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrokerGateway")
            .field("device", &self.device)
            .field("subscription", &self.subscription)
            .finish()
    }
}

impl Drop for BrokerGateway {
    fn drop(&mut self) {
        self.broker.unsubscribe(self.subscription);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{Address, FrameType};
    use crate::runtime::LocalBroker;
    use crate::session::LinkState;

    const DEVICE: DeviceId = 1;

    fn me() -> Address {
        "N0CALL-1".parse().unwrap()
    }

    fn peer() -> Address {
        "KK7XYZ-2".parse().unwrap()
    }

    /// Collect every payload dispatched under `event` for any device.
    fn tap(broker: &LocalBroker, event: &str) -> mpsc::UnboundedReceiver<(DeviceId, Payload)> {
        let (tx, rx) = mpsc::unbounded_channel();
        broker.subscribe(
            DeviceFilter::All,
            &[event],
            Arc::new(move |device: DeviceId, _: &str, payload: &Payload| {
                let _ = tx.send((device, payload.clone()));
            }),
        );
        rx
    }

    fn transmitted(rx: &mut mpsc::UnboundedReceiver<(DeviceId, Payload)>) -> Vec<Frame> {
        let mut frames = Vec::new();
        while let Ok((_, payload)) = rx.try_recv() {
            if let Payload::Frame(frame) = payload {
                frames.push(frame);
            }
        }
        frames
    }

    #[tokio::test(start_paused = true)]
    async fn test_frames_flow_through_broker() {
        let broker = LocalBroker::shared();
        let mut tx_frames = tap(&broker, EVENT_TRANSMIT_FRAME);
        let (gateway, mut events) =
            BrokerGateway::attach(broker.clone(), DEVICE, SessionConfig::default());

        gateway.handle().connect(vec![peer(), me()]).await.unwrap();
        let sent = transmitted(&mut tx_frames);
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, FrameType::Sabm);

        let ua = Frame::new(vec![me(), peer()], FrameType::Ua).poll_final(true);
        broker.dispatch(DEVICE, EVENT_FRAME_RECEIVED, Payload::Frame(ua), false);

        loop {
            if let SessionEvent::StateChanged { to, .. } = events.recv().await.unwrap()
                && to == LinkState::Connected
            {
                break;
            }
        }
        assert_eq!(gateway.handle().link_state().await.unwrap(), LinkState::Connected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_devices_ignored() {
        let broker = LocalBroker::shared();
        let (gateway, _events) =
            BrokerGateway::attach(broker.clone(), DEVICE, SessionConfig::default());

        let sabm = Frame::new(vec![me(), peer()], FrameType::Sabm)
            .command(true)
            .poll_final(true);
        broker.dispatch(DEVICE + 1, EVENT_FRAME_RECEIVED, Payload::Frame(sabm), false);
        assert_eq!(
            gateway.handle().link_state().await.unwrap(),
            LinkState::Disconnected
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_transmit_inhibit() {
        let broker = LocalBroker::shared();
        let mut tx_frames = tap(&broker, EVENT_TRANSMIT_FRAME);
        broker.dispatch(DEVICE, KEY_TRANSMIT_INHIBIT, Payload::Flag(true), true);
        let (gateway, _events) =
            BrokerGateway::attach(broker.clone(), DEVICE, SessionConfig::default());

        gateway.handle().connect(vec![peer(), me()]).await.unwrap();
        assert!(transmitted(&mut tx_frames).is_empty());

        broker.dispatch(DEVICE, KEY_TRANSMIT_INHIBIT, Payload::Flag(false), true);
        gateway.handle().disconnect().await.unwrap_err();
        gateway.handle().connect(vec![peer(), me()]).await.unwrap();
        assert_eq!(transmitted(&mut tx_frames).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_state_changes_logged() {
        let broker = LocalBroker::shared();
        let mut logs = tap(&broker, EVENT_LOG);
        let (gateway, _events) =
            BrokerGateway::attach(broker.clone(), DEVICE, SessionConfig::default());

        gateway.handle().connect(vec![peer(), me()]).await.unwrap();
        let (device, line) = logs.recv().await.unwrap();
        assert_eq!(device, DEVICE);
        assert_eq!(line, Payload::Text("link disconnected -> connecting".into()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_unsubscribes() {
        let broker = LocalBroker::shared();
        let (gateway, _events) =
            BrokerGateway::attach(broker.clone(), DEVICE, SessionConfig::default());
        assert_eq!(broker.subscription_count(), 1);
        drop(gateway);
        assert_eq!(broker.subscription_count(), 0);
    }
}
