//! Session actor.
//!
//! One tokio task owns the [`Session`]. Application calls, inbound frames and
//! timer expirations are serialized through a single command channel, so the
//! state machine never sees concurrent mutation. Between commands the task
//! sleeps until the session's earliest timer deadline.

use tokio::sync::{mpsc, oneshot};
use tokio::time;
use tracing::{debug, info, trace, warn};

use crate::core::{SessionError, SessionResult};
use crate::frame::{Address, Frame};
use crate::session::{
    Action, LinkState, SendOptions, Session, SessionConfig, SessionEvent, SessionStats,
};

/// Capacity of the command channel.
pub const COMMAND_QUEUE_CAPACITY: usize = 64;

/// Where the actor hands outbound frames.
pub trait FrameSink: Send + 'static {
    /// Transmit a frame. Fire-and-forget.
    fn transmit(&mut self, frame: Frame);

    /// Observe an event before it is published to the owner.
    fn report(&mut self, _event: &SessionEvent) {}
}

impl FrameSink for mpsc::UnboundedSender<Frame> {
    fn transmit(&mut self, frame: Frame) {
        if self.send(frame).is_err() {
            trace!("frame sink closed");
        }
    }
}

/// Messages processed by the actor.
#[derive(Debug)]
enum Command {
    Connect {
        addresses: Vec<Address>,
        reply: oneshot::Sender<SessionResult<()>>,
    },
    Disconnect {
        reply: oneshot::Sender<SessionResult<()>>,
    },
    Send {
        data: Vec<u8>,
        options: SendOptions,
        reply: oneshot::Sender<SessionResult<()>>,
    },
    CancelTagged {
        tag: String,
        reply: oneshot::Sender<usize>,
    },
    Inbound(Frame),
    State(oneshot::Sender<LinkState>),
    Stats(oneshot::Sender<SessionStats>),
    Shutdown,
}

/// Cloneable handle to a running session actor.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<Command>,
}

impl SessionHandle {
    /// Open a link over `addresses` (peer, local station, repeaters).
    ///
    /// Resolves once SABM(E) has been handed to the sink, not when the peer
    /// answers; watch for [`SessionEvent::StateChanged`] for that.
    pub async fn connect(&self, addresses: Vec<Address>) -> SessionResult<()> {
        self.request(|reply| Command::Connect { addresses, reply })
            .await?
    }

    /// Release the link.
    pub async fn disconnect(&self) -> SessionResult<()> {
        self.request(|reply| Command::Disconnect { reply }).await?
    }

    /// Queue data for reliable delivery.
    pub async fn send(&self, data: impl Into<Vec<u8>>) -> SessionResult<()> {
        self.send_with(data, SendOptions::default()).await
    }

    /// Queue data with a tag and/or deadline.
    pub async fn send_with(
        &self,
        data: impl Into<Vec<u8>>,
        options: SendOptions,
    ) -> SessionResult<()> {
        let data = data.into();
        self.request(|reply| Command::Send {
            data,
            options,
            reply,
        })
        .await?
    }

    /// Drop untransmitted data queued under `tag`. Returns the number of
    /// frames removed.
    pub async fn cancel_tagged(&self, tag: impl Into<String>) -> SessionResult<usize> {
        let tag = tag.into();
        self.request(|reply| Command::CancelTagged { tag, reply })
            .await
    }

    /// Inject a decoded inbound frame.
    pub async fn receive(&self, frame: Frame) -> SessionResult<()> {
        self.tx
            .send(Command::Inbound(frame))
            .await
            .map_err(|_| SessionError::Closed)
    }

    /// Inject an inbound frame without waiting.
    ///
    /// When the actor is backlogged the frame is dropped, the same as a
    /// frame lost on the air.
    pub fn try_receive(&self, frame: Frame) -> SessionResult<()> {
        match self.tx.try_send(Command::Inbound(frame)) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("session backlog full, inbound frame dropped");
                Ok(())
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(SessionError::Closed),
        }
    }

    /// Current link state.
    pub async fn link_state(&self) -> SessionResult<LinkState> {
        self.request(Command::State).await
    }

    /// Current counters.
    pub async fn stats(&self) -> SessionResult<SessionStats> {
        self.request(Command::Stats).await
    }

    /// Stop the actor. Pending timers are dropped; no DISC is sent.
    pub async fn shutdown(&self) -> SessionResult<()> {
        self.tx
            .send(Command::Shutdown)
            .await
            .map_err(|_| SessionError::Closed)
    }

    /// Check if the actor is still running.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> SessionResult<T> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(make(reply))
            .await
            .map_err(|_| SessionError::Closed)?;
        response.await.map_err(|_| SessionError::Closed)
    }
}

/// Spawn a session actor on the current tokio runtime.
///
/// Returns the handle and the stream of [`SessionEvent`]s. Dropping every
/// handle stops the actor.
pub fn spawn_session<T: FrameSink>(
    config: SessionConfig,
    sink: T,
) -> (SessionHandle, mpsc::UnboundedReceiver<SessionEvent>) {
    let (tx, commands) = mpsc::channel(COMMAND_QUEUE_CAPACITY);
    let (events, events_rx) = mpsc::unbounded_channel();
    let actor = SessionActor {
        session: Session::new(config),
        sink,
        events,
        commands,
    };
    tokio::spawn(actor.run());
    (SessionHandle { tx }, events_rx)
}

struct SessionActor<T> {
    session: Session,
    sink: T,
    events: mpsc::UnboundedSender<SessionEvent>,
    commands: mpsc::Receiver<Command>,
}

impl<T: FrameSink> SessionActor<T> {
    async fn run(mut self) {
        info!("session actor started");
        loop {
            let wake = self.session.next_deadline().map(time::Instant::from_std);
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.handle(command),
                },
                () = sleep_until(wake) => {
                    let now = now();
                    let actions = self.session.poll_timers(now);
                    let _ = self.perform(actions);
                    self.prune(now);
                }
            }
        }
        info!(state = %self.session.link_state(), "session actor stopped");
    }

    fn handle(&mut self, command: Command) {
        let now = now();
        match command {
            Command::Connect { addresses, reply } => {
                debug!(addresses = addresses.len(), "connect requested");
                let actions = self.session.connect(addresses, now);
                let _ = reply.send(self.perform(actions));
            }
            Command::Disconnect { reply } => {
                debug!("disconnect requested");
                let actions = self.session.disconnect(now);
                let _ = reply.send(self.perform(actions));
            }
            Command::Send {
                data,
                options,
                reply,
            } => {
                self.prune(now);
                let actions = self.session.send_with(&data, options, now);
                let _ = reply.send(self.perform(actions));
            }
            Command::CancelTagged { tag, reply } => {
                let removed = self.session.cancel_tagged(&tag);
                debug!(%tag, removed, "tagged data cancelled");
                let _ = reply.send(removed);
            }
            Command::Inbound(frame) => {
                let actions = self.session.receive(frame, now);
                let _ = self.perform(actions);
            }
            Command::State(reply) => {
                let _ = reply.send(self.session.link_state());
            }
            Command::Stats(reply) => {
                let _ = reply.send(self.session.stats());
            }
            Command::Shutdown => {}
        }
    }

    /// Carry out actions; the first error event becomes the call's result.
    fn perform(&mut self, actions: Vec<Action>) -> SessionResult<()> {
        let mut outcome = Ok(());
        for action in actions {
            match action {
                Action::Transmit(frame) => self.sink.transmit(frame),
                Action::Emit(event) => {
                    if let SessionEvent::Error(error) = &event
                        && outcome.is_ok()
                    {
                        outcome = Err(error.clone());
                    }
                    self.sink.report(&event);
                    if self.events.send(event).is_err() {
                        trace!("event receiver dropped");
                    }
                }
            }
        }
        outcome
    }

    fn prune(&mut self, now: std::time::Instant) {
        let pruned = self.session.prune_expired(now);
        if pruned > 0 {
            debug!(pruned, "expired data dropped from queue");
        }
    }
}

fn now() -> std::time::Instant {
    time::Instant::now().into_std()
}

async fn sleep_until(deadline: Option<time::Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
