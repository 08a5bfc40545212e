//! Tokio runtime for sessions.
//!
//! - [`spawn_session`]: run a [`Session`](crate::session::Session) as a
//!   single-task actor behind a cloneable [`SessionHandle`]
//! - [`BrokerGateway`]: bind a session actor to a device on a
//!   [`Broker`](crate::core::Broker)
//! - [`LocalBroker`]: in-process broker

mod actor;
mod broker;
mod gateway;

pub use actor::{spawn_session, FrameSink, SessionHandle, COMMAND_QUEUE_CAPACITY};
pub use broker::LocalBroker;
pub use gateway::BrokerGateway;
