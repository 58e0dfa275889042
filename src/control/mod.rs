//! Control channel between the core server and this proxy.
//!
//! The core server never calls into the proxy directly. Instead the
//! [`Heartbeat`] poller periodically reports the live session ids and receives
//! pending [`TerminalTask`](crate::model::TerminalTask)s, which
//! [`handle_session_task`] maps onto the session lifecycle.

pub mod dispatch;
pub mod heartbeat;

pub use dispatch::*;
pub use heartbeat::*;
