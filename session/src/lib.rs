//! Client-side synchronization with the monitoring and chatbot backends.
//!
//! Nothing in here touches a browser API. HTTP goes through [`MonitorApi`] /
//! [`ChatApi`], rendering through [`MonitorView`] / [`ChatView`], and timers
//! plus task spawning through [`Runtime`], so the frontend plugs in gloo while
//! the tests drive everything by hand.

mod chat;
mod error;
mod monitor;
mod runtime;

#[cfg(test)]
mod testing;

pub use chat::{
    ChatApi, ChatBody, ChatMessage, ChatSession, ChatView, LocalImage, MessageId, Sender,
    TurnOutcome,
};
pub use error::{ClientError, ErrorKind};
pub use monitor::{MonitorApi, MonitorOptions, MonitorSession, MonitorState, MonitorView};
pub use runtime::{PeriodicTask, Runtime, TimerHandle};
