pub mod chat;
pub mod monitor;
