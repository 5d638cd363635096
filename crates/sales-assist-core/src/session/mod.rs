//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: backend session and its local lifecycle (`Session`, `SessionState`)
//! - `message`: conversation message types (`Message`, `MessageRole`, `HistoryEntry`)

mod message;
mod model;

// Re-export public API
pub use message::{HistoryEntry, HistoryPart, Message, MessagePatch, MessageRole, WELCOME_MESSAGE_ID};
pub use model::{Session, SessionState};
