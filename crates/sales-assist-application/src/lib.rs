//! Application layer for the Sales Assistant client.
//!
//! This crate provides the use cases front ends drive: login and logout,
//! domain and file selection, and chat turns against the backend gateway.

pub mod assistant_usecase;
pub mod turn;

pub use assistant_usecase::AssistantUseCase;
pub use turn::{
    APOLOGY_TEXT, ComposedTurn, StateObserver, TurnInput, TurnOrchestrator, TurnOutcome,
    TurnStatus, compose_turn,
};
