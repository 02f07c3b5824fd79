//! Session orchestration: one controller drives one conversation.

pub mod controller;

pub use controller::{GenerationOutcome, SessionController};
