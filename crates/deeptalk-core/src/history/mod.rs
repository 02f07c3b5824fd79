//! Conversation history: storage, payload projection, and export.

pub mod assembler;
pub mod export;
pub mod store;
