//! Shared domain types for DeepTalk.
//!
//! This crate defines the data shapes used across the workspace:
//! conversation turns, wire-format messages for the completion endpoint,
//! session configuration, and the error taxonomy. It has no I/O and no
//! dependency on the other workspace crates.

pub mod config;
pub mod error;
pub mod llm;
pub mod turn;
