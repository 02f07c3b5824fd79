//! Core logic for DeepTalk: incremental stream parsing, conversation
//! storage, context assembly, and session orchestration.
//!
//! The crate is organized around the data flow of one generation:
//!
//! ```text
//! transport frames -> stream::decode -> stream::parser -> session::controller
//!                                                             |
//!                    history::assembler <- history::store <---+
//! ```
//!
//! External collaborators (the HTTP transport and the rendering surface)
//! are reached only through the seams in [`transport`]: implementations
//! live in `deeptalk-infra` and the CLI crate.

pub mod history;
pub mod session;
pub mod stream;
pub mod transport;
