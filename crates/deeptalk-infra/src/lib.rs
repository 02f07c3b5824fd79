//! Infrastructure implementations for DeepTalk.
//!
//! Everything here is an adapter behind a seam defined in
//! `deeptalk-core` or a thin layer over the filesystem: the reqwest-based
//! streaming transport and the on-disk configuration.

pub mod config;
pub mod http;
