//! Parley - a line-oriented command dispatcher.
//!
//! This library exposes the dispatch core and the host used by the binary,
//! for embedding and for integration tests.

pub mod commands;
pub mod config;
pub mod error;
pub mod host;
pub mod logging;
