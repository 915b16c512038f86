//! Command-line parsing and command manager dispatch for the test harness.
//!
//! [`cmd`] holds the argument grammar and the manager protocol, [`loader`]
//! discovers managers from descriptor resources. The `jt` binary is one
//! driver built on top of these.

pub mod cmd;
pub mod config;
pub mod loader;
pub mod logger;
pub mod utils;
