//! Shared test utilities for the dashboard client.
//!
//! Provides a scripted in-memory [`api_client::Transport`] so pipeline
//! behavior (classification, deadlines, single-flight refresh) can be
//! tested deterministically without a network.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod mocks;

pub use mocks::{ScriptedCall, ScriptedRefresh, ScriptedTransport};
