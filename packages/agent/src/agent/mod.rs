// packages/agent/src/agent/mod.rs
//! Agent coordinator
//!
//! Entry point for host pages: construct an [`Agent`] for a page and a
//! reporter, then call [`Agent::register`] with the options.

pub mod coordinator;

pub use coordinator::{Agent, AgentState};
