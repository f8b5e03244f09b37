//! ReplicAI Runtime - Sessions and the frame entry point
//!
//! This crate wires the engine into a multi-session service:
//! 1. One tracker per session id, created on first sight
//! 2. Frame processing, reset and workout save per session
//! 3. Idle eviction on a background interval
//! 4. Environment configuration and tracing initialisation
//!
//! Sessions never share mutable state. Each session sits behind its own
//! lock, so frames for different sessions never wait on each other.

pub mod config;
pub mod engine;
pub mod logging;
pub mod registry;
pub mod workout;

pub use config::*;
pub use engine::*;
pub use registry::*;
pub use workout::*;
