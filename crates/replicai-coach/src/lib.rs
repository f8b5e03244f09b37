//! ReplicAI Coach - Advisory tips for bad-form repetitions
//!
//! This crate provides:
//! - The advisory service contract (image + prompt in, text out)
//! - Per-tracker advisory state with at-most-one request in flight
//! - A cooldown-limited requester that never blocks the frame path
//! - An HTTP adapter for OpenAI-compatible vision chat endpoints
//!
//! Results travel back from the background task over a oneshot channel
//! owned by the tracker's slot; only the frame path ever writes the slot.

pub mod config;
pub mod error;
pub mod http;
pub mod requester;
pub mod service;
pub mod slot;

pub use config::*;
pub use error::*;
pub use http::{HttpAdvisoryConfig, HttpAdvisoryService};
pub use requester::*;
pub use service::*;
pub use slot::*;
