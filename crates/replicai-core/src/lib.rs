//! ReplicAI Core - Fundamental types and primitives
//!
//! This crate defines the types shared by every layer of the rep engine:
//! - Identifiers (SessionId)
//! - Body joint vocabulary and per-frame landmark sets
//! - Exercise kinds
//! - Joint-angle and visibility geometry
//! - The pose detector collaborator contract

pub mod detector;
pub mod error;
pub mod exercise;
pub mod geometry;
pub mod id;
pub mod joint;
pub mod landmark;

pub use detector::*;
pub use error::*;
pub use exercise::*;
pub use geometry::*;
pub use id::*;
pub use joint::*;
pub use landmark::*;
