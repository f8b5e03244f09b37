//! ReplicAI Test Harness - Synthetic poses and exercise scenarios
//!
//! This crate provides:
//! - A pose synthesizer that places joints at exact angles
//! - Landmark jitter for noise and robustness runs
//!
//! End-to-end scenarios and property tests live under `tests/`,
//! benchmarks under `benches/`.

pub mod synth;

pub use synth::*;
