//! Process-wide configuration shared by the p9ml crates.
//!
//! Two concerns live here: deterministic seeding for every randomised
//! transformation pass, and tracing subscriber setup for binaries and
//! long-running experiments.  Both are driven by `P9ML_*` environment
//! variables so that reproducing a run never requires a code change.

pub mod determinism;
pub mod telemetry;
