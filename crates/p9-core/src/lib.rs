//! Membrane-computing hierarchy for ML parameter namespaces.
//!
//! A [`Membrane`] is a node in a strict ownership tree: it owns its child
//! membranes, borrows numeric [`Buffer`]s from an external allocation
//! context, and optionally caches the [`TransformConfig`] of the first
//! transformation pass applied to it.  A [`Namespace`] aggregates one
//! membrane tree with a compute backend handle and bookkeeping statistics,
//! and is responsible for propagating itself into every node of its tree.
//!
//! The numeric passes themselves live in the `p9-opt` crate; this crate only
//! defines the structure they traverse and the capabilities they consume.

pub mod backend;
pub mod buffer;
pub mod config;
pub mod error;
pub mod membrane;
pub mod namespace;
pub mod rules;
pub mod stats;

pub use backend::{ComputeBackend, ComputeGraph, ExecError};
pub use buffer::{Buffer, BufferRef, DenseBuffer, ElementType, QuantKind};
pub use config::TransformConfig;
pub use error::MembraneError;
pub use membrane::{Membrane, WeakMembrane};
pub use namespace::Namespace;
pub use rules::{EvolveReport, Rule, RuleAction, RulePattern};
pub use stats::{MembraneStats, NamespaceStats};
