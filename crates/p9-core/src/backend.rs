use thiserror::Error;

/// Opaque failure reported by a compute backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("backend execution failed: {0}")]
pub struct ExecError(pub String);

/// A pre-built, already-compiled computation plan.
///
/// The membrane layer never schedules or partitions graphs itself; it only
/// forwards them to whichever backend the owning namespace carries.
#[derive(Debug, Clone)]
pub struct ComputeGraph {
    label: String,
    nodes: usize,
}

impl ComputeGraph {
    pub fn new(label: impl Into<String>, nodes: usize) -> Self {
        Self {
            label: label.into(),
            nodes,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn nodes(&self) -> usize {
        self.nodes
    }
}

/// Execution capability consumed by [`crate::Namespace::compute`].
pub trait ComputeBackend {
    fn execute(&self, graph: &ComputeGraph) -> Result<(), ExecError>;
}
