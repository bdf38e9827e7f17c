use std::cell::RefCell;
use std::rc::Rc;

use crate::backend::{ComputeBackend, ComputeGraph, ExecError};
use crate::membrane::Membrane;

pub(crate) struct NamespaceInner {
    pub(crate) name: String,
    pub(crate) root: Option<Membrane>,
    pub(crate) backend: Option<Rc<dyn ComputeBackend>>,
    pub(crate) noise_scale: f32,
    pub(crate) target_bits: u8,
    pub(crate) mixed_precision: bool,
    pub(crate) total_params: usize,
    pub(crate) quantized_params: usize,
    pub(crate) compression_ratio: f32,
}

/// Aggregate owning one membrane tree, a backend handle, and bookkeeping
/// statistics.
///
/// A namespace and its tree have independent lifetimes: `set_root` links the
/// two and propagates the namespace into every node, but dropping the
/// namespace never tears the tree down, and replacing the root simply points
/// the namespace elsewhere.  The statistics are caller-maintained; nothing
/// here derives them.
#[derive(Clone)]
pub struct Namespace(Rc<RefCell<NamespaceInner>>);

impl Namespace {
    /// Creates a namespace with zeroed statistics and the stock defaults
    /// (`noise_scale = 0.1`, `target_bits = 8`, mixed precision off).
    pub fn new(name: impl AsRef<str>, backend: Option<Rc<dyn ComputeBackend>>) -> Self {
        let name = if name.as_ref().is_empty() {
            "default".to_string()
        } else {
            name.as_ref().to_string()
        };
        Namespace(Rc::new(RefCell::new(NamespaceInner {
            name,
            root: None,
            backend,
            noise_scale: 0.1,
            target_bits: 8,
            mixed_precision: false,
            total_params: 0,
            quantized_params: 0,
            compression_ratio: 1.0,
        })))
    }

    pub(crate) fn from_rc(inner: Rc<RefCell<NamespaceInner>>) -> Self {
        Namespace(inner)
    }

    pub fn name(&self) -> String {
        self.0.borrow().name.clone()
    }

    pub fn ptr_eq(a: &Namespace, b: &Namespace) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    /// Assigns the root membrane and propagates this namespace into `root`
    /// and every descendant, unconditionally overwriting any prior namespace
    /// reference.  This is the single source of truth for namespace linkage;
    /// the snapshot copied by [`Membrane::add_child`] is only a convenience
    /// for nodes attached while the tree is already linked.
    pub fn set_root(&self, root: &Membrane) {
        let weak = Rc::downgrade(&self.0);
        root.for_each_preorder(&mut |membrane| {
            membrane.0.borrow_mut().namespace = weak.clone();
        });
        self.0.borrow_mut().root = Some(root.clone());
    }

    pub fn root(&self) -> Option<Membrane> {
        self.0.borrow().root.clone()
    }

    /// Forwards a pre-built computation graph to the attached backend.
    ///
    /// Succeeds trivially when no backend is attached.
    pub fn compute(&self, graph: &ComputeGraph) -> Result<(), ExecError> {
        let backend = self.0.borrow().backend.clone();
        match backend {
            Some(backend) => backend.execute(graph),
            None => Ok(()),
        }
    }

    pub fn noise_scale(&self) -> f32 {
        self.0.borrow().noise_scale
    }

    pub fn set_noise_scale(&self, scale: f32) {
        self.0.borrow_mut().noise_scale = scale;
    }

    pub fn target_bits(&self) -> u8 {
        self.0.borrow().target_bits
    }

    pub fn set_target_bits(&self, bits: u8) {
        self.0.borrow_mut().target_bits = bits;
    }

    pub fn mixed_precision(&self) -> bool {
        self.0.borrow().mixed_precision
    }

    pub fn set_mixed_precision(&self, enabled: bool) {
        self.0.borrow_mut().mixed_precision = enabled;
    }

    pub fn total_params(&self) -> usize {
        self.0.borrow().total_params
    }

    pub fn set_total_params(&self, count: usize) {
        self.0.borrow_mut().total_params = count;
    }

    pub fn quantized_params(&self) -> usize {
        self.0.borrow().quantized_params
    }

    pub fn set_quantized_params(&self, count: usize) {
        self.0.borrow_mut().quantized_params = count;
    }

    pub fn compression_ratio(&self) -> f32 {
        self.0.borrow().compression_ratio
    }

    pub fn set_compression_ratio(&self, ratio: f32) {
        self.0.borrow_mut().compression_ratio = ratio;
    }
}

impl std::fmt::Debug for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.0.borrow();
        f.debug_struct("Namespace")
            .field("name", &inner.name)
            .field("has_root", &inner.root.is_some())
            .field("has_backend", &inner.backend.is_some())
            .field("total_params", &inner.total_params)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statistics_start_at_identity() {
        let ns = Namespace::new("test", None);
        assert_eq!(ns.total_params(), 0);
        assert_eq!(ns.quantized_params(), 0);
        assert_eq!(ns.compression_ratio(), 1.0);
        assert_eq!(ns.noise_scale(), 0.1);
        assert_eq!(ns.target_bits(), 8);
        assert!(!ns.mixed_precision());
        assert!(ns.root().is_none());
    }

    #[test]
    fn empty_names_fall_back_to_default() {
        let ns = Namespace::new("", None);
        assert_eq!(ns.name(), "default");
    }

    #[test]
    fn compute_without_backend_is_a_no_op() {
        let ns = Namespace::new("test", None);
        let graph = ComputeGraph::new("plan", 4);
        assert!(ns.compute(&graph).is_ok());
    }
}
