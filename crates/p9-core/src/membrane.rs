use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::buffer::BufferRef;
use crate::config::TransformConfig;
use crate::error::{MembraneError, Result};
use crate::namespace::{Namespace, NamespaceInner};
use crate::rules::Rule;

/// Display names are truncated to this many bytes.
pub(crate) const NAME_MAX: usize = 64;

pub const DEFAULT_MAX_CHILDREN: usize = 16;
pub const DEFAULT_MAX_OBJECTS: usize = 256;
pub const DEFAULT_MAX_RULES: usize = 64;

pub(crate) struct MembraneInner {
    pub(crate) name: String,
    pub(crate) level: u32,
    pub(crate) children: Vec<Membrane>,
    pub(crate) parent: Weak<RefCell<MembraneInner>>,
    pub(crate) objects: Vec<BufferRef>,
    pub(crate) namespace: Weak<RefCell<NamespaceInner>>,
    pub(crate) transform_config: Option<TransformConfig>,
    pub(crate) rules: Vec<Rule>,
    pub(crate) max_children: usize,
    pub(crate) max_objects: usize,
    pub(crate) max_rules: usize,
}

/// A node in the membrane hierarchy.
///
/// Handles are cheap clones of a shared node; the tree structure itself is
/// strict ownership: every node is held by exactly one parent (or by the
/// caller, for a root), and dropping the last handle to a root releases the
/// whole subtree postorder.  Parent and namespace back-references are weak
/// and never keep a node alive.
#[derive(Clone)]
pub struct Membrane(pub(crate) Rc<RefCell<MembraneInner>>);

/// Non-owning handle to a membrane, used to observe teardown.
#[derive(Clone)]
pub struct WeakMembrane(Weak<RefCell<MembraneInner>>);

impl WeakMembrane {
    pub fn upgrade(&self) -> Option<Membrane> {
        self.0.upgrade().map(Membrane)
    }
}

fn bounded_name(name: &str) -> String {
    if name.is_empty() {
        return "unnamed".to_string();
    }
    if name.len() <= NAME_MAX {
        return name.to_string();
    }
    let mut end = NAME_MAX;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    name[..end].to_string()
}

impl Membrane {
    /// Creates a detached membrane with the default capacities.
    ///
    /// `level` is caller-supplied depth bookkeeping; it is never validated
    /// against the actual position in the tree.
    pub fn new(name: impl AsRef<str>, level: u32) -> Self {
        Self::with_capacities(
            name,
            level,
            DEFAULT_MAX_CHILDREN,
            DEFAULT_MAX_OBJECTS,
            DEFAULT_MAX_RULES,
        )
    }

    /// Creates a detached membrane with explicit capacity limits.
    pub fn with_capacities(
        name: impl AsRef<str>,
        level: u32,
        max_children: usize,
        max_objects: usize,
        max_rules: usize,
    ) -> Self {
        Membrane(Rc::new(RefCell::new(MembraneInner {
            name: bounded_name(name.as_ref()),
            level,
            children: Vec::new(),
            parent: Weak::new(),
            objects: Vec::new(),
            namespace: Weak::new(),
            transform_config: None,
            rules: Vec::new(),
            max_children,
            max_objects,
            max_rules,
        })))
    }

    pub fn name(&self) -> String {
        self.0.borrow().name.clone()
    }

    pub fn level(&self) -> u32 {
        self.0.borrow().level
    }

    /// Whether two handles point at the same node.
    pub fn ptr_eq(a: &Membrane, b: &Membrane) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    pub fn downgrade(&self) -> WeakMembrane {
        WeakMembrane(Rc::downgrade(&self.0))
    }

    /// Attaches `child` as the last child of this membrane.
    ///
    /// The child copies this membrane's namespace reference as a snapshot at
    /// the moment of attachment; if this membrane joins a namespace later,
    /// the child is not retroactively updated until a full propagation pass
    /// ([`Namespace::set_root`]) is re-run.
    pub fn add_child(&self, child: &Membrane) -> Result<()> {
        {
            let inner = self.0.borrow();
            if inner.children.len() >= inner.max_children {
                return Err(MembraneError::CapacityExceeded {
                    kind: "children",
                    capacity: inner.max_children,
                });
            }
        }
        if child.0.borrow().parent.upgrade().is_some() {
            return Err(MembraneError::InvalidArgument(
                "child is already attached to a parent",
            ));
        }
        if self.has_ancestor_or_self(child) {
            return Err(MembraneError::InvalidArgument(
                "attaching an ancestor would create a cycle",
            ));
        }
        let namespace = self.0.borrow().namespace.clone();
        {
            let mut child_inner = child.0.borrow_mut();
            child_inner.parent = Rc::downgrade(&self.0);
            child_inner.namespace = namespace;
        }
        self.0.borrow_mut().children.push(child.clone());
        Ok(())
    }

    /// Appends a borrowed buffer reference; no ownership is taken and the
    /// buffer's type and shape are not validated.
    pub fn add_object(&self, buffer: BufferRef) -> Result<()> {
        let mut inner = self.0.borrow_mut();
        if inner.objects.len() >= inner.max_objects {
            return Err(MembraneError::CapacityExceeded {
                kind: "objects",
                capacity: inner.max_objects,
            });
        }
        inner.objects.push(buffer);
        Ok(())
    }

    /// Appends an evolution rule, applied by [`Membrane::evolve`] in
    /// insertion order.
    pub fn add_rule(&self, rule: Rule) -> Result<()> {
        let mut inner = self.0.borrow_mut();
        if inner.rules.len() >= inner.max_rules {
            return Err(MembraneError::CapacityExceeded {
                kind: "rules",
                capacity: inner.max_rules,
            });
        }
        inner.rules.push(rule);
        Ok(())
    }

    pub fn parent(&self) -> Option<Membrane> {
        self.0.borrow().parent.upgrade().map(Membrane)
    }

    pub fn namespace(&self) -> Option<Namespace> {
        self.0.borrow().namespace.upgrade().map(Namespace::from_rc)
    }

    /// Handles to the children, in insertion order.
    pub fn children(&self) -> Vec<Membrane> {
        self.0.borrow().children.clone()
    }

    /// Handles to the attached buffers, in insertion order.
    pub fn objects(&self) -> Vec<BufferRef> {
        self.0.borrow().objects.clone()
    }

    pub fn child_count(&self) -> usize {
        self.0.borrow().children.len()
    }

    pub fn child_capacity(&self) -> usize {
        self.0.borrow().max_children
    }

    pub fn object_count(&self) -> usize {
        self.0.borrow().objects.len()
    }

    pub fn object_capacity(&self) -> usize {
        self.0.borrow().max_objects
    }

    pub fn rule_count(&self) -> usize {
        self.0.borrow().rules.len()
    }

    pub fn rule_capacity(&self) -> usize {
        self.0.borrow().max_rules
    }

    /// Copy of the cached transform config, if a pass has stored one.
    pub fn transform_config(&self) -> Option<TransformConfig> {
        self.0.borrow().transform_config
    }

    /// Stores a copy of `config` unless one is already cached.
    ///
    /// First write wins: returns `true` when this call stored the copy and
    /// `false` when an earlier pass already did.
    pub fn set_transform_config_once(&self, config: &TransformConfig) -> bool {
        let mut inner = self.0.borrow_mut();
        if inner.transform_config.is_none() {
            inner.transform_config = Some(*config);
            true
        } else {
            false
        }
    }

    /// Depth-first preorder visit: self first, then children in insertion
    /// order.  Every transformation pass shares this traversal.
    pub fn for_each_preorder<F: FnMut(&Membrane)>(&self, visit: &mut F) {
        visit(self);
        let children = self.children();
        for child in &children {
            child.for_each_preorder(visit);
        }
    }

    /// Whether `other` is this membrane or one of its ancestors.
    fn has_ancestor_or_self(&self, other: &Membrane) -> bool {
        if Membrane::ptr_eq(self, other) {
            return true;
        }
        let mut current = self.parent();
        while let Some(node) = current {
            if Membrane::ptr_eq(&node, other) {
                return true;
            }
            current = node.parent();
        }
        false
    }
}

impl std::fmt::Debug for Membrane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.0.borrow();
        f.debug_struct("Membrane")
            .field("name", &inner.name)
            .field("level", &inner.level)
            .field("children", &inner.children.len())
            .field("objects", &inner.objects.len())
            .field("rules", &inner.rules.len())
            .field("has_config", &inner.transform_config.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_bounded_and_defaulted() {
        let long = "m".repeat(200);
        let membrane = Membrane::new(&long, 0);
        assert_eq!(membrane.name().len(), NAME_MAX);

        let unnamed = Membrane::new("", 3);
        assert_eq!(unnamed.name(), "unnamed");
        assert_eq!(unnamed.level(), 3);
    }

    #[test]
    fn fresh_membranes_are_detached_and_empty() {
        let membrane = Membrane::new("root", 0);
        assert!(membrane.parent().is_none());
        assert!(membrane.namespace().is_none());
        assert!(membrane.transform_config().is_none());
        assert_eq!(membrane.child_count(), 0);
        assert_eq!(membrane.object_count(), 0);
        assert_eq!(membrane.child_capacity(), DEFAULT_MAX_CHILDREN);
        assert_eq!(membrane.object_capacity(), DEFAULT_MAX_OBJECTS);
        assert_eq!(membrane.rule_capacity(), DEFAULT_MAX_RULES);
    }

    #[test]
    fn preorder_visits_self_before_children_in_insertion_order() {
        let root = Membrane::new("root", 0);
        let a = Membrane::new("a", 1);
        let b = Membrane::new("b", 1);
        let a1 = Membrane::new("a1", 2);
        root.add_child(&a).unwrap();
        root.add_child(&b).unwrap();
        a.add_child(&a1).unwrap();

        let mut order = Vec::new();
        root.for_each_preorder(&mut |m| order.push(m.name()));
        assert_eq!(order, ["root", "a", "a1", "b"]);
    }
}
