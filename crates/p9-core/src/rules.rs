use crate::buffer::{Buffer, ElementType};
use crate::membrane::Membrane;

/// Predicate deciding which of a membrane's objects a rule fires on.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RulePattern {
    /// Every float-viewable object.
    Any,
    /// Objects reporting exactly this element type.
    ElementType(ElementType),
    /// Objects with at least this many elements.
    MinElements(usize),
}

/// In-place mutation a rule performs on a matching object's float view.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RuleAction {
    Scale(f32),
    Fill(f32),
    Clamp { min: f32, max: f32 },
}

/// One object-rewriting rule of the membrane evolution step.
///
/// The upstream system reserves rule storage without defining rule
/// semantics; this pattern/action model is our own extension.  Rules only
/// ever touch objects that expose a float view, so quantized and foreign
/// buffers are immune to evolution.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule {
    pub pattern: RulePattern,
    pub action: RuleAction,
}

impl Rule {
    pub fn new(pattern: RulePattern, action: RuleAction) -> Self {
        Self { pattern, action }
    }

    fn matches(&self, buffer: &dyn Buffer) -> bool {
        match self.pattern {
            RulePattern::Any => true,
            RulePattern::ElementType(element_type) => buffer.element_type() == element_type,
            RulePattern::MinElements(count) => buffer.element_count() >= count,
        }
    }

    fn apply(&self, data: &mut [f32]) {
        match self.action {
            RuleAction::Scale(factor) => {
                for value in data.iter_mut() {
                    *value *= factor;
                }
            }
            RuleAction::Fill(value) => data.fill(value),
            RuleAction::Clamp { min, max } => {
                for value in data.iter_mut() {
                    *value = value.clamp(min, max);
                }
            }
        }
    }
}

/// Outcome of one evolution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvolveReport {
    pub nodes_visited: usize,
    pub rule_applications: usize,
}

impl Membrane {
    /// Runs one P-system evolution step over the subtree rooted here.
    ///
    /// Preorder traversal; at each node every stored rule is applied in
    /// insertion order to every matching float-viewable object.  A tree
    /// without rules recurses everywhere and mutates nothing.
    pub fn evolve(&self) -> EvolveReport {
        let mut report = EvolveReport::default();
        self.for_each_preorder(&mut |membrane| {
            report.nodes_visited += 1;
            let rules = membrane.0.borrow().rules.clone();
            if rules.is_empty() {
                return;
            }
            for object in membrane.objects() {
                let mut buffer = object.borrow_mut();
                for rule in &rules {
                    if !rule.matches(&*buffer) {
                        continue;
                    }
                    if let Some(data) = buffer.as_float_slice_mut() {
                        rule.apply(data);
                        report.rule_applications += 1;
                    }
                }
            }
        });
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{DenseBuffer, QuantKind};

    #[test]
    fn evolution_without_rules_visits_and_leaves_data_alone() {
        let root = Membrane::new("root", 0);
        let child = Membrane::new("child", 1);
        root.add_child(&child).unwrap();
        let buffer = DenseBuffer::filled(8, 2.0).into_ref();
        child.add_object(buffer.clone()).unwrap();

        let report = root.evolve();
        assert_eq!(report.nodes_visited, 2);
        assert_eq!(report.rule_applications, 0);
        assert_eq!(buffer.borrow().raw(), &[2.0; 8]);
    }

    #[test]
    fn rules_fire_in_insertion_order_on_matching_objects() {
        let membrane = Membrane::new("m", 0);
        let buffer = DenseBuffer::filled(4, 1.0).into_ref();
        membrane.add_object(buffer.clone()).unwrap();
        membrane
            .add_rule(Rule::new(RulePattern::Any, RuleAction::Scale(3.0)))
            .unwrap();
        membrane
            .add_rule(Rule::new(
                RulePattern::Any,
                RuleAction::Clamp { min: 0.0, max: 2.0 },
            ))
            .unwrap();

        let report = membrane.evolve();
        assert_eq!(report.rule_applications, 2);
        // Scale to 3.0 first, then clamp down to 2.0.
        assert_eq!(buffer.borrow().raw(), &[2.0; 4]);
    }

    #[test]
    fn quantized_objects_are_immune_to_rules() {
        let membrane = Membrane::new("m", 0);
        let buffer = DenseBuffer::filled(4, 1.0)
            .with_element_type(ElementType::Quantized(QuantKind::Q8))
            .into_ref();
        membrane.add_object(buffer.clone()).unwrap();
        membrane
            .add_rule(Rule::new(RulePattern::Any, RuleAction::Fill(9.0)))
            .unwrap();

        let report = membrane.evolve();
        assert_eq!(report.rule_applications, 0);
        assert_eq!(buffer.borrow().raw(), &[1.0; 4]);
    }

    #[test]
    fn min_elements_pattern_gates_small_objects() {
        let membrane = Membrane::new("m", 0);
        let small = DenseBuffer::filled(2, 1.0).into_ref();
        let large = DenseBuffer::filled(16, 1.0).into_ref();
        membrane.add_object(small.clone()).unwrap();
        membrane.add_object(large.clone()).unwrap();
        membrane
            .add_rule(Rule::new(RulePattern::MinElements(10), RuleAction::Scale(0.5)))
            .unwrap();

        membrane.evolve();
        assert_eq!(small.borrow().raw(), &[1.0; 2]);
        assert_eq!(large.borrow().raw(), &[0.5; 16]);
    }
}
