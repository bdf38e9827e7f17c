use p9_core::{ElementType, Membrane, QuantKind};
use tracing::debug;

use crate::report::{MixedPrecisionReport, PassError, PrecisionAssignment};

/// Buffers above this element count are treated as "large" and routed
/// towards more aggressive precision.
pub const LARGE_BUFFER_ELEMENTS: usize = 1_000_000;

/// Selects a target precision for every buffer in a membrane subtree.
///
/// Pure analysis: nothing is rewritten, the routing decisions are only
/// recorded in the report.  `quality_threshold` must lie in `0.0..=1.0`; a
/// higher threshold prefers higher precision on both sides of the
/// large/small split.
pub fn mixed_precision_quant(
    root: &Membrane,
    quality_threshold: f32,
) -> Result<MixedPrecisionReport, PassError> {
    if !(0.0..=1.0).contains(&quality_threshold) {
        return Err(PassError::InvalidThreshold {
            value: quality_threshold,
        });
    }

    let mut report = MixedPrecisionReport::default();
    root.for_each_preorder(&mut |membrane| {
        report.nodes_visited += 1;
        for object in membrane.objects() {
            let buffer = object.borrow();
            let element_count = buffer.element_count();
            report.assignments.push(PrecisionAssignment {
                membrane: membrane.name(),
                element_count,
                current: buffer.element_type(),
                selected: select_precision(element_count, quality_threshold),
            });
        }
    });

    debug!(
        target: "p9ml::opt",
        nodes = report.nodes_visited,
        assignments = report.assignments.len(),
        quantized = report.quantized_count(),
        "mixed-precision selection pass complete"
    );
    Ok(report)
}

/// Precision ladder: large buffers absorb aggressive quantization, small
/// ones keep headroom, and the quality threshold moves both classes one
/// rung towards higher precision.
fn select_precision(element_count: usize, quality_threshold: f32) -> ElementType {
    let large = element_count > LARGE_BUFFER_ELEMENTS;
    if large {
        if quality_threshold >= 0.9 {
            ElementType::F16
        } else if quality_threshold >= 0.5 {
            ElementType::Quantized(QuantKind::Q8)
        } else {
            ElementType::Quantized(QuantKind::Q4)
        }
    } else if quality_threshold >= 0.5 {
        ElementType::F32
    } else {
        ElementType::F16
    }
}
