use p9_core::{Membrane, TransformConfig};
use rand::Rng;
use tracing::debug;

use crate::report::{DataFreeReport, PassError};

/// Applies the data-free quantization simulation to a membrane subtree.
///
/// Preorder over the tree; at each node the pass first caches a copy of
/// `config` (first write wins — a node that already carries a config keeps
/// it), then perturbs every element of every plain-float buffer with an
/// independent uniform draw from `[-noise_scale, +noise_scale]`.  Buffers
/// reporting quantized or foreign storage are skipped bit-for-bit.  No
/// actual bit-width reduction occurs; the noise approximates calibration
/// error in the absence of real data.
pub fn apply_data_free_quant(
    root: &Membrane,
    config: &TransformConfig,
) -> Result<DataFreeReport, PassError> {
    if config.noise_scale < 0.0 || !config.noise_scale.is_finite() {
        return Err(PassError::InvalidNoiseScale {
            scale: config.noise_scale,
        });
    }

    let mut rng = p9_config::determinism::rng_from_optional(config.seed, "p9ml.data_free_quant");
    let mut report = DataFreeReport::default();

    root.for_each_preorder(&mut |membrane| {
        report.nodes_visited += 1;
        if membrane.set_transform_config_once(config) {
            report.configs_stored += 1;
        }
        for object in membrane.objects() {
            let mut buffer = object.borrow_mut();
            if !buffer.element_type().is_plain_float() {
                report.buffers_skipped += 1;
                continue;
            }
            let Some(data) = buffer.as_float_slice_mut() else {
                report.buffers_skipped += 1;
                continue;
            };
            if config.noise_scale > 0.0 {
                for value in data.iter_mut() {
                    *value += rng.gen_range(-config.noise_scale..=config.noise_scale);
                }
            }
            report.buffers_processed += 1;
            report.elements_touched += data.len();
        }
    });

    debug!(
        target: "p9ml::opt",
        nodes = report.nodes_visited,
        buffers = report.buffers_processed,
        skipped = report.buffers_skipped,
        elements = report.elements_touched,
        "data-free quantization pass complete"
    );
    Ok(report)
}
