use std::rc::Rc;

use p9_core::{BufferRef, Membrane, TransformConfig};
use tracing::debug;

use crate::report::{PassError, TiledReport};

/// Per-tile numeric hook of the tiled processing pass.
///
/// The pass owns the tiling and reference alignment; the numeric transform
/// itself is deliberately left to the caller.
pub trait TileTransform {
    fn transform(&mut self, tile: &mut [f32], reference: Option<&[f32]>);
}

/// Hook that performs no numeric change; tiles are only walked.
#[derive(Debug, Default, Clone, Copy)]
pub struct TilePassthrough;

impl TileTransform for TilePassthrough {
    fn transform(&mut self, _tile: &mut [f32], _reference: Option<&[f32]>) {}
}

/// Runs the tiled processing pass over a membrane subtree.
///
/// Every plain-float buffer is partitioned into `config.tile_size`-element
/// tiles (the trailing tile may be short) and each tile is handed to
/// `transform`, together with the aligned slice of `reference` when
/// `config.use_reference` is set and a reference is supplied.  A reference
/// that is the processed buffer itself is ignored for that buffer, as is any
/// reference range past the reference's end.
pub fn forward_tiled_quant(
    root: &Membrane,
    config: &TransformConfig,
    reference: Option<&BufferRef>,
    transform: &mut dyn TileTransform,
) -> Result<TiledReport, PassError> {
    if config.tile_size == 0 {
        return Err(PassError::InvalidTileSize);
    }

    let mut report = TiledReport::default();
    root.for_each_preorder(&mut |membrane| {
        report.nodes_visited += 1;
        for object in membrane.objects() {
            let reference =
                reference.filter(|r| config.use_reference && !Rc::ptr_eq(*r, &object));
            let reference_guard = reference.map(|r| r.borrow());
            let reference_floats = reference_guard
                .as_ref()
                .and_then(|guard| guard.as_float_slice());

            let mut buffer = object.borrow_mut();
            let Some(data) = buffer.as_float_slice_mut() else {
                report.buffers_skipped += 1;
                continue;
            };

            let mut start = 0;
            while start < data.len() {
                let end = (start + config.tile_size).min(data.len());
                let reference_slice = reference_floats.and_then(|floats| floats.get(start..end));
                transform.transform(&mut data[start..end], reference_slice);
                report.tiles_processed += 1;
                if end - start < config.tile_size {
                    report.short_tiles += 1;
                }
                start = end;
            }
            report.buffers_processed += 1;
        }
    });

    debug!(
        target: "p9ml::opt",
        nodes = report.nodes_visited,
        buffers = report.buffers_processed,
        tiles = report.tiles_processed,
        "tiled processing pass complete"
    );
    Ok(report)
}
