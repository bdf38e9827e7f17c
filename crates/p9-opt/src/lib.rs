//! Transformation passes over p9ml membrane trees.
//!
//! Every pass shares one traversal contract: depth-first preorder, children
//! in insertion order, self-action before recursion.  The routines here are
//! intentionally lightweight simulations: noise injection stands in for
//! quantization error, tiling hands each element group to a caller-supplied
//! hook, and mixed-precision selection records routing decisions without
//! rewriting any storage.  Each pass returns a compact report describing
//! what it touched.

pub mod mixed_precision;
pub mod quantization;
pub mod report;
pub mod synthetic;
pub mod tiled;

pub use mixed_precision::mixed_precision_quant;
pub use quantization::apply_data_free_quant;
pub use report::{
    DataFreeReport, MixedPrecisionReport, PassError, PrecisionAssignment, TiledReport,
};
pub use synthetic::generate_synthetic_data;
pub use tiled::{forward_tiled_quant, TilePassthrough, TileTransform};

pub use p9_core::TransformConfig;
