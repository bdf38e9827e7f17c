use p9_core::ElementType;
use thiserror::Error;

/// Errors that can be emitted by the transformation passes.
#[derive(Debug, Error)]
pub enum PassError {
    #[error("tile size must be greater than zero")]
    InvalidTileSize,
    #[error("noise scale must be finite and non-negative, got {scale}")]
    InvalidNoiseScale { scale: f32 },
    #[error("quality threshold {value} outside 0.0..=1.0")]
    InvalidThreshold { value: f32 },
}

/// Summary emitted by the data-free quantization simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "report-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataFreeReport {
    pub nodes_visited: usize,
    /// Nodes that cached the pass config on this call (first write wins).
    pub configs_stored: usize,
    pub buffers_processed: usize,
    /// Buffers left bit-for-bit untouched because they expose no float view.
    pub buffers_skipped: usize,
    pub elements_touched: usize,
}

/// Summary emitted by the tiled processing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "report-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TiledReport {
    pub nodes_visited: usize,
    pub buffers_processed: usize,
    pub buffers_skipped: usize,
    pub tiles_processed: usize,
    /// Trailing tiles shorter than the configured tile size.
    pub short_tiles: usize,
}

/// One routing decision of the mixed-precision pass.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "report-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrecisionAssignment {
    /// Name of the membrane holding the buffer.
    pub membrane: String,
    pub element_count: usize,
    pub current: ElementType,
    pub selected: ElementType,
}

/// Summary emitted by the mixed-precision selection pass.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "report-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MixedPrecisionReport {
    pub nodes_visited: usize,
    pub assignments: Vec<PrecisionAssignment>,
}

impl MixedPrecisionReport {
    /// Buffers routed to an already-quantized representation.
    pub fn quantized_count(&self) -> usize {
        self.assignments
            .iter()
            .filter(|a| matches!(a.selected, ElementType::Quantized(_)))
            .count()
    }
}
