use crate::buffer::ElementType;

/// Immutable description of a quantization/transform pass.
///
/// A membrane caches a copy of the first config ever applied to it and keeps
/// that copy for its whole lifetime; later passes with different settings do
/// not overwrite it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransformConfig {
    /// Representation the pass is steering the parameters towards.
    pub target_type: ElementType,
    /// Half-width of the uniform perturbation interval, `>= 0`.
    pub noise_scale: f32,
    pub per_channel: bool,
    pub mixed_precision: bool,
    /// Simulated-training scalars; stored but not exercised by any pass.
    pub temperature: f32,
    pub num_steps: u32,
    pub learning_rate: f32,
    /// Elements per processing tile for the tiled pass.
    pub tile_size: usize,
    /// Whether the tiled pass consults a reference buffer when one is given.
    pub use_reference: bool,
    /// Explicit RNG seed; falls back to the deterministic runtime config
    /// when absent.
    pub seed: Option<u64>,
}

impl TransformConfig {
    /// Builds a config with the stock simulated-training parameters.
    pub fn new(target_type: ElementType, noise_scale: f32) -> Self {
        Self {
            target_type,
            noise_scale,
            per_channel: true,
            mixed_precision: false,
            temperature: 1.0,
            num_steps: 100,
            learning_rate: 1e-3,
            tile_size: 3,
            use_reference: true,
            seed: None,
        }
    }

    pub fn with_tile_size(mut self, tile_size: usize) -> Self {
        self.tile_size = tile_size;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_mixed_precision(mut self, enabled: bool) -> Self {
        self.mixed_precision = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::QuantKind;

    #[test]
    fn stock_parameters() {
        let config = TransformConfig::new(ElementType::Quantized(QuantKind::Q4), 0.1);
        assert_eq!(config.noise_scale, 0.1);
        assert!(config.per_channel);
        assert!(!config.mixed_precision);
        assert_eq!(config.temperature, 1.0);
        assert_eq!(config.num_steps, 100);
        assert_eq!(config.tile_size, 3);
        assert!(config.use_reference);
        assert!(config.seed.is_none());
    }

    #[test]
    fn builders_override_selected_fields() {
        let config = TransformConfig::new(ElementType::F16, 0.0)
            .with_tile_size(8)
            .with_seed(7)
            .with_mixed_precision(true);
        assert_eq!(config.tile_size, 8);
        assert_eq!(config.seed, Some(7));
        assert!(config.mixed_precision);
    }
}
