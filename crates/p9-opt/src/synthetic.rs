use p9_core::DenseBuffer;
use rand::Rng;

use crate::report::PassError;

/// Generates a calibration buffer filled with uniform noise in
/// `[-noise_scale, +noise_scale]`.
///
/// Stands in for real calibration data during data-free passes.  Shape is
/// not modelled; callers that think in tensors collapse their dimensions to
/// an element count.
pub fn generate_synthetic_data(
    len: usize,
    noise_scale: f32,
    seed: Option<u64>,
) -> Result<DenseBuffer, PassError> {
    if noise_scale < 0.0 || !noise_scale.is_finite() {
        return Err(PassError::InvalidNoiseScale { scale: noise_scale });
    }
    if noise_scale == 0.0 {
        return Ok(DenseBuffer::zeros(len));
    }

    let mut rng = p9_config::determinism::rng_from_optional(seed, "p9ml.synthetic_data");
    let data = (0..len)
        .map(|_| rng.gen_range(-noise_scale..=noise_scale))
        .collect();
    Ok(DenseBuffer::from_vec(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use p9_core::{Buffer, ElementType};

    #[test]
    fn generated_data_stays_within_the_noise_interval() {
        let buffer = generate_synthetic_data(256, 0.5, Some(3)).unwrap();
        assert_eq!(buffer.element_count(), 256);
        assert_eq!(buffer.element_type(), ElementType::F32);
        assert!(buffer.raw().iter().all(|v| (-0.5..=0.5).contains(v)));
        assert!(buffer.raw().iter().any(|v| *v != 0.0));
    }

    #[test]
    fn zero_scale_yields_zeros() {
        let buffer = generate_synthetic_data(16, 0.0, None).unwrap();
        assert!(buffer.raw().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn explicit_seeds_reproduce() {
        let first = generate_synthetic_data(64, 1.0, Some(77)).unwrap();
        let second = generate_synthetic_data(64, 1.0, Some(77)).unwrap();
        assert_eq!(first.raw(), second.raw());
    }
}
