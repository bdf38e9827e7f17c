use std::fmt;

use crate::buffer::ElementType;
use crate::membrane::Membrane;
use crate::namespace::Namespace;

/// Read-only snapshot of one membrane, sufficient for an external reporter.
#[derive(Debug, Clone, PartialEq)]
pub struct MembraneStats {
    pub name: String,
    pub level: u32,
    pub objects: usize,
    pub max_objects: usize,
    pub children: usize,
    pub max_children: usize,
    pub rules: usize,
    pub max_rules: usize,
    /// Noise scale and target representation of the cached config, if any.
    pub transform: Option<(f32, ElementType)>,
}

impl MembraneStats {
    pub fn collect(membrane: &Membrane) -> Self {
        Self {
            name: membrane.name(),
            level: membrane.level(),
            objects: membrane.object_count(),
            max_objects: membrane.object_capacity(),
            children: membrane.child_count(),
            max_children: membrane.child_capacity(),
            rules: membrane.rule_count(),
            max_rules: membrane.rule_capacity(),
            transform: membrane
                .transform_config()
                .map(|config| (config.noise_scale, config.target_type)),
        }
    }
}

impl fmt::Display for MembraneStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Membrane '{}' (level {}):", self.name, self.level)?;
        writeln!(f, "  objects:  {}/{}", self.objects, self.max_objects)?;
        writeln!(f, "  children: {}/{}", self.children, self.max_children)?;
        writeln!(f, "  rules:    {}/{}", self.rules, self.max_rules)?;
        match self.transform {
            Some((noise_scale, target_type)) => writeln!(
                f,
                "  transform: enabled (noise={:.3}, target={})",
                noise_scale, target_type
            ),
            None => writeln!(f, "  transform: none"),
        }
    }
}

/// Read-only snapshot of one namespace's bookkeeping statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceStats {
    pub name: String,
    pub total_params: usize,
    pub quantized_params: usize,
    pub compression_ratio: f32,
    pub target_bits: u8,
    pub mixed_precision: bool,
}

impl NamespaceStats {
    pub fn collect(namespace: &Namespace) -> Self {
        Self {
            name: namespace.name(),
            total_params: namespace.total_params(),
            quantized_params: namespace.quantized_params(),
            compression_ratio: namespace.compression_ratio(),
            target_bits: namespace.target_bits(),
            mixed_precision: namespace.mixed_precision(),
        }
    }
}

impl fmt::Display for NamespaceStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Namespace '{}':", self.name)?;
        writeln!(f, "  total params:     {}", self.total_params)?;
        writeln!(f, "  quantized params: {}", self.quantized_params)?;
        writeln!(f, "  compression:      {:.2}x", self.compression_ratio)?;
        writeln!(f, "  target bits:      {}", self.target_bits)?;
        writeln!(
            f,
            "  mixed precision:  {}",
            if self.mixed_precision {
                "enabled"
            } else {
                "disabled"
            }
        )
    }
}
