use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Family of already-quantized storage formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QuantKind {
    Q4,
    Q8,
}

/// Element type reported by a buffer.
///
/// Only plain floating-point buffers expose a mutable float view; quantized
/// and foreign storage must be skipped by the transformation passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementType {
    F32,
    F16,
    Quantized(QuantKind),
    Other,
}

impl ElementType {
    /// Whether the transformation passes may perturb this storage in place.
    pub fn is_plain_float(self) -> bool {
        matches!(self, ElementType::F32 | ElementType::F16)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementType::F32 => write!(f, "f32"),
            ElementType::F16 => write!(f, "f16"),
            ElementType::Quantized(QuantKind::Q4) => write!(f, "q4"),
            ElementType::Quantized(QuantKind::Q8) => write!(f, "q8"),
            ElementType::Other => write!(f, "other"),
        }
    }
}

/// Capability the membrane layer requires from an externally owned parameter
/// buffer.  Membranes never allocate or free these; the allocating context
/// keeps its own handle and outlives every membrane referencing the buffer.
pub trait Buffer {
    fn element_count(&self) -> usize;
    fn element_type(&self) -> ElementType;
    /// Read-only float view, present only for plain-float storage.
    fn as_float_slice(&self) -> Option<&[f32]>;
    /// Mutable float view, present only for plain-float storage.
    fn as_float_slice_mut(&mut self) -> Option<&mut [f32]>;
}

/// Shared handle to an externally owned buffer.
pub type BufferRef = Rc<RefCell<dyn Buffer>>;

/// Vec-backed buffer used by tests, demos, and synthetic data generation.
///
/// Half-precision and quantized storage are simulated: the payload is always
/// `f32`, and the element-type tag alone decides whether the float view is
/// exposed.
#[derive(Debug, Clone)]
pub struct DenseBuffer {
    data: Vec<f32>,
    element_type: ElementType,
}

impl DenseBuffer {
    pub fn from_vec(data: Vec<f32>) -> Self {
        Self {
            data,
            element_type: ElementType::F32,
        }
    }

    pub fn zeros(len: usize) -> Self {
        Self::from_vec(vec![0.0; len])
    }

    pub fn filled(len: usize, value: f32) -> Self {
        Self::from_vec(vec![value; len])
    }

    /// Tags the buffer with a different element type, keeping the payload.
    pub fn with_element_type(mut self, element_type: ElementType) -> Self {
        self.element_type = element_type;
        self
    }

    /// Raw payload, regardless of the element-type tag.
    pub fn raw(&self) -> &[f32] {
        &self.data
    }

    /// Wraps the buffer in a shared handle suitable for membrane attachment.
    pub fn into_ref(self) -> Rc<RefCell<DenseBuffer>> {
        Rc::new(RefCell::new(self))
    }
}

impl Buffer for DenseBuffer {
    fn element_count(&self) -> usize {
        self.data.len()
    }

    fn element_type(&self) -> ElementType {
        self.element_type
    }

    fn as_float_slice(&self) -> Option<&[f32]> {
        if self.element_type.is_plain_float() {
            Some(&self.data)
        } else {
            None
        }
    }

    fn as_float_slice_mut(&mut self) -> Option<&mut [f32]> {
        if self.element_type.is_plain_float() {
            Some(&mut self.data)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_float_buffers_expose_views() {
        let mut buf = DenseBuffer::filled(4, 1.5);
        assert_eq!(buf.element_count(), 4);
        assert_eq!(buf.element_type(), ElementType::F32);
        assert!(buf.as_float_slice().is_some());
        assert!(buf.as_float_slice_mut().is_some());
    }

    #[test]
    fn quantized_buffers_hide_views() {
        let mut buf =
            DenseBuffer::filled(4, 1.5).with_element_type(ElementType::Quantized(QuantKind::Q8));
        assert!(buf.as_float_slice().is_none());
        assert!(buf.as_float_slice_mut().is_none());
        assert_eq!(buf.raw(), &[1.5; 4]);
    }

    #[test]
    fn element_type_display_names() {
        assert_eq!(ElementType::F32.to_string(), "f32");
        assert_eq!(ElementType::Quantized(QuantKind::Q4).to_string(), "q4");
        assert_eq!(ElementType::Other.to_string(), "other");
    }
}
