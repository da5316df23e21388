/// Memory order of the input tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorLayout {
    /// `[1, 3, size, size]`
    Nchw,
    /// `[1, size, size, 3]`
    Nhwc,
}

impl TensorLayout {
    pub fn shape(&self, size: usize) -> [usize; 4] {
        match self {
            TensorLayout::Nchw => [1, 3, size, size],
            TensorLayout::Nhwc => [1, size, size, 3],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// `value / 255`
    ZeroToOne,
    /// `value / 127.5 - 1`
    MinusOneToOne,
}

impl Normalization {
    pub fn apply(&self, value: u8) -> f32 {
        match self {
            Normalization::ZeroToOne => value as f32 / 255.0,
            Normalization::MinusOneToOne => value as f32 / 127.5 - 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelInputConfig {
    /// Overrides the image size declared by the model metadata.
    pub size: Option<u32>,
    pub layout: TensorLayout,
    pub normalization: Normalization,
    /// Apply softmax to raw outputs, for graphs that end in logits.
    pub softmax: bool,
}

impl Default for ModelInputConfig {
    fn default() -> Self {
        // Teachable Machine image exports
        Self {
            size: None,
            layout: TensorLayout::Nhwc,
            normalization: Normalization::MinusOneToOne,
            softmax: false,
        }
    }
}
