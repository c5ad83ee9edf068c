use crate::layers::{Layer, LayerType};
use num_traits::{Float, FromPrimitive};
use octflow_core::{Result, Tensor};

/// 3D Average Pooling Layer
///
/// Parameter-free and `Copy`; one value can be shared by every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvgPool3D {
    kernel_size: (usize, usize, usize),
    stride: (usize, usize, usize),
}

impl AvgPool3D {
    pub fn new(kernel_size: (usize, usize, usize), stride: Option<(usize, usize, usize)>) -> Self {
        Self {
            kernel_size,
            stride: stride.unwrap_or(kernel_size),
        }
    }

    /// Window 2, stride 2 on every spatial axis: halves the resolution
    pub const fn halving() -> Self {
        Self {
            kernel_size: (2, 2, 2),
            stride: (2, 2, 2),
        }
    }

    pub fn kernel_size(&self) -> (usize, usize, usize) {
        self.kernel_size
    }

    pub fn stride(&self) -> (usize, usize, usize) {
        self.stride
    }
}

impl<T> Layer<T> for AvgPool3D
where
    T: Float + FromPrimitive + Send + Sync + 'static,
{
    fn forward(&self, input: &Tensor<T>) -> Result<Tensor<T>> {
        octflow_core::ops::avg_pool3d(input, self.kernel_size, self.stride)
    }

    fn parameters(&self) -> Vec<&Tensor<T>> {
        vec![]
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor<T>> {
        vec![]
    }

    fn set_training(&mut self, _training: bool) {
        // Pooling layers don't have different behavior in training/eval mode
    }

    fn clone_box(&self) -> Box<dyn Layer<T>> {
        Box::new(*self)
    }

    fn layer_type(&self) -> LayerType {
        LayerType::AvgPool3D
    }
}
