//! Nearest-neighbour upsampling layer

use crate::layers::{Layer, LayerType};
use num_traits::{Float, FromPrimitive};
use octflow_core::{Result, Tensor};

/// 3D nearest-neighbour upsampling by integer factors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Upsample3D {
    scale: (usize, usize, usize),
}

impl Upsample3D {
    pub fn new(scale: (usize, usize, usize)) -> Self {
        Self { scale }
    }

    /// Scale 2 on every spatial axis: doubles the resolution
    pub const fn doubling() -> Self {
        Self { scale: (2, 2, 2) }
    }

    pub fn scale(&self) -> (usize, usize, usize) {
        self.scale
    }
}

impl<T> Layer<T> for Upsample3D
where
    T: Float + FromPrimitive + Send + Sync + 'static,
{
    fn forward(&self, input: &Tensor<T>) -> Result<Tensor<T>> {
        octflow_core::ops::upsample_nearest3d(input, self.scale)
    }

    fn parameters(&self) -> Vec<&Tensor<T>> {
        vec![]
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor<T>> {
        vec![]
    }

    fn set_training(&mut self, _training: bool) {}

    fn clone_box(&self) -> Box<dyn Layer<T>> {
        Box::new(*self)
    }

    fn layer_type(&self) -> LayerType {
        LayerType::Upsample3D
    }
}
