//! Method forms of the free functions in [`crate::ops`]

use super::core::Tensor;
use crate::Result;
use num_traits::{Float, FromPrimitive};

impl<T> Tensor<T>
where
    T: Float + FromPrimitive + Send + Sync + 'static,
{
    /// Element-wise addition; shapes must match exactly
    pub fn add(&self, other: &Self) -> Result<Self> {
        crate::ops::add(self, other)
    }

    /// Average pooling over the three spatial axes
    pub fn avg_pool3d(
        &self,
        kernel_size: (usize, usize, usize),
        stride: (usize, usize, usize),
    ) -> Result<Self> {
        crate::ops::avg_pool3d(self, kernel_size, stride)
    }

    /// Nearest-neighbour upsampling over the three spatial axes
    pub fn upsample_nearest3d(&self, scale: (usize, usize, usize)) -> Result<Self> {
        crate::ops::upsample_nearest3d(self, scale)
    }
}
