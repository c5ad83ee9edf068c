//! Element-wise binary operations
//!
//! Octave branches are summed only when both operands already sit at the same
//! resolution, so unlike general broadcasting arithmetic the operands here must
//! have identical shapes.

use crate::{Result, Tensor, TensorError};
use num_traits::Float;

/// Element-wise addition of two tensors with identical shapes
pub fn add<T>(a: &Tensor<T>, b: &Tensor<T>) -> Result<Tensor<T>>
where
    T: Float + Send + Sync + 'static,
{
    if !a.same_shape(b) {
        return Err(TensorError::shape_mismatch(
            "add",
            &a.shape().to_string(),
            &b.shape().to_string(),
        ));
    }

    Ok(Tensor::from_array(&a.data + &b.data))
}
