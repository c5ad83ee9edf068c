pub mod binary;
pub mod conv;
pub mod pooling;
pub mod resize;

pub use binary::add;
pub use conv::{conv3d, Conv3dParams};
pub use pooling::avg_pool3d;
pub use resize::upsample_nearest3d;

/// Reject tensors that are not NCDHW, returning `(batch, channels, depth, height, width)`
pub(crate) fn ncdhw_dims<T>(
    tensor: &crate::Tensor<T>,
    operation: &str,
) -> crate::Result<(usize, usize, usize, usize, usize)> {
    let dims = tensor.shape().dims();
    if dims.len() != 5 {
        return Err(crate::TensorError::invalid_shape(
            operation,
            &format!(
                "expects 5D input [batch, channels, depth, height, width], got {}D",
                dims.len()
            ),
            dims,
        ));
    }
    Ok((dims[0], dims[1], dims[2], dims[3], dims[4]))
}
