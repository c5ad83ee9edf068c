//! Nearest-neighbour upsampling by integer scale factors

use super::super::ncdhw_dims;
use crate::{Result, Tensor, TensorError};
use num_traits::Float;
use scirs2_core::ndarray::{ArrayD, IxDyn};

/// Nearest-neighbour upsampling 3D operation
/// Input shape: [batch, channels, depth, height, width] (NCDHW format)
/// Output shape: [batch, channels, depth * sd, height * sh, width * sw]
pub fn upsample_nearest3d<T>(input: &Tensor<T>, scale: (usize, usize, usize)) -> Result<Tensor<T>>
where
    T: Float + Send + Sync + 'static,
{
    let (batch_size, channels, input_depth, input_height, input_width) =
        ncdhw_dims(input, "upsample_nearest3d")?;

    let (sd, sh, sw) = scale;
    if sd == 0 || sh == 0 || sw == 0 {
        return Err(TensorError::invalid_argument_op(
            "upsample_nearest3d",
            &format!("scale factors must be positive, got {scale:?}"),
        ));
    }

    let output_depth = input_depth * sd;
    let output_height = input_height * sh;
    let output_width = input_width * sw;

    let input_data = input.to_vec();
    let in_volume = input_depth * input_height * input_width;
    let out_volume = output_depth * output_height * output_width;
    let mut output_data = Vec::with_capacity(batch_size * channels * out_volume);

    for plane in 0..batch_size * channels {
        let in_base = plane * in_volume;
        for od in 0..output_depth {
            for oh in 0..output_height {
                let row = in_base + ((od / sd) * input_height + oh / sh) * input_width;
                output_data.extend((0..output_width).map(|ow| input_data[row + ow / sw]));
            }
        }
    }

    let array = ArrayD::from_shape_vec(
        IxDyn(&[
            batch_size,
            channels,
            output_depth,
            output_height,
            output_width,
        ]),
        output_data,
    )?;
    Ok(Tensor::from_array(array))
}
