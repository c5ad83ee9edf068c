//! Average pooling over the spatial axes of NCDHW tensors
//!
//! Windows are "valid": trailing positions that do not fill a whole window are
//! dropped, so an extent `n` pooled with window `k` and stride `s` becomes
//! `(n - k) / s + 1`.

use super::super::ncdhw_dims;
use crate::{Result, Tensor, TensorError};
use num_traits::{Float, FromPrimitive};
use scirs2_core::ndarray::{ArrayD, IxDyn};

/// Average pooling 3D operation
/// Input shape: [batch, channels, depth, height, width] (NCDHW format)
pub fn avg_pool3d<T>(
    input: &Tensor<T>,
    kernel_size: (usize, usize, usize),
    stride: (usize, usize, usize),
) -> Result<Tensor<T>>
where
    T: Float + FromPrimitive + Send + Sync + 'static,
{
    let (batch_size, channels, input_depth, input_height, input_width) =
        ncdhw_dims(input, "avg_pool3d")?;

    let (kd, kh, kw) = kernel_size;
    if kd == 0 || kh == 0 || kw == 0 || stride.0 == 0 || stride.1 == 0 || stride.2 == 0 {
        return Err(TensorError::invalid_argument_op(
            "avg_pool3d",
            &format!("kernel {kernel_size:?} and stride {stride:?} must be positive"),
        ));
    }
    if input_depth < kd || input_height < kh || input_width < kw {
        return Err(TensorError::invalid_shape(
            "avg_pool3d",
            &format!(
                "window {kernel_size:?} larger than input {:?}",
                (input_depth, input_height, input_width)
            ),
            input.shape().dims(),
        ));
    }

    let output_depth = (input_depth - kd) / stride.0 + 1;
    let output_height = (input_height - kh) / stride.1 + 1;
    let output_width = (input_width - kw) / stride.2 + 1;

    let window = T::from_usize(kd * kh * kw).ok_or_else(|| {
        TensorError::invalid_argument_op("avg_pool3d", "window size not representable")
    })?;

    let input_data = input.to_vec();
    let in_volume = input_depth * input_height * input_width;
    let out_volume = output_depth * output_height * output_width;
    let mut output_data = vec![T::zero(); batch_size * channels * out_volume];

    for plane in 0..batch_size * channels {
        let in_base = plane * in_volume;
        let out_base = plane * out_volume;

        for od in 0..output_depth {
            for oh in 0..output_height {
                for ow in 0..output_width {
                    let d_start = od * stride.0;
                    let h_start = oh * stride.1;
                    let w_start = ow * stride.2;

                    let mut sum = T::zero();
                    for d in d_start..d_start + kd {
                        for h in h_start..h_start + kh {
                            let row = in_base + (d * input_height + h) * input_width;
                            for w in w_start..w_start + kw {
                                sum = sum + input_data[row + w];
                            }
                        }
                    }

                    output_data[out_base + (od * output_height + oh) * output_width + ow] =
                        sum / window;
                }
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_avg_pool3d_halving() {
        let input =
            Tensor::from_vec((0..64).map(|v| v as f32).collect(), &[1, 1, 4, 4, 4]).unwrap();
        let output = avg_pool3d(&input, (2, 2, 2), (2, 2, 2)).unwrap();
        assert_eq!(output.shape().dims(), &[1, 1, 2, 2, 2]);

        // First block covers offsets {0,1} + {0,4} + {0,16}
        let first = (0 + 1 + 4 + 5 + 16 + 17 + 20 + 21) as f32 / 8.0;
        assert_relative_eq!(output.get(&[0, 0, 0, 0, 0]).unwrap(), first);
        // Every block is the first shifted by a constant
        assert_relative_eq!(output.get(&[0, 0, 1, 1, 1]).unwrap(), first + 42.0);
    }

    #[test]
    fn test_avg_pool3d_drops_odd_tail() {
        let input = Tensor::<f32>::ones(&[2, 3, 5, 4, 3]);
        let output = avg_pool3d(&input, (2, 2, 2), (2, 2, 2)).unwrap();
        assert_eq!(output.shape().dims(), &[2, 3, 2, 2, 1]);
        assert!(output.to_vec().iter().all(|&v| (v - 1.0).abs() < 1e-6));
    }

    #[test]
    fn test_avg_pool3d_rejects_small_input() {
        let input = Tensor::<f32>::ones(&[1, 1, 1, 4, 4]);
        assert!(matches!(
            avg_pool3d(&input, (2, 2, 2), (2, 2, 2)),
            Err(TensorError::InvalidShape { .. })
        ));
        assert!(matches!(
            avg_pool3d(&input, (1, 1, 1), (0, 1, 1)),
            Err(TensorError::InvalidArgument { .. })
        ));
    }
}
