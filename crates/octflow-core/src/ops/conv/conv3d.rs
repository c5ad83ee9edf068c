//! 3D convolution operations
//!
//! Standard cross-correlation over NCDHW tensors with explicit zero padding and
//! dilation, the primitive behind every elementary kernel of an octave layer.

use super::super::ncdhw_dims;
use crate::{Result, Tensor, TensorError};
use num_traits::Float;
use scirs2_core::ndarray::{ArrayD, IxDyn};

/// Geometry of a 3D convolution, per spatial axis `(depth, height, width)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Conv3dParams {
    pub stride: (usize, usize, usize),
    pub padding: (usize, usize, usize),
    pub dilation: (usize, usize, usize),
}

impl Default for Conv3dParams {
    fn default() -> Self {
        Self {
            stride: (1, 1, 1),
            padding: (0, 0, 0),
            dilation: (1, 1, 1),
        }
    }
}

impl Conv3dParams {
    pub fn new(
        stride: (usize, usize, usize),
        padding: (usize, usize, usize),
        dilation: (usize, usize, usize),
    ) -> Self {
        Self {
            stride,
            padding,
            dilation,
        }
    }

    /// Output `(depth, height, width)` for the given input extent and kernel,
    /// or `None` when the dilated kernel does not fit inside the padded input.
    pub fn output_extent(
        &self,
        input: (usize, usize, usize),
        kernel: (usize, usize, usize),
    ) -> Option<(usize, usize, usize)> {
        Some((
            axis_extent(input.0, kernel.0, self.stride.0, self.padding.0, self.dilation.0)?,
            axis_extent(input.1, kernel.1, self.stride.1, self.padding.1, self.dilation.1)?,
            axis_extent(input.2, kernel.2, self.stride.2, self.padding.2, self.dilation.2)?,
        ))
    }

    fn validate(&self) -> Result<()> {
        let (s, d) = (self.stride, self.dilation);
        if s.0 == 0 || s.1 == 0 || s.2 == 0 {
            return Err(TensorError::invalid_argument_op(
                "conv3d",
                &format!("stride must be positive, got {s:?}"),
            ));
        }
        if d.0 == 0 || d.1 == 0 || d.2 == 0 {
            return Err(TensorError::invalid_argument_op(
                "conv3d",
                &format!("dilation must be positive, got {d:?}"),
            ));
        }
        Ok(())
    }
}

fn axis_extent(
    input: usize,
    kernel: usize,
    stride: usize,
    padding: usize,
    dilation: usize,
) -> Option<usize> {
    if kernel == 0 || stride == 0 {
        return None;
    }
    let effective = dilation * (kernel - 1) + 1;
    let padded = input + 2 * padding;
    if padded < effective {
        return None;
    }
    Some((padded - effective) / stride + 1)
}

/// Performs 3D convolution operation
/// Input shape: [batch, in_channels, depth, height, width] (NCDHW format)
/// Weight shape: [out_channels, in_channels, kernel_depth, kernel_height, kernel_width]
/// Bias shape: [out_channels]
/// Output shape: [batch, out_channels, out_depth, out_height, out_width]
pub fn conv3d<T>(
    input: &Tensor<T>,
    weight: &Tensor<T>,
    bias: Option<&Tensor<T>>,
    params: Conv3dParams,
) -> Result<Tensor<T>>
where
    T: Float + Send + Sync + 'static,
{
    params.validate()?;

    let (batch_size, in_channels, in_depth, in_height, in_width) = ncdhw_dims(input, "conv3d")?;
    let (out_channels, weight_in_channels, kernel_depth, kernel_height, kernel_width) =
        ncdhw_dims(weight, "conv3d")?;

    if in_channels != weight_in_channels {
        return Err(TensorError::shape_mismatch(
            "conv3d",
            &format!("input channels={weight_in_channels}"),
            &format!("input channels={in_channels}"),
        ));
    }

    let bias_values = match bias {
        Some(bias) => {
            if bias.shape().dims() != [out_channels] {
                return Err(TensorError::shape_mismatch(
                    "conv3d",
                    &format!("bias shape [{out_channels}]"),
                    &format!("bias shape {}", bias.shape()),
                ));
            }
            Some(bias.to_vec())
        }
        None => None,
    };

    let (out_depth, out_height, out_width) = params
        .output_extent(
            (in_depth, in_height, in_width),
            (kernel_depth, kernel_height, kernel_width),
        )
        .filter(|&(d, h, w)| d > 0 && h > 0 && w > 0)
        .ok_or_else(|| {
            TensorError::invalid_shape(
                "conv3d",
                &format!(
                    "kernel {:?} with padding {:?} and dilation {:?} does not fit input {:?}",
                    (kernel_depth, kernel_height, kernel_width),
                    params.padding,
                    params.dilation,
                    (in_depth, in_height, in_width)
                ),
                input.shape().dims(),
            )
        })?;

    let input_data = input.to_vec();
    let weight_data = weight.to_vec();

    let in_volume = in_depth * in_height * in_width;
    let kernel_volume = kernel_depth * kernel_height * kernel_width;
    let out_volume = out_depth * out_height * out_width;

    let (sd, sh, sw) = params.stride;
    let (pd, ph, pw) = params.padding;
    let (dd, dh, dw) = params.dilation;

    let mut output = vec![T::zero(); batch_size * out_channels * out_volume];

    for b in 0..batch_size {
        for oc in 0..out_channels {
            let start = bias_values.as_ref().map_or(T::zero(), |values| values[oc]);
            let out_base = (b * out_channels + oc) * out_volume;

            for od in 0..out_depth {
                for oh in 0..out_height {
                    for ow in 0..out_width {
                        let mut sum = start;

                        for ic in 0..in_channels {
                            let in_base = (b * in_channels + ic) * in_volume;
                            let w_base = (oc * in_channels + ic) * kernel_volume;

                            for kd in 0..kernel_depth {
                                // Skip taps that fall into the zero padding
                                let Some(id) = tap(od * sd + kd * dd, pd, in_depth) else {
                                    continue;
                                };
                                for kh in 0..kernel_height {
                                    let Some(ih) = tap(oh * sh + kh * dh, ph, in_height) else {
                                        continue;
                                    };
                                    for kw in 0..kernel_width {
                                        let Some(iw) = tap(ow * sw + kw * dw, pw, in_width) else {
                                            continue;
                                        };
                                        let input_idx =
                                            in_base + (id * in_height + ih) * in_width + iw;
                                        let weight_idx = w_base
                                            + (kd * kernel_height + kh) * kernel_width
                                            + kw;
                                        sum = sum + input_data[input_idx] * weight_data[weight_idx];
                                    }
                                }
                            }
                        }

                        output[out_base + (od * out_height + oh) * out_width + ow] = sum;
                    }
                }
            }
        }
    }

    let array = ArrayD::from_shape_vec(
        IxDyn(&[batch_size, out_channels, out_depth, out_height, out_width]),
        output,
    )?;
    Ok(Tensor::from_array(array))
}

/// Map a position in padded coordinates back to the input, if it lies inside it
#[inline]
fn tap(padded_pos: usize, padding: usize, extent: usize) -> Option<usize> {
    let pos = padded_pos.checked_sub(padding)?;
    (pos < extent).then_some(pos)
}
