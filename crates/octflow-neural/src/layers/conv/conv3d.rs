//! 3D Convolution Layer Implementation
//!
//! This module contains the Conv3D layer for volumetric data. Weights are
//! allocated with fixed shapes at construction; only their values may change
//! afterwards.

use crate::layers::{Layer, LayerType};
use num_traits::{Float, FromPrimitive};
use octflow_core::{ops, Conv3dParams, Result, Tensor, TensorError};

/// 3D Convolutional layer for volumetric data processing
#[derive(Debug, Clone)]
pub struct Conv3D<T> {
    weight: Tensor<T>,
    bias: Option<Tensor<T>>,
    params: Conv3dParams,
    training: bool,
}

impl<T> Conv3D<T>
where
    T: Float,
{
    /// Create a new Conv3D layer with zero-valued parameters
    ///
    /// # Arguments
    /// * `in_channels` - Number of input channels
    /// * `out_channels` - Number of output channels
    /// * `kernel_size` - Size of the convolution kernel (depth, height, width)
    /// * `params` - Stride, zero padding and dilation per spatial axis
    /// * `use_bias` - Whether to include bias term
    pub fn new(
        in_channels: usize,
        out_channels: usize,
        kernel_size: (usize, usize, usize),
        params: Conv3dParams,
        use_bias: bool,
    ) -> Self {
        // Weight shape: [out_channels, in_channels, kernel_depth, kernel_height, kernel_width]
        let weight = Tensor::zeros(&[
            out_channels,
            in_channels,
            kernel_size.0,
            kernel_size.1,
            kernel_size.2,
        ]);
        let bias = use_bias.then(|| Tensor::zeros(&[out_channels]));

        Self {
            weight,
            bias,
            params,
            training: false,
        }
    }

    /// Simplified constructor: unit stride, no padding, no dilation, with bias
    pub fn simple(
        in_channels: usize,
        out_channels: usize,
        kernel_size: (usize, usize, usize),
    ) -> Self {
        Self::new(
            in_channels,
            out_channels,
            kernel_size,
            Conv3dParams::default(),
            true,
        )
    }

    pub fn in_channels(&self) -> usize {
        self.weight.shape()[1]
    }

    pub fn out_channels(&self) -> usize {
        self.weight.shape()[0]
    }

    pub fn kernel_size(&self) -> (usize, usize, usize) {
        let dims = self.weight.shape().dims();
        (dims[2], dims[3], dims[4])
    }

    pub fn params(&self) -> Conv3dParams {
        self.params
    }

    pub fn weight(&self) -> &Tensor<T> {
        &self.weight
    }

    pub fn bias(&self) -> Option<&Tensor<T>> {
        self.bias.as_ref()
    }

    /// Check if the layer is in training mode
    pub fn is_training(&self) -> bool {
        self.training
    }
}

impl<T> Layer<T> for Conv3D<T>
where
    T: Float + FromPrimitive + Send + Sync + 'static,
{
    fn forward(&self, input: &Tensor<T>) -> Result<Tensor<T>> {
        // Input shape: [batch_size, in_channels, depth, height, width]
        // Output shape: [batch_size, out_channels, output_depth, output_height, output_width]
        ops::conv3d(input, &self.weight, self.bias.as_ref(), self.params)
    }

    fn parameters(&self) -> Vec<&Tensor<T>> {
        let mut params = vec![&self.weight];
        if let Some(ref bias) = self.bias {
            params.push(bias);
        }
        params
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor<T>> {
        let mut params = vec![&mut self.weight];
        if let Some(ref mut bias) = self.bias {
            params.push(bias);
        }
        params
    }

    fn set_training(&mut self, training: bool) {
        self.training = training;
    }

    fn clone_box(&self) -> Box<dyn Layer<T>> {
        Box::new(self.clone())
    }

    fn layer_type(&self) -> LayerType {
        LayerType::Conv3D
    }

    fn set_weight(&mut self, weight: Tensor<T>) -> Result<()> {
        if !weight.same_shape(&self.weight) {
            return Err(TensorError::shape_mismatch(
                "Conv3D::set_weight",
                &self.weight.shape().to_string(),
                &weight.shape().to_string(),
            ));
        }
        self.weight = weight;
        Ok(())
    }

    fn set_bias(&mut self, bias: Option<Tensor<T>>) -> Result<()> {
        if let Some(ref bias) = bias {
            let expected = [self.out_channels()];
            if bias.shape().dims() != expected {
                return Err(TensorError::shape_mismatch(
                    "Conv3D::set_bias",
                    &format!("{expected:?}"),
                    &bias.shape().to_string(),
                ));
            }
        }
        self.bias = bias;
        Ok(())
    }
}
