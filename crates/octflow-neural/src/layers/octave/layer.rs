//! Octave convolution layer
//!
//! Splits channels into a full-resolution high-frequency branch and a
//! half-resolution low-frequency branch and exchanges information between
//! them through four (interior) or two (entry/exit) stride-1 kernels.

use super::config::{ChannelSplit, OctConv3DConfig, OctavePosition};
use super::representation::{OctavePair, OctaveTensor};
use crate::layers::{AvgPool3D, Conv3D, Layer, LayerType, Upsample3D};
use num_traits::{Float, FromPrimitive};
use octflow_core::{Conv3dParams, Result, Tensor, TensorError};
use tracing::{debug, trace};

/// Kernels and resamplers owned by an octave layer, selected by position
#[derive(Debug, Clone)]
pub enum OctaveRouting<T> {
    Entry {
        conv_high: Conv3D<T>,
        conv_low: Conv3D<T>,
        pool: AvgPool3D,
    },
    Interior {
        h2h: Conv3D<T>,
        h2l: Conv3D<T>,
        l2h: Conv3D<T>,
        l2l: Conv3D<T>,
        pool: AvgPool3D,
        upsample: Upsample3D,
    },
    Exit {
        conv_high: Conv3D<T>,
        conv_low: Conv3D<T>,
        upsample: Upsample3D,
    },
}

impl<T> OctaveRouting<T>
where
    T: Float,
{
    fn build(config: &OctConv3DConfig, split: ChannelSplit) -> Self {
        let params = Conv3dParams::new((1, 1, 1), config.padding, config.dilation);
        let conv = |in_channels, out_channels| {
            Conv3D::new(
                in_channels,
                out_channels,
                config.kernel_size,
                params,
                config.use_bias,
            )
        };

        match config.position {
            OctavePosition::Entry => Self::Entry {
                conv_high: conv(config.in_channels, split.hf_out),
                conv_low: conv(config.in_channels, split.lf_out),
                pool: AvgPool3D::halving(),
            },
            OctavePosition::Interior => Self::Interior {
                h2h: conv(split.hf_in, split.hf_out),
                h2l: conv(split.hf_in, split.lf_out),
                l2h: conv(split.lf_in, split.hf_out),
                l2l: conv(split.lf_in, split.lf_out),
                pool: AvgPool3D::halving(),
                upsample: Upsample3D::doubling(),
            },
            OctavePosition::Exit => Self::Exit {
                conv_high: conv(split.hf_in, config.out_channels),
                conv_low: conv(split.lf_in, config.out_channels),
                upsample: Upsample3D::doubling(),
            },
        }
    }
}

impl<T> OctaveRouting<T> {
    pub fn position(&self) -> OctavePosition {
        match self {
            Self::Entry { .. } => OctavePosition::Entry,
            Self::Interior { .. } => OctavePosition::Interior,
            Self::Exit { .. } => OctavePosition::Exit,
        }
    }

    /// Kernel names in parameter order
    pub fn names(&self) -> &'static [&'static str] {
        match self {
            Self::Entry { .. } | Self::Exit { .. } => &["conv_high", "conv_low"],
            Self::Interior { .. } => &["h2h", "h2l", "l2h", "l2l"],
        }
    }

    /// Kernels in parameter order
    pub fn kernels(&self) -> Vec<&Conv3D<T>> {
        match self {
            Self::Entry {
                conv_high,
                conv_low,
                ..
            }
            | Self::Exit {
                conv_high,
                conv_low,
                ..
            } => vec![conv_high, conv_low],
            Self::Interior {
                h2h, h2l, l2h, l2l, ..
            } => vec![h2h, h2l, l2h, l2l],
        }
    }

    pub fn kernels_mut(&mut self) -> Vec<&mut Conv3D<T>> {
        match self {
            Self::Entry {
                conv_high,
                conv_low,
                ..
            }
            | Self::Exit {
                conv_high,
                conv_low,
                ..
            } => vec![conv_high, conv_low],
            Self::Interior {
                h2h, h2l, l2h, l2l, ..
            } => vec![h2h, h2l, l2h, l2l],
        }
    }

    /// Look up a kernel by name
    pub fn kernel(&self, name: &str) -> Option<&Conv3D<T>> {
        let index = self.names().iter().position(|n| *n == name)?;
        self.kernels().into_iter().nth(index)
    }

    pub fn kernel_mut(&mut self, name: &str) -> Option<&mut Conv3D<T>> {
        let index = self.names().iter().position(|n| *n == name)?;
        self.kernels_mut().into_iter().nth(index)
    }
}

/// 3D octave convolution
///
/// Built from an [`OctConv3DConfig`]; the position decides whether
/// [`forward`](Self::forward) takes and returns a single tensor or a
/// high/low [`OctavePair`].
///
/// Inputs must agree with the configured channel split, and the low branch
/// of a pair must sit at half the resolution of the high branch. Violations
/// surface as the shape mismatch raised by the underlying convolution or
/// addition.
#[derive(Debug, Clone)]
pub struct OctConv3D<T> {
    config: OctConv3DConfig,
    split: ChannelSplit,
    routing: OctaveRouting<T>,
    downsample: Option<AvgPool3D>,
    training: bool,
}

impl<T> OctConv3D<T>
where
    T: Float,
{
    /// Validate `config` and allocate the kernels its position needs
    pub fn new(config: OctConv3DConfig) -> Result<Self> {
        let split = config.validate()?;
        let routing = OctaveRouting::build(&config, split);
        let downsample = (config.stride == 2).then(AvgPool3D::halving);

        debug!(
            position = %config.position,
            in_channels = config.in_channels,
            out_channels = config.out_channels,
            hf_in = split.hf_in,
            lf_in = split.lf_in,
            hf_out = split.hf_out,
            lf_out = split.lf_out,
            stride = config.stride,
            "constructed octave convolution"
        );

        Ok(Self {
            config,
            split,
            routing,
            downsample,
            training: false,
        })
    }

    /// Entry layer with symmetric padding and the given low-frequency output ratio
    pub fn entry(
        in_channels: usize,
        out_channels: usize,
        kernel_size: (usize, usize, usize),
        alpha_out: f64,
    ) -> Result<Self> {
        Self::new(
            OctConv3DConfig::new(in_channels, out_channels, kernel_size)
                .with_padding(same_padding(kernel_size))
                .with_alpha_out(alpha_out)
                .with_position(OctavePosition::Entry),
        )
    }

    /// Interior layer with symmetric padding and one ratio for both sides
    pub fn interior(
        in_channels: usize,
        out_channels: usize,
        kernel_size: (usize, usize, usize),
        alpha: f64,
    ) -> Result<Self> {
        Self::new(
            OctConv3DConfig::new(in_channels, out_channels, kernel_size)
                .with_padding(same_padding(kernel_size))
                .with_alphas(alpha, alpha)
                .with_position(OctavePosition::Interior),
        )
    }

    /// Exit layer with symmetric padding and the given low-frequency input ratio
    pub fn exit(
        in_channels: usize,
        out_channels: usize,
        kernel_size: (usize, usize, usize),
        alpha_in: f64,
    ) -> Result<Self> {
        Self::new(
            OctConv3DConfig::new(in_channels, out_channels, kernel_size)
                .with_padding(same_padding(kernel_size))
                .with_alpha_in(alpha_in)
                .with_position(OctavePosition::Exit),
        )
    }
}

fn same_padding((kd, kh, kw): (usize, usize, usize)) -> (usize, usize, usize) {
    (kd / 2, kh / 2, kw / 2)
}

impl<T> OctConv3D<T> {
    pub fn config(&self) -> &OctConv3DConfig {
        &self.config
    }

    pub fn split(&self) -> ChannelSplit {
        self.split
    }

    pub fn position(&self) -> OctavePosition {
        self.config.position
    }

    pub fn stride(&self) -> usize {
        self.config.stride
    }

    pub fn routing(&self) -> &OctaveRouting<T> {
        &self.routing
    }

    pub fn routing_mut(&mut self) -> &mut OctaveRouting<T> {
        &mut self.routing
    }

    pub fn is_training(&self) -> bool {
        self.training
    }

    pub fn layer_type(&self) -> LayerType {
        LayerType::OctConv3D
    }
}

impl<T> OctConv3D<T>
where
    T: Float + FromPrimitive + Send + Sync + 'static,
{
    /// Apply the layer to whichever representation its position expects
    pub fn forward(&self, input: &OctaveTensor<T>) -> Result<OctaveTensor<T>> {
        match (self.position(), input) {
            (OctavePosition::Entry, OctaveTensor::Single(x)) => {
                self.forward_entry(x).map(OctaveTensor::Pair)
            }
            (OctavePosition::Interior, OctaveTensor::Pair(pair)) => {
                self.forward_interior(pair).map(OctaveTensor::Pair)
            }
            (OctavePosition::Exit, OctaveTensor::Pair(pair)) => {
                self.forward_exit(pair).map(OctaveTensor::Single)
            }
            (_, other) => Err(self.representation_mismatch(other.kind())),
        }
    }

    /// Entry forward: single tensor at resolution R to a pair at (R, R/2),
    /// halved once more when the stride is 2
    pub fn forward_entry(&self, input: &Tensor<T>) -> Result<OctavePair<T>> {
        let OctaveRouting::Entry {
            conv_high,
            conv_low,
            pool,
        } = &self.routing
        else {
            return Err(self.representation_mismatch("single tensor"));
        };

        let strided;
        let x = match &self.downsample {
            Some(down) => {
                strided = down.forward(input)?;
                &strided
            }
            None => input,
        };
        trace!(input = %x.shape(), "octave entry forward");

        let high = conv_high.forward(x)?;
        let low = conv_low.forward(&pool.forward(x)?)?;
        Ok(OctavePair::new(high, low))
    }

    /// Interior forward: pair to pair with cross-branch exchange
    pub fn forward_interior(&self, input: &OctavePair<T>) -> Result<OctavePair<T>> {
        let OctaveRouting::Interior {
            h2h,
            h2l,
            l2h,
            l2l,
            pool,
            upsample,
        } = &self.routing
        else {
            return Err(self.representation_mismatch("high/low pair"));
        };
        trace!(
            high = %input.high.shape(),
            low = %input.low.shape(),
            stride = self.stride(),
            "octave interior forward"
        );

        let (high, low) = match &self.downsample {
            Some(down) => {
                // Both branches are halved, so the low-to-high path needs no upsampling
                let hf = down.forward(&input.high)?;
                let high = h2h.forward(&hf)?.add(&l2h.forward(&input.low)?)?;
                let low = l2l
                    .forward(&pool.forward(&input.low)?)?
                    .add(&h2l.forward(&pool.forward(&hf)?)?)?;
                (high, low)
            }
            None => {
                let high = h2h
                    .forward(&input.high)?
                    .add(&upsample.forward(&l2h.forward(&input.low)?)?)?;
                let low = l2l
                    .forward(&input.low)?
                    .add(&h2l.forward(&pool.forward(&input.high)?)?)?;
                (high, low)
            }
        };
        Ok(OctavePair::new(high, low))
    }

    /// Exit forward: pair back to a single tensor at the high resolution,
    /// or at half of it when the stride is 2
    pub fn forward_exit(&self, input: &OctavePair<T>) -> Result<Tensor<T>> {
        let OctaveRouting::Exit {
            conv_high,
            conv_low,
            upsample,
        } = &self.routing
        else {
            return Err(self.representation_mismatch("high/low pair"));
        };
        trace!(
            high = %input.high.shape(),
            low = %input.low.shape(),
            stride = self.stride(),
            "octave exit forward"
        );

        match &self.downsample {
            Some(down) => conv_high
                .forward(&down.forward(&input.high)?)?
                .add(&conv_low.forward(&input.low)?),
            None => conv_high
                .forward(&input.high)?
                .add(&conv_low.forward(&upsample.forward(&input.low)?)?),
        }
    }

    fn representation_mismatch(&self, got: &str) -> TensorError {
        let expected = if self.position().takes_pair() {
            "high/low pair"
        } else {
            "single tensor"
        };
        TensorError::shape_mismatch(
            &format!("OctConv3D::forward ({})", self.position()),
            expected,
            got,
        )
    }

    /// Weights and biases of every kernel, in [`OctaveRouting::names`] order
    pub fn parameters(&self) -> Vec<&Tensor<T>> {
        self.routing
            .kernels()
            .into_iter()
            .flat_map(|kernel| kernel.parameters())
            .collect()
    }

    pub fn parameters_mut(&mut self) -> Vec<&mut Tensor<T>> {
        self.routing
            .kernels_mut()
            .into_iter()
            .flat_map(|kernel| kernel.parameters_mut())
            .collect()
    }

    pub fn set_training(&mut self, training: bool) {
        self.training = training;
        for kernel in self.routing.kernels_mut() {
            kernel.set_training(training);
        }
    }
}
