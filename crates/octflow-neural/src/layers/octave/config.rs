//! Octave convolution configuration and channel-split resolution

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use octflow_core::{Result, TensorError};
use std::fmt;
use std::str::FromStr;

const LAYER: &str = "OctConv3D";

/// Structural position of an octave layer inside a network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "lowercase"))]
pub enum OctavePosition {
    /// Single tensor in, high/low pair out
    #[cfg_attr(feature = "serialize", serde(alias = "first"))]
    Entry,
    /// High/low pair in, high/low pair out
    #[default]
    #[cfg_attr(feature = "serialize", serde(alias = "normal"))]
    Interior,
    /// High/low pair in, single tensor out
    #[cfg_attr(feature = "serialize", serde(alias = "last"))]
    Exit,
}

impl OctavePosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Interior => "interior",
            Self::Exit => "exit",
        }
    }

    /// Whether the layer consumes a high/low pair
    pub fn takes_pair(&self) -> bool {
        !matches!(self, Self::Entry)
    }

    /// Whether the layer produces a high/low pair
    pub fn yields_pair(&self) -> bool {
        !matches!(self, Self::Exit)
    }
}

impl fmt::Display for OctavePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OctavePosition {
    type Err = TensorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "entry" | "first" => Ok(Self::Entry),
            "interior" | "normal" => Ok(Self::Interior),
            "exit" | "last" => Ok(Self::Exit),
            other => Err(TensorError::invalid_configuration(
                LAYER,
                format!("unknown position '{other}', expected entry, interior or exit"),
            )),
        }
    }
}

/// High/low channel counts derived from the channel totals and split ratios
///
/// The high share is rounded down and the low share takes the remainder, so
/// `hf + lf` always equals the total. For odd totals at `alpha = 0.5` this
/// leaves the extra channel in the low branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelSplit {
    pub hf_in: usize,
    pub lf_in: usize,
    pub hf_out: usize,
    pub lf_out: usize,
}

impl ChannelSplit {
    pub fn resolve(
        in_channels: usize,
        out_channels: usize,
        alpha_in: f64,
        alpha_out: f64,
    ) -> Self {
        let hf_in = high_share(in_channels, alpha_in);
        let hf_out = high_share(out_channels, alpha_out);
        Self {
            hf_in,
            lf_in: in_channels - hf_in,
            hf_out,
            lf_out: out_channels - hf_out,
        }
    }

    pub fn in_channels(&self) -> usize {
        self.hf_in + self.lf_in
    }

    pub fn out_channels(&self) -> usize {
        self.hf_out + self.lf_out
    }
}

fn high_share(channels: usize, alpha: f64) -> usize {
    let share = (channels as f64 * (1.0 - alpha)).floor();
    // alpha is validated to [0, 1) before this is reached, clamp keeps the
    // subtraction in `resolve` from underflowing regardless
    (share.max(0.0) as usize).min(channels)
}

fn default_stride() -> usize {
    1
}

fn default_dilation() -> (usize, usize, usize) {
    (1, 1, 1)
}

fn default_alpha() -> f64 {
    0.25
}

fn default_use_bias() -> bool {
    true
}

/// Construction parameters of an [`OctConv3D`](super::OctConv3D) layer
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct OctConv3DConfig {
    pub in_channels: usize,
    pub out_channels: usize,
    pub kernel_size: (usize, usize, usize),
    /// 1 or 2; a stride of 2 is realised by average pooling, never inside a kernel
    #[cfg_attr(feature = "serialize", serde(default = "default_stride"))]
    pub stride: usize,
    #[cfg_attr(feature = "serialize", serde(default))]
    pub padding: (usize, usize, usize),
    #[cfg_attr(feature = "serialize", serde(default = "default_dilation"))]
    pub dilation: (usize, usize, usize),
    /// Fraction of input channels carried by the low-frequency branch
    #[cfg_attr(feature = "serialize", serde(default = "default_alpha"))]
    pub alpha_in: f64,
    /// Fraction of output channels carried by the low-frequency branch
    #[cfg_attr(feature = "serialize", serde(default = "default_alpha"))]
    pub alpha_out: f64,
    #[cfg_attr(feature = "serialize", serde(default))]
    pub position: OctavePosition,
    #[cfg_attr(feature = "serialize", serde(default = "default_use_bias"))]
    pub use_bias: bool,
}

impl OctConv3DConfig {
    /// Interior layer with stride 1, no padding, dilation 1 and `alpha = 0.25`
    pub fn new(
        in_channels: usize,
        out_channels: usize,
        kernel_size: (usize, usize, usize),
    ) -> Self {
        Self {
            in_channels,
            out_channels,
            kernel_size,
            stride: default_stride(),
            padding: (0, 0, 0),
            dilation: default_dilation(),
            alpha_in: default_alpha(),
            alpha_out: default_alpha(),
            position: OctavePosition::default(),
            use_bias: default_use_bias(),
        }
    }

    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    pub fn with_padding(mut self, padding: (usize, usize, usize)) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_dilation(mut self, dilation: (usize, usize, usize)) -> Self {
        self.dilation = dilation;
        self
    }

    /// Set both split ratios at once
    pub fn with_alphas(mut self, alpha_in: f64, alpha_out: f64) -> Self {
        self.alpha_in = alpha_in;
        self.alpha_out = alpha_out;
        self
    }

    pub fn with_alpha_in(mut self, alpha_in: f64) -> Self {
        self.alpha_in = alpha_in;
        self
    }

    pub fn with_alpha_out(mut self, alpha_out: f64) -> Self {
        self.alpha_out = alpha_out;
        self
    }

    pub fn with_position(mut self, position: OctavePosition) -> Self {
        self.position = position;
        self
    }

    pub fn with_bias(mut self, use_bias: bool) -> Self {
        self.use_bias = use_bias;
        self
    }

    /// Channel split implied by the totals and ratios, without validation
    pub fn split(&self) -> ChannelSplit {
        ChannelSplit::resolve(
            self.in_channels,
            self.out_channels,
            self.alpha_in,
            self.alpha_out,
        )
    }

    /// `(name, in_channels, out_channels)` of every kernel the position needs
    pub fn kernel_specs(&self) -> Vec<(&'static str, usize, usize)> {
        let split = self.split();
        match self.position {
            OctavePosition::Entry => vec![
                ("conv_high", self.in_channels, split.hf_out),
                ("conv_low", self.in_channels, split.lf_out),
            ],
            OctavePosition::Interior => vec![
                ("h2h", split.hf_in, split.hf_out),
                ("h2l", split.hf_in, split.lf_out),
                ("l2h", split.lf_in, split.hf_out),
                ("l2l", split.lf_in, split.lf_out),
            ],
            OctavePosition::Exit => vec![
                ("conv_high", split.hf_in, self.out_channels),
                ("conv_low", split.lf_in, self.out_channels),
            ],
        }
    }

    /// Check the configuration and resolve its channel split
    pub fn validate(&self) -> Result<ChannelSplit> {
        if self.in_channels == 0 || self.out_channels == 0 {
            return Err(TensorError::invalid_configuration(
                LAYER,
                format!(
                    "channel counts must be positive, got in_channels={} out_channels={}",
                    self.in_channels, self.out_channels
                ),
            ));
        }

        if self.stride != 1 && self.stride != 2 {
            return Err(TensorError::invalid_configuration(
                LAYER,
                format!("stride must be 1 or 2, got {}", self.stride),
            ));
        }

        let (kd, kh, kw) = self.kernel_size;
        if kd == 0 || kh == 0 || kw == 0 {
            return Err(TensorError::invalid_configuration(
                LAYER,
                format!("kernel_size must be positive, got {:?}", self.kernel_size),
            ));
        }

        let (dd, dh, dw) = self.dilation;
        if dd == 0 || dh == 0 || dw == 0 {
            return Err(TensorError::invalid_configuration(
                LAYER,
                format!("dilation must be positive, got {:?}", self.dilation),
            ));
        }

        for (name, alpha) in [("alpha_in", self.alpha_in), ("alpha_out", self.alpha_out)] {
            if !alpha.is_finite() || !(0.0..1.0).contains(&alpha) {
                return Err(TensorError::invalid_configuration(
                    LAYER,
                    format!("{name} must lie in [0, 1), got {alpha}"),
                ));
            }
        }

        for (kernel, kernel_in, kernel_out) in self.kernel_specs() {
            if kernel_in == 0 || kernel_out == 0 {
                return Err(TensorError::invalid_configuration(
                    LAYER,
                    format!(
                        "{kernel} kernel of the {} position would map {kernel_in} -> \
                         {kernel_out} channels (in_channels={}, out_channels={}, \
                         alpha_in={}, alpha_out={})",
                        self.position,
                        self.in_channels,
                        self.out_channels,
                        self.alpha_in,
                        self.alpha_out
                    ),
                ));
            }
        }

        Ok(self.split())
    }
}
