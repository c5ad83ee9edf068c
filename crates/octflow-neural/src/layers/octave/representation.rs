//! Single-tensor and high/low pair feature representations

use octflow_core::{Result, Tensor, TensorError};

/// High- and low-frequency feature maps travelling together between octave layers
///
/// In the representations octave layers produce, `low` sits at half of the
/// spatial resolution of `high` along every axis (rounded down).
#[derive(Debug, Clone, PartialEq)]
pub struct OctavePair<T> {
    pub high: Tensor<T>,
    pub low: Tensor<T>,
}

impl<T> OctavePair<T> {
    pub fn new(high: Tensor<T>, low: Tensor<T>) -> Self {
        Self { high, low }
    }

    pub fn high(&self) -> &Tensor<T> {
        &self.high
    }

    pub fn low(&self) -> &Tensor<T> {
        &self.low
    }

    pub fn into_parts(self) -> (Tensor<T>, Tensor<T>) {
        (self.high, self.low)
    }

    /// `(high, low)` channel counts, `None` unless both branches are NCDHW
    pub fn channels(&self) -> Option<(usize, usize)> {
        Some((self.high.shape().channels()?, self.low.shape().channels()?))
    }

    /// Whether `low` is at half the resolution of `high` on every spatial axis
    pub fn is_half_resolution(&self) -> bool {
        match (
            self.high.shape().spatial_dims(),
            self.low.shape().spatial_dims(),
        ) {
            (Some((hd, hh, hw)), Some(low)) => low == (hd / 2, hh / 2, hw / 2),
            _ => false,
        }
    }
}

/// Value flowing into or out of an [`OctConv3D`](super::OctConv3D) layer
#[derive(Debug, Clone, PartialEq)]
pub enum OctaveTensor<T> {
    Single(Tensor<T>),
    Pair(OctavePair<T>),
}

impl<T> OctaveTensor<T> {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Single(_) => "single tensor",
            Self::Pair(_) => "high/low pair",
        }
    }

    pub fn is_pair(&self) -> bool {
        matches!(self, Self::Pair(_))
    }

    pub fn as_single(&self) -> Option<&Tensor<T>> {
        match self {
            Self::Single(tensor) => Some(tensor),
            Self::Pair(_) => None,
        }
    }

    pub fn as_pair(&self) -> Option<&OctavePair<T>> {
        match self {
            Self::Pair(pair) => Some(pair),
            Self::Single(_) => None,
        }
    }

    pub fn into_single(self) -> Result<Tensor<T>> {
        match self {
            Self::Single(tensor) => Ok(tensor),
            Self::Pair(_) => Err(TensorError::shape_mismatch(
                "octave_representation",
                "single tensor",
                "high/low pair",
            )),
        }
    }

    pub fn into_pair(self) -> Result<OctavePair<T>> {
        match self {
            Self::Pair(pair) => Ok(pair),
            Self::Single(_) => Err(TensorError::shape_mismatch(
                "octave_representation",
                "high/low pair",
                "single tensor",
            )),
        }
    }
}

impl<T> From<Tensor<T>> for OctaveTensor<T> {
    fn from(tensor: Tensor<T>) -> Self {
        Self::Single(tensor)
    }
}

impl<T> From<OctavePair<T>> for OctaveTensor<T> {
    fn from(pair: OctavePair<T>) -> Self {
        Self::Pair(pair)
    }
}

impl<T> From<(Tensor<T>, Tensor<T>)> for OctaveTensor<T> {
    fn from((high, low): (Tensor<T>, Tensor<T>)) -> Self {
        Self::Pair(OctavePair::new(high, low))
    }
}
