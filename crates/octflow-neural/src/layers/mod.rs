pub mod conv;
pub mod octave;
pub mod pooling;
pub mod resample;

pub use conv::Conv3D;
pub use octave::{
    ChannelSplit, OctConv3D, OctConv3DConfig, OctavePair, OctavePosition, OctaveRouting,
    OctaveTensor,
};
pub use pooling::AvgPool3D;
pub use resample::Upsample3D;

use octflow_core::{Result, Tensor, TensorError};

/// Represents the kinds of layers this crate provides, for introspection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerType {
    Conv3D,
    AvgPool3D,
    Upsample3D,
    OctConv3D,
    Unknown,
}

/// A layer mapping one tensor to one tensor
///
/// [`OctConv3D`] works on branch pairs and therefore exposes its own
/// `forward` over [`OctaveTensor`] instead of implementing this trait.
pub trait Layer<T> {
    fn forward(&self, input: &Tensor<T>) -> Result<Tensor<T>>;
    fn parameters(&self) -> Vec<&Tensor<T>>;
    fn parameters_mut(&mut self) -> Vec<&mut Tensor<T>>;
    fn set_training(&mut self, training: bool);
    fn clone_box(&self) -> Box<dyn Layer<T>>;

    /// Returns the type of this layer for introspection
    fn layer_type(&self) -> LayerType {
        LayerType::Unknown
    }

    /// Set weight tensor for layers that support weights
    /// Default implementation returns an error
    fn set_weight(&mut self, _weight: Tensor<T>) -> Result<()> {
        Err(TensorError::invalid_argument_op(
            "set_weight",
            "this layer type does not support weight setting",
        ))
    }

    /// Set bias tensor for layers that support bias
    /// Default implementation returns an error
    fn set_bias(&mut self, _bias: Option<Tensor<T>>) -> Result<()> {
        Err(TensorError::invalid_argument_op(
            "set_bias",
            "this layer type does not support bias setting",
        ))
    }
}
