//! # OctFlow Neural
//!
//! Volumetric octave convolution layers. An octave layer keeps a
//! full-resolution high-frequency branch and a half-resolution low-frequency
//! branch, chosen by the split ratios `alpha_in` / `alpha_out`, and exchanges
//! information between them at every layer.
//!
//! ## Layer positions
//!
//! - **Entry**: single tensor in, high/low pair out
//! - **Interior**: pair in, pair out, with all four cross-branch kernels
//! - **Exit**: pair in, single tensor out
//!
//! ## Quick Start
//!
//! ```rust
//! use octflow_core::Tensor;
//! use octflow_neural::{OctConv3D, OctaveTensor};
//!
//! # fn main() -> octflow_core::Result<()> {
//! let entry = OctConv3D::<f32>::entry(3, 16, (3, 3, 3), 0.25)?;
//! let interior = OctConv3D::<f32>::interior(16, 16, (3, 3, 3), 0.25)?;
//! let exit = OctConv3D::<f32>::exit(16, 8, (3, 3, 3), 0.25)?;
//!
//! let x = OctaveTensor::from(Tensor::zeros(&[1, 3, 8, 8, 8]));
//! let pair = interior.forward(&entry.forward(&x)?)?;
//! let y = exit.forward(&pair)?.into_single()?;
//! assert_eq!(y.shape().dims(), &[1, 8, 8, 8, 8]);
//! # Ok(())
//! # }
//! ```

pub mod layers;

pub use layers::{
    AvgPool3D, ChannelSplit, Conv3D, Layer, LayerType, OctConv3D, OctConv3DConfig, OctavePair,
    OctavePosition, OctaveRouting, OctaveTensor, Upsample3D,
};
