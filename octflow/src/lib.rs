//! # OctFlow - Volumetric Octave Convolution in Pure Rust
//!
//! OctFlow factorises 3-D feature maps into a high-frequency branch at full
//! resolution and a low-frequency branch at half resolution, cutting the cost
//! of volumetric convolutions while keeping information flowing between the
//! two scales.
//!
//! The workspace is split into:
//!
//! - [`core`]: NCDHW tensors, `conv3d`, `avg_pool3d`, `upsample_nearest3d`, `add`
//! - [`neural`]: `Conv3D`, the resampling layers and [`OctConv3D`](neural::OctConv3D)
//!
//! ## Quick Start
//!
//! ```rust
//! use octflow::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let entry = OctConv3D::<f32>::new(
//!     OctConv3DConfig::new(8, 16, (3, 3, 3))
//!         .with_padding((1, 1, 1))
//!         .with_position(OctavePosition::Entry),
//! )?;
//!
//! let pair = entry.forward_entry(&Tensor::zeros(&[1, 8, 16, 16, 16]))?;
//! assert_eq!(pair.high.shape().dims(), &[1, 12, 16, 16, 16]);
//! assert_eq!(pair.low.shape().dims(), &[1, 4, 8, 8, 8]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `serialize` (default): serde support for `Shape` and `OctConv3DConfig`

#![deny(missing_docs)]
#![warn(clippy::all)]

// Re-export all public APIs from subcrates
pub use octflow_core as core;
pub use octflow_neural as neural;

/// Prelude module for convenient imports
///
/// ```rust
/// use octflow::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::ops;
    pub use crate::core::{Conv3dParams, Result, Shape, Tensor, TensorError};

    // Elementary layers
    pub use crate::neural::{AvgPool3D, Conv3D, Upsample3D};

    // Octave convolution
    pub use crate::neural::{
        ChannelSplit, OctConv3D, OctConv3DConfig, OctavePair, OctavePosition, OctaveRouting,
        OctaveTensor,
    };

    // Common trait re-exports
    pub use crate::neural::{Layer, LayerType};
}

/// The version of the OctFlow crates
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the version string of OctFlow
pub fn version() -> &'static str {
    VERSION
}
