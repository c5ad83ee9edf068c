//! # OctFlow Core
//!
//! Dense CPU tensors in NCDHW layout and the handful of volumetric operations an
//! octave convolution is assembled from:
//!
//! - [`ops::conv3d`]: cross-correlation with zero padding, stride and dilation
//! - [`ops::avg_pool3d`]: valid-window average pooling
//! - [`ops::upsample_nearest3d`]: nearest-neighbour upsampling
//! - [`ops::add`]: element-wise addition of identically shaped tensors
//!
//! ```rust
//! use octflow_core::{ops, Tensor};
//!
//! # fn main() -> octflow_core::Result<()> {
//! let x = Tensor::<f32>::ones(&[1, 4, 8, 8, 8]);
//! let low = ops::avg_pool3d(&x, (2, 2, 2), (2, 2, 2))?;
//! let back = ops::upsample_nearest3d(&low, (2, 2, 2))?;
//! let sum = ops::add(&x, &back)?;
//! assert_eq!(sum.shape().dims(), &[1, 4, 8, 8, 8]);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod ops;
pub mod shape;
pub mod tensor;

pub use error::{Result, TensorError};
pub use ops::Conv3dParams;
pub use shape::Shape;
pub use tensor::Tensor;
