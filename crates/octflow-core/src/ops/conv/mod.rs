//! Convolution operations for volumetric (NCDHW) tensors

pub mod conv3d;

pub use conv3d::{conv3d, Conv3dParams};
