//! Spatial resampling of volumetric tensors

pub mod nearest;

pub use nearest::upsample_nearest3d;
