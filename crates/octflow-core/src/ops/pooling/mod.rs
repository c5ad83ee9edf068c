//! Pooling operations for volumetric tensors

pub mod basic_pooling;

pub use basic_pooling::avg_pool3d;
