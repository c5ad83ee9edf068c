//! Convolution Layers
//!
//! - **conv3d**: elementary 3D convolution over NCDHW tensors, the building
//!   block every octave kernel is made of

pub mod conv3d;

pub use conv3d::Conv3D;
