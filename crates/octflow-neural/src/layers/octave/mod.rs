//! Octave convolution: configuration, branch representation and the layer

pub mod config;
pub mod layer;
pub mod representation;

pub use config::{ChannelSplit, OctConv3DConfig, OctavePosition};
pub use layer::{OctConv3D, OctaveRouting};
pub use representation::{OctavePair, OctaveTensor};
