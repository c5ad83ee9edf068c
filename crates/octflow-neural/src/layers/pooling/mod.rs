// Pooling layers organized by type

pub mod pool3d;

pub use pool3d::AvgPool3D;
