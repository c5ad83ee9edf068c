//! Tensor Module
//!
//! - **core**: tensor structure and property access
//! - **creation**: constructors
//! - **ops**: method forms of the operations in [`crate::ops`]

pub mod core;
pub mod creation;
pub mod ops;

pub use self::core::Tensor;
