//! Core Tensor Structure and Properties

use crate::Shape;
use scirs2_core::ndarray::ArrayD;

/// Dense CPU tensor backed by a dynamically ranked ndarray
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor<T> {
    pub(crate) data: ArrayD<T>,
    pub(crate) shape: Shape,
}

impl<T> Tensor<T> {
    /// Get the shape of the tensor
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Get the underlying data as a slice when it is contiguous
    pub fn as_slice(&self) -> Option<&[T]> {
        self.data.as_slice()
    }

    /// Get the value at a specific index
    pub fn get(&self, index: &[usize]) -> Option<T>
    where
        T: Clone,
    {
        if index.len() != self.data.ndim() {
            return None;
        }
        self.data.get(index).cloned()
    }

    /// Copy the elements out in logical (row-major) order
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        match self.data.as_slice() {
            Some(slice) => slice.to_vec(),
            None => self.data.iter().cloned().collect(),
        }
    }

    /// Get the total number of elements
    pub fn numel(&self) -> usize {
        self.shape.size()
    }

    /// Get the number of dimensions (rank)
    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    /// Check if two tensors have the same shape
    pub fn same_shape(&self, other: &Self) -> bool {
        self.shape == other.shape
    }
}
