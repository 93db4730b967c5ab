//! Non-owning N-dimensional strided views over contiguous buffers.
//!
//! A view pairs a caller-owned slice with a shape, signed per-dimension
//! strides and a base offset. It reads, writes, reorders, slices and iterates
//! a logical multi-dimensional array without copying data.
//!
//! # Core Types
//!
//! - [`StridedView`] / [`StridedViewMut`]: views over `&[T]` / `&mut [T]`
//! - [`Layout`]: the shape/stride/offset geometry shared by both
//! - [`IndexWidth`]: index width of shapes and coordinates; strides use a
//!   signed type twice as wide
//!
//! # Metadata Transformations
//!
//! These operate only on shape/strides/offset and never access the data:
//! - `transpose`, `flip`, `permute`: in place, O(1)
//! - `slice`, `slice_step`, `sliding_window`: new views over the same buffer
//!
//! # Example
//!
//! ```rust
//! use strided_nd::StridedView;
//!
//! let data: Vec<u32> = (0..24).collect();
//! let view = StridedView::<_, 3>::from_packed(&data, [2, 3, 4]).unwrap();
//!
//! let sub = view.slice_step([0, 0, 1], [2, 3, 3], [1, 2, 2]);
//! assert_eq!(sub.to_vec(), vec![1, 3, 9, 11, 13, 15, 21, 23]);
//!
//! // Address back to coordinate
//! assert_eq!(view.coord_of_address(23).unwrap(), [1, 2, 3]);
//! ```
//!
//! # Checked and unchecked operations
//!
//! Every fallible operation has a `try_*` form returning [`Result`] and a plain
//! form that panics when its documented preconditions do not hold.

mod index;
pub mod iter;
pub mod layout;
mod order;
pub mod view;

pub use index::IndexWidth;
pub use iter::{Coords, Entries, Iter, IterRef, Positions, WrappingIter, WrappingPositions};
pub use layout::{packed_strides, size, try_packed_strides, Layout};
pub use order::{is_overlapping, stride_order};
pub use view::{StridedView, StridedViewMut};

// ============================================================================
// Error types
// ============================================================================

/// Errors that can occur during strided view operations.
#[derive(Debug, thiserror::Error)]
pub enum StridedError {
    /// The shape/stride/offset combination has a zero extent or reaches
    /// outside the buffer.
    #[error("invalid view: {0}")]
    InvalidView(String),

    /// A coordinate component is not below its dimension's extent.
    #[error("index {index} out of bounds for dim {dim} of extent {extent}")]
    IndexOutOfBounds {
        dim: usize,
        index: usize,
        extent: usize,
    },

    /// Reverse mapping on a view whose coordinates share addresses.
    #[error("address to coordinate mapping is undefined for overlapping views")]
    OverlappingElementsUnsupported,

    /// No coordinate of the view maps to this address.
    #[error("address {address} is not addressed by the view")]
    AddressNotInView { address: usize },

    /// Invalid axis index for the given rank.
    #[error("invalid axis {axis} for rank {rank}")]
    InvalidAxis { axis: usize, rank: usize },

    /// Destination buffer shorter than the view.
    #[error("destination holds {got} elements, {needed} needed")]
    BufferTooSmall { needed: usize, got: usize },

    /// View shapes are incompatible for the operation.
    #[error("shape mismatch: {0:?} vs {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),
}

/// Result type for strided view operations.
pub type Result<T> = std::result::Result<T, StridedError>;
