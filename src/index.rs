//! Index widths for shapes, coordinates and strides.
//!
//! A view is parameterized by an unsigned index type `I` used for extents,
//! coordinates and the base offset. Strides use the signed type
//! [`IndexWidth::Stride`], which is at least twice as wide as `I` so that
//! any in-buffer address plus or minus another one fits without overflow.

use std::fmt::Debug;
use std::hash::Hash;

use num_traits::{AsPrimitive, PrimInt, Signed, Unsigned};

/// Unsigned index type usable as a view's shape/coordinate width.
///
/// Implemented for `u8`, `u16`, `u32` and `u64`.
pub trait IndexWidth:
    PrimInt + Unsigned + AsPrimitive<usize> + Hash + Debug + Send + Sync + 'static
{
    /// Signed stride type of (at least) double width.
    type Stride: PrimInt
        + Signed
        + AsPrimitive<usize>
        + AsPrimitive<Self>
        + Hash
        + Debug
        + Send
        + Sync
        + 'static;

    /// Widen into the stride type. Never loses information.
    fn to_stride(self) -> Self::Stride;

    /// Narrow a `usize` known to fit in `Self`.
    ///
    /// Values that do not fit are truncated.
    fn truncate_from(n: usize) -> Self;
}

macro_rules! impl_index_width {
    ($($index:ty => $stride:ty),* $(,)?) => {$(
        const _: () = assert!(
            std::mem::size_of::<$stride>() >= 2 * std::mem::size_of::<$index>(),
            "stride type must be at least twice as wide as the index type",
        );

        impl IndexWidth for $index {
            type Stride = $stride;

            #[inline]
            fn to_stride(self) -> $stride {
                self as $stride
            }

            #[inline]
            fn truncate_from(n: usize) -> Self {
                n as $index
            }
        }
    )*};
}

impl_index_width!(u8 => i16, u16 => i32, u32 => i64, u64 => i128);

/// Convert a non-negative stride-typed address to `usize`.
#[inline]
pub(crate) fn stride_to_usize<I: IndexWidth>(value: I::Stride) -> usize {
    AsPrimitive::<usize>::as_(value)
}

/// Convert a stride-typed value known to lie in `0..=I::MAX` to `I`.
#[inline]
pub(crate) fn stride_to_index<I: IndexWidth>(value: I::Stride) -> I {
    AsPrimitive::<I>::as_(value)
}

/// Convert a `usize` into the index type, if representable.
#[inline]
pub(crate) fn usize_to_index<I: IndexWidth>(value: usize) -> Option<I> {
    <I as num_traits::NumCast>::from(value)
}

/// Convert a `usize` into the stride type, if representable.
#[inline]
pub(crate) fn usize_to_stride<I: IndexWidth>(value: usize) -> Option<I::Stride> {
    <I::Stride as num_traits::NumCast>::from(value)
}
