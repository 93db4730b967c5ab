//! Stride ordering and overlap detection.
//!
//! Reverse mapping (address to coordinate) has to divide strides out from the
//! coarsest dimension to the finest, which is only unambiguous when no two
//! coordinates share an address.

use num_traits::{CheckedMul, Signed, Zero};

use crate::index::IndexWidth;

/// Dimension indices sorted by `|stride|` descending.
///
/// The sort is stable, so dimensions with equal stride magnitude keep their
/// declaration order.
pub fn stride_order<const N: usize, I: IndexWidth>(strides: &[I::Stride; N]) -> [usize; N] {
    let mut order = [0usize; N];
    for (d, slot) in order.iter_mut().enumerate() {
        *slot = d;
    }
    order.sort_by(|&a, &b| strides[b].abs().cmp(&strides[a].abs()));
    order
}

/// Whether two distinct coordinates of the layout can address the same element.
///
/// Dimensions of extent 1 contribute a single coordinate and are ignored. A
/// remaining dimension with stride 0 always overlaps; otherwise the layout
/// overlaps iff for some adjacent pair `(a, b)` of [`stride_order`]
/// `|stride[a]| < |stride[b]| * shape[b]`.
pub fn is_overlapping<const N: usize, I: IndexWidth>(
    shape: &[I; N],
    strides: &[I::Stride; N],
) -> bool {
    let mut coarser: Option<usize> = None;
    for d in stride_order::<N, I>(strides) {
        if shape[d] <= I::one() {
            continue;
        }
        if strides[d].is_zero() {
            return true;
        }
        if let Some(a) = coarser {
            let span = strides[d].abs().checked_mul(&shape[d].to_stride());
            match span {
                Some(span) if strides[a].abs() >= span => {}
                _ => return true,
            }
        }
        coarser = Some(d);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stride_order_row_major() {
        assert_eq!(stride_order::<3, u32>(&[12, 4, 1]), [0, 1, 2]);
    }

    #[test]
    fn test_stride_order_transposed() {
        assert_eq!(stride_order::<3, u32>(&[12, 1, 4]), [0, 2, 1]);
    }

    #[test]
    fn test_stride_order_negative_strides() {
        assert_eq!(stride_order::<3, u32>(&[-1, 12, -4]), [1, 2, 0]);
    }

    #[test]
    fn test_stride_order_ties_are_stable() {
        assert_eq!(stride_order::<3, u32>(&[4, 1, 1]), [0, 1, 2]);
        assert_eq!(stride_order::<3, u32>(&[1, 4, 1]), [1, 0, 2]);
    }

    #[test]
    fn test_packed_not_overlapping() {
        assert!(!is_overlapping::<3, u32>(&[2, 3, 4], &[12, 4, 1]));
        assert!(!is_overlapping::<3, u32>(&[2, 4, 3], &[12, 1, 4]));
    }

    #[test]
    fn test_window_overlapping() {
        assert!(is_overlapping::<3, u32>(&[5, 3, 2], &[4, 1, 1]));
    }

    #[test]
    fn test_gapped_not_overlapping() {
        // every other element along both dimensions
        assert!(!is_overlapping::<2, u32>(&[2, 2], &[8, 2]));
    }

    #[test]
    fn test_zero_stride_overlapping() {
        assert!(is_overlapping::<2, u32>(&[3, 2], &[0, 1]));
        // extent 1 with stride 0 addresses a single element
        assert!(!is_overlapping::<2, u32>(&[1, 2], &[0, 1]));
    }

    #[test]
    fn test_unit_extent_ignored() {
        assert!(!is_overlapping::<2, u32>(&[1, 3], &[1, 1]));
    }

    #[test]
    fn test_flipped_not_overlapping() {
        assert!(!is_overlapping::<2, u32>(&[2, 3], &[3, -1]));
        assert!(!is_overlapping::<2, u32>(&[2, 3], &[-3, 1]));
    }
}
