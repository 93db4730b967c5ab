//! Shape/stride/offset geometry of a strided view.
//!
//! [`Layout`] is the whole addressing engine and never touches element data:
//! coordinate to address mapping, row-major enumeration, the O(1) transforms
//! and sub-layouts, and the reverse address to coordinate mapping.

use num_traits::{CheckedAdd, CheckedMul, CheckedSub, One, Signed, Zero};

use crate::index::{
    stride_to_index, stride_to_usize, usize_to_index, usize_to_stride, IndexWidth,
};
use crate::order;
use crate::{Result, StridedError};

/// Number of elements addressed by `shape`.
///
/// Zero iff some extent is zero. Saturates at `usize::MAX`.
pub fn size<const N: usize, I: IndexWidth>(shape: &[I; N]) -> usize {
    shape
        .iter()
        .fold(1usize, |acc, &extent| acc.saturating_mul(extent.as_()))
}

/// Row-major strides for a gap-free buffer of `shape` (last index varies fastest).
///
/// # Panics
/// Panics if the product of the trailing extents overflows the stride type.
pub fn packed_strides<const N: usize, I: IndexWidth>(shape: &[I; N]) -> [I::Stride; N] {
    match try_packed_strides(shape) {
        Some(strides) => strides,
        None => panic!("packed stride overflow for shape {shape:?}"),
    }
}

/// Checked [`packed_strides`], `None` on stride overflow.
pub fn try_packed_strides<const N: usize, I: IndexWidth>(
    shape: &[I; N],
) -> Option<[I::Stride; N]> {
    let mut strides = [I::Stride::one(); N];
    for d in (0..N.saturating_sub(1)).rev() {
        strides[d] = strides[d + 1].checked_mul(&shape[d + 1].to_stride())?;
    }
    Some(strides)
}

fn is_permutation<const N: usize>(perm: &[usize; N]) -> bool {
    let mut seen = [false; N];
    for &p in perm {
        if p >= N || seen[p] {
            return false;
        }
        seen[p] = true;
    }
    true
}

/// Geometry of an `N`-dimensional strided view with index width `I`.
///
/// A layout is plain data. It is checked against a buffer length with
/// [`Layout::validate`]; every view constructor does so.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Layout<const N: usize, I: IndexWidth = u32> {
    shape: [I; N],
    strides: [I::Stride; N],
    offset: I,
}

impl<const N: usize, I: IndexWidth> Layout<N, I> {
    /// Layout from raw parts. Not validated.
    pub fn new(shape: [I; N], strides: [I::Stride; N], offset: I) -> Self {
        Self {
            shape,
            strides,
            offset,
        }
    }

    /// Packed row-major layout of `shape` at offset 0.
    ///
    /// # Panics
    /// Panics if the packed strides overflow the stride type.
    pub fn packed(shape: [I; N]) -> Self {
        Self::new(shape, packed_strides(&shape), I::zero())
    }

    /// Checked [`Layout::packed`].
    ///
    /// Fails with [`StridedError::InvalidView`] if the packed strides
    /// overflow the stride type.
    pub fn try_packed(shape: [I; N]) -> Result<Self> {
        let strides = try_packed_strides(&shape).ok_or_else(|| {
            log::debug!("packed strides of {shape:?} overflow");
            StridedError::InvalidView(format!("packed stride overflow for shape {shape:?}"))
        })?;
        Ok(Self::new(shape, strides, I::zero()))
    }

    #[inline]
    pub fn shape(&self) -> &[I; N] {
        &self.shape
    }

    #[inline]
    pub fn strides(&self) -> &[I::Stride; N] {
        &self.strides
    }

    #[inline]
    pub fn offset(&self) -> I {
        self.offset
    }

    /// Number of addressed elements.
    #[inline]
    pub fn size(&self) -> usize {
        size(&self.shape)
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        N
    }

    /// Lowest and highest reachable address, or `None` on overflow.
    fn address_bounds(&self) -> Option<(I::Stride, I::Stride)> {
        let mut low = self.offset.to_stride();
        let mut high = low;
        for (&extent, &stride) in self.shape.iter().zip(self.strides.iter()) {
            if extent <= I::one() {
                continue;
            }
            let span = stride.checked_mul(&(extent - I::one()).to_stride())?;
            if span.is_negative() {
                low = low.checked_add(&span)?;
            } else {
                high = high.checked_add(&span)?;
            }
        }
        Some((low, high))
    }

    /// Check the layout against a buffer of `len` elements.
    ///
    /// Fails with [`StridedError::InvalidView`] if any extent is zero or a
    /// reachable address falls outside `0..len`.
    pub fn validate(&self, len: usize) -> Result<()> {
        let reject = |reason: String| {
            log::debug!("rejecting layout {:?} over {len} elements: {reason}", self);
            Err(StridedError::InvalidView(reason))
        };
        if let Some(dim) = self.shape.iter().position(|extent| extent.is_zero()) {
            return reject(format!("dimension {dim} has zero extent"));
        }
        let Some((low, high)) = self.address_bounds() else {
            return reject("address computation overflows".to_string());
        };
        if low.is_negative() {
            return reject(format!("lowest address {low:?} is negative"));
        }
        match usize_to_stride::<I>(len) {
            Some(len_s) if high >= len_s => reject(format!(
                "highest address {high:?} out of bounds for length {len}"
            )),
            // `len` beyond the stride range bounds every representable address
            _ => Ok(()),
        }
    }

    // ------------------------------------------------------------------------
    // Addressing
    // ------------------------------------------------------------------------

    /// Whether every component of `coord` is below its extent.
    #[inline]
    pub fn is_valid(&self, coord: &[I; N]) -> bool {
        coord.iter().zip(self.shape.iter()).all(|(c, e)| c < e)
    }

    /// Fail with [`StridedError::IndexOutOfBounds`] for the first component
    /// of `coord` not below its extent.
    pub fn check_coord(&self, coord: &[I; N]) -> Result<()> {
        for (dim, (&index, &extent)) in coord.iter().zip(self.shape.iter()).enumerate() {
            if index >= extent {
                return Err(StridedError::IndexOutOfBounds {
                    dim,
                    index: index.as_(),
                    extent: extent.as_(),
                });
            }
        }
        Ok(())
    }

    /// Storage address of `coord`: `offset + Σ coord[d] * stride[d]`.
    ///
    /// The caller must supply a valid coordinate of a validated layout;
    /// this is only checked in debug builds.
    #[inline]
    pub fn address_of(&self, coord: &[I; N]) -> usize {
        debug_assert!(self.is_valid(coord), "coordinate {coord:?} out of bounds");
        let mut address = self.offset.to_stride();
        for d in 0..N {
            address = address + coord[d].to_stride() * self.strides[d];
        }
        stride_to_usize::<I>(address)
    }

    /// Checked [`Layout::address_of`].
    pub fn try_address_of(&self, coord: &[I; N]) -> Result<usize> {
        self.check_coord(coord)?;
        Ok(self.address_of(coord))
    }

    // ------------------------------------------------------------------------
    // Row-major enumeration
    // ------------------------------------------------------------------------

    /// Dense row-major ordinal of `coord`, independent of strides.
    pub fn iteration_index_of(&self, coord: &[I; N]) -> usize {
        let mut index = 0usize;
        for d in 0..N {
            let extent: usize = self.shape[d].as_();
            let component: usize = coord[d].as_();
            index = index * extent + component;
        }
        index
    }

    /// Coordinate at row-major ordinal `index`, independent of strides.
    ///
    /// `index` must be below [`Layout::size`]; larger values wrap.
    pub fn coord_of_iteration_index(&self, mut index: usize) -> [I; N] {
        let mut coord = [I::zero(); N];
        for d in (0..N).rev() {
            let extent: usize = self.shape[d].as_();
            coord[d] = I::truncate_from(index % extent);
            index /= extent;
        }
        coord
    }

    /// Checked [`Layout::coord_of_iteration_index`].
    pub fn try_coord_of_iteration_index(&self, index: usize) -> Result<[I; N]> {
        let size = self.size();
        if index >= size {
            return Err(StridedError::IndexOutOfBounds {
                dim: 0,
                index,
                extent: size,
            });
        }
        Ok(self.coord_of_iteration_index(index))
    }

    // ------------------------------------------------------------------------
    // Reverse mapping
    // ------------------------------------------------------------------------

    /// Dimensions sorted by descending stride magnitude (stable).
    pub fn stride_order(&self) -> [usize; N] {
        order::stride_order::<N, I>(&self.strides)
    }

    /// Whether two distinct coordinates address the same element.
    pub fn is_overlapping(&self) -> bool {
        order::is_overlapping::<N, I>(&self.shape, &self.strides)
    }

    /// Coordinate addressing storage `address`.
    ///
    /// Fails with [`StridedError::OverlappingElementsUnsupported`] when the
    /// layout overlaps, and with [`StridedError::AddressNotInView`] when no
    /// coordinate maps to `address`.
    pub fn coord_of_address(&self, address: usize) -> Result<[I; N]> {
        if self.is_overlapping() {
            log::debug!("reverse mapping of {address} on overlapping layout {:?}", self);
            return Err(StridedError::OverlappingElementsUnsupported);
        }
        let not_in_view = || StridedError::AddressNotInView { address };
        let (low, _) = self.address_bounds().ok_or_else(not_in_view)?;
        let target = usize_to_stride::<I>(address).ok_or_else(not_in_view)?;

        // Distance from the lowest reachable address. Negative strides are
        // walked mirrored so every division is between non-negative values.
        let mut rem = target.checked_sub(&low).ok_or_else(not_in_view)?;
        if rem.is_negative() {
            return Err(not_in_view());
        }
        let mut coord = [I::zero(); N];
        for d in self.stride_order() {
            let extent = self.shape[d];
            if extent <= I::one() {
                continue;
            }
            let step = self.strides[d].abs();
            let c = rem / step;
            rem = rem % step;
            if c >= extent.to_stride() {
                return Err(not_in_view());
            }
            let c = stride_to_index::<I>(c);
            coord[d] = if self.strides[d].is_negative() {
                extent - I::one() - c
            } else {
                c
            };
        }
        if !rem.is_zero() {
            return Err(not_in_view());
        }
        Ok(coord)
    }

    // ------------------------------------------------------------------------
    // Transforms
    // ------------------------------------------------------------------------

    /// Swap dimensions `d1` and `d2`.
    ///
    /// # Panics
    /// Panics if either dimension is `>= N`.
    pub fn transpose(&mut self, d1: usize, d2: usize) {
        assert!(
            d1 < N && d2 < N,
            "transpose({d1}, {d2}) out of range for rank {}",
            N
        );
        self.shape.swap(d1, d2);
        self.strides.swap(d1, d2);
    }

    /// Reverse the traversal direction of dimension `d`.
    ///
    /// # Panics
    /// Panics where [`Layout::try_flip`] would fail.
    pub fn flip(&mut self, d: usize) {
        if let Err(err) = self.try_flip(d) {
            panic!("flip({d}) failed: {err}");
        }
    }

    /// Checked [`Layout::flip`]. The layout is unchanged on error.
    ///
    /// Fails with [`StridedError::InvalidAxis`] if `d >= N` and with
    /// [`StridedError::InvalidView`] if the new offset does not fit the
    /// index type.
    pub fn try_flip(&mut self, d: usize) -> Result<()> {
        if d >= N {
            return Err(StridedError::InvalidAxis { axis: d, rank: N });
        }
        let last = self.shape[d].checked_sub(&I::one()).unwrap_or_else(I::zero);
        let offset = self.strides[d]
            .checked_mul(&last.to_stride())
            .and_then(|span| self.offset.to_stride().checked_add(&span))
            .filter(|offset| !offset.is_negative() && *offset <= I::max_value().to_stride())
            .ok_or_else(|| {
                StridedError::InvalidView(format!(
                    "flipping dimension {d} moves the offset out of the index range"
                ))
            })?;
        self.offset = stride_to_index::<I>(offset);
        self.strides[d] = -self.strides[d];
        Ok(())
    }

    /// Reorder dimensions: new dimension `i` is old dimension `perm[i]`.
    ///
    /// # Panics
    /// Panics if `perm` is not a permutation of `0..N`.
    pub fn permute(&mut self, perm: [usize; N]) {
        assert!(is_permutation(&perm), "invalid permutation {perm:?}");
        let (shape, strides) = (self.shape, self.strides);
        for (i, &p) in perm.iter().enumerate() {
            self.shape[i] = shape[p];
            self.strides[i] = strides[p];
        }
    }

    /// Checked [`Layout::permute`].
    pub fn try_permute(&mut self, perm: [usize; N]) -> Result<()> {
        if let Some(&axis) = perm.iter().find(|&&p| p >= N) {
            return Err(StridedError::InvalidAxis { axis, rank: N });
        }
        if !is_permutation(&perm) {
            let mut counts = [0usize; N];
            for &p in &perm {
                counts[p] += 1;
            }
            let axis = counts.iter().position(|&c| c > 1).unwrap_or(0);
            return Err(StridedError::InvalidAxis { axis, rank: N });
        }
        self.permute(perm);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Sub-layouts
    // ------------------------------------------------------------------------

    /// Layout of the region of `shape` starting at `from`, same strides.
    ///
    /// Only `from` is checked; the result still has to be validated against
    /// the buffer.
    pub fn slice(&self, from: &[I; N], shape: [I; N]) -> Result<Self> {
        let address = self.try_address_of(from)?;
        let offset = usize_to_index::<I>(address).ok_or_else(|| {
            StridedError::InvalidView(format!("offset {address} does not fit the index type"))
        })?;
        Ok(Self::new(shape, self.strides, offset))
    }

    /// Like [`Layout::slice`], but dimension `d` only visits every
    /// `steps[d]`-th element of the region; its extent becomes
    /// `ceil(shape[d] / steps[d])`.
    ///
    /// # Panics
    /// Panics if any step is zero.
    pub fn slice_step(&self, from: &[I; N], shape: [I; N], steps: [I; N]) -> Result<Self> {
        assert!(
            steps.iter().all(|step| !step.is_zero()),
            "slice step must be non-zero, got {steps:?}"
        );
        let mut layout = self.slice(from, shape)?;
        for d in 0..N {
            let extent = shape[d];
            let step = steps[d];
            let rem = if (extent % step).is_zero() { I::zero() } else { I::one() };
            layout.shape[d] = extent / step + rem;
            layout.strides[d] = self.strides[d]
                .checked_mul(&step.to_stride())
                .ok_or_else(|| {
                    StridedError::InvalidView(format!("stride overflow in dimension {d}"))
                })?;
        }
        Ok(layout)
    }

    /// Sliding windows of extent `window` over the `K` innermost dimensions.
    ///
    /// The result has `M = N + K` dimensions: the outer `N - K` unchanged,
    /// the `K` sliding dimensions reduced to `shape - window + 1` window
    /// positions, and `K` appended dimensions of extent `window` reusing the
    /// sliding strides. Windows overlap.
    pub fn sliding_window<const K: usize, const M: usize>(
        &self,
        window: [I; K],
    ) -> Result<Layout<M, I>> {
        const {
            assert!(K <= N, "cannot slide more dimensions than the view has");
            assert!(M == N + K, "sliding window rank must be N + K");
        }
        let mut shape = [I::one(); M];
        let mut strides = [I::Stride::zero(); M];
        shape[..N].copy_from_slice(&self.shape);
        strides[..N].copy_from_slice(&self.strides);
        for (k, &w) in window.iter().enumerate() {
            let d = N - K + k;
            if w.is_zero() || w > self.shape[d] {
                return Err(StridedError::InvalidView(format!(
                    "window extent {w:?} does not fit dimension {d} of extent {:?}",
                    self.shape[d]
                )));
            }
            shape[d] = self.shape[d] - w + I::one();
            shape[N + k] = w;
            strides[N + k] = self.strides[d];
        }
        Ok(Layout::new(shape, strides, self.offset))
    }
}
