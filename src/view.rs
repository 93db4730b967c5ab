//! Strided views over caller-owned buffers.
//!
//! - [`StridedView`]: shared view, `Copy`, read access and every transform
//! - [`StridedViewMut`]: exclusive view, adds writes
//!
//! Both pair a borrowed slice with a [`Layout`]. Neither allocates; dropping a
//! view releases nothing but the borrow.
//!
//! Fallible operations come in two tiers. `try_*` methods validate and return a
//! [`Result`]; the plain methods document their preconditions and panic when
//! they do not hold.

use std::fmt;
use std::ops::Range;

use crate::index::IndexWidth;
use crate::iter::{Coords, Entries, Iter, IterRef, Positions, WrappingIter, WrappingPositions};
use crate::layout::Layout;
use crate::{Result, StridedError};

fn expect_ok<V>(op: &str, result: Result<V>) -> V {
    match result {
        Ok(value) => value,
        Err(err) => panic!("{op} failed: {err}"),
    }
}

fn check_range(range: &Range<usize>, size: usize) -> Result<()> {
    if range.end > size {
        return Err(StridedError::IndexOutOfBounds {
            dim: 0,
            index: range.end,
            extent: size,
        });
    }
    Ok(())
}

// ============================================================================
// StridedView
// ============================================================================

/// Shared `N`-dimensional strided view over `&'a [T]`.
///
/// # Type Parameters
/// - `'a`: Lifetime of the borrowed buffer
/// - `T`: Element type
/// - `N`: Number of dimensions (const generic)
/// - `I`: Index width of shape, coordinates and offset (default `u32`)
///
/// # Example
/// ```
/// use strided_nd::StridedView;
///
/// let data: Vec<u32> = (0..24).collect();
/// let mut view = StridedView::<_, 3>::from_packed(&data, [2, 3, 4]).unwrap();
/// assert_eq!(view.get([1, 2, 3]), 23);
///
/// view.transpose(1, 2);
/// let first: Vec<u32> = view.iter().take(4).collect();
/// assert_eq!(first, vec![0, 4, 8, 1]);
/// ```
pub struct StridedView<'a, T, const N: usize, I: IndexWidth = u32> {
    data: &'a [T],
    layout: Layout<N, I>,
}

impl<T, const N: usize, I: IndexWidth> Clone for StridedView<'_, T, N, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, const N: usize, I: IndexWidth> Copy for StridedView<'_, T, N, I> {}

impl<T, const N: usize, I: IndexWidth> fmt::Debug for StridedView<'_, T, N, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StridedView")
            .field("shape", self.layout.shape())
            .field("strides", self.layout.strides())
            .field("offset", &self.layout.offset())
            .field("len", &self.data.len())
            .finish()
    }
}

impl<'a, T, const N: usize, I: IndexWidth> StridedView<'a, T, N, I> {
    /// View `buffer` as a packed row-major array of `shape`.
    ///
    /// # Errors
    /// [`StridedError::InvalidView`] if an extent is zero, the packed strides
    /// overflow the stride type, or `buffer` is too short.
    pub fn from_packed(buffer: &'a [T], shape: [I; N]) -> Result<Self> {
        Self::from_layout(buffer, Layout::try_packed(shape)?)
    }

    /// View `buffer` with custom strides at offset 0.
    pub fn from_strided(buffer: &'a [T], strides: [I::Stride; N], shape: [I; N]) -> Result<Self> {
        Self::from_layout(buffer, Layout::new(shape, strides, I::zero()))
    }

    /// View `buffer` with custom strides and base offset.
    pub fn from_strided_with_offset(
        buffer: &'a [T],
        offset: I,
        strides: [I::Stride; N],
        shape: [I; N],
    ) -> Result<Self> {
        Self::from_layout(buffer, Layout::new(shape, strides, offset))
    }

    /// View `buffer` through a prebuilt layout.
    pub fn from_layout(buffer: &'a [T], layout: Layout<N, I>) -> Result<Self> {
        layout.validate(buffer.len())?;
        Ok(Self {
            data: buffer,
            layout,
        })
    }

    #[inline]
    pub fn layout(&self) -> &Layout<N, I> {
        &self.layout
    }

    #[inline]
    pub fn shape(&self) -> &[I; N] {
        self.layout.shape()
    }

    #[inline]
    pub fn strides(&self) -> &[I::Stride; N] {
        self.layout.strides()
    }

    #[inline]
    pub fn offset(&self) -> I {
        self.layout.offset()
    }

    /// Number of addressed elements.
    #[inline]
    pub fn size(&self) -> usize {
        self.layout.size()
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        N
    }

    /// The whole borrowed buffer, independent of the view's geometry.
    #[inline]
    pub fn data(&self) -> &'a [T] {
        self.data
    }

    // ------------------------------------------------------------------------
    // Addressing
    // ------------------------------------------------------------------------

    #[inline]
    pub fn is_valid(&self, coord: &[I; N]) -> bool {
        self.layout.is_valid(coord)
    }

    /// Storage address of a coordinate that must be valid.
    #[inline]
    pub fn address_of(&self, coord: &[I; N]) -> usize {
        self.layout.address_of(coord)
    }

    #[inline]
    pub fn try_address_of(&self, coord: &[I; N]) -> Result<usize> {
        self.layout.try_address_of(coord)
    }

    #[inline]
    pub fn iteration_index_of(&self, coord: &[I; N]) -> usize {
        self.layout.iteration_index_of(coord)
    }

    #[inline]
    pub fn coord_of_iteration_index(&self, index: usize) -> [I; N] {
        self.layout.coord_of_iteration_index(index)
    }

    pub fn try_coord_of_iteration_index(&self, index: usize) -> Result<[I; N]> {
        self.layout.try_coord_of_iteration_index(index)
    }

    /// Coordinate addressing `address`; see [`Layout::coord_of_address`].
    pub fn coord_of_address(&self, address: usize) -> Result<[I; N]> {
        self.layout.coord_of_address(address)
    }

    /// Whether two distinct coordinates of this view share an element.
    pub fn is_overlapping(&self) -> bool {
        self.layout.is_overlapping()
    }

    /// Reference to the element at `coord`.
    ///
    /// # Panics
    /// Panics if `coord` is out of bounds.
    #[inline]
    pub fn get_ref(&self, coord: [I; N]) -> &'a T {
        assert!(self.layout.is_valid(&coord), "index {coord:?} out of bounds");
        let data: &'a [T] = self.data;
        &data[self.layout.address_of(&coord)]
    }

    pub fn try_get_ref(&self, coord: [I; N]) -> Result<&'a T> {
        let address = self.layout.try_address_of(&coord)?;
        let data: &'a [T] = self.data;
        Ok(&data[address])
    }

    // ------------------------------------------------------------------------
    // Transforms
    // ------------------------------------------------------------------------

    /// Swap dimensions `d1` and `d2` in place.
    pub fn transpose(&mut self, d1: usize, d2: usize) {
        self.layout.transpose(d1, d2);
    }

    /// Reverse dimension `d` in place.
    ///
    /// # Panics
    /// Panics where [`StridedView::try_flip`] would fail.
    pub fn flip(&mut self, d: usize) {
        self.layout.flip(d);
    }

    /// Checked [`StridedView::flip`]; see [`Layout::try_flip`].
    pub fn try_flip(&mut self, d: usize) -> Result<()> {
        self.layout.try_flip(d)
    }

    /// Reorder dimensions in place: new dimension `i` is old `perm[i]`.
    pub fn permute(&mut self, perm: [usize; N]) {
        self.layout.permute(perm);
    }

    pub fn try_permute(&mut self, perm: [usize; N]) -> Result<()> {
        self.layout.try_permute(perm)
    }

    // ------------------------------------------------------------------------
    // Sub-views
    // ------------------------------------------------------------------------

    fn with_layout<const M: usize>(&self, layout: Layout<M, I>) -> Result<StridedView<'a, T, M, I>> {
        layout.validate(self.data.len())?;
        log::trace!(
            "sub-view shape={:?} strides={:?} offset={:?}",
            layout.shape(),
            layout.strides(),
            layout.offset()
        );
        Ok(StridedView {
            data: self.data,
            layout,
        })
    }

    /// Region of `shape` starting at coordinate `from`, same strides.
    ///
    /// # Errors
    /// [`StridedError::IndexOutOfBounds`] if `from` is not a valid coordinate,
    /// [`StridedError::InvalidView`] if the region leaves the buffer or has a
    /// zero extent.
    pub fn try_slice(&self, from: [I; N], shape: [I; N]) -> Result<Self> {
        self.with_layout(self.layout.slice(&from, shape)?)
    }

    /// # Panics
    /// Panics where [`StridedView::try_slice`] would fail.
    pub fn slice(&self, from: [I; N], shape: [I; N]) -> Self {
        expect_ok("slice", self.try_slice(from, shape))
    }

    /// Every `steps[d]`-th element of the region of `shape` at `from`.
    ///
    /// # Panics
    /// Panics if any step is zero, even in this checked form.
    pub fn try_slice_step(&self, from: [I; N], shape: [I; N], steps: [I; N]) -> Result<Self> {
        self.with_layout(self.layout.slice_step(&from, shape, steps)?)
    }

    pub fn slice_step(&self, from: [I; N], shape: [I; N], steps: [I; N]) -> Self {
        expect_ok("slice_step", self.try_slice_step(from, shape, steps))
    }

    /// All windows of extent `window` over the `K` innermost dimensions, as an
    /// `M = N + K` dimensional view. See [`Layout::sliding_window`].
    pub fn try_sliding_window<const K: usize, const M: usize>(
        &self,
        window: [I; K],
    ) -> Result<StridedView<'a, T, M, I>> {
        self.with_layout(self.layout.sliding_window::<K, M>(window)?)
    }

    pub fn sliding_window<const K: usize, const M: usize>(
        &self,
        window: [I; K],
    ) -> StridedView<'a, T, M, I> {
        expect_ok("sliding_window", self.try_sliding_window::<K, M>(window))
    }

    // ------------------------------------------------------------------------
    // Iteration
    // ------------------------------------------------------------------------

    /// Coordinates and addresses of the whole view in row-major order.
    pub fn positions(&self) -> Positions<N, I> {
        Positions::new(self.layout, 0..self.size())
    }

    /// Positions for iteration indices in `range`.
    ///
    /// # Panics
    /// Panics if `range.end > size()`.
    pub fn positions_range(&self, range: Range<usize>) -> Positions<N, I> {
        expect_ok("positions_range", self.try_positions_range(range))
    }

    pub fn try_positions_range(&self, range: Range<usize>) -> Result<Positions<N, I>> {
        check_range(&range, self.size())?;
        Ok(Positions::new(self.layout, range))
    }

    /// Element references in row-major order.
    pub fn iter_ref(&self) -> IterRef<'a, T, N, I> {
        IterRef::new(self.data, self.positions())
    }

    pub fn iter_ref_range(&self, range: Range<usize>) -> IterRef<'a, T, N, I> {
        IterRef::new(self.data, self.positions_range(range))
    }

    /// Coordinates in row-major order.
    pub fn coords(&self) -> Coords<N, I> {
        Coords::new(self.positions())
    }

    /// Positions of a periodic traversal of `shape` starting at `from`;
    /// see [`WrappingPositions`].
    pub fn wrapping_positions(&self, from: [I; N], shape: [I; N]) -> WrappingPositions<N, I> {
        WrappingPositions::new(self.layout, from, shape)
    }
}

impl<'a, T: Copy, const N: usize, I: IndexWidth> StridedView<'a, T, N, I> {
    /// Element at `coord`.
    ///
    /// # Panics
    /// Panics if `coord` is out of bounds.
    #[inline]
    pub fn get(&self, coord: [I; N]) -> T {
        *self.get_ref(coord)
    }

    #[inline]
    pub fn try_get(&self, coord: [I; N]) -> Result<T> {
        self.try_get_ref(coord).copied()
    }

    /// Element at `coord` without any checks.
    ///
    /// # Safety
    /// `coord` must be valid for this view.
    #[inline]
    pub unsafe fn get_unchecked(&self, coord: [I; N]) -> T {
        *self.data.get_unchecked(self.layout.address_of(&coord))
    }

    /// Element values in row-major order.
    pub fn iter(&self) -> Iter<'a, T, N, I> {
        Iter::new(self.data, self.positions())
    }

    /// Element values for iteration indices in `range`.
    ///
    /// # Panics
    /// Panics if `range.end > size()`.
    pub fn iter_range(&self, range: Range<usize>) -> Iter<'a, T, N, I> {
        Iter::new(self.data, self.positions_range(range))
    }

    pub fn try_iter_range(&self, range: Range<usize>) -> Result<Iter<'a, T, N, I>> {
        Ok(Iter::new(self.data, self.try_positions_range(range)?))
    }

    /// `(value, coordinate, address)` triples in row-major order.
    pub fn entries(&self) -> Entries<'a, T, N, I> {
        Entries::new(self.data, self.positions())
    }

    pub fn entries_range(&self, range: Range<usize>) -> Entries<'a, T, N, I> {
        Entries::new(self.data, self.positions_range(range))
    }

    /// Element values of a periodic traversal of `shape` starting at `from`.
    pub fn wrapping(&self, from: [I; N], shape: [I; N]) -> WrappingIter<'a, T, N, I> {
        WrappingIter::new(self.data, self.wrapping_positions(from, shape))
    }

    // ------------------------------------------------------------------------
    // Bulk copy
    // ------------------------------------------------------------------------

    /// Write the view's elements in iteration order to the front of `dest`.
    ///
    /// # Panics
    /// Panics if `dest` holds fewer than `size()` elements.
    pub fn copy_into(&self, dest: &mut [T]) {
        expect_ok("copy_into", self.try_copy_into(dest))
    }

    pub fn try_copy_into(&self, dest: &mut [T]) -> Result<()> {
        let needed = self.size();
        if dest.len() < needed {
            return Err(StridedError::BufferTooSmall {
                needed,
                got: dest.len(),
            });
        }
        for (slot, value) in dest.iter_mut().zip(self.iter()) {
            *slot = value;
        }
        Ok(())
    }

    /// Copy the view's elements in iteration order into a new buffer of
    /// exactly `size()` elements.
    pub fn to_vec(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.size());
        out.extend(self.iter());
        out
    }
}

// ============================================================================
// StridedViewMut
// ============================================================================

/// Exclusive `N`-dimensional strided view over `&'a mut [T]`.
///
/// Offers the same geometry as [`StridedView`] plus writes. Sub-views borrow
/// the parent mutably, so two live mutable views never alias.
pub struct StridedViewMut<'a, T, const N: usize, I: IndexWidth = u32> {
    data: &'a mut [T],
    layout: Layout<N, I>,
}

impl<T, const N: usize, I: IndexWidth> fmt::Debug for StridedViewMut<'_, T, N, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StridedViewMut")
            .field("shape", self.layout.shape())
            .field("strides", self.layout.strides())
            .field("offset", &self.layout.offset())
            .field("len", &self.data.len())
            .finish()
    }
}

impl<'a, T, const N: usize, I: IndexWidth> StridedViewMut<'a, T, N, I> {
    pub fn from_packed(buffer: &'a mut [T], shape: [I; N]) -> Result<Self> {
        Self::from_layout(buffer, Layout::try_packed(shape)?)
    }

    pub fn from_strided(
        buffer: &'a mut [T],
        strides: [I::Stride; N],
        shape: [I; N],
    ) -> Result<Self> {
        Self::from_layout(buffer, Layout::new(shape, strides, I::zero()))
    }

    pub fn from_strided_with_offset(
        buffer: &'a mut [T],
        offset: I,
        strides: [I::Stride; N],
        shape: [I; N],
    ) -> Result<Self> {
        Self::from_layout(buffer, Layout::new(shape, strides, offset))
    }

    pub fn from_layout(buffer: &'a mut [T], layout: Layout<N, I>) -> Result<Self> {
        layout.validate(buffer.len())?;
        Ok(Self {
            data: buffer,
            layout,
        })
    }

    #[inline]
    pub fn layout(&self) -> &Layout<N, I> {
        &self.layout
    }

    #[inline]
    pub fn shape(&self) -> &[I; N] {
        self.layout.shape()
    }

    #[inline]
    pub fn strides(&self) -> &[I::Stride; N] {
        self.layout.strides()
    }

    #[inline]
    pub fn offset(&self) -> I {
        self.layout.offset()
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.layout.size()
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        N
    }

    /// Reborrow as a shared view.
    pub fn as_view(&self) -> StridedView<'_, T, N, I> {
        StridedView {
            data: &*self.data,
            layout: self.layout,
        }
    }

    /// Give up write access for the full lifetime of the buffer.
    pub fn into_view(self) -> StridedView<'a, T, N, I> {
        StridedView {
            data: self.data,
            layout: self.layout,
        }
    }

    /// Shorter-lived mutable view with the same geometry.
    pub fn reborrow(&mut self) -> StridedViewMut<'_, T, N, I> {
        StridedViewMut {
            data: &mut *self.data,
            layout: self.layout,
        }
    }

    #[inline]
    pub fn address_of(&self, coord: &[I; N]) -> usize {
        self.layout.address_of(coord)
    }

    #[inline]
    pub fn try_address_of(&self, coord: &[I; N]) -> Result<usize> {
        self.layout.try_address_of(coord)
    }

    pub fn get_ref(&self, coord: [I; N]) -> &T {
        assert!(self.layout.is_valid(&coord), "index {coord:?} out of bounds");
        &self.data[self.layout.address_of(&coord)]
    }

    pub fn try_get_ref(&self, coord: [I; N]) -> Result<&T> {
        let address = self.layout.try_address_of(&coord)?;
        Ok(&self.data[address])
    }

    /// Mutable reference to the element at `coord`.
    ///
    /// # Panics
    /// Panics if `coord` is out of bounds.
    #[inline]
    pub fn get_mut(&mut self, coord: [I; N]) -> &mut T {
        assert!(self.layout.is_valid(&coord), "index {coord:?} out of bounds");
        &mut self.data[self.layout.address_of(&coord)]
    }

    pub fn try_get_mut(&mut self, coord: [I; N]) -> Result<&mut T> {
        let address = self.layout.try_address_of(&coord)?;
        Ok(&mut self.data[address])
    }

    /// Store `value` at `coord`.
    ///
    /// # Panics
    /// Panics if `coord` is out of bounds.
    #[inline]
    pub fn set(&mut self, coord: [I; N], value: T) {
        *self.get_mut(coord) = value;
    }

    pub fn try_set(&mut self, coord: [I; N], value: T) -> Result<()> {
        *self.try_get_mut(coord)? = value;
        Ok(())
    }

    /// Store `value` at `coord` without any checks.
    ///
    /// # Safety
    /// `coord` must be valid for this view.
    #[inline]
    pub unsafe fn set_unchecked(&mut self, coord: [I; N], value: T) {
        let address = self.layout.address_of(&coord);
        *self.data.get_unchecked_mut(address) = value;
    }

    /// Visit every element mutably in iteration order.
    ///
    /// Overlapping views visit shared elements once per coordinate.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut T)) {
        for (_, address) in Positions::new(self.layout, 0..self.layout.size()) {
            f(&mut self.data[address]);
        }
    }

    pub fn transpose(&mut self, d1: usize, d2: usize) {
        self.layout.transpose(d1, d2);
    }

    pub fn flip(&mut self, d: usize) {
        self.layout.flip(d);
    }

    pub fn try_flip(&mut self, d: usize) -> Result<()> {
        self.layout.try_flip(d)
    }

    pub fn permute(&mut self, perm: [usize; N]) {
        self.layout.permute(perm);
    }

    pub fn try_permute(&mut self, perm: [usize; N]) -> Result<()> {
        self.layout.try_permute(perm)
    }

    fn with_layout<const M: usize>(
        &mut self,
        layout: Layout<M, I>,
    ) -> Result<StridedViewMut<'_, T, M, I>> {
        layout.validate(self.data.len())?;
        Ok(StridedViewMut {
            data: &mut *self.data,
            layout,
        })
    }

    pub fn try_slice(&mut self, from: [I; N], shape: [I; N]) -> Result<StridedViewMut<'_, T, N, I>> {
        let layout = self.layout.slice(&from, shape)?;
        self.with_layout(layout)
    }

    pub fn slice(&mut self, from: [I; N], shape: [I; N]) -> StridedViewMut<'_, T, N, I> {
        expect_ok("slice", self.try_slice(from, shape))
    }

    pub fn try_slice_step(
        &mut self,
        from: [I; N],
        shape: [I; N],
        steps: [I; N],
    ) -> Result<StridedViewMut<'_, T, N, I>> {
        let layout = self.layout.slice_step(&from, shape, steps)?;
        self.with_layout(layout)
    }

    pub fn slice_step(
        &mut self,
        from: [I; N],
        shape: [I; N],
        steps: [I; N],
    ) -> StridedViewMut<'_, T, N, I> {
        expect_ok("slice_step", self.try_slice_step(from, shape, steps))
    }

    pub fn try_sliding_window<const K: usize, const M: usize>(
        &mut self,
        window: [I; K],
    ) -> Result<StridedViewMut<'_, T, M, I>> {
        let layout = self.layout.sliding_window::<K, M>(window)?;
        self.with_layout(layout)
    }

    pub fn sliding_window<const K: usize, const M: usize>(
        &mut self,
        window: [I; K],
    ) -> StridedViewMut<'_, T, M, I> {
        expect_ok("sliding_window", self.try_sliding_window::<K, M>(window))
    }
}

impl<'a, T: Copy, const N: usize, I: IndexWidth> StridedViewMut<'a, T, N, I> {
    pub fn get(&self, coord: [I; N]) -> T {
        *self.get_ref(coord)
    }

    pub fn try_get(&self, coord: [I; N]) -> Result<T> {
        self.try_get_ref(coord).copied()
    }

    /// Overwrite every element with `value`.
    pub fn fill(&mut self, value: T) {
        self.for_each_mut(|slot| *slot = value);
    }

    /// Write `src`'s elements in iteration order over this view's elements.
    ///
    /// # Errors
    /// [`StridedError::ShapeMismatch`] if the shapes differ.
    pub fn copy_from(&mut self, src: &StridedView<'_, T, N, I>) -> Result<()> {
        if src.shape() != self.shape() {
            return Err(StridedError::ShapeMismatch(
                src.shape().iter().map(|&e| e.as_()).collect(),
                self.shape().iter().map(|&e| e.as_()).collect(),
            ));
        }
        let dest = Positions::new(self.layout, 0..self.layout.size());
        for ((_, address), value) in dest.zip(src.iter()) {
            self.data[address] = value;
        }
        Ok(())
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.as_view().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer() -> Vec<u32> {
        (0..24).collect()
    }

    #[test]
    fn test_from_packed() {
        let data = buffer();
        let view = StridedView::<_, 3>::from_packed(&data, [2, 3, 4]).unwrap();
        assert_eq!(view.ndim(), 3);
        assert_eq!(view.shape(), &[2, 3, 4]);
        assert_eq!(view.strides(), &[12, 4, 1]);
        assert_eq!(view.offset(), 0);
        assert_eq!(view.size(), 24);
    }

    #[test]
    fn test_from_packed_rejects_short_buffer() {
        let data = buffer();
        let err = StridedView::<_, 3>::from_packed(&data[..23], [2, 3, 4]).unwrap_err();
        assert!(matches!(err, StridedError::InvalidView(_)));
    }

    #[test]
    fn test_from_packed_rejects_zero_extent() {
        let data = buffer();
        assert!(StridedView::<_, 3>::from_packed(&data, [2, 0, 4]).is_err());
    }

    #[test]
    fn test_from_strided_with_offset() {
        let data = buffer();
        let view =
            StridedView::<_, 3>::from_strided_with_offset(&data, 4, [4, 1, 1], [5, 3, 2]).unwrap();
        assert_eq!(view.size(), 30);
        assert_eq!(view.get([0, 0, 0]), 4);
        assert_eq!(view.get([4, 2, 1]), 23);
        assert!(StridedView::<_, 3>::from_strided_with_offset(&data, 5, [4, 1, 1], [5, 3, 2])
            .is_err());
    }

    #[test]
    fn test_get_and_try_get() {
        let data = buffer();
        let view = StridedView::<_, 2>::from_strided(&data, [6, 2], [4, 3]).unwrap();
        assert_eq!(view.get([3, 2]), 22);
        assert_eq!(view.try_get([3, 2]).unwrap(), 22);
        assert!(matches!(
            view.try_get([4, 0]),
            Err(StridedError::IndexOutOfBounds { dim: 0, .. })
        ));
        assert_eq!(unsafe { view.get_unchecked([1, 1]) }, 8);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_get_panics_out_of_bounds() {
        let data = buffer();
        let view = StridedView::<_, 3>::from_packed(&data, [2, 3, 4]).unwrap();
        view.get([0, 0, 4]);
    }

    #[test]
    fn test_get_ref_points_into_buffer() {
        let data = buffer();
        let view = StridedView::<_, 3>::from_packed(&data, [2, 3, 4]).unwrap();
        let r = view.get_ref([1, 0, 0]);
        assert!(std::ptr::eq(r, &data[12]));
    }

    #[test]
    fn test_view_is_copy() {
        let data = buffer();
        let view = StridedView::<_, 3>::from_packed(&data, [2, 3, 4]).unwrap();
        let mut other = view;
        other.flip(0);
        assert_eq!(view.get([0, 0, 0]), 0);
        assert_eq!(other.get([0, 0, 0]), 12);
    }

    #[test]
    fn test_iter_range() {
        let data = buffer();
        let view = StridedView::<_, 3>::from_packed(&data, [2, 3, 4]).unwrap();
        let values: Vec<u32> = view.iter_range(10..14).collect();
        assert_eq!(values, vec![10, 11, 12, 13]);
        assert!(view.try_iter_range(20..25).is_err());
    }

    #[test]
    fn test_entries() {
        let data = buffer();
        let mut view = StridedView::<_, 2>::from_packed(&data[..6], [2, 3]).unwrap();
        view.flip(1);
        let entries: Vec<_> = view.entries().take(2).collect();
        assert_eq!(entries, vec![(2, [0, 0], 2), (1, [0, 1], 1)]);
    }

    #[test]
    fn test_iter_ref_and_coords() {
        let data = buffer();
        let view = StridedView::<_, 2>::from_packed(&data[..4], [2, 2]).unwrap();
        let refs: Vec<&u32> = view.iter_ref().collect();
        assert_eq!(refs, vec![&0, &1, &2, &3]);
        let coords: Vec<[u32; 2]> = view.coords().collect();
        assert_eq!(coords, vec![[0, 0], [0, 1], [1, 0], [1, 1]]);
    }

    #[test]
    fn test_wrapping() {
        let data = buffer();
        let view = StridedView::<_, 2>::from_packed(&data[..12], [3, 4]).unwrap();
        let values: Vec<u32> = view.wrapping([2, 3], [2, 2]).collect();
        assert_eq!(values, vec![11, 8, 3, 0]);
    }

    #[test]
    fn test_slice() {
        let data = buffer();
        let view = StridedView::<_, 3>::from_packed(&data, [2, 3, 4]).unwrap();
        let sub = view.slice([0, 1, 1], [2, 2, 2]);
        assert_eq!(sub.to_vec(), vec![5, 6, 9, 10, 17, 18, 21, 22]);
        assert!(view.try_slice([0, 1, 1], [2, 3, 2]).is_err());
        assert!(view.try_slice([0, 1, 1], [2, 0, 2]).is_err());
    }

    #[test]
    fn test_slice_step() {
        let data = buffer();
        let view = StridedView::<_, 3>::from_packed(&data, [2, 3, 4]).unwrap();
        let sub = view.slice_step([0, 0, 1], [2, 3, 3], [1, 2, 2]);
        assert_eq!(sub.to_vec(), vec![1, 3, 9, 11, 13, 15, 21, 23]);
    }

    #[test]
    fn test_sliding_window() {
        let data = buffer();
        let view = StridedView::<_, 1>::from_packed(&data[..5], [5]).unwrap();
        let windows: StridedView<'_, u32, 2> = view.sliding_window([3]);
        assert_eq!(windows.shape(), &[3, 3]);
        assert_eq!(windows.to_vec(), vec![0, 1, 2, 1, 2, 3, 2, 3, 4]);
        assert!(view.try_sliding_window::<1, 2>([6]).is_err());
    }

    #[test]
    fn test_copy_into() {
        let data = buffer();
        let mut view = StridedView::<_, 2>::from_packed(&data[..6], [2, 3]).unwrap();
        view.transpose(0, 1);
        let mut dest = [0u32; 7];
        view.copy_into(&mut dest);
        assert_eq!(dest, [0, 3, 1, 4, 2, 5, 0]);
        let mut short = [0u32; 5];
        assert!(matches!(
            view.try_copy_into(&mut short),
            Err(StridedError::BufferTooSmall { needed: 6, got: 5 })
        ));
    }

    #[test]
    fn test_to_vec_exact_size() {
        let data = buffer();
        let view = StridedView::<_, 3>::from_packed(&data, [2, 3, 4]).unwrap();
        let sub = view.slice([1, 1, 0], [1, 2, 4]);
        let owned = sub.to_vec();
        assert_eq!(owned.len(), 8);
        assert_eq!(owned, (16..24).collect::<Vec<u32>>());
    }

    #[test]
    fn test_view_mut_set() {
        let mut data = vec![0u32; 6];
        {
            let mut view = StridedViewMut::<_, 2>::from_packed(&mut data, [2, 3]).unwrap();
            view.set([0, 0], 1);
            view.set([1, 2], 6);
            *view.get_mut([0, 1]) = 2;
            assert!(view.try_set([2, 0], 9).is_err());
        }
        assert_eq!(data, vec![1, 2, 0, 0, 0, 6]);
    }

    #[test]
    fn test_view_mut_flipped_writes() {
        let mut data = vec![0u32; 4];
        {
            let mut view = StridedViewMut::<_, 1>::from_packed(&mut data, [4]).unwrap();
            view.flip(0);
            for i in 0..4 {
                view.set([i], i);
            }
        }
        assert_eq!(data, vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_view_mut_slice_fill() {
        let mut data = vec![0u32; 12];
        {
            let mut view = StridedViewMut::<_, 2>::from_packed(&mut data, [3, 4]).unwrap();
            view.slice([1, 1], [2, 2]).fill(7);
            assert_eq!(view.get([2, 2]), 7);
        }
        assert_eq!(data, vec![0, 0, 0, 0, 0, 7, 7, 0, 0, 7, 7, 0]);
    }

    #[test]
    fn test_view_mut_copy_from() {
        let src_data = buffer();
        let mut src = StridedView::<_, 2>::from_packed(&src_data[..6], [2, 3]).unwrap();
        src.flip(0);
        let mut data = vec![0u32; 6];
        let mut dest = StridedViewMut::<_, 2>::from_packed(&mut data, [2, 3]).unwrap();
        dest.copy_from(&src).unwrap();
        assert_eq!(dest.to_vec(), vec![3, 4, 5, 0, 1, 2]);

        let other = StridedView::<_, 2>::from_packed(&src_data[..6], [3, 2]).unwrap();
        assert!(matches!(
            dest.copy_from(&other),
            Err(StridedError::ShapeMismatch(_, _))
        ));
    }

    #[test]
    fn test_view_mut_overlapping_for_each() {
        let mut data = vec![0u32; 5];
        {
            let mut view = StridedViewMut::<_, 1>::from_packed(&mut data, [5]).unwrap();
            let mut windows = view.sliding_window::<1, 2>([2]);
            windows.for_each_mut(|x| *x += 1);
        }
        assert_eq!(data, vec![1, 2, 2, 2, 1]);
    }

    #[test]
    fn test_index_width_u8() {
        let data: Vec<u8> = (0..=255).collect();
        let view = StridedView::<_, 2, u8>::from_packed(&data, [16, 16]).unwrap();
        assert_eq!(view.strides(), &[16i16, 1]);
        assert_eq!(view.get([15, 15]), 255);
        let mut flipped = view;
        flipped.flip(0);
        flipped.flip(1);
        assert_eq!(flipped.offset(), 255);
        assert_eq!(flipped.get([0, 0]), 255);
    }

    #[test]
    fn test_u8_view_over_long_buffer() {
        let mut data = vec![0u8; 40_000];
        data[9] = 9;
        let view = StridedView::<_, 1, u8>::from_packed(&data, [10]).unwrap();
        assert_eq!(view.get([9]), 9);
        // reachable addresses still have to fit the stride type
        assert!(StridedView::<_, 2, u8>::from_strided(&data, [200, 1], [200, 200]).is_err());
        let strided = StridedView::<_, 2, u8>::from_strided(&data, [100, 1], [200, 100]).unwrap();
        assert_eq!(strided.address_of(&[199, 99]), 19_999);

        let mut view = StridedViewMut::<_, 1, u8>::from_packed(&mut data, [10]).unwrap();
        view.set([0], 3);
        assert_eq!(data[0], 3);
    }

    #[test]
    fn test_from_packed_stride_overflow_is_error() {
        let data = vec![0u8; 80_000];
        assert!(matches!(
            StridedView::<_, 3, u8>::from_packed(&data, [2, 200, 200]),
            Err(StridedError::InvalidView(_))
        ));
        assert!(matches!(
            StridedView::<_, 3, u16>::from_packed(&data, [2, 60_000, 60_000]),
            Err(StridedError::InvalidView(_))
        ));
        let mut data = data;
        assert!(StridedViewMut::<_, 3, u8>::from_packed(&mut data, [2, 200, 200]).is_err());
    }

    #[test]
    fn test_try_flip_near_index_max() {
        let data = vec![0u8; 131_070];
        let mut view = StridedView::<_, 2, u16>::from_packed(&data, [2, u16::MAX]).unwrap();
        view.try_flip(0).unwrap();
        assert_eq!(view.offset(), u16::MAX);
        let before = *view.layout();
        assert!(matches!(view.try_flip(1), Err(StridedError::InvalidView(_))));
        assert_eq!(view.layout(), &before);
        assert!(matches!(
            view.try_flip(2),
            Err(StridedError::InvalidAxis { axis: 2, rank: 2 })
        ));
    }

    #[test]
    #[should_panic(expected = "flip(1) failed")]
    fn test_flip_panics_past_index_max() {
        let data = vec![0u16; 510];
        let mut view = StridedView::<_, 2, u8>::from_packed(&data, [2, 255]).unwrap();
        view.flip(0);
        view.flip(1);
    }

    #[test]
    fn test_slice_offset_must_fit_index_width() {
        let data = vec![0u16; 600];
        let view = StridedView::<_, 1, u16>::from_packed(&data, [600]).unwrap();
        assert_eq!(view.slice([300], [10]).offset(), 300);
        let tiny = StridedView::<_, 2, u8>::from_strided(&data, [255, 1], [2, 255]).unwrap();
        assert!(tiny.try_slice([1, 10], [1, 2]).is_err());
    }
}
