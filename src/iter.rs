//! Iterators over strided views.
//!
//! [`Positions`] walks a half-open range of row-major iteration indices and
//! yields `(coordinate, address)` pairs; the element iterators are thin
//! wrappers that read the borrowed buffer at each address.
//! [`WrappingPositions`] walks a caller-given shape with every dimension taken
//! modulo the layout's extent.

use std::iter::FusedIterator;
use std::ops::Range;

use crate::index::IndexWidth;
use crate::layout::{size, Layout};

// ============================================================================
// Positions
// ============================================================================

/// Coordinates and storage addresses for a range of iteration indices.
///
/// Holds a copy of the layout and two cursors, so it is cheap to create and
/// independent of any other iterator over the same view.
#[derive(Debug, Clone)]
pub struct Positions<const N: usize, I: IndexWidth = u32> {
    layout: Layout<N, I>,
    front: usize,
    back: usize,
}

impl<const N: usize, I: IndexWidth> Positions<N, I> {
    /// Positions for iteration indices `range.start..range.end`.
    ///
    /// The caller guarantees `range.end <= layout.size()`. An inverted range
    /// is empty.
    pub(crate) fn new(layout: Layout<N, I>, range: Range<usize>) -> Self {
        Self {
            layout,
            front: range.start,
            back: range.end.max(range.start),
        }
    }

    #[inline]
    fn position_at(&self, index: usize) -> ([I; N], usize) {
        let coord = self.layout.coord_of_iteration_index(index);
        let address = self.layout.address_of(&coord);
        (coord, address)
    }
}

impl<const N: usize, I: IndexWidth> Iterator for Positions<N, I> {
    type Item = ([I; N], usize);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let item = self.position_at(self.front);
        self.front += 1;
        Some(item)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }
}

impl<const N: usize, I: IndexWidth> DoubleEndedIterator for Positions<N, I> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(self.position_at(self.back))
    }
}

impl<const N: usize, I: IndexWidth> ExactSizeIterator for Positions<N, I> {}
impl<const N: usize, I: IndexWidth> FusedIterator for Positions<N, I> {}

// ============================================================================
// Element iterators
// ============================================================================

/// Iterator over element values in row-major order.
pub struct Iter<'a, T, const N: usize, I: IndexWidth = u32> {
    data: &'a [T],
    positions: Positions<N, I>,
}

impl<'a, T, const N: usize, I: IndexWidth> Iter<'a, T, N, I> {
    pub(crate) fn new(data: &'a [T], positions: Positions<N, I>) -> Self {
        Self { data, positions }
    }
}

impl<'a, T: Copy, const N: usize, I: IndexWidth> Iterator for Iter<'a, T, N, I> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        let (_, address) = self.positions.next()?;
        Some(self.data[address])
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.positions.size_hint()
    }
}

impl<'a, T: Copy, const N: usize, I: IndexWidth> DoubleEndedIterator for Iter<'a, T, N, I> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        let (_, address) = self.positions.next_back()?;
        Some(self.data[address])
    }
}

impl<'a, T: Copy, const N: usize, I: IndexWidth> ExactSizeIterator for Iter<'a, T, N, I> {}
impl<'a, T: Copy, const N: usize, I: IndexWidth> FusedIterator for Iter<'a, T, N, I> {}

/// Iterator over element references in row-major order.
pub struct IterRef<'a, T, const N: usize, I: IndexWidth = u32> {
    data: &'a [T],
    positions: Positions<N, I>,
}

impl<'a, T, const N: usize, I: IndexWidth> IterRef<'a, T, N, I> {
    pub(crate) fn new(data: &'a [T], positions: Positions<N, I>) -> Self {
        Self { data, positions }
    }
}

impl<'a, T, const N: usize, I: IndexWidth> Iterator for IterRef<'a, T, N, I> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        let (_, address) = self.positions.next()?;
        let data: &'a [T] = self.data;
        Some(&data[address])
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.positions.size_hint()
    }
}

impl<'a, T, const N: usize, I: IndexWidth> DoubleEndedIterator for IterRef<'a, T, N, I> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a T> {
        let (_, address) = self.positions.next_back()?;
        let data: &'a [T] = self.data;
        Some(&data[address])
    }
}

impl<'a, T, const N: usize, I: IndexWidth> ExactSizeIterator for IterRef<'a, T, N, I> {}
impl<'a, T, const N: usize, I: IndexWidth> FusedIterator for IterRef<'a, T, N, I> {}

/// Iterator over coordinates in row-major order.
#[derive(Debug, Clone)]
pub struct Coords<const N: usize, I: IndexWidth = u32> {
    positions: Positions<N, I>,
}

impl<const N: usize, I: IndexWidth> Coords<N, I> {
    pub(crate) fn new(positions: Positions<N, I>) -> Self {
        Self { positions }
    }
}

impl<const N: usize, I: IndexWidth> Iterator for Coords<N, I> {
    type Item = [I; N];

    #[inline]
    fn next(&mut self) -> Option<[I; N]> {
        self.positions.next().map(|(coord, _)| coord)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.positions.size_hint()
    }
}

impl<const N: usize, I: IndexWidth> DoubleEndedIterator for Coords<N, I> {
    #[inline]
    fn next_back(&mut self) -> Option<[I; N]> {
        self.positions.next_back().map(|(coord, _)| coord)
    }
}

impl<const N: usize, I: IndexWidth> ExactSizeIterator for Coords<N, I> {}
impl<const N: usize, I: IndexWidth> FusedIterator for Coords<N, I> {}

/// Iterator yielding `(value, coordinate, address)` triples in row-major order.
pub struct Entries<'a, T, const N: usize, I: IndexWidth = u32> {
    data: &'a [T],
    positions: Positions<N, I>,
}

impl<'a, T, const N: usize, I: IndexWidth> Entries<'a, T, N, I> {
    pub(crate) fn new(data: &'a [T], positions: Positions<N, I>) -> Self {
        Self { data, positions }
    }
}

impl<'a, T: Copy, const N: usize, I: IndexWidth> Iterator for Entries<'a, T, N, I> {
    type Item = (T, [I; N], usize);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let (coord, address) = self.positions.next()?;
        Some((self.data[address], coord, address))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.positions.size_hint()
    }
}

impl<'a, T: Copy, const N: usize, I: IndexWidth> ExactSizeIterator for Entries<'a, T, N, I> {}
impl<'a, T: Copy, const N: usize, I: IndexWidth> FusedIterator for Entries<'a, T, N, I> {}

// ============================================================================
// Wrapping iteration
// ============================================================================

/// Periodic traversal of a caller-given shape.
///
/// Counter `k` runs over `shape` in row-major order; the yielded coordinate is
/// `(from[d] + k[d]) % layout.shape[d]` in every dimension. Exactly
/// `Π shape[d]` positions are produced, none if some extent of `shape` is 0.
#[derive(Debug, Clone)]
pub struct WrappingPositions<const N: usize, I: IndexWidth = u32> {
    layout: Layout<N, I>,
    from: [I; N],
    shape: [I; N],
    counter: [I; N],
    remaining: usize,
    done: bool,
}

impl<const N: usize, I: IndexWidth> WrappingPositions<N, I> {
    pub(crate) fn new(layout: Layout<N, I>, from: [I; N], shape: [I; N]) -> Self {
        let remaining = size(&shape);
        Self {
            layout,
            from,
            shape,
            counter: [I::zero(); N],
            remaining,
            done: remaining == 0,
        }
    }

    fn wrapped(&self) -> [I; N] {
        let extents = self.layout.shape();
        let mut coord = [I::zero(); N];
        for d in 0..N {
            let from: usize = self.from[d].as_();
            let step: usize = self.counter[d].as_();
            let extent: usize = extents[d].as_();
            coord[d] = I::truncate_from((from % extent + step % extent) % extent);
        }
        coord
    }

    /// Increment the innermost counter, carrying outward. Returns `true` once
    /// the outermost counter rolls over.
    fn advance(&mut self) -> bool {
        for d in (0..N).rev() {
            self.counter[d] = self.counter[d] + I::one();
            if self.counter[d] < self.shape[d] {
                return false;
            }
            self.counter[d] = I::zero();
        }
        true
    }
}

impl<const N: usize, I: IndexWidth> Iterator for WrappingPositions<N, I> {
    type Item = ([I; N], usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let coord = self.wrapped();
        let address = self.layout.address_of(&coord);
        self.done = self.advance();
        self.remaining -= 1;
        Some((coord, address))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<const N: usize, I: IndexWidth> ExactSizeIterator for WrappingPositions<N, I> {}
impl<const N: usize, I: IndexWidth> FusedIterator for WrappingPositions<N, I> {}

/// Element values of a [`WrappingPositions`] traversal.
pub struct WrappingIter<'a, T, const N: usize, I: IndexWidth = u32> {
    data: &'a [T],
    positions: WrappingPositions<N, I>,
}

impl<'a, T, const N: usize, I: IndexWidth> WrappingIter<'a, T, N, I> {
    pub(crate) fn new(data: &'a [T], positions: WrappingPositions<N, I>) -> Self {
        Self { data, positions }
    }
}

impl<'a, T: Copy, const N: usize, I: IndexWidth> Iterator for WrappingIter<'a, T, N, I> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        let (_, address) = self.positions.next()?;
        Some(self.data[address])
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.positions.size_hint()
    }
}

impl<'a, T: Copy, const N: usize, I: IndexWidth> ExactSizeIterator for WrappingIter<'a, T, N, I> {}
impl<'a, T: Copy, const N: usize, I: IndexWidth> FusedIterator for WrappingIter<'a, T, N, I> {}
