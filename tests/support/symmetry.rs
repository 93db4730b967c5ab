//! Exhaustive axis permutation and reflection of a view.

use strided_nd::{IndexWidth, StridedView};

/// One symmetric variant of a view, as produced by [`for_each_symmetry`].
pub struct Variant<'a, T, const N: usize, I: IndexWidth> {
    pub view: StridedView<'a, T, N, I>,
    /// Variant dimension `i` is original dimension `perm[i]`.
    pub perm: [usize; N],
    /// Bit `i` set: variant dimension `i` is reversed.
    pub flips: u32,
}

impl<T, const N: usize, I: IndexWidth> Variant<'_, T, N, I> {
    /// Original coordinate addressed by variant coordinate `coord`.
    pub fn original_coord(&self, coord: &[I; N]) -> [I; N] {
        let shape = self.view.shape();
        let mut original = [I::zero(); N];
        for i in 0..N {
            original[self.perm[i]] = if self.flips & (1 << i) != 0 {
                shape[i] - I::one() - coord[i]
            } else {
                coord[i]
            };
        }
        original
    }
}

fn heap<'a, T, const N: usize, I: IndexWidth>(
    k: usize,
    view: &mut StridedView<'a, T, N, I>,
    perm: &mut [usize; N],
    visit: &mut dyn FnMut(&StridedView<'a, T, N, I>, &[usize; N]),
) {
    if k <= 1 {
        visit(view, perm);
        return;
    }
    for i in 0..k - 1 {
        heap(k - 1, view, perm, visit);
        let j = if k % 2 == 0 { i } else { 0 };
        view.transpose(j, k - 1);
        perm.swap(j, k - 1);
    }
    heap(k - 1, view, perm, visit);
}

/// Call `check` on every combination of axis permutation (built from
/// `transpose`) and per-axis reflection (`flip`) of `view`.
///
/// Returns the number of variants visited, `N! * 2^N`.
pub fn for_each_symmetry<'a, T, const N: usize, I: IndexWidth>(
    view: StridedView<'a, T, N, I>,
    mut check: impl FnMut(&Variant<'a, T, N, I>),
) -> usize {
    let mut count = 0;
    let mut running = view;
    let mut perm: [usize; N] = std::array::from_fn(|i| i);
    let mut visit = |permuted: &StridedView<'a, T, N, I>, perm: &[usize; N]| {
        for flips in 0..(1u32 << N) {
            let mut flipped = *permuted;
            for d in 0..N {
                if flips & (1 << d) != 0 {
                    flipped.flip(d);
                }
            }
            check(&Variant {
                view: flipped,
                perm: *perm,
                flips,
            });
            count += 1;
        }
    };
    heap(N, &mut running, &mut perm, &mut visit);
    count
}
