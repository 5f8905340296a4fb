use std::cmp;

use crate::error::{Result, SoilIndexError};
use crate::indices::Indices;
use crate::kdtree::KdTree;
use crate::r#type::IndexableNum;

const DEFAULT_NODE_SIZE: usize = 64;

/// A builder to create a [`KdTree`].
///
/// Points are accumulated with [`add`][KdTreeBuilder::add] and kd-sorted once
/// in [`finish`][KdTreeBuilder::finish]; the resulting tree is immutable.
pub struct KdTreeBuilder<N: IndexableNum, const K: usize> {
    /// flat coordinate buffer, `K` scalars per point
    coords: Vec<N>,

    ids: Indices,
    num_items: usize,
    node_size: usize,

    pos: usize,
}

impl<N: IndexableNum, const K: usize> KdTreeBuilder<N, K> {
    /// Create a new builder with the provided number of items and the default node size.
    pub fn new(num_items: usize) -> Self {
        Self::with_node_size(num_items, DEFAULT_NODE_SIZE)
    }

    /// Create a new builder with the provided number of items and node size.
    ///
    /// `node_size` is the length of the leaf runs left unsorted and scanned
    /// linearly at query time.
    pub fn with_node_size(num_items: usize, node_size: usize) -> Self {
        assert!((2..=65535).contains(&node_size));
        assert!(num_items <= u32::MAX as usize);

        Self {
            coords: vec![N::zero(); num_items * K],
            ids: Indices::identity(num_items),
            num_items,
            node_size,
            pos: 0,
        }
    }

    /// Add a point to the index.
    ///
    /// Duplicate points are accepted as-is; the index does not deduplicate.
    /// Returns the insertion id later reported by queries.
    pub fn add(&mut self, point: [N; K]) -> u32 {
        let index = self.pos / K;
        for &value in point.iter() {
            self.coords[self.pos] = value;
            self.pos += 1;
        }
        index as u32
    }

    /// Consume this builder, performing the k-d sort and generating a
    /// [`KdTree`] ready for queries.
    ///
    /// Fails with [`SoilIndexError::EmptyIndex`] when no points were added:
    /// an index over nothing cannot answer any query, so it is never built.
    pub fn finish(mut self) -> Result<KdTree<N, K>> {
        let added = self.pos / K;
        if added == 0 {
            return Err(SoilIndexError::EmptyIndex);
        }
        assert_eq!(
            added, self.num_items,
            "Added {} items when expected {}.",
            added, self.num_items
        );

        // kd-sort both arrays for efficient search
        sort::<N, K>(
            &mut self.ids,
            &mut self.coords,
            self.node_size,
            0,
            self.num_items - 1,
            0,
        );

        Ok(KdTree {
            coords: self.coords,
            ids: self.ids,
            num_items: self.num_items,
            node_size: self.node_size,
        })
    }
}

/// Recursively kd-sort `ids` and `coords`: the median along the current axis
/// lands in the middle slot, both halves recurse on the next axis, and runs
/// no longer than `node_size` are left as unsorted leaves.
fn sort<N: IndexableNum, const K: usize>(
    ids: &mut Indices,
    coords: &mut [N],
    node_size: usize,
    left: usize,
    right: usize,
    axis: usize,
) {
    if right - left <= node_size {
        return;
    }

    // middle index
    let m = (left + right) >> 1;

    // sort ids and coords around the middle index so that the halves lie on
    // either side of the splitting hyperplane
    select::<N, K>(ids, coords, m, left, right, axis);

    // recursively kd-sort first half and second half on the next axis
    let next_axis = (axis + 1) % K;
    sort::<N, K>(ids, coords, node_size, left, m - 1, next_axis);
    sort::<N, K>(ids, coords, node_size, m + 1, right, next_axis);
}

/// Custom Floyd-Rivest selection algorithm: sort ids and coords so that
/// `[left..k-1]` items are smaller than the k-th item along `axis`.
#[inline]
fn select<N: IndexableNum, const K: usize>(
    ids: &mut Indices,
    coords: &mut [N],
    k: usize,
    mut left: usize,
    mut right: usize,
    axis: usize,
) {
    while right > left {
        if right - left > 600 {
            let n = (right - left + 1) as f64;
            let m = (k - left + 1) as f64;
            let z = f64::ln(n);
            let s = 0.5 * f64::exp((2.0 * z) / 3.0);
            let sd = 0.5
                * f64::sqrt((z * s * (n - s)) / n)
                * (if m - n / 2.0 < 0.0 { -1.0 } else { 1.0 });
            let new_left = cmp::max(left, f64::floor(k as f64 - (m * s) / n + sd) as usize);
            let new_right = cmp::min(
                right,
                f64::floor(k as f64 + ((n - m) * s) / n + sd) as usize,
            );
            select::<N, K>(ids, coords, k, new_left, new_right, axis);
        }

        let t = coords[K * k + axis];
        let mut i = left;
        let mut j = right;

        swap_item::<N, K>(ids, coords, left, k);
        if coords[K * right + axis] > t {
            swap_item::<N, K>(ids, coords, left, right);
        }

        while i < j {
            swap_item::<N, K>(ids, coords, i, j);
            i += 1;
            j -= 1;
            while coords[K * i + axis] < t {
                i += 1;
            }
            while coords[K * j + axis] > t {
                j -= 1;
            }
        }

        if coords[K * left + axis] == t {
            swap_item::<N, K>(ids, coords, left, j);
        } else {
            j += 1;
            swap_item::<N, K>(ids, coords, j, right);
        }

        if j <= k {
            left = j + 1;
        }
        if k <= j {
            right = j - 1;
        }
    }
}

#[inline]
fn swap_item<N: IndexableNum, const K: usize>(
    ids: &mut Indices,
    coords: &mut [N],
    i: usize,
    j: usize,
) {
    ids.swap(i, j);
    for axis in 0..K {
        coords.swap(K * i + axis, K * j + axis);
    }
}
