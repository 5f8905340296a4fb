use crate::indices::Indices;
use crate::r#type::IndexableNum;

/// An immutable k-d tree over `K`-dimensional points.
///
/// Created via [`KdTreeBuilder`][crate::kdtree::KdTreeBuilder], which
/// kd-sorts the points once; afterwards the tree only answers queries.
#[derive(Debug, Clone, PartialEq)]
pub struct KdTree<N: IndexableNum, const K: usize> {
    pub(crate) coords: Vec<N>,
    pub(crate) ids: Indices,
    pub(crate) num_items: usize,
    pub(crate) node_size: usize,
}

/// The stored point closest to a query, as reported by [`KdTree::nearest`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<N: IndexableNum, const K: usize> {
    /// Insertion id of the point, as returned by the builder's `add`.
    pub index: u32,
    /// The stored point itself.
    pub point: [N; K],
    /// Squared Euclidean distance between the query and `point`.
    pub dist_sq: N,
}

impl<N: IndexableNum, const K: usize> KdTree<N, K> {
    /// The number of points in this tree.
    pub fn num_items(&self) -> usize {
        self.num_items
    }

    /// The leaf run length of this tree.
    pub fn node_size(&self) -> usize {
        self.node_size
    }

    /// The underlying kd-sorted coordinate buffer, `K` scalars per point.
    pub fn coords(&self) -> &[N] {
        &self.coords
    }

    /// Find the stored point nearest to `query` under Euclidean distance.
    ///
    /// The query point need not be stored in the tree, and a tree built from
    /// a single point returns that point for every query. Among exactly
    /// equidistant points the lexicographically smallest wins, so results do
    /// not depend on traversal order.
    pub fn nearest(&self, query: &[N; K]) -> Neighbor<N, K> {
        // Seed the candidate with the first stored point so the descent
        // always has a real distance to prune against.
        let seed = self.point_at(0);
        let mut best = Neighbor {
            index: self.ids.get(0) as u32,
            point: seed,
            dist_sq: sq_dist(&seed, query),
        };
        self.nearest_in(0, self.num_items - 1, 0, query, &mut best);
        best
    }

    /// Search `coords[left..=right]`, split along `axis`, for improvements
    /// on `best`.
    fn nearest_in(
        &self,
        left: usize,
        right: usize,
        axis: usize,
        query: &[N; K],
        best: &mut Neighbor<N, K>,
    ) {
        // if we reached "tree node", search linearly
        if right - left <= self.node_size {
            for slot in left..=right {
                self.consider(slot, query, best);
            }
            return;
        }

        // otherwise the middle item splits the range
        let m = (left + right) >> 1;
        self.consider(m, query, best);

        let split = self.coords[K * m + axis];
        let next_axis = (axis + 1) % K;

        // descend into the half containing the query first
        let (near, far) = if query[axis] < split {
            ((left, m - 1), (m + 1, right))
        } else {
            ((m + 1, right), (left, m - 1))
        };
        self.nearest_in(near.0, near.1, next_axis, query, best);

        // the far half can only hold an improvement when the splitting
        // hyperplane is no farther than the best candidate (equality kept so
        // an equidistant, lexicographically smaller point is still reached)
        let delta = abs_diff(query[axis], split);
        if delta * delta <= best.dist_sq {
            self.nearest_in(far.0, far.1, next_axis, query, best);
        }
    }

    #[inline]
    fn consider(&self, slot: usize, query: &[N; K], best: &mut Neighbor<N, K>) {
        let point = self.point_at(slot);
        let dist_sq = sq_dist(&point, query);
        if dist_sq < best.dist_sq || (dist_sq == best.dist_sq && lex_less(&point, &best.point)) {
            *best = Neighbor {
                index: self.ids.get(slot) as u32,
                point,
                dist_sq,
            };
        }
    }

    #[inline]
    fn point_at(&self, slot: usize) -> [N; K] {
        std::array::from_fn(|axis| self.coords[K * slot + axis])
    }
}

/// Squared Euclidean distance between two points.
#[inline]
pub(crate) fn sq_dist<N: IndexableNum, const K: usize>(a: &[N; K], b: &[N; K]) -> N {
    let mut acc = N::zero();
    for axis in 0..K {
        let d = abs_diff(a[axis], b[axis]);
        acc = acc + d * d;
    }
    acc
}

// Subtract smaller from larger so unsigned scalars cannot underflow.
#[inline]
fn abs_diff<N: IndexableNum>(a: N, b: N) -> N {
    if a > b {
        a - b
    } else {
        b - a
    }
}

#[inline]
fn lex_less<N: IndexableNum, const K: usize>(a: &[N; K], b: &[N; K]) -> bool {
    for axis in 0..K {
        if a[axis] < b[axis] {
            return true;
        }
        if a[axis] > b[axis] {
            return false;
        }
    }
    false
}
