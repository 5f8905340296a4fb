use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::kdtree::index::sq_dist;
use crate::kdtree::{KdTree, KdTreeBuilder, Neighbor};
use crate::SoilIndexError;

fn make_tree<const K: usize>(points: &[[f64; K]], node_size: usize) -> KdTree<f64, K> {
    let mut builder = KdTreeBuilder::with_node_size(points.len(), node_size);
    for &point in points {
        builder.add(point);
    }
    builder.finish().unwrap()
}

/// Reference implementation: linear scan with the same lexicographic
/// tie-break the tree promises.
fn brute_force<const K: usize>(points: &[[f64; K]], query: &[f64; K]) -> Neighbor<f64, K> {
    let mut best: Option<Neighbor<f64, K>> = None;
    for (index, &point) in points.iter().enumerate() {
        let dist_sq = sq_dist(&point, query);
        let better = match best {
            None => true,
            Some(b) => dist_sq < b.dist_sq || (dist_sq == b.dist_sq && point < b.point),
        };
        if better {
            best = Some(Neighbor {
                index: index as u32,
                point,
                dist_sq,
            });
        }
    }
    best.unwrap()
}

#[test]
fn finds_nearest_in_fixed_point_set() {
    let points: Vec<[i32; 2]> = vec![[2, 3], [5, 4], [9, 6], [4, 7], [8, 1], [7, 2]];
    let mut builder = KdTreeBuilder::with_node_size(points.len(), 2);
    for &point in &points {
        builder.add(point);
    }
    let tree = builder.finish().unwrap();

    assert_eq!(tree.nearest(&[9, 2]).point, [8, 1]);
}

#[test]
fn finds_exact_point() {
    let points: Vec<[i32; 2]> = vec![[2, 3], [5, 4], [9, 6], [4, 7], [8, 1], [7, 2]];
    let mut builder = KdTreeBuilder::with_node_size(points.len(), 2);
    for &point in &points {
        builder.add(point);
    }
    let tree = builder.finish().unwrap();

    let nearest = tree.nearest(&[5, 4]);
    assert_eq!(nearest.point, [5, 4]);
    assert_eq!(nearest.dist_sq, 0);
}

#[test]
fn single_point_tree_returns_it_for_any_query() {
    let tree = make_tree(&[[2.0, 3.0]], 2);

    assert_eq!(tree.nearest(&[5.0, 4.0]).point, [2.0, 3.0]);
    assert_eq!(tree.nearest(&[-1000.0, 1000.0]).point, [2.0, 3.0]);
    assert_eq!(tree.nearest(&[2.0, 3.0]).dist_sq, 0.0);
}

#[test]
fn empty_build_is_rejected() {
    let builder = KdTreeBuilder::<f64, 2>::new(0);

    assert!(matches!(
        builder.finish(),
        Err(SoilIndexError::EmptyIndex)
    ));
}

#[test]
fn reports_insertion_ids() {
    let points = [[0.0, 0.0], [10.0, 10.0], [-5.0, 2.0], [3.0, -8.0]];
    let tree = make_tree(&points, 2);

    assert_eq!(tree.nearest(&[9.0, 9.0]).index, 1);
    assert_eq!(tree.nearest(&[-5.0, 2.0]).index, 2);
}

#[test]
fn duplicate_points_are_kept() {
    let tree = make_tree(&[[1.0, 1.0], [1.0, 1.0], [4.0, 4.0]], 2);

    let nearest = tree.nearest(&[1.1, 1.0]);
    assert_eq!(nearest.point, [1.0, 1.0]);
}

#[test]
fn equidistant_ties_break_lexicographically() {
    // All four points sit at distance 1 from the query.
    let tree = make_tree(&[[1.0, 2.0], [2.0, 1.0], [1.0, 0.0], [0.0, 1.0]], 2);
    assert_eq!(tree.nearest(&[1.0, 1.0]).point, [0.0, 1.0]);

    // An equidistant pair straddling the splitting hyperplane.
    let tree = make_tree(&[[2.0, 0.0], [0.0, 0.0], [5.0, 5.0], [-5.0, 5.0]], 2);
    assert_eq!(tree.nearest(&[1.0, 0.0]).point, [0.0, 0.0]);
}

#[test]
fn matches_linear_scan_2d() {
    let mut rng = StdRng::seed_from_u64(42);

    for num_points in [1, 2, 3, 10, 99, 1000] {
        let points: Vec<[f64; 2]> = (0..num_points)
            .map(|_| [rng.gen_range(-180.0..180.0), rng.gen_range(-90.0..90.0)])
            .collect();
        let tree = make_tree(&points, 4);

        for _ in 0..100 {
            let query = [rng.gen_range(-180.0..180.0), rng.gen_range(-90.0..90.0)];
            let expected = brute_force(&points, &query);
            let actual = tree.nearest(&query);

            assert_eq!(actual.dist_sq, expected.dist_sq);
            assert_eq!(actual.point, expected.point);
        }
    }
}

#[test]
fn matches_linear_scan_3d() {
    let mut rng = StdRng::seed_from_u64(7);

    for num_points in [1, 5, 50, 500] {
        let points: Vec<[f64; 3]> = (0..num_points)
            .map(|_| {
                [
                    rng.gen_range(-100.0..100.0),
                    rng.gen_range(-100.0..100.0),
                    rng.gen_range(-100.0..100.0),
                ]
            })
            .collect();
        let tree = make_tree(&points, 4);

        for _ in 0..50 {
            let query = [
                rng.gen_range(-100.0..100.0),
                rng.gen_range(-100.0..100.0),
                rng.gen_range(-100.0..100.0),
            ];
            let expected = brute_force(&points, &query);
            let actual = tree.nearest(&query);

            assert_eq!(actual.dist_sq, expected.dist_sq);
            assert_eq!(actual.point, expected.point);
        }
    }
}

#[test]
fn matches_linear_scan_on_a_regular_grid() {
    // Grids produce many collinear points and exact medians, the worst case
    // for partition bookkeeping.
    let mut points = Vec::new();
    for i in 0..40 {
        for j in 0..40 {
            points.push([i as f64 * 0.5 - 10.0, j as f64 * 0.5 - 10.0]);
        }
    }
    let tree = make_tree(&points, 8);

    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..200 {
        let query = [rng.gen_range(-12.0..12.0), rng.gen_range(-12.0..12.0)];
        let expected = brute_force(&points, &query);
        let actual = tree.nearest(&query);

        assert_eq!(actual.dist_sq, expected.dist_sq);
        assert_eq!(actual.point, expected.point);
    }
}

#[test]
fn coords_are_preserved_through_the_sort() {
    let points = [[3.0, 1.0], [0.0, 5.0], [2.0, 2.0], [8.0, 9.0], [4.0, 4.0]];
    let tree = make_tree(&points, 2);

    assert_eq!(tree.num_items(), 5);
    let mut stored: Vec<[f64; 2]> = tree
        .coords()
        .chunks(2)
        .map(|chunk| [chunk[0], chunk[1]])
        .collect();
    stored.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let mut expected = points.to_vec();
    expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(stored, expected);
}
