use alloc::vec::Vec;

use slotmap::SlotMap;

use crate::{Boid, BoidKey};

/// Upper bound on neighbours returned by [`nearest`].
pub const MAX_NEIGHBORS: usize = 8;

pub type NeighborList = heapless::Vec<BoidKey, MAX_NEIGHBORS>;

/// The `count` boids closest to `origin` by Euclidean distance, nearest
/// first. Ties keep slot order. Returns an empty list if `origin` is gone.
/// `count` is capped at [`MAX_NEIGHBORS`].
pub fn nearest(boids: &SlotMap<BoidKey, Boid>, origin: BoidKey, count: usize) -> NeighborList {
    let mut result = NeighborList::new();
    let Some(boid) = boids.get(origin) else {
        return result;
    };

    let mut distances: Vec<(f64, BoidKey)> = boids
        .iter()
        .filter(|(key, _)| *key != origin)
        .map(|(key, other)| (boid.position.distance(&other.position), key))
        .collect();
    distances.sort_by(|a, b| a.0.total_cmp(&b.0));

    for (_, key) in distances.into_iter().take(count.min(MAX_NEIGHBORS)) {
        let _ = result.push(key);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vector2D;

    fn flock(points: &[(f64, f64)]) -> (SlotMap<BoidKey, Boid>, Vec<BoidKey>) {
        let mut boids = SlotMap::with_key();
        let keys = points
            .iter()
            .map(|&(x, y)| boids.insert(Boid::new(Vector2D::new(x, y), Vector2D::zero())))
            .collect();
        (boids, keys)
    }

    #[test]
    fn test_returns_three_nearest_in_order() {
        let (boids, h) = flock(&[
            (0.0, 0.0),
            (50.0, 0.0),
            (10.0, 0.0),
            (0.0, 30.0),
            (-20.0, 0.0),
            (100.0, 100.0),
        ]);

        let result = nearest(&boids, h[0], 3);
        assert_eq!(result.as_slice(), &[h[2], h[4], h[3]]);
    }

    #[test]
    fn test_fewer_boids_than_requested() {
        let (boids, h) = flock(&[(0.0, 0.0), (5.0, 0.0)]);
        assert_eq!(nearest(&boids, h[0], 3).as_slice(), &[h[1]]);
    }

    #[test]
    fn test_removed_origin_yields_nothing() {
        let (mut boids, h) = flock(&[(0.0, 0.0), (5.0, 0.0)]);
        boids.remove(h[0]);
        assert!(nearest(&boids, h[0], 3).is_empty());
    }

    #[test]
    fn test_removed_neighbors_are_skipped() {
        let (mut boids, h) = flock(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (4.0, 0.0)]);
        boids.remove(h[1]);
        assert_eq!(nearest(&boids, h[0], 3).as_slice(), &[h[2], h[3], h[4]]);
    }

    #[test]
    fn test_count_is_capped() {
        let points: Vec<(f64, f64)> = (0..12).map(|i| (i as f64, 0.0)).collect();
        let (boids, h) = flock(&points);
        assert_eq!(nearest(&boids, h[0], 20).len(), MAX_NEIGHBORS);
    }
}
