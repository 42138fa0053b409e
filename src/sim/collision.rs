//! Body-body collision detection and response
//!
//! Broad phase walks the spatial grid: every pair inside a cell, plus every
//! pair across a cell and its neighbors. Only half of the 8 neighbor offsets
//! are visited, so each pair of adjacent cells is seen from exactly one side
//! and no pair gets its impulse twice in a tick.
//!
//! Response is a 2D elastic collision with radius as mass. Only the velocity
//! component along the contact normal changes; overlaps are left to separate
//! on their own.

use super::body::Body;
use super::grid::{CellKey, SpatialGrid, offset_key};
use super::world::BodyId;

/// Neighbor offsets visited from each cell. Their negations make up the other
/// half of the 8-neighborhood, so together they cover each adjacent pair once.
pub const HALF_NEIGHBORHOOD: [CellKey; 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// Counters from one collision pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionStats {
    /// Pairs proposed by the broad phase
    pub candidate_pairs: usize,
    /// Pairs that overlapped and were approaching
    pub resolved: usize,
}

/// Exact circle-circle overlap test (tangent circles don't collide)
#[inline]
pub fn collides(a: &Body, b: &Body) -> bool {
    let reach = a.radius + b.radius;
    let delta = a.pos - b.pos;

    // Cheap box rejection before the squared distance
    if delta.x.abs() > reach || delta.y.abs() > reach {
        return false;
    }

    delta.length_squared() < reach * reach
}

/// Apply an elastic impulse along the contact normal
///
/// Returns false without touching either body when the centers coincide
/// (no normal) or the bodies are already separating.
pub fn resolve(a: &mut Body, b: &mut Body) -> bool {
    let delta = b.pos - a.pos;
    let dist = delta.length();
    if dist == 0.0 {
        return false;
    }
    let normal = delta / dist;

    // Relative velocity along the normal; positive means moving apart
    let vn = (b.vel - a.vel).dot(normal);
    if vn > 0.0 {
        return false;
    }

    let (ma, mb) = (a.mass(), b.mass());
    let k = 2.0 * vn / (ma + mb);
    a.vel += normal * (k * mb);
    b.vel -= normal * (k * ma);
    true
}

/// Mutable references to two distinct bodies
fn pair_mut(bodies: &mut [Body], i: BodyId, j: BodyId) -> (&mut Body, &mut Body) {
    assert_ne!(i, j, "a body cannot collide with itself");
    if i < j {
        let (lo, hi) = bodies.split_at_mut(j);
        (&mut lo[i], &mut hi[0])
    } else {
        let (lo, hi) = bodies.split_at_mut(i);
        (&mut hi[0], &mut lo[j])
    }
}

/// Visit every broad-phase candidate pair exactly once
///
/// Intra-cell pairs come first for each cell, then pairs against the
/// canonical half of its neighbors.
pub fn for_each_candidate_pair(grid: &SpatialGrid, mut visit: impl FnMut(BodyId, BodyId)) {
    for (key, ids) in grid.occupied_cells() {
        for (n, &a) in ids.iter().enumerate() {
            for &b in &ids[n + 1..] {
                visit(a, b);
            }
        }

        for &offset in &HALF_NEIGHBORHOOD {
            let Some(neighbor_key) = offset_key(key, offset) else {
                continue;
            };
            let neighbor = grid.get(neighbor_key);
            if neighbor.is_empty() {
                continue;
            }
            for &a in ids {
                for &b in neighbor {
                    visit(a, b);
                }
            }
        }
    }
}

/// Collect the broad-phase candidate pairs
pub fn candidate_pairs(grid: &SpatialGrid) -> Vec<(BodyId, BodyId)> {
    let mut pairs = Vec::new();
    for_each_candidate_pair(grid, |a, b| pairs.push((a, b)));
    pairs
}

/// Broad phase, narrow phase and response over a freshly rebuilt grid
///
/// `grid` must have been rebuilt from `bodies` after their last move.
pub fn resolve_collisions(bodies: &mut [Body], grid: &SpatialGrid) -> CollisionStats {
    let mut stats = CollisionStats::default();
    for_each_candidate_pair(grid, |i, j| {
        stats.candidate_pairs += 1;
        let (a, b) = pair_mut(bodies, i, j);
        if collides(a, b) && resolve(a, b) {
            stats.resolved += 1;
        }
    });
    stats
}

/// Velocity change `resolve` would give each body, without applying it
#[cfg(test)]
pub(crate) fn impulse_preview(a: &Body, b: &Body) -> Option<(glam::DVec2, glam::DVec2)> {
    let (mut a2, mut b2) = (a.clone(), b.clone());
    resolve(&mut a2, &mut b2).then(|| (a2.vel - a.vel, b2.vel - b.vel))
}

#[cfg(test)]
mod tests {
    use glam::DVec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use super::*;
    use crate::sim::body::Rgb;

    const EPS: f64 = 1e-9;

    fn body(x: f64, y: f64, vx: f64, vy: f64, r: f64) -> Body {
        Body::new(DVec2::new(x, y), DVec2::new(vx, vy), r, Rgb::new(200, 200, 200))
    }

    #[test]
    fn test_collides_overlap() {
        let a = body(0.0, 0.0, 0.0, 0.0, 10.0);
        let b = body(15.0, 0.0, 0.0, 0.0, 10.0);
        assert!(collides(&a, &b));
        assert!(collides(&b, &a));
    }

    #[test]
    fn test_tangent_is_not_collision() {
        let a = body(0.0, 0.0, 0.0, 0.0, 10.0);
        let b = body(20.0, 0.0, 0.0, 0.0, 10.0);
        assert!(!collides(&a, &b));
    }

    #[test]
    fn test_box_overlap_but_circles_apart() {
        // Diagonal: inside the bounding box on both axes, outside the circle
        let a = body(0.0, 0.0, 0.0, 0.0, 10.0);
        let b = body(15.0, 15.0, 0.0, 0.0, 10.0);
        assert!(!collides(&a, &b));
    }

    #[test]
    fn test_head_on_equal_mass_swaps_velocities() {
        let mut a = body(0.0, 0.0, 2.0, 0.0, 10.0);
        let mut b = body(15.0, 0.0, -3.0, 0.0, 10.0);
        assert!(resolve(&mut a, &mut b));
        assert!((a.vel - DVec2::new(-3.0, 0.0)).length() < EPS);
        assert!((b.vel - DVec2::new(2.0, 0.0)).length() < EPS);
    }

    #[test]
    fn test_heavier_body_wins() {
        let mut small = body(0.0, 0.0, 1.0, 0.0, 5.0);
        let mut big = body(12.0, 0.0, -1.0, 0.0, 15.0);
        let before = small.momentum() + big.momentum();
        resolve(&mut small, &mut big);

        // 1D elastic: v1' = ((m1-m2)v1 + 2 m2 v2) / (m1+m2)
        assert!((small.vel.x - (-10.0 - 30.0) / 20.0).abs() < EPS);
        assert!((big.vel.x - (-10.0 + 10.0) / 20.0).abs() < EPS);
        assert!((small.momentum() + big.momentum() - before).length() < EPS);
    }

    #[test]
    fn test_tangential_velocity_untouched() {
        let mut a = body(0.0, 0.0, 1.0, 4.0, 10.0);
        let mut b = body(15.0, 0.0, -1.0, -2.0, 10.0);
        resolve(&mut a, &mut b);
        assert!((a.vel.y - 4.0).abs() < EPS);
        assert!((b.vel.y + 2.0).abs() < EPS);
    }

    #[test]
    fn test_separating_pair_skipped() {
        let mut a = body(0.0, 0.0, -1.0, 0.0, 10.0);
        let mut b = body(15.0, 0.0, 1.0, 0.0, 10.0);
        assert!(collides(&a, &b));
        assert!(!resolve(&mut a, &mut b));
        assert_eq!(a.vel, DVec2::new(-1.0, 0.0));
        assert_eq!(b.vel, DVec2::new(1.0, 0.0));
    }

    #[test]
    fn test_coincident_centers_noop() {
        let mut a = body(50.0, 50.0, 1.0, 0.0, 10.0);
        let mut b = body(50.0, 50.0, -1.0, 0.0, 10.0);
        assert!(!resolve(&mut a, &mut b));
        assert_eq!(a.vel, DVec2::new(1.0, 0.0));
        assert_eq!(b.vel, DVec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_half_neighborhood_covers_all_directions() {
        let mut all: Vec<CellKey> = HALF_NEIGHBORHOOD
            .iter()
            .flat_map(|&(dx, dy)| [(dx, dy), (-dx, -dy)])
            .collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 8);
        assert!(!all.contains(&(0, 0)));
    }

    #[test]
    fn test_candidate_pairs_unique() {
        // A 3x3 block of cells, two bodies each
        let mut bodies = Vec::new();
        for cx in 0..3 {
            for cy in 0..3 {
                let base = DVec2::new(cx as f64 * 40.0 + 10.0, cy as f64 * 40.0 + 10.0);
                bodies.push(Body::new(base, DVec2::ZERO, 5.0, Rgb::new(90, 90, 90)));
                bodies.push(Body::new(base + 15.0, DVec2::ZERO, 5.0, Rgb::new(90, 90, 90)));
            }
        }
        let mut grid = SpatialGrid::new(40.0);
        grid.rebuild(&bodies);

        let mut pairs: Vec<_> = candidate_pairs(&grid)
            .into_iter()
            .map(|(a, b)| (a.min(b), a.max(b)))
            .collect();
        let total = pairs.len();
        pairs.sort();
        pairs.dedup();
        assert_eq!(pairs.len(), total, "a pair was proposed twice");
        assert!(pairs.contains(&(0, 1)));
        assert!(!pairs.iter().any(|&(a, b)| a == b));
    }

    #[test]
    fn test_broad_phase_matches_brute_force() {
        let mut rng = Pcg32::seed_from_u64(7);
        let bodies: Vec<_> = (0..300)
            .map(|_| {
                let pos = DVec2::new(rng.random_range(20.0..480.0), rng.random_range(20.0..480.0));
                let r = rng.random_range(5.0..20.0);
                Body::new(pos, DVec2::ZERO, r, Rgb::new(60, 60, 60))
            })
            .collect();
        let mut grid = SpatialGrid::new(40.0);
        grid.rebuild(&bodies);

        let mut from_grid: Vec<_> = candidate_pairs(&grid)
            .into_iter()
            .filter(|&(a, b)| collides(&bodies[a], &bodies[b]))
            .map(|(a, b)| (a.min(b), a.max(b)))
            .collect();
        from_grid.sort();

        let mut brute = Vec::new();
        for a in 0..bodies.len() {
            for b in a + 1..bodies.len() {
                if collides(&bodies[a], &bodies[b]) {
                    brute.push((a, b));
                }
            }
        }
        assert!(!brute.is_empty());
        assert_eq!(from_grid, brute);
    }

    #[test]
    fn test_cross_cell_pair_resolved_once() {
        // Straddles the x = 40 boundary between cells (0, 0) and (1, 0)
        let mut bodies = vec![body(32.0, 20.0, 3.0, 0.0, 10.0), body(48.0, 20.0, -1.0, 0.5, 12.0)];
        let (da, db) = impulse_preview(&bodies[0], &bodies[1]).unwrap();
        let before: Vec<_> = bodies.iter().map(|b| b.vel).collect();

        let mut grid = SpatialGrid::new(40.0);
        grid.rebuild(&bodies);
        assert_ne!(grid.cell_of(bodies[0].pos), grid.cell_of(bodies[1].pos));

        let stats = resolve_collisions(&mut bodies, &grid);
        assert_eq!(stats.candidate_pairs, 1);
        assert_eq!(stats.resolved, 1);
        assert!((bodies[0].vel - (before[0] + da)).length() < EPS);
        assert!((bodies[1].vel - (before[1] + db)).length() < EPS);
    }

    #[test]
    fn test_cells_at_key_space_edge_dont_overflow() {
        // Both saturate to i32::MAX on x; the far-negative pair to i32::MIN
        let mut bodies = vec![
            body(9.9e10, 20.0, -1.0, 0.0, 10.0),
            body(9.9e10 + 5.0, 20.0, 1.0, 0.0, 10.0),
            body(-9.9e10, 20.0, 0.0, 0.0, 10.0),
            body(1000.0, 20.0, 0.0, 0.0, 10.0),
        ];
        let mut grid = SpatialGrid::new(40.0);
        grid.rebuild(&bodies);
        assert_eq!(grid.cell_of(bodies[0].pos), (i32::MAX, 0));
        assert_eq!(grid.cell_of(bodies[2].pos), (i32::MIN, 0));

        assert_eq!(candidate_pairs(&grid), vec![(0, 1)]);
        let stats = resolve_collisions(&mut bodies, &grid);
        assert_eq!(stats.resolved, 0);
    }

    #[test]
    fn test_pair_mut_either_order() {
        let mut bodies = vec![body(0.0, 0.0, 0.0, 0.0, 1.0), body(5.0, 0.0, 0.0, 0.0, 2.0)];
        let (a, b) = pair_mut(&mut bodies, 1, 0);
        assert_eq!((a.radius, b.radius), (2.0, 1.0));
        let (a, b) = pair_mut(&mut bodies, 0, 1);
        assert_eq!((a.radius, b.radius), (1.0, 2.0));
    }
}
