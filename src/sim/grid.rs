//! Uniform spatial grid for the broad phase
//!
//! Rebuilt from scratch every tick. Each body index lands in exactly one
//! bucket, the cell containing its center. Two bodies can only touch if
//! their cells are the same or adjacent, provided no radius exceeds half a
//! cell. That bound is the caller's job (see `SimConfig::validate`).

use std::collections::HashMap;

use glam::DVec2;

use super::body::Body;
use super::world::BodyId;
use crate::cell_coords;

/// Integer cell coordinates
pub type CellKey = (i32, i32);

/// The 3x3 block of offsets around (and including) a cell
const NEIGHBORHOOD: [CellKey; 9] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (0, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// `key` shifted by `offset`, or `None` past the edge of the key space
///
/// Keys saturate at the `i32` limits for positions far outside the grid's
/// range, so a neighbor of an edge key may not exist.
#[inline]
pub fn offset_key(key: CellKey, (dx, dy): CellKey) -> Option<CellKey> {
    Some((key.0.checked_add(dx)?, key.1.checked_add(dy)?))
}

/// Bucketed body indices keyed by cell
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f64,
    cells: HashMap<CellKey, Vec<BodyId>>,
    /// Occupied keys in first-occupied order, so iteration doesn't depend on hashing
    occupied: Vec<CellKey>,
}

impl SpatialGrid {
    /// Create an empty grid. Panics if `cell_size` isn't positive.
    pub fn new(cell_size: f64) -> Self {
        assert!(
            cell_size.is_finite() && cell_size > 0.0,
            "cell size must be positive, got {cell_size}"
        );
        Self {
            cell_size,
            cells: HashMap::new(),
            occupied: Vec::new(),
        }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Whether bodies up to `radius` are guaranteed to be caught by the broad phase
    pub fn supports_radius(&self, radius: f64) -> bool {
        radius <= self.cell_size / 2.0
    }

    /// Cell containing a world position
    #[inline]
    pub fn cell_of(&self, pos: DVec2) -> CellKey {
        cell_coords(pos, self.cell_size)
    }

    /// Clear every bucket and re-bucket all bodies by their current position
    pub fn rebuild(&mut self, bodies: &[Body]) {
        self.cells.clear();
        self.occupied.clear();

        for (id, body) in bodies.iter().enumerate() {
            let key = self.cell_of(body.pos);
            let bucket = self.cells.entry(key).or_insert_with(|| {
                self.occupied.push(key);
                Vec::new()
            });
            bucket.push(id);
        }
    }

    /// Bodies in one cell (empty if unoccupied)
    pub fn get(&self, key: CellKey) -> &[BodyId] {
        self.cells.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether any body occupies `key`
    pub fn is_occupied(&self, key: CellKey) -> bool {
        self.cells.contains_key(&key)
    }

    /// Occupied cells and their bodies, in first-occupied order
    pub fn occupied_cells(&self) -> impl Iterator<Item = (CellKey, &[BodyId])> + '_ {
        self.occupied.iter().map(|&key| (key, self.get(key)))
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.occupied.len()
    }

    /// Total body references across all buckets
    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.occupied.is_empty()
    }

    /// Bodies in `key` and its 8 neighbors: every body that could touch one in `key`
    pub fn neighborhood(&self, key: CellKey) -> impl Iterator<Item = BodyId> + '_ {
        NEIGHBORHOOD
            .iter()
            .filter_map(move |&offset| offset_key(key, offset))
            .flat_map(move |neighbor| self.get(neighbor).iter().copied())
    }

    /// Bodies that could touch a body centered at `pos`
    ///
    /// Only complete for radii the grid supports.
    pub fn query_near(&self, pos: DVec2) -> impl Iterator<Item = BodyId> + '_ {
        self.neighborhood(self.cell_of(pos))
    }
}
