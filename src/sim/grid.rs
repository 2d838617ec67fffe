//! Uniform grid broad phase
//!
//! Buckets entity indices by cell so a collision pass only looks at entities
//! near the query area. Cell vectors are cleared, not dropped, between
//! rebuilds so a warmed grid does not allocate per tick.

use std::collections::HashMap;

use glam::Vec2;

/// Integer cell coordinate
pub type Cell = (i32, i32);

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<Cell, Vec<usize>>,
}

impl SpatialGrid {
    /// `cell_size` must be positive and finite
    pub fn new(cell_size: f32) -> Self {
        debug_assert!(cell_size.is_finite() && cell_size > 0.0);
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    #[inline]
    pub fn cell_of(&self, pos: Vec2) -> Cell {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        )
    }

    /// Re-bucket all positions; index `i` refers to the i-th position
    pub fn rebuild(&mut self, positions: impl IntoIterator<Item = Vec2>) {
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
        for (i, pos) in positions.into_iter().enumerate() {
            let cell = self.cell_of(pos);
            self.cells.entry(cell).or_default().push(i);
        }
    }

    /// Collect indices in every cell overlapping the rectangle `[min, max]`.
    ///
    /// Results are sorted ascending so callers see entities in insertion order.
    pub fn query_rect(&self, min: Vec2, max: Vec2, out: &mut Vec<usize>) {
        out.clear();
        let (x0, y0) = self.cell_of(min);
        let (x1, y1) = self.cell_of(max);
        for cx in x0..=x1 {
            for cy in y0..=y1 {
                if let Some(bucket) = self.cells.get(&(cx, cy)) {
                    out.extend_from_slice(bucket);
                }
            }
        }
        out.sort_unstable();
    }

    /// Number of indexed entities
    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.values().all(Vec::is_empty)
    }
}
