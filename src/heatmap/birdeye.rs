use super::GateEstimate;
use crate::projection::WorldPoint;
use log::warn;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Extent and resolution of the top-down accumulation grid.
///
/// World `(x, y)` maps to a cell through
/// `row = floor(rows - (origin_x + x) * ppm)` and
/// `col = floor((origin_y - y) * ppm)`, so rows grow toward -x and columns
/// toward -y as in the image convention used for display.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BirdeyeParams {
    pub rows: usize,
    pub cols: usize,
    /// Cells per metre.
    pub pixels_per_meter: f32,
    /// World offset `(x, y)` in metres applied before scaling.
    pub origin_offset_m: [f32; 2],
}

impl Default for BirdeyeParams {
    fn default() -> Self {
        Self {
            rows: 50,
            cols: 100,
            pixels_per_meter: 2.0,
            origin_offset_m: [0.7, 25.0],
        }
    }
}

/// Failure to record a world point in the birdeye grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BirdeyeError {
    /// The point maps outside the grid.
    OutOfBounds { x: f32, y: f32, row: i64, col: i64 },
    /// The point has a NaN or infinite coordinate.
    NonFinite { x: f32, y: f32 },
}

impl std::fmt::Display for BirdeyeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BirdeyeError::OutOfBounds { x, y, row, col } => write!(
                f,
                "world point ({x:.2}, {y:.2}) maps to cell ({row}, {col}) outside the birdeye grid"
            ),
            BirdeyeError::NonFinite { x, y } => {
                write!(f, "world point ({x}, {y}) is not finite")
            }
        }
    }
}

impl std::error::Error for BirdeyeError {}

/// Persistent top-down vote grid of gate positions.
///
/// Counts only grow. Since every vote is a unit increment of a single cell,
/// the final grid depends only on the multiset of points fed in, never on
/// their order.
#[derive(Clone, Debug)]
pub struct BirdeyeMap {
    params: BirdeyeParams,
    counts: Vec<u32>,
}

impl BirdeyeMap {
    pub fn new(params: BirdeyeParams) -> Self {
        Self {
            params,
            counts: vec![0; params.rows * params.cols],
        }
    }

    pub fn params(&self) -> &BirdeyeParams {
        &self.params
    }

    /// `(rows, cols)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.params.rows, self.params.cols)
    }

    /// Raw row-major counts.
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    pub fn count_at(&self, row: usize, col: usize) -> u32 {
        if row >= self.params.rows || col >= self.params.cols {
            return 0;
        }
        self.counts[row * self.params.cols + col]
    }

    pub fn total_votes(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    pub fn max_votes(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Grid cell `(row, col)` holding the world point `(x, y)`.
    pub fn cell_for(&self, x: f32, y: f32) -> Result<(usize, usize), BirdeyeError> {
        if !(x.is_finite() && y.is_finite()) {
            return Err(BirdeyeError::NonFinite { x, y });
        }
        let p = &self.params;
        let row = (p.rows as f32 - (p.origin_offset_m[0] + x) * p.pixels_per_meter).floor() as i64;
        let col = ((p.origin_offset_m[1] - y) * p.pixels_per_meter).floor() as i64;
        if row < 0 || col < 0 || row >= p.rows as i64 || col >= p.cols as i64 {
            return Err(BirdeyeError::OutOfBounds { x, y, row, col });
        }
        Ok((row as usize, col as usize))
    }

    /// World position `(x, y)` represented by a cell (its reference corner).
    pub fn world_for_cell(&self, row: usize, col: usize) -> [f32; 2] {
        let p = &self.params;
        [
            (p.rows as f32 - row as f32) / p.pixels_per_meter - p.origin_offset_m[0],
            p.origin_offset_m[1] - col as f32 / p.pixels_per_meter,
        ]
    }

    /// Adds one vote for `point`. Points outside the grid are discarded.
    pub fn accumulate(&mut self, point: &WorldPoint) -> Result<(usize, usize), BirdeyeError> {
        let (row, col) = self.cell_for(point.x, point.y).map_err(|err| {
            warn!("BirdeyeMap::accumulate discarding projection: {err}");
            err
        })?;
        let cell = &mut self.counts[row * self.params.cols + col];
        *cell = cell.saturating_add(1);
        Ok((row, col))
    }

    /// Strongest cell converted back to world coordinates, first in
    /// row-major order on ties. `None` until the first vote.
    pub fn peak(&self) -> Option<GateEstimate> {
        let mut best: Option<(usize, u32)> = None;
        for (i, &v) in self.counts.iter().enumerate() {
            if best.map_or(true, |(_, b)| v > b) {
                best = Some((i, v));
            }
        }
        let (idx, votes) = best?;
        if votes == 0 {
            return None;
        }
        let row = idx / self.params.cols;
        let col = idx % self.params.cols;
        let [x, y] = self.world_for_cell(row, col);
        Some(GateEstimate {
            x,
            y,
            row,
            col,
            votes,
        })
    }
}

/// Birdeye map shared between threads processing frames concurrently.
///
/// Every increment happens under the lock, so concurrent frames never lose
/// votes.
#[derive(Clone, Debug)]
pub struct SharedBirdeye {
    inner: Arc<Mutex<BirdeyeMap>>,
}

impl SharedBirdeye {
    pub fn new(params: BirdeyeParams) -> Self {
        Self {
            inner: Arc::new(Mutex::new(BirdeyeMap::new(params))),
        }
    }

    pub fn accumulate(&self, point: &WorldPoint) -> Result<(usize, usize), BirdeyeError> {
        self.inner.lock().accumulate(point)
    }

    pub fn peak(&self) -> Option<GateEstimate> {
        self.inner.lock().peak()
    }

    /// Copy of the current grid.
    pub fn snapshot(&self) -> BirdeyeMap {
        self.inner.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: f32, y: f32) -> WorldPoint {
        WorldPoint { x, y, z: 0.0 }
    }

    #[test]
    fn repeated_point_accumulates_in_one_cell() {
        let mut map = BirdeyeMap::new(BirdeyeParams::default());
        for _ in 0..5 {
            map.accumulate(&point(1.0, 2.0)).expect("in bounds");
        }
        let (row, col) = map.cell_for(1.0, 2.0).expect("in bounds");
        assert_eq!((row, col), (46, 46));
        assert_eq!(map.count_at(row, col), 5);
        let peak = map.peak().expect("peak");
        assert_eq!((peak.row, peak.col, peak.votes), (46, 46, 5));
        assert!((peak.y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn out_of_bounds_points_are_discarded() {
        let mut map = BirdeyeMap::new(BirdeyeParams::default());
        assert!(matches!(
            map.accumulate(&point(100.0, 0.0)),
            Err(BirdeyeError::OutOfBounds { .. })
        ));
        assert!(matches!(
            map.accumulate(&point(0.0, 30.0)),
            Err(BirdeyeError::OutOfBounds { .. })
        ));
        assert!(matches!(
            map.accumulate(&point(f32::NAN, 0.0)),
            Err(BirdeyeError::NonFinite { .. })
        ));
        assert_eq!(map.total_votes(), 0);
        assert!(map.peak().is_none());
    }

    #[test]
    fn points_just_past_the_far_edge_are_discarded() {
        let map = BirdeyeMap::new(BirdeyeParams::default());
        // Raw row/col values in (-1, 0) floor to -1 rather than truncating to 0.
        assert_eq!(map.cell_for(24.2, 0.0).map(|(row, _)| row), Ok(0));
        assert!(matches!(
            map.cell_for(24.55, 0.0),
            Err(BirdeyeError::OutOfBounds { row: -1, .. })
        ));
        assert!(matches!(
            map.cell_for(1.0, 25.25),
            Err(BirdeyeError::OutOfBounds { col: -1, .. })
        ));
    }

    #[test]
    fn cell_round_trip_lands_in_same_cell() {
        let map = BirdeyeMap::new(BirdeyeParams::default());
        for (row, col) in [(1, 1), (10, 20), (49, 99), (25, 50)] {
            let [x, y] = map.world_for_cell(row, col);
            // Nudge into the cell interior to avoid floor ties on the boundary.
            let inside = map
                .cell_for(x - 0.1, y - 0.1)
                .expect("interior point in bounds");
            assert_eq!(inside, (row, col));
        }
    }

    #[test]
    fn ties_resolve_to_first_row_major_cell() {
        let mut map = BirdeyeMap::new(BirdeyeParams::default());
        map.accumulate(&point(5.0, 5.0)).expect("in bounds");
        map.accumulate(&point(1.0, 2.0)).expect("in bounds");
        let first = map.cell_for(5.0, 5.0).expect("in bounds");
        let second = map.cell_for(1.0, 2.0).expect("in bounds");
        let expected = first.min(second);
        let peak = map.peak().expect("peak");
        assert_eq!((peak.row, peak.col), expected);
    }

    #[test]
    fn shared_map_serializes_concurrent_votes() {
        let shared = SharedBirdeye::new(BirdeyeParams::default());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let s = shared.clone();
                std::thread::spawn(move || {
                    for _ in 0..250 {
                        s.accumulate(&point(1.0, 2.0)).expect("in bounds");
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().expect("worker thread");
        }
        assert_eq!(shared.peak().map(|p| p.votes), Some(1000));
        assert_eq!(shared.snapshot().total_votes(), 1000);
    }
}
