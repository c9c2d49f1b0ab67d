use super::FramePeak;
use crate::crosses::Cross;

/// Half-open vote square `[x0, x1) x [y0, y1)` clipped to the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct VoteSquare {
    x0: usize,
    x1: usize,
    y0: usize,
    y1: usize,
}

impl VoteSquare {
    fn around(center: [f32; 2], half_width: usize, width: usize, height: usize) -> Option<Self> {
        if !(center[0].is_finite() && center[1].is_finite()) {
            return None;
        }
        // Centres far outside the grid are pulled to just past its border so
        // the square bounds below cannot overflow.
        let axis = |v: f32, extent: usize| {
            let limit = (extent + half_width) as f32 + 1.0;
            v.floor().clamp(-limit, limit) as i64
        };
        let cx = axis(center[0], width);
        let cy = axis(center[1], height);
        let hw = half_width as i64;
        let clip = |v: i64, hi: usize| v.clamp(0, hi as i64) as usize;
        let square = Self {
            x0: clip(cx - hw, width),
            x1: clip(cx + hw, width),
            y0: clip(cy - hw, height),
            y1: clip(cy + hw, height),
        };
        (square.x0 < square.x1 && square.y0 < square.y1).then_some(square)
    }

    fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }
}

/// Per-frame vote grid with the same extent as the camera image.
///
/// The buffer is reused across frames; [`FrameHeatmap::reset`] clears it
/// without reallocating.
#[derive(Clone, Debug)]
pub struct FrameHeatmap {
    width: usize,
    height: usize,
    half_width: usize,
    votes: Vec<u32>,
}

impl FrameHeatmap {
    pub fn new(width: usize, height: usize, half_width: usize) -> Self {
        Self {
            width,
            height,
            half_width,
            votes: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw row-major vote counts.
    pub fn votes(&self) -> &[u32] {
        &self.votes
    }

    /// Votes at pixel `(x, y)`; `0` outside the grid.
    pub fn get(&self, x: usize, y: usize) -> u32 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.votes[y * self.width + x]
    }

    pub fn max_votes(&self) -> u32 {
        self.votes.iter().copied().max().unwrap_or(0)
    }

    /// Clears all votes, keeping the allocation.
    pub fn reset(&mut self) {
        self.votes.iter_mut().for_each(|v| *v = 0);
    }

    /// Adds one vote to every cell of the square centred on `center`.
    /// Returns `false` when the square lies entirely outside the image.
    pub fn vote(&mut self, center: [f32; 2]) -> bool {
        let Some(sq) = VoteSquare::around(center, self.half_width, self.width, self.height) else {
            return false;
        };
        for y in sq.y0..sq.y1 {
            let row = &mut self.votes[y * self.width..(y + 1) * self.width];
            for cell in &mut row[sq.x0..sq.x1] {
                *cell = cell.saturating_add(1);
            }
        }
        true
    }

    /// Votes for the centre of every hypothesis.
    pub fn accumulate(&mut self, crosses: &[Cross]) -> usize {
        crosses.iter().filter(|c| self.vote(c.center)).count()
    }

    /// Location of the strongest cell, first in row-major order on ties.
    pub fn argmax(&self) -> Option<(usize, usize, u32)> {
        let mut best: Option<(usize, u32)> = None;
        for (i, &v) in self.votes.iter().enumerate() {
            if best.map_or(true, |(_, b)| v > b) {
                best = Some((i, v));
            }
        }
        let (idx, votes) = best?;
        Some((idx % self.width, idx / self.width, votes))
    }

    /// Peak of the frame, or `None` when no cell received a vote.
    ///
    /// The reported depth belongs to the last hypothesis (in `crosses` order)
    /// whose vote square covers the peak.
    pub fn peak(&self, crosses: &[Cross]) -> Option<FramePeak> {
        let (x, y, votes) = self.argmax()?;
        if votes == 0 {
            return None;
        }
        let depth_m = crosses.iter().rev().find_map(|c| {
            VoteSquare::around(c.center, self.half_width, self.width, self.height)
                .filter(|sq| sq.contains(x, y))
                .map(|_| c.depth_m)
        })?;
        Some(FramePeak {
            x,
            y,
            votes,
            depth_m,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cross_at(center: [f32; 2], depth_m: f32) -> Cross {
        Cross {
            cross: [center[0] - 30.0, center[1] - 30.0],
            center,
            depth_m,
        }
    }

    #[test]
    fn empty_heatmap_has_no_peak() {
        let map = FrameHeatmap::new(64, 48, 10);
        assert_eq!(map.max_votes(), 0);
        assert!(map.peak(&[]).is_none());
    }

    #[test]
    fn single_vote_covers_twenty_by_twenty() {
        let mut map = FrameHeatmap::new(640, 480, 10);
        assert!(map.vote([320.0, 240.0]));
        let total: u32 = map.votes().iter().sum();
        assert_eq!(total, 400);
        assert_eq!(map.get(310, 230), 1);
        assert_eq!(map.get(329, 249), 1);
        assert_eq!(map.get(330, 240), 0);
        let peak = map.peak(&[cross_at([320.0, 240.0], 3.0)]).expect("peak");
        assert_eq!((peak.x, peak.y, peak.votes), (310, 230, 1));
        assert_eq!(peak.depth_m, 3.0);
    }

    #[test]
    fn votes_near_border_are_clipped() {
        let mut map = FrameHeatmap::new(640, 480, 10);
        assert!(map.vote([2.0, 475.0]));
        let total: u32 = map.votes().iter().sum();
        assert_eq!(total, 12 * 15);
        assert!(!map.vote([-50.0, -50.0]));
        assert!(!map.vote([f32::NAN, 10.0]));
    }

    #[test]
    fn huge_finite_centres_are_ignored() {
        let mut map = FrameHeatmap::new(640, 480, 10);
        assert!(!map.vote([1e19, 1e19]));
        assert!(!map.vote([-1e19, 240.0]));
        assert!(!map.vote([f32::MAX, f32::MIN]));
        assert_eq!(map.max_votes(), 0);
    }

    #[test]
    fn lookups_outside_the_grid_read_zero() {
        let mut map = FrameHeatmap::new(64, 48, 4);
        map.vote([63.0, 47.0]);
        assert_eq!(map.get(62, 46), 1);
        assert_eq!(map.get(64, 10), 0);
        assert_eq!(map.get(10, 48), 0);
    }

    #[test]
    fn overlapping_votes_pick_the_overlap_and_last_depth() {
        let mut map = FrameHeatmap::new(640, 480, 10);
        let crosses = [
            cross_at([100.0, 100.0], 5.0),
            cross_at([105.0, 105.0], 4.0),
            cross_at([400.0, 300.0], 9.0),
        ];
        assert_eq!(map.accumulate(&crosses), 3);
        let peak = map.peak(&crosses).expect("peak");
        assert_eq!((peak.x, peak.y, peak.votes), (95, 95, 2));
        assert_eq!(peak.depth_m, 4.0);
    }

    #[test]
    fn reset_clears_votes() {
        let mut map = FrameHeatmap::new(64, 48, 4);
        map.vote([10.0, 10.0]);
        map.reset();
        assert_eq!(map.max_votes(), 0);
    }
}
