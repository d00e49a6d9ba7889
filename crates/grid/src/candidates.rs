//! Candidate pose enumeration and heuristic ranking.
//!
//! For a block and the current grid state the generator produces a
//! deterministic, ranked list of feasible poses. Scores are fixed-point
//! integers so the ordering never depends on floating-point rounding.

use crate::clearance;
use crate::footprint::Footprint;
use crate::grid::{CarrierGrid, EMPTY};
use deckpack_core::{Rotation, ScoreWeights, SearchConfig};
use rustc_hash::FxHashSet;

/// A feasible pose with its heuristic score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// X coordinate of the footprint origin.
    pub x: u32,
    /// Y coordinate of the footprint origin.
    pub y: u32,
    /// Rotation of the footprint.
    pub rotation: Rotation,
    /// Heuristic score in fixed-point ten-thousandths.
    pub score: u32,
}

/// Deterministic candidate generator.
#[derive(Debug, Clone)]
pub struct CandidateGenerator {
    step_x: u32,
    step_y: u32,
    cap: Option<usize>,
    weights: ScoreWeights,
}

impl CandidateGenerator {
    /// Creates a generator from the search configuration.
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            step_x: config.step_x.max(1),
            step_y: config.step_y.max(1),
            cap: config.max_candidates,
            weights: config.weights,
        }
    }

    /// Produces ranked feasible poses for a footprint on the current grid.
    ///
    /// On an empty grid a strategic seed set (usable-interior corners and
    /// centre) is tried first; the full sweep is the fallback when no
    /// seed is feasible. Ties are broken by ascending y, ascending x,
    /// rotation 0 before 90.
    pub fn generate(&self, grid: &CarrierGrid, footprint: &Footprint) -> Vec<Candidate> {
        let mut candidates = Vec::new();

        if grid.placed_count() == 0 {
            self.collect_seeds(grid, footprint, &mut candidates);
            if !candidates.is_empty() {
                self.rank(&mut candidates);
                return candidates;
            }
        }

        for &rotation in footprint.rotations() {
            let Some((x_min, x_max, y_min, y_max)) = sweep_bounds(grid, footprint, rotation)
            else {
                continue;
            };
            // High-x first, low-y first.
            for x in (x_min..=x_max).rev().step_by(self.step_x as usize) {
                for y in (y_min..=y_max).step_by(self.step_y as usize) {
                    if clearance::admits(grid, footprint, rotation, x, y) {
                        let score = self.score(grid, footprint, rotation, x, y);
                        candidates.push(Candidate {
                            x,
                            y,
                            rotation,
                            score,
                        });
                    }
                }
            }
        }

        self.rank(&mut candidates);
        candidates
    }

    /// Corner and centre seeds for the first block on an empty deck.
    fn collect_seeds(
        &self,
        grid: &CarrierGrid,
        footprint: &Footprint,
        candidates: &mut Vec<Candidate>,
    ) {
        let mut seen: FxHashSet<(u32, u32, Rotation)> = FxHashSet::default();
        for &rotation in footprint.rotations() {
            let Some((x_min, x_max, y_min, y_max)) = sweep_bounds(grid, footprint, rotation)
            else {
                continue;
            };
            let seeds = [
                (x_min, y_min),
                (x_max, y_min),
                (x_min, y_max),
                (x_max, y_max),
                ((x_min + x_max) / 2, (y_min + y_max) / 2),
            ];
            for (x, y) in seeds {
                if !seen.insert((x, y, rotation)) {
                    continue;
                }
                if clearance::admits(grid, footprint, rotation, x, y) {
                    let score = self.score(grid, footprint, rotation, x, y);
                    candidates.push(Candidate {
                        x,
                        y,
                        rotation,
                        score,
                    });
                }
            }
        }
    }

    /// Sorts by descending score with deterministic tie-breaks and
    /// applies the candidate cap.
    fn rank(&self, candidates: &mut Vec<Candidate>) {
        candidates.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then(a.y.cmp(&b.y))
                .then(a.x.cmp(&b.x))
                .then(a.rotation.degrees().cmp(&b.rotation.degrees()))
        });
        if let Some(cap) = self.cap {
            candidates.truncate(cap);
        }
    }

    /// Scores a feasible pose; all six components in one pass over the
    /// footprint cells.
    fn score(
        &self,
        grid: &CarrierGrid,
        footprint: &Footprint,
        rotation: Rotation,
        x: u32,
        y: u32,
    ) -> u32 {
        let weights = &self.weights;
        let deck_w = grid.width() as u64;
        let deck_h = grid.height() as u64;
        let (x_lo, x_hi) = grid.x_bounds();
        let (y_lo, y_hi) = grid.y_bounds();

        let mut probes = 0u64;
        let mut adjacent = 0u64;
        let mut on_boundary = 0u64;
        for &(cx, cy) in footprint.cells(rotation) {
            let gx = x + cx;
            let gy = y + cy;
            if gx == x_lo || gx + 1 == x_hi || gy == y_lo || gy + 1 == y_hi {
                on_boundary += 1;
            }
            for (dx, dy) in [(0i64, 1i64), (1, 0), (0, -1), (-1, 0)] {
                let nx = gx as i64 + dx;
                let ny = gy as i64 + dy;
                // A neighbour inside the footprint is interior, not perimeter.
                if nx >= x as i64
                    && ny >= y as i64
                    && footprint.contains(rotation, (nx - x as i64) as u32, (ny - y as i64) as u32)
                {
                    continue;
                }
                probes += 1;
                let off_interior =
                    nx < x_lo as i64 || nx >= x_hi as i64 || ny < y_lo as i64 || ny >= y_hi as i64;
                if off_interior || grid.cell_unchecked(nx as u32, ny as u32) != EMPTY {
                    adjacent += 1;
                }
            }
        }

        let area = footprint.area() as u64;
        let mut score = 0u64;
        score += weights.bottom as u64 * (deck_h - y as u64) / deck_h;
        score += weights.left as u64 * (deck_w - x as u64) / deck_w;
        if probes > 0 {
            score += weights.adjacency as u64 * adjacent / probes;
        }
        score += weights.area as u64 * area / (deck_w * deck_h);
        score += weights.boundary as u64 * on_boundary / area;
        score += weights.density as u64 * footprint.density_fp() as u64 / 10_000;
        score as u32
    }
}

/// Origin range for a rotation, or `None` when it cannot fit at all.
fn sweep_bounds(
    grid: &CarrierGrid,
    footprint: &Footprint,
    rotation: Rotation,
) -> Option<(u32, u32, u32, u32)> {
    let (width, height) = footprint.bounds(rotation);
    let (x_lo, x_hi) = grid.x_bounds();
    let (y_lo, y_hi) = grid.y_bounds();
    if width > x_hi - x_lo || height > y_hi - y_lo {
        return None;
    }
    Some((x_lo, x_hi - width, y_lo, y_hi - height))
}
