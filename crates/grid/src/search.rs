//! Anytime heuristic-backtracking placement search.
//!
//! The search orders blocks widest-first, walks ranked candidates per
//! block, and keeps the best partial solution seen so far. The skip
//! branch (trying the next block without placing the current one) is
//! what makes partial solutions reachable; without it an infeasible
//! instance would return nothing.

use crate::candidates::CandidateGenerator;
use crate::carrier::CarrierSpec;
use crate::footprint::Footprint;
use crate::grid::{BlockHandle, BlockTable, CarrierGrid, PlacedBlock};
use deckpack_core::{
    Error, PlacementRecord, Pose, ProgressCallback, ProgressInfo, Result, SearchConfig,
};
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Fixed-point scale of the internal objective score.
const SCORE_SCALE: u64 = 1_000_000;

/// Anytime placement search over a carrier deck.
///
/// Interruptible but not preemptive: the wall clock is polled at every
/// recursion entry and at the top of the candidate loop, and `place` /
/// `remove` are atomic, so the best-so-far snapshot is never torn.
pub struct PlacementSearch {
    config: SearchConfig,
    cancelled: Arc<AtomicBool>,
}

impl PlacementSearch {
    /// Creates a search with the given configuration.
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Creates a search with default configuration.
    pub fn default_config() -> Self {
        Self::new(SearchConfig::default())
    }

    /// Requests cooperative cancellation of a running solve.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Runs the search and returns the best placement found within the
    /// time budget.
    ///
    /// An exhausted budget is not an error: the record then carries a
    /// non-empty `unplaced` list and `complete = false`.
    pub fn solve(&self, spec: &CarrierSpec, blocks: &[Footprint]) -> Result<PlacementRecord> {
        self.run(spec, blocks, None)
    }

    /// Like [`solve`](Self::solve), invoking the callback on every
    /// improved best-so-far solution and once on completion.
    pub fn solve_with_progress(
        &self,
        spec: &CarrierSpec,
        blocks: &[Footprint],
        callback: ProgressCallback,
    ) -> Result<PlacementRecord> {
        self.run(spec, blocks, Some(&callback))
    }

    fn run(
        &self,
        spec: &CarrierSpec,
        blocks: &[Footprint],
        callback: Option<&ProgressCallback>,
    ) -> Result<PlacementRecord> {
        let start = Instant::now();
        spec.validate()?;
        self.cancelled.store(false, Ordering::Relaxed);

        let mut by_id: FxHashMap<&str, &Footprint> = FxHashMap::default();
        for footprint in blocks {
            if by_id.insert(footprint.id().as_str(), footprint).is_some() {
                return Err(Error::InvalidFootprint(format!(
                    "duplicate footprint id: {}",
                    footprint.id()
                )));
            }
        }

        let mut table = BlockTable::new();
        let mut order: Vec<BlockHandle> = Vec::with_capacity(spec.block_ids.len());
        for id in &spec.block_ids {
            let footprint = by_id
                .get(id.as_str())
                .ok_or_else(|| Error::UnknownBlock(id.clone()))?;
            order.push(table.register((*footprint).clone())?);
        }

        // Widest first, then largest, then densest, then by id.
        order.sort_by(|&a, &b| {
            let fa = table.get(a);
            let fb = table.get(b);
            fb.width()
                .cmp(&fa.width())
                .then(fb.area().cmp(&fa.area()))
                .then(fb.density_fp().cmp(&fa.density_fp()))
                .then(fa.id().cmp(fb.id()))
        });

        let grid = CarrierGrid::new(spec, self.config.clearance_policy)?
            .with_transport_lanes(self.config.transport_lanes);
        let total = order.len();
        let mut ctx = SearchCtx {
            table: &table,
            order: &order,
            generator: CandidateGenerator::new(&self.config),
            grid,
            start,
            max_time: self.config.max_time,
            cancelled: &self.cancelled,
            callback,
            total,
            // Seeded with the empty solution so even a zero budget
            // yields a well-formed record.
            best: BestSolution::empty(),
            done: false,
        };

        ctx.backtrack(0);

        let record = ctx.into_record(spec);
        log::debug!(
            "search finished: {}/{} blocks placed on {} in {:.3}s",
            record.placed_count,
            record.total_count,
            spec.name,
            record.elapsed_seconds
        );
        if let Some(callback) = callback {
            callback(
                ProgressInfo::new()
                    .with_blocks(record.placed_count, record.total_count)
                    .with_score(record.score)
                    .with_utilization(record.utilization)
                    .with_elapsed(start.elapsed().as_millis() as u64)
                    .finished(),
            );
        }
        Ok(record)
    }
}

impl Default for PlacementSearch {
    fn default() -> Self {
        Self::default_config()
    }
}

/// Best-so-far snapshot: the placed set plus its occupancy, which is all
/// the record needs.
struct BestSolution {
    placed: Vec<PlacedBlock>,
    occupied: usize,
    placed_count: usize,
    score_fp: u64,
}

impl BestSolution {
    fn empty() -> Self {
        Self {
            placed: Vec::new(),
            occupied: 0,
            placed_count: 0,
            score_fp: 0,
        }
    }
}

struct SearchCtx<'a> {
    table: &'a BlockTable,
    order: &'a [BlockHandle],
    generator: CandidateGenerator,
    grid: CarrierGrid,
    start: Instant,
    max_time: Duration,
    cancelled: &'a AtomicBool,
    callback: Option<&'a ProgressCallback>,
    total: usize,
    best: BestSolution,
    done: bool,
}

impl SearchCtx<'_> {
    fn out_of_time(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed) || self.start.elapsed() >= self.max_time
    }

    /// Lexicographic objective: block count first, then the placement
    /// score in fixed-point millionths.
    fn score_fixed(&self, placed: usize, occupied: usize) -> u64 {
        if self.total == 0 {
            return 0;
        }
        700_000 * placed as u64 / self.total as u64
            + 300_000 * occupied as u64 / self.grid.usable_area() as u64
    }

    /// Records the current grid as the new best if it improves the
    /// objective; a complete placement ends the search, since every
    /// complete placement scores identically.
    fn observe(&mut self) {
        let placed_count = self.grid.placed_count();
        let occupied = self.grid.occupied_cells();
        let score_fp = self.score_fixed(placed_count, occupied);
        if (placed_count, score_fp) <= (self.best.placed_count, self.best.score_fp) {
            return;
        }
        self.best = BestSolution {
            placed: self.grid.placed().to_vec(),
            occupied,
            placed_count,
            score_fp,
        };
        log::debug!(
            "improved best: {placed_count}/{} blocks, score {:.4}",
            self.total,
            score_fp as f64 / SCORE_SCALE as f64
        );
        if let Some(callback) = self.callback {
            callback(
                ProgressInfo::new()
                    .with_blocks(placed_count, self.total)
                    .with_score(score_fp as f64 / SCORE_SCALE as f64)
                    .with_utilization(self.grid.utilization())
                    .with_elapsed(self.start.elapsed().as_millis() as u64),
            );
        }
        if placed_count == self.total && self.total > 0 {
            self.done = true;
        }
    }

    fn backtrack(&mut self, depth: usize) {
        if self.done || self.out_of_time() {
            return;
        }
        self.observe();
        if self.done || depth == self.order.len() {
            return;
        }
        // Even placing every remaining block cannot reach the best count.
        let remaining = self.order.len() - depth;
        if self.grid.placed_count() + remaining < self.best.placed_count {
            return;
        }

        let handle = self.order[depth];
        let footprint = self.table.get(handle);
        let candidates = self.generator.generate(&self.grid, footprint);
        for candidate in candidates {
            if self.out_of_time() {
                return;
            }
            if self
                .grid
                .place(self.table, handle, candidate.rotation, candidate.x, candidate.y)
            {
                self.backtrack(depth + 1);
                self.grid.remove(self.table, handle);
                if self.done {
                    return;
                }
            }
        }

        // Skip branch: move on without this block so the search can
        // still return a partial solution.
        self.backtrack(depth + 1);
    }

    fn into_record(self, spec: &CarrierSpec) -> PlacementRecord {
        let placed: Vec<Pose> = self
            .best
            .placed
            .iter()
            .map(|p| Pose::new(self.table.get(p.handle).id().clone(), p.x, p.y, p.rotation))
            .collect();
        let placed_ids: FxHashSet<&str> = placed.iter().map(|p| p.id.as_str()).collect();
        let unplaced: Vec<String> = spec
            .block_ids
            .iter()
            .filter(|id| !placed_ids.contains(id.as_str()))
            .cloned()
            .collect();

        let utilization = self.best.occupied as f64 / self.grid.usable_area() as f64;
        let success_rate = if self.total == 0 {
            0.0
        } else {
            placed.len() as f64 / self.total as f64
        };
        let score = if self.total == 0 {
            0.0
        } else {
            0.7 * success_rate + 0.3 * utilization
        };

        PlacementRecord {
            carrier: spec.summary(),
            placed_count: placed.len(),
            total_count: self.total,
            complete: unplaced.is_empty(),
            placed,
            unplaced,
            score,
            success_rate,
            utilization,
            elapsed_seconds: self.start.elapsed().as_secs_f64(),
        }
    }
}
