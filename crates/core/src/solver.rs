//! Search configuration and progress reporting.

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Neighbourhood used when inflating footprints by the inter-block
/// clearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ClearancePolicy {
    /// 4-neighbour (diamond) inflation: cells within Manhattan distance.
    #[default]
    Manhattan,
    /// 8-neighbour (square) inflation: cells within Chebyshev distance.
    Chebyshev,
}

/// Weights of the candidate scoring heuristic, in fixed-point
/// ten-thousandths.
///
/// Candidate scores are computed entirely in integers so that sorting is
/// stable across platforms; a weight of 4000 corresponds to 0.40 in the
/// unit-interval formulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScoreWeights {
    /// Bottom bias: prefers low-y placements.
    pub bottom: u32,
    /// Left alignment: prefers low-x placements.
    pub left: u32,
    /// Fraction of perimeter probes touching the deck edge or another block.
    pub adjacency: u32,
    /// Footprint area relative to the carrier.
    pub area: u32,
    /// Fraction of footprint cells on the usable-interior boundary.
    pub boundary: u32,
    /// Footprint density (area over bounding box).
    pub density: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            bottom: 4000,
            left: 2000,
            adjacency: 2000,
            area: 1000,
            boundary: 500,
            density: 500,
        }
    }
}

impl ScoreWeights {
    /// The fixed-point scale: component values are fractions of this.
    pub const SCALE: u32 = 10_000;
}

/// Configuration for a placement search.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchConfig {
    /// Wall-clock budget. The search returns its best-so-far solution
    /// when the budget elapses.
    pub max_time: Duration,

    /// Sweep step along x when enumerating candidate positions.
    pub step_x: u32,

    /// Sweep step along y when enumerating candidate positions.
    pub step_y: u32,

    /// Cap on the number of ranked candidates tried per block per depth
    /// (`None` = unbounded).
    pub max_candidates: Option<usize>,

    /// Neighbourhood used for inter-block clearance checks.
    pub clearance_policy: ClearancePolicy,

    /// Require a clear transporter corridor from the stern edge for
    /// non-crane blocks.
    pub transport_lanes: bool,

    /// Candidate scoring weights.
    pub weights: ScoreWeights,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_time: Duration::from_secs(60),
            step_x: 1,
            step_y: 1,
            max_candidates: None,
            clearance_policy: ClearancePolicy::default(),
            transport_lanes: false,
            weights: ScoreWeights::default(),
        }
    }
}

impl SearchConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the wall-clock budget.
    pub fn with_max_time(mut self, max_time: Duration) -> Self {
        self.max_time = max_time;
        self
    }

    /// Sets the sweep steps (clamped to at least 1).
    pub fn with_steps(mut self, step_x: u32, step_y: u32) -> Self {
        self.step_x = step_x.max(1);
        self.step_y = step_y.max(1);
        self
    }

    /// Caps the number of ranked candidates tried per block.
    pub fn with_candidate_cap(mut self, cap: usize) -> Self {
        self.max_candidates = Some(cap.max(1));
        self
    }

    /// Sets the clearance neighbourhood policy.
    pub fn with_clearance_policy(mut self, policy: ClearancePolicy) -> Self {
        self.clearance_policy = policy;
        self
    }

    /// Enables transporter lane checking.
    pub fn with_transport_lanes(mut self, enabled: bool) -> Self {
        self.transport_lanes = enabled;
        self
    }

    /// Overrides the candidate scoring weights.
    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }
}

/// Progress callback for long-running searches.
pub type ProgressCallback = Box<dyn Fn(ProgressInfo) + Send + Sync>;

/// Progress information published while a search runs.
#[derive(Debug, Clone, Default)]
pub struct ProgressInfo {
    /// Blocks placed in the best solution so far.
    pub placed: usize,
    /// Total blocks requested.
    pub total: usize,
    /// Best placement score so far (0.0 - 1.0).
    pub best_score: f64,
    /// Deck utilisation of the best solution so far (0.0 - 1.0).
    pub utilization: f64,
    /// Elapsed time in milliseconds.
    pub elapsed_ms: u64,
    /// Whether the search is still running.
    pub running: bool,
}

impl ProgressInfo {
    /// Creates a progress report for a running search.
    pub fn new() -> Self {
        Self {
            running: true,
            ..Default::default()
        }
    }

    /// Sets the placed/total counts.
    pub fn with_blocks(mut self, placed: usize, total: usize) -> Self {
        self.placed = placed;
        self.total = total;
        self
    }

    /// Sets the best score.
    pub fn with_score(mut self, score: f64) -> Self {
        self.best_score = score;
        self
    }

    /// Sets the utilisation.
    pub fn with_utilization(mut self, utilization: f64) -> Self {
        self.utilization = utilization;
        self
    }

    /// Sets the elapsed time.
    pub fn with_elapsed(mut self, elapsed_ms: u64) -> Self {
        self.elapsed_ms = elapsed_ms;
        self
    }

    /// Marks the search as finished.
    pub fn finished(mut self) -> Self {
        self.running = false;
        self
    }
}
