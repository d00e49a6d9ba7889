//! # Deckpack Grid
//!
//! Grid-based block placement engine for carrier decks.
//!
//! Blocks arrive as 2.5D voxel footprints from an external voxeliser;
//! the engine packs them onto a rectangular deck under edge-margin and
//! inter-block clearance constraints, maximising the number of placed
//! blocks. The search is anytime: it keeps the best partial solution
//! found so far and returns it when the wall-clock budget runs out.
//!
//! ## Components
//!
//! - [`Footprint`]: immutable voxel block with precomputed rotations
//! - [`CarrierSpec`] / [`CarrierGrid`]: deck configuration and occupancy
//! - [`clearance`]: the placement feasibility oracle
//! - [`CandidateGenerator`]: deterministic ranked pose enumeration
//! - [`PlacementSearch`]: anytime heuristic backtracking
//! - [`PlacementRecord`]: immutable, serialisable result
//!
//! ## Quick Start
//!
//! ```rust
//! use deckpack_grid::{CarrierSpec, Footprint, PlacementSearch};
//!
//! // Footprints normally come from the voxeliser; solid rectangles
//! // are enough for a demo.
//! let blocks = vec![
//!     Footprint::solid("A", 5, 5).unwrap(),
//!     Footprint::solid("B", 5, 5).unwrap(),
//! ];
//!
//! let spec = CarrierSpec::new("demo", 14, 5)
//!     .with_margins(2, 2)
//!     .with_clearance(0)
//!     .with_blocks(["A", "B"]);
//!
//! let search = PlacementSearch::default_config();
//! let record = search.solve(&spec, &blocks).unwrap();
//!
//! assert_eq!(record.placed_count, 2);
//! println!(
//!     "placed {}/{} blocks, utilisation {:.1}%",
//!     record.placed_count,
//!     record.total_count,
//!     record.utilization * 100.0
//! );
//! ```
//!
//! ## Irregular footprints
//!
//! ```rust
//! use deckpack_grid::{Footprint, Rotation};
//!
//! // An L-shaped block: 5 filled cells in a 3x3 bounding box.
//! let l = Footprint::from_cells("L", vec![(0, 0), (0, 1), (0, 2), (1, 0), (2, 0)]).unwrap();
//! assert_eq!(l.area(), 5);
//! assert_eq!(l.bounds(Rotation::R90), (3, 3));
//! ```
//!
//! ## Feature flags
//!
//! - `serde` (default): serialization for specs, configs, and records.

pub mod candidates;
pub mod carrier;
pub mod clearance;
pub mod footprint;
pub mod grid;
pub mod search;

// Re-exports
pub use candidates::{Candidate, CandidateGenerator};
pub use carrier::CarrierSpec;
pub use footprint::{Footprint, TransportMode, VoxelColumn};
pub use grid::{BlockHandle, BlockTable, CarrierGrid, PlacedBlock, EMPTY};
pub use search::PlacementSearch;
pub use deckpack_core::{
    BlockId, CarrierSummary, ClearancePolicy, Error, PlacementRecord, PlacementSummary, Pose,
    ProgressCallback, ProgressInfo, Result, Rotation, ScoreWeights, SearchConfig,
};
