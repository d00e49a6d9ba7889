//! # Deckpack Core
//!
//! Shared types for the deckpack carrier-deck placement engine.
//!
//! This crate holds the pieces of the engine contract that external
//! collaborators (config generators, exporters, viewers) also need:
//!
//! - **Errors**: [`Error`], [`Result`]
//! - **Search configuration**: [`SearchConfig`], [`ClearancePolicy`],
//!   [`ScoreWeights`]
//! - **Progress reporting**: [`ProgressCallback`], [`ProgressInfo`]
//! - **Results**: [`PlacementRecord`], [`Pose`], [`Rotation`],
//!   [`PlacementSummary`]
//!
//! The placement engine itself lives in the `deckpack-grid` crate.
//!
//! ## Configuration
//!
//! ```rust
//! use deckpack_core::{ClearancePolicy, SearchConfig};
//! use std::time::Duration;
//!
//! let config = SearchConfig::new()
//!     .with_max_time(Duration::from_secs(30))
//!     .with_candidate_cap(64)
//!     .with_clearance_policy(ClearancePolicy::Manhattan);
//! ```
//!
//! ## Feature flags
//!
//! - `serde` (default): serialization support for configs and records.

pub mod error;
pub mod result;
pub mod solver;

// Re-exports
pub use error::{Error, Result};
pub use result::{BlockId, CarrierSummary, PlacementRecord, PlacementSummary, Pose, Rotation};
pub use solver::{ClearancePolicy, ProgressCallback, ProgressInfo, ScoreWeights, SearchConfig};
