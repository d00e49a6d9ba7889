//! Placement record types.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unique identifier for a block, as assigned by the voxeliser.
pub type BlockId = String;

/// Rotation of a placed block. Only axis-aligned quarter turns are
/// supported; a 90° rotation swaps the footprint's width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "u16", try_from = "u16"))]
pub enum Rotation {
    /// Original orientation.
    #[default]
    R0,
    /// Quarter turn: cell `(x, y)` maps to `(y, W - 1 - x)`.
    R90,
}

impl Rotation {
    /// Returns the rotation angle in degrees.
    pub fn degrees(self) -> u16 {
        match self {
            Self::R0 => 0,
            Self::R90 => 90,
        }
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Self::R0),
            90 => Ok(Self::R90),
            other => Err(format!("unsupported rotation: {other} degrees")),
        }
    }
}

/// A placement of one block: origin cell plus rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pose {
    /// Block identifier.
    pub id: BlockId,
    /// X coordinate of the footprint origin on the carrier.
    pub x: u32,
    /// Y coordinate of the footprint origin on the carrier.
    pub y: u32,
    /// Applied rotation.
    pub rotation: Rotation,
}

impl Pose {
    /// Creates a new pose.
    pub fn new(id: impl Into<BlockId>, x: u32, y: u32, rotation: Rotation) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            rotation,
        }
    }
}

/// Identity and geometry of the carrier a record was produced for.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CarrierSummary {
    /// Carrier label (opaque to the engine).
    pub name: String,
    /// Deck width in cells.
    pub width: u32,
    /// Deck height in cells.
    pub height: u32,
    /// Reserved columns at the +x end.
    pub bow_margin: u32,
    /// Reserved columns at the -x end.
    pub stern_margin: u32,
    /// Reserved rows at both y ends.
    pub side_margin: u32,
    /// Mandatory empty cells between distinct blocks.
    pub block_clearance: u32,
}

/// Immutable result of a placement search.
///
/// The record is a self-contained snapshot: it never references the
/// working grid and is safe to hand to exporters or serialise as JSON.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacementRecord {
    /// Carrier the blocks were placed on.
    pub carrier: CarrierSummary,

    /// Placed blocks with their poses, in placement order.
    pub placed: Vec<Pose>,

    /// Ids of blocks that could not be placed, in request order.
    pub unplaced: Vec<BlockId>,

    /// Placement score (0.0 - 1.0): 0.7 x placed fraction + 0.3 x utilisation.
    pub score: f64,

    /// Number of blocks placed.
    pub placed_count: usize,

    /// Number of blocks requested.
    pub total_count: usize,

    /// `placed_count / total_count` (0.0 for an empty request).
    pub success_rate: f64,

    /// Occupied usable-interior cells over usable-interior area.
    pub utilization: f64,

    /// Wall-clock time the search consumed, in seconds.
    pub elapsed_seconds: f64,

    /// True iff every requested block was placed.
    pub complete: bool,
}

impl PlacementRecord {
    /// Returns true if every requested block was placed.
    pub fn all_placed(&self) -> bool {
        self.unplaced.is_empty()
    }

    /// Looks up the pose of a placed block by id.
    pub fn pose_of(&self, id: &str) -> Option<&Pose> {
        self.placed.iter().find(|p| p.id == id)
    }

    /// Returns the score as a percentage string.
    pub fn score_percent(&self) -> String {
        format!("{:.1}%", self.score * 100.0)
    }
}

/// Compact summary of a placement record, for logs and reports.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacementSummary {
    /// Carrier label.
    pub carrier: String,
    /// Blocks placed.
    pub placed: usize,
    /// Blocks requested.
    pub total: usize,
    /// Success rate as a percentage.
    pub success_percent: f64,
    /// Deck utilisation as a percentage.
    pub utilization_percent: f64,
    /// Search time in seconds.
    pub elapsed_seconds: f64,
}

impl From<&PlacementRecord> for PlacementSummary {
    fn from(record: &PlacementRecord) -> Self {
        Self {
            carrier: record.carrier.name.clone(),
            placed: record.placed_count,
            total: record.total_count,
            success_percent: record.success_rate * 100.0,
            utilization_percent: record.utilization * 100.0,
            elapsed_seconds: record.elapsed_seconds,
        }
    }
}
