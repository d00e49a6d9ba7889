//! 2.5D voxel block footprints.

use deckpack_core::{BlockId, Error, Result, Rotation};
use rustc_hash::FxHashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-cell column data from the voxeliser: `[below_empty, filled,
/// above_empty]` voxel counts.
///
/// The engine treats the column as opaque metadata; only `filled > 0`
/// matters for feasibility, and that is resolved once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VoxelColumn {
    /// Empty voxels below the filled span.
    pub below_empty: u32,
    /// Filled voxels.
    pub filled: u32,
    /// Empty voxels above the filled span.
    pub above_empty: u32,
}

impl VoxelColumn {
    /// Creates a column from raw voxel counts.
    pub fn new(below_empty: u32, filled: u32, above_empty: u32) -> Self {
        Self {
            below_empty,
            filled,
            above_empty,
        }
    }

    /// A column resting on the deck with the given filled height.
    pub fn solid(filled: u32) -> Self {
        Self::new(0, filled, 0)
    }

    /// True if this column occupies its cell.
    pub fn is_filled(&self) -> bool {
        self.filled > 0
    }
}

/// One precomputed orientation of a footprint.
#[derive(Debug, Clone)]
struct RotatedView {
    width: u32,
    height: u32,
    /// Cell offsets, index-parallel with the footprint's column list.
    cells: Vec<(u32, u32)>,
    occupancy: FxHashSet<(u32, u32)>,
}

impl RotatedView {
    fn build(width: u32, height: u32, cells: Vec<(u32, u32)>) -> Self {
        let occupancy = cells.iter().copied().collect();
        Self {
            width,
            height,
            cells,
            occupancy,
        }
    }
}

/// How a block reaches its deck position.
///
/// Transporter blocks are pushed in from the stern edge and need a clear
/// lane when lane checking is enabled on the search; crane blocks are
/// lowered vertically and never need one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TransportMode {
    /// Moved on a transporter from the stern edge.
    #[default]
    Transporter,
    /// Lifted in by crane.
    Crane,
}

const ROTATIONS_BOTH: [Rotation; 2] = [Rotation::R0, Rotation::R90];
const ROTATIONS_SINGLE: [Rotation; 1] = [Rotation::R0];

/// An immutable 2.5D voxel block footprint.
///
/// Constructed once from voxeliser output and never mutated; rotation is
/// part of a pose, not of the footprint. Both orientations are
/// precomputed at construction, and a square footprint whose quarter
/// turn reproduces its own cell set collapses to a single orientation.
#[derive(Debug, Clone)]
pub struct Footprint {
    id: BlockId,
    /// Column metadata, index-parallel with each view's cell list.
    columns: Vec<VoxelColumn>,
    views: [RotatedView; 2],
    distinct_rotations: bool,
    density_fp: u32,
    transport: TransportMode,
    meta: Option<String>,
}

impl Footprint {
    /// Builds a footprint from raw voxeliser cells.
    ///
    /// Cells with `filled == 0` are dropped; coordinates are normalised
    /// so the bounding box starts at the origin. Fails if no filled cell
    /// remains or if two records name the same cell.
    pub fn new(id: impl Into<BlockId>, cells: Vec<(i32, i32, VoxelColumn)>) -> Result<Self> {
        let id = id.into();

        let mut filled: Vec<(i32, i32, VoxelColumn)> =
            cells.into_iter().filter(|(_, _, c)| c.is_filled()).collect();
        if filled.is_empty() {
            return Err(Error::InvalidFootprint(format!(
                "block {id} has no filled cells"
            )));
        }

        let min_x = filled.iter().map(|&(x, _, _)| x).min().unwrap_or(0);
        let min_y = filled.iter().map(|&(_, y, _)| y).min().unwrap_or(0);

        // Deterministic cell order regardless of voxeliser output order.
        filled.sort_by_key(|&(x, y, _)| (y, x));

        let mut base: Vec<(u32, u32)> = Vec::with_capacity(filled.len());
        let mut columns: Vec<VoxelColumn> = Vec::with_capacity(filled.len());
        let mut seen: FxHashSet<(u32, u32)> = FxHashSet::default();
        for (x, y, column) in filled {
            let cell = ((x - min_x) as u32, (y - min_y) as u32);
            if !seen.insert(cell) {
                return Err(Error::InvalidFootprint(format!(
                    "block {id} has duplicate cell ({}, {})",
                    cell.0, cell.1
                )));
            }
            base.push(cell);
            columns.push(column);
        }

        let width = base.iter().map(|&(x, _)| x).max().unwrap_or(0) + 1;
        let height = base.iter().map(|&(_, y)| y).max().unwrap_or(0) + 1;

        // Quarter turn: (x, y) -> (y, W - 1 - x); column metadata rides
        // along because the rotated list keeps the base index order.
        let rotated: Vec<(u32, u32)> = base
            .iter()
            .map(|&(x, y)| (y, width - 1 - x))
            .collect();

        let distinct_rotations = if width != height {
            true
        } else {
            let mut a = base.clone();
            let mut b = rotated.clone();
            a.sort_unstable();
            b.sort_unstable();
            a != b
        };

        let area = base.len() as u64;
        let density_fp = (area * 10_000 / (width as u64 * height as u64)) as u32;

        let views = [
            RotatedView::build(width, height, base),
            RotatedView::build(height, width, rotated),
        ];

        Ok(Self {
            id,
            columns,
            views,
            distinct_rotations,
            density_fp,
            transport: TransportMode::default(),
            meta: None,
        })
    }

    /// Builds a fully occupied rectangular footprint.
    pub fn solid(id: impl Into<BlockId>, width: u32, height: u32) -> Result<Self> {
        let id = id.into();
        if width == 0 || height == 0 {
            return Err(Error::InvalidFootprint(format!(
                "block {id} has degenerate size {width}x{height}"
            )));
        }
        let mut cells = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                cells.push((x as i32, y as i32, VoxelColumn::solid(1)));
            }
        }
        Self::new(id, cells)
    }

    /// Builds a footprint from bare cell coordinates with unit columns.
    pub fn from_cells(id: impl Into<BlockId>, cells: Vec<(i32, i32)>) -> Result<Self> {
        let cells = cells
            .into_iter()
            .map(|(x, y)| (x, y, VoxelColumn::solid(1)))
            .collect();
        Self::new(id, cells)
    }

    /// Attaches opaque orientation metadata from the voxeliser.
    pub fn with_meta(mut self, meta: impl Into<String>) -> Self {
        self.meta = Some(meta.into());
        self
    }

    /// Sets how the block reaches the deck (transporter by default).
    pub fn with_transport(mut self, transport: TransportMode) -> Self {
        self.transport = transport;
        self
    }

    /// Returns the block identifier.
    pub fn id(&self) -> &BlockId {
        &self.id
    }

    /// Returns the orientation metadata, if any.
    pub fn meta(&self) -> Option<&str> {
        self.meta.as_deref()
    }

    /// Returns how the block reaches the deck.
    pub fn transport(&self) -> TransportMode {
        self.transport
    }

    /// Returns the number of occupied cells.
    pub fn area(&self) -> usize {
        self.columns.len()
    }

    /// Returns the unrotated bounding-box width.
    pub fn width(&self) -> u32 {
        self.views[0].width
    }

    /// Returns the unrotated bounding-box height.
    pub fn height(&self) -> u32 {
        self.views[0].height
    }

    /// Returns the bounding box `(width, height)` for a rotation.
    pub fn bounds(&self, rotation: Rotation) -> (u32, u32) {
        let view = self.view(rotation);
        (view.width, view.height)
    }

    /// Returns the occupied cell offsets for a rotation, relative to the
    /// footprint origin.
    pub fn cells(&self, rotation: Rotation) -> &[(u32, u32)] {
        &self.view(rotation).cells
    }

    /// Returns the column metadata for the cell at `index` in
    /// [`Self::cells`] (the index is rotation-independent).
    pub fn column(&self, index: usize) -> VoxelColumn {
        self.columns[index]
    }

    /// Returns all column metadata in cell-list order.
    pub fn columns(&self) -> &[VoxelColumn] {
        &self.columns
    }

    /// True if the rotated view occupies the given offset.
    pub fn contains(&self, rotation: Rotation, x: u32, y: u32) -> bool {
        self.view(rotation).occupancy.contains(&(x, y))
    }

    /// Occupied-cell fraction of the bounding box.
    pub fn density(&self) -> f64 {
        self.area() as f64 / (self.width() as f64 * self.height() as f64)
    }

    /// Density in fixed-point ten-thousandths, for deterministic ordering.
    pub(crate) fn density_fp(&self) -> u32 {
        self.density_fp
    }

    /// Returns the rotations worth trying for this footprint.
    ///
    /// A square footprint whose quarter turn reproduces its own cell set
    /// yields only [`Rotation::R0`].
    pub fn rotations(&self) -> &'static [Rotation] {
        if self.distinct_rotations {
            &ROTATIONS_BOTH
        } else {
            &ROTATIONS_SINGLE
        }
    }

    fn view(&self, rotation: Rotation) -> &RotatedView {
        match rotation {
            Rotation::R0 => &self.views[0],
            Rotation::R90 => &self.views[1],
        }
    }
}
