//! Carrier occupancy grid and the block handle table.
//!
//! The grid is a flat row-major array of block handles. Handles are
//! small integers interned through [`BlockTable`], so backtracking
//! snapshots are a plain array copy instead of a string-keyed map clone.

use crate::carrier::CarrierSpec;
use crate::clearance;
use crate::footprint::Footprint;
use deckpack_core::{ClearancePolicy, Error, Result, Rotation};
use rustc_hash::FxHashMap;

/// Dense handle of an interned block.
pub type BlockHandle = u16;

/// Cell sentinel for "no block here".
pub const EMPTY: BlockHandle = BlockHandle::MAX;

/// Interning table mapping block ids to dense handles.
#[derive(Debug, Default)]
pub struct BlockTable {
    blocks: Vec<Footprint>,
    index: FxHashMap<String, BlockHandle>,
}

impl BlockTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a footprint and returns its handle.
    pub fn register(&mut self, footprint: Footprint) -> Result<BlockHandle> {
        if self.blocks.len() >= EMPTY as usize {
            return Err(Error::Internal(format!(
                "block table full ({} blocks)",
                self.blocks.len()
            )));
        }
        if self.index.contains_key(footprint.id().as_str()) {
            return Err(Error::InvalidFootprint(format!(
                "duplicate footprint id: {}",
                footprint.id()
            )));
        }
        let handle = self.blocks.len() as BlockHandle;
        self.index.insert(footprint.id().clone(), handle);
        self.blocks.push(footprint);
        Ok(handle)
    }

    /// Returns the footprint for a handle issued by this table.
    pub fn get(&self, handle: BlockHandle) -> &Footprint {
        &self.blocks[handle as usize]
    }

    /// Looks up a handle by block id.
    pub fn lookup(&self, id: &str) -> Option<BlockHandle> {
        self.index.get(id).copied()
    }

    /// Number of interned blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// True if no block has been interned.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// A block currently on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedBlock {
    /// Handle of the placed block.
    pub handle: BlockHandle,
    /// X coordinate of the footprint origin.
    pub x: u32,
    /// Y coordinate of the footprint origin.
    pub y: u32,
    /// Applied rotation.
    pub rotation: Rotation,
}

/// 2D occupancy grid of a carrier deck.
///
/// Owns its cell array exclusively; all mutation goes through
/// [`place`](Self::place) and [`remove`](Self::remove), both of which
/// are all-or-nothing.
#[derive(Debug, Clone)]
pub struct CarrierGrid {
    width: u32,
    height: u32,
    x_lo: u32,
    x_hi: u32,
    y_lo: u32,
    y_hi: u32,
    clearance: u32,
    policy: ClearancePolicy,
    transport_lanes: bool,
    cells: Vec<BlockHandle>,
    /// Placed blocks in placement order.
    placed: Vec<PlacedBlock>,
    occupied: usize,
}

impl CarrierGrid {
    /// Creates an empty grid for a validated carrier.
    pub fn new(spec: &CarrierSpec, policy: ClearancePolicy) -> Result<Self> {
        spec.validate()?;
        let (x_lo, x_hi) = spec.x_range();
        let (y_lo, y_hi) = spec.y_range();
        Ok(Self {
            width: spec.width,
            height: spec.height,
            x_lo,
            x_hi,
            y_lo,
            y_hi,
            clearance: spec.block_clearance,
            policy,
            transport_lanes: false,
            cells: vec![EMPTY; spec.width as usize * spec.height as usize],
            placed: Vec::new(),
            occupied: 0,
        })
    }

    /// Enables transporter lane checking: transporter blocks must have a
    /// clear corridor from the stern edge to their position.
    pub fn with_transport_lanes(mut self, enabled: bool) -> Self {
        self.transport_lanes = enabled;
        self
    }

    /// Deck width in cells.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Deck height in cells.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Usable x range `[lo, hi)`.
    pub fn x_bounds(&self) -> (u32, u32) {
        (self.x_lo, self.x_hi)
    }

    /// Usable y range `[lo, hi)`.
    pub fn y_bounds(&self) -> (u32, u32) {
        (self.y_lo, self.y_hi)
    }

    /// Inter-block clearance in cells.
    pub fn clearance(&self) -> u32 {
        self.clearance
    }

    /// Clearance neighbourhood policy.
    pub fn policy(&self) -> ClearancePolicy {
        self.policy
    }

    /// Whether transporter lane checking is enabled.
    pub fn transport_lanes(&self) -> bool {
        self.transport_lanes
    }

    /// Area of the usable interior in cells.
    pub fn usable_area(&self) -> usize {
        (self.x_hi - self.x_lo) as usize * (self.y_hi - self.y_lo) as usize
    }

    /// Cells currently claimed by placed blocks.
    pub fn occupied_cells(&self) -> usize {
        self.occupied
    }

    /// Placed blocks in placement order.
    pub fn placed(&self) -> &[PlacedBlock] {
        &self.placed
    }

    /// Number of placed blocks.
    pub fn placed_count(&self) -> usize {
        self.placed.len()
    }

    /// Returns the owner of a cell, or `None` if it is empty.
    ///
    /// Out-of-bounds coordinates are an error, not a silent miss.
    pub fn owner(&self, x: u32, y: u32) -> Result<Option<BlockHandle>> {
        if x >= self.width || y >= self.height {
            return Err(Error::OutOfBounds(format!(
                "({x}, {y}) outside {}x{} deck",
                self.width, self.height
            )));
        }
        let handle = self.cells[self.idx(x, y)];
        Ok((handle != EMPTY).then_some(handle))
    }

    /// True if the cell is unclaimed.
    pub fn is_empty(&self, x: u32, y: u32) -> Result<bool> {
        Ok(self.owner(x, y)?.is_none())
    }

    /// Checks whether a footprint can be placed at `(x, y)` with the
    /// given rotation. Delegates to the clearance oracle.
    pub fn can_place(&self, footprint: &Footprint, rotation: Rotation, x: u32, y: u32) -> bool {
        clearance::admits(self, footprint, rotation, x, y)
    }

    /// Places a block, claiming every rotated cell with its handle.
    ///
    /// Returns `false` and leaves the grid untouched if the placement is
    /// infeasible or the handle is already on the grid.
    pub fn place(
        &mut self,
        table: &BlockTable,
        handle: BlockHandle,
        rotation: Rotation,
        x: u32,
        y: u32,
    ) -> bool {
        if self.placed.iter().any(|p| p.handle == handle) {
            return false;
        }
        let footprint = table.get(handle);
        if !clearance::admits(self, footprint, rotation, x, y) {
            return false;
        }
        for &(cx, cy) in footprint.cells(rotation) {
            let idx = self.idx(x + cx, y + cy);
            debug_assert_eq!(self.cells[idx], EMPTY);
            self.cells[idx] = handle;
        }
        self.occupied += footprint.area();
        self.placed.push(PlacedBlock {
            handle,
            x,
            y,
            rotation,
        });
        true
    }

    /// Clears every cell owned by a placed block.
    ///
    /// No-op returning `false` if the handle is not on the grid.
    pub fn remove(&mut self, table: &BlockTable, handle: BlockHandle) -> bool {
        let Some(position) = self.placed.iter().position(|p| p.handle == handle) else {
            return false;
        };
        let entry = self.placed.remove(position);
        let footprint = table.get(handle);
        for &(cx, cy) in footprint.cells(entry.rotation) {
            let idx = self.idx(entry.x + cx, entry.y + cy);
            debug_assert_eq!(self.cells[idx], handle);
            self.cells[idx] = EMPTY;
        }
        self.occupied -= footprint.area();
        true
    }

    /// Current `(placed_count, utilisation)` of the deck.
    pub fn score(&self) -> (usize, f64) {
        (self.placed.len(), self.utilization())
    }

    /// Occupied usable-interior cells over usable-interior area.
    pub fn utilization(&self) -> f64 {
        self.occupied as f64 / self.usable_area() as f64
    }

    /// Raw cell read for hot paths; the caller guarantees bounds.
    #[inline]
    pub(crate) fn cell_unchecked(&self, x: u32, y: u32) -> BlockHandle {
        self.cells[self.idx(x, y)]
    }

    #[inline]
    fn idx(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}
