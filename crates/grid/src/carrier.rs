//! Carrier deck configuration.

use deckpack_core::{BlockId, CarrierSummary, Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Geometry and placement constraints of a carrier deck.
///
/// Margins reserve full columns at the bow (+x) and stern (-x) ends and
/// full rows along both sides; which end of the physical ship is "bow"
/// is a caller convention. Defaults mirror the usual yard setup: two
/// cells of bow and stern margin, one cell of inter-block clearance, no
/// side margin.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CarrierSpec {
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

    /// Mandatory empty cells between distinct blocks (0 = touching allowed).
    pub block_clearance: u32,

    /// Blocks to place, in request order.
    pub block_ids: Vec<BlockId>,
}

impl CarrierSpec {
    /// Creates a spec with default margins and clearance.
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            bow_margin: 2,
            stern_margin: 2,
            side_margin: 0,
            block_clearance: 1,
            block_ids: Vec::new(),
        }
    }

    /// Sets the bow and stern margins.
    pub fn with_margins(mut self, bow: u32, stern: u32) -> Self {
        self.bow_margin = bow;
        self.stern_margin = stern;
        self
    }

    /// Sets the side margin.
    pub fn with_side_margin(mut self, side: u32) -> Self {
        self.side_margin = side;
        self
    }

    /// Sets the inter-block clearance.
    pub fn with_clearance(mut self, clearance: u32) -> Self {
        self.block_clearance = clearance;
        self
    }

    /// Sets the blocks to place.
    pub fn with_blocks<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<BlockId>,
    {
        self.block_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Validates the configuration, failing fast before any search.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidCarrier(format!(
                "carrier {} has degenerate size {}x{}",
                self.name, self.width, self.height
            )));
        }
        if self.bow_margin + self.stern_margin >= self.width {
            return Err(Error::InvalidCarrier(format!(
                "margins consume the deck: bow {} + stern {} >= width {}",
                self.bow_margin, self.stern_margin, self.width
            )));
        }
        if 2 * self.side_margin >= self.height {
            return Err(Error::InvalidCarrier(format!(
                "side margin {} consumes the deck height {}",
                self.side_margin, self.height
            )));
        }

        let mut seen = std::collections::HashSet::new();
        for id in &self.block_ids {
            if !seen.insert(id.as_str()) {
                return Err(Error::InvalidCarrier(format!("duplicate block id: {id}")));
            }
        }

        Ok(())
    }

    /// Usable x range `[lo, hi)` after the stern and bow margins.
    pub fn x_range(&self) -> (u32, u32) {
        (self.stern_margin, self.width - self.bow_margin)
    }

    /// Usable y range `[lo, hi)` after the side margins.
    pub fn y_range(&self) -> (u32, u32) {
        (self.side_margin, self.height - self.side_margin)
    }

    /// Area of the usable interior in cells.
    pub fn usable_area(&self) -> usize {
        let (x_lo, x_hi) = self.x_range();
        let (y_lo, y_hi) = self.y_range();
        (x_hi - x_lo) as usize * (y_hi - y_lo) as usize
    }

    /// Summary for embedding into a placement record.
    pub fn summary(&self) -> CarrierSummary {
        CarrierSummary {
            name: self.name.clone(),
            width: self.width,
            height: self.height,
            bow_margin: self.bow_margin,
            stern_margin: self.stern_margin,
            side_margin: self.side_margin,
            block_clearance: self.block_clearance,
        }
    }
}
