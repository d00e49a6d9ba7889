//! Placement feasibility oracle.
//!
//! A pure predicate over the grid state: interior containment,
//! non-overlap, and inter-block clearance. It never mutates anything;
//! `place` re-runs it so callers get the all-or-nothing contract even if
//! the grid changed since candidates were generated.

use crate::footprint::{Footprint, TransportMode};
use crate::grid::{CarrierGrid, EMPTY};
use deckpack_core::{ClearancePolicy, Rotation};

/// Decides whether a footprint may be placed at `(x, y)` with the given
/// rotation.
///
/// Accepts iff every rotated cell lies in the usable interior, every
/// such cell is currently empty, and no cell within `clearance` distance
/// of the footprint (under the grid's neighbourhood policy) is owned by
/// another block. A clearance of zero allows touching.
///
/// With transporter lanes enabled on the grid, a transporter block
/// additionally needs every cell between the stern edge and its position
/// to be free across its bounding-box rows, so it can be pushed in.
/// Crane blocks are lowered vertically and skip the lane check.
pub fn admits(grid: &CarrierGrid, footprint: &Footprint, rotation: Rotation, x: u32, y: u32) -> bool {
    let (width, height) = footprint.bounds(rotation);
    let (x_lo, x_hi) = grid.x_bounds();
    let (y_lo, y_hi) = grid.y_bounds();

    // Bounding-box containment covers every cell: offsets live in
    // [0, width) x [0, height).
    if x < x_lo || y < y_lo || x + width > x_hi || y + height > y_hi {
        return false;
    }

    for &(cx, cy) in footprint.cells(rotation) {
        if grid.cell_unchecked(x + cx, y + cy) != EMPTY {
            return false;
        }
    }

    if grid.transport_lanes()
        && footprint.transport() == TransportMode::Transporter
        && !lane_is_clear(grid, x, y, height)
    {
        return false;
    }

    let clearance = grid.clearance() as i64;
    if clearance == 0 || grid.placed_count() == 0 {
        return true;
    }

    // The candidate's own cells are still empty, so any occupied cell in
    // the inflated region necessarily belongs to another block.
    let deck_w = grid.width() as i64;
    let deck_h = grid.height() as i64;
    for &(cx, cy) in footprint.cells(rotation) {
        let gx = (x + cx) as i64;
        let gy = (y + cy) as i64;
        for dy in -clearance..=clearance {
            let span = match grid.policy() {
                ClearancePolicy::Manhattan => clearance - dy.abs(),
                ClearancePolicy::Chebyshev => clearance,
            };
            for dx in -span..=span {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = gx + dx;
                let ny = gy + dy;
                if nx < 0 || ny < 0 || nx >= deck_w || ny >= deck_h {
                    continue;
                }
                if grid.cell_unchecked(nx as u32, ny as u32) != EMPTY {
                    return false;
                }
            }
        }
    }

    true
}

/// True if the corridor from the stern edge to column `x` is free across
/// rows `[y, y + height)`.
fn lane_is_clear(grid: &CarrierGrid, x: u32, y: u32, height: u32) -> bool {
    for lane_x in 0..x {
        for lane_y in y..y + height {
            if grid.cell_unchecked(lane_x, lane_y) != EMPTY {
                return false;
            }
        }
    }
    true
}
