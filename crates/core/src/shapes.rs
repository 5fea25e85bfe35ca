//! Shape catalog - tetromino cell layouts, rotation transform and wall kicks
//!
//! Cell offsets are local coordinates with y pointing up. Rotation uses the
//! matrix `(0, 1, -1, 0)` scaled by the direction, so `+1` turns a piece
//! clockwise. I and O are laid out around a half-cell pivot and are rotated
//! about `(0.5, 0.5)`; the rest rotate about the origin cell.
//! Reference: https://tetris.wiki/SRS

use crate::types::{RotationDirection, ShapeId};

/// Offset of a single cell relative to the piece position
pub type CellOffset = (i32, i32);

/// The four cells that make up a tetromino
pub type CellLayout = [CellOffset; 4];

/// Wall kick candidates, indexed by `[transition row][attempt]`
pub type KickTable = [[CellOffset; 5]; 8];

/// 90° rotation matrix `[m00, m01, m10, m11]`
pub const ROTATION_MATRIX: [i32; 4] = [0, 1, -1, 0];

/// Point a shape rotates about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pivot {
    /// Rotate about the origin cell; results are rounded to nearest
    Cell,
    /// Rotate about `(0.5, 0.5)`; results are rounded up
    HalfCell,
}

/// Immutable per-shape data
#[derive(Debug, PartialEq, Eq)]
pub struct ShapeDefinition {
    pub shape: ShapeId,
    pub cells: CellLayout,
    pub kicks: &'static KickTable,
    pub pivot: Pivot,
}

impl ShapeDefinition {
    /// Number of kick-table rows (rotation transitions)
    pub fn kick_rows(&self) -> usize {
        self.kicks.len()
    }
}

/// Look up the catalog entry for a shape.
///
/// Returns `None` for `Ghost`, which has no geometry of its own.
pub fn definition_of(shape: ShapeId) -> Option<&'static ShapeDefinition> {
    match shape {
        ShapeId::I => Some(&I_DEFINITION),
        ShapeId::O => Some(&O_DEFINITION),
        ShapeId::T => Some(&T_DEFINITION),
        ShapeId::J => Some(&J_DEFINITION),
        ShapeId::L => Some(&L_DEFINITION),
        ShapeId::S => Some(&S_DEFINITION),
        ShapeId::Z => Some(&Z_DEFINITION),
        ShapeId::Ghost => None,
    }
}

static I_DEFINITION: ShapeDefinition = ShapeDefinition {
    shape: ShapeId::I,
    cells: [(-1, 1), (0, 1), (1, 1), (2, 1)],
    kicks: &I_KICKS,
    pivot: Pivot::HalfCell,
};

static O_DEFINITION: ShapeDefinition = ShapeDefinition {
    shape: ShapeId::O,
    cells: [(0, 1), (1, 1), (0, 0), (1, 0)],
    kicks: &JLOSTZ_KICKS,
    pivot: Pivot::HalfCell,
};

static T_DEFINITION: ShapeDefinition = ShapeDefinition {
    shape: ShapeId::T,
    cells: [(0, 1), (-1, 0), (0, 0), (1, 0)],
    kicks: &JLOSTZ_KICKS,
    pivot: Pivot::Cell,
};

static J_DEFINITION: ShapeDefinition = ShapeDefinition {
    shape: ShapeId::J,
    cells: [(-1, 1), (-1, 0), (0, 0), (1, 0)],
    kicks: &JLOSTZ_KICKS,
    pivot: Pivot::Cell,
};

static L_DEFINITION: ShapeDefinition = ShapeDefinition {
    shape: ShapeId::L,
    cells: [(1, 1), (-1, 0), (0, 0), (1, 0)],
    kicks: &JLOSTZ_KICKS,
    pivot: Pivot::Cell,
};

static S_DEFINITION: ShapeDefinition = ShapeDefinition {
    shape: ShapeId::S,
    cells: [(0, 1), (1, 1), (-1, 0), (0, 0)],
    kicks: &JLOSTZ_KICKS,
    pivot: Pivot::Cell,
};

static Z_DEFINITION: ShapeDefinition = ShapeDefinition {
    shape: ShapeId::Z,
    cells: [(-1, 1), (0, 1), (0, 0), (1, 0)],
    kicks: &JLOSTZ_KICKS,
    pivot: Pivot::Cell,
};

/// I piece kick table
const I_KICKS: KickTable = [
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
];

/// Kick table shared by J, L, O, S, T and Z
const JLOSTZ_KICKS: KickTable = [
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
];

/// Rotate a single offset by 90° in `direction` about the shape's pivot.
pub fn rotate_offset(offset: CellOffset, pivot: Pivot, direction: RotationDirection) -> CellOffset {
    let d = direction.sign() as f32;
    let [m00, m01, m10, m11] = ROTATION_MATRIX.map(|m| m as f32);

    match pivot {
        Pivot::HalfCell => {
            let x = offset.0 as f32 - 0.5;
            let y = offset.1 as f32 - 0.5;
            (
                (x * m00 * d + y * m01 * d).ceil() as i32,
                (x * m10 * d + y * m11 * d).ceil() as i32,
            )
        }
        Pivot::Cell => {
            let x = offset.0 as f32;
            let y = offset.1 as f32;
            (
                (x * m00 * d + y * m01 * d).round() as i32,
                (x * m10 * d + y * m11 * d).round() as i32,
            )
        }
    }
}

/// Rotate every cell of a layout in place.
pub fn rotate_layout(cells: &mut CellLayout, pivot: Pivot, direction: RotationDirection) {
    for cell in cells.iter_mut() {
        *cell = rotate_offset(*cell, pivot, direction);
    }
}

/// Wrap `value` into `[0, len)`.
pub fn wrap_index(value: i32, len: usize) -> usize {
    value.rem_euclid(len as i32) as usize
}

/// Kick-table row for a rotation that has just landed on `new_rotation`.
///
/// The row is `2 * new_rotation`, one less for counter-clockwise turns,
/// wrapped into the table.
pub fn kick_row(new_rotation: u8, direction: RotationDirection, rows: usize) -> usize {
    let mut row = new_rotation as i32 * 2;
    if direction == RotationDirection::CounterClockwise {
        row -= 1;
    }
    wrap_index(row, rows)
}
