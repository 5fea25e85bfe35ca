//! Shape catalog and rotation tests

use tiltris::core::shapes::{definition_of, rotate_layout, Pivot};
use tiltris::core::{ActivePiece, Grid, Position};
use tiltris::types::{RotationDirection, ShapeId};

// ============== Catalog ==============

#[test]
fn test_every_playable_shape_has_four_cells_and_kicks() {
    for shape in ShapeId::PLAYABLE {
        let def = definition_of(shape).unwrap();
        assert_eq!(def.shape, shape);
        assert_eq!(def.cells.len(), 4);
        assert!(def.kick_rows() > 0);
        assert!(def.kicks.iter().all(|row| !row.is_empty()));

        // Four distinct cells.
        let mut cells = def.cells.to_vec();
        cells.sort();
        cells.dedup();
        assert_eq!(cells.len(), 4, "{:?}", shape);
    }
}

#[test]
fn test_every_kick_row_starts_in_place() {
    for shape in ShapeId::PLAYABLE {
        let def = definition_of(shape).unwrap();
        assert!(def.kicks.iter().all(|row| row[0] == (0, 0)), "{:?}", shape);
    }
}

#[test]
fn test_half_cell_pivots() {
    assert_eq!(definition_of(ShapeId::I).unwrap().pivot, Pivot::HalfCell);
    assert_eq!(definition_of(ShapeId::O).unwrap().pivot, Pivot::HalfCell);
    for shape in [ShapeId::T, ShapeId::J, ShapeId::L, ShapeId::S, ShapeId::Z] {
        assert_eq!(definition_of(shape).unwrap().pivot, Pivot::Cell);
    }
}

#[test]
fn test_ghost_is_not_in_catalog() {
    assert!(definition_of(ShapeId::Ghost).is_none());
    assert!(!ShapeId::PLAYABLE.contains(&ShapeId::Ghost));
}

// ============== Rotation ==============

#[test]
fn test_four_turns_restore_layout() {
    for shape in ShapeId::PLAYABLE {
        let def = definition_of(shape).unwrap();
        for direction in [RotationDirection::Clockwise, RotationDirection::CounterClockwise] {
            let mut cells = def.cells;
            for _ in 0..4 {
                rotate_layout(&mut cells, def.pivot, direction);
            }
            assert_eq!(cells, def.cells, "{:?} {:?}", shape, direction);
        }
    }
}

#[test]
fn test_t_rotation_states() {
    let grid = Grid::new(10, 20);
    let mut piece = ActivePiece::new(ShapeId::T, Position::new(5, 10, 0), 1, 0).unwrap();

    assert!(piece.rotate(&grid, RotationDirection::Clockwise));
    assert_eq!(piece.rotation(), 1);
    assert_eq!(piece.cells(), &[(1, 0), (0, 1), (0, 0), (0, -1)]);

    assert!(piece.rotate(&grid, RotationDirection::Clockwise));
    assert_eq!(piece.rotation(), 2);
    assert_eq!(piece.cells(), &[(0, -1), (1, 0), (0, 0), (-1, 0)]);

    assert!(piece.rotate(&grid, RotationDirection::CounterClockwise));
    assert!(piece.rotate(&grid, RotationDirection::CounterClockwise));
    assert_eq!(piece.rotation(), 0);
    assert_eq!(piece.cells(), &[(0, 1), (-1, 0), (0, 0), (1, 0)]);
    assert_eq!(piece.position(), Position::new(5, 10, 0));
}

#[test]
fn test_counter_clockwise_from_zero_wraps_to_three() {
    let grid = Grid::new(10, 20);
    let mut piece = ActivePiece::new(ShapeId::J, Position::new(5, 10, 0), 1, 0).unwrap();

    assert!(piece.rotate(&grid, RotationDirection::CounterClockwise));
    assert_eq!(piece.rotation(), 3);
}

#[test]
fn test_rotation_against_floor_kicks_up() {
    let grid = Grid::new(10, 20);
    // T resting on the floor: rotating to a vertical state needs a row below.
    let mut piece = ActivePiece::new(ShapeId::T, Position::new(5, 1, 0), 1, 0).unwrap();

    assert!(piece.rotate(&grid, RotationDirection::Clockwise));
    assert!(piece.is_valid(&grid));
    assert!(piece.absolute_cells().iter().all(|&(_, row)| row >= 1));
    assert_eq!(piece.rotation(), 1);
}
