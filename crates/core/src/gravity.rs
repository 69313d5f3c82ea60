//! Gravity module - settles residents downward after a vanish step
//!
//! Residents are processed lowest row first (column as tie-break), so every
//! support cell is final before anything resting on it moves. One forward pass
//! is therefore enough; each piece just slides down until something stops it.

use crate::grid::{GridStore, PieceId};

/// Settle every resident as far down as it can go
pub fn settle(grid: &mut GridStore) {
    let mut order: Vec<PieceId> = grid.resident().to_vec();
    order.sort_by_key(|&id| sort_key(grid, id));
    for id in order {
        while can_fall(grid, id) {
            let Some(pos) = grid.piece(id).map(|piece| piece.pos) else {
                break;
            };
            grid.move_to(id, pos.below());
        }
    }
}

fn sort_key(grid: &GridStore, id: PieceId) -> i32 {
    grid.piece(id).map_or(i32::MAX, |piece| {
        i32::from(piece.pos.row) * 100 + i32::from(piece.pos.col)
    })
}

/// Whether a resident can drop one more row: it must sit free of walls and
/// other pieces, above row zero, with nothing directly beneath it
pub fn can_fall(grid: &GridStore, id: PieceId) -> bool {
    let Some(piece) = grid.piece(id) else {
        return false;
    };
    if piece.pos.is_buried() {
        return false;
    }
    if grid.occupant(piece.pos).is_some_and(|other| other != id) {
        return false;
    }
    if piece.pos.row <= 0 {
        return false;
    }
    grid.occupant(piece.pos.below()).is_none()
}
