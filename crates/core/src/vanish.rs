//! Vanish detection - same-color 4-connected clusters of size >= 4
//!
//! The scan walks residents in registration order and flood-fills each
//! unvisited piece's component with an explicit worklist (no recursion, so an
//! arbitrarily tall board cannot blow the stack). Components of four or more
//! are flagged `pending_vanish`; the grid is otherwise untouched.

use std::collections::HashSet;

use arrayvec::ArrayVec;
use puyo_sim_types::Pos;

use crate::grid::{GridStore, PieceId};

/// Minimum component size that vanishes
pub const MIN_CLUSTER: usize = 4;

/// Flag every piece in a matchable component of size >= [`MIN_CLUSTER`].
/// Returns whether any component was found.
pub fn find_and_flag(grid: &mut GridStore) -> bool {
    let scan: Vec<PieceId> = grid.resident().to_vec();
    let mut doomed: HashSet<PieceId> = HashSet::new();
    let mut found = false;

    for &id in &scan {
        let Some(piece) = grid.piece(id) else {
            continue;
        };
        if piece.pending_vanish || !piece.color.is_matchable() || doomed.contains(&id) {
            continue;
        }
        let cluster = collect_cluster(grid, id);
        if cluster.len() >= MIN_CLUSTER {
            found = true;
            doomed.extend(cluster);
        }
    }

    for &id in &doomed {
        if let Some(piece) = grid.piece_mut(id) {
            piece.pending_vanish = true;
        }
    }
    found
}

/// Collect the 4-connected same-color component containing `start`,
/// ignoring pieces already pending vanish
fn collect_cluster(grid: &GridStore, start: PieceId) -> Vec<PieceId> {
    let Some(origin) = grid.piece(start) else {
        return Vec::new();
    };
    let color = origin.color;

    let mut cluster = Vec::new();
    let mut seen: HashSet<PieceId> = HashSet::new();
    let mut work = vec![start];
    seen.insert(start);

    while let Some(id) = work.pop() {
        cluster.push(id);
        let Some(piece) = grid.piece(id) else {
            continue;
        };
        for pos in neighbor_cells(piece.pos) {
            let Some(next) = grid.get(pos) else {
                continue;
            };
            if seen.contains(&next) {
                continue;
            }
            let Some(other) = grid.piece(next) else {
                continue;
            };
            if other.pending_vanish || other.color != color {
                continue;
            }
            seen.insert(next);
            work.push(next);
        }
    }
    cluster
}

/// In-field cells adjacent to `pos`, in up/down/left/right order
fn neighbor_cells(pos: Pos) -> ArrayVec<Pos, 4> {
    let mut cells = ArrayVec::new();
    for (dc, dr) in [(0, 1), (0, -1), (-1, 0), (1, 0)] {
        let next = pos.shifted(dc, dr);
        if !next.is_buried() {
            cells.push(next);
        }
    }
    cells
}
