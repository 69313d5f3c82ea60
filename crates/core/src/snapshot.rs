//! Snapshot module - one-deep undo of the resident field
//!
//! A snapshot records every resident's (color, position) plus the sequencer
//! read cursor that was in play when it was taken. Capture is guarded to at
//! most once per simulation tick so a pair locking in two halves saves the
//! field exactly once, before either half joins it.

use puyo_sim_types::{PieceColor, Pos};

use crate::grid::GridStore;

#[derive(Debug, Clone, Default)]
struct Snapshot {
    pieces: Vec<(PieceColor, Pos)>,
    cursor: usize,
}

/// Capture/restore of the resident field
#[derive(Debug, Clone, Default)]
pub struct SnapshotManager {
    saved: Snapshot,
    captured_this_tick: bool,
}

impl SnapshotManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-arm the once-per-tick guard; called at the start of every tick
    pub fn begin_tick(&mut self) {
        self.captured_this_tick = false;
    }

    /// Capture unless something already captured this tick
    pub fn capture_once(&mut self, grid: &GridStore, cursor: Option<usize>) {
        if self.captured_this_tick {
            return;
        }
        self.captured_this_tick = true;
        self.capture(grid, cursor);
    }

    /// Capture unconditionally (the explicit pre-release save in editing mode).
    /// `cursor` is only stored when given; an editing-mode capture leaves the
    /// last falling-mode cursor untouched.
    pub fn capture(&mut self, grid: &GridStore, cursor: Option<usize>) {
        self.saved.pieces.clear();
        for &id in grid.resident() {
            if let Some(piece) = grid.piece(id) {
                self.saved.pieces.push((piece.color, piece.pos));
            }
        }
        if let Some(cursor) = cursor {
            self.saved.cursor = cursor;
        }
    }

    /// Rebuild the field from the snapshot. Every current piece is destroyed,
    /// including a falling pair. Returns the saved cursor.
    pub fn restore(&self, grid: &mut GridStore) -> usize {
        grid.clear();
        for &(color, pos) in &self.saved.pieces {
            let id = grid.spawn(color, pos);
            grid.register(id);
        }
        self.saved.cursor
    }
}
