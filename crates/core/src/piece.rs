//! Falling pair module - the player-controlled two-cell piece
//!
//! A pair is two arena pieces linked parent/child plus a facing that says
//! where the child sits relative to the parent. Neither half is resident
//! while falling, so only locked pieces and the walls block it. On lock the
//! link is severed and both halves register as independent residents.
//!
//! Rotation follows an ask-before-acting policy: a candidate facing is
//! checked, kick-corrected out of walls and stacks, and committed only if the
//! corrected cells are free. A rejected candidate falls through to the 180
//! degree alternate before the whole rotation gives up as a no-op.

use puyo_sim_types::{Facing, Pos, FALL_STEP_MS, LOCK_DELAY_MS, SPAWN_COLUMN, SPAWN_ROW};

use crate::grid::{GridStore, PieceId};
use crate::sequencer::PairColors;

/// A falling parent/child pair
#[derive(Debug, Clone)]
pub struct FallingPair {
    parent: PieceId,
    child: PieceId,
    facing: Facing,
    fall_timer_ms: u32,
    lock_timer_ms: u32,
    placed: bool,
}

impl FallingPair {
    /// Deal a new pair at the spawn cell, child directly above the parent
    pub fn deal(grid: &mut GridStore, colors: PairColors) -> Self {
        let spawn = Pos::new(SPAWN_COLUMN, SPAWN_ROW);
        let parent = grid.spawn(colors.parent, spawn);
        let child = grid.spawn(colors.child, spawn.shifted(0, 1));
        if let Some(piece) = grid.piece_mut(parent) {
            piece.child = Some(child);
        }
        if let Some(piece) = grid.piece_mut(child) {
            piece.parent = Some(parent);
        }
        Self {
            parent,
            child,
            facing: Facing::Up,
            fall_timer_ms: 0,
            lock_timer_ms: 0,
            placed: false,
        }
    }

    pub fn parent(&self) -> PieceId {
        self.parent
    }

    pub fn child(&self) -> PieceId {
        self.child
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn is_placed(&self) -> bool {
        self.placed
    }

    fn halves(&self) -> [PieceId; 2] {
        [self.parent, self.child]
    }

    /// Whether a cell is closed to this pair: wall, floor, or a resident
    fn overlaps(&self, grid: &GridStore, pos: Pos) -> bool {
        pos.is_buried() || grid.occupant(pos).is_some()
    }

    /// Whether both halves can shift by (columns, rows)
    pub fn can_move(&self, grid: &GridStore, dc: i8, dr: i8) -> bool {
        self.halves().iter().all(|&id| match grid.piece(id) {
            Some(piece) => !self.overlaps(grid, piece.pos.shifted(dc, dr)),
            None => false,
        })
    }

    /// Shift both halves by (columns, rows) if the destination cells are free
    pub fn try_move(&mut self, grid: &mut GridStore, dc: i8, dr: i8) -> bool {
        if self.placed || !self.can_move(grid, dc, dr) {
            return false;
        }
        for id in self.halves() {
            if let Some(pos) = grid.piece(id).map(|piece| piece.pos) {
                grid.move_to(id, pos.shifted(dc, dr));
            }
        }
        true
    }

    /// Whether the whole pair can descend one more row
    pub fn is_fallable(&self, grid: &GridStore) -> bool {
        !self.placed
            && self
                .halves()
                .iter()
                .all(|&id| self.half_fallable(grid, id))
    }

    fn half_fallable(&self, grid: &GridStore, id: PieceId) -> bool {
        let Some(piece) = grid.piece(id) else {
            return false;
        };
        if self.overlaps(grid, piece.pos) {
            return false;
        }
        if piece.pos.row <= 0 {
            return false;
        }
        grid.occupant(piece.pos.below()).is_none()
    }

    pub fn rotate_cw(&mut self, grid: &mut GridStore) -> bool {
        self.rotate(grid, Facing::cw)
    }

    pub fn rotate_ccw(&mut self, grid: &mut GridStore) -> bool {
        self.rotate(grid, Facing::ccw)
    }

    fn rotate(&mut self, grid: &mut GridStore, step: fn(Facing) -> Facing) -> bool {
        if self.placed {
            return false;
        }
        let primary = step(self.facing);
        let alternate = step(primary);
        self.try_facing(grid, primary) || self.try_facing(grid, alternate)
    }

    /// Vertical facings always rotate; horizontal ones need at least one of
    /// the parent's side cells open (the cell the child sits in counts as
    /// closed, so a pair wedged against a wall with the far side stacked
    /// cannot spin at all)
    fn can_rotate(&self, grid: &GridStore) -> bool {
        match self.facing {
            Facing::Up | Facing::Down => true,
            Facing::Left | Facing::Right => {
                let Some(parent) = grid.piece(self.parent) else {
                    return false;
                };
                let Some(child) = grid.piece(self.child) else {
                    return false;
                };
                let child_pos = child.pos;
                let blocked =
                    |pos: Pos| self.overlaps(grid, pos) || pos == child_pos;
                let left = parent.pos.shifted(-1, 0);
                let right = parent.pos.shifted(1, 0);
                !(blocked(left) && blocked(right))
            }
        }
    }

    fn try_facing(&mut self, grid: &mut GridStore, candidate: Facing) -> bool {
        if !self.can_rotate(grid) {
            return false;
        }
        let Some(parent_pos) = grid.piece(self.parent).map(|piece| piece.pos) else {
            return false;
        };
        let (dc, dr) = candidate.child_offset();
        let child_pos = parent_pos.shifted(dc, dr);

        // Kick one cell out of whatever the rotation would bury the pair in
        let (kc, kr) = match candidate {
            Facing::Up if self.overlaps(grid, parent_pos) => (0, 1),
            Facing::Down if self.overlaps(grid, child_pos) => (0, 1),
            Facing::Left if self.overlaps(grid, child_pos) => (1, 0),
            Facing::Right if self.overlaps(grid, child_pos) => (-1, 0),
            _ => (0, 0),
        };
        let parent_to = parent_pos.shifted(kc, kr);
        let child_to = child_pos.shifted(kc, kr);
        if self.overlaps(grid, parent_to) || self.overlaps(grid, child_to) {
            return false;
        }

        self.facing = candidate;
        grid.move_to(self.parent, parent_to);
        grid.move_to(self.child, child_to);
        true
    }

    /// Drop both halves as far as they go (the caller locks afterwards)
    pub fn descend_to_floor(&mut self, grid: &mut GridStore) {
        while self.is_fallable(grid) {
            if !self.try_move(grid, 0, -1) {
                break;
            }
        }
    }

    /// Advance the auto-fall and lock timers by one tick. Returns true once
    /// the grounded pair has waited out its lock delay and should lock.
    pub fn fall_tick(&mut self, grid: &mut GridStore, elapsed_ms: u32) -> bool {
        if self.placed {
            return false;
        }
        if self.is_fallable(grid) {
            self.fall_timer_ms += elapsed_ms;
            if self.fall_timer_ms >= FALL_STEP_MS {
                self.fall_timer_ms = 0;
                self.try_move(grid, 0, -1);
            }
            false
        } else {
            self.lock_timer_ms += elapsed_ms;
            self.lock_timer_ms >= LOCK_DELAY_MS
        }
    }

    /// Sever the pair and register both halves as independent residents
    pub fn lock(&mut self, grid: &mut GridStore) {
        for id in self.halves() {
            if let Some(piece) = grid.piece_mut(id) {
                piece.parent = None;
                piece.child = None;
            }
            grid.register(id);
        }
        self.lock_timer_ms = LOCK_DELAY_MS;
        self.placed = true;
    }

    /// Destroy both halves without locking them (mode switch, undo)
    pub fn discard(self, grid: &mut GridStore) {
        grid.unregister(self.parent, true);
        grid.unregister(self.child, true);
    }
}
