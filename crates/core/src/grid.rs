//! Grid module - arena of pieces plus a position-keyed spatial index
//!
//! Pieces live in slots addressed by a stable [`PieceId`], so a pair can hold
//! parent/child links as plain ids instead of owning pointers. Only *resident*
//! pieces (locked into the field) appear in the spatial index; a falling pair
//! exists in the arena but never blocks lookups until it locks.

use std::collections::HashMap;

use puyo_sim_types::{PieceColor, Pos};

/// Stable handle to a piece slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceId(u32);

/// A single piece
#[derive(Debug, Clone)]
pub struct Piece {
    pub color: PieceColor,
    pub pos: Pos,
    /// Flagged by the cluster scan; removed on the next vanish step
    pub pending_vanish: bool,
    /// True once locked into the field as an independent resident
    pub placed: bool,
    pub parent: Option<PieceId>,
    pub child: Option<PieceId>,
}

impl Piece {
    fn new(color: PieceColor, pos: Pos) -> Self {
        Self {
            color,
            pos,
            pending_vanish: false,
            placed: false,
            parent: None,
            child: None,
        }
    }
}

/// The field: every piece in play, resident or falling
#[derive(Debug, Clone, Default)]
pub struct GridStore {
    slots: Vec<Option<Piece>>,
    free: Vec<u32>,
    /// Resident ids in registration order (the cluster scan order)
    resident: Vec<PieceId>,
    index: HashMap<Pos, PieceId>,
}

impl GridStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new piece in the arena. It is not resident until registered.
    pub fn spawn(&mut self, color: PieceColor, pos: Pos) -> PieceId {
        let piece = Piece::new(color, pos);
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot as usize] = Some(piece);
                PieceId(slot)
            }
            None => {
                self.slots.push(Some(piece));
                PieceId((self.slots.len() - 1) as u32)
            }
        }
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.slots.get(id.0 as usize).and_then(|slot| slot.as_ref())
    }

    pub fn piece_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.slots
            .get_mut(id.0 as usize)
            .and_then(|slot| slot.as_mut())
    }

    /// Make a piece resident: mark it placed and add it to the spatial index.
    /// Registering an already-resident piece is a no-op.
    pub fn register(&mut self, id: PieceId) {
        let Some(Some(piece)) = self.slots.get_mut(id.0 as usize) else {
            return;
        };
        piece.placed = true;
        let pos = piece.pos;
        if !self.resident.contains(&id) {
            self.resident.push(id);
            self.index.insert(pos, id);
        }
    }

    /// Destroy a piece. With `unlist` false the resident list keeps a dead id
    /// until the next [`sweep`](Self::sweep), which lets a vanish step remove a
    /// whole batch without rebuilding the list per piece.
    pub fn unregister(&mut self, id: PieceId, unlist: bool) {
        let Some(Some(piece)) = self.slots.get(id.0 as usize) else {
            return;
        };
        let pos = piece.pos;
        if self.index.get(&pos) == Some(&id) {
            self.index.remove(&pos);
        }
        self.slots[id.0 as usize] = None;
        self.free.push(id.0);
        if unlist {
            self.resident.retain(|&r| r != id);
        }
    }

    /// Drop dead ids left behind by batched `unregister(id, false)` calls
    pub fn sweep(&mut self) {
        let slots = &self.slots;
        self.resident
            .retain(|id| slots.get(id.0 as usize).is_some_and(|slot| slot.is_some()));
    }

    /// The resident piece at a cell, if any
    pub fn get(&self, pos: Pos) -> Option<PieceId> {
        self.index.get(&pos).copied()
    }

    /// The resident piece at a cell, ignoring pieces already pending vanish
    /// (those no longer block movement or gravity)
    pub fn occupant(&self, pos: Pos) -> Option<PieceId> {
        self.get(pos)
            .filter(|&id| self.piece(id).is_some_and(|piece| !piece.pending_vanish))
    }

    /// Move a piece, keeping the spatial index in step for residents
    pub fn move_to(&mut self, id: PieceId, pos: Pos) {
        let Some(Some(piece)) = self.slots.get_mut(id.0 as usize) else {
            return;
        };
        let old = piece.pos;
        piece.pos = pos;
        if self.index.get(&old) == Some(&id) {
            self.index.remove(&old);
            self.index.insert(pos, id);
        }
    }

    pub fn resident(&self) -> &[PieceId] {
        &self.resident
    }

    pub fn resident_count(&self) -> usize {
        self.resident.len()
    }

    /// Destroy every piece, resident or falling
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.resident.clear();
        self.index.clear();
    }
}
