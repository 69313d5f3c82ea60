//! Sequencer module - deterministic circular deal sequence
//!
//! The whole sequence is built up front from one 32-bit seed: a bag of
//! `2 * len` tokens cycles the four base colors round-robin, and each pair
//! draws two tokens out of the shrinking bag at LCG-chosen indices. Over the
//! full run every base color therefore appears exactly `len / 2` times, and
//! the same seed always yields the same sequence.
//!
//! The read cursor wraps in both directions, so the sequence repeats after
//! `len` deals and supports stepping backward for undo.

use puyo_sim_types::{PieceColor, SEQUENCE_LEN};

/// Colors of one dealt pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairColors {
    pub parent: PieceColor,
    pub child: PieceColor,
}

/// Precomputed circular sequence of color pairs with a read cursor
#[derive(Debug, Clone)]
pub struct Sequencer {
    pairs: Vec<PairColors>,
    cursor: usize,
    seed: u32,
}

impl Sequencer {
    pub fn new(seed: u32) -> Self {
        Self::with_len(seed, SEQUENCE_LEN)
    }

    /// Build a sequence of `len` pairs (tests use short sequences)
    pub fn with_len(seed: u32, len: usize) -> Self {
        let len = len.max(1);
        let mut state = seed;
        let mut bag: Vec<PieceColor> = (0..len * 2)
            .map(|i| PieceColor::BASE[i % PieceColor::BASE.len()])
            .collect();
        let mut pairs = Vec::with_capacity(len);
        for _ in 0..len {
            state = next_rand(state);
            let parent = bag.remove(state as usize % bag.len());
            state = next_rand(state);
            let child = bag.remove(state as usize % bag.len());
            pairs.push(PairColors { parent, child });
        }
        Self {
            pairs,
            cursor: 0,
            seed,
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The pair under the read cursor
    pub fn current(&self) -> PairColors {
        self.pairs[self.cursor]
    }

    /// Look `ahead` positions past the cursor (wrapping)
    pub fn peek(&self, ahead: usize) -> PairColors {
        self.pairs[(self.cursor + ahead) % self.pairs.len()]
    }

    pub fn advance(&mut self) {
        self.cursor = (self.cursor + 1) % self.pairs.len();
    }

    pub fn retreat(&mut self) {
        self.cursor = self.prev_cursor();
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor % self.pairs.len();
    }

    /// The cursor one step back (wrapping) without moving it
    pub fn prev_cursor(&self) -> usize {
        (self.cursor + self.pairs.len() - 1) % self.pairs.len()
    }
}

/// 32-bit LCG step shared with the original dealer
fn next_rand(state: u32) -> u32 {
    state.wrapping_mul(0x5D58_8B65).wrapping_add(0x0026_9EC3)
}

/// Derive a startup seed from the wall clock. Reproducibility only matters
/// within one run, so plain epoch seconds are enough.
pub fn seed_from_clock() -> u32 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(1, |elapsed| elapsed.as_secs() as u32)
}
