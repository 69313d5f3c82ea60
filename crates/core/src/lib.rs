//! Core simulation logic - pure, deterministic, and testable
//!
//! This crate contains the whole rule set of the falling-pair matching
//! puzzle. It has **zero dependencies** on UI, networking, or I/O, making it:
//!
//! - **Deterministic**: the same seed produces the identical deal sequence
//! - **Testable**: every rule is exercised headless, no front-end required
//! - **Portable**: runs in any environment (terminal, GUI, test harness)
//!
//! # Module Structure
//!
//! - [`grid`]: piece arena plus the position-keyed spatial index
//! - [`vanish`]: 4-connected same-color cluster detection (minimum size 4)
//! - [`gravity`]: post-vanish settling of residents
//! - [`piece`]: the falling parent/child pair with kick-corrected rotation
//! - [`sequencer`]: seeded circular sequence of color pairs
//! - [`snapshot`]: one-deep undo of the resident field
//! - [`sim`]: the state machine sequencing the cascade loop
//!
//! # Game Rules
//!
//! - **Matching**: four or more same-color pieces touching orthogonally
//!   vanish together; garbage pieces never match
//! - **Cascade**: after a vanish, everything settles and the field is checked
//!   again, incrementing the chain counter per vanish step
//! - **Two modes**: continuous play with dealt falling pairs, and an editing
//!   mode where a layout is built by hand and then released
//!
//! # Example
//!
//! ```
//! use puyo_sim_core::Simulation;
//! use puyo_sim_types::{Command, PieceColor, Pos, SETTLE_DELAY_MS, SimState};
//!
//! // Build a square of four in editing mode and release it
//! let mut sim = Simulation::with_sequence_len(42, 16);
//! for (col, row) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
//!     sim.register_piece(PieceColor::Red, Pos::new(col, row));
//! }
//! sim.apply(Command::Play);
//! while sim.state() != SimState::Stop {
//!     sim.tick(SETTLE_DELAY_MS);
//! }
//! assert_eq!(sim.chain(), 1);
//! ```

pub mod gravity;
pub mod grid;
pub mod piece;
pub mod sequencer;
pub mod sim;
pub mod snapshot;
pub mod vanish;

pub use grid::{GridStore, Piece, PieceId};
pub use piece::FallingPair;
pub use sequencer::{seed_from_clock, PairColors, Sequencer};
pub use sim::Simulation;
pub use snapshot::SnapshotManager;
