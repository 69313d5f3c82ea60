//! puyo-sim (workspace facade crate).
//!
//! This package keeps the public `puyo_sim::{core,types}` API stable while the
//! implementation lives in dedicated crates under `crates/`.

pub use puyo_sim_core as core;
pub use puyo_sim_types as types;
