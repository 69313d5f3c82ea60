//! Simulation module - the state machine that drives the cascade loop
//!
//! One `Simulation` value owns the grid, the deal sequence, and the undo
//! snapshot; there is no global instance, so independent simulations can run
//! side by side. The tick loop is single-threaded and cooperative: exactly
//! one state's update logic runs per tick, and a transition always executes
//! end-of-previous, assignment, start-of-next in that order.
//!
//! The cascade loop is Drop -> Check -> Vanish -> Drop -> ... until a check
//! finds nothing, at which point editing mode returns to Stop and falling
//! mode deals the next pair in Play.
//!
//! Commands never fail loudly: a command the current mode or state disallows
//! simply has no effect and reports `false`.

use puyo_sim_types::{Command, Mode, PieceColor, Pos, SimState, SEQUENCE_LEN, SETTLE_DELAY_MS};

use crate::grid::{GridStore, PieceId};
use crate::piece::FallingPair;
use crate::sequencer::{PairColors, Sequencer};
use crate::snapshot::SnapshotManager;
use crate::{gravity, vanish};

/// A complete simulation instance
#[derive(Debug, Clone)]
pub struct Simulation {
    grid: GridStore,
    sequencer: Sequencer,
    snapshots: SnapshotManager,
    mode: Mode,
    state: SimState,
    current: Option<FallingPair>,
    chain: u32,
    wait_timer_ms: u32,
    vanish_found: bool,
    palette: Option<PieceColor>,
    auto_fall: bool,
    play_timer_ms: u32,
    resume_state: SimState,
}

impl Simulation {
    /// Create a simulation in editing mode with the full-length deal sequence
    pub fn new(seed: u32) -> Self {
        Self::with_sequence_len(seed, SEQUENCE_LEN)
    }

    /// Create with a short deal sequence (tests exercise wraparound this way)
    pub fn with_sequence_len(seed: u32, len: usize) -> Self {
        Self {
            grid: GridStore::new(),
            sequencer: Sequencer::with_len(seed, len),
            snapshots: SnapshotManager::new(),
            mode: Mode::Editing,
            state: SimState::Stop,
            current: None,
            chain: 0,
            wait_timer_ms: 0,
            vanish_found: false,
            palette: None,
            auto_fall: true,
            play_timer_ms: 0,
            resume_state: SimState::Stop,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    /// Length of the chain reaction currently on display
    pub fn chain(&self) -> u32 {
        self.chain
    }

    /// Wall-clock milliseconds spent in falling mode since the last timer reset
    pub fn play_time_ms(&self) -> u32 {
        self.play_timer_ms
    }

    pub fn auto_fall(&self) -> bool {
        self.auto_fall
    }

    pub fn grid(&self) -> &GridStore {
        &self.grid
    }

    pub fn sequence_cursor(&self) -> usize {
        self.sequencer.cursor()
    }

    pub fn current_pair(&self) -> Option<&FallingPair> {
        self.current.as_ref()
    }

    /// Colors of the pair under player control
    pub fn current_colors(&self) -> Option<PairColors> {
        let pair = self.current.as_ref()?;
        let parent = self.grid.piece(pair.parent())?.color;
        let child = self.grid.piece(pair.child())?.color;
        Some(PairColors { parent, child })
    }

    /// The next and next-next pairs in the deal sequence
    pub fn preview(&self) -> [PairColors; 2] {
        [self.sequencer.peek(0), self.sequencer.peek(1)]
    }

    /// Advance the simulation by one tick of `elapsed_ms` wall-clock time
    pub fn tick(&mut self, elapsed_ms: u32) {
        self.snapshots.begin_tick();
        if self.mode == Mode::Falling {
            self.play_timer_ms = self.play_timer_ms.saturating_add(elapsed_ms);
        }
        match self.state {
            SimState::Stop | SimState::Pause => {}
            SimState::Play => self.update_play(elapsed_ms),
            SimState::Check => self.update_check(elapsed_ms),
            SimState::Vanish => self.update_vanish(elapsed_ms),
            SimState::Drop => self.update_drop(elapsed_ms),
        }
    }

    fn update_play(&mut self, elapsed_ms: u32) {
        if self.mode != Mode::Falling {
            return;
        }
        let mut lock_now = false;
        if let Some(pair) = self.current.as_mut() {
            if self.auto_fall && !pair.is_placed() {
                lock_now = pair.fall_tick(&mut self.grid, elapsed_ms);
            }
        }
        if lock_now {
            self.lock_current();
        }
        if self.current.as_ref().is_some_and(FallingPair::is_placed) {
            self.change_state(SimState::Drop);
        }
    }

    fn update_check(&mut self, elapsed_ms: u32) {
        if !self.wait_elapsed(elapsed_ms) {
            return;
        }
        if self.vanish_found {
            self.change_state(SimState::Vanish);
        } else if self.mode == Mode::Editing {
            self.change_state(SimState::Stop);
        } else {
            self.change_state(SimState::Play);
        }
    }

    fn update_vanish(&mut self, elapsed_ms: u32) {
        if self.wait_elapsed(elapsed_ms) {
            self.change_state(SimState::Drop);
        }
    }

    fn update_drop(&mut self, elapsed_ms: u32) {
        if self.wait_elapsed(elapsed_ms) {
            self.change_state(SimState::Check);
        }
    }

    fn wait_elapsed(&mut self, elapsed_ms: u32) -> bool {
        self.wait_timer_ms += elapsed_ms;
        self.wait_timer_ms >= SETTLE_DELAY_MS
    }

    fn change_state(&mut self, next: SimState) {
        let prev = self.state;
        self.leave_state(prev);
        self.state = next;
        self.enter_state(next);
    }

    fn leave_state(&mut self, leaving: SimState) {
        match leaving {
            // A fresh move or release starts a fresh chain count
            SimState::Stop | SimState::Play => self.chain = 0,
            _ => {}
        }
    }

    fn enter_state(&mut self, entering: SimState) {
        match entering {
            SimState::Stop | SimState::Pause => {}
            SimState::Play => {
                self.wait_timer_ms = 0;
                if self.mode == Mode::Falling {
                    self.deal();
                }
            }
            SimState::Check => {
                self.wait_timer_ms = 0;
                self.vanish_found = vanish::find_and_flag(&mut self.grid);
            }
            SimState::Vanish => {
                self.wait_timer_ms = 0;
                self.chain += 1;
                self.remove_flagged();
            }
            SimState::Drop => {
                self.wait_timer_ms = 0;
                gravity::settle(&mut self.grid);
            }
        }
    }

    fn deal(&mut self) {
        let colors = self.sequencer.current();
        self.current = Some(FallingPair::deal(&mut self.grid, colors));
        self.sequencer.advance();
    }

    fn remove_flagged(&mut self) {
        let doomed: Vec<PieceId> = self
            .grid
            .resident()
            .iter()
            .copied()
            .filter(|&id| self.grid.piece(id).is_some_and(|p| p.pending_vanish))
            .collect();
        for id in doomed {
            self.grid.unregister(id, false);
        }
        self.grid.sweep();
    }

    /// Snapshot the field as it stands, then lock the pair into it
    fn lock_current(&mut self) {
        let cursor = match self.mode {
            Mode::Falling => Some(self.sequencer.prev_cursor()),
            Mode::Editing => None,
        };
        self.snapshots.capture_once(&self.grid, cursor);
        if let Some(pair) = self.current.as_mut() {
            pair.lock(&mut self.grid);
        }
    }

    fn restore_snapshot(&mut self) {
        let cursor = self.snapshots.restore(&mut self.grid);
        if self.mode == Mode::Falling {
            self.sequencer.set_cursor(cursor);
        }
        self.current = None;
    }

    /// Apply a command. Returns whether it had any effect.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::MoveLeft => self.move_current(-1),
            Command::MoveRight => self.move_current(1),
            Command::RotateLeft => self.rotate_current(false),
            Command::RotateRight => self.rotate_current(true),
            Command::QuickDrop => self.quick_drop(),
            Command::Play => self.release(),
            Command::Revert => self.revert_editing(),
            Command::Reset => self.reset_field(),
            Command::Back => self.back_one_move(),
            Command::ChangeMode => self.change_mode(),
            Command::TimerReset => self.reset_play_timer(),
            Command::ToggleAutoFall => self.toggle_auto_fall(),
            Command::TogglePause => self.toggle_pause(),
        }
    }

    fn controllable(&self) -> bool {
        self.mode == Mode::Falling && self.state == SimState::Play
    }

    fn move_current(&mut self, dc: i8) -> bool {
        if !self.controllable() {
            return false;
        }
        let Some(pair) = self.current.as_mut() else {
            return false;
        };
        pair.try_move(&mut self.grid, dc, 0)
    }

    fn rotate_current(&mut self, clockwise: bool) -> bool {
        if !self.controllable() {
            return false;
        }
        let Some(pair) = self.current.as_mut() else {
            return false;
        };
        if clockwise {
            pair.rotate_cw(&mut self.grid)
        } else {
            pair.rotate_ccw(&mut self.grid)
        }
    }

    fn quick_drop(&mut self) -> bool {
        if !self.controllable() {
            return false;
        }
        let dropped = match self.current.as_mut() {
            Some(pair) if !pair.is_placed() => {
                pair.descend_to_floor(&mut self.grid);
                true
            }
            _ => false,
        };
        if dropped {
            self.lock_current();
        }
        dropped
    }

    /// Editing-mode release: save the layout, then let it fall and resolve
    fn release(&mut self) -> bool {
        if self.mode != Mode::Editing || self.state != SimState::Stop {
            return false;
        }
        self.snapshots.capture(&self.grid, None);
        self.change_state(SimState::Drop);
        true
    }

    fn revert_editing(&mut self) -> bool {
        if self.mode != Mode::Editing || self.state != SimState::Stop {
            return false;
        }
        self.restore_snapshot();
        true
    }

    fn reset_field(&mut self) -> bool {
        if self.mode != Mode::Editing || self.state != SimState::Stop {
            return false;
        }
        self.grid.clear();
        true
    }

    /// Falling-mode undo: restore the field and cursor from before the last
    /// locked pair, then re-deal it
    fn back_one_move(&mut self) -> bool {
        if self.mode != Mode::Falling {
            return false;
        }
        if !matches!(
            self.state,
            SimState::Play | SimState::Stop | SimState::Pause
        ) {
            return false;
        }
        self.restore_snapshot();
        self.deal();
        true
    }

    fn change_mode(&mut self) -> bool {
        match self.mode {
            Mode::Editing => {
                if self.state != SimState::Stop {
                    return false;
                }
                self.mode = Mode::Falling;
                self.change_state(SimState::Play);
                true
            }
            Mode::Falling => {
                if !matches!(
                    self.state,
                    SimState::Stop | SimState::Pause | SimState::Play
                ) {
                    return false;
                }
                self.discard_current();
                self.mode = Mode::Editing;
                self.change_state(SimState::Stop);
                true
            }
        }
    }

    /// Throw away the in-flight pair and step the cursor back onto it
    fn discard_current(&mut self) {
        if let Some(pair) = self.current.take() {
            pair.discard(&mut self.grid);
            self.sequencer.retreat();
        }
    }

    fn reset_play_timer(&mut self) -> bool {
        if self.mode != Mode::Falling {
            return false;
        }
        self.play_timer_ms = 0;
        true
    }

    fn toggle_auto_fall(&mut self) -> bool {
        if self.mode != Mode::Falling {
            return false;
        }
        self.auto_fall = !self.auto_fall;
        true
    }

    /// Pause freezes whatever is running and resumes it exactly where it was;
    /// the surrounding state's entry/exit hooks deliberately do not re-run
    fn toggle_pause(&mut self) -> bool {
        if self.state == SimState::Pause {
            self.state = self.resume_state;
        } else {
            self.resume_state = self.state;
            self.state = SimState::Pause;
        }
        true
    }

    /// Select a palette color for editing-mode placement
    /// (`PieceColor::None` selects the eraser)
    pub fn select_palette(&mut self, color: PieceColor) {
        self.palette = Some(color);
    }

    pub fn selected_palette(&self) -> Option<PieceColor> {
        self.palette
    }

    /// Editing-mode cell edit: overwrite or create a piece from the selected
    /// palette color, or erase the cell when the eraser is selected
    pub fn place_palette_at(&mut self, pos: Pos) -> bool {
        if self.mode != Mode::Editing || pos.is_buried() {
            return false;
        }
        match self.palette {
            Some(color) if color != PieceColor::None => {
                if let Some(id) = self.grid.get(pos) {
                    if let Some(piece) = self.grid.piece_mut(id) {
                        piece.color = color;
                    }
                } else {
                    let id = self.grid.spawn(color, pos);
                    self.grid.register(id);
                }
                true
            }
            _ => match self.grid.get(pos) {
                Some(id) => {
                    self.grid.unregister(id, true);
                    true
                }
                None => false,
            },
        }
    }

    /// Create and register a resident piece directly (the editing palette and
    /// test scaffolding both come through here)
    pub fn register_piece(&mut self, color: PieceColor, pos: Pos) -> PieceId {
        let id = self.grid.spawn(color, pos);
        self.grid.register(id);
        id
    }

    pub fn piece_at(&self, pos: Pos) -> Option<PieceId> {
        self.grid.get(pos)
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(1)
    }
}
