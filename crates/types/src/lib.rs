//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the simulation.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, rendering front-ends, test harnesses).
//!
//! # Field Dimensions
//!
//! - **Width**: 6 columns (indexed 0-5)
//! - **Height**: 13 visible rows (indexed 0-12, open above)
//! - **Spawn position**: (2, 12) for the parent half of a dealt pair
//!
//! Collision only knows about the floor (row < 0) and the side walls; the
//! field has no ceiling, so a freshly dealt child half may sit at row 13.
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `SETTLE_DELAY_MS` | 200 | Wait after each drop/check/vanish step |
//! | `LOCK_DELAY_MS` | 1000 | Time a grounded pair waits before locking |
//! | `FALL_STEP_MS` | 625 | Auto-fall interval per one-row descent |

/// Field dimensions
pub const FIELD_COLUMNS: i8 = 6;
pub const FIELD_ROWS: i8 = 13;

/// Spawn cell for the parent half of a dealt pair (child spawns directly above)
pub const SPAWN_COLUMN: i8 = 2;
pub const SPAWN_ROW: i8 = 12;

/// Cascade timing (in milliseconds)
pub const SETTLE_DELAY_MS: u32 = 200;
pub const LOCK_DELAY_MS: u32 = 1000;
pub const FALL_STEP_MS: u32 = 625;

/// Number of precomputed color pairs in the circular deal sequence
pub const SEQUENCE_LEN: usize = 65536;

/// Piece colors
///
/// `None` is the eraser entry on the editing palette; `Garbage` is the neutral
/// color that never participates in matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceColor {
    None,
    Red,
    Blue,
    Yellow,
    Green,
    Purple,
    Garbage,
}

impl PieceColor {
    /// The four colors the deal sequence is built from
    pub const BASE: [PieceColor; 4] = [
        PieceColor::Red,
        PieceColor::Blue,
        PieceColor::Yellow,
        PieceColor::Green,
    ];

    /// Whether this color participates in cluster matching
    pub fn is_matchable(self) -> bool {
        matches!(
            self,
            PieceColor::Red
                | PieceColor::Blue
                | PieceColor::Yellow
                | PieceColor::Green
                | PieceColor::Purple
        )
    }

    /// Parse color from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" => Some(PieceColor::None),
            "red" => Some(PieceColor::Red),
            "blue" => Some(PieceColor::Blue),
            "yellow" => Some(PieceColor::Yellow),
            "green" => Some(PieceColor::Green),
            "purple" => Some(PieceColor::Purple),
            "garbage" => Some(PieceColor::Garbage),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceColor::None => "none",
            PieceColor::Red => "red",
            PieceColor::Blue => "blue",
            PieceColor::Yellow => "yellow",
            PieceColor::Green => "green",
            PieceColor::Purple => "purple",
            PieceColor::Garbage => "garbage",
        }
    }
}

/// Facing of a falling pair: where the child half sits relative to the parent
/// (Up = spawn orientation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facing {
    Up,
    Right,
    Down,
    Left,
}

impl Facing {
    /// Rotate clockwise
    pub fn cw(self) -> Self {
        match self {
            Facing::Up => Facing::Right,
            Facing::Right => Facing::Down,
            Facing::Down => Facing::Left,
            Facing::Left => Facing::Up,
        }
    }

    /// Rotate counter-clockwise
    pub fn ccw(self) -> Self {
        match self {
            Facing::Up => Facing::Left,
            Facing::Left => Facing::Down,
            Facing::Down => Facing::Right,
            Facing::Right => Facing::Up,
        }
    }

    /// Child cell offset from the parent cell for this facing
    pub fn child_offset(self) -> (i8, i8) {
        match self {
            Facing::Up => (0, 1),
            Facing::Right => (1, 0),
            Facing::Down => (0, -1),
            Facing::Left => (-1, 0),
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Facing::Up => "up",
            Facing::Right => "right",
            Facing::Down => "down",
            Facing::Left => "left",
        }
    }
}

/// Operating mode of the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Dealt pairs descend under player control
    Falling,
    /// Pieces are placed directly, then released to resolve
    Editing,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Falling => "falling",
            Mode::Editing => "editing",
        }
    }
}

/// Simulation state machine states
///
/// `Stop` is both the initial state and the idle state a completed cascade
/// returns to in editing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimState {
    Stop,
    Play,
    Check,
    Vanish,
    Drop,
    Pause,
}

impl SimState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimState::Stop => "stop",
            SimState::Play => "play",
            SimState::Check => "check",
            SimState::Vanish => "vanish",
            SimState::Drop => "drop",
            SimState::Pause => "pause",
        }
    }
}

/// Grid cell position: column 0..5 left to right, row counting up from the floor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub col: i8,
    pub row: i8,
}

impl Pos {
    pub fn new(col: i8, row: i8) -> Self {
        Self { col, row }
    }

    /// The cell directly beneath this one
    pub fn below(self) -> Self {
        self.shifted(0, -1)
    }

    /// Offset by (columns, rows)
    pub fn shifted(self, dc: i8, dr: i8) -> Self {
        Self {
            col: self.col + dc,
            row: self.row + dr,
        }
    }

    /// Whether this position sits inside the floor or a side wall
    pub fn is_buried(self) -> bool {
        self.row < 0 || self.col < 0 || self.col >= FIELD_COLUMNS
    }
}

/// Simulation commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    RotateLeft,
    RotateRight,
    QuickDrop,
    Play,
    Revert,
    Reset,
    Back,
    ChangeMode,
    TimerReset,
    ToggleAutoFall,
    TogglePause,
}

impl Command {
    /// Parse command from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(Command::MoveLeft),
            "moveright" => Some(Command::MoveRight),
            "rotateleft" => Some(Command::RotateLeft),
            "rotateright" => Some(Command::RotateRight),
            "quickdrop" => Some(Command::QuickDrop),
            "play" => Some(Command::Play),
            "revert" => Some(Command::Revert),
            "reset" => Some(Command::Reset),
            "back" => Some(Command::Back),
            "changemode" => Some(Command::ChangeMode),
            "timerreset" => Some(Command::TimerReset),
            "toggleautofall" => Some(Command::ToggleAutoFall),
            "togglepause" => Some(Command::TogglePause),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::MoveLeft => "moveLeft",
            Command::MoveRight => "moveRight",
            Command::RotateLeft => "rotateLeft",
            Command::RotateRight => "rotateRight",
            Command::QuickDrop => "quickDrop",
            Command::Play => "play",
            Command::Revert => "revert",
            Command::Reset => "reset",
            Command::Back => "back",
            Command::ChangeMode => "changeMode",
            Command::TimerReset => "timerReset",
            Command::ToggleAutoFall => "toggleAutoFall",
            Command::TogglePause => "togglePause",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facing_round_trip() {
        for facing in [Facing::Up, Facing::Right, Facing::Down, Facing::Left] {
            assert_eq!(facing.cw().ccw(), facing);
            assert_eq!(facing.cw().cw().cw().cw(), facing);
        }
    }

    #[test]
    fn test_child_offsets() {
        assert_eq!(Facing::Up.child_offset(), (0, 1));
        assert_eq!(Facing::Down.child_offset(), (0, -1));
        assert_eq!(Facing::Left.child_offset(), (-1, 0));
        assert_eq!(Facing::Right.child_offset(), (1, 0));
    }

    #[test]
    fn test_pos_buried() {
        assert!(Pos::new(-1, 0).is_buried());
        assert!(Pos::new(6, 0).is_buried());
        assert!(Pos::new(0, -1).is_buried());
        assert!(!Pos::new(0, 0).is_buried());
        assert!(!Pos::new(5, 0).is_buried());
        // Open above: a row past the visible field is not a wall
        assert!(!Pos::new(2, FIELD_ROWS).is_buried());
    }

    #[test]
    fn test_garbage_never_matchable() {
        assert!(!PieceColor::Garbage.is_matchable());
        assert!(!PieceColor::None.is_matchable());
        assert!(PieceColor::Purple.is_matchable());
        for color in PieceColor::BASE {
            assert!(color.is_matchable());
        }
    }

    #[test]
    fn test_command_string_round_trip() {
        let commands = [
            Command::MoveLeft,
            Command::MoveRight,
            Command::RotateLeft,
            Command::RotateRight,
            Command::QuickDrop,
            Command::Play,
            Command::Revert,
            Command::Reset,
            Command::Back,
            Command::ChangeMode,
            Command::TimerReset,
            Command::ToggleAutoFall,
            Command::TogglePause,
        ];
        for command in commands {
            assert_eq!(Command::from_str(command.as_str()), Some(command));
        }
    }
}
