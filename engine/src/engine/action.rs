// engine/src/engine/action.rs
#![forbid(unsafe_code)]

/// Primitive input shared by both sessions and emitted by the move-queue builders.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Action {
    RotateCw,
    RotateCcw,
    Left,
    Right,
    Down,
    Drop,
}

impl Action {
    pub fn all() -> &'static [Action] {
        use Action::*;
        &[RotateCw, RotateCcw, Left, Right, Down, Drop]
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::RotateCw => "rotateCW",
            Action::RotateCcw => "rotateCCW",
            Action::Left => "left",
            Action::Right => "right",
            Action::Down => "down",
            Action::Drop => "drop",
        }
    }
}
