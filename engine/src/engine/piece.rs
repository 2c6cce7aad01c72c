// engine/src/engine/piece.rs
#![forbid(unsafe_code)]

use crate::engine::geometry::cells_at;
use crate::engine::pieces::Kind;

/// What last moved the piece; T-spin credit needs the final action to be a rotation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LastAction {
    Move,
    Rotate,
}

/// Active tetromino. `x`/`y` locate the shape origin; `y < 0` is above the board.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Piece {
    pub kind: Kind,
    pub rotation: u8,
    pub x: i32,
    pub y: i32,
    pub last_action: Option<LastAction>,
}

impl Piece {
    pub fn new(kind: Kind, rotation: u8, x: i32, y: i32) -> Self {
        Self {
            kind,
            rotation: rotation % 4,
            x,
            y,
            last_action: None,
        }
    }

    /// Spawn state: rotation 0, row 0, kind-specific column.
    pub fn spawn(kind: Kind) -> Self {
        Self::new(kind, 0, kind.spawn_x(), 0)
    }

    #[inline]
    pub fn cells(&self) -> [(i32, i32); 4] {
        cells_at(self.kind, self.rotation, self.x, self.y)
    }
}
