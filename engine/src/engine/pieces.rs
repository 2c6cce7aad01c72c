// engine/src/engine/pieces.rs
#![forbid(unsafe_code)]

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Kind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl Kind {
    pub fn all() -> &'static [Kind] {
        use Kind::*;
        &[I, O, T, S, Z, J, L]
    }

    /// Strict 1..=7 id used as the grid cell color (0 = empty).
    pub fn idx(self) -> u8 {
        use Kind::*;
        match self {
            I => 1,
            O => 2,
            T => 3,
            S => 4,
            Z => 5,
            J => 6,
            L => 7,
        }
    }

    /// Inverse of `idx()` (1..=7). Returns None for invalid ids.
    pub fn from_idx(idx: u8) -> Option<Self> {
        use Kind::*;
        match idx {
            1 => Some(I),
            2 => Some(O),
            3 => Some(T),
            4 => Some(S),
            5 => Some(Z),
            6 => Some(J),
            7 => Some(L),
            _ => None,
        }
    }

    pub fn glyph(self) -> char {
        use Kind::*;
        match self {
            I => 'I',
            O => 'O',
            T => 'T',
            S => 'S',
            Z => 'Z',
            J => 'J',
            L => 'L',
        }
    }

    /// Number of rotation states the search needs to visit.
    ///
    /// O looks the same in every state; I/S/Z repeat after two states.
    #[inline]
    pub fn num_rots(self) -> usize {
        use Kind::*;
        match self {
            O => 1,
            I | S | Z => 2,
            T | J | L => 4,
        }
    }

    /// Spawn column of the shape origin.
    #[inline]
    pub fn spawn_x(self) -> i32 {
        match self {
            Kind::O => 4,
            _ => 3,
        }
    }
}

/// `(row, col)` offsets of the 4 blocks for `kind` in rotation `rot` (0..4),
/// relative to the piece origin. SRS layout: T/S/Z/J/L live in a 3x3 box,
/// I in a 4x4 box, O in a 2x2 box.
pub fn shape(kind: Kind, rot: u8) -> &'static [(i32, i32); 4] {
    &shapes(kind)[(rot as usize) % 4]
}

fn shapes(kind: Kind) -> &'static [[(i32, i32); 4]; 4] {
    use Kind::*;
    match kind {
        I => &[
            [(1, 0), (1, 1), (1, 2), (1, 3)],
            [(0, 2), (1, 2), (2, 2), (3, 2)],
            [(2, 0), (2, 1), (2, 2), (2, 3)],
            [(0, 1), (1, 1), (2, 1), (3, 1)],
        ],
        O => &[
            [(0, 0), (0, 1), (1, 0), (1, 1)],
            [(0, 0), (0, 1), (1, 0), (1, 1)],
            [(0, 0), (0, 1), (1, 0), (1, 1)],
            [(0, 0), (0, 1), (1, 0), (1, 1)],
        ],
        T => &[
            [(0, 1), (1, 0), (1, 1), (1, 2)],
            [(0, 1), (1, 1), (1, 2), (2, 1)],
            [(1, 0), (1, 1), (1, 2), (2, 1)],
            [(0, 1), (1, 0), (1, 1), (2, 1)],
        ],
        S => &[
            [(0, 1), (0, 2), (1, 0), (1, 1)],
            [(0, 1), (1, 1), (1, 2), (2, 2)],
            [(1, 1), (1, 2), (2, 0), (2, 1)],
            [(0, 0), (1, 0), (1, 1), (2, 1)],
        ],
        Z => &[
            [(0, 0), (0, 1), (1, 1), (1, 2)],
            [(0, 2), (1, 1), (1, 2), (2, 1)],
            [(1, 0), (1, 1), (2, 1), (2, 2)],
            [(0, 1), (1, 0), (1, 1), (2, 0)],
        ],
        J => &[
            [(0, 0), (1, 0), (1, 1), (1, 2)],
            [(0, 1), (0, 2), (1, 1), (2, 1)],
            [(1, 0), (1, 1), (1, 2), (2, 2)],
            [(0, 1), (1, 1), (2, 0), (2, 1)],
        ],
        L => &[
            [(0, 2), (1, 0), (1, 1), (1, 2)],
            [(0, 1), (1, 1), (2, 1), (2, 2)],
            [(1, 0), (1, 1), (1, 2), (2, 0)],
            [(0, 0), (0, 1), (1, 1), (2, 1)],
        ],
    }
}

/// SRS wall-kick candidates `(dx, dy)` for a `from -> to` rotation (y points up).
/// Returns None for transitions that are not a single quarter turn.
pub fn kicks(kind: Kind, from: u8, to: u8) -> Option<&'static [(i32, i32); 5]> {
    let slot = match (from % 4, to % 4) {
        (0, 1) => 0,
        (1, 0) => 1,
        (1, 2) => 2,
        (2, 1) => 3,
        (2, 3) => 4,
        (3, 2) => 5,
        (3, 0) => 6,
        (0, 3) => 7,
        _ => return None,
    };
    let table = if kind == Kind::I {
        &KICKS_I
    } else {
        &KICKS_NORMAL
    };
    Some(&table[slot])
}

// Order: 0>1, 1>0, 1>2, 2>1, 2>3, 3>2, 3>0, 0>3.
const KICKS_NORMAL: [[(i32, i32); 5]; 8] = [
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
];

const KICKS_I: [[(i32, i32); 5]; 8] = [
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
];

/// UI helper: rasterize a piece rotation into a 4x4 mask.
///
/// Returns a 4x4 grid in row-major order: m[row][col].
pub fn preview_mask_4x4(kind: Kind, rot: u8, fill: u8) -> [[u8; 4]; 4] {
    let mut m = [[0u8; 4]; 4];
    for &(dr, dc) in shape(kind, rot) {
        // Shape tables are designed to fit a 4x4 preview.
        if (0..4).contains(&dr) && (0..4).contains(&dc) {
            m[dr as usize][dc as usize] = fill;
        }
    }
    m
}
