use crate::types::{Color, Direction, Piece, Rank};

pub const fn castling_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R1,
        Color::Black => Rank::R8,
    }
}

pub const fn pawn_start_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R2,
        Color::Black => Rank::R7,
    }
}

pub const fn promotion_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R8,
        Color::Black => Rank::R1,
    }
}

pub const fn pawn_forward(c: Color) -> Direction {
    match c {
        Color::White => Direction::North,
        Color::Black => Direction::South,
    }
}

pub const fn pawn_captures(c: Color) -> [Direction; 2] {
    match c {
        Color::White => [Direction::NorthWest, Direction::NorthEast],
        Color::Black => [Direction::SouthWest, Direction::SouthEast],
    }
}

pub const ORTHOGONAL_DIRS: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

pub const DIAGONAL_DIRS: [Direction; 4] = [
    Direction::NorthEast,
    Direction::SouthEast,
    Direction::SouthWest,
    Direction::NorthWest,
];

pub const ALL_DIRS: [Direction; 8] = [
    Direction::North,
    Direction::NorthEast,
    Direction::East,
    Direction::SouthEast,
    Direction::South,
    Direction::SouthWest,
    Direction::West,
    Direction::NorthWest,
];

/// (file, rank) offsets of the eight knight jumps
pub const KNIGHT_DELTAS: [(isize, isize); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// Ray directions along which the given kind moves
///
/// Pawns and knights do not scan rays; for them the slice is empty.
pub const fn ray_dirs(p: Piece) -> &'static [Direction] {
    match p {
        Piece::Pawn | Piece::Knight => &[],
        Piece::King | Piece::Queen => &ALL_DIRS,
        Piece::Bishop => &DIAGONAL_DIRS,
        Piece::Rook => &ORTHOGONAL_DIRS,
    }
}

/// Maximum number of steps the given kind makes along one of its rays
pub const fn ray_range(p: Piece) -> usize {
    match p {
        Piece::King => 1,
        Piece::Bishop | Piece::Rook | Piece::Queen => 7,
        Piece::Pawn | Piece::Knight => 0,
    }
}
