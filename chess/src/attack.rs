//! Square attack detection
//!
//! A square is attacked iff some enemy piece's own move generator reaches it.
//! The directional test scans each compass ray outward from the square; when
//! the first occupied square holds an enemy piece, that piece's candidate set
//! is consulted for the opposite direction. Reusing the attackers' real
//! movement rules keeps "piece X can move here" and "piece X attacks here"
//! from ever diverging: a bishop never attacks orthogonally, and a pawn
//! attacks a square diagonally exactly when its capture-only diagonal rule
//! would let it take there. Knights are probed separately, since no ray
//! reaches them.

use crate::board::Board;
use crate::geometry;
use crate::movegen::{self, MoveTag};
use crate::types::{Color, Coord, Direction, Piece};

/// Returns `true` if the square `coord` is attacked by some piece of color `by`
pub fn is_cell_attacked(b: &Board, coord: Coord, by: Color) -> bool {
    ray_attack(b, coord, by) || knight_attack(b, coord, by)
}

/// Returns `true` if the king of color `color` is attacked
///
/// A board without such a king is treated as never in check; the engine
/// assumes one king per color and doesn't defend the invariant.
pub fn is_check(b: &Board, color: Color) -> bool {
    match b.king_pos(color) {
        Some(king) => is_cell_attacked(b, king, color.inv()),
        None => false,
    }
}

fn ray_attack(b: &Board, coord: Coord, by: Color) -> bool {
    for dir in Direction::iter() {
        let attacker = match first_on_ray(b, coord, dir) {
            Some(c) if b.is_ally(c, by) => c,
            _ => continue,
        };
        let set = movegen::piece_moves(b, attacker);
        if let Some(list) = set.get(MoveTag::Dir(dir.opposite())) {
            if list.contains(&coord) {
                return true;
            }
        }
    }
    false
}

/// First occupied square on the ray from `from` in direction `dir`
fn first_on_ray(b: &Board, from: Coord, dir: Direction) -> Option<Coord> {
    let (df, dr) = dir.delta();
    let mut cur = from;
    for _ in 0..7 {
        cur = cur.try_shift(df, dr)?;
        if !b.is_free(cur) {
            return Some(cur);
        }
    }
    None
}

fn knight_attack(b: &Board, coord: Coord, by: Color) -> bool {
    for (df, dr) in geometry::KNIGHT_DELTAS {
        if let Some(c) = coord.try_shift(df, dr) {
            if matches!(b.get(c), Some(p) if p.color == by && p.piece == Piece::Knight) {
                return true;
            }
        }
    }
    false
}
