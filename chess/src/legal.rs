//! Legality filtering
//!
//! Candidates from [`crate::movegen`] may leave the mover's own king in
//! check. The filter here removes them by speculation: each candidate is
//! applied to a disposable clone of the board, the check predicate is
//! queried, and the clone is reverted for the next trial. The live board is
//! never mutated. Castling also lives here, since its eligibility consults
//! the attack detector.

use crate::board::{Board, PieceState};
use crate::movegen::{self, MoveSet, MoveTag, SquareList};
use crate::types::{CastlingSide, Color, Coord, File, Piece};
use crate::{attack, moves};

/// Returns the legal moves of the piece on `coord`
///
/// The result keeps the candidate-set shape of [`movegen::piece_moves`],
/// with king-endangering targets removed, castling entries added for an
/// eligible king, and empty entries dropped. An empty set is returned for a
/// free square.
pub fn legal_moves(b: &Board, coord: Coord) -> MoveSet {
    let piece = match b.get(coord) {
        Some(p) => p,
        None => return MoveSet::new(),
    };
    let mut set = movegen::piece_moves(b, coord);

    // One clone serves all the trials, reverted between them.
    let mut probe = b.clone();
    set.retain_targets(|_, dst| {
        moves::make_move(&mut probe, coord, dst);
        let safe = !attack::is_check(&probe, piece.color);
        moves::unmake_move(&mut probe);
        safe
    });

    if piece.piece == Piece::King {
        for side in CastlingSide::iter() {
            if let Some(dst) = castling_target(b, coord, piece, side) {
                let mut list = SquareList::new();
                list.push(dst);
                set.insert(MoveTag::Castling(side), list);
            }
        }
    }

    set.drop_empty();
    set
}

/// Returns `true` if the side with color `color` has at least one legal move
pub fn has_legal_moves(b: &Board, color: Color) -> bool {
    b.pieces(color).any(|(c, _)| !legal_moves(b, c).is_empty())
}

/// Checks the castling conditions for one side, returning the king's target
///
/// Requires an unmoved king that is not currently in check, an unmoved rook
/// of the same color on the edge file, a free path strictly between the two,
/// and unattacked squares along the king's two-step walk.
fn castling_target(
    b: &Board,
    king_sq: Coord,
    king: PieceState,
    side: CastlingSide,
) -> Option<Coord> {
    if king.moved || attack::is_cell_attacked(b, king_sq, king.color.inv()) {
        return None;
    }

    let rank = king_sq.rank();
    let rook_file = match side {
        CastlingSide::Queen => File::A,
        CastlingSide::King => File::H,
    };
    let rook_sq = Coord::from_parts(rook_file, rank);
    let rook = b.get(rook_sq)?;
    if rook.piece != Piece::Rook || rook.color != king.color || rook.moved {
        return None;
    }

    let step: isize = match side {
        CastlingSide::Queen => -1,
        CastlingSide::King => 1,
    };
    let mut file = king_sq.col() as isize + step;
    while file != rook_file.index() as isize {
        if !b.is_free(Coord::from_parts(File::from_index(file as usize), rank)) {
            return None;
        }
        file += step;
    }

    let enemy = king.color.inv();
    let mut transit = king_sq;
    for _ in 0..2 {
        transit = transit.try_shift(step, 0)?;
        if attack::is_cell_attacked(b, transit, enemy) {
            return None;
        }
    }
    Some(transit)
}
