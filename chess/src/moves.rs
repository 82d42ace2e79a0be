//! Making, reverting and promoting moves
//!
//! The functions here are raw primitives: they assume the caller has already
//! established that the move is structurally valid (an occupied source
//! square, a destination produced by the move generator). Validation against
//! the caller contract happens in [`crate::game`].

use crate::board::{Board, PieceState};
use crate::geometry;
use crate::types::{CastlingSide, Coord, File, Piece};

/// Captured piece stored inside a [`MoveRecord`]
///
/// The square is recorded explicitly because an en-passant victim does not
/// stand on the move's destination square.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Captured {
    pub piece: PieceState,
    pub square: Coord,
}

/// Record of the most recent move, sufficient to reverse it
///
/// `piece` holds the mover as it was *before* the move, so reverting also
/// restores its `moved` flag. The board keeps a single record, not a stack:
/// the engine only ever needs to make and revert one hypothetical move at a
/// time.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub piece: PieceState,
    pub src: Coord,
    pub dst: Coord,
    pub captured: Option<Captured>,
    pub en_passant: bool,
    pub castling: Option<CastlingSide>,
}

const fn rook_files(side: CastlingSide) -> (File, File) {
    // The rook ends adjacent to the king, on the side it came from.
    match side {
        CastlingSide::King => (File::H, File::F),
        CastlingSide::Queen => (File::A, File::D),
    }
}

/// Applies the move from `src` to `dst`, recording it in the board's
/// single-slot move record
///
/// Special moves are detected structurally and executed as part of the same
/// call, so the whole move is one atomic operation producing one record:
///
/// - a pawn landing on a free square of an adjacent file captures en passant,
///   removing the enemy pawn beside its origin;
/// - a king travelling two files castles, relocating the matching rook.
///
/// The source square must be occupied.
pub fn make_move(b: &mut Board, src: Coord, dst: Coord) {
    let mover = b.take(src).expect("move source must be occupied");

    let en_passant =
        mover.piece == Piece::Pawn && b.is_free(dst) && src.file() != dst.file();
    let castling = if mover.piece == Piece::King {
        match dst.col() as isize - src.col() as isize {
            2 => Some(CastlingSide::King),
            -2 => Some(CastlingSide::Queen),
            _ => None,
        }
    } else {
        None
    };

    let captured = if en_passant {
        // Same rank as the origin, same file as the destination.
        let victim = Coord::from_parts(dst.file(), src.rank());
        b.take(victim).map(|piece| Captured {
            piece,
            square: victim,
        })
    } else {
        b.take(dst).map(|piece| Captured { piece, square: dst })
    };

    b.put(dst, PieceState { moved: true, ..mover });

    if let Some(side) = castling {
        let rank = src.rank();
        let (from, to) = rook_files(side);
        if let Some(rook) = b.take(Coord::from_parts(from, rank)) {
            b.put(
                Coord::from_parts(to, rank),
                PieceState { moved: true, ..rook },
            );
        }
    }

    b.last_move = Some(MoveRecord {
        piece: mover,
        src,
        dst,
        captured,
        en_passant,
        castling,
    });
}

/// Replays the recorded move backward, consuming the record
///
/// The mover returns to its origin with its pre-move state, the captured
/// piece (if any) reappears on the square it occupied, and a castling rook
/// hop is reverted alongside the king. Returns `None` if there is no move to
/// revert.
pub fn unmake_move(b: &mut Board) -> Option<MoveRecord> {
    let rec = b.last_move.take()?;
    b.take(rec.dst);
    b.put(rec.src, rec.piece);
    if let Some(cap) = rec.captured {
        b.put(cap.square, cap.piece);
    }
    if let Some(side) = rec.castling {
        let rank = rec.src.rank();
        let (from, to) = rook_files(side);
        if let Some(rook) = b.take(Coord::from_parts(to, rank)) {
            // Castling requires an unmoved rook, so the flag rolls back too.
            b.put(
                Coord::from_parts(from, rank),
                PieceState { moved: false, ..rook },
            );
        }
    }
    Some(rec)
}

/// Returns the square of a pawn awaiting promotion, if the last recorded
/// move left one on its promotion rank
pub fn promotion_square(b: &Board) -> Option<Coord> {
    let rec = b.last_move()?;
    let piece = b.get(rec.dst)?;
    let eligible =
        piece.piece == Piece::Pawn && rec.dst.rank() == geometry::promotion_rank(piece.color);
    eligible.then(|| rec.dst)
}

/// Replaces a pawn on its promotion rank with a piece of kind `target`
///
/// Returns `false` if no pawn awaits promotion or `target` is not one of
/// Queen, Rook, Bishop or Knight. The replacement is one-way: the pawn is
/// discarded and the move record is consumed, so the promotion cannot be
/// reverted by [`unmake_move`].
pub fn promote(b: &mut Board, target: Piece) -> bool {
    if !matches!(
        target,
        Piece::Queen | Piece::Rook | Piece::Bishop | Piece::Knight
    ) {
        return false;
    }
    let square = match promotion_square(b) {
        Some(c) => c,
        None => return false,
    };
    let pawn = match b.get(square) {
        Some(p) => p,
        None => return false,
    };
    b.put(
        square,
        PieceState {
            color: pawn.color,
            piece: target,
            moved: true,
        },
    );
    b.last_move = None;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Color;
    use std::str::FromStr;

    fn c(s: &str) -> Coord {
        Coord::from_str(s).unwrap()
    }

    #[test]
    fn test_make_and_unmake_simple() {
        let mut b = Board::initial();
        let before = b.clone();
        make_move(&mut b, c("e2"), c("e4"));
        assert!(b.is_free(c("e2")));
        let pawn = b.get(c("e4")).unwrap();
        assert_eq!(pawn.piece, Piece::Pawn);
        assert!(pawn.moved);
        let rec = b.last_move().unwrap();
        assert_eq!((rec.src, rec.dst), (c("e2"), c("e4")));
        assert!(!rec.piece.moved);
        assert!(rec.captured.is_none());
        assert!(!rec.en_passant);

        assert!(unmake_move(&mut b).is_some());
        assert_eq!(b, before);
        assert!(unmake_move(&mut b).is_none());
    }

    #[test]
    fn test_make_and_unmake_capture() {
        let mut b = Board::from_diagram(
            "....k.../......../......../...r..../......../......../...R..../....K...",
        )
        .unwrap();
        let before = b.clone();
        make_move(&mut b, c("d2"), c("d5"));
        let rec = b.last_move().unwrap();
        let cap = rec.captured.unwrap();
        assert_eq!(cap.square, c("d5"));
        assert_eq!(cap.piece.piece, Piece::Rook);
        assert_eq!(cap.piece.color, Color::Black);

        unmake_move(&mut b);
        assert_eq!(b, before);
    }

    #[test]
    fn test_en_passant_execution() {
        let mut b = Board::from_diagram(
            "....k.../.p....../......../P......./......../......../......../....K...",
        )
        .unwrap();
        make_move(&mut b, c("b7"), c("b5"));
        let before = b.clone();

        make_move(&mut b, c("a5"), c("b6"));
        let rec = b.last_move().unwrap();
        assert!(rec.en_passant);
        // The victim is gone from b5 and the capturer stands behind it.
        assert!(b.is_free(c("b5")));
        assert!(b.is_free(c("a5")));
        assert_eq!(b.get(c("b6")).unwrap().piece, Piece::Pawn);
        assert_eq!(rec.captured.unwrap().square, c("b5"));

        // Reverting restores the victim to its own square, not to b6. The
        // move record itself is consumed, so only the grids are compared.
        unmake_move(&mut b);
        assert_eq!(b.cells(), before.cells());
    }

    #[test]
    fn test_castling_execution() {
        let mut b = Board::from_diagram(
            "....k.../......../......../......../......../......../......../R...K..R",
        )
        .unwrap();
        let before = b.clone();

        make_move(&mut b, c("e1"), c("g1"));
        assert_eq!(b.get(c("g1")).unwrap().piece, Piece::King);
        assert_eq!(b.get(c("f1")).unwrap().piece, Piece::Rook);
        assert!(b.is_free(c("h1")));
        assert_eq!(b.last_move().unwrap().castling, Some(CastlingSide::King));

        unmake_move(&mut b);
        assert_eq!(b, before);

        make_move(&mut b, c("e1"), c("c1"));
        assert_eq!(b.get(c("c1")).unwrap().piece, Piece::King);
        assert_eq!(b.get(c("d1")).unwrap().piece, Piece::Rook);
        assert!(b.is_free(c("a1")));
        assert_eq!(b.last_move().unwrap().castling, Some(CastlingSide::Queen));

        unmake_move(&mut b);
        assert_eq!(b, before);
    }

    #[test]
    fn test_promotion() {
        let mut b = Board::from_diagram(
            "....k.../P......./......../......../......../......../......../....K...",
        )
        .unwrap();
        assert_eq!(promotion_square(&b), None);
        make_move(&mut b, c("a7"), c("a8"));
        assert_eq!(promotion_square(&b), Some(c("a8")));

        assert!(!promote(&mut b, Piece::King));
        assert!(!promote(&mut b, Piece::Pawn));
        assert!(promote(&mut b, Piece::Queen));
        let queen = b.get(c("a8")).unwrap();
        assert_eq!(queen.piece, Piece::Queen);
        assert_eq!(queen.color, Color::White);

        // Promotion is one-way: the record is consumed.
        assert!(b.last_move().is_none());
        assert!(unmake_move(&mut b).is_none());
    }

    #[test]
    fn test_promotion_requires_last_rank() {
        let mut b = Board::from_diagram(
            "....k.../......../P......./......../......../......../......../....K...",
        )
        .unwrap();
        make_move(&mut b, c("a6"), c("a7"));
        assert_eq!(promotion_square(&b), None);
        assert!(!promote(&mut b, Piece::Queen));
    }
}
