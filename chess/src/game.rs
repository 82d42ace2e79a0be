//! Game façade
//!
//! [`Game`] wraps a single [`Board`] behind the caller-facing contract:
//! coordinates come in as (row, column) indices, every mutation is validated
//! against the legality-filtered move set before anything is touched, and
//! violations come back as [`MoveError`]. The engine holds no other state;
//! turn alternation, input collection, rendering and persistence are the
//! caller's business.

use crate::board::Board;
use crate::movegen::MoveSet;
use crate::moves::{self, MoveRecord};
use crate::types::{Color, Coord, Piece};
use crate::legal;

use thiserror::Error;

/// Caller-contract violation
///
/// None of these is a recoverable internal condition: the engine performs no
/// retries and leaves no partial state behind. A move either fully applies,
/// including any chained rook relocation or captured-pawn removal, or the
/// board stays untouched.
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum MoveError {
    /// Row or column is outside the board
    #[error("coordinate ({0}, {1}) is outside the board")]
    InvalidCoordinate(usize, usize),
    /// The move's source square holds no piece
    #[error("no piece on square {0}")]
    EmptySquareMove(Coord),
    /// The destination is not in the selected piece's legal move set
    #[error("move {src} -> {dst} is not legal")]
    IllegalMove { src: Coord, dst: Coord },
    /// Undo requested with no recorded move
    #[error("no move to undo")]
    NoMoveToUndo,
    /// Promotion requested on a non-eligible piece or position, or to an
    /// invalid target kind
    #[error("no valid promotion here")]
    InvalidPromotionTarget,
}

/// Game outcome, as seen from a fixed side to move
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The side to move is checkmated
    Win { side: Color },
    /// The side to move is stalemated
    Draw,
}

/// A chess game driven by an external caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
}

impl Game {
    /// Creates a game with the standard initial position
    #[inline]
    pub fn new() -> Game {
        Game {
            board: Board::initial(),
        }
    }

    /// Creates a game over an arbitrary position
    #[inline]
    pub fn from_board(board: Board) -> Game {
        Game { board }
    }

    /// Returns a view over the board
    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the record of the most recent move, if any
    #[inline]
    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.board.last_move()
    }

    fn coord(row: usize, col: usize) -> Result<Coord, MoveError> {
        Coord::from_indices(row, col).ok_or(MoveError::InvalidCoordinate(row, col))
    }

    /// Returns the legal moves of the piece on (`row`, `col`)
    pub fn legal_moves(&self, row: usize, col: usize) -> Result<MoveSet, MoveError> {
        let src = Self::coord(row, col)?;
        if self.board.is_free(src) {
            return Err(MoveError::EmptySquareMove(src));
        }
        Ok(legal::legal_moves(&self.board, src))
    }

    /// Moves the piece on (`from_row`, `from_col`) to (`to_row`, `to_col`)
    ///
    /// The destination must be in the piece's legal move set; castling and en
    /// passant are applied as part of the same call when the destination
    /// denotes one.
    pub fn make_move(
        &mut self,
        from_row: usize,
        from_col: usize,
        to_row: usize,
        to_col: usize,
    ) -> Result<(), MoveError> {
        let src = Self::coord(from_row, from_col)?;
        let dst = Self::coord(to_row, to_col)?;
        if self.board.is_free(src) {
            return Err(MoveError::EmptySquareMove(src));
        }
        if !legal::legal_moves(&self.board, src).contains(dst) {
            return Err(MoveError::IllegalMove { src, dst });
        }
        moves::make_move(&mut self.board, src, dst);
        Ok(())
    }

    /// Replaces a pawn standing on its promotion rank after the last move
    ///
    /// `target` must be one of Queen, Rook, Bishop or Knight. The promotion
    /// is irreversible: it consumes the move record, so it is not covered by
    /// [`Game::undo()`].
    pub fn promote(&mut self, target: Piece) -> Result<(), MoveError> {
        if moves::promote(&mut self.board, target) {
            Ok(())
        } else {
            Err(MoveError::InvalidPromotionTarget)
        }
    }

    /// Reverts the most recent move
    ///
    /// Only one level of undo is supported; a second consecutive call fails
    /// with [`MoveError::NoMoveToUndo`].
    pub fn undo(&mut self) -> Result<(), MoveError> {
        moves::unmake_move(&mut self.board)
            .map(|_| ())
            .ok_or(MoveError::NoMoveToUndo)
    }

    /// Returns `true` if the king of color `color` is attacked
    #[inline]
    pub fn is_check(&self, color: Color) -> bool {
        self.board.is_check(color)
    }

    /// Returns `true` if the side with color `color` is checkmated
    #[inline]
    pub fn is_checkmate(&self, color: Color) -> bool {
        self.board.is_checkmate(color)
    }

    /// Returns `true` if the side with color `color` is stalemated
    #[inline]
    pub fn is_stalemate(&self, color: Color) -> bool {
        self.board.is_stalemate(color)
    }

    /// Calculates the outcome, with `side_to_move` due to play
    ///
    /// Returns `None` while `side_to_move` still has a legal move. This
    /// function can be computationally expensive, as it scans the legal
    /// moves of every piece.
    pub fn outcome(&self, side_to_move: Color) -> Option<Outcome> {
        if self.board.has_legal_moves(side_to_move) {
            return None;
        }
        if self.board.is_check(side_to_move) {
            Some(Outcome::Win {
                side: side_to_move.inv(),
            })
        } else {
            Some(Outcome::Draw)
        }
    }
}

impl Default for Game {
    #[inline]
    fn default() -> Game {
        Game::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movegen::MoveTag;
    use crate::types::CastlingSide;
    use std::str::FromStr;

    fn c(s: &str) -> Coord {
        Coord::from_str(s).unwrap()
    }

    fn game(diagram: &str) -> Game {
        Game::from_board(Board::from_diagram(diagram).unwrap())
    }

    #[test]
    fn test_opening_pawn() {
        let mut g = Game::new();
        // The pawn on row 1, column 0 starts with exactly the one-step and
        // two-step advances.
        let set = g.legal_moves(1, 0).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(c("a3")));
        assert!(set.contains(c("a4")));

        g.make_move(1, 0, 2, 0).unwrap();
        let set = g.legal_moves(2, 0).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.contains(c("a4")));
    }

    #[test]
    fn test_errors() {
        let mut g = Game::new();
        assert_eq!(
            g.legal_moves(8, 0),
            Err(MoveError::InvalidCoordinate(8, 0))
        );
        assert_eq!(
            g.make_move(0, 0, 0, 8),
            Err(MoveError::InvalidCoordinate(0, 8))
        );
        assert_eq!(
            g.legal_moves(3, 3),
            Err(MoveError::EmptySquareMove(c("d4")))
        );
        assert_eq!(
            g.make_move(1, 4, 4, 4),
            Err(MoveError::IllegalMove {
                src: c("e2"),
                dst: c("e5")
            })
        );
        assert_eq!(g.undo(), Err(MoveError::NoMoveToUndo));
        assert_eq!(g.promote(Piece::Queen), Err(MoveError::InvalidPromotionTarget));
    }

    #[test]
    fn test_rejected_move_leaves_board_untouched() {
        let mut g = Game::new();
        let before = g.board().clone();
        assert!(g.make_move(1, 4, 4, 4).is_err());
        assert!(g.make_move(3, 3, 4, 4).is_err());
        assert_eq!(*g.board(), before);
    }

    #[test]
    fn test_undo_round_trip() {
        let mut g = Game::new();
        let before = g.board().clone();
        g.make_move(1, 4, 3, 4).unwrap();
        assert!(g.last_move().is_some());
        g.undo().unwrap();
        assert_eq!(*g.board(), before);
        assert_eq!(g.undo(), Err(MoveError::NoMoveToUndo));
    }

    #[test]
    fn test_fools_mate() {
        let mut g = Game::new();
        g.make_move(1, 5, 2, 5).unwrap(); // f3
        g.make_move(6, 4, 4, 4).unwrap(); // e5
        g.make_move(1, 6, 3, 6).unwrap(); // g4
        g.make_move(7, 3, 3, 7).unwrap(); // Qh4#
        assert!(g.is_check(Color::White));
        assert!(g.is_checkmate(Color::White));
        assert!(!g.is_stalemate(Color::White));
        assert!(!g.is_checkmate(Color::Black));
        assert_eq!(
            g.outcome(Color::White),
            Some(Outcome::Win { side: Color::Black })
        );
        assert_eq!(g.outcome(Color::Black), None);
    }

    #[test]
    fn test_back_rank_mate() {
        let g = game("......k./......../......../......../......../......../.....PPP/r.....K.");
        assert!(g.is_checkmate(Color::White));
        // Freeing g2 gives the king an escape square and lifts the mate.
        let g = game("......k./......../......../......../......../......P./.....P.P/r.....K.");
        assert!(g.is_check(Color::White));
        assert!(!g.is_checkmate(Color::White));
    }

    #[test]
    fn test_stalemate() {
        let g = game("k......./..Q...../......../......../......../......../......../....K...");
        assert!(!g.is_check(Color::Black));
        assert!(g.is_stalemate(Color::Black));
        assert!(!g.is_checkmate(Color::Black));
        assert_eq!(g.outcome(Color::Black), Some(Outcome::Draw));
        // White, on the other hand, has plenty of moves.
        assert_eq!(g.outcome(Color::White), None);
        assert!(!g.is_stalemate(Color::White));
    }

    #[test]
    fn test_en_passant_through_game() {
        let mut g = game("....k.../.p....../......../P......./......../......../......../....K...");
        g.make_move(6, 1, 4, 1).unwrap(); // b7 -> b5
        let set = g.legal_moves(4, 0).unwrap();
        assert!(set.get(MoveTag::EnPassant).is_some());
        g.make_move(4, 0, 5, 1).unwrap(); // a5 takes b6 en passant
        let rec = g.last_move().unwrap();
        assert!(rec.en_passant);
        assert!(g.board().is_free(c("b5")));
        assert_eq!(g.board().get(c("b6")).unwrap().piece, Piece::Pawn);
    }

    #[test]
    fn test_castling_through_game() {
        let mut g = game("....k.../......../......../......../......../......../......../R...K..R");
        let set = g.legal_moves(0, 4).unwrap();
        assert!(set.get(MoveTag::Castling(CastlingSide::King)).is_some());
        g.make_move(0, 4, 0, 6).unwrap();
        assert_eq!(g.board().get(c("g1")).unwrap().piece, Piece::King);
        assert_eq!(g.board().get(c("f1")).unwrap().piece, Piece::Rook);
    }

    #[test]
    fn test_promotion_through_game() {
        let mut g = game("....k.../P......./......../......../......../......../......../....K...");
        g.make_move(6, 0, 7, 0).unwrap();
        assert_eq!(g.promote(Piece::King), Err(MoveError::InvalidPromotionTarget));
        g.promote(Piece::Knight).unwrap();
        assert_eq!(g.board().get(c("a8")).unwrap().piece, Piece::Knight);
        // Irreversible: the record is consumed with the promotion.
        assert_eq!(g.undo(), Err(MoveError::NoMoveToUndo));
    }
}
