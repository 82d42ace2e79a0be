//! Board and related things

use crate::moves::MoveRecord;
use crate::types::{Color, Coord, File, Piece, Rank};
use crate::{geometry, legal};

use std::fmt::{self, Display};
use std::str::FromStr;

use thiserror::Error;

/// Error parsing [`Board`] from a diagram string
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum DiagramParseError {
    /// Rank doesn't consist of exactly eight squares
    #[error("bad width of rank {0}")]
    BadRankWidth(Rank),
    /// Diagram doesn't consist of exactly eight ranks
    #[error("expected 8 ranks, got {0}")]
    BadRankCount(usize),
    /// Unexpected character
    #[error("unexpected char {0:?}")]
    UnexpectedChar(char),
}

/// Occupant of a single square
///
/// Pieces live in the board by value, so the square a piece stands on is
/// always the grid slot holding it. The `moved` flag is stored for every
/// piece but only consulted for kings, rooks and pawns, which gate castling
/// rights and the pawn double-step on it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PieceState {
    pub color: Color,
    pub piece: Piece,
    pub moved: bool,
}

impl PieceState {
    #[inline]
    pub const fn new(color: Color, piece: Piece) -> PieceState {
        PieceState {
            color,
            piece,
            moved: false,
        }
    }

    /// Renders the piece as one char: uppercase for White, lowercase for Black
    pub fn as_char(&self) -> char {
        match self.color {
            Color::White => self.piece.as_char(),
            Color::Black => self.piece.as_char().to_ascii_lowercase(),
        }
    }

    pub fn from_char(c: char) -> Option<PieceState> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let piece = Piece::from_char(c.to_ascii_uppercase())?;
        Some(PieceState::new(color, piece))
    }
}

/// Mailbox chess board
///
/// The board owns an 8×8 grid of optional piece occupants together with the
/// record of the most recent move. The record is a single slot, not a move
/// history: it exists so that one move at a time can be made and reverted,
/// which is all the legality and game-end machinery needs.
///
/// `Board` is `Clone`, and a clone is a full deep copy: everything is stored
/// by value, so a clone shares no mutable state with the original. Cloning is
/// the only mechanism used to obtain a disposable board for speculative moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub(crate) cells: [Option<PieceState>; 64],
    pub(crate) last_move: Option<MoveRecord>,
}

impl Board {
    /// Returns a board with no pieces on it
    #[inline]
    pub const fn empty() -> Board {
        Board {
            cells: [None; 64],
            last_move: None,
        }
    }

    /// Returns a board with the standard initial position, all 32 pieces unmoved
    pub fn initial() -> Board {
        let mut res = Board::empty();
        for file in File::iter() {
            res.put(
                Coord::from_parts(file, Rank::R2),
                PieceState::new(Color::White, Piece::Pawn),
            );
            res.put(
                Coord::from_parts(file, Rank::R7),
                PieceState::new(Color::Black, Piece::Pawn),
            );
        }
        for (color, rank) in [(Color::White, Rank::R1), (Color::Black, Rank::R8)] {
            for (file, piece) in [
                (File::A, Piece::Rook),
                (File::B, Piece::Knight),
                (File::C, Piece::Bishop),
                (File::D, Piece::Queen),
                (File::E, Piece::King),
                (File::F, Piece::Bishop),
                (File::G, Piece::Knight),
                (File::H, Piece::Rook),
            ] {
                res.put(Coord::from_parts(file, rank), PieceState::new(color, piece));
            }
        }
        res
    }

    /// Parses a board from a diagram string
    ///
    /// Does the same as [`Board::from_str`]. It is recommended to use this
    /// function instead of `from_str()` for better readability.
    #[inline]
    pub fn from_diagram(s: &str) -> Result<Board, DiagramParseError> {
        Board::from_str(s)
    }

    /// Returns the occupant of the square with coordinate `c`
    #[inline]
    pub fn get(&self, c: Coord) -> Option<PieceState> {
        unsafe { *self.cells.get_unchecked(c.index()) }
    }

    /// Puts `piece` on the square with coordinate `c`, overwriting any occupant
    #[inline]
    pub fn put(&mut self, c: Coord, piece: PieceState) {
        unsafe {
            *self.cells.get_unchecked_mut(c.index()) = Some(piece);
        }
    }

    /// Clears the square with coordinate `c`, returning its previous occupant
    #[inline]
    pub fn take(&mut self, c: Coord) -> Option<PieceState> {
        unsafe { self.cells.get_unchecked_mut(c.index()).take() }
    }

    /// Returns `true` if the square with coordinate `c` holds no piece
    #[inline]
    pub fn is_free(&self, c: Coord) -> bool {
        self.get(c).is_none()
    }

    /// Returns `true` if the square holds a piece of the color opposing `color`
    #[inline]
    pub fn is_enemy(&self, c: Coord, color: Color) -> bool {
        matches!(self.get(c), Some(p) if p.color != color)
    }

    /// Returns `true` if the square holds a piece of color `color`
    #[inline]
    pub fn is_ally(&self, c: Coord, color: Color) -> bool {
        matches!(self.get(c), Some(p) if p.color == color)
    }

    /// Iterates over all the pieces of color `color`, with their squares
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Coord, PieceState)> + '_ {
        Coord::iter().filter_map(move |c| match self.get(c) {
            Some(p) if p.color == color => Some((c, p)),
            _ => None,
        })
    }

    /// Returns the position of the king of color `color`
    ///
    /// The engine assumes exactly one king per color during play and doesn't
    /// defend this invariant; on a board without such a king the function
    /// returns `None`.
    pub fn king_pos(&self, color: Color) -> Option<Coord> {
        self.pieces(color)
            .find(|(_, p)| p.piece == Piece::King)
            .map(|(c, _)| c)
    }

    /// Returns a read-only view over the grid, for use by a renderer
    ///
    /// The cells are indexed by [`Coord::index()`].
    #[inline]
    pub fn cells(&self) -> &[Option<PieceState>; 64] {
        &self.cells
    }

    /// Returns the record of the most recent move, if any
    #[inline]
    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.last_move.as_ref()
    }

    /// Returns `true` if the king of color `color` is attacked
    #[inline]
    pub fn is_check(&self, color: Color) -> bool {
        crate::attack::is_check(self, color)
    }

    /// Returns `true` if the side with color `color` has at least one legal move
    #[inline]
    pub fn has_legal_moves(&self, color: Color) -> bool {
        legal::has_legal_moves(self, color)
    }

    /// Returns `true` if the side with color `color` is checkmated
    #[inline]
    pub fn is_checkmate(&self, color: Color) -> bool {
        self.is_check(color) && !self.has_legal_moves(color)
    }

    /// Returns `true` if the side with color `color` is stalemated
    ///
    /// Mutually exclusive with [`Board::is_checkmate()`]: both predicates
    /// trigger on "no legal moves" and are disambiguated by the check state.
    #[inline]
    pub fn is_stalemate(&self, color: Color) -> bool {
        !self.is_check(color) && !self.has_legal_moves(color)
    }

    /// Converts the board into a diagram string
    ///
    /// Does the same as `Board::to_string()`. It is recommended to use this
    /// function instead of `to_string()` for better readability.
    #[inline]
    pub fn as_diagram(&self) -> String {
        self.to_string()
    }
}

impl Default for Board {
    #[inline]
    fn default() -> Board {
        Board::empty()
    }
}

/// Home square check used when parsing diagrams
///
/// A parsed piece keeps `moved == false` only if it stands where an unmoved
/// piece of its kind could still stand; everything else is conservatively
/// marked as moved, so castling and double-step gating stay sound for
/// constructed positions.
fn on_home_square(p: PieceState, c: Coord) -> bool {
    match p.piece {
        Piece::Pawn => c.rank() == geometry::pawn_start_rank(p.color),
        Piece::King => c == Coord::from_parts(File::E, geometry::castling_rank(p.color)),
        Piece::Rook => {
            c.rank() == geometry::castling_rank(p.color)
                && (c.file() == File::A || c.file() == File::H)
        }
        _ => true,
    }
}

impl FromStr for Board {
    type Err = DiagramParseError;

    fn from_str(s: &str) -> Result<Board, Self::Err> {
        type Error = DiagramParseError;

        let mut res = Board::empty();
        let ranks: Vec<&str> = s.split('/').collect();
        if ranks.len() != 8 {
            return Err(Error::BadRankCount(ranks.len()));
        }
        // The top line of a diagram is the eighth rank.
        for (i, chunk) in ranks.iter().enumerate() {
            let rank = Rank::from_index(7 - i);
            if chunk.chars().count() != 8 {
                return Err(Error::BadRankWidth(rank));
            }
            for (j, ch) in chunk.chars().enumerate() {
                if ch == '.' {
                    continue;
                }
                let coord = Coord::from_parts(File::from_index(j), rank);
                let mut piece =
                    PieceState::from_char(ch).ok_or(Error::UnexpectedChar(ch))?;
                piece.moved = !on_home_square(piece, coord);
                res.put(coord, piece);
            }
        }
        Ok(res)
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for i in (0..8).rev() {
            let rank = Rank::from_index(i);
            for file in File::iter() {
                match self.get(Coord::from_parts(file, rank)) {
                    Some(p) => write!(f, "{}", p.as_char())?,
                    None => write!(f, ".")?,
                }
            }
            if i != 0 {
                write!(f, "/")?;
            }
        }
        Ok(())
    }
}
