//! # duelchess
//!
//! A two-player chess rules engine: given a board position, it computes legal
//! moves, detects check, checkmate and stalemate, and enforces castling, en
//! passant and promotion.
//!
//! The board is a plain 8×8 grid of optional pieces. Legality is decided by
//! speculation: each candidate move is applied to a disposable clone of the
//! board and rejected if it leaves the mover's own king attacked. Attack
//! detection reuses the attackers' own move generation, so "can move here"
//! and "attacks here" never diverge.
//!
//! The engine is driven by an external caller and holds no turn, player or
//! input state. Most uses go through [`Game`]:
//!
//! ```
//! # use duelchess::{Game, Color};
//! #
//! let mut game = Game::new();
//! game.make_move(1, 4, 3, 4).unwrap(); // e2 -> e4
//! assert!(!game.is_check(Color::Black));
//! ```

pub mod attack;
pub mod board;
pub mod game;
pub mod legal;
pub mod movegen;
pub mod moves;

pub use duelchess_base::geometry;
pub use duelchess_base::types;

pub use board::{Board, DiagramParseError, PieceState};
pub use game::{Game, MoveError, Outcome};
pub use movegen::{MoveSet, MoveTag, SquareList};
pub use moves::{Captured, MoveRecord};
pub use duelchess_base::types::{CastlingSide, Color, Coord, Direction, File, Piece, Rank};
