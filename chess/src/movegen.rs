//! Candidate move generation
//!
//! This module produces *pseudo-legal* moves: every rule of piece movement is
//! applied (bounds, path blocking, pawn capture geometry, en passant), except
//! that the mover's own king may be left in check. Check filtering and
//! castling live in [`crate::legal`].

use crate::board::Board;
use crate::geometry;
use crate::types::{CastlingSide, Color, Coord, Direction, Piece};

use arrayvec::ArrayVec;
use derive_more::{Deref, DerefMut};

/// Label of one entry in a piece's candidate set
///
/// Sliding pieces, kings and pawns file their targets under the compass
/// direction of travel; the remaining labels mark moves with no single
/// direction or with special execution rules.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MoveTag {
    Dir(Direction),
    Knight,
    EnPassant,
    Castling(CastlingSide),
}

/// Ordered list of target squares under one label
///
/// A ray holds at most 7 squares and the knight label at most 8, so the
/// storage is a fixed-capacity vector.
#[derive(Default, Debug, Clone, PartialEq, Eq, Deref, DerefMut)]
pub struct SquareList(ArrayVec<Coord, 8>);

impl SquareList {
    #[inline]
    pub fn new() -> SquareList {
        SquareList(ArrayVec::new())
    }
}

/// Candidate set of a single piece
///
/// Maps labels to ordered target lists. Ray lists are ordered by increasing
/// distance from the piece. Empty lists are valid while the set is being
/// built and filtered; [`crate::legal::legal_moves`] drops them from its
/// published result.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct MoveSet {
    entries: Vec<(MoveTag, SquareList)>,
}

impl MoveSet {
    #[inline]
    pub fn new() -> MoveSet {
        MoveSet::default()
    }

    pub(crate) fn insert(&mut self, tag: MoveTag, list: SquareList) {
        match self.entries.iter_mut().find(|(t, _)| *t == tag) {
            Some((_, l)) => *l = list,
            None => self.entries.push((tag, list)),
        }
    }

    /// Returns the target list under `tag`, if the set has such an entry
    pub fn get(&self, tag: MoveTag) -> Option<&SquareList> {
        self.entries
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, l)| l)
    }

    /// Iterates over the entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &(MoveTag, SquareList)> {
        self.entries.iter()
    }

    /// Iterates over all the target squares, across every label
    pub fn targets(&self) -> impl Iterator<Item = Coord> + '_ {
        self.entries.iter().flat_map(|(_, l)| l.iter().copied())
    }

    /// Returns `true` if some entry contains the square `dst`
    pub fn contains(&self, dst: Coord) -> bool {
        self.targets().any(|c| c == dst)
    }

    /// Total number of target squares, across every label
    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, l)| l.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keeps only the targets for which `f` returns `true`
    pub(crate) fn retain_targets<F: FnMut(MoveTag, Coord) -> bool>(&mut self, mut f: F) {
        for (tag, list) in &mut self.entries {
            list.retain(|c| f(*tag, *c));
        }
    }

    /// Removes entries whose target list is empty
    pub(crate) fn drop_empty(&mut self) {
        self.entries.retain(|(_, l)| !l.is_empty());
    }
}

impl<'a> IntoIterator for &'a MoveSet {
    type Item = &'a (MoveTag, SquareList);
    type IntoIter = std::slice::Iter<'a, (MoveTag, SquareList)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Generates the pseudo-legal candidate set of the piece on `coord`
///
/// Returns an empty set if the square is free. Castling candidates are not
/// produced here; see [`crate::legal::legal_moves`].
pub fn piece_moves(b: &Board, coord: Coord) -> MoveSet {
    let mut set = MoveSet::new();
    let piece = match b.get(coord) {
        Some(p) => p,
        None => return set,
    };
    match piece.piece {
        Piece::Pawn => pawn_moves(b, coord, piece.color, piece.moved, &mut set),
        Piece::Knight => knight_moves(b, coord, piece.color, &mut set),
        kind => {
            let dirs = geometry::ray_dirs(kind);
            let range = geometry::ray_range(kind);
            for &dir in dirs {
                let list = scan_ray(b, coord, piece.color, dir, range);
                set.insert(MoveTag::Dir(dir), list);
            }
        }
    }
    set
}

/// Walks one ray outward, truncating at the first occupied square
///
/// The first occupied square is kept iff it holds an enemy; an ally and
/// everything beyond it are discarded.
fn scan_ray(b: &Board, from: Coord, color: Color, dir: Direction, range: usize) -> SquareList {
    let (df, dr) = dir.delta();
    let mut list = SquareList::new();
    let mut cur = from;
    for _ in 0..range {
        cur = match cur.try_shift(df, dr) {
            Some(c) => c,
            None => break,
        };
        match b.get(cur) {
            None => list.push(cur),
            Some(p) if p.color != color => {
                list.push(cur);
                break;
            }
            Some(_) => break,
        }
    }
    list
}

fn knight_moves(b: &Board, from: Coord, color: Color, set: &mut MoveSet) {
    let mut list = SquareList::new();
    for (df, dr) in geometry::KNIGHT_DELTAS {
        if let Some(c) = from.try_shift(df, dr) {
            if !b.is_ally(c, color) {
                list.push(c);
            }
        }
    }
    set.insert(MoveTag::Knight, list);
}

fn pawn_moves(b: &Board, from: Coord, color: Color, moved: bool, set: &mut MoveSet) {
    let fwd = geometry::pawn_forward(color);
    let (df, dr) = fwd.delta();

    // Straight ahead: never a capture. The double-step additionally requires
    // an unmoved pawn on its starting rank and a free intermediate square.
    let mut ahead = SquareList::new();
    if let Some(one) = from.try_shift(df, dr) {
        if b.is_free(one) {
            ahead.push(one);
            if !moved && from.rank() == geometry::pawn_start_rank(color) {
                if let Some(two) = one.try_shift(df, dr) {
                    if b.is_free(two) {
                        ahead.push(two);
                    }
                }
            }
        }
    }
    set.insert(MoveTag::Dir(fwd), ahead);

    // Diagonals: capture-only.
    for dir in geometry::pawn_captures(color) {
        let (df, dr) = dir.delta();
        let mut list = SquareList::new();
        if let Some(c) = from.try_shift(df, dr) {
            if b.is_enemy(c, color) {
                list.push(c);
            }
        }
        set.insert(MoveTag::Dir(dir), list);
    }

    // En passant, derived from the last recorded move: an enemy pawn has just
    // advanced two ranks and landed beside this pawn.
    let mut ep = SquareList::new();
    if let Some(rec) = b.last_move() {
        let double_step = rec.piece.piece == Piece::Pawn
            && rec.piece.color != color
            && rec.src.row().abs_diff(rec.dst.row()) == 2;
        if double_step && rec.dst.rank() == from.rank() && rec.dst.col().abs_diff(from.col()) == 1
        {
            let across = rec.dst.col() as isize - from.col() as isize;
            if let Some(c) = from.try_shift(across, dr) {
                if b.is_free(c) {
                    ep.push(c);
                }
            }
        }
    }
    set.insert(MoveTag::EnPassant, ep);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PieceState;
    use crate::moves;
    use std::str::FromStr;

    fn c(s: &str) -> Coord {
        Coord::from_str(s).unwrap()
    }

    fn targets(set: &MoveSet) -> Vec<Coord> {
        let mut res: Vec<_> = set.targets().collect();
        res.sort_by_key(|c| c.index());
        res
    }

    #[test]
    fn test_free_square() {
        let b = Board::initial();
        assert!(piece_moves(&b, c("e4")).is_empty());
    }

    #[test]
    fn test_pawn_initial() {
        let b = Board::initial();
        let set = piece_moves(&b, c("a2"));
        assert_eq!(targets(&set), vec![c("a3"), c("a4")]);
        let ahead = set.get(MoveTag::Dir(Direction::North)).unwrap();
        assert_eq!(ahead.as_slice(), &[c("a3"), c("a4")]);
    }

    #[test]
    fn test_pawn_after_first_move() {
        let mut b = Board::initial();
        moves::make_move(&mut b, c("a2"), c("a3"));
        let set = piece_moves(&b, c("a3"));
        assert_eq!(targets(&set), vec![c("a4")]);
    }

    #[test]
    fn test_pawn_double_step_blocked() {
        let mut b = Board::initial();
        b.put(c("a3"), PieceState::new(Color::Black, Piece::Knight));
        // A blocker on the intermediate square kills both steps, and a pawn
        // never captures straight ahead.
        assert!(piece_moves(&b, c("a2")).is_empty());

        let mut b = Board::initial();
        b.put(c("a4"), PieceState::new(Color::Black, Piece::Knight));
        assert_eq!(targets(&piece_moves(&b, c("a2"))), vec![c("a3")]);
    }

    #[test]
    fn test_pawn_captures() {
        let b = Board::from_diagram(
            "....k.../......../......../......../...n.n../....P.../......../....K...",
        )
        .unwrap();
        let set = piece_moves(&b, c("e3"));
        assert_eq!(targets(&set), vec![c("d4"), c("e4"), c("f4")]);
        // Straight ahead never captures.
        let mut b = Board::initial();
        b.put(c("a3"), PieceState::new(Color::Black, Piece::Pawn));
        assert!(piece_moves(&b, c("a2")).is_empty());
    }

    #[test]
    fn test_black_pawn_direction() {
        let b = Board::initial();
        let set = piece_moves(&b, c("d7"));
        assert_eq!(targets(&set), vec![c("d5"), c("d6")]);
        assert!(set.get(MoveTag::Dir(Direction::South)).is_some());
    }

    #[test]
    fn test_knight() {
        let b = Board::initial();
        let set = piece_moves(&b, c("b1"));
        assert_eq!(targets(&set), vec![c("a3"), c("c3")]);
        assert_eq!(set.get(MoveTag::Knight).unwrap().len(), 2);
    }

    #[test]
    fn test_knight_center() {
        let b = Board::from_diagram(
            "....k.../......../......../......../...N..../......../......../....K...",
        )
        .unwrap();
        assert_eq!(piece_moves(&b, c("d4")).len(), 8);
    }

    #[test]
    fn test_rook_blocked() {
        let b = Board::from_diagram(
            "....k.../......../......../...p..../......../......../...R.P../....K...",
        )
        .unwrap();
        let set = piece_moves(&b, c("d2"));
        let north = set.get(MoveTag::Dir(Direction::North)).unwrap();
        // Runs up to the enemy pawn and captures it, not beyond.
        assert_eq!(north.as_slice(), &[c("d3"), c("d4"), c("d5")]);
        let east = set.get(MoveTag::Dir(Direction::East)).unwrap();
        // Stops short of the friendly pawn on f2.
        assert_eq!(east.as_slice(), &[c("e2")]);
        assert_eq!(set.get(MoveTag::Dir(Direction::NorthEast)), None);
    }

    #[test]
    fn test_bishop_and_queen_rays() {
        let b = Board::from_diagram(
            "....k.../......../......../......../......../......../......../B..QK...",
        )
        .unwrap();
        let bishop = piece_moves(&b, c("a1"));
        assert_eq!(
            bishop.get(MoveTag::Dir(Direction::NorthEast)).unwrap().len(),
            7
        );
        assert_eq!(bishop.len(), 7);
        let queen = piece_moves(&b, c("d1"));
        // Blocked by the allied king to the east and bishop to the west.
        assert_eq!(queen.get(MoveTag::Dir(Direction::East)).unwrap().len(), 0);
        assert_eq!(queen.get(MoveTag::Dir(Direction::West)).unwrap().len(), 2);
        assert_eq!(queen.get(MoveTag::Dir(Direction::North)).unwrap().len(), 7);
    }

    #[test]
    fn test_king_range() {
        let b = Board::from_diagram(
            "....k.../......../......../......../...K..../......../......../........",
        )
        .unwrap();
        assert_eq!(piece_moves(&b, c("d4")).len(), 8);
    }

    #[test]
    fn test_en_passant_candidate() {
        let mut b = Board::from_diagram(
            "....k.../.p....../......../P......./......../......../......../....K...",
        )
        .unwrap();
        moves::make_move(&mut b, c("b7"), c("b5"));
        let set = piece_moves(&b, c("a5"));
        let ep = set.get(MoveTag::EnPassant).unwrap();
        assert_eq!(ep.as_slice(), &[c("b6")]);

        // A single-step advance next to the pawn gives no en passant.
        let mut b = Board::from_diagram(
            "....k.../......../.p....../P......./......../......../......../....K...",
        )
        .unwrap();
        moves::make_move(&mut b, c("b6"), c("b5"));
        let set = piece_moves(&b, c("a5"));
        assert_eq!(set.get(MoveTag::EnPassant).unwrap().len(), 0);
    }

    #[test]
    fn test_moveset_helpers() {
        let b = Board::initial();
        let set = piece_moves(&b, c("b1"));
        assert!(set.contains(c("c3")));
        assert!(!set.contains(c("d2")));
        assert_eq!(set.len(), 2);
        assert!(!set.is_empty());
        let mut set = set;
        set.retain_targets(|_, c| c.col() == 0);
        assert_eq!(set.len(), 1);
        set.drop_empty();
        assert_eq!(set.iter().count(), 1);
    }
}
