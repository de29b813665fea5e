//! Move legality and king status.
//!
//! [`Rules`] is a read-only view of a [`PositionStore`]. It never changes
//! the history: it computes legal destinations, builds [`Update`]s for
//! legal moves and classifies the king of either side.
//!
//! # Examples
//!
//! ```
//! use rochade::{setup, KingStatus, PositionStore, Rules, Square};
//!
//! let store = PositionStore::new(setup::standard_pieces());
//! let rules = Rules::new(&store);
//!
//! let targets = rules.legal_destinations(Square::G1);
//! assert!(targets.contains(Square::F3));
//! assert!(targets.contains(Square::H3));
//! assert_eq!(targets.count(), 2);
//!
//! assert!(rules.validate(Square::E2, Square::E5).is_none());
//! assert_eq!(rules.king_status(rules.turn()), KingStatus::Normal);
//! ```

use arrayvec::ArrayVec;
use tracing::{debug, trace};

use crate::{
    attacks::{attacks, between, direction, threatens, walk},
    bitboard::Bitboard,
    castling_side::{CastlingRights, CastlingSide},
    color::Color,
    position::Position,
    role::Role,
    square::Square,
    store::PositionStore,
    types::{KingStatus, Piece},
    update::{Capture, Castle, Update},
};

/// Legal destinations of every piece of the side to move that has at least
/// one.
pub type MoveList = ArrayVec<(Square, Bitboard), 64>;

/// An en passant capture available to a pawn.
#[derive(Copy, Clone, Debug)]
struct EnPassant {
    to: Square,
    captured: Square,
}

/// Legality checks over the current position of a [`PositionStore`] and its
/// history.
#[derive(Copy, Clone, Debug)]
pub struct Rules<'a> {
    store: &'a PositionStore,
}

impl<'a> Rules<'a> {
    pub fn new(store: &'a PositionStore) -> Rules<'a> {
        Rules { store }
    }

    #[inline]
    pub fn store(&self) -> &'a PositionStore {
        self.store
    }

    #[inline]
    fn position(&self) -> &'a Position {
        self.store.current_position()
    }

    /// The side to move.
    #[inline]
    pub fn turn(&self) -> Color {
        self.store.turn()
    }

    /// Squares the piece on `from` may legally move to.
    ///
    /// Empty if `from` is off the board, empty, or holds a piece of the side
    /// not to move.
    pub fn legal_destinations(&self, from: Square) -> Bitboard {
        match self.position().piece_at(from) {
            Some(piece) if piece.color == self.turn() => {
                self.destinations(from, piece, self.checkers(piece.color))
            }
            _ => Bitboard::EMPTY,
        }
    }

    /// Legal destinations of all pieces of the side to move, skipping pieces
    /// that cannot move.
    pub fn legal_moves(&self) -> MoveList {
        let us = self.turn();
        let checkers = self.checkers(us);
        let mut moves = MoveList::new();
        for (from, piece) in self.position().pieces_of(us) {
            let targets = self.destinations(from, piece, checkers);
            if targets.any() {
                moves.push((from, targets));
            }
        }
        moves
    }

    /// Tests if `color` has at least one legal move.
    pub fn has_legal_move(&self, color: Color) -> bool {
        let checkers = self.checkers(color);
        self.position()
            .pieces_of(color)
            .any(|(from, piece)| self.destinations(from, piece, checkers).any())
    }

    /// Validates the move `from`-`to` for the side to move and builds the
    /// complete update for it, including the king status of the opponent
    /// after the move.
    ///
    /// Returns `None` if the move is not legal. The history is not changed.
    pub fn validate(&self, from: Square, to: Square) -> Option<Update> {
        if !from.is_in_bounds() || !to.is_in_bounds() {
            trace!(%from, %to, "rejected: square off the board");
            return None;
        }

        let pos = self.position();
        let Some(piece) = pos.piece_at(from) else {
            trace!(%from, %to, "rejected: no piece on origin");
            return None;
        };
        if piece.color != self.turn() {
            trace!(%from, %to, color = %piece.color, "rejected: not this side's turn");
            return None;
        }
        if pos.by_color(piece.color).contains(to) {
            trace!(%from, %to, "rejected: own piece on destination");
            return None;
        }
        if !self.legal_destinations(from).contains(to) {
            trace!(%from, %to, role = %piece.role, "rejected: illegal move");
            return None;
        }

        let mut update = self.build_update(from, to);
        update.king_status = self.status_after(&update)?;
        Some(update)
    }

    /// Builds the update for a move already known to be legal. The king
    /// status is left at its default.
    pub(crate) fn build_update(&self, from: Square, to: Square) -> Update {
        let pos = self.position();
        let mut update = Update::new(from, to);
        let Some(piece) = pos.piece_at(from) else {
            return update;
        };

        update.capture = match pos.piece_at(to) {
            Some(captured) => Some(Capture {
                piece: captured,
                square: to,
            }),
            None => self
                .en_passant(from, piece)
                .filter(|ep| ep.to == to)
                .and_then(|ep| {
                    pos.piece_at(ep.captured).map(|captured| Capture {
                        piece: captured,
                        square: ep.captured,
                    })
                }),
        };

        if piece.role == Role::King {
            if let Some(side) = CastlingSide::from_king_move(from, to) {
                update.castle = Some(Castle {
                    rook_from: Square::new(side.rook_file(), from.rank()),
                    rook_to: from.offset(side.direction(), 0),
                });
            }
        }

        update
    }

    /// Tests if `update` moves a pawn to its last rank without naming a
    /// promotion role yet.
    pub fn requires_promotion(&self, update: &Update) -> bool {
        update.promotion.is_none()
            && self.position().piece_at(update.from).is_some_and(|piece| {
                piece.role == Role::Pawn && update.to.rank() == piece.color.promotion_rank()
            })
    }

    fn status_after(&self, update: &Update) -> Option<KingStatus> {
        let us = self.position().piece_at(update.from)?.color;
        let mut next = self.store.clone();
        next.apply(*update).ok()?;
        Some(Rules::new(&next).king_status(!us))
    }

    /// Squares of the pieces giving check to the king of `color`.
    pub fn checkers(&self, color: Color) -> Bitboard {
        let pos = self.position();
        match pos.king_of(color) {
            Some(king) => self.attackers(king, !color, pos.occupied(), Bitboard::EMPTY),
            None => Bitboard::EMPTY,
        }
    }

    /// Squares of pieces of color `by` that threaten `target` when the
    /// board is occupied as given. Pieces on `ignore` are left out.
    pub fn attackers(
        &self,
        target: Square,
        by: Color,
        occupied: Bitboard,
        ignore: Bitboard,
    ) -> Bitboard {
        self.position()
            .pieces_of(by)
            .filter(|&(sq, piece)| {
                !ignore.contains(sq) && threatens(piece, sq, target, occupied, None)
            })
            .map(|(sq, _)| sq)
            .collect()
    }

    fn is_attacked(&self, target: Square, by: Color, occupied: Bitboard, ignore: Bitboard) -> bool {
        self.position()
            .pieces_of(by)
            .any(|(sq, piece)| !ignore.contains(sq) && threatens(piece, sq, target, occupied, None))
    }

    /// Check, checkmate and stalemate for the king of `color` on the current
    /// position.
    ///
    /// A side without a king is never in check.
    pub fn king_status(&self, color: Color) -> KingStatus {
        let in_check = self.checkers(color).any();
        let status = match (in_check, self.has_legal_move(color)) {
            (false, true) => KingStatus::Normal,
            (true, true) => KingStatus::Checked,
            (true, false) => KingStatus::Checkmated,
            (false, false) => KingStatus::Stalemated,
        };
        if status.is_game_over() {
            debug!(%color, %status, ply = self.store.ply(), "game over");
        }
        status
    }

    /// Tests if `piece` ever moved, by looking for a position in the history
    /// where it stood on the origin of the update that followed.
    pub fn has_moved(&self, piece: &Piece) -> bool {
        self.store
            .positions()
            .iter()
            .zip(self.store.updates())
            .any(|(pos, update)| {
                pos.piece_at(update.from).as_ref() == Some(piece)
                    || update.castle.is_some_and(|castle| {
                        pos.piece_at(castle.rook_from).as_ref() == Some(piece)
                    })
            })
    }

    /// Sides on which `color` keeps an unmoved king on its backrank and an
    /// unmoved rook in the corner.
    pub fn castling_rights(&self, color: Color) -> CastlingRights {
        let pos = self.position();
        let mut rights = CastlingRights::empty();
        let Some(king_sq) = pos.king_of(color) else {
            return rights;
        };
        let Some(king) = pos.piece_at(king_sq) else {
            return rights;
        };
        if king_sq.rank() != color.backrank() || self.has_moved(&king) {
            return rights;
        }
        for side in CastlingSide::ALL {
            if self.castling_rook(side, color).is_some() {
                rights |= side.flag();
            }
        }
        rights
    }

    /// The unmoved rook of `color` in the corner of `side`.
    fn castling_rook(&self, side: CastlingSide, color: Color) -> Option<Square> {
        let corner = side.rook_from(color);
        self.position()
            .piece_at(corner)
            .filter(|rook| {
                rook.color == color && rook.role == Role::Rook && !self.has_moved(rook)
            })
            .map(|_| corner)
    }

    /// The square a pawn of the side to move could capture en passant on.
    pub fn en_passant_square(&self) -> Option<Square> {
        let us = self.turn();
        let last = self.store.last_update()?;
        self.position()
            .pieces_of(us)
            .find_map(|(from, piece)| self.en_passant(from, piece))
            .filter(|ep| ep.captured == last.to)
            .map(|ep| ep.to)
    }

    fn en_passant(&self, from: Square, piece: Piece) -> Option<EnPassant> {
        if piece.role != Role::Pawn || from.rank() != piece.color.en_passant_rank() {
            return None;
        }

        let last = self.store.last_update()?;
        let pushed = self.position().piece_at(last.to)?;
        if pushed.color == piece.color
            || pushed.role != Role::Pawn
            || last.from.file() != last.to.file()
            || last.to.rank().abs_diff(last.from.rank()) != 2
        {
            return None;
        }
        if last.to.rank() != from.rank() || last.to.file().abs_diff(from.file()) != 1 {
            return None;
        }

        let to = last.to.checked_offset(0, piece.color.pawn_step())?;
        if self.position().occupied().contains(to) {
            return None;
        }
        Some(EnPassant {
            to,
            captured: last.to,
        })
    }

    /// Legal destinations of `piece` on `from`, given the pieces checking
    /// its king.
    fn destinations(&self, from: Square, piece: Piece, checkers: Bitboard) -> Bitboard {
        if piece.role == Role::King {
            return self.king_destinations(from, piece);
        }

        let pos = self.position();
        let candidates = self.candidates(from, piece);
        let en_passant = self.en_passant(from, piece);

        let Some(king) = pos.king_of(piece.color) else {
            return match en_passant {
                Some(ep) => candidates.with(ep.to),
                None => candidates,
            };
        };

        let mut legal: Bitboard = candidates
            .into_iter()
            .filter(|&to| {
                resolves_check(king, checkers, to) && !self.is_pinned(king, from, to, piece.color)
            })
            .collect();

        if let Some(ep) = en_passant {
            // The capturing pawn and the captured pawn both leave their
            // squares, so the pin test is not enough.
            let occupied = pos.occupied().without(from).without(ep.captured).with(ep.to);
            if !self.is_attacked(
                king,
                !piece.color,
                occupied,
                Bitboard::from_square(ep.captured),
            ) {
                legal.add(ep.to);
            }
        }

        legal
    }

    /// Destinations by movement rules alone: blocked by pieces, never onto
    /// an own piece. No en passant.
    fn candidates(&self, from: Square, piece: Piece) -> Bitboard {
        let pos = self.position();
        let occupied = pos.occupied();

        if piece.role != Role::Pawn {
            return attacks(piece, from, occupied) & !pos.by_color(piece.color);
        }

        let mut targets = attacks(piece, from, occupied) & pos.by_color(!piece.color);
        let step = piece.color.pawn_step();
        if let Some(single) = from.checked_offset(0, step) {
            if !occupied.contains(single) {
                targets.add(single);
                if from.rank() == piece.color.pawn_rank() {
                    if let Some(double) = single.checked_offset(0, step) {
                        if !occupied.contains(double) {
                            targets.add(double);
                        }
                    }
                }
            }
        }
        targets
    }

    /// Tests if moving the piece on `from` to `to` opens a line from an
    /// enemy slider to `king`.
    fn is_pinned(&self, king: Square, from: Square, to: Square, us: Color) -> bool {
        let pos = self.position();
        let occupied = pos.occupied();

        let Some(step) = direction(king, from) else {
            return false;
        };
        if (between(king, from) & occupied).any() {
            return false;
        }

        let Some(pinner_sq) = walk(from, step, occupied, None).find(|&sq| occupied.contains(sq))
        else {
            return false;
        };
        let Some(pinner) = pos.piece_at(pinner_sq) else {
            return false;
        };
        if pinner.color == us || to == pinner_sq {
            return false;
        }

        // Landing on the line between king and pinner keeps it closed.
        threatens(pinner, pinner_sq, king, occupied.without(from), Some(to))
    }

    fn king_destinations(&self, from: Square, king: Piece) -> Bitboard {
        let pos = self.position();
        let them = !king.color;
        // The king does not shield squares behind itself.
        let occupied = pos.occupied().without(from);

        let mut legal: Bitboard = (attacks(king, from, occupied) & !pos.by_color(king.color))
            .into_iter()
            .filter(|&to| !self.is_attacked(to, them, occupied, Bitboard::EMPTY))
            .collect();

        legal |= self.castling_destinations(from, king);
        legal
    }

    fn castling_destinations(&self, from: Square, king: Piece) -> Bitboard {
        let pos = self.position();
        let color = king.color;
        let occupied = pos.occupied();

        if from.rank() != color.backrank() || self.has_moved(&king) {
            return Bitboard::EMPTY;
        }
        if self.is_attacked(from, !color, occupied, Bitboard::EMPTY) {
            return Bitboard::EMPTY;
        }

        let mut targets = Bitboard::EMPTY;
        for side in CastlingSide::ALL {
            let Some(corner) = self.castling_rook(side, color) else {
                continue;
            };
            let path = between(from, corner);
            if (path & occupied).any() {
                continue;
            }

            let transit = from.offset(side.direction(), 0);
            let to = from.offset(2 * side.direction(), 0);
            if !path.contains(to) {
                continue;
            }
            if [transit, to]
                .into_iter()
                .any(|sq| self.is_attacked(sq, !color, occupied, Bitboard::EMPTY))
            {
                continue;
            }

            targets.add(to);
        }
        targets
    }
}

/// With one checker, only capturing it or blocking its line resolves the
/// check. With two, no move but a king move does.
fn resolves_check(king: Square, checkers: Bitboard, to: Square) -> bool {
    if checkers.is_empty() {
        return true;
    }
    match checkers.single_square() {
        Some(checker) => to == checker || between(checker, king).contains(to),
        None => false,
    }
}
