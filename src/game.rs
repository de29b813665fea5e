//! A game in progress: history, pending promotion and the promotion
//! listener.

use std::{error::Error, fmt};

use tracing::{debug, trace};

use crate::{
    bitboard::Bitboard,
    color::Color,
    role::Role,
    rules::Rules,
    setup,
    square::Square,
    store::{PlayError, PositionStore},
    types::{KingStatus, Outcome, Piece},
    update::Update,
};

/// Receives the event that a pawn reached its last rank and a promotion role
/// must be chosen with [`Game::apply_promotion()`].
///
/// `()` ignores the event.
pub trait PromotionListener {
    fn promotion_pending(&mut self, square: Square);
}

impl PromotionListener for () {
    fn promotion_pending(&mut self, _square: Square) {}
}

impl<L: PromotionListener + ?Sized> PromotionListener for &mut L {
    fn promotion_pending(&mut self, square: Square) {
        (**self).promotion_pending(square);
    }
}

/// Error when resolving a promotion.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PromotionError {
    /// No pawn is waiting for a promotion role.
    NoPendingPromotion,
    /// The move that reached the last rank has not been applied yet.
    NotApplied { square: Square },
    /// The move that reached the last rank is already in the history, so
    /// the promotion can no longer be cancelled.
    AlreadyApplied { square: Square },
    /// Pawns cannot promote to kings or pawns.
    InvalidRole { role: Role },
}

impl fmt::Display for PromotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PromotionError::NoPendingPromotion => f.write_str("no promotion pending"),
            PromotionError::NotApplied { square } => {
                write!(f, "move to promotion square {square} not applied yet")
            }
            PromotionError::AlreadyApplied { square } => {
                write!(f, "move to promotion square {square} already applied")
            }
            PromotionError::InvalidRole { role } => write!(f, "cannot promote to {role}"),
        }
    }
}

impl Error for PromotionError {}

#[derive(Copy, Clone, Debug)]
struct PendingPromotion {
    square: Square,
    applied: bool,
}

/// A game: the [`PositionStore`] plus the promotion flow.
///
/// Moves go through [`Game::validate_and_build_update()`] and
/// [`Game::apply()`], or both at once through [`Game::play()`]. Updates
/// received from a peer are replayed with [`Game::apply()`] directly.
///
/// # Examples
///
/// ```
/// use rochade::{Game, KingStatus, Outcome, Color, Square};
///
/// let mut game = Game::standard();
/// for (from, to) in [
///     (Square::F2, Square::F3),
///     (Square::E7, Square::E5),
///     (Square::G2, Square::G4),
///     (Square::D8, Square::H4),
/// ] {
///     game.play(from, to)?;
/// }
///
/// assert_eq!(game.king_status(), KingStatus::Checkmated);
/// assert_eq!(game.outcome(), Some(Outcome::Decisive { winner: Color::Dark }));
/// # Ok::<_, rochade::PlayError>(())
/// ```
#[derive(Debug)]
pub struct Game<L: PromotionListener = ()> {
    store: PositionStore,
    pending_promotion: Option<PendingPromotion>,
    listener: L,
}

impl Game<()> {
    /// A game starting from the given pieces, each on its `initial` square.
    pub fn new<I>(pieces: I) -> Game
    where
        I: IntoIterator<Item = Piece>,
    {
        Game::with_listener(pieces, ())
    }

    /// A game from the standard starting position.
    pub fn standard() -> Game {
        Game::new(setup::standard_pieces())
    }
}

impl<L: PromotionListener> Game<L> {
    pub fn with_listener<I>(pieces: I, listener: L) -> Game<L>
    where
        I: IntoIterator<Item = Piece>,
    {
        Game {
            store: PositionStore::new(pieces),
            pending_promotion: None,
            listener,
        }
    }

    /// Starts over from the given pieces.
    pub fn reset<I>(&mut self, pieces: I)
    where
        I: IntoIterator<Item = Piece>,
    {
        self.store.reset(pieces);
        self.pending_promotion = None;
    }

    #[inline]
    pub fn store(&self) -> &PositionStore {
        &self.store
    }

    #[inline]
    pub fn rules(&self) -> Rules<'_> {
        Rules::new(&self.store)
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    pub fn into_listener(self) -> L {
        self.listener
    }

    #[inline]
    pub fn turn(&self) -> Color {
        self.store.turn()
    }

    /// The square of the pawn waiting for a promotion role.
    #[inline]
    pub fn pending_promotion(&self) -> Option<Square> {
        self.pending_promotion.map(|pending| pending.square)
    }

    /// Legal destinations of the piece on `from`. Nothing may move while a
    /// promotion is pending.
    pub fn legal_destinations(&self, from: Square) -> Bitboard {
        if self.pending_promotion.is_some() {
            return Bitboard::EMPTY;
        }
        self.rules().legal_destinations(from)
    }

    /// Validates the move and builds its update, without applying it.
    ///
    /// If a pawn reaches its last rank, a promotion becomes pending on the
    /// destination square and the listener is notified. The returned update
    /// then has no promotion role yet. If it is not applied after all, drop
    /// the promotion with [`Game::cancel_promotion()`].
    pub fn validate_and_build_update(&mut self, from: Square, to: Square) -> Option<Update> {
        if let Some(square) = self.pending_promotion() {
            trace!(%from, %to, %square, "rejected: promotion pending");
            return None;
        }

        let rules = self.rules();
        let update = rules.validate(from, to)?;
        if rules.requires_promotion(&update) {
            debug!(square = %to, "promotion pending");
            self.pending_promotion = Some(PendingPromotion {
                square: to,
                applied: false,
            });
            self.listener.promotion_pending(to);
        }
        Some(update)
    }

    /// Appends `update` to the history without validating it.
    ///
    /// An update that moves a pawn to its last rank without a promotion role
    /// leaves a promotion pending, to be completed with
    /// [`Game::apply_promotion()`]. This is how a peer's move and its later
    /// promotion choice are replayed. The listener is only notified by
    /// [`Game::validate_and_build_update()`].
    ///
    /// # Errors
    ///
    /// Returns [`PlayError`] if the update does not fit the current
    /// position. The history and the pending promotion are unchanged in
    /// this case.
    pub fn apply(&mut self, update: Update) -> Result<(), PlayError> {
        let promotes = self.rules().requires_promotion(&update);
        self.store.apply(update)?;
        self.pending_promotion = promotes.then_some(PendingPromotion {
            square: update.to,
            applied: true,
        });
        Ok(())
    }

    /// Validates and applies the move in one step.
    ///
    /// # Errors
    ///
    /// Returns [`PlayError::IllegalMove`] if the move is not legal.
    pub fn play(&mut self, from: Square, to: Square) -> Result<Update, PlayError> {
        let update = self
            .validate_and_build_update(from, to)
            .ok_or(PlayError::IllegalMove { from, to })?;
        if let Err(err) = self.apply(update) {
            self.pending_promotion = None;
            return Err(err);
        }
        Ok(update)
    }

    /// Drops a promotion flagged by [`Game::validate_and_build_update()`]
    /// whose move was never applied, returning its square.
    ///
    /// # Errors
    ///
    /// Returns [`PromotionError::NoPendingPromotion`] if nothing is pending
    /// and [`PromotionError::AlreadyApplied`] if the pawn already stands on
    /// its last rank. That promotion must be completed.
    pub fn cancel_promotion(&mut self) -> Result<Square, PromotionError> {
        let pending = self
            .pending_promotion
            .ok_or(PromotionError::NoPendingPromotion)?;
        if pending.applied {
            return Err(PromotionError::AlreadyApplied {
                square: pending.square,
            });
        }
        self.pending_promotion = None;
        debug!(square = %pending.square, "promotion cancelled");
        Ok(pending.square)
    }

    /// Completes a pending promotion: the pawn on the pending square becomes
    /// a piece of `role`, the last update records the role, and its king
    /// status is computed again.
    ///
    /// # Errors
    ///
    /// Returns [`PromotionError`] if no promotion is pending, `role` is not
    /// a promotion role, or the promoting move was not applied yet. The
    /// promotion stays pending unless none was pending in the first place.
    pub fn apply_promotion(&mut self, role: Role) -> Result<(), PromotionError> {
        let PendingPromotion { square, applied } = self
            .pending_promotion
            .ok_or(PromotionError::NoPendingPromotion)?;
        if !role.is_promotion() {
            return Err(PromotionError::InvalidRole { role });
        }
        if !applied || !self.store.promote_last(square, role) {
            return Err(PromotionError::NotApplied { square });
        }

        let status = self.rules().king_status(self.turn());
        if let Some(update) = self.store.last_update_mut() {
            update.king_status = status;
        }
        self.pending_promotion = None;
        debug!(%square, %role, %status, "promotion applied");
        Ok(())
    }

    /// Status of the king of the side to move.
    pub fn king_status(&self) -> KingStatus {
        self.rules().king_status(self.turn())
    }

    /// `Some` once the side to move is checkmated or stalemated.
    pub fn outcome(&self) -> Option<Outcome> {
        Outcome::from_king_status(self.turn(), self.king_status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Recorder {
        squares: Vec<Square>,
    }

    impl PromotionListener for Recorder {
        fn promotion_pending(&mut self, square: Square) {
            self.squares.push(square);
        }
    }

    fn promotion_game() -> Game<Recorder> {
        Game::with_listener(
            [
                Piece::new(Square::E1, Color::Light, Role::King),
                Piece::new(Square::B7, Color::Light, Role::Pawn),
                Piece::new(Square::H8, Color::Dark, Role::King),
            ],
            Recorder::default(),
        )
    }

    #[test]
    fn test_promotion_flow() {
        let mut game = promotion_game();
        let update = game.validate_and_build_update(Square::B7, Square::B8).unwrap();
        assert_eq!(update.promotion, None);
        assert_eq!(game.pending_promotion(), Some(Square::B8));
        assert_eq!(game.listener().squares, [Square::B8]);

        // Nothing else moves until the promotion is resolved.
        assert_eq!(game.legal_destinations(Square::E1), Bitboard::EMPTY);
        assert_eq!(game.validate_and_build_update(Square::E1, Square::E2), None);

        assert_eq!(
            game.apply_promotion(Role::Queen),
            Err(PromotionError::NotApplied { square: Square::B8 })
        );
        game.apply(update).unwrap();
        assert_eq!(
            game.apply_promotion(Role::King),
            Err(PromotionError::InvalidRole { role: Role::King })
        );
        game.apply_promotion(Role::Queen).unwrap();

        assert_eq!(game.pending_promotion(), None);
        let last = game.store().last_update().unwrap();
        assert_eq!(last.promotion, Some(Role::Queen));
        assert_eq!(last.king_status, KingStatus::Checked);
        assert_eq!(game.king_status(), KingStatus::Checked);
        assert_eq!(
            game.store()
                .current_position()
                .piece_at(Square::B8)
                .map(|piece| (piece.initial, piece.role)),
            Some((Square::B7, Role::Queen))
        );
        assert_eq!(
            game.apply_promotion(Role::Rook),
            Err(PromotionError::NoPendingPromotion)
        );
    }

    #[test]
    fn test_cancel_promotion() {
        let mut game = promotion_game();
        assert_eq!(
            game.cancel_promotion(),
            Err(PromotionError::NoPendingPromotion)
        );

        // The update for b7-b8 is dropped instead of applied.
        game.validate_and_build_update(Square::B7, Square::B8).unwrap();
        assert_eq!(game.validate_and_build_update(Square::E1, Square::E2), None);
        assert_eq!(game.cancel_promotion(), Ok(Square::B8));
        assert_eq!(game.pending_promotion(), None);
        assert!(game.validate_and_build_update(Square::E1, Square::E2).is_some());

        game.play(Square::B7, Square::B8).unwrap();
        assert_eq!(
            game.cancel_promotion(),
            Err(PromotionError::AlreadyApplied { square: Square::B8 })
        );
        assert_eq!(game.pending_promotion(), Some(Square::B8));
        assert_eq!(game.listener().squares, [Square::B8, Square::B8]);
    }

    #[test]
    fn test_apply_flags_promotion_without_role() {
        let mut game = promotion_game();
        game.apply(Update::new(Square::B7, Square::B8)).unwrap();
        assert_eq!(game.pending_promotion(), Some(Square::B8));
        // Only validation notifies the listener.
        assert!(game.listener().squares.is_empty());
        assert_eq!(game.legal_destinations(Square::H8), Bitboard::EMPTY);

        game.apply_promotion(Role::Knight).unwrap();
        assert_eq!(game.pending_promotion(), None);
        assert_eq!(
            game.store().last_update().map(|update| update.promotion),
            Some(Some(Role::Knight))
        );

        // An update that already names the role leaves nothing pending.
        let mut game = promotion_game();
        let mut update = Update::new(Square::B7, Square::B8);
        update.promotion = Some(Role::Queen);
        game.apply(update).unwrap();
        assert_eq!(game.pending_promotion(), None);

        // A failed apply keeps nothing pending.
        let mut game = promotion_game();
        assert!(game.apply(Update::new(Square::B6, Square::B8)).is_err());
        assert_eq!(game.pending_promotion(), None);
    }

    #[test]
    fn test_reset_clears_pending_promotion() {
        let mut game = promotion_game();
        game.play(Square::B7, Square::B8).unwrap();
        assert!(game.pending_promotion().is_some());
        game.reset(setup::standard_pieces());
        assert_eq!(game.pending_promotion(), None);
        assert_eq!(game.store().ply(), 0);
        assert_eq!(game.legal_destinations(Square::B1).count(), 2);
    }

    #[test]
    fn test_illegal_move() {
        let mut game = Game::standard();
        assert_eq!(
            game.play(Square::E2, Square::E5),
            Err(PlayError::IllegalMove {
                from: Square::E2,
                to: Square::E5
            })
        );
        assert_eq!(game.store().ply(), 0);
    }
}
