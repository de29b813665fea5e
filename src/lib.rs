//! A chess rules engine over an append-only game history.
//!
//! The [`PositionStore`] keeps every position of a game together with the
//! [`Update`]s between them. [`Rules`] answers legality questions over the
//! current position and its history: legal destinations, validation,
//! checks, checkmate and stalemate. [`Game`] ties both together with the
//! promotion flow.
//!
//! # Examples
//!
//! Ask for the legal destinations of a piece:
//!
//! ```
//! use rochade::{Game, Square};
//!
//! let game = Game::standard();
//! let targets = game.legal_destinations(Square::E2);
//! assert!(targets.contains(Square::E3));
//! assert!(targets.contains(Square::E4));
//! assert_eq!(targets.count(), 2);
//! ```
//!
//! Validate a move and submit the update:
//!
//! ```
//! use rochade::{Game, Square};
//!
//! let mut game = Game::standard();
//! let update = game.validate_and_build_update(Square::G1, Square::F3).expect("legal");
//! game.apply(update)?;
//! assert_eq!(game.store().ply(), 1);
//! # Ok::<_, rochade::PlayError>(())
//! ```
//!
//! Detect game end conditions:
//!
//! ```
//! # use rochade::{Game, KingStatus};
//! # let game = Game::standard();
//! assert_eq!(game.king_status(), KingStatus::Normal);
//! assert_eq!(game.outcome(), None); // no winner yet
//! ```
//!
//! # Feature flags
//!
//! * `serde`: Implements [`serde::Serialize`](https://docs.rs/serde/1/serde/trait.Serialize.html)
//!   and [`serde::Deserialize`](https://docs.rs/serde/1/serde/trait.Deserialize.html) for
//!   the vocabulary types and [`Update`], so that updates can be sent to a
//!   peer and replayed there with [`Game::apply()`].

#![warn(missing_debug_implementations)]
#![cfg_attr(docs_rs, feature(doc_cfg))]

mod castling_side;
mod color;
mod game;
mod perft;
mod position;
mod role;
mod rules;
mod square;
mod store;
mod types;
mod update;

pub mod attacks;
pub mod bitboard;
pub mod setup;

pub use bitboard::Bitboard;
pub use castling_side::{CastlingRights, CastlingSide};
pub use color::{Color, ParseColorError};
pub use game::{Game, PromotionError, PromotionListener};
pub use perft::perft;
pub use position::Position;
pub use role::{ParseRoleError, Role};
pub use rules::{MoveList, Rules};
pub use square::{ParseSquareError, Square};
pub use store::{PlayError, PositionStore};
pub use types::{KingStatus, Outcome, Piece};
pub use update::{Capture, Castle, Update};
