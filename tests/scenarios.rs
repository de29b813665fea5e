mod common;

use rochade::{
    Bitboard, Castle, Color, Game, KingStatus, Outcome, PromotionListener, Role, Rules, Square,
};

fn sq(name: &str) -> Square {
    name.parse().expect("square name")
}

fn play_all<L: PromotionListener>(game: &mut Game<L>, moves: &[(&str, &str)]) {
    for &(from, to) in moves {
        game.play(sq(from), sq(to))
            .unwrap_or_else(|err| panic!("{from}-{to}: {err}"));
    }
}

#[test]
fn test_scholars_mate() {
    let mut game = Game::standard();
    play_all(
        &mut game,
        &[
            ("e2", "e4"),
            ("e7", "e5"),
            ("f1", "c4"),
            ("b8", "c6"),
            ("d1", "h5"),
            ("g8", "f6"),
            ("h5", "f7"),
        ],
    );

    assert_eq!(game.turn(), Color::Dark);
    assert_eq!(game.rules().king_status(Color::Dark), KingStatus::Checkmated);
    let last = game.store().last_update().expect("last update");
    assert_eq!(last.king_status, KingStatus::Checkmated);
    assert_eq!(last.to_string(), "h5xf7#");
    assert_eq!(
        game.outcome(),
        Some(Outcome::Decisive {
            winner: Color::Light
        })
    );
    assert!(game.rules().legal_moves().is_empty());
}

#[test]
fn test_en_passant() {
    let mut game = Game::standard();
    play_all(
        &mut game,
        &[("e2", "e4"), ("a7", "a6"), ("e4", "e5"), ("d7", "d5")],
    );

    assert!(game.legal_destinations(sq("e5")).contains(sq("d6")));
    let update = game
        .validate_and_build_update(sq("e5"), sq("d6"))
        .expect("en passant is legal");
    let capture = update.capture.expect("capture");
    assert_eq!(capture.square, sq("d5"));
    assert_eq!(capture.piece.initial, sq("d7"));
    assert_eq!(update.to_string(), "e5xd6");

    game.apply(update).expect("applies");
    let pos = game.store().current_position();
    assert_eq!(pos.piece_at(sq("d5")), None);
    assert_eq!(pos.piece_at(sq("e5")), None);
    assert_eq!(pos.piece_at(sq("d6")).map(|p| p.initial), Some(sq("e2")));
    assert_eq!(pos.occupied().count(), 31);
}

#[test]
fn test_en_passant_expires() {
    let mut game = Game::standard();
    play_all(
        &mut game,
        &[
            ("e2", "e4"),
            ("a7", "a6"),
            ("e4", "e5"),
            ("d7", "d5"),
            ("g1", "f3"),
            ("a6", "a5"),
        ],
    );
    assert!(!game.legal_destinations(sq("e5")).contains(sq("d6")));
}

#[test]
fn test_castling_blocked_by_attacked_transit_square() {
    let game = Game::new(common::pieces("4kr2/8/8/8/8/8/8/R3K2R"));
    let targets = game.legal_destinations(sq("e1"));
    assert!(!targets.contains(sq("g1")));
    assert!(targets.contains(sq("c1")));
}

#[test]
fn test_castling_update() {
    let mut game = Game::new(common::pieces("r3k2r/8/8/8/8/8/8/R3K2R"));
    let update = game.play(sq("e1"), sq("g1")).expect("castles");
    assert_eq!(
        update.castle,
        Some(Castle {
            rook_from: sq("h1"),
            rook_to: sq("f1"),
        })
    );
    assert_eq!(update.to_string(), "O-O");

    let update = game.play(sq("e8"), sq("c8")).expect("castles");
    assert_eq!(update.to_string(), "O-O-O");

    let pos = game.store().current_position();
    assert_eq!(pos.piece_at(sq("f1")).map(|p| p.initial), Some(sq("h1")));
    assert_eq!(pos.piece_at(sq("g1")).map(|p| p.role), Some(Role::King));
    assert_eq!(pos.piece_at(sq("d8")).map(|p| p.initial), Some(sq("a8")));
    assert_eq!(pos.piece_at(sq("c8")).map(|p| p.role), Some(Role::King));
}

#[test]
fn test_castling_blocked_by_piece() {
    let game = Game::new(common::pieces("4k3/8/8/8/8/8/8/RN2K1NR"));
    let targets = game.legal_destinations(sq("e1"));
    assert!(!targets.contains(sq("c1")));
    assert!(!targets.contains(sq("g1")));
}

#[test]
fn test_stalemate() {
    let game = Game::new(common::pieces("8/8/8/8/8/1q6/2k5/K7"));
    assert_eq!(game.king_status(), KingStatus::Stalemated);
    assert_eq!(game.outcome(), Some(Outcome::Draw));
}

#[test]
fn test_pin() {
    let mut game = Game::new(common::pieces("k3r3/8/8/8/8/8/4R3/4K3"));
    let targets = game.legal_destinations(sq("e2"));
    assert!(targets.contains(sq("e3")));
    assert!(targets.contains(sq("e8")));
    assert!(!targets.contains(sq("d2")));
    assert!(!targets.contains(sq("f2")));
    assert!((targets & !Bitboard::file(4)).is_empty());
    assert!(game.validate_and_build_update(sq("e2"), sq("a2")).is_none());
}

#[test]
fn test_discovered_check_is_reported() {
    let mut game = Game::new(common::pieces("4k3/8/8/8/8/8/4N3/4RK2"));
    let update = game.play(sq("e2"), sq("c3")).expect("legal");
    assert_eq!(update.king_status, KingStatus::Checked);
    assert_eq!(update.to_string(), "e2-c3+");
}

#[derive(Debug, Default)]
struct Promotions {
    pending: Vec<Square>,
}

impl PromotionListener for Promotions {
    fn promotion_pending(&mut self, square: Square) {
        self.pending.push(square);
    }
}

#[test]
fn test_promotion_and_remote_replay() {
    let seed = common::pieces("7k/1P6/8/8/8/8/8/K7");

    let mut listener = Promotions::default();
    let mut local = Game::with_listener(seed.clone(), &mut listener);
    let update = local.play(sq("b7"), sq("b8")).expect("legal");
    assert_eq!(update.promotion, None);
    assert_eq!(local.pending_promotion(), Some(sq("b8")));
    assert!(local.validate_and_build_update(sq("h8"), sq("g7")).is_none());
    local.apply_promotion(Role::Queen).expect("promotes");

    let sent = *local.store().last_update().expect("last update");
    assert_eq!(sent.promotion, Some(Role::Queen));
    assert_eq!(sent.king_status, KingStatus::Checked);
    assert_eq!(sent.to_string(), "b7-b8=Q+");

    let local_pos = local.store().current_position().clone();
    drop(local);
    assert_eq!(listener.pending, [sq("b8")]);

    // The peer replays the update without validating it.
    let mut remote = Game::new(seed);
    remote.apply(sent).expect("applies");
    assert_eq!(*remote.store().current_position(), local_pos);
    assert_eq!(remote.pending_promotion(), None);
    assert_eq!(remote.king_status(), KingStatus::Checked);
}

#[test]
fn test_remote_promotion_choice_arrives_later() {
    let seed = common::pieces("7k/1P6/8/8/8/8/8/K7");

    let mut local = Game::new(seed.clone());
    let moved = local.play(sq("b7"), sq("b8")).expect("legal");
    assert_eq!(moved.promotion, None);

    // The peer gets the move first and the chosen role in a second message.
    let mut remote = Game::new(seed);
    remote.apply(moved).expect("applies");
    assert_eq!(remote.pending_promotion(), Some(sq("b8")));
    assert!(remote.validate_and_build_update(sq("h8"), sq("g8")).is_none());

    local.apply_promotion(Role::Queen).expect("promotes");
    remote.apply_promotion(Role::Queen).expect("promotes");

    assert_eq!(remote.pending_promotion(), None);
    assert_eq!(
        remote.store().current_position(),
        local.store().current_position()
    );
    assert_eq!(remote.store().last_update(), local.store().last_update());
    assert_eq!(remote.king_status(), KingStatus::Checked);
}

#[test]
fn test_remote_update_off_the_board_is_rejected() {
    let mut remote = Game::standard();
    let off_board = rochade::Update::new(sq("e2"), Square::new(4, 9));
    assert_eq!(
        remote.apply(off_board),
        Err(rochade::PlayError::OffBoard {
            square: Square::new(4, 9)
        })
    );
    assert_eq!(remote.store().ply(), 0);
    assert_eq!(remote.store().current_position().occupied().count(), 32);
}

#[test]
fn test_underpromotion() {
    let mut game = Game::new(common::pieces("7k/1P6/8/8/8/8/8/K7"));
    game.play(sq("b7"), sq("b8")).expect("legal");
    game.apply_promotion(Role::Rook).expect("promotes");
    assert_eq!(game.king_status(), KingStatus::Checked);
    game.play(sq("h8"), sq("h7")).expect("legal");
    assert_eq!(
        game.store()
            .current_position()
            .piece_at(sq("b8"))
            .map(|p| p.role),
        Some(Role::Rook)
    );
}

#[test]
fn test_history_navigation() {
    let mut game = Game::standard();
    play_all(&mut game, &[("g1", "f3"), ("g8", "f6"), ("f3", "g1")]);

    let store = game.store();
    assert_eq!(store.ply(), 3);
    assert_eq!(store.positions().len(), 4);
    assert_eq!(store.turn(), Color::Dark);
    assert_eq!(store.update_at(1).map(|u| u.from), Some(sq("g8")));
    assert_eq!(store.update_at(3), None);

    let knight = store
        .position_at(0)
        .and_then(|pos| pos.piece_at(sq("g1")))
        .expect("knight");
    assert_eq!(store.position_at(1).unwrap().square_of(&knight), Some(sq("f3")));
    assert_eq!(store.position_at(3).unwrap().square_of(&knight), Some(sq("g1")));
    assert!(game.rules().has_moved(&knight));

    for (index, pair) in store.positions().windows(2).enumerate() {
        let update = store.update_at(index).unwrap();
        assert_eq!(pair[0].after(update).as_ref(), Ok(&pair[1]));
    }
}

#[test]
fn test_idempotence_and_round_trip() {
    let mut game = Game::standard();
    play_all(&mut game, &[("e2", "e4"), ("d7", "d5")]);

    let rules = game.rules();
    for (from, targets) in rules.legal_moves() {
        assert_eq!(rules.legal_destinations(from), targets);
    }

    for (from, to) in [("e4", "d5"), ("d1", "h5"), ("f1", "b5")] {
        let mut next = game.store().clone();
        let update = Rules::new(&next)
            .validate(sq(from), sq(to))
            .expect("legal");
        next.apply(update).expect("applies");
        assert!(!Rules::new(&next)
            .legal_destinations(sq(to))
            .contains(sq(to)));
    }
}

#[test]
fn test_wrong_turn_and_off_board() {
    let mut game = Game::standard();
    assert!(game.validate_and_build_update(sq("e7"), sq("e5")).is_none());
    assert!(game
        .validate_and_build_update(Square::new(4, 1), Square::new(4, 8))
        .is_none());
    assert!(game
        .validate_and_build_update(Square::new(-1, 0), sq("a3"))
        .is_none());
    assert!(game.validate_and_build_update(sq("e4"), sq("e5")).is_none());
    assert_eq!(game.legal_destinations(Square::new(9, 9)), Bitboard::EMPTY);
}

#[cfg(feature = "serde")]
#[test]
fn test_update_is_serializable() {
    fn assert_serde<T: serde::Serialize + serde::de::DeserializeOwned>() {}
    assert_serde::<rochade::Update>();
    assert_serde::<rochade::Piece>();
    assert_serde::<KingStatus>();
}
