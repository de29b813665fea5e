//! Cross-checks the legality filters against brute force: play each
//! candidate and look at the own king.

mod common;

use rochade::{
    attacks, Bitboard, Color, KingStatus, Piece, Position, PositionStore, Role, Rules, Square,
    Update,
};

const SEEDS: [&str; 5] = [
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R",
];

/// Movement rules only, no castling and no en passant.
fn pseudo_targets(pos: &Position, from: Square, piece: Piece) -> Bitboard {
    let occupied = pos.occupied();
    if piece.role != Role::Pawn {
        return attacks::attacks(piece, from, occupied) & !pos.by_color(piece.color);
    }

    let mut targets = attacks::attacks(piece, from, occupied) & pos.by_color(!piece.color);
    let step = piece.color.pawn_step();
    let single = from.offset(0, step);
    if single.is_in_bounds() && !occupied.contains(single) {
        targets.add(single);
        let double = single.offset(0, step);
        if from.rank() == piece.color.pawn_rank() && !occupied.contains(double) {
            targets.add(double);
        }
    }
    targets
}

fn leaves_king_safe(store: &PositionStore, update: Update, us: Color) -> bool {
    let mut next = store.clone();
    next.apply(update).expect("update fits");
    Rules::new(&next).checkers(us).is_empty()
}

fn plain_update(pos: &Position, from: Square, to: Square) -> Update {
    let mut update = Update::new(from, to);
    update.capture = pos.piece_at(to).map(|piece| rochade::Capture { piece, square: to });
    update
}

fn check_position(store: &PositionStore) {
    let rules = Rules::new(store);
    let pos = store.current_position();
    let us = store.turn();
    let mut any_legal = false;

    for (from, piece) in pos.pieces_of(us) {
        let engine = rules.legal_destinations(from);
        let mut brute = Bitboard::EMPTY;
        for to in pseudo_targets(pos, from, piece) {
            if leaves_king_safe(store, plain_update(pos, from, to), us) {
                brute.add(to);
            }
        }

        // Castling and en passant are what the engine adds on top.
        for to in engine & !brute {
            let update = rules.validate(from, to).unwrap_or_else(|| {
                panic!("{from}-{to} in legal destinations but rejected\n{pos}")
            });
            assert!(
                update.is_castle() || update.is_en_passant(),
                "{from}-{to} should not be legal\n{pos}"
            );
            assert!(leaves_king_safe(store, update, us));
        }
        assert_eq!(
            brute & !engine,
            Bitboard::EMPTY,
            "legal moves of {from} missing\n{pos}"
        );

        any_legal |= engine.any();
    }

    let in_check = rules.checkers(us).any();
    let expected = match (in_check, any_legal) {
        (false, true) => KingStatus::Normal,
        (true, true) => KingStatus::Checked,
        (true, false) => KingStatus::Checkmated,
        (false, false) => KingStatus::Stalemated,
    };
    assert_eq!(rules.king_status(us), expected, "\n{pos}");
}

fn walk_tree(store: &PositionStore, depth: u32) {
    check_position(store);
    if depth == 0 {
        return;
    }

    let rules = Rules::new(store);
    for (from, targets) in rules.legal_moves() {
        for to in targets {
            let mut update = rules.validate(from, to).expect("legal");
            if rules.requires_promotion(&update) {
                update.promotion = Some(Role::Queen);
            }
            let mut next = store.clone();
            next.apply(update).expect("update fits");
            walk_tree(&next, depth - 1);
        }
    }
}

#[test]
fn test_consistency_shallow() {
    for seed in SEEDS {
        walk_tree(&PositionStore::new(common::pieces(seed)), 1);
    }
}

#[test]
#[ignore]
fn test_consistency_two_plies() {
    for seed in SEEDS {
        walk_tree(&PositionStore::new(common::pieces(seed)), 2);
    }
}

#[test]
fn test_update_king_status_matches_next_position() {
    let store = PositionStore::new(common::pieces(SEEDS[1]));
    let rules = Rules::new(&store);
    for (from, targets) in rules.legal_moves() {
        for to in targets {
            let update = rules.validate(from, to).expect("legal");
            let mut next = store.clone();
            next.apply(update).expect("update fits");
            let next_rules = Rules::new(&next);
            assert_eq!(update.king_status, next_rules.king_status(next.turn()));
        }
    }
}
