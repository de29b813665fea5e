//! Count legal move paths.
//!
//! # Examples
//!
//! ```
//! use rochade::{perft, setup, PositionStore};
//!
//! let store = PositionStore::new(setup::standard_pieces());
//! assert_eq!(perft(&store, 1), 20);
//! assert_eq!(perft(&store, 2), 400);
//! assert_eq!(perft(&store, 3), 8902);
//! ```

use crate::{role::Role, rules::Rules, store::PositionStore, update::Update};

/// Counts legal move paths of a given length.
///
/// Each move of a pawn to its last rank counts once per promotion role.
/// Paths with mate or stalemate are not counted unless it occurs in the
/// final position. Useful for comparing, testing and debugging move
/// generation correctness and performance.
pub fn perft(store: &PositionStore, depth: u32) -> u64 {
    if depth < 1 {
        return 1;
    }

    let rules = Rules::new(store);
    let mut nodes = 0;
    for (from, targets) in rules.legal_moves() {
        for to in targets {
            let update = rules.build_update(from, to);
            if rules.requires_promotion(&update) {
                for role in Role::PROMOTIONS {
                    nodes += child(
                        store,
                        Update {
                            promotion: Some(role),
                            ..update
                        },
                        depth,
                    );
                }
            } else {
                nodes += child(store, update, depth);
            }
        }
    }
    nodes
}

fn child(store: &PositionStore, update: Update, depth: u32) -> u64 {
    if depth == 1 {
        return 1;
    }
    let mut next = store.clone();
    next.apply(update).expect("legal update fits");
    perft(&next, depth - 1)
}
