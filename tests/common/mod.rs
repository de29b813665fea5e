use rochade::{Color, Piece, Role, Square};

/// Pieces of a board diagram in FEN board notation, ranks from 8 down to 1,
/// each piece with its current square as `initial`.
pub fn pieces(board: &str) -> Vec<Piece> {
    let mut pieces = Vec::new();
    for (rank, row) in (0..8).rev().zip(board.split('/')) {
        let mut file = 0;
        for ch in row.chars() {
            if let Some(skip) = ch.to_digit(10) {
                file += skip as i8;
            } else {
                let role = Role::from_char(ch).expect("piece letter");
                let color = Color::from_light(ch.is_ascii_uppercase());
                pieces.push(Piece::new(Square::new(file, rank), color, role));
                file += 1;
            }
        }
        assert_eq!(file, 8, "rank {} of {board} has wrong length", rank + 1);
    }
    pieces
}
