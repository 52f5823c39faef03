//! Position fixtures for unit tests, written in FEN.

use crate::bitboard::square;
use crate::position::Position;
use crate::types::{parse_square, Color, Piece};

pub fn position_from_fen(fen: &str) -> Position {
    let parts: Vec<&str> = fen.split_whitespace().collect();
    assert!(parts.len() >= 4, "FEN needs at least 4 fields: {fen}");

    let mut position = Position::empty();
    for (i, row) in parts[0].split('/').enumerate() {
        let rank = 7 - i as u8;
        let mut file = 0u8;
        for c in row.chars() {
            if let Some(skip) = c.to_digit(10) {
                file += skip as u8;
            } else {
                let piece = Piece::from_char(c)
                    .unwrap_or_else(|| panic!("Unexpected char {c} in position string."));
                position.put(piece, square(file, rank));
                file += 1;
            }
        }
    }

    position.set_active_color(match parts[1] {
        "w" => Color::White,
        _ => Color::Black,
    });
    position.set_castling_rights(Color::White, parts[2].contains('K'), parts[2].contains('Q'));
    position.set_castling_rights(Color::Black, parts[2].contains('k'), parts[2].contains('q'));
    if parts[3] != "-" {
        position.set_en_passant_target(Some(parse_square(parts[3]).unwrap()));
    }
    if let [halfmove, fullmove] = &parts[4..] {
        position.set_clocks(halfmove.parse().unwrap(), fullmove.parse().unwrap());
    }
    position
}
