//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use magic_movegen::bitboard::square;
use magic_movegen::types::parse_square;
use magic_movegen::{Color, Piece, Position, Tables};
use once_cell::sync::Lazy;

pub static TABLES: Lazy<Tables> = Lazy::new(Tables::new);

/// "Kiwipete", the standard stress position for castling, en passant and pins
pub const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
pub const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
pub const POSITION_4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
pub const POSITION_5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";
pub const POSITION_6: &str =
    "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10";

/// Build a position from a FEN string. Panics on malformed input.
pub fn position_from_fen(fen: &str) -> Position {
    let parts: Vec<&str> = fen.split_whitespace().collect();
    assert!(parts.len() >= 4, "FEN needs at least 4 fields: {fen}");

    let mut position = Position::empty();
    for (i, row) in parts[0].split('/').enumerate() {
        let rank = 7 - i as u8;
        let mut file = 0u8;
        for c in row.chars() {
            match c.to_digit(10) {
                Some(skip) => file += skip as u8,
                None => {
                    let piece = Piece::from_char(c)
                        .unwrap_or_else(|| panic!("Unexpected char {c} in position string."));
                    position.put(piece, square(file, rank));
                    file += 1;
                }
            }
        }
    }

    position.set_active_color(if parts[1] == "w" {
        Color::White
    } else {
        Color::Black
    });
    let castling = parts[2];
    position.set_castling_rights(Color::White, castling.contains('K'), castling.contains('Q'));
    position.set_castling_rights(Color::Black, castling.contains('k'), castling.contains('q'));
    if parts[3] != "-" {
        position.set_en_passant_target(Some(parse_square(parts[3]).unwrap()));
    }
    if let [halfmove, fullmove] = &parts[4..] {
        position.set_clocks(halfmove.parse().unwrap(), fullmove.parse().unwrap());
    }
    position
}
