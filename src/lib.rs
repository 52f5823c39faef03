pub mod attacks;
pub mod bitboard;
pub mod magic;
pub mod makemove;
pub mod movegen;
pub mod moves;
pub mod perft;
pub mod position;
pub mod tables;
pub mod types;

#[cfg(test)]
mod testutil;

pub use movegen::{game_status, generate_legal_moves, is_in_check, GameStatus};
pub use moves::{parse_move, Move, MoveFlag, ParseMoveError};
pub use position::Position;
pub use tables::Tables;
pub use types::{Color, Piece, PieceType};
