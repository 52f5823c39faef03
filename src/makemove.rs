//! Applying and retracting moves on a [`Position`].

use log::{trace, warn};

use crate::moves::{Move, MoveFlag};
use crate::position::{Position, UndoInfo};
use crate::types::{square_name, Color, Piece, PieceType};

const A1: u8 = 0;
const E1: u8 = 4;
const H1: u8 = 7;
const A8: u8 = 56;
const E8: u8 = 60;
const H8: u8 = 63;

/// Rook start and end squares for a castle landing the king on `king_to`
fn castle_rook_squares(flag: MoveFlag, king_to: u8) -> (u8, u8) {
    if flag == MoveFlag::CastleKingside {
        (king_to + 1, king_to - 1)
    } else {
        (king_to - 2, king_to + 1)
    }
}

/// Square of the pawn taken by an en passant capture landing on `to`
fn en_passant_victim(color: Color, to: u8) -> u8 {
    match color {
        Color::White => to - 8,
        Color::Black => to + 8,
    }
}

impl Position {
    /// Play `mv` for the side to move.
    ///
    /// `mv` must come from [`crate::movegen::generate_legal_moves`] for this position; the
    /// move is not validated again.
    pub fn apply_move(&mut self, mv: Move) {
        let (from, to, flag) = (mv.from(), mv.to(), mv.flag());
        let color = self.active_color;
        let moving = match self.remove(from) {
            Some(piece) => piece,
            None => panic!("No piece on {} to play {}", square_name(from), mv),
        };

        let mut undo = UndoInfo {
            mv,
            captured: None,
            castle_kingside: self.castle_kingside,
            castle_queenside: self.castle_queenside,
            en_passant_target: self.en_passant_target.take(),
            halfmove_clock: self.halfmove_clock,
        };
        self.update_castling_rights(from, to);

        match flag {
            MoveFlag::CastleKingside | MoveFlag::CastleQueenside => {
                let (rook_from, rook_to) = castle_rook_squares(flag, to);
                let rook = Piece::new(color, PieceType::Rook);
                self.toggle(rook, rook_from);
                self.toggle(rook, rook_to);
            }
            MoveFlag::EnPassantCapture => {
                undo.captured = self.remove(en_passant_victim(color, to));
            }
            MoveFlag::DoublePawnPush => {
                self.en_passant_target = Some((from + to) / 2);
            }
            _ if flag.is_capture() => {
                undo.captured = self.remove(to);
            }
            _ => {}
        }

        let placed = match flag.promotion_piece() {
            Some(piece_type) => Piece::new(color, piece_type),
            None => moving,
        };
        self.toggle(placed, to);

        if moving.piece_type == PieceType::Pawn || undo.captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if color == Color::Black {
            self.fullmove_number += 1;
        }
        self.active_color = color.other_color();
        self.undo_log.push(undo);

        trace!("{} plays {} ({})", color.to_human(), mv, mv.to_human());
    }

    /// Retract the last applied move, returning it. Does nothing on an empty undo log.
    pub fn unmake_move(&mut self) -> Option<Move> {
        let Some(undo) = self.undo_log.pop() else {
            warn!("unmake_move called with no move to take back");
            return None;
        };
        let mv = undo.mv;
        let (from, to, flag) = (mv.from(), mv.to(), mv.flag());
        let color = self.active_color.other_color();
        self.active_color = color;

        let placed = match self.remove(to) {
            Some(piece) => piece,
            None => unreachable!("undo log out of sync with the board at {}", square_name(to)),
        };
        let moving = if flag.is_promotion() {
            Piece::new(color, PieceType::Pawn)
        } else {
            placed
        };
        self.toggle(moving, from);

        match (flag, undo.captured) {
            (MoveFlag::CastleKingside | MoveFlag::CastleQueenside, _) => {
                let (rook_from, rook_to) = castle_rook_squares(flag, to);
                let rook = Piece::new(color, PieceType::Rook);
                self.toggle(rook, rook_to);
                self.toggle(rook, rook_from);
            }
            (MoveFlag::EnPassantCapture, Some(captured)) => {
                self.toggle(captured, en_passant_victim(color, to));
            }
            (_, Some(captured)) => self.toggle(captured, to),
            (_, None) => {}
        }

        self.castle_kingside = undo.castle_kingside;
        self.castle_queenside = undo.castle_queenside;
        self.en_passant_target = undo.en_passant_target;
        self.halfmove_clock = undo.halfmove_clock;
        if color == Color::Black {
            self.fullmove_number -= 1;
        }

        trace!("{} takes back {}", color.to_human(), mv);
        Some(mv)
    }

    /// A move from or to a rook's corner loses that side, a king move loses both.
    /// Rights are only ever cleared here, never restored except by unmake.
    fn update_castling_rights(&mut self, from: u8, to: u8) {
        for sq in [from, to] {
            match sq {
                A1 => self.castle_queenside[Color::White as usize] = false,
                H1 => self.castle_kingside[Color::White as usize] = false,
                A8 => self.castle_queenside[Color::Black as usize] = false,
                H8 => self.castle_kingside[Color::Black as usize] = false,
                _ => {}
            }
        }
        match from {
            E1 => self.set_castling_rights(Color::White, false, false),
            E8 => self.set_castling_rights(Color::Black, false, false),
            _ => {}
        }
    }
}
