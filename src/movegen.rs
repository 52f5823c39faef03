//! Legal move generation.
//!
//! Moves are produced fully legal in a single pass. The opponent's attacks are computed with
//! the king lifted off the board, so the king can't step back along a checking ray. A check
//! confines every other move to the squares that block it or capture the checker, and a
//! pinned piece may only move along the line between its king and the pinner.

use crate::attacks::Direction;
use crate::bitboard::{bitscan_forward, pop_count, sq_to_bb, BitboardIter, RANK_1, RANK_8};
use crate::moves::{Move, MoveFlag};
use crate::position::Position;
use crate::tables::Tables;
use crate::types::{Color, PieceType};

const MAX_MOVES: usize = 218;

/// Squares between king and rook that must be empty, on the white back rank
const KINGSIDE_EMPTY: u64 = 0x60; // f1 g1
const QUEENSIDE_EMPTY: u64 = 0x0E; // b1 c1 d1
/// Squares the king stands on, crosses or lands on while castling
const KINGSIDE_SAFE: u64 = 0x70; // e1 f1 g1
const QUEENSIDE_SAFE: u64 = 0x1C; // c1 d1 e1

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    /// The side to move is checkmated
    Checkmate,
    Stalemate,
}

/// Squares attacked by the opponent
struct Threats {
    all: u64,
    /// Sliding attacks, one bitboard per direction of travel
    rays: [u64; 8],
}

pub struct MoveGenerator<'a> {
    position: &'a Position,
    tables: &'a Tables,
    color: Color,
    moves: Vec<Move>,
}

impl<'a> MoveGenerator<'a> {
    /// Generator for the side to move in `position`
    pub fn new(position: &'a Position, tables: &'a Tables) -> Self {
        Self {
            position,
            tables,
            color: position.get_active_color(),
            moves: Vec::with_capacity(MAX_MOVES), // 1 malloc here
        }
    }

    pub fn collect(&mut self) -> Vec<Move> {
        let position = self.position;
        let tables = self.tables;
        let friendly = position.get_pieces_bb(self.color);
        let enemy = position.get_pieces_bb(self.color.other_color());
        let occupied = friendly | enemy;
        let king_sq = position.get_king_square(self.color);

        let threats = self.threats(occupied & !sq_to_bb(king_sq));

        let king_targets = tables.king_attacks(king_sq) & !friendly & !threats.all;
        self.push_moves(king_sq, king_targets, enemy);
        self.generate_castles(king_sq, occupied, threats.all);

        let checkers = attackers_of(position, tables, king_sq, self.color.other_color(), occupied);
        if pop_count(checkers) > 1 {
            // Double check, only the king can move
            return std::mem::take(&mut self.moves);
        }

        let (push_mask, capture_mask) = if checkers == 0 {
            (u64::MAX, u64::MAX)
        } else {
            (self.block_squares(king_sq, checkers), checkers)
        };
        let targets = !friendly & (push_mask | capture_mask);
        let pin_lines = self.pin_lines(king_sq, occupied, friendly, &threats);

        for sq in BitboardIter(position.get_piece_bb(self.color, PieceType::Knight)) {
            let attacks = tables.knight_attacks(sq);
            self.push_moves(sq, attacks & targets & pin_lines[sq as usize], enemy);
        }
        for sq in BitboardIter(position.get_piece_bb(self.color, PieceType::Bishop)) {
            let attacks = tables.bishop_attacks(sq, occupied);
            self.push_moves(sq, attacks & targets & pin_lines[sq as usize], enemy);
        }
        for sq in BitboardIter(position.get_piece_bb(self.color, PieceType::Rook)) {
            let attacks = tables.rook_attacks(sq, occupied);
            self.push_moves(sq, attacks & targets & pin_lines[sq as usize], enemy);
        }
        for sq in BitboardIter(position.get_piece_bb(self.color, PieceType::Queen)) {
            let attacks = tables.queen_attacks(sq, occupied);
            self.push_moves(sq, attacks & targets & pin_lines[sq as usize], enemy);
        }

        self.generate_pawn_moves(king_sq, occupied, enemy, push_mask, capture_mask, &pin_lines);

        std::mem::take(&mut self.moves)
    }

    /// One quiet move or capture for every square in `targets`
    #[inline]
    fn push_moves(&mut self, from: u8, targets: u64, enemy: u64) {
        for to in BitboardIter(targets) {
            let flag = if sq_to_bb(to) & enemy != 0 {
                MoveFlag::Capture
            } else {
                MoveFlag::Quiet
            };
            self.moves.push(Move::new(from, to, flag));
        }
    }

    /// Everything the opponent attacks given `occupied`, plus the sliding attacks split by
    /// direction for pin detection.
    fn threats(&self, occupied: u64) -> Threats {
        let them = self.color.other_color();
        let position = self.position;
        let tables = self.tables;
        let queens = position.get_piece_bb(them, PieceType::Queen);

        let mut rays = [0u64; 8];
        for sq in BitboardIter(position.get_piece_bb(them, PieceType::Rook) | queens) {
            for direction in Direction::STRAIGHT {
                rays[direction as usize] |= tables.ray_attacks(sq, occupied, direction);
            }
        }
        for sq in BitboardIter(position.get_piece_bb(them, PieceType::Bishop) | queens) {
            for direction in Direction::DIAGONAL {
                rays[direction as usize] |= tables.ray_attacks(sq, occupied, direction);
            }
        }

        let mut all = rays.iter().fold(0, |acc, ray| acc | ray);
        for sq in BitboardIter(position.get_piece_bb(them, PieceType::Knight)) {
            all |= tables.knight_attacks(sq);
        }
        for sq in BitboardIter(position.get_piece_bb(them, PieceType::Pawn)) {
            all |= tables.pawn_attacks(them, sq);
        }
        all |= tables.king_attacks(position.get_king_square(them));

        Threats { all, rays }
    }

    /// Squares where a piece would block the check given by the single piece in `checker`.
    /// Empty unless the checker is a slider.
    fn block_squares(&self, king_sq: u8, checker: u64) -> u64 {
        let checker_sq = bitscan_forward(checker);
        let is_slider = self
            .position
            .get_piece_at(checker_sq)
            .map_or(false, |piece| piece.piece_type.is_sliding());
        if !is_slider {
            return 0;
        }
        Direction::ALL
            .into_iter()
            .find(|&direction| self.tables.ray(king_sq, direction) & checker != 0)
            .map_or(0, |direction| {
                self.tables.ray(king_sq, direction)
                    & self.tables.ray(checker_sq, direction.opposite())
            })
    }

    /// For every square, where a friendly piece on it may move without exposing the king.
    ///
    /// A friendly piece is pinned when it is the first piece seen from the king in some
    /// direction and an enemy slider reaches it travelling the opposite way. It keeps the
    /// squares from the king (exclusive) to the pinner (inclusive).
    fn pin_lines(&self, king_sq: u8, occupied: u64, friendly: u64, threats: &Threats) -> [u64; 64] {
        let mut lines = [u64::MAX; 64];
        for direction in Direction::ALL {
            let seen = self.tables.ray_attacks(king_sq, occupied, direction);
            let pinned = seen & friendly & threats.rays[direction.opposite() as usize];
            if pinned != 0 {
                let sq = bitscan_forward(pinned);
                lines[sq as usize] = self.tables.ray_attacks(king_sq, occupied & !pinned, direction);
            }
        }
        lines
    }

    fn generate_castles(&mut self, king_sq: u8, occupied: u64, attacked: u64) {
        let position = self.position;
        let back_rank = match self.color {
            Color::White => 0,
            Color::Black => 56,
        };
        let home = back_rank + 4;
        if king_sq != home {
            return;
        }
        let rooks = position.get_piece_bb(self.color, PieceType::Rook);

        if position.can_castle_kingside(self.color)
            && rooks & sq_to_bb(back_rank + 7) != 0
            && occupied & (KINGSIDE_EMPTY << back_rank) == 0
            && attacked & (KINGSIDE_SAFE << back_rank) == 0
        {
            self.moves.push(Move::new(home, home + 2, MoveFlag::CastleKingside));
        }
        if position.can_castle_queenside(self.color)
            && rooks & sq_to_bb(back_rank) != 0
            && occupied & (QUEENSIDE_EMPTY << back_rank) == 0
            && attacked & (QUEENSIDE_SAFE << back_rank) == 0
        {
            self.moves.push(Move::new(home, home - 2, MoveFlag::CastleQueenside));
        }
    }

    fn generate_pawn_moves(
        &mut self,
        king_sq: u8,
        occupied: u64,
        enemy: u64,
        push_mask: u64,
        capture_mask: u64,
        pin_lines: &[u64; 64],
    ) {
        let position = self.position;
        let tables = self.tables;
        let promotion_rank = match self.color {
            Color::White => RANK_8,
            Color::Black => RANK_1,
        };

        for sq in BitboardIter(position.get_piece_bb(self.color, PieceType::Pawn)) {
            let allowed = (push_mask | capture_mask) & pin_lines[sq as usize];
            let forward = match self.color {
                Color::White => sq_to_bb(sq) << 8,
                Color::Black => sq_to_bb(sq) >> 8,
            };

            // A blocked first square also blocks the double push
            if forward & occupied == 0 {
                let pushes = tables.pawn_pushes(self.color, sq) & !occupied & allowed;
                for to in BitboardIter(pushes) {
                    if sq_to_bb(to) == forward {
                        self.push_pawn_move(sq, to, false, promotion_rank);
                    } else {
                        self.moves.push(Move::new(sq, to, MoveFlag::DoublePawnPush));
                    }
                }
            }

            let attacks = tables.pawn_attacks(self.color, sq);
            for to in BitboardIter(attacks & enemy & allowed) {
                self.push_pawn_move(sq, to, true, promotion_rank);
            }

            if let Some(ep) = position.get_en_passant_target() {
                if attacks & sq_to_bb(ep) != 0
                    && self.en_passant_is_legal(sq, ep, king_sq, occupied, push_mask, capture_mask, pin_lines)
                {
                    self.moves.push(Move::new(sq, ep, MoveFlag::EnPassantCapture));
                }
            }
        }
    }

    /// Quiet move or capture, or all four promotions when landing on the last rank
    fn push_pawn_move(&mut self, from: u8, to: u8, capture: bool, promotion_rank: u64) {
        if sq_to_bb(to) & promotion_rank != 0 {
            for piece_type in MoveFlag::PROMOTIONS {
                self.moves.push(Move::new(from, to, MoveFlag::promotion(piece_type, capture)));
            }
        } else if capture {
            self.moves.push(Move::new(from, to, MoveFlag::Capture));
        } else {
            self.moves.push(Move::new(from, to, MoveFlag::Quiet));
        }
    }

    /// En passant takes a pawn off a square it doesn't land on, so on top of the check and pin
    /// masks the king is tested again on the board as it would be after the capture. This
    /// catches the capturing and captured pawn both leaving a rank between king and rook.
    #[allow(clippy::too_many_arguments)]
    fn en_passant_is_legal(
        &self,
        from: u8,
        ep: u8,
        king_sq: u8,
        occupied: u64,
        push_mask: u64,
        capture_mask: u64,
        pin_lines: &[u64; 64],
    ) -> bool {
        let captured_sq = match self.color {
            Color::White => ep - 8,
            Color::Black => ep + 8,
        };
        let ep_bb = sq_to_bb(ep);
        let resolves_check = ep_bb & push_mask != 0 || sq_to_bb(captured_sq) & capture_mask != 0;
        if !resolves_check || ep_bb & pin_lines[from as usize] == 0 {
            return false;
        }

        let after = (occupied & !sq_to_bb(from) & !sq_to_bb(captured_sq)) | ep_bb;
        let them = self.color.other_color();
        let queens = self.position.get_piece_bb(them, PieceType::Queen);
        let rooks = self.position.get_piece_bb(them, PieceType::Rook) | queens;
        let bishops = self.position.get_piece_bb(them, PieceType::Bishop) | queens;

        self.tables.rook_attacks(king_sq, after) & rooks == 0
            && self.tables.bishop_attacks(king_sq, after) & bishops == 0
    }
}

/// Pieces of color `by` attacking `sq` on a board with the given occupancy
pub fn attackers_of(position: &Position, tables: &Tables, sq: u8, by: Color, occupied: u64) -> u64 {
    let queens = position.get_piece_bb(by, PieceType::Queen);
    let rooks = position.get_piece_bb(by, PieceType::Rook) | queens;
    let bishops = position.get_piece_bb(by, PieceType::Bishop) | queens;

    (tables.knight_attacks(sq) & position.get_piece_bb(by, PieceType::Knight))
        | (tables.pawn_attacks(by.other_color(), sq) & position.get_piece_bb(by, PieceType::Pawn))
        | (tables.king_attacks(sq) & position.get_piece_bb(by, PieceType::King))
        | (tables.bishop_attacks(sq, occupied) & bishops)
        | (tables.rook_attacks(sq, occupied) & rooks)
}

/// All legal moves for the side to move
pub fn generate_legal_moves(position: &Position, tables: &Tables) -> Vec<Move> {
    MoveGenerator::new(position, tables).collect()
}

/// Is the king of the side to move attacked?
pub fn is_in_check(position: &Position, tables: &Tables) -> bool {
    let color = position.get_active_color();
    let king_sq = position.get_king_square(color);
    attackers_of(position, tables, king_sq, color.other_color(), position.get_occupied()) != 0
}

pub fn game_status(position: &Position, tables: &Tables) -> GameStatus {
    if !generate_legal_moves(position, tables).is_empty() {
        GameStatus::Ongoing
    } else if is_in_check(position, tables) {
        GameStatus::Checkmate
    } else {
        GameStatus::Stalemate
    }
}
