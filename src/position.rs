use crate::bitboard::{bitscan_forward, sq_to_bb, BitboardIter};
use crate::moves::Move;
use crate::types::{Color, Piece, PieceType};

/// Information needed to undo a move. Stored during apply_move, used in unmake_move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoInfo {
    /// The move that was made
    pub mv: Move,
    /// Piece removed by the move, if any (the pawn, for en passant)
    pub captured: Option<Piece>,
    /// Previous castling rights, indexed by color
    pub castle_kingside: [bool; 2],
    pub castle_queenside: [bool; 2],
    /// Previous en passant target
    pub en_passant_target: Option<u8>,
    /// Previous halfmove clock
    pub halfmove_clock: u32,
}

/// Board state: one bitboard per colored piece kind plus the side to move, castling rights,
/// en passant target, move clocks and the undo log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Indexed by `Piece::index()`
    pub(crate) pieces: [u64; 12],
    // who's move it is
    pub(crate) active_color: Color,
    pub(crate) castle_kingside: [bool; 2],
    pub(crate) castle_queenside: [bool; 2],
    /// Square a pawn skipped over with a double push on the previous move
    pub(crate) en_passant_target: Option<u8>,
    // number of half moves since last capture or pawn advance
    pub(crate) halfmove_clock: u32,
    // number of full moves. Starts at 1, and gets incremented after every black move
    pub(crate) fullmove_number: u32,
    pub(crate) undo_log: Vec<UndoInfo>,
}

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

impl Position {
    /// The standard starting position, white to move
    pub fn new() -> Self {
        let mut position = Self::empty();
        for (file, &piece_type) in BACK_RANK.iter().enumerate() {
            let file = file as u8;
            position.put(Piece::new(Color::White, piece_type), file);
            position.put(Piece::new(Color::White, PieceType::Pawn), 8 + file);
            position.put(Piece::new(Color::Black, PieceType::Pawn), 48 + file);
            position.put(Piece::new(Color::Black, piece_type), 56 + file);
        }
        position.castle_kingside = [true; 2];
        position.castle_queenside = [true; 2];
        position
    }

    /// A board with no pieces and no castling rights, white to move.
    ///
    /// Populate it with [`Position::put`] and the setters; generation expects exactly one king
    /// per side.
    pub fn empty() -> Self {
        Self {
            pieces: [0; 12],
            active_color: Color::White,
            castle_kingside: [false; 2],
            castle_queenside: [false; 2],
            en_passant_target: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            undo_log: Vec::new(),
        }
    }

    /// Place `piece` on `sq`, replacing whatever stood there
    pub fn put(&mut self, piece: Piece, sq: u8) {
        self.remove(sq);
        self.pieces[piece.index()] |= sq_to_bb(sq);
    }

    /// Clear `sq`, returning the piece that stood there
    pub fn remove(&mut self, sq: u8) -> Option<Piece> {
        let piece = self.get_piece_at(sq)?;
        self.pieces[piece.index()] &= !sq_to_bb(sq);
        Some(piece)
    }

    pub fn set_active_color(&mut self, color: Color) {
        self.active_color = color;
    }

    pub fn set_castling_rights(&mut self, color: Color, kingside: bool, queenside: bool) {
        self.castle_kingside[color as usize] = kingside;
        self.castle_queenside[color as usize] = queenside;
    }

    pub fn set_en_passant_target(&mut self, target: Option<u8>) {
        self.en_passant_target = target;
    }

    pub fn set_clocks(&mut self, halfmove_clock: u32, fullmove_number: u32) {
        self.halfmove_clock = halfmove_clock;
        self.fullmove_number = fullmove_number;
    }

    #[inline(always)]
    pub fn get_piece_bb(&self, color: Color, piece_type: PieceType) -> u64 {
        self.pieces[Piece::new(color, piece_type).index()]
    }

    /// All squares occupied by `color`
    #[inline(always)]
    pub fn get_pieces_bb(&self, color: Color) -> u64 {
        let base = color as usize * 6;
        self.pieces[base..base + 6].iter().fold(0, |acc, bb| acc | bb)
    }

    #[inline(always)]
    pub fn get_occupied(&self) -> u64 {
        self.pieces.iter().fold(0, |acc, bb| acc | bb)
    }

    pub fn get_piece_at(&self, sq: u8) -> Option<Piece> {
        let bb = sq_to_bb(sq);
        self.pieces
            .iter()
            .position(|pieces| pieces & bb != 0)
            .map(Piece::from_index)
    }

    /// Square of the king of `color`. The position must hold one.
    #[inline(always)]
    pub fn get_king_square(&self, color: Color) -> u8 {
        bitscan_forward(self.get_piece_bb(color, PieceType::King))
    }

    /// Every piece on the board with its square, white pieces first
    pub fn pieces(&self) -> impl Iterator<Item = (Piece, u8)> + '_ {
        self.pieces.iter().enumerate().flat_map(|(index, &bb)| {
            BitboardIter(bb).map(move |sq| (Piece::from_index(index), sq))
        })
    }

    pub fn get_active_color(&self) -> Color {
        self.active_color
    }

    pub fn can_castle_kingside(&self, color: Color) -> bool {
        self.castle_kingside[color as usize]
    }

    pub fn can_castle_queenside(&self, color: Color) -> bool {
        self.castle_queenside[color as usize]
    }

    pub fn get_en_passant_target(&self) -> Option<u8> {
        self.en_passant_target
    }

    pub fn get_halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn get_fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Moves applied so far that can still be unmade, oldest first
    pub fn undo_log(&self) -> &[UndoInfo] {
        &self.undo_log
    }

    /// Add or remove `piece` on `sq`
    #[inline(always)]
    pub(crate) fn toggle(&mut self, piece: Piece, sq: u8) {
        self.pieces[piece.index()] ^= sq_to_bb(sq);
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::{RANK_1, RANK_2, RANK_7, RANK_8};
    use crate::types::parse_square;
    use pretty_assertions::assert_eq;

    fn sq(name: &str) -> u8 {
        parse_square(name).unwrap()
    }

    #[test]
    fn test_starting_position() {
        let position = Position::new();
        assert_eq!(position.get_occupied(), RANK_1 | RANK_2 | RANK_7 | RANK_8);
        assert_eq!(position.get_pieces_bb(Color::White), RANK_1 | RANK_2);
        assert_eq!(position.get_pieces_bb(Color::Black), RANK_7 | RANK_8);
        assert_eq!(position.get_piece_bb(Color::White, PieceType::Pawn), RANK_2);
        assert_eq!(position.get_king_square(Color::White), sq("e1"));
        assert_eq!(position.get_king_square(Color::Black), sq("e8"));
        assert_eq!(
            position.get_piece_at(sq("d8")),
            Some(Piece::new(Color::Black, PieceType::Queen))
        );
        assert_eq!(
            position.get_piece_at(sq("g1")),
            Some(Piece::new(Color::White, PieceType::Knight))
        );
        assert_eq!(position.get_piece_at(sq("e4")), None);
        assert_eq!(position.pieces().count(), 32);
        for color in Color::ALL {
            assert!(position.can_castle_kingside(color));
            assert!(position.can_castle_queenside(color));
        }
        assert_eq!(position.get_active_color(), Color::White);
        assert_eq!(position.get_en_passant_target(), None);
        assert_eq!(position.get_fullmove_number(), 1);
        assert!(position.undo_log().is_empty());
    }

    #[test]
    fn test_put_replaces_piece() {
        let mut position = Position::empty();
        let white_rook = Piece::new(Color::White, PieceType::Rook);
        let black_knight = Piece::new(Color::Black, PieceType::Knight);
        position.put(white_rook, sq("d4"));
        position.put(black_knight, sq("d4"));
        assert_eq!(position.get_piece_at(sq("d4")), Some(black_knight));
        assert_eq!(position.get_piece_bb(Color::White, PieceType::Rook), 0);
        assert_eq!(position.remove(sq("d4")), Some(black_knight));
        assert_eq!(position.remove(sq("d4")), None);
        assert_eq!(position.get_occupied(), 0);
    }

    #[test]
    fn test_setters() {
        let mut position = Position::empty();
        position.set_active_color(Color::Black);
        position.set_castling_rights(Color::White, true, false);
        position.set_en_passant_target(Some(sq("d3")));
        position.set_clocks(3, 17);
        assert_eq!(position.get_active_color(), Color::Black);
        assert!(position.can_castle_kingside(Color::White));
        assert!(!position.can_castle_queenside(Color::White));
        assert!(!position.can_castle_kingside(Color::Black));
        assert_eq!(position.get_en_passant_target(), Some(sq("d3")));
        assert_eq!(position.get_halfmove_clock(), 3);
        assert_eq!(position.get_fullmove_number(), 17);
    }
}
