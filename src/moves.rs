use std::fmt;

use thiserror::Error;

use crate::types::{parse_square, square_name, PieceType};

/// Kind of a move. Encoded in the top four bits of a [`Move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveFlag {
    Quiet = 0,
    DoublePawnPush = 1,
    CastleKingside = 2,
    CastleQueenside = 3,
    Capture = 4,
    EnPassantCapture = 5,
    KnightPromotion = 8,
    BishopPromotion = 9,
    RookPromotion = 10,
    QueenPromotion = 11,
    KnightPromotionCapture = 12,
    BishopPromotionCapture = 13,
    RookPromotionCapture = 14,
    QueenPromotionCapture = 15,
}

impl MoveFlag {
    /// Promotion pieces, in flag order
    pub const PROMOTIONS: [PieceType; 4] = [
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
    ];

    fn from_bits(bits: u16) -> MoveFlag {
        match bits {
            0 => MoveFlag::Quiet,
            1 => MoveFlag::DoublePawnPush,
            2 => MoveFlag::CastleKingside,
            3 => MoveFlag::CastleQueenside,
            4 => MoveFlag::Capture,
            5 => MoveFlag::EnPassantCapture,
            8 => MoveFlag::KnightPromotion,
            9 => MoveFlag::BishopPromotion,
            10 => MoveFlag::RookPromotion,
            11 => MoveFlag::QueenPromotion,
            12 => MoveFlag::KnightPromotionCapture,
            13 => MoveFlag::BishopPromotionCapture,
            14 => MoveFlag::RookPromotionCapture,
            15 => MoveFlag::QueenPromotionCapture,
            _ => unreachable!("moves are only built from MoveFlag values"),
        }
    }

    /// Promotion flag for `piece_type`, a knight, bishop, rook or queen
    pub fn promotion(piece_type: PieceType, capture: bool) -> MoveFlag {
        match (piece_type, capture) {
            (PieceType::Knight, false) => MoveFlag::KnightPromotion,
            (PieceType::Bishop, false) => MoveFlag::BishopPromotion,
            (PieceType::Rook, false) => MoveFlag::RookPromotion,
            (PieceType::Queen, false) => MoveFlag::QueenPromotion,
            (PieceType::Knight, true) => MoveFlag::KnightPromotionCapture,
            (PieceType::Bishop, true) => MoveFlag::BishopPromotionCapture,
            (PieceType::Rook, true) => MoveFlag::RookPromotionCapture,
            (PieceType::Queen, true) => MoveFlag::QueenPromotionCapture,
            (other, _) => panic!("cannot promote to {}", other.to_human()),
        }
    }

    /// Does the move remove an enemy piece? En passant included.
    #[inline(always)]
    pub fn is_capture(self) -> bool {
        (self as u8) & 4 != 0
    }

    #[inline(always)]
    pub fn is_promotion(self) -> bool {
        (self as u8) & 8 != 0
    }

    pub fn is_castle(self) -> bool {
        matches!(self, MoveFlag::CastleKingside | MoveFlag::CastleQueenside)
    }

    /// Piece a promotion turns the pawn into
    pub fn promotion_piece(self) -> Option<PieceType> {
        if self.is_promotion() {
            Some(Self::PROMOTIONS[((self as u8) & 3) as usize])
        } else {
            None
        }
    }
}

/// A move packed into 16 bits: `from | to << 6 | flag << 12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u16);

impl Move {
    #[inline(always)]
    pub fn new(from: u8, to: u8, flag: MoveFlag) -> Self {
        Move(from as u16 | (to as u16) << 6 | (flag as u16) << 12)
    }

    #[inline(always)]
    pub fn from(self) -> u8 {
        (self.0 & 0x3f) as u8
    }

    #[inline(always)]
    pub fn to(self) -> u8 {
        (self.0 >> 6 & 0x3f) as u8
    }

    #[inline(always)]
    pub fn flag(self) -> MoveFlag {
        MoveFlag::from_bits(self.0 >> 12)
    }

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn to_human(self) -> String {
        let flag = self.flag();
        let mut res = format!("{} to {}", square_name(self.from()), square_name(self.to()));
        if flag.is_castle() {
            res = if flag == MoveFlag::CastleKingside {
                "castles kingside".to_string()
            } else {
                "castles queenside".to_string()
            };
        }
        if flag == MoveFlag::EnPassantCapture {
            res.push_str(" en passant");
        } else if flag.is_capture() {
            res.push_str(" capturing");
        }
        if let Some(piece) = flag.promotion_piece() {
            res.push_str(&format!(" promoting to {}", piece.to_human()));
        }
        res
    }
}

/// Coordinate notation: `e2e4`, `e1g1` for castling, `e7e8q` for promotions
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", square_name(self.from()), square_name(self.to()))?;
        if let Some(piece) = self.flag().promotion_piece() {
            write!(f, "{}", piece.to_char().to_ascii_lowercase())?;
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseMoveError {
    #[error("Malformed move {0:?}, expected coordinate notation like e2e4 or e7e8q")]
    Malformed(String),
    #[error("Move {0} is not legal in this position")]
    Illegal(String),
}

/// Find the move written as `text` among `legal`.
///
/// The flag of a move can't be read off its coordinates alone, so the text is matched against
/// the moves the generator produced for the position.
pub fn parse_move(legal: &[Move], text: &str) -> Result<Move, ParseMoveError> {
    let malformed = || ParseMoveError::Malformed(text.to_string());
    if !text.is_ascii() || !(4..=5).contains(&text.len()) {
        return Err(malformed());
    }
    let from = parse_square(&text[0..2]).map_err(|_| malformed())?;
    let to = parse_square(&text[2..4]).map_err(|_| malformed())?;
    let promotion = match text.as_bytes().get(4) {
        None => None,
        Some(b'n') => Some(PieceType::Knight),
        Some(b'b') => Some(PieceType::Bishop),
        Some(b'r') => Some(PieceType::Rook),
        Some(b'q') => Some(PieceType::Queen),
        Some(_) => return Err(malformed()),
    };

    legal
        .iter()
        .copied()
        .find(|m| m.from() == from && m.to() == to && m.flag().promotion_piece() == promotion)
        .ok_or_else(|| ParseMoveError::Illegal(text.to_string()))
}
