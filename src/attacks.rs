//! Precomputed empty-board attack tables and classical ray attacks.
//!
//! Rays are stored per direction and square. Sliding attacks on an occupied board are
//! derived from them by cutting each ray behind its nearest blocker; this is slower than
//! the magic lookup in [`crate::magic`] but needs no hashing, and serves as the reference
//! the magic tables are built from and checked against.

use crate::bitboard::{bitscan_forward, bitscan_reverse, east_one, west_one, RANK_2, RANK_7};
use crate::types::Color;

/// Compass directions, in the order rays are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Rook directions
    pub const STRAIGHT: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Bishop directions
    pub const DIAGONAL: [Direction; 4] = [
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::NorthWest,
    ];

    #[inline(always)]
    pub const fn opposite(self) -> Direction {
        Self::ALL[(self as usize + 4) % 8]
    }

    /// Does the square index grow when stepping in this direction?
    #[inline(always)]
    pub const fn is_positive(self) -> bool {
        matches!(
            self,
            Direction::North | Direction::NorthEast | Direction::East | Direction::NorthWest
        )
    }

    #[inline(always)]
    pub const fn is_diagonal(self) -> bool {
        self as usize % 2 == 1
    }

    /// (rank delta, file delta) of a single step
    const fn delta(self) -> (i8, i8) {
        match self {
            Direction::North => (1, 0),
            Direction::NorthEast => (1, 1),
            Direction::East => (0, 1),
            Direction::SouthEast => (-1, 1),
            Direction::South => (-1, 0),
            Direction::SouthWest => (-1, -1),
            Direction::West => (0, -1),
            Direction::NorthWest => (1, -1),
        }
    }
}

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2),
    (1, -2), (1, 2), (2, -1), (2, 1),
];

const KING_DELTAS: [(i8, i8); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1),           (0, 1),
    (1, -1),  (1, 0),  (1, 1),
];

const fn on_board(rank: i8, file: i8) -> bool {
    rank >= 0 && rank < 8 && file >= 0 && file < 8
}

/// Precomputed attack tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackTables {
    /// Ray attacks in each direction from each square on an empty board.
    /// Indexed as rays[direction as usize][square]
    pub rays: [[u64; 64]; 8],
    /// Knight attacks for each square
    pub knight: [u64; 64],
    /// King attacks for each square
    pub king: [u64; 64],
    /// Pawn attacks for each color and square: pawn[color as usize][square]
    pub pawn: [[u64; 64]; 2],
    /// Single and (from the home rank) double pawn pushes: pawn_pushes[color as usize][square]
    pub pawn_pushes: [[u64; 64]; 2],
    /// Empty-board bishop attacks (union of the diagonal rays)
    pub empty_bishop: [u64; 64],
    /// Empty-board rook attacks (union of the straight rays)
    pub empty_rook: [u64; 64],
    /// Empty-board queen attacks
    pub empty_queen: [u64; 64],
}

impl AttackTables {
    /// Build all tables. Usable in const context.
    pub const fn new() -> Self {
        let mut rays = [[0u64; 64]; 8];
        let mut knight = [0u64; 64];
        let mut king = [0u64; 64];
        let mut pawn = [[0u64; 64]; 2];
        let mut pawn_pushes = [[0u64; 64]; 2];
        let mut empty_bishop = [0u64; 64];
        let mut empty_rook = [0u64; 64];
        let mut empty_queen = [0u64; 64];

        let mut sq: usize = 0;
        while sq < 64 {
            let rank = (sq >> 3) as i8;
            let file = (sq & 7) as i8;

            let mut i = 0;
            while i < 8 {
                let (dr, df) = KNIGHT_DELTAS[i];
                if on_board(rank + dr, file + df) {
                    knight[sq] |= 1u64 << ((rank + dr) * 8 + file + df);
                }
                let (dr, df) = KING_DELTAS[i];
                if on_board(rank + dr, file + df) {
                    king[sq] |= 1u64 << ((rank + dr) * 8 + file + df);
                }
                i += 1;
            }

            let mut d = 0;
            while d < 8 {
                let (dr, df) = Direction::ALL[d].delta();
                let mut r = rank + dr;
                let mut f = file + df;
                while on_board(r, f) {
                    rays[d][sq] |= 1u64 << (r * 8 + f);
                    r += dr;
                    f += df;
                }
                d += 1;
            }

            empty_rook[sq] = rays[0][sq] | rays[2][sq] | rays[4][sq] | rays[6][sq];
            empty_bishop[sq] = rays[1][sq] | rays[3][sq] | rays[5][sq] | rays[7][sq];
            empty_queen[sq] = empty_rook[sq] | empty_bishop[sq];

            // Pawns: shift the source bit, masking out file wrap-around
            let bb = 1u64 << sq;
            let sides = east_one(bb) | west_one(bb);
            pawn[Color::White as usize][sq] = sides << 8;
            pawn[Color::Black as usize][sq] = sides >> 8;

            pawn_pushes[Color::White as usize][sq] = bb << 8;
            if bb & RANK_2 != 0 {
                pawn_pushes[Color::White as usize][sq] |= bb << 16;
            }
            pawn_pushes[Color::Black as usize][sq] = bb >> 8;
            if bb & RANK_7 != 0 {
                pawn_pushes[Color::Black as usize][sq] |= bb >> 16;
            }

            sq += 1;
        }

        AttackTables {
            rays,
            knight,
            king,
            pawn,
            pawn_pushes,
            empty_bishop,
            empty_rook,
            empty_queen,
        }
    }

    #[inline(always)]
    pub fn ray(&self, sq: u8, direction: Direction) -> u64 {
        self.rays[direction as usize][sq as usize]
    }

    /// Get attacks along a ray, stopping at the first occupied square.
    /// For rays going towards higher square indices the nearest blocker is the lowest bit,
    /// for the others it is the highest bit.
    #[inline]
    pub fn ray_attacks(&self, sq: u8, occupied: u64, direction: Direction) -> u64 {
        let ray = self.ray(sq, direction);
        let blockers = ray & occupied;

        if blockers == 0 {
            return ray;
        }

        let blocker_sq = if direction.is_positive() {
            bitscan_forward(blockers)
        } else {
            bitscan_reverse(blockers)
        };

        // Keep the ray up to and including the blocker
        ray ^ self.ray(blocker_sq, direction)
    }

    /// Rook attacks from a square given occupied squares, walking the rays
    pub fn rook_attacks_classical(&self, sq: u8, occupied: u64) -> u64 {
        Direction::STRAIGHT
            .iter()
            .fold(0, |acc, &d| acc | self.ray_attacks(sq, occupied, d))
    }

    /// Bishop attacks from a square given occupied squares, walking the rays
    pub fn bishop_attacks_classical(&self, sq: u8, occupied: u64) -> u64 {
        Direction::DIAGONAL
            .iter()
            .fold(0, |acc, &d| acc | self.ray_attacks(sq, occupied, d))
    }

    pub fn queen_attacks_classical(&self, sq: u8, occupied: u64) -> u64 {
        self.rook_attacks_classical(sq, occupied) | self.bishop_attacks_classical(sq, occupied)
    }
}

impl Default for AttackTables {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::sq_to_bb;
    use crate::types::parse_square;
    use pretty_assertions::assert_eq;

    static TABLES: AttackTables = AttackTables::new();

    fn bb(names: &[&str]) -> u64 {
        names.iter().fold(0, |acc, n| acc | sq_to_bb(parse_square(n).unwrap()))
    }

    fn sq(name: &str) -> u8 {
        parse_square(name).unwrap()
    }

    #[test]
    fn test_knight_attacks() {
        let attacks = TABLES.knight[sq("e4") as usize];
        assert_eq!(attacks, bb(&["d2", "f2", "c3", "g3", "c5", "g5", "d6", "f6"]));
    }

    #[test]
    fn test_knight_corner() {
        assert_eq!(TABLES.knight[sq("a1") as usize], bb(&["c2", "b3"]));
        assert_eq!(TABLES.knight[sq("h8") as usize], bb(&["f7", "g6"]));
    }

    #[test]
    fn test_king_attacks() {
        assert_eq!(TABLES.king[sq("e4") as usize].count_ones(), 8);
        assert_eq!(TABLES.king[sq("a1") as usize], bb(&["a2", "b1", "b2"]));
        assert_eq!(TABLES.king[sq("h5") as usize], bb(&["g4", "g5", "g6", "h4", "h6"]));
    }

    #[test]
    fn test_pawn_attacks() {
        let white = Color::White as usize;
        let black = Color::Black as usize;
        assert_eq!(TABLES.pawn[white][sq("e4") as usize], bb(&["d5", "f5"]));
        assert_eq!(TABLES.pawn[black][sq("e5") as usize], bb(&["d4", "f4"]));
        // no wrap-around onto the opposite file
        assert_eq!(TABLES.pawn[white][sq("a2") as usize], bb(&["b3"]));
        assert_eq!(TABLES.pawn[black][sq("h7") as usize], bb(&["g6"]));
    }

    #[test]
    fn test_pawn_pushes() {
        let white = Color::White as usize;
        let black = Color::Black as usize;
        assert_eq!(TABLES.pawn_pushes[white][sq("e2") as usize], bb(&["e3", "e4"]));
        assert_eq!(TABLES.pawn_pushes[white][sq("e3") as usize], bb(&["e4"]));
        assert_eq!(TABLES.pawn_pushes[black][sq("d7") as usize], bb(&["d6", "d5"]));
        assert_eq!(TABLES.pawn_pushes[black][sq("d2") as usize], bb(&["d1"]));
    }

    #[test]
    fn test_rays() {
        assert_eq!(TABLES.ray(sq("e4"), Direction::North), bb(&["e5", "e6", "e7", "e8"]));
        assert_eq!(TABLES.ray(sq("e4"), Direction::SouthWest), bb(&["d3", "c2", "b1"]));
        assert_eq!(TABLES.ray(sq("h1"), Direction::East), 0);
        assert_eq!(TABLES.ray(sq("a8"), Direction::SouthEast).count_ones(), 7);
    }

    #[test]
    fn test_direction_properties() {
        for d in Direction::ALL {
            assert_eq!(d.opposite().opposite(), d);
            assert_ne!(d.is_positive(), d.opposite().is_positive());
            assert_eq!(d.is_diagonal(), d.opposite().is_diagonal());
        }
        // a positive ray only holds squares above its origin
        for d in Direction::ALL {
            for s in 0..64u8 {
                let ray = TABLES.ray(s, d);
                if ray != 0 {
                    assert_eq!(d.is_positive(), ray.trailing_zeros() > s as u32);
                }
            }
        }
    }

    #[test]
    fn test_rook_attacks_empty_board() {
        let attacks = TABLES.rook_attacks_classical(sq("e4"), 0);
        assert_eq!(attacks.count_ones(), 14);
        assert_eq!(attacks, TABLES.empty_rook[sq("e4") as usize]);
    }

    #[test]
    fn test_rook_attacks_with_blockers() {
        let attacks = TABLES.rook_attacks_classical(sq("e4"), bb(&["e2", "g4"]));
        assert_eq!(
            attacks,
            bb(&["e2", "e3", "e5", "e6", "e7", "e8", "a4", "b4", "c4", "d4", "f4", "g4"])
        );
    }

    #[test]
    fn test_bishop_attacks_empty_board() {
        let attacks = TABLES.bishop_attacks_classical(sq("e4"), 0);
        assert_eq!(attacks.count_ones(), 13);
        assert_eq!(TABLES.queen_attacks_classical(sq("e4"), 0).count_ones(), 27);
    }

    #[test]
    fn test_bishop_attacks_with_blockers() {
        let attacks = TABLES.bishop_attacks_classical(sq("e4"), bb(&["c2", "g6", "f3"]));
        assert_eq!(attacks, bb(&["d3", "c2", "f3", "d5", "c6", "b7", "a8", "f5", "g6"]));
    }
}
