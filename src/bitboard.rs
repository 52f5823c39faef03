//! Bitboard primitives.
//!
//! A bitboard is a 64-bit integer where each bit represents a square on the chess board.
//! Square indexing: a1 = 0, b1 = 1, ..., h1 = 7, a2 = 8, ..., h8 = 63
//! This corresponds to: file = square % 8, rank = square / 8 (both 0-indexed).

/// Bitboard with every square of the a-file set
pub const FILE_A: u64 = 0x0101_0101_0101_0101;
/// Bitboard with every square of the h-file set
pub const FILE_H: u64 = 0x8080_8080_8080_8080;
pub const NOT_FILE_A: u64 = !FILE_A;
pub const NOT_FILE_H: u64 = !FILE_H;

pub const RANK_1: u64 = 0x0000_0000_0000_00FF;
pub const RANK_2: u64 = RANK_1 << 8;
pub const RANK_7: u64 = RANK_1 << 48;
pub const RANK_8: u64 = RANK_1 << 56;

/// Squares of the board border.
pub const EDGES: u64 = FILE_A | FILE_H | RANK_1 | RANK_8;

/// Build a square index from a 0-indexed file and rank
#[inline(always)]
pub const fn square(file: u8, rank: u8) -> u8 {
    rank * 8 + file
}

/// Convert a square index to a bitboard with that single bit set
#[inline(always)]
pub const fn sq_to_bb(sq: u8) -> u64 {
    1u64 << sq
}

/// Get the rank (0-7) from a square index
#[inline(always)]
pub const fn sq_rank(sq: u8) -> u8 {
    sq >> 3
}

/// Get the file (0-7) from a square index
#[inline(always)]
pub const fn sq_file(sq: u8) -> u8 {
    sq & 7
}

/// Shift every square one file towards h, dropping what falls off the board
#[inline(always)]
pub const fn east_one(bb: u64) -> u64 {
    (bb << 1) & NOT_FILE_A
}

/// Shift every square one file towards a, dropping what falls off the board
#[inline(always)]
pub const fn west_one(bb: u64) -> u64 {
    (bb >> 1) & NOT_FILE_H
}

/// Number of set bits.
#[inline(always)]
pub const fn pop_count(bb: u64) -> u32 {
    bb.count_ones()
}

const DEBRUIJN_64: u64 = 0x03f7_9d71_b4cb_0a89;

/// Index of the isolated bit for every value of `(lsb * DEBRUIJN_64) >> 58`.
/// Leiserson, Prokop and Randall (1998).
const LS1B_INDEX: [u8; 64] = [
     0,  1, 48,  2, 57, 49, 28,  3,
    61, 58, 50, 42, 38, 29, 17,  4,
    62, 55, 59, 36, 53, 51, 43, 22,
    45, 39, 33, 30, 24, 18, 12,  5,
    63, 47, 56, 27, 60, 41, 37, 16,
    54, 35, 52, 21, 44, 32, 23, 11,
    46, 26, 40, 15, 34, 20, 31, 10,
    25, 14, 19,  9, 13,  8,  7,  6,
];

/// Index of the least significant set bit.
///
/// `bb` must be non-zero. Callers iterating over a bitboard stop once it reaches 0
/// instead of scanning it.
#[inline(always)]
pub fn bitscan_forward(bb: u64) -> u8 {
    debug_assert!(bb != 0, "bitscan_forward on an empty bitboard");
    let lsb = bb & bb.wrapping_neg();
    LS1B_INDEX[(lsb.wrapping_mul(DEBRUIJN_64) >> 58) as usize]
}

/// Most significant bit of every byte value
const MS1B_BYTE: [u8; 256] = build_ms1b_table();

const fn build_ms1b_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 2;
    while i < 256 {
        table[i] = table[i / 2] + 1;
        i += 1;
    }
    table
}

/// Index of the most significant set bit, by halving the search range down to a byte lookup
/// (Eugene Nalimov).
///
/// `bb` must be non-zero.
#[inline(always)]
pub fn bitscan_reverse(bb: u64) -> u8 {
    debug_assert!(bb != 0, "bitscan_reverse on an empty bitboard");
    let mut bb = bb;
    let mut result = 0u8;
    if bb > 0xFFFF_FFFF {
        bb >>= 32;
        result = 32;
    }
    if bb > 0xFFFF {
        bb >>= 16;
        result += 16;
    }
    if bb > 0xFF {
        bb >>= 8;
        result += 8;
    }
    result + MS1B_BYTE[bb as usize]
}

/// Iterate over set bits in a bitboard, returning square indices
pub struct BitboardIter(pub u64);

impl Iterator for BitboardIter {
    type Item = u8;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.0 == 0 {
            None
        } else {
            let sq = bitscan_forward(self.0);
            self.0 &= self.0 - 1; // Clear the lowest set bit
            Some(sq)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = pop_count(self.0) as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for BitboardIter {}
