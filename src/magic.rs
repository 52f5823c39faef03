//! Magic bitboards for O(1) sliding piece attack lookups.
//!
//! Each square has a precomputed "magic number" that maps the relevant blockers of an
//! occupancy to a dense index: `((occupied & mask) * magic) >> shift`. All bishop and rook
//! attack sets live in one shared buffer; every square owns the `offset..offset + len`
//! slice of it.

use thiserror::Error;

use crate::attacks::AttackTables;
use crate::bitboard::{pop_count, sq_file, sq_rank, FILE_A, FILE_H, RANK_1, RANK_8};

/// Precomputed magic numbers for bishop attacks.
/// These are well-known magic numbers that produce collision-free hashing.
pub const BISHOP_MAGICS: [u64; 64] = [
    0x0002020202020200, 0x0002020202020000, 0x0004010202000000, 0x0004040080000000,
    0x0001104000000000, 0x0000821040000000, 0x0000410410400000, 0x0000104104104000,
    0x0000040404040400, 0x0000020202020200, 0x0000040102020000, 0x0000040400800000,
    0x0000011040000000, 0x0000008210400000, 0x0000004104104000, 0x0000002082082000,
    0x0004000808080800, 0x0002000404040400, 0x0001000202020200, 0x0000800802004000,
    0x0000800400A00000, 0x0000200100884000, 0x0000400082082000, 0x0000200041041000,
    0x0002080010101000, 0x0001040008080800, 0x0000208004010400, 0x0000404004010200,
    0x0000840000802000, 0x0000404002011000, 0x0000808001041000, 0x0000404000820800,
    0x0001041000202000, 0x0000820800101000, 0x0000104400080800, 0x0000020080080080,
    0x0000404040040100, 0x0000808100020100, 0x0001010100020800, 0x0000808080010400,
    0x0000820820004000, 0x0000410410002000, 0x0000082088001000, 0x0000002011000800,
    0x0000080100400400, 0x0001010101000200, 0x0002020202000400, 0x0001010101000200,
    0x0000410410400000, 0x0000208208200000, 0x0000002084100000, 0x0000000020880000,
    0x0000001002020000, 0x0000040408020000, 0x0004040404040000, 0x0002020202020000,
    0x0000104104104000, 0x0000002082082000, 0x0000000020841000, 0x0000000000208800,
    0x0000000010020200, 0x0000000404080200, 0x0000040404040400, 0x0002020202020200,
];

/// Precomputed magic numbers for rook attacks.
pub const ROOK_MAGICS: [u64; 64] = [
    0x0080001020400080, 0x0040001000200040, 0x0080081000200080, 0x0080040800100080,
    0x0080020400080080, 0x0080010200040080, 0x0080008001000200, 0x0080002040800100,
    0x0000800020400080, 0x0000400020005000, 0x0000801000200080, 0x0000800800100080,
    0x0000800400080080, 0x0000800200040080, 0x0000800100020080, 0x0000800040800100,
    0x0000208000400080, 0x0000404000201000, 0x0000808010002000, 0x0000808008001000,
    0x0000808004000800, 0x0000808002000400, 0x0000010100020004, 0x0000020000408104,
    0x0000208080004000, 0x0000200040005000, 0x0000100080200080, 0x0000080080100080,
    0x0000040080080080, 0x0000020080040080, 0x0000010080800200, 0x0000800080004100,
    0x0000204000800080, 0x0000200040401000, 0x0000100080802000, 0x0000080080801000,
    0x0000040080800800, 0x0000020080800400, 0x0000020001010004, 0x0000800040800100,
    0x0000204000808000, 0x0000200040008080, 0x0000100020008080, 0x0000080010008080,
    0x0000040008008080, 0x0000020004008080, 0x0000010002008080, 0x0000004081020004,
    0x0000204000800080, 0x0000200040008080, 0x0000100020008080, 0x0000080010008080,
    0x0000040008008080, 0x0000020004008080, 0x0000800100020080, 0x0000800041000080,
    0x00FFFCDDFCED714A, 0x007FFCDDFCED714A, 0x003FFFCDFFD88096, 0x0000040810002101,
    0x0001000204080011, 0x0001000204000801, 0x0001000082000401, 0x0001FFFAABFAD1A2,
];

/// Combined size of all per-square slices with the standard masks (5248 bishop + 102400 rook).
pub const ATTACK_TABLE_SIZE: usize = 107_648;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SliderKind {
    Bishop,
    Rook,
}

/// Hashing parameters of one square for one slider kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlidingMagicEntry {
    /// Squares whose occupancy can change the attack set (board edges excluded)
    pub mask: u64,
    pub magic: u64,
    /// 64 - popcount(mask)
    pub shift: u32,
    /// Start of this square's slice in the shared attack buffer
    pub offset: usize,
    /// 2^popcount(mask)
    pub len: usize,
}

impl SlidingMagicEntry {
    const EMPTY: SlidingMagicEntry = SlidingMagicEntry {
        mask: 0,
        magic: 0,
        shift: 64,
        offset: 0,
        len: 0,
    };

    /// Index of `occupied` inside this square's slice
    #[inline(always)]
    pub fn index(&self, occupied: u64) -> usize {
        ((occupied & self.mask).wrapping_mul(self.magic) >> self.shift) as usize
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MagicError {
    #[error(
        "{kind:?} magic {magic:#018x} on square {square} sends blocker sets with different attacks to slot {index}"
    )]
    Collision {
        kind: SliderKind,
        square: u8,
        magic: u64,
        index: usize,
    },
}

/// Generate all subsets of a mask using the Carry-Rippler technique.
/// Starts with the empty set and stops once the enumeration wraps back to it.
pub fn carry_rippler(mask: u64) -> impl Iterator<Item = u64> {
    let mut subset = 0u64;
    let mut done = false;
    std::iter::from_fn(move || {
        if done {
            return None;
        }
        let current = subset;
        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            done = true;
        }
        Some(current)
    })
}

/// Board edges that can't hold a relevant blocker for a piece on `sq`. An edge the
/// piece itself stands on is kept, since rays run along it.
fn outer_edges(sq: u8) -> u64 {
    let mut edges = 0;
    if sq_file(sq) != 0 {
        edges |= FILE_A;
    }
    if sq_file(sq) != 7 {
        edges |= FILE_H;
    }
    if sq_rank(sq) != 0 {
        edges |= RANK_1;
    }
    if sq_rank(sq) != 7 {
        edges |= RANK_8;
    }
    edges
}

/// Relevant occupancy mask of a slider on `sq`
pub fn relevant_mask(attacks: &AttackTables, kind: SliderKind, sq: u8) -> u64 {
    let empty = match kind {
        SliderKind::Bishop => attacks.empty_bishop[sq as usize],
        SliderKind::Rook => attacks.empty_rook[sq as usize],
    };
    empty & !outer_edges(sq)
}

/// Magic bitboard attack lookup tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagicTables {
    pub bishop: [SlidingMagicEntry; 64],
    pub rook: [SlidingMagicEntry; 64],
    /// Shared attack buffer, bishop slices first
    attacks: Vec<u64>,
}

impl MagicTables {
    /// Build the attack buffer from the given magic constants.
    ///
    /// Every subset of every mask is hashed and filled with its classical attack set.
    /// Two subsets may share a slot only if their attack sets agree; anything else means
    /// the constant is not a valid magic for that square.
    pub fn new(
        attacks: &AttackTables,
        bishop_magics: &[u64; 64],
        rook_magics: &[u64; 64],
    ) -> Result<Self, MagicError> {
        let mut buffer = Vec::with_capacity(ATTACK_TABLE_SIZE);
        let bishop = Self::fill(attacks, SliderKind::Bishop, bishop_magics, &mut buffer)?;
        let rook = Self::fill(attacks, SliderKind::Rook, rook_magics, &mut buffer)?;
        Ok(MagicTables {
            bishop,
            rook,
            attacks: buffer,
        })
    }

    fn fill(
        attacks: &AttackTables,
        kind: SliderKind,
        magics: &[u64; 64],
        buffer: &mut Vec<u64>,
    ) -> Result<[SlidingMagicEntry; 64], MagicError> {
        let mut entries = [SlidingMagicEntry::EMPTY; 64];

        for sq in 0..64u8 {
            let mask = relevant_mask(attacks, kind, sq);
            let bits = pop_count(mask);
            let entry = SlidingMagicEntry {
                mask,
                magic: magics[sq as usize],
                shift: 64 - bits,
                offset: buffer.len(),
                len: 1 << bits,
            };
            buffer.resize(entry.offset + entry.len, 0);
            let slots = &mut buffer[entry.offset..];

            for occupied in carry_rippler(mask) {
                let attack = match kind {
                    SliderKind::Bishop => attacks.bishop_attacks_classical(sq, occupied),
                    SliderKind::Rook => attacks.rook_attacks_classical(sq, occupied),
                };
                let index = entry.index(occupied);
                // a slider always attacks something, so 0 marks a free slot
                match slots[index] {
                    0 => slots[index] = attack,
                    existing if existing == attack => {}
                    _ => {
                        return Err(MagicError::Collision {
                            kind,
                            square: sq,
                            magic: entry.magic,
                            index,
                        })
                    }
                }
            }
            entries[sq as usize] = entry;
        }
        Ok(entries)
    }

    #[inline(always)]
    fn slice(&self, entry: &SlidingMagicEntry) -> &[u64] {
        &self.attacks[entry.offset..entry.offset + entry.len]
    }

    /// Get bishop attacks using magic lookup
    #[inline(always)]
    pub fn bishop_attacks(&self, sq: u8, occupied: u64) -> u64 {
        let entry = &self.bishop[sq as usize];
        self.slice(entry)[entry.index(occupied)]
    }

    /// Get rook attacks using magic lookup
    #[inline(always)]
    pub fn rook_attacks(&self, sq: u8, occupied: u64) -> u64 {
        let entry = &self.rook[sq as usize];
        self.slice(entry)[entry.index(occupied)]
    }

    /// Get queen attacks (combines bishop and rook)
    #[inline(always)]
    pub fn queen_attacks(&self, sq: u8, occupied: u64) -> u64 {
        self.bishop_attacks(sq, occupied) | self.rook_attacks(sq, occupied)
    }

    /// Total number of slots in the shared attack buffer
    pub fn len(&self) -> usize {
        self.attacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attacks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::parse_square;
    use pretty_assertions::assert_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    static ATTACKS: AttackTables = AttackTables::new();

    fn build() -> MagicTables {
        MagicTables::new(&ATTACKS, &BISHOP_MAGICS, &ROOK_MAGICS).unwrap()
    }

    /// Random subset of `mask`, keeping each bit with probability 1/2
    fn random_subset(rng: &mut StdRng, mask: u64) -> u64 {
        mask & rng.gen::<u64>()
    }

    #[test]
    fn test_carry_rippler_visits_every_subset_once() {
        let mask = 0b1011_0100u64;
        let mut subsets: Vec<u64> = carry_rippler(mask).collect();
        assert_eq!(subsets.len(), 16);
        assert_eq!(subsets[0], 0);
        subsets.sort();
        subsets.dedup();
        assert_eq!(subsets.len(), 16);
        assert!(subsets.iter().all(|s| s & !mask == 0));
        assert_eq!(carry_rippler(0).collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_mask_sizes() {
        let e4 = parse_square("e4").unwrap();
        let a1 = parse_square("a1").unwrap();
        let d1 = parse_square("d1").unwrap();
        assert_eq!(pop_count(relevant_mask(&ATTACKS, SliderKind::Rook, a1)), 12);
        assert_eq!(pop_count(relevant_mask(&ATTACKS, SliderKind::Rook, d1)), 11);
        assert_eq!(pop_count(relevant_mask(&ATTACKS, SliderKind::Rook, e4)), 10);
        assert_eq!(pop_count(relevant_mask(&ATTACKS, SliderKind::Bishop, a1)), 6);
        assert_eq!(pop_count(relevant_mask(&ATTACKS, SliderKind::Bishop, e4)), 9);
    }

    #[test]
    fn test_table_layout() {
        let tables = build();
        assert_eq!(tables.len(), ATTACK_TABLE_SIZE);
        assert_eq!(tables.bishop[0].offset, 0);
        assert_eq!(tables.rook[0].offset, 5248);
        for sq in 1..64 {
            let prev = &tables.rook[sq - 1];
            assert_eq!(tables.rook[sq].offset, prev.offset + prev.len);
        }
    }

    #[test]
    fn test_magic_matches_classical_on_random_occupancies() {
        let tables = build();
        let mut rng = StdRng::seed_from_u64(0xB15B0A4D);
        for sq in 0..64u8 {
            for _ in 0..200 {
                let bishop_occ = random_subset(&mut rng, tables.bishop[sq as usize].mask);
                assert_eq!(
                    tables.bishop_attacks(sq, bishop_occ),
                    ATTACKS.bishop_attacks_classical(sq, bishop_occ),
                    "bishop sq={} occ={:#x}",
                    sq,
                    bishop_occ
                );
                let rook_occ = random_subset(&mut rng, tables.rook[sq as usize].mask);
                assert_eq!(
                    tables.rook_attacks(sq, rook_occ),
                    ATTACKS.rook_attacks_classical(sq, rook_occ),
                    "rook sq={} occ={:#x}",
                    sq,
                    rook_occ
                );
            }
        }
    }

    #[test]
    fn test_irrelevant_occupancy_is_ignored() {
        let tables = build();
        let mut rng = StdRng::seed_from_u64(7);
        for sq in 0..64u8 {
            let occupied: u64 = rng.gen::<u64>() & !(1u64 << sq);
            assert_eq!(
                tables.queen_attacks(sq, occupied),
                ATTACKS.queen_attacks_classical(sq, occupied)
            );
        }
    }

    #[test]
    fn test_invalid_magic_is_rejected() {
        let mut broken = ROOK_MAGICS;
        broken[27] = 0;
        let err = MagicTables::new(&ATTACKS, &BISHOP_MAGICS, &broken).unwrap_err();
        assert!(matches!(
            err,
            MagicError::Collision {
                kind: SliderKind::Rook,
                square: 27,
                magic: 0,
                index: 0
            }
        ));
    }

    #[test]
    fn test_rebuild_is_identical() {
        assert_eq!(build(), build());
    }
}
