//! Read-only bundle of every precomputed table the move generator consults.
//!
//! Built once and shared by reference (or behind an `Arc`) between positions and threads.

use log::debug;

use crate::attacks::{AttackTables, Direction};
use crate::magic::{MagicError, MagicTables, BISHOP_MAGICS, ROOK_MAGICS};
use crate::types::Color;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tables {
    pub attacks: AttackTables,
    pub magics: MagicTables,
}

impl Tables {
    /// Build the tables from the built-in magic constants.
    ///
    /// # Panics
    /// If the built-in constants fail validation, which would be a bug in this crate.
    pub fn new() -> Self {
        match Self::with_magics(&BISHOP_MAGICS, &ROOK_MAGICS) {
            Ok(tables) => tables,
            Err(e) => panic!("built-in magic numbers are invalid: {e}"),
        }
    }

    /// Build the tables from caller-supplied magic constants, rejecting any that collide
    pub fn with_magics(
        bishop_magics: &[u64; 64],
        rook_magics: &[u64; 64],
    ) -> Result<Self, MagicError> {
        let attacks = AttackTables::new();
        let magics = MagicTables::new(&attacks, bishop_magics, rook_magics)?;
        debug!(
            "built attack tables: {} magic slots ({} KiB)",
            magics.len(),
            magics.len() * std::mem::size_of::<u64>() / 1024
        );
        Ok(Tables { attacks, magics })
    }

    #[inline(always)]
    pub fn knight_attacks(&self, sq: u8) -> u64 {
        self.attacks.knight[sq as usize]
    }

    #[inline(always)]
    pub fn king_attacks(&self, sq: u8) -> u64 {
        self.attacks.king[sq as usize]
    }

    /// Squares a pawn of `color` on `sq` attacks
    #[inline(always)]
    pub fn pawn_attacks(&self, color: Color, sq: u8) -> u64 {
        self.attacks.pawn[color as usize][sq as usize]
    }

    /// Squares a pawn of `color` on `sq` could push to on an empty board
    #[inline(always)]
    pub fn pawn_pushes(&self, color: Color, sq: u8) -> u64 {
        self.attacks.pawn_pushes[color as usize][sq as usize]
    }

    #[inline(always)]
    pub fn ray(&self, sq: u8, direction: Direction) -> u64 {
        self.attacks.ray(sq, direction)
    }

    #[inline(always)]
    pub fn ray_attacks(&self, sq: u8, occupied: u64, direction: Direction) -> u64 {
        self.attacks.ray_attacks(sq, occupied, direction)
    }

    #[inline(always)]
    pub fn bishop_attacks(&self, sq: u8, occupied: u64) -> u64 {
        self.magics.bishop_attacks(sq, occupied)
    }

    #[inline(always)]
    pub fn rook_attacks(&self, sq: u8, occupied: u64) -> u64 {
        self.magics.rook_attacks(sq, occupied)
    }

    #[inline(always)]
    pub fn queen_attacks(&self, sq: u8, occupied: u64) -> u64 {
        self.magics.queen_attacks(sq, occupied)
    }
}

impl Default for Tables {
    fn default() -> Self {
        Self::new()
    }
}
