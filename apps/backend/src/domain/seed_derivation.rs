//! RNG seed derivation utilities for deterministic game behavior.
//!
//! Every shuffle in a game is derived from one base seed chosen when the game
//! starts, so a seeded game replays identically.

/// Derive a seed for dealing a round.
///
/// `deal_no` counts every deal in the game (a host jump re-deals the same
/// round number), so repeated deals of one round still differ.
pub fn derive_dealing_seed(game_seed: u64, round_no: u8, deal_no: u32) -> u64 {
    game_seed
        .wrapping_add(u64::from(round_no).wrapping_mul(1_000_000))
        .wrapping_add(u64::from(deal_no).wrapping_mul(10_000))
        .wrapping_add(2)
}

/// Derive a seed for rebuilding the draw pile from the discard pile.
pub fn derive_refill_seed(game_seed: u64, deal_no: u32, refill_no: u32) -> u64 {
    game_seed
        .wrapping_add(u64::from(deal_no).wrapping_mul(10_000))
        .wrapping_add(u64::from(refill_no).wrapping_mul(100))
        .wrapping_add(1)
}
