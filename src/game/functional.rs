//! Pure scoring functions. No suspension points and no side effects live
//! here; everything async stays in the round controller and resolver.

use super::entities::{Card, Modifier};

/// Score a hand: sum of distinct number values plus additive modifier
/// amounts, then multiplied by every multiplier factor (so `2^k` for `k`
/// x2 cards). The seven-unique bonus is applied by the player state
/// machine at the moment of the transition, never here.
#[must_use]
pub fn score_hand(hand: &[Card]) -> u32 {
    let mut counted = [false; 13];
    let mut additive = 0u32;
    let mut multiplier = 1u32;
    for card in hand {
        match card {
            Card::Number(value) => {
                let slot = usize::from(*value);
                if !counted[slot] {
                    counted[slot] = true;
                    additive += u32::from(*value);
                }
            }
            Card::Modifier(Modifier::Plus(amount)) => additive += amount,
            Card::Modifier(Modifier::Times(factor)) => multiplier *= factor,
            Card::Action(_) => {}
        }
    }
    additive * multiplier
}
