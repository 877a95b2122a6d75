//! Game-wide constants.

/// Banked score a player needs to win the game.
pub const TARGET_SCORE: u32 = 200;

/// Bonus awarded for flipping seven uniquely valued number cards.
pub const SEVEN_UNIQUE_BONUS: u32 = 15;

/// Number of distinct number values that ends a turn with the bonus.
pub const SEVEN_UNIQUE_COUNT: usize = 7;

/// Forced draws caused by a Flip Three card.
pub const FLIP_THREE_DRAWS: usize = 3;

/// Highest value printed on a number card. Values run 0..=12, with
/// `13 - v` copies of each `v` in 1..=12 and a single zero.
pub const MAX_NUMBER_VALUE: u8 = 12;
