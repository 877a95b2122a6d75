use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::{
    collections::VecDeque,
    fmt::{self},
};

use super::constants::{MAX_NUMBER_VALUE, SEVEN_UNIQUE_BONUS, SEVEN_UNIQUE_COUNT, TARGET_SCORE};
use super::errors::EngineError;
use super::functional::score_hand;

/// The three action card effects. The card itself carries no payload;
/// resolution happens in the action resolver against a chosen target.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum ActionKind {
    Freeze,
    FlipThree,
    SecondChance,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Freeze => "Freeze",
            Self::FlipThree => "Flip Three",
            Self::SecondChance => "Second Chance",
        };
        write!(f, "{repr}")
    }
}

/// Score modifier payloads. `Plus` adds a flat amount; `Times` multiplies
/// the accumulated score after all additions.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Modifier {
    Plus(u32),
    Times(u32),
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Plus(amount) => format!("+{amount}"),
            Self::Times(factor) => format!("x{factor}"),
        };
        write!(f, "{repr}")
    }
}

/// A card is a closed variant over numbers, score modifiers, and actions.
///
/// Only `Number` participates in duplicate/uniqueness checks, and only
/// `Number` and `Modifier` count toward a hand's score.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Card {
    Number(u8),
    Modifier(Modifier),
    Action(ActionKind),
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Modifier(modifier) => modifier.fmt(f),
            Self::Action(kind) => kind.fmt(f),
        }
    }
}

/// Deck composition table.
///
/// Number card counts are fixed by the rules (`13 - v` copies of each value
/// `v` in 1..=12 plus a single zero), but modifier and action card counts
/// vary across house rulesets, so they are configuration rather than
/// constants.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct DeckComposition {
    /// One plus-modifier card per listed amount.
    pub plus_modifiers: Vec<u32>,
    /// One times-modifier card per listed factor.
    pub times_modifiers: Vec<u32>,
    pub freeze_count: usize,
    pub flip_three_count: usize,
    pub second_chance_count: usize,
}

impl Default for DeckComposition {
    fn default() -> Self {
        Self {
            plus_modifiers: vec![2, 4, 6, 8, 10],
            times_modifiers: vec![2],
            freeze_count: 3,
            flip_three_count: 3,
            second_chance_count: 3,
        }
    }
}

impl DeckComposition {
    /// Total number of cards a deck built from this composition holds.
    #[must_use]
    pub fn total(&self) -> usize {
        let numbers: usize = (1..=usize::from(MAX_NUMBER_VALUE))
            .map(|value| 13 - value)
            .sum::<usize>()
            + 1;
        numbers
            + self.plus_modifiers.len()
            + self.times_modifiers.len()
            + self.freeze_count
            + self.flip_three_count
            + self.second_chance_count
    }
}

/// The shared draw pile. Built once per game and reshuffled each round.
///
/// Cards leave the pile only through [`Deck::draw`] and come back through
/// [`Deck::return_cards`] (players' hands at round end) or
/// [`Deck::discard`] (resolved action cards), so
/// `remaining + discarded + cards in hands == built` holds at all times.
#[derive(Clone, Debug)]
pub struct Deck {
    pile: VecDeque<Card>,
    discards: Vec<Card>,
    built: usize,
}

impl Default for Deck {
    fn default() -> Self {
        Self::build(&DeckComposition::default())
    }
}

impl Deck {
    /// Populate the draw pile from a composition table. Called once at
    /// game start; later rounds only reshuffle.
    #[must_use]
    pub fn build(composition: &DeckComposition) -> Self {
        let mut pile = VecDeque::with_capacity(composition.total());
        for value in 1..=MAX_NUMBER_VALUE {
            for _ in 0..(13 - usize::from(value)) {
                pile.push_back(Card::Number(value));
            }
        }
        pile.push_back(Card::Number(0));
        for &amount in &composition.plus_modifiers {
            pile.push_back(Card::Modifier(Modifier::Plus(amount)));
        }
        for &factor in &composition.times_modifiers {
            pile.push_back(Card::Modifier(Modifier::Times(factor)));
        }
        for _ in 0..composition.freeze_count {
            pile.push_back(Card::Action(ActionKind::Freeze));
        }
        for _ in 0..composition.flip_three_count {
            pile.push_back(Card::Action(ActionKind::FlipThree));
        }
        for _ in 0..composition.second_chance_count {
            pile.push_back(Card::Action(ActionKind::SecondChance));
        }
        let built = pile.len();
        Self {
            pile,
            discards: Vec::new(),
            built,
        }
    }

    /// Build a deck holding exactly `cards`, in draw order. Useful for
    /// scripted games and tests.
    #[must_use]
    pub fn from_cards(cards: Vec<Card>) -> Self {
        let built = cards.len();
        Self {
            pile: VecDeque::from(cards),
            discards: Vec::new(),
            built,
        }
    }

    /// Uniformly permute the remaining pile.
    pub fn shuffle(&mut self) {
        self.pile.make_contiguous().shuffle(&mut rand::rng());
    }

    /// Remove and return the top card, or `None` if the pile is empty.
    pub fn draw(&mut self) -> Option<Card> {
        self.pile.pop_front()
    }

    /// Append a sequence of cards to the bottom of the pile without
    /// shuffling. Used when players' hands are discarded at round end.
    pub fn return_cards(&mut self, cards: Vec<Card>) {
        self.pile.extend(cards);
    }

    /// Set aside a resolved action card. Discards rejoin the pile at
    /// round end via [`Deck::recycle_discards`].
    pub fn discard(&mut self, card: Card) {
        self.discards.push(card);
    }

    /// Move all discards to the bottom of the pile.
    pub fn recycle_discards(&mut self) {
        self.pile.extend(self.discards.drain(..));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pile.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pile.is_empty()
    }

    #[must_use]
    pub fn discarded(&self) -> usize {
        self.discards.len()
    }

    /// Number of cards the deck was built with.
    #[must_use]
    pub fn built(&self) -> usize {
        self.built
    }
}

/// Type alias for player identifiers.
pub type PlayerId = usize;

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Username(String);

impl Username {
    #[must_use]
    pub fn new(s: &str) -> Self {
        Self(s.trim().to_string())
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Username {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

/// Per-round player states. `Active` is the initial state each round;
/// the other three are terminal until the next round's reset.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum PlayerState {
    Active,
    Busted,
    Stayed,
    Frozen,
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Active => "active",
            Self::Busted => "busted",
            Self::Stayed => "stayed",
            Self::Frozen => "frozen",
        };
        write!(f, "{repr}")
    }
}

/// What a single flip did to the flipping player.
///
/// Action cards are not added to the hand; the caller must hand them to
/// the action resolver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FlipOutcome {
    /// Card appended to the hand; the player remains active.
    Flipped(Card),
    /// Duplicate number absorbed by a second chance token.
    DuplicateSaved(Card),
    /// Duplicate number with no token; round score forfeited.
    Busted(Card),
    /// Seventh distinct number value; the player stays with `score`
    /// (bonus included) banked.
    SevenUnique { card: Card, score: u32 },
    /// Action card drawn; not added to the hand.
    Action(ActionKind),
}

#[derive(Clone, Debug)]
pub struct Player {
    id: PlayerId,
    name: Username,
    total_score: u32,
    hand: Vec<Card>,
    state: PlayerState,
    has_second_chance: bool,
    /// Duplicate-detection counts per number value, maintained
    /// incrementally. A consumed second chance removes both copies of the
    /// matched value from this map while the cards stay in the hand.
    seen: [u8; 13],
}

impl Player {
    #[must_use]
    pub fn new(id: PlayerId, name: Username) -> Self {
        Self {
            id,
            name,
            total_score: 0,
            hand: Vec::with_capacity(12),
            state: PlayerState::Active,
            has_second_chance: false,
            seen: [0; 13],
        }
    }

    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &Username {
        &self.name
    }

    /// Cumulative banked score. Survives round boundaries; mutated only
    /// by the terminal state transitions.
    #[must_use]
    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    #[must_use]
    pub fn state(&self) -> PlayerState {
        self.state
    }

    #[must_use]
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    #[must_use]
    pub fn has_second_chance(&self) -> bool {
        self.has_second_chance
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == PlayerState::Active
    }

    /// Number of distinct number values physically in the hand.
    #[must_use]
    pub fn distinct_values(&self) -> usize {
        let mut present = [false; 13];
        for card in &self.hand {
            if let Card::Number(value) = card {
                present[usize::from(*value)] = true;
            }
        }
        present.iter().filter(|p| **p).count()
    }

    /// What this hand would currently score, bonus excluded.
    #[must_use]
    pub fn hand_score(&self) -> u32 {
        score_hand(&self.hand)
    }

    /// Draw one card and classify it.
    ///
    /// Valid only while `Active`; calling this on a terminal-state player
    /// is a caller contract violation. An empty deck is fatal to the
    /// round: with the fixed composition every card is accounted for, so
    /// it is only reachable on a house-rule change.
    pub fn flip(&mut self, deck: &mut Deck) -> Result<FlipOutcome, EngineError> {
        if self.state != PlayerState::Active {
            return Err(EngineError::NotActive(self.id));
        }
        let card = deck.draw().ok_or(EngineError::EmptyDeck)?;
        match card {
            Card::Number(value) => {
                let slot = usize::from(value);
                if self.seen[slot] > 0 {
                    if self.has_second_chance {
                        // Both copies leave the detection map; both cards
                        // stay in the hand and score once as a distinct
                        // value.
                        self.has_second_chance = false;
                        self.seen[slot] = 0;
                        self.hand.push(card);
                        Ok(FlipOutcome::DuplicateSaved(card))
                    } else {
                        self.hand.push(card);
                        self.state = PlayerState::Busted;
                        Ok(FlipOutcome::Busted(card))
                    }
                } else {
                    self.seen[slot] += 1;
                    self.hand.push(card);
                    if self.distinct_values() == SEVEN_UNIQUE_COUNT {
                        let score = score_hand(&self.hand) + SEVEN_UNIQUE_BONUS;
                        self.state = PlayerState::Stayed;
                        self.total_score += score;
                        Ok(FlipOutcome::SevenUnique { card, score })
                    } else {
                        Ok(FlipOutcome::Flipped(card))
                    }
                }
            }
            Card::Modifier(_) => {
                // Modifiers never bust and never trigger the seven check.
                self.hand.push(card);
                Ok(FlipOutcome::Flipped(card))
            }
            Card::Action(kind) => Ok(FlipOutcome::Action(kind)),
        }
    }

    /// End the round voluntarily, banking the hand's score.
    pub fn stay(&mut self) -> Result<u32, EngineError> {
        if self.state != PlayerState::Active {
            return Err(EngineError::NotActive(self.id));
        }
        let score = score_hand(&self.hand);
        self.state = PlayerState::Stayed;
        self.total_score += score;
        Ok(score)
    }

    /// Forced round end from a Freeze card. Banks exactly as a stay.
    pub fn freeze(&mut self) -> Result<u32, EngineError> {
        if self.state != PlayerState::Active {
            return Err(EngineError::NotActive(self.id));
        }
        let score = score_hand(&self.hand);
        self.state = PlayerState::Frozen;
        self.total_score += score;
        Ok(score)
    }

    /// Grant a second chance token. A duplicate token has no effect and
    /// is not an error; returns whether the token was actually granted.
    pub fn grant_second_chance(&mut self) -> bool {
        if self.has_second_chance {
            false
        } else {
            self.has_second_chance = true;
            true
        }
    }

    /// Reset for a new round, returning the hand's cards to the caller
    /// so they can rejoin the deck. Banked score survives.
    pub fn reset(&mut self) -> Vec<Card> {
        self.state = PlayerState::Active;
        self.has_second_chance = false;
        self.seen = [0; 13];
        std::mem::take(&mut self.hand)
    }

    #[must_use]
    pub fn won_game(&self) -> bool {
        self.total_score >= TARGET_SCORE
    }

    #[must_use]
    pub fn view(&self) -> PlayerView {
        PlayerView {
            id: self.id,
            name: self.name.clone(),
            state: self.state,
            hand: self.hand.clone(),
            hand_score: self.hand_score(),
            total_score: self.total_score,
            has_second_chance: self.has_second_chance,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hand = self
            .hand
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        write!(
            f,
            "{} ({}): {} banked, hand [{hand}]",
            self.name, self.state, self.total_score
        )
    }
}

/// Read-only snapshot of a player, handed to the ports so presentation
/// layers never touch engine-owned state.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: Username,
    pub state: PlayerState,
    pub hand: Vec<Card>,
    pub hand_score: u32,
    pub total_score: u32,
    pub has_second_chance: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Card Tests ===

    #[test]
    fn test_card_rendering() {
        assert_eq!(Card::Number(7).to_string(), "7");
        assert_eq!(Card::Number(0).to_string(), "0");
        assert_eq!(Card::Modifier(Modifier::Plus(10)).to_string(), "+10");
        assert_eq!(Card::Modifier(Modifier::Times(2)).to_string(), "x2");
        assert_eq!(Card::Action(ActionKind::Freeze).to_string(), "Freeze");
        assert_eq!(Card::Action(ActionKind::FlipThree).to_string(), "Flip Three");
        assert_eq!(
            Card::Action(ActionKind::SecondChance).to_string(),
            "Second Chance"
        );
    }

    #[test]
    fn test_number_card_equality() {
        assert_eq!(Card::Number(5), Card::Number(5));
        assert_ne!(Card::Number(5), Card::Number(6));
        assert_ne!(Card::Number(2), Card::Modifier(Modifier::Plus(2)));
    }

    // === Deck Tests ===

    #[test]
    fn test_deck_build_matches_composition() {
        let composition = DeckComposition::default();
        let deck = Deck::build(&composition);
        assert_eq!(deck.len(), composition.total());
        assert_eq!(deck.built(), deck.len());
    }

    #[test]
    fn test_deck_number_card_counts() {
        let deck = Deck::build(&DeckComposition::default());
        let mut counts = [0usize; 13];
        for card in &deck.pile {
            if let Card::Number(value) = card {
                counts[usize::from(*value)] += 1;
            }
        }
        assert_eq!(counts[0], 1);
        for value in 1..=12 {
            assert_eq!(counts[value], 13 - value, "value {value}");
        }
    }

    #[test]
    fn test_deck_shuffle_conserves_cards() {
        let mut deck = Deck::default();
        let before = deck.len();
        deck.shuffle();
        assert_eq!(deck.len(), before);
    }

    #[test]
    fn test_deck_draw_and_return() {
        let mut deck =
            Deck::from_cards(vec![Card::Number(1), Card::Number(2), Card::Number(3)]);
        assert_eq!(deck.draw(), Some(Card::Number(1)));
        assert_eq!(deck.draw(), Some(Card::Number(2)));
        deck.return_cards(vec![Card::Number(1), Card::Number(2)]);
        // Returned cards go to the bottom.
        assert_eq!(deck.draw(), Some(Card::Number(3)));
        assert_eq!(deck.draw(), Some(Card::Number(1)));
        assert_eq!(deck.draw(), Some(Card::Number(2)));
        assert_eq!(deck.draw(), None);
    }

    #[test]
    fn test_deck_discard_recycling() {
        let mut deck =
            Deck::from_cards(vec![Card::Action(ActionKind::Freeze), Card::Number(4)]);
        let card = deck.draw().unwrap();
        deck.discard(card);
        assert_eq!(deck.len(), 1);
        assert_eq!(deck.discarded(), 1);
        deck.recycle_discards();
        assert_eq!(deck.len(), 2);
        assert_eq!(deck.discarded(), 0);
        assert_eq!(deck.len() + deck.discarded(), deck.built());
    }

    // === Player Tests ===

    fn player() -> Player {
        Player::new(0, Username::new("alice"))
    }

    #[test]
    fn test_flip_appends_number_cards() {
        let mut deck = Deck::from_cards(vec![Card::Number(3), Card::Number(7)]);
        let mut p = player();
        assert_eq!(
            p.flip(&mut deck).unwrap(),
            FlipOutcome::Flipped(Card::Number(3))
        );
        assert_eq!(
            p.flip(&mut deck).unwrap(),
            FlipOutcome::Flipped(Card::Number(7))
        );
        assert_eq!(p.hand(), &[Card::Number(3), Card::Number(7)]);
        assert!(p.is_active());
    }

    #[test]
    fn test_duplicate_without_token_busts() {
        let mut deck =
            Deck::from_cards(vec![Card::Number(3), Card::Number(7), Card::Number(3)]);
        let mut p = player();
        p.flip(&mut deck).unwrap();
        p.flip(&mut deck).unwrap();
        assert_eq!(
            p.flip(&mut deck).unwrap(),
            FlipOutcome::Busted(Card::Number(3))
        );
        assert_eq!(p.state(), PlayerState::Busted);
        // Busted hands forfeit the round score; banked total is untouched.
        assert_eq!(p.total_score(), 0);
        // The bust-causing card is physically in the hand for discarding.
        assert_eq!(p.hand().len(), 3);
    }

    #[test]
    fn test_duplicate_with_token_is_saved() {
        let mut deck = Deck::from_cards(vec![
            Card::Number(3),
            Card::Number(7),
            Card::Number(3),
            Card::Number(9),
        ]);
        let mut p = player();
        p.grant_second_chance();
        p.flip(&mut deck).unwrap();
        p.flip(&mut deck).unwrap();
        assert_eq!(
            p.flip(&mut deck).unwrap(),
            FlipOutcome::DuplicateSaved(Card::Number(3))
        );
        assert!(p.is_active());
        assert!(!p.has_second_chance());
        // The matched value left the detection map, so a later 9 is fine
        // and both 3s stay in the hand but score once.
        p.flip(&mut deck).unwrap();
        assert_eq!(p.hand().len(), 4);
        assert_eq!(p.hand_score(), 3 + 7 + 9);
    }

    #[test]
    fn test_seven_unique_banks_bonus_once() {
        let mut deck = Deck::from_cards(vec![
            Card::Number(1),
            Card::Number(2),
            Card::Number(3),
            Card::Number(4),
            Card::Number(5),
            Card::Number(6),
            Card::Number(7),
        ]);
        let mut p = player();
        for _ in 0..6 {
            p.flip(&mut deck).unwrap();
        }
        let outcome = p.flip(&mut deck).unwrap();
        assert_eq!(
            outcome,
            FlipOutcome::SevenUnique {
                card: Card::Number(7),
                score: 28 + 15
            }
        );
        assert_eq!(p.state(), PlayerState::Stayed);
        assert_eq!(p.total_score(), 43);
        // The transition is terminal, so the bonus cannot be re-applied.
        assert_eq!(p.stay(), Err(EngineError::NotActive(0)));
        assert_eq!(p.total_score(), 43);
    }

    #[test]
    fn test_stay_banks_hand_score() {
        let mut deck =
            Deck::from_cards(vec![Card::Number(4), Card::Modifier(Modifier::Plus(10))]);
        let mut p = player();
        p.flip(&mut deck).unwrap();
        p.flip(&mut deck).unwrap();
        assert_eq!(p.stay().unwrap(), 14);
        assert_eq!(p.state(), PlayerState::Stayed);
        assert_eq!(p.total_score(), 14);
    }

    #[test]
    fn test_freeze_banks_like_stay_and_rejects_further_flips() {
        let mut deck =
            Deck::from_cards(vec![Card::Number(8), Card::Number(10), Card::Number(1)]);
        let mut p = player();
        p.flip(&mut deck).unwrap();
        p.flip(&mut deck).unwrap();
        assert_eq!(p.freeze().unwrap(), 18);
        assert_eq!(p.state(), PlayerState::Frozen);
        assert_eq!(p.total_score(), 18);
        assert_eq!(p.flip(&mut deck), Err(EngineError::NotActive(0)));
    }

    #[test]
    fn test_action_cards_do_not_join_hand() {
        let mut deck = Deck::from_cards(vec![Card::Action(ActionKind::Freeze)]);
        let mut p = player();
        assert_eq!(
            p.flip(&mut deck).unwrap(),
            FlipOutcome::Action(ActionKind::Freeze)
        );
        assert!(p.hand().is_empty());
        assert!(p.is_active());
    }

    #[test]
    fn test_second_chance_duplicate_token_is_discarded() {
        let mut p = player();
        assert!(p.grant_second_chance());
        assert!(!p.grant_second_chance());
        assert!(p.has_second_chance());
    }

    #[test]
    fn test_reset_returns_hand_and_clears_round_state() {
        let mut deck = Deck::from_cards(vec![Card::Number(5), Card::Number(5)]);
        let mut p = player();
        p.flip(&mut deck).unwrap();
        p.flip(&mut deck).unwrap();
        assert_eq!(p.state(), PlayerState::Busted);
        let cards = p.reset();
        assert_eq!(cards, vec![Card::Number(5), Card::Number(5)]);
        assert!(p.hand().is_empty());
        assert!(p.is_active());
        assert!(!p.has_second_chance());
        assert_eq!(p.distinct_values(), 0);
    }

    #[test]
    fn test_won_game_threshold() {
        let mut p = player();
        p.total_score = 199;
        assert!(!p.won_game());
        p.total_score = 200;
        assert!(p.won_game());
    }

    #[test]
    fn test_empty_deck_is_fatal() {
        let mut deck = Deck::from_cards(vec![]);
        let mut p = player();
        assert_eq!(p.flip(&mut deck), Err(EngineError::EmptyDeck));
    }
}
