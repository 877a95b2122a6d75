//! Property-based tests for scoring and deck conservation.

use proptest::prelude::*;

use flip_seven::{
    entities::{Card, Deck, DeckComposition, Modifier, Player, PlayerState, Username},
    functional::score_hand,
};

// Strategy for a number card value.
fn value_strategy() -> impl Strategy<Value = u8> {
    0u8..=12
}

// Strategy for a hand of number cards only.
fn number_hand_strategy() -> impl Strategy<Value = Vec<Card>> {
    prop::collection::vec(value_strategy().prop_map(Card::Number), 0..12)
}

// Strategy for additive modifier amounts as they appear in the deck.
fn plus_strategy() -> impl Strategy<Value = u32> {
    (1u32..=5).prop_map(|n| 2 * n)
}

proptest! {
    #[test]
    fn test_number_hands_score_sum_of_distinct_values(hand in number_hand_strategy()) {
        let mut counted = [false; 13];
        let mut expected = 0u32;
        for card in &hand {
            if let Card::Number(v) = card {
                if !counted[usize::from(*v)] {
                    counted[usize::from(*v)] = true;
                    expected += u32::from(*v);
                }
            }
        }
        prop_assert_eq!(score_hand(&hand), expected);
    }

    #[test]
    fn test_plus_modifiers_add_before_multipliers(
        hand in number_hand_strategy(),
        amounts in prop::collection::vec(plus_strategy(), 0..5),
        multipliers in 0usize..3,
    ) {
        let base = score_hand(&hand);
        let mut extended = hand;
        for amount in &amounts {
            extended.push(Card::Modifier(Modifier::Plus(*amount)));
        }
        let additive: u32 = base + amounts.iter().sum::<u32>();
        prop_assert_eq!(score_hand(&extended), additive);
        for _ in 0..multipliers {
            extended.push(Card::Modifier(Modifier::Times(2)));
        }
        prop_assert_eq!(
            score_hand(&extended),
            additive * 2u32.pow(multipliers as u32)
        );
    }

    #[test]
    fn test_hand_order_never_changes_score(hand in number_hand_strategy()) {
        let mut reversed = hand.clone();
        reversed.reverse();
        prop_assert_eq!(score_hand(&hand), score_hand(&reversed));
    }

    #[test]
    fn test_deck_conservation_under_draws_and_returns(
        composition_actions in 0usize..5,
        draws in 1usize..50,
    ) {
        let composition = DeckComposition {
            freeze_count: composition_actions,
            flip_three_count: composition_actions,
            second_chance_count: composition_actions,
            ..DeckComposition::default()
        };
        let mut deck = Deck::build(&composition);
        prop_assert_eq!(deck.len(), composition.total());

        let mut held = Vec::new();
        for _ in 0..draws {
            match deck.draw() {
                // Action cards never join a hand; they go to the discards.
                Some(card @ Card::Action(_)) => deck.discard(card),
                Some(card) => held.push(card),
                None => break,
            }
        }
        prop_assert_eq!(
            deck.len() + deck.discarded() + held.len(),
            deck.built()
        );

        deck.return_cards(held);
        deck.recycle_discards();
        prop_assert_eq!(deck.len(), deck.built());
    }

    #[test]
    fn test_busted_players_never_bank(values in prop::collection::vec(value_strategy(), 2..20)) {
        let mut deck = Deck::from_cards(values.into_iter().map(Card::Number).collect());
        let mut player = Player::new(0, Username::new("prop"));
        while player.state() == PlayerState::Active && !deck.is_empty() {
            player.flip(&mut deck).unwrap();
        }
        if player.state() == PlayerState::Busted {
            prop_assert_eq!(player.total_score(), 0);
        }
    }
}
