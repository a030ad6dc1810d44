use std::collections::VecDeque;
use std::fmt;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::board::{self, landmarks};
use crate::types::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DeckKind {
    Chance,
    CommunityChest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardEffect {
    AdvanceTo(usize),
    NearestRailroad,
    NearestUtility,
    Collect(Money),
    Pay(Money),
    GoBack(usize),
    GoToJail,
    GetOutOfJailFree,
    Repairs { per_house: Money, per_hotel: Money },
    PayEachPlayer(Money),
    CollectFromEachPlayer(Money),
}

impl CardEffect {
    /// Kept cards leave the deck until played.
    pub fn returns_to_deck(&self) -> bool {
        !matches!(self, CardEffect::GetOutOfJailFree)
    }
}

impl fmt::Display for CardEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardEffect::AdvanceTo(space) => write!(f, "advance to {}", board::space_label(*space)),
            CardEffect::NearestRailroad => write!(f, "advance to the nearest railroad"),
            CardEffect::NearestUtility => write!(f, "advance to the nearest utility"),
            CardEffect::Collect(amount) => write!(f, "collect ${amount}"),
            CardEffect::Pay(amount) => write!(f, "pay ${amount}"),
            CardEffect::GoBack(spaces) => write!(f, "go back {spaces} spaces"),
            CardEffect::GoToJail => write!(f, "go to jail"),
            CardEffect::GetOutOfJailFree => write!(f, "get out of jail free"),
            CardEffect::Repairs {
                per_house,
                per_hotel,
            } => write!(f, "pay ${per_house} per house and ${per_hotel} per hotel"),
            CardEffect::PayEachPlayer(amount) => write!(f, "pay each player ${amount}"),
            CardEffect::CollectFromEachPlayer(amount) => {
                write!(f, "collect ${amount} from each player")
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    pub kind: DeckKind,
    cards: VecDeque<CardEffect>,
}

impl Deck {
    pub fn shuffled(kind: DeckKind, rng: &mut impl rand::Rng) -> Self {
        let mut cards = build_deck(kind);
        cards.shuffle(rng);
        Self {
            kind,
            cards: cards.into(),
        }
    }

    /// Take the top card, putting it back underneath unless it is kept.
    pub fn draw(&mut self) -> Option<CardEffect> {
        let card = self.cards.pop_front()?;
        if card.returns_to_deck() {
            self.cards.push_back(card);
        }
        Some(card)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

fn build_deck(kind: DeckKind) -> Vec<CardEffect> {
    use CardEffect::*;
    match kind {
        DeckKind::Chance => vec![
            AdvanceTo(landmarks::BOARDWALK),
            AdvanceTo(landmarks::GO),
            AdvanceTo(landmarks::ILLINOIS_AVENUE),
            AdvanceTo(landmarks::ST_CHARLES_PLACE),
            NearestRailroad,
            NearestRailroad,
            NearestUtility,
            Collect(50),
            GetOutOfJailFree,
            GoBack(3),
            GoToJail,
            Repairs {
                per_house: 25,
                per_hotel: 100,
            },
            Pay(15),
            AdvanceTo(landmarks::READING_RAILROAD),
            PayEachPlayer(50),
            Collect(150),
        ],
        DeckKind::CommunityChest => vec![
            AdvanceTo(landmarks::GO),
            Collect(200),
            Pay(50),
            Pay(50),
            Collect(50),
            GetOutOfJailFree,
            GoToJail,
            Collect(100),
            Collect(100),
            Collect(100),
            Collect(20),
            CollectFromEachPlayer(10),
            Pay(100),
            Collect(25),
            Repairs {
                per_house: 40,
                per_hotel: 115,
            },
            Collect(10),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn jail_card_leaves_the_deck() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut deck = Deck::shuffled(DeckKind::Chance, &mut rng);
        assert_eq!(deck.len(), 16);
        let drawn = (0..16).filter_map(|_| deck.draw()).collect::<Vec<_>>();
        assert!(drawn.contains(&CardEffect::GetOutOfJailFree));
        assert_eq!(deck.len(), 15);
        assert!(deck.draw().is_some());
    }

    #[test]
    fn community_chest_has_sixteen_cards() {
        let mut rng = StdRng::seed_from_u64(1);
        let deck = Deck::shuffled(DeckKind::CommunityChest, &mut rng);
        assert_eq!(deck.len(), 16);
        assert!(!deck.is_empty());
    }
}
