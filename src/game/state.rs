use std::collections::HashSet;

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::board::{self, BOARD_SIZE, Deed, DeedKind};
use crate::game::cards::{Deck, DeckKind};
use crate::game::directory::Directory;
use crate::game::players::{PlayerState, STARTING_CASH};
use crate::game::trade::TradeOffer;
use crate::types::{Color, Money, PlayerId, PropertyId, Token};

pub const MAX_PLAYERS: usize = 8;
pub const DEFAULT_TRADE_THRESHOLD: Money = 1000;
pub const TURNS_LIMIT: u32 = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub num_players: usize,
    pub num_humans: usize,
    pub seed: u64,
    pub starting_cash: Money,
    /// Largest gain gap in the other side's favor a scripted player tolerates.
    pub trade_threshold: Money,
    pub turn_limit: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            num_players: 4,
            num_humans: 0,
            seed: 42,
            starting_cash: STARTING_CASH,
            trade_threshold: DEFAULT_TRADE_THRESHOLD,
            turn_limit: TURNS_LIMIT,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("between 2 and {MAX_PLAYERS} players are supported, got {0}")]
    InvalidPlayerCount(usize),
    #[error("{humans} human players requested for a {players} player game")]
    TooManyHumans { humans: usize, players: usize },
    #[error("no property named {0:?}")]
    UnknownProperty(String),
    #[error("no player {0}")]
    UnknownPlayer(usize),
    #[error("invalid configuration: {0}")]
    Config(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameEvent {
    Purchased {
        player: PlayerId,
        property: PropertyId,
        price: Money,
    },
    AuctionWon {
        player: PlayerId,
        property: PropertyId,
        price: Money,
    },
    RentPaid {
        payer: PlayerId,
        owner: PlayerId,
        amount: Money,
    },
    Mortgaged {
        player: PlayerId,
        property: PropertyId,
    },
    Unmortgaged {
        player: PlayerId,
        property: PropertyId,
    },
    HouseBuilt {
        player: PlayerId,
        property: PropertyId,
    },
    HouseSold {
        player: PlayerId,
        property: PropertyId,
    },
    TradeAccepted(TradeOffer),
    TradeDeclined(TradeOffer),
    SentToJail {
        player: PlayerId,
    },
    Bankrupt {
        player: PlayerId,
        cash: Money,
    },
}

/// Mutable side of a deed. The owner is recorded by id only; the owner's
/// `PlayerState` keeps the matching indexes.
#[derive(Debug, Clone)]
pub struct Property {
    pub deed: &'static Deed,
    pub houses: u8,
    pub mortgaged: bool,
    pub owner: Option<PlayerId>,
}

impl Property {
    pub fn id(&self) -> PropertyId {
        self.deed.id
    }

    pub fn color(&self) -> Color {
        self.deed.color
    }

    pub fn is_built(&self) -> bool {
        self.deed.can_develop() && self.houses > 0
    }
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub players: Vec<PlayerState>,
    pub properties: Vec<Property>,
    pub declined_offers: HashSet<String>,
    pub chance: Deck,
    pub community_chest: Deck,
    pub roll_total: u8,
    pub turn: u32,
    pub events: Vec<GameEvent>,
    rng: StdRng,
}

impl GameState {
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        if !(2..=MAX_PLAYERS).contains(&config.num_players) {
            return Err(GameError::InvalidPlayerCount(config.num_players));
        }
        if config.num_humans > config.num_players {
            return Err(GameError::TooManyHumans {
                humans: config.num_humans,
                players: config.num_players,
            });
        }
        if config.starting_cash < 0 {
            return Err(GameError::Config(format!(
                "starting cash must not be negative, got {}",
                config.starting_cash
            )));
        }

        let mut rng = StdRng::seed_from_u64(config.seed);
        let players = Token::ORDERED
            .iter()
            .take(config.num_players)
            .enumerate()
            .map(|(id, token)| PlayerState::new(id, *token, config.starting_cash))
            .collect::<Vec<_>>();
        let properties = board::DEEDS
            .iter()
            .map(|deed| Property {
                deed,
                houses: 0,
                mortgaged: false,
                owner: None,
            })
            .collect();
        let chance = Deck::shuffled(DeckKind::Chance, &mut rng);
        let community_chest = Deck::shuffled(DeckKind::CommunityChest, &mut rng);

        Ok(Self {
            config,
            players,
            properties,
            declined_offers: HashSet::new(),
            chance,
            community_chest,
            roll_total: 0,
            turn: 0,
            events: Vec::new(),
            rng,
        })
    }

    pub fn directory(&self) -> Directory<'_> {
        Directory::new(self)
    }

    pub fn property(&self, id: PropertyId) -> &Property {
        &self.properties[id]
    }

    pub fn player(&self, id: PlayerId) -> &PlayerState {
        &self.players[id]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut PlayerState {
        &mut self.players[id]
    }

    pub fn find_property(&self, name: &str) -> Result<PropertyId, GameError> {
        board::deed_by_name(name)
            .map(|deed| deed.id)
            .ok_or_else(|| GameError::UnknownProperty(name.to_string()))
    }

    pub fn find_player(&self, number: usize) -> Result<PlayerId, GameError> {
        number
            .checked_sub(1)
            .filter(|id| *id < self.players.len())
            .ok_or(GameError::UnknownPlayer(number))
    }

    /// Hand a deed to `player`, taking it from its previous owner. No
    /// decisions run; callers that want follow-up actions go through `Table`.
    pub fn grant(&mut self, player: PlayerId, property: PropertyId) {
        if let Some(previous) = self.properties[property].owner {
            self.revoke(previous, property);
        }
        let deed = self.properties[property].deed;
        let mortgaged = self.properties[property].mortgaged;
        self.properties[property].owner = Some(player);
        self.players[player].add_deed(deed, mortgaged);
    }

    pub fn revoke(&mut self, player: PlayerId, property: PropertyId) {
        let deed = self.properties[property].deed;
        self.players[player].remove_deed(deed);
        if self.properties[property].owner == Some(player) {
            self.properties[property].owner = None;
        }
    }

    /// Flip the mortgage flag and the owner's mortgaged set together.
    pub(crate) fn set_mortgaged(&mut self, property: PropertyId, mortgaged: bool) {
        self.properties[property].mortgaged = mortgaged;
        if let Some(owner) = self.properties[property].owner {
            let set = &mut self.players[owner].mortgaged;
            if mortgaged {
                set.insert(property);
            } else {
                set.remove(&property);
            }
        }
    }

    /// Houses on the least developed deed of the group `player` holds.
    pub fn group_houses(&self, player: PlayerId, color: Color) -> u8 {
        self.players[player]
            .holdings(color)
            .iter()
            .map(|id| self.properties[*id].houses)
            .min()
            .unwrap_or(0)
    }

    pub fn total_worth(&self, player: PlayerId) -> Money {
        let state = &self.players[player];
        state.cash
            + state
                .properties
                .iter()
                .map(|id| {
                    let property = &self.properties[*id];
                    if property.mortgaged {
                        property.deed.mortgage_amount()
                    } else {
                        property.deed.cost + property.houses as Money * property.deed.build_cost()
                    }
                })
                .sum::<Money>()
    }

    /// Rent owed by a visitor; `card_multiplier` is set when a card sent them.
    pub fn rent(&self, property: PropertyId, card_multiplier: bool) -> Money {
        let property = &self.properties[property];
        let Some(owner) = property.owner else {
            return 0;
        };
        let directory = self.directory();
        match property.deed.kind {
            DeedKind::Street { rent, .. } => {
                if property.houses > 0 {
                    rent[property.houses as usize]
                } else if directory.has_full_set(owner, property.color()) {
                    rent[0] * 2
                } else {
                    rent[0]
                }
            }
            DeedKind::Railroad => {
                let owned = self.players[owner].count_in(Color::Railroad).max(1) as u32;
                let rent = 25 * 2_i64.pow(owned - 1);
                if card_multiplier { rent * 2 } else { rent }
            }
            DeedKind::Utility => {
                let dice = self.roll_total as Money;
                if card_multiplier || directory.has_full_set(owner, Color::Utility) {
                    10 * dice
                } else {
                    4 * dice
                }
            }
        }
    }

    pub fn roll_dice(&mut self) -> (u8, u8) {
        let d1 = self.rng.gen_range(1..=6);
        let d2 = self.rng.gen_range(1..=6);
        self.roll_total = d1 + d2;
        (d1, d2)
    }

    pub fn next_position(&self, player: PlayerId) -> usize {
        (self.players[player].position + self.roll_total as usize) % BOARD_SIZE
    }

    pub fn record(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn active_loser(&self) -> Option<PlayerId> {
        self.players.iter().find(|p| p.cash < 0).map(|p| p.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_players() -> GameState {
        GameState::new(GameConfig {
            num_players: 2,
            ..GameConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn rejects_bad_player_counts() {
        let config = GameConfig {
            num_players: 1,
            ..GameConfig::default()
        };
        assert!(matches!(
            GameState::new(config),
            Err(GameError::InvalidPlayerCount(1))
        ));
        let config = GameConfig {
            num_players: 3,
            num_humans: 4,
            ..GameConfig::default()
        };
        assert!(matches!(
            GameState::new(config),
            Err(GameError::TooManyHumans { .. })
        ));
    }

    #[test]
    fn grant_moves_title_between_players() {
        let mut state = two_players();
        state.grant(0, 27);
        state.set_mortgaged(27, true);
        state.grant(1, 27);
        assert_eq!(state.property(27).owner, Some(1));
        assert!(!state.player(0).owns(27));
        assert!(state.player(1).mortgaged.contains(&27));
        assert!(state.player(0).mortgaged.is_empty());
    }

    #[test]
    fn street_rent_follows_houses_and_sets() {
        let mut state = two_players();
        state.grant(0, 0);
        assert_eq!(state.rent(0, false), 2);
        state.grant(0, 1);
        assert_eq!(state.rent(0, false), 4);
        state.properties[0].houses = 1;
        assert_eq!(state.rent(0, false), 10);
        state.properties[0].houses = 5;
        assert_eq!(state.rent(0, false), 250);
    }

    #[test]
    fn railroad_and_utility_rent() {
        let mut state = two_players();
        state.grant(1, 2);
        state.grant(1, 10);
        state.grant(1, 17);
        assert_eq!(state.rent(2, false), 100);
        assert_eq!(state.rent(2, true), 200);
        state.grant(1, 7);
        state.roll_total = 8;
        assert_eq!(state.rent(7, false), 32);
        assert_eq!(state.rent(7, true), 80);
        state.grant(1, 20);
        assert_eq!(state.rent(7, false), 80);
    }

    #[test]
    fn total_worth_counts_houses_and_mortgages() {
        let mut state = two_players();
        state.grant(0, 3);
        state.grant(0, 4);
        state.properties[3].houses = 2;
        state.set_mortgaged(4, true);
        assert_eq!(state.total_worth(0), 1500 + 100 + 2 * 50 + 50);
    }

    #[test]
    fn players_are_found_by_seat_number() {
        let state = two_players();
        assert_eq!(state.find_player(2).unwrap(), 1);
        assert!(state.find_player(0).is_err());
        assert!(state.find_player(3).is_err());
        assert_eq!(state.find_property("Boardwalk").unwrap(), 27);
    }
}
