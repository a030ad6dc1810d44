use itertools::Itertools;

use crate::board;
use crate::game::state::GameState;
use crate::game::trade::TradeOffer;
use crate::types::{Color, OwnershipDegree, PlayerId, PropertyId};

/// Cross-player queries about who holds what.
#[derive(Clone, Copy)]
pub struct Directory<'a> {
    state: &'a GameState,
}

impl<'a> Directory<'a> {
    pub fn new(state: &'a GameState) -> Self {
        Self { state }
    }

    pub fn owner_of(&self, property: PropertyId) -> Option<PlayerId> {
        self.state.properties[property].owner
    }

    /// Degree `player` would have in `color` holding `modifier` more (or fewer) deeds.
    pub fn ownership_degree(&self, player: PlayerId, color: Color, modifier: i32) -> OwnershipDegree {
        let count = self.state.players[player].count_in(color) as i32;
        OwnershipDegree::classify(color, count + modifier)
    }

    pub fn has_full_set(&self, player: PlayerId, color: Color) -> bool {
        self.ownership_degree(player, color, 0) == OwnershipDegree::Monopoly
    }

    /// Street groups `player` holds completely.
    pub fn buildable_colors(&self, player: PlayerId) -> Vec<Color> {
        Color::BUILDABLE
            .into_iter()
            .filter(|color| self.has_full_set(player, *color))
            .collect()
    }

    /// A group with a house anywhere on it cannot change hands.
    pub fn is_color_tradeable(&self, color: Color) -> bool {
        board::deeds_of(color).all(|deed| self.state.properties[deed.id].houses == 0)
    }

    pub fn tradeable_properties(&self, player: PlayerId) -> Vec<PropertyId> {
        self.state.players[player]
            .properties
            .iter()
            .copied()
            .filter(|id| self.is_color_tradeable(board::deed(*id).color))
            .collect()
    }

    pub fn tradeable_property_names(&self, player: PlayerId) -> Vec<&'static str> {
        self.tradeable_properties(player)
            .into_iter()
            .map(|id| board::deed(id).name)
            .collect()
    }

    /// Deeds of `color` held by anyone but `excluding`; empty once the group is built on.
    pub fn other_players_color_properties(
        &self,
        color: Color,
        excluding: PlayerId,
    ) -> Vec<PropertyId> {
        if !self.is_color_tradeable(color) {
            return Vec::new();
        }
        board::deeds_of(color)
            .filter(|deed| {
                self.owner_of(deed.id)
                    .is_some_and(|owner| owner != excluding)
            })
            .map(|deed| deed.id)
            .collect()
    }

    pub fn players_with_jail_cards(&self, excluding: PlayerId) -> Vec<PlayerId> {
        self.state
            .players
            .iter()
            .filter(|p| p.id != excluding && p.jail_cards > 0)
            .map(|p| p.id)
            .collect()
    }

    pub fn other_player_has_monopoly(&self, excluding: PlayerId) -> bool {
        self.state
            .players
            .iter()
            .filter(|p| p.id != excluding)
            .any(|p| !self.buildable_colors(p.id).is_empty())
    }

    pub fn has_been_declined(&self, offer: &TradeOffer) -> bool {
        self.state.declined_offers.contains(&offer.canonical_text())
    }

    /// Other players ordered by seat, starting after `player`.
    pub fn seats_after(&self, player: PlayerId) -> Vec<PlayerId> {
        let count = self.state.players.len();
        (1..count).map(|offset| (player + offset) % count).collect_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::GameConfig;

    fn three_players() -> GameState {
        GameState::new(GameConfig {
            num_players: 3,
            ..GameConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn degree_accounts_for_modifier() {
        let mut state = three_players();
        state.grant(0, 3);
        state.grant(0, 4);
        let directory = state.directory();
        assert_eq!(
            directory.ownership_degree(0, Color::LightBlue, 0),
            OwnershipDegree::AlmostMonopoly
        );
        assert_eq!(
            directory.ownership_degree(0, Color::LightBlue, 1),
            OwnershipDegree::Monopoly
        );
        assert_eq!(
            directory.ownership_degree(0, Color::LightBlue, -1),
            OwnershipDegree::One
        );
        assert!(directory.buildable_colors(0).is_empty());
    }

    #[test]
    fn monopolies_on_railroads_do_not_count() {
        let mut state = three_players();
        for id in [2, 10, 17, 25] {
            state.grant(1, id);
        }
        assert!(!state.directory().other_player_has_monopoly(0));
        state.grant(2, 26);
        state.grant(2, 27);
        let directory = state.directory();
        assert!(directory.other_player_has_monopoly(0));
        assert!(!directory.other_player_has_monopoly(2));
        assert_eq!(directory.buildable_colors(2), vec![Color::DarkBlue]);
    }

    #[test]
    fn built_groups_are_untradeable() {
        let mut state = three_players();
        state.grant(0, 0);
        state.grant(0, 1);
        state.grant(0, 2);
        state.properties[1].houses = 1;
        let directory = state.directory();
        assert!(!directory.is_color_tradeable(Color::Brown));
        assert_eq!(directory.tradeable_properties(0), vec![2]);
        assert!(directory.other_players_color_properties(Color::Brown, 1).is_empty());
        assert!(directory.other_players_color_properties(Color::Brown, 0).is_empty());

        state.properties[1].houses = 0;
        let directory = state.directory();
        assert_eq!(directory.other_players_color_properties(Color::Brown, 1), vec![0, 1]);
        assert!(directory.other_players_color_properties(Color::Brown, 0).is_empty());
    }

    #[test]
    fn jail_card_holders_and_seating() {
        let mut state = three_players();
        state.players[2].jail_cards = 1;
        let directory = state.directory();
        assert_eq!(directory.players_with_jail_cards(0), vec![2]);
        assert!(directory.players_with_jail_cards(2).is_empty());
        assert_eq!(directory.seats_after(1), vec![2, 0]);
    }
}
