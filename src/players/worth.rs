use std::cmp::Reverse;

use crate::board;
use crate::game::state::GameState;
use crate::types::{Money, OwnershipDegree, PlayerId, PropertyId, Worth};

/// What `property` is worth to `owner`, as if they held `modifier` more (or
/// fewer) deeds of its color. A deed not currently theirs counts as one more.
pub fn property_worth(
    state: &GameState,
    owner: PlayerId,
    property: PropertyId,
    modifier: i32,
) -> Worth {
    let tile = &state.properties[property];
    let modifier = if tile.owner == Some(owner) {
        modifier
    } else {
        modifier + 1
    };
    let degree = state
        .directory()
        .ownership_degree(owner, tile.color(), modifier);
    let mut worth = tile.deed.cost;
    match degree {
        OwnershipDegree::Monopoly => worth *= 10,
        OwnershipDegree::AlmostMonopoly => worth *= 2,
        OwnershipDegree::None | OwnershipDegree::One => {}
    }
    if tile.mortgaged {
        worth -= tile.deed.unmortgage_amount();
    }
    worth
}

/// `properties` ordered by worth to `player`, highest first. Equal worths
/// fall back to name order.
pub fn highest_worth_first(
    state: &GameState,
    player: PlayerId,
    properties: impl IntoIterator<Item = PropertyId>,
) -> Vec<PropertyId> {
    let mut ranked = properties
        .into_iter()
        .map(|id| (property_worth(state, player, id, 0), id))
        .collect::<Vec<_>>();
    ranked.sort_by_key(|(worth, id)| (Reverse(*worth), board::deed(*id).name));
    ranked.into_iter().map(|(_, id)| id).collect()
}

/// Cash a player could raise by mortgaging bare deeds in groups where they
/// hold at most `max_degree`. Houses are not counted.
pub fn mortgage_yield(
    state: &GameState,
    player: PlayerId,
    max_degree: OwnershipDegree,
) -> (Money, Vec<PropertyId>) {
    let directory = state.directory();
    let candidates = state.players[player]
        .properties
        .iter()
        .copied()
        .filter(|id| {
            let tile = &state.properties[*id];
            !tile.mortgaged
                && !tile.is_built()
                && directory.ownership_degree(player, tile.color(), 0) <= max_degree
        })
        .collect::<Vec<_>>();
    let total = candidates
        .iter()
        .map(|id| board::deed(*id).mortgage_amount())
        .sum();
    (total, candidates)
}

pub fn available_capital(state: &GameState, player: PlayerId, max_degree: OwnershipDegree) -> Money {
    state.players[player].cash + mortgage_yield(state, player, max_degree).0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::GameConfig;

    fn state() -> GameState {
        GameState::new(GameConfig {
            num_players: 2,
            ..GameConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn worth_scales_with_group_progress() {
        let mut state = state();
        // Oriental Avenue for a player holding nothing light blue.
        assert_eq!(property_worth(&state, 0, 3, 0), 100);
        state.grant(0, 4);
        assert_eq!(property_worth(&state, 0, 3, 0), 200);
        state.grant(0, 5);
        assert_eq!(property_worth(&state, 0, 3, 0), 1000);
        // Held deeds are valued without the extra count.
        assert_eq!(property_worth(&state, 0, 4, 0), 200);
        assert_eq!(property_worth(&state, 0, 4, -1), 100);
    }

    #[test]
    fn mortgaged_deeds_carry_their_debt() {
        let mut state = state();
        state.grant(1, 27);
        state.set_mortgaged(27, true);
        // Boardwalk alone is almost a set; debt is 220.
        assert_eq!(property_worth(&state, 1, 27, 0), 800 - 220);
    }

    #[test]
    fn yield_skips_built_and_higher_degree_groups() {
        let mut state = state();
        for id in [0, 1, 2, 7] {
            state.grant(0, id);
        }
        let (total, candidates) = mortgage_yield(&state, 0, OwnershipDegree::One);
        assert_eq!(candidates, vec![2, 7]);
        assert_eq!(total, 100 + 75);
        state.properties[0].houses = 1;
        let (total, candidates) = mortgage_yield(&state, 0, OwnershipDegree::Monopoly);
        assert_eq!(candidates, vec![1, 2, 7]);
        assert_eq!(total, 30 + 100 + 75);
        assert_eq!(available_capital(&state, 0, OwnershipDegree::One), 1500 + 175);
    }

    #[test]
    fn ranking_breaks_ties_by_name() {
        let state = state();
        assert_eq!(highest_worth_first(&state, 0, [3, 4, 27]), vec![27, 3, 4]);
    }
}
