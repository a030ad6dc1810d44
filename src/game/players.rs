use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::{self, Deed};
use crate::types::{Color, ColorMap, Money, PlayerId, PropertyId, Token};

pub const STARTING_CASH: Money = 1500;
pub const JAIL_TURNS: u8 = 3;
pub const JAIL_FEE: Money = 50;

pub type GroupHoldings = SmallVec<[PropertyId; 4]>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,
    pub token: Token,
    pub cash: Money,
    pub position: usize,
    pub properties: BTreeSet<PropertyId>,
    pub by_color: ColorMap<GroupHoldings>,
    pub mortgaged: BTreeSet<PropertyId>,
    pub jail_cards: u32,
    pub jail_turns: u8,
}

impl PlayerState {
    pub fn new(id: PlayerId, token: Token, cash: Money) -> Self {
        Self {
            id,
            token,
            cash,
            position: 0,
            properties: BTreeSet::new(),
            by_color: ColorMap::default(),
            mortgaged: BTreeSet::new(),
            jail_cards: 0,
            jail_turns: 0,
        }
    }

    /// One-based seat number used in narration.
    pub fn number(&self) -> usize {
        self.id + 1
    }

    pub fn owns(&self, property: PropertyId) -> bool {
        self.properties.contains(&property)
    }

    pub fn count_in(&self, color: Color) -> usize {
        self.by_color[color].len()
    }

    pub fn holdings(&self, color: Color) -> &[PropertyId] {
        &self.by_color[color]
    }

    pub fn in_jail(&self) -> bool {
        self.jail_turns > 0
    }

    pub fn all_mortgaged(&self) -> bool {
        self.mortgaged.len() == self.properties.len()
    }

    pub(crate) fn add_deed(&mut self, deed: &Deed, mortgaged: bool) {
        if self.properties.insert(deed.id) {
            self.by_color[deed.color].push(deed.id);
        }
        if mortgaged {
            self.mortgaged.insert(deed.id);
        }
    }

    pub(crate) fn remove_deed(&mut self, deed: &Deed) {
        self.properties.remove(&deed.id);
        self.mortgaged.remove(&deed.id);
        self.by_color[deed.color].retain(|id| *id != deed.id);
    }

    /// Group holdings in ascending cost, the order searches take them in.
    pub fn sorted_holdings(&self, color: Color) -> GroupHoldings {
        let mut ids = self.by_color[color].clone();
        ids.sort_by_key(|id| (board::deed(*id).cost, *id));
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_index_tracks_owned_set() {
        let mut player = PlayerState::new(0, Token::Boot, STARTING_CASH);
        let oriental = board::deed(3);
        let connecticut = board::deed(5);
        player.add_deed(oriental, false);
        player.add_deed(connecticut, true);
        player.add_deed(connecticut, true);
        assert_eq!(player.count_in(Color::LightBlue), 2);
        assert!(player.mortgaged.contains(&connecticut.id));

        player.remove_deed(connecticut);
        assert_eq!(player.holdings(Color::LightBlue), &[oriental.id]);
        assert!(player.mortgaged.is_empty());
        assert!(!player.owns(connecticut.id));
    }
}
