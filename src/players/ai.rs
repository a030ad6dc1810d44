use crate::board::{self, MAX_HOUSES};
use crate::game::players::JAIL_FEE;
use crate::game::state::{DEFAULT_TRADE_THRESHOLD, GameState};
use crate::game::table::Table;
use crate::game::trade::TradeOffer;
use crate::players::base::Strategy;
use crate::players::worth::{available_capital, highest_worth_first, property_worth};
use crate::players::{development, liquidity, negotiator};
use crate::types::{Color, Money, OwnershipDegree, PlayerId, PropertyId};

/// Cash kept back before anything is unmortgaged.
pub const UNMORTGAGE_RESERVE: Money = 300;

/// Scripted player driven by the worth model and the bounded searches.
#[derive(Debug, Clone, Copy)]
pub struct AiPlayer {
    /// Largest amount by which a trade may favor the other side.
    pub trade_threshold: Money,
}

impl Default for AiPlayer {
    fn default() -> Self {
        Self {
            trade_threshold: DEFAULT_TRADE_THRESHOLD,
        }
    }
}

impl AiPlayer {
    pub fn new(trade_threshold: Money) -> Self {
        Self { trade_threshold }
    }

    /// Near-complete groups and railroads justify mortgaging singles to pay.
    fn stretches_for(state: &GameState, me: PlayerId, property: PropertyId) -> bool {
        let color = board::deed(property).color;
        color == Color::Railroad
            || state.directory().ownership_degree(me, color, 0) == OwnershipDegree::AlmostMonopoly
    }
}

impl Strategy for AiPlayer {
    fn name(&self) -> &'static str {
        "AiPlayer"
    }

    fn decide_mortgage(&self, table: &mut Table<'_>, me: PlayerId, amount: Money) {
        liquidity::decide_mortgage(table, me, amount);
    }

    fn decide_unmortgage(&self, table: &mut Table<'_>, me: PlayerId) {
        let mut budget = table.cash(me) - UNMORTGAGE_RESERVE;
        if budget < 0 {
            return;
        }
        let state = &*table.state;
        let room_to_build = state
            .directory()
            .buildable_colors(me)
            .into_iter()
            .flat_map(|color| state.players[me].holdings(color).to_vec())
            .any(|id| {
                let tile = &state.properties[id];
                !tile.mortgaged && tile.houses < MAX_HOUSES
            });
        if room_to_build {
            return;
        }

        let ranked = highest_worth_first(state, me, state.players[me].mortgaged.iter().copied());
        for property in ranked {
            let cost = board::deed(property).unmortgage_amount();
            if cost > budget {
                break;
            }
            budget -= cost;
            table.unmortgage(property);
        }
    }

    fn resolve_development(&self, table: &mut Table<'_>, me: PlayerId) {
        development::resolve_development(table, me);
    }

    fn decide_trade(&self, table: &mut Table<'_>, me: PlayerId) {
        negotiator::decide_trade(table, me, self.trade_threshold);
    }

    fn will_get_out_of_jail(&self, table: &mut Table<'_>, me: PlayerId) -> bool {
        if table.directory().other_player_has_monopoly(me) {
            return false;
        }
        if table.state.players[me].jail_cards == 0 {
            negotiator::buy_jail_card(table, me);
        }
        if table.state.players[me].jail_cards > 0 {
            table.state.players[me].jail_cards -= 1;
            log::info!("player {} uses a get out of jail free card", me + 1);
            return true;
        }
        if table.cash(me) < JAIL_FEE {
            return false;
        }
        table.charge(me, JAIL_FEE);
        true
    }

    fn decide_purchase(&self, state: &GameState, me: PlayerId, property: PropertyId) -> bool {
        let deed = board::deed(property);
        if Self::stretches_for(state, me, property)
            && available_capital(state, me, OwnershipDegree::One) >= deed.cost
        {
            return true;
        }
        deed.cost <= state.players[me].cash && deed.color != Color::Utility
    }

    fn decide_bid(
        &self,
        state: &GameState,
        me: PlayerId,
        property: PropertyId,
        current_bid: Money,
    ) -> Money {
        let deed = board::deed(property);
        let bid = current_bid + 10;
        if Self::stretches_for(state, me, property)
            && available_capital(state, me, OwnershipDegree::One) >= bid
        {
            return bid;
        }
        if bid > state.players[me].cash {
            return 0;
        }
        if deed.color == Color::Utility {
            return if bid <= deed.cost / 2 { bid } else { 0 };
        }
        if bid <= property_worth(state, me, property, 0) {
            bid
        } else {
            0
        }
    }

    fn will_accept_trade_offer(&self, state: &GameState, me: PlayerId, offer: &TradeOffer) -> bool {
        negotiator::will_accept_trade_offer(state, me, offer, self.trade_threshold)
    }
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
    fn buys_railroads_on_credit_but_not_utilities() {
        let mut state = state();
        let ai = AiPlayer::default();
        state.grant(0, 2);
        state.players[0].cash = 150;
        // Reading Railroad mortgages for 100, enough with 150 cash for another line.
        assert!(ai.decide_purchase(&state, 0, 10));
        state.players[0].cash = 1500;
        assert!(!ai.decide_purchase(&state, 0, 7));
        assert!(ai.decide_purchase(&state, 0, 3));
    }

    #[test]
    fn bids_stay_within_worth() {
        let state = state();
        let ai = AiPlayer::default();
        // Oriental Avenue is worth 100 to a player with no light blue.
        assert_eq!(ai.decide_bid(&state, 0, 3, 80), 90);
        assert_eq!(ai.decide_bid(&state, 0, 3, 95), 0);
        // Utilities only up to half price.
        assert_eq!(ai.decide_bid(&state, 0, 7, 60), 70);
        assert_eq!(ai.decide_bid(&state, 0, 7, 70), 0);
    }
}
