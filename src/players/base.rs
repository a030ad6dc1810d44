use crate::game::state::GameState;
use crate::game::table::Table;
use crate::game::trade::TradeOffer;
use crate::types::{Money, PlayerId, PropertyId};

/// Decision hooks a seat answers. Hooks that act on the game (mortgaging,
/// building, proposing trades) get the whole `Table`; pure questions only
/// see the state.
pub trait Strategy {
    fn name(&self) -> &'static str;

    /// Raise cash before `amount` is debited. Anything left unpaid drives the
    /// balance negative.
    fn decide_mortgage(&self, table: &mut Table<'_>, me: PlayerId, amount: Money);

    fn decide_unmortgage(&self, table: &mut Table<'_>, me: PlayerId);

    fn resolve_development(&self, table: &mut Table<'_>, me: PlayerId);

    fn decide_trade(&self, table: &mut Table<'_>, me: PlayerId);

    /// Called on a jailed turn. Returning true means the player already paid
    /// or played a card.
    fn will_get_out_of_jail(&self, table: &mut Table<'_>, me: PlayerId) -> bool;

    fn decide_purchase(&self, state: &GameState, me: PlayerId, property: PropertyId) -> bool;

    /// Anything below `current_bid + 10` drops out of the auction.
    fn decide_bid(
        &self,
        state: &GameState,
        me: PlayerId,
        property: PropertyId,
        current_bid: Money,
    ) -> Money;

    fn will_accept_trade_offer(&self, state: &GameState, me: PlayerId, offer: &TradeOffer) -> bool;
}
