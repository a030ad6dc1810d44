use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use crate::board;
use crate::game::state::GameState;
use crate::game::table::Table;
use crate::game::trade::{TradeBundle, TradeOffer};
use crate::players::worth::property_worth;
use crate::types::{Color, ColorMap, Money, PlayerId, PropertyId, Worth};

/// Lowest gain a proposal may leave the recipient with.
pub const RECIPIENT_FLOOR: Worth = -100;
/// Side payment that turns a slightly losing deal into one worth taking.
pub const SWEETENER: Money = 100;
pub const JAIL_CARD_VALUE: Money = 50;
pub const JAIL_CARD_PRICE: Money = 30;

type OfferMask = u64;

fn bit(property: PropertyId) -> OfferMask {
    1 << property
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleOutcome {
    pub offered: OfferMask,
    pub gain: Worth,
    pub recipient_gain: Worth,
}

impl BundleOutcome {
    pub fn properties(&self) -> impl Iterator<Item = PropertyId> + '_ {
        (0..board::DEEDS.len()).filter(|id| self.offered & bit(*id) != 0)
    }
}

/// Grows the proposer's side of an offer one deed at a time until the
/// recipient stops losing more than `RECIPIENT_FLOOR`.
struct BundleSearch<'s> {
    state: &'s GameState,
    me: PlayerId,
    recipient: PlayerId,
    offerable: Vec<PropertyId>,
    visited: HashSet<OfferMask>,
}

impl BundleSearch<'_> {
    fn search(
        &mut self,
        offered: OfferMask,
        by_color: ColorMap<i32>,
        gain: Worth,
        recipient_gain: Worth,
    ) -> BundleOutcome {
        let here = BundleOutcome {
            offered,
            gain,
            recipient_gain,
        };
        let exhausted = self.offerable.iter().all(|id| offered & bit(*id) != 0);
        if gain <= 0 || recipient_gain >= RECIPIENT_FLOOR || exhausted {
            return here;
        }
        if !self.visited.insert(offered) {
            return here;
        }

        let mut best = here;
        let mut min_drop = Worth::MAX;
        for i in 0..self.offerable.len() {
            let property = self.offerable[i];
            if offered & bit(property) != 0 {
                continue;
            }
            let color = board::deed(property).color;
            let k = by_color[color];
            let next_gain = gain - property_worth(self.state, self.me, property, -k);
            let next_recipient_gain =
                recipient_gain + property_worth(self.state, self.recipient, property, k);
            let mut next_by_color = by_color.clone();
            next_by_color[color] += 1;

            let result = self.search(
                offered | bit(property),
                next_by_color,
                next_gain,
                next_recipient_gain,
            );
            let drop = gain - result.gain;
            if result.recipient_gain >= RECIPIENT_FLOOR && drop < min_drop {
                min_drop = drop;
                best = result;
            }
        }
        best
    }
}

/// Tradeable deeds held by other players, most valuable to `me` first.
fn trade_targets(state: &GameState, me: PlayerId) -> Vec<(Worth, PropertyId)> {
    let directory = state.directory();
    let mut queue = BinaryHeap::new();
    for color in Color::ALL {
        for property in directory.other_players_color_properties(color, me) {
            let worth = property_worth(state, me, property, 0);
            queue.push((worth, Reverse(board::deed(property).name), property));
        }
    }
    let mut targets = Vec::with_capacity(queue.len());
    while let Some((worth, _, property)) = queue.pop() {
        targets.push((worth, property));
    }
    targets
}

/// Offer for `target`, or None when no bundle makes it worth proposing.
pub fn build_offer(
    state: &GameState,
    me: PlayerId,
    target: PropertyId,
    threshold: Money,
) -> Option<TradeOffer> {
    let recipient = state.properties[target].owner?;
    if recipient == me {
        return None;
    }
    let gain = property_worth(state, me, target, 0);
    let recipient_gain = -property_worth(state, recipient, target, 0);

    let mut search = BundleSearch {
        state,
        me,
        recipient,
        offerable: state.directory().tradeable_properties(me),
        visited: HashSet::new(),
    };
    let outcome = search.search(0, ColorMap::default(), gain, recipient_gain);
    log::trace!(
        "bundle search for {} visited {} bundles",
        board::deed(target),
        search.visited.len()
    );

    if outcome.gain <= 0 || outcome.recipient_gain < RECIPIENT_FLOOR {
        return None;
    }
    let mut initiator_bundle = TradeBundle {
        properties: outcome.properties().collect(),
        ..TradeBundle::default()
    };
    if outcome.recipient_gain <= 0 {
        if state.players[me].cash < SWEETENER {
            return None;
        }
        initiator_bundle.money += SWEETENER;
    }
    let mut recipient_bundle = TradeBundle {
        properties: vec![target],
        ..TradeBundle::default()
    };
    let excess = outcome.recipient_gain - gain;
    if excess > threshold {
        recipient_bundle.money += (excess - threshold) / 2 + 10;
    }

    Some(TradeOffer {
        initiator: me,
        recipient,
        initiator_bundle,
        recipient_bundle,
    })
}

/// Propose offers for the most valuable targets first, stopping at the first
/// one accepted. Offers declined before are never repeated.
pub fn decide_trade(table: &mut Table<'_>, me: PlayerId, threshold: Money) {
    let targets = trade_targets(table.state, me);
    for (worth, target) in targets {
        let Some(offer) = build_offer(table.state, me, target, threshold) else {
            continue;
        };
        if table.directory().has_been_declined(&offer) {
            continue;
        }
        log::debug!(
            "player {} proposes for {} (worth {})",
            me + 1,
            board::deed(target),
            worth
        );
        if table.resolve_trade(offer) {
            return;
        }
    }
}

/// Value of one jail-free card to `player`: it only matters while someone
/// else holds a set worth avoiding.
fn jail_card_value(state: &GameState, player: PlayerId) -> Money {
    if state.directory().other_player_has_monopoly(player) {
        JAIL_CARD_VALUE
    } else {
        0
    }
}

/// Responder's side of an offer: (responder gain, initiator gain), or None
/// when the money alone would leave the responder short.
pub fn evaluate_offer(state: &GameState, me: PlayerId, offer: &TradeOffer) -> Option<(Worth, Worth)> {
    let initiator = offer.initiator;
    let given = &offer.initiator_bundle;
    let asked = &offer.recipient_bundle;

    let mut gain = given.money - asked.money;
    let mut initiator_gain = asked.money - given.money;
    if state.players[me].cash + gain < 0 {
        return None;
    }

    let mut mine: ColorMap<i32> = ColorMap::default();
    let mut theirs: ColorMap<i32> = ColorMap::default();
    for property in asked.properties.iter().copied() {
        let color = board::deed(property).color;
        gain -= property_worth(state, me, property, mine[color]);
        mine[color] -= 1;
    }
    for property in given.properties.iter().copied() {
        let color = board::deed(property).color;
        initiator_gain -= property_worth(state, initiator, property, theirs[color]);
        theirs[color] -= 1;
    }
    for property in given.properties.iter().copied() {
        let color = board::deed(property).color;
        gain += property_worth(state, me, property, mine[color]);
        mine[color] += 1;
    }
    for property in asked.properties.iter().copied() {
        let color = board::deed(property).color;
        initiator_gain += property_worth(state, initiator, property, theirs[color]);
        theirs[color] += 1;
    }

    let value = jail_card_value(state, me);
    gain += value * given.jail_cards as Money;
    gain -= value * asked.jail_cards as Money;
    let value = jail_card_value(state, initiator);
    initiator_gain += value * asked.jail_cards as Money;
    initiator_gain -= value * given.jail_cards as Money;

    Some((gain, initiator_gain))
}

pub fn will_accept_trade_offer(
    state: &GameState,
    me: PlayerId,
    offer: &TradeOffer,
    threshold: Money,
) -> bool {
    if offer.initiator_bundle.is_empty() && offer.recipient_bundle.is_empty() {
        return false;
    }
    match evaluate_offer(state, me, offer) {
        Some((gain, initiator_gain)) => gain > 0 && initiator_gain - gain < threshold,
        None => false,
    }
}

/// Offer each holder `JAIL_CARD_PRICE` for a jail-free card until one sells.
pub fn buy_jail_card(table: &mut Table<'_>, me: PlayerId) -> bool {
    for holder in table.directory().players_with_jail_cards(me) {
        let mut offer = TradeOffer::new(me, holder);
        offer.recipient_bundle.jail_cards = 1;
        offer.initiator_bundle.money = JAIL_CARD_PRICE;
        if table.directory().has_been_declined(&offer) {
            continue;
        }
        if table.resolve_trade(offer) {
            return true;
        }
    }
    false
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
    fn empty_offer_is_rejected() {
        let state = state();
        assert!(!will_accept_trade_offer(&state, 1, &TradeOffer::new(0, 1), 1000));
    }

    #[test]
    fn rejects_offers_it_cannot_pay_for() {
        let mut state = state();
        state.grant(0, 27);
        state.players[1].cash = 50;
        let mut offer = TradeOffer::new(0, 1).offering([27]);
        offer.recipient_bundle.money = 100;
        assert!(evaluate_offer(&state, 1, &offer).is_none());
        assert!(!will_accept_trade_offer(&state, 1, &offer, 1000));
    }

    #[test]
    fn accepts_a_free_gift_and_weighs_threshold() {
        let mut state = state();
        state.grant(0, 3);
        let offer = TradeOffer::new(0, 1).offering([3]);
        let (gain, initiator_gain) = evaluate_offer(&state, 1, &offer).unwrap();
        assert_eq!(gain, 100);
        assert_eq!(initiator_gain, -100);
        assert!(will_accept_trade_offer(&state, 1, &offer, 1000));
        // A threshold below the gap makes the responder refuse.
        assert!(!will_accept_trade_offer(&state, 1, &offer, -300));
    }

    #[test]
    fn proposals_keep_both_sides_above_their_floors() {
        let mut state = state();
        // Player 0 needs Connecticut to finish light blue and holds spare deeds.
        state.grant(0, 3);
        state.grant(0, 4);
        state.grant(0, 2);
        state.grant(0, 7);
        state.grant(1, 5);
        let offer = build_offer(&state, 0, 5, 1000).unwrap();
        assert_eq!(offer.recipient_bundle.properties, vec![5]);
        assert!(!offer.initiator_bundle.properties.contains(&3));
        assert!(!offer.initiator_bundle.properties.contains(&4));

        let outcome_gain = property_worth(&state, 0, 5, 0)
            - offer
                .initiator_bundle
                .properties
                .iter()
                .map(|id| property_worth(&state, 0, *id, 0))
                .sum::<Worth>();
        assert!(outcome_gain > 0);
        let (responder_gain, _) = evaluate_offer(&state, 1, &offer).unwrap();
        assert!(responder_gain > RECIPIENT_FLOOR);
    }

    #[test]
    fn targets_are_ranked_by_worth_to_proposer() {
        let mut state = state();
        state.grant(0, 26);
        state.grant(1, 27);
        state.grant(1, 12);
        let targets = trade_targets(&state, 0);
        assert_eq!(targets[0], (4000, 27));
        assert_eq!(targets[1], (180, 12));
    }
}
