use std::collections::VecDeque;

use crate::board::{self, BOARD, GO_SALARY, JAIL, JUST_VISITING, MAX_HOUSES, Space, landmarks};
use crate::game::cards::{CardEffect, DeckKind};
use crate::game::directory::Directory;
use crate::game::players::JAIL_TURNS;
use crate::game::state::{GameEvent, GameState};
use crate::game::trade::TradeOffer;
use crate::players::Strategy;
use crate::types::{Money, PlayerId, PropertyId};

pub const LUXURY_TAX: Money = 100;
pub const INCOME_TAX_CAP: Money = 200;
pub const MIN_RAISE: Money = 10;

/// A game state together with the strategies seated at it. Every cash or
/// title change goes through here so the affected player's hooks run in
/// the right order.
pub struct Table<'a> {
    pub state: &'a mut GameState,
    seats: &'a [Box<dyn Strategy>],
}

impl<'a> Table<'a> {
    pub fn new(state: &'a mut GameState, seats: &'a [Box<dyn Strategy>]) -> Self {
        Self { state, seats }
    }

    pub fn seat(&self, player: PlayerId) -> &'a dyn Strategy {
        let seats = self.seats;
        &*seats[player]
    }

    pub fn directory(&self) -> Directory<'_> {
        self.state.directory()
    }

    pub fn cash(&self, player: PlayerId) -> Money {
        self.state.players[player].cash
    }

    /// Debit `amount`, giving the player a chance to raise cash first.
    pub fn charge(&mut self, player: PlayerId, amount: Money) {
        if amount == 0 {
            return;
        }
        self.seat(player).decide_mortgage(self, player, amount);
        let state = &mut self.state.players[player];
        state.cash -= amount;
        log::info!(
            "player {} loses ${} (${})",
            state.number(),
            amount,
            state.cash
        );
    }

    /// Credit `amount`. With `other_actions` the player then gets to trade,
    /// unmortgage and build, in that order.
    pub fn add_money(&mut self, player: PlayerId, amount: Money, other_actions: bool) {
        let state = &mut self.state.players[player];
        state.cash += amount;
        log::info!(
            "player {} gains ${} (${})",
            state.number(),
            amount,
            state.cash
        );
        if other_actions {
            self.follow_up(player, true);
        }
    }

    fn follow_up(&mut self, player: PlayerId, can_trade: bool) {
        let seat = self.seat(player);
        if can_trade {
            seat.decide_trade(self, player);
        }
        seat.decide_unmortgage(self, player);
        seat.resolve_development(self, player);
    }

    pub fn mortgage(&mut self, property: PropertyId) {
        let Some(owner) = self.state.properties[property].owner else {
            return;
        };
        let deed = self.state.properties[property].deed;
        if self.state.properties[property].mortgaged {
            return;
        }
        log::info!("player {} mortgages {}", owner + 1, deed);
        self.state.set_mortgaged(property, true);
        self.state.record(GameEvent::Mortgaged {
            player: owner,
            property,
        });
        self.add_money(owner, deed.mortgage_amount(), false);
    }

    pub fn unmortgage(&mut self, property: PropertyId) {
        let Some(owner) = self.state.properties[property].owner else {
            return;
        };
        let deed = self.state.properties[property].deed;
        if !self.state.properties[property].mortgaged {
            return;
        }
        log::info!("player {} unmortgages {}", owner + 1, deed);
        self.charge(owner, deed.unmortgage_amount());
        self.state.set_mortgaged(property, false);
        self.state.record(GameEvent::Unmortgaged {
            player: owner,
            property,
        });
    }

    pub fn build_house(&mut self, property: PropertyId) {
        let Some(owner) = self.state.properties[property].owner else {
            return;
        };
        let deed = self.state.properties[property].deed;
        if !deed.can_develop() || self.state.properties[property].houses >= MAX_HOUSES {
            return;
        }
        log::info!("player {} builds a house on {}", owner + 1, deed);
        self.charge(owner, deed.build_cost());
        self.state.properties[property].houses += 1;
        self.state.record(GameEvent::HouseBuilt {
            player: owner,
            property,
        });
    }

    pub fn sell_house(&mut self, property: PropertyId) {
        let Some(owner) = self.state.properties[property].owner else {
            return;
        };
        let deed = self.state.properties[property].deed;
        if self.state.properties[property].houses == 0 {
            return;
        }
        log::info!("player {} sells a house on {}", owner + 1, deed);
        self.add_money(owner, deed.build_cost() / 2, false);
        self.state.properties[property].houses -= 1;
        self.state.record(GameEvent::HouseSold {
            player: owner,
            property,
        });
    }

    /// Take title to `property`, then trade (when allowed), unmortgage and build.
    pub fn gain_real_estate(&mut self, player: PlayerId, property: PropertyId, can_trade: bool) {
        self.state.grant(player, property);
        self.follow_up(player, can_trade);
    }

    pub fn lose_real_estate(&mut self, player: PlayerId, property: PropertyId) {
        self.state.revoke(player, property);
    }

    /// Ask the recipient, then swap properties, money and cards in that order.
    /// Nobody unmortgages or builds until the whole exchange has settled.
    /// A refusal is remembered so the same offer is never made again.
    pub fn resolve_trade(&mut self, offer: TradeOffer) -> bool {
        let (initiator, recipient) = (offer.initiator, offer.recipient);
        log::info!("{offer}");

        let accepted = self
            .seat(recipient)
            .will_accept_trade_offer(self.state, recipient, &offer);
        if !accepted {
            log::info!("player {} declined the trade", recipient + 1);
            self.state.declined_offers.insert(offer.canonical_text());
            self.state.record(GameEvent::TradeDeclined(offer));
            return false;
        }
        log::info!("player {} accepted the trade", recipient + 1);

        for property in offer.initiator_bundle.properties.iter().copied() {
            self.lose_real_estate(initiator, property);
            self.state.grant(recipient, property);
        }
        for property in offer.recipient_bundle.properties.iter().copied() {
            self.lose_real_estate(recipient, property);
            self.state.grant(initiator, property);
        }

        if offer.initiator_bundle.money != 0 {
            self.charge(initiator, offer.initiator_bundle.money);
            self.add_money(recipient, offer.initiator_bundle.money, false);
        }
        if offer.recipient_bundle.money != 0 {
            self.charge(recipient, offer.recipient_bundle.money);
            self.add_money(initiator, offer.recipient_bundle.money, false);
        }

        let given = offer.initiator_bundle.jail_cards;
        let taken = offer.recipient_bundle.jail_cards;
        let cards = &mut self.state.players;
        cards[initiator].jail_cards = cards[initiator].jail_cards.saturating_sub(given) + taken;
        cards[recipient].jail_cards = cards[recipient].jail_cards.saturating_sub(taken) + given;

        self.state.record(GameEvent::TradeAccepted(offer));
        self.follow_up(initiator, false);
        self.follow_up(recipient, false);
        true
    }

    /// Move to `space`, collecting the Go salary when the move wraps.
    pub fn advance(&mut self, player: PlayerId, space: usize, card_multiplier: bool) {
        if self.state.players[player].position >= space {
            log::info!("player {} passes Go", player + 1);
            self.add_money(player, GO_SALARY, true);
        }
        self.land(player, space, card_multiplier);
    }

    /// Put the player on `space` and resolve it. Never pays the Go salary.
    pub fn land(&mut self, player: PlayerId, space: usize, card_multiplier: bool) {
        self.state.players[player].position = space;
        log::info!(
            "player {} lands on {}",
            player + 1,
            board::space_label(space)
        );
        match BOARD[space] {
            Space::Deed(property) => self.land_on_deed(player, property, card_multiplier),
            Space::Chance => self.draw_card(player, DeckKind::Chance),
            Space::CommunityChest => self.draw_card(player, DeckKind::CommunityChest),
            Space::IncomeTax => {
                let tax = (self.state.total_worth(player) / 10).min(INCOME_TAX_CAP);
                self.charge(player, tax);
            }
            Space::LuxuryTax => self.charge(player, LUXURY_TAX),
            Space::GoToJail => self.send_to_jail(player),
            Space::Go | Space::JustVisiting | Space::FreeParking => {}
        }
    }

    fn land_on_deed(&mut self, player: PlayerId, property: PropertyId, card_multiplier: bool) {
        let (owner, mortgaged) = {
            let tile = &self.state.properties[property];
            (tile.owner, tile.mortgaged)
        };
        match owner {
            Some(owner) if owner == player || mortgaged => {}
            Some(owner) => {
                let rent = self.state.rent(property, card_multiplier);
                log::info!(
                    "player {} must pay ${} rent to player {}",
                    player + 1,
                    rent,
                    owner + 1
                );
                self.charge(player, rent);
                self.add_money(owner, rent, true);
                self.state.record(GameEvent::RentPaid {
                    payer: player,
                    owner,
                    amount: rent,
                });
            }
            None => {
                let buys = self
                    .seat(player)
                    .decide_purchase(self.state, player, property);
                if buys {
                    self.purchase(player, property);
                } else {
                    self.perform_auction(property, player);
                }
            }
        }
    }

    pub fn purchase(&mut self, player: PlayerId, property: PropertyId) {
        let deed = board::deed(property);
        log::info!("player {} buys {}", player + 1, deed);
        self.charge(player, deed.cost);
        self.state.record(GameEvent::Purchased {
            player,
            property,
            price: deed.cost,
        });
        self.gain_real_estate(player, property, true);
    }

    /// Open outcry starting with the seat after `lander`. A bid must raise by
    /// at least `MIN_RAISE`; anything less drops that bidder for good.
    pub fn perform_auction(&mut self, property: PropertyId, lander: PlayerId) {
        let deed = board::deed(property);
        log::info!("performing auction for {deed}");
        let count = self.state.players.len();
        let mut queue = (1..=count)
            .map(|offset| (lander + offset) % count)
            .collect::<VecDeque<_>>();

        let mut highest: Option<PlayerId> = None;
        let mut current_bid = 0;
        while let Some(bidder) = queue.pop_front() {
            if highest == Some(bidder) {
                break;
            }
            let bid = self
                .seat(bidder)
                .decide_bid(self.state, bidder, property, current_bid);
            if bid < current_bid + MIN_RAISE {
                log::info!("player {} drops out of the auction", bidder + 1);
                continue;
            }
            log::info!("player {} bids ${}", bidder + 1, bid);
            highest = Some(bidder);
            current_bid = bid;
            queue.push_back(bidder);
        }

        let Some(winner) = highest else {
            log::info!("nobody bids on {deed}");
            return;
        };
        log::info!("player {} wins the auction", winner + 1);
        self.charge(winner, current_bid);
        self.state.record(GameEvent::AuctionWon {
            player: winner,
            property,
            price: current_bid,
        });
        self.gain_real_estate(winner, property, true);
    }

    pub fn send_to_jail(&mut self, player: PlayerId) {
        log::info!("player {} goes to jail", player + 1);
        let state = &mut self.state.players[player];
        state.position = JAIL;
        state.jail_turns = JAIL_TURNS;
        self.state.record(GameEvent::SentToJail { player });
    }

    pub fn release_from_jail(&mut self, player: PlayerId) {
        log::info!("player {} gets out of jail", player + 1);
        let state = &mut self.state.players[player];
        state.position = JUST_VISITING;
        state.jail_turns = 0;
    }

    fn draw_card(&mut self, player: PlayerId, kind: DeckKind) {
        let card = match kind {
            DeckKind::Chance => self.state.chance.draw(),
            DeckKind::CommunityChest => self.state.community_chest.draw(),
        };
        let Some(card) = card else {
            return;
        };
        log::info!("player {} draws {}: {}", player + 1, kind, card);
        self.apply_card(player, card);
    }

    pub fn apply_card(&mut self, player: PlayerId, card: CardEffect) {
        let position = self.state.players[player].position;
        let others = self.directory().seats_after(player);
        match card {
            CardEffect::AdvanceTo(space) => self.advance(player, space, false),
            CardEffect::NearestRailroad => {
                let target = nearest_railroad(position);
                self.advance(player, target, true);
            }
            CardEffect::NearestUtility => {
                let target = nearest_utility(position);
                self.advance(player, target, true);
            }
            CardEffect::Collect(amount) => self.add_money(player, amount, true),
            CardEffect::Pay(amount) => self.charge(player, amount),
            CardEffect::GoBack(spaces) => {
                let target = (position + board::BOARD_SIZE - spaces) % board::BOARD_SIZE;
                self.land(player, target, false);
            }
            CardEffect::GoToJail => self.send_to_jail(player),
            CardEffect::GetOutOfJailFree => self.state.players[player].jail_cards += 1,
            CardEffect::Repairs {
                per_house,
                per_hotel,
            } => {
                let total = self.state.players[player]
                    .properties
                    .iter()
                    .map(|id| &self.state.properties[*id])
                    .filter(|p| p.deed.can_develop())
                    .map(|p| match p.houses {
                        MAX_HOUSES => per_hotel,
                        houses => houses as Money * per_house,
                    })
                    .sum::<Money>();
                self.charge(player, total);
            }
            CardEffect::PayEachPlayer(amount) => {
                self.charge(player, amount * others.len() as Money);
                for other in others {
                    self.add_money(other, amount, true);
                }
            }
            CardEffect::CollectFromEachPlayer(amount) => {
                for other in others.iter().copied() {
                    self.charge(other, amount);
                }
                self.add_money(player, amount * others.len() as Money, true);
            }
        }
    }
}

fn nearest_railroad(position: usize) -> usize {
    if position < landmarks::READING_RAILROAD || position >= landmarks::SHORT_LINE {
        landmarks::READING_RAILROAD
    } else if position < landmarks::PENNSYLVANIA_RAILROAD {
        landmarks::PENNSYLVANIA_RAILROAD
    } else if position < landmarks::BO_RAILROAD {
        landmarks::BO_RAILROAD
    } else {
        landmarks::SHORT_LINE
    }
}

fn nearest_utility(position: usize) -> usize {
    if position < landmarks::ELECTRIC_COMPANY || position >= landmarks::WATER_WORKS {
        landmarks::ELECTRIC_COMPANY
    } else {
        landmarks::WATER_WORKS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_spaces_wrap_around_the_board() {
        assert_eq!(nearest_railroad(7), landmarks::PENNSYLVANIA_RAILROAD);
        assert_eq!(nearest_railroad(22), landmarks::BO_RAILROAD);
        assert_eq!(nearest_railroad(36), landmarks::READING_RAILROAD);
        assert_eq!(nearest_utility(7), landmarks::ELECTRIC_COMPANY);
        assert_eq!(nearest_utility(22), landmarks::WATER_WORKS);
        assert_eq!(nearest_utility(36), landmarks::ELECTRIC_COMPANY);
    }
}
