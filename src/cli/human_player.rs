use std::io::{self, BufRead, Write};

use crossterm::style::{self, Color as TermColor, Stylize};
use itertools::Itertools;

use crate::board::{self, MAX_HOUSES};
use crate::game::players::JAIL_FEE;
use crate::game::state::{GameError, GameState};
use crate::game::table::{MIN_RAISE, Table};
use crate::game::trade::{TradeBundle, TradeOffer};
use crate::players::Strategy;
use crate::types::{Money, PlayerId, PropertyId};

/// Console seat. Every decision is a prompt on stdin; a closed or broken
/// stdin reads as an empty answer, which always means "no" or "done".
#[derive(Debug, Clone, Copy, Default)]
pub struct HumanPlayer;

impl HumanPlayer {
    pub fn new() -> Self {
        Self
    }
}

/// Deed name in its group's color.
pub fn paint(property: PropertyId) -> String {
    let deed = board::deed(property);
    style::style(deed.name)
        .with(TermColor::AnsiValue(deed.color.ansi_code()))
        .to_string()
}

fn paint_all(properties: impl IntoIterator<Item = PropertyId>) -> String {
    properties.into_iter().map(paint).join(", ")
}

fn ask(question: &str) -> String {
    print!("{} ", style::style(question).bold());
    let _ = io::stdout().flush();
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(_) => line.trim().to_string(),
        Err(_) => String::new(),
    }
}

fn confirm(question: &str) -> bool {
    matches!(ask(&format!("{question} [y/N]")).to_lowercase().as_str(), "y" | "yes")
}

fn ask_amount(question: &str) -> Money {
    loop {
        let answer = ask(question);
        if answer.is_empty() {
            return 0;
        }
        match answer.trim_start_matches('$').parse::<Money>() {
            Ok(amount) if amount >= 0 => return amount,
            _ => println!("enter a whole dollar amount"),
        }
    }
}

/// Comma separated deed names, each of which must be in `allowed`.
pub fn parse_property_list(
    state: &GameState,
    input: &str,
    allowed: &[PropertyId],
) -> Result<Vec<PropertyId>, GameError> {
    let mut picked = Vec::new();
    for name in input.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        let id = state.find_property(name)?;
        if !allowed.contains(&id) {
            return Err(GameError::UnknownProperty(name.to_string()));
        }
        if !picked.contains(&id) {
            picked.push(id);
        }
    }
    Ok(picked)
}

/// Houses go on the least developed deed of an unmortgaged full set.
pub fn can_build_on(state: &GameState, me: PlayerId, property: PropertyId) -> bool {
    let tile = &state.properties[property];
    let color = tile.color();
    if tile.owner != Some(me) || !state.directory().buildable_colors(me).contains(&color) {
        return false;
    }
    let holdings = state.players[me].holdings(color);
    if holdings.iter().any(|id| state.properties[*id].mortgaged) {
        return false;
    }
    tile.houses < MAX_HOUSES
        && tile.houses == state.group_houses(me, color)
        && state.players[me].cash >= tile.deed.build_cost()
}

/// Houses come off the most developed deed of the group first.
pub fn can_sell_from(state: &GameState, me: PlayerId, property: PropertyId) -> bool {
    let tile = &state.properties[property];
    if tile.owner != Some(me) || tile.houses == 0 {
        return false;
    }
    let most = state.players[me]
        .holdings(tile.color())
        .iter()
        .map(|id| state.properties[*id].houses)
        .max()
        .unwrap_or(0);
    tile.houses == most
}

fn can_mortgage(state: &GameState, me: PlayerId, property: PropertyId) -> bool {
    let tile = &state.properties[property];
    tile.owner == Some(me)
        && !tile.mortgaged
        && state.players[me]
            .holdings(tile.color())
            .iter()
            .all(|id| state.properties[*id].houses == 0)
}

fn pick_one(state: &GameState, question: &str, allowed: &[PropertyId]) -> Option<PropertyId> {
    loop {
        let answer = ask(question);
        if answer.is_empty() {
            return None;
        }
        match parse_property_list(state, &answer, allowed) {
            Ok(ids) if ids.len() == 1 => return Some(ids[0]),
            Ok(_) => println!("name exactly one property"),
            Err(e) => println!("{e}"),
        }
    }
}

fn pick_many(state: &GameState, question: &str, allowed: &[PropertyId]) -> Vec<PropertyId> {
    loop {
        let answer = ask(question);
        match parse_property_list(state, &answer, allowed) {
            Ok(ids) => return ids,
            Err(e) => println!("{e}"),
        }
    }
}

fn print_holdings(state: &GameState, me: PlayerId) {
    let player = &state.players[me];
    println!(
        "{} ${} | {}",
        style::style(format!("player {}", me + 1)).bold(),
        player.cash,
        player
            .properties
            .iter()
            .map(|id| {
                let tile = &state.properties[*id];
                match (tile.mortgaged, tile.houses) {
                    (true, _) => format!("{} (mortgaged)", paint(*id)),
                    (false, 0) => paint(*id),
                    (false, n) => format!("{} ({n})", paint(*id)),
                }
            })
            .join(", ")
    );
}

impl Strategy for HumanPlayer {
    fn name(&self) -> &'static str {
        "HumanPlayer"
    }

    fn decide_mortgage(&self, table: &mut Table<'_>, me: PlayerId, amount: Money) {
        while table.cash(me) < amount {
            let state = &*table.state;
            let mortgageable = state.players[me]
                .properties
                .iter()
                .copied()
                .filter(|id| can_mortgage(state, me, *id))
                .collect_vec();
            let sellable = state.players[me]
                .properties
                .iter()
                .copied()
                .filter(|id| can_sell_from(state, me, *id))
                .collect_vec();
            if mortgageable.is_empty() && sellable.is_empty() {
                return;
            }
            print_holdings(state, me);
            println!("you need ${amount} and have ${}", table.cash(me));
            if !mortgageable.is_empty() {
                println!("mortgage: {}", paint_all(mortgageable.iter().copied()));
            }
            if !sellable.is_empty() {
                println!("sell a house from: {}", paint_all(sellable.iter().copied()));
            }
            let allowed = mortgageable.iter().chain(&sellable).copied().collect_vec();
            let Some(property) = pick_one(state, "property (empty to stop):", &allowed) else {
                return;
            };
            if mortgageable.contains(&property) {
                table.mortgage(property);
            } else {
                table.sell_house(property);
            }
        }
    }

    fn decide_unmortgage(&self, table: &mut Table<'_>, me: PlayerId) {
        loop {
            let state = &*table.state;
            let cash = state.players[me].cash;
            let affordable = state.players[me]
                .mortgaged
                .iter()
                .copied()
                .filter(|id| board::deed(*id).unmortgage_amount() <= cash)
                .collect_vec();
            if affordable.is_empty() {
                return;
            }
            println!(
                "you have ${cash}; unmortgage: {}",
                affordable
                    .iter()
                    .map(|id| format!("{} ${}", paint(*id), board::deed(*id).unmortgage_amount()))
                    .join(", ")
            );
            match pick_one(state, "unmortgage (empty to skip):", &affordable) {
                Some(property) => table.unmortgage(property),
                None => return,
            }
        }
    }

    fn resolve_development(&self, table: &mut Table<'_>, me: PlayerId) {
        loop {
            let state = &*table.state;
            let buildable = state.players[me]
                .properties
                .iter()
                .copied()
                .filter(|id| can_build_on(state, me, *id))
                .collect_vec();
            if buildable.is_empty() {
                return;
            }
            print_holdings(state, me);
            println!(
                "build on: {}",
                buildable
                    .iter()
                    .map(|id| format!("{} ${}", paint(*id), board::deed(*id).build_cost()))
                    .join(", ")
            );
            match pick_one(state, "build a house on (empty to stop):", &buildable) {
                Some(property) => table.build_house(property),
                None => return,
            }
        }
    }

    fn decide_trade(&self, table: &mut Table<'_>, me: PlayerId) {
        if !confirm("propose a trade?") {
            return;
        }
        let state = &*table.state;
        for other in state.directory().seats_after(me) {
            println!(
                "player {}: {}",
                other + 1,
                paint_all(state.directory().tradeable_properties(other))
            );
        }
        let number = ask("trade with player number:");
        let Some(recipient) = number
            .parse::<usize>()
            .ok()
            .and_then(|n| state.find_player(n).ok())
            .filter(|id| *id != me)
        else {
            println!("no such opponent");
            return;
        };

        let mine = state.directory().tradeable_properties(me);
        let theirs = state.directory().tradeable_properties(recipient);
        let offer = TradeOffer {
            initiator: me,
            recipient,
            initiator_bundle: TradeBundle {
                properties: pick_many(state, "properties you give (comma separated):", &mine),
                money: ask_amount("cash you give:"),
                jail_cards: 0,
            },
            recipient_bundle: TradeBundle {
                properties: pick_many(state, "properties you ask for (comma separated):", &theirs),
                money: ask_amount("cash you ask for:"),
                jail_cards: 0,
            },
        };
        if offer.initiator_bundle.is_empty() && offer.recipient_bundle.is_empty() {
            return;
        }
        if offer.initiator_bundle.money > state.players[me].cash {
            println!("you cannot cover ${}", offer.initiator_bundle.money);
            return;
        }
        if table.directory().has_been_declined(&offer) {
            println!("player {} already turned that down", recipient + 1);
            return;
        }
        table.resolve_trade(offer);
    }

    fn will_get_out_of_jail(&self, table: &mut Table<'_>, me: PlayerId) -> bool {
        if table.state.players[me].jail_cards > 0 && confirm("use a get out of jail free card?") {
            table.state.players[me].jail_cards -= 1;
            return true;
        }
        if table.cash(me) >= JAIL_FEE && confirm(&format!("pay ${JAIL_FEE} to leave jail?")) {
            table.charge(me, JAIL_FEE);
            return true;
        }
        false
    }

    fn decide_purchase(&self, state: &GameState, me: PlayerId, property: PropertyId) -> bool {
        print_holdings(state, me);
        confirm(&format!(
            "buy {} for ${}?",
            paint(property),
            board::deed(property).cost
        ))
    }

    fn decide_bid(
        &self,
        state: &GameState,
        me: PlayerId,
        property: PropertyId,
        current_bid: Money,
    ) -> Money {
        let minimum = current_bid + MIN_RAISE;
        if state.players[me].cash < minimum {
            return 0;
        }
        loop {
            let bid = ask_amount(&format!(
                "auction for {}: bid at least ${minimum} (you have ${}, empty to pass):",
                paint(property),
                state.players[me].cash
            ));
            if bid == 0 || (bid >= minimum && bid <= state.players[me].cash) {
                return bid;
            }
            println!("bid between ${minimum} and ${}", state.players[me].cash);
        }
    }

    fn will_accept_trade_offer(&self, state: &GameState, me: PlayerId, offer: &TradeOffer) -> bool {
        print_holdings(state, me);
        println!(
            "player {} offers {} for {}",
            offer.initiator + 1,
            describe(&offer.initiator_bundle),
            describe(&offer.recipient_bundle)
        );
        confirm("accept?")
    }
}

fn describe(bundle: &TradeBundle) -> String {
    let mut parts = bundle.properties.iter().copied().map(paint).collect_vec();
    if bundle.money > 0 {
        parts.push(format!("${}", bundle.money));
    }
    if bundle.jail_cards > 0 {
        parts.push(format!("{} jail card(s)", bundle.jail_cards));
    }
    if parts.is_empty() {
        "nothing".to_string()
    } else {
        parts.join(" + ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::GameConfig;

    fn state() -> GameState {
        GameState::new(GameConfig {
            num_players: 2,
            num_humans: 1,
            ..GameConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn property_lists_only_accept_allowed_names() {
        let state = state();
        assert_eq!(
            parse_property_list(&state, "boardwalk, Park Place", &[26, 27]).unwrap(),
            vec![27, 26]
        );
        assert!(parse_property_list(&state, "", &[]).unwrap().is_empty());
        assert!(matches!(
            parse_property_list(&state, "Boardwalk", &[26]),
            Err(GameError::UnknownProperty(_))
        ));
        assert!(parse_property_list(&state, "Nowhere Lane", &[26]).is_err());
    }

    #[test]
    fn building_and_selling_stay_even() {
        let mut state = state();
        for id in [3, 4, 5] {
            state.grant(0, id);
        }
        state.properties[3].houses = 1;
        assert!(!can_build_on(&state, 0, 3));
        assert!(can_build_on(&state, 0, 4));
        assert!(can_sell_from(&state, 0, 3));
        assert!(!can_sell_from(&state, 0, 4));

        state.set_mortgaged(5, true);
        assert!(!can_build_on(&state, 0, 4));
        assert!(!can_build_on(&state, 1, 4));
    }

    #[test]
    fn built_groups_cannot_be_mortgaged() {
        let mut state = state();
        state.grant(0, 0);
        state.grant(0, 1);
        assert!(can_mortgage(&state, 0, 0));
        state.properties[1].houses = 1;
        assert!(!can_mortgage(&state, 0, 0));
    }
}
