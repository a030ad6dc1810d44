use std::collections::HashSet;

use crate::board;
use crate::game::state::GameState;
use crate::game::table::Table;
use crate::players::development::{HouseCounts, marginal_income};
use crate::players::worth::{mortgage_yield, property_worth};
use crate::types::{Color, ColorMap, Money, OwnershipDegree, PlayerId, PropertyId, Worth};

/// Mortgage passes, each allowed to touch groups up to this degree.
const MORTGAGE_PASSES: [OwnershipDegree; 3] = [
    OwnershipDegree::One,
    OwnershipDegree::AlmostMonopoly,
    OwnershipDegree::Monopoly,
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MortgagePlan {
    pub properties: Vec<PropertyId>,
    pub loss: Worth,
}

/// Branch and bound over subsets of `candidates`. Each further deed of a
/// color is valued one count lower, so taking a whole group costs less than
/// the sum of its parts.
struct MortgageSearch<'s> {
    state: &'s GameState,
    me: PlayerId,
    shortfall: Money,
    candidates: Vec<PropertyId>,
    /// Mortgage value still available from `candidates[i..]`.
    remaining: Vec<Money>,
    taken: ColorMap<i32>,
    chosen: Vec<PropertyId>,
    best: Option<MortgagePlan>,
    nodes: usize,
}

impl MortgageSearch<'_> {
    fn search(&mut self, index: usize, raised: Money, loss: Worth) {
        self.nodes += 1;
        if raised >= self.shortfall {
            if self.best.as_ref().is_none_or(|best| loss < best.loss) {
                self.best = Some(MortgagePlan {
                    properties: self.chosen.clone(),
                    loss,
                });
            }
            return;
        }
        if index == self.candidates.len() {
            return;
        }
        if self.best.as_ref().is_some_and(|best| loss >= best.loss) {
            return;
        }
        if raised + self.remaining[index] < self.shortfall {
            return;
        }

        let property = self.candidates[index];
        let deed = board::deed(property);
        let worth = property_worth(self.state, self.me, property, -self.taken[deed.color]);
        self.taken[deed.color] += 1;
        self.chosen.push(property);
        self.search(index + 1, raised + deed.mortgage_amount(), loss + worth);
        self.chosen.pop();
        self.taken[deed.color] -= 1;

        self.search(index + 1, raised, loss);
    }
}

/// Cheapest subset of `candidates`, by worth lost, whose mortgage value
/// covers `shortfall`. When nothing covers it every candidate is taken.
pub fn plan_mortgages(
    state: &GameState,
    me: PlayerId,
    candidates: &[PropertyId],
    shortfall: Money,
) -> MortgagePlan {
    if candidates.is_empty() || shortfall <= 0 {
        return MortgagePlan::default();
    }
    let mut candidates = candidates.to_vec();
    candidates.sort_by_key(|id| {
        let deed = board::deed(*id);
        (deed.color, deed.cost, *id)
    });
    let mut remaining = vec![0; candidates.len() + 1];
    for i in (0..candidates.len()).rev() {
        remaining[i] = remaining[i + 1] + board::deed(candidates[i]).mortgage_amount();
    }

    let mut search = MortgageSearch {
        state,
        me,
        shortfall,
        candidates,
        remaining,
        taken: ColorMap::default(),
        chosen: Vec::new(),
        best: None,
        nodes: 0,
    };
    search.search(0, 0, 0);
    log::trace!("mortgage search visited {} nodes", search.nodes);

    search.best.unwrap_or_else(|| {
        let mut taken: ColorMap<i32> = ColorMap::default();
        let loss = search
            .candidates
            .iter()
            .map(|id| {
                let color = board::deed(*id).color;
                let worth = property_worth(state, me, *id, -taken[color]);
                taken[color] += 1;
                worth
            })
            .sum();
        MortgagePlan {
            properties: search.candidates,
            loss,
        }
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalePlan {
    pub levels: HouseCounts,
    /// Cash still missing after the sale, zero or negative once covered.
    pub deficit: Money,
    /// Rent income given up, as a negative number.
    pub income: f64,
}

impl SalePlan {
    /// Smaller deficit wins until both are covered, then kept income decides.
    fn improves_on(&self, other: &SalePlan) -> bool {
        if (self.deficit <= 0 && other.deficit <= 0) || self.deficit == other.deficit {
            self.income > other.income
        } else {
            self.deficit < other.deficit
        }
    }
}

struct SaleGroup {
    color: Color,
    houses: u8,
    level_value: Money,
}

struct SaleSearch {
    groups: Vec<SaleGroup>,
    visited: HashSet<HouseCounts>,
}

impl SaleSearch {
    fn search(&mut self, deficit: Money, sold: HouseCounts, income: f64) -> Option<SalePlan> {
        let here = SalePlan {
            levels: sold,
            deficit,
            income,
        };
        if deficit <= 0 {
            return Some(here);
        }
        if !self.visited.insert(sold) {
            return None;
        }
        let mut best = here;
        for i in 0..self.groups.len() {
            let (color, houses, value) = {
                let group = &self.groups[i];
                (group.color, group.houses, group.level_value)
            };
            if sold[color] >= houses {
                continue;
            }
            let mut next = sold;
            next[color] += 1;
            let lost = marginal_income(color, houses - next[color]);
            if let Some(result) = self.search(deficit - value, next, income - lost) {
                if result.improves_on(&best) {
                    best = result;
                }
            }
        }
        Some(best)
    }
}

/// Whole-group house sales raising `deficit` while giving up the least income.
pub fn plan_house_sales(state: &GameState, me: PlayerId, deficit: Money) -> SalePlan {
    let player = &state.players[me];
    let groups = state
        .directory()
        .buildable_colors(me)
        .into_iter()
        .filter_map(|color| {
            let houses = state.group_houses(me, color);
            if houses == 0 {
                return None;
            }
            let holdings = player.holdings(color);
            let build_cost = state.properties[holdings[0]].deed.build_cost();
            Some(SaleGroup {
                color,
                houses,
                level_value: build_cost / 2 * holdings.len() as Money,
            })
        })
        .collect::<Vec<_>>();

    let mut search = SaleSearch {
        groups,
        visited: HashSet::new(),
    };
    let plan = search.search(deficit, HouseCounts::default(), 0.0);
    log::trace!("sale search visited {} combinations", search.visited.len());
    plan.unwrap_or(SalePlan {
        levels: HouseCounts::default(),
        deficit,
        income: 0.0,
    })
}

fn apply_mortgages(table: &mut Table<'_>, me: PlayerId, candidates: &[PropertyId], amount: Money) {
    let shortfall = amount - table.cash(me);
    let plan = plan_mortgages(table.state, me, candidates, shortfall);
    if plan.properties.is_empty() {
        return;
    }
    log::debug!(
        "player {} mortgages {} deeds to cover ${} (worth lost {})",
        me + 1,
        plan.properties.len(),
        shortfall,
        plan.loss
    );
    for property in plan.properties {
        table.mortgage(property);
    }
}

/// Raise enough cash to pay `amount`: bare deeds first in widening passes,
/// then houses, then the deeds those houses stood on.
pub fn decide_mortgage(table: &mut Table<'_>, me: PlayerId, amount: Money) {
    let player = &table.state.players[me];
    if player.properties.is_empty() || player.all_mortgaged() || player.cash >= amount {
        return;
    }

    for degree in MORTGAGE_PASSES {
        let (total, candidates) = mortgage_yield(table.state, me, degree);
        if total + table.cash(me) >= amount || degree == OwnershipDegree::Monopoly {
            apply_mortgages(table, me, &candidates, amount);
            break;
        }
    }
    if table.cash(me) >= amount {
        return;
    }

    let sale = plan_house_sales(table.state, me, amount - table.cash(me));
    if !sale.levels.is_empty() {
        log::debug!(
            "player {} sells {:?} (income {:.2})",
            me + 1,
            sale.levels.levels().collect::<Vec<_>>(),
            sale.income
        );
    }
    for (color, levels) in sale.levels.levels() {
        let holdings = table.state.players[me].sorted_holdings(color);
        for _ in 0..levels {
            for property in holdings.iter().copied() {
                table.sell_house(property);
            }
        }
    }
    if table.cash(me) >= amount {
        return;
    }

    let (_, candidates) = mortgage_yield(table.state, me, OwnershipDegree::Monopoly);
    apply_mortgages(table, me, &candidates, amount);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::GameConfig;
    use itertools::Itertools;

    fn state_with(deeds: &[usize]) -> GameState {
        let mut state = GameState::new(GameConfig {
            num_players: 2,
            ..GameConfig::default()
        })
        .unwrap();
        for id in deeds {
            state.grant(0, *id);
        }
        state
    }

    fn subset_loss(state: &GameState, subset: &[PropertyId]) -> Worth {
        let mut taken: ColorMap<i32> = ColorMap::default();
        let mut sorted = subset.to_vec();
        sorted.sort_by_key(|id| {
            let deed = board::deed(*id);
            (deed.color, deed.cost, *id)
        });
        sorted
            .iter()
            .map(|id| {
                let color = board::deed(*id).color;
                let worth = property_worth(state, 0, *id, -taken[color]);
                taken[color] += 1;
                worth
            })
            .sum()
    }

    #[test]
    fn empty_inputs_plan_nothing() {
        let state = state_with(&[3]);
        assert_eq!(plan_mortgages(&state, 0, &[], 100), MortgagePlan::default());
        assert_eq!(plan_mortgages(&state, 0, &[3], 0), MortgagePlan::default());
    }

    #[test]
    fn matches_brute_force_on_small_holdings() {
        let deeds = [2, 3, 7, 27];
        let state = state_with(&deeds);
        for shortfall in [1, 50, 120, 200, 260, 320] {
            let plan = plan_mortgages(&state, 0, &deeds, shortfall);
            let raised: Money = plan
                .properties
                .iter()
                .map(|id| board::deed(*id).mortgage_amount())
                .sum();
            assert!(raised >= shortfall, "shortfall {shortfall}");

            let best = (0..=deeds.len())
                .flat_map(|k| deeds.iter().copied().combinations(k))
                .filter(|subset| {
                    subset
                        .iter()
                        .map(|id| board::deed(*id).mortgage_amount())
                        .sum::<Money>()
                        >= shortfall
                })
                .map(|subset| subset_loss(&state, &subset))
                .min()
                .unwrap();
            assert_eq!(plan.loss, best, "shortfall {shortfall}");
        }
    }

    #[test]
    fn takes_everything_when_nothing_covers() {
        let state = state_with(&[0, 2]);
        let plan = plan_mortgages(&state, 0, &[0, 2], 10_000);
        assert_eq!(plan.properties, vec![0, 2]);
    }

    #[test]
    fn house_sales_cover_the_deficit_with_least_income_lost() {
        let mut state = state_with(&[0, 1, 26, 27]);
        for id in [0, 1, 26, 27] {
            state.properties[id].houses = 2;
        }
        // A brown level returns 50, a dark blue level 200.
        let plan = plan_house_sales(&state, 0, 100);
        assert!(plan.deficit <= 0);
        assert_eq!(plan.levels[Color::Brown], 2);
        assert_eq!(plan.levels[Color::DarkBlue], 0);

        let plan = plan_house_sales(&state, 0, 150);
        assert_eq!(plan.levels[Color::DarkBlue], 1);
        assert_eq!(plan.levels[Color::Brown], 0);
    }

    #[test]
    fn house_sales_get_as_close_as_possible() {
        let mut state = state_with(&[0, 1]);
        state.properties[0].houses = 1;
        state.properties[1].houses = 1;
        let plan = plan_house_sales(&state, 0, 500);
        assert_eq!(plan.levels[Color::Brown], 1);
        assert_eq!(plan.deficit, 450);
    }
}
