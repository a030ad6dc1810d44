use std::collections::HashSet;
use std::ops::{Index, IndexMut};

use crate::board::MAX_HOUSES;
use crate::game::state::GameState;
use crate::game::table::Table;
use crate::types::{Color, Money, PlayerId};

pub const MIN_BUILD_CASH: Money = 200;

/// Expected extra rent per opponent turn from the n-th house on a group,
/// estimated from landing frequencies.
const MARGINAL_INCOME: [[f64; 5]; 8] = [
    [0.34, 1.14, 3.43, 3.99, 4.56],
    [1.35, 4.13, 12.81, 9.36, 10.32],
    [2.39, 7.97, 23.04, 13.74, 10.76],
    [3.85, 11.71, 31.58, 17.60, 17.60],
    [4.86, 14.86, 39.23, 15.26, 15.26],
    [5.41, 18.04, 37.97, 13.94, 13.94],
    [6.46, 21.25, 40.79, 15.60, 14.26],
    [4.90, 16.96, 32.31, 11.25, 11.25],
];

/// Income gained by raising `color` from `level` houses to `level + 1`.
pub fn marginal_income(color: Color, level: u8) -> f64 {
    if !color.is_buildable() || level >= MAX_HOUSES {
        return 0.0;
    }
    MARGINAL_INCOME[color.index()][level as usize]
}

/// Levels added to (or removed from) each street group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HouseCounts([u8; 8]);

impl HouseCounts {
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|n| *n == 0)
    }

    /// Non-zero entries in board order.
    pub fn levels(&self) -> impl Iterator<Item = (Color, u8)> + '_ {
        Color::BUILDABLE
            .into_iter()
            .zip(self.0.iter().copied())
            .filter(|(_, n)| *n > 0)
    }
}

impl Index<Color> for HouseCounts {
    type Output = u8;

    fn index(&self, color: Color) -> &u8 {
        &self.0[color.index()]
    }
}

impl IndexMut<Color> for HouseCounts {
    fn index_mut(&mut self, color: Color) -> &mut u8 {
        &mut self.0[color.index()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildPlan {
    pub levels: HouseCounts,
    pub income: f64,
    pub cost: Money,
}

struct Group {
    color: Color,
    houses: u8,
    level_cost: Money,
}

struct BuildSearch {
    groups: Vec<Group>,
    visited: HashSet<HouseCounts>,
}

impl BuildSearch {
    fn search(&mut self, money_left: Money, built: HouseCounts, income: f64) -> Option<(HouseCounts, f64)> {
        if money_left < 0 || !self.visited.insert(built) {
            return None;
        }
        let mut best = (built, income);
        for i in 0..self.groups.len() {
            let (color, level, cost) = {
                let group = &self.groups[i];
                (group.color, group.houses + built[group.color], group.level_cost)
            };
            if level >= MAX_HOUSES {
                continue;
            }
            let mut next = built;
            next[color] += 1;
            let gain = marginal_income(color, level);
            if let Some(result) = self.search(money_left - cost, next, income + gain) {
                if result.1 > best.1 {
                    best = result;
                }
            }
        }
        Some(best)
    }
}

/// Best set of whole-group levels to add with the cash on hand. Groups with
/// a mortgaged deed are left alone.
pub fn plan_development(state: &GameState, me: PlayerId) -> Option<BuildPlan> {
    let player = &state.players[me];
    let groups = state
        .directory()
        .buildable_colors(me)
        .into_iter()
        .filter(|color| {
            player
                .holdings(*color)
                .iter()
                .all(|id| !state.properties[*id].mortgaged)
        })
        .map(|color| {
            let holdings = player.holdings(color);
            let build_cost = state.properties[holdings[0]].deed.build_cost();
            Group {
                color,
                houses: state.group_houses(me, color),
                level_cost: build_cost * holdings.len() as Money,
            }
        })
        .collect::<Vec<_>>();
    if groups.is_empty() {
        return None;
    }

    let mut search = BuildSearch {
        groups,
        visited: HashSet::new(),
    };
    let (levels, income) = search.search(player.cash, HouseCounts::default(), 0.0)?;
    log::trace!("build search visited {} combinations", search.visited.len());
    let cost = levels
        .levels()
        .map(|(color, n)| {
            let group = search.groups.iter().find(|g| g.color == color);
            group.map_or(0, |g| g.level_cost * n as Money)
        })
        .sum();
    Some(BuildPlan {
        levels,
        income,
        cost,
    })
}

pub fn resolve_development(table: &mut Table<'_>, me: PlayerId) {
    if table.cash(me) < MIN_BUILD_CASH || table.directory().buildable_colors(me).is_empty() {
        return;
    }
    let Some(plan) = plan_development(table.state, me) else {
        return;
    };
    if plan.income <= 0.0 || plan.levels.is_empty() {
        return;
    }
    log::debug!(
        "player {} builds {:?} for ${} (+{:.2} income)",
        me + 1,
        plan.levels.levels().collect::<Vec<_>>(),
        plan.cost,
        plan.income
    );
    for (color, levels) in plan.levels.levels() {
        let holdings = table.state.players[me].sorted_holdings(color);
        for _ in 0..levels {
            for property in holdings.iter().copied() {
                table.build_house(property);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::GameConfig;

    fn state_with(cash: Money, deeds: &[usize]) -> GameState {
        let mut state = GameState::new(GameConfig {
            num_players: 2,
            ..GameConfig::default()
        })
        .unwrap();
        for id in deeds {
            state.grant(0, *id);
        }
        state.players[0].cash = cash;
        state
    }

    #[test]
    fn marginal_income_is_zero_past_a_hotel() {
        assert_eq!(marginal_income(Color::Green, 0), 6.46);
        assert_eq!(marginal_income(Color::Green, 5), 0.0);
        assert_eq!(marginal_income(Color::Railroad, 0), 0.0);
    }

    #[test]
    fn budget_limits_levels() {
        // Light blue costs 150 a level.
        let state = state_with(320, &[3, 4, 5]);
        let plan = plan_development(&state, 0).unwrap();
        assert_eq!(plan.levels[Color::LightBlue], 2);
        assert_eq!(plan.cost, 300);
        assert!((plan.income - (1.35 + 4.13)).abs() < 1e-9);
    }

    #[test]
    fn never_plans_past_a_hotel() {
        let mut state = state_with(100_000, &[0, 1]);
        state.properties[0].houses = 4;
        state.properties[1].houses = 4;
        let plan = plan_development(&state, 0).unwrap();
        assert_eq!(plan.levels[Color::Brown], 1);
    }

    #[test]
    fn mortgaged_groups_are_skipped() {
        let mut state = state_with(5000, &[0, 1, 26, 27]);
        state.set_mortgaged(26, true);
        let plan = plan_development(&state, 0).unwrap();
        assert_eq!(plan.levels[Color::DarkBlue], 0);
        assert_eq!(plan.levels[Color::Brown], 5);
    }

    #[test]
    fn cheap_levels_can_beat_one_expensive_level() {
        // Brown costs 100 a level, dark blue 400.
        let state = state_with(450, &[0, 1, 26, 27]);
        let plan = plan_development(&state, 0).unwrap();
        assert_eq!(plan.levels[Color::Brown], 4);
        assert_eq!(plan.levels[Color::DarkBlue], 0);
        assert_eq!(plan.cost, 400);
    }
}
