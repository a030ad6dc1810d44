use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use crate::game::GameSummary;
use crate::types::PlayerId;

#[derive(Debug, Default, Clone, Serialize)]
pub struct GameStats {
    pub games: u32,
    pub wins: BTreeMap<PlayerId, u32>,
    /// Games that ended with this seat's cash below zero.
    pub losses: BTreeMap<PlayerId, u32>,
    pub total_turns: u64,
    pub total_trades: u64,
    pub turn_limit_games: u32,
    #[serde(skip)]
    pub total_duration: Duration,
}

impl GameStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_game(&mut self, summary: &GameSummary, duration: Duration) {
        self.games += 1;
        self.total_duration += duration;
        self.total_turns += summary.turns as u64;
        self.total_trades += summary.trades as u64;
        *self.wins.entry(summary.winner).or_insert(0) += 1;
        match summary.loser {
            Some(loser) => *self.losses.entry(loser).or_insert(0) += 1,
            None => self.turn_limit_games += 1,
        }
    }

    pub fn merge(&mut self, other: GameStats) {
        self.games += other.games;
        self.total_turns += other.total_turns;
        self.total_trades += other.total_trades;
        self.turn_limit_games += other.turn_limit_games;
        self.total_duration += other.total_duration;
        for (player, wins) in other.wins {
            *self.wins.entry(player).or_insert(0) += wins;
        }
        for (player, losses) in other.losses {
            *self.losses.entry(player).or_insert(0) += losses;
        }
    }

    pub fn win_rate(&self, player: PlayerId) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.wins.get(&player).copied().unwrap_or(0) as f64 / self.games as f64
    }

    pub fn get_avg_turns(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_turns as f64 / self.games as f64
    }

    pub fn get_avg_trades(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_trades as f64 / self.games as f64
    }

    pub fn get_avg_duration(&self) -> Duration {
        if self.games == 0 {
            return Duration::ZERO;
        }
        self.total_duration / self.games
    }
}

#[derive(Debug, Default)]
pub struct StatisticsAccumulator {
    pub stats: GameStats,
}

impl StatisticsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn after(&mut self, summary: &GameSummary, duration: Duration) {
        self.stats.record_game(summary, duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(winner: PlayerId, loser: Option<PlayerId>, turns: u32) -> GameSummary {
        GameSummary {
            id: String::new(),
            seed: 0,
            turns,
            loser,
            winner,
            trades: 2,
            standings: vec![],
        }
    }

    #[test]
    fn records_wins_losses_and_averages() {
        let mut acc = StatisticsAccumulator::new();
        acc.after(&summary(0, Some(1), 100), Duration::from_millis(10));
        acc.after(&summary(0, None, 300), Duration::from_millis(30));
        let stats = &acc.stats;
        assert_eq!(stats.games, 2);
        assert_eq!(stats.wins[&0], 2);
        assert_eq!(stats.losses[&1], 1);
        assert_eq!(stats.turn_limit_games, 1);
        assert_eq!(stats.get_avg_turns(), 200.0);
        assert_eq!(stats.get_avg_trades(), 2.0);
        assert_eq!(stats.get_avg_duration(), Duration::from_millis(20));
        assert_eq!(stats.win_rate(1), 0.0);
    }

    #[test]
    fn merging_adds_counts() {
        let mut a = GameStats::new();
        a.record_game(&summary(1, None, 10), Duration::ZERO);
        let mut b = GameStats::new();
        b.record_game(&summary(1, Some(0), 20), Duration::ZERO);
        a.merge(b);
        assert_eq!(a.games, 2);
        assert_eq!(a.wins[&1], 2);
        assert_eq!(a.total_turns, 30);
    }
}
