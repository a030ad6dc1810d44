use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::players::JAIL_FEE;
use crate::game::state::{GameConfig, GameError, GameEvent, GameState};
use crate::game::table::Table;
use crate::players::Strategy;
use crate::types::{Money, PlayerId, Token};

const DOUBLES_TO_JAIL: u8 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Standing {
    pub player: PlayerId,
    pub token: Token,
    pub cash: Money,
    pub total_worth: Money,
    pub properties: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSummary {
    pub id: String,
    pub seed: u64,
    pub turns: u32,
    pub loser: Option<PlayerId>,
    pub winner: PlayerId,
    pub trades: usize,
    pub standings: Vec<Standing>,
}

pub struct Game {
    pub seed: u64,
    pub id: Uuid,
    pub state: GameState,
    pub current_player: PlayerId,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        Ok(Self {
            seed: config.seed,
            id: Uuid::new_v4(),
            state: GameState::new(config)?,
            current_player: 0,
        })
    }

    /// Play turns until someone goes negative or the turn limit is reached.
    pub fn play(&mut self, seats: &[Box<dyn Strategy>]) -> Result<GameSummary, GameError> {
        if seats.len() != self.state.players.len() {
            return Err(GameError::InvalidPlayerCount(seats.len()));
        }
        while !self.is_over() {
            self.play_turn(seats);
        }
        if let Some(loser) = self.loser() {
            log::info!("game over: player {} lost", loser + 1);
            let cash = self.state.players[loser].cash;
            self.state.record(GameEvent::Bankrupt {
                player: loser,
                cash,
            });
        } else {
            log::info!("game over: turn limit of {} reached", self.state.config.turn_limit);
        }
        Ok(self.summary())
    }

    pub fn is_over(&self) -> bool {
        self.loser().is_some() || self.state.turn >= self.state.config.turn_limit
    }

    pub fn loser(&self) -> Option<PlayerId> {
        self.state.active_loser()
    }

    /// Highest cash wins; the earlier seat keeps a tie.
    pub fn winner(&self) -> PlayerId {
        self.state
            .players
            .iter()
            .rev()
            .max_by_key(|p| p.cash)
            .map_or(0, |p| p.id)
    }

    /// One player's turn, including extra rolls for doubles.
    pub fn play_turn(&mut self, seats: &[Box<dyn Strategy>]) {
        let player = self.current_player;
        self.state.turn += 1;
        log::info!("player {}'s turn", player + 1);

        let mut table = Table::new(&mut self.state, seats);
        let mut doubles = 0;
        loop {
            let (d1, d2) = table.state.roll_dice();

            if table.state.players[player].in_jail() {
                log::info!("player {} is in jail", player + 1);
                let freed = table.seat(player).will_get_out_of_jail(&mut table, player) || d1 == d2;
                if freed {
                    table.release_from_jail(player);
                } else if table.state.players[player].jail_turns == 1 {
                    table.charge(player, JAIL_FEE);
                    table.release_from_jail(player);
                } else {
                    let state = &mut table.state.players[player];
                    state.jail_turns -= 1;
                    log::info!(
                        "player {} rolls {} and {}, {} more turns in jail",
                        player + 1,
                        d1,
                        d2,
                        state.jail_turns
                    );
                    break;
                }
            } else if d1 == d2 {
                doubles += 1;
                if doubles >= DOUBLES_TO_JAIL {
                    log::info!("player {} rolled doubles three times", player + 1);
                    table.send_to_jail(player);
                    break;
                }
            }

            log::info!("player {} rolls {} and {}", player + 1, d1, d2);
            let next = table.state.next_position(player);
            table.advance(player, next, false);

            let stop = table.state.active_loser().is_some()
                || table.state.players[player].in_jail()
                || doubles == 0
                || d1 != d2;
            if stop {
                break;
            }
        }

        self.current_player = (player + 1) % self.state.players.len();
    }

    pub fn summary(&self) -> GameSummary {
        let mut standings = self
            .state
            .players
            .iter()
            .map(|p| Standing {
                player: p.id,
                token: p.token,
                cash: p.cash,
                total_worth: self.state.total_worth(p.id),
                properties: p.properties.len(),
            })
            .collect::<Vec<_>>();
        standings.sort_by_key(|s| std::cmp::Reverse(s.total_worth));
        let trades = self
            .state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::TradeAccepted(_)))
            .count();
        GameSummary {
            id: self.id.to_string(),
            seed: self.seed,
            turns: self.state.turn,
            loser: self.loser(),
            winner: self.winner(),
            trades,
            standings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::players::AiPlayer;

    fn seats(n: usize) -> Vec<Box<dyn Strategy>> {
        (0..n)
            .map(|_| Box::new(AiPlayer::default()) as Box<dyn Strategy>)
            .collect()
    }

    #[test]
    fn seat_count_must_match_players() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        assert!(matches!(
            game.play(&seats(3)),
            Err(GameError::InvalidPlayerCount(3))
        ));
    }

    #[test]
    fn winner_is_richest_with_seat_order_ties() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        game.state.players[2].cash = 2000;
        game.state.players[3].cash = 2000;
        assert_eq!(game.winner(), 2);
    }

    #[test]
    fn turn_limit_ends_the_game() {
        let config = GameConfig {
            num_players: 2,
            turn_limit: 10,
            ..GameConfig::default()
        };
        let mut game = Game::new(config).unwrap();
        let summary = game.play(&seats(2)).unwrap();
        assert!(summary.turns <= 10);
        assert_eq!(summary.standings.len(), 2);
    }
}
