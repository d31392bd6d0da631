//! Training pipeline for a learning agent against random opponents

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::players::{RandomPlayer, TdPlayer};
use crate::{
    Error, Result,
    analysis::{CurveSummary, MOVING_AVERAGE_WINDOW, moving_average},
    ludo::{LudoGame, TurnOutcome},
    ports::{LudoPlayer, Observer},
    q_learning::ExplorationSchedule,
};

/// Seat the learning agent always plays from
pub const AGENT_SEAT: usize = 0;

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of training games
    pub episodes: usize,

    /// Players at the table, the agent included (2 to 4)
    pub players: usize,

    /// Random seed
    pub seed: Option<u64>,

    /// Exploration rate as a function of the episode index
    pub exploration: ExplorationSchedule,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 1000,
            players: 4,
            seed: None,
            exploration: ExplorationSchedule::default(),
        }
    }
}

/// What happened in one episode, from the agent's point of view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeReport {
    pub episode: usize,
    pub won: bool,
    pub winner: Option<usize>,
    pub turns: usize,
    /// Exploration rate used during the episode
    pub epsilon: f64,
    /// Sum of the rewards of every learning step
    pub cumulative_reward: f64,
    pub decisions: usize,
    pub explorations: usize,
    pub updates: usize,
    /// Running win rate in percent, this episode included
    pub win_rate: f64,
}

/// Result of a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Label of the update rule that was trained
    pub rule: String,
    pub players: usize,
    pub episodes: usize,
    pub wins: usize,
    /// Running win rate in percent after each episode
    pub win_rate_history: Vec<f64>,
    /// Cumulative reward of each episode
    pub reward_history: Vec<f64>,
    /// Exploration rate used in each episode
    pub epsilon_history: Vec<f64>,
    pub win_rate_moving_average: Vec<f64>,
    pub reward_moving_average: Vec<f64>,
}

impl TrainingResult {
    /// Build the result from per-episode reports
    pub fn from_reports(rule: &str, players: usize, reports: &[EpisodeReport]) -> Self {
        let win_rate_history: Vec<f64> = reports.iter().map(|r| r.win_rate).collect();
        let reward_history: Vec<f64> = reports.iter().map(|r| r.cumulative_reward).collect();
        Self {
            rule: rule.to_string(),
            players,
            episodes: reports.len(),
            wins: reports.iter().filter(|r| r.won).count(),
            win_rate_moving_average: moving_average(&win_rate_history, MOVING_AVERAGE_WINDOW),
            reward_moving_average: moving_average(&reward_history, MOVING_AVERAGE_WINDOW),
            epsilon_history: reports.iter().map(|r| r.epsilon).collect(),
            win_rate_history,
            reward_history,
        }
    }

    /// Final running win rate in percent
    pub fn win_rate(&self) -> f64 {
        self.win_rate_history.last().copied().unwrap_or(0.0)
    }

    pub fn win_rate_summary(&self) -> CurveSummary {
        CurveSummary::of(&self.win_rate_history)
    }

    pub fn reward_summary(&self) -> CurveSummary {
        CurveSummary::of(&self.reward_history)
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Training pipeline for one agent against random opponents
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train `agent` from seat 0 for the configured number of episodes.
    ///
    /// With a seed, the agent is seeded with it, the dice with `seed + 1` and
    /// opponent `i` with `seed + 2 + i`.
    pub fn run(&mut self, agent: &mut TdPlayer) -> Result<TrainingResult> {
        let seed = self.config.seed;
        let mut game = LudoGame::new(self.config.players, seed.map(|s| s.wrapping_add(1)))?;

        if let Some(seed) = seed {
            agent.set_rng_seed(seed)?;
        }
        let mut opponents: Vec<(usize, Box<dyn LudoPlayer>)> = game
            .seats()
            .iter()
            .copied()
            .filter(|&seat| seat != AGENT_SEAT)
            .enumerate()
            .map(|(i, seat)| {
                let name = format!("Random-{seat}");
                let player: Box<dyn LudoPlayer> = match seed {
                    Some(seed) => Box::new(RandomPlayer::with_seed(
                        name,
                        seed.wrapping_add(2 + i as u64),
                    )),
                    None => Box::new(RandomPlayer::new(name)),
                };
                (seat, player)
            })
            .collect();

        let rule = agent.agent().rule();
        info!(
            %rule,
            episodes = self.config.episodes,
            players = self.config.players,
            seed = ?seed,
            "training started"
        );

        let schedule = self.config.exploration;
        agent.agent_mut().update_epsilon(schedule.rate_at(0));

        for observer in &mut self.observers {
            observer.on_training_start(self.config.episodes)?;
        }

        let mut reports = Vec::with_capacity(self.config.episodes);
        let mut wins = 0;

        for episode in 0..self.config.episodes {
            for observer in &mut self.observers {
                observer.on_episode_start(episode)?;
            }

            game.reset();
            let epsilon = agent.agent().epsilon();
            self.play_episode(episode, &mut game, agent, &mut opponents)?;

            agent.on_game_end()?;
            for (_, opponent) in &mut opponents {
                opponent.on_game_end()?;
            }

            let stats = agent.agent_mut().take_episode_stats();
            let won = game.winner() == Some(AGENT_SEAT);
            if won {
                wins += 1;
            }

            let report = EpisodeReport {
                episode,
                won,
                winner: game.winner(),
                turns: game.turns(),
                epsilon,
                cumulative_reward: stats.cumulative_reward,
                decisions: stats.decisions,
                explorations: stats.explorations,
                updates: stats.updates,
                win_rate: wins as f64 / (episode + 1) as f64 * 100.0,
            };
            debug!(
                episode,
                won,
                turns = report.turns,
                epsilon,
                reward = report.cumulative_reward,
                win_rate = report.win_rate,
                "episode finished"
            );

            for observer in &mut self.observers {
                observer.on_episode_end(&report)?;
            }
            reports.push(report);

            agent
                .agent_mut()
                .update_epsilon(schedule.rate_at(episode));
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        let result = TrainingResult::from_reports(rule.label(), self.config.players, &reports);
        info!(
            %rule,
            wins = result.wins,
            win_rate = result.win_rate(),
            "training finished"
        );
        Ok(result)
    }

    fn play_episode(
        &mut self,
        episode: usize,
        game: &mut LudoGame,
        agent: &mut TdPlayer,
        opponents: &mut [(usize, Box<dyn LudoPlayer>)],
    ) -> Result<()> {
        while !game.is_over() {
            let observation = game.observation();
            let outcome = if observation.movable.is_empty() {
                game.play(None)?
            } else {
                let seat = observation.seat;
                let player: &mut dyn LudoPlayer = if seat == AGENT_SEAT {
                    &mut *agent
                } else {
                    opponents
                        .iter_mut()
                        .find(|(s, _)| *s == seat)
                        .map(|(_, opponent)| opponent.as_mut())
                        .ok_or_else(|| Error::InvalidConfiguration {
                            message: format!("no player seated at seat {seat}"),
                        })?
                };
                let piece = player.choose_piece(&observation)?;
                let outcome = game.play(Some(piece))?;
                player.after_move(game.board(), seat, observation.dice)?;
                outcome
            };
            self.notify_turn(episode, &outcome)?;
        }
        Ok(())
    }

    fn notify_turn(&mut self, episode: usize, outcome: &TurnOutcome) -> Result<()> {
        for observer in &mut self.observers {
            observer.on_turn(episode, outcome)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app::AgentConfig,
        q_learning::{TdAgent, UpdateRule},
    };

    fn td_player(rule: UpdateRule) -> TdPlayer {
        let agent: TdAgent = AgentConfig::new(rule).build().unwrap();
        TdPlayer::new(agent, "agent".to_string())
    }

    #[test]
    fn test_training_pipeline() {
        let config = TrainingConfig {
            episodes: 5,
            players: 2,
            seed: Some(42),
            ..TrainingConfig::default()
        };

        let mut pipeline = TrainingPipeline::new(config);
        let mut agent = td_player(UpdateRule::QLearning);
        let result = pipeline.run(&mut agent).unwrap();

        assert_eq!(result.episodes, 5);
        assert_eq!(result.win_rate_history.len(), 5);
        assert!(result.wins <= 5);
        assert!((0.0..=100.0).contains(&result.win_rate()));
    }

    #[test]
    fn test_epsilon_follows_schedule() {
        let config = TrainingConfig {
            episodes: 3,
            players: 2,
            seed: Some(7),
            exploration: ExplorationSchedule::new(0.9, 0.05),
        };
        let mut agent = td_player(UpdateRule::Sarsa);
        let result = TrainingPipeline::new(config).run(&mut agent).unwrap();

        // episode 0 and 1 both use the initial rate
        assert!((result.epsilon_history[0] - 0.9).abs() < 1e-12);
        assert!((result.epsilon_history[1] - 0.9).abs() < 1e-12);
        assert!((result.epsilon_history[2] - 0.9 * (-0.05f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let config = TrainingConfig {
            episodes: 3,
            players: 3,
            seed: Some(11),
            ..TrainingConfig::default()
        };

        let mut first = td_player(UpdateRule::DoubleQLearning);
        let mut second = td_player(UpdateRule::DoubleQLearning);
        let a = TrainingPipeline::new(config.clone()).run(&mut first).unwrap();
        let b = TrainingPipeline::new(config).run(&mut second).unwrap();

        assert_eq!(a.win_rate_history, b.win_rate_history);
        assert_eq!(a.reward_history, b.reward_history);
        assert_eq!(first.agent().store(), second.agent().store());
    }
}
