//! Player implementations: the learning agent and a random baseline

use rand::{Rng, SeedableRng, random, rngs::StdRng};

use crate::{
    Error, Result,
    ludo::{Board, Observation, StateSpace},
    ports::LudoPlayer,
    q_learning::{Decision, TdAgent},
};

/// Uniformly random baseline opponent
pub struct RandomPlayer {
    name: String,
    rng: StdRng,
}

impl RandomPlayer {
    pub fn new(name: String) -> Self {
        Self {
            name,
            rng: StdRng::seed_from_u64(random()),
        }
    }

    pub fn with_seed(name: String, seed: u64) -> Self {
        Self {
            name,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl LudoPlayer for RandomPlayer {
    fn choose_piece(&mut self, observation: &Observation) -> Result<usize> {
        if observation.movable.is_empty() {
            return Err(Error::NoMovablePieces {
                seat: observation.seat,
            });
        }
        let index = self.rng.random_range(0..observation.movable.len());
        Ok(observation.movable[index])
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }
}

/// Seat driven by a [`TdAgent`]
///
/// Every decision is remembered until the move has been applied; the
/// update then bootstraps from the legal cells of the resulting board,
/// evaluated with the same die.
pub struct TdPlayer {
    agent: TdAgent,
    name: String,
    pending: Option<Decision>,
}

impl TdPlayer {
    pub fn new(agent: TdAgent, name: String) -> Self {
        Self {
            agent,
            name,
            pending: None,
        }
    }

    pub fn agent(&self) -> &TdAgent {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut TdAgent {
        &mut self.agent
    }

    pub fn into_agent(self) -> TdAgent {
        self.agent
    }
}

impl LudoPlayer for TdPlayer {
    fn choose_piece(&mut self, observation: &Observation) -> Result<usize> {
        let first = *observation
            .movable
            .first()
            .ok_or(Error::NoMovablePieces {
                seat: observation.seat,
            })?;

        let options = StateSpace::options(&observation.board, observation.seat, observation.dice);
        self.pending = self.agent.choose(options.mask())?;

        let piece = self
            .pending
            .and_then(|decision| options.piece_for(decision.state, decision.action));
        match piece {
            Some(piece) => Ok(piece),
            None => {
                // nothing to learn from a move the tables did not pick
                self.pending = None;
                Ok(first)
            }
        }
    }

    fn after_move(&mut self, board: &Board, seat: usize, dice: u8) -> Result<()> {
        if let Some(decision) = self.pending.take() {
            let next = StateSpace::options(board, seat, dice);
            self.agent
                .learn(decision.state, decision.action, next.mask())?;
        }
        Ok(())
    }

    fn on_game_end(&mut self) -> Result<()> {
        self.pending = None;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.agent.reseed(Some(seed));
        Ok(())
    }
}
