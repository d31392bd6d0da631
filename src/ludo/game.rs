//! Turn order, dice and win detection

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use super::board::{Board, MovePreview, seats_for};
use crate::{Error, Result};

/// Turns after which a game is abandoned without a winner
pub const MAX_TURNS: usize = 10_000;

/// What the player to move sees
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub seat: usize,
    pub dice: u8,
    /// Pieces of `seat` that can move with `dice`
    pub movable: Vec<usize>,
    pub board: Board,
}

/// Record of one played turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub turn: usize,
    pub seat: usize,
    pub dice: u8,
    /// `None` when the seat had to pass
    pub mv: Option<MovePreview>,
    pub winner: Option<usize>,
}

/// A game of Ludo for 2 to 4 players
#[derive(Debug, Clone)]
pub struct LudoGame {
    board: Board,
    seats: &'static [usize],
    turn_index: usize,
    dice: u8,
    turns: usize,
    winner: Option<usize>,
    rng: StdRng,
}

impl LudoGame {
    /// Create a game and roll the first die
    pub fn new(players: usize, seed: Option<u64>) -> Result<Self> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let mut game = Self {
            board: Board::new(),
            seats: seats_for(players)?,
            turn_index: 0,
            dice: 1,
            turns: 0,
            winner: None,
            rng,
        };
        game.roll();
        Ok(game)
    }

    /// Put every piece back home and start over; the dice stream continues.
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.turn_index = 0;
        self.turns = 0;
        self.winner = None;
        self.roll();
    }

    fn roll(&mut self) {
        self.dice = self.rng.random_range(1..=6);
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn seats(&self) -> &[usize] {
        self.seats
    }

    pub fn players(&self) -> usize {
        self.seats.len()
    }

    pub fn current_seat(&self) -> usize {
        self.seats[self.turn_index]
    }

    pub fn dice(&self) -> u8 {
        self.dice
    }

    pub fn turns(&self) -> usize {
        self.turns
    }

    /// Seat that finished first, if any
    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    /// A seat has won or the turn cap was reached
    pub fn is_over(&self) -> bool {
        self.winner.is_some() || self.turns >= MAX_TURNS
    }

    pub fn observation(&self) -> Observation {
        let seat = self.current_seat();
        Observation {
            seat,
            dice: self.dice,
            movable: self.board.movable_pieces(seat, self.dice),
            board: self.board,
        }
    }

    /// Play the current seat's turn with `piece`, or pass with `None`.
    ///
    /// Passing is only allowed when no piece can move.
    pub fn play(&mut self, piece: Option<usize>) -> Result<TurnOutcome> {
        if self.is_over() {
            return Err(Error::GameOver);
        }

        let seat = self.current_seat();
        let dice = self.dice;

        let mv = match piece {
            Some(piece) => Some(self.board.apply_move(seat, piece, dice)?),
            None if !self.board.movable_pieces(seat, dice).is_empty() => {
                return Err(Error::MustMove { seat });
            }
            None => None,
        };

        if self.board.is_finished(seat) {
            self.winner = Some(seat);
        }

        let outcome = TurnOutcome {
            turn: self.turns,
            seat,
            dice,
            mv,
            winner: self.winner,
        };

        self.turns += 1;
        self.turn_index = (self.turn_index + 1) % self.seats.len();
        self.roll();

        Ok(outcome)
    }
}
