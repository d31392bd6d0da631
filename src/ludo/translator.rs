//! Translation of board observations into table coordinates
//!
//! Each movable piece contributes one legal `(state, action)` cell:
//! the state is the piece's [`PieceState`], the action is the
//! [`OutcomeCategory`] that moving it with the current die would produce.

use serde::{Deserialize, Serialize};

use super::board::{
    Board, GOAL, HOME, LAST_TRACK, MAX_SEATS, MovePreview, PIECES_PER_PLAYER, in_goal_zone,
    is_globe, on_track,
};
use crate::{
    q_learning::ActionMask,
    rewards::{BoardContext, MoveEffect, OutcomeCategory},
};

/// Situation of a single piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceState {
    Home,
    Safe,
    Unsafe,
    GoalZone,
}

impl PieceState {
    pub const ALL: [PieceState; 4] = [
        PieceState::Home,
        PieceState::Safe,
        PieceState::Unsafe,
        PieceState::GoalZone,
    ];

    pub fn index(self) -> usize {
        match self {
            PieceState::Home => 0,
            PieceState::Safe => 1,
            PieceState::Unsafe => 2,
            PieceState::GoalZone => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PieceState::Home => "Home",
            PieceState::Safe => "Safe",
            PieceState::Unsafe => "Unsafe",
            PieceState::GoalZone => "GoalZone",
        }
    }

    pub fn context(self) -> BoardContext {
        match self {
            PieceState::Home => BoardContext::Home,
            PieceState::Unsafe => BoardContext::Unsafe,
            PieceState::Safe | PieceState::GoalZone => BoardContext::Safe,
        }
    }
}

/// One movable piece and where it lands in the value table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceOption {
    pub piece: usize,
    pub state: PieceState,
    pub category: OutcomeCategory,
}

/// Legal cells for one decision and the pieces behind them
#[derive(Debug, Clone, PartialEq)]
pub struct MoveOptions {
    mask: ActionMask,
    options: Vec<PieceOption>,
}

impl MoveOptions {
    pub fn mask(&self) -> &ActionMask {
        &self.mask
    }

    pub fn options(&self) -> &[PieceOption] {
        &self.options
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Piece behind a table cell; the lowest piece index wins when several
    /// pieces share a cell.
    pub fn piece_for(&self, state: usize, action: usize) -> Option<usize> {
        self.options
            .iter()
            .find(|option| option.state.index() == state && option.category.index() == action)
            .map(|option| option.piece)
    }
}

/// Dimensions and classification rules of the agent's state/action space
pub struct StateSpace;

impl StateSpace {
    pub const NUM_STATES: usize = PieceState::ALL.len();
    pub const NUM_ACTIONS: usize = OutcomeCategory::COUNT;

    /// An enemy track piece can reach `square` with one die roll.
    fn threatened(board: &Board, seat: usize, square: usize) -> bool {
        (0..MAX_SEATS).filter(|&other| other != seat).any(|other| {
            (0..PIECES_PER_PLAYER).any(|piece| {
                let position = board.position(other, piece);
                let Some(enemy_square) = Board::absolute(other, position) else {
                    return false;
                };
                let distance = (square + 52 - enemy_square) % 52;
                (1..=6).contains(&distance) && usize::from(position) + distance <= usize::from(LAST_TRACK)
            })
        })
    }

    pub fn piece_state(board: &Board, seat: usize, piece: usize) -> PieceState {
        let position = board.position(seat, piece);
        if position == HOME {
            return PieceState::Home;
        }
        if in_goal_zone(position) || position == GOAL {
            return PieceState::GoalZone;
        }

        let Some(square) = Board::absolute(seat, position) else {
            return PieceState::Safe;
        };
        let guarded = is_globe(position) || board.own_pieces_at(seat, piece, position) > 0;
        if !guarded && Self::threatened(board, seat, square) {
            PieceState::Unsafe
        } else {
            PieceState::Safe
        }
    }

    fn effect_of(board: &Board, preview: &MovePreview) -> MoveEffect {
        if preview.died {
            MoveEffect::Die
        } else if !preview.captured.is_empty() {
            MoveEffect::Kill
        } else if preview.to == GOAL {
            MoveEffect::Goal
        } else if on_track(preview.from) && in_goal_zone(preview.to) {
            MoveEffect::GoalZone
        } else if preview.star_jump {
            MoveEffect::Star
        } else if preview.from == HOME {
            MoveEffect::MoveOut
        } else if on_track(preview.to)
            && board.own_pieces_at(preview.seat, preview.piece, preview.to) > 0
        {
            MoveEffect::Protect
        } else if on_track(preview.to) && is_globe(preview.to) {
            MoveEffect::Globe
        } else {
            MoveEffect::MoveDice
        }
    }

    /// Classify moving `piece` with `dice`, `None` when it cannot move
    pub fn classify(board: &Board, seat: usize, piece: usize, dice: u8) -> Option<PieceOption> {
        let preview = board.preview_move(seat, piece, dice)?;
        let state = Self::piece_state(board, seat, piece);
        let effect = Self::effect_of(board, &preview);
        Some(PieceOption {
            piece,
            state,
            category: OutcomeCategory::new(state.context(), effect),
        })
    }

    /// Legal cells for `seat` rolling `dice` on `board`
    pub fn options(board: &Board, seat: usize, dice: u8) -> MoveOptions {
        let mut mask = ActionMask::new(Self::NUM_STATES, Self::NUM_ACTIONS);
        let options: Vec<PieceOption> = (0..PIECES_PER_PLAYER)
            .filter_map(|piece| Self::classify(board, seat, piece, dice))
            .collect();
        for option in &options {
            mask.allow(option.state.index(), option.category.index());
        }
        MoveOptions { mask, options }
    }
}
