//! Board representation and move rules
//!
//! Positions are relative to each piece's owner:
//!
//! | Position | Meaning |
//! |----------|---------|
//! | 0        | home yard |
//! | 1..=51   | common track, 1 is the owner's start globe |
//! | 52..=56  | goal stretch |
//! | 57       | goal |
//!
//! Track squares are shared between players through [`Board::absolute`].

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const MAX_SEATS: usize = 4;
pub const PIECES_PER_PLAYER: usize = 4;

pub const HOME: u8 = 0;
pub const START: u8 = 1;
pub const LAST_TRACK: u8 = 51;
pub const GOAL_ZONE_START: u8 = 52;
pub const GOAL: u8 = 57;

const TRACK_LENGTH: usize = 52;
const SEAT_OFFSET: usize = 13;

/// Safe squares, relative to the owner
pub const GLOBES: [u8; 8] = [1, 9, 14, 22, 27, 35, 40, 48];
/// Jump squares, relative to the owner; the last one jumps to the goal
pub const STARS: [u8; 8] = [5, 12, 18, 25, 31, 38, 44, 51];

/// Seats used for a given number of players
pub fn seats_for(players: usize) -> Result<&'static [usize]> {
    match players {
        2 => Ok(&[0, 2]),
        3 => Ok(&[0, 2, 3]),
        4 => Ok(&[0, 1, 2, 3]),
        count => Err(Error::InvalidPlayerCount { count }),
    }
}

pub fn is_globe(position: u8) -> bool {
    GLOBES.contains(&position)
}

pub fn is_star(position: u8) -> bool {
    STARS.contains(&position)
}

pub fn on_track(position: u8) -> bool {
    (START..=LAST_TRACK).contains(&position)
}

pub fn in_goal_zone(position: u8) -> bool {
    (GOAL_ZONE_START..GOAL).contains(&position)
}

fn star_target(star: u8) -> u8 {
    STARS
        .iter()
        .copied()
        .find(|&next| next > star)
        .unwrap_or(GOAL)
}

/// What moving one piece would do, computed without touching the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovePreview {
    pub seat: usize,
    pub piece: usize,
    pub from: u8,
    /// Final position of the moved piece (`HOME` when it was captured)
    pub to: u8,
    pub star_jump: bool,
    /// The mover landed on a defended square and was sent home
    pub died: bool,
    /// Enemy `(seat, piece)` pairs sent home
    pub captured: Vec<(usize, usize)>,
}

/// Positions of every piece of every seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    positions: [[u8; PIECES_PER_PLAYER]; MAX_SEATS],
}

impl Board {
    /// All pieces in their home yards
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board from explicit positions (used by tests and analysis)
    pub fn from_positions(positions: [[u8; PIECES_PER_PLAYER]; MAX_SEATS]) -> Self {
        Self { positions }
    }

    pub fn position(&self, seat: usize, piece: usize) -> u8 {
        self.positions[seat][piece]
    }

    pub fn pieces(&self, seat: usize) -> [u8; PIECES_PER_PLAYER] {
        self.positions[seat]
    }

    pub fn set_position(&mut self, seat: usize, piece: usize, position: u8) {
        self.positions[seat][piece] = position;
    }

    /// Shared track square of a relative track position
    pub fn absolute(seat: usize, position: u8) -> Option<usize> {
        on_track(position)
            .then(|| (usize::from(position) - 1 + SEAT_OFFSET * seat) % TRACK_LENGTH)
    }

    /// Enemy pieces standing on a shared track square
    pub fn enemies_at(&self, seat: usize, square: usize) -> Vec<(usize, usize)> {
        (0..MAX_SEATS)
            .filter(|&other| other != seat)
            .flat_map(|other| (0..PIECES_PER_PLAYER).map(move |piece| (other, piece)))
            .filter(|&(other, piece)| {
                Self::absolute(other, self.positions[other][piece]) == Some(square)
            })
            .collect()
    }

    /// Number of this seat's pieces, other than `piece`, at `position`
    pub fn own_pieces_at(&self, seat: usize, piece: usize, position: u8) -> usize {
        self.positions[seat]
            .iter()
            .enumerate()
            .filter(|&(other, &pos)| other != piece && pos == position)
            .count()
    }

    pub fn is_finished(&self, seat: usize) -> bool {
        self.positions[seat].iter().all(|&pos| pos == GOAL)
    }

    pub fn can_move(&self, seat: usize, piece: usize, dice: u8) -> bool {
        match self.positions[seat][piece] {
            HOME => dice == 6,
            GOAL => false,
            _ => true,
        }
    }

    /// Pieces of `seat` that can move with `dice`
    pub fn movable_pieces(&self, seat: usize, dice: u8) -> Vec<usize> {
        (0..PIECES_PER_PLAYER)
            .filter(|&piece| self.can_move(seat, piece, dice))
            .collect()
    }

    /// Outcome of moving `piece` by `dice`, `None` when it cannot move
    pub fn preview_move(&self, seat: usize, piece: usize, dice: u8) -> Option<MovePreview> {
        if !self.can_move(seat, piece, dice) {
            return None;
        }
        let from = self.positions[seat][piece];

        let mut preview = MovePreview {
            seat,
            piece,
            from,
            to: from,
            star_jump: false,
            died: false,
            captured: Vec::new(),
        };

        if from == HOME {
            preview.to = START;
            if let Some(square) = Self::absolute(seat, START) {
                preview.captured = self.enemies_at(seat, square);
            }
            return Some(preview);
        }

        let mut to = from + dice;
        if to > GOAL {
            to = GOAL - (to - GOAL);
        }
        if on_track(to) && is_star(to) {
            to = star_target(to);
            preview.star_jump = true;
        }
        preview.to = to;

        if let Some(square) = Self::absolute(seat, to) {
            let enemies = self.enemies_at(seat, square);
            if !enemies.is_empty() {
                if is_globe(to) || enemies.len() >= 2 {
                    preview.died = true;
                    preview.to = HOME;
                } else {
                    preview.captured = enemies;
                }
            }
        }

        Some(preview)
    }

    /// Move a piece and resolve captures
    pub fn apply_move(&mut self, seat: usize, piece: usize, dice: u8) -> Result<MovePreview> {
        let preview = self
            .preview_move(seat, piece, dice)
            .ok_or_else(|| Error::IllegalMove {
                seat,
                piece,
                reason: format!(
                    "position {} with die {dice}",
                    self.positions[seat][piece]
                ),
            })?;

        self.positions[seat][piece] = preview.to;
        for &(other, captured) in &preview.captured {
            self.positions[other][captured] = HOME;
        }
        Ok(preview)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(seat: usize, piece: usize, position: u8) -> Board {
        let mut board = Board::new();
        board.set_position(seat, piece, position);
        board
    }

    #[test]
    fn test_seats_for_player_counts() {
        assert_eq!(seats_for(2).unwrap(), &[0, 2]);
        assert_eq!(seats_for(3).unwrap(), &[0, 2, 3]);
        assert_eq!(seats_for(4).unwrap(), &[0, 1, 2, 3]);
        assert!(matches!(
            seats_for(5),
            Err(Error::InvalidPlayerCount { count: 5 })
        ));
    }

    #[test]
    fn test_absolute_squares_are_offset_per_seat() {
        assert_eq!(Board::absolute(0, 1), Some(0));
        assert_eq!(Board::absolute(1, 1), Some(13));
        assert_eq!(Board::absolute(3, 51), Some(37));
        assert_eq!(Board::absolute(0, HOME), None);
        assert_eq!(Board::absolute(0, 53), None);
    }

    #[test]
    fn test_leaving_home_needs_a_six() {
        let board = Board::new();
        assert!(board.preview_move(0, 0, 5).is_none());
        let preview = board.preview_move(0, 0, 6).unwrap();
        assert_eq!(preview.to, START);
    }

    #[test]
    fn test_star_jump_and_last_star_to_goal() {
        let board = board_with(0, 0, 2);
        let preview = board.preview_move(0, 0, 3).unwrap();
        assert!(preview.star_jump);
        assert_eq!(preview.to, 12);

        let board = board_with(0, 0, 48);
        assert_eq!(board.preview_move(0, 0, 3).unwrap().to, GOAL);
    }

    #[test]
    fn test_overshooting_goal_bounces_back() {
        let board = board_with(0, 0, 55);
        assert_eq!(board.preview_move(0, 0, 4).unwrap().to, 55);
    }

    #[test]
    fn test_single_enemy_is_captured() {
        let mut board = board_with(0, 0, 3);
        // seat 1 relative 43 is absolute (42 + 13) % 52 = 3 == seat 0 relative 4
        board.set_position(1, 2, 43);
        let preview = board.apply_move(0, 0, 1).unwrap();
        assert_eq!(preview.captured, vec![(1, 2)]);
        assert_eq!(board.position(1, 2), HOME);
        assert_eq!(board.position(0, 0), 4);
    }

    #[test]
    fn test_landing_on_pair_sends_mover_home() {
        let mut board = board_with(0, 0, 3);
        board.set_position(1, 0, 43);
        board.set_position(1, 1, 43);
        let preview = board.apply_move(0, 0, 1).unwrap();
        assert!(preview.died);
        assert_eq!(board.position(0, 0), HOME);
        assert_eq!(board.position(1, 0), 43);
    }

    #[test]
    fn test_enemy_on_globe_is_protected() {
        // seat 0 relative 9 is absolute 8; seat 2 relative 35 is (34 + 26) % 52 = 8
        let mut board = board_with(0, 0, 7);
        board.set_position(2, 0, 35);
        let preview = board.apply_move(0, 0, 2).unwrap();
        assert!(preview.died);
        assert_eq!(board.position(2, 0), 35);
    }

    #[test]
    fn test_moving_out_captures_on_start() {
        // seat 1 relative 40 is (39 + 13) % 52 = 0 == seat 0 start
        let mut board = Board::new();
        board.set_position(1, 3, 40);
        let preview = board.apply_move(0, 0, 6).unwrap();
        assert_eq!(preview.captured, vec![(1, 3)]);
        assert_eq!(board.position(1, 3), HOME);
    }

    #[test]
    fn test_finished_pieces_cannot_move() {
        let board = Board::from_positions([[GOAL; 4], [0; 4], [0; 4], [0; 4]]);
        assert!(board.is_finished(0));
        assert!(board.movable_pieces(0, 6).is_empty());
    }
}
