//! Ports (trait boundaries) between the training loop and its participants.

pub mod observer;
pub mod player;

pub use observer::Observer;
pub use player::LudoPlayer;
