pub mod compare;
pub mod rewards;
pub mod show;
pub mod train;
