pub mod board;
pub mod session;
pub mod spin;

pub use board::{show_leaderboard, show_rank, watch};
pub use session::{login, logout, whoami};
pub use spin::spin;
