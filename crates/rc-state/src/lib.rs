//! rc-state: Spin state machine, snapshots, persistence and high scores
//!
//! [`SpinMachine`] owns the [`GameState`] exclusively. Consumers read copies
//! through [`SpinMachine::snapshot`] or the notification bus and change state
//! only through the machine's operations.

mod bus;
mod error;
mod game_state;
mod high_scores;
mod machine;
mod reels;
mod storage;

pub use bus::*;
pub use error::*;
pub use game_state::*;
pub use high_scores::*;
pub use machine::*;
pub use reels::*;
pub use storage::*;
