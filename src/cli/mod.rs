//! Terminal front end
//!
//! `play` runs an episode on a [`MemoryStage`](crate::stage::MemoryStage)
//! and prints each line; `check` prints lint results.

pub mod check;
pub mod play;
pub mod view_state;
