//! Infrastructure layer - episode storage adapters
//!
//! Implementations here deal with the file system and other I/O so the
//! playback core only ever sees parsed [`Episode`](crate::types::Episode)s.

pub mod repositories;

pub use repositories::*;
