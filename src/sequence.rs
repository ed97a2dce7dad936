//! Tick-driven sequences
//!
//! Every timed behavior (typewriter reveal, jump, shake) is an explicit state
//! object advanced by the host's per-frame tick instead of a timer thread.

use crate::stage::{Stage, VisualHandle};

/// Result of advancing a sequence by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceStatus {
    /// More ticks are needed
    Continuing,
    /// The sequence has finished and left its target in its final state
    Done,
}

impl SequenceStatus {
    pub fn is_done(self) -> bool {
        matches!(self, Self::Done)
    }
}

/// A time-based animation that moves one visual
///
/// Both completion and cancellation must leave the target at the position it
/// had when the animation started.
pub trait Animation {
    /// Visual this animation moves
    fn target(&self) -> VisualHandle;

    /// Advance by `dt` seconds
    fn step(&mut self, dt: f32, stage: &mut dyn Stage) -> SequenceStatus;

    /// Stop immediately and restore the target
    fn cancel(&mut self, stage: &mut dyn Stage);
}

/// Smoothed ease-in/ease-out interpolation factor for `t` in `[0, 1]`
pub fn smooth_step(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
