//! `jump` production: the primary portrait hops up and down

use crate::config::{JumpConfig, PlaybackConfig};
use crate::production::{EffectTargets, ProductionEffect};
use crate::sequence::{Animation, SequenceStatus, smooth_step};
use crate::stage::{Stage, VisualHandle};
use glam::Vec3;

/// Effect handler that starts [`JumpAnimation`]s on the primary portrait
#[derive(Debug, Clone, Copy, Default)]
pub struct JumpEffect;

impl JumpEffect {
    /// Cycle count from a token argument, falling back to the configured default
    pub fn cycles(argument: Option<&str>, config: &JumpConfig) -> u32 {
        argument
            .and_then(|arg| arg.trim().parse::<u32>().ok())
            .filter(|cycles| *cycles > 0)
            .unwrap_or_else(|| config.default_cycles.max(1))
    }
}

impl ProductionEffect for JumpEffect {
    fn target(&self, targets: &EffectTargets) -> Option<VisualHandle> {
        targets.primary
    }

    fn start(
        &mut self,
        target: VisualHandle,
        argument: Option<&str>,
        stage: &dyn Stage,
        config: &PlaybackConfig,
    ) -> Option<Box<dyn Animation>> {
        let origin = stage.local_position(target)?;
        let cycles = Self::cycles(argument, &config.jump);
        Some(Box::new(JumpAnimation::new(target, origin, cycles, &config.jump)))
    }
}

/// Up-down cycles eased between the origin and origin + height
#[derive(Debug, Clone, PartialEq)]
pub struct JumpAnimation {
    target: VisualHandle,
    origin: Vec3,
    height: f32,
    half_duration: f32,
    cycles: u32,
    elapsed: f32,
}

impl JumpAnimation {
    pub fn new(target: VisualHandle, origin: Vec3, cycles: u32, config: &JumpConfig) -> Self {
        Self {
            target,
            origin,
            height: config.height,
            half_duration: config.half_duration,
            cycles,
            elapsed: 0.0,
        }
    }

    /// Position recorded when the jump started
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    fn total_duration(&self) -> f32 {
        self.half_duration * 2.0 * self.cycles as f32
    }

    fn offset_at(&self, elapsed: f32) -> f32 {
        let leg = (elapsed / self.half_duration).floor();
        let t = (elapsed - leg * self.half_duration) / self.half_duration;
        let eased = smooth_step(t);
        // even legs rise, odd legs fall
        if leg as u64 % 2 == 0 {
            eased * self.height
        } else {
            (1.0 - eased) * self.height
        }
    }
}

impl Animation for JumpAnimation {
    fn target(&self) -> VisualHandle {
        self.target
    }

    fn step(&mut self, dt: f32, stage: &mut dyn Stage) -> SequenceStatus {
        if !stage.is_alive(self.target) {
            return SequenceStatus::Done;
        }
        self.elapsed += dt.max(0.0);
        if self.half_duration <= 0.0 || self.elapsed >= self.total_duration() {
            stage.set_local_position(self.target, self.origin);
            return SequenceStatus::Done;
        }
        let offset = self.offset_at(self.elapsed);
        stage.set_local_position(self.target, self.origin + Vec3::Y * offset);
        SequenceStatus::Continuing
    }

    fn cancel(&mut self, stage: &mut dyn Stage) {
        stage.set_local_position(self.target, self.origin);
    }
}
