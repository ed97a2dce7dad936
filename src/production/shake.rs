//! `shake` production: the designated shake target trembles with decaying strength

use crate::config::{PlaybackConfig, ShakeAxes, ShakeConfig};
use crate::production::{EffectTargets, ProductionEffect};
use crate::sequence::{Animation, SequenceStatus};
use crate::stage::{Stage, VisualHandle};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Effect handler that starts [`ShakeAnimation`]s on the shake target
#[derive(Debug, Clone)]
pub struct ShakeEffect {
    rng: StdRng,
}

impl ShakeEffect {
    pub fn new(config: &ShakeConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl ProductionEffect for ShakeEffect {
    fn target(&self, targets: &EffectTargets) -> Option<VisualHandle> {
        targets.shake_target
    }

    fn start(
        &mut self,
        target: VisualHandle,
        _argument: Option<&str>,
        stage: &dyn Stage,
        config: &PlaybackConfig,
    ) -> Option<Box<dyn Animation>> {
        let origin = stage.local_position(target)?;
        let rng = StdRng::seed_from_u64(self.rng.r#gen());
        Some(Box::new(ShakeAnimation::new(target, origin, &config.shake, rng)))
    }
}

/// Random offsets around the origin that fade out linearly over the duration
#[derive(Debug, Clone)]
pub struct ShakeAnimation {
    target: VisualHandle,
    origin: Vec3,
    duration: f32,
    strength: f32,
    axes: ShakeAxes,
    elapsed: f32,
    rng: StdRng,
}

impl ShakeAnimation {
    pub fn new(target: VisualHandle, origin: Vec3, config: &ShakeConfig, rng: StdRng) -> Self {
        Self {
            target,
            origin,
            duration: config.duration,
            strength: config.strength,
            axes: config.axes,
            elapsed: 0.0,
            rng,
        }
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Offset magnitude at `elapsed` seconds
    pub fn magnitude_at(&self, elapsed: f32) -> f32 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        self.strength * (1.0 - (elapsed / self.duration).clamp(0.0, 1.0))
    }

    fn axis_offset(&mut self, enabled: bool, magnitude: f32) -> f32 {
        if enabled {
            self.rng.gen_range(-1.0f32..=1.0) * magnitude
        } else {
            0.0
        }
    }
}

impl Animation for ShakeAnimation {
    fn target(&self) -> VisualHandle {
        self.target
    }

    fn step(&mut self, dt: f32, stage: &mut dyn Stage) -> SequenceStatus {
        if !stage.is_alive(self.target) {
            return SequenceStatus::Done;
        }
        self.elapsed += dt.max(0.0);
        if self.elapsed >= self.duration {
            stage.set_local_position(self.target, self.origin);
            return SequenceStatus::Done;
        }
        let magnitude = self.magnitude_at(self.elapsed);
        let offset = Vec3::new(
            self.axis_offset(self.axes.x, magnitude),
            self.axis_offset(self.axes.y, magnitude),
            self.axis_offset(self.axes.z, magnitude),
        );
        stage.set_local_position(self.target, self.origin + offset);
        SequenceStatus::Continuing
    }

    fn cancel(&mut self, stage: &mut dyn Stage) {
        stage.set_local_position(self.target, self.origin);
    }
}
