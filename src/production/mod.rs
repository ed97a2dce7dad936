//! Production effects triggered by a line's production key
//!
//! A production key is a list of effect tokens. Each recognized token starts
//! an [`Animation`] on a target visual. At most one animation per effect and
//! target runs at a time: retriggering cancels the running one (restoring its
//! target) before the new one records its origin.

use crate::config::PlaybackConfig;
use crate::sequence::Animation;
use crate::stage::{Stage, VisualHandle};
use crate::types::script::Line;
use std::collections::HashMap;

pub mod jump;
pub mod shake;

pub use jump::{JumpAnimation, JumpEffect};
pub use shake::{ShakeAnimation, ShakeEffect};

/// Characters that separate production tokens
pub const TOKEN_SEPARATORS: &[char] = &[',', ';'];

/// Visuals an effect may target for the current line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectTargets {
    /// Visual of the line's primary portrait
    pub primary: Option<VisualHandle>,
    /// Designated screen or camera root
    pub shake_target: Option<VisualHandle>,
}

/// A parsed production token such as `jump`, `jump(2)` or `jump:2`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectToken {
    pub name: String,
    pub argument: Option<String>,
}

impl EffectToken {
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim().to_lowercase();
        if token.is_empty() {
            return None;
        }

        if let Some(open) = token.find('(') {
            let name = token[..open].trim().to_string();
            let argument = token[open + 1..].trim_end_matches(')').trim().to_string();
            return Some(Self::new(name, argument));
        }
        if let Some((name, argument)) = token.split_once(':') {
            return Some(Self::new(name.trim().to_string(), argument.trim().to_string()));
        }
        Some(Self {
            name: token,
            argument: None,
        })
    }

    fn new(name: String, argument: String) -> Self {
        Self {
            name,
            argument: (!argument.is_empty()).then_some(argument),
        }
    }
}

/// Split a production key into tokens
pub fn tokenize(production_key: &str) -> Vec<EffectToken> {
    production_key
        .split(|c: char| c.is_whitespace() || TOKEN_SEPARATORS.contains(&c))
        .filter_map(EffectToken::parse)
        .collect()
}

/// Handler for one named production effect
pub trait ProductionEffect {
    /// Visual this effect would move, if any
    fn target(&self, targets: &EffectTargets) -> Option<VisualHandle>;

    /// Build an animation for `target`, recording its current position as origin
    fn start(
        &mut self,
        target: VisualHandle,
        argument: Option<&str>,
        stage: &dyn Stage,
        config: &PlaybackConfig,
    ) -> Option<Box<dyn Animation>>;
}

struct ActiveAnimation {
    effect: String,
    animation: Box<dyn Animation>,
}

/// Registry of production effects plus the animations they are running
pub struct ProductionDispatcher {
    effects: HashMap<String, Box<dyn ProductionEffect>>,
    active: Vec<ActiveAnimation>,
}

impl ProductionDispatcher {
    /// Dispatcher with the built-in `jump` and `shake` effects
    pub fn new(config: &PlaybackConfig) -> Self {
        let mut dispatcher = Self::empty();
        dispatcher.register("jump", Box::new(JumpEffect));
        dispatcher.register("shake", Box::new(ShakeEffect::new(&config.shake)));
        dispatcher
    }

    /// Dispatcher with no effects registered
    pub fn empty() -> Self {
        Self {
            effects: HashMap::new(),
            active: Vec::new(),
        }
    }

    /// Register an effect under `name`, replacing any previous handler
    pub fn register(&mut self, name: &str, effect: Box<dyn ProductionEffect>) {
        self.effects.insert(name.trim().to_lowercase(), effect);
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.effects.contains_key(&name.trim().to_lowercase())
    }

    /// Start the effects named by a presented line; returns how many started
    pub fn dispatch(
        &mut self,
        line: &Line,
        targets: &EffectTargets,
        stage: &mut dyn Stage,
        config: &PlaybackConfig,
    ) -> usize {
        if line.production_key.trim().is_empty() {
            return 0;
        }

        let mut started = 0;
        for token in tokenize(&line.production_key) {
            let Some(effect) = self.effects.get_mut(&token.name) else {
                log::trace!("[Production] Ignoring unknown token '{}'", token.name);
                continue;
            };
            let Some(target) = effect.target(targets) else {
                log::debug!("[Production] '{}' has no target, skipped", token.name);
                continue;
            };

            if let Some(index) = self
                .active
                .iter()
                .position(|active| active.effect == token.name && active.animation.target() == target)
            {
                let mut previous = self.active.remove(index);
                previous.animation.cancel(stage);
                log::debug!("[Production] Restarting '{}' on {}", token.name, target);
            }

            let Some(animation) = effect.start(target, token.argument.as_deref(), &*stage, config)
            else {
                continue;
            };
            log::debug!("[Production] Started '{}' on {}", token.name, target);
            self.active.push(ActiveAnimation {
                effect: token.name,
                animation,
            });
            started += 1;
        }
        started
    }

    /// Advance every running animation, dropping the ones that finished
    pub fn tick(&mut self, dt: f32, stage: &mut dyn Stage) {
        self.active.retain_mut(|active| {
            let running = !active.animation.step(dt, stage).is_done();
            if !running {
                log::trace!(
                    "[Production] '{}' on {} finished",
                    active.effect,
                    active.animation.target()
                );
            }
            running
        });
    }

    /// Cancel every running animation, restoring their targets
    pub fn cancel_all(&mut self, stage: &mut dyn Stage) {
        for mut active in self.active.drain(..) {
            active.animation.cancel(stage);
        }
    }

    pub fn is_running(&self, effect: &str, target: VisualHandle) -> bool {
        let effect = effect.trim().to_lowercase();
        self.active
            .iter()
            .any(|active| active.effect == effect && active.animation.target() == target)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}
