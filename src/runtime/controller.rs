//! Playback state machine

use crate::config::PlaybackConfig;
use crate::error::{Diagnostic, Diagnostics, PlaybackError};
use crate::parser::parse_episode;
use crate::presentation::{PresentationBinder, StageContext};
use crate::production::{EffectTargets, ProductionDispatcher};
use crate::runtime::PlaybackObserver;
use crate::runtime::index::ScriptIndex;
use crate::runtime::navigation::resolve_next;
use crate::stage::{AssetRegistry, PortraitSlots, Stage};
use crate::types::script::{Episode, Line};
use crate::types::state::{PlaybackPhase, PlaybackState};

/// What an `advance` call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// The running reveal was completed; the line stays current
    Skipped,
    /// The next line was presented
    Presented,
    /// The episode ended
    Finished,
    /// Nothing is playing
    Ignored,
}

/// Top-level playback session
///
/// Holds the indexed episode and the current line, reacts to advance input
/// and drives presentation, productions and portrait lifetime on the host's
/// stage. All mutation happens on the caller's thread through `&mut self`.
pub struct PlaybackController<S: Stage> {
    stage: S,
    registry: AssetRegistry,
    config: PlaybackConfig,
    index: Option<ScriptIndex>,
    phase: PlaybackPhase,
    state: PlaybackState,
    portraits: PortraitSlots,
    binder: PresentationBinder,
    dispatcher: ProductionDispatcher,
    observers: Vec<Box<dyn PlaybackObserver>>,
    diagnostics: Diagnostics,
}

impl<S: Stage> PlaybackController<S> {
    pub fn new(stage: S, registry: AssetRegistry, config: PlaybackConfig) -> Self {
        let dispatcher = ProductionDispatcher::new(&config);
        Self {
            stage,
            registry,
            config,
            index: None,
            phase: PlaybackPhase::Idle,
            state: PlaybackState::new(),
            portraits: PortraitSlots::new(),
            binder: PresentationBinder::new(),
            dispatcher,
            observers: Vec::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn PlaybackObserver>) {
        self.observers.push(observer);
    }

    /// Index an episode without starting it
    ///
    /// Fails while a line is being presented; use `set_episode` to switch
    /// episodes mid-playback. On failure the previous episode stays loaded.
    pub fn load(&mut self, episode: Episode) -> Result<(), PlaybackError> {
        if self.phase == PlaybackPhase::Presenting {
            return Err(PlaybackError::InvalidState {
                operation: "load",
                phase: self.phase,
            });
        }
        let index = ScriptIndex::build(episode, &mut self.diagnostics)?;
        log::info!(
            "[Engine] Loaded episode '{}' ({} lines)",
            index.episode_id(),
            index.len()
        );
        self.index = Some(index);
        self.state.clear();
        self.phase = PlaybackPhase::Loaded;
        Ok(())
    }

    /// Parse an episode document and load it
    pub fn load_source(&mut self, source: &str) -> Result<(), PlaybackError> {
        let episode = parse_episode(source)?;
        self.load(episode)
    }

    /// Start presenting from `start_node`, or from the first line when it does not resolve
    pub fn begin(&mut self, start_node: Option<&str>) -> Result<(), PlaybackError> {
        let start = self
            .index
            .as_ref()
            .and_then(|index| index.start_line(start_node))
            .cloned()
            .ok_or(PlaybackError::NoStartLine)?;
        log::info!("[Engine] Beginning at '{}'", start.node_id);
        self.present_line(start);
        Ok(())
    }

    /// React to a tap or programmatic advance
    pub fn advance(&mut self) -> AdvanceOutcome {
        if self.phase != PlaybackPhase::Presenting {
            return AdvanceOutcome::Ignored;
        }

        if self.binder.skip(&mut self.stage) {
            self.state.typing = false;
            self.state.skip_requested = true;
            return AdvanceOutcome::Skipped;
        }

        let next = match (&self.index, &self.state.current) {
            (Some(index), Some(current)) => resolve_next(index, current).cloned(),
            _ => None,
        };
        match next {
            Some(line) => {
                self.present_line(line);
                AdvanceOutcome::Presented
            }
            None => {
                self.finish();
                AdvanceOutcome::Finished
            }
        }
    }

    /// Replace the episode and begin it, whatever the current phase
    ///
    /// Portraits from the previous episode are kept unless
    /// `session.cleanup_on_set_episode` is enabled.
    pub fn set_episode(
        &mut self,
        episode: Episode,
        start_node: Option<&str>,
    ) -> Result<(), PlaybackError> {
        let index = ScriptIndex::build(episode, &mut self.diagnostics)?;
        let start = index
            .start_line(start_node)
            .cloned()
            .ok_or(PlaybackError::NoStartLine)?;

        if self.config.session.cleanup_on_set_episode {
            self.dispatcher.cancel_all(&mut self.stage);
            self.portraits.cleanup_all(&mut self.stage);
        }
        self.binder.cancel();
        log::info!(
            "[Engine] Switched to episode '{}' at '{}'",
            index.episode_id(),
            start.node_id
        );
        self.index = Some(index);
        self.state.clear();
        self.present_line(start);
        Ok(())
    }

    /// Advance every running sequence by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        let typing = self.binder.tick(dt, &mut self.stage);
        if self.phase == PlaybackPhase::Presenting {
            self.state.typing = typing;
        }
        self.dispatcher.tick(dt, &mut self.stage);
    }

    /// Stop everything, release all portraits and forget the episode
    pub fn shutdown(&mut self) {
        self.dispatcher.cancel_all(&mut self.stage);
        self.binder.cancel();
        self.portraits.cleanup_all(&mut self.stage);
        self.index = None;
        self.state.clear();
        self.phase = PlaybackPhase::Idle;
        log::debug!("[Engine] Shut down");
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn current_line(&self) -> Option<&Line> {
        self.state.current.as_ref()
    }

    pub fn is_typing(&self) -> bool {
        self.binder.is_typing()
    }

    pub fn index(&self) -> Option<&ScriptIndex> {
        self.index.as_ref()
    }

    pub fn episode_id(&self) -> Option<&str> {
        self.index.as_ref().map(ScriptIndex::episode_id)
    }

    pub fn portraits(&self) -> &PortraitSlots {
        &self.portraits
    }

    pub fn stage(&self) -> &S {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut S {
        &mut self.stage
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Production registry, for adding custom effects
    pub fn dispatcher_mut(&mut self) -> &mut ProductionDispatcher {
        &mut self.dispatcher
    }

    pub fn dispatcher(&self) -> &ProductionDispatcher {
        &self.dispatcher
    }

    /// Hand all diagnostics recorded since the last call to the host
    ///
    /// Hosts should drain this regularly. Only the most recent
    /// [`MAX_DIAGNOSTICS`](crate::error::MAX_DIAGNOSTICS) entries are kept.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.take()
    }

    fn present_line(&mut self, line: Line) {
        let primary = {
            let mut ctx = StageContext {
                stage: &mut self.stage,
                portraits: &mut self.portraits,
                registry: &self.registry,
                config: &self.config,
                diagnostics: &mut self.diagnostics,
            };
            self.binder.present(&line, &mut ctx)
        };

        self.phase = PlaybackPhase::Presenting;
        self.state.typing = self.binder.is_typing();
        self.state.skip_requested = false;

        let targets = EffectTargets {
            primary,
            shake_target: self.registry.shake_target(),
        };
        self.dispatcher
            .dispatch(&line, &targets, &mut self.stage, &self.config);

        for observer in &mut self.observers {
            observer.on_line_presented(&line);
        }
        self.state.current = Some(line);
    }

    fn finish(&mut self) {
        self.binder.cancel();
        self.portraits.cleanup_all(&mut self.stage);
        self.state.clear();
        self.phase = PlaybackPhase::Finished;

        let episode_id = self.episode_id().unwrap_or_default().to_string();
        log::info!("[Engine] Episode '{}' finished", episode_id);
        for observer in &mut self.observers {
            observer.on_episode_finished(&episode_id);
        }
    }
}
