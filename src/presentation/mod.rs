//! Binding presented lines to the stage
//!
//! The binder applies a line's speaker, text, portraits, position, background
//! and sprite to the stage, and owns the single active typewriter reveal.

use crate::config::PlaybackConfig;
use crate::error::{AssetKind, Diagnostic, Diagnostics};
use crate::sequence::SequenceStatus;
use crate::stage::registry::asset_key;
use crate::stage::{AssetRegistry, PortraitSlots, Stage, VisualHandle};
use crate::types::script::Line;
use std::collections::HashSet;

pub mod typewriter;

pub use typewriter::Typewriter;

/// Everything presentation steps read or mutate on one tick
pub struct StageContext<'a> {
    pub stage: &'a mut dyn Stage,
    pub portraits: &'a mut PortraitSlots,
    pub registry: &'a AssetRegistry,
    pub config: &'a PlaybackConfig,
    pub diagnostics: &'a mut Diagnostics,
}

/// Applies lines to the stage and drives the typewriter reveal
#[derive(Debug, Clone, Default)]
pub struct PresentationBinder {
    typewriter: Option<Typewriter>,
}

impl PresentationBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `line` to the stage, returning the primary portrait's visual
    pub fn present(&mut self, line: &Line, ctx: &mut StageContext<'_>) -> Option<VisualHandle> {
        ctx.stage.set_speaker(&line.speaker);
        self.start_reveal(&line.text, ctx);

        let primary = self.bind_portraits(line, ctx);
        if let Some(handle) = primary {
            self.bind_position(line, ctx);
            self.bind_sprite(line, handle, ctx);
        }
        self.bind_background(line, ctx);

        log::debug!(
            "[Present] '{}' speaker='{}' primary={:?}",
            line.node_id,
            line.speaker,
            primary
        );
        primary
    }

    /// Advance the reveal; returns whether it is still running
    pub fn tick(&mut self, dt: f32, stage: &mut dyn Stage) -> bool {
        let Some(typewriter) = self.typewriter.as_mut() else {
            return false;
        };
        let before = typewriter.revealed_chars();
        let status = typewriter.step(dt);
        if typewriter.revealed_chars() != before {
            stage.set_text(typewriter.visible_text());
        }
        if status.is_done() {
            self.typewriter = None;
            return false;
        }
        true
    }

    /// Show the full text at once; returns `false` if nothing was revealing
    pub fn skip(&mut self, stage: &mut dyn Stage) -> bool {
        let Some(mut typewriter) = self.typewriter.take() else {
            return false;
        };
        typewriter.skip();
        stage.set_text(typewriter.full_text());
        log::trace!("[Typewriter] Skipped");
        true
    }

    /// Stop the reveal where it is
    pub fn cancel(&mut self) {
        self.typewriter = None;
    }

    pub fn is_typing(&self) -> bool {
        self.typewriter
            .as_ref()
            .is_some_and(|typewriter| !typewriter.is_complete())
    }

    fn start_reveal(&mut self, text: &str, ctx: &mut StageContext<'_>) {
        ctx.stage.set_text("");
        let typewriter = Typewriter::new(text, ctx.config.typewriter.char_interval);
        ctx.stage.set_text(typewriter.visible_text());
        self.typewriter = match typewriter.status() {
            SequenceStatus::Continuing => Some(typewriter),
            SequenceStatus::Done => None,
        };
    }

    fn bind_portraits(&self, line: &Line, ctx: &mut StageContext<'_>) -> Option<VisualHandle> {
        let keys = line.portrait_keys();
        let mut primary = None;
        for (index, key) in keys.iter().enumerate() {
            let handle = ctx
                .portraits
                .ensure(key, ctx.registry, &mut *ctx.stage, &mut *ctx.diagnostics)
                .map(|instance| instance.handle());
            if index == 0 {
                primary = handle;
            }
        }

        let active: HashSet<String> = keys.iter().map(|key| asset_key(key)).collect();
        let alphas = &ctx.config.portraits;
        for instance in ctx.portraits.instances() {
            let alpha = if active.contains(instance.key()) {
                alphas.active_alpha
            } else {
                alphas.dimmed_alpha
            };
            ctx.stage.set_opacity(instance.handle(), alpha);
        }
        primary
    }

    fn bind_position(&self, line: &Line, ctx: &mut StageContext<'_>) {
        let Some(key) = line.primary_portrait() else {
            return;
        };
        let registry = ctx.registry;
        match registry.anchor(line.position) {
            Some(anchor) => {
                ctx.portraits
                    .assign_slot(key, line.position, anchor, &mut *ctx.stage);
            }
            None => ctx
                .diagnostics
                .report(Diagnostic::MissingAnchor { slot: line.position }),
        }
    }

    fn bind_sprite(&self, line: &Line, handle: VisualHandle, ctx: &mut StageContext<'_>) {
        let registry = ctx.registry;
        let Some(template) = line.primary_portrait().and_then(|key| registry.portrait(key)) else {
            return;
        };
        let sprite_type = line.sprite_type.trim();
        let sprite = match template.variant(sprite_type) {
            Some(sprite) => sprite,
            None => {
                if !sprite_type.is_empty() {
                    ctx.diagnostics.report(Diagnostic::missing_asset(
                        AssetKind::Sprite,
                        format!("{}/{}", template.key, sprite_type),
                    ));
                }
                template.default_sprite.as_str()
            }
        };
        ctx.stage.set_sprite(handle, sprite);
    }

    fn bind_background(&self, line: &Line, ctx: &mut StageContext<'_>) {
        let code = line.bgi_code.trim();
        if code.is_empty() {
            return;
        }
        match ctx.registry.background(code) {
            Some(background) => ctx.stage.set_background(background),
            None => ctx
                .diagnostics
                .report(Diagnostic::missing_asset(AssetKind::Background, code)),
        }
    }
}
