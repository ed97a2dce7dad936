//! Terminal player mode
//!
//! Plays an episode on an in-memory stage. Every asset the episode names is
//! registered on the fly so a bare script can be previewed without a manifest.

use crate::cli::view_state::ViewState;
use crate::config::PlaybackConfig;
use crate::parser::parse_episode;
use crate::runtime::{AdvanceOutcome, PlaybackController};
use crate::stage::registry::asset_key;
use crate::stage::{Anchor, AssetManifest, AssetRegistry, MemoryStage, PortraitTemplate};
use crate::types::script::{Episode, Line};
use glam::Vec3;
use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};

/// Simulated frame time
pub const FRAME_DT: f32 = 1.0 / 60.0;

/// Upper bound on frames simulated while settling one line
const MAX_SETTLE_FRAMES: usize = 60 * 30;

/// Horizontal distance between generated anchors
const SLOT_SPACING: f32 = 200.0;

/// Options for [`run_play`]
#[derive(Debug, Clone, Default)]
pub struct PlayOptions {
    /// Print phase and portrait occupancy after every line
    pub debug: bool,
    /// Node to begin at
    pub start: Option<String>,
    /// Asset manifest to use instead of a generated registry
    pub manifest: Option<AssetManifest>,
    pub config: PlaybackConfig,
}

/// Summary of a finished session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaySummary {
    pub lines_presented: usize,
    pub finished: bool,
}

/// Run the player on stdin and stdout
pub fn run_play(source: &str, options: PlayOptions) -> anyhow::Result<PlaySummary> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_session(source, options, stdin.lock(), stdout.lock())
}

/// Run the player against arbitrary input and output
pub fn run_session(
    source: &str,
    options: PlayOptions,
    mut input: impl BufRead,
    mut out: impl Write,
) -> anyhow::Result<PlaySummary> {
    let episode = parse_episode(source)?;

    let mut stage = MemoryStage::new();
    let mut registry = match options.manifest {
        Some(manifest) => manifest.into_registry(),
        None => registry_for(&episode),
    };
    registry.set_shake_target(stage.add_visual("screen", Vec3::ZERO));

    let mut controller = PlaybackController::new(stage, registry, options.config);
    controller.load(episode)?;
    controller.begin(options.start.as_deref())?;

    writeln!(out, "=== kataribe Episode Player ===")?;
    writeln!(out, "Controls: Enter next, q quit")?;
    writeln!(out)?;

    let mut view = ViewState::new();
    let mut summary = PlaySummary {
        lines_presented: 0,
        finished: false,
    };

    loop {
        settle(&mut controller);
        let Some(line) = controller.current_line().cloned() else {
            break;
        };
        summary.lines_presented += 1;

        view.observe(&line, controller.stage(), controller.portraits())
            .render(&mut out)?;
        show_line(&line, controller.stage(), &mut out)?;
        if options.debug {
            show_debug(&controller, &mut out)?;
        }
        for diagnostic in controller.take_diagnostics() {
            writeln!(out, "[warn] {diagnostic}")?;
        }

        if wait_command(&mut input, &mut out)? == Command::Quit {
            writeln!(out, "Goodbye!")?;
            return Ok(summary);
        }

        // Lines are settled before display, so advance never lands on a skip
        if controller.advance() == AdvanceOutcome::Finished {
            summary.finished = true;
            writeln!(out, "== THE END ==")?;
            break;
        }
    }

    Ok(summary)
}

/// Register every portrait, background and slot the episode mentions
pub fn registry_for(episode: &Episode) -> AssetRegistry {
    let mut templates: BTreeMap<String, PortraitTemplate> = BTreeMap::new();
    let mut registry = AssetRegistry::new();

    for line in &episode.lines {
        for key in line.portrait_keys() {
            templates
                .entry(asset_key(key))
                .or_insert_with(|| PortraitTemplate::new(key, format!("{key}.png")));
        }

        let sprite_type = line.sprite_type.trim();
        if let Some(key) = line.primary_portrait()
            && !sprite_type.is_empty()
            && let Some(template) = templates.remove(&asset_key(key))
        {
            let template =
                template.with_variant(sprite_type, format!("{key}_{sprite_type}.png"));
            templates.insert(asset_key(key), template);
        }

        let code = line.bgi_code.trim();
        if !code.is_empty() {
            registry.register_background(code, format!("{code}.png"));
        }

        registry.register_anchor(
            line.position,
            Anchor::new(
                format!("slot{}", line.position),
                Vec3::new(line.position as f32 * SLOT_SPACING, 0.0, 0.0),
            ),
        );
    }

    for template in templates.into_values() {
        registry.register_portrait(template);
    }
    registry
}

/// Tick until the typewriter and every production have finished
fn settle(controller: &mut PlaybackController<MemoryStage>) {
    for _ in 0..MAX_SETTLE_FRAMES {
        if !controller.is_typing() && controller.dispatcher().active_count() == 0 {
            return;
        }
        controller.tick(FRAME_DT);
    }
    log::warn!("[Player] Line did not settle, skipping");
    controller.advance();
}

fn show_line(line: &Line, stage: &MemoryStage, out: &mut impl Write) -> io::Result<()> {
    if stage.speaker().is_empty() {
        writeln!(out, "{}", stage.text())?;
    } else {
        writeln!(out, "{}:", stage.speaker())?;
        writeln!(out, "{}", stage.text())?;
    }
    log::trace!("[Player] Shown '{}'", line.node_id);
    writeln!(out)
}

fn show_debug(
    controller: &PlaybackController<MemoryStage>,
    out: &mut impl Write,
) -> io::Result<()> {
    writeln!(out, "[debug]")?;
    if let Some(line) = controller.current_line() {
        writeln!(out, "node={} order={}", line.node_id, line.order)?;
    }
    writeln!(out, "phase={}", controller.phase())?;
    let mut slots: Vec<String> = controller
        .portraits()
        .instances()
        .map(|instance| match instance.slot() {
            Some(slot) => format!("{}@{}", instance.key(), slot),
            None => instance.key().to_string(),
        })
        .collect();
    slots.sort();
    writeln!(out, "portraits=[{}]", slots.join(", "))?;
    writeln!(out)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Next,
    Quit,
}

/// Read until Enter or `q`; end of input quits
fn wait_command(input: &mut impl BufRead, out: &mut impl Write) -> io::Result<Command> {
    loop {
        out.flush()?;
        let mut buffer = String::new();
        if input.read_line(&mut buffer)? == 0 {
            return Ok(Command::Quit);
        }
        match buffer.trim() {
            "" => return Ok(Command::Next),
            "q" => return Ok(Command::Quit),
            _ => writeln!(out, "Press Enter to continue, or 'q' to quit.")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SOURCE: &str = r#"{
        "episodeId": "ep1",
        "lines": [
            {"nodeId": "a", "order": 1, "speaker": "Bob", "portraitKey": "bob", "text": "Hi", "BGICode": "room"},
            {"nodeId": "b", "order": 2, "speaker": "Bob", "portraitKey": "bob", "SpriteType": "smile", "productionKey": "jump", "text": "Bye"}
        ]
    }"#;

    fn play(input: &str, options: PlayOptions) -> (PlaySummary, String) {
        let mut out = Vec::new();
        let summary = run_session(SOURCE, options, Cursor::new(input), &mut out).unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    #[test]
    fn plays_to_the_end() {
        let (summary, out) = play("\n\n", PlayOptions::default());

        assert_eq!(
            summary,
            PlaySummary {
                lines_presented: 2,
                finished: true
            }
        );
        assert!(out.contains("Bob:\nHi\n"));
        assert!(out.contains("Bob:\nBye\n"));
        assert!(out.contains("Background: room.png"));
        assert!(out.contains("Portrait: bob [bob_smile.png] (slot 0)"));
        assert!(out.contains("== THE END =="));
    }

    #[test]
    fn quit_stops_early() {
        let (summary, out) = play("q\n", PlayOptions::default());

        assert!(!summary.finished);
        assert_eq!(summary.lines_presented, 1);
        assert!(out.contains("Goodbye!"));
    }

    #[test]
    fn start_node_and_debug_output() {
        let options = PlayOptions {
            debug: true,
            start: Some("B".to_string()),
            ..Default::default()
        };
        let (summary, out) = play("\n", options);

        assert_eq!(summary.lines_presented, 1);
        assert!(out.contains("node=b order=2"));
        assert!(out.contains("phase=presenting"));
        assert!(out.contains("portraits=[bob@0]"));
    }

    #[test]
    fn generated_registry_covers_episode() {
        let episode = parse_episode(SOURCE).unwrap();
        let registry = registry_for(&episode);

        assert!(registry.has_portrait("BOB"));
        assert_eq!(registry.background("room"), Some("room.png"));
        assert!(registry.anchor(0).is_some());
        assert_eq!(
            registry.portrait("bob").map(|t| t.sprite_for("smile")),
            Some("bob_smile.png")
        );
    }
}
