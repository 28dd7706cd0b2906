/// Interactive shell over a headless player
use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::sync::Arc;

use cadence_core::{format_duration, CadenceError, Catalog, PersistenceGateway, TrackId, View};
use cadence_playback::{Command, HeadlessSink, PlaybackStatus, Player, PlayerConfig, SinkRegistry};
use cadence_storage::JsonFileGateway;
use tracing::{debug, info};

use crate::config::CliConfig;
use crate::error::{CliError, Result};

/// Catalog used when no catalog file is configured
pub const DEMO_CATALOG: &str = include_str!("../catalog.json");

/// One parsed shell line
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    /// A transport command
    Command(Command),
    /// Advance the simulated clock
    Tick(f64),
    /// Print the state line
    State,
    /// List tracks, optionally filtered
    Tracks(Option<String>),
    /// Leave the shell
    Quit,
}

/// Parse a shell line; `Ok(None)` for blank lines and comments
pub fn parse_line(input: &str) -> Result<Option<Line>> {
    let input = input.trim();
    if input.is_empty() || input.starts_with('#') {
        return Ok(None);
    }

    let (word, rest) = match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    };
    let arg = (!rest.is_empty()).then_some(rest);

    let line = match word {
        "play" | "pause" | "p" => Line::Command(Command::PlayPause),
        "next" | "n" => Line::Command(Command::Next),
        "prev" | "previous" => Line::Command(Command::Previous),
        "seek" => Line::Command(Command::SeekTo(number(word, arg)?)),
        "vol" | "volume" => Line::Command(Command::SetVolume(number(word, arg)?)),
        "mute" => Line::Command(Command::ToggleMute),
        "shuffle" => Line::Command(Command::ToggleShuffle),
        "repeat" => Line::Command(Command::ToggleRepeat),
        "like" => Line::Command(Command::ToggleLike(arg.map(TrackId::new))),
        "select" => {
            let id = arg.ok_or_else(|| CliError::InvalidInput("select needs a track id".into()))?;
            Line::Command(Command::SelectTrack(TrackId::new(id)))
        }
        "view" => {
            let view: View = arg
                .unwrap_or_default()
                .parse()
                .map_err(|e: CadenceError| CliError::InvalidInput(e.to_string()))?;
            Line::Command(Command::SetView(view))
        }
        "tick" => Line::Tick(number(word, arg)?),
        "state" | "status" => Line::State,
        "tracks" | "search" => Line::Tracks(arg.map(str::to_string)),
        "quit" | "exit" | "q" => Line::Quit,
        other => return Err(CliError::InvalidInput(format!("unknown command '{other}'"))),
    };
    Ok(Some(line))
}

fn number(word: &str, arg: Option<&str>) -> Result<f64> {
    let raw = arg.ok_or_else(|| CliError::InvalidInput(format!("{word} needs a number")))?;
    raw.parse()
        .map_err(|_| CliError::InvalidInput(format!("{word}: '{raw}' is not a number")))
}

/// Player plus the simulated sinks it drives
pub struct Session {
    player: Player,
    sinks: HashMap<TrackId, HeadlessSink>,
}

impl Session {
    /// Open the session described by `config`
    pub fn open(config: &CliConfig) -> Result<Self> {
        let catalog = match &config.catalog_path {
            Some(path) => Catalog::from_json(&std::fs::read_to_string(path)?)?,
            None => Catalog::from_json(DEMO_CATALOG)?,
        };
        let gateway = JsonFileGateway::open(&config.state_path)?;
        info!(
            tracks = catalog.len(),
            state = %config.state_path.display(),
            "Opening session"
        );
        Ok(Self::new(
            catalog,
            config.track_length_secs,
            Box::new(gateway),
            config.player.clone(),
        ))
    }

    /// Session over `gateway` with one headless sink per track
    pub fn new(
        catalog: Catalog,
        track_length_secs: f64,
        gateway: Box<dyn PersistenceGateway>,
        player_config: PlayerConfig,
    ) -> Self {
        let mut registry = SinkRegistry::new();
        let mut sinks = HashMap::new();
        for track in catalog.iter() {
            let sink = HeadlessSink::new(track.id.clone(), track_length_secs);
            sinks.insert(track.id.clone(), sink.clone());
            registry.insert(track.id.clone(), Box::new(sink));
        }

        let player = Player::new(Arc::new(catalog), registry, gateway, player_config);
        Self { player, sinks }
    }

    /// The player
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Run one parsed line, returning what to print
    pub fn execute(&mut self, line: Line) -> Result<String> {
        match line {
            Line::Command(command) => {
                self.player.dispatch(command)?;
                Ok(self.state_line())
            }
            Line::Tick(seconds) => {
                self.tick(seconds);
                Ok(self.state_line())
            }
            Line::State => Ok(self.state_line()),
            Line::Tracks(query) => Ok(self.track_listing(query.as_deref().unwrap_or(""))),
            Line::Quit => Ok(String::new()),
        }
    }

    /// Advance the current track by `seconds`, forwarding its events
    pub fn tick(&mut self, seconds: f64) {
        let Some(current) = self.player.state().current_track_id.clone() else {
            debug!("Tick without a current track");
            return;
        };
        let Some(sink) = self.sinks.get(&current) else {
            return;
        };
        for event in sink.tick(seconds) {
            self.player.handle_sink_event(&event);
        }
    }

    /// One-line summary of the player
    pub fn state_line(&self) -> String {
        let state = self.player.state();
        let status = match state.status() {
            PlaybackStatus::Idle => "idle",
            PlaybackStatus::Loaded => "paused",
            PlaybackStatus::Playing => "playing",
        };

        let mut line = match self.player.current_track() {
            Some(track) => {
                let progress = self.player.progress();
                let liked = if self.player.is_liked(&track.id) { " *" } else { "" };
                format!(
                    "[{status}] {} - {} ({}/{}){liked}",
                    track.title,
                    track.artist,
                    format_duration(progress.position),
                    format_duration(progress.duration.unwrap_or(f64::NAN)),
                )
            }
            None => format!("[{status}]"),
        };

        line.push_str(&format!(
            " | vol {:.0}%{}",
            state.volume * 100.0,
            if state.is_muted() { " (muted)" } else { "" }
        ));
        if state.is_shuffle {
            line.push_str(" | shuffle");
        }
        if state.is_repeat {
            line.push_str(" | repeat");
        }
        line.push_str(&format!(
            " | view {} ({} tracks)",
            state.current_view,
            state.active_playlist.len()
        ));
        line
    }

    /// Catalog (or search results) with liked and current markers
    pub fn track_listing(&self, query: &str) -> String {
        let current = self.player.state().current_track_id.as_ref();
        self.player
            .search(query)
            .iter()
            .map(|track| {
                format!(
                    "{} {} {:<4} {} - {}",
                    if Some(&track.id) == current { ">" } else { " " },
                    if self.player.is_liked(&track.id) { "*" } else { " " },
                    track.id.as_str(),
                    track.title,
                    track.artist
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Read lines from `input` until `quit` or end of input
    ///
    /// Bad lines are reported and skipped. The session is saved on exit.
    pub fn run(&mut self, input: impl BufRead, mut output: impl Write) -> Result<()> {
        writeln!(output, "{}", self.state_line())?;

        for raw in input.lines() {
            let raw = raw?;
            match parse_line(&raw) {
                Ok(None) => {}
                Ok(Some(Line::Quit)) => break,
                Ok(Some(line)) => match self.execute(line) {
                    Ok(text) => writeln!(output, "{text}")?,
                    Err(e) => writeln!(output, "error: {e}")?,
                },
                Err(e) => writeln!(output, "error: {e}")?,
            }
        }

        self.player.unload();
        Ok(())
    }
}
