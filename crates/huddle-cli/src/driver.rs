//! Script-backed [`Driver`] for session replay.
//!
//! [`ScriptDriver`] reads [`ScriptStep`]s lazily from any async line source,
//! waits out each step's delay on the tokio clock, and writes one JSON
//! [`EffectLine`] per render, device change and navigation.

use std::{
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use huddle_app::{App, AppEvent, Driver};
use huddle_core::MediaType;
use serde::Deserialize;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines},
    time::Instant,
};

use crate::{
    error::CliError,
    output::{EffectLine, OutputEffect},
};

/// One line of a session script.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScriptStep {
    /// Delay before the event, measured from the previous step.
    #[serde(default)]
    pub delay_ms: u64,
    /// Event delivered to the runtime.
    pub event: AppEvent,
}

impl ScriptStep {
    /// Parse a script line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, serde_json::Error> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        serde_json::from_str(line).map(Some)
    }

    /// Delay as a [`Duration`].
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Open a session script. `-` reads standard input.
pub async fn open_script(path: &Path) -> Result<Box<dyn AsyncBufRead + Unpin + Send>, CliError> {
    if path == Path::new("-") {
        return Ok(Box::new(BufReader::new(tokio::io::stdin())));
    }

    let file = tokio::fs::File::open(path)
        .await
        .map_err(|source| CliError::OpenScript { path: PathBuf::from(path), source })?;
    Ok(Box::new(BufReader::new(file)))
}

/// Replays a session script and writes effects as JSON lines.
pub struct ScriptDriver<R, W> {
    lines: Lines<R>,
    /// Lines consumed so far, for error reporting.
    line: usize,
    /// Step read but not yet delivered, with its due time.
    ///
    /// Persisted across calls so a cancelled `next_event` resumes the same
    /// wait instead of dropping the step.
    pending: Option<(Instant, AppEvent)>,
    /// Due time of the previous step; delays chain from here.
    last_due: Instant,
    origin: Instant,
    output: W,
    stopped: bool,
}

impl<R, W> ScriptDriver<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    /// Create a driver reading steps from `input` and writing to `output`.
    pub fn new(input: R, output: W) -> Self {
        let origin = Instant::now();
        Self {
            lines: input.lines(),
            line: 0,
            pending: None,
            last_due: origin,
            origin,
            output,
            stopped: false,
        }
    }

    /// Whether `stop` has been called.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Read the next step, skipping blanks and comments.
    async fn read_step(&mut self) -> Result<Option<ScriptStep>, CliError> {
        while let Some(text) = self.lines.next_line().await.map_err(CliError::ReadScript)? {
            self.line += 1;
            let step = ScriptStep::parse(&text)
                .map_err(|source| CliError::InvalidStep { line: self.line, source })?;
            if step.is_some() {
                return Ok(step);
            }
        }
        Ok(None)
    }

    fn emit(&mut self, effect: OutputEffect) -> Result<(), CliError> {
        let at_ms = self.origin.elapsed().as_millis() as u64;
        serde_json::to_writer(&mut self.output, &EffectLine { at_ms, effect })?;
        writeln!(self.output).map_err(CliError::Output)?;
        self.output.flush().map_err(CliError::Output)
    }
}

impl<R, W> Driver for ScriptDriver<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    type Error = CliError;

    async fn next_event(&mut self) -> Result<Option<AppEvent>, CliError> {
        if self.pending.is_none() {
            let Some(step) = self.read_step().await? else {
                return Ok(None);
            };
            let due = self.last_due + step.delay();
            self.last_due = due;
            self.pending = Some((due, step.event));
        }

        if let Some((due, _)) = &self.pending {
            tokio::time::sleep_until(*due).await;
        }
        Ok(self.pending.take().map(|(_, event)| event))
    }

    fn render(&mut self, app: &App) -> Result<(), CliError> {
        tracing::debug!(visible = app.queue().len(), "render");
        self.emit(OutputEffect::render(app))
    }

    async fn set_muted(&mut self, media: MediaType, muted: bool) -> Result<(), CliError> {
        self.emit(OutputEffect::Muted { media, muted })
    }

    async fn navigate(&mut self) -> Result<(), CliError> {
        self.emit(OutputEffect::Navigated)
    }

    fn stop(&mut self) {
        self.stopped = true;
        if let Err(error) = self.output.flush() {
            tracing::warn!(%error, "failed to flush output");
        }
        tracing::info!(lines = self.line, "replay stopped");
    }
}
