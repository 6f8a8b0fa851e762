//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: state container
//! - [`Notifier`]: notification lifecycle state machine
//! - [`Driver`]: platform-specific I/O
//!
//! The loop waits for whichever comes first, the next input event or the
//! notifier's next deadline, so auto-hides and batch flushes fire on time
//! without polling.

use huddle_core::{Environment, Notifier, NotifierAction, NotifierConfig, notifier::time_until};

use crate::{App, AppAction, AppEvent, Driver};

/// What woke the loop.
enum Wake {
    Input(Option<AppEvent>),
    Deadline,
}

/// Generic runtime that orchestrates App, Notifier, and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `E`: Environment providing time
pub struct Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    driver: D,
    env: E,
    app: App,
    notifier: Notifier<E>,
    /// Input source exhausted. The loop keeps running until timers drain.
    input_closed: bool,
    /// State changed since the last render.
    dirty: bool,
}

impl<D, E> Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    /// Create a new runtime with the given driver, environment and config.
    pub fn new(driver: D, env: E, config: NotifierConfig) -> Self {
        let app = App::new(config.enabled);
        let notifier = Notifier::new(env.clone(), config);
        Self { driver, env, app, notifier, input_closed: false, dirty: false }
    }

    /// Run the main event loop.
    ///
    /// Runs until a quit event, or until input is exhausted and no timer is
    /// pending. Returns the final application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(mut self) -> Result<App, D::Error> {
        self.driver.render(&self.app)?;

        loop {
            let Some(wake) = self.wait().await? else {
                break;
            };

            let quit = match wake {
                Wake::Input(Some(event)) => {
                    tracing::trace!(?event, "input");
                    let actions = self.app.handle(event);
                    self.process_actions(actions).await?
                },
                Wake::Input(None) => {
                    tracing::debug!("input closed, draining timers");
                    self.input_closed = true;
                    false
                },
                Wake::Deadline => false,
            };

            // Timers due at this instant fire before the next input
            let actions = self.notifier.handle_tick(self.app.roster());
            self.execute(actions).await?;
            self.flush_render()?;

            if quit {
                break;
            }
        }

        self.driver.stop();
        Ok(self.app)
    }

    /// Wait for input or the next deadline. `None` when there is nothing
    /// left to wait for.
    async fn wait(&mut self) -> Result<Option<Wake>, D::Error> {
        let deadline = self.notifier.next_deadline();
        let wake = match (self.input_closed, deadline) {
            (true, None) => return Ok(None),
            (true, Some(deadline)) => {
                self.env.sleep(time_until(self.env.now(), deadline)).await;
                Wake::Deadline
            },
            (false, None) => Wake::Input(self.driver.next_event().await?),
            (false, Some(deadline)) => {
                let wait = time_until(self.env.now(), deadline);
                tokio::select! {
                    biased;
                    event = self.driver.next_event() => Wake::Input(event?),
                    () = self.env.sleep(wait) => Wake::Deadline,
                }
            },
        };
        Ok(Some(wake))
    }

    /// Process actions returned by the App.
    ///
    /// Returns `true` if should quit.
    async fn process_actions(&mut self, actions: Vec<AppAction>) -> Result<bool, D::Error> {
        for action in actions {
            match action {
                AppAction::Render => self.dirty = true,
                AppAction::Quit => return Ok(true),
                AppAction::Notify(event) => match self.notifier.handle(event) {
                    Ok(actions) => self.execute(actions).await?,
                    Err(e) => tracing::warn!(error = %e, "dropping notification"),
                },
            }
        }
        Ok(false)
    }

    /// Execute notifier actions in order.
    ///
    /// A pending render is flushed before each device effect so the host
    /// sees the queue as it was when the effect was issued.
    async fn execute(&mut self, actions: Vec<NotifierAction>) -> Result<(), D::Error> {
        for action in actions {
            match action {
                NotifierAction::Dispatch(event) => {
                    self.dirty |= self.app.apply(event);
                },
                NotifierAction::SetMuted { media, muted } => {
                    self.flush_render()?;
                    tracing::info!(?media, muted, "device control");
                    self.driver.set_muted(media, muted).await?;
                },
                NotifierAction::Navigate => {
                    self.flush_render()?;
                    tracing::info!("session ended, navigating away");
                    self.driver.navigate().await?;
                },
            }
        }
        Ok(())
    }

    fn flush_render(&mut self) -> Result<(), D::Error> {
        if std::mem::take(&mut self.dirty) {
            self.driver.render(&self.app)?;
        }
        Ok(())
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a reference to the Notifier
    pub fn notifier(&self) -> &Notifier<E> {
        &self.notifier
    }
}
