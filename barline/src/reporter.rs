// Copyright (c) The barline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aggregates run events into live progress output.
//!
//! The main structure in this module is [`RunReporter`], constructed via a
//! [`ReporterBuilder`].

use crate::{
    bar::{ProgressLine, Throttle},
    config::{Glyphs, ProgressConfig},
    console::{Console, Destination},
    errors::ReportEventError,
    events::{RunCounts, RunEvent, UnitRef},
    slow::slow_unit_warning,
    styles::Styles,
    ticker::{self, TickerHandle},
};
use owo_colors::OwoColorize;
use std::{
    io,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};
use tracing::debug;

const EVENT_BEFORE_START: &str = "received a unit event before the run started";

/// Run reporter builder.
///
/// The environment flags are explicit so the reporter can be driven in tests
/// without touching the process environment: whoever constructs the reporter
/// has already decided whether the destination is an interactive terminal,
/// whether color is wanted, and whether a continuous-integration environment
/// is capturing the output.
#[derive(Debug)]
pub struct ReporterBuilder {
    should_colorize: bool,
    interactive: bool,
    ci: bool,
    tick_period: Duration,
    config: ProgressConfig,
}

impl Default for ReporterBuilder {
    fn default() -> Self {
        Self {
            should_colorize: false,
            interactive: false,
            ci: false,
            tick_period: Duration::from_secs(1),
            config: ProgressConfig::default(),
        }
    }
}

impl ReporterBuilder {
    /// Set to true if the reporter should colorize output.
    ///
    /// Color is still suppressed if the destination isn't interactive or a
    /// CI environment is signalled.
    pub fn set_colorize(&mut self, should_colorize: bool) -> &mut Self {
        self.should_colorize = should_colorize;
        self
    }

    /// Set to true if the destination is an interactive terminal.
    pub fn set_interactive(&mut self, interactive: bool) -> &mut Self {
        self.interactive = interactive;
        self
    }

    /// Set to true when running under continuous integration.
    ///
    /// Renders are then throttled to one per second so captured logs aren't
    /// flooded with bar redraws.
    pub fn set_ci(&mut self, ci: bool) -> &mut Self {
        self.ci = ci;
        self
    }

    /// Sets the refresh ticker's period. One second by default.
    pub fn set_tick_period(&mut self, tick_period: Duration) -> &mut Self {
        self.tick_period = tick_period;
        self
    }

    /// Sets the display options.
    pub fn set_config(&mut self, config: ProgressConfig) -> &mut Self {
        self.config = config;
        self
    }

    /// Creates a new run reporter writing to `dest`.
    pub fn build(&self, dest: Destination) -> RunReporter {
        let glyphs = match &self.config.glyphs {
            Some(glyphs) => glyphs.clone(),
            None => {
                let mut glyphs = Glyphs::default();
                match &dest {
                    Destination::Terminal => {
                        if supports_unicode::on(supports_unicode::Stream::Stderr) {
                            glyphs.use_unicode();
                        }
                    }
                    // Always use Unicode for in-memory captures.
                    Destination::Capture(_) => glyphs.use_unicode(),
                }
                glyphs
            }
        };

        let mut styles = Box::<Styles>::default();
        if self.should_colorize && self.interactive && !self.ci {
            styles.colorize(&self.config.palette);
        } else if self.should_colorize {
            debug!("color requested but suppressed for a non-interactive destination");
        }

        let console = Console::new(dest, self.interactive, self.interactive);

        RunReporter {
            state: Arc::new(Mutex::new(ReporterState {
                counts: RunCounts::default(),
                bar: None,
                current_unit: None,
                console,
                styles,
                config: self.config.clone(),
                glyphs,
                ci: self.ci,
            })),
            ticker: None,
            tick_period: self.tick_period,
        }
    }
}

/// Receives run lifecycle events and keeps the progress bar current.
///
/// Events arrive synchronously, one at a time, in unit order. The refresh
/// ticker competes with them for the same state lock, so bar writes from the
/// two paths never interleave mid-line.
///
/// A tokio runtime must be current when a run starts: the refresh ticker is
/// spawned on it.
pub struct RunReporter {
    state: Arc<Mutex<ReporterState>>,
    ticker: Option<TickerHandle>,
    tick_period: Duration,
}

impl RunReporter {
    /// Report a run event.
    ///
    /// A failed unit is recorded and displayed immediately; it never stops
    /// the run.
    pub fn report_event(&mut self, event: RunEvent) -> Result<(), ReportEventError> {
        match event {
            RunEvent::RunStarted { expected_total } => {
                // At most one ticker is alive per run.
                if let Some(ticker) = self.ticker.take() {
                    ticker.cancel();
                }
                self.lock_state().start_run(expected_total)?;
                self.ticker = Some(ticker::spawn(Arc::clone(&self.state), self.tick_period));
                Ok(())
            }
            RunEvent::UnitStarted { unit } => {
                self.lock_state().unit_started(unit);
                Ok(())
            }
            RunEvent::UnitPassed { elapsed } => self
                .lock_state()
                .unit_passed(elapsed)
                .map_err(ReportEventError::Io),
            RunEvent::UnitPending => self
                .lock_state()
                .unit_pending()
                .map_err(ReportEventError::Io),
            RunEvent::UnitFailed { report } => self
                .lock_state()
                .unit_failed(&report)
                .map_err(ReportEventError::Io),
            RunEvent::Message { text } => self
                .lock_state()
                .message(&text)
                .map_err(ReportEventError::Io),
            RunEvent::RunClosed => {
                if let Some(ticker) = self.ticker.take() {
                    ticker.cancel();
                }
                self.lock_state().close_run().map_err(ReportEventError::Io)
            }
        }
    }

    /// Returns a snapshot of the current run counts.
    pub fn counts(&self) -> RunCounts {
        self.lock_state().counts
    }

    fn lock_state(&self) -> MutexGuard<'_, ReporterState> {
        self.state.lock().expect("reporter state lock poisoned")
    }
}

impl Drop for RunReporter {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }
}

/// State shared between the event-delivery path and the refresh ticker.
///
/// The lock around it is held for the duration of one render/refresh/clear
/// sequence and released immediately after; it never spans a sleep.
pub(crate) struct ReporterState {
    counts: RunCounts,
    bar: Option<ProgressLine>,
    current_unit: Option<UnitRef>,
    console: Console,
    styles: Box<Styles>,
    config: ProgressConfig,
    glyphs: Glyphs,
    ci: bool,
}

impl ReporterState {
    fn start_run(&mut self, expected_total: usize) -> Result<(), ReportEventError> {
        self.counts = RunCounts::new(expected_total);
        self.current_unit = None;
        self.bar = Some(ProgressLine::new(
            expected_total,
            &self.config,
            self.glyphs.clone(),
            Throttle::for_environment(self.ci),
        )?);
        Ok(())
    }

    fn unit_started(&mut self, unit: UnitRef) {
        self.current_unit = Some(unit);
    }

    fn unit_passed(&mut self, elapsed: Duration) -> io::Result<()> {
        self.counts.record_pass();
        if let Some(unit) = self.current_unit.take() {
            if let Some(warning) = slow_unit_warning(self.config.slow_threshold, elapsed, &unit) {
                let warning = warning.style(self.styles.pending).to_string();
                self.bar
                    .as_ref()
                    .expect(EVENT_BEFORE_START)
                    .clear(&mut self.console)?;
                self.console.line(&warning)?;
            }
        }
        self.advance_bar()
    }

    fn unit_pending(&mut self) -> io::Result<()> {
        self.counts.record_pending();
        self.current_unit = None;
        self.advance_bar()
    }

    fn unit_failed(&mut self, report: &str) -> io::Result<()> {
        self.counts.record_fail();
        self.current_unit = None;
        self.bar
            .as_ref()
            .expect(EVENT_BEFORE_START)
            .clear(&mut self.console)?;
        self.console.line(report)?;
        self.console.line("")?;
        self.advance_bar()
    }

    fn message(&mut self, text: &str) -> io::Result<()> {
        self.bar
            .as_ref()
            .expect(EVENT_BEFORE_START)
            .clear(&mut self.console)?;
        self.console.line(text)?;
        if self.console.supports_inline_log() {
            // Logging through the bar: put it straight back on screen rather
            // than waiting for the next event or tick.
            self.refresh()?;
        }
        Ok(())
    }

    fn advance_bar(&mut self) -> io::Result<()> {
        let bar = self.bar.as_mut().expect(EVENT_BEFORE_START);
        bar.advance(&self.counts, &self.styles, &mut self.console)
    }

    pub(crate) fn refresh(&mut self) -> io::Result<()> {
        match self.bar.as_mut() {
            Some(bar) => bar.refresh(&self.counts, &self.styles, &mut self.console),
            None => Ok(()),
        }
    }

    fn close_run(&mut self) -> io::Result<()> {
        match self.bar.as_mut() {
            Some(bar) => bar.close(&mut self.console),
            None => Ok(()),
        }
    }
}
