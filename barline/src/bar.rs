// Copyright (c) The barline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The progress render controller.
//!
//! [`ProgressLine`] owns the bar's visual state: the parsed format template,
//! the spinner position, the run stopwatch and the throttle policy. It never
//! touches the stream itself; every write goes through the
//! [`Console`](crate::console::Console), and the display color is recomputed
//! from the live counts on every render.

use crate::{
    config::{Glyphs, ProgressConfig},
    console::Console,
    duration::DisplayHhMmSs,
    errors::FormatError,
    events::RunCounts,
    styles::{Styles, run_style},
};
use owo_colors::OwoColorize;
use std::{
    io,
    time::{Duration, Instant},
};
use swrite::{SWrite, swrite};
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Current,
    Total,
    Elapsed,
    Percent,
    Spinner,
    Bar,
}

fn parse_template(template: &str) -> Result<Vec<Segment>, FormatError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.chars();

    while let Some(c) = chars.next() {
        if c != '{' {
            literal.push(c);
            continue;
        }
        let mut name = String::new();
        loop {
            match chars.next() {
                Some('}') => break,
                Some(c) => name.push(c),
                None => return Err(FormatError::UnclosedPlaceholder),
            }
        }
        let segment = match name.as_str() {
            "current" => Segment::Current,
            "total" => Segment::Total,
            "elapsed" => Segment::Elapsed,
            "percent" => Segment::Percent,
            "spinner" => Segment::Spinner,
            "bar" => Segment::Bar,
            _ => return Err(FormatError::UnknownPlaceholder { name }),
        };
        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(segment);
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

/// How often render requests actually reach the stream.
#[derive(Clone, Debug)]
pub(crate) enum Throttle {
    /// Render on every call. Used on interactive terminals.
    EveryRender,

    /// Render at most once per period, so captured logs aren't flooded.
    Periodic {
        period: Duration,
        last_render: Option<Instant>,
    },
}

impl Throttle {
    pub(crate) fn for_environment(ci: bool) -> Self {
        if ci {
            let period = Duration::from_secs(1);
            debug!("continuous-integration environment, throttling renders to one per {period:?}");
            Throttle::Periodic {
                period,
                last_render: None,
            }
        } else {
            Throttle::EveryRender
        }
    }

    fn allows(&mut self, now: Instant) -> bool {
        match self {
            Throttle::EveryRender => true,
            Throttle::Periodic {
                period,
                last_render,
            } => match last_render {
                Some(last) if now.duration_since(*last) < *period => false,
                _ => {
                    *last_render = Some(now);
                    true
                }
            },
        }
    }
}

pub(crate) struct ProgressLine {
    total: usize,
    segments: Vec<Segment>,
    glyphs: Glyphs,
    spinner: Vec<char>,
    width: usize,
    spinner_index: usize,
    started_at: Instant,
    throttle: Throttle,
    closed: bool,
}

impl ProgressLine {
    /// Fixes the total and parses the template. Writes nothing until the
    /// first render request.
    pub(crate) fn new(
        total: usize,
        config: &ProgressConfig,
        glyphs: Glyphs,
        throttle: Throttle,
    ) -> Result<Self, FormatError> {
        let segments = parse_template(&config.template)?;
        let spinner = glyphs.spinner.chars().collect();
        Ok(Self {
            total,
            segments,
            glyphs,
            spinner,
            width: config.width,
            spinner_index: 0,
            started_at: Instant::now(),
            throttle,
            closed: false,
        })
    }

    /// Advances the spinner and requests a render, subject to the throttle
    /// policy.
    pub(crate) fn advance(
        &mut self,
        counts: &RunCounts,
        styles: &Styles,
        console: &mut Console,
    ) -> io::Result<()> {
        assert!(
            counts.current <= self.total,
            "bar advanced past the expected total of {}",
            self.total,
        );
        if !self.spinner.is_empty() {
            self.spinner_index = (self.spinner_index + 1) % self.spinner.len();
        }
        if self.throttle.allows(Instant::now()) {
            self.render(counts, styles, console)
        } else {
            Ok(())
        }
    }

    /// Re-renders the bar at its current state without changing anything.
    ///
    /// Called by the refresh ticker so the elapsed-time field stays live. A
    /// refresh after [`close`](Self::close) is a no-op, which tolerates a
    /// tick racing run teardown.
    pub(crate) fn refresh(
        &mut self,
        counts: &RunCounts,
        styles: &Styles,
        console: &mut Console,
    ) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.render(counts, styles, console)
    }

    /// Erases the displayed bar to make room for out-of-band output.
    pub(crate) fn clear(&self, console: &mut Console) -> io::Result<()> {
        console.erase()
    }

    /// Takes the bar off screen for good.
    pub(crate) fn close(&mut self, console: &mut Console) -> io::Result<()> {
        self.closed = true;
        console.erase()
    }

    fn render(&self, counts: &RunCounts, styles: &Styles, console: &mut Console) -> io::Result<()> {
        let line = self.format_line(counts);
        let style = run_style(counts, styles);
        console.write(&line.style(style).to_string())
    }

    fn format_line(&self, counts: &RunCounts) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Current => swrite!(out, "{}", counts.current),
                Segment::Total => swrite!(out, "{}", self.total),
                Segment::Elapsed => swrite!(out, "{}", DisplayHhMmSs(self.started_at.elapsed())),
                Segment::Percent => swrite!(out, "{}", self.percent(counts.current)),
                Segment::Spinner => {
                    if let Some(glyph) = self.spinner.get(self.spinner_index) {
                        out.push(*glyph);
                    }
                }
                Segment::Bar => self.push_bar_cells(&mut out, counts.current),
            }
        }
        out
    }

    fn percent(&self, current: usize) -> usize {
        if self.total == 0 {
            100
        } else {
            current * 100 / self.total
        }
    }

    fn push_bar_cells(&self, out: &mut String, current: usize) {
        let filled = if self.total == 0 {
            self.width
        } else {
            self.width * current / self.total
        };

        if current >= self.total {
            out.extend(std::iter::repeat_n(self.glyphs.fill, self.width));
        } else if filled == 0 {
            out.extend(std::iter::repeat_n(self.glyphs.empty, self.width));
        } else {
            out.extend(std::iter::repeat_n(self.glyphs.fill, filled - 1));
            out.push(self.glyphs.head);
            out.extend(std::iter::repeat_n(self.glyphs.empty, self.width - filled));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::{CaptureWrites, Destination, WriteOp};

    fn config_with(template: &str, width: usize) -> ProgressConfig {
        ProgressConfig {
            template: template.to_owned(),
            width,
            ..ProgressConfig::default()
        }
    }

    fn capture_console() -> (Console, CaptureWrites) {
        let capture = CaptureWrites::new();
        let console = Console::new(Destination::Capture(capture.clone()), true, true);
        (console, capture)
    }

    fn line(total: usize, template: &str, width: usize) -> ProgressLine {
        ProgressLine::new(
            total,
            &config_with(template, width),
            Glyphs::default(),
            Throttle::EveryRender,
        )
        .expect("template parses")
    }

    fn counts_at(total: usize, current: usize) -> RunCounts {
        RunCounts {
            total,
            current,
            passed: current,
            ..RunCounts::default()
        }
    }

    #[test]
    fn unknown_placeholder_is_rejected() {
        let err = parse_template("{current}/{frobs}").unwrap_err();
        assert_eq!(
            err,
            FormatError::UnknownPlaceholder {
                name: "frobs".to_owned()
            },
        );
        assert_eq!(
            parse_template("{current").unwrap_err(),
            FormatError::UnclosedPlaceholder,
        );
    }

    #[test]
    fn formats_counts_bar_and_percent() {
        let bar = line(4, "{current}/{total} {bar} {percent}%", 8);
        assert_eq!(bar.format_line(&counts_at(4, 0)), "0/4          0%");
        assert_eq!(bar.format_line(&counts_at(4, 2)), "2/4 ===>     50%");
        assert_eq!(bar.format_line(&counts_at(4, 4)), "4/4 ======== 100%");
    }

    #[test]
    fn empty_run_renders_complete() {
        let bar = line(0, "{bar} {percent}%", 4);
        assert_eq!(bar.format_line(&counts_at(0, 0)), "==== 100%");
    }

    #[test]
    fn spinner_cycles_on_advance() {
        let (mut console, capture) = capture_console();
        let mut bar = line(8, "{spinner}", 4);
        let styles = Styles::default();
        for n in 1..=5 {
            bar.advance(&counts_at(8, n), &styles, &mut console).unwrap();
        }
        // The default spinner is `-\|/`, entered at its second glyph and
        // wrapping after the fourth.
        assert_eq!(capture.bars(), ["\\", "|", "/", "-", "\\"]);
    }

    #[test]
    fn periodic_throttle_skips_back_to_back_renders() {
        let mut throttle = Throttle::Periodic {
            period: Duration::from_secs(3600),
            last_render: None,
        };
        let now = Instant::now();
        assert!(throttle.allows(now));
        assert!(!throttle.allows(now));
        assert!(!throttle.allows(now + Duration::from_secs(1)));
        assert!(throttle.allows(now + Duration::from_secs(3600)));

        let mut every = Throttle::EveryRender;
        assert!(every.allows(now));
        assert!(every.allows(now));
    }

    #[test]
    fn clear_then_refresh_reproduces_the_same_line() {
        let (mut console, capture) = capture_console();
        let mut bar = line(6, "{spinner} [{elapsed}] {bar} {current}/{total}", 12);
        let styles = Styles::default();
        let counts = counts_at(6, 3);

        bar.advance(&counts, &styles, &mut console).unwrap();
        bar.clear(&mut console).unwrap();
        bar.refresh(&counts, &styles, &mut console).unwrap();

        let bars = capture.bars();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0], bars[1]);
        assert_eq!(
            capture.ops()[1],
            WriteOp::Erase,
            "the erase lands between the two renders",
        );
    }

    #[test]
    fn refresh_after_close_is_a_noop() {
        let (mut console, capture) = capture_console();
        let mut bar = line(2, "{current}", 4);
        let styles = Styles::default();

        bar.advance(&counts_at(2, 1), &styles, &mut console).unwrap();
        bar.close(&mut console).unwrap();
        bar.refresh(&counts_at(2, 1), &styles, &mut console).unwrap();

        assert_eq!(
            capture.ops(),
            vec![WriteOp::Bar("1".to_owned()), WriteOp::Erase],
        );
    }

    #[test]
    #[should_panic(expected = "past the expected total")]
    fn advancing_past_total_panics() {
        let (mut console, _capture) = capture_console();
        let mut bar = line(1, "{current}", 4);
        bar.advance(&counts_at(1, 2), &Styles::default(), &mut console)
            .unwrap();
    }
}
