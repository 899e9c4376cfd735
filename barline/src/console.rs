// Copyright (c) The barline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The output coordinator.
//!
//! Everything the crate prints funnels through [`Console`], so a single
//! serialization point exists for the event-delivery path and the refresh
//! ticker. The coordinator tracks whether a bar line is currently on screen
//! and knows how to erase it atomically before free-form output.

use std::{
    io::{self, Write},
    sync::{Arc, Mutex},
};

/// Where reporter output goes.
///
/// This is usually the terminal, but can be an in-memory capture for tests.
#[derive(Clone, Debug)]
pub enum Destination {
    /// Produce output on the process's standard error stream.
    Terminal,

    /// Record writes in memory instead of producing output.
    Capture(CaptureWrites),
}

/// A single atomic write operation.
///
/// The capture destination records these whole, so a test can verify that
/// concurrent renders never interleave mid-line: any tearing would show up as
/// an operation that isn't one of these shapes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteOp {
    /// The bar line was erased.
    Erase,

    /// The bar line was drawn or redrawn in place.
    Bar(String),

    /// A full line (report, message, warning) was printed.
    Line(String),
}

/// An in-memory recording of write operations, for tests.
///
/// Cloning shares the underlying recording, so a test keeps one handle and
/// passes the other to [`Destination::Capture`].
#[derive(Clone, Debug, Default)]
pub struct CaptureWrites {
    ops: Arc<Mutex<Vec<WriteOp>>>,
}

impl CaptureWrites {
    /// Creates an empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every operation recorded so far, in order.
    pub fn ops(&self) -> Vec<WriteOp> {
        self.lock().clone()
    }

    /// Returns the text of every bar render recorded so far, in order.
    pub fn bars(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|op| match op {
                WriteOp::Bar(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Returns the text of every full line recorded so far, in order.
    pub fn lines(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|op| match op {
                WriteOp::Line(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn push(&self, op: WriteOp) {
        self.lock().push(op);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<WriteOp>> {
        self.ops.lock().expect("capture recording lock poisoned")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LineState {
    Idle,
    BarVisible,
}

/// Owns the writable stream.
///
/// `erase`, `write` and `line` are the only sanctioned write operations. On
/// an interactive destination the bar is redrawn in place with a carriage
/// return; a non-interactive destination doesn't support that, so each bar
/// write falls back to a plain line and `erase` is a no-op.
#[derive(Debug)]
pub(crate) struct Console {
    dest: Destination,
    interactive: bool,
    inline_log: bool,
    state: LineState,
}

impl Console {
    pub(crate) fn new(dest: Destination, interactive: bool, inline_log: bool) -> Self {
        Self {
            dest,
            interactive,
            inline_log,
            state: LineState::Idle,
        }
    }

    /// Whether a line can be logged through the bar without losing it.
    ///
    /// Resolved once at construction, never probed per call.
    pub(crate) fn supports_inline_log(&self) -> bool {
        self.inline_log
    }

    /// Erases the currently displayed bar line, if any.
    pub(crate) fn erase(&mut self) -> io::Result<()> {
        if self.state != LineState::BarVisible {
            return Ok(());
        }
        self.state = LineState::Idle;

        if !self.interactive {
            // The previous render already ended with a newline; there is no
            // live line to take back.
            return Ok(());
        }

        match &self.dest {
            Destination::Terminal => {
                let mut stderr = io::stderr().lock();
                write!(stderr, "\r\x1b[2K")?;
                stderr.flush()
            }
            Destination::Capture(capture) => {
                capture.push(WriteOp::Erase);
                Ok(())
            }
        }
    }

    /// Draws the bar line, replacing whatever bar was on screen.
    pub(crate) fn write(&mut self, text: &str) -> io::Result<()> {
        if !self.interactive {
            return self.line(text);
        }
        self.state = LineState::BarVisible;

        match &self.dest {
            Destination::Terminal => {
                let mut stderr = io::stderr().lock();
                // Overwrite in place, then clear whatever tail a longer
                // previous render left behind.
                write!(stderr, "\r{text}\x1b[0K")?;
                stderr.flush()
            }
            Destination::Capture(capture) => {
                capture.push(WriteOp::Bar(text.to_owned()));
                Ok(())
            }
        }
    }

    /// Prints a full line followed by a newline.
    pub(crate) fn line(&mut self, text: &str) -> io::Result<()> {
        self.state = LineState::Idle;

        match &self.dest {
            Destination::Terminal => {
                let mut stderr = io::stderr().lock();
                writeln!(stderr, "{text}")?;
                stderr.flush()
            }
            Destination::Capture(capture) => {
                capture.push(WriteOp::Line(text.to_owned()));
                Ok(())
            }
        }
    }
}
