// Copyright (c) The barline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! A live, single-line terminal progress bar driven by test-run events.
//!
//! A test-execution engine feeds a [`RunReporter`] one [`RunEvent`] per
//! lifecycle event. The reporter keeps a progress bar current on the
//! terminal: it advances as units complete, recolors by the aggregate
//! outcome so far, keeps moving on a background tick while a long unit is in
//! flight, and interleaves multi-line failure reports without corrupting the
//! bar line.
//!
//! The engine itself stays external: it decides what runs, computes
//! verdicts and formats failure reports, and this crate treats all of that
//! as opaque.

mod bar;
pub mod config;
mod console;
mod duration;
pub mod errors;
mod events;
mod reporter;
mod slow;
mod styles;
mod ticker;

pub use console::{CaptureWrites, Destination, WriteOp};
pub use events::{RunCounts, RunEvent, UnitRef};
pub use reporter::{ReporterBuilder, RunReporter};
