// Copyright (c) The barline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{config::Palette, events::RunCounts};
use owo_colors::Style;

/// Styles for rendered output.
///
/// Unstyled by default: an empty [`Style`] emits no escape sequences, so
/// leaving `colorize` uncalled is how color support is turned off.
#[derive(Debug, Default, Clone)]
pub(crate) struct Styles {
    pub(crate) pass: Style,
    pub(crate) pending: Style,
    pub(crate) fail: Style,
}

impl Styles {
    pub(crate) fn colorize(&mut self, palette: &Palette) {
        self.pass = Style::new().color(palette.success.to_ansi()).bold();
        self.pending = Style::new().color(palette.warning.to_ansi()).bold();
        self.fail = Style::new().color(palette.failure.to_ansi()).bold();
    }
}

/// Picks the bar's display style from the aggregate counts.
///
/// Failure takes priority over pending, pending over success. Called fresh on
/// every render: a render can be triggered by the background ticker between
/// two count-changing events, and the bar must reflect the most recent
/// verdict.
pub(crate) fn run_style(counts: &RunCounts, styles: &Styles) -> Style {
    if counts.has_failures() {
        styles.fail
    } else if counts.has_pending() {
        styles.pending
    } else {
        styles.pass
    }
}
