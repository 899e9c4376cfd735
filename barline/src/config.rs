// Copyright (c) The barline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Display options supplied by the embedding application.
//!
//! The reporter never probes the process environment for any of this: the
//! outer layer reads it from wherever it keeps configuration (a TOML profile,
//! CLI flags) and hands it over fully resolved.

use owo_colors::AnsiColors;
use serde::Deserialize;
use std::time::Duration;

/// Progress-bar display options.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ProgressConfig {
    /// The bar's format template.
    ///
    /// Recognized placeholders: `{current}`, `{total}`, `{elapsed}`,
    /// `{percent}`, `{spinner}` and `{bar}`. Anything else is an error,
    /// surfaced when the run starts.
    pub template: String,

    /// Width of the `{bar}` region in cells.
    pub width: usize,

    /// Glyph overrides. When absent, an ASCII theme is used, upgraded to
    /// Unicode if the destination supports it.
    pub glyphs: Option<Glyphs>,

    /// Colors for the three aggregate outcomes.
    pub palette: Palette,

    /// A unit slower than this gets a warning printed above the bar. Zero
    /// disables slow-unit detection.
    #[serde(with = "humantime_serde")]
    pub slow_threshold: Duration,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            template: "{spinner} [{elapsed}] {bar} {current}/{total} ({percent}%)".to_owned(),
            width: 40,
            glyphs: None,
            palette: Palette::default(),
            slow_threshold: Duration::ZERO,
        }
    }
}

/// The characters the bar is drawn with.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct Glyphs {
    /// Fills the completed portion of the bar.
    pub fill: char,

    /// Drawn at the leading edge of the completed portion.
    pub head: char,

    /// Fills the unconsumed portion of the bar.
    pub empty: char,

    /// The cyclical indicator sequence for `{spinner}`, one glyph per
    /// character.
    pub spinner: String,
}

impl Default for Glyphs {
    fn default() -> Self {
        Self {
            fill: '=',
            head: '>',
            empty: ' ',
            spinner: "-\\|/".to_owned(),
        }
    }
}

impl Glyphs {
    /// Switches to the Unicode theme.
    pub fn use_unicode(&mut self) {
        // https://mike42.me/blog/2018-06-make-better-cli-progress-bars-with-unicode-block-characters
        self.fill = '█';
        self.head = '▌';
        self.empty = '░';
        // https://github.com/sindresorhus/cli-spinners
        self.spinner = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏".to_owned();
    }
}

/// Colors for the success/warning/failure display states.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct Palette {
    /// Used while every completed unit has passed.
    pub success: BarColor,

    /// Used once a unit is pending, and for slow-unit warnings.
    pub warning: BarColor,

    /// Used once a unit has failed.
    pub failure: BarColor,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            success: BarColor::Green,
            warning: BarColor::Yellow,
            failure: BarColor::Red,
        }
    }
}

/// A named terminal color.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
#[allow(missing_docs)]
pub enum BarColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightRed,
    BrightGreen,
    BrightYellow,
}

impl BarColor {
    pub(crate) fn to_ansi(self) -> AnsiColors {
        match self {
            BarColor::Black => AnsiColors::Black,
            BarColor::Red => AnsiColors::Red,
            BarColor::Green => AnsiColors::Green,
            BarColor::Yellow => AnsiColors::Yellow,
            BarColor::Blue => AnsiColors::Blue,
            BarColor::Magenta => AnsiColors::Magenta,
            BarColor::Cyan => AnsiColors::Cyan,
            BarColor::White => AnsiColors::White,
            BarColor::BrightRed => AnsiColors::BrightRed,
            BarColor::BrightGreen => AnsiColors::BrightGreen,
            BarColor::BrightYellow => AnsiColors::BrightYellow,
        }
    }
}
