// Copyright (c) The barline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Display helpers for durations.

use std::{fmt, time::Duration};

/// Wall-clock time since run start, as `HH:MM:SS`.
pub(crate) struct DisplayHhMmSs(pub(crate) Duration);

impl fmt::Display for DisplayHhMmSs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_secs = self.0.as_secs();
        let secs = total_secs % 60;
        let total_mins = total_secs / 60;
        let mins = total_mins % 60;
        let hours = total_mins / 60;
        write!(f, "{hours:02}:{mins:02}:{secs:02}")
    }
}

pub(crate) struct DisplaySlowDuration(pub(crate) Duration);

impl fmt::Display for DisplaySlowDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // * > means right-align.
        // * 9 is the number of characters to pad to.
        // * .4 means print four digits after the decimal point.
        write!(f, "[{:>9.4?}s]", self.0.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hh_mm_ss_rolls_over() {
        let tests: &[(u64, &str)] = &[
            (0, "00:00:00"),
            (59, "00:00:59"),
            (60, "00:01:00"),
            (3599, "00:59:59"),
            (3600, "01:00:00"),
            (86400, "24:00:00"),
        ];
        for (secs, expected) in tests {
            assert_eq!(
                DisplayHhMmSs(Duration::from_secs(*secs)).to_string(),
                *expected,
                "for {secs} seconds",
            );
        }
    }

    #[test]
    fn slow_duration_keeps_four_decimals() {
        assert_eq!(
            DisplaySlowDuration(Duration::from_millis(12)).to_string(),
            "[   0.0120s]",
        );
        assert_eq!(
            DisplaySlowDuration(Duration::from_secs_f64(1.23456)).to_string(),
            "[   1.2346s]",
        );
    }
}
