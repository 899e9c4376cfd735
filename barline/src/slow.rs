// Copyright (c) The barline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{duration::DisplaySlowDuration, events::UnitRef};
use std::time::Duration;
use swrite::{SWrite, swrite};

/// Decides whether a completed unit deserves a slow-unit warning.
///
/// Returns the warning text only if the threshold is non-zero and the unit's
/// elapsed time exceeds it. The warning is emitted once by the caller and
/// discarded, never stored.
pub(crate) fn slow_unit_warning(
    threshold: Duration,
    elapsed: Duration,
    unit: &UnitRef,
) -> Option<String> {
    if threshold == Duration::ZERO || elapsed <= threshold {
        return None;
    }

    let mut out = String::new();
    swrite!(out, "SLOW {} ", DisplaySlowDuration(elapsed));
    swrite!(out, "{} at {}", unit.description, unit.location);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn unit() -> UnitRef {
        UnitRef {
            description: "parses nested arrays".to_owned(),
            location: "tests/parser.rs:42".to_owned(),
        }
    }

    #[test_case(0, 3_600_000 => false; "zero threshold never warns")]
    #[test_case(500, 499 => false; "below threshold")]
    #[test_case(500, 500 => false; "exactly at threshold")]
    #[test_case(500, 501 => true; "just above threshold")]
    #[test_case(500, 120_000 => true; "far above threshold")]
    fn warning_condition(threshold_ms: u64, elapsed_ms: u64) -> bool {
        slow_unit_warning(
            Duration::from_millis(threshold_ms),
            Duration::from_millis(elapsed_ms),
            &unit(),
        )
        .is_some()
    }

    #[test]
    fn warning_names_the_unit() {
        let warning = slow_unit_warning(
            Duration::from_millis(100),
            Duration::from_secs_f64(1.23456),
            &unit(),
        )
        .expect("warning emitted");

        assert_eq!(
            warning,
            "SLOW [   1.2346s] parses nested arrays at tests/parser.rs:42",
        );
    }
}
