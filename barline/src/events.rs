// Copyright (c) The barline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::time::Duration;

/// A run lifecycle event.
///
/// Events are produced by a test-execution engine and consumed by a
/// [`RunReporter`](crate::RunReporter), one call per event, in the order units
/// occur. The reporter treats the payloads as opaque: it never computes
/// verdicts itself.
#[derive(Clone, Debug)]
pub enum RunEvent {
    /// A run started. Resets all counts and respawns the refresh ticker.
    RunStarted {
        /// The number of units this run is expected to complete. Fixed for
        /// the lifetime of the run.
        expected_total: usize,
    },

    /// A unit of work started executing.
    UnitStarted {
        /// The unit that started. Remembered so a later slow-unit warning can
        /// name it.
        unit: UnitRef,
    },

    /// A unit of work passed.
    UnitPassed {
        /// Wall-clock time the unit took, as measured by the engine.
        elapsed: Duration,
    },

    /// A unit of work was marked pending.
    UnitPending,

    /// A unit of work failed.
    UnitFailed {
        /// The fully-formatted, possibly multi-line failure report. Written
        /// out verbatim.
        report: String,
    },

    /// An out-of-band message to interleave with the bar.
    Message {
        /// The message text.
        text: String,
    },

    /// The run finished. No further renders occur after this.
    RunClosed,
}

/// Identifies a unit of work for display purposes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitRef {
    /// Human-readable description of the unit.
    pub description: String,

    /// Source location of the unit, e.g. `tests/parser.rs:42`.
    pub location: String,
}

/// Aggregate counts for a run.
///
/// Mutated only by the notification-delivery path, exactly once per completed
/// unit; read by both the event path and the refresh ticker. The invariant
/// `passed + pending + failed == current <= total` holds after every
/// recorded outcome.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunCounts {
    /// The number of units expected to run.
    pub total: usize,

    /// The number of units completed so far.
    pub current: usize,

    /// The number of units that passed.
    pub passed: usize,

    /// The number of units marked pending.
    pub pending: usize,

    /// The number of units that failed.
    pub failed: usize,
}

impl RunCounts {
    /// Creates a fresh set of counts for a run of `total` units.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Records a passed unit.
    pub fn record_pass(&mut self) {
        self.passed += 1;
        self.complete_unit();
    }

    /// Records a pending unit.
    pub fn record_pending(&mut self) {
        self.pending += 1;
        self.complete_unit();
    }

    /// Records a failed unit.
    pub fn record_fail(&mut self) {
        self.failed += 1;
        self.complete_unit();
    }

    /// Returns true if any unit has failed so far.
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Returns true if any unit is pending so far.
    pub fn has_pending(&self) -> bool {
        self.pending > 0
    }

    fn complete_unit(&mut self) {
        assert!(
            self.current < self.total,
            "unit completed past the expected total of {}",
            self.total,
        );
        self.current += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn counts_invariant_holds_after_every_outcome(
            outcomes in prop::collection::vec(0u8..3, 0..256),
        ) {
            let mut counts = RunCounts::new(outcomes.len());
            for outcome in outcomes {
                match outcome {
                    0 => counts.record_pass(),
                    1 => counts.record_pending(),
                    _ => counts.record_fail(),
                }
                prop_assert_eq!(
                    counts.passed + counts.pending + counts.failed,
                    counts.current,
                );
                prop_assert!(counts.current <= counts.total);
            }
        }
    }

    #[test]
    #[should_panic(expected = "past the expected total")]
    fn recording_past_total_panics() {
        let mut counts = RunCounts::new(1);
        counts.record_pass();
        counts.record_fail();
    }
}
