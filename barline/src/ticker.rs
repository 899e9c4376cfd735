// Copyright (c) The barline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The background refresh ticker.
//!
//! One ticker task is alive per run. It re-renders the bar on a fixed
//! interval so the elapsed-time field keeps moving while a long unit of work
//! is in flight, taking the same lock as the event-driven path for every
//! refresh.

use crate::reporter::ReporterState;
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::{
    sync::oneshot,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::debug;

/// Handle to a running ticker task.
///
/// Owned by the reporter; must not outlive the run it was spawned for.
pub(crate) struct TickerHandle {
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl TickerHandle {
    /// Cancels the ticker.
    ///
    /// Immediate and non-graceful: the stop signal is observed at the task's
    /// next wake-up and the abort tears it down outright, so an in-flight
    /// refresh is not guaranteed to complete. A refresh that loses this race
    /// lands on a closed bar and does nothing.
    pub(crate) fn cancel(self) {
        let _ = self.stop.send(());
        self.task.abort();
        debug!("refresh ticker cancelled");
    }
}

/// Spawns the refresh ticker for a run.
pub(crate) fn spawn(state: Arc<Mutex<ReporterState>>, period: Duration) -> TickerHandle {
    let (stop, mut stop_rx) = oneshot::channel::<()>();
    let task = tokio::spawn(async move {
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately.
        interval.tick().await;
        loop {
            tokio::select! {
                _ = &mut stop_rx => break,
                _ = interval.tick() => {
                    // A poisoned lock means the event path panicked mid-render;
                    // there is nothing left to refresh.
                    let Ok(mut guard) = state.lock() else { break };
                    if let Err(error) = guard.refresh() {
                        debug!("tick refresh failed: {error}");
                    }
                }
            }
        }
    });
    debug!("refresh ticker started with period {period:?}");
    TickerHandle { stop, task }
}
