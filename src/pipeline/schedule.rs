// src/pipeline/schedule.rs

//! Periodic execution of status cycles.

use tokio::time::{MissedTickBehavior, interval};

use crate::pipeline::cycle::StatusChecker;

impl StatusChecker {
    /// Run cycles forever, one per interval, starting immediately.
    ///
    /// A slow cycle delays the next tick rather than causing a burst.
    /// In debug mode a single cycle runs and the call returns.
    pub async fn run(&self) {
        let settings = self.settings();

        if settings.debug {
            log::info!("DEBUG mode enabled: always posting message and disabling ticker.");
            self.run_cycle().await;
            return;
        }

        let mut ticker = interval(settings.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // The first tick completes immediately.
        ticker.tick().await;
        self.run_cycle().await;

        log::info!(
            "Starting ticker-based checks every {}...",
            humantime::format_duration(settings.interval)
        );
        loop {
            ticker.tick().await;
            self.run_cycle().await;
        }
    }
}
