//! Concurrency and rate governor for batches of fetch tasks
//!
//! This module handles:
//! - Capping how many tasks run at once via a semaphore
//! - Capping how many tasks start per second via a shared interval
//! - Returning results in submission order regardless of completion order
//! - Isolating a panicking task from its siblings

use crate::config::GovernorConfig;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::sync::{Mutex, Semaphore};
use tokio::time::{interval, MissedTickBehavior};

/// Runs a batch of futures under two limits
///
/// * at most `max_at_once` tasks are in flight at any instant
/// * at most `max_per_second` tasks are started in any one-second window
///
/// Starts are spaced `1s / max_per_second` apart. A task holds its
/// concurrency permit from the moment it starts until it completes, so a
/// slow task (including its own retry sleeps) keeps a slot busy.
#[derive(Debug, Clone)]
pub struct Governor {
    max_at_once: usize,
    max_per_second: u32,
}

impl Governor {
    /// Creates a governor; zero limits are raised to one
    pub fn new(max_at_once: usize, max_per_second: u32) -> Self {
        Self {
            max_at_once: max_at_once.max(1),
            max_per_second: max_per_second.max(1),
        }
    }

    pub fn from_config(config: &GovernorConfig) -> Self {
        Self::new(config.max_at_once, config.max_per_second)
    }

    pub fn max_at_once(&self) -> usize {
        self.max_at_once
    }

    pub fn max_per_second(&self) -> u32 {
        self.max_per_second
    }

    /// Minimum spacing between two task starts
    pub fn start_interval(&self) -> Duration {
        Duration::from_secs(1) / self.max_per_second
    }

    /// Runs every task and returns one slot per task, in input order
    ///
    /// A slot is `None` only if its task panicked; the panic is logged and
    /// the remaining tasks keep running.
    ///
    /// # Arguments
    ///
    /// * `tasks` - The futures to drive, typically one per chapter
    ///
    /// # Returns
    ///
    /// A vector with exactly `tasks.len()` entries, where entry `i` belongs
    /// to `tasks[i]`.
    pub async fn run_all<F, T>(&self, tasks: Vec<F>) -> Vec<Option<T>>
    where
        F: Future<Output = T>,
    {
        let total = tasks.len();
        if total == 0 {
            return Vec::new();
        }

        let semaphore = Semaphore::new(self.max_at_once);
        let mut ticker = interval(self.start_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let pacer = Mutex::new(ticker);

        tracing::debug!(
            "Governing {} tasks (max {} at once, {} per second)",
            total,
            self.max_at_once,
            self.max_per_second
        );

        let mut pending = FuturesUnordered::new();
        for (index, task) in tasks.into_iter().enumerate() {
            let semaphore = &semaphore;
            let pacer = &pacer;
            pending.push(async move {
                // The semaphore is never closed.
                let _permit = semaphore.acquire().await.ok();
                pacer.lock().await.tick().await;

                let output = AssertUnwindSafe(task).catch_unwind().await;
                (index, output)
            });
        }

        let mut results: Vec<Option<T>> = (0..total).map(|_| None).collect();
        while let Some((index, output)) = pending.next().await {
            match output {
                Ok(value) => results[index] = Some(value),
                Err(_) => tracing::error!("Task {} panicked; continuing with the rest", index),
            }
        }

        results
    }
}

impl Default for Governor {
    fn default() -> Self {
        Self::from_config(&GovernorConfig::default())
    }
}
