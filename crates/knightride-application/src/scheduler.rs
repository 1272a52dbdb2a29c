//! Tokio-backed countdown timer.

use std::time::Duration;

use knightride_core::emergency::TickScheduler;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// [`TickScheduler`] that runs a tokio interval task per countdown.
///
/// Ticks are delivered over an unbounded channel tagged with the generation
/// they were started for. `start` must be called from within a tokio runtime.
#[derive(Debug)]
pub struct IntervalScheduler {
    ticks: mpsc::UnboundedSender<u64>,
    task: Option<JoinHandle<()>>,
}

impl IntervalScheduler {
    /// Creates a scheduler and the receiving end of its tick channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<u64>) {
        let (ticks, receiver) = mpsc::unbounded_channel();
        (Self { ticks, task: None }, receiver)
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl TickScheduler for IntervalScheduler {
    fn start(&mut self, generation: u64, period: Duration) {
        self.stop();

        let ticks = self.ticks.clone();
        self.task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if ticks.send(generation).is_err() {
                    break;
                }
            }
        }));
        tracing::trace!(generation, ?period, "Countdown timer started");
    }

    fn stop(&mut self) {
        // Ticks already queued are dropped by the trigger's generation check.
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::trace!("Countdown timer stopped");
        }
    }
}

impl Drop for IntervalScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_carry_generation() {
        let (mut scheduler, mut ticks) = IntervalScheduler::new();

        scheduler.start(7, Duration::from_secs(1));

        assert_eq!(ticks.recv().await, Some(7));
        assert_eq!(ticks.recv().await, Some(7));
        assert!(scheduler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_ends_delivery() {
        let (mut scheduler, mut ticks) = IntervalScheduler::new();

        scheduler.start(1, Duration::from_secs(1));
        scheduler.stop();

        let next = tokio::time::timeout(Duration::from_secs(5), ticks.recv()).await;
        assert!(next.is_err());
        assert!(!scheduler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_replaces_previous_timer() {
        let (mut scheduler, mut ticks) = IntervalScheduler::new();

        scheduler.start(1, Duration::from_secs(1));
        scheduler.start(2, Duration::from_secs(1));

        assert_eq!(ticks.recv().await, Some(2));
        assert_eq!(ticks.recv().await, Some(2));
    }
}
