//! Emergency service implementation.
//!
//! Drives the SOS state machine on a real clock: ticks come from an
//! [`IntervalScheduler`], the alert goes out through a [`SosDispatcher`], and
//! progress is published as [`EmergencyEvent`]s for whatever UI is attached.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use knightride_core::ApiError;
use knightride_core::ApiResult;
use knightride_core::contact::ContactRef;
use knightride_core::emergency::{
    ArmOutcome, EmergencyTrigger, FireRequest, Phase, SosAlert, SosDispatcher, SosReceipt,
    TickOutcome,
};
use tokio::sync::{Notify, mpsc};

use crate::location::LocationProvider;
use crate::scheduler::IntervalScheduler;

/// Progress notifications for the SOS sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum EmergencyEvent {
    Armed { remaining_seconds: u32 },
    Countdown { remaining_seconds: u32 },
    Cancelled,
    Dispatching,
    Sent(SosReceipt),
    Failed(String),
}

/// Outcome of one fired alert.
#[derive(Debug, Clone)]
pub struct FireReport {
    pub generation: u64,
    pub outcome: ApiResult<SosReceipt>,
    pub dispatched_at: DateTime<Utc>,
}

impl FireReport {
    pub fn is_sent(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Owns one [`EmergencyTrigger`] and everything needed to fire it.
pub struct EmergencyService {
    trigger: Mutex<EmergencyTrigger<IntervalScheduler>>,
    ticks: tokio::sync::Mutex<mpsc::UnboundedReceiver<u64>>,
    /// Wakes `run_countdown` when the countdown is cancelled elsewhere.
    interrupted: Notify,
    dispatcher: Arc<dyn SosDispatcher>,
    location: Arc<dyn LocationProvider>,
    message: Option<String>,
    events: mpsc::UnboundedSender<EmergencyEvent>,
}

impl EmergencyService {
    /// Creates an idle service and the receiver for its events.
    pub fn new(
        countdown_secs: u32,
        dispatcher: Arc<dyn SosDispatcher>,
        location: Arc<dyn LocationProvider>,
    ) -> (Self, mpsc::UnboundedReceiver<EmergencyEvent>) {
        let (scheduler, ticks) = IntervalScheduler::new();
        let (events, event_receiver) = mpsc::unbounded_channel();

        let service = Self {
            trigger: Mutex::new(EmergencyTrigger::new(scheduler, countdown_secs)),
            ticks: tokio::sync::Mutex::new(ticks),
            interrupted: Notify::new(),
            dispatcher,
            location,
            message: None,
            events,
        };

        (service, event_receiver)
    }

    /// Sets the free-text message attached to every alert.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.message = (!message.trim().is_empty()).then_some(message);
        self
    }

    fn trigger(&self) -> MutexGuard<'_, EmergencyTrigger<IntervalScheduler>> {
        self.trigger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: EmergencyEvent) {
        // Nobody listening is fine.
        let _ = self.events.send(event);
    }

    pub fn countdown_secs(&self) -> u32 {
        self.trigger().countdown_secs()
    }

    pub fn phase(&self) -> Phase {
        self.trigger().phase()
    }

    pub fn remaining_seconds(&self) -> Option<u32> {
        self.trigger().remaining_seconds()
    }

    /// Starts the countdown. A no-op while a session is already active.
    pub fn arm(&self, contacts: Vec<ContactRef>) -> ArmOutcome {
        let outcome = self.trigger().arm(contacts);
        if let ArmOutcome::Armed {
            remaining_seconds, ..
        } = outcome
        {
            self.emit(EmergencyEvent::Armed { remaining_seconds });
        }
        outcome
    }

    /// Cancels an armed countdown. Returns false if idle or already firing.
    pub fn cancel(&self) -> bool {
        let cancelled = self.trigger().cancel();
        if cancelled {
            self.emit(EmergencyEvent::Cancelled);
            self.interrupted.notify_one();
        }
        cancelled
    }

    /// Waits for the next timer tick and applies it.
    ///
    /// Cancel-safe: dropping the future before a tick arrives loses nothing.
    /// Pends indefinitely while no countdown is running.
    pub async fn next_tick(&self) -> Option<TickOutcome> {
        let generation = self.ticks.lock().await.recv().await?;

        let outcome = self.trigger().tick(generation);
        if let TickOutcome::Counting { remaining_seconds } = outcome {
            self.emit(EmergencyEvent::Countdown { remaining_seconds });
        }
        Some(outcome)
    }

    /// Submits the alert for `request` and returns the session to idle.
    ///
    /// Runs to completion; the outcome is reported, never retried.
    pub async fn fire(&self, request: FireRequest) -> FireReport {
        self.emit(EmergencyEvent::Dispatching);

        let outcome = match self.location.current_location().await {
            Some(location) => {
                let mut alert = SosAlert::new(location).with_contacts(request.contact_set.clone());
                if let Some(message) = &self.message {
                    alert = alert.with_message(message.clone());
                }
                tracing::info!(
                    generation = request.generation,
                    location = %location,
                    "Dispatching SOS alert"
                );
                self.dispatcher.send_sos(alert).await
            }
            None => Err(ApiError::new("Current location is unavailable")),
        };

        self.trigger().complete(request.generation);

        match &outcome {
            Ok(receipt) => {
                tracing::info!(alert_id = %receipt.alert_id, "SOS alert sent");
                self.emit(EmergencyEvent::Sent(receipt.clone()));
            }
            Err(e) => {
                tracing::warn!(generation = request.generation, "SOS alert failed: {}", e);
                self.emit(EmergencyEvent::Failed(e.message().to_string()));
            }
        }

        FireReport {
            generation: request.generation,
            outcome,
            dispatched_at: Utc::now(),
        }
    }

    /// Drives the armed countdown until it fires or is cancelled.
    ///
    /// Returns `None` if nothing was armed or the countdown was cancelled.
    pub async fn run_countdown(&self) -> Option<FireReport> {
        loop {
            if self.phase() != Phase::Armed {
                return None;
            }

            tokio::select! {
                tick = self.next_tick() => match tick {
                    Some(TickOutcome::Fire(request)) => return Some(self.fire(request).await),
                    Some(_) => {}
                    None => return None,
                },
                _ = self.interrupted.notified() => {}
            }
        }
    }
}

impl std::fmt::Debug for EmergencyService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmergencyService")
            .field("phase", &self.phase())
            .field("remaining_seconds", &self.remaining_seconds())
            .field("message", &self.message)
            .finish()
    }
}
