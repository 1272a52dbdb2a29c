//! SOS countdown state machine.

use super::scheduler::{TICK_PERIOD, TickScheduler};
use crate::contact::ContactRef;

/// Coarse state of the trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Armed,
    /// The countdown elapsed and the alert is being submitted.
    Firing,
}

/// State of one armed emergency, from arm until cancel or fire completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmergencySession {
    generation: u64,
    phase: Phase,
    remaining_seconds: u32,
    contact_set: Vec<ContactRef>,
}

impl EmergencySession {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    /// Contacts captured at arm time. Fixed for the life of the session.
    pub fn contact_set(&self) -> &[ContactRef] {
        &self.contact_set
    }
}

/// Result of [`EmergencyTrigger::arm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArmOutcome {
    /// A new countdown started.
    Armed { generation: u64, remaining_seconds: u32 },
    /// A session was already active; nothing changed.
    AlreadyActive { phase: Phase, remaining_seconds: u32 },
}

/// Alert submission the caller must perform, then acknowledge with
/// [`EmergencyTrigger::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FireRequest {
    pub generation: u64,
    pub contact_set: Vec<ContactRef>,
}

/// Result of [`EmergencyTrigger::tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No armed session matches the tick (cancelled, stale, or firing).
    Ignored,
    /// The countdown advanced and is still running.
    Counting { remaining_seconds: u32 },
    /// The countdown reached zero.
    Fire(FireRequest),
}

/// Arm → countdown → fire/cancel sequence for SOS alerts.
///
/// Transitions:
///
/// ```text
/// Idle --arm--> Armed(N)
/// Armed(n) --tick--> Armed(n-1)            n-1 > 0
/// Armed(n) --tick--> Firing                n-1 == 0 (or n == 0)
/// Armed(n) --cancel--> Idle
/// Firing --complete--> Idle
/// ```
///
/// Arming while a session is active is a no-op, so a second press never
/// restarts the countdown. Cancelling while firing is also a no-op: an alert
/// submission that has started always runs to completion.
pub struct EmergencyTrigger<S> {
    scheduler: S,
    countdown_secs: u32,
    session: Option<EmergencySession>,
    next_generation: u64,
}

impl<S: TickScheduler> EmergencyTrigger<S> {
    /// Creates an idle trigger that counts down `countdown_secs` once armed.
    pub fn new(scheduler: S, countdown_secs: u32) -> Self {
        Self {
            scheduler,
            countdown_secs,
            session: None,
            next_generation: 1,
        }
    }

    pub fn countdown_secs(&self) -> u32 {
        self.countdown_secs
    }

    pub fn phase(&self) -> Phase {
        self.session.as_ref().map_or(Phase::Idle, |s| s.phase)
    }

    pub fn session(&self) -> Option<&EmergencySession> {
        self.session.as_ref()
    }

    /// Seconds left before firing, `None` when idle.
    pub fn remaining_seconds(&self) -> Option<u32> {
        self.session.as_ref().map(|s| s.remaining_seconds)
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Starts a countdown for the given contact set.
    pub fn arm(&mut self, contact_set: Vec<ContactRef>) -> ArmOutcome {
        if let Some(active) = &self.session {
            tracing::debug!(
                generation = active.generation,
                phase = ?active.phase,
                "SOS already active, ignoring arm"
            );
            return ArmOutcome::AlreadyActive {
                phase: active.phase,
                remaining_seconds: active.remaining_seconds,
            };
        }

        let generation = self.next_generation;
        self.next_generation += 1;

        self.session = Some(EmergencySession {
            generation,
            phase: Phase::Armed,
            remaining_seconds: self.countdown_secs,
            contact_set,
        });
        self.scheduler.start(generation, TICK_PERIOD);

        tracing::info!(generation, countdown = self.countdown_secs, "SOS armed");

        ArmOutcome::Armed {
            generation,
            remaining_seconds: self.countdown_secs,
        }
    }

    /// Advances the countdown by one second.
    pub fn tick(&mut self, generation: u64) -> TickOutcome {
        let Some(session) = self.session.as_mut() else {
            tracing::trace!(generation, "Tick while idle ignored");
            return TickOutcome::Ignored;
        };

        if session.phase != Phase::Armed || session.generation != generation {
            tracing::trace!(
                generation,
                active = session.generation,
                phase = ?session.phase,
                "Stale tick ignored"
            );
            return TickOutcome::Ignored;
        }

        session.remaining_seconds = session.remaining_seconds.saturating_sub(1);
        if session.remaining_seconds > 0 {
            tracing::debug!(generation, remaining = session.remaining_seconds, "SOS countdown");
            return TickOutcome::Counting {
                remaining_seconds: session.remaining_seconds,
            };
        }

        session.phase = Phase::Firing;
        let request = FireRequest {
            generation,
            contact_set: session.contact_set.clone(),
        };
        self.scheduler.stop();

        tracing::info!(generation, contacts = request.contact_set.len(), "SOS countdown elapsed, firing");

        TickOutcome::Fire(request)
    }

    /// Cancels an armed countdown. Returns false when there was nothing to
    /// cancel or the alert is already being submitted.
    pub fn cancel(&mut self) -> bool {
        match &self.session {
            Some(session) if session.phase == Phase::Armed => {
                self.scheduler.stop();
                tracing::info!(
                    generation = session.generation,
                    remaining = session.remaining_seconds,
                    "SOS cancelled"
                );
                self.session = None;
                true
            }
            Some(session) => {
                tracing::debug!(generation = session.generation, "SOS already firing, cancel ignored");
                false
            }
            None => false,
        }
    }

    /// Acknowledges that the alert for `generation` was submitted (whatever
    /// the outcome) and returns to idle.
    pub fn complete(&mut self, generation: u64) -> bool {
        match &self.session {
            Some(session) if session.phase == Phase::Firing && session.generation == generation => {
                self.session = None;
                tracing::debug!(generation, "SOS session finished");
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    /// Records timer registrations instead of running a clock.
    #[derive(Debug, Default)]
    struct ManualScheduler {
        running: Option<u64>,
        starts: Vec<(u64, Duration)>,
        stops: usize,
    }

    impl TickScheduler for ManualScheduler {
        fn start(&mut self, generation: u64, period: Duration) {
            self.running = Some(generation);
            self.starts.push((generation, period));
        }

        fn stop(&mut self) {
            self.running = None;
            self.stops += 1;
        }
    }

    fn contacts() -> Vec<ContactRef> {
        vec![ContactRef("c-1".into()), ContactRef("c-2".into())]
    }

    fn armed_generation(outcome: ArmOutcome) -> u64 {
        match outcome {
            ArmOutcome::Armed { generation, .. } => generation,
            other => panic!("expected Armed, got {:?}", other),
        }
    }

    #[test]
    fn test_new_trigger_is_idle() {
        let trigger = EmergencyTrigger::new(ManualScheduler::default(), 10);
        assert_eq!(trigger.phase(), Phase::Idle);
        assert_eq!(trigger.remaining_seconds(), None);
        assert!(trigger.scheduler().starts.is_empty());
    }

    #[test]
    fn test_arm_starts_countdown_and_timer() {
        let mut trigger = EmergencyTrigger::new(ManualScheduler::default(), 10);

        let generation = armed_generation(trigger.arm(contacts()));

        assert_eq!(trigger.phase(), Phase::Armed);
        assert_eq!(trigger.remaining_seconds(), Some(10));
        assert_eq!(trigger.scheduler().running, Some(generation));
        assert_eq!(trigger.scheduler().starts, vec![(generation, TICK_PERIOD)]);
        assert_eq!(trigger.session().unwrap().contact_set(), contacts().as_slice());
    }

    #[test]
    fn test_arm_then_cancel_before_any_tick() {
        let mut trigger = EmergencyTrigger::new(ManualScheduler::default(), 10);

        let generation = armed_generation(trigger.arm(contacts()));
        assert!(trigger.cancel());

        assert_eq!(trigger.phase(), Phase::Idle);
        assert_eq!(trigger.scheduler().running, None);
        // A tick that was already scheduled must not act after cancel.
        assert_eq!(trigger.tick(generation), TickOutcome::Ignored);
        assert_eq!(trigger.phase(), Phase::Idle);
    }

    #[test]
    fn test_full_countdown_fires_exactly_once() {
        let mut trigger = EmergencyTrigger::new(ManualScheduler::default(), 3);
        let generation = armed_generation(trigger.arm(contacts()));

        let outcomes: Vec<_> = (0..3).map(|_| trigger.tick(generation)).collect();

        assert_eq!(outcomes[0], TickOutcome::Counting { remaining_seconds: 2 });
        assert_eq!(outcomes[1], TickOutcome::Counting { remaining_seconds: 1 });
        assert_eq!(
            outcomes[2],
            TickOutcome::Fire(FireRequest {
                generation,
                contact_set: contacts(),
            })
        );
        assert_eq!(trigger.phase(), Phase::Firing);
        assert_eq!(trigger.scheduler().running, None);

        // Late ticks while firing do not fire again.
        assert_eq!(trigger.tick(generation), TickOutcome::Ignored);

        assert!(trigger.complete(generation));
        assert_eq!(trigger.phase(), Phase::Idle);
    }

    #[test]
    fn test_double_arm_does_not_restart_countdown() {
        let mut trigger = EmergencyTrigger::new(ManualScheduler::default(), 10);
        let generation = armed_generation(trigger.arm(contacts()));
        trigger.tick(generation);
        trigger.tick(generation);

        let outcome = trigger.arm(Vec::new());

        assert_eq!(
            outcome,
            ArmOutcome::AlreadyActive {
                phase: Phase::Armed,
                remaining_seconds: 8,
            }
        );
        assert_eq!(trigger.remaining_seconds(), Some(8));
        assert_eq!(trigger.scheduler().starts.len(), 1);
        assert_eq!(trigger.session().unwrap().contact_set(), contacts().as_slice());
    }

    #[test]
    fn test_cancel_while_firing_is_ignored() {
        let mut trigger = EmergencyTrigger::new(ManualScheduler::default(), 1);
        let generation = armed_generation(trigger.arm(contacts()));
        assert!(matches!(trigger.tick(generation), TickOutcome::Fire(_)));

        assert!(!trigger.cancel());
        assert_eq!(trigger.phase(), Phase::Firing);
    }

    #[test]
    fn test_arm_while_firing_is_ignored() {
        let mut trigger = EmergencyTrigger::new(ManualScheduler::default(), 1);
        let generation = armed_generation(trigger.arm(contacts()));
        trigger.tick(generation);

        assert!(matches!(
            trigger.arm(contacts()),
            ArmOutcome::AlreadyActive { phase: Phase::Firing, .. }
        ));
    }

    #[test]
    fn test_rearm_after_fire_uses_new_generation() {
        let mut trigger = EmergencyTrigger::new(ManualScheduler::default(), 1);
        let first = armed_generation(trigger.arm(contacts()));
        trigger.tick(first);
        trigger.complete(first);

        let second = armed_generation(trigger.arm(contacts()));

        assert_ne!(first, second);
        // A straggler from the first session cannot advance the second one.
        assert_eq!(trigger.tick(first), TickOutcome::Ignored);
        assert_eq!(trigger.remaining_seconds(), Some(1));
    }

    #[test]
    fn test_complete_with_wrong_generation_is_rejected() {
        let mut trigger = EmergencyTrigger::new(ManualScheduler::default(), 1);
        let generation = armed_generation(trigger.arm(contacts()));
        trigger.tick(generation);

        assert!(!trigger.complete(generation + 1));
        assert_eq!(trigger.phase(), Phase::Firing);
    }

    #[test]
    fn test_zero_countdown_fires_on_first_tick() {
        let mut trigger = EmergencyTrigger::new(ManualScheduler::default(), 0);
        let generation = armed_generation(trigger.arm(Vec::new()));

        assert!(matches!(trigger.tick(generation), TickOutcome::Fire(_)));
    }

    #[test]
    fn test_cancel_when_idle_returns_false() {
        let mut trigger = EmergencyTrigger::new(ManualScheduler::default(), 10);
        assert!(!trigger.cancel());
        assert_eq!(trigger.scheduler().stops, 0);
    }
}
