//! Emergency SOS domain module.
//!
//! The SOS sequence is an explicit state machine: arming starts a countdown,
//! each timer tick decrements it, and reaching zero fires the alert unless the
//! rider cancelled first. The machine itself is pure. Timer registration goes
//! through [`TickScheduler`] and alert delivery through [`SosDispatcher`], so
//! both can be swapped for the platform at hand or faked in tests.
//!
//! # Module Structure
//!
//! - `model`: Alert payload and receipt (`SosAlert`, `SosReceipt`)
//! - `scheduler`: Timer registration interface (`TickScheduler`)
//! - `dispatcher`: Alert submission interface (`SosDispatcher`)
//! - `trigger`: The arm/tick/cancel/fire state machine (`EmergencyTrigger`)

mod dispatcher;
mod model;
mod scheduler;
mod trigger;

pub use dispatcher::SosDispatcher;
pub use model::{SosAlert, SosReceipt};
pub use scheduler::{TICK_PERIOD, TickScheduler};
pub use trigger::{ArmOutcome, EmergencySession, EmergencyTrigger, FireRequest, Phase, TickOutcome};
