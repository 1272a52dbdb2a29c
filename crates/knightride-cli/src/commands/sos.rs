use std::sync::Arc;

use anyhow::{Result, bail};
use knightride_application::{ContactBook, EmergencyEvent, EmergencyService, FixedLocation};
use knightride_core::Location;
use knightride_core::emergency::{ArmOutcome, TickOutcome};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::context::{AppContext, prompt};

pub struct SosArgs {
    pub lat: f64,
    pub lng: f64,
    pub message: Option<String>,
    pub countdown: Option<u32>,
    pub yes: bool,
}

pub async fn run(ctx: &AppContext, args: SosArgs) -> Result<()> {
    let countdown = args.countdown.unwrap_or(ctx.config.sos_countdown_secs);
    let location = Location::new(args.lat, args.lng);

    if !args.yes {
        let answer = prompt(&format!(
            "Send an SOS alert from {} in {} s? [y/N] ",
            location, countdown
        ))?;
        if !matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes") {
            println!("SOS not armed");
            return Ok(());
        }
    }

    let contacts = match ContactBook::new(ctx.client.clone()).sos_contact_set().await {
        Ok(contacts) => contacts,
        Err(e) => {
            tracing::warn!("Could not load emergency contacts: {}", e);
            Vec::new()
        }
    };

    let (service, mut events) = EmergencyService::new(
        countdown,
        Arc::new(ctx.client.clone()),
        Arc::new(FixedLocation(location)),
    );
    let service = match args.message {
        Some(message) => service.with_message(message),
        None => service,
    };

    if let ArmOutcome::AlreadyActive { .. } = service.arm(contacts) {
        bail!("An SOS countdown is already running");
    }
    print_events(&mut events);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let request = loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                service.cancel();
                print_events(&mut events);
                return Ok(());
            }
            tick = service.next_tick() => match tick {
                Some(TickOutcome::Fire(request)) => break request,
                Some(_) => print_events(&mut events),
                None => bail!("Countdown timer stopped unexpectedly"),
            },
        }
    };

    // Once firing, the submission runs to completion even if interrupted.
    let report = service.fire(request).await;
    print_events(&mut events);

    let receipt = report.outcome?;
    println!("{} (alert {})", receipt.message, receipt.alert_id);
    if let Some(notified) = receipt.contacts_notified {
        println!("{} emergency contact(s) notified", notified);
    }
    println!("Sent at {}", report.dispatched_at.format("%H:%M:%S UTC"));
    Ok(())
}

fn print_events(events: &mut UnboundedReceiver<EmergencyEvent>) {
    while let Ok(event) = events.try_recv() {
        match event {
            EmergencyEvent::Armed { remaining_seconds } => println!(
                "SOS armed: alert fires in {} s. Press Ctrl-C to cancel.",
                remaining_seconds
            ),
            EmergencyEvent::Countdown { remaining_seconds } => println!("  {}...", remaining_seconds),
            EmergencyEvent::Cancelled => println!("SOS cancelled"),
            EmergencyEvent::Dispatching => println!("Sending SOS alert..."),
            // Final outcome is printed from the fire report.
            EmergencyEvent::Sent(_) | EmergencyEvent::Failed(_) => {}
        }
    }
}
