use anyhow::Result;
use knightride_core::Location;
use knightride_core::roadside::{ServiceQuery, ServiceRequest};

use crate::context::AppContext;

pub async fn list(
    ctx: &AppContext,
    service_type: Option<String>,
    lat: Option<f64>,
    lng: Option<f64>,
) -> Result<()> {
    let query = ServiceQuery {
        service_type,
        lat,
        lng,
    };
    let nearby = ctx.client.get_nearby_services(&query).await?;

    if nearby.services.is_empty() {
        println!("No services found");
        return Ok(());
    }

    for service in &nearby.services {
        let open = if service.is_open { "open" } else { "closed" };
        println!(
            "{:<28} {:<10} {:>3.1}*  {:<8} {}",
            service.name,
            service.service_type,
            service.rating,
            open,
            service.distance.as_deref().unwrap_or("")
        );
        if let Some(id) = &service.id {
            println!("    id: {}  at {}", id, service.location);
        }
    }
    Ok(())
}

pub async fn request(
    ctx: &AppContext,
    service_type: String,
    lat: f64,
    lng: f64,
    service_id: Option<String>,
    message: Option<String>,
) -> Result<()> {
    let request = ServiceRequest {
        service_type,
        location: Location::new(lat, lng),
        service_id,
        message,
        urgency: None,
    };

    let receipt = ctx.client.request_service(&request).await?;
    println!("{} (request {}, {})", receipt.message, receipt.request_id, receipt.status);
    if let Some(eta) = &receipt.estimated_arrival {
        println!("Estimated arrival: {}", eta);
    }
    Ok(())
}
