//! User profile domain model.

use serde::{Deserialize, Serialize};

use crate::contact::EmergencyContact;

/// Aggregated riding statistics shown on the home dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideStats {
    pub total_rides: u32,
    pub total_distance: String,
    pub fuel_saved: String,
    pub safety_score: u32,
}

/// The authenticated rider's profile.
///
/// Only identity and contact fields are guaranteed; everything else depends on
/// what the rider filled in at registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bike_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ride_stats: Option<RideStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contacts: Option<Vec<EmergencyContact>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}
