use serde::{Deserialize, Serialize};

use crate::location::Location;

/// A fuel station, garage or other provider listed near the rider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyService {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub service_type: String,
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default)]
    pub rating: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub is_open: bool,
    /// Services offered at this location (e.g. "puncture repair").
    #[serde(default)]
    pub services: Vec<String>,
}

/// Response of `GET /location/nearby-services`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NearbyServices {
    #[serde(default)]
    pub services: Vec<NearbyService>,
}

/// Optional filters for the nearby-services lookup.
///
/// An absent filter means "unfiltered" along that dimension.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceQuery {
    pub service_type: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl ServiceQuery {
    /// Query parameters for the filters that are present, in a stable order.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(service_type) = &self.service_type {
            pairs.push(("service_type".to_string(), service_type.clone()));
        }
        if let Some(lat) = self.lat {
            pairs.push(("lat".to_string(), lat.to_string()));
        }
        if let Some(lng) = self.lng {
            pairs.push(("lng".to_string(), lng.to_string()));
        }
        pairs
    }
}

/// Roadside assistance request body for `POST /request-service`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub service_type: String,
    pub location: Location,
    /// Provider to dispatch, as listed by the nearby-services lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<String>,
}

/// Acknowledgement of a roadside assistance request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRequestReceipt {
    pub request_id: String,
    pub status: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_arrival: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_has_no_pairs() {
        assert!(ServiceQuery::default().to_query_pairs().is_empty());
    }

    #[test]
    fn test_zero_coordinates_are_still_sent() {
        let query = ServiceQuery {
            service_type: Some("fuel".into()),
            lat: Some(0.0),
            lng: Some(72.8777),
        };

        let pairs = query.to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("service_type".to_string(), "fuel".to_string()),
                ("lat".to_string(), "0".to_string()),
                ("lng".to_string(), "72.8777".to_string()),
            ]
        );
    }

    #[test]
    fn test_service_type_maps_to_type_field() {
        let json = r#"{
            "id": "3",
            "name": "Royal Enfield Service Center",
            "type": "garage",
            "location": {"lat": 19.0728, "lng": 72.8826},
            "address": "Kurla West, Mumbai",
            "rating": 4.8,
            "is_open": true,
            "phone": "+91 9876543212"
        }"#;

        let service: NearbyService = serde_json::from_str(json).unwrap();
        assert_eq!(service.service_type, "garage");
        assert!(service.services.is_empty());
        assert!(service.distance.is_none());
    }
}
