use serde::{Deserialize, Serialize};

/// A person or service to notify when an SOS alert fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    /// Server-assigned identifier, absent until the contact is stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub phone: String,
    #[serde(alias = "relationship")]
    pub relation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<String>,
}

impl EmergencyContact {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        relation: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            phone: phone.into(),
            relation: relation.into(),
            added_at: None,
        }
    }

    /// Reference used in an SOS alert's contact set.
    ///
    /// Falls back to the phone number for contacts the server has not
    /// assigned an id to.
    pub fn reference(&self) -> ContactRef {
        ContactRef(self.id.clone().unwrap_or_else(|| self.phone.clone()))
    }
}

/// Opaque reference to a contact, as sent in `contact_ids`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactRef(pub String);

impl ContactRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContactRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Response of `GET /contacts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactList {
    #[serde(default)]
    pub contacts: Vec<EmergencyContact>,
}

/// Response of `POST /contacts/add`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactAdded {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<EmergencyContact>,
}

/// Response of `DELETE /contacts/{index}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactDeleted {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_contact: Option<EmergencyContact>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_relationship_field_is_accepted() {
        let json = r#"{
            "id": "c-1",
            "name": "Meera",
            "phone": "+91 9876543211",
            "relationship": "Sister",
            "added_at": "2024-05-01T10:00:00"
        }"#;

        let contact: EmergencyContact = serde_json::from_str(json).unwrap();
        assert_eq!(contact.relation, "Sister");
        assert_eq!(contact.reference(), ContactRef("c-1".into()));
    }

    #[test]
    fn test_unsaved_contact_is_referenced_by_phone() {
        let contact = EmergencyContact::new("Roadside Assistance", "1800-200-100", "Service");
        assert_eq!(contact.reference().as_str(), "1800-200-100");

        let json = serde_json::to_value(&contact).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["relation"], "Service");
    }
}
