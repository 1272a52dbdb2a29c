use serde::{Deserialize, Serialize};

use crate::contact::ContactRef;
use crate::location::Location;

/// Body of `POST /sos/send`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SosAlert {
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_ids: Option<Vec<ContactRef>>,
}

impl SosAlert {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            message: None,
            contact_ids: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the contacts to notify. An empty set is omitted from the body.
    pub fn with_contacts(mut self, contacts: Vec<ContactRef>) -> Self {
        self.contact_ids = if contacts.is_empty() {
            None
        } else {
            Some(contacts)
        };
        self
    }
}

/// Server acknowledgement of a dispatched alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SosReceipt {
    #[serde(alias = "sos_id")]
    pub alert_id: String,
    pub status: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contacts_notified: Option<u32>,
}
