//! Emergency contact management.
//!
//! The server addresses contacts by their position in its list, and positions
//! shift after every deletion. [`ContactBook::remove_matching`] resolves the
//! position from a fresh listing right before deleting.

use knightride_core::contact::{ContactAdded, ContactDeleted, ContactRef, EmergencyContact};
use knightride_core::{ApiError, ApiResult};
use knightride_interaction::ApiClient;

#[derive(Debug, Clone)]
pub struct ContactBook {
    client: ApiClient,
}

impl ContactBook {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ApiResult<Vec<EmergencyContact>> {
        Ok(self.client.get_emergency_contacts().await?.contacts)
    }

    pub async fn add(&self, contact: &EmergencyContact) -> ApiResult<ContactAdded> {
        let added = self.client.add_emergency_contact(contact).await?;
        tracing::info!(name = %contact.name, "Emergency contact added");
        Ok(added)
    }

    /// Deletes the contact at `index` as last listed.
    pub async fn remove_at(&self, index: usize) -> ApiResult<ContactDeleted> {
        self.client.delete_emergency_contact(index).await
    }

    /// Deletes the first contact whose phone number matches `phone`.
    pub async fn remove_matching(&self, phone: &str) -> ApiResult<ContactDeleted> {
        let wanted = normalize_phone(phone);
        let contacts = self.list().await?;

        let index = contacts
            .iter()
            .position(|contact| normalize_phone(&contact.phone) == wanted)
            .ok_or_else(|| ApiError::new(format!("No emergency contact with phone {}", phone)))?;

        tracing::debug!(index, "Deleting emergency contact by phone");
        self.remove_at(index).await
    }

    /// References for every saved contact, for arming an SOS.
    pub async fn sos_contact_set(&self) -> ApiResult<Vec<ContactRef>> {
        Ok(self
            .list()
            .await?
            .iter()
            .map(EmergencyContact::reference)
            .collect())
    }
}

/// Digits only, keeping a leading `+`.
fn normalize_phone(phone: &str) -> String {
    let trimmed = phone.trim();
    let mut normalized: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    if trimmed.starts_with('+') {
        normalized.insert(0, '+');
    }
    normalized
}
