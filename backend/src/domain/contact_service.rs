use std::sync::Arc;

use shared::{CreateContactRequest, EntityKind, UpdateContactRequest};
use tracing::info;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{new_id, Contact};
use crate::domain::validation::{ensure_owner, provided, required};
use crate::storage::traits::ContactStorage;

/// Address book of vets, groomers and sitters
#[derive(Clone)]
pub struct ContactService {
    contacts: Arc<dyn ContactStorage>,
}

impl ContactService {
    pub fn new(contacts: Arc<dyn ContactStorage>) -> Self {
        Self { contacts }
    }

    pub async fn add_contact(
        &self,
        user_id: &str,
        request: CreateContactRequest,
    ) -> DomainResult<Contact> {
        let contact = Contact {
            id: new_id(EntityKind::Contact),
            user_id: user_id.to_string(),
            name: required(request.name, "name")?,
            address: required(request.address, "adress")?,
            phone: required(request.phone, "phone")?,
            mail: required(request.mail, "mail")?,
        };
        self.contacts.store_contact(&contact).await?;

        info!("Added contact {} for {}", contact.id, user_id);
        Ok(contact)
    }

    pub async fn list_contacts(&self, user_id: &str) -> DomainResult<Vec<Contact>> {
        Ok(self.contacts.list_contacts_for_user(user_id).await?)
    }

    pub async fn update_contact(
        &self,
        user_id: &str,
        contact_id: &str,
        request: UpdateContactRequest,
    ) -> DomainResult<Contact> {
        let mut contact = self.owned_contact(user_id, contact_id).await?;

        if let Some(name) = provided(request.name) {
            contact.name = name;
        }
        if let Some(address) = provided(request.address) {
            contact.address = address;
        }
        if let Some(phone) = provided(request.phone) {
            contact.phone = phone;
        }
        if let Some(mail) = provided(request.mail) {
            contact.mail = mail;
        }

        self.contacts.update_contact(&contact).await?;
        info!("Updated contact {}", contact.id);
        Ok(contact)
    }

    pub async fn remove_contact(&self, user_id: &str, contact_id: &str) -> DomainResult<()> {
        let contact = self.owned_contact(user_id, contact_id).await?;
        if !self.contacts.delete_contact(&contact.id).await? {
            return Err(DomainError::not_found("Contact not found"));
        }
        info!("Removed contact {}", contact.id);
        Ok(())
    }

    async fn owned_contact(&self, user_id: &str, contact_id: &str) -> DomainResult<Contact> {
        let contact = self
            .contacts
            .get_contact(contact_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Contact not found"))?;
        ensure_owner(&contact.user_id, user_id, "contact")?;
        Ok(contact)
    }
}
