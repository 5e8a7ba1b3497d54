use std::sync::Arc;

use shared::{CreateEventRequest, EntityKind};
use tracing::info;

use crate::domain::dates;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{new_id, Event};
use crate::domain::validation::{ensure_owner, required};
use crate::storage::traits::{EventStorage, PetStorage};

/// Calendar of appointments attached to a pet
#[derive(Clone)]
pub struct EventService {
    events: Arc<dyn EventStorage>,
    pets: Arc<dyn PetStorage>,
}

impl EventService {
    pub fn new(events: Arc<dyn EventStorage>, pets: Arc<dyn PetStorage>) -> Self {
        Self { events, pets }
    }

    /// Create an event for one of the caller's pets. The event is named after the pet.
    pub async fn add_event(&self, user_id: &str, request: CreateEventRequest) -> DomainResult<Event> {
        let raw_date = required(request.date, "date")?;
        let date = dates::parse_instant(&raw_date)
            .ok_or_else(|| DomainError::validation(format!("Invalid date: {}", raw_date)))?;
        let pet_id = required(request.pet_id, "petId")?;
        let description = required(request.description, "description")?;

        let pet = self
            .pets
            .get_pet(&pet_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Pet not found"))?;
        ensure_owner(&pet.user_id, user_id, "pet")?;

        let event = Event {
            id: new_id(EntityKind::Event),
            user_id: user_id.to_string(),
            pet_id: pet.id,
            name: pet.name,
            date,
            description,
        };
        self.events.store_event(&event).await?;

        info!("Added event {} for pet {}", event.id, event.pet_id);
        Ok(event)
    }

    pub async fn list_events(&self, user_id: &str) -> DomainResult<Vec<Event>> {
        Ok(self.events.list_events_for_user(user_id).await?)
    }

    pub async fn remove_event(&self, user_id: &str, event_id: &str) -> DomainResult<()> {
        let event = self
            .events
            .get_event(event_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Event not found"))?;
        ensure_owner(&event.user_id, user_id, "event")?;

        if !self.events.delete_event(&event.id).await? {
            return Err(DomainError::not_found("Event not found"));
        }
        info!("Removed event {}", event.id);
        Ok(())
    }
}
