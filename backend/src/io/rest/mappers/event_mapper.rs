use shared::Event as SharedEvent;

use crate::domain::models::Event as DomainEvent;

pub struct EventMapper;

impl EventMapper {
    pub fn to_dto(domain: DomainEvent) -> SharedEvent {
        SharedEvent {
            id: domain.id,
            name: domain.name,
            date: domain.date.to_rfc3339(),
            description: domain.description,
            pet_id: domain.pet_id,
            user: domain.user_id,
        }
    }

    pub fn to_dto_list(events: Vec<DomainEvent>) -> Vec<SharedEvent> {
        events.into_iter().map(Self::to_dto).collect()
    }
}
