use shared::Contact as SharedContact;

use crate::domain::models::Contact as DomainContact;

pub struct ContactMapper;

impl ContactMapper {
    pub fn to_dto(domain: DomainContact) -> SharedContact {
        SharedContact {
            id: domain.id,
            name: domain.name,
            address: domain.address,
            phone: domain.phone,
            mail: domain.mail,
            user: domain.user_id,
        }
    }

    pub fn to_dto_list(contacts: Vec<DomainContact>) -> Vec<SharedContact> {
        contacts.into_iter().map(Self::to_dto).collect()
    }
}
