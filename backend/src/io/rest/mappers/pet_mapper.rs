use shared::{Pet as SharedPet, WeightSample as SharedWeightSample};

use crate::domain::dates::format_day;
use crate::domain::models::Pet as DomainPet;
use crate::domain::weight_log::WeightSample;

/// Mapper to convert domain pets to the wire DTO.
pub struct PetMapper;

impl PetMapper {
    pub fn to_dto(domain: DomainPet) -> SharedPet {
        SharedPet {
            id: domain.id,
            name: domain.name,
            birth_date: format_day(domain.birth_date),
            pet_type: domain.pet_type,
            color: domain.color,
            image: domain.image,
            data: domain
                .data
                .into_samples()
                .into_iter()
                .map(Self::sample_to_dto)
                .collect(),
            user: domain.user_id,
        }
    }

    pub fn to_dto_list(pets: Vec<DomainPet>) -> Vec<SharedPet> {
        pets.into_iter().map(Self::to_dto).collect()
    }

    fn sample_to_dto(sample: WeightSample) -> SharedWeightSample {
        SharedWeightSample {
            date: format_day(sample.date),
            weight: sample.weight,
        }
    }
}
