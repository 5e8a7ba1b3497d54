//! Pet profiles and their weight history.
//!
//! Every operation that touches an existing pet loads it, checks that the
//! caller owns it and only then mutates the in-memory copy. The whole pet is
//! written back in one update, so a failed validation never reaches storage.
//!
//! Weight changes go through [`WeightHistory`](crate::domain::weight_log::WeightHistory):
//! - `add_weight` uses `record_observation` (one sample per day)
//! - `update_pet` uses `merge_on_profile_edit` (compares the last sample only)
//! - `remove_weight` uses `remove_observation`

use std::sync::Arc;

use shared::EntityKind;
use tracing::{info, warn};

use crate::domain::dates;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{new_id, Pet};
use crate::domain::validation::{ensure_owner, provided, required};
use crate::domain::weight_log::{
    parse_observed_day, require_weight, RecordOutcome, WeightHistory, WeightLogError,
};
use crate::storage::file_store::{FileStore, UploadedFile};
use crate::storage::traits::PetStorage;

/// Text fields of the pet form. Blank values count as absent.
#[derive(Debug, Clone, Default)]
pub struct PetForm {
    pub name: Option<String>,
    pub birth_date: Option<String>,
    pub pet_type: Option<String>,
    pub color: Option<String>,
    pub weight: Option<String>,
}

#[derive(Clone)]
pub struct PetService {
    pets: Arc<dyn PetStorage>,
    files: FileStore,
}

impl PetService {
    pub fn new(pets: Arc<dyn PetStorage>, files: FileStore) -> Self {
        Self { pets, files }
    }

    pub async fn add_pet(
        &self,
        user_id: &str,
        form: PetForm,
        image: Option<UploadedFile>,
    ) -> DomainResult<Pet> {
        let name = required(form.name, "name")?;
        let birth_date = parse_birth_date(&required(form.birth_date, "birthDate")?)?;
        let pet_type = required(form.pet_type, "type")?;
        let color = required(form.color, "color")?;
        let weight = require_weight(optional_weight(form.weight.as_deref())?)?;

        let data = WeightHistory::starting_with(dates::today(), weight)?;

        let image = match image {
            Some(file) => Some(self.files.store_pet_image(&file).await?),
            None => None,
        };

        let pet = Pet {
            id: new_id(EntityKind::Pet),
            user_id: user_id.to_string(),
            name,
            birth_date,
            pet_type,
            color,
            image,
            data,
        };

        if let Err(e) = self.pets.store_pet(&pet).await {
            if let Some(name) = &pet.image {
                self.files.remove_pet_image(name).await;
            }
            return Err(e.into());
        }

        info!("Added pet {} for {}", pet.id, user_id);
        Ok(pet)
    }

    pub async fn list_pets(&self, user_id: &str) -> DomainResult<Vec<Pet>> {
        Ok(self.pets.list_pets_for_user(user_id).await?)
    }

    pub async fn get_pet(&self, user_id: &str, pet_id: &str) -> DomainResult<Pet> {
        let pet = self
            .pets
            .get_pet(pet_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Pet not found"))?;
        ensure_owner(&pet.user_id, user_id, "pet")?;
        Ok(pet)
    }

    /// Apply a profile edit. Provided fields overwrite, the weight is merged
    /// against the last sample and a new image replaces the old one.
    pub async fn update_pet(
        &self,
        user_id: &str,
        pet_id: &str,
        form: PetForm,
        image: Option<UploadedFile>,
    ) -> DomainResult<Pet> {
        let mut pet = self.get_pet(user_id, pet_id).await?;

        if let Some(name) = provided(form.name) {
            pet.name = name;
        }
        if let Some(birth_date) = provided(form.birth_date) {
            pet.birth_date = parse_birth_date(&birth_date)?;
        }
        if let Some(pet_type) = provided(form.pet_type) {
            pet.pet_type = pet_type;
        }
        if let Some(color) = provided(form.color) {
            pet.color = color;
        }

        let weight = optional_weight(form.weight.as_deref())?;
        if pet.data.merge_on_profile_edit(dates::today(), weight)? {
            info!("Appended profile weight sample for pet {}", pet.id);
        }

        let (new_image, replaced_image) = match image {
            Some(file) => {
                let stored = self.files.store_pet_image(&file).await?;
                (Some(stored.clone()), pet.image.replace(stored))
            }
            None => (None, None),
        };

        if let Err(e) = self.pets.update_pet(&pet).await {
            if let Some(name) = &new_image {
                self.files.remove_pet_image(name).await;
            }
            return Err(e.into());
        }

        if let Some(old) = replaced_image {
            self.files.remove_pet_image(&old).await;
        }

        info!("Updated pet {}", pet.id);
        Ok(pet)
    }

    /// Record a dated weight, overwriting any sample already on that day.
    pub async fn add_weight(
        &self,
        user_id: &str,
        pet_id: &str,
        date: Option<&str>,
        weight: Option<f64>,
    ) -> DomainResult<Pet> {
        let mut pet = self.get_pet(user_id, pet_id).await?;
        let day = parse_observed_day(date)?;
        let weight = require_weight(weight)?;

        match pet.data.record_observation(day, weight)? {
            RecordOutcome::Overwritten { index } => {
                info!("Overwrote weight sample {} of pet {}", index, pet.id)
            }
            RecordOutcome::Appended => info!("Appended weight sample to pet {}", pet.id),
        }

        self.pets.update_pet(&pet).await?;
        Ok(pet)
    }

    pub async fn remove_weight(
        &self,
        user_id: &str,
        pet_id: &str,
        date: Option<&str>,
        weight: Option<f64>,
    ) -> DomainResult<Pet> {
        let mut pet = self.get_pet(user_id, pet_id).await?;
        let day = parse_observed_day(date)?;
        let weight = require_weight(weight)?;

        let removed = pet.data.remove_observation(day, weight)?;
        self.pets.update_pet(&pet).await?;

        info!("Removed weight sample {:?} from pet {}", removed, pet.id);
        Ok(pet)
    }

    pub async fn delete_pet(&self, user_id: &str, pet_id: &str) -> DomainResult<()> {
        let pet = self.get_pet(user_id, pet_id).await?;

        if !self.pets.delete_pet(&pet.id).await? {
            warn!("Pet {} vanished before it could be deleted", pet.id);
            return Err(DomainError::not_found("Pet not found"));
        }
        if let Some(image) = &pet.image {
            self.files.remove_pet_image(image).await;
        }

        info!("Deleted pet {}", pet.id);
        Ok(())
    }
}

fn parse_birth_date(input: &str) -> DomainResult<chrono::NaiveDate> {
    dates::parse_day(input)
        .ok_or_else(|| DomainError::validation(format!("Invalid birth date: {}", input)))
}

/// Weight from a form field. Blank is absent; anything else must be a number.
fn optional_weight(raw: Option<&str>) -> Result<Option<f64>, WeightLogError> {
    match raw.map(str::trim).filter(|text| !text.is_empty()) {
        None => Ok(None),
        Some(text) => text
            .parse::<f64>()
            .map(Some)
            .map_err(|_| WeightLogError::InvalidWeight),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::connection::DbConnection;
    use crate::storage::repositories::PetRepository;
    use chrono::NaiveDate;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;
    use tempfile::TempDir;

    struct Fixture {
        service: PetService,
        files: FileStore,
        _dir: TempDir,
    }

    async fn setup_test() -> Fixture {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let files = FileStore::new(dir.path());
        let service = PetService::new(Arc::new(PetRepository::new(db)), files.clone());
        Fixture { service, files, _dir: dir }
    }

    fn form(weight: &str) -> PetForm {
        PetForm {
            name: Some("Misty".into()),
            birth_date: Some("2019-04-02".into()),
            pet_type: Some("cat".into()),
            color: Some("black".into()),
            weight: Some(weight.into()),
        }
    }

    fn png_upload() -> UploadedFile {
        let img = RgbImage::from_pixel(100, 50, Rgb([10, 20, 30]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .expect("Failed to encode test image");
        UploadedFile {
            original_name: "misty.png".into(),
            content_type: "image/png".into(),
            bytes,
        }
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn test_add_pet_starts_history_today() {
        let fx = setup_test().await;
        let pet = fx.service.add_pet("user::a", form("4.2"), None).await.expect("add failed");

        assert_eq!(pet.data.len(), 1);
        let sample = pet.data.last().unwrap();
        assert_eq!(sample.date, dates::today());
        assert_eq!(sample.weight, 4.2);
        assert_eq!(fx.service.get_pet("user::a", &pet.id).await.unwrap(), pet);
    }

    #[tokio::test]
    async fn test_add_pet_validation() {
        let fx = setup_test().await;
        let mut missing_color = form("4.2");
        missing_color.color = Some("  ".into());

        for (input, label) in [
            (form("0"), "zero weight"),
            (form("-3"), "negative weight"),
            (form("heavy"), "non-numeric weight"),
            (form(""), "missing weight"),
            (missing_color, "blank color"),
        ] {
            let result = fx.service.add_pet("user::a", input, None).await;
            assert!(matches!(result, Err(DomainError::Validation(_))), "{}", label);
        }
        assert!(fx.service.list_pets("user::a").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_weight_overwrites_same_day() {
        let fx = setup_test().await;
        let pet = fx.service.add_pet("user::a", form("4.0"), None).await.unwrap();

        fx.service.add_weight("user::a", &pet.id, Some("2024-01-01"), Some(5.0)).await.unwrap();
        let pet = fx
            .service
            .add_weight("user::a", &pet.id, Some("2024-01-01T18:00:00Z"), Some(5.2))
            .await
            .unwrap();

        assert_eq!(pet.data.len(), 2);
        assert_eq!(pet.data.samples()[1].date, day("2024-01-01"));
        assert_eq!(pet.data.samples()[1].weight, 5.2);

        let stored = fx.service.get_pet("user::a", &pet.id).await.unwrap();
        assert_eq!(stored, pet);
    }

    #[tokio::test]
    async fn test_add_weight_rejects_bad_input_without_mutation() {
        let fx = setup_test().await;
        let pet = fx.service.add_pet("user::a", form("4.0"), None).await.unwrap();

        let zero = fx.service.add_weight("user::a", &pet.id, Some("2024-01-01"), Some(0.0)).await;
        let no_date = fx.service.add_weight("user::a", &pet.id, None, Some(3.0)).await;
        let bad_date = fx.service.add_weight("user::a", &pet.id, Some("yesterday"), Some(3.0)).await;
        assert!(matches!(zero, Err(DomainError::Validation(_))));
        assert!(matches!(no_date, Err(DomainError::Validation(_))));
        assert!(matches!(bad_date, Err(DomainError::Validation(_))));

        assert_eq!(fx.service.get_pet("user::a", &pet.id).await.unwrap(), pet);
    }

    #[tokio::test]
    async fn test_remove_weight() {
        let fx = setup_test().await;
        let pet = fx.service.add_pet("user::a", form("4.0"), None).await.unwrap();
        fx.service.add_weight("user::a", &pet.id, Some("2024-01-01"), Some(5.0)).await.unwrap();

        let missing = fx.service.remove_weight("user::a", &pet.id, Some("2024-01-01"), Some(5.1)).await;
        assert!(matches!(missing, Err(DomainError::NotFound(_))));

        let pet = fx
            .service
            .remove_weight("user::a", &pet.id, Some("2024-01-01"), Some(5.0))
            .await
            .unwrap();
        assert_eq!(pet.data.len(), 1);
        assert_eq!(pet.data.last().unwrap().date, dates::today());
    }

    #[tokio::test]
    async fn test_update_merges_against_last_sample_only() {
        let fx = setup_test().await;
        let pet = fx.service.add_pet("user::a", form("4.0"), None).await.unwrap();

        // same day and weight as the last sample: nothing appended
        let pet = fx.service.update_pet("user::a", &pet.id, PetForm { weight: Some("4.0".into()), ..Default::default() }, None).await.unwrap();
        assert_eq!(pet.data.len(), 1);

        // no weight sent: nothing appended
        let pet = fx.service.update_pet("user::a", &pet.id, PetForm { name: Some("Misty II".into()), ..Default::default() }, None).await.unwrap();
        assert_eq!(pet.data.len(), 1);
        assert_eq!(pet.name, "Misty II");

        // different weight on the same day: appended, not overwritten
        let pet = fx.service.update_pet("user::a", &pet.id, PetForm { weight: Some("4.3".into()), ..Default::default() }, None).await.unwrap();
        assert_eq!(pet.data.len(), 2);
        assert!(pet.data.samples().iter().all(|s| s.date == dates::today()));

        let invalid = fx.service.update_pet("user::a", &pet.id, PetForm { weight: Some("-1".into()), ..Default::default() }, None).await;
        assert!(matches!(invalid, Err(DomainError::Validation(_))));
        assert_eq!(fx.service.get_pet("user::a", &pet.id).await.unwrap().data.len(), 2);
    }

    #[tokio::test]
    async fn test_profile_edit_after_history_emptied_adds_nothing() {
        let fx = setup_test().await;
        let pet = fx.service.add_pet("user::a", form("4.0"), None).await.unwrap();
        let today = dates::format_day(dates::today());

        let pet = fx.service.remove_weight("user::a", &pet.id, Some(&today), Some(4.0)).await.unwrap();
        assert!(pet.data.is_empty());

        let pet = fx
            .service
            .update_pet("user::a", &pet.id, PetForm { weight: Some("4.0".into()), ..Default::default() }, None)
            .await
            .unwrap();
        assert!(pet.data.is_empty());
        assert!(fx.service.get_pet("user::a", &pet.id).await.unwrap().data.is_empty());
    }

    #[tokio::test]
    async fn test_other_users_cannot_touch_pet() {
        let fx = setup_test().await;
        let pet = fx.service.add_pet("user::a", form("4.0"), None).await.unwrap();

        assert!(matches!(fx.service.get_pet("user::b", &pet.id).await, Err(DomainError::Forbidden(_))));
        assert!(matches!(
            fx.service.add_weight("user::b", &pet.id, Some("2024-01-01"), Some(5.0)).await,
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(fx.service.delete_pet("user::b", &pet.id).await, Err(DomainError::Forbidden(_))));
        assert!(matches!(fx.service.get_pet("user::a", "pet::missing").await, Err(DomainError::NotFound(_))));

        assert_eq!(fx.service.get_pet("user::a", &pet.id).await.unwrap(), pet);
        assert!(fx.service.list_pets("user::b").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_image_replacement_and_deletion_clean_up_files() {
        let fx = setup_test().await;
        let pet = fx.service.add_pet("user::a", form("4.0"), Some(png_upload())).await.unwrap();
        let first = pet.image.clone().expect("image should be stored");
        assert!(fx.files.pet_image_path(&first).exists());

        let pet = fx.service.update_pet("user::a", &pet.id, PetForm::default(), Some(png_upload())).await.unwrap();
        let second = pet.image.clone().expect("image should be replaced");
        assert_ne!(first, second);
        assert!(!fx.files.pet_image_path(&first).exists());
        assert!(fx.files.pet_image_path(&second).exists());

        fx.service.delete_pet("user::a", &pet.id).await.unwrap();
        assert!(!fx.files.pet_image_path(&second).exists());
        assert!(matches!(fx.service.get_pet("user::a", &pet.id).await, Err(DomainError::NotFound(_))));
    }

    /// Delegates to a real repository but refuses every update
    struct RejectingUpdates(PetRepository);

    #[async_trait::async_trait]
    impl PetStorage for RejectingUpdates {
        async fn store_pet(&self, pet: &Pet) -> anyhow::Result<()> {
            self.0.store_pet(pet).await
        }

        async fn get_pet(&self, pet_id: &str) -> anyhow::Result<Option<Pet>> {
            self.0.get_pet(pet_id).await
        }

        async fn list_pets_for_user(&self, user_id: &str) -> anyhow::Result<Vec<Pet>> {
            self.0.list_pets_for_user(user_id).await
        }

        async fn update_pet(&self, _pet: &Pet) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("database is locked"))
        }

        async fn delete_pet(&self, pet_id: &str) -> anyhow::Result<bool> {
            self.0.delete_pet(pet_id).await
        }
    }

    #[tokio::test]
    async fn test_failed_update_removes_new_image_and_keeps_old() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let files = FileStore::new(dir.path());
        let service = PetService::new(
            Arc::new(RejectingUpdates(PetRepository::new(db))),
            files.clone(),
        );

        let pet = service.add_pet("user::a", form("4.0"), Some(png_upload())).await.unwrap();
        let original = pet.image.clone().expect("image should be stored");

        let result = service.update_pet("user::a", &pet.id, PetForm::default(), Some(png_upload())).await;
        assert!(matches!(result, Err(DomainError::Upstream(_))));

        let stored: Vec<String> = std::fs::read_dir(files.pet_image_dir())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(stored, vec![original]);
    }

    #[tokio::test]
    async fn test_rejected_image_type() {
        let fx = setup_test().await;
        let upload = UploadedFile {
            original_name: "notes.pdf".into(),
            content_type: "application/pdf".into(),
            bytes: b"%PDF".to_vec(),
        };
        let result = fx.service.add_pet("user::a", form("4.0"), Some(upload)).await;
        assert!(matches!(result, Err(DomainError::InvalidFileType(_))));
    }

    #[test]
    fn test_optional_weight() {
        assert_eq!(optional_weight(None), Ok(None));
        assert_eq!(optional_weight(Some("  ")), Ok(None));
        assert_eq!(optional_weight(Some(" 4.5 ")), Ok(Some(4.5)));
        assert_eq!(optional_weight(Some("four")), Err(WeightLogError::InvalidWeight));
    }
}
