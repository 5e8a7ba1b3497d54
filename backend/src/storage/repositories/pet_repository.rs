use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::Pet;
use crate::domain::weight_log::WeightHistory;
use crate::storage::connection::DbConnection;
use crate::storage::traits::PetStorage;

/// Repository for pets. The weight history is stored as one JSON column so a
/// pet is always read and written as a whole document.
#[derive(Clone)]
pub struct PetRepository {
    db: DbConnection,
}

impl PetRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn from_row(row: &SqliteRow) -> Result<Pet> {
        let id: String = row.try_get("id")?;
        let data: String = row.try_get("data")?;
        let data: WeightHistory = serde_json::from_str(&data)
            .with_context(|| format!("Corrupt weight history for {}", id))?;

        Ok(Pet {
            id,
            user_id: row.try_get("user_id")?,
            name: row.try_get("name")?,
            birth_date: row.try_get("birth_date")?,
            pet_type: row.try_get("pet_type")?,
            color: row.try_get("color")?,
            image: row.try_get("image")?,
            data,
        })
    }
}

#[async_trait]
impl PetStorage for PetRepository {
    async fn store_pet(&self, pet: &Pet) -> Result<()> {
        let data = serde_json::to_string(&pet.data)?;
        sqlx::query(
            r#"
            INSERT INTO pets (id, user_id, name, birth_date, pet_type, color, image, data)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&pet.id)
        .bind(&pet.user_id)
        .bind(&pet.name)
        .bind(pet.birth_date)
        .bind(&pet.pet_type)
        .bind(&pet.color)
        .bind(&pet.image)
        .bind(data)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_pet(&self, pet_id: &str) -> Result<Option<Pet>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, name, birth_date, pet_type, color, image, data
            FROM pets
            WHERE id = ?
            "#,
        )
        .bind(pet_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::from_row).transpose()
    }

    async fn list_pets_for_user(&self, user_id: &str) -> Result<Vec<Pet>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, name, birth_date, pet_type, color, image, data
            FROM pets
            WHERE user_id = ?
            ORDER BY ROWID ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::from_row).collect()
    }

    async fn update_pet(&self, pet: &Pet) -> Result<()> {
        let data = serde_json::to_string(&pet.data)?;
        sqlx::query(
            r#"
            UPDATE pets
            SET name = ?, birth_date = ?, pet_type = ?, color = ?, image = ?, data = ?
            WHERE id = ?
            "#,
        )
        .bind(&pet.name)
        .bind(pet.birth_date)
        .bind(&pet.pet_type)
        .bind(&pet.color)
        .bind(&pet.image)
        .bind(data)
        .bind(&pet.id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn delete_pet(&self, pet_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM pets WHERE id = ?")
            .bind(pet_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
