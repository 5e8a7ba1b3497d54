use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::Contact;
use crate::storage::connection::DbConnection;
use crate::storage::traits::ContactStorage;

#[derive(Clone)]
pub struct ContactRepository {
    db: DbConnection,
}

impl ContactRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn from_row(row: &SqliteRow) -> Result<Contact> {
        Ok(Contact {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            name: row.try_get("name")?,
            address: row.try_get("address")?,
            phone: row.try_get("phone")?,
            mail: row.try_get("mail")?,
        })
    }
}

#[async_trait]
impl ContactStorage for ContactRepository {
    async fn store_contact(&self, contact: &Contact) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO contacts (id, user_id, name, address, phone, mail)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&contact.id)
        .bind(&contact.user_id)
        .bind(&contact.name)
        .bind(&contact.address)
        .bind(&contact.phone)
        .bind(&contact.mail)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_contact(&self, contact_id: &str) -> Result<Option<Contact>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, name, address, phone, mail
            FROM contacts
            WHERE id = ?
            "#,
        )
        .bind(contact_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::from_row).transpose()
    }

    async fn list_contacts_for_user(&self, user_id: &str) -> Result<Vec<Contact>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, name, address, phone, mail
            FROM contacts
            WHERE user_id = ?
            ORDER BY name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::from_row).collect()
    }

    async fn update_contact(&self, contact: &Contact) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE contacts
            SET name = ?, address = ?, phone = ?, mail = ?
            WHERE id = ?
            "#,
        )
        .bind(&contact.name)
        .bind(&contact.address)
        .bind(&contact.phone)
        .bind(&contact.mail)
        .bind(&contact.id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn delete_contact(&self, contact_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = ?")
            .bind(contact_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
