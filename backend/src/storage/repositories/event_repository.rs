use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::Event;
use crate::storage::connection::DbConnection;
use crate::storage::traits::EventStorage;

#[derive(Clone)]
pub struct EventRepository {
    db: DbConnection,
}

impl EventRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn from_row(row: &SqliteRow) -> Result<Event> {
        Ok(Event {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            pet_id: row.try_get("pet_id")?,
            name: row.try_get("name")?,
            date: row.try_get("date")?,
            description: row.try_get("description")?,
        })
    }
}

#[async_trait]
impl EventStorage for EventRepository {
    async fn store_event(&self, event: &Event) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO events (id, user_id, pet_id, name, date, description)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&event.id)
        .bind(&event.user_id)
        .bind(&event.pet_id)
        .bind(&event.name)
        .bind(event.date)
        .bind(&event.description)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_event(&self, event_id: &str) -> Result<Option<Event>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, pet_id, name, date, description
            FROM events
            WHERE id = ?
            "#,
        )
        .bind(event_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::from_row).transpose()
    }

    async fn list_events_for_user(&self, user_id: &str) -> Result<Vec<Event>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, pet_id, name, date, description
            FROM events
            WHERE user_id = ?
            ORDER BY date ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::from_row).collect()
    }

    async fn delete_event(&self, event_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(event_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    async fn setup_test() -> EventRepository {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        EventRepository::new(db)
    }

    fn test_event(id: &str, user_id: &str, month: u32) -> Event {
        Event {
            id: id.to_string(),
            user_id: user_id.to_string(),
            pet_id: "pet::1".to_string(),
            name: "Misty".to_string(),
            date: Utc.with_ymd_and_hms(2024, month, 10, 14, 30, 0).unwrap(),
            description: "Vaccine booster".to_string(),
        }
    }

    #[tokio::test]
    async fn test_list_events_in_date_order() {
        let repo = setup_test().await;
        repo.store_event(&test_event("event::1", "user::a", 9)).await.unwrap();
        repo.store_event(&test_event("event::2", "user::a", 3)).await.unwrap();
        repo.store_event(&test_event("event::3", "user::b", 1)).await.unwrap();

        let events = repo.list_events_for_user("user::a").await.expect("Failed to list events");
        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["event::2", "event::1"]);
        assert_eq!(events[0], test_event("event::2", "user::a", 3));
    }

    #[tokio::test]
    async fn test_delete_event() {
        let repo = setup_test().await;
        repo.store_event(&test_event("event::1", "user::a", 9)).await.unwrap();

        assert!(repo.delete_event("event::1").await.unwrap());
        assert!(repo.get_event("event::1").await.unwrap().is_none());
    }
}
