//! Incident model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;
use validator::Validate;

use crate::classify::Category;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Incident {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: String,
    /// Either unset or one of the fixed category labels; every write path
    /// upholds this, not just the classifier's.
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateIncident {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
}

/// Partial update: absent fields are left untouched.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateIncident {
    pub status: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct IncidentFilter {
    pub status: Option<String>,
    pub category: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Incident {
    /// Insert a new incident. Category always starts unset; the
    /// classification trigger fills it in later.
    pub async fn create(pool: &SqlitePool, data: CreateIncident) -> Result<Self, sqlx::Error> {
        let now = Utc::now();

        sqlx::query_as::<_, Incident>(
            r#"
            INSERT INTO incidents (id, title, description, status, category, created_at, updated_at)
            VALUES (?, ?, ?, 'open', NULL, ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.title)
        .bind(&data.description)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Incident>("SELECT * FROM incidents WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &SqlitePool, filter: IncidentFilter) -> Result<Vec<Self>, sqlx::Error> {
        let limit = filter.limit.unwrap_or(50);
        let offset = filter.offset.unwrap_or(0);

        sqlx::query_as::<_, Incident>(
            r#"
            SELECT * FROM incidents
            WHERE (? IS NULL OR status = ?)
              AND (? IS NULL OR category = ?)
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(&filter.status)
        .bind(&filter.status)
        .bind(&filter.category)
        .bind(&filter.category)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: UpdateIncident,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Incident>(
            r#"
            UPDATE incidents
            SET status = COALESCE(?, status),
                category = COALESCE(?, category),
                updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&data.status)
        .bind(&data.category)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Partial update applied by the classification trigger: category and
    /// updated_at only. Returns false when the incident no longer exists,
    /// so the trigger can report it instead of dropping it silently.
    pub async fn set_category(
        pool: &SqlitePool,
        id: Uuid,
        category: Category,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE incidents SET category = ?, updated_at = ? WHERE id = ?")
            .bind(category.as_str())
            .bind(Utc::now())
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM incidents WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn incident(title: &str, description: &str) -> CreateIncident {
        CreateIncident {
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_starts_open_and_uncategorized() {
        let pool = test_pool().await;
        let created = Incident::create(&pool, incident("Outage", "Network is down"))
            .await
            .unwrap();

        assert_eq!(created.status, "open");
        assert_eq!(created.category, None);

        let fetched = Incident::find_by_id(&pool, created.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.title, "Outage");
    }

    #[tokio::test]
    async fn test_update_is_partial() {
        let pool = test_pool().await;
        let created = Incident::create(&pool, incident("Outage", "Network is down"))
            .await
            .unwrap();
        Incident::set_category(&pool, created.id, Category::NetworkIssue)
            .await
            .unwrap();

        // Status-only update must not clobber the category.
        let updated = Incident::update(
            &pool,
            created.id,
            UpdateIncident {
                status: Some("resolved".to_string()),
                category: None,
            },
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(updated.status, "resolved");
        assert_eq!(updated.category.as_deref(), Some("Network Issue"));
    }

    #[tokio::test]
    async fn test_set_category_on_missing_incident_is_false() {
        let pool = test_pool().await;
        let updated = Incident::set_category(&pool, Uuid::new_v4(), Category::Other)
            .await
            .unwrap();
        assert!(!updated);
    }

    #[tokio::test]
    async fn test_list_filters_by_status() {
        let pool = test_pool().await;
        let a = Incident::create(&pool, incident("A", "first")).await.unwrap();
        Incident::create(&pool, incident("B", "second")).await.unwrap();
        Incident::update(
            &pool,
            a.id,
            UpdateIncident {
                status: Some("resolved".to_string()),
                category: None,
            },
        )
        .await
        .unwrap();

        let open = Incident::list(
            &pool,
            IncidentFilter {
                status: Some("open".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].title, "B");

        let all = Incident::list(&pool, IncidentFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_reports_missing_rows() {
        let pool = test_pool().await;
        let created = Incident::create(&pool, incident("Gone", "soon")).await.unwrap();

        assert!(Incident::delete(&pool, created.id).await.unwrap());
        assert!(!Incident::delete(&pool, created.id).await.unwrap());
        assert!(Incident::find_by_id(&pool, created.id).await.unwrap().is_none());
    }
}
