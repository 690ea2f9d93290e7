//! SQLite-Implementierung des OrganisationRepository

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use teamwerk_core::Rolle;

use crate::error::DbError;
use crate::models::{NeueOrganisation, OrganisationRecord};
use crate::repository::{DbResult, OrganisationRepository};
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::users::{parse_datetime, parse_uuid};

impl OrganisationRepository for SqliteDb {
    async fn create(&self, data: NeueOrganisation<'_>) -> DbResult<OrganisationRecord> {
        let id = Uuid::new_v4();
        let mitgliedschaft_id = Uuid::new_v4();
        let now = Utc::now();
        let now_str = now.to_rfc3339();

        // Organisation und Eigentuemer-Mitgliedschaft in einer Transaktion:
        // keine Organisation ist je ohne Eigentuemer sichtbar.
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO organizations (id, name, slug, created_at) VALUES (?, ?, ?, ?)")
            .bind(id.to_string())
            .bind(data.name)
            .bind(data.slug)
            .bind(&now_str)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                let msg = e.to_string();
                if msg.contains("UNIQUE") || msg.contains("unique") {
                    DbError::Eindeutigkeit(format!("Slug '{}' bereits vergeben", data.slug))
                } else {
                    DbError::Sqlx(e)
                }
            })?;

        sqlx::query(
            "INSERT INTO memberships (id, organization_id, user_id, role, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(mitgliedschaft_id.to_string())
        .bind(id.to_string())
        .bind(data.owner_id.to_string())
        .bind(Rolle::Eigentuemer.als_str())
        .bind(&now_str)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(OrganisationRecord {
            id,
            name: data.name.to_string(),
            slug: data.slug.to_string(),
            created_at: now,
        })
    }

    async fn get(&self, id: Uuid) -> DbResult<Option<OrganisationRecord>> {
        let row = sqlx::query("SELECT id, name, slug, created_at FROM organizations WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_organisation(&r)).transpose()
    }

    async fn get_by_slug(&self, slug: &str) -> DbResult<Option<OrganisationRecord>> {
        let row =
            sqlx::query("SELECT id, name, slug, created_at FROM organizations WHERE slug = ?")
                .bind(slug)
                .fetch_optional(&self.pool)
                .await?;

        row.map(|r| row_to_organisation(&r)).transpose()
    }

    async fn list_for_user(&self, user_id: Uuid) -> DbResult<Vec<OrganisationRecord>> {
        let rows = sqlx::query(
            "SELECT o.id, o.name, o.slug, o.created_at
             FROM organizations o
             JOIN memberships m ON m.organization_id = o.id
             WHERE m.user_id = ?
             ORDER BY o.created_at ASC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_organisation).collect()
    }
}

fn row_to_organisation(row: &SqliteRow) -> DbResult<OrganisationRecord> {
    Ok(OrganisationRecord {
        id: parse_uuid(row, "id")?,
        name: row.try_get("name")?,
        slug: row.try_get("slug")?,
        created_at: parse_datetime(row, "created_at")?,
    })
}
