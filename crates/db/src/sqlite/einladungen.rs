//! SQLite-Implementierung des EinladungRepository
//!
//! Statustransitionen sind bewachte UPDATEs (`WHERE status = von`):
//! von zwei konkurrierenden Transitionen gewinnt genau eine, terminale
//! Zustaende werden nie verlassen.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::str::FromStr;
use uuid::Uuid;

use teamwerk_core::{EinladungsStatus, Rolle};

use crate::error::DbError;
use crate::models::{EinladungRecord, MitgliedschaftRecord, NeueEinladung};
use crate::repository::{DbResult, EinladungRepository};
use crate::sqlite::mitgliedschaften::row_to_mitgliedschaft;
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::users::{parse_datetime, parse_uuid};

const EINLADUNG_SPALTEN: &str =
    "id, organization_id, email, role, status, inviter_user_id, created_at, expires_at";

impl EinladungRepository for SqliteDb {
    async fn create_pending(&self, data: NeueEinladung<'_>) -> DbResult<EinladungRecord> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        // Supersede beim Resend: vorherige ausstehende Einladung fuer dieselbe
        // Adresse wird zurueckgezogen, nie dupliziert
        sqlx::query(
            "UPDATE invitations SET status = 'canceled'
             WHERE organization_id = ? AND email = ? AND status = 'pending'",
        )
        .bind(data.organization_id.to_string())
        .bind(data.email)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO invitations
               (id, organization_id, email, role, status, inviter_user_id, created_at, expires_at)
             VALUES (?, ?, ?, ?, 'pending', ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(data.organization_id.to_string())
        .bind(data.email)
        .bind(data.role.als_str())
        .bind(data.inviter_user_id.to_string())
        .bind(now.to_rfc3339())
        .bind(data.expires_at.to_rfc3339())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(EinladungRecord {
            id,
            organization_id: data.organization_id,
            email: data.email.to_string(),
            role: data.role,
            status: EinladungsStatus::Ausstehend,
            inviter_user_id: data.inviter_user_id,
            created_at: now,
            expires_at: data.expires_at,
        })
    }

    async fn get(&self, id: Uuid) -> DbResult<Option<EinladungRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {EINLADUNG_SPALTEN} FROM invitations WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_einladung(&r)).transpose()
    }

    async fn list_for_org(&self, organization_id: Uuid) -> DbResult<Vec<EinladungRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT {EINLADUNG_SPALTEN} FROM invitations
             WHERE organization_id = ? ORDER BY created_at DESC"
        ))
        .bind(organization_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_einladung).collect()
    }

    async fn mark_transition(
        &self,
        id: Uuid,
        von: EinladungsStatus,
        zu: EinladungsStatus,
    ) -> DbResult<bool> {
        let affected = sqlx::query("UPDATE invitations SET status = ? WHERE id = ? AND status = ?")
            .bind(zu.als_str())
            .bind(id.to_string())
            .bind(von.als_str())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(affected > 0)
    }

    async fn accept_with_membership(
        &self,
        id: Uuid,
        user_id: Uuid,
        jetzt: DateTime<Utc>,
    ) -> DbResult<Option<MitgliedschaftRecord>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(&format!(
            "SELECT {EINLADUNG_SPALTEN} FROM invitations WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&mut *tx)
        .await?;

        let einladung = match row {
            None => return Ok(None),
            Some(r) => row_to_einladung(&r)?,
        };

        // Bewachte Transition: verliert dieser Aufruf gegen eine
        // konkurrierende Annahme oder Ruecknahme, passiert nichts
        let affected = sqlx::query(
            "UPDATE invitations SET status = 'accepted' WHERE id = ? AND status = 'pending'",
        )
        .bind(id.to_string())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if affected == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let mitgliedschaft_id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO memberships (id, organization_id, user_id, role, created_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT (organization_id, user_id) DO UPDATE SET role = excluded.role",
        )
        .bind(mitgliedschaft_id.to_string())
        .bind(einladung.organization_id.to_string())
        .bind(user_id.to_string())
        .bind(einladung.role.als_str())
        .bind(jetzt.to_rfc3339())
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query(
            "SELECT id, organization_id, user_id, role, created_at
             FROM memberships WHERE organization_id = ? AND user_id = ?",
        )
        .bind(einladung.organization_id.to_string())
        .bind(user_id.to_string())
        .fetch_one(&mut *tx)
        .await?;

        let mitgliedschaft = row_to_mitgliedschaft(&row)?;

        tx.commit().await?;

        Ok(Some(mitgliedschaft))
    }
}

fn row_to_einladung(row: &SqliteRow) -> DbResult<EinladungRecord> {
    let rolle_str: String = row.try_get("role")?;
    let role = Rolle::from_str(&rolle_str).map_err(DbError::Intern)?;

    let status_str: String = row.try_get("status")?;
    let status = EinladungsStatus::from_str(&status_str).map_err(DbError::Intern)?;

    Ok(EinladungRecord {
        id: parse_uuid(row, "id")?,
        organization_id: parse_uuid(row, "organization_id")?,
        email: row.try_get("email")?,
        role,
        status,
        inviter_user_id: parse_uuid(row, "inviter_user_id")?,
        created_at: parse_datetime(row, "created_at")?,
        expires_at: parse_datetime(row, "expires_at")?,
    })
}
