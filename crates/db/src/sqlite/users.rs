//! SQLite-Implementierung des UserRepository
//!
//! Enthaelt ausserdem die gemeinsamen Row-Parser fuer TEXT-gespeicherte
//! UUIDs und RFC3339-Zeitstempel, die auch die anderen SQLite-Module nutzen.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use crate::error::DbError;
use crate::models::{BenutzerRecord, NeuerBenutzer};
use crate::repository::{DbResult, UserRepository};
use crate::sqlite::pool::SqliteDb;

/// Parst eine TEXT-Spalte als UUID
pub(crate) fn parse_uuid(row: &SqliteRow, spalte: &str) -> DbResult<Uuid> {
    let wert: String = row.try_get(spalte)?;
    Uuid::parse_str(&wert)
        .map_err(|e| DbError::intern(format!("Ungueltige UUID in '{spalte}' ('{wert}'): {e}")))
}

/// Parst eine TEXT-Spalte als RFC3339-Zeitstempel
pub(crate) fn parse_datetime(row: &SqliteRow, spalte: &str) -> DbResult<DateTime<Utc>> {
    let wert: String = row.try_get(spalte)?;
    DateTime::parse_from_rfc3339(&wert)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::intern(format!("Ungueltiger Zeitstempel in '{spalte}': {e}")))
}

impl UserRepository for SqliteDb {
    async fn create(&self, data: NeuerBenutzer<'_>) -> DbResult<BenutzerRecord> {
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO users (id, email, name, email_verified, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(data.id.to_string())
        .bind(data.email)
        .bind(data.name)
        .bind(data.email_verified as i64)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();
            if msg.contains("UNIQUE") || msg.contains("unique") {
                DbError::Eindeutigkeit(format!("Benutzer '{}' bereits registriert", data.email))
            } else {
                DbError::Sqlx(e)
            }
        })?;

        Ok(BenutzerRecord {
            id: data.id,
            email: data.email.to_string(),
            name: data.name.to_string(),
            email_verified: data.email_verified,
            created_at: now,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<BenutzerRecord>> {
        let row = sqlx::query(
            "SELECT id, email, name, email_verified, created_at FROM users WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_benutzer(&r)).transpose()
    }

    async fn get_by_email(&self, email: &str) -> DbResult<Option<BenutzerRecord>> {
        let row = sqlx::query(
            "SELECT id, email, name, email_verified, created_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_benutzer(&r)).transpose()
    }
}

fn row_to_benutzer(row: &SqliteRow) -> DbResult<BenutzerRecord> {
    let email_verified: i64 = row.try_get("email_verified")?;
    Ok(BenutzerRecord {
        id: parse_uuid(row, "id")?,
        email: row.try_get("email")?,
        name: row.try_get("name")?,
        email_verified: email_verified != 0,
        created_at: parse_datetime(row, "created_at")?,
    })
}
