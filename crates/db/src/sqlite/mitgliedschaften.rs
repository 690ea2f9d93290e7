//! SQLite-Implementierung des MitgliedschaftRepository
//!
//! Die Letzter-Eigentuemer-Pruefungen laufen in derselben Transaktion wie
//! die Mutation. Zwei konkurrierende Entfernungen koennen dadurch nicht
//! beide glauben, sie wuerden nicht den letzten Eigentuemer entfernen.

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::str::FromStr;
use uuid::Uuid;

use teamwerk_core::Rolle;

use crate::error::DbError;
use crate::models::{
    MitgliederAbfrage, MitgliederSeite, MitgliederSortierung, MitgliedMitBenutzer,
    MitgliedschaftRecord, SortierRichtung,
};
use crate::repository::{abfrage_begrenzen, DbResult, MitgliedschaftRepository};
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::users::{parse_datetime, parse_uuid};

impl MitgliedschaftRepository for SqliteDb {
    async fn get(&self, id: Uuid) -> DbResult<Option<MitgliedschaftRecord>> {
        let row = sqlx::query(
            "SELECT id, organization_id, user_id, role, created_at
             FROM memberships WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_mitgliedschaft(&r)).transpose()
    }

    async fn get_by_org_user(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> DbResult<Option<MitgliedschaftRecord>> {
        let row = sqlx::query(
            "SELECT id, organization_id, user_id, role, created_at
             FROM memberships WHERE organization_id = ? AND user_id = ?",
        )
        .bind(organization_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_mitgliedschaft(&r)).transpose()
    }

    async fn list_for_org(
        &self,
        organization_id: Uuid,
        abfrage: &MitgliederAbfrage,
    ) -> DbResult<MitgliederSeite> {
        let abfrage = abfrage_begrenzen(abfrage);

        // Sortierspalte per Whitelist, nie aus Benutzereingabe interpoliert
        let sortier_spalte = match abfrage.sortierung {
            MitgliederSortierung::CreatedAt => "m.created_at",
            MitgliederSortierung::Email => "u.email",
            MitgliederSortierung::Role => "m.role",
        };
        let richtung = match abfrage.richtung {
            SortierRichtung::Asc => "ASC",
            SortierRichtung::Desc => "DESC",
        };

        let sql = format!(
            "SELECT m.id, m.organization_id, m.user_id, m.role, m.created_at,
                    u.name AS benutzer_name, u.email AS benutzer_email
             FROM memberships m
             JOIN users u ON u.id = m.user_id
             WHERE m.organization_id = ?
             ORDER BY {sortier_spalte} {richtung}
             LIMIT ? OFFSET ?"
        );

        let rows = sqlx::query(&sql)
            .bind(organization_id.to_string())
            .bind(abfrage.limit)
            .bind(abfrage.offset)
            .fetch_all(&self.pool)
            .await?;

        let eintraege: DbResult<Vec<MitgliedMitBenutzer>> = rows
            .iter()
            .map(|r| {
                Ok(MitgliedMitBenutzer {
                    mitgliedschaft: row_to_mitgliedschaft(r)?,
                    benutzer_name: r.try_get("benutzer_name")?,
                    benutzer_email: r.try_get("benutzer_email")?,
                })
            })
            .collect();

        let gesamt: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM memberships WHERE organization_id = ?")
                .bind(organization_id.to_string())
                .fetch_one(&self.pool)
                .await?;

        Ok(MitgliederSeite {
            eintraege: eintraege?,
            gesamt,
        })
    }

    async fn list_for_user(&self, user_id: Uuid) -> DbResult<Vec<MitgliedschaftRecord>> {
        let rows = sqlx::query(
            "SELECT id, organization_id, user_id, role, created_at
             FROM memberships WHERE user_id = ? ORDER BY created_at ASC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_mitgliedschaft).collect()
    }

    async fn upsert(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
        role: Rolle,
    ) -> DbResult<MitgliedschaftRecord> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO memberships (id, organization_id, user_id, role, created_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT (organization_id, user_id) DO UPDATE SET role = excluded.role",
        )
        .bind(id.to_string())
        .bind(organization_id.to_string())
        .bind(user_id.to_string())
        .bind(role.als_str())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        self.get_by_org_user(organization_id, user_id)
            .await?
            .ok_or_else(|| DbError::intern("Upsert-Mitgliedschaft nicht auffindbar".to_string()))
    }

    async fn update_role(&self, id: Uuid, role: Rolle) -> DbResult<MitgliedschaftRecord> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "SELECT id, organization_id, user_id, role, created_at
             FROM memberships WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::nicht_gefunden(format!("Mitgliedschaft {id}")))?;

        let bestehend = row_to_mitgliedschaft(&row)?;

        // Letzter Eigentuemer darf nicht herabgestuft werden
        if bestehend.role == Rolle::Eigentuemer && role != Rolle::Eigentuemer {
            let eigentuemer: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM memberships WHERE organization_id = ? AND role = 'owner'",
            )
            .bind(bestehend.organization_id.to_string())
            .fetch_one(&mut *tx)
            .await?;

            if eigentuemer <= 1 {
                tx.rollback().await?;
                return Err(DbError::LetzterEigentuemer);
            }
        }

        sqlx::query("UPDATE memberships SET role = ? WHERE id = ?")
            .bind(role.als_str())
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(MitgliedschaftRecord { role, ..bestehend })
    }

    async fn remove(&self, id: Uuid) -> DbResult<bool> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "SELECT id, organization_id, user_id, role, created_at
             FROM memberships WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&mut *tx)
        .await?;

        let bestehend = match row {
            None => return Ok(false),
            Some(r) => row_to_mitgliedschaft(&r)?,
        };

        if bestehend.role == Rolle::Eigentuemer {
            let eigentuemer: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM memberships WHERE organization_id = ? AND role = 'owner'",
            )
            .bind(bestehend.organization_id.to_string())
            .fetch_one(&mut *tx)
            .await?;

            if eigentuemer <= 1 {
                tx.rollback().await?;
                return Err(DbError::LetzterEigentuemer);
            }
        }

        sqlx::query("DELETE FROM memberships WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn count_owners(&self, organization_id: Uuid) -> DbResult<i64> {
        let anzahl: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM memberships WHERE organization_id = ? AND role = 'owner'",
        )
        .bind(organization_id.to_string())
        .fetch_one(&self.pool)
        .await?;
        Ok(anzahl)
    }
}

pub(crate) fn row_to_mitgliedschaft(row: &SqliteRow) -> DbResult<MitgliedschaftRecord> {
    let rolle_str: String = row.try_get("role")?;
    let role = Rolle::from_str(&rolle_str).map_err(DbError::Intern)?;

    Ok(MitgliedschaftRecord {
        id: parse_uuid(row, "id")?,
        organization_id: parse_uuid(row, "organization_id")?,
        user_id: parse_uuid(row, "user_id")?,
        role,
        created_at: parse_datetime(row, "created_at")?,
    })
}
