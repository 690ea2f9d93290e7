//! Datenbankmodelle fuer Teamwerk
//!
//! Diese Typen repraesentieren Datensaetze aus der Datenbank.
//! Sie sind von den API-Formen getrennt und dienen als reine
//! Datenuebertragungsobjekte.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use teamwerk_core::{EinladungsStatus, Rolle};

// ---------------------------------------------------------------------------
// Benutzer
// ---------------------------------------------------------------------------

/// Benutzer-Datensatz aus der Datenbank
///
/// Benutzer gehoeren dem externen Identity Store; Teamwerk referenziert sie
/// nur (Mitgliedschaften, Einladungs-Email-Abgleich) und mutiert sie nie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenutzerRecord {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Daten zum Anlegen eines Benutzer-Spiegels
///
/// Die `id` kommt vom Identity Store und wird unveraendert uebernommen,
/// damit Mitgliedschaften dieselbe Benutzer-ID referenzieren wie die
/// aufgeloesten Identitaeten.
#[derive(Debug, Clone)]
pub struct NeuerBenutzer<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub name: &'a str,
    pub email_verified: bool,
}

// ---------------------------------------------------------------------------
// Organisationen
// ---------------------------------------------------------------------------

/// Organisations-Datensatz
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganisationRecord {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

/// Daten zum Erstellen einer Organisation
///
/// `owner_id` wird in derselben Transaktion als Eigentuemer-Mitgliedschaft
/// angelegt; eine Organisation ohne Eigentuemer ist zu keinem Zeitpunkt
/// sichtbar.
#[derive(Debug, Clone)]
pub struct NeueOrganisation<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    pub owner_id: Uuid,
}

// ---------------------------------------------------------------------------
// Mitgliedschaften
// ---------------------------------------------------------------------------

/// Mitgliedschafts-Datensatz (Benutzer x Organisation x Rolle)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MitgliedschaftRecord {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub role: Rolle,
    pub created_at: DateTime<Utc>,
}

/// Mitgliedschaft inklusive Benutzer-Stammdaten (fuer Mitgliederlisten)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MitgliedMitBenutzer {
    #[serde(flatten)]
    pub mitgliedschaft: MitgliedschaftRecord,
    pub benutzer_name: String,
    pub benutzer_email: String,
}

/// Sortierfeld fuer Mitgliederlisten
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MitgliederSortierung {
    CreatedAt,
    Email,
    Role,
}

/// Sortierrichtung
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortierRichtung {
    Asc,
    Desc,
}

/// Abfrage-Parameter fuer Mitgliederlisten (reine Durchreich-Konfiguration)
#[derive(Debug, Clone)]
pub struct MitgliederAbfrage {
    pub limit: i64,
    pub offset: i64,
    pub sortierung: MitgliederSortierung,
    pub richtung: SortierRichtung,
}

impl Default for MitgliederAbfrage {
    fn default() -> Self {
        Self {
            limit: 100,
            offset: 0,
            sortierung: MitgliederSortierung::CreatedAt,
            richtung: SortierRichtung::Asc,
        }
    }
}

/// Eine Seite einer Mitgliederliste samt Gesamtanzahl
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MitgliederSeite {
    pub eintraege: Vec<MitgliedMitBenutzer>,
    pub gesamt: i64,
}

// ---------------------------------------------------------------------------
// Einladungen
// ---------------------------------------------------------------------------

/// Einladungs-Datensatz
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EinladungRecord {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub email: String,
    pub role: Rolle,
    pub status: EinladungsStatus,
    pub inviter_user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl EinladungRecord {
    /// Gibt `true` zurueck wenn die Einladung zum Zeitpunkt `jetzt`
    /// rechnerisch abgelaufen ist (unabhaengig vom persistierten Status)
    pub fn ist_abgelaufen(&self, jetzt: DateTime<Utc>) -> bool {
        jetzt > self.expires_at
    }
}

/// Daten zum Erstellen einer Einladung
#[derive(Debug, Clone)]
pub struct NeueEinladung<'a> {
    pub organization_id: Uuid,
    pub email: &'a str,
    pub role: Rolle,
    pub inviter_user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}
