//! Repository-Trait-Definitionen
//!
//! Das Repository-Pattern entkoppelt die Domaenen-Services von der konkreten
//! Datenbank-Implementierung. `SqliteDb` implementiert alle Traits; Tests
//! laufen gegen eine In-Memory-Instanz.
//!
//! Alle zusammengesetzten Schreiboperationen (Organisation + Eigentuemer,
//! Supersede + Neuanlage, Annahme + Mitgliedschaft) laufen in genau einer
//! Transaktion. Konkurrierende Mutationen am Mitgliederbestand einer
//! Organisation serialisieren sich darueber.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use teamwerk_core::{EinladungsStatus, Rolle};

use crate::error::DbError;
use crate::models::{
    BenutzerRecord, EinladungRecord, MitgliederAbfrage, MitgliederSeite, MitgliedschaftRecord,
    NeueEinladung, NeueOrganisation, NeuerBenutzer, OrganisationRecord,
};

/// Result-Alias fuer alle Repository-Operationen
pub type DbResult<T> = Result<T, DbError>;

/// Konfiguration fuer die Datenbankverbindung
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Verbindungs-URL (z.B. "sqlite://teamwerk.db")
    pub url: String,
    /// Maximale Anzahl gleichzeitiger Verbindungen im Pool
    pub max_verbindungen: u32,
    /// Ob WAL-Modus aktiviert werden soll
    pub sqlite_wal: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://teamwerk.db".into(),
            max_verbindungen: 5,
            sqlite_wal: true,
        }
    }
}

/// Repository fuer den Benutzer-Spiegel des Identity Store
#[allow(async_fn_in_trait)]
pub trait UserRepository: Send + Sync {
    /// Legt einen Benutzer-Spiegel an (Eindeutigkeitsfehler bei doppelter Email)
    async fn create(&self, data: NeuerBenutzer<'_>) -> DbResult<BenutzerRecord>;

    /// Laedt einen Benutzer anhand seiner ID
    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<BenutzerRecord>>;

    /// Laedt einen Benutzer anhand seiner Email-Adresse
    async fn get_by_email(&self, email: &str) -> DbResult<Option<BenutzerRecord>>;
}

/// Repository fuer Organisationen
#[allow(async_fn_in_trait)]
pub trait OrganisationRepository: Send + Sync {
    /// Erstellt Organisation und Eigentuemer-Mitgliedschaft in einer Transaktion
    ///
    /// Gibt `DbError::Eindeutigkeit` zurueck wenn der Slug bereits vergeben ist.
    async fn create(&self, data: NeueOrganisation<'_>) -> DbResult<OrganisationRecord>;

    /// Laedt eine Organisation anhand ihrer ID
    async fn get(&self, id: Uuid) -> DbResult<Option<OrganisationRecord>>;

    /// Laedt eine Organisation anhand ihres Slugs
    async fn get_by_slug(&self, slug: &str) -> DbResult<Option<OrganisationRecord>>;

    /// Listet alle Organisationen in denen der Benutzer Mitglied ist
    async fn list_for_user(&self, user_id: Uuid) -> DbResult<Vec<OrganisationRecord>>;
}

/// Repository fuer Mitgliedschaften
#[allow(async_fn_in_trait)]
pub trait MitgliedschaftRepository: Send + Sync {
    /// Laedt eine Mitgliedschaft anhand ihrer ID
    async fn get(&self, id: Uuid) -> DbResult<Option<MitgliedschaftRecord>>;

    /// Laedt die Mitgliedschaft eines Benutzers in einer Organisation
    async fn get_by_org_user(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> DbResult<Option<MitgliedschaftRecord>>;

    /// Listet Mitglieder einer Organisation (mit Benutzer-Stammdaten, paginiert)
    async fn list_for_org(
        &self,
        organization_id: Uuid,
        abfrage: &MitgliederAbfrage,
    ) -> DbResult<MitgliederSeite>;

    /// Listet alle Mitgliedschaften eines Benutzers
    async fn list_for_user(&self, user_id: Uuid) -> DbResult<Vec<MitgliedschaftRecord>>;

    /// Legt eine Mitgliedschaft an oder aktualisiert die Rolle falls vorhanden
    ///
    /// Idempotent: eine wiederholte Annahme derselben Einladung erzeugt nie
    /// ein Duplikat.
    async fn upsert(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
        role: Rolle,
    ) -> DbResult<MitgliedschaftRecord>;

    /// Aendert die Rolle einer Mitgliedschaft
    ///
    /// Gibt `DbError::LetzterEigentuemer` zurueck wenn dadurch der letzte
    /// Eigentuemer herabgestuft wuerde.
    async fn update_role(&self, id: Uuid, role: Rolle) -> DbResult<MitgliedschaftRecord>;

    /// Entfernt eine Mitgliedschaft
    ///
    /// Gibt `DbError::LetzterEigentuemer` zurueck wenn dadurch der letzte
    /// Eigentuemer entfernt wuerde.
    async fn remove(&self, id: Uuid) -> DbResult<bool>;

    /// Zaehlt die Eigentuemer einer Organisation
    async fn count_owners(&self, organization_id: Uuid) -> DbResult<i64>;
}

/// Repository fuer Einladungen
#[allow(async_fn_in_trait)]
pub trait EinladungRepository: Send + Sync {
    /// Erstellt eine ausstehende Einladung
    ///
    /// Eine bereits ausstehende Einladung fuer dasselbe (Organisation, Email)-
    /// Paar wird in derselben Transaktion auf `canceled` gesetzt (Supersede
    /// beim Resend) – es existiert danach genau eine ausstehende Einladung.
    async fn create_pending(&self, data: NeueEinladung<'_>) -> DbResult<EinladungRecord>;

    /// Laedt eine Einladung anhand ihrer ID
    async fn get(&self, id: Uuid) -> DbResult<Option<EinladungRecord>>;

    /// Listet alle Einladungen einer Organisation (neueste zuerst)
    async fn list_for_org(&self, organization_id: Uuid) -> DbResult<Vec<EinladungRecord>>;

    /// Fuehrt eine bewachte Statustransition aus (`UPDATE ... WHERE status = von`)
    ///
    /// Gibt `false` zurueck wenn eine konkurrierende Transition gewonnen hat;
    /// terminale Zustaende werden dadurch nie verlassen.
    async fn mark_transition(
        &self,
        id: Uuid,
        von: EinladungsStatus,
        zu: EinladungsStatus,
    ) -> DbResult<bool>;

    /// Nimmt eine Einladung an: bewachte Transition `pending -> accepted` plus
    /// Mitgliedschafts-Upsert in einer Transaktion
    ///
    /// Gibt `None` zurueck wenn die Einladung nicht mehr ausstehend war.
    async fn accept_with_membership(
        &self,
        id: Uuid,
        user_id: Uuid,
        jetzt: DateTime<Utc>,
    ) -> DbResult<Option<MitgliedschaftRecord>>;
}

/// Prueft Limit/Offset auf sinnvolle Grenzen
pub fn abfrage_begrenzen(abfrage: &MitgliederAbfrage) -> MitgliederAbfrage {
    MitgliederAbfrage {
        limit: abfrage.limit.clamp(1, 500),
        offset: abfrage.offset.max(0),
        ..abfrage.clone()
    }
}
