//! teamwerk-db – Datenbank-Abstraktion
//!
//! Dieses Crate stellt das Mitgliedschafts-Ledger bereit: Organisationen,
//! Mitgliedschaften und Einladungen hinter Repository-Traits, implementiert
//! auf SQLite (sqlx). Die Invarianten des Ledgers (mindestens ein
//! Eigentuemer pro Organisation, hoechstens eine ausstehende Einladung pro
//! (Organisation, Email)) werden hier transaktional durchgesetzt.

pub mod error;
pub mod models;
pub mod repository;
pub mod sqlite;

pub use error::DbError;
pub use repository::{
    DatabaseConfig, DbResult, EinladungRepository, MitgliedschaftRepository,
    OrganisationRepository, UserRepository,
};
pub use sqlite::SqliteDb;
