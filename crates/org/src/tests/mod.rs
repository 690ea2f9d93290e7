//! Service-Tests gegen eine In-Memory-SQLite-Instanz


use std::sync::Arc;

use uuid::Uuid;

use teamwerk_core::Identitaet;
use teamwerk_db::SqliteDb;

pub(crate) async fn test_db() -> Arc<SqliteDb> {
    Arc::new(
        SqliteDb::in_memory()
            .await
            .expect("In-Memory-DB konnte nicht geoeffnet werden"),
    )
}

pub(crate) fn identitaet(email: &str) -> Identitaet {
    Identitaet {
        id: Uuid::new_v4(),
        email: email.to_string(),
        name: email.split('@').next().unwrap_or("benutzer").to_string(),
        email_verifiziert: true,
    }
}
