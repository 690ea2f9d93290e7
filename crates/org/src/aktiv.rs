//! Aktive-Organisation-Auswahl pro Session
//!
//! Haelt fest, gegen welche Organisation eine Session gerade arbeitet.
//! Rein In-Memory und an das Session-Token gebunden; wird nie persistiert
//! und beim Logout zurueckgesetzt. Die Gueltigkeit (Session-Benutzer ist
//! tatsaechlich Mitglied) prueft der aufrufende Service vor dem Setzen
//! und bei jedem Lesen.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;
use uuid::Uuid;

/// In-Memory Store: Session-Token -> aktive Organisation
#[derive(Debug, Default)]
pub struct AktiveOrganisationStore {
    auswahl: RwLock<HashMap<String, Uuid>>,
}

impl AktiveOrganisationStore {
    /// Erstellt einen neuen leeren Store
    pub fn neu() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Setzt die aktive Organisation fuer eine Session
    pub async fn setzen(&self, token: &str, organization_id: Uuid) {
        self.auswahl.write().await.insert(token.to_string(), organization_id);
        tracing::debug!(organisation = %organization_id, "Aktive Organisation gesetzt");
    }

    /// Liest die aktive Organisation einer Session
    pub async fn holen(&self, token: &str) -> Option<Uuid> {
        self.auswahl.read().await.get(token).copied()
    }

    /// Setzt die Auswahl einer Session zurueck (z.B. beim Logout)
    pub async fn zuruecksetzen(&self, token: &str) {
        self.auswahl.write().await.remove(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn setzen_und_holen() {
        let store = AktiveOrganisationStore::neu();
        let org = Uuid::new_v4();

        assert!(store.holen("tok_a").await.is_none());
        store.setzen("tok_a", org).await;
        assert_eq!(store.holen("tok_a").await, Some(org));
        // Andere Session bleibt unberuehrt
        assert!(store.holen("tok_b").await.is_none());
    }

    #[tokio::test]
    async fn zuruecksetzen_beim_logout() {
        let store = AktiveOrganisationStore::neu();
        store.setzen("tok", Uuid::new_v4()).await;
        store.zuruecksetzen("tok").await;
        assert!(store.holen("tok").await.is_none());
    }
}
