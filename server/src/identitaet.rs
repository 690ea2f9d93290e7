//! In-Memory Identity Store fuer Entwicklung und Tests
//!
//! Der produktive Identity Store ist ein externer Dienst; dieser Server
//! haelt fuer Entwicklung eine Token-zu-Identitaet-Tabelle im Speicher.
//! Tokens werden beim Registrieren generiert (URL-sicheres Base64) oder
//! aus der Konfiguration uebernommen.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rand::RngCore;
use tokio::sync::RwLock;
use uuid::Uuid;

use teamwerk_core::{Identitaet, IdentitaetsQuelle};

/// In-Memory-Implementierung der [`IdentitaetsQuelle`]
#[derive(Default)]
pub struct InMemoryIdentitaeten {
    identitaeten: RwLock<HashMap<String, Identitaet>>,
}

impl InMemoryIdentitaeten {
    pub fn neu() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registriert eine Identitaet und gibt den Zugriffs-Token zurueck
    ///
    /// Wird kein Token uebergeben, wird ein zufaelliger generiert.
    pub async fn registrieren(
        &self,
        email: &str,
        name: &str,
        token: Option<String>,
    ) -> (String, Identitaet) {
        let token = token.unwrap_or_else(token_generieren);
        let identitaet = Identitaet {
            id: Uuid::new_v4(),
            email: email.to_ascii_lowercase(),
            name: name.to_string(),
            email_verifiziert: true,
        };
        self.identitaeten
            .write()
            .await
            .insert(token.clone(), identitaet.clone());
        (token, identitaet)
    }

    pub async fn anzahl(&self) -> usize {
        self.identitaeten.read().await.len()
    }
}

#[async_trait]
impl IdentitaetsQuelle for InMemoryIdentitaeten {
    async fn aufloesen(&self, token: &str) -> Option<Identitaet> {
        self.identitaeten.read().await.get(token).cloned()
    }
}

/// Generiert einen kryptografisch sicheren Token (URL-sicheres Base64)
fn token_generieren() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64::Engine::encode(&base64::engine::general_purpose::URL_SAFE_NO_PAD, bytes)
}
