//! Boundary zum externen Identity Store
//!
//! Teamwerk erzeugt und validiert selbst keine Anmeldedaten. Der Identity
//! Store loest ein opakes Session-Token zu einer stabilen Identitaet auf;
//! alles Weitere (Passwort-Hashing, Token-Ausgabe) liegt ausserhalb.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Aufgeloeste Identitaet einer Session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identitaet {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub email_verifiziert: bool,
}

/// Boundary-Trait: loest ein Session-Token zu einer Identitaet auf
///
/// `None` bedeutet: Token unbekannt oder abgelaufen. Mehr Detail gibt der
/// Identity Store nicht preis.
#[async_trait]
pub trait IdentitaetsQuelle: Send + Sync {
    async fn aufloesen(&self, token: &str) -> Option<Identitaet>;
}
