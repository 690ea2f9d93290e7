//! REST-Handler der Teamwerk-API

pub mod benutzer;
pub mod einladungen;
pub mod mitglieder;
pub mod organisationen;

use axum::http::StatusCode;
use axum::response::Response;
use serde::Deserialize;

use teamwerk_core::Rolle;

use crate::middleware::fehler_antwort;

/// Rollen-Feld im Request-Body
///
/// Clients mancher Bibliotheken senden Rollen als Array; Teamwerk kennt
/// genau eine Rolle pro Mitgliedschaft und weist Arrays mit 400 ab statt
/// still das erste Element zu nehmen.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RolleFeld {
    Eine(Rolle),
    Mehrere(Vec<Rolle>),
}

impl RolleFeld {
    pub fn einzeln(self) -> Result<Rolle, Response> {
        match self {
            RolleFeld::Eine(rolle) => Ok(rolle),
            RolleFeld::Mehrere(_) => Err(fehler_antwort(
                StatusCode::BAD_REQUEST,
                "Mehrfach-Rollen werden nicht unterstuetzt",
                400,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolle_als_string() {
        let feld: RolleFeld = serde_json::from_str("\"admin\"").unwrap();
        assert!(matches!(feld.einzeln(), Ok(Rolle::Admin)));
    }

    #[test]
    fn rollen_array_wird_abgewiesen() {
        let feld: RolleFeld = serde_json::from_str("[\"admin\", \"member\"]").unwrap();
        assert!(feld.einzeln().is_err());
    }
}
