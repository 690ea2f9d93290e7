//! HTTP-Interface fuer Teamwerk
//!
//! Duenne Schicht ueber den Organisations-Services: Handler extrahieren
//! Identitaet und Parameter, delegieren an die Services und uebersetzen
//! [`OrgError`] in HTTP-Statuscodes. Fachlogik lebt ausschliesslich in
//! `teamwerk-org`.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;

use std::sync::Arc;

use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;

use teamwerk_core::{Identitaet, IdentitaetsQuelle};
use teamwerk_db::SqliteDb;
use teamwerk_observability::TeamwerkMetrics;
use teamwerk_org::{AktiveOrganisationStore, EinladungService, MitgliedService};

use crate::middleware::{bearer_token, fehler_antwort};

/// Konkrete Service-Typen des Servers (alle Repositories auf SQLite)
pub type Mitglieder = MitgliedService<SqliteDb, SqliteDb, SqliteDb>;
pub type Einladungen = EinladungService<SqliteDb, SqliteDb, SqliteDb, SqliteDb>;

/// Axum-State fuer die Teamwerk-API
#[derive(Clone)]
pub struct AppState {
    pub mitglieder: Arc<Mitglieder>,
    pub einladungen: Arc<Einladungen>,
    pub aktive: Arc<AktiveOrganisationStore>,
    pub identitaet: Arc<dyn IdentitaetsQuelle>,
    pub metriken: TeamwerkMetrics,
}

impl AppState {
    pub fn neu(
        mitglieder: Arc<Mitglieder>,
        einladungen: Arc<Einladungen>,
        aktive: Arc<AktiveOrganisationStore>,
        identitaet: Arc<dyn IdentitaetsQuelle>,
        metriken: TeamwerkMetrics,
    ) -> Self {
        Self {
            mitglieder,
            einladungen,
            aktive,
            identitaet,
            metriken,
        }
    }
}

/// Aufgeloeste Identitaet samt Session-Token des Requests
pub struct AuthKontext {
    pub identitaet: Identitaet,
    pub token: String,
}

/// Loest den Bearer-Token ueber den Identity Store auf
///
/// Spiegelt den Benutzer beim ersten Kontakt ins Ledger, damit
/// Mitgliedschaften und Einladungs-Abgleich dieselbe Benutzer-ID sehen.
pub async fn identitaet_aus_headers(
    headers: &HeaderMap,
    state: &AppState,
) -> Result<AuthKontext, Response> {
    let token = bearer_token(headers).ok_or_else(|| {
        fehler_antwort(
            StatusCode::UNAUTHORIZED,
            "Authorization-Header fehlt",
            401,
        )
    })?;

    let identitaet = state.identitaet.aufloesen(token).await.ok_or_else(|| {
        fehler_antwort(
            StatusCode::UNAUTHORIZED,
            "Ungueltiger oder abgelaufener Token",
            401,
        )
    })?;

    state
        .mitglieder
        .benutzer_sicherstellen(&identitaet)
        .await
        .map_err(error::org_fehler_antwort)?;

    Ok(AuthKontext {
        identitaet,
        token: token.to_string(),
    })
}

pub use server::{RestServer, RestServerKonfig};
