//! REST-Handler fuer Organisations-Endpunkte

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::org_fehler_antwort;
use crate::middleware::fehler_antwort;
use crate::{identitaet_aus_headers, AppState};

#[derive(Debug, Deserialize)]
pub struct OrganisationErstellenBody {
    pub name: String,
    pub slug: String,
}

pub async fn create_organization(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<OrganisationErstellenBody>,
) -> Response {
    let auth = match identitaet_aus_headers(&headers, &state).await {
        Ok(a) => a,
        Err(r) => return r,
    };
    match state
        .mitglieder
        .organisation_erstellen(&body.name, &body.slug, &auth.identitaet)
        .await
    {
        Ok(org) => {
            state.metriken.organizations_created_total.inc();
            (StatusCode::CREATED, Json(org)).into_response()
        }
        Err(e) => org_fehler_antwort(e),
    }
}

pub async fn list_organizations(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let auth = match identitaet_aus_headers(&headers, &state).await {
        Ok(a) => a,
        Err(r) => return r,
    };
    match state
        .mitglieder
        .organisationen_listen(auth.identitaet.id)
        .await
    {
        Ok(orgs) => (StatusCode::OK, Json(orgs)).into_response(),
        Err(e) => org_fehler_antwort(e),
    }
}

pub async fn get_organization(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    let auth = match identitaet_aus_headers(&headers, &state).await {
        Ok(a) => a,
        Err(r) => return r,
    };
    match state
        .mitglieder
        .organisation_laden(id, &auth.identitaet)
        .await
    {
        Ok(org) => (StatusCode::OK, Json(org)).into_response(),
        Err(e) => org_fehler_antwort(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct AktiveOrganisationBody {
    pub organization_id: Uuid,
}

/// PUT /v1/organizations/active – setzt die aktive Organisation der Session
pub async fn put_active(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<AktiveOrganisationBody>,
) -> Response {
    let auth = match identitaet_aus_headers(&headers, &state).await {
        Ok(a) => a,
        Err(r) => return r,
    };
    // Nur Organisationen waehlbar, in denen der Benutzer Mitglied ist
    match state
        .mitglieder
        .mitgliedschaft_holen(body.organization_id, auth.identitaet.id)
        .await
    {
        Ok(Some(_)) => {}
        Ok(None) => {
            return fehler_antwort(
                StatusCode::FORBIDDEN,
                "Keine Mitgliedschaft in der Organisation",
                403,
            )
        }
        Err(e) => return org_fehler_antwort(e),
    }

    state.aktive.setzen(&auth.token, body.organization_id).await;
    (
        StatusCode::OK,
        Json(json!({ "organization_id": body.organization_id })),
    )
        .into_response()
}

/// GET /v1/organizations/active – liefert die aktive Organisation oder null
///
/// Zeigt die Auswahl auf eine Organisation, in der der Benutzer inzwischen
/// kein Mitglied mehr ist, wird sie still zurueckgesetzt.
pub async fn get_active(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let auth = match identitaet_aus_headers(&headers, &state).await {
        Ok(a) => a,
        Err(r) => return r,
    };

    let Some(org_id) = state.aktive.holen(&auth.token).await else {
        return (StatusCode::OK, Json(json!({ "organization": null }))).into_response();
    };

    match state
        .mitglieder
        .mitgliedschaft_holen(org_id, auth.identitaet.id)
        .await
    {
        Ok(Some(_)) => {}
        Ok(None) => {
            state.aktive.zuruecksetzen(&auth.token).await;
            return (StatusCode::OK, Json(json!({ "organization": null }))).into_response();
        }
        Err(e) => return org_fehler_antwort(e),
    }

    match state
        .mitglieder
        .organisation_laden(org_id, &auth.identitaet)
        .await
    {
        Ok(org) => (StatusCode::OK, Json(json!({ "organization": org }))).into_response(),
        Err(e) => org_fehler_antwort(e),
    }
}

/// DELETE /v1/organizations/active – hebt die Auswahl auf
pub async fn delete_active(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let auth = match identitaet_aus_headers(&headers, &state).await {
        Ok(a) => a,
        Err(r) => return r,
    };
    state.aktive.zuruecksetzen(&auth.token).await;
    StatusCode::NO_CONTENT.into_response()
}
