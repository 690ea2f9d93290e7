//! REST-Handler fuer Einladungs-Endpunkte

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use teamwerk_org::EinladungMitDetails;

use crate::error::org_fehler_antwort;
use crate::handlers::RolleFeld;
use crate::{identitaet_aus_headers, AppState};

#[derive(Debug, Deserialize)]
pub struct EinladungErstellenBody {
    pub email: String,
    pub role: RolleFeld,
}

pub async fn create_invitation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(body): Json<EinladungErstellenBody>,
) -> Response {
    let auth = match identitaet_aus_headers(&headers, &state).await {
        Ok(a) => a,
        Err(r) => return r,
    };
    let rolle = match body.role.einzeln() {
        Ok(r) => r,
        Err(r) => return r,
    };
    match state
        .einladungen
        .erstellen(id, &body.email, rolle, &auth.identitaet)
        .await
    {
        Ok(einladung) => {
            state.metriken.invitations_created_total.inc();
            (StatusCode::CREATED, Json(einladung)).into_response()
        }
        Err(e) => org_fehler_antwort(e),
    }
}

pub async fn list_invitations(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    let auth = match identitaet_aus_headers(&headers, &state).await {
        Ok(a) => a,
        Err(r) => return r,
    };
    match state.einladungen.listen(id, &auth.identitaet).await {
        Ok(einladungen) => (StatusCode::OK, Json(einladungen)).into_response(),
        Err(e) => org_fehler_antwort(e),
    }
}

fn details_json(details: EinladungMitDetails) -> serde_json::Value {
    json!({
        "invitation": details.einladung,
        "organization_name": details.organisation_name,
        "organization_slug": details.organisation_slug,
        "inviter_email": details.einlader_email,
    })
}

/// GET /v1/invitations/:id – Kontext fuer die Annahme-Seite
pub async fn get_invitation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    let auth = match identitaet_aus_headers(&headers, &state).await {
        Ok(a) => a,
        Err(r) => return r,
    };
    // Details nur fuer den eingeladenen Benutzer selbst sichtbar
    match state.einladungen.laden_mit_details(id).await {
        Ok(details) => {
            if !details
                .einladung
                .email
                .eq_ignore_ascii_case(&auth.identitaet.email)
            {
                return org_fehler_antwort(teamwerk_org::OrgError::EmailAbweichung);
            }
            if details.einladung.status == teamwerk_core::EinladungsStatus::Abgelaufen {
                return org_fehler_antwort(teamwerk_org::OrgError::EinladungAbgelaufen);
            }
            (StatusCode::OK, Json(details_json(details))).into_response()
        }
        Err(e) => org_fehler_antwort(e),
    }
}

pub async fn accept_invitation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    let auth = match identitaet_aus_headers(&headers, &state).await {
        Ok(a) => a,
        Err(r) => return r,
    };
    match state.einladungen.annehmen(id, &auth.identitaet).await {
        Ok(mitgliedschaft) => {
            state.metriken.transition_zaehlen("accepted");
            state
                .metriken
                .membership_changes_total
                .with_label_values(&["joined"])
                .inc();
            (StatusCode::OK, Json(mitgliedschaft)).into_response()
        }
        Err(e) => org_fehler_antwort(e),
    }
}

pub async fn reject_invitation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    let auth = match identitaet_aus_headers(&headers, &state).await {
        Ok(a) => a,
        Err(r) => return r,
    };
    match state.einladungen.ablehnen(id, &auth.identitaet).await {
        Ok(()) => {
            state.metriken.transition_zaehlen("rejected");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => org_fehler_antwort(e),
    }
}

pub async fn cancel_invitation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    let auth = match identitaet_aus_headers(&headers, &state).await {
        Ok(a) => a,
        Err(r) => return r,
    };
    match state.einladungen.zurueckziehen(id, &auth.identitaet).await {
        Ok(einladung) => {
            state.metriken.transition_zaehlen("canceled");
            (StatusCode::OK, Json(einladung)).into_response()
        }
        Err(e) => org_fehler_antwort(e),
    }
}
