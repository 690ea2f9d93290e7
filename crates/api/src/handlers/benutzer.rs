//! REST-Handler fuer Benutzer-Endpunkte

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::error::org_fehler_antwort;
use crate::{identitaet_aus_headers, AppState};

/// GET /v1/users/me – aufgeloeste Identitaet samt Organisationen
pub async fn get_me(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let auth = match identitaet_aus_headers(&headers, &state).await {
        Ok(a) => a,
        Err(r) => return r,
    };
    let organisationen = match state
        .mitglieder
        .organisationen_listen(auth.identitaet.id)
        .await
    {
        Ok(orgs) => orgs,
        Err(e) => return org_fehler_antwort(e),
    };
    (
        StatusCode::OK,
        Json(json!({
            "user": auth.identitaet,
            "organizations": organisationen,
        })),
    )
        .into_response()
}
