//! REST-Handler fuer Mitglieder-Endpunkte

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use uuid::Uuid;

use teamwerk_db::models::{MitgliederAbfrage, MitgliederSortierung, SortierRichtung};

use crate::error::org_fehler_antwort;
use crate::handlers::RolleFeld;
use crate::{identitaet_aus_headers, AppState};

#[derive(Debug, Deserialize)]
pub struct MitgliederQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub sort: Option<MitgliederSortierung>,
    pub order: Option<SortierRichtung>,
}

impl MitgliederQuery {
    fn als_abfrage(&self) -> MitgliederAbfrage {
        let standard = MitgliederAbfrage::default();
        MitgliederAbfrage {
            limit: self.limit.unwrap_or(standard.limit),
            offset: self.offset.unwrap_or(standard.offset),
            sortierung: self.sort.unwrap_or(standard.sortierung),
            richtung: self.order.unwrap_or(standard.richtung),
        }
    }
}

pub async fn list_members(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<MitgliederQuery>,
    headers: HeaderMap,
) -> Response {
    let auth = match identitaet_aus_headers(&headers, &state).await {
        Ok(a) => a,
        Err(r) => return r,
    };
    match state
        .mitglieder
        .mitglieder_listen(id, &auth.identitaet, query.als_abfrage())
        .await
    {
        Ok(seite) => (StatusCode::OK, Json(seite)).into_response(),
        Err(e) => org_fehler_antwort(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct RolleAendernBody {
    pub role: RolleFeld,
}

pub async fn update_member_role(
    State(state): State<AppState>,
    Path((id, member_id)): Path<(Uuid, Uuid)>,
    headers: HeaderMap,
    Json(body): Json<RolleAendernBody>,
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
        .mitglieder
        .rolle_aendern(id, member_id, rolle, &auth.identitaet)
        .await
    {
        Ok(mitgliedschaft) => {
            state
                .metriken
                .membership_changes_total
                .with_label_values(&["role_changed"])
                .inc();
            (StatusCode::OK, Json(mitgliedschaft)).into_response()
        }
        Err(e) => org_fehler_antwort(e),
    }
}

pub async fn remove_member(
    State(state): State<AppState>,
    Path((id, member_id)): Path<(Uuid, Uuid)>,
    headers: HeaderMap,
) -> Response {
    let auth = match identitaet_aus_headers(&headers, &state).await {
        Ok(a) => a,
        Err(r) => return r,
    };
    match state
        .mitglieder
        .entfernen(id, member_id, &auth.identitaet)
        .await
    {
        Ok(()) => {
            state
                .metriken
                .membership_changes_total
                .with_label_values(&["removed"])
                .inc();
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => org_fehler_antwort(e),
    }
}

pub async fn leave_organization(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    let auth = match identitaet_aus_headers(&headers, &state).await {
        Ok(a) => a,
        Err(r) => return r,
    };
    match state.mitglieder.verlassen(id, &auth.identitaet).await {
        Ok(()) => {
            state
                .metriken
                .membership_changes_total
                .with_label_values(&["left"])
                .inc();
            // Zeigte die aktive Auswahl auf diese Organisation, aufheben
            if state.aktive.holen(&auth.token).await == Some(id) {
                state.aktive.zuruecksetzen(&auth.token).await;
            }
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => org_fehler_antwort(e),
    }
}
