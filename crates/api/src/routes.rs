//! Route-Definitionen fuer die REST-API (/v1/...)

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Erstellt den vollstaendigen /v1/-Router
pub fn v1_router() -> Router<AppState> {
    Router::new()
        // Benutzer
        .route("/v1/users/me", get(handlers::benutzer::get_me))
        // Aktive Organisation (statische Route vor :id)
        .route(
            "/v1/organizations/active",
            get(handlers::organisationen::get_active),
        )
        .route(
            "/v1/organizations/active",
            put(handlers::organisationen::put_active),
        )
        .route(
            "/v1/organizations/active",
            delete(handlers::organisationen::delete_active),
        )
        // Organisationen
        .route(
            "/v1/organizations",
            post(handlers::organisationen::create_organization),
        )
        .route(
            "/v1/organizations",
            get(handlers::organisationen::list_organizations),
        )
        .route(
            "/v1/organizations/:id",
            get(handlers::organisationen::get_organization),
        )
        // Mitglieder
        .route(
            "/v1/organizations/:id/members",
            get(handlers::mitglieder::list_members),
        )
        .route(
            "/v1/organizations/:id/members/:member_id",
            patch(handlers::mitglieder::update_member_role),
        )
        .route(
            "/v1/organizations/:id/members/:member_id",
            delete(handlers::mitglieder::remove_member),
        )
        .route(
            "/v1/organizations/:id/leave",
            post(handlers::mitglieder::leave_organization),
        )
        // Einladungen
        .route(
            "/v1/organizations/:id/invitations",
            post(handlers::einladungen::create_invitation),
        )
        .route(
            "/v1/organizations/:id/invitations",
            get(handlers::einladungen::list_invitations),
        )
        .route(
            "/v1/invitations/:id",
            get(handlers::einladungen::get_invitation),
        )
        .route(
            "/v1/invitations/:id/accept",
            post(handlers::einladungen::accept_invitation),
        )
        .route(
            "/v1/invitations/:id/reject",
            post(handlers::einladungen::reject_invitation),
        )
        .route(
            "/v1/invitations/:id/cancel",
            post(handlers::einladungen::cancel_invitation),
        )
}
