//! End-to-End-Tests gegen den Axum-Router (In-Memory-SQLite)

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;
use uuid::Uuid;

use teamwerk_api::{AppState, RestServer, RestServerKonfig};
use teamwerk_observability::TeamwerkMetrics;
use teamwerk_core::{Identitaet, IdentitaetsQuelle, Rolle};
use teamwerk_db::SqliteDb;
use teamwerk_org::{
    AktiveOrganisationStore, EinladungService, EinladungsKonfig, LogVersand, MitgliedService,
};

/// Identity Store fuer Tests: feste Token-zu-Identitaet-Tabelle
struct TestIdentitaeten(HashMap<String, Identitaet>);

#[async_trait]
impl IdentitaetsQuelle for TestIdentitaeten {
    async fn aufloesen(&self, token: &str) -> Option<Identitaet> {
        self.0.get(token).cloned()
    }
}

struct TestUmgebung {
    router: Router,
    mitglieder: Arc<teamwerk_api::Mitglieder>,
    einladungen: Arc<teamwerk_api::Einladungen>,
    owner: Identitaet,
    gast: Identitaet,
}

fn identitaet(email: &str) -> Identitaet {
    Identitaet {
        id: Uuid::new_v4(),
        email: email.to_string(),
        name: email.split('@').next().unwrap_or("benutzer").to_string(),
        email_verifiziert: true,
    }
}

/// Baut Router + Services; "owner-token" und "gast-token" sind gueltig
async fn umgebung() -> TestUmgebung {
    umgebung_mit_konfig(EinladungsKonfig::default()).await
}

async fn umgebung_mit_konfig(konfig: EinladungsKonfig) -> TestUmgebung {
    let db = Arc::new(SqliteDb::in_memory().await.expect("In-Memory-DB"));

    let mitglieder = MitgliedService::neu(Arc::clone(&db), Arc::clone(&db), Arc::clone(&db));
    let einladungen = EinladungService::neu(
        Arc::clone(&db),
        Arc::clone(&db),
        Arc::clone(&db),
        Arc::clone(&db),
        Arc::new(LogVersand),
        konfig,
    );

    let owner = identitaet("owner@acme.example");
    let gast = identitaet("gast@acme.example");
    let mut tokens = HashMap::new();
    tokens.insert("owner-token".to_string(), owner.clone());
    tokens.insert("gast-token".to_string(), gast.clone());

    let state = AppState::neu(
        Arc::clone(&mitglieder),
        Arc::clone(&einladungen),
        AktiveOrganisationStore::neu(),
        Arc::new(TestIdentitaeten(tokens)),
        TeamwerkMetrics::neu().expect("Metriken-Registry"),
    );

    TestUmgebung {
        router: RestServer::neu(RestServerKonfig::default()).router(state),
        mitglieder,
        einladungen,
        owner,
        gast,
    }
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Legt ueber die Services eine Organisation des Owners an
async fn seed_org(umgebung: &TestUmgebung, slug: &str) -> Uuid {
    umgebung
        .mitglieder
        .benutzer_sicherstellen(&umgebung.owner)
        .await
        .unwrap();
    umgebung
        .mitglieder
        .organisation_erstellen("Testfirma", slug, &umgebung.owner)
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn health_ohne_auth_erreichbar() {
    let umgebung = umgebung().await;
    let antwort = umgebung
        .router
        .oneshot(request(Method::GET, "/health", None, None))
        .await
        .unwrap();
    assert_eq!(antwort.status(), StatusCode::OK);
}

#[tokio::test]
async fn fehlender_oder_falscher_token_ergibt_401() {
    let umgebung = umgebung().await;

    let ohne = umgebung
        .router
        .clone()
        .oneshot(request(Method::GET, "/v1/users/me", None, None))
        .await
        .unwrap();
    assert_eq!(ohne.status(), StatusCode::UNAUTHORIZED);

    let falsch = umgebung
        .router
        .oneshot(request(Method::GET, "/v1/users/me", Some("kaputt"), None))
        .await
        .unwrap();
    assert_eq!(falsch.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn organisation_erstellen_gibt_201() {
    let umgebung = umgebung().await;
    let antwort = umgebung
        .router
        .oneshot(request(
            Method::POST,
            "/v1/organizations",
            Some("owner-token"),
            Some(r#"{"name": "Testfirma", "slug": "acme"}"#),
        ))
        .await
        .unwrap();
    assert_eq!(antwort.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn ungueltiger_slug_gibt_400() {
    let umgebung = umgebung().await;
    let antwort = umgebung
        .router
        .oneshot(request(
            Method::POST,
            "/v1/organizations",
            Some("owner-token"),
            Some(r#"{"name": "Testfirma", "slug": "Acme Corp"}"#),
        ))
        .await
        .unwrap();
    assert_eq!(antwort.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rollen_array_wird_mit_400_abgewiesen() {
    let umgebung = umgebung().await;
    let org_id = seed_org(&umgebung, "acme").await;

    let antwort = umgebung
        .router
        .oneshot(request(
            Method::POST,
            &format!("/v1/organizations/{org_id}/invitations"),
            Some("owner-token"),
            Some(r#"{"email": "neu@acme.example", "role": ["admin", "member"]}"#),
        ))
        .await
        .unwrap();
    assert_eq!(antwort.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn einladungs_lebenszyklus_ueber_http() {
    let umgebung = umgebung().await;
    let org_id = seed_org(&umgebung, "acme").await;

    let einladung = umgebung
        .einladungen
        .erstellen(org_id, &umgebung.gast.email, Rolle::Mitglied, &umgebung.owner)
        .await
        .unwrap();

    // Details sind fuer den Eingeladenen sichtbar
    let details = umgebung
        .router
        .clone()
        .oneshot(request(
            Method::GET,
            &format!("/v1/invitations/{}", einladung.id),
            Some("gast-token"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(details.status(), StatusCode::OK);

    let annahme = umgebung
        .router
        .clone()
        .oneshot(request(
            Method::POST,
            &format!("/v1/invitations/{}/accept", einladung.id),
            Some("gast-token"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(annahme.status(), StatusCode::OK);

    // Zweite Annahme: Einladung ist terminal
    let nochmal = umgebung
        .router
        .oneshot(request(
            Method::POST,
            &format!("/v1/invitations/{}/accept", einladung.id),
            Some("gast-token"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(nochmal.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn fremde_annahme_gibt_403() {
    let umgebung = umgebung().await;
    let org_id = seed_org(&umgebung, "acme").await;

    let einladung = umgebung
        .einladungen
        .erstellen(org_id, "jemand@anders.example", Rolle::Mitglied, &umgebung.owner)
        .await
        .unwrap();

    let antwort = umgebung
        .router
        .oneshot(request(
            Method::POST,
            &format!("/v1/invitations/{}/accept", einladung.id),
            Some("gast-token"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(antwort.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn aktive_organisation_nur_mit_mitgliedschaft() {
    let umgebung = umgebung().await;
    let org_id = seed_org(&umgebung, "acme").await;

    // Gast ist kein Mitglied
    let verboten = umgebung
        .router
        .clone()
        .oneshot(request(
            Method::PUT,
            "/v1/organizations/active",
            Some("gast-token"),
            Some(&format!(r#"{{"organization_id": "{org_id}"}}"#)),
        ))
        .await
        .unwrap();
    assert_eq!(verboten.status(), StatusCode::FORBIDDEN);

    let gesetzt = umgebung
        .router
        .clone()
        .oneshot(request(
            Method::PUT,
            "/v1/organizations/active",
            Some("owner-token"),
            Some(&format!(r#"{{"organization_id": "{org_id}"}}"#)),
        ))
        .await
        .unwrap();
    assert_eq!(gesetzt.status(), StatusCode::OK);

    let geholt = umgebung
        .router
        .clone()
        .oneshot(request(
            Method::GET,
            "/v1/organizations/active",
            Some("owner-token"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(geholt.status(), StatusCode::OK);

    let geloescht = umgebung
        .router
        .oneshot(request(
            Method::DELETE,
            "/v1/organizations/active",
            Some("owner-token"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(geloescht.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn letzter_eigentuemer_kann_nicht_per_http_austreten() {
    let umgebung = umgebung().await;
    let org_id = seed_org(&umgebung, "acme").await;

    let antwort = umgebung
        .router
        .oneshot(request(
            Method::POST,
            &format!("/v1/organizations/{org_id}/leave"),
            Some("owner-token"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(antwort.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn abgelaufene_einladung_liefert_410() {
    let umgebung = umgebung_mit_konfig(EinladungsKonfig {
        ttl: chrono::Duration::seconds(-60),
        ..EinladungsKonfig::default()
    })
    .await;
    let org_id = seed_org(&umgebung, "acme").await;

    let einladung = umgebung
        .einladungen
        .erstellen(org_id, &umgebung.gast.email, Rolle::Mitglied, &umgebung.owner)
        .await
        .unwrap();

    let antwort = umgebung
        .router
        .clone()
        .oneshot(request(
            Method::GET,
            &format!("/v1/invitations/{}", einladung.id),
            Some("gast-token"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(antwort.status(), StatusCode::GONE);

    let annahme = umgebung
        .router
        .clone()
        .oneshot(request(
            Method::POST,
            &format!("/v1/invitations/{}/accept", einladung.id),
            Some("gast-token"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(annahme.status(), StatusCode::GONE);
}
