//! Integration-Tests fuer EinladungRepository (In-Memory SQLite)

use chrono::{Duration, Utc};
use teamwerk_core::{EinladungsStatus, Rolle};
use teamwerk_db::{
    models::{NeueEinladung, NeueOrganisation, NeuerBenutzer},
    EinladungRepository, MitgliedschaftRepository, OrganisationRepository, SqliteDb,
    UserRepository,
};

async fn db() -> SqliteDb {
    SqliteDb::in_memory().await.expect("In-Memory DB konnte nicht erstellt werden")
}

async fn erstelle_benutzer(db: &SqliteDb, email: &str) -> uuid::Uuid {
    UserRepository::create(db, NeuerBenutzer { id: uuid::Uuid::new_v4(), email, name: email, email_verified: true })
        .await
        .unwrap()
        .id
}

async fn erstelle_org(db: &SqliteDb, slug: &str, owner_id: uuid::Uuid) -> uuid::Uuid {
    OrganisationRepository::create(db, NeueOrganisation { name: slug, slug, owner_id })
        .await
        .unwrap()
        .id
}

fn neue_einladung<'a>(
    org: uuid::Uuid,
    email: &'a str,
    einlader: uuid::Uuid,
) -> NeueEinladung<'a> {
    NeueEinladung {
        organization_id: org,
        email,
        role: Rolle::Mitglied,
        inviter_user_id: einlader,
        expires_at: Utc::now() + Duration::days(7),
    }
}

#[tokio::test]
async fn einladung_erstellen_und_laden() {
    let db = db().await;
    let owner = erstelle_benutzer(&db, "owner@x.com").await;
    let org = erstelle_org(&db, "acme", owner).await;

    let einladung = EinladungRepository::create_pending(
        &db,
        neue_einladung(org, "gast@x.com", owner),
    )
    .await
    .unwrap();

    assert_eq!(einladung.status, EinladungsStatus::Ausstehend);
    assert_eq!(einladung.email, "gast@x.com");

    let geladen = EinladungRepository::get(&db, einladung.id).await.unwrap().unwrap();
    assert_eq!(geladen.id, einladung.id);
    assert_eq!(geladen.role, Rolle::Mitglied);
}

#[tokio::test]
async fn resend_supersediert_vorherige_ausstehende() {
    let db = db().await;
    let owner = erstelle_benutzer(&db, "owner2@x.com").await;
    let org = erstelle_org(&db, "resend", owner).await;

    let erste = EinladungRepository::create_pending(
        &db,
        neue_einladung(org, "dave@x.com", owner),
    )
    .await
    .unwrap();

    let zweite = EinladungRepository::create_pending(
        &db,
        neue_einladung(org, "dave@x.com", owner),
    )
    .await
    .unwrap();

    // Erste wurde zurueckgezogen, nur die zweite ist ausstehend
    let erste_neu = EinladungRepository::get(&db, erste.id).await.unwrap().unwrap();
    assert_eq!(erste_neu.status, EinladungsStatus::Zurueckgezogen);

    let zweite_neu = EinladungRepository::get(&db, zweite.id).await.unwrap().unwrap();
    assert_eq!(zweite_neu.status, EinladungsStatus::Ausstehend);

    let alle = EinladungRepository::list_for_org(&db, org).await.unwrap();
    let ausstehend: Vec<_> = alle
        .iter()
        .filter(|e| e.email == "dave@x.com" && e.status == EinladungsStatus::Ausstehend)
        .collect();
    assert_eq!(ausstehend.len(), 1);
}

#[tokio::test]
async fn bewachte_transition_gewinnt_nur_einmal() {
    let db = db().await;
    let owner = erstelle_benutzer(&db, "owner3@x.com").await;
    let org = erstelle_org(&db, "guard", owner).await;

    let einladung = EinladungRepository::create_pending(
        &db,
        neue_einladung(org, "carol@x.com", owner),
    )
    .await
    .unwrap();

    let erste = EinladungRepository::mark_transition(
        &db,
        einladung.id,
        EinladungsStatus::Ausstehend,
        EinladungsStatus::Zurueckgezogen,
    )
    .await
    .unwrap();
    assert!(erste);

    // Zweite Transition aus demselben Ausgangszustand verliert
    let zweite = EinladungRepository::mark_transition(
        &db,
        einladung.id,
        EinladungsStatus::Ausstehend,
        EinladungsStatus::Abgelaufen,
    )
    .await
    .unwrap();
    assert!(!zweite);

    let danach = EinladungRepository::get(&db, einladung.id).await.unwrap().unwrap();
    assert_eq!(danach.status, EinladungsStatus::Zurueckgezogen);
}

#[tokio::test]
async fn annahme_erzeugt_mitgliedschaft_atomar() {
    let db = db().await;
    let owner = erstelle_benutzer(&db, "owner4@x.com").await;
    let bob = erstelle_benutzer(&db, "bob@x.com").await;
    let org = erstelle_org(&db, "accept", owner).await;

    let einladung = EinladungRepository::create_pending(
        &db,
        NeueEinladung {
            organization_id: org,
            email: "bob@x.com",
            role: Rolle::Admin,
            inviter_user_id: owner,
            expires_at: Utc::now() + Duration::days(7),
        },
    )
    .await
    .unwrap();

    let mitgliedschaft =
        EinladungRepository::accept_with_membership(&db, einladung.id, bob, Utc::now())
            .await
            .unwrap()
            .expect("Annahme muss gelingen");

    assert_eq!(mitgliedschaft.organization_id, org);
    assert_eq!(mitgliedschaft.user_id, bob);
    assert_eq!(mitgliedschaft.role, Rolle::Admin);

    let danach = EinladungRepository::get(&db, einladung.id).await.unwrap().unwrap();
    assert_eq!(danach.status, EinladungsStatus::Angenommen);

    // Wiederholte Annahme verliert die bewachte Transition
    let nochmal =
        EinladungRepository::accept_with_membership(&db, einladung.id, bob, Utc::now())
            .await
            .unwrap();
    assert!(nochmal.is_none());

    // Keine doppelte Mitgliedschaft entstanden
    assert!(MitgliedschaftRepository::get_by_org_user(&db, org, bob).await.unwrap().is_some());
}

#[tokio::test]
async fn annahme_nach_ruecknahme_schlaegt_fehl() {
    let db = db().await;
    let owner = erstelle_benutzer(&db, "owner5@x.com").await;
    let eva = erstelle_benutzer(&db, "eva@x.com").await;
    let org = erstelle_org(&db, "storniert", owner).await;

    let einladung = EinladungRepository::create_pending(
        &db,
        neue_einladung(org, "eva@x.com", owner),
    )
    .await
    .unwrap();

    EinladungRepository::mark_transition(
        &db,
        einladung.id,
        EinladungsStatus::Ausstehend,
        EinladungsStatus::Zurueckgezogen,
    )
    .await
    .unwrap();

    let ergebnis =
        EinladungRepository::accept_with_membership(&db, einladung.id, eva, Utc::now())
            .await
            .unwrap();
    assert!(ergebnis.is_none());

    // Keine Mitgliedschaft entstanden
    assert!(MitgliedschaftRepository::get_by_org_user(&db, org, eva).await.unwrap().is_none());
}
