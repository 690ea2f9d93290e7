//! Integration-Tests fuer OrganisationRepository (In-Memory SQLite)

use teamwerk_core::Rolle;
use teamwerk_db::{
    models::{NeueOrganisation, NeuerBenutzer},
    MitgliedschaftRepository, OrganisationRepository, SqliteDb, UserRepository,
};

async fn db() -> SqliteDb {
    SqliteDb::in_memory().await.expect("In-Memory DB konnte nicht erstellt werden")
}

async fn erstelle_benutzer(db: &SqliteDb, email: &str) -> uuid::Uuid {
    UserRepository::create(db, NeuerBenutzer { id: uuid::Uuid::new_v4(), email, name: "Test", email_verified: true })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn organisation_erstellen_mit_eigentuemer() {
    let db = db().await;
    let owner_id = erstelle_benutzer(&db, "owner@x.com").await;

    let org = OrganisationRepository::create(
        &db,
        NeueOrganisation { name: "Acme", slug: "acme", owner_id },
    )
    .await
    .unwrap();

    assert_eq!(org.name, "Acme");
    assert_eq!(org.slug, "acme");

    // Eigentuemer-Mitgliedschaft wurde in derselben Transaktion angelegt
    let mitgliedschaft = MitgliedschaftRepository::get_by_org_user(&db, org.id, owner_id)
        .await
        .unwrap()
        .expect("Eigentuemer-Mitgliedschaft fehlt");
    assert_eq!(mitgliedschaft.role, Rolle::Eigentuemer);

    assert_eq!(MitgliedschaftRepository::count_owners(&db, org.id).await.unwrap(), 1);
}

#[tokio::test]
async fn slug_muss_eindeutig_sein() {
    let db = db().await;
    let owner_id = erstelle_benutzer(&db, "owner2@x.com").await;

    OrganisationRepository::create(
        &db,
        NeueOrganisation { name: "Erste", slug: "doppelt", owner_id },
    )
    .await
    .unwrap();

    let err = OrganisationRepository::create(
        &db,
        NeueOrganisation { name: "Zweite", slug: "doppelt", owner_id },
    )
    .await;

    assert!(err.is_err());
    assert!(err.unwrap_err().ist_eindeutigkeit());
}

#[tokio::test]
async fn laden_per_id_und_slug() {
    let db = db().await;
    let owner_id = erstelle_benutzer(&db, "owner3@x.com").await;

    let org = OrganisationRepository::create(
        &db,
        NeueOrganisation { name: "Laden", slug: "laden", owner_id },
    )
    .await
    .unwrap();

    let per_id = OrganisationRepository::get(&db, org.id).await.unwrap().unwrap();
    assert_eq!(per_id.slug, "laden");

    let per_slug = OrganisationRepository::get_by_slug(&db, "laden").await.unwrap().unwrap();
    assert_eq!(per_slug.id, org.id);

    assert!(OrganisationRepository::get_by_slug(&db, "fehlt").await.unwrap().is_none());
}

#[tokio::test]
async fn list_for_user_nur_eigene() {
    let db = db().await;
    let a = erstelle_benutzer(&db, "a@x.com").await;
    let b = erstelle_benutzer(&db, "b@x.com").await;

    OrganisationRepository::create(&db, NeueOrganisation { name: "A1", slug: "a1", owner_id: a })
        .await
        .unwrap();
    OrganisationRepository::create(&db, NeueOrganisation { name: "A2", slug: "a2", owner_id: a })
        .await
        .unwrap();
    OrganisationRepository::create(&db, NeueOrganisation { name: "B1", slug: "b1", owner_id: b })
        .await
        .unwrap();

    let orgs_a = OrganisationRepository::list_for_user(&db, a).await.unwrap();
    assert_eq!(orgs_a.len(), 2);

    let orgs_b = OrganisationRepository::list_for_user(&db, b).await.unwrap();
    assert_eq!(orgs_b.len(), 1);
    assert_eq!(orgs_b[0].slug, "b1");
}
