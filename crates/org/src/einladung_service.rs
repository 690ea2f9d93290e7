//! Einladungs-Lebenszyklus fuer Teamwerk
//!
//! Zustandsmaschine pro Einladung:
//! `pending -> {accepted, rejected, canceled, expired}` – alle vier
//! Zielzustaende sind terminal. Der Ablauf wird lazy beim Lesen ausgewertet
//! und dabei persistiert (kein Hintergrund-Sweep); fuer den Aufrufer
//! verhaelt sich die Einladung als waere sie exakt zu `expires_at` gekippt.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use teamwerk_core::{EinladungsStatus, Identitaet, Rolle};
use teamwerk_db::{
    models::{EinladungRecord, MitgliedschaftRecord, NeueEinladung},
    repository::{
        EinladungRepository, MitgliedschaftRepository, OrganisationRepository, UserRepository,
    },
};

use crate::error::{OrgError, OrgResult};
use crate::policy::{ist_erlaubt, Aktion};
use crate::versand::{versand_abfeuern, EinladungsVersand, VersandDienst};

/// Standard-Lebensdauer einer Einladung: 7 Tage
const EINLADUNG_TTL_TAGE: i64 = 7;

/// Konfiguration des Einladungs-Service
#[derive(Debug, Clone)]
pub struct EinladungsKonfig {
    /// Lebensdauer neuer Einladungen
    pub ttl: Duration,
    /// Basis-URL fuer Accept-Links (Frontend-Route `/accept-invitation/{id}`)
    pub accept_link_basis: String,
}

impl Default for EinladungsKonfig {
    fn default() -> Self {
        Self {
            ttl: Duration::days(EINLADUNG_TTL_TAGE),
            accept_link_basis: "http://localhost:5173".into(),
        }
    }
}

/// Einladung samt Kontext fuer die Anzeige beim Empfaenger
#[derive(Debug, Clone)]
pub struct EinladungMitDetails {
    pub einladung: EinladungRecord,
    pub organisation_name: String,
    pub organisation_slug: String,
    pub einlader_email: Option<String>,
}

/// Einladungs-Service – Zustandsmaschine und Autorisierungs-Gate
pub struct EinladungService<E, M, O, U>
where
    E: EinladungRepository,
    M: MitgliedschaftRepository,
    O: OrganisationRepository,
    U: UserRepository,
{
    einladung_repo: Arc<E>,
    mitglied_repo: Arc<M>,
    org_repo: Arc<O>,
    user_repo: Arc<U>,
    versand: Arc<dyn VersandDienst>,
    konfig: EinladungsKonfig,
}

impl<E, M, O, U> EinladungService<E, M, O, U>
where
    E: EinladungRepository,
    M: MitgliedschaftRepository,
    O: OrganisationRepository,
    U: UserRepository,
{
    /// Erstellt einen neuen EinladungService
    pub fn neu(
        einladung_repo: Arc<E>,
        mitglied_repo: Arc<M>,
        org_repo: Arc<O>,
        user_repo: Arc<U>,
        versand: Arc<dyn VersandDienst>,
        konfig: EinladungsKonfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            einladung_repo,
            mitglied_repo,
            org_repo,
            user_repo,
            versand,
            konfig,
        })
    }

    /// Spricht eine Einladung aus (oder versendet sie erneut)
    ///
    /// Eine bereits ausstehende Einladung an dieselbe Adresse wird
    /// supersediert statt dupliziert. Der Linkversand ist Best-Effort und
    /// passiert nach dem Commit.
    pub async fn erstellen(
        &self,
        organization_id: Uuid,
        email: &str,
        role: Rolle,
        einlader: &Identitaet,
    ) -> OrgResult<EinladungRecord> {
        let email = email.trim().to_ascii_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(OrgError::UngueltigeEingabe(format!(
                "Keine gueltige Email-Adresse: '{email}'"
            )));
        }

        let organisation = self
            .org_repo
            .get(organization_id)
            .await?
            .ok_or_else(|| OrgError::NichtGefunden(format!("Organisation {organization_id}")))?;

        let einlader_mitgliedschaft = self
            .mitglied_repo
            .get_by_org_user(organization_id, einlader.id)
            .await?
            .ok_or_else(|| {
                OrgError::ZugriffVerweigert("Einlader ist kein Mitglied der Organisation".into())
            })?;

        if !ist_erlaubt(einlader_mitgliedschaft.role, Aktion::Einladen(role)) {
            return Err(OrgError::ZugriffVerweigert(format!(
                "Rolle '{}' darf keine Einladung als '{role}' aussprechen",
                einlader_mitgliedschaft.role
            )));
        }

        // Bereits-Mitglied-Pruefung ueber die Email-Adresse
        if let Some(benutzer) = self.user_repo.get_by_email(&email).await? {
            if self
                .mitglied_repo
                .get_by_org_user(organization_id, benutzer.id)
                .await?
                .is_some()
            {
                return Err(OrgError::Konflikt(format!(
                    "'{email}' ist bereits Mitglied der Organisation"
                )));
            }
        }

        let einladung = self
            .einladung_repo
            .create_pending(NeueEinladung {
                organization_id,
                email: &email,
                role,
                inviter_user_id: einlader.id,
                expires_at: Utc::now() + self.konfig.ttl,
            })
            .await?;

        tracing::info!(
            einladung_id = %einladung.id,
            organisation = %organisation.slug,
            empfaenger = %email,
            rolle = %role,
            "Einladung erstellt"
        );

        versand_abfeuern(
            Arc::clone(&self.versand),
            EinladungsVersand {
                empfaenger_email: email,
                einlader_name: einlader.name.clone(),
                einlader_email: einlader.email.clone(),
                organisation_name: organisation.name,
                accept_link: self.accept_link(einladung.id),
            },
        );

        Ok(einladung)
    }

    /// Nimmt eine Einladung an und erzeugt die Mitgliedschaft
    ///
    /// Idempotent gegenueber bestehenden Mitgliedschaften: existiert fuer
    /// (Organisation, Benutzer) bereits ein Eintrag, wird nur die Rolle
    /// aktualisiert, nie dupliziert.
    pub async fn annehmen(
        &self,
        einladung_id: Uuid,
        identitaet: &Identitaet,
    ) -> OrgResult<MitgliedschaftRecord> {
        let einladung = self.laden_mit_ablauf(einladung_id).await?;

        match einladung.status {
            EinladungsStatus::Ausstehend => {}
            EinladungsStatus::Abgelaufen => return Err(OrgError::EinladungAbgelaufen),
            status => return Err(OrgError::UngueltigerZustand(status.to_string())),
        }

        if !einladung.email.eq_ignore_ascii_case(&identitaet.email) {
            tracing::warn!(
                einladung_id = %einladung_id,
                "Annahme-Versuch mit abweichender Email abgewiesen"
            );
            return Err(OrgError::EmailAbweichung);
        }

        let mitgliedschaft = self
            .einladung_repo
            .accept_with_membership(einladung_id, identitaet.id, Utc::now())
            .await?
            .ok_or_else(|| {
                // Konkurrierende Transition hat gewonnen
                OrgError::UngueltigerZustand("Einladung ist nicht mehr ausstehend".into())
            })?;

        tracing::info!(
            einladung_id = %einladung_id,
            user_id = %identitaet.id,
            rolle = %mitgliedschaft.role,
            "Einladung angenommen"
        );

        Ok(mitgliedschaft)
    }

    /// Lehnt eine Einladung ab
    pub async fn ablehnen(&self, einladung_id: Uuid, identitaet: &Identitaet) -> OrgResult<()> {
        let einladung = self.laden_mit_ablauf(einladung_id).await?;

        match einladung.status {
            EinladungsStatus::Ausstehend => {}
            EinladungsStatus::Abgelaufen => return Err(OrgError::EinladungAbgelaufen),
            status => return Err(OrgError::UngueltigerZustand(status.to_string())),
        }

        if !einladung.email.eq_ignore_ascii_case(&identitaet.email) {
            return Err(OrgError::EmailAbweichung);
        }

        let uebergegangen = self
            .einladung_repo
            .mark_transition(
                einladung_id,
                EinladungsStatus::Ausstehend,
                EinladungsStatus::Abgelehnt,
            )
            .await?;

        if !uebergegangen {
            return Err(OrgError::UngueltigerZustand(
                "Einladung ist nicht mehr ausstehend".into(),
            ));
        }

        tracing::info!(einladung_id = %einladung_id, "Einladung abgelehnt");
        Ok(())
    }

    /// Zieht eine ausstehende Einladung zurueck
    ///
    /// Gleiches Autorisierungs-Gate wie das Aussprechen der Einladung mit
    /// derselben Zielrolle.
    pub async fn zurueckziehen(
        &self,
        einladung_id: Uuid,
        akteur: &Identitaet,
    ) -> OrgResult<EinladungRecord> {
        let einladung = self.laden_mit_ablauf(einladung_id).await?;

        // Autorisierung vor der Zustandspruefung: Nicht-Mitglieder erfahren
        // den Einladungszustand nicht.
        let akteur_mitgliedschaft = self
            .mitglied_repo
            .get_by_org_user(einladung.organization_id, akteur.id)
            .await?
            .ok_or_else(|| {
                OrgError::ZugriffVerweigert("Akteur ist kein Mitglied der Organisation".into())
            })?;

        if !ist_erlaubt(akteur_mitgliedschaft.role, Aktion::Einladen(einladung.role)) {
            return Err(OrgError::ZugriffVerweigert(format!(
                "Rolle '{}' darf Einladungen als '{}' nicht zurueckziehen",
                akteur_mitgliedschaft.role, einladung.role
            )));
        }

        if einladung.status != EinladungsStatus::Ausstehend {
            return Err(OrgError::UngueltigerZustand(einladung.status.to_string()));
        }

        let uebergegangen = self
            .einladung_repo
            .mark_transition(
                einladung_id,
                EinladungsStatus::Ausstehend,
                EinladungsStatus::Zurueckgezogen,
            )
            .await?;

        if !uebergegangen {
            return Err(OrgError::UngueltigerZustand(
                "Einladung ist nicht mehr ausstehend".into(),
            ));
        }

        tracing::info!(einladung_id = %einladung_id, "Einladung zurueckgezogen");
        Ok(EinladungRecord {
            status: EinladungsStatus::Zurueckgezogen,
            ..einladung
        })
    }

    /// Laedt eine Einladung (mit Lazy-Ablauf-Auswertung)
    pub async fn laden(&self, einladung_id: Uuid) -> OrgResult<EinladungRecord> {
        self.laden_mit_ablauf(einladung_id).await
    }

    /// Laedt eine Einladung samt Organisations- und Einlader-Kontext
    pub async fn laden_mit_details(&self, einladung_id: Uuid) -> OrgResult<EinladungMitDetails> {
        let einladung = self.laden_mit_ablauf(einladung_id).await?;

        let organisation = self
            .org_repo
            .get(einladung.organization_id)
            .await?
            .ok_or_else(|| {
                OrgError::NichtGefunden(format!("Organisation {}", einladung.organization_id))
            })?;

        let einlader_email = self
            .user_repo
            .get_by_id(einladung.inviter_user_id)
            .await?
            .map(|b| b.email);

        Ok(EinladungMitDetails {
            einladung,
            organisation_name: organisation.name,
            organisation_slug: organisation.slug,
            einlader_email,
        })
    }

    /// Listet die Einladungen einer Organisation (Mitgliedschaft erforderlich)
    pub async fn listen(
        &self,
        organization_id: Uuid,
        akteur: &Identitaet,
    ) -> OrgResult<Vec<EinladungRecord>> {
        self.mitglied_repo
            .get_by_org_user(organization_id, akteur.id)
            .await?
            .ok_or_else(|| {
                OrgError::ZugriffVerweigert("Akteur ist kein Mitglied der Organisation".into())
            })?;

        let einladungen = self.einladung_repo.list_for_org(organization_id).await?;

        let jetzt = Utc::now();
        let mut ergebnis = Vec::with_capacity(einladungen.len());
        for einladung in einladungen {
            ergebnis.push(self.ablauf_anwenden(einladung, jetzt).await?);
        }
        Ok(ergebnis)
    }

    /// Laedt eine Einladung und wendet den Lazy-Ablauf an
    async fn laden_mit_ablauf(&self, einladung_id: Uuid) -> OrgResult<EinladungRecord> {
        let einladung = self
            .einladung_repo
            .get(einladung_id)
            .await?
            .ok_or_else(|| OrgError::NichtGefunden(format!("Einladung {einladung_id}")))?;

        self.ablauf_anwenden(einladung, Utc::now()).await
    }

    /// Persistiert den Ablauf einer ausstehenden Einladung beim Lesen
    ///
    /// Verliert die bewachte Transition gegen einen konkurrierenden Leser,
    /// ist das Ergebnis identisch – die Einladung ist abgelaufen.
    async fn ablauf_anwenden(
        &self,
        einladung: EinladungRecord,
        jetzt: DateTime<Utc>,
    ) -> OrgResult<EinladungRecord> {
        if einladung.status == EinladungsStatus::Ausstehend && einladung.ist_abgelaufen(jetzt) {
            self.einladung_repo
                .mark_transition(
                    einladung.id,
                    EinladungsStatus::Ausstehend,
                    EinladungsStatus::Abgelaufen,
                )
                .await?;
            tracing::debug!(einladung_id = %einladung.id, "Einladung beim Lesen als abgelaufen markiert");
            return Ok(EinladungRecord {
                status: EinladungsStatus::Abgelaufen,
                ..einladung
            });
        }
        Ok(einladung)
    }

    fn accept_link(&self, einladung_id: Uuid) -> String {
        format!(
            "{}/accept-invitation/{einladung_id}",
            self.konfig.accept_link_basis.trim_end_matches('/')
        )
    }
}
