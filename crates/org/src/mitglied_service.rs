//! Mitgliedschafts-Ledger fuer Teamwerk
//!
//! Kapselt Organisationen, Mitgliedschaften und die Letzter-Eigentuemer-
//! Invariante: eine Organisation hat zu jedem Zeitpunkt mindestens einen
//! Eigentuemer. Die Pruefung selbst laeuft transaktional im Repository,
//! dieser Service setzt davor das Policy-Gate.

use std::sync::Arc;

use uuid::Uuid;

use teamwerk_core::{Identitaet, Rolle};
use teamwerk_db::{
    models::{
        BenutzerRecord, MitgliederAbfrage, MitgliederSeite, MitgliedschaftRecord, NeueOrganisation,
        NeuerBenutzer, OrganisationRecord,
    },
    repository::{MitgliedschaftRepository, OrganisationRepository, UserRepository},
    DbError,
};

use crate::error::{OrgError, OrgResult};
use crate::policy::{ist_erlaubt, Aktion};

/// Mitgliedschafts-Service – Organisationen, Rollen, Austritte
pub struct MitgliedService<M, O, U>
where
    M: MitgliedschaftRepository,
    O: OrganisationRepository,
    U: UserRepository,
{
    mitglied_repo: Arc<M>,
    org_repo: Arc<O>,
    user_repo: Arc<U>,
}

impl<M, O, U> MitgliedService<M, O, U>
where
    M: MitgliedschaftRepository,
    O: OrganisationRepository,
    U: UserRepository,
{
    /// Erstellt einen neuen MitgliedService
    pub fn neu(mitglied_repo: Arc<M>, org_repo: Arc<O>, user_repo: Arc<U>) -> Arc<Self> {
        Arc::new(Self {
            mitglied_repo,
            org_repo,
            user_repo,
        })
    }

    /// Stellt sicher, dass die Identitaet als Benutzer im Ledger existiert
    pub async fn benutzer_sicherstellen(&self, identitaet: &Identitaet) -> OrgResult<BenutzerRecord> {
        if let Some(benutzer) = self.user_repo.get_by_id(identitaet.id).await? {
            return Ok(benutzer);
        }

        match self
            .user_repo
            .create(NeuerBenutzer {
                id: identitaet.id,
                email: &identitaet.email,
                name: &identitaet.name,
                email_verified: identitaet.email_verifiziert,
            })
            .await
        {
            Ok(benutzer) => Ok(benutzer),
            // Konkurrierender Erst-Request hat den Benutzer schon angelegt
            Err(DbError::Eindeutigkeit(_)) => self
                .user_repo
                .get_by_id(identitaet.id)
                .await?
                .ok_or_else(|| OrgError::Intern("Benutzer nach Konflikt nicht auffindbar".into())),
            Err(e) => Err(e.into()),
        }
    }

    /// Legt eine Organisation an; der Ersteller wird atomar Eigentuemer
    pub async fn organisation_erstellen(
        &self,
        name: &str,
        slug: &str,
        ersteller: &Identitaet,
    ) -> OrgResult<OrganisationRecord> {
        let name = name.trim();
        if name.is_empty() {
            return Err(OrgError::UngueltigeEingabe(
                "Organisationsname darf nicht leer sein".into(),
            ));
        }
        slug_pruefen(slug)?;

        let organisation = self
            .org_repo
            .create(NeueOrganisation {
                name,
                slug,
                owner_id: ersteller.id,
            })
            .await?;

        tracing::info!(
            organisation_id = %organisation.id,
            slug = %organisation.slug,
            owner = %ersteller.id,
            "Organisation erstellt"
        );

        Ok(organisation)
    }

    /// Listet die Organisationen, in denen der Benutzer Mitglied ist
    pub async fn organisationen_listen(
        &self,
        user_id: Uuid,
    ) -> OrgResult<Vec<OrganisationRecord>> {
        Ok(self.org_repo.list_for_user(user_id).await?)
    }

    /// Laedt eine Organisation (nur fuer Mitglieder sichtbar)
    pub async fn organisation_laden(
        &self,
        organization_id: Uuid,
        akteur: &Identitaet,
    ) -> OrgResult<OrganisationRecord> {
        self.mitgliedschaft_fordern(organization_id, akteur.id)
            .await?;
        self.org_repo
            .get(organization_id)
            .await?
            .ok_or_else(|| OrgError::NichtGefunden(format!("Organisation {organization_id}")))
    }

    /// Listet die Mitglieder einer Organisation, paginiert
    pub async fn mitglieder_listen(
        &self,
        organization_id: Uuid,
        akteur: &Identitaet,
        abfrage: MitgliederAbfrage,
    ) -> OrgResult<MitgliederSeite> {
        self.mitgliedschaft_fordern(organization_id, akteur.id)
            .await?;
        Ok(self
            .mitglied_repo
            .list_for_org(organization_id, &abfrage)
            .await?)
    }

    /// Laedt die Mitgliedschaft eines Benutzers in einer Organisation
    pub async fn mitgliedschaft_holen(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> OrgResult<Option<MitgliedschaftRecord>> {
        Ok(self
            .mitglied_repo
            .get_by_org_user(organization_id, user_id)
            .await?)
    }

    /// Aendert die Rolle eines Mitglieds
    ///
    /// Policy-Gate auf Quell- UND Zielrolle; die Letzter-Eigentuemer-
    /// Invariante wird transaktional im Repository durchgesetzt.
    pub async fn rolle_aendern(
        &self,
        organization_id: Uuid,
        mitglied_id: Uuid,
        zu: Rolle,
        akteur: &Identitaet,
    ) -> OrgResult<MitgliedschaftRecord> {
        let akteur_mitgliedschaft = self
            .mitgliedschaft_fordern(organization_id, akteur.id)
            .await?;

        let ziel = self
            .mitglied_repo
            .get(mitglied_id)
            .await?
            .filter(|m| m.organization_id == organization_id)
            .ok_or_else(|| OrgError::NichtGefunden(format!("Mitgliedschaft {mitglied_id}")))?;

        if !ist_erlaubt(
            akteur_mitgliedschaft.role,
            Aktion::RolleAendern { von: ziel.role, zu },
        ) {
            return Err(OrgError::ZugriffVerweigert(format!(
                "Rolle '{}' darf '{}' nicht zu '{}' machen",
                akteur_mitgliedschaft.role, ziel.role, zu
            )));
        }

        let aktualisiert = self.mitglied_repo.update_role(mitglied_id, zu).await?;

        tracing::info!(
            organisation_id = %organization_id,
            mitglied_id = %mitglied_id,
            von = %ziel.role,
            zu = %zu,
            "Rolle geaendert"
        );

        Ok(aktualisiert)
    }

    /// Entfernt ein Mitglied aus der Organisation
    pub async fn entfernen(
        &self,
        organization_id: Uuid,
        mitglied_id: Uuid,
        akteur: &Identitaet,
    ) -> OrgResult<()> {
        let akteur_mitgliedschaft = self
            .mitgliedschaft_fordern(organization_id, akteur.id)
            .await?;

        let ziel = self
            .mitglied_repo
            .get(mitglied_id)
            .await?
            .filter(|m| m.organization_id == organization_id)
            .ok_or_else(|| OrgError::NichtGefunden(format!("Mitgliedschaft {mitglied_id}")))?;

        // Sich selbst entfernt man ueber `verlassen`, nicht hier
        if ziel.user_id == akteur.id {
            return Err(OrgError::UngueltigeEingabe(
                "Eigene Mitgliedschaft wird ueber den Austritt beendet".into(),
            ));
        }

        if !ist_erlaubt(akteur_mitgliedschaft.role, Aktion::Entfernen(ziel.role)) {
            return Err(OrgError::ZugriffVerweigert(format!(
                "Rolle '{}' darf Mitglieder mit Rolle '{}' nicht entfernen",
                akteur_mitgliedschaft.role, ziel.role
            )));
        }

        self.mitglied_repo.remove(mitglied_id).await?;

        tracing::info!(
            organisation_id = %organization_id,
            mitglied_id = %mitglied_id,
            "Mitglied entfernt"
        );

        Ok(())
    }

    /// Verlaesst eine Organisation freiwillig
    ///
    /// Der letzte Eigentuemer kann nicht austreten; dieser Fall kommt als
    /// [`OrgError::LetzterEigentuemer`] aus dem Repository zurueck.
    pub async fn verlassen(&self, organization_id: Uuid, akteur: &Identitaet) -> OrgResult<()> {
        let mitgliedschaft = self
            .mitgliedschaft_fordern(organization_id, akteur.id)
            .await?;

        if !ist_erlaubt(mitgliedschaft.role, Aktion::Verlassen) {
            return Err(OrgError::ZugriffVerweigert(
                "Austritt nicht erlaubt".into(),
            ));
        }

        self.mitglied_repo.remove(mitgliedschaft.id).await?;

        tracing::info!(
            organisation_id = %organization_id,
            user_id = %akteur.id,
            "Organisation verlassen"
        );

        Ok(())
    }

    async fn mitgliedschaft_fordern(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> OrgResult<MitgliedschaftRecord> {
        self.mitglied_repo
            .get_by_org_user(organization_id, user_id)
            .await?
            .ok_or_else(|| {
                OrgError::ZugriffVerweigert("Keine Mitgliedschaft in der Organisation".into())
            })
    }
}

/// Prueft einen Organisations-Slug: nicht leer, nur `[a-z0-9-]`
fn slug_pruefen(slug: &str) -> OrgResult<()> {
    if slug.is_empty() {
        return Err(OrgError::UngueltigeEingabe(
            "Slug darf nicht leer sein".into(),
        ));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(OrgError::UngueltigeEingabe(format!(
            "Ungueltiger Slug '{slug}': erlaubt sind a-z, 0-9 und '-'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod slug_tests {
    use super::slug_pruefen;

    #[test]
    fn gueltige_slugs() {
        for slug in ["acme", "acme-corp", "a1", "team-42"] {
            assert!(slug_pruefen(slug).is_ok(), "{slug} sollte gueltig sein");
        }
    }

    #[test]
    fn ungueltige_slugs() {
        for slug in ["", "Acme", "acme corp", "acme_corp", "ümlaut"] {
            assert!(slug_pruefen(slug).is_err(), "{slug} sollte ungueltig sein");
        }
    }
}
