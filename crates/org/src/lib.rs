//! Teamwerk Organisations-Domaene
//!
//! Mitgliedschafts-Ledger, Autorisierungs-Policy und Einladungs-
//! Lebenszyklus. Die Services sind generisch ueber die Repository-Traits
//! aus `teamwerk-db` und halten selbst keinen Zustand ausser ihrer
//! Konfiguration.

pub mod aktiv;
pub mod einladung_service;
pub mod error;
pub mod mitglied_service;
pub mod policy;
pub mod versand;

pub use aktiv::AktiveOrganisationStore;
pub use einladung_service::{EinladungMitDetails, EinladungService, EinladungsKonfig};
pub use error::{OrgError, OrgResult};
pub use mitglied_service::MitgliedService;
pub use policy::{ist_erlaubt, Aktion};
pub use versand::{versand_abfeuern, EinladungsVersand, LogVersand, VersandDienst};

#[cfg(test)]
mod tests;
