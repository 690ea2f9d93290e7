//! Boundary zum externen Notification Dispatcher
//!
//! Der Versand eines Einladungslinks ist Best-Effort und blockiert die
//! Einladungs-Transaktion nie: erst committet das Ledger, dann wird der
//! Versand in einem eigenen Task abgefeuert. Versandfehler werden geloggt,
//! nie an den Aufrufer durchgereicht – die Einladung existiert als Quelle
//! der Wahrheit und kann jederzeit erneut versendet werden.

use std::sync::Arc;

use async_trait::async_trait;

/// Auftrag fuer den Versand eines Einladungslinks
#[derive(Debug, Clone)]
pub struct EinladungsVersand {
    pub empfaenger_email: String,
    pub einlader_name: String,
    pub einlader_email: String,
    pub organisation_name: String,
    pub accept_link: String,
}

/// Boundary-Trait: stellt einen Einladungslink zu (Email oder anderer Kanal)
#[async_trait]
pub trait VersandDienst: Send + Sync {
    async fn versenden(&self, auftrag: EinladungsVersand) -> anyhow::Result<()>;
}

/// Versand-Implementierung die nur strukturiert loggt
///
/// Der eigentliche Zustellkanal ist ein externer Kollaborateur; fuer
/// Entwicklung und Tests reicht das Log-Event.
#[derive(Debug, Default)]
pub struct LogVersand;

#[async_trait]
impl VersandDienst for LogVersand {
    async fn versenden(&self, auftrag: EinladungsVersand) -> anyhow::Result<()> {
        tracing::info!(
            empfaenger = %auftrag.empfaenger_email,
            einlader = %auftrag.einlader_email,
            organisation = %auftrag.organisation_name,
            link = %auftrag.accept_link,
            "Einladungslink versendet"
        );
        Ok(())
    }
}

/// Feuert den Versand in einem eigenen Task ab (fire-and-forget)
pub fn versand_abfeuern(dienst: Arc<dyn VersandDienst>, auftrag: EinladungsVersand) {
    tokio::spawn(async move {
        let empfaenger = auftrag.empfaenger_email.clone();
        if let Err(e) = dienst.versenden(auftrag).await {
            tracing::warn!(
                empfaenger = %empfaenger,
                fehler = %e,
                "Einladungsversand fehlgeschlagen (Einladung bleibt gueltig)"
            );
        }
    });
}
