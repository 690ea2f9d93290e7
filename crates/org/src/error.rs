//! Fehlertypen fuer die Organisations-Services

use thiserror::Error;

use teamwerk_db::DbError;

/// Alle moeglichen Fehler der Organisations- und Einladungslogik
#[derive(Debug, Error)]
pub enum OrgError {
    // --- Autorisierung ---
    #[error("Zugriff verweigert: {0}")]
    ZugriffVerweigert(String),

    #[error("Email der Einladung stimmt nicht mit dem angemeldeten Benutzer ueberein")]
    EmailAbweichung,

    // --- Einladungs-Zustandsmaschine ---
    #[error("Einladung nicht im erwarteten Zustand: {0}")]
    UngueltigerZustand(String),

    #[error("Einladung abgelaufen")]
    EinladungAbgelaufen,

    // --- Ledger-Invarianten ---
    #[error("Konflikt: {0}")]
    Konflikt(String),

    #[error("Der letzte Eigentuemer einer Organisation kann nicht entfernt oder herabgestuft werden")]
    LetzterEigentuemer,

    // --- Eingaben / Ressourcen ---
    #[error("Ungueltige Eingabe: {0}")]
    UngueltigeEingabe(String),

    #[error("Nicht gefunden: {0}")]
    NichtGefunden(String),

    // --- Infrastruktur ---
    #[error("Speicher voruebergehend nicht verfuegbar")]
    SpeicherNichtVerfuegbar,

    #[error("Datenbankfehler: {0}")]
    Datenbank(DbError),

    #[error("Interner Fehler: {0}")]
    Intern(String),
}

impl From<DbError> for OrgError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::LetzterEigentuemer => Self::LetzterEigentuemer,
            DbError::Eindeutigkeit(msg) => Self::Konflikt(msg),
            DbError::NichtGefunden(msg) => Self::NichtGefunden(msg),
            DbError::UngueltigeDaten(msg) => Self::UngueltigeEingabe(msg),
            andere if andere.ist_nicht_verfuegbar() => Self::SpeicherNichtVerfuegbar,
            andere => Self::Datenbank(andere),
        }
    }
}

/// Result-Alias fuer die Organisations-Services
pub type OrgResult<T> = Result<T, OrgError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_fehler_werden_uebersetzt() {
        assert!(matches!(
            OrgError::from(DbError::LetzterEigentuemer),
            OrgError::LetzterEigentuemer
        ));
        assert!(matches!(
            OrgError::from(DbError::Eindeutigkeit("slug".into())),
            OrgError::Konflikt(_)
        ));
        assert!(matches!(
            OrgError::from(DbError::NichtGefunden("org".into())),
            OrgError::NichtGefunden(_)
        ));
        assert!(matches!(
            OrgError::from(DbError::UngueltigeDaten("rolle".into())),
            OrgError::UngueltigeEingabe(_)
        ));
    }
}
