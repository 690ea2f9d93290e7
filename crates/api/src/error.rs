//! Uebersetzung von Service-Fehlern in HTTP-Antworten

use axum::http::StatusCode;
use axum::response::Response;

use teamwerk_org::OrgError;

use crate::middleware::fehler_antwort;

/// Ordnet jedem Service-Fehler seinen HTTP-Status zu
pub fn status_fuer(fehler: &OrgError) -> StatusCode {
    match fehler {
        OrgError::ZugriffVerweigert(_) | OrgError::EmailAbweichung => StatusCode::FORBIDDEN,
        OrgError::NichtGefunden(_) => StatusCode::NOT_FOUND,
        OrgError::UngueltigerZustand(_) | OrgError::Konflikt(_) | OrgError::LetzterEigentuemer => {
            StatusCode::CONFLICT
        }
        OrgError::EinladungAbgelaufen => StatusCode::GONE,
        OrgError::UngueltigeEingabe(_) => StatusCode::BAD_REQUEST,
        OrgError::SpeicherNichtVerfuegbar => StatusCode::SERVICE_UNAVAILABLE,
        OrgError::Datenbank(_) | OrgError::Intern(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Baut die JSON-Fehlerantwort; interne Fehler werden geloggt und nicht
/// an den Client durchgereicht
pub fn org_fehler_antwort(fehler: OrgError) -> Response {
    let status = status_fuer(&fehler);
    if status.is_server_error() {
        tracing::error!(fehler = %fehler, "Interner Fehler in der API");
        return fehler_antwort(status, "Interner Fehler", status.as_u16() as u32);
    }
    fehler_antwort(status, &fehler.to_string(), status.as_u16() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use teamwerk_db::DbError;

    #[test]
    fn status_zuordnung() {
        assert_eq!(
            status_fuer(&OrgError::ZugriffVerweigert("x".into())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(status_fuer(&OrgError::EmailAbweichung), StatusCode::FORBIDDEN);
        assert_eq!(
            status_fuer(&OrgError::NichtGefunden("x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_fuer(&OrgError::UngueltigerZustand("accepted".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_fuer(&OrgError::LetzterEigentuemer),
            StatusCode::CONFLICT
        );
        assert_eq!(status_fuer(&OrgError::EinladungAbgelaufen), StatusCode::GONE);
        assert_eq!(
            status_fuer(&OrgError::UngueltigeEingabe("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_fuer(&OrgError::SpeicherNichtVerfuegbar),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_fuer(&OrgError::Datenbank(DbError::intern("x"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
