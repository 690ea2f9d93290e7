//! Request-Timing Middleware fuer Axum
//!
//! Misst die Antwortzeit jeder HTTP-Anfrage, protokolliert sie als
//! strukturiertes Log-Event und fuettert die Prometheus-Histogramme.

use std::time::Instant;

use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::{Request, Response},
    middleware::Next,
};

use crate::metrics::TeamwerkMetrics;

/// Axum-Middleware: misst Antwortzeit, loggt und zaehlt.
///
/// Verwendung:
/// ```ignore
/// Router::new()
///     .route("/", get(handler))
///     .layer(axum::middleware::from_fn_with_state(metriken, timing_middleware))
/// ```
pub async fn timing_middleware(
    State(metriken): State<TeamwerkMetrics>,
    req: Request<Body>,
    next: Next,
) -> Response<Body> {
    let methode = req.method().to_string();
    let pfad = req.uri().path().to_string();
    // Metrik-Label ist das Routen-Template, nie der rohe Pfad: sonst
    // praegt jede UUID (und jeder 404-Probepfad) eine neue Zeitreihe.
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let start = Instant::now();

    let response = next.run(req).await;

    let dauer = start.elapsed();
    let status = response.status().as_u16();

    metriken
        .http_requests_total
        .with_label_values(&[&methode, &route, &status.to_string()])
        .inc();
    metriken
        .http_request_duration_seconds
        .with_label_values(&[&methode, &route])
        .observe(dauer.as_secs_f64());

    tracing::info!(
        method = %methode,
        path = %pfad,
        status = status,
        duration_ms = dauer.as_millis(),
        "HTTP-Anfrage abgeschlossen"
    );

    response
}

#[cfg(test)]
mod tests {
    use axum::{routing::get, Router};
    use tower::ServiceExt;

    use super::*;

    async fn anfrage(app: &Router, pfad: &str) {
        let req = Request::builder()
            .uri(pfad)
            .body(Body::empty())
            .unwrap();
        app.clone().oneshot(req).await.unwrap();
    }

    #[tokio::test]
    async fn metrik_label_ist_routen_template() {
        let metriken = TeamwerkMetrics::neu().unwrap();
        let app = Router::new()
            .route("/v1/invitations/:id", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn_with_state(
                metriken.clone(),
                timing_middleware,
            ));

        // Verschiedene IDs landen in derselben Zeitreihe
        anfrage(&app, "/v1/invitations/5e3b4a2e-0d1f-4c8a-aaaa-000000000001").await;
        anfrage(&app, "/v1/invitations/5e3b4a2e-0d1f-4c8a-aaaa-000000000002").await;

        let zaehler = metriken
            .http_requests_total
            .with_label_values(&["GET", "/v1/invitations/:id", "200"]);
        assert_eq!(zaehler.get(), 2);

        let export = metriken.exportieren().unwrap();
        assert!(export.contains("/v1/invitations/:id"));
        assert!(!export.contains("5e3b4a2e"));
    }

    #[tokio::test]
    async fn unbekannte_pfade_teilen_ein_label() {
        let metriken = TeamwerkMetrics::neu().unwrap();
        let app = Router::new()
            .route("/health", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn_with_state(
                metriken.clone(),
                timing_middleware,
            ));

        anfrage(&app, "/gibt/es/nicht").await;
        anfrage(&app, "/auch/nicht/da").await;

        let zaehler = metriken
            .http_requests_total
            .with_label_values(&["GET", "unmatched", "404"]);
        assert_eq!(zaehler.get(), 2);
    }
}
