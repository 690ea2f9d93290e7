//! Prometheus-kompatible Metriken fuer Teamwerk
//!
//! Registrierte Metriken:
//! - `teamwerk_organizations_created_total` – Counter: angelegte Organisationen
//! - `teamwerk_invitations_created_total` – Counter: ausgesprochene Einladungen
//! - `teamwerk_invitation_transitions_total` – Counter: Statuswechsel (Label `to`)
//! - `teamwerk_membership_changes_total` – Counter: Mitgliedschafts-Mutationen (Label `kind`)
//! - `teamwerk_http_requests_total` – Counter: HTTP-Anfragen (method, path, status)
//! - `teamwerk_http_request_duration_seconds` – Histogram: HTTP-Antwortzeit

use std::sync::Arc;

use anyhow::Result;
use axum::{response::IntoResponse, routing::get, Router};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

/// Alle Teamwerk-Prometheus-Metriken
#[derive(Clone)]
pub struct TeamwerkMetrics {
    pub registry: Arc<Registry>,

    // Domaenen-Metriken
    pub organizations_created_total: IntCounter,
    pub invitations_created_total: IntCounter,
    pub invitation_transitions_total: IntCounterVec,
    pub membership_changes_total: IntCounterVec,

    // HTTP-Metriken
    pub http_requests_total: IntCounterVec,
    pub http_request_duration_seconds: HistogramVec,
}

impl TeamwerkMetrics {
    /// Erstellt und registriert alle Metriken in einer neuen Registry
    pub fn neu() -> Result<Self> {
        let registry = Registry::new();

        let organizations_created_total = IntCounter::with_opts(Opts::new(
            "teamwerk_organizations_created_total",
            "Gesamtanzahl angelegter Organisationen",
        ))?;
        registry.register(Box::new(organizations_created_total.clone()))?;

        let invitations_created_total = IntCounter::with_opts(Opts::new(
            "teamwerk_invitations_created_total",
            "Gesamtanzahl ausgesprochener Einladungen",
        ))?;
        registry.register(Box::new(invitations_created_total.clone()))?;

        let invitation_transitions_total = IntCounterVec::new(
            Opts::new(
                "teamwerk_invitation_transitions_total",
                "Statuswechsel von Einladungen",
            ),
            &["to"],
        )?;
        registry.register(Box::new(invitation_transitions_total.clone()))?;

        let membership_changes_total = IntCounterVec::new(
            Opts::new(
                "teamwerk_membership_changes_total",
                "Mutationen am Mitgliederbestand",
            ),
            &["kind"],
        )?;
        registry.register(Box::new(membership_changes_total.clone()))?;

        let http_requests_total = IntCounterVec::new(
            Opts::new("teamwerk_http_requests_total", "Gesamtanzahl HTTP-Anfragen"),
            &["method", "path", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "teamwerk_http_request_duration_seconds",
                "HTTP-Antwortzeit in Sekunden",
            )
            .buckets(vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5,
            ]),
            &["method", "path"],
        )?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            organizations_created_total,
            invitations_created_total,
            invitation_transitions_total,
            membership_changes_total,
            http_requests_total,
            http_request_duration_seconds,
        })
    }

    /// Zaehlt einen Einladungs-Statuswechsel
    pub fn transition_zaehlen(&self, zielstatus: &str) {
        self.invitation_transitions_total
            .with_label_values(&[zielstatus])
            .inc();
    }

    /// Exportiert alle Metriken im Prometheus-Textformat
    pub fn exportieren(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

/// Axum-Router fuer den `/metrics`-Endpunkt
pub fn metrics_router(metriken: TeamwerkMetrics) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metriken)
}

async fn metrics_handler(
    axum::extract::State(metriken): axum::extract::State<TeamwerkMetrics>,
) -> impl IntoResponse {
    match metriken.exportieren() {
        Ok(text) => (
            axum::http::StatusCode::OK,
            [(
                axum::http::header::CONTENT_TYPE,
                "text/plain; version=0.0.4",
            )],
            text,
        )
            .into_response(),
        Err(err) => {
            tracing::error!("Metriken-Export fehlgeschlagen: {err}");
            axum::http::StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
