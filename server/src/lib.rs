//! teamwerk-server – Bibliotheks-Root
//!
//! Verdrahtung der Subsysteme: Datenbank, Organisations-Services,
//! REST-API und Observability.

pub mod config;
pub mod identitaet;

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Duration;

use config::ServerConfig;
use identitaet::InMemoryIdentitaeten;
use teamwerk_api::{AppState, RestServer, RestServerKonfig};
use teamwerk_db::repository::DatabaseConfig;
use teamwerk_db::SqliteDb;
use teamwerk_observability::{
    observability_server_starten, timing_middleware, HealthState, TeamwerkMetrics,
};
use teamwerk_org::{
    AktiveOrganisationStore, EinladungService, EinladungsKonfig, LogVersand, MitgliedService,
};

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Startet alle Server-Subsysteme und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Datenbankverbindung herstellen, Migrationen ausfuehren
    /// 2. Services verdrahten (Ledger, Einladungen, Identity Store)
    /// 3. Observability-Server starten (optional)
    /// 4. REST-API starten
    /// 5. Auf Ctrl-C warten
    pub async fn starten(self) -> Result<()> {
        tracing::info!(
            server_name = %self.config.server.name,
            api = %self.config.api_bind_adresse(),
            "Server startet"
        );

        let db = Arc::new(
            SqliteDb::oeffnen(&DatabaseConfig {
                url: self.config.datenbank.url.clone(),
                max_verbindungen: self.config.datenbank.max_verbindungen,
                sqlite_wal: self.config.datenbank.wal,
            })
            .await
            .context("Datenbankverbindung fehlgeschlagen")?,
        );

        let health = HealthState::neu();
        health.db_status_setzen(true);

        let identitaeten = InMemoryIdentitaeten::neu();
        for dev in &self.config.identitaet.dev_benutzer {
            let (token, identitaet) = identitaeten
                .registrieren(&dev.email, &dev.name, dev.token.clone())
                .await;
            tracing::info!(
                email = %identitaet.email,
                token = %token,
                "Dev-Benutzer registriert"
            );
        }

        let mitglieder = MitgliedService::neu(Arc::clone(&db), Arc::clone(&db), Arc::clone(&db));
        let einladungen = EinladungService::neu(
            Arc::clone(&db),
            Arc::clone(&db),
            Arc::clone(&db),
            Arc::clone(&db),
            Arc::new(LogVersand),
            EinladungsKonfig {
                ttl: Duration::days(self.config.einladungen.ttl_tage),
                accept_link_basis: self.config.einladungen.accept_link_basis.clone(),
            },
        );

        let metriken = TeamwerkMetrics::neu()?;
        let state = AppState::neu(
            mitglieder,
            einladungen,
            AktiveOrganisationStore::neu(),
            identitaeten,
            metriken.clone(),
        );

        if self.config.observability.aktiviert {
            let addr = self
                .config
                .observability_bind_adresse()
                .parse()
                .context("Ungueltige Observability-Bind-Adresse")?;
            let obs_metriken = metriken.clone();
            let obs_health = health.clone();
            tokio::spawn(async move {
                if let Err(e) = observability_server_starten(addr, obs_metriken, obs_health).await {
                    tracing::error!(fehler = %e, "Observability-Server beendet");
                }
            });
        }

        let rest = RestServer::neu(RestServerKonfig {
            bind_addr: self
                .config
                .api_bind_adresse()
                .parse()
                .context("Ungueltige API-Bind-Adresse")?,
            cors_origins: self.config.netzwerk.cors_origins.clone(),
        });
        let app = rest.router(state).layer(axum::middleware::from_fn_with_state(
            metriken,
            timing_middleware,
        ));

        tokio::select! {
            ergebnis = rest.serven(app) => {
                ergebnis.context("REST-Server beendet")?;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown-Signal empfangen, Server wird beendet");
            }
        }

        Ok(())
    }
}
