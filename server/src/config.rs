//! Server-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass der Server ohne Konfigurationsdatei
//! lauffaehig ist.

use serde::{Deserialize, Serialize};

/// Vollstaendige Server-Konfiguration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Allgemeine Server-Einstellungen
    pub server: ServerEinstellungen,
    /// Netzwerk-Einstellungen
    pub netzwerk: NetzwerkEinstellungen,
    /// Datenbank-Einstellungen
    pub datenbank: DatenbankEinstellungen,
    /// Einladungs-Einstellungen
    pub einladungen: EinladungsEinstellungen,
    /// Dev-Identity-Store-Einstellungen
    pub identitaet: IdentitaetsEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
    /// Observability-Einstellungen (Metriken, Health)
    pub observability: ObservabilityEinstellungen,
}

/// Allgemeine Server-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerEinstellungen {
    /// Anzeigename des Servers
    pub name: String,
}

impl Default for ServerEinstellungen {
    fn default() -> Self {
        Self {
            name: "Teamwerk Server".into(),
        }
    }
}

/// Netzwerk-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetzwerkEinstellungen {
    /// Bind-Adresse fuer die REST-API
    pub bind_adresse: String,
    /// Port fuer die REST-API
    pub api_port: u16,
    /// CORS-Origins fuer REST (leer = alle erlaubt)
    pub cors_origins: Vec<String>,
}

impl Default for NetzwerkEinstellungen {
    fn default() -> Self {
        Self {
            bind_adresse: "0.0.0.0".into(),
            api_port: 9100,
            cors_origins: vec![],
        }
    }
}

/// Datenbank-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatenbankEinstellungen {
    /// Verbindungs-URL
    pub url: String,
    /// Maximale Verbindungspool-Groesse
    pub max_verbindungen: u32,
    /// SQLite-WAL-Modus
    pub wal: bool,
}

impl Default for DatenbankEinstellungen {
    fn default() -> Self {
        Self {
            url: "sqlite://teamwerk.db".into(),
            max_verbindungen: 5,
            wal: true,
        }
    }
}

/// Einladungs-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EinladungsEinstellungen {
    /// Lebensdauer neuer Einladungen in Tagen
    pub ttl_tage: i64,
    /// Basis-URL fuer Accept-Links (Frontend)
    pub accept_link_basis: String,
}

impl Default for EinladungsEinstellungen {
    fn default() -> Self {
        Self {
            ttl_tage: 7,
            accept_link_basis: "http://localhost:5173".into(),
        }
    }
}

/// Ein im Dev-Identity-Store vorregistrierter Benutzer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevBenutzer {
    pub email: String,
    pub name: String,
    /// Fester Token (leer = beim Start generieren und loggen)
    pub token: Option<String>,
}

/// Dev-Identity-Store-Einstellungen
///
/// Der produktive Identity Store ist ein externer Kollaborateur; fuer
/// Entwicklung und Tests haelt der Server eine In-Memory-Tabelle mit
/// vorregistrierten Benutzern.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct IdentitaetsEinstellungen {
    pub dev_benutzer: Vec<DevBenutzer>,
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

/// Observability-Einstellungen (Metriken + Health-Check)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityEinstellungen {
    /// Aktiviert den Observability-Server
    pub aktiviert: bool,
    /// Port fuer Metriken und Health
    pub port: u16,
}

impl Default for ObservabilityEinstellungen {
    fn default() -> Self {
        Self {
            aktiviert: true,
            port: 9300,
        }
    }
}

impl ServerConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => {
                let config: Self = toml::from_str(&inhalt)
                    .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }

    /// Gibt die Bind-Adresse fuer die REST-API zurueck
    pub fn api_bind_adresse(&self) -> String {
        format!("{}:{}", self.netzwerk.bind_adresse, self.netzwerk.api_port)
    }

    /// Gibt die Bind-Adresse fuer den Observability-Server zurueck
    pub fn observability_bind_adresse(&self) -> String {
        format!(
            "{}:{}",
            self.netzwerk.bind_adresse, self.observability.port
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standardwerte() {
        let config = ServerConfig::default();
        assert_eq!(config.netzwerk.api_port, 9100);
        assert_eq!(config.einladungen.ttl_tage, 7);
        assert!(config.observability.aktiviert);
        assert_eq!(config.api_bind_adresse(), "0.0.0.0:9100");
    }

    #[test]
    fn toml_teilkonfiguration() {
        let config: ServerConfig = toml::from_str(
            r#"
            [einladungen]
            ttl_tage = 14

            [[identitaet.dev_benutzer]]
            email = "dev@teamwerk.example"
            name = "Dev"
            token = "dev-token"
            "#,
        )
        .unwrap();
        assert_eq!(config.einladungen.ttl_tage, 14);
        assert_eq!(config.identitaet.dev_benutzer.len(), 1);
        // Nicht gesetzte Sektionen behalten ihre Standardwerte
        assert_eq!(config.netzwerk.api_port, 9100);
    }
}
