//! Domaenen-Enums fuer Teamwerk
//!
//! `Rolle` und `EinladungsStatus` werden sowohl in der Datenbank (als TEXT)
//! als auch im API-Wire-Format (lowercase JSON-Strings) verwendet.

use serde::{Deserialize, Serialize};

/// Rolle eines Mitglieds innerhalb einer Organisation
///
/// Hierarchie: Eigentuemer > Admin > Mitglied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rolle {
    #[serde(rename = "member")]
    Mitglied,
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "owner")]
    Eigentuemer,
}

impl Rolle {
    pub fn als_str(&self) -> &'static str {
        match self {
            Self::Mitglied => "member",
            Self::Admin => "admin",
            Self::Eigentuemer => "owner",
        }
    }
}

impl std::str::FromStr for Rolle {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(Self::Mitglied),
            "admin" => Ok(Self::Admin),
            "owner" => Ok(Self::Eigentuemer),
            other => Err(format!("Unbekannte Rolle: {other}")),
        }
    }
}

impl std::fmt::Display for Rolle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.als_str())
    }
}

/// Status einer Einladung
///
/// `Ausstehend` ist der einzige nicht-terminale Zustand. Aus den vier
/// terminalen Zustaenden fuehrt keine Transition mehr heraus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EinladungsStatus {
    #[serde(rename = "pending")]
    Ausstehend,
    #[serde(rename = "accepted")]
    Angenommen,
    #[serde(rename = "rejected")]
    Abgelehnt,
    #[serde(rename = "canceled")]
    Zurueckgezogen,
    #[serde(rename = "expired")]
    Abgelaufen,
}

impl EinladungsStatus {
    pub fn als_str(&self) -> &'static str {
        match self {
            Self::Ausstehend => "pending",
            Self::Angenommen => "accepted",
            Self::Abgelehnt => "rejected",
            Self::Zurueckgezogen => "canceled",
            Self::Abgelaufen => "expired",
        }
    }

    /// Gibt `true` zurueck wenn der Status terminal ist
    pub fn ist_terminal(&self) -> bool {
        !matches!(self, Self::Ausstehend)
    }
}

impl std::str::FromStr for EinladungsStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Ausstehend),
            "accepted" => Ok(Self::Angenommen),
            "rejected" => Ok(Self::Abgelehnt),
            "canceled" => Ok(Self::Zurueckgezogen),
            "expired" => Ok(Self::Abgelaufen),
            other => Err(format!("Unbekannter Einladungsstatus: {other}")),
        }
    }
}

impl std::fmt::Display for EinladungsStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.als_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn rolle_roundtrip() {
        for rolle in [Rolle::Mitglied, Rolle::Admin, Rolle::Eigentuemer] {
            assert_eq!(Rolle::from_str(rolle.als_str()).unwrap(), rolle);
        }
    }

    #[test]
    fn rolle_unbekannt() {
        assert!(Rolle::from_str("superuser").is_err());
        assert!(Rolle::from_str("OWNER").is_err());
    }

    #[test]
    fn rolle_serde_wire_format() {
        assert_eq!(serde_json::to_string(&Rolle::Eigentuemer).unwrap(), "\"owner\"");
        let r: Rolle = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(r, Rolle::Admin);
    }

    #[test]
    fn status_terminal() {
        assert!(!EinladungsStatus::Ausstehend.ist_terminal());
        assert!(EinladungsStatus::Angenommen.ist_terminal());
        assert!(EinladungsStatus::Abgelehnt.ist_terminal());
        assert!(EinladungsStatus::Zurueckgezogen.ist_terminal());
        assert!(EinladungsStatus::Abgelaufen.ist_terminal());
    }

    #[test]
    fn status_roundtrip() {
        for status in [
            EinladungsStatus::Ausstehend,
            EinladungsStatus::Angenommen,
            EinladungsStatus::Abgelehnt,
            EinladungsStatus::Zurueckgezogen,
            EinladungsStatus::Abgelaufen,
        ] {
            assert_eq!(EinladungsStatus::from_str(status.als_str()).unwrap(), status);
        }
    }
}
