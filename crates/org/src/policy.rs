//! Autorisierungs-Policy fuer Organisations-Aktionen
//!
//! Reine Funktion ohne Seiteneffekte und ohne I/O. Die Policy entscheidet
//! nur ueber Rollen-Befugnisse; die Letzter-Eigentuemer-Invariante setzt
//! das Ledger (teamwerk-db) transaktional durch.
//!
//! Rollenhierarchie: Eigentuemer > Admin > Mitglied.

use teamwerk_core::Rolle;

/// Eine autorisierungspflichtige Aktion auf dem Mitgliederbestand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aktion {
    /// Einladung mit der angegebenen Zielrolle aussprechen (oder zurueckziehen)
    Einladen(Rolle),
    /// Rolle eines Mitglieds aendern
    RolleAendern { von: Rolle, zu: Rolle },
    /// Mitglied mit der angegebenen Rolle entfernen
    Entfernen(Rolle),
    /// Die Organisation selbst verlassen
    Verlassen,
}

/// Entscheidet ob ein Akteur mit der gegebenen Rolle die Aktion ausfuehren darf
///
/// Selbst-Entfernung und Selbst-Rollenwechsel folgen derselben Tabelle mit
/// Akteur = Ziel. Verlassen ist immer erlaubt; ob der Akteur der letzte
/// Eigentuemer ist, prueft das Ledger.
pub fn ist_erlaubt(akteur: Rolle, aktion: Aktion) -> bool {
    match (akteur, aktion) {
        // Mitglieder duerfen nur verlassen
        (Rolle::Mitglied, Aktion::Verlassen) => true,
        (Rolle::Mitglied, _) => false,

        // Admins duerfen alles unterhalb der Eigentuemer-Ebene
        (Rolle::Admin, Aktion::Einladen(ziel)) => ziel != Rolle::Eigentuemer,
        (Rolle::Admin, Aktion::RolleAendern { von, zu }) => {
            von != Rolle::Eigentuemer && zu != Rolle::Eigentuemer
        }
        (Rolle::Admin, Aktion::Entfernen(ziel)) => ziel != Rolle::Eigentuemer,
        (Rolle::Admin, Aktion::Verlassen) => true,

        // Eigentuemer duerfen alles
        (Rolle::Eigentuemer, _) => true,
    }
}
