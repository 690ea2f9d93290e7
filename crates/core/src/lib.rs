//! teamwerk-core – Gemeinsame Typen und Traits
//!
//! Dieses Crate definiert:
//! - `Rolle` und `EinladungsStatus` (Domaenen-Enums)
//! - `Identitaet` (aufgeloeste Session-Identitaet)
//! - `IdentitaetsQuelle` (Boundary-Trait zum externen Identity Store)

pub mod identitaet;
pub mod types;

// Bequeme Re-Exporte
pub use identitaet::{Identitaet, IdentitaetsQuelle};
pub use types::{EinladungsStatus, Rolle};
