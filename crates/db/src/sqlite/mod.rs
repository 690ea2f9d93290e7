//! SQLite-Backend-Implementierungen fuer alle Repository-Traits

pub mod einladungen;
pub mod mitgliedschaften;
pub mod organisationen;
pub mod pool;
pub mod users;

pub use pool::SqliteDb;
