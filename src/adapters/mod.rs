//! Infrastructure adapters. Implement outbound ports.
//!
//! SQLite storage, CSV export, terminal UI. Map errors to DomainError.

pub mod export;
pub mod persistence;
pub mod ui;
