//! freelance-ledger: clients, projects and billable hours in a local SQLite ledger.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
