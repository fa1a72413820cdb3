//! Core domain layer. No external I/O dependencies.
//!
//! Entities, validation rules and the aggregation engine live here. Dependencies flow inward.

pub mod aggregation;
pub mod entities;
pub mod errors;
pub mod validation;

pub use aggregation::{BusinessSummary, ClientTotals, PeriodReport, RateCard, Tally};
pub use entities::{
    CascadeReport, Category, CategoryId, Client, ClientId, ClientUpdate, DEFAULT_HOURLY_RATE,
    EntryLine, NewCategory, NewClient, NewProject, NewTimeEntry, Project, ProjectId,
    ProjectStatus, ProjectUpdate, StoreCounts, TimeEntry, TimeEntryId, TimeEntryUpdate,
};
pub use errors::DomainError;
