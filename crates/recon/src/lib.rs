//! `fiberaudit-recon`: access-network wiring reconciliation engine.
//!
//! Pure engine crate: reads already-decoded sheets, builds the
//! room → major → splitter → port hierarchy for a ledger and an inventory
//! export, and diffs them. No CLI or file format dependencies.

pub mod classify;
pub mod config;
pub mod diff;
pub mod engine;
pub mod error;
pub mod extract;
pub mod model;
pub mod report;
pub mod sheet;

pub use config::{AuditConfig, AuditKind, ColumnMapping};
pub use engine::run;
pub use error::ReconError;
pub use model::{DiffResult, Hierarchy, Report, ReportSegment, Verdict};
pub use sheet::{CellValue, GridSheet, SheetExtent, TabularSheet};
