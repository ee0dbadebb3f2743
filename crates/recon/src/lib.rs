//! `rostercheck-recon`: seminar roster reconciliation engine.
//!
//! Compares the planning roster against the members-site listing (and,
//! optionally, the public website) slot by slot, and reports what is
//! missing, extra, misdated, or approximately matched. No CLI or terminal
//! concerns: `load` turns export files into typed records, `engine::run`
//! does the rest.

pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod load;
pub mod model;
pub mod normalize;
pub mod priority;
pub mod reconcile;
pub mod similarity;
pub mod summary;

pub use config::ReconConfig;
pub use engine::run;
pub use error::ReconError;
pub use model::{Category, GroupInput, ReconInput, ReconReport, Record, RowStatus, WebsiteRecord};
