use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::normalize::{display_name, identity_key, normalize};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Event classification. Declaration order is report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    Internal,
    External,
    /// Provenance-only: a public-website entry compared against the roster's
    /// External records.
    #[serde(rename = "External website")]
    ExternalWebsite,
}

impl Category {
    /// Categories that count towards the priority list.
    pub fn is_scheduled(&self) -> bool {
        matches!(self, Self::Internal | Self::External)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Internal => write!(f, "Internal"),
            Self::External => write!(f, "External"),
            Self::ExternalWebsite => write!(f, "External website"),
        }
    }
}

/// Roster confirmation state. Listing records are always `Confirmed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Confirmed,
    Unconfirmed,
}

/// One participant entry for one scheduled event.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub date: NaiveDate,
    pub category: Category,
    pub participant_name: String,
    /// Empty when unknown.
    pub affiliation: String,
    pub status: RecordStatus,
}

impl Record {
    pub fn new(
        date: NaiveDate,
        category: Category,
        participant_name: impl Into<String>,
        affiliation: impl Into<String>,
    ) -> Self {
        Self {
            date,
            category,
            participant_name: participant_name.into(),
            affiliation: affiliation.into(),
            status: RecordStatus::Confirmed,
        }
    }

    pub fn with_status(mut self, status: RecordStatus) -> Self {
        self.status = status;
        self
    }

    pub fn identity_key(&self) -> String {
        identity_key(&self.participant_name, &self.affiliation)
    }

    pub fn normalized_name(&self) -> String {
        normalize(&self.participant_name)
    }

    pub fn display(&self) -> String {
        display_name(&self.participant_name, &self.affiliation)
    }

    pub fn slot_key(&self) -> SlotKey {
        SlotKey {
            date: self.date,
            category: self.category,
        }
    }
}

/// Unit of comparison within one group: all records sharing (date, category).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SlotKey {
    pub date: NaiveDate,
    pub category: Category,
}

/// Pre-loaded records for one logical group.
#[derive(Debug, Clone, Default)]
pub struct GroupInput {
    /// Key of the group in the config (`groups[].display`).
    pub group: String,
    pub roster: Vec<Record>,
    pub listing: Vec<Record>,
}

/// A public-website entry, tagged with the website's own group label.
#[derive(Debug, Clone)]
pub struct WebsiteRecord {
    pub group_label: String,
    pub record: Record,
}

/// Everything the engine consumes for one run.
#[derive(Debug, Clone, Default)]
pub struct ReconInput {
    pub groups: Vec<GroupInput>,
    /// `None` when the public website was not configured or could not be read.
    pub website: Option<Vec<WebsiteRecord>>,
    pub source: SourceInfo,
}

/// Roster export metadata carried into the report.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SourceInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_count: Option<usize>,
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    Ok,
    /// Fuzzy or otherwise doubtful match.
    Warn,
    /// Missing from the listing.
    Bad,
    Extra,
    DateMismatch,
}

impl std::fmt::Display for RowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::Warn => write!(f, "warn"),
            Self::Bad => write!(f, "bad"),
            Self::Extra => write!(f, "extra"),
            Self::DateMismatch => write!(f, "date_mismatch"),
        }
    }
}

/// One line of reconciliation output.
///
/// A row normally classifies a single pairing. Leftover expected and found
/// records are laid out side by side for compactness; such a row carries the
/// expected side's classification in `status` and the found side's in
/// `found_status`, and the two are independent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub status: RowStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found_status: Option<RowStatus>,
    pub expected: String,
    pub found: String,
    pub note: String,
    /// Rounded percentage for fuzzy matches; `None` for exact and leftover rows.
    pub score: Option<u8>,
}

// ---------------------------------------------------------------------------
// Slot summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchDirection {
    /// On the roster for this date, on the listing for another.
    RosterToListing,
    /// On the listing for this date, on the roster for another.
    ListingToRoster,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateMismatch {
    pub participant: String,
    pub expected_date: NaiveDate,
    pub actual_date: NaiveDate,
    pub direction: MismatchDirection,
}

/// Reviewer hint linking a sole missing item to a sole extra item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LikelyPair {
    pub missing: String,
    pub extra: String,
    pub score: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SlotSummary {
    pub any_mismatch: bool,
    pub missing: Vec<String>,
    pub extras: Vec<String>,
    pub date_mismatches: Vec<DateMismatch>,
    pub likely_pair: Option<LikelyPair>,
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotReport {
    pub date: NaiveDate,
    pub category: Category,
    pub title: String,
    pub source_label: String,
    pub rows: Vec<Row>,
    pub summary: SlotSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupReport {
    pub display: String,
    pub roster_name: String,
    pub url: String,
    pub slots: Vec<SlotReport>,
}

/// Near-term missing-record alert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorityItem {
    pub group: String,
    pub date: NaiveDate,
    pub category: Category,
    pub title: String,
    pub missing_names: Vec<String>,
    pub source_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconSummary {
    pub total_slots: usize,
    pub mismatched_slots: usize,
    pub missing: usize,
    pub extras: usize,
    pub date_mismatches: usize,
    pub likely_pairs: usize,
    pub priority_items: usize,
    pub status_counts: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
    pub today: NaiveDate,
    pub source: SourceInfo,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconReport {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub groups: Vec<GroupReport>,
    pub priority: Vec<PriorityItem>,
}
