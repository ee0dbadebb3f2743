//! Parse-and-validate for the export files the engine consumes.
//!
//! Each loader turns one file's text into typed [`Record`]s. A file that is
//! not the expected shape at all is an error; an individual malformed record
//! (blank name, unparseable date, unknown category, wrong field types) is
//! dropped and the rest of the file still loads.

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ReconError;
use crate::model::{Category, Record, RecordStatus, SourceInfo, WebsiteRecord};

/// Read an input file to a string.
pub fn read_source(path: &Path) -> Result<String, ReconError> {
    std::fs::read_to_string(path)
        .map_err(|e| ReconError::Io(format!("cannot read {}: {e}", path.display())))
}

// ---------------------------------------------------------------------------
// Field parsing
// ---------------------------------------------------------------------------

/// `YYYY-MM-DD`, or the date part of an ISO-8601 timestamp (offset-aware
/// timestamps keep their own calendar date).
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    None
}

/// Roster category column. Associate-member events count as Internal.
pub fn roster_category(text: &str) -> Option<Category> {
    match text.trim().to_lowercase().as_str() {
        "internal" => Some(Category::Internal),
        "external" => Some(Category::External),
        "associate member" | "associate-member" | "associate" => Some(Category::Internal),
        _ => None,
    }
}

/// Listing category: the explicit field when present, otherwise the
/// `| internal |` / `| external |` marker in the event title.
pub fn listing_category(category: Option<&str>, title: &str) -> Option<Category> {
    if let Some(text) = category.filter(|c| !c.trim().is_empty()) {
        return match text.trim().to_lowercase().as_str() {
            "internal" => Some(Category::Internal),
            "external" => Some(Category::External),
            _ => None,
        };
    }
    let title = title.to_lowercase();
    if title.contains("| internal |") {
        Some(Category::Internal)
    } else if title.contains("| external |") {
        Some(Category::External)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterFormat {
    Json,
    Csv,
}

impl RosterFormat {
    /// `.csv` (any case) is CSV; everything else is treated as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Json,
        }
    }
}

/// One roster record with the group it belongs to.
#[derive(Debug, Clone)]
pub struct RosterEntry {
    pub group: String,
    pub record: Record,
}

/// A parsed roster export covering every group.
#[derive(Debug, Clone, Default)]
pub struct RosterExport {
    pub source: SourceInfo,
    pub entries: Vec<RosterEntry>,
}

impl RosterExport {
    /// Records whose group name equals `roster_name`, ignoring case and
    /// surrounding whitespace.
    pub fn records_for(&self, roster_name: &str) -> Vec<Record> {
        let wanted = roster_name.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|e| e.group.trim().to_lowercase() == wanted)
            .map(|e| e.record.clone())
            .collect()
    }
}

const ROSTER_COLUMNS: [&str; 5] = ["name", "status", "category", "date", "speaker_name"];

#[derive(Debug, Deserialize)]
struct RawRosterRow {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    speaker_name: Option<String>,
    #[serde(default)]
    lab_affiliation: Option<String>,
}

impl RawRosterRow {
    fn into_entry(self) -> Option<RosterEntry> {
        let speaker = self.speaker_name.unwrap_or_default();
        if speaker.trim().is_empty() {
            return None;
        }
        let category = roster_category(self.category.as_deref().unwrap_or(""))?;
        let date = parse_date(self.date.as_deref().unwrap_or(""))?;
        let status = if self.status.unwrap_or_default().trim().eq_ignore_ascii_case("confirmed") {
            RecordStatus::Confirmed
        } else {
            RecordStatus::Unconfirmed
        };
        let affiliation = self.lab_affiliation.unwrap_or_default();
        Some(RosterEntry {
            group: self.name.unwrap_or_default(),
            record: Record::new(date, category, speaker.trim(), affiliation.trim()).with_status(status),
        })
    }
}

pub fn parse_roster(text: &str, format: RosterFormat) -> Result<RosterExport, ReconError> {
    match format {
        RosterFormat::Json => parse_roster_json(text),
        RosterFormat::Csv => parse_roster_csv(text),
    }
}

/// `{"lastUpdated": "...", "records": [...]}` or a bare array of records.
pub fn parse_roster_json(text: &str) -> Result<RosterExport, ReconError> {
    let root: Value = serde_json::from_str(text).map_err(|e| ReconError::InputParse {
        source: "roster".into(),
        message: e.to_string(),
    })?;

    let last_updated = root
        .get("lastUpdated")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let records = records_array(&root, "records", "roster")?;
    let entries = typed_records::<RawRosterRow>(records, "roster")
        .filter_map(RawRosterRow::into_entry)
        .collect::<Vec<_>>();

    warn_if_unusable("roster", entries.len(), records.len());
    log::debug!("roster: {} of {} records usable", entries.len(), records.len());
    Ok(RosterExport {
        source: SourceInfo {
            last_updated,
            record_count: Some(records.len()),
        },
        entries,
    })
}

/// Same columns as the JSON export, one record per line after the header.
pub fn parse_roster_csv(text: &str) -> Result<RosterExport, ReconError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());

    let headers = reader.headers().map_err(|e| ReconError::InputParse {
        source: "roster".into(),
        message: e.to_string(),
    })?;
    for column in ROSTER_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(ReconError::InputParse {
                source: "roster".into(),
                message: format!("missing column '{column}'"),
            });
        }
    }

    let mut total = 0;
    let mut entries = Vec::new();
    for row in reader.deserialize::<RawRosterRow>() {
        total += 1;
        match row {
            Ok(raw) => entries.extend(raw.into_entry()),
            Err(e) => log::debug!("roster: dropping malformed row: {e}"),
        }
    }

    warn_if_unusable("roster", entries.len(), total);
    log::debug!("roster: {} of {} rows usable", entries.len(), total);
    Ok(RosterExport {
        source: SourceInfo {
            last_updated: None,
            record_count: Some(total),
        },
        entries,
    })
}

// ---------------------------------------------------------------------------
// Members listing
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    speakers: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSpeaker {
    Pair(String, String),
    Named {
        name: String,
        #[serde(default)]
        affiliation: String,
    },
}

/// `{"events": [...]}` or a bare array. Each event contributes one record
/// per speaker; `speakers` holds `[name, affiliation]` pairs or
/// `{"name", "affiliation"}` objects.
pub fn parse_listing_json(text: &str) -> Result<Vec<Record>, ReconError> {
    let root: Value = serde_json::from_str(text).map_err(|e| ReconError::InputParse {
        source: "listing".into(),
        message: e.to_string(),
    })?;
    let events = records_array(&root, "events", "listing")?;

    let mut records = Vec::new();
    for event in typed_records::<RawEvent>(events, "listing") {
        let Some(date) = event.date.as_deref().and_then(parse_date) else {
            continue;
        };
        let title = event.title.as_deref().unwrap_or("");
        let Some(category) = listing_category(event.category.as_deref(), title) else {
            continue;
        };
        for speaker in event.speakers {
            let (name, affiliation) = match serde_json::from_value::<RawSpeaker>(speaker) {
                Ok(RawSpeaker::Pair(name, affiliation)) => (name, affiliation),
                Ok(RawSpeaker::Named { name, affiliation }) => (name, affiliation),
                Err(_) => continue,
            };
            if name.trim().is_empty() {
                continue;
            }
            records.push(Record::new(date, category, name.trim(), affiliation.trim()));
        }
    }
    if records.is_empty() && !events.is_empty() {
        log::warn!("listing: {} events but no usable speakers", events.len());
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Public website
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawWebsiteEntry {
    #[serde(default, alias = "date")]
    date_iso: Option<String>,
    #[serde(default)]
    group_label: Option<String>,
    #[serde(default)]
    speaker_name: Option<String>,
}

/// `{"seminars": [...]}` or a bare array of `{date_iso, group_label, speaker_name}`.
pub fn parse_website_json(text: &str) -> Result<Vec<WebsiteRecord>, ReconError> {
    let root: Value = serde_json::from_str(text).map_err(|e| ReconError::InputParse {
        source: "website".into(),
        message: e.to_string(),
    })?;
    let entries = records_array(&root, "seminars", "website")?;

    let records = typed_records::<RawWebsiteEntry>(entries, "website")
        .filter_map(|raw| {
            let date = parse_date(raw.date_iso.as_deref()?)?;
            let group_label = raw.group_label.unwrap_or_default().trim().to_string();
            let speaker = raw.speaker_name?;
            if speaker.trim().is_empty() {
                return None;
            }
            Some(WebsiteRecord {
                group_label,
                record: Record::new(date, Category::ExternalWebsite, speaker.trim(), ""),
            })
        })
        .collect();
    Ok(records)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The record array: the root itself, or the array under `key`.
fn records_array<'v>(root: &'v Value, key: &str, source: &str) -> Result<&'v Vec<Value>, ReconError> {
    root.as_array()
        .or_else(|| root.get(key).and_then(Value::as_array))
        .ok_or_else(|| ReconError::InputParse {
            source: source.into(),
            message: format!("expected an array or an object with a '{key}' array"),
        })
}

fn warn_if_unusable(source: &str, usable: usize, total: usize) {
    if usable == 0 && total > 0 {
        log::warn!("{source}: none of {total} records could be used");
    }
}

/// Deserialize each element independently, dropping the ones that don't fit.
fn typed_records<'v, T>(values: &'v [Value], source: &'v str) -> impl Iterator<Item = T> + 'v
where
    T: serde::de::DeserializeOwned + 'v,
{
    values.iter().filter_map(move |v| match T::deserialize(v) {
        Ok(t) => Some(t),
        Err(e) => {
            log::debug!("{source}: dropping malformed record: {e}");
            None
        }
    })
}
