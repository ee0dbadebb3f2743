//! Per-source indexes: records grouped by slot, plus a cross-date name index.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::model::{Category, Record, RecordStatus, SlotKey};
use crate::normalize::normalize;

/// Which filtering rules apply to a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourcePolicy {
    /// The authoritative roster: only confirmed records participate.
    Roster,
    /// An observed listing: everything published counts.
    Observed,
}

/// Where a name occurs in a source.
#[derive(Debug, Clone, PartialEq)]
pub struct NameOccurrence {
    pub date: NaiveDate,
    pub category: Category,
}

/// Normalized participant name -> every occurrence across all slots of one
/// source, in slot order. Built once per run; read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    entries: HashMap<String, Vec<NameOccurrence>>,
}

impl NameIndex {
    /// Index every record of the given slots. Names that normalize to the
    /// empty string are not indexed.
    pub fn from_slots(by_slot: &BTreeMap<SlotKey, Vec<Record>>) -> Self {
        let mut entries: HashMap<String, Vec<NameOccurrence>> = HashMap::new();
        for (key, records) in by_slot {
            for record in records {
                let name = record.normalized_name();
                if name.is_empty() {
                    continue;
                }
                entries.entry(name).or_default().push(NameOccurrence {
                    date: key.date,
                    category: key.category,
                });
            }
        }
        Self { entries }
    }

    pub fn occurrences(&self, normalized_name: &str) -> &[NameOccurrence] {
        self.entries
            .get(normalized_name)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// First occurrence of the name on any date other than `date`.
    pub fn elsewhere(&self, normalized_name: &str, date: NaiveDate) -> Option<&NameOccurrence> {
        if normalized_name.is_empty() {
            return None;
        }
        self.occurrences(normalized_name)
            .iter()
            .find(|occ| occ.date != date)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All indexes for one source.
#[derive(Debug, Clone, Default)]
pub struct SourceIndex {
    /// Records per slot, sorted by (normalized name, normalized affiliation).
    pub by_slot: BTreeMap<SlotKey, Vec<Record>>,
    pub by_name: NameIndex,
}

/// Group a flat record list into slots and build its name index.
///
/// Dropped before indexing: records dated before `today`, records with a
/// blank participant name, and (for the roster) unconfirmed records.
pub fn index_records(records: &[Record], today: NaiveDate, policy: SourcePolicy) -> SourceIndex {
    let by_slot = group_by_slot(records.iter().filter(|r| admits(r, today, policy)).cloned());
    let by_name = NameIndex::from_slots(&by_slot);
    SourceIndex { by_slot, by_name }
}

/// Group already-admitted records by slot with the deterministic in-slot order.
pub fn group_by_slot<I>(records: I) -> BTreeMap<SlotKey, Vec<Record>>
where
    I: IntoIterator<Item = Record>,
{
    let mut by_slot: BTreeMap<SlotKey, Vec<Record>> = BTreeMap::new();
    for record in records {
        by_slot.entry(record.slot_key()).or_default().push(record);
    }
    for records in by_slot.values_mut() {
        records.sort_by_cached_key(|r| (r.normalized_name(), normalize(&r.affiliation)));
    }
    by_slot
}

fn admits(record: &Record, today: NaiveDate, policy: SourcePolicy) -> bool {
    if record.participant_name.trim().is_empty() {
        log::debug!("dropping record without a participant name on {}", record.date);
        return false;
    }
    if record.date < today {
        return false;
    }
    if policy == SourcePolicy::Roster && record.status != RecordStatus::Confirmed {
        return false;
    }
    true
}
