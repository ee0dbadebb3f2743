use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::config::{GroupConfig, ReconConfig};
use crate::index::{group_by_slot, index_records, NameIndex, SourceIndex, SourcePolicy};
use crate::model::{
    Category, GroupInput, GroupReport, ReconInput, ReconMeta, ReconReport, Record, SlotKey,
    SlotReport, WebsiteRecord,
};
use crate::normalize::normalize;
use crate::priority::extract_priority;
use crate::reconcile::{reconcile_slot, SlotContext, WebsiteCheck};
use crate::summary::compute_summary;

const FALLBACK_WEBSITE_LABEL: &str = "public site";
const FALLBACK_WEBSITE_TITLE: &str = "Public website event";

/// Run the whole check: every configured group, then the priority list and
/// run-level summary. `today` fixes the past-date cutoff and the priority
/// window. Expects a config that passed [`ReconConfig::validate`].
pub fn run(config: &ReconConfig, input: &ReconInput, today: NaiveDate) -> ReconReport {
    let (website_label, website_title) = config
        .website
        .as_ref()
        .map(|w| (w.label.as_str(), w.title.as_str()))
        .unwrap_or((FALLBACK_WEBSITE_LABEL, FALLBACK_WEBSITE_TITLE));

    // Annotation index over every website entry, regardless of group.
    let website_index = input.website.as_ref().map(|entries| {
        let records: Vec<Record> = entries.iter().map(|w| w.record.clone()).collect();
        index_records(&records, today, SourcePolicy::Observed).by_name
    });
    let website_check = website_index.as_ref().map(|index| WebsiteCheck {
        index,
        label: website_label,
    });

    let empty = GroupInput::default();
    let mut groups = Vec::with_capacity(config.groups.len());
    for group in &config.groups {
        let group_input = input
            .groups
            .iter()
            .find(|g| g.group == group.display)
            .unwrap_or(&empty);

        let roster = index_records(&group_input.roster, today, SourcePolicy::Roster);
        let listing = index_records(&group_input.listing, today, SourcePolicy::Observed);

        let mut slots = reconcile_source(
            &roster,
            &listing,
            &config.listing.label,
            &config.listing.title,
            website_check,
            config.matching.min_score,
        );

        if let Some(entries) = &input.website {
            let (website_roster, website_listing) = website_sources(group, &roster, entries, today);
            slots.extend(reconcile_source(
                &website_roster,
                &website_listing,
                website_label,
                website_title,
                None,
                config.matching.min_score,
            ));
        }

        slots.sort_by_key(|s| (s.date, s.category));
        log::debug!("group '{}': {} slots", group.display, slots.len());

        groups.push(GroupReport {
            display: group.display.clone(),
            roster_name: group.roster_name.clone(),
            url: group.url.clone(),
            slots,
        });
    }

    let priority = extract_priority(&groups, today, config.priority.window_days);
    let summary = compute_summary(&groups, priority.len());

    log::info!(
        "checked {} groups: {} slots, {} mismatched, {} missing, {} needing action",
        groups.len(),
        summary.total_slots,
        summary.mismatched_slots,
        summary.missing,
        summary.priority_items,
    );

    ReconReport {
        meta: ReconMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            today,
            source: input.source.clone(),
        },
        summary,
        groups,
        priority,
    }
}

/// Reconcile every slot present on either side of one source pair.
fn reconcile_source(
    expected: &SourceIndex,
    found: &SourceIndex,
    source_label: &str,
    title: &str,
    website: Option<WebsiteCheck<'_>>,
    min_score: f64,
) -> Vec<SlotReport> {
    let keys: BTreeSet<SlotKey> = expected
        .by_slot
        .keys()
        .chain(found.by_slot.keys())
        .copied()
        .collect();

    keys.into_iter()
        .map(|key| {
            let ctx = SlotContext {
                date: key.date,
                source_label,
                found_index: &found.by_name,
                expected_index: &expected.by_name,
                website: website.filter(|_| key.category == Category::External),
                min_score,
            };
            let outcome = reconcile_slot(slot_records(expected, &key), slot_records(found, &key), &ctx);
            SlotReport {
                date: key.date,
                category: key.category,
                title: title.to_string(),
                source_label: source_label.to_string(),
                rows: outcome.rows,
                summary: outcome.summary,
            }
        })
        .collect()
}

fn slot_records<'s>(source: &'s SourceIndex, key: &SlotKey) -> &'s [Record] {
    source.by_slot.get(key).map(Vec::as_slice).unwrap_or(&[])
}

/// The roster's External records re-keyed as website slots, and this group's
/// website entries. Each side gets its own name index.
fn website_sources(
    group: &GroupConfig,
    roster: &SourceIndex,
    entries: &[WebsiteRecord],
    today: NaiveDate,
) -> (SourceIndex, SourceIndex) {
    let external = roster
        .by_slot
        .iter()
        .filter(|(key, _)| key.category == Category::External)
        .flat_map(|(_, records)| records.iter())
        .map(|r| Record {
            category: Category::ExternalWebsite,
            ..r.clone()
        });
    let by_slot: BTreeMap<SlotKey, Vec<Record>> = group_by_slot(external);
    let by_name = NameIndex::from_slots(&by_slot);
    let expected = SourceIndex { by_slot, by_name };

    let label = normalize(group.website_label());
    let published: Vec<Record> = entries
        .iter()
        .filter(|w| normalize(&w.group_label) == label)
        .map(|w| w.record.clone())
        .collect();
    let found = index_records(&published, today, SourcePolicy::Observed);

    (expected, found)
}
