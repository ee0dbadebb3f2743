//! Slot reconciliation: one (date, category) slot, roster side against
//! listing side, to an ordered row list plus a slot summary.
//!
//! Passes run strictly in order over a per-slot working set of unconsumed
//! found records:
//!
//! 1. exact identity-key matches (`ok`)
//! 2. fuzzy matches on the identity key, then on the name alone (`warn`, or
//!    `ok` for a perfect name-only match)
//! 3. cross-date lookup for everything left on either side (`date_mismatch`),
//!    otherwise `bad` (missing) or `extra`
//! 4. a likely-pair hint when exactly one missing and one extra remain
//! 5. public-website annotation of the found side (External slots only)
//!
//! Consumption is greedy and irrevocable; the first acceptable candidate in
//! slot order wins.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::index::NameIndex;
use crate::model::{
    DateMismatch, LikelyPair, MismatchDirection, Record, Row, RowStatus, SlotSummary,
};
use crate::normalize::normalize;
use crate::similarity::{best_match, meets_threshold, percent, similarity};

/// Public-website listing used only to annotate notes.
#[derive(Debug, Clone, Copy)]
pub struct WebsiteCheck<'a> {
    pub index: &'a NameIndex,
    pub label: &'a str,
}

/// Read-only context shared by every pass of one slot.
#[derive(Debug, Clone, Copy)]
pub struct SlotContext<'a> {
    pub date: NaiveDate,
    /// Name of the observed listing, used in notes.
    pub source_label: &'a str,
    /// Global index of the observed listing (where leftover expected records look).
    pub found_index: &'a NameIndex,
    /// Global index of the roster (where leftover found records look).
    pub expected_index: &'a NameIndex,
    pub website: Option<WebsiteCheck<'a>>,
    pub min_score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlotOutcome {
    pub rows: Vec<Row>,
    pub summary: SlotSummary,
}

/// Reconcile one slot. Never fails: every input yields row-level output, and
/// every record of either side lands in exactly one row.
pub fn reconcile_slot(expected: &[Record], found: &[Record], ctx: &SlotContext<'_>) -> SlotOutcome {
    let mut pool = FoundPool::new(found);
    let mut rows = Vec::new();
    let mut summary = SlotSummary::default();

    let unmatched = exact_pass(expected, &mut pool, ctx, &mut rows);
    let unmatched = fuzzy_pass(unmatched, &mut pool, ctx, &mut rows, &mut summary);
    let (missing, extras) = leftover_pass(unmatched, &pool, ctx, &mut rows, &mut summary);

    if let ([missing], [extra]) = (missing.as_slice(), extras.as_slice()) {
        let (missing, extra) = (missing.display(), extra.display());
        let score = percent(similarity(&missing, &extra));
        summary.likely_pair = Some(LikelyPair { missing, extra, score });
    }

    log::debug!(
        "slot {} ({}): {} expected, {} found, {} rows, mismatch={}",
        ctx.date,
        ctx.source_label,
        expected.len(),
        found.len(),
        rows.len(),
        summary.any_mismatch,
    );

    SlotOutcome { rows, summary }
}

// ---------------------------------------------------------------------------
// Working set
// ---------------------------------------------------------------------------

/// Found records of one slot with their precomputed keys and consumption
/// flags. Lives only for one slot.
struct FoundPool<'r> {
    records: &'r [Record],
    keys: Vec<String>,
    names: Vec<String>,
    consumed: Vec<bool>,
}

impl<'r> FoundPool<'r> {
    fn new(records: &'r [Record]) -> Self {
        Self {
            records,
            keys: records.iter().map(Record::identity_key).collect(),
            names: records.iter().map(Record::normalized_name).collect(),
            consumed: vec![false; records.len()],
        }
    }

    fn available(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.records.len()).filter(|i| !self.consumed[*i])
    }

    /// First unconsumed record with exactly this identity key.
    fn find_key(&self, key: &str) -> Option<usize> {
        self.available().find(|i| self.keys[*i] == key)
    }

    fn consume(&mut self, i: usize) -> &'r Record {
        self.consumed[i] = true;
        &self.records[i]
    }

    fn remaining(&self) -> Vec<&'r Record> {
        self.available().map(|i| &self.records[i]).collect()
    }
}

// ---------------------------------------------------------------------------
// Passes
// ---------------------------------------------------------------------------

fn exact_pass<'e>(
    expected: &'e [Record],
    pool: &mut FoundPool<'_>,
    ctx: &SlotContext<'_>,
    rows: &mut Vec<Row>,
) -> Vec<&'e Record> {
    let mut unmatched = Vec::new();
    for e in expected {
        let Some(i) = pool.find_key(&e.identity_key()) else {
            unmatched.push(e);
            continue;
        };
        let f = pool.consume(i);
        let mut note = format!("Scheduled on {}", ctx.source_label);
        // Exact matches stay `ok`; the website finding is informational here.
        if let Some(msg) = website_note(ctx, &f.participant_name) {
            note.push_str("; ");
            note.push_str(&msg);
        }
        rows.push(Row {
            status: RowStatus::Ok,
            found_status: None,
            expected: e.display(),
            found: f.display(),
            note,
            score: None,
        });
    }
    unmatched
}

enum FuzzyKind {
    Identity,
    NameOnly,
}

fn fuzzy_pass<'e>(
    unmatched: Vec<&'e Record>,
    pool: &mut FoundPool<'_>,
    ctx: &SlotContext<'_>,
    rows: &mut Vec<Row>,
    summary: &mut SlotSummary,
) -> Vec<&'e Record> {
    let mut still_unmatched = Vec::new();
    for e in unmatched {
        let Some((i, score, kind)) = closest_candidate(e, pool, ctx.min_score) else {
            still_unmatched.push(e);
            continue;
        };
        let f = pool.consume(i);

        let (mut status, mut note) = match kind {
            FuzzyKind::NameOnly if score >= 1.0 => {
                (RowStatus::Ok, format!("Scheduled on {}", ctx.source_label))
            }
            FuzzyKind::NameOnly => (
                RowStatus::Warn,
                format!("Closest match on {} (name only)", ctx.source_label),
            ),
            FuzzyKind::Identity => (
                RowStatus::Warn,
                format!("Closest match on {}", ctx.source_label),
            ),
        };
        if let Some(msg) = website_note(ctx, &f.participant_name) {
            note.push_str("; ");
            note.push_str(&msg);
            if status == RowStatus::Ok {
                status = RowStatus::Warn;
            }
        }
        if status != RowStatus::Ok {
            summary.any_mismatch = true;
        }
        rows.push(Row {
            status,
            found_status: None,
            expected: e.display(),
            found: f.display(),
            note,
            score: Some(percent(score)),
        });
    }
    still_unmatched
}

/// Best unconsumed candidate for `e`: by identity key first, falling back to
/// the name alone when no key clears the threshold.
fn closest_candidate(
    e: &Record,
    pool: &FoundPool<'_>,
    min_score: f64,
) -> Option<(usize, f64, FuzzyKind)> {
    let target = e.identity_key();
    let (best, score) = best_match(&target, pool.available().map(|i| pool.keys[i].as_str()));
    if let Some(key) = best {
        if meets_threshold(score, min_score) {
            return pool.find_key(key).map(|i| (i, score, FuzzyKind::Identity));
        }
    }

    let target = e.normalized_name();
    let mut best: Option<usize> = None;
    let mut best_score = 0.0;
    for i in pool.available() {
        let name = &pool.names[i];
        if name.is_empty() {
            continue;
        }
        let score = similarity(&target, name);
        if score > best_score {
            best = Some(i);
            best_score = score;
        }
    }
    best.filter(|_| meets_threshold(best_score, min_score))
        .map(|i| (i, best_score, FuzzyKind::NameOnly))
}

/// A leftover record after both matching passes, classified on its own.
struct Leftover {
    display: String,
    status: RowStatus,
    notes: Vec<String>,
}

fn leftover_pass<'e, 'f>(
    unmatched: Vec<&'e Record>,
    pool: &FoundPool<'f>,
    ctx: &SlotContext<'_>,
    rows: &mut Vec<Row>,
    summary: &mut SlotSummary,
) -> (Vec<&'e Record>, Vec<&'f Record>) {
    let mut true_missing = Vec::new();
    let mut true_extra = Vec::new();

    let mut expected_side = Vec::new();
    for e in unmatched {
        let display = e.display();
        let leftover = match ctx.found_index.elsewhere(&e.normalized_name(), ctx.date) {
            Some(other) => {
                summary.date_mismatches.push(DateMismatch {
                    participant: display.clone(),
                    expected_date: ctx.date,
                    actual_date: other.date,
                    direction: MismatchDirection::RosterToListing,
                });
                Leftover {
                    display,
                    status: RowStatus::DateMismatch,
                    notes: vec![format!("Scheduled on {} on {}", other.date, ctx.source_label)],
                }
            }
            None => {
                summary.missing.push(display.clone());
                true_missing.push(e);
                Leftover {
                    display,
                    status: RowStatus::Bad,
                    notes: vec![format!("Not scheduled on {}", ctx.source_label)],
                }
            }
        };
        expected_side.push(leftover);
    }

    let mut found_side = Vec::new();
    for f in pool.remaining() {
        let display = f.display();
        let mut leftover = match ctx.expected_index.elsewhere(&f.normalized_name(), ctx.date) {
            Some(other) => {
                summary.date_mismatches.push(DateMismatch {
                    participant: display.clone(),
                    expected_date: other.date,
                    actual_date: ctx.date,
                    direction: MismatchDirection::ListingToRoster,
                });
                Leftover {
                    display,
                    status: RowStatus::DateMismatch,
                    notes: vec![format!("On the roster for {}", other.date)],
                }
            }
            None => {
                summary.extras.push(display.clone());
                true_extra.push(f);
                Leftover {
                    display,
                    status: RowStatus::Extra,
                    notes: vec!["Not on the roster".to_string()],
                }
            }
        };
        if let Some(msg) = website_note(ctx, &f.participant_name) {
            leftover.notes.push(msg);
        }
        found_side.push(leftover);
    }

    // Side-by-side layout only; each side keeps its own classification.
    let paired = expected_side.len().max(found_side.len());
    let mut expected_side = expected_side.into_iter();
    let mut found_side = found_side.into_iter();
    for _ in 0..paired {
        let row = match (expected_side.next(), found_side.next()) {
            (Some(m), Some(x)) => Row {
                status: m.status,
                found_status: Some(x.status),
                expected: m.display,
                found: x.display,
                note: m.notes.into_iter().chain(x.notes).collect::<Vec<_>>().join("; "),
                score: None,
            },
            (Some(m), None) => Row {
                status: m.status,
                found_status: None,
                expected: m.display,
                found: String::new(),
                note: m.notes.join("; "),
                score: None,
            },
            (None, Some(x)) => Row {
                status: x.status,
                found_status: None,
                expected: String::new(),
                found: x.display,
                note: x.notes.join("; "),
                score: None,
            },
            (None, None) => break,
        };
        summary.any_mismatch = true;
        rows.push(row);
    }

    (true_missing, true_extra)
}

/// Note for a found participant who is absent from the public website, or
/// listed there only on other dates.
fn website_note(ctx: &SlotContext<'_>, participant_name: &str) -> Option<String> {
    let check = ctx.website?;
    let name = normalize(participant_name);
    if name.is_empty() {
        return None;
    }
    let occurrences = check.index.occurrences(&name);
    if occurrences.is_empty() {
        return Some(format!("Missing from {}", check.label));
    }
    if occurrences.iter().any(|occ| occ.date == ctx.date) {
        return None;
    }
    let dates: BTreeSet<NaiveDate> = occurrences.iter().map(|occ| occ.date).collect();
    let dates: Vec<String> = dates.iter().map(|d| d.to_string()).collect();
    Some(format!("On {} for {}", check.label, dates.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{index_records, SourcePolicy};
    use crate::model::Category;
    use crate::similarity::MIN_SCORE;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn rec(d: &str, name: &str, aff: &str) -> Record {
        Record::new(date(d), Category::Internal, name, aff)
    }

    fn ext(d: &str, name: &str) -> Record {
        Record::new(date(d), Category::External, name, "")
    }

    struct Fixture {
        roster: NameIndex,
        listing: NameIndex,
        website: Option<NameIndex>,
    }

    impl Fixture {
        fn new(roster: &[Record], listing: &[Record]) -> Self {
            let today = date("2026-01-01");
            Self {
                roster: index_records(roster, today, SourcePolicy::Roster).by_name,
                listing: index_records(listing, today, SourcePolicy::Observed).by_name,
                website: None,
            }
        }

        fn with_website(mut self, website: &[Record]) -> Self {
            let today = date("2026-01-01");
            self.website = Some(index_records(website, today, SourcePolicy::Observed).by_name);
            self
        }

        fn ctx(&self, d: &str) -> SlotContext<'_> {
            SlotContext {
                date: date(d),
                source_label: "members site",
                found_index: &self.listing,
                expected_index: &self.roster,
                website: self.website.as_ref().map(|index| WebsiteCheck {
                    index,
                    label: "public site",
                }),
                min_score: MIN_SCORE,
            }
        }
    }

    #[test]
    fn exact_match_is_ok_without_score() {
        let expected = vec![rec("2026-01-10", "Jane Doe", "Lab A")];
        let found = vec![rec("2026-01-10", "Jane Doe", "Lab A")];
        let fx = Fixture::new(&expected, &found);

        let out = reconcile_slot(&expected, &found, &fx.ctx("2026-01-10"));
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0].status, RowStatus::Ok);
        assert_eq!(out.rows[0].score, None);
        assert_eq!(out.rows[0].note, "Scheduled on members site");
        assert!(!out.summary.any_mismatch);
        assert!(out.summary.missing.is_empty());
        assert!(out.summary.extras.is_empty());
    }

    #[test]
    fn exact_match_ignores_case_and_punctuation() {
        let expected = vec![rec("2026-01-10", "Mary-Ann O'Neil", "Lab A.")];
        let found = vec![rec("2026-01-10", "maryann oneil", "LAB A")];
        let fx = Fixture::new(&expected, &found);

        let out = reconcile_slot(&expected, &found, &fx.ctx("2026-01-10"));
        assert_eq!(out.rows[0].status, RowStatus::Ok);
        assert_eq!(out.rows[0].score, None);
    }

    #[test]
    fn duplicate_found_entry_consumed_once() {
        let expected = vec![rec("2026-01-10", "Jane Doe", "Lab A")];
        let found = vec![
            rec("2026-01-10", "Jane Doe", "Lab A"),
            rec("2026-01-10", "Jane Doe", "Lab A"),
        ];
        let fx = Fixture::new(&expected, &found);

        let out = reconcile_slot(&expected, &found, &fx.ctx("2026-01-10"));
        assert_eq!(out.rows.len(), 2);
        assert_eq!(out.rows[0].status, RowStatus::Ok);
        assert_eq!(out.rows[1].status, RowStatus::Extra);
        assert_eq!(out.summary.extras, vec!["Jane Doe (Lab A)"]);
    }

    #[test]
    fn fuzzy_identity_match_warns_with_score() {
        let expected = vec![rec("2026-01-10", "Jon Smith", "")];
        let found = vec![rec("2026-01-10", "John Smith", "")];
        let fx = Fixture::new(&expected, &found);

        let out = reconcile_slot(&expected, &found, &fx.ctx("2026-01-10"));
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0].status, RowStatus::Warn);
        assert_eq!(out.rows[0].score, Some(96));
        assert_eq!(out.rows[0].note, "Closest match on members site");
        assert!(out.summary.any_mismatch);
        assert!(out.summary.missing.is_empty());
    }

    #[test]
    fn name_only_perfect_match_is_ok() {
        // Affiliation garbled beyond the key threshold; the name is identical.
        let expected = vec![rec("2026-01-10", "Al Wu", "Molecular Neurodevelopment Laboratory")];
        let found = vec![rec("2026-01-10", "Al Wu", "")];
        let fx = Fixture::new(&expected, &found);

        let out = reconcile_slot(&expected, &found, &fx.ctx("2026-01-10"));
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0].status, RowStatus::Ok);
        assert_eq!(out.rows[0].score, Some(100));
        assert_eq!(out.rows[0].note, "Scheduled on members site");
        assert!(!out.summary.any_mismatch);
    }

    #[test]
    fn name_only_close_match_warns() {
        let expected = vec![rec("2026-01-10", "Katherine Smith", "Molecular Neurodevelopment Laboratory")];
        let found = vec![rec("2026-01-10", "Catherine Smith", "")];
        let fx = Fixture::new(&expected, &found);

        let out = reconcile_slot(&expected, &found, &fx.ctx("2026-01-10"));
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0].status, RowStatus::Warn);
        assert_eq!(out.rows[0].note, "Closest match on members site (name only)");
        // 2 * 14 / 30
        assert_eq!(out.rows[0].score, Some(93));
    }

    #[test]
    fn threshold_is_configurable_and_inclusive() {
        // "abcd ()" vs "abcdef ()": 2 * 7 / 16 = 0.875
        let expected = vec![rec("2026-01-10", "abcd", "")];
        let found = vec![rec("2026-01-10", "abcdef", "")];
        let fx = Fixture::new(&expected, &found);

        let mut ctx = fx.ctx("2026-01-10");
        ctx.min_score = 0.875;
        let out = reconcile_slot(&expected, &found, &ctx);
        assert_eq!(out.rows[0].status, RowStatus::Warn);
        assert_eq!(out.rows[0].score, Some(88));

        ctx.min_score = 0.9;
        let out = reconcile_slot(&expected, &found, &ctx);
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0].status, RowStatus::Bad);
        assert_eq!(out.rows[0].found_status, Some(RowStatus::Extra));
    }

    #[test]
    fn exact_beats_earlier_fuzzy_candidate() {
        let expected = vec![
            rec("2026-01-10", "Jon Smith", ""),
            rec("2026-01-10", "John Smith", ""),
        ];
        let found = vec![rec("2026-01-10", "John Smith", "")];
        let fx = Fixture::new(&expected, &found);

        let out = reconcile_slot(&expected, &found, &fx.ctx("2026-01-10"));
        assert_eq!(out.rows[0].status, RowStatus::Ok);
        assert_eq!(out.rows[0].expected, "John Smith");
        assert_eq!(out.rows[1].status, RowStatus::Bad);
        assert_eq!(out.rows[1].expected, "Jon Smith");
    }

    #[test]
    fn leftover_expected_elsewhere_is_date_mismatch() {
        let expected = vec![rec("2026-01-10", "Jane Doe", "Lab A")];
        let listing = vec![rec("2026-01-17", "Jane Doe", "Lab A")];
        let fx = Fixture::new(&expected, &listing);

        let out = reconcile_slot(&expected, &[], &fx.ctx("2026-01-10"));
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0].status, RowStatus::DateMismatch);
        assert_eq!(out.rows[0].note, "Scheduled on 2026-01-17 on members site");
        assert!(out.summary.missing.is_empty());
        assert_eq!(
            out.summary.date_mismatches,
            vec![DateMismatch {
                participant: "Jane Doe (Lab A)".into(),
                expected_date: date("2026-01-10"),
                actual_date: date("2026-01-17"),
                direction: MismatchDirection::RosterToListing,
            }]
        );
    }

    #[test]
    fn leftover_found_elsewhere_on_roster_is_date_mismatch() {
        let roster = vec![rec("2026-01-17", "Bob Young", "")];
        let found = vec![rec("2026-01-10", "Bob Young", "")];
        let fx = Fixture::new(&roster, &found);

        let out = reconcile_slot(&[], &found, &fx.ctx("2026-01-10"));
        assert_eq!(out.rows[0].status, RowStatus::DateMismatch);
        assert_eq!(out.rows[0].expected, "");
        assert_eq!(out.rows[0].found, "Bob Young");
        assert_eq!(out.summary.date_mismatches[0].direction, MismatchDirection::ListingToRoster);
        assert_eq!(out.summary.date_mismatches[0].expected_date, date("2026-01-17"));
        assert!(out.summary.extras.is_empty());
    }

    #[test]
    fn true_extra() {
        let found = vec![rec("2026-01-10", "Bob Young", "")];
        let fx = Fixture::new(&[], &found);

        let out = reconcile_slot(&[], &found, &fx.ctx("2026-01-10"));
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0].status, RowStatus::Extra);
        assert_eq!(out.summary.extras, vec!["Bob Young"]);
        assert!(out.summary.any_mismatch);
        assert!(out.summary.likely_pair.is_none());
    }

    #[test]
    fn missing_and_extra_pair_for_layout_and_hint() {
        let expected = vec![rec("2026-01-10", "Amy Lee", "")];
        let found = vec![rec("2026-01-10", "Bo Chen", "")];
        let fx = Fixture::new(&expected, &found);

        let out = reconcile_slot(&expected, &found, &fx.ctx("2026-01-10"));
        assert_eq!(out.rows.len(), 1);
        let row = &out.rows[0];
        assert_eq!(row.status, RowStatus::Bad);
        assert_eq!(row.found_status, Some(RowStatus::Extra));
        assert_eq!(row.note, "Not scheduled on members site; Not on the roster");

        assert_eq!(out.summary.missing, vec!["Amy Lee"]);
        assert_eq!(out.summary.extras, vec!["Bo Chen"]);
        let hint = out.summary.likely_pair.as_ref().unwrap();
        assert_eq!(hint.missing, "Amy Lee");
        assert_eq!(hint.extra, "Bo Chen");
        assert!(hint.score < 80);
    }

    #[test]
    fn likely_pair_scores_the_displayed_names() {
        let expected = vec![rec("2026-01-10", "Amy Lee", "")];
        let found = vec![rec("2026-01-10", "Amy Li", "")];
        let fx = Fixture::new(&expected, &found);
        let mut ctx = fx.ctx("2026-01-10");
        ctx.min_score = 0.9;

        let out = reconcile_slot(&expected, &found, &ctx);
        let hint = out.summary.likely_pair.as_ref().unwrap();
        assert_eq!((hint.missing.as_str(), hint.extra.as_str()), ("Amy Lee", "Amy Li"));
        assert_eq!(hint.score, 77);
    }

    #[test]
    fn pairing_does_not_mask_date_mismatch_or_missing() {
        let expected = vec![rec("2026-01-10", "Amy Lee", "")];
        let found = vec![rec("2026-01-10", "Bob Young", "")];
        let roster_all = vec![
            rec("2026-01-10", "Amy Lee", ""),
            rec("2026-01-24", "Bob Young", ""),
        ];
        let fx = Fixture::new(&roster_all, &found);

        let out = reconcile_slot(&expected, &found, &fx.ctx("2026-01-10"));
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0].status, RowStatus::Bad);
        assert_eq!(out.rows[0].found_status, Some(RowStatus::DateMismatch));
        assert_eq!(out.summary.missing, vec!["Amy Lee"]);
        assert_eq!(out.summary.date_mismatches.len(), 1);
        assert!(out.summary.likely_pair.is_none());
    }

    #[test]
    fn no_hint_when_leftovers_are_ambiguous() {
        let expected = vec![rec("2026-01-10", "Amy Lee", ""), rec("2026-01-10", "Cat Ng", "")];
        let found = vec![rec("2026-01-10", "Bo Chen", ""), rec("2026-01-10", "Dev Rao", "")];
        let fx = Fixture::new(&expected, &found);

        let out = reconcile_slot(&expected, &found, &fx.ctx("2026-01-10"));
        assert_eq!(out.rows.len(), 2);
        assert_eq!(out.summary.missing.len(), 2);
        assert_eq!(out.summary.extras.len(), 2);
        assert!(out.summary.likely_pair.is_none());
    }

    #[test]
    fn uneven_leftovers_each_get_a_row() {
        let expected = vec![
            rec("2026-01-10", "Amy Lee", ""),
            rec("2026-01-10", "Cat Ng", ""),
            rec("2026-01-10", "Eve Park", ""),
        ];
        let found = vec![rec("2026-01-10", "Bo Chen", "")];
        let fx = Fixture::new(&expected, &found);

        let out = reconcile_slot(&expected, &found, &fx.ctx("2026-01-10"));
        assert_eq!(out.rows.len(), 3);
        assert_eq!(out.rows[0].found, "Bo Chen");
        assert_eq!(out.rows[1].found, "");
        assert_eq!(out.rows[2].found, "");
        assert!(out.rows.iter().all(|r| r.status == RowStatus::Bad));
    }

    #[test]
    fn website_absence_downgrades_name_only_ok() {
        let expected = vec![ext("2026-01-10", "Al Wu")];
        let mut expected_with_lab = expected.clone();
        expected_with_lab[0].affiliation = "Molecular Neurodevelopment Laboratory".into();
        let found = vec![ext("2026-01-10", "Al Wu")];
        let fx = Fixture::new(&expected_with_lab, &found).with_website(&[]);

        let out = reconcile_slot(&expected_with_lab, &found, &fx.ctx("2026-01-10"));
        assert_eq!(out.rows[0].status, RowStatus::Warn);
        assert_eq!(out.rows[0].note, "Scheduled on members site; Missing from public site");
        assert!(out.summary.any_mismatch);
    }

    #[test]
    fn website_note_on_exact_match_keeps_ok() {
        let expected = vec![ext("2026-01-10", "Jane Doe")];
        let found = vec![ext("2026-01-10", "Jane Doe")];
        let website = vec![ext("2026-01-24", "Jane Doe"), ext("2026-01-17", "Jane Doe")];
        let fx = Fixture::new(&expected, &found).with_website(&website);

        let out = reconcile_slot(&expected, &found, &fx.ctx("2026-01-10"));
        assert_eq!(out.rows[0].status, RowStatus::Ok);
        assert_eq!(out.rows[0].score, None);
        assert_eq!(
            out.rows[0].note,
            "Scheduled on members site; On public site for 2026-01-17, 2026-01-24"
        );
    }

    #[test]
    fn website_on_same_date_adds_nothing() {
        let expected = vec![ext("2026-01-10", "Jane Doe")];
        let found = vec![ext("2026-01-10", "Jane Doe")];
        let website = vec![ext("2026-01-10", "Jane Doe")];
        let fx = Fixture::new(&expected, &found).with_website(&website);

        let out = reconcile_slot(&expected, &found, &fx.ctx("2026-01-10"));
        assert_eq!(out.rows[0].note, "Scheduled on members site");
    }

    #[test]
    fn website_note_on_extra() {
        let found = vec![ext("2026-01-10", "Bob Young")];
        let fx = Fixture::new(&[], &found).with_website(&[]);

        let out = reconcile_slot(&[], &found, &fx.ctx("2026-01-10"));
        assert_eq!(out.rows[0].status, RowStatus::Extra);
        assert_eq!(out.rows[0].note, "Not on the roster; Missing from public site");
    }

    #[test]
    fn every_record_lands_in_one_row() {
        let expected = vec![
            rec("2026-01-10", "Jane Doe", "Lab A"),
            rec("2026-01-10", "Jon Smith", ""),
            rec("2026-01-10", "Amy Lee", ""),
        ];
        let found = vec![
            rec("2026-01-10", "Jane Doe", "Lab A"),
            rec("2026-01-10", "John Smith", ""),
            rec("2026-01-10", "Bo Chen", ""),
            rec("2026-01-10", "Dev Rao", ""),
        ];
        let fx = Fixture::new(&expected, &found);

        let out = reconcile_slot(&expected, &found, &fx.ctx("2026-01-10"));
        let expected_cells = out.rows.iter().filter(|r| !r.expected.is_empty()).count();
        let found_cells = out.rows.iter().filter(|r| !r.found.is_empty()).count();
        assert_eq!(expected_cells, expected.len());
        assert_eq!(found_cells, found.len());
    }
}
