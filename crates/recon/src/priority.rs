//! "Needs action" list: slots in the near-term window with missing records.

use chrono::{Days, NaiveDate};

use crate::model::{GroupReport, PriorityItem};

/// Scan every slot of every group. A slot yields one item when its date is
/// within `[today, today + window_days]`, its category is Internal or
/// External, and it has at least one true missing name.
///
/// Sorted by date; ties keep group iteration order.
pub fn extract_priority(groups: &[GroupReport], today: NaiveDate, window_days: u32) -> Vec<PriorityItem> {
    let horizon = today
        .checked_add_days(Days::new(u64::from(window_days)))
        .unwrap_or(NaiveDate::MAX);

    let mut items: Vec<PriorityItem> = groups
        .iter()
        .flat_map(|group| {
            group
                .slots
                .iter()
                .filter(move |slot| {
                    slot.date >= today
                        && slot.date <= horizon
                        && slot.category.is_scheduled()
                        && !slot.summary.missing.is_empty()
                })
                .map(move |slot| PriorityItem {
                    group: group.display.clone(),
                    date: slot.date,
                    category: slot.category,
                    title: slot.title.clone(),
                    missing_names: slot.summary.missing.clone(),
                    source_url: group.url.clone(),
                })
        })
        .collect();

    // Vec::sort_by_key is stable.
    items.sort_by_key(|item| item.date);
    items
}
