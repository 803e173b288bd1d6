//! Sort and filter policy
//!
//! Both operations are pure: sorting consumes and returns a vector, filtering
//! clones matching records out of a snapshot. Neither touches the store, and
//! re-running either with unchanged inputs reproduces the same values.

use chrono::NaiveDate;

use crate::model::{Activity, Priority, Record};

/// Default ordering for activities: priority rank ascending (Alta first,
/// missing priority last), then due date ascending with undated entries after
/// all dated ones, then id ascending as the stability tie-break.
///
/// Idempotent: sorting an already-sorted sequence yields the identical order.
pub fn sort_activities(mut items: Vec<Activity>) -> Vec<Activity> {
    items.sort_by_key(activity_sort_key);
    items
}

fn activity_sort_key(activity: &Activity) -> (u8, NaiveDate, i64) {
    (
        Priority::rank(activity.priority),
        activity.due_date.unwrap_or(NaiveDate::MAX),
        activity.id,
    )
}

/// Status filter: an exact label, or the `All` wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(String),
}

impl StatusFilter {
    fn matches(&self, label: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == label,
        }
    }
}

/// List filter: a record matches iff its status passes the status filter AND
/// at least one free-text field contains the search term as a
/// case-insensitive substring. An empty term matches everything.
pub fn filter_records<R: Record>(items: &[R], status: &StatusFilter, term: &str) -> Vec<R> {
    let needle = term.to_lowercase();
    items
        .iter()
        .filter(|record| status.matches(record.status_label()))
        .filter(|record| {
            needle.is_empty()
                || record
                    .search_fields()
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}
