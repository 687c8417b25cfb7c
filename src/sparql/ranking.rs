//! Reduction of per-language result rows to one record per entity.
//!
//! A display query returns one row per preferred-label language, so the same
//! subject shows up several times. For each subject the first row is kept and
//! then replaced by a later row that is a better fit for the requested
//! language:
//!
//! 1. a kept row whose tag equals the request is final;
//! 2. a row with the exact tag always wins;
//! 3. a row sharing the primary language wins over anything but an exact tag;
//! 4. an English row wins over a row that matches in no way.

use indexmap::IndexMap;

use crate::language;
use crate::query::{ResultRecord, SortKey, SortOrder};

/// How well a row's language fits the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Fit {
    Other,
    English,
    Base,
    Exact,
}

fn fit(lang: &str, requested: &str) -> Fit {
    if language::same_tag(lang, requested) {
        Fit::Exact
    } else if language::same_base(lang, requested) {
        Fit::Base
    } else if language::same_tag(lang, "en") {
        Fit::English
    } else {
        Fit::Other
    }
}

fn replaces(candidate: Fit, kept: Fit) -> bool {
    match candidate {
        Fit::Exact | Fit::Base => kept != Fit::Exact,
        Fit::English => kept < Fit::Base,
        Fit::Other => false,
    }
}

/// Keeps one record per URI, in first-seen order, with the best label for
/// `requested`.
#[must_use]
pub fn rank(records: Vec<ResultRecord>, requested: &str) -> Vec<ResultRecord> {
    let mut kept: IndexMap<String, (Fit, ResultRecord)> = IndexMap::new();
    for record in records {
        let candidate = fit(&record.lang, requested);
        match kept.get_mut(&record.uri) {
            None => {
                kept.insert(record.uri.clone(), (candidate, record));
            },
            Some(slot) => {
                if replaces(candidate, slot.0) {
                    *slot = (candidate, record);
                }
            },
        }
    }
    kept.into_values().map(|(_, record)| record).collect()
}

/// Sorts records on `key`, reversing for [`SortOrder::Desc`].
pub fn sort(records: &mut [ResultRecord], key: SortKey, order: SortOrder) {
    records.sort_by(|a, b| {
        let ordering = key.compare(a, b);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}
