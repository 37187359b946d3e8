// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise grouping and progress calculation.
//!
//! Everything here is a pure function of an owner-scoped entry snapshot.
//! Callers recompute the whole overview whenever the snapshot or the
//! filter text changes; nothing is cached between passes.

use std::collections::HashMap;

use crate::models::entry::{Entry, EntryView};
use crate::models::exercise::{ExerciseSummary, Progress};

/// All entries sharing one exact exercise name.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseGroup {
    pub name: String,
    pub entries: Vec<Entry>,
}

impl ExerciseGroup {
    /// Newest creation timestamp in the group, if any entry carries one.
    pub fn latest_timestamp(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.entries.iter().filter_map(|e| e.created_at).max()
    }
}

/// Exercise name → entries mapping.
///
/// Groups enumerate in the order their name first appeared in the input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExerciseGroups {
    groups: Vec<ExerciseGroup>,
}

impl ExerciseGroups {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExerciseGroup> {
        self.groups.iter()
    }

    /// Look up a group by its exact name.
    pub fn get(&self, name: &str) -> Option<&ExerciseGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.name.as_str()).collect()
    }
}

impl IntoIterator for ExerciseGroups {
    type Item = ExerciseGroup;
    type IntoIter = std::vec::IntoIter<ExerciseGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

/// Partition entries by exact (case-sensitive) exercise name.
///
/// Entries keep their input order inside each group; no sorting happens
/// here.
pub fn group<I>(entries: I) -> ExerciseGroups
where
    I: IntoIterator<Item = Entry>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<ExerciseGroup> = Vec::new();

    for entry in entries {
        match index.get(&entry.exercise) {
            Some(&i) => groups[i].entries.push(entry),
            None => {
                index.insert(entry.exercise.clone(), groups.len());
                groups.push(ExerciseGroup {
                    name: entry.exercise.clone(),
                    entries: vec![entry],
                });
            }
        }
    }

    ExerciseGroups { groups }
}

/// Keep only groups whose name contains `query`, ignoring case.
///
/// An empty query keeps every group.
pub fn filter(groups: ExerciseGroups, query: &str) -> ExerciseGroups {
    if query.is_empty() {
        return groups;
    }

    let needle = query.to_lowercase();
    ExerciseGroups {
        groups: groups
            .groups
            .into_iter()
            .filter(|g| g.name.to_lowercase().contains(&needle))
            .collect(),
    }
}

/// Group names ordered by their newest entry, most recent first.
///
/// Groups without any timestamped entry come last. Ties keep the
/// enumeration order of `groups`.
pub fn order_groups_by_recency(groups: &ExerciseGroups) -> Vec<String> {
    let mut keyed: Vec<(&str, Option<chrono::DateTime<chrono::Utc>>)> = groups
        .iter()
        .map(|g| (g.name.as_str(), g.latest_timestamp()))
        .collect();

    // Stable; `None` orders below every timestamp.
    keyed.sort_by(|a, b| b.1.cmp(&a.1));

    keyed.into_iter().map(|(name, _)| name.to_string()).collect()
}

/// Sort entries newest first.
///
/// Entries without a timestamp go after all timestamped ones and keep
/// their relative order, so an untimestamped entry never counts as the
/// newest for `compute_progress` unless the whole group lacks timestamps.
pub fn sort_newest_first(entries: &mut [Entry]) {
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Compare the two newest entries of an exercise.
///
/// `sorted` must already be newest first. Returns `None` with fewer than
/// two entries or when either of the first two has no positive weight.
pub fn compute_progress(sorted: &[Entry]) -> Option<Progress> {
    let [newest, previous, ..] = sorted else {
        return None;
    };

    if !(newest.weight > 0.0 && previous.weight > 0.0) {
        return None;
    }

    let delta = newest.weight - previous.weight;
    let percent = round_one_decimal(delta / previous.weight * 100.0);

    Some(Progress {
        delta: round_one_decimal(delta),
        percent,
    })
}

/// weight × sets × reps, or `None` if any factor is zero.
pub fn compute_volume(entry: &Entry) -> Option<f64> {
    if entry.weight > 0.0 && entry.sets > 0 && entry.reps > 0 {
        Some(entry.weight * f64::from(entry.sets) * f64::from(entry.reps))
    } else {
        None
    }
}

/// Build the display overview: group, filter, order by recency, then sort
/// each group and attach its progress indicator.
pub fn overview(entries: Vec<Entry>, query: Option<&str>) -> Vec<ExerciseSummary> {
    let groups = filter(group(entries), query.unwrap_or(""));
    let order = order_groups_by_recency(&groups);

    let mut by_name: HashMap<String, Vec<Entry>> = groups
        .into_iter()
        .map(|g| (g.name, g.entries))
        .collect();

    order
        .into_iter()
        .filter_map(|name| {
            let mut entries = by_name.remove(&name)?;
            sort_newest_first(&mut entries);

            let latest = EntryView::from(entries.first()?);
            let progress = compute_progress(&entries);

            Some(ExerciseSummary {
                entry_count: saturating_count(entries.len()),
                latest,
                entries: entries.iter().map(EntryView::from).collect(),
                progress,
                name,
            })
        })
        .collect()
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Collection size as a JSON count, clamped at `u32::MAX`.
pub fn saturating_count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}
