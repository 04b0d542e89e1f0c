use std::fmt;

use crate::model::Note;

/// Source bucket of a follow-up note. The date comparison itself lives in the
/// remote store's query endpoints; we only tag and order what they return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Overdue,
    Today,
    Upcoming,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Overdue => write!(f, "overdue"),
            Priority::Today => write!(f, "today"),
            Priority::Upcoming => write!(f, "upcoming"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TaggedNote {
    pub note: Note,
    pub priority: Priority,
}

/// Merge the three disjoint bucket responses into one sequence sorted
/// ascending by follow-up date. The sort is stable, so notes sharing a date
/// keep their bucket order (overdue, then today, then upcoming).
pub fn merge_buckets(overdue: Vec<Note>, today: Vec<Note>, upcoming: Vec<Note>) -> Vec<TaggedNote> {
    let mut merged: Vec<TaggedNote> = Vec::with_capacity(overdue.len() + today.len() + upcoming.len());
    merged.extend(overdue.into_iter().map(|note| TaggedNote {
        note,
        priority: Priority::Overdue,
    }));
    merged.extend(today.into_iter().map(|note| TaggedNote {
        note,
        priority: Priority::Today,
    }));
    merged.extend(upcoming.into_iter().map(|note| TaggedNote {
        note,
        priority: Priority::Upcoming,
    }));
    merged.sort_by_key(|t| t.note.follow_up_date);
    merged
}

/// Drop a note from the local sequence after the remote delete confirmed.
/// Filtering by id is safe against ids that are not present.
pub fn remove_note(notes: &mut Vec<TaggedNote>, id: u64) {
    notes.retain(|t| t.note.id != id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn note(id: u64, date: &str) -> Note {
        Note {
            id,
            client: 1,
            text: format!("note-{id}"),
            follow_up_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            reminder: true,
            completed: false,
            created_at: None,
        }
    }

    #[test]
    fn merged_output_is_ordered_and_tagged() {
        let merged = merge_buckets(
            vec![note(1, "2024-01-01")],
            vec![note(2, "2024-02-01")],
            vec![note(3, "2024-03-01")],
        );
        let dates: Vec<String> = merged
            .iter()
            .map(|t| t.note.follow_up_date.to_string())
            .collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-02-01", "2024-03-01"]);
        let tags: Vec<Priority> = merged.iter().map(|t| t.priority).collect();
        assert_eq!(tags, vec![Priority::Overdue, Priority::Today, Priority::Upcoming]);
    }

    #[test]
    fn interleaved_dates_sort_across_buckets() {
        let merged = merge_buckets(
            vec![note(1, "2024-01-05"), note(2, "2024-01-01")],
            vec![note(3, "2024-01-03")],
            vec![note(4, "2024-01-02")],
        );
        let ids: Vec<u64> = merged.iter().map(|t| t.note.id).collect();
        assert_eq!(ids, vec![2, 4, 3, 1]);
    }

    #[test]
    fn equal_dates_keep_bucket_order() {
        let merged = merge_buckets(
            vec![note(1, "2024-01-01")],
            vec![note(2, "2024-01-01")],
            vec![note(3, "2024-01-01")],
        );
        let ids: Vec<u64> = merged.iter().map(|t| t.note.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn removing_a_missing_id_is_a_no_op() {
        let mut merged = merge_buckets(vec![note(1, "2024-01-01")], vec![], vec![]);
        remove_note(&mut merged, 999);
        assert_eq!(merged.len(), 1);
        remove_note(&mut merged, 1);
        assert!(merged.is_empty());
    }
}
