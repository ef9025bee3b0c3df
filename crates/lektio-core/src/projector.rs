// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of Lektio.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use chrono::TimeZone;
use chrono_tz::Tz;
use serde_json::Value;

use crate::errors::ProjectionError;
use crate::types::{LessonEntry, Projection};

/// Kind tag marking a cancelled lesson in the SDUI API.
///
/// Matched as an exact string. The API has been observed emitting other tags
/// ("SUBSTITUTION", "EVENT", ...); everything that is not exactly this
/// constant is retained, including records without a kind at all.
pub const KIND_CANCELED: &str = "CANCELED";

const DEFAULT_SUBJECT: &str = "Unknown";
const DEFAULT_STATUS: &str = "Planned";

/// Walk a key path through a JSON object tree.
///
/// Returns `None` as soon as any path segment is missing or the current node
/// is not an object, preserving per-field default semantics without nested
/// existence checks.
pub fn value_at<'a>(record: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(record, |node, key| node.get(key))
}

/// Read a string at a key path, `None` on any missing segment or wrong type.
pub fn str_at<'a>(record: &'a Value, path: &[&str]) -> Option<&'a str> {
    value_at(record, path).and_then(Value::as_str)
}

/// Effective lesson start: epoch seconds, 0 when missing or malformed.
fn begins_at(record: &Value) -> i64 {
    value_at(record, &["begins_at"])
        .and_then(Value::as_i64)
        .unwrap_or(0)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Pure filter/sort/project transform over one day of raw lesson records.
///
/// Stateless apart from the timezone used to render wall-clock times, so a
/// single instance can serve any number of poll cycles.
#[derive(Debug, Clone)]
pub struct TimetableProjector {
    tz: Tz,
}

impl TimetableProjector {
    /// Create a projector rendering times in the given timezone.
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Create a UTC projector (fallback when no host timezone is known).
    pub fn utc() -> Self {
        Self::new(chrono_tz::UTC)
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Project a raw timetable payload (the array found at `data.lessons`).
    ///
    /// Anything that is not a JSON array is a caller contract violation and
    /// yields [`ProjectionError::InvalidInput`]. Missing fields inside
    /// individual records never fail; they fall back to per-field defaults.
    pub fn project(&self, raw: &Value) -> Result<Projection, ProjectionError> {
        let records = raw
            .as_array()
            .ok_or_else(|| ProjectionError::InvalidInput(json_kind(raw)))?;
        Ok(self.project_records(records))
    }

    /// Project an already-decoded sequence of lesson records.
    pub fn project_records(&self, records: &[Value]) -> Projection {
        let mut active: Vec<&Value> = records
            .iter()
            .filter(|record| str_at(record, &["kind"]) != Some(KIND_CANCELED))
            .collect();

        // Stable sort keeps input order for equal start times; records
        // without begins_at sort first as epoch 0.
        active.sort_by_key(|record| begins_at(record));

        let lessons: Vec<LessonEntry> = active
            .iter()
            .map(|record| self.project_lesson(record))
            .collect();

        let summary = if lessons.is_empty() {
            "No lessons today".to_string()
        } else {
            format!("{} lessons today", lessons.len())
        };

        Projection {
            summary,
            first_lesson: lessons.first().cloned(),
            lessons,
        }
    }

    fn project_lesson(&self, record: &Value) -> LessonEntry {
        let status = match str_at(record, &["meta", "displayname_kind"]) {
            Some(status) if !status.is_empty() => status.to_string(),
            _ => DEFAULT_STATUS.to_string(),
        };

        LessonEntry {
            time: self.format_time(begins_at(record)),
            subject: str_at(record, &["course", "meta", "displayname"])
                .unwrap_or(DEFAULT_SUBJECT)
                .to_string(),
            status,
        }
    }

    /// Render epoch seconds as zero-padded 24-hour wall-clock "HH:MM".
    fn format_time(&self, epoch_secs: i64) -> String {
        self.tz
            .timestamp_opt(epoch_secs, 0)
            .single()
            .map_or_else(|| "00:00".to_string(), |dt| dt.format("%H:%M").to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // 1699999000 = 2023-11-14 21:56:40 UTC, 1700000000 = 22:13:20 UTC.

    fn projector() -> TimetableProjector {
        TimetableProjector::utc()
    }

    #[test]
    fn test_canceled_lessons_filtered_out() {
        let raw = json!([
            { "begins_at": 1700000000, "kind": "CANCELED" },
            {
                "begins_at": 1699999000,
                "course": { "meta": { "displayname": "Math" } },
                "meta": { "displayname_kind": "Planned" }
            }
        ]);

        let projection = projector().project(&raw).unwrap();

        assert_eq!(projection.summary, "1 lessons today");
        assert_eq!(projection.lessons.len(), 1);
        assert_eq!(projection.lessons[0].subject, "Math");
        assert_eq!(projection.lessons[0].status, "Planned");
        assert_eq!(projection.lessons[0].time, "21:56");
    }

    #[test]
    fn test_kind_absent_or_other_is_retained() {
        let raw = json!([
            { "begins_at": 1699999000 },
            { "begins_at": 1700000000, "kind": "SUBSTITUTION" }
        ]);

        let projection = projector().project(&raw).unwrap();
        assert_eq!(projection.lessons.len(), 2);
        assert_eq!(projection.summary, "2 lessons today");
    }

    #[test]
    fn test_misspelled_kind_is_not_cancellation() {
        // Exact-match filter: the historically observed "CANCLED" typo must
        // not be accepted as a cancellation tag.
        let raw = json!([{ "begins_at": 1699999000, "kind": "CANCLED" }]);

        let projection = projector().project(&raw).unwrap();
        assert_eq!(projection.lessons.len(), 1);
    }

    #[test]
    fn test_sorted_ascending_by_begins_at() {
        let raw = json!([
            { "begins_at": 1700000000 },
            { "begins_at": 1699999000 },
            { "kind": "LESSON" }
        ]);

        let projection = projector().project(&raw).unwrap();

        // Record without begins_at sorts first as epoch 0.
        let times: Vec<&str> = projection
            .lessons
            .iter()
            .map(|lesson| lesson.time.as_str())
            .collect();
        assert_eq!(times, vec!["00:00", "21:56", "22:13"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_start_times() {
        let raw = json!([
            {
                "begins_at": 1699999000,
                "course": { "meta": { "displayname": "First" } }
            },
            {
                "begins_at": 1699999000,
                "course": { "meta": { "displayname": "Second" } }
            }
        ]);

        let projection = projector().project(&raw).unwrap();
        assert_eq!(projection.lessons[0].subject, "First");
        assert_eq!(projection.lessons[1].subject, "Second");
    }

    #[test]
    fn test_empty_input() {
        let projection = projector().project(&json!([])).unwrap();

        assert_eq!(projection.summary, "No lessons today");
        assert!(projection.lessons.is_empty());
        assert!(projection.first_lesson.is_none());
    }

    #[test]
    fn test_all_lessons_cancelled() {
        let raw = json!([
            { "begins_at": 1699999000, "kind": "CANCELED" },
            { "begins_at": 1700000000, "kind": "CANCELED" }
        ]);

        let projection = projector().project(&raw).unwrap();
        assert_eq!(projection.summary, "No lessons today");
        assert!(projection.lessons.is_empty());
        assert!(projection.first_lesson.is_none());
    }

    #[test]
    fn test_first_lesson_matches_head_of_list() {
        let raw = json!([
            { "begins_at": 1700000000 },
            { "begins_at": 1699999000 }
        ]);

        let projection = projector().project(&raw).unwrap();
        assert_eq!(
            projection.first_lesson.as_ref(),
            projection.lessons.first()
        );
        assert_eq!(projection.first_lesson.unwrap().time, "21:56");
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let raw = json!([{ "begins_at": 1699999000 }]);

        let projection = projector().project(&raw).unwrap();
        let lesson = &projection.lessons[0];
        assert_eq!(lesson.subject, "Unknown");
        assert_eq!(lesson.status, "Planned");
    }

    #[test]
    fn test_partial_nested_paths_fall_back_to_defaults() {
        // course present but meta missing, meta present but displayname_kind empty
        let raw = json!([{
            "begins_at": 1699999000,
            "course": {},
            "meta": { "displayname_kind": "" }
        }]);

        let projection = projector().project(&raw).unwrap();
        assert_eq!(projection.lessons[0].subject, "Unknown");
        assert_eq!(projection.lessons[0].status, "Planned");
    }

    #[test]
    fn test_non_object_record_is_retained_with_defaults() {
        let raw = json!(["garbage", 42]);

        let projection = projector().project(&raw).unwrap();
        assert_eq!(projection.lessons.len(), 2);
        assert_eq!(projection.lessons[0].time, "00:00");
        assert_eq!(projection.lessons[0].subject, "Unknown");
    }

    #[test]
    fn test_non_array_payload_is_invalid_input() {
        let err = projector().project(&json!({ "begins_at": 1 })).unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidInput("an object")));

        let err = projector().project(&json!("lessons")).unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidInput("a string")));

        let err = projector().project(&json!(null)).unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidInput("null")));
    }

    #[test]
    fn test_times_rendered_in_configured_timezone() {
        let raw = json!([{ "begins_at": 1699999000 }]);

        // CET (+01:00) in mid-November
        let projection = TimetableProjector::new(chrono_tz::Europe::Prague)
            .project(&raw)
            .unwrap();
        assert_eq!(projection.lessons[0].time, "22:56");
    }

    #[test]
    fn test_path_read_helper() {
        let record = json!({ "course": { "meta": { "displayname": "Math" } } });

        assert_eq!(
            str_at(&record, &["course", "meta", "displayname"]),
            Some("Math")
        );
        assert_eq!(str_at(&record, &["course", "meta", "missing"]), None);
        assert_eq!(str_at(&record, &["missing", "meta", "displayname"]), None);
        assert!(value_at(&record, &["course", "meta"]).is_some());
    }
}
