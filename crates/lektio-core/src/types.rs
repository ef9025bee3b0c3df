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

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// One display-ready lesson, derived from a raw SDUI lesson record.
///
/// Recomputed on every projection; never persisted or mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonEntry {
    /// Lesson start as zero-padded 24-hour wall-clock time ("HH:MM").
    pub time: String,
    /// Course display name, "Unknown" when the record carries none.
    pub subject: String,
    /// Lesson status display name, "Planned" when the record carries none.
    pub status: String,
}

/// Result of projecting one day of raw lesson records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    /// Summary label published as the sensor state
    /// ("No lessons today" / "<n> lessons today").
    pub summary: String,
    /// All retained lessons, ascending by start time.
    pub lessons: Vec<LessonEntry>,
    /// Shortcut to the earliest lesson; equals `lessons.first()`.
    pub first_lesson: Option<LessonEntry>,
}

impl Projection {
    /// Attribute payload published alongside the sensor state.
    ///
    /// The `first_lesson_*` shortcuts are only present when at least one
    /// lesson survived the projection.
    pub fn state_attributes(&self) -> Value {
        let mut attributes = json!({ "lessons": self.lessons });
        if let Some(first) = &self.first_lesson {
            attributes["first_lesson_time"] = json!(first.time);
            attributes["first_lesson_subject"] = json!(first.subject);
            attributes["first_lesson_status"] = json!(first.status);
        }
        attributes
    }
}
