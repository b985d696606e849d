//! Timetable document model and loading.
//!
//! The timetable is a JSON document with two top-level fields:
//!
//! ```json
//! {
//!   "semester_info": { "name": "...", "start_date": "2024-09-02", "end_date": "2025-01-10" },
//!   "courses": [ { "name": "...", "day": "周一", "time": "08:00-09:40", "weeks": "1-8周" } ]
//! }
//! ```
//!
//! Semester metadata is validated strictly (a missing or malformed
//! `start_date` is a [`KebiaoError::Config`]). Course records are read
//! leniently: every field is optional, numbers are accepted where strings
//! are expected, and entries that are not JSON objects are skipped.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{KebiaoError, Result};

/// Date format used for `start_date` / `end_date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Semester name used when the document does not carry one.
pub const UNKNOWN_SEMESTER: &str = "未知学期";

pub const UNKNOWN_COURSE: &str = "未知课程";
pub const UNKNOWN_TIME: &str = "未知时间";
pub const UNKNOWN_SESSION: &str = "未知节次";
pub const UNKNOWN_LOCATION: &str = "未知地点";
pub const UNKNOWN_TEACHER: &str = "未知老师";
pub const UNKNOWN_WEEKS: &str = "未知周数";

// ── Semester ──────────────────────────────────────────────────

/// Validated semester metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SemesterInfo {
    pub name: String,
    /// Day 1 of week 1.
    pub start_date: NaiveDate,
    /// Last day of the semester, inclusive. `None` means open-ended.
    pub end_date: Option<NaiveDate>,
}

impl SemesterInfo {
    /// Build semester metadata, rejecting an end date before the start date.
    pub fn new(
        name: impl Into<String>,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> Result<Self> {
        if let Some(end) = end_date {
            if end < start_date {
                return Err(KebiaoError::Config(format!(
                    "semester end_date {end} is before start_date {start_date}"
                )));
            }
        }
        Ok(Self {
            name: name.into(),
            start_date,
            end_date,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawSemesterInfo {
    #[serde(default, deserialize_with = "lenient_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    start_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    end_date: Option<String>,
}

impl TryFrom<RawSemesterInfo> for SemesterInfo {
    type Error = KebiaoError;

    fn try_from(raw: RawSemesterInfo) -> Result<Self> {
        let start = raw.start_date.ok_or_else(|| {
            KebiaoError::Config("'start_date' is not defined under 'semester_info'".to_string())
        })?;
        let start_date = parse_date("start_date", &start)?;
        let end_date = raw
            .end_date
            .map(|end| parse_date("end_date", &end))
            .transpose()?;

        SemesterInfo::new(
            raw.name.unwrap_or_else(|| UNKNOWN_SEMESTER.to_string()),
            start_date,
            end_date,
        )
    }
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| {
        KebiaoError::Config(format!(
            "semester {field} '{value}' is not a valid YYYY-MM-DD date: {e}"
        ))
    })
}

// ── Course ────────────────────────────────────────────────────

/// One weekly course record as written in the timetable.
///
/// All fields are optional; use the `display_*` accessors to get the
/// placeholder text for a missing value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Day-of-week label, e.g. `周一`.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    /// `HH:MM-HH:MM`.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub teacher: Option<String>,
    /// Raw recurrence string, e.g. `1-8周,10周`.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub weeks: Option<String>,
}

impl Course {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_COURSE)
    }

    pub fn display_time(&self) -> &str {
        self.time.as_deref().unwrap_or(UNKNOWN_TIME)
    }

    pub fn display_session(&self) -> &str {
        self.session.as_deref().unwrap_or(UNKNOWN_SESSION)
    }

    pub fn display_location(&self) -> &str {
        self.location.as_deref().unwrap_or(UNKNOWN_LOCATION)
    }

    pub fn display_teacher(&self) -> &str {
        self.teacher.as_deref().unwrap_or(UNKNOWN_TEACHER)
    }

    pub fn display_weeks(&self) -> &str {
        self.weeks.as_deref().unwrap_or(UNKNOWN_WEEKS)
    }
}

/// Accept strings and numbers; anything else (null, arrays, objects) and
/// blank strings become `None`.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

// ── Timetable ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawTimetable {
    #[serde(default)]
    semester_info: Option<RawSemesterInfo>,
    #[serde(default)]
    courses: Option<Vec<Value>>,
}

/// A loaded timetable: validated semester metadata plus the course list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timetable {
    pub semester: SemesterInfo,
    pub courses: Vec<Course>,
}

impl Timetable {
    /// Read and parse a timetable JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => KebiaoError::TimetableNotFound(path.to_path_buf()),
            _ => KebiaoError::Io(e),
        })?;

        let timetable = Self::from_json_str(&text)?;
        debug!(
            path = %path.display(),
            semester = %timetable.semester.name,
            courses = timetable.courses.len(),
            "timetable loaded"
        );
        Ok(timetable)
    }

    /// Parse a timetable from a JSON string.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let raw: RawTimetable = serde_json::from_str(text)?;

        let semester = SemesterInfo::try_from(raw.semester_info.unwrap_or_default())?;

        let courses = raw
            .courses
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| {
                if !value.is_object() {
                    warn!(index, "skipping course entry that is not a JSON object");
                    return None;
                }
                match serde_json::from_value::<Course>(value) {
                    Ok(course) => Some(course),
                    Err(e) => {
                        warn!(index, error = %e, "skipping unreadable course entry");
                        None
                    }
                }
            })
            .collect();

        Ok(Self { semester, courses })
    }
}
