//! Resolve the courses that occur on a given day.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use tracing::debug;

use kebiao_core::{Course, SemesterInfo};

use crate::week::{current_week, weekday_label, DAY_LABELS};
use crate::weeks::{parse_weeks, WeekRangeParse};

/// Where "today" falls relative to the semester.
///
/// Serialized as `{"status": "...", "courses": [...]}` with `courses`
/// present only while the semester is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SemesterPhase {
    NotStarted,
    /// Today's courses, ordered by start time.
    Active { courses: Vec<Course> },
    Ended,
}

impl SemesterPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SemesterPhase::NotStarted => "not_started",
            SemesterPhase::Active { .. } => "active",
            SemesterPhase::Ended => "ended",
        }
    }
}

/// Non-fatal problem found in a single course record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolveWarning {
    /// `day` is missing or not one of [`DAY_LABELS`]; the course never matches.
    UnknownDay { course: String, day: Option<String> },
    /// `weeks` is missing or has no tokens; the course never matches.
    EmptyRecurrence { course: String },
    /// One token of `weeks` did not parse and was dropped.
    MalformedRecurrence {
        course: String,
        weeks: String,
        token: String,
    },
    /// `time` is missing or its start is not `HH:MM`; the course sorts last.
    MalformedTime { course: String, time: Option<String> },
}

impl fmt::Display for ResolveWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveWarning::UnknownDay { course, day: Some(day) } => {
                write!(f, "course '{course}' has unknown day '{day}'")
            }
            ResolveWarning::UnknownDay { course, day: None } => {
                write!(f, "course '{course}' has no day")
            }
            ResolveWarning::EmptyRecurrence { course } => {
                write!(f, "course '{course}' has no active weeks")
            }
            ResolveWarning::MalformedRecurrence { course, weeks, token } => {
                write!(f, "course '{course}': ignored week token '{token}' in '{weeks}'")
            }
            ResolveWarning::MalformedTime { course, time: Some(time) } => {
                write!(f, "course '{course}' has unparseable time '{time}'")
            }
            ResolveWarning::MalformedTime { course, time: None } => {
                write!(f, "course '{course}' has no time")
            }
        }
    }
}

/// The schedule for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSchedule {
    pub semester_name: String,
    pub date: NaiveDate,
    pub day: &'static str,
    /// 1-based teaching week, `0` before the semester starts.
    pub week: u32,
    #[serde(flatten)]
    pub phase: SemesterPhase,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ResolveWarning>,
}

impl ResolvedSchedule {
    pub fn status(&self) -> &'static str {
        self.phase.as_str()
    }

    /// Today's courses; empty unless the semester is active.
    pub fn courses(&self) -> &[Course] {
        match &self.phase {
            SemesterPhase::Active { courses } => courses,
            SemesterPhase::NotStarted | SemesterPhase::Ended => &[],
        }
    }
}

/// Resolve the schedule for `today`.
///
/// Total over any course list: malformed records are excluded (bad day or
/// weeks) or sorted last (bad time), and reported in
/// [`ResolvedSchedule::warnings`].
pub fn resolve(semester: &SemesterInfo, courses: &[Course], today: NaiveDate) -> ResolvedSchedule {
    let day = weekday_label(today);
    let week = current_week(semester.start_date, today);
    let mut warnings = Vec::new();

    let phase = if today < semester.start_date {
        SemesterPhase::NotStarted
    } else if semester.end_date.is_some_and(|end| today > end) {
        SemesterPhase::Ended
    } else {
        SemesterPhase::Active {
            courses: courses_for_day(courses, day, week, &mut warnings),
        }
    };

    debug!(
        %today,
        day,
        week,
        status = phase.as_str(),
        courses = courses.len(),
        warnings = warnings.len(),
        "schedule resolved"
    );

    ResolvedSchedule {
        semester_name: semester.name.clone(),
        date: today,
        day,
        week,
        phase,
        warnings,
    }
}

fn courses_for_day(
    courses: &[Course],
    day: &str,
    week: u32,
    warnings: &mut Vec<ResolveWarning>,
) -> Vec<Course> {
    let mut todays: Vec<(Option<NaiveTime>, &Course)> = courses
        .iter()
        .filter(|course| occurs_on(course, day, week, warnings))
        .map(|course| (start_time(course), course))
        .collect();

    for (start, course) in &todays {
        if start.is_none() {
            warnings.push(ResolveWarning::MalformedTime {
                course: course.display_name().to_string(),
                time: course.time.clone(),
            });
        }
    }

    // Unknown start times go after every known one; sort is stable.
    todays.sort_by_key(|(start, _)| match start {
        Some(time) => (0, *time),
        None => (1, NaiveTime::MIN),
    });

    todays.into_iter().map(|(_, course)| course.clone()).collect()
}

/// Whether `course` meets on `day` during `week`. Records warnings for the
/// course's day and weeks fields regardless of the answer.
fn occurs_on(course: &Course, day: &str, week: u32, warnings: &mut Vec<ResolveWarning>) -> bool {
    let name = course.display_name();

    let day_matches = match course.day.as_deref().map(str::trim) {
        Some(label) if DAY_LABELS.contains(&label) => label == day,
        other => {
            warnings.push(ResolveWarning::UnknownDay {
                course: name.to_string(),
                day: other.map(str::to_string),
            });
            false
        }
    };

    let raw_weeks = course.weeks.as_deref().unwrap_or_default();
    let parsed: WeekRangeParse = parse_weeks(raw_weeks);
    for token in &parsed.rejected {
        warnings.push(ResolveWarning::MalformedRecurrence {
            course: name.to_string(),
            weeks: raw_weeks.to_string(),
            token: token.clone(),
        });
    }
    if parsed.weeks.is_empty() && parsed.rejected.is_empty() {
        warnings.push(ResolveWarning::EmptyRecurrence {
            course: name.to_string(),
        });
    }

    day_matches && parsed.contains(week)
}

/// Start of `HH:MM-HH:MM`.
fn start_time(course: &Course) -> Option<NaiveTime> {
    let time = course.time.as_deref()?;
    let start = time.split('-').next()?.trim();
    NaiveTime::parse_from_str(start, "%H:%M").ok()
}
