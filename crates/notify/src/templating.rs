//! Minijinja rendering of the daily message.
//!
//! The body template sees a [`MessageContext`]: the resolved schedule with
//! placeholder text already filled in for missing course fields, the
//! weather block (or the reason it is missing), and the render time.
//!
//! Templates are arbitrary strings (the built-in one or a user file), so a
//! fresh [`minijinja::Environment`] is created per render call.

use std::collections::HashMap;
use std::path::Path;

use kebiao_core::Course;
use kebiao_schedule::ResolvedSchedule;
use kebiao_weather::{WeatherError, WeatherReport};

use crate::traits::{Notification, NotifyError};

/// Title of the daily message.
pub const DEFAULT_TITLE: &str = "📚 今日课程";

/// Title used when the schedule could not be produced at all.
pub const ERROR_TITLE: &str = "课程表推送错误";

/// Built-in HTML body.
pub const DEFAULT_BODY_TEMPLATE: &str = include_str!("../templates/message.html");

/// Everything a body template can reference.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MessageContext {
    pub schedule: ScheduleContext,
    /// `None` when weather lookup is disabled for this run.
    pub weather: Option<WeatherContext>,
    /// Render time, ISO 8601.
    pub now: String,
}

impl MessageContext {
    pub fn new(
        schedule: &ResolvedSchedule,
        weather: Option<WeatherContext>,
        now: impl Into<String>,
    ) -> Self {
        Self {
            schedule: ScheduleContext::from(schedule),
            weather,
            now: now.into(),
        }
    }
}

/// The resolved schedule as exposed to templates.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ScheduleContext {
    pub semester_name: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub day: String,
    pub week: u32,
    /// `not_started`, `active` or `ended`.
    pub status: String,
    /// Today's courses in start-time order; empty unless active.
    pub courses: Vec<CourseContext>,
}

impl From<&ResolvedSchedule> for ScheduleContext {
    fn from(schedule: &ResolvedSchedule) -> Self {
        Self {
            semester_name: schedule.semester_name.clone(),
            date: schedule.date.format("%Y-%m-%d").to_string(),
            day: schedule.day.to_string(),
            week: schedule.week,
            status: schedule.status().to_string(),
            courses: schedule.courses().iter().map(CourseContext::from).collect(),
        }
    }
}

/// One course with placeholders substituted for missing fields.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CourseContext {
    pub name: String,
    pub time: String,
    pub session: String,
    pub location: String,
    pub teacher: String,
    pub weeks: String,
}

impl From<&Course> for CourseContext {
    fn from(course: &Course) -> Self {
        Self {
            name: course.display_name().to_string(),
            time: course.display_time().to_string(),
            session: course.display_session().to_string(),
            location: course.display_location().to_string(),
            teacher: course.display_teacher().to_string(),
            weeks: course.display_weeks().to_string(),
        }
    }
}

/// Weather block state.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WeatherContext {
    Available { report: WeatherReport },
    Unavailable { reason: String },
}

impl WeatherContext {
    pub fn from_result(result: Result<WeatherReport, WeatherError>) -> Self {
        match result {
            Ok(report) => WeatherContext::Available { report },
            Err(WeatherError::NotConfigured) => WeatherContext::Unavailable {
                reason: "天气API Key未配置".to_string(),
            },
            Err(e) => WeatherContext::Unavailable {
                reason: e.to_string(),
            },
        }
    }
}

/// Renders the daily message using minijinja.
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    body_template: String,
}

impl TemplateRenderer {
    /// Renderer using the built-in HTML body.
    pub fn new() -> Self {
        Self {
            body_template: DEFAULT_BODY_TEMPLATE.to_string(),
        }
    }

    /// Renderer using a custom body template, validated up front.
    pub fn with_body_template(body_template: String) -> Result<Self, NotifyError> {
        let renderer = Self { body_template };
        renderer
            .validate(&renderer.body_template)
            .map_err(|e| NotifyError::Config(format!("invalid body template: {e}")))?;
        Ok(renderer)
    }

    /// Load a custom body template from a file.
    pub fn from_file(path: &Path) -> Result<Self, NotifyError> {
        let template = std::fs::read_to_string(path).map_err(|e| {
            NotifyError::Config(format!(
                "cannot read message template {}: {e}",
                path.display()
            ))
        })?;
        tracing::debug!(path = %path.display(), "loaded custom message template");
        Self::with_body_template(template)
    }

    /// Build a configured minijinja environment with custom globals.
    fn build_env() -> minijinja::Environment<'static> {
        let mut env = minijinja::Environment::new();
        env.add_function("env", env_function);
        env
    }

    /// Render a template string with the given context.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Template`] if the template is invalid or
    /// rendering fails.
    pub fn render(&self, template_str: &str, ctx: &MessageContext) -> Result<String, NotifyError> {
        let env = Self::build_env();
        env.render_str(template_str, ctx)
            .map_err(|e| NotifyError::Template(e.to_string()))
    }

    /// Validate that a template string parses without errors.
    pub fn validate(&self, template_str: &str) -> Result<(), NotifyError> {
        let env = Self::build_env();
        env.template_from_str(template_str)
            .map_err(|e| NotifyError::Template(e.to_string()))?;
        Ok(())
    }

    /// Render the daily notification.
    pub fn render_notification(&self, ctx: &MessageContext) -> Result<Notification, NotifyError> {
        let body = self.render(&self.body_template, ctx)?;

        let metadata = HashMap::from([
            ("event".to_string(), "daily".to_string()),
            ("date".to_string(), ctx.schedule.date.clone()),
            ("status".to_string(), ctx.schedule.status.clone()),
            ("week".to_string(), ctx.schedule.week.to_string()),
            ("courses".to_string(), ctx.schedule.courses.len().to_string()),
        ]);

        Ok(Notification {
            subject: DEFAULT_TITLE.to_string(),
            body: body.trim().to_string(),
            metadata,
        })
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Notification reporting that today's schedule could not be produced.
pub fn error_notification(message: &str) -> Notification {
    Notification {
        subject: ERROR_TITLE.to_string(),
        body: message.to_string(),
        metadata: HashMap::from([("event".to_string(), "error".to_string())]),
    }
}

/// Global function: read an environment variable by name.
///
/// Returns the variable value, or an empty string if not found
/// (with a warning logged via tracing).
fn env_function(name: String) -> String {
    match std::env::var(&name) {
        Ok(val) => val,
        Err(_) => {
            tracing::warn!(var = %name, "Environment variable not found, returning empty string");
            String::new()
        }
    }
}
