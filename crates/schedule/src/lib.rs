//! Schedule resolution: turns a semester calendar and a weekly course list
//! into the ordered list of courses that occur on a given day.
//!
//! - [`week`] computes the 1-based teaching week and the day label
//! - [`weeks`] parses recurrence strings such as `1-8周,10周`
//! - [`resolver`] decides the semester phase and filters/orders courses
//!
//! Everything here is pure: "today" is always passed in.

pub mod resolver;
pub mod week;
pub mod weeks;

pub use resolver::{resolve, ResolveWarning, ResolvedSchedule, SemesterPhase};
pub use week::{current_week, weekday_label, DAY_LABELS};
pub use weeks::{parse_active_weeks, parse_weeks, ActiveWeeks, WeekRangeParse};
