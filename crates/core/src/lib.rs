pub mod config;
pub mod error;
pub mod timetable;

pub use config::Config;
pub use error::*;
pub use timetable::{Course, SemesterInfo, Timetable};
