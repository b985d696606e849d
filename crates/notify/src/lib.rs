//! Message rendering and delivery for the daily timetable push.
//!
//! This crate provides:
//! - `Notifier` trait for pluggable delivery channels
//! - PushPlus and generic webhook notifier implementations
//! - Minijinja rendering of the schedule + weather message
//! - Dispatcher that delivers one message to every configured channel

pub mod dispatcher;
mod env;
pub mod pushplus;
pub mod templating;
pub mod traits;
pub mod webhook;

pub use dispatcher::Dispatcher;
pub use pushplus::PushPlusNotifier;
pub use templating::{error_notification, MessageContext, TemplateRenderer, WeatherContext};
pub use traits::{DispatchResult, Notification, Notifier, NotifyError};
pub use webhook::WebhookNotifier;
