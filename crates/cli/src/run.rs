//! Subcommand implementations.

use std::fmt::Write as _;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use tracing::{error, info, warn};

use kebiao_core::{Config, KebiaoError, Timetable};
use kebiao_notify::{
    error_notification, Dispatcher, MessageContext, Notification, PushPlusNotifier,
    TemplateRenderer, WeatherContext, WebhookNotifier,
};
use kebiao_schedule::{resolve, ResolvedSchedule, SemesterPhase};
use kebiao_weather::WeatherClient;

/// Load the timetable and resolve it for `today`, logging data problems.
pub fn load_schedule(config: &Config, today: NaiveDate) -> Result<ResolvedSchedule, KebiaoError> {
    let timetable = Timetable::load(&config.timetable.path)?;
    let schedule = resolve(&timetable.semester, &timetable.courses, today);

    for warning in &schedule.warnings {
        warn!(%warning, "timetable entry problem");
    }
    info!(
        date = %schedule.date,
        day = schedule.day,
        week = schedule.week,
        status = schedule.status(),
        courses = schedule.courses().len(),
        "schedule resolved"
    );
    Ok(schedule)
}

// ── show ──────────────────────────────────────────────────────

pub fn show(config: &Config, today: NaiveDate, json: bool) -> Result<()> {
    let schedule = load_schedule(config, today).context("failed to load timetable")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&schedule)?);
    } else {
        print!("{}", format_plain(&schedule));
    }
    Ok(())
}

/// Plain-text listing for terminals.
pub fn format_plain(schedule: &ResolvedSchedule) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} | {} {} | 第{}周 | {}",
        schedule.semester_name,
        schedule.date,
        schedule.day,
        schedule.week,
        schedule.status()
    );

    let courses = match &schedule.phase {
        SemesterPhase::Active { courses } => courses,
        SemesterPhase::NotStarted | SemesterPhase::Ended => return out,
    };
    if courses.is_empty() {
        let _ = writeln!(out, "(今天没有课)");
    }
    for course in courses {
        let _ = writeln!(
            out,
            "{}  {}  {}  {}",
            course.display_time(),
            course.display_name(),
            course.display_location(),
            course.display_teacher()
        );
    }
    out
}

// ── push ──────────────────────────────────────────────────────

pub async fn push(config: &Config, today: NaiveDate, dry_run: bool, no_weather: bool) -> Result<()> {
    let dispatcher = if dry_run {
        Dispatcher::empty()
    } else {
        build_dispatcher(config)?
    };

    let schedule = match load_schedule(config, today) {
        Ok(schedule) => schedule,
        Err(e) => {
            error!(error = %e, "cannot resolve today's schedule, sending error notice");
            let notice = error_notification(&e.to_string());
            if let Err(send_err) = deliver(&dispatcher, &notice, dry_run).await {
                warn!(error = %send_err, "error notice was not delivered");
            }
            return Err(anyhow::Error::new(e).context("failed to load timetable"));
        }
    };

    let weather = if no_weather {
        None
    } else {
        Some(fetch_weather(config).await)
    };

    let renderer = match &config.message.template_path {
        Some(path) => TemplateRenderer::from_file(path)?,
        None => TemplateRenderer::new(),
    };
    let ctx = MessageContext::new(&schedule, weather, Local::now().to_rfc3339());
    let notification = renderer.render_notification(&ctx)?;

    deliver(&dispatcher, &notification, dry_run).await
}

fn build_dispatcher(config: &Config) -> Result<Dispatcher> {
    let token = config
        .pushplus
        .token
        .clone()
        .context("PUSHPLUS_TOKEN is not set (add it to the environment or .env)")?;

    let timeout = config.http.timeout();
    let mut dispatcher = Dispatcher::empty();
    dispatcher.add_channel(Box::new(PushPlusNotifier::from_config(
        config.pushplus.url.clone(),
        token,
        config.pushplus.topic.clone(),
        config.pushplus.template.clone(),
        timeout,
    )?));

    if let Some(url) = &config.webhook.url {
        let headers = Some(config.webhook.headers.clone()).filter(|h| !h.is_empty());
        dispatcher.add_channel(Box::new(WebhookNotifier::from_config(url, headers, timeout)?));
    }

    info!(channels = ?dispatcher.channel_names(), "notification channels ready");
    Ok(dispatcher)
}

async fn fetch_weather(config: &Config) -> WeatherContext {
    let result = match WeatherClient::from_config(&config.weather, config.http.timeout()) {
        Ok(client) => client.fetch().await,
        Err(e) => Err(e),
    };
    if let Err(ref e) = result {
        warn!(error = %e, "weather unavailable");
    }
    WeatherContext::from_result(result)
}

async fn deliver(dispatcher: &Dispatcher, notification: &Notification, dry_run: bool) -> Result<()> {
    if dry_run {
        println!("{}\n\n{}", notification.subject, notification.body);
        return Ok(());
    }

    let results = dispatcher.dispatch(notification).await;
    let delivered = results.iter().filter(|r| r.success).count();
    if delivered == 0 {
        let reasons: Vec<String> = results
            .iter()
            .map(|r| format!("{}: {}", r.channel, r.error.as_deref().unwrap_or("unknown")))
            .collect();
        bail!("push failed on every channel ({})", reasons.join("; "));
    }

    info!(delivered, total = results.len(), title = %notification.subject, "push complete");
    Ok(())
}

// ── test-notify ───────────────────────────────────────────────

/// Send the sample message through one channel, or through every channel.
pub async fn test_notify(config: &Config, channel: Option<usize>) -> Result<()> {
    let dispatcher = build_dispatcher(config)?;
    let names = dispatcher.channel_names();
    let indices: Vec<usize> = match channel {
        Some(index) => vec![index],
        None => (0..names.len()).collect(),
    };

    let mut failed = Vec::new();
    for index in indices {
        let name = names.get(index).copied().unwrap_or("?");
        match dispatcher.test_notify(index).await {
            Ok(()) => info!(channel = name, index, "test notification delivered"),
            Err(e) => {
                warn!(channel = name, index, error = %e, "test notification failed");
                failed.push(format!("{name}[{index}]: {e}"));
            }
        }
    }

    if !failed.is_empty() {
        bail!("test notification failed ({})", failed.join("; "));
    }
    Ok(())
}

// ── config ────────────────────────────────────────────────────

pub fn print_config(config: &Config) -> Result<()> {
    config.log_summary();
    println!("{}", serde_json::to_string_pretty(&config.redacted_summary())?);
    println!("profiles: {}", Config::available_profiles().join(", "));
    Ok(())
}
