use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Values shipped in sample `.env` files; treated as unset.
const PLACEHOLDER_VALUES: &[&str] = &["your_pushplus_token_here", "your_weather_api_key_here"];

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .filter(|s| !s.trim().is_empty() && !PLACEHOLDER_VALUES.contains(&s.as_str()))
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_u64(profile: &str, key: &str, default: u64) -> u64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub timetable: TimetableConfig,
    pub pushplus: PushPlusConfig,
    pub weather: WeatherConfig,
    pub webhook: WebhookConfig,
    pub message: MessageConfig,
    pub http: HttpConfig,
}

/// Well-known env keys that identify a profile when prefixed.
const PROFILE_MARKER_KEYS: &[&str] = &["PUSHPLUS_TOKEN", "WEATHER_API_KEY", "TIMETABLE_PATH"];

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `KEBIAO_PROFILE` env var. When set (e.g. `CLASS_B`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("KEBIAO_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            timetable: TimetableConfig::from_env_profiled(p),
            pushplus: PushPlusConfig::from_env_profiled(p),
            weather: WeatherConfig::from_env_profiled(p),
            webhook: WebhookConfig::from_env_profiled(p),
            message: MessageConfig::from_env_profiled(p),
            http: HttpConfig::from_env_profiled(p),
        }
    }

    /// Discover available profiles by scanning env vars for `{PREFIX}_{MARKER_KEY}` patterns.
    /// Always includes "default" (the unprefixed config).
    pub fn available_profiles() -> Vec<String> {
        let mut profiles = std::collections::BTreeSet::new();
        profiles.insert("default".to_string());

        for (key, _) in env::vars() {
            for marker in PROFILE_MARKER_KEYS {
                if let Some(prefix) = key.strip_suffix(&format!("_{}", marker)) {
                    if !prefix.is_empty()
                        && prefix.chars().all(|c| c.is_ascii_uppercase() || c == '_')
                    {
                        profiles.insert(prefix.to_string());
                    }
                }
            }
        }

        profiles.into_iter().collect()
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  timetable:   path={}", self.timetable.path.display());
        tracing::info!(
            "  pushplus:    configured={}, topic={}",
            self.pushplus.is_configured(),
            self.pushplus.topic.as_deref().unwrap_or("(none)")
        );
        tracing::info!(
            "  weather:     city={}, configured={}",
            self.weather.city,
            self.weather.is_configured()
        );
        tracing::info!(
            "  webhook:     configured={}, headers={}",
            self.webhook.is_configured(),
            self.webhook.headers.len()
        );
        tracing::info!(
            "  message:     template={}",
            self.message
                .template_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(built-in)".to_string())
        );
        tracing::info!("  http:        timeout={}s", self.http.timeout_secs);
    }

    /// Return a redacted view safe for printing (no secrets).
    pub fn redacted_summary(&self) -> serde_json::Value {
        let mut header_names: Vec<&str> = self.webhook.headers.keys().map(String::as_str).collect();
        header_names.sort_unstable();
        serde_json::json!({
            "profile": self.profile_label(),
            "timetable": { "path": self.timetable.path },
            "pushplus": {
                "url": self.pushplus.url,
                "topic": self.pushplus.topic,
                "template": self.pushplus.template,
                "configured": self.pushplus.is_configured(),
            },
            "weather": {
                "url": self.weather.url,
                "city": self.weather.city,
                "configured": self.weather.is_configured(),
            },
            "webhook": {
                "configured": self.webhook.is_configured(),
                "headers": header_names,
            },
            "message": { "template_path": self.message.template_path },
            "http": { "timeout_secs": self.http.timeout_secs },
        })
    }
}

// ── Timetable ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableConfig {
    pub path: PathBuf,
}

impl TimetableConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            path: PathBuf::from(profiled_env_or(p, "TIMETABLE_PATH", "timetable.json")),
        }
    }
}

// ── PushPlus ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushPlusConfig {
    pub token: Option<String>,
    /// Group topic code; `None` pushes to the token owner only.
    pub topic: Option<String>,
    pub url: String,
    /// PushPlus content template (`html`, `markdown`, `txt`, ...).
    pub template: String,
}

impl PushPlusConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            token: profiled_env_opt(p, "PUSHPLUS_TOKEN"),
            topic: profiled_env_opt(p, "PUSHPLUS_TOPIC"),
            url: profiled_env_or(p, "PUSHPLUS_URL", "http://www.pushplus.plus/send"),
            template: profiled_env_or(p, "PUSHPLUS_TEMPLATE", "html"),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.token.is_some()
    }
}

// ── Weather ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    pub url: String,
    pub city: String,
}

impl WeatherConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            api_key: profiled_env_opt(p, "WEATHER_API_KEY"),
            url: profiled_env_or(p, "WEATHER_API_URL", "http://apis.juhe.cn/simpleWeather/query"),
            city: profiled_env_or(p, "WEATHER_CITY", "苏州"),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

// ── Webhook ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Optional extra delivery channel; may contain `${VAR}` references.
    pub url: Option<String>,
    /// Extra request headers from `WEBHOOK_HEADERS`
    /// (`Name: value; Other: value`). Values may contain `${VAR}` references.
    pub headers: HashMap<String, String>,
}

impl WebhookConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            url: profiled_env_opt(p, "WEBHOOK_URL"),
            headers: profiled_env_opt(p, "WEBHOOK_HEADERS")
                .map(|raw| parse_headers(&raw))
                .unwrap_or_default(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }
}

/// Parse `Name: value; Other: value`. Entries without a name or `:` are
/// skipped with a warning.
fn parse_headers(raw: &str) -> HashMap<String, String> {
    raw.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match entry.split_once(':') {
            Some((name, value)) if !name.trim().is_empty() => {
                Some((name.trim().to_string(), value.trim().to_string()))
            }
            _ => {
                tracing::warn!(entry, "ignoring malformed WEBHOOK_HEADERS entry");
                None
            }
        })
        .collect()
}

// ── Message rendering ─────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageConfig {
    /// Minijinja body template file overriding the built-in HTML.
    pub template_path: Option<PathBuf>,
}

impl MessageConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            template_path: profiled_env_opt(p, "MESSAGE_TEMPLATE_PATH").map(PathBuf::from),
        }
    }
}

// ── HTTP ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl HttpConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            timeout_secs: profiled_env_u64(p, "HTTP_TIMEOUT_SECS", 10),
        }
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}
