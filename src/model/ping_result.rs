use chrono::{DateTime, FixedOffset, Locale, NaiveDateTime, TimeZone};
use serde::Deserialize;

/// Latency above this value (milliseconds) is flagged as bad.
pub const SLOW_PING_MS: f64 = 1000.0;

/// One container record as served by `/api/ping-results`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PingResult {
    pub ip: String,
    pub name: String,
    pub status: String,
    /// Last RTT in milliseconds
    pub ping_time: f64,
    #[serde(default)]
    pub last_success: String,
    #[serde(default)]
    pub created: String,
}

/// Visual category of a cell. Selects a color, never changes the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Positive,
    Negative,
    Neutral,
}

impl PingResult {
    /// Container name without the leading `/` Docker puts in front of it.
    pub fn display_name(&self) -> &str {
        self.name.strip_prefix('/').unwrap_or(&self.name)
    }

    pub fn status_category(&self) -> Category {
        status_category(&self.status)
    }

    pub fn ping_category(&self) -> Category {
        ping_category(self.ping_time)
    }

    pub fn display_ping_time(&self) -> String {
        format!("{:.2}", self.ping_time)
    }
}

/// `Up` wins over `Exited` when both are present.
pub fn status_category(status: &str) -> Category {
    if status.contains("Up") {
        Category::Positive
    } else if status.contains("Exited") {
        Category::Negative
    } else {
        Category::Neutral
    }
}

pub fn ping_category(ping_ms: f64) -> Category {
    if ping_ms > SLOW_PING_MS {
        Category::Negative
    } else {
        Category::Positive
    }
}

/// Parses a backend timestamp. Accepts RFC 3339 and, for rows written without an
/// offset, a naive `YYYY-MM-DD[T ]HH:MM:SS[.f]` which is taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc().fixed_offset())
}

/// Renders a timestamp in `tz` using the date and time conventions of `locale`.
///
/// Empty input becomes `-`; anything that does not parse is returned verbatim.
pub fn format_timestamp_in<Tz>(raw: &str, tz: &Tz, locale: Locale) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    if raw.trim().is_empty() {
        return "-".to_string();
    }
    match parse_timestamp(raw) {
        Some(dt) => dt
            .with_timezone(tz)
            .format_localized("%x %X", locale)
            .to_string(),
        None => raw.to_string(),
    }
}

/// Locale of the running system, `POSIX` when it cannot be determined.
pub fn system_locale() -> Locale {
    sys_locale::get_locale()
        .and_then(|tag| locale_from_tag(&tag))
        .unwrap_or(Locale::POSIX)
}

/// Usual country for languages whose country code differs from the language code.
const DEFAULT_COUNTRIES: &[(&str, &str)] = &[
    ("en", "US"),
    ("uk", "UA"),
    ("ja", "JP"),
    ("zh", "CN"),
    ("ko", "KR"),
    ("cs", "CZ"),
    ("da", "DK"),
    ("el", "GR"),
    ("sv", "SE"),
    ("nb", "NO"),
    ("nn", "NO"),
    ("he", "IL"),
    ("hi", "IN"),
    ("vi", "VN"),
    ("fa", "IR"),
    ("ar", "SA"),
    ("sl", "SI"),
    ("et", "EE"),
    ("be", "BY"),
    ("ka", "GE"),
    ("kk", "KZ"),
    ("ga", "IE"),
    ("ms", "MY"),
    ("sq", "AL"),
    ("sr", "RS"),
];

/// Maps a BCP 47 tag like `uk-UA` (or `en_US.UTF-8`) onto a chrono locale.
fn locale_from_tag(tag: &str) -> Option<Locale> {
    let base = tag.split(['.', '@']).next()?.replace('-', "_");
    if let Ok(locale) = Locale::try_from(base.as_str()) {
        return Some(locale);
    }

    // A bare language ("uk") has no chrono locale of its own.
    let lang = base.split('_').next()?.to_lowercase();
    let country = DEFAULT_COUNTRIES
        .iter()
        .find(|(l, _)| *l == lang)
        .map(|(_, c)| c.to_string())
        .unwrap_or_else(|| lang.to_uppercase());
    Locale::try_from(format!("{lang}_{country}").as_str()).ok()
}
