//! Console formatting with colored badges and zoned timestamps.
//!
//! Every line looks like `{color}{badge} [YYYY-MM-DD HH:mm:ss] {message}{reset}`.

use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::FixedOffset;
use chrono::Utc;
use chrono_tz::Tz;
use serde::Deserialize;
use serde::Serialize;
use tracing::field::Field;
use tracing::field::Visit;
use tracing::Event;
use tracing::Level;
use tracing::Subscriber;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::fmt::FormatEvent;
use tracing_subscriber::fmt::FormatFields;
use tracing_subscriber::registry::LookupSpan;

/// Layout of the bracketed timestamp.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// ANSI reset sequence.
const RESET: &str = "\x1b[0m";

/// The kind of line being printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Info,
    Warn,
    Error,
    Success,
    Log,
}

impl Badge {
    /// Pick the badge for a tracing level.
    /// `success` upgrades info lines to the success badge.
    pub fn for_level(level: &Level, success: bool) -> Self {
        match *level {
            Level::ERROR => Badge::Error,
            Level::WARN => Badge::Warn,
            Level::INFO if success => Badge::Success,
            Level::INFO => Badge::Info,
            _ => Badge::Log,
        }
    }

    /// ANSI color code.
    pub fn color(self) -> &'static str {
        match self {
            Badge::Info => "\x1b[34m",
            Badge::Warn => "\x1b[33m",
            Badge::Error => "\x1b[31m",
            Badge::Success => "\x1b[32m",
            Badge::Log => "\x1b[37m",
        }
    }
}

/// Glyphs printed in front of each line, configurable in `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Badges {
    pub info: String,
    pub warn: String,
    pub error: String,
    pub success: String,
    pub log: String,
}

impl Default for Badges {
    fn default() -> Self {
        Self {
            info: "ℹ️".to_string(),
            warn: "⚠️".to_string(),
            error: "❌".to_string(),
            success: "✅".to_string(),
            log: "➕".to_string(),
        }
    }
}

impl Badges {
    /// The glyph for `badge`. An empty glyph prints as a space.
    pub fn glyph(&self, badge: Badge) -> &str {
        let glyph = match badge {
            Badge::Info => &self.info,
            Badge::Warn => &self.warn,
            Badge::Error => &self.error,
            Badge::Success => &self.success,
            Badge::Log => &self.log,
        };
        if glyph.is_empty() {
            " "
        } else {
            glyph
        }
    }
}

/// Time zone timestamps are shown in.
/// Written in config as `local`, `utc`, a fixed offset like `+06:00` or an
/// IANA name like `Asia/Dhaka`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimeZone {
    #[default]
    Local,
    Utc,
    Fixed(FixedOffset),
    /// Follows daylight saving.
    Named(Tz),
}

impl TimeZone {
    /// Format `instant` in this zone.
    pub fn format(&self, instant: DateTime<Utc>) -> String {
        match self {
            TimeZone::Local => instant.with_timezone(&chrono::Local).format(TIMESTAMP_FORMAT),
            TimeZone::Utc => instant.format(TIMESTAMP_FORMAT),
            TimeZone::Fixed(offset) => instant.with_timezone(offset).format(TIMESTAMP_FORMAT),
            TimeZone::Named(zone) => instant.with_timezone(zone).format(TIMESTAMP_FORMAT),
        }
        .to_string()
    }
}

impl FromStr for TimeZone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_lowercase().as_str() {
            "local" => return Ok(TimeZone::Local),
            "utc" | "z" => return Ok(TimeZone::Utc),
            _ => {}
        }

        s.parse::<FixedOffset>()
            .map(TimeZone::Fixed)
            .or_else(|_| s.parse::<Tz>().map(TimeZone::Named))
            .map_err(|_| {
                format!("'{s}' is not 'local', 'utc', an offset like '+06:00' or a zone like 'Asia/Dhaka'")
            })
    }
}

impl TryFrom<String> for TimeZone {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeZone> for String {
    fn from(value: TimeZone) -> Self {
        match value {
            TimeZone::Local => "local".to_string(),
            TimeZone::Utc => "utc".to_string(),
            TimeZone::Fixed(offset) => offset.to_string(),
            TimeZone::Named(zone) => zone.name().to_string(),
        }
    }
}

/// Build one console line. `color` is `None` when ANSI is disabled.
pub fn format_line(
    glyph: &str,
    color: Option<&str>,
    timestamp: Option<&str>,
    message: &str,
) -> String {
    let timestamp = timestamp.map_or(String::new(), |t| format!("[{t}] "));
    match color {
        Some(color) => format!("{color}{glyph} {timestamp}{message}{RESET}"),
        None => format!("{glyph} {timestamp}{message}"),
    }
}

/// [FormatEvent] printing badge lines.
#[derive(Debug, Clone)]
pub struct BadgeFormat {
    /// Glyph per badge.
    badges: Badges,
    /// Print the bracketed timestamp?
    show_timestamp: bool,
    /// Zone of the timestamp.
    time_zone: TimeZone,
}

impl BadgeFormat {
    pub fn new(badges: Badges, show_timestamp: bool, time_zone: TimeZone) -> Self {
        Self {
            badges,
            show_timestamp,
            time_zone,
        }
    }

    /// Render a message for `badge` at `instant`.
    pub fn render(&self, badge: Badge, instant: DateTime<Utc>, message: &str, ansi: bool) -> String {
        let timestamp = self
            .show_timestamp
            .then(|| self.time_zone.format(instant));

        format_line(
            self.badges.glyph(badge),
            ansi.then(|| badge.color()),
            timestamp.as_deref(),
            message,
        )
    }
}

impl<S, N> FormatEvent<S, N> for BadgeFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut fields = BadgeFields::default();
        event.record(&mut fields);

        let badge = Badge::for_level(event.metadata().level(), fields.success);
        let ansi = writer.has_ansi_escapes();
        let line = self.render(badge, Utc::now(), &fields.finish(), ansi);

        writeln!(writer, "{line}")
    }
}

/// Collects the message and extra fields of an event.
#[derive(Default)]
struct BadgeFields {
    /// The formatted message.
    message: String,
    /// Other fields as `key=value`.
    extra: Vec<String>,
    /// Set by a `success = true` field.
    success: bool,
}

impl BadgeFields {
    fn finish(self) -> String {
        if self.extra.is_empty() {
            self.message
        } else {
            format!("{} {}", self.message, self.extra.join(" "))
        }
    }
}

impl Visit for BadgeFields {
    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "success" {
            self.success = value;
        } else {
            self.record_debug(field, &value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.extra.push(format!("{}={value}", field.name()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.extra.push(format!("{}={value:?}", field.name()));
        }
    }
}

#[cfg(test)]
mod test {
    use chrono::NaiveDateTime;
    use chrono::TimeZone as _;
    use test_case::test_case;

    use super::*;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 18, 30, 5).unwrap()
    }

    /// Pull the timestamp out of a line. The color code has a `[` of its
    /// own, the timestamp bracket follows the glyph and a space.
    fn bracketed(line: &str) -> &str {
        let start = line.find(" [").expect("opening bracket") + 2;
        let end = line[start..].find(']').expect("closing bracket") + start;
        &line[start..end]
    }

    #[test]
    fn error_lines_have_badge_and_timestamp() {
        let format = BadgeFormat::new(Badges::default(), true, TimeZone::Local);
        let line = format.render(Badge::Error, Utc::now(), "it broke", true);

        assert!(line.contains("❌"));
        assert!(line.starts_with("\x1b[31m"));
        assert!(line.ends_with("it broke\x1b[0m"));
        assert!(NaiveDateTime::parse_from_str(bracketed(&line), TIMESTAMP_FORMAT).is_ok());
    }

    #[test]
    fn timestamps_follow_the_zone() {
        let dhaka = BadgeFormat::new(Badges::default(), true, "+06:00".parse().unwrap());
        let line = dhaka.render(Badge::Info, instant(), "hello", false);
        assert_eq!(line, "ℹ️ [2024-03-10 00:30:05] hello");

        let utc = BadgeFormat::new(Badges::default(), true, TimeZone::Utc);
        assert_eq!(
            utc.render(Badge::Info, instant(), "hello", false),
            "ℹ️ [2024-03-09 18:30:05] hello"
        );
    }

    #[test]
    fn timestamp_can_be_hidden() {
        let format = BadgeFormat::new(Badges::default(), false, TimeZone::Utc);
        assert_eq!(format.render(Badge::Warn, instant(), "careful", false), "⚠️ careful");
    }

    #[test]
    fn empty_glyph_falls_back_to_space() {
        let badges = Badges {
            log: String::new(),
            ..Default::default()
        };
        assert_eq!(badges.glyph(Badge::Log), " ");
        assert_eq!(badges.glyph(Badge::Success), "✅");
    }

    #[test_case(Level::ERROR, false, Badge::Error)]
    #[test_case(Level::WARN, false, Badge::Warn)]
    #[test_case(Level::INFO, false, Badge::Info)]
    #[test_case(Level::INFO, true, Badge::Success)]
    #[test_case(Level::DEBUG, false, Badge::Log)]
    #[test_case(Level::TRACE, true, Badge::Log)]
    fn badges_for_levels(level: Level, success: bool, expected: Badge) {
        assert_eq!(Badge::for_level(&level, success), expected);
    }

    #[test_case("local", TimeZone::Local)]
    #[test_case("UTC", TimeZone::Utc)]
    #[test_case("+06:00", TimeZone::Fixed(FixedOffset::east_opt(6 * 3600).unwrap()))]
    #[test_case("-03:30", TimeZone::Fixed(FixedOffset::west_opt(3 * 3600 + 1800).unwrap()))]
    fn parses_time_zones(input: &str, expected: TimeZone) {
        assert_eq!(input.parse::<TimeZone>(), Ok(expected));
    }

    #[test]
    fn plain_lines_have_badge_and_timestamp() {
        let format = BadgeFormat::new(Badges::default(), true, TimeZone::Utc);
        let line = format.render(Badge::Error, Utc::now(), "it broke", false);

        assert!(line.starts_with("❌ ["));
        assert!(NaiveDateTime::parse_from_str(bracketed(&line), TIMESTAMP_FORMAT).is_ok());
    }

    #[test]
    fn named_zones_follow_daylight_saving() {
        let dhaka: TimeZone = "Asia/Dhaka".parse().unwrap();
        assert_eq!(dhaka, TimeZone::Named(chrono_tz::Asia::Dhaka));
        assert_eq!(dhaka.format(instant()), "2024-03-10 00:30:05");
        assert_eq!(String::from(dhaka), "Asia/Dhaka");

        let new_york: TimeZone = "America/New_York".parse().unwrap();
        assert_eq!(new_york.format(instant()), "2024-03-09 13:30:05");
        let summer = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();
        assert_eq!(new_york.format(summer), "2024-07-01 08:00:00");
    }

    #[test]
    fn unknown_zones_are_rejected() {
        assert!("Mars/Olympus".parse::<TimeZone>().is_err());
    }
}
