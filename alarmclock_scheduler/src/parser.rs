use std::sync::LazyLock;

use alarmclock_models::{directive::AlarmDirective, instruction::ScheduleInstruction};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use regex::Regex;

static REPEAT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)every\s+([0-9]+)\s+(second|seconds|minute|minutes|hour|hours)")
        .expect("Repeat pattern is a valid regex.")
});

const SECOND_MS: u64 = 1_000;
const MINUTE_MS: u64 = 60 * SECOND_MS;
const HOUR_MS: u64 = 60 * MINUTE_MS;

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M%:z", "%Y-%m-%d %H:%M:%S%.f%:z"];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses directives, resolving timestamps without an offset in `zone`
/// (system local zone when none is configured).
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectiveParser {
    zone: Option<chrono_tz::Tz>,
}

impl DirectiveParser {
    pub fn new(zone: Option<chrono_tz::Tz>) -> Self {
        Self { zone }
    }

    pub fn parse(&self, directive: &AlarmDirective) -> ScheduleInstruction {
        match &self.zone {
            Some(zone) => parse_in(directive, zone),
            None => parse(directive),
        }
    }
}

pub fn parse(directive: &AlarmDirective) -> ScheduleInstruction {
    parse_in(directive, &Local)
}

pub fn parse_in<Tz: TimeZone>(directive: &AlarmDirective, zone: &Tz) -> ScheduleInstruction {
    let expression = directive.time_expression();

    if let Some(period_ms) = repeat_period_ms(expression) {
        return ScheduleInstruction::repeating(period_ms);
    }

    match resolve_instant(expression.trim(), zone) {
        Some(fire_at) => ScheduleInstruction::one_shot(fire_at),
        None => ScheduleInstruction::rejected(format!("Unrecognised alarm time {expression:?}.")),
    }
}

/// Period of an `every <n> <unit>` phrase. `None` when there is no match or
/// the value is not a positive, representable period.
fn repeat_period_ms(expression: &str) -> Option<u64> {
    let captures = REPEAT_PATTERN.captures(expression)?;
    let value: u64 = captures.get(1)?.as_str().parse().ok()?;
    let unit = captures.get(2)?.as_str().to_ascii_lowercase();

    let factor = if unit.starts_with("second") {
        SECOND_MS
    } else if unit.starts_with("minute") {
        MINUTE_MS
    } else if unit.starts_with("hour") {
        HOUR_MS
    } else {
        return None;
    };

    value.checked_mul(factor).filter(|period_ms| *period_ms > 0)
}

fn resolve_instant<Tz: TimeZone>(text: &str, zone: &Tz) -> Option<DateTime<Utc>> {
    if let Ok(fire_at) = DateTime::parse_from_rfc3339(text) {
        return Some(fire_at.with_timezone(&Utc));
    }

    if let Ok(fire_at) = DateTime::parse_from_rfc2822(text) {
        return Some(fire_at.with_timezone(&Utc));
    }

    if let Some(fire_at) = OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(text, format).ok())
    {
        return Some(fire_at.with_timezone(&Utc));
    }

    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
    {
        // Times skipped by a DST transition resolve to nothing.
        return zone
            .from_local_datetime(&naive)
            .earliest()
            .map(|fire_at| fire_at.with_timezone(&Utc));
    }

    // A bare date means midnight UTC, not local midnight.
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
