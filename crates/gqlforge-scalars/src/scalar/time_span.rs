use super::impl_rename;
use super::json_string;
use super::scalar_info;
use super::ScalarCoercion;
use super::ScalarInfo;
use crate::ast::Value;
use crate::error::ScalarError;
use crate::name;
use crate::value::RuntimeType;
use crate::value::ScalarValue;
use crate::value::SerializationType;
use crate::JsonValue;
use chrono::TimeDelta;
use serde::Deserialize;
use serde::Serialize;
use std::fmt::Write;

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;
const NANOS_PER_TICK: u32 = 100;

/// Text format of a [`TimeSpanType`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeSpanFormat {
    /// ISO 8601 duration, such as `P1DT2H3M4.5S`
    #[default]
    Iso8601,
    /// Constant format `[-][d.]hh:mm:ss[.fffffff]`, such as `1.02:03:04.5000000`
    DotNet,
}

/// A signed duration, serialized as a string in the configured [`TimeSpanFormat`].
#[derive(Clone, Debug)]
pub struct TimeSpanType {
    info: ScalarInfo,
    format: TimeSpanFormat,
}

impl Default for TimeSpanType {
    fn default() -> Self {
        Self::new(TimeSpanFormat::default())
    }
}

impl TimeSpanType {
    pub fn new(format: TimeSpanFormat) -> Self {
        Self {
            info: ScalarInfo::new(
                name!(TimeSpan),
                "The `TimeSpan` scalar represents an ISO-8601 compliant duration type.",
            ),
            format,
        }
    }

    pub fn format(&self) -> TimeSpanFormat {
        self.format
    }

    pub fn with_format(mut self, format: TimeSpanFormat) -> Self {
        self.format = format;
        self
    }

    fn parse(&self, text: &str) -> Option<TimeDelta> {
        match self.format {
            TimeSpanFormat::Iso8601 => parse_iso8601(text),
            TimeSpanFormat::DotNet => parse_dot_net(text),
        }
    }

    /// The `DotNet` format counts in 100 ns ticks, so finer values cannot be printed
    fn from_runtime<'v>(&self, value: &'v ScalarValue) -> Option<&'v TimeDelta> {
        match value {
            ScalarValue::TimeSpan(span) => match self.format {
                TimeSpanFormat::Iso8601 => Some(span),
                TimeSpanFormat::DotNet => {
                    (span.subsec_nanos().unsigned_abs() % NANOS_PER_TICK == 0).then_some(span)
                }
            },
            _ => None,
        }
    }

    fn print(&self, value: &TimeDelta) -> String {
        match self.format {
            TimeSpanFormat::Iso8601 => format_iso8601(value),
            TimeSpanFormat::DotNet => format_dot_net(value),
        }
    }
}

impl_rename!(TimeSpanType);

/// Splits into sign, whole seconds and sub-second nanoseconds
fn split(value: &TimeDelta) -> (bool, i64, u32) {
    let negative = *value < TimeDelta::zero();
    let abs = if negative { -*value } else { *value };
    let nanos = abs.subsec_nanos().unsigned_abs();
    (negative, abs.num_seconds(), nanos)
}

fn build(negative: bool, seconds: i64, nanos: u32) -> Option<TimeDelta> {
    let abs = TimeDelta::new(seconds, nanos)?;
    Some(if negative { -abs } else { abs })
}

fn format_iso8601(value: &TimeDelta) -> String {
    let (negative, seconds, nanos) = split(value);
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push('P');
    let days = seconds / SECONDS_PER_DAY;
    let hours = seconds % SECONDS_PER_DAY / SECONDS_PER_HOUR;
    let minutes = seconds % SECONDS_PER_HOUR / SECONDS_PER_MINUTE;
    let secs = seconds % SECONDS_PER_MINUTE;
    if days > 0 {
        let _ = write!(out, "{days}D");
    }
    let has_seconds = secs > 0 || nanos > 0;
    if hours > 0 || minutes > 0 || has_seconds || days == 0 {
        out.push('T');
        if hours > 0 {
            let _ = write!(out, "{hours}H");
        }
        if minutes > 0 {
            let _ = write!(out, "{minutes}M");
        }
        if has_seconds || (days == 0 && hours == 0 && minutes == 0) {
            let _ = write!(out, "{secs}");
            if nanos > 0 {
                let fraction = format!("{nanos:09}");
                let _ = write!(out, ".{}", fraction.trim_end_matches('0'));
            }
            out.push('S');
        }
    }
    out
}

/// Parses `[-]P[nY][nM][nW][nD][T[nH][nM][n[.f]S]]`.
/// A year counts as 365 days and a month as 30 days.
fn parse_iso8601(text: &str) -> Option<TimeDelta> {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let rest = rest.strip_prefix('P')?;
    let (date_part, time_part) = match rest.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (rest, None),
    };

    let mut seconds: i64 = 0;
    let mut nanos = 0;
    let mut any_component = false;
    for (number, designator) in components(date_part)? {
        let unit = match designator {
            'Y' => 365 * SECONDS_PER_DAY,
            'M' => 30 * SECONDS_PER_DAY,
            'W' => 7 * SECONDS_PER_DAY,
            'D' => SECONDS_PER_DAY,
            _ => return None,
        };
        let whole: i64 = number.parse().ok()?;
        seconds = seconds.checked_add(whole.checked_mul(unit)?)?;
        any_component = true;
    }
    if let Some(time_part) = time_part {
        let components = components(time_part)?;
        if components.is_empty() {
            return None;
        }
        for (number, designator) in components {
            if designator == 'S' {
                let (whole, fraction) = match number.split_once('.') {
                    Some((whole, fraction)) => (whole, Some(fraction)),
                    None => (number, None),
                };
                let whole: i64 = whole.parse().ok()?;
                seconds = seconds.checked_add(whole)?;
                if let Some(fraction) = fraction {
                    nanos = parse_fraction(fraction, 9)?;
                }
            } else {
                let unit = match designator {
                    'H' => SECONDS_PER_HOUR,
                    'M' => SECONDS_PER_MINUTE,
                    _ => return None,
                };
                let whole: i64 = number.parse().ok()?;
                seconds = seconds.checked_add(whole.checked_mul(unit)?)?;
            }
            any_component = true;
        }
    }
    if !any_component {
        return None;
    }
    build(negative, seconds, nanos)
}

/// Splits `1D2H` into `[("1", 'D'), ("2", 'H')]`, requiring digits before each designator
fn components(text: &str) -> Option<Vec<(&str, char)>> {
    let mut result = Vec::new();
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if c.is_ascii_digit() || c == '.' {
            continue;
        }
        let number = &text[start..i];
        if number.is_empty() || !number.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }
        result.push((number, c));
        start = i + c.len_utf8();
    }
    if start != text.len() {
        return None;
    }
    if result.iter().any(|(number, designator)| *designator != 'S' && number.contains('.')) {
        return None;
    }
    Some(result)
}

/// Parses the digits after a decimal point as nanoseconds, allowing at most `max_digits`
fn parse_fraction(fraction: &str, max_digits: usize) -> Option<u32> {
    if fraction.is_empty()
        || fraction.len() > max_digits
        || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    let padded = format!("{fraction:0<9}");
    padded.parse().ok()
}

fn format_dot_net(value: &TimeDelta) -> String {
    let (negative, seconds, nanos) = split(value);
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    let days = seconds / SECONDS_PER_DAY;
    if days > 0 {
        let _ = write!(out, "{days}.");
    }
    let _ = write!(
        out,
        "{:02}:{:02}:{:02}",
        seconds % SECONDS_PER_DAY / SECONDS_PER_HOUR,
        seconds % SECONDS_PER_HOUR / SECONDS_PER_MINUTE,
        seconds % SECONDS_PER_MINUTE,
    );
    let ticks = nanos / NANOS_PER_TICK;
    if ticks > 0 {
        let _ = write!(out, ".{ticks:07}");
    }
    out
}

/// Parses `[-][d.]hh:mm:ss[.fffffff]`
fn parse_dot_net(text: &str) -> Option<TimeDelta> {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let mut parts = rest.split(':');
    let (hours_part, minutes_part, seconds_part) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let (days, hours) = match hours_part.split_once('.') {
        Some((days, hours)) => (parse_digits(days, usize::MAX)?, parse_digits(hours, 2)?),
        None => (0, parse_digits(hours_part, 2)?),
    };
    let minutes = parse_digits(minutes_part, 2)?;
    let (seconds, nanos) = match seconds_part.split_once('.') {
        Some((seconds, fraction)) => (parse_digits(seconds, 2)?, parse_fraction(fraction, 7)?),
        None => (parse_digits(seconds_part, 2)?, 0),
    };
    if hours >= 24 || minutes >= 60 || seconds >= 60 {
        return None;
    }
    let total = days
        .checked_mul(SECONDS_PER_DAY)?
        .checked_add(hours * SECONDS_PER_HOUR + minutes * SECONDS_PER_MINUTE + seconds)?;
    build(negative, total, nanos)
}

fn parse_digits(text: &str, max_len: usize) -> Option<i64> {
    if text.is_empty() || text.len() > max_len || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

impl ScalarCoercion for TimeSpanType {
    scalar_info!();

    fn runtime_type(&self) -> RuntimeType {
        RuntimeType::TimeSpan
    }

    fn serialization_type(&self) -> SerializationType {
        SerializationType::String
    }

    fn is_instance_of(&self, literal: &Value) -> bool {
        match literal {
            Value::Null => true,
            Value::String(text) => self.parse(text).is_some(),
            _ => false,
        }
    }

    fn is_instance_of_value(&self, value: &ScalarValue) -> bool {
        value.is_null() || self.from_runtime(value).is_some()
    }

    fn parse_literal(&self, literal: &Value) -> Result<ScalarValue, ScalarError> {
        match literal {
            Value::Null => Ok(ScalarValue::Null),
            Value::String(text) => self
                .parse(text)
                .map(ScalarValue::TimeSpan)
                .ok_or_else(|| ScalarError::invalid_literal(self.name(), literal)),
            _ => Err(ScalarError::invalid_literal(self.name(), literal)),
        }
    }

    fn parse_value(&self, value: &ScalarValue) -> Result<Value, ScalarError> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        match self.from_runtime(value) {
            Some(span) => Ok(Value::String(self.print(span))),
            None => Err(ScalarError::invalid_value(self.name(), value)),
        }
    }

    fn serialize(&self, value: &ScalarValue) -> Result<JsonValue, ScalarError> {
        if value.is_null() {
            return Ok(JsonValue::Null);
        }
        match self.from_runtime(value) {
            Some(span) => Ok(json_string(self.print(span))),
            None => Err(ScalarError::invalid_value(self.name(), value)),
        }
    }

    fn try_deserialize(&self, json: &JsonValue) -> Option<ScalarValue> {
        match json {
            JsonValue::Null => Some(ScalarValue::Null),
            JsonValue::String(text) => self.parse(text.as_str()).map(ScalarValue::TimeSpan),
            _ => None,
        }
    }
}
