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
use chrono::DateTime;
use chrono::FixedOffset;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::SubsecRound;
use chrono::TimeZone;
use chrono::Timelike;
use chrono::Utc;

const DATE_FORMAT: &str = "%Y-%m-%d";
const UTC_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
const OFFSET_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";
const ZULU_PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// A calendar date without time zone, `yyyy-MM-dd`.
#[derive(Clone, Debug)]
pub struct DateType {
    info: ScalarInfo,
}

/// A point in time with a UTC offset.
///
/// A zero offset serializes as `yyyy-MM-ddTHH:mm:ss.fffZ`,
/// any other offset as `yyyy-MM-ddTHH:mm:ss.fff+hh:mm`.
/// Precision on the wire is milliseconds: runtime values with a finer fraction are
/// rejected, and parsed text is truncated to whole milliseconds.
#[derive(Clone, Debug)]
pub struct DateTimeType {
    info: ScalarInfo,
}

impl Default for DateType {
    fn default() -> Self {
        Self {
            info: ScalarInfo::new(
                name!(Date),
                "The `Date` scalar represents an ISO-8601 compliant date type.",
            ),
        }
    }
}

impl Default for DateTimeType {
    fn default() -> Self {
        Self {
            info: ScalarInfo::new(
                name!(DateTime),
                "The `DateTime` scalar represents an ISO-8601 compliant date time type.",
            ),
        }
    }
}

impl_rename!(DateType);
impl_rename!(DateTimeType);

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok()
}

fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Tries a strict Zulu-time parse first, then any RFC 3339 offset
pub(crate) fn parse_date_time(text: &str) -> Option<DateTime<FixedOffset>> {
    let parsed = match NaiveDateTime::parse_from_str(text, ZULU_PARSE_FORMAT) {
        Ok(naive) => Utc.from_utc_datetime(&naive).fixed_offset(),
        Err(_) => DateTime::parse_from_rfc3339(text)
            .or_else(|_| DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%:z"))
            .ok()?,
    };
    Some(parsed.trunc_subsecs(3))
}

/// Whether `format_date_time` prints every digit of `value`
fn is_whole_millis(value: &DateTime<FixedOffset>) -> bool {
    let nanos = value.nanosecond();
    nanos < 1_000_000_000 && nanos % 1_000_000 == 0
}

pub(crate) fn format_date_time(value: &DateTime<FixedOffset>) -> String {
    if value.offset().local_minus_utc() == 0 {
        value.format(UTC_FORMAT).to_string()
    } else {
        value.format(OFFSET_FORMAT).to_string()
    }
}

impl ScalarCoercion for DateType {
    scalar_info!();

    fn runtime_type(&self) -> RuntimeType {
        RuntimeType::Date
    }

    fn serialization_type(&self) -> SerializationType {
        SerializationType::String
    }

    fn is_instance_of(&self, literal: &Value) -> bool {
        match literal {
            Value::Null => true,
            Value::String(text) => parse_date(text).is_some(),
            _ => false,
        }
    }

    fn is_instance_of_value(&self, value: &ScalarValue) -> bool {
        matches!(value, ScalarValue::Null | ScalarValue::Date(_))
    }

    fn parse_literal(&self, literal: &Value) -> Result<ScalarValue, ScalarError> {
        match literal {
            Value::Null => Ok(ScalarValue::Null),
            Value::String(text) => parse_date(text)
                .map(ScalarValue::Date)
                .ok_or_else(|| ScalarError::invalid_literal(self.name(), literal)),
            _ => Err(ScalarError::invalid_literal(self.name(), literal)),
        }
    }

    fn parse_value(&self, value: &ScalarValue) -> Result<Value, ScalarError> {
        match value {
            ScalarValue::Null => Ok(Value::Null),
            ScalarValue::Date(date) => Ok(Value::String(format_date(date))),
            _ => Err(ScalarError::invalid_value(self.name(), value)),
        }
    }

    fn serialize(&self, value: &ScalarValue) -> Result<JsonValue, ScalarError> {
        match value {
            ScalarValue::Null => Ok(JsonValue::Null),
            ScalarValue::Date(date) => Ok(json_string(format_date(date))),
            _ => Err(ScalarError::invalid_value(self.name(), value)),
        }
    }

    fn try_deserialize(&self, json: &JsonValue) -> Option<ScalarValue> {
        match json {
            JsonValue::Null => Some(ScalarValue::Null),
            JsonValue::String(text) => parse_date(text.as_str()).map(ScalarValue::Date),
            _ => None,
        }
    }
}

impl ScalarCoercion for DateTimeType {
    scalar_info!();

    fn runtime_type(&self) -> RuntimeType {
        RuntimeType::DateTime
    }

    fn serialization_type(&self) -> SerializationType {
        SerializationType::String
    }

    fn is_instance_of(&self, literal: &Value) -> bool {
        match literal {
            Value::Null => true,
            Value::String(text) => parse_date_time(text).is_some(),
            _ => false,
        }
    }

    fn is_instance_of_value(&self, value: &ScalarValue) -> bool {
        match value {
            ScalarValue::Null => true,
            ScalarValue::DateTime(date_time) => is_whole_millis(date_time),
            _ => false,
        }
    }

    fn parse_literal(&self, literal: &Value) -> Result<ScalarValue, ScalarError> {
        match literal {
            Value::Null => Ok(ScalarValue::Null),
            Value::String(text) => parse_date_time(text)
                .map(ScalarValue::DateTime)
                .ok_or_else(|| ScalarError::invalid_literal(self.name(), literal)),
            _ => Err(ScalarError::invalid_literal(self.name(), literal)),
        }
    }

    fn parse_value(&self, value: &ScalarValue) -> Result<Value, ScalarError> {
        match value {
            ScalarValue::Null => Ok(Value::Null),
            ScalarValue::DateTime(date_time) if is_whole_millis(date_time) => {
                Ok(Value::String(format_date_time(date_time)))
            }
            _ => Err(ScalarError::invalid_value(self.name(), value)),
        }
    }

    fn serialize(&self, value: &ScalarValue) -> Result<JsonValue, ScalarError> {
        match value {
            ScalarValue::Null => Ok(JsonValue::Null),
            ScalarValue::DateTime(date_time) if is_whole_millis(date_time) => {
                Ok(json_string(format_date_time(date_time)))
            }
            _ => Err(ScalarError::invalid_value(self.name(), value)),
        }
    }

    fn try_deserialize(&self, json: &JsonValue) -> Option<ScalarValue> {
        match json {
            JsonValue::Null => Some(ScalarValue::Null),
            JsonValue::String(text) => parse_date_time(text.as_str()).map(ScalarValue::DateTime),
            _ => None,
        }
    }
}
