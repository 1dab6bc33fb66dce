use chrono::{DateTime, NaiveDateTime, NaiveTime, Timelike};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Number of minutes in a day
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Datetime layouts accepted when a value is neither a clock time nor an integer
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// A time of day as it arrives from the backend or a form field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeValue {
    /// Minutes since midnight
    Minutes(f64),
    /// `HH:MM`, an ISO datetime, or an integer string
    Text(String),
    /// No value at all
    #[default]
    Missing,
}

impl TimeValue {
    /// Whether the value carries nothing to parse (absent or blank)
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Text(text) => text.trim().is_empty(),
            Self::Minutes(_) => false,
        }
    }

    /// Lossy conversion, see [`to_minutes`]
    pub fn minutes(&self) -> i64 {
        to_minutes(self)
    }
}

impl From<&str> for TimeValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for TimeValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<i64> for TimeValue {
    fn from(minutes: i64) -> Self {
        Self::Minutes(minutes as f64)
    }
}

impl From<f64> for TimeValue {
    fn from(minutes: f64) -> Self {
        Self::Minutes(minutes)
    }
}

impl From<NaiveTime> for TimeValue {
    fn from(time: NaiveTime) -> Self {
        Self::Minutes(f64::from(time.hour() * 60 + time.minute()))
    }
}

impl<T: Into<TimeValue>> From<Option<T>> for TimeValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}

/// Error returned by the strict time parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseTimeError {
    Missing,
    Unrecognized(String),
}

impl Display for ParseTimeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Missing => write!(f, "No time value given"),
            Self::Unrecognized(value) => write!(f, "Unrecognized time value: {value:?}"),
        }
    }
}

impl std::error::Error for ParseTimeError {}

/// Converts a time value into minutes since midnight.
///
/// Numbers are floored. Text containing `:` is read as `HH:MM` when the hour
/// field is empty or numeric, with a missing or malformed minute field read as
/// 0. Other text is tried as a datetime (the wall-clock hour and minute of the
/// timestamp are used) and finally as a leading integer. Fields too large for
/// an `i64` make the value unrecognized.
///
/// # Returns
/// The number of minutes, which is not range-checked
pub fn parse_minutes(value: &TimeValue) -> Result<i64, ParseTimeError> {
    match value {
        TimeValue::Minutes(minutes) if minutes.is_finite() => Ok(minutes.floor() as i64),
        TimeValue::Minutes(minutes) => Err(ParseTimeError::Unrecognized(minutes.to_string())),
        TimeValue::Text(text) => parse_text(text),
        TimeValue::Missing => Err(ParseTimeError::Missing),
    }
}

/// Lossy form of [`parse_minutes`]: anything unparseable becomes 0
pub fn to_minutes(value: &TimeValue) -> i64 {
    parse_minutes(value).unwrap_or_else(|err| {
        match err {
            ParseTimeError::Missing => debug!("Missing time value read as 00:00"),
            ParseTimeError::Unrecognized(_) => warn!("{err}, reading it as 00:00"),
        }
        0
    })
}

/// Formats minutes since midnight as a zero-padded `HH:MM`.
///
/// Values outside a single day wrap around, so 1500 formats as `01:00`.
pub fn to_clock_string(minutes: i64) -> String {
    let minutes = minutes.rem_euclid(MINUTES_PER_DAY);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

fn parse_text(text: &str) -> Result<i64, ParseTimeError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseTimeError::Missing);
    }

    let minutes = match clock_fields(text) {
        Some((hour, minute)) => clock_minutes(hour, minute),
        None => parse_datetime(text).or_else(|| leading_integer(text)),
    };

    minutes.ok_or_else(|| ParseTimeError::Unrecognized(text.to_string()))
}

/// Splits `HH:MM` into its hour and minute fields when the hour is numeric
fn clock_fields(text: &str) -> Option<(&str, &str)> {
    let (hour, rest) = text.split_once(':')?;
    let minute = rest.split_once(':').map_or(rest, |(minute, _)| minute);

    let hour = hour.trim();
    hour.chars()
        .all(|c| c.is_ascii_digit())
        .then_some((hour, minute))
}

/// `None` when a field is too large to fit
fn clock_minutes(hour: &str, minute: &str) -> Option<i64> {
    leading_digits(hour)?
        .checked_mul(60)?
        .checked_add(leading_digits(minute)?)
}

/// Reads the leading digits of a field, 0 when there are none
fn leading_digits(field: &str) -> Option<i64> {
    let field = field.trim();
    let end = field
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(field.len());

    match &field[..end] {
        "" => Some(0),
        digits => digits.parse().ok(),
    }
}

/// Reads a signed integer prefix such as `75` in `75min`
fn leading_integer(text: &str) -> Option<i64> {
    let unsigned = text.strip_prefix(['-', '+']).unwrap_or(text);
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if end == 0 {
        return None;
    }

    let sign_len = text.len() - unsigned.len();
    text[..sign_len + end].parse().ok()
}

fn parse_datetime(text: &str) -> Option<i64> {
    let time = DateTime::parse_from_rfc3339(text)
        .map(|datetime| datetime.time())
        .ok()
        .or_else(|| {
            DATETIME_FORMATS.iter().find_map(|fmt| {
                NaiveDateTime::parse_from_str(text, fmt)
                    .map(|datetime| datetime.time())
                    .ok()
            })
        })?;

    Some(i64::from(time.hour()) * 60 + i64::from(time.minute()))
}
