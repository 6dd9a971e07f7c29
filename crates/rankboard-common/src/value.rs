use chrono::{Duration as ChronoDur, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::{
    fmt::{self, Display},
    hash::{Hash, Hasher},
};

use crate::date::parse_date_like;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/* ───────────────────── Excel date-serial utilities ───────────────────
Spreadsheet exports store dates as serial numbers:
  Serial 1  = 1900-01-01
  Serial 60 = 1900-02-29  (phantom – doesn't exist, but Excel thinks it does)
  Serial 61 = 1900-03-01
Base date = 1899-12-31 so that serial 1 = base + 1 day = 1900-01-01.
Time is stored as fractional days (no timezone).
------------------------------------------------------------------- */

/// Base date for the 1900 date system. Serial 1 = base + 1 day = 1900-01-01.
const EXCEL_EPOCH: NaiveDate = NaiveDate::from_ymd_opt(1899, 12, 31).unwrap();
const PHANTOM_LEAP_CUTOVER: NaiveDate = NaiveDate::from_ymd_opt(1900, 3, 1).unwrap();
const PHANTOM_LEAP_DAY: NaiveDate = NaiveDate::from_ymd_opt(1900, 2, 28).unwrap();

pub fn datetime_to_serial(dt: &NaiveDateTime) -> f64 {
    let days = (dt.date() - EXCEL_EPOCH).num_days();
    // Dates on or after 1900-03-01 get +1 to account for phantom Feb 29
    let serial_days = if dt.date() >= PHANTOM_LEAP_CUTOVER {
        days + 1
    } else {
        days
    };

    let secs_in_day = dt.time().num_seconds_from_midnight() as f64;
    serial_days as f64 + secs_in_day / 86_400.0
}

/// `None` when the serial is not finite or lies outside chrono's date range.
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let days = serial.trunc() as i64;
    let frac_secs = (serial.fract() * 86_400.0).round() as i64;

    // Serial 60 is phantom 1900-02-29; map to 1900-02-28
    let date = if days == 60 {
        PHANTOM_LEAP_DAY
    } else {
        let offset = if days < 60 { days } else { days - 1 };
        EXCEL_EPOCH.checked_add_signed(ChronoDur::try_days(offset)?)?
    };

    let time = NaiveTime::from_num_seconds_from_midnight_opt(frac_secs.rem_euclid(86_400) as u32, 0)
        .unwrap_or(NaiveTime::MIN);
    Some(date.and_time(time))
}

/// A single cell of a [`crate::Dataset`].
///
/// Loaders keep whatever type they could infer; the column classifier and
/// the aggregation routines decide later how a column is interpreted.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    Int(i64),
    Number(f64),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Text(String),
    #[default]
    Empty,
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Int(i) => i.hash(state),
            Value::Number(n) => n.to_bits().hash(state),
            Value::Text(s) => s.hash(state),
            Value::Boolean(b) => b.hash(state),
            Value::Date(d) => d.hash(state),
            Value::DateTime(dt) => dt.hash(state),
            Value::Empty => state.write_u8(0),
        }
    }
}

impl Eq for Value {}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Date(d) => write!(f, "{d}"),
            Value::DateTime(dt) => write!(f, "{dt}"),
            Value::Empty => write!(f, ""),
        }
    }
}

/// Normalised identity of a [`Value`], used for grouping and filter membership.
///
/// `Int(3)` and `Number(3.0)` share a key; text is compared exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Missing,
    Number(u64),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Text(String),
}

impl Value {
    /// True for values that aggregation and classification skip over:
    /// empty cells, blank text and NaN.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Empty => true,
            Value::Text(s) => s.trim().is_empty(),
            Value::Number(n) => n.is_nan(),
            _ => false,
        }
    }

    /// Numeric view of the value. Text is accepted when it parses as a
    /// finite number after trimming.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Number(n) if n.is_finite() => Some(*n),
            Value::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Calendar view of the value. Text is accepted when it matches one of
    /// the supported date layouts.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Date(d) => Some(d.and_time(NaiveTime::MIN)),
            Value::DateTime(dt) => Some(*dt),
            Value::Text(s) => parse_date_like(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        self.as_datetime().map(|dt| dt.date())
    }

    pub fn key(&self) -> ValueKey {
        if self.is_missing() {
            return ValueKey::Missing;
        }
        match self {
            Value::Int(i) => ValueKey::Number(normalized_bits(*i as f64)),
            Value::Number(n) => ValueKey::Number(normalized_bits(*n)),
            Value::Boolean(b) => ValueKey::Boolean(*b),
            Value::Date(d) => ValueKey::Date(*d),
            Value::DateTime(dt) => ValueKey::DateTime(*dt),
            Value::Text(s) => ValueKey::Text(s.clone()),
            Value::Empty => ValueKey::Missing,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Number(_) => "number",
            Value::Boolean(_) => "boolean",
            Value::Date(_) => "date",
            Value::DateTime(_) => "datetime",
            Value::Text(_) => "text",
            Value::Empty => "empty",
        }
    }

    pub fn as_serial_number(&self) -> Option<f64> {
        match self {
            Value::Date(d) => Some(datetime_to_serial(&d.and_time(NaiveTime::MIN))),
            Value::DateTime(dt) => Some(datetime_to_serial(dt)),
            Value::Int(i) => Some(*i as f64),
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Build a date or date-time from a spreadsheet serial number. Serials
    /// outside the calendar range stay plain numbers.
    pub fn from_serial_number(serial: f64) -> Self {
        match serial_to_datetime(serial) {
            Some(dt) if dt.time() == NaiveTime::MIN => Value::Date(dt.date()),
            Some(dt) => Value::DateTime(dt),
            None => Value::Number(serial),
        }
    }
}

fn normalized_bits(n: f64) -> u64 {
    // -0.0 and 0.0 group together
    if n == 0.0 { 0.0f64.to_bits() } else { n.to_bits() }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Empty, Into::into)
    }
}
