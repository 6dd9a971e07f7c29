//! Display formatting for totals and dates.
//!
//! Formatting is locale-light: callers pick the separators and precision.
//! The default renders thousands-grouped integers (`1,234,567`).

use std::fmt::Write;

use chrono::NaiveDate;
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DATE_PATTERN: &str = "%d/%m/%Y";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberFormat {
    pub decimals: u8,
    pub thousands_separator: Option<char>,
    pub decimal_separator: char,
    /// Render with SI suffixes (`12.3M`) instead of full digits.
    pub compact: bool,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            decimals: 0,
            thousands_separator: Some(','),
            decimal_separator: '.',
            compact: false,
        }
    }
}

impl NumberFormat {
    /// Grouped with `.` and decimal `,` (pt-BR, de-DE style).
    pub fn continental(decimals: u8) -> Self {
        Self {
            decimals,
            thousands_separator: Some('.'),
            decimal_separator: ',',
            compact: false,
        }
    }

    /// Three significant digits with an SI suffix, for chart axes.
    pub fn compact() -> Self {
        Self {
            decimals: 1,
            thousands_separator: None,
            decimal_separator: '.',
            compact: true,
        }
    }

    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn format(&self, v: f64) -> String {
        if !v.is_finite() {
            return v.to_string();
        }
        if self.compact {
            return self.format_compact(v);
        }
        self.format_plain(v)
    }

    fn format_plain(&self, v: f64) -> String {
        let decimals = self.decimals as usize;
        let rendered = format!("{:.*}", decimals, v.abs());
        let (int_part, frac_part) = match rendered.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (rendered.as_str(), None),
        };
        let mut out = String::with_capacity(rendered.len() + int_part.len() / 3 + 1);
        // normalize `-0`
        if v < 0.0 && rendered.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
            out.push('-');
        }
        match self.thousands_separator {
            Some(sep) => push_grouped(&mut out, int_part, sep),
            None => out.push_str(int_part),
        }
        if let Some(frac) = frac_part {
            out.push(self.decimal_separator);
            out.push_str(frac);
        }
        out
    }

    fn format_compact(&self, v: f64) -> String {
        const UNITS: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "k")];
        let abs = v.abs();
        let decimals = self.decimals as usize;
        for (scale, suffix) in UNITS {
            // Pick the unit on the rounded value so 999_950 reads `1M`, not `1000k`.
            let rounded: f64 = format!("{:.*}", decimals, abs / scale)
                .parse()
                .unwrap_or(abs / scale);
            if rounded >= 1.0 {
                let plain = Self {
                    compact: false,
                    ..*self
                };
                let mut s = plain.format_plain(v / scale);
                trim_zero_fraction(&mut s, self.decimal_separator);
                s.push_str(suffix);
                return s;
            }
        }
        let mut s = Self {
            compact: false,
            ..*self
        }
        .format_plain(v);
        trim_zero_fraction(&mut s, self.decimal_separator);
        s
    }
}

fn push_grouped(out: &mut String, digits: &str, sep: char) {
    let len = digits.len();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
}

fn trim_zero_fraction(s: &mut String, decimal_separator: char) {
    if let Some(pos) = s.find(decimal_separator) {
        let trimmed_len = s.trim_end_matches('0').len();
        s.truncate(trimmed_len);
        if s.len() == pos + decimal_separator.len_utf8() {
            s.truncate(pos);
        }
    }
}

/// Render `date` with a strftime `pattern`. A pattern chrono cannot render
/// for a plain date falls back to ISO `%Y-%m-%d`.
pub fn format_date(date: NaiveDate, pattern: &str) -> String {
    let mut out = String::new();
    match write!(out, "{}", date.format(pattern)) {
        Ok(()) => out,
        Err(_) => date.to_string(),
    }
}

/// Whether `pattern` parses as strftime and renders a calendar date.
/// Time-of-day specifiers fail the second check.
pub fn is_valid_date_pattern(pattern: &str) -> bool {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return false;
    }
    let probe = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default();
    let mut sink = String::new();
    write!(sink, "{}", probe.format(pattern)).is_ok()
}
