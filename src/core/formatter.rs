use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::core::primitives::unix_seconds_to_datetime;
use crate::error::{ChartError, ChartResult};

pub const DEFAULT_TIME_FORMAT: &str = "[%Y-%m-%d %H:%M:%S]";
pub const DEFAULT_LINEAR_FORMAT: &str = "%.2f";
pub const NULL_LABEL: &str = "<null>";

/// How axis values are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatterKind {
    /// printf-style float template, e.g. `"%.3f"`.
    Linear,
    /// strftime-style template applied to epoch seconds (UTC).
    Time,
    /// Labels are suppressed.
    Null,
}

/// Validated value formatter: a kind plus its template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "format")]
pub enum ValueFormatter {
    Linear(String),
    Time(String),
    Null,
}

impl Default for ValueFormatter {
    fn default() -> Self {
        Self::Time(DEFAULT_TIME_FORMAT.to_owned())
    }
}

impl ValueFormatter {
    /// Builds a formatter from a kind and optional template.
    ///
    /// `Null` rejects a template; `Linear` and `Time` require one.
    pub fn new(kind: FormatterKind, format: Option<&str>) -> ChartResult<Self> {
        match (kind, format) {
            (FormatterKind::Null, None) => Ok(Self::Null),
            (FormatterKind::Null, Some(_)) => Err(ChartError::InvalidData(
                "null formatter takes no format string".to_owned(),
            )),
            (_, None) => Err(ChartError::InvalidData(
                "linear and time formatters require a format string".to_owned(),
            )),
            (FormatterKind::Linear, Some(format)) => Self::linear(format),
            (FormatterKind::Time, Some(format)) => Self::time(format),
        }
    }

    pub fn linear(format: &str) -> ChartResult<Self> {
        if parse_float_spec(format).is_none() {
            return Err(ChartError::InvalidData(format!(
                "linear format `{format}` has no float conversion"
            )));
        }
        Ok(Self::Linear(format.to_owned()))
    }

    pub fn time(format: &str) -> ChartResult<Self> {
        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return Err(ChartError::InvalidData(format!(
                "time format `{format}` is not a valid strftime pattern"
            )));
        }
        Ok(Self::Time(format.to_owned()))
    }

    #[must_use]
    pub fn kind(&self) -> FormatterKind {
        match self {
            Self::Linear(_) => FormatterKind::Linear,
            Self::Time(_) => FormatterKind::Time,
            Self::Null => FormatterKind::Null,
        }
    }

    #[must_use]
    pub fn pattern(&self) -> Option<&str> {
        match self {
            Self::Linear(format) | Self::Time(format) => Some(format),
            Self::Null => None,
        }
    }

    #[must_use]
    pub fn format(&self, value: f64) -> String {
        match self {
            Self::Null => NULL_LABEL.to_owned(),
            Self::Linear(format) => format_linear(format, value),
            Self::Time(format) => format_time(format, value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FloatSpec {
    start: usize,
    end: usize,
    left_align: bool,
    zero_pad: bool,
    width: usize,
    precision: Option<usize>,
    conversion: char,
}

/// Locates the first float conversion (`%f`, `%e`, `%g`, `%d`) in a template.
fn parse_float_spec(template: &str) -> Option<FloatSpec> {
    let bytes = template.as_bytes();
    let mut index = 0;
    while index < bytes.len() {
        if bytes[index] != b'%' {
            index += 1;
            continue;
        }
        if bytes.get(index + 1) == Some(&b'%') {
            index += 2;
            continue;
        }

        let start = index;
        let mut cursor = index + 1;
        let mut left_align = false;
        let mut zero_pad = false;
        while let Some(flag) = bytes.get(cursor) {
            match flag {
                b'-' => left_align = true,
                b'0' => zero_pad = true,
                b'+' | b' ' | b'\'' => {}
                _ => break,
            }
            cursor += 1;
        }
        let width = take_number(bytes, &mut cursor).unwrap_or(0);
        let precision = if bytes.get(cursor) == Some(&b'.') {
            cursor += 1;
            Some(take_number(bytes, &mut cursor).unwrap_or(0))
        } else {
            None
        };
        if bytes.get(cursor) == Some(&b'l') {
            cursor += 1;
        }
        let conversion = *bytes.get(cursor)? as char;
        if matches!(conversion, 'f' | 'F' | 'e' | 'g' | 'd' | 'i') {
            return Some(FloatSpec {
                start,
                end: cursor + 1,
                left_align,
                zero_pad,
                width,
                precision,
                conversion,
            });
        }
        index = cursor + 1;
    }
    None
}

fn take_number(bytes: &[u8], cursor: &mut usize) -> Option<usize> {
    let begin = *cursor;
    while bytes.get(*cursor).is_some_and(u8::is_ascii_digit) {
        *cursor += 1;
    }
    std::str::from_utf8(&bytes[begin..*cursor]).ok()?.parse().ok()
}

fn format_linear(template: &str, value: f64) -> String {
    let Some(spec) = parse_float_spec(template) else {
        return template.to_owned();
    };

    let body = match spec.conversion {
        'e' => format!("{:.*e}", spec.precision.unwrap_or(6), value),
        'g' => match spec.precision {
            Some(precision) => format!("{value:.precision$}"),
            None => format!("{value}"),
        },
        'd' | 'i' if value.is_finite() => format!("{}", value.round() as i64),
        _ => format!("{:.*}", spec.precision.unwrap_or(6), value),
    };
    let width = spec.width;
    let padded = if spec.left_align {
        format!("{body:<width$}")
    } else if spec.zero_pad && value.is_finite() {
        match body.strip_prefix('-') {
            Some(digits) => format!("-{digits:0>pad$}", pad = width.saturating_sub(1)),
            None => format!("{body:0>width$}"),
        }
    } else {
        format!("{body:>width$}")
    };

    let mut out = String::with_capacity(template.len() + padded.len());
    out.push_str(&template[..spec.start].replace("%%", "%"));
    out.push_str(&padded);
    out.push_str(&template[spec.end..].replace("%%", "%"));
    out
}

fn format_time(template: &str, epoch_seconds: f64) -> String {
    let Some(time) = unix_seconds_to_datetime(epoch_seconds) else {
        return "nan".to_owned();
    };
    let mut out = String::new();
    if write!(out, "{}", time.format(template)).is_err() {
        return template.to_owned();
    }
    out
}
