//! Coercion rules for date, date time and time filters.
//!
//! Strings are parsed either with the filter's `format` option, a
//! strptime-style pattern compiled once at declaration into a `time`
//! format description, or with a fixed list of free-form layouts. Numbers
//! are Unix timestamps (seconds). Parse failures are never propagated;
//! they become `None` and so `Invalid`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use time::format_description::well_known::{Iso8601, Rfc3339};
use time::format_description::{BorrowedFormatItem, OwnedFormatItem};
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

use crate::registry::TypeTag;
use crate::value::Value;

// ──────────────────────────────────────────────
// Patterns
// ──────────────────────────────────────────────

/// A compiled `format` option.
#[derive(Debug, Clone)]
pub struct DatePattern {
    source: String,
    items: OwnedFormatItem,
}

impl DatePattern {
    /// Compile a strptime-style pattern.
    ///
    /// Supported directives: `%Y %m %d %e %j %H %I %M %S %L %N %p %z %:z
    /// %b %h %B %a %A %F %T %R %%`, with `-` to drop zero padding
    /// (`%-d`). Anything else is rejected.
    pub fn compile(pattern: &str) -> Result<Self, String> {
        let description = translate(pattern)?;
        let items = time::format_description::parse_owned::<1>(&description)
            .map_err(|e| format!("unsupported format '{}': {}", pattern, e))?;
        Ok(DatePattern {
            source: pattern.to_string(),
            items,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    fn date(&self, s: &str) -> Option<Date> {
        Date::parse(s, &self.items).ok()
    }

    /// Parse an instant. Patterns without an offset are read as UTC and
    /// patterns without a time of day as midnight.
    fn instant(&self, s: &str) -> Option<OffsetDateTime> {
        OffsetDateTime::parse(s, &self.items)
            .or_else(|_| {
                PrimitiveDateTime::parse(s, &self.items).map(PrimitiveDateTime::assume_utc)
            })
            .ok()
            .or_else(|| self.date(s).map(|d| d.midnight().assume_utc()))
    }
}

/// Rewrite strptime directives as a version 1 `time` format description.
fn translate(pattern: &str) -> Result<String, String> {
    let mut out = String::with_capacity(pattern.len() * 4);
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '%' => {
                let mut directive = chars.next().ok_or("pattern ends with a bare '%'")?;
                let unpadded = directive == '-';
                if unpadded {
                    directive = chars.next().ok_or("pattern ends with '%-'")?;
                }
                if directive == ':' {
                    match chars.next() {
                        Some('z') => {
                            out.push_str("[offset_hour sign:mandatory]:[offset_minute]");
                            continue;
                        }
                        _ => return Err("'%:' must be followed by 'z'".to_string()),
                    }
                }
                out.push_str(&component(directive, unpadded)?);
            }
            '[' => out.push_str("[["),
            other => out.push(other),
        }
    }
    Ok(out)
}

fn component(directive: char, unpadded: bool) -> Result<String, String> {
    let numeric = |name: &str| {
        if unpadded {
            format!("[{} padding:none]", name)
        } else {
            format!("[{}]", name)
        }
    };
    let translated = match directive {
        'Y' => "[year]".to_string(),
        'm' => numeric("month"),
        'd' => numeric("day"),
        'e' => "[day padding:space]".to_string(),
        'j' => numeric("ordinal"),
        'H' => numeric("hour"),
        'I' => {
            if unpadded {
                "[hour repr:12 padding:none]".to_string()
            } else {
                "[hour repr:12]".to_string()
            }
        }
        'M' => numeric("minute"),
        'S' => numeric("second"),
        'L' => "[subsecond digits:3]".to_string(),
        'N' => "[subsecond]".to_string(),
        'p' | 'P' => "[period case_sensitive:false]".to_string(),
        'z' => "[offset_hour sign:mandatory][offset_minute]".to_string(),
        'b' | 'h' => "[month repr:short case_sensitive:false]".to_string(),
        'B' => "[month repr:long case_sensitive:false]".to_string(),
        'a' => "[weekday repr:short case_sensitive:false]".to_string(),
        'A' => "[weekday repr:long case_sensitive:false]".to_string(),
        'F' => "[year]-[month]-[day]".to_string(),
        'T' => "[hour]:[minute]:[second]".to_string(),
        'R' => "[hour]:[minute]".to_string(),
        '%' => "%".to_string(),
        other => return Err(format!("unsupported directive '%{}'", other)),
    };
    Ok(translated)
}

// ──────────────────────────────────────────────
// Free-form parsing
// ──────────────────────────────────────────────

const DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

const LOCAL_LAYOUTS: &[&[BorrowedFormatItem<'static>]] = &[
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]"),
];

const OFFSET_LAYOUT: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second] [offset_hour sign:mandatory][offset_minute]"
);

fn free_form_instant(s: &str) -> Option<OffsetDateTime> {
    let s = s.trim();
    if let Ok(t) = OffsetDateTime::parse(s, &Rfc3339) {
        return Some(t);
    }
    if let Ok(t) = OffsetDateTime::parse(s, &Iso8601::DEFAULT) {
        return Some(t);
    }
    if let Ok(t) = OffsetDateTime::parse(s, OFFSET_LAYOUT) {
        return Some(t);
    }
    LOCAL_LAYOUTS
        .iter()
        .find_map(|layout| PrimitiveDateTime::parse(s, *layout).ok())
        .map(PrimitiveDateTime::assume_utc)
        .or_else(|| free_form_date(s).map(|d| d.midnight().assume_utc()))
}

fn free_form_date(s: &str) -> Option<Date> {
    let s = s.trim();
    Date::parse(s, DATE).ok()
}

fn from_epoch(value: &Value) -> Option<OffsetDateTime> {
    match value {
        Value::Integer(seconds) => OffsetDateTime::from_unix_timestamp(*seconds).ok(),
        Value::Float(seconds) if seconds.is_finite() => {
            let nanos = (*seconds * 1e9).round();
            if nanos.abs() > i128::MAX as f64 {
                return None;
            }
            OffsetDateTime::from_unix_timestamp_nanos(nanos as i128).ok()
        }
        Value::Decimal(seconds) => {
            let nanos = seconds.checked_mul(Decimal::from(1_000_000_000))?.round();
            OffsetDateTime::from_unix_timestamp_nanos(nanos.to_i128()?).ok()
        }
        _ => None,
    }
}

// ──────────────────────────────────────────────
// Rules
// ──────────────────────────────────────────────

/// Cast for the three temporal tags. `tag` must be one of them.
pub(super) fn temporal(
    tag: TypeTag,
    value: &Value,
    pattern: Option<&DatePattern>,
) -> Option<Value> {
    match tag {
        TypeTag::Date => date(value, pattern).map(Value::Date),
        TypeTag::DateTime => date_time(value, pattern).map(Value::DateTime),
        _ => time_of(value, pattern).map(Value::Time),
    }
}

fn date(value: &Value, pattern: Option<&DatePattern>) -> Option<Date> {
    match value {
        Value::Date(d) => Some(*d),
        Value::DateTime(t) | Value::Time(t) => Some(t.date()),
        Value::String(s) => match pattern {
            Some(p) => p.date(s),
            None => free_form_date(s).or_else(|| free_form_instant(s).map(|t| t.date())),
        },
        Value::Integer(_) | Value::Float(_) | Value::Decimal(_) => {
            from_epoch(value).map(|t| t.date())
        }
        _ => None,
    }
}

fn date_time(value: &Value, pattern: Option<&DatePattern>) -> Option<OffsetDateTime> {
    match value {
        Value::DateTime(t) | Value::Time(t) => Some(*t),
        Value::String(s) => parse_instant(s, pattern),
        _ => None,
    }
}

fn time_of(value: &Value, pattern: Option<&DatePattern>) -> Option<OffsetDateTime> {
    match value {
        Value::Time(t) | Value::DateTime(t) => Some(*t),
        Value::String(s) => parse_instant(s, pattern),
        Value::Integer(_) | Value::Float(_) | Value::Decimal(_) => from_epoch(value),
        _ => None,
    }
}

fn parse_instant(s: &str, pattern: Option<&DatePattern>) -> Option<OffsetDateTime> {
    match pattern {
        Some(p) => p.instant(s),
        None => free_form_instant(s),
    }
}
