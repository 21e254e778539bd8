//! Conversions between untyped document values, field text and serialized tokens.
//!
//! Field values are always stored as text; [`Kind`] decides how that text is
//! validated and how it is written back out.

use crate::error::MalformedValue;
use crate::{DocValue, Field, statics};
use std::fmt;

/// Declared interpretation of a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    Int,
    Float,
    String,
}

impl Kind {
    pub const ALL: [Kind; 3] = [Kind::Int, Kind::Float, Kind::String];

    pub fn label(self) -> &'static str {
        match self {
            Kind::Int => statics::EN_KIND_INT,
            Kind::Float => statics::EN_KIND_FLOAT,
            Kind::String => statics::EN_KIND_STRING,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Kind of an untyped parsed value. Only integer and float literals get a numeric kind.
pub fn guess_kind(value: &DocValue) -> Kind {
    match value {
        DocValue::Int(_) => Kind::Int,
        DocValue::Float(_) => Kind::Float,
        _ => Kind::String,
    }
}

/// Text stored in a field for an untyped parsed value.
/// Lists are flattened with `,`; nested objects collapse to a placeholder.
pub fn to_display_string(value: &DocValue) -> String {
    match value {
        DocValue::Null => String::new(),
        DocValue::Bool(b) => b.to_string(),
        DocValue::Int(n) => n.to_string(),
        DocValue::Float(x) => display_float(*x),
        DocValue::String(s) => s.clone(),
        DocValue::Array(values) => values
            .iter()
            .map(to_display_string)
            .collect::<Vec<_>>()
            .join(statics::LIST_SEPARATOR),
        DocValue::Object(_) => statics::PLACEHOLDER_OBJECT.to_string(),
    }
}

/// Shortest round-trip text for a float, without a trailing `.0`.
pub fn display_float(x: f64) -> String {
    if !x.is_finite() {
        return x.to_string();
    }
    let mut buf = ryu::Buffer::new();
    let s = buf.format_finite(x);
    s.strip_suffix(".0").unwrap_or(s).to_string()
}

pub fn parse_int(text: &str) -> Option<i64> {
    text.trim().parse::<i64>().ok()
}

/// Culture-invariant real number parse (dot decimal). NaN and infinities are rejected.
pub fn parse_float(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|x| x.is_finite())
}

pub fn validate(field: &Field) -> Result<(), MalformedValue> {
    let ok = match field.kind {
        Kind::Int => parse_int(&field.value).is_some(),
        Kind::Float => parse_float(&field.value).is_some(),
        Kind::String => true,
    };
    if ok {
        Ok(())
    } else {
        Err(MalformedValue {
            key: field.key.clone(),
            kind: field.kind,
            value: field.value.clone(),
        })
    }
}

/// Canonical document token for a field value.
/// Malformed numeric values fall back to a quoted string so no data is lost.
pub fn format(field: &Field) -> String {
    let mut out = String::new();
    write_token(&mut out, field);
    out
}

pub(crate) fn write_token(out: &mut String, field: &Field) {
    match field.kind {
        Kind::Int => {
            if let Some(n) = parse_int(&field.value) {
                out.push_str(&n.to_string());
                return;
            }
        }
        Kind::Float => {
            if let Some(x) = parse_float(&field.value) {
                // ryu always includes `.` or `e`, so the token re-parses as a float.
                let mut buf = ryu::Buffer::new();
                out.push_str(buf.format_finite(x));
                return;
            }
        }
        Kind::String => {}
    }
    write_escaped_string(out, &field.value);
}

pub(crate) fn write_escaped_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
}
