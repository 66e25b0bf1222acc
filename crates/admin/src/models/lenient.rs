//! Forgiving deserializers for analytics and optional record fields.
//!
//! The backend builds several responses from raw SQL rows, so counts can
//! arrive as `null`, floats or numeric strings and labels as numbers. These
//! helpers coerce instead of failing; anything unusable becomes zero/empty.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Non-negative count; `null` and garbage become 0.
pub fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let n = match &value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(to_count)),
        other => as_f64(other).map(to_count),
    };
    Ok(n.unwrap_or(0))
}

/// Float metric; `null` and garbage become 0.0.
pub fn float<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(as_f64(&value).filter(|f| f.is_finite()).unwrap_or(0.0))
}

/// Display label; numbers are stringified, `null` becomes empty.
pub fn label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Timestamp with or without offset; unparseable values become `None`.
pub fn datetime<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::String(raw) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    let raw = raw.trim();
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_utc())
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok())
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        });
    Ok(parsed)
}

/// Calendar date; accepts a full timestamp and keeps the date part.
pub fn date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::String(raw) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    let raw = raw.trim();
    Ok(raw
        .get(..10)
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_count(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "super::count")]
        total: u64,
        #[serde(default, deserialize_with = "super::float")]
        promedio: f64,
        #[serde(default, deserialize_with = "super::label")]
        zona: String,
        #[serde(default, deserialize_with = "super::datetime")]
        cuando: Option<chrono::NaiveDateTime>,
    }

    #[test]
    fn test_coerces_sql_shapes() {
        let row: Row = serde_json::from_str(
            r#"{"total":"12","promedio":"1.50","zona":3,"cuando":"2024-03-01T10:15:00"}"#,
        )
        .unwrap();
        assert_eq!(row.total, 12);
        assert!((row.promedio - 1.5).abs() < f64::EPSILON);
        assert_eq!(row.zona, "3");
        assert_eq!(row.cuando.unwrap().to_string(), "2024-03-01 10:15:00");
    }

    #[test]
    fn test_missing_and_null_default() {
        let row: Row = serde_json::from_str(r#"{"total":null,"zona":null,"cuando":"ayer"}"#).unwrap();
        assert_eq!(row.total, 0);
        assert!(row.promedio.abs() < f64::EPSILON);
        assert_eq!(row.zona, "");
        assert!(row.cuando.is_none());
    }

    #[test]
    fn test_float_counts_round() {
        let row: Row = serde_json::from_str(r#"{"total":4.0}"#).unwrap();
        assert_eq!(row.total, 4);
        let row: Row = serde_json::from_str(r#"{"total":-2}"#).unwrap();
        assert_eq!(row.total, 0);
    }
}
