//! Lenient deserializers for numeric fields.
//!
//! The backend serializes Django `DecimalField`s as strings ("4.00") and
//! integer fields as numbers, sometimes both for the same field depending on
//! the serializer. These helpers accept either and map blanks to `None`.

use serde::de;

struct FloatVisitor;

impl<'de> de::Visitor<'de> for FloatVisitor {
    type Value = Option<f64>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a number or numeric string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed
            .parse::<f64>()
            .map(Some)
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v as f64))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v as f64))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Some(v))
    }

    fn visit_none<E>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(None)
    }
}

/// Deserialize a number or numeric string as `Option<f64>`.
pub(crate) fn flexible_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deserializer.deserialize_any(FloatVisitor)
}

/// Deserialize a number or numeric string as `Option<i64>`.
/// Fractional values are rejected rather than silently rounded.
pub(crate) fn flexible_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match deserializer.deserialize_any(FloatVisitor)? {
        Some(v) if v.fract() == 0.0 => Ok(Some(v as i64)),
        Some(v) => Err(de::Error::invalid_value(
            de::Unexpected::Float(v),
            &"a whole number",
        )),
        None => Ok(None),
    }
}
