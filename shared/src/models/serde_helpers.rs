//! Lenient serde helpers for backend payloads
//!
//! The shipping backend stores prices in decimal columns and sometimes emits
//! them as strings (`"450.00"`), and ids may arrive either as numbers or as
//! numeric strings. These helpers accept both forms.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Integer id that accepts `12` and `"12"`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlexibleId(pub i64);

impl<'de> Deserialize<'de> for FlexibleId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct IdVisitor;

        impl<'de> Visitor<'de> for IdVisitor {
            type Value = FlexibleId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an integer id or a numeric string")
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
                Ok(FlexibleId(value))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
                i64::try_from(value)
                    .map(FlexibleId)
                    .map_err(|_| E::custom(format!("id out of range: {}", value)))
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
                if value.fract() == 0.0 && value.is_finite() {
                    Ok(FlexibleId(value as i64))
                } else {
                    Err(E::custom(format!("id is not an integer: {}", value)))
                }
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                value
                    .trim()
                    .parse::<i64>()
                    .map(FlexibleId)
                    .map_err(|_| E::custom(format!("invalid id: {}", value)))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

/// Number that accepts `450`, `450.5`, `"450.50"` and `null`
///
/// Unparseable strings and `null` become `0.0`, matching how the dashboard
/// always treated missing prices.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FlexibleNumber(f64);

impl<'de> Deserialize<'de> for FlexibleNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct NumberVisitor;

        impl<'de> Visitor<'de> for NumberVisitor {
            type Value = FlexibleNumber;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a number, a numeric string or null")
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
                Ok(FlexibleNumber(value as f64))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
                Ok(FlexibleNumber(value as f64))
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
                Ok(FlexibleNumber(value))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                Ok(FlexibleNumber(value.trim().parse::<f64>().unwrap_or(0.0)))
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(FlexibleNumber(0.0))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(FlexibleNumber(0.0))
            }
        }

        deserializer.deserialize_any(NumberVisitor)
    }
}

/// Deserialize an id from a number or numeric string
pub fn flexible_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    FlexibleId::deserialize(deserializer).map(|id| id.0)
}

/// Deserialize an optional id; `null` stays `None`
pub fn flexible_id_opt<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<FlexibleId>::deserialize(deserializer).map(|opt| opt.map(|id| id.0))
}

/// Deserialize a price from a number, numeric string or null
pub fn flexible_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    FlexibleNumber::deserialize(deserializer).map(|n| n.0)
}
