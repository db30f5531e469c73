//! Unit kinds that can be assigned to a metric.
//!
//! [`UnitKind`] is the single source of truth for how raw user text becomes a
//! canonical [`Value`] and how a value is displayed again.

use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::duration::{format_duration, parse_duration};
use crate::error::{ConfigError, ParsingError};
use crate::locale::Locale;
use crate::value::Value;

/// The closed set of units a metric can be measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Int,
    Float,
    Duration,
    String,
    Enum,
}

/// Order in which [`determine_unit_and_value`] tries unit kinds.
pub const INFERENCE_ORDER: [UnitKind; 3] = [UnitKind::Duration, UnitKind::Int, UnitKind::Float];

impl UnitKind {
    pub const ALL: [Self; 5] = [
        Self::Int,
        Self::Float,
        Self::Duration,
        Self::String,
        Self::Enum,
    ];

    /// Human-readable name of the unit.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Int => "Int",
            Self::Float => "Float",
            Self::Duration => "Duration",
            Self::String => "String",
            Self::Enum => "Enum",
        }
    }

    /// Parses raw user text into this unit's canonical value.
    ///
    /// `Enum` values are accepted as-is here; use [`UnitKind::parse_in`] to
    /// check them against an allowed set.
    pub fn parse(self, raw: &str) -> Result<Value, ParsingError> {
        match self {
            Self::Int => raw.trim().parse::<i64>().map(Value::Int).map_err(|err| {
                match err.kind() {
                    IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                        ParsingError::IntOutOfRange(raw.to_string())
                    }
                    _ => ParsingError::InvalidInt(raw.to_string()),
                }
            }),
            Self::Float => parse_decimal(raw)
                .map(Value::Decimal)
                .ok_or_else(|| ParsingError::InvalidFloat(raw.to_string())),
            Self::Duration => parse_duration(raw).map(Value::Duration),
            Self::String | Self::Enum => Ok(Value::Text(raw.to_string())),
        }
    }

    /// Like [`UnitKind::parse`], but absent input stays absent.
    pub fn parse_optional(self, raw: Option<&str>) -> Result<Option<Value>, ParsingError> {
        raw.map(|raw| self.parse(raw)).transpose()
    }

    /// Parses raw text, checking `Enum` values against `allowed`.
    pub fn parse_in(self, raw: &str, allowed: Option<&[Value]>) -> Result<Value, ParsingError> {
        let value = self.parse(raw)?;
        if self != Self::Enum {
            return Ok(value);
        }
        match allowed {
            Some(allowed) if !allowed.contains(&value) => Err(ParsingError::NotAllowed {
                value: raw.to_string(),
                allowed: allowed
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
            _ => Ok(value),
        }
    }

    /// Converts an already-parsed value into this unit's canonical form.
    ///
    /// Canonical values pass through unchanged, so parsing is idempotent on
    /// its own output. Numbers widen where that loses nothing (an `Int` is a
    /// valid `Float` or `Duration`); text is parsed. Durations are never
    /// negative.
    pub fn coerce(self, value: Value) -> Result<Value, ParsingError> {
        match (self, value) {
            (_, Value::Text(raw)) if self != Self::String && self != Self::Enum => self.parse(&raw),
            (Self::Int, Value::Int(n)) => Ok(Value::Int(n)),
            (Self::Int, Value::Decimal(d)) if d.fract().is_zero() => d
                .to_i64()
                .map(Value::Int)
                .ok_or_else(|| self.unsupported(&Value::Decimal(d))),
            (Self::Float, Value::Int(n)) => Ok(Value::Decimal(Decimal::from(n))),
            (Self::Float, Value::Decimal(d)) => Ok(Value::Decimal(d)),
            (Self::Duration, Value::Int(n)) if n >= 0 => Ok(Value::Duration(Decimal::from(n))),
            (Self::Duration, Value::Decimal(d) | Value::Duration(d)) if d >= Decimal::ZERO => {
                Ok(Value::Duration(d))
            }
            (Self::String | Self::Enum, Value::Text(s)) => Ok(Value::Text(s)),
            (Self::String | Self::Enum, value @ (Value::Int(_) | Value::Decimal(_))) => {
                Ok(Value::Text(value.to_string()))
            }
            (_, value) => Err(self.unsupported(&value)),
        }
    }

    /// Formats a value for display.
    pub fn render(self, value: &Value, locale: &Locale) -> String {
        match (self, value) {
            (Self::Duration, Value::Int(n)) => format_duration(Decimal::from(*n)),
            (Self::Duration, Value::Decimal(d)) | (_, Value::Duration(d)) => format_duration(*d),
            (_, Value::Int(n)) => locale.format_int(*n),
            (_, Value::Decimal(d)) => locale.format_decimal(*d),
            (_, Value::Text(s)) => s.clone(),
        }
    }

    /// The value a metric of this unit takes when nothing else is known.
    pub fn natural_zero(self) -> Value {
        match self {
            Self::Int => Value::Int(0),
            Self::Float => Value::Decimal(Decimal::ZERO),
            Self::Duration => Value::Duration(Decimal::ZERO),
            Self::String | Self::Enum => Value::Text(String::new()),
        }
    }

    /// Whether `value` has the representation this unit produces.
    pub const fn accepts(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Self::Int, Value::Int(_))
                | (Self::Float, Value::Decimal(_))
                | (Self::Duration, Value::Duration(_))
                | (Self::String | Self::Enum, Value::Text(_))
        )
    }

    fn unsupported(self, value: &Value) -> ParsingError {
        ParsingError::Unsupported {
            unit: self.display_name(),
            value: value.to_string(),
        }
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if s.contains(['e', 'E']) {
        return Decimal::from_scientific(s).ok();
    }

    let s = s.strip_suffix('.').unwrap_or(s);
    let (sign, digits) = match s.strip_prefix(['-', '+']) {
        Some(rest) => (&s[..1], rest),
        None => ("", s),
    };
    if digits.starts_with('.') {
        Decimal::from_str(&format!("{sign}0{digits}")).ok()
    } else {
        Decimal::from_str(s).ok()
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for UnitKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|unit| unit.display_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownUnit(s.to_string()))
    }
}

impl Serialize for UnitKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.display_name())
    }
}

impl<'de> Deserialize<'de> for UnitKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Guesses the unit of a raw value.
///
/// Tries [`INFERENCE_ORDER`] and returns the first unit that parses the text
/// to a non-zero, non-empty value. Zero is treated like a failed parse, so
/// `"0"` infers nothing and `"42"` is an `Int` (as a duration it has no unit
/// words and is zero).
pub fn determine_unit_and_value(raw: &str) -> Option<(UnitKind, Value)> {
    INFERENCE_ORDER.into_iter().find_map(|unit| {
        unit.parse(raw)
            .ok()
            .filter(Value::is_truthy)
            .map(|value| (unit, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_parses_strictly() {
        assert_eq!(UnitKind::Int.parse("42"), Ok(Value::Int(42)));
        assert_eq!(UnitKind::Int.parse("-7"), Ok(Value::Int(-7)));
        assert_eq!(UnitKind::Int.parse(" 12 "), Ok(Value::Int(12)));
        for bad in ["4.2", "abc", "", "   ", "4h"] {
            assert_eq!(
                UnitKind::Int.parse(bad),
                Err(ParsingError::InvalidInt(bad.to_string())),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn float_parses_decimals_exactly() {
        assert_eq!(
            UnitKind::Float.parse("0.1"),
            Ok(Value::Decimal(Decimal::new(1, 1)))
        );
        assert_eq!(
            UnitKind::Float.parse("-2.50"),
            Ok(Value::Decimal(Decimal::new(-250, 2)))
        );
        assert_eq!(
            UnitKind::Float.parse(".5"),
            Ok(Value::Decimal(Decimal::new(5, 1)))
        );
        assert_eq!(
            UnitKind::Float.parse("1e3"),
            Ok(Value::Decimal(Decimal::from(1000)))
        );
        assert_eq!(UnitKind::Float.parse("7"), Ok(Value::Decimal(Decimal::from(7))));
        assert!(matches!(
            UnitKind::Float.parse("1.2.3"),
            Err(ParsingError::InvalidFloat(_))
        ));
        assert!(matches!(
            UnitKind::Float.parse(""),
            Err(ParsingError::InvalidFloat(_))
        ));
    }

    #[test]
    fn duration_parse_and_absence() {
        assert_eq!(
            UnitKind::Duration.parse("1h 30m"),
            Ok(Value::Duration(Decimal::from(5400)))
        );
        assert_eq!(UnitKind::Duration.parse_optional(None), Ok(None));
        assert_eq!(
            UnitKind::Duration.parse_optional(Some("")),
            Ok(Some(Value::Duration(Decimal::ZERO)))
        );
    }

    #[test]
    fn duration_parse_is_idempotent() {
        for raw in ["1h 30m", "01:30:15", "2.5 days", "45 s", "", "h 4"] {
            let once = UnitKind::Duration.parse(raw).unwrap();
            let twice = UnitKind::Duration.parse(&once.to_string()).unwrap();
            assert_eq!(twice, once, "{raw:?}");
            assert_eq!(UnitKind::Duration.coerce(once.clone()), Ok(once));
        }
    }

    #[test]
    fn duration_coerce_widens_numbers() {
        assert_eq!(
            UnitKind::Duration.coerce(Value::Int(90)),
            Ok(Value::Duration(Decimal::from(90)))
        );
        assert_eq!(
            UnitKind::Duration.coerce(Value::Decimal(Decimal::new(15, 1))),
            Ok(Value::Duration(Decimal::new(15, 1)))
        );
        assert_eq!(
            UnitKind::Duration.coerce(Value::from("2h")),
            Ok(Value::Duration(Decimal::from(7200)))
        );
    }

    #[test]
    fn coerce_rejects_lossy_conversions() {
        assert!(matches!(
            UnitKind::Int.coerce(Value::Decimal(Decimal::new(15, 1))),
            Err(ParsingError::Unsupported { unit: "Int", .. })
        ));
        assert!(matches!(
            UnitKind::Int.coerce(Value::Duration(Decimal::from(60))),
            Err(ParsingError::Unsupported { .. })
        ));
        assert_eq!(
            UnitKind::Int.coerce(Value::Decimal(Decimal::from(3))),
            Ok(Value::Int(3))
        );
        assert_eq!(UnitKind::String.coerce(Value::Int(3)), Ok(Value::from("3")));
    }

    #[test]
    fn duration_coerce_rejects_negative_seconds() {
        for value in [
            Value::Int(-5),
            Value::Decimal(Decimal::new(-15, 1)),
            Value::Duration(Decimal::from(-60)),
        ] {
            assert!(
                matches!(
                    UnitKind::Duration.coerce(value.clone()),
                    Err(ParsingError::Unsupported { unit: "Duration", .. })
                ),
                "{value:?}"
            );
        }
        assert_eq!(
            UnitKind::Duration.coerce(Value::Int(0)),
            Ok(Value::Duration(Decimal::ZERO))
        );
    }

    #[test]
    fn int_out_of_range_is_distinct_from_malformed() {
        for big in ["9223372036854775808", "-9223372036854775809"] {
            assert_eq!(
                UnitKind::Int.parse(big),
                Err(ParsingError::IntOutOfRange(big.to_string()))
            );
        }
        assert_eq!(
            UnitKind::Int.parse("9223372036854775807"),
            Ok(Value::Int(i64::MAX))
        );
    }

    #[test]
    fn enum_checks_membership() {
        let allowed = [Value::from("rust"), Value::from("python")];
        assert_eq!(
            UnitKind::Enum.parse_in("rust", Some(&allowed)),
            Ok(Value::from("rust"))
        );
        assert_eq!(
            UnitKind::Enum.parse_in("cobol", Some(&allowed)),
            Err(ParsingError::NotAllowed {
                value: "cobol".to_string(),
                allowed: "rust, python".to_string(),
            })
        );
        assert_eq!(
            UnitKind::String.parse_in("cobol", Some(&allowed)),
            Ok(Value::from("cobol"))
        );
    }

    #[test]
    fn render_follows_unit_and_locale() {
        let en = Locale::EN;
        assert_eq!(UnitKind::Int.render(&Value::Int(1_234_567), &en), "1,234,567");
        assert_eq!(
            UnitKind::Float.render(&Value::Decimal(Decimal::new(123_450, 2)), &Locale::CONTINENTAL),
            "1.234,50"
        );
        assert_eq!(
            UnitKind::Duration.render(&Value::Duration(Decimal::from(5400)), &en),
            "1:30:00"
        );
        assert_eq!(UnitKind::Duration.render(&Value::Int(60), &en), "0:01:00");
        assert_eq!(UnitKind::String.render(&Value::from("notes"), &en), "notes");
    }

    #[test]
    fn display_name_roundtrips_through_from_str() {
        for unit in UnitKind::ALL {
            let parsed: UnitKind = unit.display_name().parse().expect("should parse");
            assert_eq!(parsed, unit);
        }
        assert_eq!("duration".parse::<UnitKind>(), Ok(UnitKind::Duration));
        assert_eq!(
            "Minutes".parse::<UnitKind>(),
            Err(ConfigError::UnknownUnit("Minutes".to_string()))
        );
    }

    #[test]
    fn natural_zero_is_accepted_by_its_unit() {
        for unit in UnitKind::ALL {
            assert!(unit.accepts(&unit.natural_zero()), "{unit}");
            assert!(!unit.natural_zero().is_truthy(), "{unit}");
        }
    }

    #[test]
    fn inference_prefers_duration_then_int_then_float() {
        assert_eq!(
            determine_unit_and_value("3h"),
            Some((UnitKind::Duration, Value::Duration(Decimal::from(10_800))))
        );
        assert_eq!(
            determine_unit_and_value("42"),
            Some((UnitKind::Int, Value::Int(42)))
        );
        assert_eq!(
            determine_unit_and_value("2.5"),
            Some((UnitKind::Float, Value::Decimal(Decimal::new(25, 1))))
        );
        assert_eq!(
            determine_unit_and_value("1:15"),
            Some((UnitKind::Duration, Value::Duration(Decimal::from(4500))))
        );
    }

    #[test]
    fn inference_gives_up_on_zero_and_garbage() {
        assert_eq!(determine_unit_and_value("abc"), None);
        assert_eq!(determine_unit_and_value("0"), None);
        assert_eq!(determine_unit_and_value(""), None);
        assert_eq!(determine_unit_and_value("5 weeks"), None);
    }
}
