//! Duration parsing and rendering.
//!
//! A duration is a non-negative decimal number of seconds. Input is accepted
//! in two shapes, tried in order:
//!
//! 1. Clock format: `H:MM`, `HH:MM`, `H:MM:SS` or `HH:MM:SS` (24-hour).
//! 2. Compound unit expressions: any number of `<number><unit>` or
//!    `<unit><number>` fragments, e.g. `1h 30m`, `3 days, 2 hours`, `mins 10`.
//!    The fragments are summed. Text without any fragment is zero seconds.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::ParsingError;

const SECONDS_PER_DAY: u64 = 86_400;
const SECONDS_PER_HOUR: u64 = 3_600;
const SECONDS_PER_MINUTE: u64 = 60;

/// Unit words and the number of seconds each stands for.
///
/// Matching is case-sensitive: `M` is not a minute.
const UNIT_WORDS: [(&[&str], i64); 4] = [
    (&["days", "day", "d"], 86_400),
    (&["hours", "hour", "hrs", "hr", "h"], 3_600),
    (&["minutes", "minute", "mins", "min", "m"], 60),
    (&["seconds", "second", "secs", "sec", "s"], 1),
];

static CLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,2}):([0-9]{1,2})(?::([0-9]{1,2}))?$").unwrap()
});

/// One `<unit><number>` or `<number><unit>` fragment.
static FRAGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:(?P<unit>[A-Za-z]+)\s*(?P<num>[0-9]+\.?[0-9]*))|(?:(?P<num_alt>[0-9]+\.?[0-9]*)\s*(?P<unit_alt>[A-Za-z]+))",
    )
    .unwrap()
});

/// Parses a duration expression into seconds.
pub fn parse_duration(s: &str) -> Result<Decimal, ParsingError> {
    if let Some(seconds) = parse_clock(s) {
        return Ok(Decimal::from(seconds));
    }

    let mut total = Decimal::ZERO;
    for caps in FRAGMENT_RE.captures_iter(s) {
        let fragment = &caps[0];
        let (num, unit) = match (caps.name("num"), caps.name("unit")) {
            (Some(num), Some(unit)) => (num.as_str(), unit.as_str()),
            _ => (&caps["num_alt"], &caps["unit_alt"]),
        };

        let multiplier = unit_multiplier(unit)
            .ok_or_else(|| ParsingError::UnknownDurationUnit(fragment.to_string()))?;
        let amount = Decimal::from_str(num.trim_end_matches('.'))
            .map_err(|_| ParsingError::DurationOverflow(fragment.to_string()))?;

        total = amount
            .checked_mul(Decimal::from(multiplier))
            .and_then(|seconds| total.checked_add(seconds))
            .ok_or_else(|| ParsingError::DurationOverflow(fragment.to_string()))?;
    }

    Ok(total.normalize())
}

/// Seconds for a clock-format string, or `None` if it is not one.
fn parse_clock(s: &str) -> Option<u32> {
    let caps = CLOCK_RE.captures(s.trim())?;
    let hours: u32 = caps[1].parse().ok()?;
    let minutes: u32 = caps[2].parse().ok()?;
    let seconds: u32 = match caps.get(3) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };

    if hours >= 24 || minutes >= 60 || seconds >= 60 {
        return None;
    }
    Some(hours * 3600 + minutes * 60 + seconds)
}

fn unit_multiplier(word: &str) -> Option<i64> {
    UNIT_WORDS
        .iter()
        .find(|(words, _)| words.contains(&word))
        .map(|(_, multiplier)| *multiplier)
}

/// Renders seconds as `H:MM:SS`, prefixed with a day count when needed:
/// `1:30:00`, `2 days, 0:00:05`, `0:00:01.500000`.
pub fn format_duration(seconds: Decimal) -> String {
    let negative = seconds.is_sign_negative() && !seconds.is_zero();
    let seconds = seconds.abs();

    let mut whole = seconds.trunc().to_u64().unwrap_or(u64::MAX);
    let mut micros = (seconds.fract() * Decimal::from(1_000_000))
        .round()
        .to_u32()
        .unwrap_or(0);
    if micros >= 1_000_000 {
        whole = whole.saturating_add(1);
        micros -= 1_000_000;
    }

    let days = whole / SECONDS_PER_DAY;
    let hours = (whole % SECONDS_PER_DAY) / SECONDS_PER_HOUR;
    let minutes = (whole % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let secs = whole % SECONDS_PER_MINUTE;

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    if days > 0 {
        let plural = if days == 1 { "" } else { "s" };
        out.push_str(&format!("{days} day{plural}, "));
    }
    out.push_str(&format!("{hours}:{minutes:02}:{secs:02}"));
    if micros > 0 {
        out.push_str(&format!(".{micros:06}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: &str) -> Decimal {
        parse_duration(s).unwrap()
    }

    #[test]
    fn clock_format_with_seconds() {
        assert_eq!(secs("01:30:15"), Decimal::from(5415));
        assert_eq!(secs("23:59:59"), Decimal::from(86_399));
        assert_eq!(secs("0:00:00"), Decimal::ZERO);
    }

    #[test]
    fn clock_format_without_seconds() {
        assert_eq!(secs("1:30"), Decimal::from(5400));
        assert_eq!(secs("09:05"), Decimal::from(32_700));
    }

    #[test]
    fn clock_grid_matches_arithmetic() {
        for h in [0_u32, 1, 9, 12, 23] {
            for m in [0_u32, 7, 30, 59] {
                for s in [0_u32, 1, 45, 59] {
                    let expected = Decimal::from(h * 3600 + m * 60 + s);
                    assert_eq!(secs(&format!("{h:02}:{m:02}:{s:02}")), expected);
                    assert_eq!(secs(&format!("{h}:{m}:{s}")), expected);
                }
                assert_eq!(secs(&format!("{h}:{m:02}")), Decimal::from(h * 3600 + m * 60));
            }
        }
    }

    #[test]
    fn out_of_range_clock_is_not_a_clock() {
        // No unit words, so the compound scan finds nothing either.
        assert_eq!(secs("25:00"), Decimal::ZERO);
        assert_eq!(secs("10:75"), Decimal::ZERO);
    }

    #[test]
    fn single_fragments() {
        assert_eq!(secs("4h"), Decimal::from(14_400));
        assert_eq!(secs("h 4"), Decimal::from(14_400));
        assert_eq!(secs("30 mins"), Decimal::from(1_800));
        assert_eq!(secs("2 days"), Decimal::from(172_800));
        assert_eq!(secs("45s"), Decimal::from(45));
        assert_eq!(secs("mins 10"), Decimal::from(600));
    }

    #[test]
    fn fractional_numbers() {
        assert_eq!(secs("1.5h"), Decimal::from(5400));
        assert_eq!(secs("0.5 sec"), Decimal::new(5, 1));
        assert_eq!(secs("2. hours"), Decimal::from(7200));
    }

    #[test]
    fn compound_expressions_accumulate() {
        assert_eq!(secs("1h 30m"), Decimal::from(5400));
        assert_eq!(secs("1h30m"), Decimal::from(5400));
        assert_eq!(secs("3 days, 2 hours, 10 mins"), Decimal::from(267_000));
        assert_eq!(secs("1 day 1 hour 1 minute 1 second"), Decimal::from(90_061));
    }

    #[test]
    fn every_synonym_resolves() {
        for (words, multiplier) in UNIT_WORDS {
            for word in words {
                assert_eq!(secs(&format!("2 {word}")), Decimal::from(2 * multiplier), "{word}");
                assert_eq!(secs(&format!("{word} 3")), Decimal::from(3 * multiplier), "{word}");
            }
        }
    }

    #[test]
    fn unknown_unit_word_names_fragment() {
        assert_eq!(
            parse_duration("3 weeks"),
            Err(ParsingError::UnknownDurationUnit("3 weeks".to_string()))
        );
        assert_eq!(
            parse_duration("1h 20 parsecs"),
            Err(ParsingError::UnknownDurationUnit("20 parsecs".to_string()))
        );
    }

    #[test]
    fn unit_words_are_case_sensitive() {
        assert_eq!(
            parse_duration("4H"),
            Err(ParsingError::UnknownDurationUnit("4H".to_string()))
        );
    }

    #[test]
    fn no_fragments_is_zero() {
        assert_eq!(secs(""), Decimal::ZERO);
        assert_eq!(secs("   "), Decimal::ZERO);
        assert_eq!(secs("42"), Decimal::ZERO);
        assert_eq!(secs("abc"), Decimal::ZERO);
    }

    #[test]
    fn huge_amounts_overflow() {
        let err = parse_duration("99999999999999999999999999 days").unwrap_err();
        assert!(matches!(err, ParsingError::DurationOverflow(_)));
    }

    #[test]
    fn format_duration_breakdown() {
        assert_eq!(format_duration(Decimal::ZERO), "0:00:00");
        assert_eq!(format_duration(Decimal::from(5400)), "1:30:00");
        assert_eq!(format_duration(Decimal::from(86_400)), "1 day, 0:00:00");
        assert_eq!(format_duration(Decimal::from(266_405)), "3 days, 2:00:05");
        assert_eq!(format_duration(Decimal::new(15, 1)), "0:00:01.500000");
    }

    #[test]
    fn rendered_clock_parses_back() {
        for value in [0_i64, 59, 3_600, 5_415, 86_399] {
            let rendered = format_duration(Decimal::from(value));
            assert_eq!(secs(&rendered), Decimal::from(value), "{rendered}");
        }
    }
}
