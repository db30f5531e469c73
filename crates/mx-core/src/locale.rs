//! Locale-aware number formatting.
//!
//! A [`Locale`] is an explicit value handed to rendering functions. It is
//! resolved once at startup (usually from `LANG`) and never mutated.

use rust_decimal::Decimal;

/// Digit grouping and decimal separators for numeric rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locale {
    thousands_sep: &'static str,
    decimal_point: &'static str,
}

impl Default for Locale {
    fn default() -> Self {
        Self::POSIX
    }
}

impl Locale {
    /// The `C`/`POSIX` locale: no grouping, `.` decimal point.
    pub const POSIX: Self = Self {
        thousands_sep: "",
        decimal_point: ".",
    };

    /// English-style `1,234.5`.
    pub const EN: Self = Self {
        thousands_sep: ",",
        decimal_point: ".",
    };

    /// Continental style `1.234,5`.
    pub const CONTINENTAL: Self = Self {
        thousands_sep: ".",
        decimal_point: ",",
    };

    /// Narrow no-break space grouping, `1 234,5`.
    pub const SPACED: Self = Self {
        thousands_sep: "\u{202f}",
        decimal_point: ",",
    };

    /// Swiss German `1'234.5`.
    pub const SWISS: Self = Self {
        thousands_sep: "'",
        decimal_point: ".",
    };

    /// Resolves a POSIX locale tag such as `de_DE.UTF-8` or `en-US`.
    ///
    /// Unknown languages fall back to [`Locale::POSIX`].
    pub fn from_tag(tag: &str) -> Self {
        let base = tag.split(['.', '@']).next().unwrap_or_default();
        let mut parts = base.split(['_', '-']);
        let language = parts.next().unwrap_or_default().to_ascii_lowercase();
        let region = parts.next().unwrap_or_default().to_ascii_uppercase();

        match (language.as_str(), region.as_str()) {
            ("de", "CH") => Self::SWISS,
            ("en" | "ja" | "zh" | "ko" | "he" | "th", _) => Self::EN,
            ("de" | "it" | "nl" | "es" | "pt" | "da" | "id" | "tr" | "el", _) => Self::CONTINENTAL,
            ("fr" | "ru" | "pl" | "cs" | "sk" | "sv" | "nb" | "no" | "fi" | "uk" | "hu", _) => {
                Self::SPACED
            }
            _ => Self::POSIX,
        }
    }

    pub const fn thousands_sep(&self) -> &'static str {
        self.thousands_sep
    }

    pub const fn decimal_point(&self) -> &'static str {
        self.decimal_point
    }

    /// Formats an integer with digit grouping.
    pub fn format_int(&self, n: i64) -> String {
        let digits = n.unsigned_abs().to_string();
        let grouped = self.group(&digits);
        if n < 0 { format!("-{grouped}") } else { grouped }
    }

    /// Formats a decimal with digit grouping, keeping its fractional digits.
    pub fn format_decimal(&self, d: Decimal) -> String {
        let text = d.abs().to_string();
        let (int_part, frac_part) = match text.split_once('.') {
            Some((int_part, frac_part)) => (int_part, Some(frac_part)),
            None => (text.as_str(), None),
        };

        let mut out = String::new();
        if d.is_sign_negative() && !d.is_zero() {
            out.push('-');
        }
        out.push_str(&self.group(int_part));
        if let Some(frac) = frac_part {
            out.push_str(self.decimal_point);
            out.push_str(frac);
        }
        out
    }

    fn group(&self, digits: &str) -> String {
        if self.thousands_sep.is_empty() || digits.len() <= 3 {
            return digits.to_string();
        }
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push_str(self.thousands_sep);
            }
            out.push(ch);
        }
        out
    }
}
