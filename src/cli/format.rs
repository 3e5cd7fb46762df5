//! Locale-aware rendering of amounts and dates for the shell.

use chrono::NaiveDate;
use register_config::Config;

/// Decimal and grouping separators of a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberStyle {
    pub decimal: char,
    pub grouping: char,
}

impl NumberStyle {
    pub fn for_locale(locale: &str) -> Self {
        let tag = locale.trim().to_ascii_lowercase().replace('_', "-");
        let (decimal, grouping) = match tag.as_str() {
            "de-ch" | "fr-ch" | "it-ch" => ('.', '\''),
            _ if tag.starts_with("de") || tag.starts_with("nl") => (',', '.'),
            _ if ["fr", "es", "it", "pt"]
                .iter()
                .any(|prefix| tag.starts_with(prefix)) =>
            {
                (',', ' ')
            }
            _ => ('.', ','),
        };
        Self { decimal, grouping }
    }

    /// Formats `value` with `precision` decimals and grouped thousands.
    pub fn format(&self, value: f64, precision: usize) -> String {
        let fixed = format!("{:.*}", precision, value.abs());
        let (integer, fraction) = match fixed.split_once('.') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (fixed.as_str(), None),
        };

        let mut grouped = String::new();
        for (idx, digit) in integer.chars().enumerate() {
            if idx > 0 && (integer.len() - idx) % 3 == 0 {
                grouped.push(self.grouping);
            }
            grouped.push(digit);
        }
        if let Some(fraction) = fraction {
            grouped.push(self.decimal);
            grouped.push_str(fraction);
        }

        let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
        if value.is_sign_negative() && !is_zero {
            format!("-{grouped}")
        } else {
            grouped
        }
    }
}

/// Renders amounts the way the active configuration asks for.
#[derive(Debug, Clone)]
pub struct AmountFormatter {
    style: NumberStyle,
    precision: usize,
    currency: String,
}

impl AmountFormatter {
    pub fn from_config(config: &Config) -> Self {
        Self {
            style: NumberStyle::for_locale(&config.locale),
            precision: config.precision(),
            currency: config.currency.clone(),
        }
    }

    /// Amount without currency, used in table cells.
    pub fn number(&self, value: f64) -> String {
        self.style.format(value, self.precision)
    }

    pub fn money(&self, value: f64) -> String {
        format!("{} {}", self.number(value), self.currency)
    }

    pub fn percent(&self, value: f64) -> String {
        format!("{} %", self.style.format(value, 2))
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
