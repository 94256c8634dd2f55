//! Money and date formatting shared by the shell and exported reports.

use chrono::{Datelike, NaiveDate};

use crate::config::Config;

/// Separators derived from a BCP 47 language tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
}

impl LocaleConfig {
    pub fn from_tag(tag: &str) -> Self {
        let language = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let (decimal_separator, grouping_separator) = match language.as_str() {
            "de" | "es" | "it" | "nl" | "pt" | "tr" | "id" => (',', '.'),
            "fr" | "sv" | "nb" | "fi" | "pl" | "cs" | "ru" => (',', ' '),
            _ => ('.', ','),
        };
        Self {
            language_tag: tag.to_string(),
            decimal_separator,
            grouping_separator,
        }
    }
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self::from_tag("en-US")
    }
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "AUD" => "A$".into(),
        "CAD" => "C$".into(),
        _ => code.into(),
    }
}

pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "JPY" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

pub fn format_number(locale: &LocaleConfig, value: f64, precision: u8) -> String {
    let body = format!("{:.*}", precision as usize, value.abs());
    let (int_part, frac_part) = match body.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (body.as_str(), None),
    };
    let mut out = String::new();
    if value < 0.0 && body.chars().any(|ch| ch != '0' && ch != '.') {
        out.push('-');
    }
    out.push_str(&group_digits(int_part, locale.grouping_separator));
    if let Some(frac) = frac_part {
        out.push(locale.decimal_separator);
        out.push_str(frac);
    }
    out
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx != 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats amounts in one currency and locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountFormatter {
    pub currency: String,
    pub locale: LocaleConfig,
}

impl AmountFormatter {
    pub fn new(currency: impl Into<String>, locale: LocaleConfig) -> Self {
        Self {
            currency: currency.into().to_ascii_uppercase(),
            locale,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.currency.clone(), LocaleConfig::from_tag(&config.locale))
    }

    /// `-$1,234.50` style; the sign precedes the symbol.
    pub fn format(&self, amount: f64) -> String {
        let precision = minor_units_for(&self.currency);
        let body = format_number(&self.locale, amount.abs(), precision);
        let sign = if amount < 0.0 && body.chars().any(|ch| ch.is_ascii_digit() && ch != '0') {
            "-"
        } else {
            ""
        };
        format!("{sign}{}{body}", symbol_for(&self.currency))
    }

    /// Like [`format`](Self::format) but always shows a sign.
    pub fn format_signed(&self, amount: f64) -> String {
        if amount > 0.0 {
            format!("+{}", self.format(amount))
        } else {
            self.format(amount)
        }
    }
}

impl Default for AmountFormatter {
    fn default() -> Self {
        Self::new("USD", LocaleConfig::default())
    }
}

/// `Mar 10, 2023`.
pub fn format_date(date: NaiveDate) -> String {
    format!("{} {}, {}", month_label(date.month()), date.day(), date.year())
}

fn month_label(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "",
    }
}
