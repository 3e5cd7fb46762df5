//! Argument helpers shared by the shell commands.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use register_domain::{AssetStatus, DepreciationMethod};

use crate::cli::core::CommandError;

/// `key=value` options collected from a command line. Keys are lowercase.
#[derive(Debug, Default)]
pub struct Options {
    values: BTreeMap<String, String>,
}

impl Options {
    /// Parses every argument as `key=value`.
    pub fn parse(args: &[&str]) -> Result<Self, CommandError> {
        let mut values = BTreeMap::new();
        for arg in args {
            let (key, value) = arg.split_once('=').ok_or_else(|| {
                CommandError::InvalidArguments(format!("expected key=value, got `{arg}`"))
            })?;
            let key = key.trim().to_ascii_lowercase();
            if key.is_empty() {
                return Err(CommandError::InvalidArguments(format!(
                    "missing option name in `{arg}`"
                )));
            }
            values.insert(key, value.trim().to_string());
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// First value present among `keys`, so aliases can share one option.
    pub fn any(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.get(key))
    }

    pub fn require(&self, keys: &[&str]) -> Result<&str, CommandError> {
        self.any(keys).ok_or_else(|| {
            CommandError::InvalidArguments(format!("missing option `{}=...`", keys[0]))
        })
    }

    /// Fails on options outside `allowed`.
    pub fn ensure_known(&self, allowed: &[&str]) -> Result<(), CommandError> {
        match self.values.keys().find(|key| !allowed.contains(&key.as_str())) {
            Some(key) => Err(CommandError::InvalidArguments(format!(
                "unknown option `{key}` (expected one of: {})",
                allowed.join(", ")
            ))),
            None => Ok(()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Splits positional arguments from `key=value` options.
pub fn split_options<'a>(args: &[&'a str]) -> (Vec<&'a str>, Vec<&'a str>) {
    args.iter().partition(|arg| !arg.contains('='))
}

/// Removes `flag` from `args`, reporting whether it was present.
pub fn take_flag<'a>(args: &[&'a str], flag: &str) -> (Vec<&'a str>, bool) {
    let rest: Vec<&str> = args
        .iter()
        .copied()
        .filter(|arg| !arg.eq_ignore_ascii_case(flag))
        .collect();
    let found = rest.len() != args.len();
    (rest, found)
}

/// Removes `flag` and the value following it. The value is optional: a
/// trailing flag yields `Some(None)`.
pub fn take_flag_value<'a>(args: &[&'a str], flag: &str) -> (Vec<&'a str>, Option<Option<&'a str>>) {
    let mut rest = Vec::with_capacity(args.len());
    let mut found = None;
    let mut iter = args.iter().copied().peekable();
    while let Some(arg) = iter.next() {
        if arg.eq_ignore_ascii_case(flag) {
            let value = iter.next_if(|next| !next.starts_with("--"));
            found = Some(value);
        } else {
            rest.push(arg);
        }
    }
    (rest, found)
}

pub fn parse_date(input: &str) -> Result<NaiveDate, CommandError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d/%m/%Y"))
        .map_err(|_| {
            CommandError::InvalidArguments(format!(
                "invalid date `{input}` (use YYYY-MM-DD or DD/MM/YYYY)"
            ))
        })
}

/// Parses an amount written with either `.` or `,` as decimal separator.
pub fn parse_amount(input: &str) -> Result<f64, CommandError> {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\'')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| CommandError::InvalidArguments(format!("invalid amount `{input}`")))
}

pub fn parse_years(input: &str) -> Result<u32, CommandError> {
    input.trim().parse::<u32>().map_err(|_| {
        CommandError::InvalidArguments(format!("invalid duration `{input}` (whole years)"))
    })
}

pub fn parse_method(input: &str) -> Result<DepreciationMethod, CommandError> {
    input
        .parse::<DepreciationMethod>()
        .map_err(|err| CommandError::InvalidArguments(err.to_string()))
}

pub fn parse_status(input: &str) -> Result<AssetStatus, CommandError> {
    match input.trim().to_ascii_lowercase().as_str() {
        "en cours" | "en-cours" | "active" | "in-service" | "in_service" => {
            Ok(AssetStatus::InService)
        }
        "amorti" | "depreciated" | "fully-depreciated" | "fully_depreciated" => {
            Ok(AssetStatus::FullyDepreciated)
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown status `{other}` (expected active or amorti)"
        ))),
    }
}

pub fn parse_year(input: &str) -> Result<i32, CommandError> {
    input
        .trim()
        .parse::<i32>()
        .ok()
        .filter(|year| (1900..=9999).contains(year))
        .ok_or_else(|| CommandError::InvalidArguments(format!("invalid year `{input}`")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_parse_and_report_unknown_keys() {
        let options = Options::parse(&["code=MOB", "Label=MOBILIER DE BUREAU", "years=10"]).unwrap();
        assert_eq!(options.get("label"), Some("MOBILIER DE BUREAU"));
        assert_eq!(options.any(&["duration", "years"]), Some("10"));
        assert!(options.ensure_known(&["code", "label", "years"]).is_ok());
        assert!(options.ensure_known(&["code"]).is_err());
        assert!(Options::parse(&["MOB"]).is_err());
        assert!(options.require(&["method"]).is_err());
    }

    #[test]
    fn flags_are_extracted() {
        let (rest, json) = take_flag(&["CHF02", "--json"], "--json");
        assert_eq!(rest, vec!["CHF02"]);
        assert!(json);

        let (rest, csv) = take_flag_value(&["2021", "--csv", "out.csv"], "--csv");
        assert_eq!(rest, vec!["2021"]);
        assert_eq!(csv, Some(Some("out.csv")));

        let (_, csv) = take_flag_value(&["2021", "--csv"], "--csv");
        assert_eq!(csv, Some(None));

        let (positional, options) = split_options(&["list", "family=MOB"]);
        assert_eq!(positional, vec!["list"]);
        assert_eq!(options, vec!["family=MOB"]);
    }

    #[test]
    fn values_parse_in_both_notations() {
        assert_eq!(
            parse_date("31/12/2018").unwrap(),
            NaiveDate::from_ymd_opt(2018, 12, 31).unwrap()
        );
        assert!(parse_date("2018-13-01").is_err());
        assert_eq!(parse_amount("1 786,70").unwrap(), 1786.7);
        assert!(parse_amount("NaN").is_err());
        assert_eq!(parse_method("degressif").unwrap(), DepreciationMethod::DecliningBalance);
        assert_eq!(parse_status("Amorti").unwrap(), AssetStatus::FullyDepreciated);
        assert!(parse_year("21").is_err());
    }
}
