use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a property earns its revenue.
///
/// Long-term rentals are read from a flat monthly rent; short-term rentals
/// are derived from a nightly rate and an occupancy percentage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RentalMode {
    #[default]
    Ltr,
    Str,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown rental mode '{0}', expected 'ltr' or 'str'")]
pub struct RentalModeParseError(pub String);

impl RentalMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Str => "str",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ltr" => Some(Self::Ltr),
            "str" => Some(Self::Str),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Ltr => "Long-term rental",
            Self::Str => "Short-term rental",
        }
    }
}

impl FromStr for RentalMode {
    type Err = RentalModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Self::parse(&code).ok_or_else(|| RentalModeParseError(s.to_string()))
    }
}

impl fmt::Display for RentalMode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_accepts_storage_codes() {
        assert_eq!(RentalMode::parse("ltr"), Some(RentalMode::Ltr));
        assert_eq!(RentalMode::parse("str"), Some(RentalMode::Str));
        assert_eq!(RentalMode::parse("LTR"), None);
    }

    #[test]
    fn from_str_is_case_insensitive() {
        assert_eq!("STR".parse::<RentalMode>(), Ok(RentalMode::Str));
        assert_eq!(" ltr ".parse::<RentalMode>(), Ok(RentalMode::Ltr));
    }

    #[test]
    fn from_str_names_the_bad_code() {
        let err = "airbnb".parse::<RentalMode>().unwrap_err();

        assert_eq!(err, RentalModeParseError("airbnb".to_string()));
        assert!(err.to_string().contains("airbnb"));
    }

    #[test]
    fn default_is_long_term() {
        assert_eq!(RentalMode::default(), RentalMode::Ltr);
    }

    #[test]
    fn display_round_trips_through_parse() {
        for mode in [RentalMode::Ltr, RentalMode::Str] {
            assert_eq!(RentalMode::parse(&mode.to_string()), Some(mode));
        }
    }
}
