//! Locale tags used to localize state and command names

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Language subtag followed by optional script/region/variant subtags
static LOCALE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]{2,3}(-[A-Za-z0-9]{2,8})*$").unwrap());

/// Fallback when neither configuration nor environment name a locale
pub const FALLBACK_LOCALE: &str = "en-US";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Culture '{0}' is not a valid locale tag")]
pub struct LocaleError(pub String);

/// Validated locale tag such as `en`, `en-US` or `zh-Hant-TW`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale(String);

impl Locale {
    pub fn new(tag: &str) -> Result<Self, LocaleError> {
        let normalized = tag.trim().replace('_', "-");

        if !LOCALE_PATTERN.is_match(&normalized) {
            return Err(LocaleError(tag.to_string()));
        }

        let mut parts = normalized.split('-');
        let language = parts.next().unwrap_or_default().to_ascii_lowercase();
        let rest = parts.map(|part| match part.len() {
            2 => part.to_ascii_uppercase(),
            4 => {
                let mut script = part.to_ascii_lowercase();
                script[..1].make_ascii_uppercase();
                script
            }
            _ => part.to_string(),
        });

        Ok(Self(
            std::iter::once(language)
                .chain(rest)
                .collect::<Vec<_>>()
                .join("-"),
        ))
    }

    /// Locale of the running process, taken from the POSIX locale variables
    pub fn from_environment() -> Option<Self> {
        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find_map(|value| Self::from_posix(&value))
    }

    /// Parse values like `de_DE.UTF-8` or `fr_FR@euro`
    fn from_posix(value: &str) -> Option<Self> {
        let tag = value.split(['.', '@']).next()?;

        if tag.is_empty() || tag == "C" || tag == "POSIX" {
            return None;
        }

        Self::new(tag).ok()
    }

    /// Language subtag, e.g. `en` for `en-US`
    pub fn language(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self(FALLBACK_LOCALE.to_string())
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = LocaleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_tags_are_normalized() {
        assert_eq!(Locale::new("en").unwrap().as_str(), "en");
        assert_eq!(Locale::new("en-us").unwrap().as_str(), "en-US");
        assert_eq!(Locale::new("pt_BR").unwrap().as_str(), "pt-BR");
        assert_eq!(Locale::new("zh-hant-tw").unwrap().as_str(), "zh-Hant-TW");
    }

    #[test]
    fn test_invalid_tags() {
        for tag in ["", "e", "english-language-tag!", "en--US", "12-34"] {
            assert!(Locale::new(tag).is_err(), "tag {:?} should be rejected", tag);
        }
        assert_eq!(
            Locale::new("xx!").unwrap_err().to_string(),
            "Culture 'xx!' is not a valid locale tag"
        );
    }

    #[test]
    fn test_from_posix() {
        assert_eq!(
            Locale::from_posix("de_DE.UTF-8").map(|l| l.to_string()),
            Some("de-DE".to_string())
        );
        assert_eq!(
            Locale::from_posix("fr_FR@euro").map(|l| l.to_string()),
            Some("fr-FR".to_string())
        );
        assert!(Locale::from_posix("C.UTF-8").is_none());
        assert!(Locale::from_posix("POSIX").is_none());
    }

    #[test]
    fn test_language() {
        assert_eq!(Locale::new("es-MX").unwrap().language(), "es");
    }
}
