//! Application settings model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::TemplateId;

/// Interface language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "fr-ca")]
    CanadianFrench,
}

impl Language {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::CanadianFrench => "fr-ca",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::English),
            "fr-ca" => Ok(Self::CanadianFrench),
            other => Err(format!("unsupported language '{other}' (expected en or fr-ca)")),
        }
    }
}

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Venue name offered when a template uses `{venue}`
    #[serde(default)]
    pub default_venue: String,
    /// Payee offered when a template uses `{pay_to}`
    #[serde(default)]
    pub default_pay_to: String,
    #[serde(default)]
    pub language: Language,
    /// Template most recently rendered
    #[serde(default)]
    pub last_template_id: Option<TemplateId>,
}

impl Settings {
    /// Token values pre-filled from settings before user input is applied
    #[must_use]
    pub fn default_token_values(&self) -> Vec<(&'static str, String)> {
        let mut values = Vec::new();
        if !self.default_venue.trim().is_empty() {
            values.push(("venue", self.default_venue.clone()));
        }
        if !self.default_pay_to.trim().is_empty() {
            values.push(("pay_to", self.default_pay_to.clone()));
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.language, Language::English);
        assert!(settings.default_venue.is_empty());
        assert!(settings.last_template_id.is_none());
    }

    #[test]
    fn test_language_serde_names() {
        assert_eq!(
            serde_json::to_string(&Language::CanadianFrench).unwrap(),
            "\"fr-ca\""
        );
        assert_eq!("FR-CA".parse::<Language>(), Ok(Language::CanadianFrench));
        assert!("de".parse::<Language>().is_err());
    }

    #[test]
    fn test_default_token_values_skip_blank() {
        let settings = Settings {
            default_venue: "Moonlit Lounge".to_string(),
            default_pay_to: "  ".to_string(),
            ..Settings::default()
        };
        assert_eq!(
            settings.default_token_values(),
            vec![("venue", "Moonlit Lounge".to_string())]
        );
    }
}
