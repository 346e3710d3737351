//! Answer languages and the user-facing strings that depend on them.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Languages the backend can answer in. French is the default.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum Language {
    /// French.
    #[default]
    Fr,

    /// Wolof.
    Wo,

    /// English.
    En,
}

impl Language {
    /// The wire tag for this language.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::Wo => "wo",
            Language::En => "en",
        }
    }

    /// Message shown when the backend cannot be reached.
    pub fn connection_error(&self) -> &'static str {
        match self {
            Language::Fr => "Erreur de connexion. Vérifiez que le backend fonctionne.",
            Language::Wo => "Njumte ci connexion. Saytul backend bi.",
            Language::En => "Connection error. Make sure the backend is running.",
        }
    }

    /// Message shown when a photo diagnosis fails.
    pub fn analyzing_error(&self) -> &'static str {
        match self {
            Language::Fr => "Erreur lors de l'analyse de l'image. Réessayez.",
            Language::Wo => "Njumte ci xool nataal bi. Jeem-aat.",
            Language::En => "Error analyzing the image. Please try again.",
        }
    }

    /// Transcript text standing in for an uploaded crop photo.
    pub fn diagnose_prompt(&self) -> &'static str {
        match self {
            Language::Fr => "Diagnostique cette photo de culture",
            Language::Wo => "Xool bi te wax ma lan la",
            Language::En => "Diagnose this crop photo",
        }
    }

    /// Shown when the session history is empty.
    pub fn no_history(&self) -> &'static str {
        match self {
            Language::Fr => "Aucune conversation sauvegardée.",
            Language::Wo => "Amul waxtaan bu denc.",
            Language::En => "No saved conversations yet.",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fr" => Ok(Language::Fr),
            "wo" => Ok(Language::Wo),
            "en" => Ok(Language::En),
            _ => Err(Error::validation(
                format!("unknown language '{s}', expected fr, wo, or en"),
                Some("language".to_string()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_wire_tags() {
        for language in [Language::Fr, Language::Wo, Language::En] {
            assert_eq!(language.as_str().parse::<Language>().unwrap(), language);
        }
    }

    #[test]
    fn rejects_unknown_tag() {
        assert!("de".parse::<Language>().is_err());
    }

    #[test]
    fn defaults_to_french() {
        assert_eq!(Language::default(), Language::Fr);
    }
}
