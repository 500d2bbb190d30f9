//! Supported locales.

use serde::{Deserialize, Serialize};
use std::fmt;
use unic_langid::LanguageIdentifier;
use vgsales_common::{Result, SalesError};

/// A locale with embedded translations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    /// English (United States)
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    /// Portuguese (Brazil)
    #[serde(rename = "pt-BR")]
    PtBr,
}

impl Locale {
    /// Every supported locale.
    pub const ALL: [Self; 2] = [Self::EnUs, Self::PtBr];

    /// BCP 47 code of the locale.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::PtBr => "pt-BR",
        }
    }

    /// Resolves a language code such as `pt-BR`, `pt` or `en_GB` to a
    /// supported locale by its language subtag.
    ///
    /// # Errors
    ///
    /// Fails when the code is malformed or names an unsupported language.
    pub fn from_code(code: &str) -> Result<Self> {
        let langid: LanguageIdentifier = code.trim().replace('_', "-").parse().map_err(|_| {
            SalesError::localization_with_locale("Malformed language code", code)
        })?;

        match langid.language.as_str() {
            "en" => Ok(Self::EnUs),
            "pt" => Ok(Self::PtBr),
            _ => Err(SalesError::localization_with_locale(
                "Unsupported language",
                code,
            )),
        }
    }

    /// Language identifier handed to Fluent.
    #[must_use]
    pub fn language_identifier(self) -> LanguageIdentifier {
        // Both codes are static and well-formed.
        self.code()
            .parse()
            .unwrap_or_else(|_| LanguageIdentifier::default())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
