//! Localized message lookup.

use crate::loader::build_bundle;
use crate::locale::Locale;
use fluent_bundle::{FluentArgs, FluentBundle, FluentResource, FluentValue};
use std::fmt;
use tracing::warn;
use vgsales_common::{Result, SalesError};

/// Message identifiers every locale must define.
pub const MESSAGE_KEYS: &[&str] = &[
    "dashboard-title",
    "dropped-rows-warning",
    "year-range-label",
    "year-range-disabled",
    "platform-select-label",
    "platform-all",
    "footer-coming-soon",
    "tab-heading",
    "region-north-america",
    "region-europe",
    "region-japan",
    "region-other",
    "region-global",
    "chart-platform-share-title",
    "chart-platform-totals-title",
    "chart-top-games-title",
    "chart-top-genres-title",
    "annotation-platform-totals",
    "annotation-platform-share",
    "others-label",
    "axis-total",
    "axis-platform",
    "hover-total",
    "hover-platform",
];

/// Formats dashboard strings for one locale, falling back to `en-US` for
/// messages the locale lacks.
pub struct Messages {
    locale: Locale,
    bundle: FluentBundle<FluentResource>,
    fallback: Option<FluentBundle<FluentResource>>,
}

impl fmt::Debug for Messages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Messages")
            .field("locale", &self.locale)
            .field("fallback", &self.fallback.is_some())
            .finish_non_exhaustive()
    }
}

impl Messages {
    /// Loads the messages of `locale`.
    ///
    /// # Errors
    ///
    /// Fails when an embedded resource is malformed.
    pub fn new(locale: Locale) -> Result<Self> {
        let bundle = build_bundle(locale)?;
        let fallback = match locale {
            Locale::EnUs => None,
            _ => Some(build_bundle(Locale::EnUs)?),
        };
        Ok(Self {
            locale,
            bundle,
            fallback,
        })
    }

    /// Loads messages for a configured language code. Unsupported codes
    /// fall back to `en-US` with a warning.
    ///
    /// # Errors
    ///
    /// Fails when an embedded resource is malformed.
    pub fn for_language(code: &str) -> Result<Self> {
        let locale = Locale::from_code(code).unwrap_or_else(|err| {
            warn!("{}; falling back to {}", err, Locale::EnUs);
            Locale::EnUs
        });
        Self::new(locale)
    }

    /// Locale in use.
    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    /// Whether `key` resolves in this locale or its fallback.
    #[must_use]
    pub fn has_message(&self, key: &str) -> bool {
        self.bundle.has_message(key)
            || self
                .fallback
                .as_ref()
                .is_some_and(|bundle| bundle.has_message(key))
    }

    /// Formats a message without arguments.
    ///
    /// # Errors
    ///
    /// Fails when the key is unknown in every bundle.
    pub fn get(&self, key: &str) -> Result<String> {
        self.format(key, None)
    }

    /// Formats a message with string arguments.
    ///
    /// # Errors
    ///
    /// Fails when the key is unknown or an argument is missing.
    pub fn get_with_args(&self, key: &str, args: &[(&str, String)]) -> Result<String> {
        let mut fluent_args = FluentArgs::new();
        for (name, value) in args {
            fluent_args.set(*name, FluentValue::from(value.as_str()));
        }
        self.format(key, Some(&fluent_args))
    }

    fn format(&self, key: &str, args: Option<&FluentArgs>) -> Result<String> {
        let bundle = if self.bundle.has_message(key) {
            &self.bundle
        } else {
            match &self.fallback {
                Some(fallback) if fallback.has_message(key) => {
                    warn!("Message '{}' missing in {}, using fallback", key, self.locale);
                    fallback
                }
                _ => {
                    return Err(SalesError::localization_with_locale(
                        format!("Unknown message '{key}'"),
                        self.locale.code(),
                    ))
                }
            }
        };

        let pattern = bundle
            .get_message(key)
            .and_then(|message| message.value())
            .ok_or_else(|| {
                SalesError::localization_with_locale(
                    format!("Message '{key}' has no value"),
                    self.locale.code(),
                )
            })?;

        let mut errors = Vec::new();
        let formatted = bundle.format_pattern(pattern, args, &mut errors);
        if !errors.is_empty() {
            return Err(SalesError::localization_with_locale(
                format!("Formatting '{key}' failed: {errors:?}"),
                self.locale.code(),
            ));
        }

        Ok(formatted.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_message() {
        let messages = Messages::new(Locale::EnUs).unwrap();
        assert_eq!(messages.get("dashboard-title").unwrap(), "Video Game Sales");
    }

    #[test]
    fn test_message_with_args() {
        let messages = Messages::new(Locale::PtBr).unwrap();
        let heading = messages
            .get_with_args("tab-heading", &[("region", "Japão".to_string())])
            .unwrap();
        assert_eq!(heading, "Vendas por Plataforma - Japão");
    }

    #[test]
    fn test_missing_argument_is_an_error() {
        let messages = Messages::new(Locale::EnUs).unwrap();
        assert!(messages.get("tab-heading").is_err());
    }

    #[test]
    fn test_unknown_key() {
        let messages = Messages::new(Locale::PtBr).unwrap();
        assert!(!messages.has_message("no-such-key"));
        let err = messages.get("no-such-key").unwrap_err();
        assert!(err.to_string().contains("Localization error"));
    }

    #[test]
    fn test_unsupported_language_falls_back() {
        let messages = Messages::for_language("de-DE").unwrap();
        assert_eq!(messages.locale(), Locale::EnUs);
    }
}
