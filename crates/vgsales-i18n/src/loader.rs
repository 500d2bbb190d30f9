//! Embedded Fluent resources and bundle construction.

use crate::locale::Locale;
use fluent_bundle::{FluentBundle, FluentResource};
use tracing::{debug, error};
use vgsales_common::{Result, SalesError};

const EN_US_DASHBOARD: &str = include_str!("../locales/en-US/dashboard.ftl");
const PT_BR_DASHBOARD: &str = include_str!("../locales/pt-BR/dashboard.ftl");

/// Raw FTL source embedded for `locale`.
#[must_use]
pub const fn resource_source(locale: Locale) -> &'static str {
    match locale {
        Locale::EnUs => EN_US_DASHBOARD,
        Locale::PtBr => PT_BR_DASHBOARD,
    }
}

/// Builds a bundle holding the embedded resource of `locale`.
///
/// # Errors
///
/// Fails when the resource does not parse or redefines a message.
pub fn build_bundle(locale: Locale) -> Result<FluentBundle<FluentResource>> {
    let resource = FluentResource::try_new(resource_source(locale).to_string()).map_err(
        |(_, errors)| {
            error!("Failed to parse resource for {}: {:?}", locale, errors);
            SalesError::localization_with_locale(
                format!("{} syntax error(s) in dashboard.ftl", errors.len()),
                locale.code(),
            )
        },
    )?;

    let mut bundle = FluentBundle::new(vec![locale.language_identifier()]);
    // Plain output; isolation marks would end up in chart labels.
    bundle.set_use_isolating(false);
    bundle.add_resource(resource).map_err(|errors| {
        error!("Failed to add resource for {}: {:?}", locale, errors);
        SalesError::localization_with_locale("Conflicting message definitions", locale.code())
    })?;

    debug!("Built bundle for locale {}", locale);
    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_embedded_resources_build() {
        for locale in Locale::ALL {
            let bundle = build_bundle(locale).unwrap();
            assert!(bundle.has_message("dashboard-title"));
        }
    }
}
