//! Integration tests for vgsales-i18n

use vgsales_i18n::{Locale, Messages, MESSAGE_KEYS};

#[test]
fn test_every_locale_defines_every_key() {
    for locale in Locale::ALL {
        let bundle = vgsales_i18n::build_bundle(locale).unwrap();
        for key in MESSAGE_KEYS {
            assert!(bundle.has_message(key), "{locale} is missing '{key}'");
        }
    }
}

#[test]
fn test_portuguese_dashboard_strings() {
    let messages = Messages::for_language("pt-BR").unwrap();

    assert_eq!(messages.get("dashboard-title").unwrap(), "Venda de Jogos");
    assert_eq!(
        messages.get("year-range-label").unwrap(),
        "Selecione o intervalo de anos"
    );
    assert_eq!(
        messages.get("platform-select-label").unwrap(),
        "Selecione a Plataforma"
    );
    assert_eq!(
        messages.get("footer-coming-soon").unwrap(),
        "Novas análises em breve..."
    );
    assert_eq!(
        messages.get("chart-platform-totals-title").unwrap(),
        "Vendas em Milhões"
    );
    assert_eq!(messages.get("axis-platform").unwrap(), "Plataforma");
}

#[test]
fn test_threshold_annotation_is_parameterized() {
    let messages = Messages::new(Locale::PtBr).unwrap();
    let text = messages
        .get_with_args("annotation-platform-share", &[("threshold", "1".to_string())])
        .unwrap();
    assert_eq!(text, "OTHERS: Plataformas com vendas abaixo de 1%");
}

#[test]
fn test_dropped_rows_count_is_rendered() {
    let messages = Messages::new(Locale::EnUs).unwrap();
    let text = messages
        .get_with_args("dropped-rows-warning", &[("count", "271".to_string())])
        .unwrap();
    assert!(text.contains("271"));
    assert!(!text.contains('\u{2068}'));
}

#[test]
fn test_hover_labels() {
    let messages = Messages::new(Locale::EnUs).unwrap();
    assert_eq!(
        messages
            .get_with_args("hover-total", &[("value", "12.34".to_string())])
            .unwrap(),
        "Total=12.34"
    );
}
