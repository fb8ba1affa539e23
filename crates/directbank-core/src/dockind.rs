//! Document kind catalogue
//!
//! Every document travelling through the exchange carries a two-character
//! `dockind` code identifying its business type. The catalogue is fixed by
//! the protocol; banks only differ in which subset they enable for a given
//! customer (see [`crate::ExchangeConfig::doc_kinds`]).

/// Dockind of a statement request, the only kind this client submits itself
pub const STATEMENT_REQUEST: &str = "14";

/// Dockind of a bank statement, the usual payload of a fetched packet
pub const STATEMENT: &str = "15";

/// Dockind of the exchange settings document served during enrollment
pub const EXCHANGE_SETTINGS: &str = "06";

/// The full code → description catalogue. Descriptions are the official
/// Russian wordings used by the banks themselves.
pub const DOC_KINDS: [(&str, &str); 25] = [
    ("01", "Извещение о состоянии обработки транспортного контейнера"),
    ("02", "Извещение о состоянии электронного документа"),
    ("03", "Запрос о состоянии электронного документа"),
    ("04", "Запрос об отзыве электронного документа"),
    ("05", "Запрос-зонд"),
    ("06", "Настройки обмена с банком"),
    ("10", "Платежное поручение"),
    ("11", "Платежное требование"),
    ("12", "Инкассовое поручение"),
    ("13", "Внутренний банковский документ"),
    ("14", "Запрос выписки банка"),
    ("15", "Выписка банка"),
    ("16", "Мемориальный ордер"),
    ("17", "Платежный ордер"),
    ("18", "Банковский ордер"),
    ("19", "Список на открытие счетов по зарплатному проекту"),
    ("20", "Подтверждение открытия счетов по зарплатному проекту"),
    ("21", "Список на зачисление денежных средств на счета сотрудников"),
    ("22", "Подтверждение зачисления денежных средств на счета сотрудников"),
    ("23", "Список уволенных сотрудников"),
    ("24", "Объявление на взнос наличными"),
    ("25", "Денежный чек"),
    ("30", "Поручение на перевод валюты"),
    ("35", "Выписка по валютному счету"),
    ("40", "Письмо"),
];

/// Look up the description of a dockind code
pub fn description(code: &str) -> Option<&'static str> {
    DOC_KINDS
        .iter()
        .find(|(kind, _)| *kind == code)
        .map(|(_, description)| *description)
}

/// Check whether a code belongs to the catalogue
pub fn is_known(code: &str) -> bool {
    description(code).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_lookup() {
        assert_eq!(description("10"), Some("Платежное поручение"));
        assert_eq!(description("14"), Some("Запрос выписки банка"));
        assert_eq!(description("40"), Some("Письмо"));
        assert_eq!(description("99"), None);
        assert_eq!(description(""), None);
    }

    #[test]
    fn test_is_known() {
        assert!(is_known(STATEMENT_REQUEST));
        assert!(is_known(STATEMENT));
        assert!(is_known(EXCHANGE_SETTINGS));
        assert!(!is_known("00"));
    }

    #[test]
    fn test_catalogue_codes_are_two_characters_and_unique() {
        let mut seen = std::collections::HashSet::new();
        for (code, _) in DOC_KINDS {
            assert_eq!(code.len(), 2, "code {code} is not two characters");
            assert!(seen.insert(code), "code {code} appears twice");
        }
    }
}
