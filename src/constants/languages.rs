use crate::models::domain::LocalizedText;

pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
}

pub const SUPPORTED_LANGUAGES: [Language; 2] = [
    Language {
        code: "en",
        name: "English",
    },
    Language {
        code: "tr",
        name: "Turkish",
    },
];

/// Language the player starts in and falls back to first.
pub const DEFAULT_LANGUAGE: &str = "tr";
pub const FALLBACK_LANGUAGE: &str = "en";

pub fn is_supported(code: &str) -> bool {
    SUPPORTED_LANGUAGES.iter().any(|l| l.code == code)
}

/// A text with an empty entry for every supported language, as new drafts start.
pub fn empty_localized_text() -> LocalizedText {
    SUPPORTED_LANGUAGES
        .iter()
        .map(|l| (l.code.to_string(), String::new()))
        .collect()
}

/// Looks up `lang`, then the default and fallback languages, skipping empty entries.
pub fn localize<'a>(text: &'a LocalizedText, lang: &str) -> Option<&'a str> {
    [lang, DEFAULT_LANGUAGE, FALLBACK_LANGUAGE]
        .into_iter()
        .filter_map(|code| text.get(code))
        .map(String::as_str)
        .find(|value| !value.is_empty())
}
