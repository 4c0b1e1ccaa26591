//! Theme and language preferences
//!
//! The light theme turns coloured terminal output off, dark keeps it wherever
//! the terminal supports it. The language picks the label set used for
//! user-facing text.

use crate::error::T2lResult;
use crate::storage::{KeyValueStore, LANGUAGE_KEY, THEME_KEY};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn colored_output(&self) -> bool {
        matches!(self, Theme::Dark)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    En,
    Sl,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Sl => "sl",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "en" => Some(Language::En),
            "sl" => Some(Language::Sl),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Language::En => Language::Sl,
            Language::Sl => Language::En,
        }
    }

    pub fn labels(&self) -> &'static Labels {
        match self {
            Language::En => &EN,
            Language::Sl => &SL,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// User-facing texts for one language
#[derive(Debug)]
pub struct Labels {
    pub language_name: &'static str,
    pub settings: &'static str,
    pub theme: &'static str,
    pub language: &'static str,
    pub hs_codes: &'static str,
    pub no_hs_codes: &'static str,
    pub no_chassis: &'static str,
    pub no_stock: &'static str,
    pub processed: &'static str,
}

impl Labels {
    /// "Processed N vehicles"
    pub fn processed(&self, count: usize) -> String {
        self.processed.replace("{n}", &count.to_string())
    }
}

static EN: Labels = Labels {
    language_name: "English",
    settings: "Settings",
    theme: "Theme",
    language: "Language",
    hs_codes: "HS Codes",
    no_hs_codes: "No HS Codes saved.",
    no_chassis: "Please enter at least one Chassis number.",
    no_stock: "Please upload a CSV file first.",
    processed: "Processed {n} vehicles",
};

static SL: Labels = Labels {
    language_name: "Slovenian",
    settings: "Nastavitve",
    theme: "Tema",
    language: "Jezik",
    hs_codes: "HS Kode",
    no_hs_codes: "Ni shranjenih HS kod.",
    no_chassis: "Vnesite vsaj eno številko šasije.",
    no_stock: "Najprej naložite CSV datoteko.",
    processed: "Obdelanih vozil: {n}",
};

/// Theme and language, persisted under their own keys
pub struct Preferences<S: KeyValueStore> {
    backend: S,
}

impl<S: KeyValueStore> Preferences<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Stored theme, dark when unset or unreadable
    pub fn theme(&self) -> T2lResult<Theme> {
        Ok(self
            .backend
            .get(THEME_KEY)?
            .as_deref()
            .and_then(Theme::parse)
            .unwrap_or_default())
    }

    pub fn set_theme(&mut self, theme: Theme) -> T2lResult<()> {
        self.backend.set(THEME_KEY, theme.as_str())
    }

    pub fn toggle_theme(&mut self) -> T2lResult<Theme> {
        let next = self.theme()?.toggled();
        self.set_theme(next)?;
        Ok(next)
    }

    /// Stored language, English when unset or unknown
    pub fn language(&self) -> T2lResult<Language> {
        Ok(self
            .backend
            .get(LANGUAGE_KEY)?
            .as_deref()
            .and_then(Language::parse)
            .unwrap_or_default())
    }

    pub fn set_language(&mut self, language: Language) -> T2lResult<()> {
        self.backend.set(LANGUAGE_KEY, language.code())
    }

    pub fn toggle_language(&mut self) -> T2lResult<Language> {
        let next = self.language()?.toggled();
        self.set_language(next)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_defaults() {
        let prefs = Preferences::new(MemoryStore::new());
        assert_eq!(prefs.theme().unwrap(), Theme::Dark);
        assert_eq!(prefs.language().unwrap(), Language::En);
    }

    #[test]
    fn test_toggle_theme_persists() {
        let mut backend = MemoryStore::new();
        let mut prefs = Preferences::new(&mut backend);
        assert_eq!(prefs.toggle_theme().unwrap(), Theme::Light);
        assert_eq!(prefs.toggle_theme().unwrap(), Theme::Dark);
        assert_eq!(prefs.toggle_theme().unwrap(), Theme::Light);
        assert_eq!(backend.get(THEME_KEY).unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn test_toggle_language() {
        let mut prefs = Preferences::new(MemoryStore::new());
        assert_eq!(prefs.toggle_language().unwrap(), Language::Sl);
        assert_eq!(prefs.language().unwrap().labels().settings, "Nastavitve");
        assert_eq!(prefs.toggle_language().unwrap(), Language::En);
    }

    #[test]
    fn test_unknown_stored_value_falls_back() {
        let mut backend = MemoryStore::new();
        backend.set(LANGUAGE_KEY, "de").unwrap();
        backend.set(THEME_KEY, "neon").unwrap();
        let prefs = Preferences::new(backend);
        assert_eq!(prefs.language().unwrap(), Language::En);
        assert_eq!(prefs.theme().unwrap(), Theme::Dark);
    }

    #[test]
    fn test_processed_label() {
        assert_eq!(Language::En.labels().processed(3), "Processed 3 vehicles");
        assert_eq!(Language::Sl.labels().processed(3), "Obdelanih vozil: 3");
        assert!(!Theme::Light.colored_output());
    }
}
