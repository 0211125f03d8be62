use serde::Serialize;
use std::fmt;

/// Prefix of every public voice identifier
pub const VOICE_UID_PREFIX: &str = "coquitts:";

/// Speaker id telling the backend to use its own default speaker
pub const DEFAULT_SPEAKER_ID: &str = "-default-";

/// Language id telling the backend to use its own default language
pub const DEFAULT_LANGUAGE_ID: &str = "undefined";

/// Language tag split into language and optional country, e.g. `pt-BR`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Locale {
    pub language: String,
    pub country: String,
}

impl Locale {
    pub fn parse(tag: &str) -> Self {
        let mut parts = tag.trim().splitn(2, |c: char| c == '-' || c == '_');
        let language = parts.next().unwrap_or_default().to_lowercase();
        let country = parts.next().unwrap_or_default().to_uppercase();
        Self { language, country }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.country.is_empty() {
            write!(f, "{}", self.language)
        } else {
            write!(f, "{}-{}", self.language, self.country)
        }
    }
}

/// A speaker as reported by a backend catalog listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Speaker {
    pub label: String,
    pub speaker_id: String,
}

impl Speaker {
    pub fn new(label: impl Into<String>, speaker_id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            speaker_id: speaker_id.into(),
        }
    }
}

/// A concrete voice: one speaker in one language.
///
/// The technical name is computed once at construction and is part of both the
/// public voice UID and every cache file name for this voice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Voice {
    locale: Locale,
    name: String,
    language_id: String,
    speaker_id: String,
    technical_name: String,
}

impl Voice {
    pub fn new(
        locale: Locale,
        name: impl Into<String>,
        language_id: impl Into<String>,
        speaker_id: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let language_id = language_id.into();
        let speaker_id = speaker_id.into();
        let technical_name = technical_name(&language_id, &locale, &speaker_id, &name);

        Self {
            locale,
            name,
            language_id,
            speaker_id,
            technical_name,
        }
    }

    /// Voice that leaves speaker and language selection to the backend
    pub fn backend_default() -> Self {
        Self::new(
            Locale::parse(DEFAULT_LANGUAGE_ID),
            "Default Voice",
            DEFAULT_LANGUAGE_ID,
            DEFAULT_SPEAKER_ID,
        )
    }

    pub fn uid(&self) -> String {
        format!("{}{}", VOICE_UID_PREFIX, self.technical_name)
    }

    pub fn label(&self) -> String {
        format!("{} - {}", self.name, self.technical_name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    pub fn speaker_id(&self) -> &str {
        &self.speaker_id
    }

    pub fn technical_name(&self) -> &str {
        &self.technical_name
    }
}

fn technical_name(language_id: &str, locale: &Locale, speaker_id: &str, name: &str) -> String {
    format!("{}_{}_{}_{}", language_id, locale.country, speaker_id, name)
        .replace('-', "_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}
