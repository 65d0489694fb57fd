use serde::{Deserialize, Serialize};

use super::character::Character;
use super::item::CustomItem;
use super::moral::MoralValue;
use super::theme::StoryTheme;

/// Requested story length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StoryLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl StoryLength {
    pub const ALL: [StoryLength; 3] = [Self::Short, Self::Medium, Self::Long];

    /// Number of template tiers the story includes.
    pub fn factor(&self) -> u8 {
        match self {
            Self::Short => 1,
            Self::Medium => 2,
            Self::Long => 3,
        }
    }

    /// Factor for an optional length; absent means medium.
    pub fn factor_of(length: Option<StoryLength>) -> u8 {
        length.unwrap_or_default().factor()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }

    /// Unrecognized names map to medium.
    pub fn parse(s: &str) -> Self {
        match s {
            "short" => Self::Short,
            "long" => Self::Long,
            _ => Self::Medium,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Short => "Kısa (5 dakika)",
            Self::Medium => "Orta (10 dakika)",
            Self::Long => "Uzun (15 dakika)",
        }
    }
}

impl From<String> for StoryLength {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<StoryLength> for String {
    fn from(length: StoryLength) -> Self {
        length.as_str().to_string()
    }
}

/// Playback extras chosen in the options step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryFeatures {
    #[serde(rename = "enableSoundEffects")]
    pub sound_effects: bool,
    #[serde(rename = "enableTTS")]
    pub narration: bool,
}

/// Everything the wizard collected. Every field may be missing; the
/// assembler substitutes defaults and records where it did so.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoryConfig {
    pub main_character: Option<Character>,
    pub theme: Option<StoryTheme>,
    pub moral_values: Vec<MoralValue>,
    pub supporting_characters: Vec<Character>,
    pub custom_items: Vec<CustomItem>,
    #[serde(rename = "storyLength")]
    pub length: Option<StoryLength>,
    #[serde(flatten)]
    pub features: StoryFeatures,
}

impl StoryConfig {
    /// The fields the wizard guarantees before the preview step.
    pub fn is_complete(&self) -> bool {
        self.main_character.is_some() && self.theme.is_some() && !self.moral_values.is_empty()
    }

    pub fn length_factor(&self) -> u8 {
        StoryLength::factor_of(self.length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factors_are_monotonic() {
        let factors: Vec<u8> = StoryLength::ALL.iter().map(|l| l.factor()).collect();
        assert_eq!(factors, vec![1, 2, 3]);
    }

    #[test]
    fn absent_or_unknown_length_is_medium() {
        assert_eq!(StoryLength::factor_of(None), 2);
        assert_eq!(StoryLength::parse("epic"), StoryLength::Medium);
        assert_eq!(StoryLength::parse("Short"), StoryLength::Medium);
    }

    #[test]
    fn config_from_partial_json() {
        let config: StoryConfig = serde_json::from_str(
            r#"{
                "mainCharacter": {"id": "1", "name": "Leo", "type": "main"},
                "storyLength": "long",
                "enableTTS": true
            }"#,
        )
        .unwrap();
        assert_eq!(config.main_character.as_ref().map(|c| c.name.as_str()), Some("Leo"));
        assert_eq!(config.length, Some(StoryLength::Long));
        assert!(config.features.narration);
        assert!(!config.features.sound_effects);
        assert!(config.theme.is_none());
        assert!(!config.is_complete());
    }

    #[test]
    fn unknown_length_string_deserializes_to_medium() {
        let config: StoryConfig = serde_json::from_str(r#"{"storyLength": "huge"}"#).unwrap();
        assert_eq!(config.length_factor(), 2);
    }

    #[test]
    fn empty_json_is_default_config() {
        let config: StoryConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, StoryConfig::default());
        assert_eq!(config.length_factor(), 2);
    }
}
