/// Preview-step summary of a configuration.

use serde::Serialize;

use crate::schema::config::StoryConfig;

const UNSET: &str = "Belirsiz";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SummaryContent {
    Text(String),
    List(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummarySection {
    pub title: &'static str,
    pub content: SummaryContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorySummary {
    pub sections: Vec<SummarySection>,
}

impl StorySummary {
    pub fn from_config(config: &StoryConfig) -> Self {
        let mut sections = Vec::new();

        sections.push(SummarySection {
            title: "Ana Karakter:",
            content: SummaryContent::Text(
                config
                    .main_character
                    .as_ref()
                    .map_or(UNSET.to_string(), |c| c.name.clone()),
            ),
        });
        sections.push(SummarySection {
            title: "Tema:",
            content: SummaryContent::Text(
                config
                    .theme
                    .as_ref()
                    .map_or(UNSET.to_string(), |t| t.title.clone()),
            ),
        });

        // Every selected value is listed here, unlike in the story text.
        let morals = if config.moral_values.is_empty() {
            vec![UNSET.to_string()]
        } else {
            config.moral_values.iter().map(|m| m.title.clone()).collect()
        };
        sections.push(SummarySection {
            title: "Ahlaki Dersler:",
            content: SummaryContent::List(morals),
        });

        sections.push(SummarySection {
            title: "Hikaye Uzunluğu:",
            content: SummaryContent::Text(config.length.unwrap_or_default().label().to_string()),
        });

        if !config.supporting_characters.is_empty() {
            sections.push(SummarySection {
                title: "Yardımcı Karakterler:",
                content: SummaryContent::List(
                    config
                        .supporting_characters
                        .iter()
                        .map(|c| format!("{} ({})", c.name, c.role()))
                        .collect(),
                ),
            });
        }

        if !config.custom_items.is_empty() {
            sections.push(SummarySection {
                title: "Özel Öğeler:",
                content: SummaryContent::List(
                    config.custom_items.iter().map(|i| i.name.clone()).collect(),
                ),
            });
        }

        let mut features = Vec::new();
        if config.features.sound_effects {
            features.push("Ses Efektleri".to_string());
        }
        if config.features.narration {
            features.push("Sesli Okuma".to_string());
        }
        sections.push(SummarySection {
            title: "Ek Özellikler:",
            content: SummaryContent::List(features),
        });

        Self { sections }
    }

    pub fn section(&self, title: &str) -> Option<&SummaryContent> {
        self.sections
            .iter()
            .find(|s| s.title == title)
            .map(|s| &s.content)
    }
}

impl std::fmt::Display for StorySummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for section in &self.sections {
            writeln!(f, "{}", section.title)?;
            match &section.content {
                SummaryContent::Text(text) => writeln!(f, "  {}", text)?,
                SummaryContent::List(items) => {
                    for item in items {
                        writeln!(f, "  • {}", item)?;
                    }
                }
            }
        }
        Ok(())
    }
}
