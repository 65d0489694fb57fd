/// Story assembly: configuration → templated story text.
///
/// Resolves every configuration field (substituting defaults where the
/// wizard left gaps), dispatches on the theme, renders the paragraph tiers
/// unlocked by the length factor and lays the result out as story text.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

use crate::core::format::{self, Block};
use crate::core::template::{SlotValues, StoryTemplates, TemplateError};
use crate::schema::character::DEFAULT_ROLE;
use crate::schema::config::{StoryConfig, StoryLength};
use crate::schema::theme::ThemeKind;

pub const DEFAULT_HERO: &str = "Çocuk";
pub const DEFAULT_THEME: &str = "Macera";
pub const DEFAULT_MORAL: &str = "Arkadaşlık";
pub const DEFAULT_ITEM: &str = "sihirli kalem";
pub const DEFAULT_FRIEND: &str = "Zeynep";
pub const DEFAULT_FRIEND_ROLE: &str = "en iyi arkadaş";

#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("template error: {0}")]
    Template(#[from] TemplateError),
}

/// Where a substituted value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Supplied,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolved<T> {
    pub value: T,
    pub source: Source,
}

impl<T> Resolved<T> {
    fn supplied(value: T) -> Self {
        Self {
            value,
            source: Source::Supplied,
        }
    }

    fn fallback(value: T) -> Self {
        Self {
            value,
            source: Source::Default,
        }
    }

    pub fn is_default(&self) -> bool {
        self.source == Source::Default
    }
}

/// The effective value of every field the templates can mention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub hero: Resolved<String>,
    pub theme: Resolved<String>,
    pub theme_kind: ThemeKind,
    pub moral: Resolved<String>,
    pub item: Resolved<String>,
    pub friend: Resolved<String>,
    pub friend_role: Resolved<String>,
    pub length: Resolved<StoryLength>,
}

impl Resolution {
    /// Resolve a configuration. The RNG is consumed only to pick among
    /// two or more custom items. Every value is flattened onto one line
    /// first, so user text cannot add paragraphs or headings.
    pub fn resolve<R: Rng + ?Sized>(config: &StoryConfig, rng: &mut R) -> Resolution {
        let hero = supplied_or(
            config.main_character.as_ref().map(|c| c.name.as_str()),
            DEFAULT_HERO,
        );

        let raw_theme = config.theme.as_ref().map(|t| t.title.as_str());
        let theme = supplied_or(raw_theme, DEFAULT_THEME);
        // Dispatch matches the title exactly as selected, before flattening.
        let theme_kind = match raw_theme {
            Some(title) if !theme.is_default() => ThemeKind::from_title(title),
            _ => ThemeKind::from_title(DEFAULT_THEME),
        };

        // Only the first selected value is told; the rest stay in the summary.
        let moral = supplied_or(
            config.moral_values.first().map(|m| m.title.as_str()),
            DEFAULT_MORAL,
        );

        let named_items: Vec<String> = config
            .custom_items
            .iter()
            .map(|i| inline(&i.name))
            .filter(|name| !name.is_empty())
            .collect();
        let item = match named_items.as_slice() {
            [] => Resolved::fallback(DEFAULT_ITEM.to_string()),
            [only] => Resolved::supplied(only.clone()),
            many => match many.choose(rng) {
                Some(name) => Resolved::supplied(name.clone()),
                None => Resolved::fallback(DEFAULT_ITEM.to_string()),
            },
        };

        let (friend, friend_role) = match config.supporting_characters.first() {
            Some(c) => (
                supplied_or(Some(c.name.as_str()), DEFAULT_FRIEND),
                supplied_or(c.description.as_deref(), DEFAULT_ROLE),
            ),
            None => (
                Resolved::fallback(DEFAULT_FRIEND.to_string()),
                Resolved::fallback(DEFAULT_FRIEND_ROLE.to_string()),
            ),
        };

        let length = match config.length {
            Some(length) => Resolved::supplied(length),
            None => Resolved::fallback(StoryLength::default()),
        };

        Resolution {
            hero,
            theme,
            theme_kind,
            moral,
            item,
            friend,
            friend_role,
            length,
        }
    }

    /// Names of the fields that fell back to defaults.
    pub fn defaulted(&self) -> Vec<&'static str> {
        let fields = [
            ("hero", self.hero.is_default()),
            ("theme", self.theme.is_default()),
            ("moral", self.moral.is_default()),
            ("item", self.item.is_default()),
            ("friend", self.friend.is_default()),
            ("friend_role", self.friend_role.is_default()),
            ("length", self.length.is_default()),
        ];
        fields
            .into_iter()
            .filter_map(|(name, defaulted)| defaulted.then_some(name))
            .collect()
    }

    pub fn theme_kind(&self) -> ThemeKind {
        self.theme_kind
    }

    pub fn factor(&self) -> u8 {
        self.length.value.factor()
    }

    pub fn slot_values(&self) -> SlotValues<'_> {
        SlotValues {
            hero: &self.hero.value,
            friend: &self.friend.value,
            friend_role: &self.friend_role.value,
            item: &self.item.value,
            moral: &self.moral.value,
            theme: &self.theme.value,
        }
    }
}

/// Collapse whitespace runs (line breaks included) to single spaces and
/// drop leading heading markers.
fn inline(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_start_matches(|c: char| c == '#' || c.is_whitespace())
        .to_string()
}

fn supplied_or(value: Option<&str>, fallback: &str) -> Resolved<String> {
    match value.map(inline) {
        Some(value) if !value.is_empty() => Resolved::supplied(value),
        _ => Resolved::fallback(fallback.to_string()),
    }
}

/// An assembled story and how it was put together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedStory {
    pub title: String,
    pub text: String,
    pub theme_kind: ThemeKind,
    pub factor: u8,
    pub resolution: Resolution,
}

impl GeneratedStory {
    pub fn blocks(&self) -> Vec<Block<'_>> {
        format::split_blocks(&self.text)
    }

    pub fn paragraphs(&self) -> Vec<&str> {
        format::body_paragraphs(&self.text)
    }
}

/// Assemble a story. Pure apart from the item pick drawn from `rng`.
pub fn assemble<R: Rng + ?Sized>(
    config: &StoryConfig,
    templates: &StoryTemplates,
    rng: &mut R,
) -> GeneratedStory {
    let resolution = Resolution::resolve(config, rng);
    let theme_kind = resolution.theme_kind();
    let factor = resolution.factor();

    let values = resolution.slot_values();
    let title = templates.title.render(&values);
    let paragraphs: Vec<String> = templates
        .branch(theme_kind)
        .paragraphs(factor)
        .map(|template| template.render(&values))
        .collect();
    let text = format::compose(&title, &paragraphs, &templates.closing);

    tracing::debug!(
        theme = theme_kind.name(),
        factor,
        paragraphs = paragraphs.len(),
        defaulted = ?resolution.defaulted(),
        "assembled story"
    );

    GeneratedStory {
        title,
        text,
        theme_kind,
        factor,
        resolution,
    }
}

/// Reusable assembler with its own templates and a reproducible RNG
/// stream. Built via `StoryAssembler::builder()`.
pub struct StoryAssembler {
    templates: StoryTemplates,
    seed: u64,
    generation_count: u64,
}

/// Builder for constructing a `StoryAssembler`.
pub struct StoryAssemblerBuilder {
    templates_path: Option<String>,
    seed: u64,
    /// Directly provided templates (for testing without files).
    templates: Option<StoryTemplates>,
}

impl StoryAssembler {
    pub fn builder() -> StoryAssemblerBuilder {
        StoryAssemblerBuilder {
            templates_path: None,
            seed: 0,
            templates: None,
        }
    }

    /// Assemble a story; each call draws from a fresh RNG derived from the
    /// seed and the number of stories assembled so far.
    pub fn assemble(&mut self, config: &StoryConfig) -> GeneratedStory {
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(self.generation_count));
        self.generation_count += 1;
        assemble(config, &self.templates, &mut rng)
    }

    pub fn templates(&self) -> &StoryTemplates {
        &self.templates
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl StoryAssemblerBuilder {
    pub fn templates_path(mut self, path: &str) -> Self {
        self.templates_path = Some(path.to_string());
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Provide templates directly (for testing without files).
    pub fn with_templates(mut self, templates: StoryTemplates) -> Self {
        self.templates = Some(templates);
        self
    }

    pub fn build(self) -> Result<StoryAssembler, AssemblyError> {
        let templates = match (self.templates, self.templates_path) {
            (Some(templates), _) => templates,
            (None, Some(path)) => StoryTemplates::load_from_ron(Path::new(&path))?,
            (None, None) => StoryTemplates::builtin()?,
        };

        Ok(StoryAssembler {
            templates,
            seed: self.seed,
            generation_count: 0,
        })
    }
}
