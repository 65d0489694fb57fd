/// Selectable content: themes, moral values, sample characters, items, roles.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::schema::character::Character;
use crate::schema::item::CustomItem;
use crate::schema::moral::MoralValue;
use crate::schema::theme::StoryTheme;

const BUILTIN_CATALOG: &str = include_str!("../../story_data/catalog.ron");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub themes: Vec<StoryTheme>,
    pub moral_values: Vec<MoralValue>,
    pub characters: Vec<Character>,
    pub items: Vec<CustomItem>,
    /// Roles offered when adding a supporting character by name.
    pub roles: Vec<String>,
}

impl Catalog {
    pub fn builtin() -> Result<Catalog, CatalogError> {
        Self::parse_ron(BUILTIN_CATALOG)
    }

    pub fn load_from_ron(path: &Path) -> Result<Catalog, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        let catalog = Self::parse_ron(&contents)?;
        tracing::info!(
            path = %path.display(),
            themes = catalog.themes.len(),
            moral_values = catalog.moral_values.len(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    pub fn parse_ron(input: &str) -> Result<Catalog, CatalogError> {
        Ok(ron::from_str(input)?)
    }

    pub fn theme_by_id(&self, id: &str) -> Option<&StoryTheme> {
        self.themes.iter().find(|t| t.id == id)
    }

    pub fn theme_by_title(&self, title: &str) -> Option<&StoryTheme> {
        self.themes.iter().find(|t| t.title == title)
    }

    pub fn moral_by_id(&self, id: &str) -> Option<&MoralValue> {
        self.moral_values.iter().find(|m| m.id == id)
    }

    pub fn item_by_id(&self, id: &str) -> Option<&CustomItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn character_by_id(&self, id: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    pub fn main_characters(&self) -> impl Iterator<Item = &Character> {
        self.characters.iter().filter(|c| c.is_main())
    }

    pub fn supporting_characters(&self) -> impl Iterator<Item = &Character> {
        self.characters.iter().filter(|c| !c.is_main())
    }
}
