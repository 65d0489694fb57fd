use serde::{Deserialize, Serialize};

/// A story theme as offered by the catalog.
///
/// `title` is open text. The assembler maps it onto [`ThemeKind`] to pick
/// a template branch; titles it does not know still reach the story through
/// the generic branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryTheme {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl StoryTheme {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
        }
    }

    pub fn kind(&self) -> ThemeKind {
        ThemeKind::from_title(&self.title)
    }
}

/// The closed set of template branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeKind {
    /// "Macera"
    Adventure,
    /// "Uzay ve Gezegenler"
    Space,
    /// Every other title.
    Generic,
}

impl ThemeKind {
    pub const ADVENTURE_TITLE: &'static str = "Macera";
    pub const SPACE_TITLE: &'static str = "Uzay ve Gezegenler";

    /// Exact, case-sensitive match on the theme title.
    pub fn from_title(title: &str) -> Self {
        match title {
            Self::ADVENTURE_TITLE => Self::Adventure,
            Self::SPACE_TITLE => Self::Space,
            _ => Self::Generic,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Adventure => "adventure",
            Self::Space => "space",
            Self::Generic => "generic",
        }
    }
}
