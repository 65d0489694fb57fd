use serde::{Deserialize, Serialize};

/// Whether a character is the protagonist or one of the helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterKind {
    Main,
    Supporting,
}

/// A person, animal or creature that appears in a story.
///
/// For supporting characters `description` carries the free-text role
/// ("Mentor", "Öğretmen", ...) that the story uses when introducing them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub name: String,
    #[serde(alias = "type")]
    pub kind: CharacterKind,
    #[serde(default)]
    pub description: Option<String>,
}

/// Role given to a supporting character that carries no description.
pub const DEFAULT_ROLE: &str = "arkadaş";

impl Character {
    pub fn main(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: CharacterKind::Main,
            description: None,
        }
    }

    pub fn supporting(
        id: impl Into<String>,
        name: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: CharacterKind::Supporting,
            description: Some(role.into()),
        }
    }

    pub fn is_main(&self) -> bool {
        self.kind == CharacterKind::Main
    }

    /// The role this character plays next to the protagonist.
    pub fn role(&self) -> &str {
        match self.description.as_deref() {
            Some(role) if !role.trim().is_empty() => role,
            _ => DEFAULT_ROLE,
        }
    }
}
