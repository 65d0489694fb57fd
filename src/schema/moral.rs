use serde::{Deserialize, Serialize};

/// A moral lesson the story should carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoralValue {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl MoralValue {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
        }
    }
}
