use rand::Rng;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Description attached to items typed in by the user.
pub const FREE_TEXT_DESCRIPTION: &str = "Özel olarak eklenmiş öğe";

const ID_SUFFIX_LEN: usize = 7;

/// An object the story can feature: a catalog item or a user entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl CustomItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
        }
    }
}

/// Split a comma-separated entry into items, trimming each name and
/// dropping empties.
///
/// Ids take the form `custom_<millis>_<index>_<suffix>`; the index keeps
/// them unique within one call even when the random suffix collides.
pub fn parse_free_text<R: Rng + ?Sized>(text: &str, millis: u128, rng: &mut R) -> Vec<CustomItem> {
    text.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .enumerate()
        .map(|(index, name)| CustomItem {
            id: format!("custom_{}_{}_{}", millis, index, random_suffix(rng)),
            name: name.to_string(),
            description: Some(FREE_TEXT_DESCRIPTION.to_string()),
        })
        .collect()
}

/// Selected catalog items first, then free-text items. A free-text item
/// whose id is already taken is skipped.
pub fn merge_items(selected: &[CustomItem], typed: Vec<CustomItem>) -> Vec<CustomItem> {
    let mut seen: FxHashSet<String> = selected.iter().map(|i| i.id.clone()).collect();
    let mut merged = selected.to_vec();
    for item in typed {
        if seen.insert(item.id.clone()) {
            merged.push(item);
        }
    }
    merged
}

fn random_suffix<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..ID_SUFFIX_LEN)
        .filter_map(|_| char::from_digit(rng.gen_range(0..36), 36))
        .collect()
}
