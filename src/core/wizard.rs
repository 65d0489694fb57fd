/// The five-step story wizard as immutable transitions.
///
/// Each step consumes the slice built so far by reference and returns a new
/// slice, or a `ValidationError` naming the guard that blocked progress.
/// Going back hands out the previous slice unchanged.

use rand::Rng;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

use crate::schema::character::Character;
use crate::schema::config::{StoryConfig, StoryFeatures, StoryLength};
use crate::schema::item::{self, CustomItem};
use crate::schema::moral::MoralValue;
use crate::schema::theme::StoryTheme;

pub const MAX_CHARACTER_NAME_LEN: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardStep {
    Character,
    Theme,
    Moral,
    Options,
    Preview,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        Self::Character,
        Self::Theme,
        Self::Moral,
        Self::Options,
        Self::Preview,
    ];

    pub fn index(&self) -> usize {
        match self {
            Self::Character => 0,
            Self::Theme => 1,
            Self::Moral => 2,
            Self::Options => 3,
            Self::Preview => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Character => "Karakter",
            Self::Theme => "Tema",
            Self::Moral => "Ders",
            Self::Options => "Detaylar",
            Self::Preview => "Önizleme",
        }
    }
}

/// User-typed text that ends up inside story paragraphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    CharacterName,
    SupportingName,
    ItemName,
}

impl TextField {
    pub fn step(&self) -> WizardStep {
        match self {
            Self::CharacterName => WizardStep::Character,
            Self::SupportingName | Self::ItemName => WizardStep::Options,
        }
    }
}

impl std::fmt::Display for TextField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::CharacterName => "character name",
            Self::SupportingName => "supporting character name",
            Self::ItemName => "item name",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("character name is empty")]
    EmptyCharacterName,
    #[error("character name is longer than {max} characters")]
    CharacterNameTooLong { max: usize },
    #[error("no theme selected")]
    NoThemeSelected,
    #[error("at least one moral value must be selected")]
    NoMoralValueSelected,
    #[error("supporting character name is empty")]
    EmptySupportingName,
    #[error("{field} contains a line break")]
    LineBreak { field: TextField },
    #[error("{field} starts with a heading marker")]
    HeadingMarker { field: TextField },
}

impl ValidationError {
    /// The step whose guard failed.
    pub fn step(&self) -> WizardStep {
        match self {
            Self::EmptyCharacterName | Self::CharacterNameTooLong { .. } => WizardStep::Character,
            Self::NoThemeSelected => WizardStep::Theme,
            Self::NoMoralValueSelected => WizardStep::Moral,
            Self::EmptySupportingName => WizardStep::Options,
            Self::LineBreak { field } | Self::HeadingMarker { field } => field.step(),
        }
    }

    /// The prompt shown to the user.
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::EmptyCharacterName => "Lütfen bir karakter adı giriniz",
            Self::CharacterNameTooLong { .. } => "Karakter adı en fazla 20 harf olabilir",
            Self::NoThemeSelected => "Lütfen bir tema seçiniz",
            Self::NoMoralValueSelected => "Lütfen en az bir ahlaki değer seçiniz",
            Self::EmptySupportingName => "Lütfen karakterin adını giriniz",
            Self::LineBreak { .. } => "Ad tek satır olmalıdır",
            Self::HeadingMarker { .. } => "Ad # ile başlayamaz",
        }
    }
}

/// Records selectable by id.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for MoralValue {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Character {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for CustomItem {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for StoryTheme {
    fn key(&self) -> &str {
        &self.id
    }
}

/// An ordered set: iteration follows selection order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<T> {
    items: Vec<T>,
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Keyed + Clone> Selection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `item`, or deselect it if its id is already selected.
    /// Returns whether the item is selected afterwards.
    pub fn toggle(&mut self, item: &T) -> bool {
        if let Some(pos) = self.items.iter().position(|i| i.key() == item.key()) {
            self.items.remove(pos);
            false
        } else {
            self.items.push(item.clone());
            true
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.items.iter().any(|i| i.key() == key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: Keyed + Clone> FromIterator<T> for Selection<T> {
    /// Later duplicates of an id are ignored.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut selection = Selection::new();
        for item in iter {
            if !selection.contains(item.key()) {
                selection.items.push(item);
            }
        }
        selection
    }
}

/// Text that lands in a paragraph must stay on one line and must not read
/// as a heading once substituted.
fn check_inline(text: &str, field: TextField) -> Result<(), ValidationError> {
    if text.contains(['\n', '\r']) {
        return Err(ValidationError::LineBreak { field });
    }
    if text.starts_with('#') {
        return Err(ValidationError::HeadingMarker { field });
    }
    Ok(())
}

/// The step 1 guard on its own. Returns the trimmed name.
pub fn validate_character_name(name: &str) -> Result<&str, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyCharacterName);
    }
    if name.chars().count() > MAX_CHARACTER_NAME_LEN {
        return Err(ValidationError::CharacterNameTooLong {
            max: MAX_CHARACTER_NAME_LEN,
        });
    }
    check_inline(name, TextField::CharacterName)?;
    Ok(name)
}

/// Step 1 input: nothing chosen yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct WizardDraft;

impl WizardDraft {
    pub fn new() -> Self {
        Self
    }

    pub fn choose_character(&self, name: &str) -> Result<CharacterChosen, ValidationError> {
        self.choose_character_at(name, now_millis())
    }

    /// As [`choose_character`](Self::choose_character), with the id minted
    /// from `millis` instead of the system clock.
    pub fn choose_character_at(
        &self,
        name: &str,
        millis: u128,
    ) -> Result<CharacterChosen, ValidationError> {
        let name = validate_character_name(name)?;
        let mut main_character = Character::main(millis.to_string(), name);
        main_character.description = Some("Ana karakter".to_string());
        Ok(CharacterChosen { main_character })
    }
}

/// Step 2 input.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterChosen {
    main_character: Character,
}

impl CharacterChosen {
    pub fn main_character(&self) -> &Character {
        &self.main_character
    }

    pub fn choose_theme(&self, theme: Option<&StoryTheme>) -> Result<ThemeChosen, ValidationError> {
        let theme = theme.ok_or(ValidationError::NoThemeSelected)?;
        Ok(ThemeChosen {
            character: self.clone(),
            theme: theme.clone(),
        })
    }

    pub fn back(&self) -> WizardDraft {
        WizardDraft
    }
}

/// Step 3 input.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeChosen {
    character: CharacterChosen,
    theme: StoryTheme,
}

impl ThemeChosen {
    pub fn main_character(&self) -> &Character {
        self.character.main_character()
    }

    pub fn theme(&self) -> &StoryTheme {
        &self.theme
    }

    pub fn choose_morals(
        &self,
        moral_values: &Selection<MoralValue>,
    ) -> Result<MoralsChosen, ValidationError> {
        if moral_values.is_empty() {
            return Err(ValidationError::NoMoralValueSelected);
        }
        Ok(MoralsChosen {
            theme: self.clone(),
            moral_values: moral_values.as_slice().to_vec(),
        })
    }

    pub fn back(&self) -> CharacterChosen {
        self.character.clone()
    }
}

/// Step 4 input.
#[derive(Debug, Clone, PartialEq)]
pub struct MoralsChosen {
    theme: ThemeChosen,
    moral_values: Vec<MoralValue>,
}

impl MoralsChosen {
    pub fn main_character(&self) -> &Character {
        self.theme.main_character()
    }

    pub fn theme(&self) -> &StoryTheme {
        self.theme.theme()
    }

    pub fn moral_values(&self) -> &[MoralValue] {
        &self.moral_values
    }

    /// Close the options step and produce the full configuration.
    pub fn finish<R: Rng + ?Sized>(
        &self,
        options: &StoryOptions,
        rng: &mut R,
    ) -> Result<StoryConfig, ValidationError> {
        self.finish_at(options, now_millis(), rng)
    }

    /// As [`finish`](Self::finish), with free-text item ids minted from `millis`.
    pub fn finish_at<R: Rng + ?Sized>(
        &self,
        options: &StoryOptions,
        millis: u128,
        rng: &mut R,
    ) -> Result<StoryConfig, ValidationError> {
        for name in options.free_text.split(',').map(str::trim) {
            check_inline(name, TextField::ItemName)?;
        }
        let typed = item::parse_free_text(&options.free_text, millis, rng);
        Ok(StoryConfig {
            main_character: Some(self.main_character().clone()),
            theme: Some(self.theme().clone()),
            moral_values: self.moral_values.clone(),
            supporting_characters: options.supporting.as_slice().to_vec(),
            custom_items: item::merge_items(options.items.as_slice(), typed),
            length: Some(options.length),
            features: options.features,
        })
    }

    pub fn back(&self) -> ThemeChosen {
        self.theme.clone()
    }
}

/// Form state of the options step.
#[derive(Debug, Clone, Default)]
pub struct StoryOptions {
    pub length: StoryLength,
    pub supporting: Selection<Character>,
    pub items: Selection<CustomItem>,
    /// Comma-separated item names typed by the user.
    pub free_text: String,
    pub features: StoryFeatures,
}

impl StoryOptions {
    /// Add a supporting character typed in by name.
    pub fn add_supporting(&mut self, name: &str, role: &str) -> Result<&Character, ValidationError> {
        self.add_supporting_at(name, role, now_millis())
    }

    /// As [`add_supporting`](Self::add_supporting), with the id minted from `millis`.
    pub fn add_supporting_at(
        &mut self,
        name: &str,
        role: &str,
        millis: u128,
    ) -> Result<&Character, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptySupportingName);
        }
        check_inline(name, TextField::SupportingName)?;
        check_inline(role.trim(), TextField::SupportingName)?;
        let mut n = self.supporting.len();
        let mut id = format!("supporting_{}_{}", millis, n);
        while self.supporting.contains(&id) {
            n += 1;
            id = format!("supporting_{}_{}", millis, n);
        }
        self.supporting.items.push(Character::supporting(id, name, role));
        let added = self.supporting.items.len() - 1;
        Ok(&self.supporting.items[added])
    }
}

/// Where the user currently is, with the slice built so far.
#[derive(Debug, Clone)]
pub enum WizardState {
    Draft(WizardDraft),
    Character(CharacterChosen),
    Theme(ThemeChosen),
    Morals(MoralsChosen),
    /// The finished configuration, with the slice it was finished from.
    Ready {
        morals: MoralsChosen,
        config: StoryConfig,
    },
}

impl Default for WizardState {
    fn default() -> Self {
        Self::Draft(WizardDraft)
    }
}

impl WizardState {
    /// The step the user is looking at.
    pub fn step(&self) -> WizardStep {
        match self {
            Self::Draft(_) => WizardStep::Character,
            Self::Character(_) => WizardStep::Theme,
            Self::Theme(_) => WizardStep::Moral,
            Self::Morals(_) => WizardStep::Options,
            Self::Ready { .. } => WizardStep::Preview,
        }
    }

    /// The state one step earlier, built from the slices already held.
    pub fn back(&self) -> WizardState {
        match self {
            Self::Draft(draft) => Self::Draft(*draft),
            Self::Character(c) => Self::Draft(c.back()),
            Self::Theme(t) => Self::Character(t.back()),
            Self::Morals(m) => Self::Theme(m.back()),
            Self::Ready { morals, .. } => Self::Morals(morals.clone()),
        }
    }

    pub fn config(&self) -> Option<&StoryConfig> {
        match self {
            Self::Ready { config, .. } => Some(config),
            _ => None,
        }
    }
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}
