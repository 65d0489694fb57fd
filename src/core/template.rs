/// Story templates: slot parsing, RON loading, per-theme branches and linting.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::format::{PARAGRAPH_SEPARATOR, TITLE_MARKER};
use crate::schema::theme::ThemeKind;

const BUILTIN_TEMPLATES: &str = include_str!("../../story_data/templates.ron");

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template parse error: {0}")]
    Parse(String),
    #[error("unknown slot '{{{0}}}'")]
    UnknownSlot(String),
    #[error("paragraph in {branch} breaks the story layout: {reason}")]
    Layout { branch: String, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// A named value the assembler substitutes into a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    /// `{hero}`: main character name.
    Hero,
    /// `{friend}`: supporting character name.
    Friend,
    /// `{friend_role}`
    FriendRole,
    /// `{item}`: the special item.
    Item,
    /// `{moral}`: the main moral value.
    Moral,
    /// `{theme}`: theme title as selected.
    Theme,
}

impl Slot {
    pub const ALL: [Slot; 6] = [
        Self::Hero,
        Self::Friend,
        Self::FriendRole,
        Self::Item,
        Self::Moral,
        Self::Theme,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "hero" => Some(Self::Hero),
            "friend" => Some(Self::Friend),
            "friend_role" => Some(Self::FriendRole),
            "item" => Some(Self::Item),
            "moral" => Some(Self::Moral),
            "theme" => Some(Self::Theme),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Friend => "friend",
            Self::FriendRole => "friend_role",
            Self::Item => "item",
            Self::Moral => "moral",
            Self::Theme => "theme",
        }
    }
}

/// A segment of a parsed template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TemplateSegment {
    /// Literal text, emitted as-is.
    Literal(String),
    /// A slot reference: `{hero}`, `{item}`, ...
    Slot(Slot),
}

/// A parsed template, as a sequence of segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub segments: Vec<TemplateSegment>,
}

/// Resolved values for every slot.
#[derive(Debug, Clone, Copy)]
pub struct SlotValues<'a> {
    pub hero: &'a str,
    pub friend: &'a str,
    pub friend_role: &'a str,
    pub item: &'a str,
    pub moral: &'a str,
    pub theme: &'a str,
}

impl<'a> SlotValues<'a> {
    pub fn get(&self, slot: Slot) -> &'a str {
        match slot {
            Slot::Hero => self.hero,
            Slot::Friend => self.friend,
            Slot::FriendRole => self.friend_role,
            Slot::Item => self.item,
            Slot::Moral => self.moral,
            Slot::Theme => self.theme,
        }
    }
}

impl Template {
    /// Parse a template string into a sequence of segments.
    ///
    /// Syntax:
    /// - `{slot_name}` → `Slot`, where the name is one of [`Slot::ALL`]
    /// - `{{` / `}}` → literal `{` / `}`
    /// - Everything else → `Literal`
    pub fn parse(input: &str) -> Result<Template, TemplateError> {
        let mut segments = Vec::new();
        let mut literal_buf = String::new();
        let chars: Vec<char> = input.chars().collect();
        let len = chars.len();
        let mut i = 0;

        while i < len {
            if chars[i] == '{' {
                // Escaped brace
                if i + 1 < len && chars[i + 1] == '{' {
                    literal_buf.push('{');
                    i += 2;
                    continue;
                }

                if !literal_buf.is_empty() {
                    segments.push(TemplateSegment::Literal(std::mem::take(&mut literal_buf)));
                }

                let start = i + 1;
                let mut end = start;
                while end < len && chars[end] != '}' {
                    if chars[end] == '{' {
                        return Err(TemplateError::Parse(
                            "nested braces are not allowed".to_string(),
                        ));
                    }
                    end += 1;
                }
                if end == len {
                    return Err(TemplateError::Parse("unclosed brace".to_string()));
                }

                let name: String = chars[start..end].iter().collect();
                if name.is_empty() {
                    return Err(TemplateError::Parse("empty braces".to_string()));
                }
                let slot = Slot::from_name(&name).ok_or(TemplateError::UnknownSlot(name))?;
                segments.push(TemplateSegment::Slot(slot));
                i = end + 1;
            } else if chars[i] == '}' {
                if i + 1 < len && chars[i + 1] == '}' {
                    literal_buf.push('}');
                    i += 2;
                    continue;
                }
                return Err(TemplateError::Parse(
                    "unmatched closing brace".to_string(),
                ));
            } else {
                literal_buf.push(chars[i]);
                i += 1;
            }
        }

        if !literal_buf.is_empty() {
            segments.push(TemplateSegment::Literal(literal_buf));
        }

        Ok(Template { segments })
    }

    pub fn render(&self, values: &SlotValues<'_>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                TemplateSegment::Literal(text) => out.push_str(text),
                TemplateSegment::Slot(slot) => out.push_str(values.get(*slot)),
            }
        }
        out
    }

    pub fn uses(&self, slot: Slot) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, TemplateSegment::Slot(used) if *used == slot))
    }

    pub fn is_blank(&self) -> bool {
        self.segments.iter().all(|s| match s {
            TemplateSegment::Literal(text) => text.trim().is_empty(),
            TemplateSegment::Slot(_) => false,
        })
    }
}

/// The paragraphs of one theme, grouped by the length factor that unlocks them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Branch {
    /// Always included.
    pub opening: Vec<Template>,
    /// Included when the factor is above 1.
    pub extended: Vec<Template>,
    /// Included when the factor is above 2.
    pub full: Vec<Template>,
}

impl Branch {
    /// Paragraph templates for a length factor, in story order. Each
    /// factor yields the previous factor's paragraphs plus its own tier.
    pub fn paragraphs(&self, factor: u8) -> impl Iterator<Item = &Template> {
        let extended: &[Template] = if factor > 1 { &self.extended } else { &[] };
        let full: &[Template] = if factor > 2 { &self.full } else { &[] };
        self.opening.iter().chain(extended).chain(full)
    }

    fn all(&self) -> impl Iterator<Item = &Template> {
        self.opening.iter().chain(&self.extended).chain(&self.full)
    }
}

/// Title, closing and one branch per [`ThemeKind`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryTemplates {
    pub title: Template,
    pub closing: String,
    pub adventure: Branch,
    pub space: Branch,
    pub generic: Branch,
}

// RON files hold plain strings; they are parsed into templates on load.

#[derive(Debug, Deserialize)]
#[serde(rename = "Branch")]
struct RonBranch {
    opening: Vec<String>,
    #[serde(default)]
    extended: Vec<String>,
    #[serde(default)]
    full: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename = "StoryTemplates")]
struct RonStoryTemplates {
    title: String,
    closing: String,
    adventure: RonBranch,
    space: RonBranch,
    generic: RonBranch,
}

impl StoryTemplates {
    /// The templates shipped with the crate.
    pub fn builtin() -> Result<StoryTemplates, TemplateError> {
        Self::parse_ron(BUILTIN_TEMPLATES)
    }

    /// Load templates from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<StoryTemplates, TemplateError> {
        let contents = std::fs::read_to_string(path)?;
        let templates = Self::parse_ron(&contents)?;
        tracing::info!(path = %path.display(), "loaded story templates");
        Ok(templates)
    }

    /// Parse templates from a RON string.
    pub fn parse_ron(input: &str) -> Result<StoryTemplates, TemplateError> {
        let raw: RonStoryTemplates = ron::from_str(input)?;
        check_layout("title", &raw.title)?;
        check_layout("closing", &raw.closing)?;

        Ok(StoryTemplates {
            title: Template::parse(&raw.title)?,
            closing: raw.closing,
            adventure: parse_branch(ThemeKind::Adventure, raw.adventure)?,
            space: parse_branch(ThemeKind::Space, raw.space)?,
            generic: parse_branch(ThemeKind::Generic, raw.generic)?,
        })
    }

    pub fn branch(&self, kind: ThemeKind) -> &Branch {
        match kind {
            ThemeKind::Adventure => &self.adventure,
            ThemeKind::Space => &self.space,
            ThemeKind::Generic => &self.generic,
        }
    }

    /// Quality checks beyond what loading enforces.
    pub fn lint(&self) -> LintReport {
        let mut report = LintReport::default();

        if self.title.is_blank() {
            report.errors.push("title is empty".to_string());
        }
        if self.closing.trim().is_empty() {
            report.errors.push("closing is empty".to_string());
        }

        for kind in [ThemeKind::Adventure, ThemeKind::Space, ThemeKind::Generic] {
            let branch = self.branch(kind);
            let name = kind.name();

            if branch.opening.is_empty() {
                report.errors.push(format!("{}: opening tier is empty", name));
            }
            if branch.extended.is_empty() {
                report
                    .warnings
                    .push(format!("{}: medium stories add nothing over short ones", name));
            }
            if branch.full.is_empty() {
                report
                    .warnings
                    .push(format!("{}: long stories add nothing over medium ones", name));
            }
            for (index, template) in branch.all().enumerate() {
                if template.is_blank() {
                    report
                        .errors
                        .push(format!("{}: paragraph {} is blank", name, index + 1));
                }
            }
            if !branch.all().any(|t| t.uses(Slot::Hero)) {
                report
                    .warnings
                    .push(format!("{}: the main character is never named", name));
            }
        }

        // Unknown themes only reach the story through the generic branch.
        for slot in [Slot::Theme, Slot::Moral] {
            if !self.generic.opening.iter().any(|t| t.uses(slot)) {
                report.warnings.push(format!(
                    "generic: opening tier never mentions {{{}}}",
                    slot.name()
                ));
            }
        }

        report
    }
}

/// Outcome of [`StoryTemplates::lint`].
#[derive(Debug, Clone, Default)]
pub struct LintReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl LintReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

fn parse_branch(kind: ThemeKind, raw: RonBranch) -> Result<Branch, TemplateError> {
    let parse_tier = |texts: Vec<String>| -> Result<Vec<Template>, TemplateError> {
        texts
            .iter()
            .map(|text| {
                check_layout(kind.name(), text)?;
                Template::parse(text)
            })
            .collect()
    };

    Ok(Branch {
        opening: parse_tier(raw.opening)?,
        extended: parse_tier(raw.extended)?,
        full: parse_tier(raw.full)?,
    })
}

/// A paragraph must survive splitting on the separator as a single body block.
fn check_layout(branch: &str, text: &str) -> Result<(), TemplateError> {
    let reason = if text.contains(PARAGRAPH_SEPARATOR) {
        "contains a blank line"
    } else if text.starts_with(TITLE_MARKER) {
        "starts with the heading marker"
    } else {
        return Ok(());
    };
    Err(TemplateError::Layout {
        branch: branch.to_string(),
        reason: reason.to_string(),
    })
}
