//! WASM bindings for masal-engine: the JSON boundary used by the web front end.

use wasm_bindgen::prelude::*;

use masal_engine::core::assembler::{GeneratedStory, StoryAssembler};
use masal_engine::core::catalog::Catalog;
use masal_engine::core::format::{self, Block};
use masal_engine::core::session::{Delivery, GenerationId, StorySession};
use masal_engine::core::summary::StorySummary;
use masal_engine::core::wizard;
use masal_engine::schema::config::StoryConfig;

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
struct StoryOutput<'a> {
    title: &'a str,
    text: &'a str,
    theme_kind: &'static str,
    factor: u8,
    defaulted: Vec<&'static str>,
    blocks: Vec<Block<'a>>,
}

impl<'a> StoryOutput<'a> {
    fn from_story(story: &'a GeneratedStory) -> Self {
        StoryOutput {
            title: &story.title,
            text: &story.text,
            theme_kind: story.theme_kind.name(),
            factor: story.factor,
            defaulted: story.resolution.defaulted(),
            blocks: story.blocks(),
        }
    }
}

#[derive(serde::Serialize)]
struct NameCheck {
    valid: bool,
    prompt: Option<&'static str>,
}

fn parse_config(config_json: &str) -> Result<StoryConfig, JsError> {
    serde_json::from_str(config_json)
        .map_err(|e| JsError::new(&format!("Invalid config JSON: {e}")))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&format!("Serialization error: {e}")))
}

// ---------------------------------------------------------------------------
// Stateless entry points
// ---------------------------------------------------------------------------

/// Assemble one story from a wizard configuration.
///
/// Expected JSON shape (every field optional):
/// ```json
/// {
///   "mainCharacter": { "id": "1", "name": "Leo", "type": "main" },
///   "theme": { "id": "1", "title": "Macera", "description": "" },
///   "moralValues": [{ "id": "2", "title": "Dürüstlük", "description": "" }],
///   "supportingCharacters": [],
///   "customItems": [],
///   "storyLength": "short",
///   "enableSoundEffects": false,
///   "enableTTS": false
/// }
/// ```
#[wasm_bindgen]
pub fn generate_story(config_json: &str, seed: u64) -> Result<String, JsError> {
    let config = parse_config(config_json)?;
    let mut assembler = StoryAssembler::builder()
        .seed(seed)
        .build()
        .map_err(|e| JsError::new(&format!("Assembler build error: {e}")))?;
    let story = assembler.assemble(&config);
    to_json(&StoryOutput::from_story(&story))
}

/// Split story text into display blocks. Returns a JSON array of
/// `{ "kind": "heading" | "body", "text": ... }`.
#[wasm_bindgen]
pub fn split_story(text: &str) -> Result<String, JsError> {
    to_json(&format::split_blocks(text))
}

/// The built-in selectable content as JSON.
#[wasm_bindgen]
pub fn catalog_json() -> Result<String, JsError> {
    let catalog =
        Catalog::builtin().map_err(|e| JsError::new(&format!("Catalog load error: {e}")))?;
    to_json(&catalog)
}

/// Check a main character name. Returns `{ "valid": bool, "prompt": string | null }`.
/// Does not read the clock, which wasm32 lacks.
#[wasm_bindgen]
pub fn validate_character_name(name: &str) -> String {
    let check = match wizard::validate_character_name(name) {
        Ok(_) => NameCheck {
            valid: true,
            prompt: None,
        },
        Err(e) => NameCheck {
            valid: false,
            prompt: Some(e.prompt()),
        },
    };
    serde_json::to_string(&check).unwrap_or_else(|_| "{\"valid\":false}".to_string())
}

/// Preview-step summary of a configuration as JSON sections.
#[wasm_bindgen]
pub fn summarize_config(config_json: &str) -> Result<String, JsError> {
    let config = parse_config(config_json)?;
    to_json(&StorySummary::from_config(&config))
}

// ---------------------------------------------------------------------------
// StoryDemo: a preview screen with its own seed and stale-result guard
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct StoryDemo {
    assembler: StoryAssembler,
    session: StorySession,
}

#[wasm_bindgen]
impl StoryDemo {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Result<StoryDemo, JsError> {
        let assembler = StoryAssembler::builder()
            .seed(seed)
            .build()
            .map_err(|e| JsError::new(&format!("Assembler build error: {e}")))?;
        Ok(StoryDemo {
            assembler,
            session: StorySession::new(),
        })
    }

    /// Start a generation and return its id. Any earlier pending id goes stale.
    pub fn begin(&mut self) -> u64 {
        self.session.begin().0
    }

    /// Assemble the story for `id`. Returns the story JSON, or `null` when
    /// the id is no longer current (the user left the preview step).
    pub fn finish(&mut self, id: u64, config_json: &str) -> Result<Option<String>, JsError> {
        let config = parse_config(config_json)?;
        let story = self.assembler.assemble(&config);
        match self.session.complete(GenerationId(id), story) {
            Delivery::Accepted => match self.session.story() {
                Some(story) => to_json(&StoryOutput::from_story(story)).map(Some),
                None => Ok(None),
            },
            Delivery::Stale => Ok(None),
        }
    }

    /// Leave the preview step.
    pub fn cancel(&mut self) {
        self.session.cancel();
    }

    pub fn is_generating(&self) -> bool {
        self.session.is_generating()
    }

    /// Reset the assembler with a new seed.
    pub fn reset(&mut self, seed: u64) -> Result<(), JsError> {
        let fresh = StoryDemo::new(seed)?;
        self.assembler = fresh.assembler;
        self.session = fresh.session;
        Ok(())
    }
}
