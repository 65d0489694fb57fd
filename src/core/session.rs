/// Generation session. Guards the preview step against stale results.
///
/// Every request for a story gets a fresh `GenerationId`. A result is only
/// accepted for the id currently pending; anything else was superseded or
/// cancelled and is dropped.

use crate::core::assembler::{GeneratedStory, StoryAssembler};
use crate::schema::config::StoryConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GenerationId(pub u64);

#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Generating(GenerationId),
    Ready(GenerationId, GeneratedStory),
}

/// Outcome of handing a result to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Accepted,
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct StorySession {
    state: SessionState,
    next_id: u64,
}

impl StorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.state, SessionState::Generating(_))
    }

    pub fn story(&self) -> Option<&GeneratedStory> {
        match &self.state {
            SessionState::Ready(_, story) => Some(story),
            _ => None,
        }
    }

    /// Start a generation, superseding any pending one.
    pub fn begin(&mut self) -> GenerationId {
        let id = GenerationId(self.next_id);
        self.next_id += 1;
        if let SessionState::Generating(previous) = self.state {
            tracing::debug!(superseded = previous.0, id = id.0, "generation superseded");
        }
        self.state = SessionState::Generating(id);
        id
    }

    /// Abandon whatever is pending or shown.
    pub fn cancel(&mut self) {
        if let SessionState::Generating(id) = self.state {
            tracing::debug!(id = id.0, "generation cancelled");
        }
        self.state = SessionState::Idle;
    }

    /// Deliver a finished story for `id`.
    pub fn complete(&mut self, id: GenerationId, story: GeneratedStory) -> Delivery {
        match self.state {
            SessionState::Generating(pending) if pending == id => {
                self.state = SessionState::Ready(id, story);
                Delivery::Accepted
            }
            _ => {
                tracing::debug!(id = id.0, "dropping stale story");
                Delivery::Stale
            }
        }
    }

    /// Begin, assemble and complete in one go.
    pub fn generate(
        &mut self,
        assembler: &mut StoryAssembler,
        config: &StoryConfig,
    ) -> Option<&GeneratedStory> {
        let id = self.begin();
        let story = assembler.assemble(config);
        self.complete(id, story);
        self.story()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story() -> GeneratedStory {
        let mut assembler = StoryAssembler::builder().seed(1).build().unwrap();
        assembler.assemble(&StoryConfig::default())
    }

    #[test]
    fn session_default_is_idle() {
        let session = StorySession::new();
        assert!(matches!(session.state(), SessionState::Idle));
        assert!(session.story().is_none());
    }

    #[test]
    fn current_generation_is_accepted() {
        let mut session = StorySession::new();
        let id = session.begin();
        assert!(session.is_generating());
        assert_eq!(session.complete(id, story()), Delivery::Accepted);
        assert!(session.story().is_some());
    }

    #[test]
    fn superseded_generation_is_stale() {
        let mut session = StorySession::new();
        let first = session.begin();
        let second = session.begin();
        assert_ne!(first, second);
        assert_eq!(session.complete(first, story()), Delivery::Stale);
        assert!(session.is_generating());
        assert_eq!(session.complete(second, story()), Delivery::Accepted);
    }

    #[test]
    fn cancelled_generation_is_stale() {
        let mut session = StorySession::new();
        let id = session.begin();
        session.cancel();
        assert_eq!(session.complete(id, story()), Delivery::Stale);
        assert!(matches!(session.state(), SessionState::Idle));
    }

    #[test]
    fn late_duplicate_delivery_is_stale() {
        let mut session = StorySession::new();
        let id = session.begin();
        assert_eq!(session.complete(id, story()), Delivery::Accepted);
        assert_eq!(session.complete(id, story()), Delivery::Stale);
    }

    #[test]
    fn generate_shows_story() {
        let mut session = StorySession::new();
        let mut assembler = StoryAssembler::builder().seed(3).build().unwrap();
        let text = session
            .generate(&mut assembler, &StoryConfig::default())
            .map(|s| s.text.clone())
            .unwrap();
        assert!(text.ends_with("# SON"));
    }
}
