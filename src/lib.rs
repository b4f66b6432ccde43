//! Agenda Chat - Conversational event search for the L'Agenda.bj directory
//!
//! This library provides the relevance filtering and scoring engine behind
//! the assistant: an LLM collaborator extracts a structured search intent
//! from the user's message, the engine filters and ranks the event catalog
//! against it, and a rendering layer formats the survivors into a reply.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    detect_category, fuzzy_match, get_synonyms, normalize, present, Engine,
    DEFAULT_FUZZY_THRESHOLD,
};
pub use crate::models::{ChatTurn, Event, FilterIntent, ScoredEvent, ScoringWeights, SearchPage};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let engine = Engine::with_default_weights();
        let ranked = engine.filter_events(&[], &FilterIntent::default());
        assert!(ranked.is_empty());
        assert_eq!(normalize("Bénin"), "benin");
    }
}
