use crate::core::scoring::{score_event, Criteria};
use crate::models::{Event, FilterIntent, ScoredEvent, ScoringWeights, SearchPage};

/// Similarity cutoff for lenient city-name matching.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.75;

/// Relevance filtering and scoring engine.
///
/// A pure, synchronous computation over a borrowed catalog: each event is
/// evaluated independently against the intent, survivors are stable-sorted
/// by descending score. The engine holds no state between calls and never
/// mutates its inputs, so repeated calls with the same inputs are
/// idempotent.
#[derive(Debug, Clone)]
pub struct Engine {
    weights: ScoringWeights,
    fuzzy_threshold: f64,
}

impl Engine {
    pub fn new(weights: ScoringWeights, fuzzy_threshold: f64) -> Self {
        Self {
            weights,
            fuzzy_threshold,
        }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
        }
    }

    /// Filter and rank a catalog against a search intent.
    ///
    /// Returns derived copies of the qualifying events, each carrying its
    /// relevance score, ordered best-first. Ties keep catalog input order.
    pub fn filter_events(&self, catalog: &[Event], intent: &FilterIntent) -> Vec<ScoredEvent> {
        let criteria = Criteria::resolve(intent);

        let mut scored: Vec<ScoredEvent> = catalog
            .iter()
            .filter_map(|event| {
                score_event(event, &criteria, &self.weights, self.fuzzy_threshold).map(|score| {
                    ScoredEvent {
                        event: event.clone(),
                        relevance_score: score,
                    }
                })
            })
            .collect();

        // Stable sort: equal scores keep their catalog order.
        scored.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
        scored
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

/// Truncate a ranked list to the caller's limit.
///
/// Performs no scoring; reports the pre-truncation total so the caller can
/// render "n shown of m found".
pub fn present(ranked: Vec<ScoredEvent>, limit: usize) -> SearchPage {
    let total = ranked.len();
    let mut events = ranked;
    events.truncate(limit);
    SearchPage { events, total }
}
