use chrono::NaiveDate;

use crate::core::fuzzy::fuzzy_match;
use crate::core::lexicon::{detect_category, get_synonyms};
use crate::core::normalize::normalize;
use crate::models::{Event, FilterIntent, ScoringWeights};

/// Query words at or below this length are noise tokens and are dropped.
const MAX_NOISE_WORD_LEN: usize = 2;

/// A `FilterIntent` resolved into comparable criteria.
///
/// Resolution is lenient: unparseable dates, blank strings, and other
/// malformed fields degrade to absent criteria instead of failing the
/// filter pass.
#[derive(Debug, Clone)]
pub struct Criteria {
    /// Normalized target city.
    pub city: Option<String>,
    /// Requested date window, end defaulting to start.
    pub window: Option<(NaiveDate, NaiveDate)>,
    /// Normalized significant query words.
    pub query_words: Vec<String>,
    /// Normalized category term widened through the synonym table.
    pub category_terms: Vec<String>,
    /// Canonical category detected from the intent's category term.
    pub category_canonical: Option<&'static str>,
    /// Requested free/paid status.
    pub free: Option<bool>,
}

impl Criteria {
    pub fn resolve(intent: &FilterIntent) -> Self {
        let city = intent
            .city
            .as_deref()
            .map(normalize)
            .filter(|c| !c.is_empty());

        let window = parse_date(intent.date_start.as_deref()).map(|start| {
            let end = parse_date(intent.date_end.as_deref()).unwrap_or(start);
            (start, end)
        });

        let query_words = intent
            .search_query
            .as_deref()
            .map(|q| {
                normalize(q)
                    .split_whitespace()
                    .filter(|w| w.chars().count() > MAX_NOISE_WORD_LEN)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let category = intent
            .category
            .as_deref()
            .map(normalize)
            .filter(|c| !c.is_empty());
        let category_terms = category
            .as_deref()
            .map(|c| {
                let mut terms: Vec<String> = get_synonyms(c).into_iter().collect();
                terms.sort();
                terms
            })
            .unwrap_or_default();
        let category_canonical = category.as_deref().and_then(detect_category);

        Self {
            city,
            window,
            query_words,
            category_terms,
            category_canonical,
            free: intent.is_free,
        }
    }
}

/// Lenient ISO date parsing: anything unparseable counts as absent.
fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    raw.and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
}

/// Evaluate one event against the resolved criteria.
///
/// Returns the relevance score when the event qualifies, or `None` when a
/// semi-blocking criterion excludes it. Events are evaluated independently;
/// no state flows between calls.
pub fn score_event(
    event: &Event,
    criteria: &Criteria,
    weights: &ScoringWeights,
    fuzzy_threshold: f64,
) -> Option<i64> {
    let mut score = 0;

    let title_norm = normalize(&event.title);
    let desc_norm = normalize(&event.description);
    let city_norm = normalize(&event.city);

    // City: hard requirement when requested, lenient about where the
    // city text appears.
    if let Some(target) = &criteria.city {
        if city_norm.contains(target.as_str()) {
            score += weights.city;
        } else if desc_norm.contains(target.as_str()) {
            score += weights.city_mention;
        } else if fuzzy_match(target, &city_norm, fuzzy_threshold) {
            score += weights.city_fuzzy;
        } else {
            return None;
        }
    }

    // Date: events outside the requested window are off-topic, and an
    // event without a parsed date cannot overlap any window.
    if let Some((from, to)) = criteria.window {
        match event.date_window() {
            Some((ev_start, ev_end)) if ev_start <= to && ev_end >= from => {
                score += weights.date_overlap;
            }
            _ => return None,
        }
    }

    // Category: boost only, widened through synonyms so the user's
    // phrasing need not match the catalog's vocabulary.
    if !criteria.category_terms.is_empty() && category_matches(event, criteria) {
        score += weights.category;
    }

    // Free flag: boost when the event's effective status matches.
    if let Some(want_free) = criteria.free {
        if event.effectively_free() == want_free {
            score += weights.free;
        }
    }

    // Free-text query: per-word scoring, title outranking description.
    // A word may score in both at once.
    if !criteria.query_words.is_empty() {
        let mut found_word = false;
        for word in &criteria.query_words {
            if title_norm.contains(word.as_str()) {
                score += weights.title_word;
                found_word = true;
            }
            if desc_norm.contains(word.as_str()) {
                score += weights.description_word;
                found_word = true;
            }
        }
        if !found_word {
            return None;
        }
    } else {
        score += weights.baseline;
    }

    Some(score)
}

/// Category match: the event's own label against the widened term set,
/// falling back to category detection over the event's text.
fn category_matches(event: &Event, criteria: &Criteria) -> bool {
    let event_cat = normalize(event.category.as_deref().unwrap_or(""));
    if !event_cat.is_empty()
        && criteria
            .category_terms
            .iter()
            .any(|t| event_cat.contains(t.as_str()) || t.contains(event_cat.as_str()))
    {
        return true;
    }

    match criteria.category_canonical {
        Some(wanted) => {
            let text = format!("{} {}", event.title, event.description);
            detect_category(&text) == Some(wanted)
        }
        None => false,
    }
}
