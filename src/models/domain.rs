use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Normalized event record from the catalog feed.
///
/// Every field the rendering layer displays is carried here untouched:
/// title, city, dates, link, price/free flag, category, image, description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub city: String,
    #[serde(rename = "venueName", default)]
    pub venue_name: String,
    #[serde(rename = "dateStart", default)]
    pub date_start: Option<NaiveDate>,
    #[serde(rename = "dateEnd", default)]
    pub date_end: Option<NaiveDate>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(rename = "isFree", default)]
    pub is_free: bool,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub views: i64,
    #[serde(rename = "isFeatured", default)]
    pub is_featured: bool,
}

impl Default for Event {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            city: String::new(),
            venue_name: String::new(),
            date_start: None,
            date_end: None,
            category: None,
            price: 0.0,
            is_free: false,
            link: None,
            image: None,
            views: 0,
            is_featured: false,
        }
    }
}

impl Event {
    /// Effective free status: the explicit flag, or a zero price.
    pub fn effectively_free(&self) -> bool {
        self.is_free || self.price <= 0.0
    }

    /// Event date window, with the end defaulting to the start for
    /// single-day events. `None` when the event carries no parsed date.
    pub fn date_window(&self) -> Option<(NaiveDate, NaiveDate)> {
        let start = self.date_start?;
        Some((start, self.date_end.unwrap_or(start)))
    }
}

/// Search criteria extracted upstream from the user's message.
///
/// Every field is optional and loosely typed: the extraction collaborator
/// is best-effort and may produce incomplete or fabricated values. Dates
/// arrive as raw ISO strings and are parsed leniently by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterIntent {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub date_start: Option<String>,
    #[serde(default)]
    pub date_end: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub search_query: Option<String>,
    #[serde(default)]
    pub is_free: Option<bool>,
}

impl FilterIntent {
    /// True when no criterion is set at all.
    pub fn is_empty(&self) -> bool {
        self.city.is_none()
            && self.date_start.is_none()
            && self.date_end.is_none()
            && self.category.is_none()
            && self.search_query.is_none()
            && self.is_free.is_none()
    }
}

/// An event that survived filtering, annotated with its transient score.
///
/// The score is meaningful only within the filtering call that produced
/// it. Wrapping a derived copy keeps the caller's catalog untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredEvent {
    #[serde(flatten)]
    pub event: Event,
    #[serde(rename = "relevanceScore")]
    pub relevance_score: i64,
}

/// A bounded page of ranked results plus the total survivor count, for
/// caller-side "n shown of m found" messaging.
#[derive(Debug, Clone)]
pub struct SearchPage {
    pub events: Vec<ScoredEvent>,
    pub total: usize,
}

/// One turn of the conversation history exchanged with the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Scoring weights for the matching engine.
///
/// Reference values, not physical law: every bonus is tunable through the
/// configuration layer. Higher is better; exclusion is never expressed as
/// a low score.
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    /// Intent city found in the event's city field.
    pub city: i64,
    /// Intent city only mentioned in the description.
    pub city_mention: i64,
    /// Intent city matched fuzzily against the city field.
    pub city_fuzzy: i64,
    /// Event window overlaps the requested date window.
    pub date_overlap: i64,
    /// Query word found in the title, per word.
    pub title_word: i64,
    /// Query word found in the description, per word.
    pub description_word: i64,
    /// Category matched through the synonym table.
    pub category: i64,
    /// Free/paid status matches the request.
    pub free: i64,
    /// Flat score for events evaluated without a text query.
    pub baseline: i64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            city: 50,
            city_mention: 20,
            city_fuzzy: 35,
            date_overlap: 40,
            title_word: 100,
            description_word: 30,
            category: 60,
            free: 15,
            baseline: 10,
        }
    }
}
