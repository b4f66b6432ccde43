// Core algorithm exports
pub mod engine;
pub mod fuzzy;
pub mod lexicon;
pub mod normalize;
pub mod scoring;

pub use engine::{present, Engine, DEFAULT_FUZZY_THRESHOLD};
pub use fuzzy::{fuzzy_match, similarity};
pub use lexicon::{detect_category, get_synonyms};
pub use normalize::normalize;
pub use scoring::{score_event, Criteria};
