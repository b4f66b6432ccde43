use std::collections::HashSet;

use crate::core::normalize::{normalize, tokenize};

/// Known colloquial variants for search and category keywords.
///
/// Keys and values are stored normalized (lower-case, unaccented). Entries
/// always include the key itself.
const SYNONYMS: &[(&str, &[&str])] = &[
    ("concert", &["concert", "musique", "live"]),
    ("musique", &["musique", "concert", "live", "son"]),
    ("football", &["football", "foot", "match"]),
    ("foot", &["foot", "football", "match"]),
    ("sport", &["sport", "football", "foot", "match", "marathon"]),
    ("cinema", &["cinema", "film", "projection", "seance"]),
    ("film", &["film", "cinema", "projection"]),
    ("theatre", &["theatre", "piece", "spectacle"]),
    ("soiree", &["soiree", "fete", "club", "afterwork"]),
    ("fete", &["fete", "soiree", "celebration"]),
    ("exposition", &["exposition", "expo", "vernissage"]),
    ("formation", &["formation", "atelier", "workshop", "seminaire"]),
    ("conference", &["conference", "seminaire", "panel"]),
    ("gastronomie", &["gastronomie", "cuisine", "degustation"]),
    ("gratuit", &["gratuit", "libre", "free"]),
];

/// Canonical categories with the keywords that betray them in free text.
///
/// Scanned in order; the first category with a matching keyword wins, so
/// more specific vocabularies come first.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "musique",
        &[
            "concert", "musique", "live", "jazz", "dj", "afrobeat", "rap", "slam", "orchestre",
            "chorale",
        ],
    ),
    (
        "sport",
        &[
            "sport", "football", "foot", "match", "marathon", "basketball", "course",
            "competition", "tournoi", "fitness",
        ],
    ),
    (
        "culture",
        &[
            "culture", "exposition", "art", "theatre", "musee", "danse", "spectacle",
            "vernissage", "patrimoine", "vodoun",
        ],
    ),
    ("cinema", &["cinema", "film", "projection", "seance"]),
    ("soiree", &["soiree", "fete", "club", "afterwork", "gala"]),
    (
        "formation",
        &["formation", "atelier", "workshop", "seminaire", "conference", "masterclass"],
    ),
    ("gastronomie", &["gastronomie", "cuisine", "degustation", "brunch", "marche"]),
    ("business", &["business", "entrepreneuriat", "startup", "networking", "tech"]),
    ("famille", &["famille", "enfants", "jeunesse", "kermesse"]),
    ("religion", &["religion", "spiritualite", "ceremonie", "culte"]),
    ("mode", &["mode", "beaute", "defile", "lifestyle"]),
];

/// The canonical category labels, in scan order.
pub fn canonical_categories() -> Vec<&'static str> {
    CATEGORY_KEYWORDS.iter().map(|(c, _)| *c).collect()
}

/// Expand a term into itself plus its known colloquial variants.
///
/// Unknown terms map to a singleton set containing just themselves.
pub fn get_synonyms(term: &str) -> HashSet<String> {
    let norm = normalize(term);
    let mut set = HashSet::new();
    if norm.is_empty() {
        return set;
    }
    set.insert(norm.clone());

    for (key, variants) in SYNONYMS {
        if *key == norm {
            set.extend(variants.iter().map(|v| v.to_string()));
        }
    }
    set
}

/// Scan free text for known category keywords and return the first
/// matching canonical category, or `None` when nothing is recognized.
///
/// Matching is token-based so "art" does not fire inside "partir".
pub fn detect_category(text: &str) -> Option<&'static str> {
    let tokens: HashSet<String> = tokenize(text).into_iter().collect();
    if tokens.is_empty() {
        return None;
    }

    for (category, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|k| tokens.contains(*k)) {
            return Some(category);
        }
    }
    None
}
