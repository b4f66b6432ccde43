use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonicalize free text for comparison.
///
/// Lower-cases, trims surrounding whitespace, and strips diacritical marks
/// by decomposing to NFD and discarding combining marks, so "Bénin" and
/// "Benin" compare equal. Empty input yields an empty string.
pub fn normalize(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Split normalized text into alphanumeric tokens.
///
/// Hyphens, apostrophes and punctuation all act as separators, so
/// "abomey-calavi" and "d'art" each yield their component words.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
