//! Forgiving comparison of typed names

/// Lowercase and drop every whitespace character
pub fn normalize_name(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Compares free-text guesses against feature names
///
/// Both sides are normalized, then accepted when their Levenshtein distance
/// is at most `max_edit_distance`. The default of 1 lets one typo or one
/// dropped diacritic through ("Orense" for "Ourense", "acoruna" for "A Coruña").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameMatcher {
    max_edit_distance: usize,
}

impl Default for NameMatcher {
    fn default() -> Self {
        Self { max_edit_distance: 1 }
    }
}

impl NameMatcher {
    pub fn new(max_edit_distance: usize) -> Self {
        Self { max_edit_distance }
    }

    pub fn is_match(&self, guess: &str, target: &str) -> bool {
        strsim::levenshtein(&normalize_name(guess), &normalize_name(target)) <= self.max_edit_distance
    }
}

/// `NameMatcher::default().is_match(guess, target)`
pub fn is_match(guess: &str, target: &str) -> bool {
    NameMatcher::default().is_match(guess, target)
}
