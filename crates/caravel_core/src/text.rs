//! Text normalization for fuzzy title matching.

use regex::Regex;
use std::sync::OnceLock;

fn non_word() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w]").expect("Valid word-character regex"))
}

/// Normalize a title for case/whitespace/punctuation-insensitive comparison:
/// strip every character that is not a letter, digit, or underscore, then
/// lowercase.
///
/// # Examples
///
/// ```
/// use caravel_core::normalize_title;
///
/// assert_eq!(
///     normalize_title("Mon Super Vidéo!!"),
///     normalize_title("Mon, Super.Vidéo"),
/// );
/// ```
pub fn normalize_title(title: &str) -> String {
    non_word().replace_all(title, "").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_whitespace() {
        assert_eq!(normalize_title("Mon Super Vidéo!!"), "monsupervidéo");
    }

    #[test]
    fn matches_across_punctuation_variants() {
        assert_eq!(
            normalize_title("Mon Super Vidéo!!"),
            normalize_title("Mon, Super.Vidéo")
        );
    }

    #[test]
    fn keeps_digits_and_underscores() {
        assert_eq!(normalize_title("Classe_A 12"), "classe_a12");
    }
}
