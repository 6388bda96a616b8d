//! Text normalization for theme matching.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Turns review text into a sequence of lowercase base-form lemmas
/// with stopwords and punctuation removed.
pub trait Lemmatizer {
    fn lemmatize(&self, text: &str) -> Vec<String>;
}

/// Rule-based lemmatizer: stopword filtering plus suffix stripping
/// with a small irregular-form table.
///
/// This is deliberately lighter than a full morphological analyzer;
/// the theme trigger terms are already base forms, so it only needs to
/// map the inflections that actually occur in app-store reviews
/// (crashing → crash, failed → fail, issues → issue, ...).
#[derive(Debug, Default, Clone)]
pub struct RuleLemmatizer;

static STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "about", "after", "again", "all", "also", "am", "an", "and", "any", "are", "as", "at",
        "be", "because", "been", "before", "being", "but", "by", "can", "did", "do", "does",
        "doing", "down", "for", "from", "had", "has", "have", "having", "he", "her", "here",
        "hers", "him", "his", "how", "i", "if", "in", "into", "is", "it", "its", "just", "me",
        "more", "most", "my", "no", "not", "now", "of", "off", "on", "once", "only", "or", "our",
        "out", "over", "own", "please", "she", "so", "some", "such", "than", "that", "the",
        "their", "them", "then", "there", "these", "they", "this", "those", "through", "to",
        "too", "under", "until", "up", "very", "was", "we", "were", "what", "when", "where",
        "which", "while", "who", "why", "will", "with", "would", "you", "your",
    ]
    .into_iter()
    .collect()
});

/// Inflections the suffix rules would get wrong.
const IRREGULAR: [(&str, &str); 10] = [
    ("froze", "freeze"),
    ("frozen", "freeze"),
    ("freezing", "freeze"),
    ("went", "go"),
    ("worse", "bad"),
    ("worst", "bad"),
    ("better", "good"),
    ("best", "good"),
    ("fees", "fee"),
    ("charges", "charge"),
];

impl Lemmatizer for RuleLemmatizer {
    fn lemmatize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|ch: char| !ch.is_alphabetic())
            .filter(|token| !token.is_empty() && !STOPWORDS.contains(token))
            .map(lemma_of)
            .collect()
    }
}

fn lemma_of(token: &str) -> String {
    if let Some((_, base)) = IRREGULAR.iter().find(|(form, _)| *form == token) {
        return (*base).to_string();
    }
    strip_suffix(token)
}

/// Suffix stripping in priority order. Each rule keeps a minimum stem
/// length so short words like "bug" or "fee" pass through untouched.
fn strip_suffix(token: &str) -> String {
    if let Some(stem) = token.strip_suffix("ing")
        && stem.len() >= 3
    {
        return undouble(stem);
    }
    if let Some(stem) = token.strip_suffix("ied")
        && stem.len() >= 2
    {
        return format!("{stem}y");
    }
    if let Some(stem) = token.strip_suffix("ed")
        && stem.len() >= 3
    {
        return undouble(stem);
    }
    if let Some(stem) = token.strip_suffix("ies")
        && stem.len() >= 2
    {
        return format!("{stem}y");
    }
    for plural in ["sses", "shes", "ches", "xes", "zes"] {
        if let Some(stem) = token.strip_suffix(plural) {
            return format!("{stem}{}", &plural[..plural.len() - 2]);
        }
    }
    if let Some(stem) = token.strip_suffix('s')
        && stem.len() >= 3
        && !stem.ends_with('s')
        && !stem.ends_with('u')
        && !stem.ends_with('i')
    {
        return stem.to_string();
    }
    token.to_string()
}

/// Collapse the doubled final consonant left by -ing/-ed stripping
/// (running → runn → run) while keeping legitimate doubles that end
/// real stems (e.g. "press" keeps its double s via the ss exemption).
fn undouble(stem: &str) -> String {
    let bytes = stem.as_bytes();
    if bytes.len() >= 2 {
        let last = bytes[bytes.len() - 1];
        let prev = bytes[bytes.len() - 2];
        if last == prev && last.is_ascii_alphabetic() && !matches!(last, b's' | b'l' | b'e' | b'o') {
            return stem[..stem.len() - 1].to_string();
        }
    }
    stem.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lemmas(text: &str) -> Vec<String> {
        RuleLemmatizer.lemmatize(text)
    }

    #[test]
    fn lemmatizes_and_removes_stopwords() {
        assert_eq!(
            lemmas("The app was crashing and running very slowly"),
            vec!["app", "crash", "run", "slowly"]
        );
    }

    #[test]
    fn strips_common_inflections() {
        assert_eq!(lemmas("crashed crashes crashing"), vec!["crash", "crash", "crash"]);
        assert_eq!(lemmas("failed transfers"), vec!["fail", "transfer"]);
        assert_eq!(lemmas("issues fixed"), vec!["issue", "fix"]);
        assert_eq!(lemmas("app keeps freezing"), vec!["app", "keep", "freeze"]);
    }

    #[test]
    fn keeps_short_words_intact() {
        assert_eq!(lemmas("bug fee ui otp"), vec!["bug", "fee", "ui", "otp"]);
    }

    #[test]
    fn punctuation_and_digits_are_separators() {
        assert_eq!(lemmas("login... 2x OTP-code!!"), vec!["login", "x", "otp", "code"]);
    }

    #[test]
    fn empty_text_yields_no_lemmas() {
        assert!(lemmas("").is_empty());
        assert!(lemmas("   \t ").is_empty());
    }
}
