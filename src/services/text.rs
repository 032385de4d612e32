//! Text normalization for descriptions and genre strings
//!
//! Produces a canonical bag-of-words string: lower-cased word tokens, with
//! non-alphanumeric tokens and English stop words removed, each reduced to a
//! dictionary-style lemma. Output is a fixed point of `normalize`.

use std::collections::HashSet;
use std::sync::OnceLock;
use unicode_segmentation::UnicodeSegmentation;

/// English stop words (NLTK list)
static STOP_WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();

fn get_stop_words() -> &'static HashSet<&'static str> {
    STOP_WORDS.get_or_init(|| {
        [
            "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're",
            "you've", "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him",
            "his", "himself", "she", "she's", "her", "hers", "herself", "it", "it's", "its",
            "itself", "they", "them", "their", "theirs", "themselves", "what", "which", "who",
            "whom", "this", "that", "that'll", "these", "those", "am", "is", "are", "was",
            "were", "be", "been", "being", "have", "has", "had", "having", "do", "does", "did",
            "doing", "a", "an", "the", "and", "but", "if", "or", "because", "as", "until",
            "while", "of", "at", "by", "for", "with", "about", "against", "between", "into",
            "through", "during", "before", "after", "above", "below", "to", "from", "up",
            "down", "in", "out", "on", "off", "over", "under", "again", "further", "then",
            "once", "here", "there", "when", "where", "why", "how", "all", "any", "both",
            "each", "few", "more", "most", "other", "some", "such", "no", "nor", "not", "only",
            "own", "same", "so", "than", "too", "very", "s", "t", "can", "will", "just", "don",
            "don't", "should", "should've", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain",
            "aren", "aren't", "couldn", "couldn't", "didn", "didn't", "doesn", "doesn't",
            "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn", "isn't", "ma",
            "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
            "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
            "wouldn", "wouldn't",
        ]
        .iter()
        .copied()
        .collect()
    })
}

pub fn is_stop_word(word: &str) -> bool {
    get_stop_words().contains(word)
}

/// Irregular plurals that suffix rules cannot recover
const IRREGULAR_LEMMAS: &[(&str, &str)] = &[
    ("children", "child"),
    ("feet", "foot"),
    ("geese", "goose"),
    ("halves", "half"),
    ("knives", "knife"),
    ("leaves", "leaf"),
    ("lives", "life"),
    ("men", "man"),
    ("mice", "mouse"),
    ("teeth", "tooth"),
    ("thieves", "thief"),
    ("wives", "wife"),
    ("wolves", "wolf"),
    ("women", "woman"),
];

/// Words ending in "s" that are already base forms
const INVARIANT_S_WORDS: &[&str] = &[
    "always", "athletics", "atlas", "bias", "canvas", "chaos", "christmas", "crossroads",
    "economics", "ethics", "gymnastics", "headquarters", "lens", "mathematics", "means",
    "measles", "news", "perhaps", "physics", "politics", "series", "species", "towards",
    "whereas",
];

/// Base forms ending in "ie" or "che"; their plurals only drop the final "s"
const E_ENDING_BASES: &[&str] = &[
    "avalanche", "backache", "brownie", "cache", "calorie", "cliche", "cookie", "earache",
    "genie", "goalie", "groupie", "headache", "heartache", "hippie", "hoodie", "magpie",
    "moustache", "movie", "mustache", "necktie", "newbie", "niche", "pixie", "prairie",
    "quiche", "rookie", "selfie", "smoothie", "toothache", "zombie",
];

/// Suffix rewrites, tried in order; the first match wins
const SUFFIX_RULES: &[(&str, &str)] = &[
    ("sses", "ss"),
    ("zzes", "zz"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("xes", "x"),
];

/// One rewrite step, or None when the word is already a base form
fn lemma_step(word: &str) -> Option<String> {
    if let Some((_, lemma)) = IRREGULAR_LEMMAS.iter().find(|(plural, _)| *plural == word) {
        return Some(lemma.to_string());
    }

    if INVARIANT_S_WORDS.contains(&word) {
        return None;
    }
    if let Some(stem) = word.strip_suffix('s') {
        if E_ENDING_BASES.contains(&stem) {
            return Some(stem.to_string());
        }
    }

    let len = word.chars().count();
    if len <= 3 || !word.is_ascii() {
        return None;
    }

    for (suffix, replacement) in SUFFIX_RULES {
        if let Some(stem) = word.strip_suffix(suffix) {
            return Some(format!("{}{}", stem, replacement));
        }
    }

    if let Some(stem) = word.strip_suffix("ies") {
        if stem.len() >= 2 {
            return Some(format!("{}y", stem));
        }
    }

    if word.ends_with('s') && !["ss", "us", "is"].iter().any(|end| word.ends_with(end)) {
        return Some(word[..word.len() - 1].to_string());
    }

    None
}

/// Reduces a lower-case word to its lemma.
///
/// Rules are applied until none matches, so `lemmatize(lemmatize(w)) == lemmatize(w)`.
pub fn lemmatize(word: &str) -> String {
    let mut current = word.to_string();
    while let Some(next) = lemma_step(&current) {
        if next == current {
            break;
        }
        current = next;
    }
    current
}

/// Lower-cases and splits text into word tokens
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .unicode_words()
        .map(str::to_string)
        .collect()
}

fn is_alphanumeric_token(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphanumeric)
}

/// Normalizes free text into space-separated lemmas.
///
/// Missing text normalizes to the empty string.
pub fn normalize(text: Option<&str>) -> String {
    let Some(text) = text else {
        return String::new();
    };

    tokenize(text)
        .into_iter()
        .filter(|token| is_alphanumeric_token(token) && !is_stop_word(token))
        .map(|token| lemmatize(&token))
        .filter(|lemma| !is_stop_word(lemma))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalizes a genre list as one document
pub fn normalize_labels(labels: &[String]) -> String {
    normalize(Some(&labels.join(" ")))
}
