// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Coarse part-of-speech tagging for the adjective/noun ratio
//!
//! Only adjectives and nouns matter to the explanation layer, so every
//! word is tagged as one of those two or `Other`. Tagging goes closed-class
//! words first, then lexicons, then suffix rules; open-class words that
//! match nothing default to nouns. A participle after a degree modifier
//! counts as an adjective.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Adjective,
    Noun,
    Other,
}

/// Adjective and noun counts for one text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagCounts {
    pub adjectives: usize,
    pub nouns: usize,
}

const CLOSED_CLASS: &[&str] = &[
    // Determiners and quantifiers
    "a", "an", "the", "this", "that", "these", "those", "some", "any", "each", "every", "all",
    "both", "either", "neither", "no", "much", "many", "more", "few", "several", "such",
    // Pronouns
    "i", "me", "my", "mine", "myself", "we", "us", "our", "ours", "ourselves", "you", "your",
    "yours", "he", "him", "his", "she", "her", "hers", "it", "its", "they", "them", "their",
    "theirs", "what", "which", "who", "whom", "whose", "something", "anything", "everything",
    "nothing", "someone", "anyone", "everyone",
    // Prepositions and conjunctions
    "about", "above", "after", "against", "ago", "along", "among", "around", "as", "at",
    "before", "behind", "below", "between", "by", "during", "for", "from", "in", "into", "of",
    "off", "on", "onto", "out", "over", "per", "since", "than", "through", "to", "toward",
    "under", "until", "up", "upon", "with", "within", "without", "and", "but", "or", "nor", "so",
    "yet", "because", "if", "while", "although", "though", "unless", "whether",
    // Auxiliaries and modals
    "am", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "having",
    "do", "does", "did", "done", "can", "could", "will", "would", "shall", "should", "may",
    "might", "must", "isn't", "aren't", "wasn't", "weren't", "don't", "doesn't", "didn't",
    "can't", "won't", "wouldn't", "couldn't", "shouldn't", "i'm", "it's", "i've", "we've",
    // Adverbs and particles
    "not", "never", "ever", "always", "very", "really", "too", "also", "just", "only", "even",
    "still", "already", "again", "here", "there", "now", "then", "when", "where", "why", "how",
    "well", "quite", "rather", "almost", "overall", "soon", "once", "twice", "yes",
];

const ADJECTIVES: &[&str] = &[
    // Quality and appearance
    "affordable", "amazing", "attractive", "awesome", "awful", "awkward", "bad", "basic",
    "beautiful", "best", "better", "bland", "bold", "bright", "brilliant", "charming", "cheap",
    "chic", "classy", "clean", "clear", "clever", "clumsy", "comfortable", "compact", "cool",
    "cozy", "crappy", "crisp", "cute", "decent", "delicate", "delightful", "dirty", "dull",
    "durable", "elegant", "excellent", "exceptional", "exquisite", "fabulous", "fancy",
    "fantastic", "faulty", "fine", "flawless", "flimsy", "fragile", "genuine", "glorious",
    "glossy", "gorgeous", "good", "grand", "great", "gross", "handsome", "handy", "horrendous",
    "horrible", "ideal", "impressive", "incredible", "junky", "lousy", "lovely", "lush",
    "magnificent", "marvelous", "mediocre", "messy", "modern", "nasty", "neat", "nice", "noisy",
    "okay", "ordinary", "outstanding", "overpriced", "perfect", "plain", "pleasant", "plush",
    "poor", "premium", "pricey", "pristine", "robust", "rugged", "rusty", "shiny", "sleek",
    "slim", "smart", "smooth", "snug", "solid", "spacious", "splendid", "stable", "stale",
    "sturdy", "stylish", "superb", "superior", "tasty", "terrible", "terrific", "tremendous",
    "trendy", "ugly", "unique", "vibrant", "vivid", "wonderful", "worse", "worst", "yummy",
    // Size, shape, and physical properties
    "big", "broad", "cold", "dark", "deep", "dense", "empty", "enormous", "fat", "flat", "giant",
    "hard", "heavy", "high", "hot", "huge", "immense", "large", "lightweight", "little", "long",
    "loose", "loud", "low", "massive", "narrow", "quiet", "rigid", "rough", "round", "sharp",
    "short", "silent", "small", "soft", "stiff", "sticky", "thick", "thin", "tight", "tiny",
    "tall", "vast", "warm", "wet", "wide",
    // Colors
    "black", "blue", "brown", "golden", "gray", "green", "grey", "pink", "purple", "red",
    "silver", "white", "yellow",
    // Evaluation, feeling, and behavior
    "accurate", "adequate", "average", "busy", "calm", "certain", "common", "complete",
    "convenient", "correct", "crazy", "crucial", "different", "difficult", "direct", "eager",
    "easy", "efficient", "entire", "exact", "expensive", "extra", "fair", "false", "familiar",
    "fast", "fierce", "firm", "free", "fresh", "friendly", "full", "funny", "gentle", "glad",
    "happy", "harsh", "healthy", "important", "inexpensive", "intense", "kind", "lazy", "light",
    "lucky", "mad", "main", "mild", "minor", "modest", "natural", "new", "normal", "obvious",
    "odd", "old", "polite", "popular", "positive", "powerful", "precise", "proper", "proud",
    "pure", "quick", "rare", "ready", "real", "recent", "regular", "reliable", "responsive",
    "rich", "right", "rude", "sad", "safe", "scary", "secure", "serious", "silly", "similar",
    "simple", "slow", "sorry", "special", "steady", "strong", "stupid", "subtle", "sure",
    "sweet", "top", "total", "tough", "tricky", "true", "typical", "unusual", "upset", "useful",
    "usual", "vague", "valid", "weak", "weird", "whole", "wild", "wise", "worthy", "wrong",
    "young",
    // Participles used as adjectives
    "annoying", "appealing", "astonishing", "boring", "breathtaking", "confusing", "convincing",
    "disappointing", "disgusting", "exciting", "frustrating", "interesting", "misleading",
    "pleasing", "promising", "refreshing", "relaxing", "rewarding", "satisfying", "shocking",
    "soothing", "striking", "stunning", "surprising", "thrilling", "advanced", "beloved",
    "complicated", "cracked", "damaged", "dedicated", "delighted", "detailed", "disappointed",
    "excited", "frustrated", "impressed", "limited", "overrated", "pleased", "satisfied",
    "sophisticated", "talented", "thrilled", "tired", "underrated",
];

/// Words after which an `-ing` or `-ed` form reads as an adjective
const DEGREE_MODIFIERS: &[&str] = &[
    "so", "very", "really", "too", "quite", "extremely", "incredibly", "absolutely", "truly",
    "totally", "super", "highly", "most", "more", "less", "least", "fairly", "rather",
];

/// Frequent review verbs that suffix rules would otherwise tag as nouns
const VERBS: &[&str] = &[
    "arrive", "arrived", "break", "bought", "broke", "buy", "came", "charge", "come", "feel",
    "feels", "get", "gets", "got", "give", "go", "goes", "hate", "keep", "know", "last", "lasts",
    "like", "love", "loves", "made", "make", "need", "put", "recommend", "run", "runs", "say",
    "see", "seems", "take", "think", "try", "use", "used", "want", "went", "work", "works",
];

const ADJECTIVE_SUFFIXES: &[&str] = &[
    "ful", "ous", "ive", "able", "ible", "less", "ish", "ic", "ical", "est", "al",
];

const OTHER_SUFFIXES: &[&str] = &["ly", "ed", "ing"];

/// Rule-based tagger over fixed word lists
#[derive(Debug, Clone)]
pub struct Tagger {
    closed_class: HashSet<&'static str>,
    adjectives: HashSet<&'static str>,
    verbs: HashSet<&'static str>,
    degree_modifiers: HashSet<&'static str>,
}

impl Default for Tagger {
    fn default() -> Self {
        Self::new()
    }
}

impl Tagger {
    pub fn new() -> Self {
        Self {
            closed_class: CLOSED_CLASS.iter().copied().collect(),
            adjectives: ADJECTIVES.iter().copied().collect(),
            verbs: VERBS.iter().copied().collect(),
            degree_modifiers: DEGREE_MODIFIERS.iter().copied().collect(),
        }
    }

    pub fn tag_word(&self, word: &str) -> Tag {
        let lower = word.to_lowercase();
        let lower = lower.as_str();

        if lower.is_empty() || lower.chars().any(|c| c.is_ascii_digit()) {
            return Tag::Other;
        }
        if self.closed_class.contains(lower) {
            return Tag::Other;
        }
        if self.adjectives.contains(lower) {
            return Tag::Adjective;
        }
        if self.verbs.contains(lower) {
            return Tag::Other;
        }
        // Suffix rules need a stem, so short words skip them
        if lower.chars().count() > 4 {
            if ADJECTIVE_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix)) {
                return Tag::Adjective;
            }
            if OTHER_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix)) {
                return Tag::Other;
            }
        }
        Tag::Noun
    }

    /// Tag a word given the word before it
    ///
    /// A participle right after a degree modifier ("so polished") is an adjective.
    pub fn tag_in_context(&self, previous: Option<&str>, word: &str) -> Tag {
        let tag = self.tag_word(word);
        if tag != Tag::Other {
            return tag;
        }
        let lower = word.to_lowercase();
        let participle = lower.chars().count() > 4 && (lower.ends_with("ing") || lower.ends_with("ed"));
        let modified =
            previous.is_some_and(|p| self.degree_modifiers.contains(p.to_lowercase().as_str()));
        if participle && modified {
            Tag::Adjective
        } else {
            tag
        }
    }

    /// Count adjectives and nouns in a text
    pub fn count(&self, text: &str) -> TagCounts {
        let mut counts = TagCounts::default();
        let mut previous = None;
        for word in words(text) {
            match self.tag_in_context(previous, word) {
                Tag::Adjective => counts.adjectives += 1,
                Tag::Noun => counts.nouns += 1,
                Tag::Other => {}
            }
            previous = Some(word);
        }
        counts
    }
}

/// Word tokens: runs of alphanumerics and apostrophes, punctuation dropped
fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|word| word.trim_matches('\''))
        .filter(|word| !word.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_words() {
        let tagger = Tagger::new();
        assert_eq!(tagger.tag_word("AMAZING"), Tag::Adjective);
        assert_eq!(tagger.tag_word("product"), Tag::Noun);
        assert_eq!(tagger.tag_word("ever"), Tag::Other);
        assert_eq!(tagger.tag_word("wonderful"), Tag::Adjective);
        assert_eq!(tagger.tag_word("quickly"), Tag::Other);
        assert_eq!(tagger.tag_word("battery"), Tag::Noun);
        assert_eq!(tagger.tag_word("3"), Tag::Other);
    }

    #[test]
    fn test_count_short_hype() {
        let tagger = Tagger::new();
        let counts = tagger.count("AMAZING!!! Best product ever!!!");
        assert_eq!(counts, TagCounts { adjectives: 2, nouns: 1 });
    }

    #[test]
    fn test_count_descriptive_review() {
        let tagger = Tagger::new();
        let counts = tagger.count("Bought this laptop for school. The battery lasts six hours.");
        assert_eq!(counts.adjectives, 0);
        assert!(counts.nouns >= 4, "nouns: {}", counts.nouns);
    }

    #[test]
    fn test_count_adjective_heavy() {
        let tagger = Tagger::new();
        let counts = tagger.count("Beautiful, wonderful, perfect, gorgeous, flawless gift!");
        assert_eq!(counts.adjectives, 5);
        assert_eq!(counts.nouns, 1);
    }

    #[test]
    fn test_review_adjectives_outside_core_list() {
        let tagger = Tagger::new();
        assert_eq!(tagger.tag_word("stunning"), Tag::Adjective);
        assert_eq!(tagger.tag_word("elegant"), Tag::Adjective);
        assert_eq!(tagger.tag_word("Sleek"), Tag::Adjective);
        assert_eq!(tagger.tag_word("sturdy"), Tag::Adjective);

        let counts = tagger.count("Stunning, elegant and sleek design");
        assert_eq!(counts, TagCounts { adjectives: 3, nouns: 1 });
    }

    #[test]
    fn test_participle_after_degree_modifier() {
        let tagger = Tagger::new();
        assert_eq!(tagger.tag_in_context(Some("so"), "polished"), Tag::Adjective);
        assert_eq!(tagger.tag_in_context(Some("it"), "polished"), Tag::Other);
        assert_eq!(tagger.tag_in_context(None, "polished"), Tag::Other);

        let counts = tagger.count("The case feels so polished");
        assert_eq!(counts, TagCounts { adjectives: 1, nouns: 1 });
    }
}
