//! Keyword-frequency summaries of antibody research needs.
//!
//! The summarizer counts, per sentence, which dictionary terms occur
//! (case-insensitive substring match), keeps the three most frequent terms
//! and phrases them as applications, then infers which kinds of antibodies
//! the authors may need from a fixed set of rules.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use unicode_segmentation::UnicodeSegmentation;

/// Summary when no dictionary term occurs in the text
pub const NO_APPLICATION_SUMMARY: &str = "No clear antibody application identified.";

/// Number of top terms phrased in the summary
const TOP_TERMS: usize = 3;

const DEFAULT_KEYWORDS: &[(&str, &str)] = &[
    ("antibody", "general antibody research"),
    ("immunoassay", "protein detection"),
    ("ELISA", "quantitative analysis"),
    ("flow cytometry", "cell analysis"),
    ("western blot", "protein detection"),
    ("immunohistochemistry", "tissue staining"),
    ("neutralization", "inhibition studies"),
    ("immunoprecipitation", "protein isolation"),
    ("therapeutic", "treatment development"),
    ("vaccine", "immunization research"),
    ("diagnostic", "disease detection"),
    ("monoclonal", "specific antibody production"),
    ("polyclonal", "diverse antibody production"),
    ("epitope mapping", "antibody binding studies"),
    ("affinity purification", "antibody isolation"),
    ("cross-reactivity", "specificity testing"),
    ("immunotherapy", "immune-based treatments"),
    ("biomarker", "disease indicators"),
];

/// Terms implying a need, checked in order
const NEED_RULES: &[(&[&str], &str)] = &[
    (&["therapeutic", "immunotherapy"], "therapeutic antibodies"),
    (&["diagnostic", "biomarker"], "diagnostic antibodies"),
    (
        &["western blot", "immunohistochemistry", "flow cytometry"],
        "antibodies for protein detection",
    ),
    (&["vaccine"], "antibodies for vaccine research"),
];

const GENERIC_NEED: &str = "general research antibodies";

/// A dictionary term and the application phrase it maps to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub term: String,
    pub phrase: String,
}

impl KeywordEntry {
    pub fn new(term: impl Into<String>, phrase: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            phrase: phrase.into(),
        }
    }
}

/// An ordered, immutable term-to-phrase dictionary.
///
/// Terms are matched lower-cased; order decides ties between equally
/// frequent terms found in the same sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordDictionary {
    entries: Vec<KeywordEntry>,
}

impl Default for KeywordDictionary {
    fn default() -> Self {
        Self::new(
            DEFAULT_KEYWORDS
                .iter()
                .map(|(term, phrase)| KeywordEntry::new(*term, *phrase)),
        )
    }
}

impl KeywordDictionary {
    /// Build a dictionary; later entries replace earlier ones with the same term
    pub fn new(entries: impl IntoIterator<Item = KeywordEntry>) -> Self {
        let mut dictionary = Self {
            entries: Vec::new(),
        };
        for entry in entries {
            dictionary.insert(entry);
        }
        dictionary
    }

    /// The default dictionary extended with `extra` entries
    pub fn with_extra(extra: &[KeywordEntry]) -> Self {
        let mut dictionary = Self::default();
        for entry in extra {
            dictionary.insert(entry.clone());
        }
        dictionary
    }

    /// Copy of this dictionary with the target term mapped to "<term> research"
    pub fn with_target(&self, target_term: &str) -> Self {
        let target = target_term.trim();
        let mut dictionary = self.clone();
        if !target.is_empty() {
            dictionary.insert(KeywordEntry::new(target, format!("{} research", target)));
        }
        dictionary
    }

    pub fn entries(&self) -> &[KeywordEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, entry: KeywordEntry) {
        let term = entry.term.to_lowercase();
        let entry = KeywordEntry::new(term, entry.phrase);
        match self.entries.iter_mut().find(|e| e.term == entry.term) {
            Some(existing) => existing.phrase = entry.phrase,
            None => self.entries.push(entry),
        }
    }
}

/// Produces research-need summaries from article text
#[derive(Debug, Clone, Default)]
pub struct Summarizer {
    dictionary: KeywordDictionary,
}

impl Summarizer {
    pub fn new(dictionary: KeywordDictionary) -> Self {
        Self { dictionary }
    }

    /// Summarize `text`, optionally focused on a target term.
    ///
    /// Deterministic: the same text and target always give the same string.
    pub fn summarize(&self, text: &str, target_term: &str) -> String {
        let target = target_term.trim();
        let dictionary = self.dictionary.with_target(target);
        let counts = term_counts(&dictionary, text);

        if counts.is_empty() {
            return NO_APPLICATION_SUMMARY.to_string();
        }

        let applications = counts
            .iter()
            .take(TOP_TERMS)
            .map(|(index, _)| dictionary.entries[*index].phrase.as_str())
            .collect::<Vec<_>>();

        let mut parts = Vec::new();
        if !target.is_empty() {
            parts.push(format!("This research focuses on {}.", target));
        }
        parts.push(format!("The study involves {}.", applications.join(", ")));

        let found = |term: &str| {
            counts
                .iter()
                .any(|(index, _)| dictionary.entries[*index].term == term)
        };
        let needs = NEED_RULES
            .iter()
            .filter(|(terms, _)| terms.iter().any(|t| found(t)))
            .map(|(_, need)| *need)
            .collect::<Vec<_>>();

        if needs.is_empty() {
            parts.push(format!("They may need {}.", GENERIC_NEED));
        } else {
            parts.push(format!("They may need {}.", needs.join(" and ")));
        }

        parts.join(" ")
    }
}

/// Matched terms as `(dictionary index, sentence count)`, most frequent first.
///
/// Equal counts keep first-encountered order.
fn term_counts(dictionary: &KeywordDictionary, text: &str) -> Vec<(usize, usize)> {
    let mut counts: Vec<(usize, usize)> = Vec::new();

    for sentence in sentences(text) {
        let sentence = sentence.to_lowercase();
        for (index, entry) in dictionary.entries.iter().enumerate() {
            if !sentence.contains(&entry.term) {
                continue;
            }
            match counts.iter_mut().find(|(i, _)| *i == index) {
                Some((_, count)) => *count += 1,
                None => counts.push((index, 1)),
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Sentences of `text`, also broken where terminal punctuation is followed
/// by a lower-case start ("p53 ...", "in vivo ...").
fn sentences(text: &str) -> impl Iterator<Item = &str> {
    static BOUNDARY_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("valid regex"));

    text.unicode_sentences()
        .flat_map(|sentence| BOUNDARY_RE.split(sentence))
        .filter(|sentence| !sentence.trim().is_empty())
}
