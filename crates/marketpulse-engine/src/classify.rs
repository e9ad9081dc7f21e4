//! Free-text to HSN code classification against the static taxonomy.
//!
//! Exact keyword-phrase hits win outright; otherwise the classifier falls
//! back to token-overlap similarity against each entry's keyword token set.
//! Fully deterministic: identical input text always yields the identical
//! match, with documented tie-breaks.

use std::collections::BTreeSet;

use marketpulse_core::Taxonomy;

/// A successful classification with its similarity score.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierMatch {
    pub hsn_code: String,
    /// 1.0 for exact phrase hits, otherwise `overlap / |shorter token set|`.
    pub score: f64,
}

struct IndexEntry {
    hsn_code: String,
    /// Normalized keyword phrases, each as its token sequence.
    phrases: Vec<Vec<String>>,
    /// Union of all keyword tokens for this entry.
    token_set: BTreeSet<String>,
}

/// Taxonomy-backed classifier. Built once from a loaded [`Taxonomy`]; the
/// index is immutable, so classification is safe to run from parallel
/// scoring partitions.
pub struct Classifier {
    index: Vec<IndexEntry>,
    similarity_threshold: f64,
}

impl Classifier {
    #[must_use]
    pub fn new(taxonomy: &Taxonomy, similarity_threshold: f64) -> Self {
        let index = taxonomy
            .entries()
            .iter()
            .map(|entry| {
                let phrases: Vec<Vec<String>> = entry
                    .keywords
                    .iter()
                    .map(|k| tokenize(k))
                    .filter(|tokens| !tokens.is_empty())
                    .collect();
                let token_set = phrases.iter().flatten().cloned().collect();
                IndexEntry {
                    hsn_code: entry.hsn_code.clone(),
                    phrases,
                    token_set,
                }
            })
            .collect();
        Self {
            index,
            similarity_threshold,
        }
    }

    /// Classify free text into an HSN code.
    ///
    /// Returns `None` when no taxonomy entry clears the similarity
    /// threshold — a miss, not an error; unclassified signals are retained
    /// upstream.
    #[must_use]
    pub fn classify(&self, text: &str) -> Option<ClassifierMatch> {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return None;
        }

        if let Some(code) = self.exact_match(&tokens) {
            return Some(ClassifierMatch {
                hsn_code: code,
                score: 1.0,
            });
        }

        self.fuzzy_match(&tokens)
    }

    /// An entry wins an exact match when one of its keyword phrases appears
    /// contiguously in the text tokens. Longer phrases beat shorter ones;
    /// remaining ties go to the lexicographically smaller code.
    fn exact_match(&self, tokens: &[String]) -> Option<String> {
        let mut best: Option<(usize, &str)> = None;
        for entry in &self.index {
            for phrase in &entry.phrases {
                if !contains_phrase(tokens, phrase) {
                    continue;
                }
                let better = match best {
                    None => true,
                    Some((len, code)) => {
                        phrase.len() > len
                            || (phrase.len() == len && entry.hsn_code.as_str() < code)
                    }
                };
                if better {
                    best = Some((phrase.len(), entry.hsn_code.as_str()));
                }
            }
        }
        best.map(|(_, code)| code.to_string())
    }

    fn fuzzy_match(&self, tokens: &[String]) -> Option<ClassifierMatch> {
        let query: BTreeSet<&str> = tokens.iter().map(String::as_str).collect();
        let mut best: Option<(f64, usize, &str)> = None;

        for entry in &self.index {
            if entry.token_set.is_empty() {
                continue;
            }
            let overlap = query
                .iter()
                .filter(|t| entry.token_set.contains(**t))
                .count();
            let shorter = query.len().min(entry.token_set.len());
            // At least 2 of the shorter token set's tokens must match;
            // single-token sets can only be covered in full.
            let floor = shorter.min(2);
            if overlap < floor {
                continue;
            }
            #[allow(clippy::cast_precision_loss)]
            let similarity = overlap as f64 / shorter as f64;
            if similarity < self.similarity_threshold {
                continue;
            }

            let better = match best {
                None => true,
                Some((sim, ov, code)) => {
                    similarity > sim
                        || (similarity == sim && overlap > ov)
                        || (similarity == sim && overlap == ov && entry.hsn_code.as_str() < code)
                }
            };
            if better {
                best = Some((similarity, overlap, entry.hsn_code.as_str()));
            }
        }

        best.map(|(score, _, code)| ClassifierMatch {
            hsn_code: code.to_string(),
            score,
        })
    }
}

/// Lowercase, strip non-alphanumeric edges, drop empties.
fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|token| !token.is_empty())
        .collect()
}

fn contains_phrase(tokens: &[String], phrase: &[String]) -> bool {
    if phrase.is_empty() || phrase.len() > tokens.len() {
        return false;
    }
    tokens.windows(phrase.len()).any(|w| w == phrase)
}
