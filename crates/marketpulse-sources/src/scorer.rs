//! Domain-specific lexicon scorer for market-news headlines.
//!
//! The news mock feeds headline text through this scorer to derive a signal
//! magnitude; a production news adapter would do the same.

/// Market-movement word weights.
///
/// Keys are lowercase single words. Values in `(0.0, 1.0]` read as demand
/// strength, in `[-1.0, 0.0)` as contraction or risk. The final score is
/// clamped to `[-1.0, 1.0]`.
pub(crate) const LEXICON: &[(&str, f64)] = &[
    // Expansion signals
    ("surge", 0.5),
    ("surges", 0.5),
    ("soars", 0.5),
    ("rising", 0.4),
    ("rises", 0.4),
    ("growth", 0.4),
    ("growing", 0.3),
    ("boom", 0.5),
    ("record", 0.4),
    ("high", 0.3),
    ("strong", 0.3),
    ("orders", 0.2),
    ("exports", 0.2),
    ("demand", 0.2),
    ("expansion", 0.4),
    ("approved", 0.3),
    ("incentive", 0.3),
    // Contraction and risk signals
    ("slump", -0.5),
    ("slumps", -0.5),
    ("falls", -0.4),
    ("falling", -0.4),
    ("decline", -0.4),
    ("declines", -0.4),
    ("shortage", -0.3),
    ("recall", -0.6),
    ("ban", -0.6),
    ("banned", -0.6),
    ("duty", -0.2),
    ("tariff", -0.3),
    ("penalty", -0.4),
    ("disruption", -0.4),
    ("glut", -0.4),
    ("oversupply", -0.4),
    ("weak", -0.3),
];

/// Score a headline using the market lexicon.
///
/// Splits text into lowercase words, sums matching weights, and clamps the
/// result to `[-1.0, 1.0]`. Returns `0.0` for empty or unknown text.
#[must_use]
pub fn lexicon_score(text: &str) -> f64 {
    let mut score = 0.0_f64;
    for word in text.split_whitespace() {
        let w = word
            .trim_matches(|c: char| !c.is_alphabetic())
            .to_lowercase();
        for &(lex_word, weight) in LEXICON {
            if w == lex_word {
                score += weight;
                break;
            }
        }
    }
    score.clamp(-1.0, 1.0)
}
