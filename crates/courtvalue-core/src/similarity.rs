// String similarity scoring for fuzzy name matching.
//
// The default metric is the Ratcliff/Obershelp "gestalt" ratio: repeatedly
// take the longest common block, recurse on both sides, and score
// `2 * matched / (len_a + len_b)`. The alternatives delegate to `strsim`.

use serde::Deserialize;

/// Which similarity function the fuzzy matcher scores names with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMetric {
    #[default]
    Gestalt,
    JaroWinkler,
    NormalizedLevenshtein,
}

impl SimilarityMetric {
    /// Score two strings in [0.0, 1.0].
    pub fn score(&self, a: &str, b: &str) -> f64 {
        match self {
            SimilarityMetric::Gestalt => gestalt_ratio(a, b),
            SimilarityMetric::JaroWinkler => strsim::jaro_winkler(a, b),
            SimilarityMetric::NormalizedLevenshtein => strsim::normalized_levenshtein(a, b),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SimilarityMetric::Gestalt => "gestalt",
            SimilarityMetric::JaroWinkler => "jaro_winkler",
            SimilarityMetric::NormalizedLevenshtein => "normalized_levenshtein",
        }
    }
}

// ---------------------------------------------------------------------------
// Gestalt pattern matching
// ---------------------------------------------------------------------------

/// Ratcliff/Obershelp similarity ratio. Two empty strings score 1.0.
pub fn gestalt_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matched_chars(&a, &b) as f64 / total as f64
}

/// Total size of the matching blocks between `a` and `b`.
fn matched_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut queue = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            queue.push((i + k, ahi, j + k, bhi));
        }
    }
    matched
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]` as `(i, j, len)`.
///
/// Among blocks of equal length the one starting earliest in `a` wins, then
/// earliest in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_len) = (alo, blo, 0);
    // run[j + 1] = length of the common run ending at (i, j)
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    for i in alo..ahi {
        for j in blo..bhi {
            cur[j + 1] = if a[i] == b[j] { prev[j] + 1 } else { 0 };
            let k = cur[j + 1];
            if k > best_len {
                best_i = i + 1 - k;
                best_j = j + 1 - k;
                best_len = k;
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    (best_i, best_j, best_len)
}
