// Similarity-scored name matching.

use tracing::debug;

use super::{first_occurrences, MatchStrategy, Pairing, DEFAULT_FUZZY_THRESHOLD};
use crate::names::similarity_key;
use crate::records::{MatchProvenance, MatchStrategyKind, PlayerStatRecord, SalaryRecord};
use crate::similarity::SimilarityMetric;

/// Pair each distinct statistics name with its best-scoring salary name.
///
/// Names are compared on their similarity key. A candidate must reach the
/// threshold; among equal scores the salary name seen first is kept. Each
/// pairing uses the first row carrying the statistics name and the first row
/// carrying the salary name, so at most one pairing per player.
#[derive(Debug, Clone, Copy)]
pub struct FuzzyMatch {
    metric: SimilarityMetric,
    threshold: f64,
}

impl FuzzyMatch {
    pub fn new(metric: SimilarityMetric, threshold: f64) -> Self {
        Self { metric, threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Default for FuzzyMatch {
    fn default() -> Self {
        Self::new(SimilarityMetric::Gestalt, DEFAULT_FUZZY_THRESHOLD)
    }
}

impl MatchStrategy for FuzzyMatch {
    fn kind(&self) -> MatchStrategyKind {
        MatchStrategyKind::Fuzzy
    }

    fn pair(&self, stats: &[PlayerStatRecord], salaries: &[SalaryRecord]) -> Vec<Pairing> {
        let stat_names = first_occurrences(stats.iter().map(|s| s.player.as_str()));
        let salary_names: Vec<(&str, usize, String)> =
            first_occurrences(salaries.iter().map(|s| s.player.as_str()))
                .into_iter()
                .map(|(name, idx)| (name, idx, similarity_key(name)))
                .collect();

        let mut pairings = Vec::new();
        for (stat_name, stat_index) in stat_names {
            let key = similarity_key(stat_name);
            let mut best: Option<(&str, usize, f64)> = None;
            for (salary_name, salary_index, salary_key) in &salary_names {
                let score = self.metric.score(&key, salary_key);
                let best_score = best.map_or(0.0, |(_, _, s)| s);
                if score > best_score && score >= self.threshold {
                    best = Some((*salary_name, *salary_index, score));
                }
            }

            if let Some((salary_name, salary_index, score)) = best {
                debug!("fuzzy: '{}' -> '{}' ({:.3})", stat_name, salary_name, score);
                pairings.push(Pairing {
                    stat_index,
                    salary_index,
                    provenance: MatchProvenance {
                        strategy: MatchStrategyKind::Fuzzy,
                        salary_name: salary_name.to_string(),
                        score: Some(score),
                    },
                });
            }
        }
        pairings
    }
}
