// Exact name join.

use std::collections::HashMap;

use super::{MatchStrategy, Pairing};
use crate::names::normalize;
use crate::records::{MatchProvenance, MatchStrategyKind, PlayerStatRecord, SalaryRecord};

/// Inner join on trimmed names.
///
/// Output follows statistics-row order; a name present several times on
/// either side yields every combination, salary rows in source order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatch;

impl MatchStrategy for ExactMatch {
    fn kind(&self) -> MatchStrategyKind {
        MatchStrategyKind::Exact
    }

    fn wins_on_raw_pairings(&self) -> bool {
        true
    }

    fn pair(&self, stats: &[PlayerStatRecord], salaries: &[SalaryRecord]) -> Vec<Pairing> {
        let mut by_name: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, salary) in salaries.iter().enumerate() {
            by_name.entry(normalize(&salary.player)).or_default().push(idx);
        }

        let mut pairings = Vec::new();
        for (stat_index, stat) in stats.iter().enumerate() {
            let Some(salary_rows) = by_name.get(&normalize(&stat.player)) else {
                continue;
            };
            for &salary_index in salary_rows {
                pairings.push(Pairing {
                    stat_index,
                    salary_index,
                    provenance: MatchProvenance {
                        strategy: MatchStrategyKind::Exact,
                        salary_name: salaries[salary_index].player.clone(),
                        score: None,
                    },
                });
            }
        }
        pairings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices(pairings: &[Pairing]) -> Vec<(usize, usize)> {
        pairings.iter().map(|p| (p.stat_index, p.salary_index)).collect()
    }

    #[test]
    fn joins_on_trimmed_names_in_stat_order() {
        let stats = vec![
            PlayerStatRecord::new("Jayson Tatum", Some("BOS")),
            PlayerStatRecord::new("Nobody Here", Some("BOS")),
            PlayerStatRecord::new("Jaylen Brown", Some("BOS")),
        ];
        let mut padded = SalaryRecord::new("x", 1.0);
        padded.player = "  Jayson Tatum ".into();
        let salaries = vec![SalaryRecord::new("Jaylen Brown", 49e6), padded];

        assert_eq!(indices(&ExactMatch.pair(&stats, &salaries)), vec![(0, 1), (2, 0)]);
    }

    #[test]
    fn case_differences_do_not_match() {
        let stats = vec![PlayerStatRecord::new("LeBron James", Some("LAL"))];
        let salaries = vec![SalaryRecord::new("Lebron James", 48e6)];
        assert!(ExactMatch.pair(&stats, &salaries).is_empty());
    }

    #[test]
    fn duplicates_produce_every_combination() {
        let stats = vec![
            PlayerStatRecord::new("Dennis Schroder", Some("BKN")),
            PlayerStatRecord::new("Dennis Schroder", Some("GSW")),
        ];
        let salaries = vec![
            SalaryRecord::new("Dennis Schroder", 13e6),
            SalaryRecord::new("Dennis Schroder", 0.0),
        ];
        let pairs = ExactMatch.pair(&stats, &salaries);
        assert_eq!(indices(&pairs), vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
        assert!(pairs.iter().all(|p| p.provenance.score.is_none()));
    }
}
