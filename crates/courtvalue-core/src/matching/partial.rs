// Last-resort token matching.

use tracing::debug;

use super::{first_occurrences, MatchStrategy, Pairing};
use crate::names::{name_tokens, tokens_match};
use crate::records::{MatchProvenance, MatchStrategyKind, PlayerStatRecord, SalaryRecord};

/// Pair names sharing a last or first token, case-insensitively.
///
/// Both names need at least two tokens. For each distinct statistics name the
/// first salary name that qualifies is taken and the search stops. This is
/// deliberately loose: "Jalen Williams" pairs with "Jaylin Williams".
#[derive(Debug, Clone, Copy, Default)]
pub struct PartialMatch;

impl MatchStrategy for PartialMatch {
    fn kind(&self) -> MatchStrategyKind {
        MatchStrategyKind::Partial
    }

    fn pair(&self, stats: &[PlayerStatRecord], salaries: &[SalaryRecord]) -> Vec<Pairing> {
        let salary_names = first_occurrences(salaries.iter().map(|s| s.player.as_str()));

        let mut pairings = Vec::new();
        for (stat_name, stat_index) in first_occurrences(stats.iter().map(|s| s.player.as_str())) {
            let stat_tokens = name_tokens(stat_name);
            if stat_tokens.len() < 2 {
                continue;
            }

            let found = salary_names.iter().find(|(salary_name, _)| {
                let salary_tokens = name_tokens(salary_name);
                salary_tokens.len() >= 2
                    && (same_last(&stat_tokens, &salary_tokens) || same_first(&stat_tokens, &salary_tokens))
            });

            if let Some(&(salary_name, salary_index)) = found {
                debug!("partial: '{}' -> '{}'", stat_name, salary_name);
                pairings.push(Pairing {
                    stat_index,
                    salary_index,
                    provenance: MatchProvenance {
                        strategy: MatchStrategyKind::Partial,
                        salary_name: salary_name.to_string(),
                        score: None,
                    },
                });
            }
        }
        pairings
    }
}

fn same_last(a: &[&str], b: &[&str]) -> bool {
    matches!((a.last(), b.last()), (Some(x), Some(y)) if tokens_match(x, y))
}

fn same_first(a: &[&str], b: &[&str]) -> bool {
    matches!((a.first(), b.first()), (Some(x), Some(y)) if tokens_match(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(names: &[&str]) -> Vec<PlayerStatRecord> {
        names.iter().map(|n| PlayerStatRecord::new(n, Some("MEM"))).collect()
    }

    fn salaries(names: &[&str]) -> Vec<SalaryRecord> {
        names.iter().map(|n| SalaryRecord::new(n, 3e6)).collect()
    }

    #[test]
    fn shared_last_name_matches() {
        let pairs = PartialMatch.pair(&stats(&["Jaren Jackson Jr."]), &salaries(&["Zach Edey", "Jaren Jackson Jr."]));
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].salary_index, 1);
    }

    #[test]
    fn shared_first_name_matches_case_insensitively() {
        let pairs = PartialMatch.pair(&stats(&["DESMOND Bane"]), &salaries(&["desmond bayne"]));
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].provenance.salary_name, "desmond bayne");
    }

    #[test]
    fn first_qualifying_salary_name_wins() {
        let pairs = PartialMatch.pair(
            &stats(&["Marcus Smart"]),
            &salaries(&["Marcus Morris", "Marcus Smart"]),
        );
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].salary_index, 0);
    }

    #[test]
    fn single_token_names_never_match() {
        assert!(PartialMatch.pair(&stats(&["Nene"]), &salaries(&["Nene Hilario"])).is_empty());
        assert!(PartialMatch.pair(&stats(&["Nene Hilario"]), &salaries(&["Nene"])).is_empty());
    }

    #[test]
    fn middle_tokens_are_ignored() {
        let pairs = PartialMatch.pair(&stats(&["Karl Anthony Towns"]), &salaries(&["Carmelo Anthony"]));
        assert!(pairs.is_empty());
    }

    #[test]
    fn repeated_stat_names_pair_once() {
        let pairs = PartialMatch.pair(&stats(&["Ja Morant", "Ja Morant"]), &salaries(&["Ja Morant Sr"]));
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].stat_index, 0);
    }
}
