// Multi-strategy player matching between a statistics table and a salary
// table that share no key.
//
// Strategies run in a fixed order (exact, fuzzy, partial). The first one that
// yields a row with a usable salary wins and later strategies are never
// consulted, so a weaker strategy's guesses are never mixed into a stronger
// one's output. Exact matching wins on any pairing, usable or not.

pub mod exact;
pub mod fuzzy;
pub mod partial;

use serde::Deserialize;
use tracing::{debug, info};

use crate::columns::SalaryColumns;
use crate::reconcile::collapse_salary_rows;
use crate::records::{
    salary_records_from_table, CanonicalPlayerRecord, MatchProvenance, MatchStrategyKind,
    PlayerStatRecord, SalaryRecord,
};
use crate::similarity::SimilarityMetric;
use crate::table::RawTable;

pub use exact::ExactMatch;
pub use fuzzy::FuzzyMatch;
pub use partial::PartialMatch;

/// Default minimum similarity for a fuzzy match.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.8;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Tunables for the standard strategy list.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MatchSettings {
    pub fuzzy_threshold: f64,
    pub similarity: SimilarityMetric,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            similarity: SimilarityMetric::Gestalt,
        }
    }
}

// ---------------------------------------------------------------------------
// Strategy capability
// ---------------------------------------------------------------------------

/// A statistics row paired with a salary row by some strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct Pairing {
    pub stat_index: usize,
    pub salary_index: usize,
    pub provenance: MatchProvenance,
}

/// One way of pairing statistics rows with salary rows.
pub trait MatchStrategy {
    fn kind(&self) -> MatchStrategyKind;

    /// Pair rows by index. Salary validity is not this method's concern;
    /// the runner filters pairings afterwards.
    fn pair(&self, stats: &[PlayerStatRecord], salaries: &[SalaryRecord]) -> Vec<Pairing>;

    /// Whether any pairing settles the list, even when the salary filter
    /// then drops all of them. Otherwise the strategy only wins with at
    /// least one usable salary.
    fn wins_on_raw_pairings(&self) -> bool {
        false
    }
}

/// Distinct names in order of first appearance, with the index of the row
/// where each first appeared.
pub(crate) fn first_occurrences<'a, I>(names: I) -> Vec<(&'a str, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = std::collections::HashSet::new();
    names
        .into_iter()
        .enumerate()
        .filter(|(_, name)| seen.insert(*name))
        .map(|(idx, name)| (name, idx))
        .collect()
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// Result of running the strategy list.
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    /// Joined rows that survived the salary filter.
    pub records: Vec<CanonicalPlayerRecord>,
    /// The strategy that settled the match, if any did.
    pub strategy: Option<MatchStrategyKind>,
    /// Strategies actually run, in order.
    pub attempted: Vec<MatchStrategyKind>,
    /// Pairings produced by the winning strategy before salary filtering;
    /// with no winner, by the last strategy that paired anything.
    pub raw_pairings: usize,
    /// Of those pairings, the ones dropped for a missing, non-finite or
    /// non-positive salary.
    pub dropped_salary: usize,
}

impl MatchOutcome {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Ordered list of match strategies.
pub struct Matcher {
    strategies: Vec<Box<dyn MatchStrategy>>,
}

impl Matcher {
    pub fn new(strategies: Vec<Box<dyn MatchStrategy>>) -> Self {
        Self { strategies }
    }

    /// Exact, then fuzzy, then partial.
    pub fn standard(settings: &MatchSettings) -> Self {
        Self::new(vec![
            Box::new(ExactMatch),
            Box::new(FuzzyMatch::new(settings.similarity, settings.fuzzy_threshold)),
            Box::new(PartialMatch),
        ])
    }

    pub fn strategy_kinds(&self) -> Vec<MatchStrategyKind> {
        self.strategies.iter().map(|s| s.kind()).collect()
    }

    /// Run strategies in order and stop at the first one that wins.
    ///
    /// A strategy wins when at least one of its pairings carries a usable
    /// salary. Exact matching wins on any pairing at all: if every exact
    /// pairing has an unusable salary the result is empty and the weaker
    /// strategies are not consulted.
    pub fn run(&self, stats: &[PlayerStatRecord], salaries: &[SalaryRecord]) -> MatchOutcome {
        let mut outcome = MatchOutcome::default();
        if stats.is_empty() || salaries.is_empty() {
            return outcome;
        }

        for strategy in &self.strategies {
            let kind = strategy.kind();
            outcome.attempted.push(kind);
            let pairings = strategy.pair(stats, salaries);
            if pairings.is_empty() {
                info!("{} match found no pairs", kind.label());
                continue;
            }

            let raw_pairings = pairings.len();
            let mut records = Vec::with_capacity(raw_pairings);
            let mut dropped = 0;
            for pairing in pairings {
                let stat = &stats[pairing.stat_index];
                match usable_salary(&salaries[pairing.salary_index]) {
                    Some(salary) => {
                        records.push(CanonicalPlayerRecord::from_parts(stat, salary, pairing.provenance));
                    }
                    None => {
                        debug!(
                            "dropping {} match '{}' -> '{}': unusable salary",
                            kind.label(),
                            stat.player,
                            pairing.provenance.salary_name
                        );
                        dropped += 1;
                    }
                }
            }
            outcome.raw_pairings = raw_pairings;
            outcome.dropped_salary = dropped;

            if records.is_empty() && !strategy.wins_on_raw_pairings() {
                info!(
                    "{} match paired {} rows, none with a usable salary",
                    kind.label(),
                    raw_pairings
                );
                continue;
            }

            info!(
                "{} match paired {} rows, {} kept after salary filter",
                kind.label(),
                raw_pairings,
                records.len()
            );
            outcome.strategy = Some(kind);
            outcome.records = records;
            break;
        }
        outcome
    }
}

/// Salary must be present, finite and strictly positive.
fn usable_salary(record: &SalaryRecord) -> Option<f64> {
    record.salary.filter(|s| s.is_finite() && *s > 0.0)
}

/// Join a statistics table to a raw salary table.
///
/// Salary rows are collapsed to one per player before matching, so a traded
/// player pairs with a single salary. Returns an empty outcome when the
/// salary table is empty or its columns were not identified; callers treat
/// that as "use synthetic salaries".
pub fn reconcile(
    stats: &[PlayerStatRecord],
    salary_table: &RawTable,
    columns: Option<&SalaryColumns>,
    settings: &MatchSettings,
) -> MatchOutcome {
    let Some(columns) = columns else {
        return MatchOutcome::default();
    };
    if salary_table.is_empty() {
        return MatchOutcome::default();
    }
    let salaries = salary_records_from_table(salary_table, &columns.player, &columns.salary);
    let collapsed = collapse_salary_rows(&salaries);
    if collapsed.removed() > 0 {
        debug!(
            "collapsed {} salary rows to {} before matching",
            collapsed.original_count,
            collapsed.final_count()
        );
    }
    Matcher::standard(settings).run(stats, &collapsed.records)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
