// Cross-source player reconciliation and salary-efficiency core.
//
// Pure and synchronous: every operation takes caller-owned data and returns
// new values. Loading, synthetic salaries and presentation live in
// courtvalue-app.

pub mod columns;
pub mod efficiency;
pub mod matching;
pub mod names;
pub mod reconcile;
pub mod records;
pub mod rollup;
pub mod salary;
pub mod similarity;
pub mod table;

pub use columns::{ColumnResolver, DeclaredColumns, HeuristicColumns, SalaryColumns};
pub use efficiency::{compute_efficiency, top_n, EfficiencyRecord, EfficiencyRun, RecordFilter};
pub use matching::{reconcile, MatchOutcome, MatchSettings, Matcher};
pub use records::{
    CanonicalPlayerRecord, MatchProvenance, MatchStrategyKind, PlayerStatRecord, SalaryRecord,
    TeamCode,
};
pub use table::{CellValue, RawTable};
