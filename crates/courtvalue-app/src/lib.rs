// Library root: configuration, loading, synthetic data, the analysis
// pipeline and exports, shared by the binary and integration tests.

pub mod config;
pub mod export;
pub mod loader;
pub mod pipeline;
pub mod report;
pub mod synthetic;
