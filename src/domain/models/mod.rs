pub mod config;
pub mod frequency;
pub mod interrupt;
pub mod report;
pub mod search;

pub use config::{
    Config, SearchConfig, TestbenchConfig, ToolchainConfig, TraceConfig, TraceSource,
    TraitsConfig,
};
pub use frequency::{FrequencyRange, Hz, SearchParameters};
pub use interrupt::{InterruptEvent, TransitionTable, TrialOutcome};
pub use report::SearchReport;
pub use search::{AggregatedResult, RangeBoundary, SearchState, Termination, Transition};
