//! freqprof - interrupt-timing frequency profiler
//!
//! Finds the highest clock frequency at which a platform still dispatches its
//! interrupts in a legal order. Each candidate frequency is written into the
//! platform's traits header, the workload is rebuilt and run several times,
//! and the interrupt sequence in every trace is checked against a table of
//! allowed successors. A bisection followed by a linear walk narrows the
//! range down to the boundary.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): search state machine, interrupt models, ports and errors
//! - **Service Layer** (`services`): search controller, trace parsing, validation, testbench
//! - **Infrastructure Layer** (`infrastructure`): configuration, logging, traits header, `make`
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```
//! use freqprof::domain::models::{AggregatedResult, SearchParameters, SearchState};
//!
//! let params = SearchParameters::default();
//! let state = SearchState::initial(&params);
//! let failing = AggregatedResult { frequency: state.current, errors: 3, total: 3 };
//!
//! let next = state.advance(&failing, &params);
//! assert!(next.state().current < params.range.high);
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    Config, FrequencyRange, Hz, InterruptEvent, SearchParameters, SearchReport, Termination,
    TransitionTable, TrialOutcome,
};
pub use domain::ports::{BuildRunner, PlatformConfig};
pub use domain::{SearchError, ToolingError};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{FrequencySearch, SequenceValidator, Testbench, TraceParser};
