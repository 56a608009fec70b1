pub mod frequency_search;
pub mod sequence_validator;
pub mod testbench;
pub mod trace_parser;

pub use frequency_search::{FrequencySearch, DEFAULT_MAX_ITERATIONS};
pub use sequence_validator::SequenceValidator;
pub use testbench::{Testbench, TestbenchReport};
pub use trace_parser::TraceParser;
