//! Common test utilities for integration tests
//!
//! Scripted in-memory implementations of the platform and build ports. The
//! platform and runner share one frequency cell, so the runner "sees" whatever
//! the controller last declared.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use freqprof::domain::models::{Hz, SearchParameters};
use freqprof::domain::ports::{BuildRunner, PlatformConfig};
use freqprof::domain::ToolingError;
use freqprof::services::{FrequencySearch, SequenceValidator, TraceParser};

/// Dispatch prefix used by scripted traces.
pub const PREFIX: &str = "irq";

/// Trace obeying the default timer chain.
pub const VALID_TRACE: &str = "\
boot
irq desc=m_timer
irq desc=m_timer
irq desc=s_timer
irq desc=supervisor_ecall
irq desc=m_timer
";

/// Trace where a supervisor ecall jumps the s_timer.
pub const BROKEN_TRACE: &str = "\
boot
irq desc=m_timer
irq desc=supervisor_ecall
";

/// Original frequency declared by a fresh [`ScriptedPlatform`].
pub const ORIGINAL_HZ: Hz = 1000;

/// Platform whose frequency lives in memory.
pub struct ScriptedPlatform {
    pub frequency: Arc<Mutex<Hz>>,
    pub writes: Mutex<Vec<Hz>>,
    /// Writes of these values fail with an I/O error
    pub rejected: Mutex<HashSet<Hz>>,
    /// Reads fail with an I/O error
    pub unreadable: bool,
}

impl ScriptedPlatform {
    pub fn new() -> Self {
        Self {
            frequency: Arc::new(Mutex::new(ORIGINAL_HZ)),
            writes: Mutex::new(Vec::new()),
            rejected: Mutex::new(HashSet::new()),
            unreadable: false,
        }
    }

    pub fn current(&self) -> Hz {
        *self.frequency.lock().unwrap()
    }

    pub fn writes(&self) -> Vec<Hz> {
        self.writes.lock().unwrap().clone()
    }

    pub fn reject(&self, hz: Hz) {
        self.rejected.lock().unwrap().insert(hz);
    }
}

fn io_failure(what: &str) -> ToolingError {
    ToolingError::io(
        PathBuf::from("sifive_u_traits.h"),
        io::Error::new(io::ErrorKind::PermissionDenied, what.to_string()),
    )
}

#[async_trait]
impl PlatformConfig for ScriptedPlatform {
    async fn frequency(&self) -> Result<Hz, ToolingError> {
        if self.unreadable {
            return Err(io_failure("unreadable"));
        }
        Ok(self.current())
    }

    async fn set_frequency(&self, hz: Hz) -> Result<(), ToolingError> {
        if self.rejected.lock().unwrap().contains(&hz) {
            return Err(io_failure("read-only"));
        }
        *self.frequency.lock().unwrap() = hz;
        self.writes.lock().unwrap().push(hz);
        Ok(())
    }
}

/// Runner producing a valid or broken trace depending on the declared frequency.
pub struct ScriptedRunner {
    frequency: Arc<Mutex<Hz>>,
    violates: Box<dyn Fn(Hz, u32) -> bool + Send + Sync>,
    attempts: Mutex<HashMap<Hz, u32>>,
    pub cleans: Mutex<u32>,
    /// `run` fails with a process error at this frequency
    pub crash_at: Option<Hz>,
}

impl ScriptedRunner {
    /// Runner whose trial number `attempt` (1-based, per frequency) at
    /// `frequency` violates when `violates(frequency, attempt)` holds.
    pub fn new(
        platform: &ScriptedPlatform,
        violates: impl Fn(Hz, u32) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            frequency: Arc::clone(&platform.frequency),
            violates: Box::new(violates),
            attempts: Mutex::new(HashMap::new()),
            cleans: Mutex::new(0),
            crash_at: None,
        }
    }

    /// Runner for a platform that is correct at or below `safe_max`.
    pub fn threshold(platform: &ScriptedPlatform, safe_max: Hz) -> Self {
        Self::new(platform, move |hz, _| hz > safe_max)
    }

    pub fn cleans(&self) -> u32 {
        *self.cleans.lock().unwrap()
    }
}

#[async_trait]
impl BuildRunner for ScriptedRunner {
    async fn clean(&self) -> Result<(), ToolingError> {
        *self.cleans.lock().unwrap() += 1;
        Ok(())
    }

    async fn run(&self, application: &str) -> Result<String, ToolingError> {
        let hz = *self.frequency.lock().unwrap();
        if self.crash_at == Some(hz) {
            return Err(ToolingError::ProcessFailed {
                command: format!("make APPLICATION={application} run"),
                status: "exit status: 2".to_string(),
                stderr: "qemu: fatal".to_string(),
            });
        }

        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            let counter = attempts.entry(hz).or_insert(0);
            *counter += 1;
            *counter
        };

        if (self.violates)(hz, attempt) {
            Ok(BROKEN_TRACE.to_string())
        } else {
            Ok(VALID_TRACE.to_string())
        }
    }
}

/// Controller over scripted ports with the default transition table.
pub fn controller(
    platform: Arc<ScriptedPlatform>,
    runner: Arc<ScriptedRunner>,
    params: SearchParameters,
) -> FrequencySearch {
    FrequencySearch::new(
        platform,
        runner,
        TraceParser::new(PREFIX),
        SequenceValidator::default(),
        params,
        "ea_test",
    )
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
