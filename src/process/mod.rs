//! Process records referenced by communications.
//!
//! The process-identification engine owns and resolves these; the filter
//! core only holds references and bumps the communication counter. The
//! "owner unknown" sentinel lives here as an initialise-once singleton.

use log::Level;
use once_cell::sync::OnceCell;
use std::{
    fmt,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use crate::constants::{UNKNOWN_PID, UNKNOWN_PROCESS_NAME};
use crate::netguard_log;

/// A process as seen by the network filter.
#[derive(Debug)]
pub struct Process {
    pid: i32,
    name: String,
    exec_path: Option<PathBuf>,
    /// Registry accesses attributed to this process. Read by the process
    /// lifecycle manager to decide when the record may be reclaimed.
    communications: AtomicU64,
}

impl Process {
    pub fn new(pid: i32, name: impl Into<String>, exec_path: Option<PathBuf>) -> Self {
        Self {
            pid,
            name: name.into(),
            exec_path,
            communications: AtomicU64::new(0),
        }
    }

    /// A fresh sentinel instance. Production code shares the one returned by
    /// [`unknown_process`]; separate instances keep tests isolated.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_PID, UNKNOWN_PROCESS_NAME, None)
    }

    pub fn pid(&self) -> i32 {
        self.pid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn exec_path(&self) -> Option<&Path> {
        self.exec_path.as_deref()
    }

    pub fn is_unknown(&self) -> bool {
        self.pid == UNKNOWN_PID
    }

    /// Record one more communication access. Returns the new count.
    pub fn add_communication(&self) -> u64 {
        self.communications.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Release one communication reference, never going below zero.
    /// Returns the new count.
    pub fn remove_communication(&self) -> u64 {
        let prev = self
            .communications
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| Some(n.saturating_sub(1)))
            .unwrap_or(0);
        prev.saturating_sub(1)
    }

    pub fn communication_count(&self) -> u64 {
        self.communications.load(Ordering::Acquire)
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.pid)
    }
}

static UNKNOWN_PROCESS: OnceCell<Arc<Process>> = OnceCell::new();

/// Initialise the process-wide sentinel. Call once during start-up, before
/// packets flow; later calls return the same instance. The sentinel is never
/// torn down.
pub fn init_unknown_process() -> &'static Arc<Process> {
    UNKNOWN_PROCESS.get_or_init(|| {
        netguard_log!(Level::Debug, "process", "unknown-owner sentinel initialised (pid={})", UNKNOWN_PID);
        Arc::new(Process::unknown())
    })
}

/// The shared "owner could not be determined" process. Initialises it on
/// first use if start-up did not.
pub fn unknown_process() -> &'static Arc<Process> {
    match UNKNOWN_PROCESS.get() {
        Some(p) => p,
        None => init_unknown_process(),
    }
}
