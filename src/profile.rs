//! Wall-clock and resident-memory instrumentation for individual queries

use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::Serialize;
use sysinfo::{Pid, System};

// Process table handle, created on first use
static SYSTEM_INFO: Mutex<Option<System>> = Mutex::new(None);

/// Resident memory of this process in bytes; `None` if the platform
/// does not expose it.
pub fn resident_memory() -> Option<u64> {
    let pid: Pid = sysinfo::get_current_pid().ok()?;
    let mut guard = SYSTEM_INFO.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let sys = guard.get_or_insert_with(System::new);

    if !sys.refresh_process(pid) {
        return None;
    }
    sys.process(pid).map(|process| process.memory())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryProfile {
    pub name: String,
    pub elapsed: Duration,
    pub memory_before: Option<u64>,
    pub memory_after: Option<u64>,
}

impl QueryProfile {
    /// Resident memory growth across the query, in bytes. Negative when the
    /// process shrank.
    pub fn memory_delta(&self) -> Option<i64> {
        let before = i64::try_from(self.memory_before?).ok()?;
        let after = i64::try_from(self.memory_after?).ok()?;
        Some(after - before)
    }
}

/// Run `f`, measuring elapsed time and process memory around it
pub fn profiled<T, F>(name: &str, f: F) -> (T, QueryProfile)
where
    F: FnOnce() -> T,
{
    let memory_before = resident_memory();
    let start = Instant::now();
    let result = f();
    let elapsed = start.elapsed();
    let memory_after = resident_memory();

    let profile = QueryProfile {
        name: name.to_string(),
        elapsed,
        memory_before,
        memory_after,
    };

    tracing::info!(
        query = name,
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        memory_delta = ?profile.memory_delta(),
        "Query finished"
    );

    (result, profile)
}
