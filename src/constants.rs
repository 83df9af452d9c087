//! Static values shared by the attribution path.

/// Reason attached to every communication whose owner could not be found.
pub const REASON_UNKNOWN_PROCESS: &str = "unknown connection owner: process could not be found";

/// Pid reserved for the "owner unknown" sentinel process.
pub const UNKNOWN_PID: i32 = -1;

/// Display name of the sentinel process.
pub const UNKNOWN_PROCESS_NAME: &str = "Unknown";

/// Registry sizing used when no configuration is supplied.
pub const DEFAULT_REGISTRY_CAPACITY: usize = 1_024;
pub const DEFAULT_SHARD_AMOUNT: usize = 32;
