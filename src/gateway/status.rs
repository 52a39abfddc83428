pub const SHEETMATCH_STATUS_HEADER: &str = "X-Sheetmatch-Status";
pub const SHEETMATCH_STATUS_HEALTHY: &str = "healthy";
pub const SHEETMATCH_STATUS_READY: &str = "ready";
pub const SHEETMATCH_STATUS_NOT_READY: &str = "not_ready";
pub const SHEETMATCH_STATUS_MATCHED: &str = "matched";
pub const SHEETMATCH_STATUS_NO_MATCH: &str = "no_match";
pub const SHEETMATCH_STATUS_CREATED: &str = "created";
pub const SHEETMATCH_STATUS_COMPLETED: &str = "completed";
pub const SHEETMATCH_STATUS_ERROR: &str = "error";
