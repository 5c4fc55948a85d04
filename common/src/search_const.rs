//! Constants shared by the query compiler and the engine transport.

/// Token the engine reads as "match every document".
pub const MATCH_ALL_QUERY: &str = "*:*";

/// Open bound inside a range clause.
pub const OPEN_RANGE_BOUND: &str = "*";

pub const START_OF_DAY_SUFFIX: &str = "T00:00:00Z";
pub const END_OF_DAY_SUFFIX: &str = "T23:59:59Z";

pub const PAGE_SIZE: u64 = 10;
pub const CACHE_TTL_SECS: u64 = 5 * 60;
pub const FACET_LIMIT: u64 = 20;
pub const FACET_MIN_COUNT: u64 = 1;
