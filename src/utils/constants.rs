pub const STABILIZE_INTERVAL_MILLIS_DEFAULT: u64 = 3000;
pub const FIX_FINGERS_INTERVAL_MILLIS_DEFAULT: u64 = 1000;
pub const CHECK_PREDECESSOR_INTERVAL_MILLIS_DEFAULT: u64 = 3000;

// Remote calls are bounded: connects fail fast, whole calls finish within
// 1-2x the default stabilize period.
pub const CONNECT_TIMEOUT_MILLIS: u64 = 1000;
pub const RPC_TIMEOUT_MILLIS: u64 = 4000;

pub const CONNECTION_RETRY_UPON_FAILURE_MILLIS: u64 = 100;
pub const CONNECTION_RETRY_ATTEMPTS: usize = 10;
