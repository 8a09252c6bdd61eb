/// Vigil engine version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum nesting depth accepted for composite condition trees.
/// Deeper trees evaluate to non-passing.
pub const MAX_COMPOSITE_DEPTH: usize = 32;

/// Fact key written by the operating-system detector.
pub const FACT_OS_DETECTED: &str = "os_detected";

/// Fact key written by the browser detector.
pub const FACT_BROWSER_DETECTED: &str = "browser_detected";

/// Category assigned to facts written by device detectors.
pub const CATEGORY_DEVICE: &str = "device";

/// Seconds in a day, used by expiration arithmetic.
pub const SECONDS_PER_DAY: u64 = 86_400;
