// Single source of truth for all default values.

// --- Files ---
pub const CONFIG_FILENAME: &str = "vigil.toml";
pub const USER_CONFIG_DIR: &str = ".vigil";

// --- Expiration ---
pub const DEFAULT_EXPIRATION_DAYS: u32 = 90;
pub const MAX_EXPIRATION_DAYS: u32 = 3_650;
pub const DEFAULT_EXPIRING_SOON_DAYS: u32 = 14;
pub const DEFAULT_USE_BUILTIN_RULES: bool = true;

// --- Visibility ---
pub const DEFAULT_HIDE_ANSWERED: bool = true;
pub const DEFAULT_DETECT_CYCLES: bool = true;

// --- Facts ---
pub const DEFAULT_FACT_CONFIDENCE: f64 = 1.0;
pub const DEFAULT_FACT_CATEGORY: &str = "general";

// --- Session ---
pub const DEFAULT_VALIDATE_ON_LOAD: bool = true;

// --- Observability ---
pub const DEFAULT_LOG_FILTER: &str = "vigil=info";
