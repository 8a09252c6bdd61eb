//! Configuration system for Vigil.
//! TOML-based, layered resolution: overrides > env > project > user > defaults.

pub mod defaults;
pub mod expiration_config;
pub mod facts_config;
pub mod session_config;
pub mod vigil_config;
pub mod visibility_config;

pub use expiration_config::{ExpirationConfig, ExpirationRuleConfig};
pub use facts_config::FactsConfig;
pub use session_config::SessionConfig;
pub use vigil_config::{ConfigOverrides, VigilConfig};
pub use visibility_config::VisibilityConfig;
