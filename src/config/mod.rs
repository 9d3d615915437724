//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, env overrides)
//!     → validation.rs (semantic checks)
//!     → VerifierConfig (validated, immutable)
//!     → passed by reference to every step of the scenario
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    ApiConfig, BlockchainConfig, BookingConfig, LogFormat, ObservabilityConfig, PaymentConfig,
    PollingConfig, UserConfig, VerifierConfig,
};
