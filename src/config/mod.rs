//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → CLI overrides (token, start URL)
//!     → RtmConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults, so a missing file is the same as an empty one
//! - Validation separates syntactic (serde) from semantic checks
//! - Config is read once at startup; there is no reload

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::ObservabilityConfig;
pub use schema::RtmConfig;
pub use schema::SessionConfig;
pub use schema::ShutdownConfig;
