//! Configuration management.
//!
//! Layered loading with the following priority (lowest to highest):
//! 1. `default.toml` - base configuration
//! 2. `{environment}.toml` - environment-specific configuration
//! 3. `local.toml` - local overrides (not committed)
//! 4. `RESERVA_*` environment variables

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;

pub use environment::Environment;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{
    BookingConfig, DatabaseConfig, JwtConfig, MailConfig, RolesConfig, Settings,
};
