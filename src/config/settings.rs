//! Configuration settings structures.
//!
//! Every section can be loaded from TOML files and overridden through
//! `RESERVA_*` environment variables.

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "reserva-rs".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3002
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connection_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "compact".to_string()
}

fn default_true() -> bool {
    true
}

fn default_jwt_secret() -> String {
    String::new()
}

fn default_access_token_expiration() -> i64 {
    1 // 1 hour
}

fn default_refresh_token_expiration() -> i64 {
    168 // 7 days
}

fn default_grant_ttl() -> u64 {
    3600
}

fn default_sweep_interval() -> u64 {
    60
}

fn default_smtp_port() -> u16 {
    587
}

// ============================================================================
// Application / Server / Database
// ============================================================================

/// Application basic information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

/// Axum HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    /// Full server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Diesel database connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,

    /// Whether to run pending migrations on startup
    #[serde(default)]
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connection_timeout: default_connection_timeout(),
            auto_migrate: false,
        }
    }
}

// ============================================================================
// JWT
// ============================================================================

/// JWT authentication configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing tokens. Must come from the environment in
    /// production.
    #[serde(default = "default_jwt_secret")]
    pub secret: String,

    /// Access token expiration in hours
    #[serde(default = "default_access_token_expiration")]
    pub access_token_expiration: i64,

    /// Refresh token expiration in hours
    #[serde(default = "default_refresh_token_expiration")]
    pub refresh_token_expiration: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: default_jwt_secret(),
            access_token_expiration: default_access_token_expiration(),
            refresh_token_expiration: default_refresh_token_expiration(),
        }
    }
}

impl JwtConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::validation(
                "jwt.secret",
                "JWT secret cannot be empty",
            ));
        }
        if self.secret.len() < 32 {
            return Err(ConfigError::validation(
                "jwt.secret",
                "JWT secret should be at least 32 characters",
            ));
        }
        if self.access_token_expiration <= 0 {
            return Err(ConfigError::validation(
                "jwt.access_token_expiration",
                "Access token expiration must be positive",
            ));
        }
        if self.refresh_token_expiration <= self.access_token_expiration {
            return Err(ConfigError::validation(
                "jwt",
                "Refresh token expiration must be longer than access token expiration",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Logger
// ============================================================================

/// Tracing subscriber configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: "compact", "full", or "json"
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Whether to use colored console output
    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            colored: default_true(),
        }
    }
}

// ============================================================================
// Booking
// ============================================================================

/// Booking engine policy switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Whether deleting a reservation releases the claimed capacity and
    /// reopens the slot. `false` reproduces the legacy behavior where a
    /// touched slot stays consumed forever.
    #[serde(default = "default_true")]
    pub release_on_delete: bool,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            release_on_delete: default_true(),
        }
    }
}

// ============================================================================
// Roles
// ============================================================================

/// Temporary role grant policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolesConfig {
    /// Grace window in seconds before a temporary grant expires
    #[serde(default = "default_grant_ttl")]
    pub grant_ttl_secs: u64,

    /// How often the sweep job looks for expired grants, in seconds
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl Default for RolesConfig {
    fn default() -> Self {
        Self {
            grant_ttl_secs: default_grant_ttl(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

impl RolesConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grant_ttl_secs == 0 {
            return Err(ConfigError::validation(
                "roles.grant_ttl_secs",
                "Grant TTL must be positive",
            ));
        }
        if self.sweep_interval_secs == 0 {
            return Err(ConfigError::validation(
                "roles.sweep_interval_secs",
                "Sweep interval must be positive",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Mail
// ============================================================================

/// Outbound SMTP configuration for booking emails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailConfig {
    /// Disabled by default; booking flows skip email entirely when off.
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub smtp_host: String,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub from_email: String,

    #[serde(default)]
    pub from_name: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: String::new(),
            smtp_port: default_smtp_port(),
            username: String::new(),
            password: String::new(),
            from_email: String::new(),
            from_name: String::new(),
        }
    }
}

impl MailConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled {
            if self.smtp_host.is_empty() {
                return Err(ConfigError::validation(
                    "mail.smtp_host",
                    "SMTP host is required when mail is enabled",
                ));
            }
            if self.from_email.is_empty() {
                return Err(ConfigError::validation(
                    "mail.from_email",
                    "Sender address is required when mail is enabled",
                ));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Main Settings Structure
// ============================================================================

/// Complete application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub application: ApplicationConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub jwt: JwtConfig,

    #[serde(default)]
    pub logger: LoggerSettings,

    #[serde(default)]
    pub booking: BookingConfig,

    #[serde(default)]
    pub roles: RolesConfig,

    #[serde(default)]
    pub mail: MailConfig,
}

impl Settings {
    /// Validates cross-section invariants. JWT is validated separately at
    /// server startup so `migrate` can run without a secret.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.roles.validate()?;
        self.mail.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_roles_config() -> impl Strategy<Value = RolesConfig> {
        (1u64..=86_400u64, 1u64..=3_600u64).prop_map(|(grant_ttl_secs, sweep_interval_secs)| {
            RolesConfig {
                grant_ttl_secs,
                sweep_interval_secs,
            }
        })
    }

    fn arb_settings() -> impl Strategy<Value = Settings> {
        (
            "[a-z][a-z0-9-]{0,20}",
            1u16..=65535u16,
            1u32..=100u32,
            arb_roles_config(),
            any::<bool>(),
        )
            .prop_map(|(name, port, max_connections, roles, release_on_delete)| Settings {
                application: ApplicationConfig {
                    name,
                    ..Default::default()
                },
                server: ServerConfig {
                    port,
                    ..Default::default()
                },
                database: DatabaseConfig {
                    max_connections,
                    ..Default::default()
                },
                booking: BookingConfig { release_on_delete },
                roles,
                ..Default::default()
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Serializing any valid Settings to TOML and back yields an
        /// equivalent value.
        #[test]
        fn prop_settings_round_trip_serialization(settings in arb_settings()) {
            let toml_str = toml::to_string(&settings)
                .expect("Settings should serialize to TOML");
            let deserialized: Settings = toml::from_str(&toml_str)
                .expect("TOML should deserialize back to Settings");
            prop_assert_eq!(settings, deserialized);
        }
    }

    #[test]
    fn test_server_config_address() {
        let config = ServerConfig::default();
        assert_eq!(config.address(), "127.0.0.1:3002");
    }

    #[test]
    fn test_booking_defaults_to_release_on_delete() {
        assert!(BookingConfig::default().release_on_delete);
    }

    #[test]
    fn test_roles_defaults() {
        let config = RolesConfig::default();
        assert_eq!(config.grant_ttl_secs, 3600);
        assert_eq!(config.sweep_interval_secs, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_roles_rejects_zero_ttl() {
        let config = RolesConfig {
            grant_ttl_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_jwt_config_validate_short_secret() {
        let config = JwtConfig {
            secret: "short".to_string(),
            ..Default::default()
        };
        let result = config.validate();
        assert!(result.is_err());
        if let Err(ConfigError::ValidationError { field, message }) = result {
            assert_eq!(field, "jwt.secret");
            assert!(message.contains("at least 32 characters"));
        }
    }

    #[test]
    fn test_jwt_config_validate_success() {
        let config = JwtConfig {
            secret: "a".repeat(32),
            access_token_expiration: 1,
            refresh_token_expiration: 168,
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_mail_disabled_requires_nothing() {
        assert!(MailConfig::default().validate().is_ok());
    }

    #[test]
    fn test_mail_enabled_requires_host() {
        let config = MailConfig {
            enabled: true,
            from_email: "noreply@example.com".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_settings_deserialize_partial() {
        let toml_str = r#"
            [application]
            name = "booking-api"

            [server]
            port = 8080

            [booking]
            release_on_delete = false
        "#;

        let settings: Settings = toml::from_str(toml_str).expect("Failed to deserialize");
        assert_eq!(settings.application.name, "booking-api");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.host, "127.0.0.1"); // default
        assert!(!settings.booking.release_on_delete);
        assert_eq!(settings.roles.grant_ttl_secs, 3600); // default
    }
}
