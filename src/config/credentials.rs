//! API key resolution from the process environment.

use super::loader::ConfigError;
use super::types::ApiConfig;

/// Header the remote API reads the key from.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Wrapper for sensitive strings that prevents accidental logging.
///
/// The inner value is never exposed via Debug or Display traits.
/// Use `expose()` to access the actual value when needed for API calls.
#[derive(Clone, PartialEq, Eq)]
pub struct SecureString(String);

impl SecureString {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Expose the inner value.
    ///
    /// Use sparingly and only when actually sending to APIs.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecureString(••••••••)")
    }
}

impl std::fmt::Display for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "••••••••")
    }
}

impl ApiConfig {
    /// Read the API key from the configured environment variable.
    ///
    /// Called once at startup; a missing or empty key fails fast instead of
    /// turning every search into an authentication error.
    pub fn resolve_api_key(&self) -> Result<SecureString, ConfigError> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(SecureString::new(key)),
            _ => Err(ConfigError::MissingApiKey {
                env_var: self.api_key_env.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_string_does_not_leak() {
        let secret = SecureString::new("my-secret-key".to_string());

        let debug_output = format!("{:?}", secret);
        assert!(!debug_output.contains("my-secret-key"));
        assert!(debug_output.contains("••••••••"));

        let display_output = format!("{}", secret);
        assert!(!display_output.contains("my-secret-key"));

        assert_eq!(secret.expose(), "my-secret-key");
    }

    #[test]
    fn test_missing_env_var() {
        let api = ApiConfig {
            api_key_env: "TCG_BROWSER_TEST_NONEXISTENT_VAR_XYZ".to_string(),
            ..ApiConfig::default()
        };
        assert!(matches!(
            api.resolve_api_key(),
            Err(ConfigError::MissingApiKey { env_var })
                if env_var == "TCG_BROWSER_TEST_NONEXISTENT_VAR_XYZ"
        ));
    }
}
