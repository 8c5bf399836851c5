mod credentials;
mod loader;
mod types;

pub use credentials::{SecureString, API_KEY_HEADER};
pub use loader::ConfigError;
pub use types::{ApiConfig, CacheConfig, Config, SearchConfig, ServerConfig};
