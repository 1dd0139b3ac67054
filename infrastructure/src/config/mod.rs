//! Configuration loading for assist-chat.
//!
//! - [`file_config::FileConfig`] — raw TOML structure with serde defaults
//! - [`loader::ConfigLoader`] — multi-source discovery and merging

pub mod file_config;
pub mod loader;

pub use file_config::{
    DEFAULT_RELAY_ENDPOINT, FileConfig, FileRelayConfig, FileStorageConfig,
};
pub use loader::ConfigLoader;
