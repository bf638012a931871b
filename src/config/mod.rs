//! Layered client configuration
//!
//! Four layers, lowest precedence first:
//! 1. Built-in defaults
//! 2. Host config (~/.config/stash/cache.toml)
//! 3. Project config (.stash/cache.toml)
//! 4. CLI overrides

mod defaults;
mod effective;
mod merge;
mod platform;

pub use defaults::BuiltinDefaults;
pub use effective::{ClientSettings, ConfigError, ConfigOrigin, ConfigSource, EffectiveConfig};
pub use merge::{deep_merge, merge_layers};
pub use platform::PlatformUrl;
