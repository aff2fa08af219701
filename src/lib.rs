//! Currency Bridge: one lookup-by-id interface over many value sources.
//!
//! This crate unifies independent value sources (experience points,
//! experience levels, item stacks, external economy providers) behind a
//! single registry keyed by lower-case currency ids.
//!
//! # Basic Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use currency_bridge::*;
//!
//! struct Host;
//!
//! impl DependencyHost for Host {
//!     fn is_installed(&self, _name: &str) -> bool { false }
//!     fn is_active(&self, _name: &str) -> bool { false }
//!     fn economy(&self, _name: &str) -> Option<Arc<dyn EconomyProvider>> { None }
//! }
//!
//! let mut registry = CurrencyRegistry::in_memory(Arc::new(Host));
//! registry.initialize();
//!
//! // Built-in currencies are always present
//! let points = registry.get(XP_POINTS).unwrap();
//! assert_eq!(points.format(15.0), "15 XP Points");
//!
//! // Unknown ids resolve to the shared fallback
//! let missing = registry.get_or_dummy("nothing");
//! assert!(!missing.is_enabled());
//! ```
//!
//! # Deferred Providers
//!
//! Some currencies come from external dependencies that finish starting at
//! an arbitrary point. At [`CurrencyRegistry::initialize`] every provider
//! whose dependency is already active is fired; the others wait until the
//! host calls [`CurrencyRegistry::notify_dependency_active`].
//!
//! ## Settings
//!
//! Each currency's [`CurrencySettings`] are its compiled defaults overlaid
//! with the currencies store at `Currencies.<id>`. Fields missing from the
//! store are written back, so the store converges to a complete snapshot
//! after the first load.
//!
//! ## Storage
//!
//! With the `default-directory` feature enabled (default), stores live in
//! `~/.currency-bridge/` unless another directory is configured:
//!
//! ```rust,ignore
//! use currency_bridge::{CurrencyRegistry, StorageConfig};
//!
//! let config = StorageConfig::with_directory("/srv/economy".into());
//! let mut registry = CurrencyRegistry::open(host, &config)?;
//! registry.initialize();
//! ```

mod error;
pub use error::{ConfigError, DecodeError, ProviderError};

mod config;
pub use config::{ConfigDocument, ConfigFile, FILE_CURRENCIES, FILE_ITEMS, StorageConfig};

mod item;
pub use item::{ItemCodec, ItemDescriptor, JsonItemCodec};

mod host;
pub use host::{DependencyHost, Holder};

mod provider;
pub use provider::{EconomyProvider, ExternalCurrency, ProviderFn, ProviderTable};

mod settings;
pub use settings::{
    CurrencySettings, DEFAULT_FORMAT, MAX_DECIMAL_PLACES, PLACEHOLDER_AMOUNT,
    PLACEHOLDER_NAME,
};

mod currency;
pub use currency::{Currency, CurrencyKind};

mod known_currencies;
pub use known_currencies::*;

mod hooks;
pub use hooks::VaultHook;

mod registry;
pub use registry::{CurrencyRegistry, RegistryState};

#[doc(hidden)]
pub use paste;
