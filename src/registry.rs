use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::{
    CURRENCIES_SECTION, ConfigError, ConfigFile, Currency, CurrencyKind, CurrencySettings,
    DUMMY_CURRENCY, DependencyHost, FILE_CURRENCIES, FILE_ITEMS, GEMS_ECONOMY_DEPENDENCY,
    ITEMS_SECTION, ItemCodec, ItemDescriptor, JsonItemCodec, ProviderFn, ProviderTable,
    SEEDED_ITEMS, StorageConfig, VAULT, VAULT_DEPENDENCY, VaultHook, XP_LEVELS, XP_POINTS,
};

/// Lifecycle of a [`CurrencyRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryState {
    Uninitialized,
    HooksLoaded,
    ProvidersRegistered,
    BuiltInsLoaded,
    ItemCurrenciesLoaded,
    Ready,
    Terminated,
}

/// Resolves currency ids to the value sources backing them.
///
/// The registry loads the built-in currencies, the item currencies listed
/// in the items store, and the currencies of external providers. Providers
/// whose dependency is not active at [`initialize`](Self::initialize) time are
/// kept in a table and fired later through
/// [`notify_dependency_active`](Self::notify_dependency_active).
///
/// Every loaded currency goes through one pipeline: its settings defaults
/// are overlaid with the currencies store at `Currencies.<id>`, bound to the
/// currency, and the currency is registered.
///
/// The registry is driven from a single control thread. To share it, wrap it
/// in `Arc<Mutex<CurrencyRegistry>>`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use currency_bridge::*;
///
/// struct NoDependencies;
///
/// impl DependencyHost for NoDependencies {
///     fn is_installed(&self, _name: &str) -> bool { false }
///     fn is_active(&self, _name: &str) -> bool { false }
///     fn economy(&self, _name: &str) -> Option<Arc<dyn EconomyProvider>> { None }
/// }
///
/// let mut registry = CurrencyRegistry::in_memory(Arc::new(NoDependencies));
/// registry.initialize();
///
/// assert!(registry.get("XP_POINTS").is_some());
/// assert!(registry.get("gold").is_some());
/// assert!(registry.get_or_dummy("unknown").is_dummy());
/// ```
pub struct CurrencyRegistry {
    host: Arc<dyn DependencyHost>,
    codec: Box<dyn ItemCodec>,
    currencies_config: ConfigFile,
    items_config: ConfigFile,
    currency_map: HashMap<String, Arc<Currency>>,
    providers: ProviderTable,
    vault: VaultHook,
    state: RegistryState,
}

impl CurrencyRegistry {
    /// Creates a registry over the given stores.
    pub fn new(
        host: Arc<dyn DependencyHost>,
        currencies_config: ConfigFile,
        items_config: ConfigFile,
    ) -> Self {
        Self {
            host,
            codec: Box::new(JsonItemCodec),
            currencies_config,
            items_config,
            currency_map: HashMap::new(),
            providers: ProviderTable::new(),
            vault: VaultHook::new(),
            state: RegistryState::Uninitialized,
        }
    }

    /// Creates a registry whose stores live only in memory.
    pub fn in_memory(host: Arc<dyn DependencyHost>) -> Self {
        Self::new(host, ConfigFile::in_memory(), ConfigFile::in_memory())
    }

    /// Creates a registry over the store files in `config`'s directory,
    /// creating them on first save if missing.
    pub fn open(
        host: Arc<dyn DependencyHost>,
        config: &StorageConfig,
    ) -> Result<Self, ConfigError> {
        let currencies_config = ConfigFile::load_or_create(config.currencies_path())?;
        let items_config = ConfigFile::load_or_create(config.items_path())?;
        Ok(Self::new(host, currencies_config, items_config))
    }

    /// Replaces the codec used for item tags.
    pub fn with_item_codec(mut self, codec: impl ItemCodec + 'static) -> Self {
        self.codec = Box::new(codec);
        self
    }

    pub fn state(&self) -> RegistryState { self.state }

    pub fn vault_hook(&self) -> &VaultHook { &self.vault }

    pub fn currencies_config(&self) -> &ConfigFile { &self.currencies_config }

    pub fn items_config(&self) -> &ConfigFile { &self.items_config }

    pub fn item_codec(&self) -> &dyn ItemCodec { self.codec.as_ref() }

    /// Registers a provider for `dependency`, replacing any previous one.
    ///
    /// Providers registered before [`initialize`](Self::initialize) take
    /// precedence over the built-in ones and are checked at startup.
    pub fn register_provider<F>(&mut self, dependency: impl Into<String>, provider: F)
    where
        F: Fn(&mut CurrencyRegistry) + Send + Sync + 'static,
    {
        self.providers.register(dependency, Arc::new(provider));
    }

    /// Loads hooks, providers, built-in and item currencies, then saves both
    /// stores.
    ///
    /// Failures of single entries are logged and skipped; the registry is
    /// always usable afterwards.
    pub fn initialize(&mut self) {
        self.load_hooks();
        self.state = RegistryState::HooksLoaded;

        self.load_providers();
        self.state = RegistryState::ProvidersRegistered;

        self.load_built_in_currencies();
        self.state = RegistryState::BuiltInsLoaded;

        self.load_item_currencies();
        self.state = RegistryState::ItemCurrenciesLoaded;

        self.save_configs();

        self.state = RegistryState::Ready;
        info!(count = self.currency_map.len(), "currency registry ready");
    }

    /// Saves pending store changes, clears every currency and provider, and
    /// releases hooks.
    pub fn shutdown(&mut self) {
        self.save_configs();
        self.currency_map.clear();
        self.providers.clear();
        self.vault.shutdown();
        self.state = RegistryState::Terminated;
        debug!("currency registry shut down");
    }

    /// Fires the provider of `dependency`, if one is registered.
    ///
    /// Unknown names are ignored. A provider fired again re-registers its
    /// currencies, replacing the previous instances. Once the registry is
    /// ready, settings written by the provider are saved right away. Returns
    /// true if a provider ran.
    pub fn notify_dependency_active(&mut self, dependency: &str) -> bool {
        let Some(provider) = self.providers.get(dependency) else {
            debug!(dependency, "no currency provider for dependency");
            return false;
        };
        self.fire_provider(dependency, &provider);
        if self.state == RegistryState::Ready {
            self.save_configs();
        }
        true
    }

    fn fire_provider(&mut self, dependency: &str, provider: &ProviderFn) {
        info!(dependency, "dependency detected, loading currencies");
        provider(self);
    }

    fn load_hooks(&mut self) {
        if self.host.is_installed(VAULT_DEPENDENCY) {
            self.vault.setup_economy(self.host.as_ref());
        }
    }

    fn load_providers(&mut self) {
        let vault: ProviderFn = Arc::new(Self::activate_vault);
        self.providers.register_default(VAULT_DEPENDENCY, vault);

        let gems: ProviderFn = Arc::new(|registry: &mut CurrencyRegistry| {
            registry.load_provider_currencies(GEMS_ECONOMY_DEPENDENCY);
        });
        self.providers.register_default(GEMS_ECONOMY_DEPENDENCY, gems);

        // Handles to the providers fired now; released when the pass ends.
        let mut startup: Vec<(String, ProviderFn)> = Vec::new();
        for dependency in self.providers.names() {
            if !self.host.is_active(&dependency) {
                debug!(dependency = %dependency, "dependency not active, provider deferred");
                continue;
            }
            if let Some(provider) = self.providers.get(&dependency) {
                startup.push((dependency, provider));
            }
        }
        for (dependency, provider) in &startup {
            self.fire_provider(dependency, provider);
        }
    }

    fn activate_vault(&mut self) {
        if !self.vault.has_economy() {
            self.vault.setup_economy(self.host.as_ref());
        }
        let Some(economy) = self.vault.economy() else {
            return;
        };

        match economy.currencies() {
            Ok(handles) => match handles.into_iter().next() {
                Some(handle) => {
                    self.load_currency_for(VAULT_DEPENDENCY, VAULT, |id| {
                        Currency::external(id, handle)
                    });
                }
                None => warn!("Vault economy exposes no currency"),
            },
            Err(error) => warn!(%error, "could not query Vault economy"),
        }
    }

    /// Adapts and loads every currency exposed by `dependency`'s economy.
    ///
    /// Each currency is registered under its provider-side id. Enumeration
    /// failures are logged and nothing is loaded. Returns the number of
    /// currencies loaded.
    pub fn load_provider_currencies(&mut self, dependency: &str) -> usize {
        let Some(economy) = self.host.economy(dependency) else {
            warn!(dependency, "dependency is active but exposes no economy");
            return 0;
        };
        let handles = match economy.currencies() {
            Ok(handles) => handles,
            Err(error) => {
                warn!(dependency, %error, "could not enumerate currencies");
                return 0;
            }
        };

        let mut loaded = 0;
        for handle in handles {
            let id = handle.id().to_string();
            if self
                .load_currency_for(dependency, &id, |id| Currency::external(id, handle))
                .is_some()
            {
                loaded += 1;
            }
        }
        loaded
    }

    /// Loads the currencies that need no external dependency.
    pub fn load_built_in_currencies(&mut self) {
        self.load_currency_from(XP_POINTS, |id| Currency::new(id, CurrencyKind::XpPoints));
        self.load_currency_from(XP_LEVELS, |id| Currency::new(id, CurrencyKind::XpLevels));
    }

    /// Loads one item currency per entry of the items store.
    ///
    /// When the `Items` section is missing entirely it is seeded with
    /// [`SEEDED_ITEMS`]. Entries with a blank or undecodable tag are logged
    /// and skipped.
    pub fn load_item_currencies(&mut self) {
        if !self.items_config.document().contains(ITEMS_SECTION) {
            for (id, material) in SEEDED_ITEMS {
                let tag = self.codec.encode(&ItemDescriptor::new(material));
                self.items_config
                    .document_mut()
                    .set(&item_value_path(id), tag);
            }
        }

        for id in self.items_config.document().section_keys(ITEMS_SECTION) {
            let tag = self
                .items_config
                .document()
                .get_string(&item_value_path(&id))
                .map(str::to_string);
            let Some(tag) = tag.filter(|tag| !tag.trim().is_empty()) else {
                warn!(file = FILE_ITEMS, id = %id, "item has no tag, skipped");
                continue;
            };

            match self.codec.decode(&tag) {
                Ok(item) => {
                    self.load_currency_from(&id, |id| Currency::item(id, item));
                }
                Err(error) => error!(
                    file = FILE_ITEMS,
                    id = %id,
                    tag = %tag,
                    %error,
                    "could not decode item tag"
                ),
            }
        }
    }

    /// Loads the currency built by `factory`, but only if `dependency` is
    /// installed.
    pub fn load_currency_for<F>(
        &mut self,
        dependency: &str,
        id: &str,
        factory: F,
    ) -> Option<Arc<Currency>>
    where
        F: FnOnce(&str) -> Currency,
    {
        if !self.host.is_installed(dependency) {
            debug!(dependency, id, "dependency not installed, currency skipped");
            return None;
        }
        self.load_currency_from(id, factory)
    }

    /// Builds a currency with `factory` and loads it.
    pub fn load_currency_from<F>(&mut self, id: &str, factory: F) -> Option<Arc<Currency>>
    where
        F: FnOnce(&str) -> Currency,
    {
        self.load_currency(factory(id))
    }

    /// Loads `currency` with its compiled default settings.
    pub fn load_currency(&mut self, currency: Currency) -> Option<Arc<Currency>> {
        let settings = CurrencySettings::defaults_for(&currency);
        self.load_currency_with(currency, settings)
    }

    /// Overlays the currencies store onto `settings`, binds them to
    /// `currency`, and registers it.
    ///
    /// Ids that are empty or contain `.` cannot address their own settings
    /// section; such currencies are logged and not loaded.
    pub fn load_currency_with(
        &mut self,
        mut currency: Currency,
        mut settings: CurrencySettings,
    ) -> Option<Arc<Currency>> {
        let id = currency.internal_id();
        if id.is_empty() || id.contains('.') {
            error!(id, "currency id cannot be used as a settings path, skipped");
            return None;
        }

        let path = format!("{CURRENCIES_SECTION}.{}", currency.internal_id());
        settings.load(self.currencies_config.document_mut(), &path);
        currency.load(settings);
        Some(self.register(currency))
    }

    /// Inserts `currency`, replacing any currency with the same id.
    ///
    /// The fallback sentinel is never inserted; it is returned unchanged.
    pub fn register(&mut self, currency: impl Into<Arc<Currency>>) -> Arc<Currency> {
        let currency = currency.into();
        if currency.is_dummy() {
            warn!("refusing to register the fallback currency");
            return currency;
        }

        let id = currency.internal_id().to_string();
        if self
            .currency_map
            .insert(id.clone(), Arc::clone(&currency))
            .is_some()
        {
            debug!(id = %id, "currency replaced");
        }
        info!(id = %id, "currency registered");
        currency
    }

    /// Returns true if any currency is registered.
    pub fn has_any(&self) -> bool { !self.currency_map.is_empty() }

    /// Returns a snapshot of every registered currency.
    pub fn all(&self) -> HashSet<Arc<Currency>> {
        self.currency_map.values().cloned().collect()
    }

    /// Returns a snapshot of every registered id.
    pub fn all_ids(&self) -> HashSet<String> {
        self.currency_map.keys().cloned().collect()
    }

    pub fn currency_map(&self) -> &HashMap<String, Arc<Currency>> { &self.currency_map }

    /// Looks up a currency. The id is lower-cased first.
    pub fn get(&self, id: &str) -> Option<Arc<Currency>> {
        self.currency_map.get(&id.to_lowercase()).cloned()
    }

    /// Looks up a currency, falling back to [`DUMMY_CURRENCY`].
    pub fn get_or_dummy(&self, id: &str) -> Arc<Currency> {
        self.get(id).unwrap_or_else(|| Arc::clone(&DUMMY_CURRENCY))
    }

    fn save_configs(&mut self) {
        for (file, config) in [
            (FILE_CURRENCIES, &mut self.currencies_config),
            (FILE_ITEMS, &mut self.items_config),
        ] {
            match config.save_changes() {
                Ok(true) => debug!(file, "configuration saved"),
                Ok(false) => {}
                Err(error) => error!(file, %error, "could not save configuration"),
            }
        }
    }
}

fn item_value_path(id: &str) -> String { format!("{ITEMS_SECTION}.{id}.Value") }

impl std::fmt::Debug for CurrencyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrencyRegistry")
            .field("state", &self.state)
            .field("currencies", &self.currency_map.keys())
            .field("providers", &self.providers)
            .field("vault", &self.vault)
            .finish()
    }
}
