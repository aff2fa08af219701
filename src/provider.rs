//! External economy providers and the deferred provider table.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::{CurrencyRegistry, ProviderError};

/// An economy system exposed by an external dependency.
pub trait EconomyProvider: Send + Sync {
    /// Enumerates every currency this provider offers.
    fn currencies(&self) -> Result<Vec<Arc<dyn ExternalCurrency>>, ProviderError>;
}

/// One currency owned by an external economy provider.
///
/// Balances are keyed by [`Holder::holder_id`](crate::Holder::holder_id).
pub trait ExternalCurrency: Send + Sync {
    /// The provider-side identifier.
    fn id(&self) -> &str;

    /// The provider's own display name, used as the settings default.
    fn display_name(&self) -> String;

    /// Decimal places the provider supports.
    fn decimal_places(&self) -> u32 { 2 }

    fn balance(&self, holder: &str) -> f64;

    fn deposit(&self, holder: &str, amount: f64);

    fn withdraw(&self, holder: &str, amount: f64);
}

/// Zero-argument activation procedure of a dependency.
///
/// Runs against the registry that owns it when the dependency becomes
/// active.
pub type ProviderFn = Arc<dyn Fn(&mut CurrencyRegistry) + Send + Sync>;

/// Maps dependency names to their activation procedures.
///
/// Holds at most one procedure per name. The table does not track whether a
/// procedure already ran.
#[derive(Clone, Default)]
pub struct ProviderTable {
    providers: HashMap<String, ProviderFn>,
}

impl ProviderTable {
    pub fn new() -> Self { Self::default() }

    /// Registers `provider` for `dependency`, replacing any previous one.
    ///
    /// Returns true if a procedure was replaced.
    pub fn register(&mut self, dependency: impl Into<String>, provider: ProviderFn) -> bool {
        self.providers.insert(dependency.into(), provider).is_some()
    }

    /// Registers `provider` only if `dependency` has none yet.
    ///
    /// Returns true if it was inserted.
    pub fn register_default(&mut self, dependency: &str, provider: ProviderFn) -> bool {
        if self.providers.contains_key(dependency) {
            return false;
        }
        self.providers.insert(dependency.to_string(), provider);
        true
    }

    /// Returns the procedure registered for `dependency`.
    pub fn get(&self, dependency: &str) -> Option<ProviderFn> {
        self.providers.get(dependency).cloned()
    }

    pub fn contains(&self, dependency: &str) -> bool {
        self.providers.contains_key(dependency)
    }

    /// Returns the registered dependency names in sorted order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize { self.providers.len() }

    pub fn is_empty(&self) -> bool { self.providers.is_empty() }

    pub fn clear(&mut self) { self.providers.clear(); }
}

impl fmt::Debug for ProviderTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderTable")
            .field("dependencies", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> ProviderFn { Arc::new(|_registry: &mut CurrencyRegistry| {}) }

    #[test]
    fn test_register_replaces() {
        let mut table = ProviderTable::new();
        assert!(!table.register("Vault", noop()));
        assert!(table.register("Vault", noop()));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_register_default_keeps_existing() {
        let mut table = ProviderTable::new();
        let first = noop();
        table.register("Vault", first.clone());
        assert!(!table.register_default("Vault", noop()));
        assert!(Arc::ptr_eq(&table.get("Vault").unwrap(), &first));
        assert!(table.register_default("GemsEconomy", noop()));
    }

    #[test]
    fn test_names_sorted_and_clear() {
        let mut table = ProviderTable::new();
        table.register("b", noop());
        table.register("a", noop());
        assert_eq!(table.names(), vec!["a".to_string(), "b".to_string()]);
        assert!(table.get("c").is_none());

        table.clear();
        assert!(table.is_empty());
    }
}
