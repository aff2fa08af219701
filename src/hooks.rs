use std::sync::Arc;

use tracing::{debug, info};

use crate::{DependencyHost, EconomyProvider, VAULT_DEPENDENCY};

/// Holds the economy service exposed through Vault.
///
/// Vault is only a bridge: the economy behind it is registered by some other
/// dependency, possibly after Vault itself has started. Setup can therefore
/// be retried until an economy shows up.
#[derive(Default)]
pub struct VaultHook {
    economy: Option<Arc<dyn EconomyProvider>>,
}

impl VaultHook {
    pub fn new() -> Self { Self::default() }

    /// Looks up the Vault economy on `host`. Returns true if one is now held.
    pub fn setup_economy(&mut self, host: &dyn DependencyHost) -> bool {
        self.economy = host.economy(VAULT_DEPENDENCY);
        match self.economy {
            Some(_) => info!("Vault economy hooked"),
            None => debug!("Vault has no economy registered yet"),
        }
        self.economy.is_some()
    }

    pub fn has_economy(&self) -> bool { self.economy.is_some() }

    pub fn economy(&self) -> Option<Arc<dyn EconomyProvider>> { self.economy.clone() }

    /// Releases the economy handle.
    pub fn shutdown(&mut self) {
        if self.economy.take().is_some() {
            debug!("Vault economy released");
        }
    }
}

impl std::fmt::Debug for VaultHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultHook")
            .field("has_economy", &self.has_economy())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::{ExternalCurrency, ProviderError};

    struct EmptyEconomy;

    impl EconomyProvider for EmptyEconomy {
        fn currencies(&self) -> Result<Vec<Arc<dyn ExternalCurrency>>, ProviderError> {
            Ok(Vec::new())
        }
    }

    #[derive(Default)]
    struct VaultHost {
        economy: Mutex<Option<Arc<dyn EconomyProvider>>>,
    }

    impl DependencyHost for VaultHost {
        fn is_installed(&self, name: &str) -> bool { name == VAULT_DEPENDENCY }

        fn is_active(&self, name: &str) -> bool { name == VAULT_DEPENDENCY }

        fn economy(&self, name: &str) -> Option<Arc<dyn EconomyProvider>> {
            if name != VAULT_DEPENDENCY {
                return None;
            }
            self.economy.lock().unwrap().clone()
        }
    }

    #[test]
    fn test_setup_retries_until_economy_registered() {
        let host = VaultHost::default();
        let mut hook = VaultHook::new();

        assert!(!hook.setup_economy(&host));
        assert!(!hook.has_economy());
        assert!(hook.economy().is_none());

        *host.economy.lock().unwrap() = Some(Arc::new(EmptyEconomy));
        assert!(hook.setup_economy(&host));
        assert!(hook.has_economy());
    }

    #[test]
    fn test_shutdown_releases_economy() {
        let economy: Arc<dyn EconomyProvider> = Arc::new(EmptyEconomy);
        let host = VaultHost {
            economy: Mutex::new(Some(economy.clone())),
        };
        let mut hook = VaultHook::new();
        hook.setup_economy(&host);
        assert_eq!(Arc::strong_count(&economy), 3);

        hook.shutdown();
        assert!(!hook.has_economy());
        assert_eq!(Arc::strong_count(&economy), 2);

        // Releasing twice is harmless.
        hook.shutdown();
        assert_eq!(Arc::strong_count(&economy), 2);
    }
}
