//! Integration tests for the on-disk currencies and items stores.

use std::sync::{Arc, Mutex};

use currency_bridge::{
    ConfigError, ConfigFile, Currency, CurrencyRegistry, CurrencySettings, DependencyHost,
    EconomyProvider, ExternalCurrency, ItemDescriptor, ProviderError, StorageConfig, VAULT,
    VAULT_DEPENDENCY, XP_POINTS,
};
use tempfile::TempDir;

struct NoDependencies;

impl DependencyHost for NoDependencies {
    fn is_installed(&self, _name: &str) -> bool { false }
    fn is_active(&self, _name: &str) -> bool { false }
    fn economy(&self, _name: &str) -> Option<Arc<dyn EconomyProvider>> { None }
}

fn open(temp_dir: &TempDir) -> CurrencyRegistry {
    let config = StorageConfig::with_directory(temp_dir.path().join("data"));
    CurrencyRegistry::open(Arc::new(NoDependencies), &config).unwrap()
}

#[test]
fn test_first_run_creates_both_files() {
    let temp_dir = TempDir::new().unwrap();
    let mut registry = open(&temp_dir);
    registry.initialize();

    let data = temp_dir.path().join("data");
    let currencies = std::fs::read_to_string(data.join("currencies.json")).unwrap();
    let items = std::fs::read_to_string(data.join("items.json")).unwrap();

    assert!(currencies.contains("\"xp_points\""));
    assert!(currencies.contains("\"Decimal_Places\""));
    assert!(items.contains("\"gold\""));
    assert!(items.contains("\"emerald\""));
}

#[test]
fn test_second_run_leaves_files_identical() {
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path().join("data");

    open(&temp_dir).initialize();
    let first_currencies = std::fs::read(data.join("currencies.json")).unwrap();
    let first_items = std::fs::read(data.join("items.json")).unwrap();

    let mut registry = open(&temp_dir);
    registry.initialize();
    assert!(!registry.currencies_config().document().is_changed());

    assert_eq!(std::fs::read(data.join("currencies.json")).unwrap(), first_currencies);
    assert_eq!(std::fs::read(data.join("items.json")).unwrap(), first_items);
    assert_eq!(registry.all_ids().len(), 5);
}

#[test]
fn test_user_edits_survive_and_missing_fields_are_restored() {
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path().join("data");
    std::fs::create_dir_all(&data).unwrap();
    std::fs::write(
        data.join("currencies.json"),
        r#"{"Currencies": {"xp_points": {"Name": "Exp", "Decimal_Places": "two"}}}"#,
    )
    .unwrap();

    let mut registry = open(&temp_dir);
    registry.initialize();
    assert_eq!(registry.get(XP_POINTS).unwrap().name(), "Exp");

    let reloaded = ConfigFile::load_or_create(data.join("currencies.json")).unwrap();
    let store = reloaded.document();
    assert_eq!(store.get_string("Currencies.xp_points.Name"), Some("Exp"));
    assert_eq!(
        store.get("Currencies.xp_points.Decimal_Places"),
        Some(&serde_json::json!(0))
    );
    assert_eq!(store.get_string("Currencies.xp_points.Format"), Some("%amount% %name%"));
}

#[test]
fn test_settings_load_twice_is_byte_identical() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("currencies.json");

    let mut file = ConfigFile::load_or_create(&path).unwrap();
    let defaults = CurrencySettings::new("Coins", "%amount% %name%", "gold_nugget", 2, true);

    let mut settings = defaults.clone();
    settings.load(file.document_mut(), "Currencies.coins");
    assert!(file.save_changes().unwrap());
    let first = std::fs::read(&path).unwrap();

    let mut settings = defaults.clone();
    settings.load(file.document_mut(), "Currencies.coins");
    assert!(!file.save_changes().unwrap());
    assert_eq!(std::fs::read(&path).unwrap(), first);
}

#[test]
fn test_invalid_store_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("items.json");

    std::fs::write(&path, "{ nope").unwrap();
    assert!(matches!(
        ConfigFile::load_or_create(&path),
        Err(ConfigError::Json { .. })
    ));

    std::fs::write(&path, "[1, 2]").unwrap();
    assert!(matches!(
        ConfigFile::load_or_create(&path),
        Err(ConfigError::NotAnObject { .. })
    ));

    std::fs::write(&path, "").unwrap();
    assert!(ConfigFile::load_or_create(&path).unwrap().document().is_empty());
}

struct Coins;

impl ExternalCurrency for Coins {
    fn id(&self) -> &str { "coins" }
    fn display_name(&self) -> String { "Coins".to_string() }
    fn balance(&self, _holder: &str) -> f64 { 0.0 }
    fn deposit(&self, _holder: &str, _amount: f64) {}
    fn withdraw(&self, _holder: &str, _amount: f64) {}
}

struct CoinsEconomy;

impl EconomyProvider for CoinsEconomy {
    fn currencies(&self) -> Result<Vec<Arc<dyn ExternalCurrency>>, ProviderError> {
        Ok(vec![Arc::new(Coins)])
    }
}

#[derive(Default)]
struct LateVault {
    active: Mutex<bool>,
}

impl DependencyHost for LateVault {
    fn is_installed(&self, name: &str) -> bool {
        name == VAULT_DEPENDENCY && *self.active.lock().unwrap()
    }

    fn is_active(&self, name: &str) -> bool { self.is_installed(name) }

    fn economy(&self, name: &str) -> Option<Arc<dyn EconomyProvider>> {
        if self.is_installed(name) {
            Some(Arc::new(CoinsEconomy))
        } else {
            None
        }
    }
}

#[test]
fn test_late_activation_settings_are_saved() {
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path().join("data");
    let host = Arc::new(LateVault::default());
    let config = StorageConfig::with_directory(data.clone());
    let mut registry = CurrencyRegistry::open(host.clone(), &config).unwrap();
    registry.initialize();

    let before = std::fs::read_to_string(data.join("currencies.json")).unwrap();
    assert!(!before.contains("\"vault\""));

    *host.active.lock().unwrap() = true;
    assert!(registry.notify_dependency_active(VAULT_DEPENDENCY));
    assert!(registry.get(VAULT).is_some());

    let reloaded = ConfigFile::load_or_create(data.join("currencies.json")).unwrap();
    assert_eq!(
        reloaded.document().get_string("Currencies.vault.Name"),
        Some("Coins")
    );
    assert!(!registry.currencies_config().document().is_changed());
}

#[test]
fn test_shutdown_saves_pending_changes() {
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path().join("data");
    let mut registry = open(&temp_dir);
    registry.initialize();

    registry.load_currency(Currency::item("tickets", ItemDescriptor::new("paper")));
    assert!(registry.currencies_config().document().is_changed());

    registry.shutdown();

    let reloaded = ConfigFile::load_or_create(data.join("currencies.json")).unwrap();
    assert_eq!(
        reloaded.document().get_string("Currencies.tickets.Name"),
        Some("Paper")
    );
}
