use crate::{ConfigDocument, Currency, CurrencyKind};

/// Placeholder replaced by the formatted amount in [`CurrencySettings::format`].
pub const PLACEHOLDER_AMOUNT: &str = "%amount%";

/// Placeholder replaced by the display name in [`CurrencySettings::format`].
pub const PLACEHOLDER_NAME: &str = "%name%";

/// Default format string for every currency.
pub const DEFAULT_FORMAT: &str = "%amount% %name%";

/// Upper bound applied to the decimal places when rounding.
pub const MAX_DECIMAL_PLACES: u32 = 8;

const KEY_NAME: &str = "Name";
const KEY_FORMAT: &str = "Format";
const KEY_ICON: &str = "Icon";
const KEY_DECIMAL_PLACES: &str = "Decimal_Places";
const KEY_ENABLED: &str = "Enabled";

/// The merged configuration of a single currency.
///
/// Settings start from compiled defaults ([`CurrencySettings::defaults_for`])
/// and are then overlaid with persisted values ([`CurrencySettings::load`]).
///
/// # Examples
///
/// ```
/// use currency_bridge::{ConfigDocument, Currency, CurrencySettings};
///
/// let currency = Currency::xp_levels();
/// let mut config = ConfigDocument::new();
///
/// let mut settings = CurrencySettings::defaults_for(&currency);
/// settings.load(&mut config, "Currencies.xp_levels");
///
/// // Missing fields were written back.
/// assert_eq!(config.get_string("Currencies.xp_levels.Name"), Some("XP Levels"));
/// assert_eq!(settings.format(5.0), "5 XP Levels");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencySettings {
    name: String,
    format: String,
    icon: String,
    decimal_places: u32,
    enabled: bool,
}

impl CurrencySettings {
    /// Creates settings from explicit values.
    pub fn new(
        name: impl Into<String>,
        format: impl Into<String>,
        icon: impl Into<String>,
        decimal_places: u32,
        enabled: bool,
    ) -> Self {
        Self {
            name: name.into(),
            format: format.into(),
            icon: icon.into(),
            decimal_places,
            enabled,
        }
    }

    /// Builds the compiled defaults for `currency`.
    ///
    /// Has no side effects.
    pub fn defaults_for(currency: &Currency) -> Self {
        match currency.kind() {
            CurrencyKind::XpPoints => {
                Self::new("XP Points", DEFAULT_FORMAT, "experience_bottle", 0, true)
            }
            CurrencyKind::XpLevels => {
                Self::new("XP Levels", DEFAULT_FORMAT, "experience_bottle", 0, true)
            }
            CurrencyKind::Item(item) => {
                Self::new(item.name(), DEFAULT_FORMAT, item.material.clone(), 0, true)
            }
            CurrencyKind::External(handle) => Self::new(
                handle.display_name(),
                DEFAULT_FORMAT,
                "sunflower",
                handle.decimal_places(),
                true,
            ),
            CurrencyKind::Dummy => Self::new("Dummy", DEFAULT_FORMAT, "barrier", 0, false),
        }
    }

    /// Overlays the persisted values found under `path`.
    ///
    /// Each field is read from `path.<Field>`. A field that is absent or has
    /// the wrong type keeps its current value, and that value is written
    /// back to `config`. Running this twice on unchanged data yields the same
    /// settings and leaves `config` untouched the second time.
    pub fn load(&mut self, config: &mut ConfigDocument, path: &str) {
        self.name = config.read_or_seed_string(&field(path, KEY_NAME), &self.name);
        self.format = config.read_or_seed_string(&field(path, KEY_FORMAT), &self.format);
        self.icon = config.read_or_seed_string(&field(path, KEY_ICON), &self.icon);
        self.decimal_places =
            config.read_or_seed_u32(&field(path, KEY_DECIMAL_PLACES), self.decimal_places);
        self.enabled = config.read_or_seed_bool(&field(path, KEY_ENABLED), self.enabled);
    }

    /// The display name.
    pub fn name(&self) -> &str { &self.name }

    /// The format string.
    pub fn format_string(&self) -> &str { &self.format }

    /// The icon material.
    pub fn icon(&self) -> &str { &self.icon }

    /// The number of decimal places amounts are rounded to.
    pub fn decimal_places(&self) -> u32 { self.decimal_places }

    /// Whether the currency is enabled.
    pub fn is_enabled(&self) -> bool { self.enabled }

    /// Returns a copy with `enabled` replaced.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Returns a copy with the display name replaced.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Rounds `amount` down to the configured decimal places.
    pub fn round(&self, amount: f64) -> f64 {
        let factor = 10f64.powi(self.effective_decimal_places() as i32);
        (amount * factor).floor() / factor
    }

    /// Renders `amount` with the format string.
    pub fn format(&self, amount: f64) -> String {
        let amount = format!(
            "{:.*}",
            self.effective_decimal_places() as usize,
            self.round(amount)
        );
        self.format
            .replace(PLACEHOLDER_AMOUNT, &amount)
            .replace(PLACEHOLDER_NAME, &self.name)
    }

    fn effective_decimal_places(&self) -> u32 {
        self.decimal_places.min(MAX_DECIMAL_PLACES)
    }
}

fn field(path: &str, key: &str) -> String { format!("{path}.{key}") }
