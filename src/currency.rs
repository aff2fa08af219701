use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::{
    CurrencySettings, DUMMY, ExternalCurrency, Holder, ItemDescriptor, XP_LEVELS,
    XP_POINTS,
};

/// The value source backing a currency.
///
/// The set of variants is closed.
#[derive(Clone)]
pub enum CurrencyKind {
    /// The holder's experience points.
    XpPoints,
    /// The holder's experience levels.
    XpLevels,
    /// Items similar to the descriptor in the holder's inventory.
    Item(ItemDescriptor),
    /// A currency owned by an external economy provider.
    External(Arc<dyn ExternalCurrency>),
    /// The fallback sentinel. Holds no value.
    Dummy,
}

impl Debug for CurrencyKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CurrencyKind::XpPoints => write!(f, "XpPoints"),
            CurrencyKind::XpLevels => write!(f, "XpLevels"),
            CurrencyKind::Item(item) => f.debug_tuple("Item").field(item).finish(),
            CurrencyKind::External(handle) => {
                f.debug_tuple("External").field(&handle.id()).finish()
            }
            CurrencyKind::Dummy => write!(f, "Dummy"),
        }
    }
}

/// A named value source resolvable by its internal id.
///
/// Two currencies are equal when their internal ids are equal, regardless of
/// their settings or backing source.
///
/// # Examples
///
/// ```
/// use currency_bridge::{Currency, ItemDescriptor};
///
/// let currency = Currency::item("Gold", ItemDescriptor::new("gold_ingot"));
/// assert_eq!(currency.internal_id(), "gold");
/// assert_eq!(currency.name(), "Gold Ingot");
/// ```
#[derive(Clone)]
pub struct Currency {
    internal_id: String,
    settings: CurrencySettings,
    kind: CurrencyKind,
}

impl Currency {
    /// Creates a currency with its compiled default settings bound.
    ///
    /// The id is lower-cased.
    pub fn new(internal_id: impl AsRef<str>, kind: CurrencyKind) -> Self {
        let mut currency = Self {
            internal_id: internal_id.as_ref().to_lowercase(),
            settings: CurrencySettings::new("", "", "", 0, false),
            kind,
        };
        currency.settings = CurrencySettings::defaults_for(&currency);
        currency
    }

    /// The experience points currency.
    pub fn xp_points() -> Self { Self::new(XP_POINTS, CurrencyKind::XpPoints) }

    /// The experience levels currency.
    pub fn xp_levels() -> Self { Self::new(XP_LEVELS, CurrencyKind::XpLevels) }

    /// A currency backed by items similar to `item`.
    pub fn item(internal_id: impl AsRef<str>, item: ItemDescriptor) -> Self {
        Self::new(internal_id, CurrencyKind::Item(item))
    }

    /// An adapter over an external provider's currency.
    pub fn external(internal_id: impl AsRef<str>, handle: Arc<dyn ExternalCurrency>) -> Self {
        Self::new(internal_id, CurrencyKind::External(handle))
    }

    /// The fallback sentinel. Prefer the shared
    /// [`DUMMY_CURRENCY`](crate::DUMMY_CURRENCY).
    pub fn dummy() -> Self { Self::new(DUMMY, CurrencyKind::Dummy) }

    pub fn internal_id(&self) -> &str { &self.internal_id }

    pub fn settings(&self) -> &CurrencySettings { &self.settings }

    pub fn kind(&self) -> &CurrencyKind { &self.kind }

    /// Binds `settings` to this currency. Does nothing for the sentinel.
    pub fn load(&mut self, settings: CurrencySettings) {
        if self.is_dummy() {
            return;
        }
        self.settings = settings;
    }

    /// Returns true if this is the fallback sentinel.
    pub fn is_dummy(&self) -> bool { matches!(self.kind, CurrencyKind::Dummy) }

    /// The sentinel is never enabled.
    pub fn is_enabled(&self) -> bool { !self.is_dummy() && self.settings.is_enabled() }

    pub fn name(&self) -> &str { self.settings.name() }

    pub fn can_handle_decimals(&self) -> bool { self.settings.decimal_places() > 0 }

    pub fn round(&self, amount: f64) -> f64 { self.settings.round(amount) }

    pub fn format(&self, amount: f64) -> String { self.settings.format(amount) }

    /// Returns how much of this currency `holder` owns.
    pub fn balance(&self, holder: &dyn Holder) -> f64 {
        match &self.kind {
            CurrencyKind::XpPoints => holder.experience_points() as f64,
            CurrencyKind::XpLevels => holder.experience_levels() as f64,
            CurrencyKind::Item(item) => holder.count_items(item) as f64,
            CurrencyKind::External(handle) => handle.balance(holder.holder_id()),
            CurrencyKind::Dummy => 0.0,
        }
    }

    /// Adds `amount` to `holder`. Whole-unit sources ignore the fraction.
    pub fn give(&self, holder: &mut dyn Holder, amount: f64) {
        match &self.kind {
            CurrencyKind::XpPoints => {
                let points = holder.experience_points().saturating_add(whole(amount));
                holder.set_experience_points(points);
            }
            CurrencyKind::XpLevels => {
                let levels = holder.experience_levels().saturating_add(whole(amount));
                holder.set_experience_levels(levels);
            }
            CurrencyKind::Item(item) => holder.give_items(item, whole(amount)),
            CurrencyKind::External(handle) => {
                handle.deposit(holder.holder_id(), self.round(amount))
            }
            CurrencyKind::Dummy => {}
        }
    }

    /// Removes `amount` from `holder`, never going below zero for built-in
    /// sources.
    pub fn take(&self, holder: &mut dyn Holder, amount: f64) {
        match &self.kind {
            CurrencyKind::XpPoints => {
                let points = holder.experience_points().saturating_sub(whole(amount));
                holder.set_experience_points(points);
            }
            CurrencyKind::XpLevels => {
                let levels = holder.experience_levels().saturating_sub(whole(amount));
                holder.set_experience_levels(levels);
            }
            CurrencyKind::Item(item) => {
                let amount = whole(amount).min(holder.count_items(item));
                holder.take_items(item, amount);
            }
            CurrencyKind::External(handle) => {
                handle.withdraw(holder.holder_id(), self.round(amount))
            }
            CurrencyKind::Dummy => {}
        }
    }
}

fn whole(amount: f64) -> u64 {
    if amount.is_finite() && amount > 0.0 {
        amount.floor() as u64
    } else {
        0
    }
}

impl PartialEq for Currency {
    fn eq(&self, other: &Self) -> bool { self.internal_id == other.internal_id }
}

impl Eq for Currency {}

impl Hash for Currency {
    fn hash<H: Hasher>(&self, state: &mut H) { self.internal_id.hash(state); }
}

impl Debug for Currency {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Currency")
            .field("internal_id", &self.internal_id)
            .field("kind", &self.kind)
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.internal_id)
    }
}
