use std::sync::{Arc, LazyLock};

use crate::Currency;

/// A macro that declares a built-in currency identifier at compile time.
///
/// This macro creates two constants:
/// - A `&str` constant with the given name holding the internal id
/// - A `&str` constant with the suffix `_PATH` holding the settings path of
///   that currency in the currencies store
///
/// Ids must be lower-case.
///
/// # Examples
///
/// ```
/// use currency_bridge::*;
///
/// const_currency_id!(TOKENS, "tokens");
///
/// assert_eq!(TOKENS, "tokens");
/// assert_eq!(TOKENS_PATH, "Currencies.tokens");
/// ```
#[macro_export]
macro_rules! const_currency_id {
    ($const_name:ident, $id:literal) => {
        $crate::paste::paste! {
            pub const [<$const_name _PATH>]: &str = concat!("Currencies.", $id);
        }
        pub const $const_name: &str = $id;
    };
}

/// Top-level section of the currencies store.
pub const CURRENCIES_SECTION: &str = "Currencies";

/// Top-level section of the items store.
pub const ITEMS_SECTION: &str = "Items";

//
// Built-in currencies
//

const_currency_id!(XP_POINTS, "xp_points");
const_currency_id!(XP_LEVELS, "xp_levels");
const_currency_id!(VAULT, "vault");

/// Id of the fallback sentinel. It is never registered and has no settings
/// section.
pub const DUMMY: &str = "dummy";

//
// Dependencies with built-in providers
//

/// Name of the Vault dependency.
pub const VAULT_DEPENDENCY: &str = "Vault";

/// Name of the GemsEconomy dependency.
pub const GEMS_ECONOMY_DEPENDENCY: &str = "GemsEconomy";

/// Item currencies seeded into an items store that has no `Items` section.
///
/// Each entry is `(id, material)`.
pub const SEEDED_ITEMS: [(&str, &str); 3] = [
    ("gold", "gold_ingot"),
    ("diamond", "diamond"),
    ("emerald", "emerald"),
];

/// The process-wide fallback currency.
///
/// Returned by [`CurrencyRegistry::get_or_dummy`](crate::CurrencyRegistry::get_or_dummy)
/// for unknown ids. It is built on first access and never mutated; it is
/// never inserted into a registry.
///
/// # Examples
///
/// ```
/// use currency_bridge::*;
///
/// assert_eq!(DUMMY_CURRENCY.internal_id(), DUMMY);
/// assert!(!DUMMY_CURRENCY.is_enabled());
/// ```
pub static DUMMY_CURRENCY: LazyLock<Arc<Currency>> =
    LazyLock::new(|| Arc::new(Currency::dummy()));
