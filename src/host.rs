use std::sync::Arc;

use crate::{EconomyProvider, ItemDescriptor};

/// The host environment's view of its optional dependencies.
///
/// A dependency is *installed* once the host knows about it and *active*
/// once it has finished its own startup. Only active dependencies are
/// expected to answer [`economy`](Self::economy).
pub trait DependencyHost: Send + Sync {
    /// Returns true if the dependency is installed.
    fn is_installed(&self, name: &str) -> bool;

    /// Returns true if the dependency is installed and has finished starting.
    fn is_active(&self, name: &str) -> bool;

    /// Returns the economy exposed by the dependency, if any.
    fn economy(&self, name: &str) -> Option<Arc<dyn EconomyProvider>>;
}

/// Anything holding value that the built-in currencies read and modify.
pub trait Holder {
    /// Stable identifier used by external providers to look up accounts.
    fn holder_id(&self) -> &str;

    fn experience_points(&self) -> u64;

    fn set_experience_points(&mut self, points: u64);

    fn experience_levels(&self) -> u64;

    fn set_experience_levels(&mut self, levels: u64);

    /// Counts items similar to `item`, ignoring its stack size.
    fn count_items(&self, item: &ItemDescriptor) -> u64;

    fn give_items(&mut self, item: &ItemDescriptor, amount: u64);

    /// Removes up to `amount` items similar to `item`.
    fn take_items(&mut self, item: &ItemDescriptor, amount: u64);
}
