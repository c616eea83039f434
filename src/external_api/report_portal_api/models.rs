pub mod filter;
pub mod launch;
pub mod page;
pub mod statistics;
pub mod timestamp;

use serde::{Deserialize, Deserializer};

/// Explicit `null` decodes like a missing key
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
