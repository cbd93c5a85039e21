pub mod bulk;
pub mod card;
pub mod set;

pub use bulk::BulkData;
pub(crate) use bulk::ListResponse;
pub use card::*;
pub use set::*;

use serde::{Deserialize, Deserializer};

/// Decode an explicit JSON `null` as the type's default value.
///
/// `#[serde(default)]` only covers absent fields; Scryfall emits `null` for
/// some non-optional fields on older or digital-only printings.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
